use anyhow::Result;
use log::{debug, error, info, warn};
use std::fs::File;
use std::io::Write;
use std::time::Instant;

use epidemic_common::SimulationConfig;
use epidemic_engine::SimulationEngine;

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();

    info!("Starting epidemic simulation engine...");

    // --- Load Configuration ---
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = SimulationConfig::load(&config_path)?;

    // --- Initialize Simulation ---
    let mut engine = SimulationEngine::new(&config);
    info!(
        "Population initialized: {} agents, {} seeded infected.",
        engine.agents().len(),
        config.population.initial_infected
    );
    debug!("Simulation parameters: {:#?}", engine.params());

    // --- Simulation Loop ---
    // The engine never stops on its own; the driver steps it until the
    // infected count reaches zero (or the configured safety cap).
    let max_ticks = config.timing.max_ticks;
    let start_time = Instant::now();
    let mut previous_print_time = start_time;
    let mut ticks_run = 0;

    for step in 0..max_ticks {
        engine.step();
        ticks_run = step + 1;

        let now = Instant::now();
        let should_print = now.duration_since(previous_print_time).as_secs_f64() >= 5.0;
        if should_print {
            let counts = engine.counts();
            let denom = engine.population_size().max(1) as f32;
            info!(
                "t={:.1} S={:.2}% I={:.2}% R={:.2}% D={:.2}%",
                engine.tick(),
                counts.susceptible as f32 * 100.0 / denom,
                counts.infected as f32 * 100.0 / denom,
                counts.recovered as f32 * 100.0 / denom,
                counts.dead as f32 * 100.0 / denom,
            );
            previous_print_time = now;
        }

        if engine.infected_count() == 0 {
            info!(
                "No infected agents remain after {} ticks (t = {:.2}).",
                ticks_run,
                engine.tick()
            );
            break;
        }
    }

    if engine.infected_count() > 0 {
        warn!(
            "Reached max_ticks ({}) with {} agents still infected.",
            max_ticks,
            engine.infected_count()
        );
    }

    let elapsed = start_time.elapsed();
    info!(
        "Simulation finished: {} ticks in {:.3} seconds.",
        ticks_run,
        elapsed.as_secs_f64()
    );

    // --- Save Recorded History ---
    if config.output.save_history {
        let history = engine.history();
        let output_format = config.output.format.as_deref().unwrap_or("json");

        match output_format {
            "bincode" => {
                // Binary format (compact)
                let filename = format!("{}_history.bin", config.output.base_filename);
                match File::create(&filename) {
                    Ok(file) => match bincode::serialize_into(file, history) {
                        Ok(()) => info!("History saved to {} (binary format)", filename),
                        Err(e) => error!("Error serializing history to bincode: {}", e),
                    },
                    Err(e) => error!("Error creating history file '{}': {}", filename, e),
                }
            }
            "messagepack" => {
                let filename = format!("{}_history.msgpack", config.output.base_filename);
                match &mut File::create(&filename) {
                    Ok(file) => match rmp_serde::encode::write(file, history) {
                        Ok(()) => info!("History saved to {} (MessagePack format)", filename),
                        Err(e) => error!("Error serializing history to MessagePack: {}", e),
                    },
                    Err(e) => error!("Error creating history file '{}': {}", filename, e),
                }
            }
            other => {
                if other != "json" {
                    error!("Unknown output format: {}. Using JSON instead.", other);
                }
                let filename = format!("{}_history.json", config.output.base_filename);
                match File::create(&filename) {
                    Ok(mut file) => match serde_json::to_string(history) {
                        Ok(json_string) => {
                            if let Err(e) = file.write_all(json_string.as_bytes()) {
                                error!("Error writing history JSON to '{}': {}", filename, e);
                            } else {
                                info!("History saved to {}", filename);
                            }
                        }
                        Err(e) => error!("Error serializing history to JSON: {}", e),
                    },
                    Err(e) => error!("Error creating history file '{}': {}", filename, e),
                }
            }
        }
    } else {
        info!("Skipping history export as per config (save_history is false).");
    }

    // --- Save Final Agent Positions ---
    if config.output.save_positions {
        let filename = format!("{}_final_positions.csv", config.output.base_filename);
        match csv::Writer::from_path(&filename) {
            Ok(mut writer) => {
                writer.write_record(["x", "y", "status"])?;
                for agent in engine.agents() {
                    writer.write_record([
                        format!("{:.4}", agent.position.x),
                        format!("{:.4}", agent.position.y),
                        agent.status.as_str().to_string(),
                    ])?;
                }
                writer.flush()?;
                info!("Final positions saved to {}", filename);
            }
            Err(e) => error!("Error saving CSV file '{}': {}", filename, e),
        }
    }

    info!("Simulation complete.");
    Ok(())
}
