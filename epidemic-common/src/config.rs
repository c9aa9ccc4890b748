use crate::sim_params::SimParams;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

// Configuration for the simulation plane
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    /// Width of the left-hand strip reserved for the chart overlay.
    /// Agents never settle inside it.
    pub margin_width: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
            margin_width: 600.0,
        }
    }
}

// Initial population setup
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PopulationConfig {
    pub size: u32,
    /// Number of agents seeded as Infected at construction.
    pub initial_infected: u32,
    pub seed: u64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: 500,
            initial_infected: 3,
            seed: 0,
        }
    }
}

// Transmission and resolution parameters
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct DiseaseConfig {
    pub infection_radius: f32,
    pub infection_probability: f32,
    pub recovery_time: f32,
    pub recovery_time_variance: f32,
    pub recovery_probability: f32,
}

impl Default for DiseaseConfig {
    fn default() -> Self {
        Self {
            infection_radius: 10.0,
            infection_probability: 0.7,
            recovery_time: 15.0,
            recovery_time_variance: 3.0,
            recovery_probability: 0.95,
        }
    }
}

// Per-tick movement parameters
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MovementConfig {
    pub step_length: f32,
    pub avoidance_radius: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            step_length: 10.0,
            avoidance_radius: 10.0,
        }
    }
}

// Timing settings for the driver loop
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    /// Simulated duration of one tick.
    pub dt: f32,
    /// Safety cap on the driver loop; the engine itself never terminates.
    pub max_ticks: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            dt: 0.05,
            max_ticks: 100_000,
        }
    }
}

// Output settings for the driver
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub base_filename: String,
    pub save_history: bool,
    pub save_positions: bool,
    /// History output format: "json", "bincode", "messagepack"
    pub format: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_filename: "epidemic".to_string(),
            save_history: true,
            save_positions: false,
            format: None,
        }
    }
}

/// Main simulation configuration, loaded from a TOML file.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SimulationConfig {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub population: PopulationConfig,
    #[serde(default)]
    pub disease: DiseaseConfig,
    #[serde(default)]
    pub movement: MovementConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl SimulationConfig {
    /// Loads the simulation configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        let config: SimulationConfig = toml::from_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML from '{}': {}", path_ref.display(), e))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.world.width <= 0.0 || self.world.height <= 0.0 {
            anyhow::bail!("world dimensions must be positive.");
        }
        if self.world.margin_width < 0.0 || self.world.margin_width >= self.world.width {
            anyhow::bail!("margin_width must lie within [0, world width).");
        }
        if self.population.initial_infected > self.population.size {
            anyhow::bail!("initial_infected cannot exceed population size.");
        }
        if self.timing.dt <= 0.0 {
            anyhow::bail!("dt must be positive.");
        }
        Ok(())
    }

    /// Flattens the configuration into the runtime parameter set.
    pub fn sim_params(&self) -> SimParams {
        SimParams {
            world_width: self.world.width,
            world_height: self.world.height,
            margin_width: self.world.margin_width,
            dt: self.timing.dt,
            step_length: self.movement.step_length,
            avoidance_radius: self.movement.avoidance_radius,
            infection_radius: self.disease.infection_radius,
            infection_probability: self.disease.infection_probability,
            recovery_time: self.disease.recovery_time,
            recovery_time_variance: self.disease.recovery_time_variance,
            recovery_probability: self.disease.recovery_probability,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_toml_with_defaults() {
        let toml_str = r#"
            [population]
            size = 50
            initial_infected = 2
            seed = 7

            [disease]
            infection_radius = 25.0
            infection_probability = 1.0
            recovery_time = 5.0
            recovery_time_variance = 1.0
            recovery_probability = 0.5
        "#;
        let config: SimulationConfig = toml::from_str(toml_str).unwrap();
        config.validate().unwrap();

        assert_eq!(config.population.size, 50);
        assert_eq!(config.population.seed, 7);
        // Omitted sections fall back to defaults.
        assert_eq!(config.world.width, 1920.0);
        assert_eq!(config.movement.step_length, 10.0);

        let params = config.sim_params();
        assert_eq!(params.infection_radius, 25.0);
        assert_eq!(params.dt, 0.05);
    }

    #[test]
    fn rejects_infected_seed_larger_than_population() {
        let config = SimulationConfig {
            population: PopulationConfig {
                size: 3,
                initial_infected: 10,
                seed: 0,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_margin_outside_world() {
        let mut config = SimulationConfig::default();
        config.world.margin_width = config.world.width;
        assert!(config.validate().is_err());
    }
}
