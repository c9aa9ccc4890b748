use crate::agent::{Agent, Status};
use epidemic_common::{History, SimParams, SimulationConfig, Vec2};
use log::debug;
use rand::prelude::*;
use rand::rngs::StdRng;
use std::cmp::Ordering;
use thiserror::Error;

/// Error returned by `set_parameter` for a name outside the tunable set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParameterError {
    #[error("unknown simulation parameter '{0}'")]
    Unknown(String),
}

/// Instantaneous tally of agent statuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub susceptible: u32,
    pub infected: u32,
    pub recovered: u32,
    pub dead: u32,
}

impl StatusCounts {
    fn tally(&mut self, status: Status) {
        match status {
            Status::Susceptible => self.susceptible += 1,
            Status::Infected => self.infected += 1,
            Status::Recovered => self.recovered += 1,
            Status::Dead => self.dead += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.susceptible + self.infected + self.recovered + self.dead
    }
}

/// Owns the population, the tick clock, the recorded history and the live
/// parameter set. Strictly single-threaded: `step()` runs to completion and
/// the caller paces ticks (pausing is simply not calling `step()`) and stops
/// once no Infected agents remain; the engine never terminates on its own.
pub struct SimulationEngine {
    params: SimParams,
    population: Vec<Agent>,
    /// Percentage denominator, fixed at construction. Agents spawned later
    /// are counted but not added to it, so summed percentages can exceed 100.
    population_size: u32,
    tick: f32,
    history: History,
    rng: StdRng,
}

impl SimulationEngine {
    /// Builds the initial population: uniform random placement inside the
    /// playable rectangle, the first `initial_infected` agents seeded as
    /// Infected with a full default countdown. All randomness flows from the
    /// configured seed, so identical configs replay identically.
    pub fn new(config: &SimulationConfig) -> Self {
        let params = config.sim_params();
        let mut rng = StdRng::seed_from_u64(config.population.seed);

        let size = config.population.size;
        let mut population = Vec::with_capacity(size as usize);
        for i in 0..size {
            let x = rng.random_range(params.margin_width..params.world_width);
            let y = rng.random_range(0.0..params.world_height);
            let status = if i < config.population.initial_infected {
                Status::Infected
            } else {
                Status::Susceptible
            };
            population.push(Agent::new(Vec2::new(x, y), status, params.recovery_time));
        }

        Self {
            params,
            population,
            population_size: size,
            tick: 0.0,
            history: History::new(),
            rng,
        }
    }

    /// Advances the simulation by one tick: a single in-order pass applying,
    /// per agent, (1) the infection check, (2) the recovery/death
    /// resolution, (3) movement, (4) the status tally; then appends one
    /// percentage sample per series and advances the clock. Statuses are
    /// read live during the pass, so an agent infected early in the tick
    /// already acts as a source for later-ordered agents. O(population^2).
    pub fn step(&mut self) {
        let mut counts = StatusCounts::default();

        for i in 0..self.population.len() {
            // Infection check: the first Infected agent found in population
            // order within the infection radius decides this agent's only
            // exposure for the tick, whether or not the trial succeeds.
            if self.population[i].status == Status::Susceptible {
                let pos = self.population[i].position;
                let contact = self.population.iter().any(|a| {
                    a.status == Status::Infected
                        && pos.distance(a.position) < self.params.infection_radius
                });
                if contact && self.rng.random::<f32>() < self.params.infection_probability {
                    let countdown = self.sample_recovery_countdown();
                    self.population[i].infect(countdown);
                }
            }

            if self.population[i].status == Status::Infected {
                self.population[i].update_infection(&self.params, &mut self.rng);
            }

            match self.population[i].status {
                Status::Dead => {}
                Status::Susceptible => {
                    let nearest = self.nearest_infected(self.population[i].position);
                    self.population[i].advance(nearest, &self.params, &mut self.rng);
                }
                _ => self.population[i].advance(None, &self.params, &mut self.rng),
            }

            counts.tally(self.population[i].status);
        }

        self.record(counts);
        self.tick += self.params.dt;
    }

    /// Appends a new agent at the given coordinates, forced Infected with a
    /// full default countdown. Coordinates are accepted as-is; the boundary
    /// correction fixes out-of-range placements on the next movement step.
    pub fn spawn_infected(&mut self, x: f32, y: f32) {
        self.population
            .push(Agent::new(Vec2::new(x, y), Status::Infected, self.params.recovery_time));
    }

    /// Updates one named parameter, applying its clamp. Takes effect on the
    /// next tick; already-sampled countdowns are not rescaled.
    pub fn set_parameter(&mut self, name: &str, value: f32) -> Result<(), ParameterError> {
        match name {
            "step_length" => self.params.step_length = value,
            "infection_radius" => self.params.infection_radius = value.max(1.0),
            "infection_probability" => self.params.infection_probability = value.max(0.0),
            "recovery_time" => self.params.recovery_time = value.max(1.0),
            "recovery_time_variance" => self.params.recovery_time_variance = value.max(1.0),
            "recovery_probability" => self.params.recovery_probability = value.max(0.0),
            // "avoidance_radius_multiplier" is the upstream name for the same
            // value; it was always compared against a distance, never used as
            // a multiplier, so both keys drive one parameter.
            "avoidance_radius" | "avoidance_radius_multiplier" => {
                self.params.avoidance_radius = value.max(0.0)
            }
            _ => return Err(ParameterError::Unknown(name.to_string())),
        }
        debug!("Parameter '{}' set to {}", name, value);
        Ok(())
    }

    pub fn agents(&self) -> &[Agent] {
        &self.population
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    /// Elapsed simulated time.
    pub fn tick(&self) -> f32 {
        self.tick
    }

    /// The fixed percentage denominator (initial population size).
    pub fn population_size(&self) -> u32 {
        self.population_size
    }

    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for agent in &self.population {
            counts.tally(agent.status);
        }
        counts
    }

    pub fn infected_count(&self) -> u32 {
        self.counts().infected
    }

    /// Position and distance of the closest Infected agent, if any.
    fn nearest_infected(&self, pos: Vec2) -> Option<(Vec2, f32)> {
        self.population
            .iter()
            .filter(|a| a.status == Status::Infected)
            .map(|a| (a.position, pos.distance(a.position)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
    }

    /// Uniform draw from [max(0, recovery_time - variance), recovery_time +
    /// variance]. A degenerate interval (variance <= 0) yields exactly the
    /// mean without consuming a draw.
    fn sample_recovery_countdown(&mut self) -> f32 {
        let lo = (self.params.recovery_time - self.params.recovery_time_variance).max(0.0);
        let hi = self.params.recovery_time + self.params.recovery_time_variance;
        if hi > lo {
            self.rng.random_range(lo..hi)
        } else {
            self.params.recovery_time
        }
    }

    fn record(&mut self, counts: StatusCounts) {
        if self.population_size == 0 {
            self.history.push(0.0, 0.0, 0.0, 0.0);
            return;
        }
        let denom = self.population_size as f32;
        self.history.push(
            counts.susceptible as f32 * 100.0 / denom,
            counts.infected as f32 * 100.0 / denom,
            counts.recovered as f32 * 100.0 / denom,
            counts.dead as f32 * 100.0 / denom,
        );
    }
}
