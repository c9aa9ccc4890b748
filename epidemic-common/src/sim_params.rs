use serde::{Deserialize, Serialize};

/// Runtime parameters derived from the configuration, read by the engine
/// on every tick. This is also the surface mutated live through
/// `SimulationEngine::set_parameter`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimParams {
    // World
    pub world_width: f32,
    pub world_height: f32,
    /// Left-hand strip reserved for the chart overlay; agents are kept out
    /// of it by the boundary correction.
    pub margin_width: f32,

    // Time
    pub dt: f32,

    // Movement
    pub step_length: f32,
    /// Distance below which a susceptible agent flees its nearest infected
    /// neighbor instead of walking randomly.
    pub avoidance_radius: f32,

    // Disease
    pub infection_radius: f32,
    pub infection_probability: f32,
    /// Mean time spent infected before the recovery/death resolution.
    pub recovery_time: f32,
    /// Half-width of the uniform jitter around `recovery_time`.
    pub recovery_time_variance: f32,
    /// Chance the resolution ends in Recovered rather than Dead.
    pub recovery_probability: f32,
}
