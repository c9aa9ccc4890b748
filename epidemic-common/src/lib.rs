pub mod config;
pub mod history;
pub mod sim_params;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::{
    DiseaseConfig, MovementConfig, OutputConfig, PopulationConfig, SimulationConfig, TimingConfig,
    WorldConfig,
};
pub use history::History;
pub use sim_params::SimParams;
pub use vecmath::{angle_to_vec, vec_to_angle, Vec2};
