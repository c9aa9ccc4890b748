pub mod agent;
pub mod simulation;

// Re-export the engine surface for external drivers (UIs, sweeps)
pub use agent::{Agent, Status};
pub use simulation::{ParameterError, SimulationEngine, StatusCounts};
