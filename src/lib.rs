pub mod autopilot;
pub mod constants;
pub mod engine;
pub mod log;
pub mod maze;
pub mod pathfinding;
pub mod pickups;
pub mod rng;
pub mod server_protocol;
pub mod session;
pub mod types;
