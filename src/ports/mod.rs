//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the generator core and an
//! external system (disk, simulation service). Implementations live in
//! `src/adapters/`.

pub mod filesystem;
pub mod simulation;

pub use filesystem::FileSystem;
pub use simulation::{SimulationFuture, SimulationService, SubmitResponse};
