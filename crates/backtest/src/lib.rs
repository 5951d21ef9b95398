pub mod execution;
pub mod session;

pub use execution::{OrderRecord, SimulatedExecutionClient};
pub use session::RotationSession;
