pub mod config;
pub mod error;
pub mod events;
pub mod traits;

pub use config::{OptionsEntryConfig, RotationConfig};
pub use error::EngineError;
pub use events::{MarketTick, OrderKind, OrderUpdate};
pub use traits::ExecutionClient;
