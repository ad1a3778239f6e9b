//! Murphy - technical-analysis signal engine for OHLCV bar series

pub mod config;
pub mod error;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use config::{Config, EngineConfig};
pub use error::{EngineError, Result};
pub use services::{format_signal_message, DeliveryPolicy, SignalEngine, SignalStore};
pub use types::*;
