pub mod confirmation;
pub mod format;
pub mod signals;

pub use confirmation::{DeliveryDecision, DeliveryPolicy};
pub use format::{format_price, format_signal_message};
pub use signals::{Analysis, IndicatorTable, PatternDetector, SignalEngine, SignalStore};
