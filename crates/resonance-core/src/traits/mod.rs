//! Core traits for the resonance engine.

mod clock;
mod data_source;
mod indicator;
mod notifier;

pub use clock::{Clock, ManualClock, SystemClock};
pub use data_source::DataSource;
pub use indicator::{Indicator, MultiOutputIndicator};
pub use notifier::Notifier;
