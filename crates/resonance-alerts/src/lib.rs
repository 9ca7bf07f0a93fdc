//! Alert delivery for the resonance engine.
//!
//! The [`AlertDispatcher`] owns the cooldown cache and decides whether a
//! candidate alert is sent. Notifiers only deliver.

mod cache;
mod dispatcher;
mod format;
mod log_notifier;
mod telegram;

pub use cache::AlertCache;
pub use dispatcher::{AlertDispatcher, DispatchOutcome};
pub use format::format_message;
pub use log_notifier::LogNotifier;
pub use telegram::{TelegramNotifier, DEFAULT_TELEGRAM_URL};
