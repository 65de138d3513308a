//! Long-lived client-facing registries backed by the `LocalStore` port.

mod reminders;
mod viewed;

pub use reminders::ReminderRegistry;
pub use viewed::ViewedRegistry;
