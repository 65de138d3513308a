pub mod analytics;
pub mod filter;
pub mod lead;
pub mod record;
pub mod reminder;
pub mod school;
pub mod user;
