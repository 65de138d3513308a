//! Request payloads shared by the API and its clients.

pub mod auth;
pub mod leads;
pub mod schools;
