//! Shared model and pure lead pipeline for the leadboard service.
//!
//! Everything in this crate is synchronous and free of I/O so that the same
//! code paths can back the HTTP listing, the exports and the analytics view.

pub mod jobs;
pub mod model;
pub mod pipeline;
pub mod requests;
