use crate::config::AppConfig;
use crate::registry::{ReminderRegistry, ViewedRegistry};
use crate::store::RecordStore;
use std::sync::Arc;

/// Shared application state, injected into handlers as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub reminders: ReminderRegistry,
    pub viewed: ViewedRegistry,
    pub config: Arc<AppConfig>,
}
