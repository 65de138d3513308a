mod config;
mod error;
mod job_controller;
mod registry;
mod services;
mod state;
mod store;
#[cfg(test)]
mod test_support;

use crate::config::{AppConfig, DEFAULT_SESSION_SECRET};
use crate::job_controller::state::{start_job_updater, JobsState};
use crate::registry::{ReminderRegistry, ViewedRegistry};
use crate::services::auth::accounts::seed_admin;
use crate::state::AppState;
use crate::store::{SqliteKv, SqliteStore};
use actix_web::{middleware, web, App, HttpServer};
use env_logger::Env;
use log::{info, warn};
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::load().map_err(io::Error::other)?;
    if config.session_secret == DEFAULT_SESSION_SECRET {
        warn!("Using the built-in session secret; set LEADBOARD_SESSION_SECRET in production");
    }

    let store = SqliteStore::open(&config.database_path).map_err(io::Error::other)?;
    seed_admin(&store, config.admin.as_ref()).map_err(|e| io::Error::other(e.to_string()))?;
    let kv = Arc::new(SqliteKv::new(&config.database_path));

    let reminders = ReminderRegistry::new(kv.clone());
    match reminders.restore().await {
        Ok(count) => info!("Restored {} pending reminder(s)", count),
        Err(e) => warn!("Could not restore reminders: {}", e),
    }

    let state = AppState {
        store: Arc::new(store),
        reminders,
        viewed: ViewedRegistry::new(kv),
        config: Arc::new(config.clone()),
    };

    // Initialize job controller state
    let (jobs_state, rx) = JobsState::new(100);
    tokio::spawn(start_job_updater(jobs_state.clone(), rx));

    info!(
        "Server running at http://{}:{} (database {})",
        config.host,
        config.port,
        config.database_path.display()
    );

    let json_limit = config.json_limit_bytes;
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::JsonConfig::default().limit(json_limit))
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(jobs_state.clone()))
            .configure(services::configure)
            .default_service(web::route().to(services::not_found))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
