//! Fixtures for handler tests: a throwaway database with one admin and one
//! agent, plus the full route configuration.

use crate::config::AppConfig;
use crate::job_controller::state::{start_job_updater, JobsState};
use crate::registry::{ReminderRegistry, ViewedRegistry};
use crate::services::auth::accounts::create_user;
use crate::services::auth::session::session_cookie;
use crate::state::AppState;
use crate::store::{SqliteKv, SqliteStore};
use actix_web::cookie::Cookie;
use common::model::user::{Role, User};
use common::requests::auth::CreateUserRequest;
use std::sync::Arc;
use tempfile::TempDir;

pub const ADMIN_PASSWORD: &str = "admin-pass";
pub const AGENT_PASSWORD: &str = "agent-pass";

pub struct TestApp {
    _dir: TempDir,
    pub state: AppState,
    pub jobs: JobsState,
    pub admin: User,
    pub agent: User,
}

impl TestApp {
    /// Must be called inside a runtime; spawns the job updater.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leadboard.sqlite");
        let store = SqliteStore::open(&path).unwrap();
        let kv = Arc::new(SqliteKv::new(&path));

        let account = |email: &str, password: &str, role: Role| {
            create_user(
                &store,
                &CreateUserRequest {
                    email: email.into(),
                    name: email.split('@').next().unwrap_or_default().into(),
                    password: password.into(),
                    role,
                },
            )
            .unwrap()
        };
        let admin = account("admin@school.in", ADMIN_PASSWORD, Role::Admin);
        let agent = account("agent@school.in", AGENT_PASSWORD, Role::User);

        let state = AppState {
            store: Arc::new(store),
            reminders: ReminderRegistry::new(kv.clone()),
            viewed: ViewedRegistry::new(kv),
            config: Arc::new(AppConfig::default()),
        };
        let (jobs, rx) = JobsState::new(16);
        tokio::spawn(start_job_updater(jobs.clone(), rx));

        TestApp {
            _dir: dir,
            state,
            jobs,
            admin,
            agent,
        }
    }

    pub fn cookie(&self, user: &User) -> Cookie<'static> {
        session_cookie(&self.state, user)
    }
}

/// Builds the service under test with every scope mounted.
macro_rules! init_app {
    ($app:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($app.state.clone()))
                .app_data(actix_web::web::Data::new($app.jobs.clone()))
                .configure(crate::services::configure)
                .default_service(actix_web::web::route().to(crate::services::not_found)),
        )
        .await
    };
}

pub(crate) use init_app;
