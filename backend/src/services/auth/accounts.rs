//! User accounts kept in the `users` table of the record store.

use super::credentials::{hash_password, new_salt};
use crate::config::AdminSeed;
use crate::error::AppError;
use crate::store::{RecordStore, USERS_TABLE};
use common::model::record::{FieldMap, Record};
use common::model::user::{Role, User};
use common::requests::auth::CreateUserRequest;
use log::info;
use serde_json::{json, Value};

/// A user together with the credential columns that never leave the backend.
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub user: User,
    pub password_hash: String,
    pub password_salt: String,
}

impl StoredUser {
    fn from_record(record: &Record) -> Option<Self> {
        let text = |key: &str| record.fields.get(key).and_then(Value::as_str).map(str::to_string);
        let role = match text("role").as_deref() {
            Some("admin") => Role::Admin,
            _ => Role::User,
        };
        Some(StoredUser {
            user: User {
                id: record.id.clone(),
                email: text("email")?,
                name: text("name").unwrap_or_default(),
                role,
                password_version: record
                    .fields
                    .get("passwordVersion")
                    .and_then(Value::as_u64)
                    .unwrap_or(0) as u32,
            },
            password_hash: text("passwordHash").unwrap_or_default(),
            password_salt: text("passwordSalt").unwrap_or_default(),
        })
    }
}

pub fn list_users(store: &dyn RecordStore) -> Result<Vec<StoredUser>, AppError> {
    Ok(store
        .list(USERS_TABLE)?
        .iter()
        .filter_map(StoredUser::from_record)
        .collect())
}

pub fn find_by_email(store: &dyn RecordStore, email: &str) -> Result<Option<StoredUser>, AppError> {
    let email = email.trim();
    Ok(list_users(store)?
        .into_iter()
        .find(|u| u.user.email.eq_ignore_ascii_case(email)))
}

pub fn find_by_id(store: &dyn RecordStore, id: &str) -> Result<Option<StoredUser>, AppError> {
    match store.get(USERS_TABLE, id) {
        Ok(record) => Ok(StoredUser::from_record(&record)),
        Err(crate::store::StoreError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn create_user(store: &dyn RecordStore, req: &CreateUserRequest) -> Result<User, AppError> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".into()));
    }
    if req.password.len() < 6 {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".into(),
        ));
    }
    if find_by_email(store, &email)?.is_some() {
        return Err(AppError::Validation(format!("User {} already exists", email)));
    }

    let salt = new_salt();
    let role = match req.role {
        Role::Admin => "admin",
        Role::User => "user",
    };
    let fields = json!({
        "email": email,
        "name": req.name.trim(),
        "role": role,
        "passwordSalt": salt,
        "passwordHash": hash_password(&salt, &req.password),
        "passwordVersion": 1,
    });
    let record = store.create(USERS_TABLE, as_fields(fields))?;
    StoredUser::from_record(&record)
        .map(|u| u.user)
        .ok_or_else(|| AppError::Internal("Created user record is incomplete".into()))
}

/// Stores a new password and bumps the version, invalidating old sessions.
pub fn set_password(
    store: &dyn RecordStore,
    current: &StoredUser,
    new_password: &str,
) -> Result<User, AppError> {
    if new_password.len() < 6 {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".into(),
        ));
    }
    let salt = new_salt();
    let fields = json!({
        "passwordSalt": salt,
        "passwordHash": hash_password(&salt, new_password),
        "passwordVersion": current.user.password_version + 1,
    });
    let record = store.update(USERS_TABLE, &current.user.id, as_fields(fields))?;
    StoredUser::from_record(&record)
        .map(|u| u.user)
        .ok_or_else(|| AppError::Internal("Updated user record is incomplete".into()))
}

/// Creates the configured admin when no user exists yet.
pub fn seed_admin(store: &dyn RecordStore, seed: Option<&AdminSeed>) -> Result<(), AppError> {
    let Some(seed) = seed else {
        return Ok(());
    };
    if !list_users(store)?.is_empty() {
        return Ok(());
    }
    let admin = create_user(
        store,
        &CreateUserRequest {
            email: seed.email.clone(),
            name: seed.name.clone(),
            password: seed.password.clone(),
            role: Role::Admin,
        },
    )?;
    info!("Seeded admin account {}", admin.email);
    Ok(())
}

fn as_fields(value: Value) -> FieldMap {
    match value {
        Value::Object(map) => map,
        _ => FieldMap::new(),
    }
}
