//! Minimal account registration, session-less login and enquiry capture.
//!
//! Passwords are bcrypt-hashed on the blocking pool; nothing here issues tokens.

use crate::store::AccountStore;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

pub const DEFAULT_BCRYPT_COST: u32 = 14;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
}

/// Public view of a user returned by register/login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

impl From<&UserRecord> for UserProfile {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.user_id.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEnquiry {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub product_id: String,
    pub product_name: String,
    pub product_category: String,
}

#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{0}")]
    MissingFields(&'static str),

    #[error("You are already registered with this email.")]
    AlreadyRegistered,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Failed to process password")]
    Hashing,

    #[error("store error: {0}")]
    Store(#[source] anyhow::Error),
}

/// `user_` followed by 32 lowercase hex characters.
pub fn generate_user_id() -> String {
    format!("user_{}", uuid::Uuid::new_v4().simple())
}

pub async fn hash_password(password: String, cost: u32) -> Result<String, AccountError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|_| AccountError::Hashing)?
        .map_err(|e| {
            error!(error = %e, "password hashing failed");
            AccountError::Hashing
        })
}

pub async fn verify_password(password: String, hash: String) -> bool {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .unwrap_or(false)
}

pub async fn register(
    store: &dyn AccountStore,
    registration: Registration,
    cost: u32,
) -> Result<UserRecord, AccountError> {
    if registration.email.is_empty() || registration.password.is_empty() {
        return Err(AccountError::MissingFields("Email and password are required"));
    }

    // a failed lookup falls through; the insert's unique email constraint decides
    match store.find_user_by_email(&registration.email).await {
        Ok(Some(_)) => return Err(AccountError::AlreadyRegistered),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "existing-user lookup failed; attempting insert"),
    }

    let password_hash = hash_password(registration.password, cost).await?;
    let user = UserRecord {
        user_id: generate_user_id(),
        full_name: registration.full_name,
        email: registration.email,
        phone: registration.phone,
        password_hash,
    };
    store.insert_user(&user).await.map_err(|e| {
        error!(error = %e, "failed to create user");
        AccountError::Store(e)
    })?;
    Ok(user)
}

pub async fn login(
    store: &dyn AccountStore,
    email: &str,
    password: &str,
) -> Result<UserRecord, AccountError> {
    if email.is_empty() || password.is_empty() {
        return Err(AccountError::MissingFields("Email and password are required"));
    }

    let user = match store.find_user_by_email(email).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(AccountError::InvalidCredentials),
        Err(e) => {
            warn!(error = %e, "user lookup failed during login");
            return Err(AccountError::InvalidCredentials);
        }
    };

    if verify_password(password.to_string(), user.password_hash.clone()).await {
        Ok(user)
    } else {
        Err(AccountError::InvalidCredentials)
    }
}

pub async fn submit_enquiry(
    store: &dyn AccountStore,
    enquiry: NewEnquiry,
) -> Result<(), AccountError> {
    if enquiry.name.is_empty() || enquiry.email.is_empty() || enquiry.message.is_empty() {
        return Err(AccountError::MissingFields(
            "Name, email and message are required",
        ));
    }
    store.insert_enquiry(&enquiry).await.map_err(|e| {
        error!(error = %e, "failed to save enquiry");
        AccountError::Store(e)
    })
}
