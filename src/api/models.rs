// API request/response models (DTOs)

use crate::accounts::{NewEnquiry, Registration, UserProfile};
use serde::{Deserialize, Serialize};

/// `/api/search` query string. Missing parameters read as empty.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Self {
            full_name: req.full_name,
            email: req.email,
            phone: req.phone,
            password: req.password,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnquiryRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub product_id: String,
    pub product_name: String,
    pub product_category: String,
}

impl From<EnquiryRequest> for NewEnquiry {
    fn from(req: EnquiryRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            phone: req.phone,
            message: req.message,
            product_id: req.product_id,
            product_name: req.product_name,
            product_category: req.product_category,
        }
    }
}

/// Body of register/login/enquiry responses.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

impl AuthResponse {
    pub fn ok(message: impl Into<String>, user: Option<UserProfile>) -> Self {
        Self {
            success: true,
            message: message.into(),
            user,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            user: None,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub timestamp: String,
}
