use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::users::{ChangePasswordEntity, RegisterUserEntity},
    value_objects::validation::{ValidationError, require_non_empty},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserModel {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterUserModel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("username", &self.username)?;
        require_non_empty("password", &self.password)?;
        if !self.email.contains('@') {
            return Err(ValidationError("email must be a valid address".to_string()));
        }
        Ok(())
    }

    pub fn to_entity(&self, password_hash: String) -> RegisterUserEntity {
        let now = Utc::now();
        RegisterUserEntity {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginModel {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordModel {
    pub username: String,
    pub new_password: String,
}

impl ChangePasswordModel {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("new_password", &self.new_password)
    }

    pub fn to_entity(&self, password_hash: String) -> ChangePasswordEntity {
        ChangePasswordEntity {
            password_hash,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessTokenModel {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl AccessTokenModel {
    pub fn bearer(access_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            expires_in,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageModel {
    pub message: String,
}

impl MessageModel {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
