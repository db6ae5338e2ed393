// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every problem found in one piece of user input, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server answered {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status { status: u16, message: Option<String> },
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("no signed-in user")]
    NotAuthenticated,
    #[error("remote service is not available")]
    Offline,
    #[error("local storage write failed: {0:#}")]
    Storage(anyhow::Error),
    #[error(transparent)]
    Remote(#[from] ApiError),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Rejected(String),
    #[error("could not reach the server: {0}")]
    Unreachable(ApiError),
    #[error("invalid response from the server")]
    InvalidResponse,
    #[error("remote service is not configured")]
    NotConfigured,
    #[error("failed to persist the session: {0:#}")]
    Storage(anyhow::Error),
}

impl From<ApiError> for AuthError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Status { message, status } => AuthError::Rejected(
                message.unwrap_or_else(|| format!("request rejected with status {}", status)),
            ),
            ApiError::InvalidResponse(_) => AuthError::InvalidResponse,
            other => AuthError::Unreachable(other),
        }
    }
}
