// ABOUTME: DNS-1123 label validation for Kubernetes object names.
// ABOUTME: Used for namespaces and deployment names supplied by configuration.

use std::fmt;
use thiserror::Error;

/// Maximum length of a DNS-1123 label.
pub const MAX_LABEL_LEN: usize = 63;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceNameError {
    #[error("resource name cannot be empty")]
    Empty,

    #[error("resource name {0:?} exceeds maximum length of 63 characters")]
    TooLong(String),

    #[error("resource name {0:?} must start and end with an alphanumeric character")]
    BadBoundary(String),

    #[error("invalid character {1:?} in resource name {0:?}")]
    InvalidChar(String, char),
}

/// A validated Kubernetes object name (lowercase alphanumerics and hyphens).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceName(String);

impl ResourceName {
    pub fn new(value: &str) -> Result<Self, ResourceNameError> {
        if value.is_empty() {
            return Err(ResourceNameError::Empty);
        }

        if value.len() > MAX_LABEL_LEN {
            return Err(ResourceNameError::TooLong(value.to_string()));
        }

        if let Some(c) = value
            .chars()
            .find(|c| !c.is_ascii_lowercase() && !c.is_ascii_digit() && *c != '-')
        {
            return Err(ResourceNameError::InvalidChar(value.to_string(), c));
        }

        if value.starts_with('-') || value.ends_with('-') {
            return Err(ResourceNameError::BadBoundary(value.to_string()));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
