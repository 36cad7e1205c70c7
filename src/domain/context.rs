//! Operation Context
//!
//! Contains metadata about the current operation for authorization and tracing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context for an operation, built by the auth middleware from the resolved
/// principal and carried into the lifecycle manager.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationContext {
    /// Authenticated caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_user_id: Option<Uuid>,

    /// Correlation ID for request tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

impl OperationContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create context with request user ID
    pub fn with_request_user(mut self, user_id: Uuid) -> Self {
        self.request_user_id = Some(user_id);
        self
    }

    /// Create context with correlation ID
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// The caller's id, if one was resolved and it is not the nil UUID
    pub fn principal(&self) -> Option<Uuid> {
        self.request_user_id.filter(|id| !id.is_nil())
    }

    /// Generate a new correlation ID if not present
    pub fn ensure_correlation_id(&mut self) -> &str {
        self.correlation_id
            .get_or_insert_with(|| Uuid::new_v4().to_string())
    }
}
