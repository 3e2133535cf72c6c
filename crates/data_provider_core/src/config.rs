//! Provider behavior configuration.
//!
//! # Invariants
//! - `Default` keeps the permissive behavior: later registrations replace the
//!   earlier callback and tables are delivered without validation.

use serde::{Deserialize, Serialize};

/// What happens when a callback is registered while another one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationPolicy {
    /// The new callback replaces the active one.
    #[default]
    Replace,
    /// The new callback is refused while one is active.
    RejectDuplicate,
}

/// Settings for one `DataProvider` instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataProviderConfig {
    pub registration_policy: RegistrationPolicy,
    /// Runs `DataTable::validate` before a table is handed to the consumer.
    pub validate_on_select: bool,
}

impl DataProviderConfig {
    pub fn with_registration_policy(mut self, policy: RegistrationPolicy) -> Self {
        self.registration_policy = policy;
        self
    }

    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_on_select = enabled;
        self
    }
}
