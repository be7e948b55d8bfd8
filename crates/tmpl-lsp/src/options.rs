//! Language service configuration.

use serde::{Deserialize, Serialize};

/// Prefix of members that completions never offer.
pub const DEFAULT_HIDDEN_MEMBER_PREFIX: &str = "__";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceOptions {
    /// Members whose name starts with this prefix are left out of
    /// completions. Empty disables the filter.
    pub hidden_member_prefix: String,
    /// Offer protected and private members as well.
    pub include_private: bool,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            hidden_member_prefix: DEFAULT_HIDDEN_MEMBER_PREFIX.to_string(),
            include_private: false,
        }
    }
}

impl ServiceOptions {
    #[must_use]
    pub fn is_hidden(&self, name: &str) -> bool {
        !self.hidden_member_prefix.is_empty() && name.starts_with(&self.hidden_member_prefix)
    }
}
