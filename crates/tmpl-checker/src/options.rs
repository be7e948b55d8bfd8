//! Checker configuration.

use serde::{Deserialize, Serialize};

/// Toggles for optional checks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckerOptions {
    /// Report event handlers that reference a method without calling it.
    pub check_event_callable: bool,
    /// Report reads of non-public members.
    pub report_private_members: bool,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self {
            check_event_callable: true,
            report_private_members: true,
        }
    }
}
