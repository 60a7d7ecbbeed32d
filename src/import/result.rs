//! Outcome of an import attempt

use serde::{Deserialize, Serialize};

use crate::export::EntityCounts;

/// What an import did
///
/// Expected failures (unreadable file, malformed JSON, rejected payload,
/// failed write) come back as `success: false` rather than as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub success: bool,
    pub message: String,
    pub imported: EntityCounts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    /// Set only when restoring the pre-import snapshot also failed
    #[serde(default)]
    pub data_loss_risk: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollback_error: Option<String>,
}

impl ImportResult {
    pub fn succeeded(imported: EntityCounts) -> Self {
        Self {
            success: true,
            message: "Data imported successfully!".to_string(),
            imported,
            errors: None,
            data_loss_risk: false,
            rollback_error: None,
        }
    }

    pub fn failed(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            imported: EntityCounts::default(),
            errors: Some(errors),
            data_loss_risk: false,
            rollback_error: None,
        }
    }

    /// A failure whose message is also its only error
    pub fn failed_with(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::failed(message.clone(), vec![message])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let ok = serde_json::to_value(ImportResult::succeeded(EntityCounts::default())).unwrap();
        assert_eq!(ok["success"], true);
        assert_eq!(ok["dataLossRisk"], false);
        assert!(ok.get("errors").is_none());
        assert!(ok.get("rollbackError").is_none());
        assert_eq!(ok["imported"]["transactions"], 0);

        let failed = serde_json::to_value(ImportResult::failed_with("Failed to read file")).unwrap();
        assert_eq!(failed["errors"][0], "Failed to read file");
    }
}
