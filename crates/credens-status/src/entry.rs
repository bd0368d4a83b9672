//! Credential-side status reference: which list, which bit, what the bit
//! means. Embedded in a credential at issuance and dereferenced during
//! verification.

use serde::{Deserialize, Serialize};

use crate::list::StatusPurpose;

/// A pointer from a credential into a status list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusListEntry {
    /// Identifier of the status list holding this credential's bit.
    #[serde(rename = "statusListCredential")]
    pub list_id: String,

    /// Zero-based bit index within the list.
    #[serde(rename = "statusListIndex")]
    pub index: usize,

    /// What a set bit means for this credential.
    pub status_purpose: StatusPurpose,
}

impl StatusListEntry {
    /// Create an entry pointing at `index` in the named list.
    pub fn new(list_id: impl Into<String>, index: usize, purpose: StatusPurpose) -> Self {
        Self {
            list_id: list_id.into(),
            index,
            status_purpose: purpose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_standard_field_names() {
        let entry = StatusListEntry::new("https://lists.example/1", 94567, StatusPurpose::Revocation);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["statusListCredential"], "https://lists.example/1");
        assert_eq!(json["statusListIndex"], 94567);
        assert_eq!(json["statusPurpose"], "revocation");
    }

    #[test]
    fn deserializes_suspension_entry() {
        let entry: StatusListEntry = serde_json::from_value(serde_json::json!({
            "statusListCredential": "list-7",
            "statusListIndex": 3,
            "statusPurpose": "suspension"
        }))
        .unwrap();
        assert_eq!(entry.index, 3);
        assert_eq!(entry.status_purpose, StatusPurpose::Suspension);
    }
}
