use serde::{Deserialize, Serialize};

use crate::AccountId;

/// One line of the selection report.
///
/// Field order is the serialized key order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub display_name: Option<String>,
    pub commission: u32,
    pub address: String,
    pub account_id: AccountId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_keys() {
        let row = ReportRow {
            display_name: None,
            commission: 10_000_000,
            address: "1abc".to_string(),
            account_id: AccountId::new([0xab; 32]),
        };

        let json = serde_json::to_value(&row).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();

        assert_eq!(json["display_name"], serde_json::Value::Null);
        assert_eq!(keys.len(), 4);
        for key in ["display_name", "commission", "address", "account_id"] {
            assert!(keys.iter().any(|k| k == key), "missing key {key}");
        }
    }
}
