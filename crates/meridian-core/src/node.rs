// crates/meridian-core/src/node.rs

use serde::{Deserialize, Serialize};

/// Operator-supplied data attached to a node contract.
///
/// Serialized with camelCase names to match the control daemon's wire
/// format (`ipAddress`, not `ip_address`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    /// Operator name.
    pub name: String,
    /// Operator contact email.
    pub email: String,
    /// Publicly reachable IP address of this machine.
    pub ip_address: String,
    /// Node status flag (e.g., "active").
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_data_serializes_camel_case() {
        let data = NodeData {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            ip_address: "203.0.113.7".to_string(),
            status: "active".to_string(),
        };

        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["ipAddress"], "203.0.113.7");
        assert!(value.get("ip_address").is_none());
    }
}
