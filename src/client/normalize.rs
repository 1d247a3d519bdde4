//! Response shapes folded into one table-consumable result.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What a table widget consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    pub data: Vec<Value>,
    pub success: bool,
    pub total: usize,
}

impl TableData {
    pub fn failure() -> Self {
        Self {
            data: Vec::new(),
            success: false,
            total: 0,
        }
    }
}

/// `data` of a list response: a bare array, or an object holding the items
/// under `items` or a domain-named key next to `total`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListPayload {
    Bare(Vec<Value>),
    Keyed(Map<String, Value>),
}

impl ListPayload {
    /// `None` when an object carries no array at all.
    pub fn into_table(self) -> Option<TableData> {
        match self {
            ListPayload::Bare(items) => Some(TableData {
                total: items.len(),
                data: items,
                success: true,
            }),
            ListPayload::Keyed(mut object) => {
                let total = object
                    .get("total")
                    .and_then(Value::as_u64)
                    .map_or(0, |t| t as usize);

                let key = if matches!(object.get("items"), Some(Value::Array(_))) {
                    Some("items".to_string())
                } else {
                    object
                        .iter()
                        .find(|(_, v)| v.is_array())
                        .map(|(k, _)| k.clone())
                };

                match key.and_then(|k| object.remove(&k)) {
                    Some(Value::Array(items)) => Some(TableData {
                        data: items,
                        success: true,
                        total,
                    }),
                    _ => None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn table(value: Value) -> Option<TableData> {
        serde_json::from_value::<ListPayload>(value).ok()?.into_table()
    }

    #[test]
    fn test_bare_array_counts_itself() {
        let data = table(json!([{"id": 1}, {"id": 2}])).unwrap();
        assert_eq!(data.total, 2);
        assert!(data.success);
    }

    #[test]
    fn test_items_shape_uses_reported_total() {
        let data = table(json!({"total": 14, "items": [{"id": 1}]})).unwrap();
        assert_eq!(data.total, 14);
        assert_eq!(data.data, vec![json!({"id": 1})]);
    }

    #[test]
    fn test_domain_key_shape() {
        let data = table(json!({"total": 3, "coaches": [{"id": 3}]})).unwrap();
        assert_eq!(data.total, 3);
        assert_eq!(data.data.len(), 1);
    }

    #[test]
    fn test_missing_total_is_zero() {
        let data = table(json!({"memberships": []})).unwrap();
        assert_eq!(data, TableData { data: vec![], success: true, total: 0 });
    }

    #[test]
    fn test_object_without_array_is_rejected() {
        assert_eq!(table(json!({"total": 1, "system_name": "Gym"})), None);
        assert_eq!(table(json!("nope")), None);
    }
}
