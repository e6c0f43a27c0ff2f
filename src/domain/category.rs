use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::present;

/// Storefront category identifier.
///
/// Exports mix integer and string ids for the same taxonomy, so both forms are
/// accepted and written back exactly as they were read. Anything else (`null`,
/// floats) is carried along untouched in [`CategoryId::Other`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryId {
    Int(i64),
    Text(String),
    Other(Value),
}

impl CategoryId {
    /// Textual form of the id, identical for `2` and `"2"`.
    pub fn as_key(&self) -> String {
        match self {
            CategoryId::Int(value) => value.to_string(),
            CategoryId::Text(value) => value.trim().to_string(),
            CategoryId::Other(value) => value.to_string(),
        }
    }

    /// Whether the id carries no usable value (`0`, an empty string or `null`).
    pub fn is_blank(&self) -> bool {
        match self {
            CategoryId::Int(value) => *value == 0,
            CategoryId::Text(value) => value.trim().is_empty(),
            CategoryId::Other(value) => value.is_null(),
        }
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryId::Int(value) => write!(f, "{value}"),
            CategoryId::Text(value) => write!(f, "{value}"),
            CategoryId::Other(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for CategoryId {
    fn from(value: i64) -> Self {
        CategoryId::Int(value)
    }
}

impl From<&str> for CategoryId {
    fn from(value: &str) -> Self {
        CategoryId::Text(value.to_string())
    }
}

/// A `{id, name, slug}` taxonomy node attached to a product.
///
/// Catalog exports are not always complete, so each part of the triple may be
/// absent or `null`; both are written back as found.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub id: Option<CategoryId>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub slug: Option<Value>,
    /// Fields beyond the triple, kept so catalog rewrites stay lossless.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CategoryRef {
    pub fn new(id: impl Into<CategoryId>, name: &str, slug: &str) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(Value::from(name)),
            slug: Some(Value::from(slug)),
            extra: Map::new(),
        }
    }

    pub fn name_str(&self) -> Option<&str> {
        self.name.as_ref().and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{CategoryId, CategoryRef};

    #[test]
    fn ids_keep_their_json_type() {
        let numeric: CategoryId = serde_json::from_str("12").expect("numeric id");
        let textual: CategoryId = serde_json::from_str("\"12\"").expect("textual id");

        assert_eq!(numeric, CategoryId::Int(12));
        assert_eq!(textual, CategoryId::Text("12".to_string()));
        assert_eq!(numeric.as_key(), textual.as_key());
        assert_eq!(serde_json::to_string(&numeric).expect("serialize"), "12");
    }

    #[test]
    fn zero_and_empty_ids_are_blank() {
        assert!(CategoryId::Int(0).is_blank());
        assert!(CategoryId::from("  ").is_blank());
        assert!(!CategoryId::Int(7).is_blank());
    }

    #[test]
    fn unknown_category_fields_survive_a_round_trip() {
        let raw = r#"{"id":3,"name":"Drills","slug":"drills","parent":1}"#;
        let category: CategoryRef = serde_json::from_str(raw).expect("category");

        assert_eq!(category.extra.get("parent"), Some(&json!(1)));
        let back = serde_json::to_value(&category).expect("serialize");
        assert_eq!(back["parent"], 1);
    }

    #[test]
    fn incomplete_categories_are_written_back_as_read() {
        let raws = [
            json!({"id": 4}),
            json!({"id": null, "name": null, "slug": "bez-nazvu"}),
            json!({"id": 2.5, "name": "Drôty"}),
            json!({"name": "Bez ID", "slug": "bez-id"}),
        ];
        for raw in raws {
            let category: CategoryRef = serde_json::from_value(raw.clone()).expect("category");
            assert_eq!(serde_json::to_value(&category).expect("serialize"), raw);
        }
    }

    #[test]
    fn unusual_ids_are_kept_and_blank_when_null() {
        let null_id: CategoryId = serde_json::from_value(json!(null)).expect("null id");
        let float_id: CategoryId = serde_json::from_value(json!(2.5)).expect("float id");

        assert_eq!(null_id, CategoryId::Other(json!(null)));
        assert!(null_id.is_blank());
        assert_eq!(float_id.as_key(), "2.5");
        assert!(!float_id.is_blank());
    }
}
