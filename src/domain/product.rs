use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::category::{CategoryId, CategoryRef};
use crate::domain::present;

static NO_NAME: Value = Value::Null;

/// A reference catalog entry.
///
/// `name` stays a raw JSON value because exports occasionally carry `null` or
/// numbers there; such products simply never match. Absent and `null` fields
/// are told apart so a rewritten catalog matches its input.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub categories: Option<Option<Vec<CategoryRef>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    pub fn named(name: impl Into<Value>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// The stored name, `null` when the field is missing.
    pub fn name(&self) -> &Value {
        self.name.as_ref().unwrap_or(&NO_NAME)
    }

    pub fn display_name(&self) -> Option<&str> {
        self.name().as_str()
    }

    pub fn categories(&self) -> &[CategoryRef] {
        self.categories
            .as_ref()
            .and_then(Option::as_deref)
            .unwrap_or_default()
    }

    pub fn set_categories(&mut self, categories: Vec<CategoryRef>) {
        self.categories = Some(Some(categories));
    }
}

/// A scraped record carrying one candidate category for its catalog match.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub category_slug: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Manual-review record for a batch item with no catalog match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedItem {
    pub name: Value,
    pub slug: Option<String>,
    pub category_id: Option<CategoryId>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
}

impl From<&BatchItem> for UnmatchedItem {
    fn from(item: &BatchItem) -> Self {
        Self {
            name: item.name.clone(),
            slug: item.slug.clone(),
            category_id: item.category_id.clone(),
            category_name: item.category_name.clone(),
            category_slug: item.category_slug.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::Product;
    use crate::domain::category::CategoryRef;

    #[test]
    fn null_and_missing_fields_are_told_apart() {
        let raws = [
            json!({"name": null, "sku": "A"}),
            json!({"name": "B", "categories": null}),
            json!({"sku": "D"}),
        ];
        for raw in raws {
            let product: Product = serde_json::from_value(raw.clone()).expect("product");
            assert_eq!(serde_json::to_value(&product).expect("serialize"), raw);
        }
    }

    #[test]
    fn null_categories_read_as_empty_and_can_be_replaced() {
        let mut product: Product =
            serde_json::from_value(json!({"name": "B", "categories": null})).expect("product");

        assert!(product.categories().is_empty());
        product.set_categories(vec![CategoryRef::new(1, "Ploty", "ploty")]);
        assert_eq!(
            serde_json::to_value(&product).expect("serialize")["categories"],
            json!([{"id": 1, "name": "Ploty", "slug": "ploty"}])
        );
    }

    #[test]
    fn missing_name_reads_as_null() {
        let product = Product::default();
        assert!(product.name().is_null());
        assert_eq!(product.display_name(), None);
        assert_eq!(Product::named("Hák").display_name(), Some("Hák"));
    }
}
