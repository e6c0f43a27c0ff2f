use serde::Deserialize;
use thiserror::Error;

use crate::domain::category::{CategoryId, CategoryRef};
use crate::domain::product::BatchItem;

/// How category ids are compared when checking for duplicates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdComparison {
    /// `2` and `"2"` are the same category.
    #[default]
    Stringified,
    /// Ids must also agree on their JSON type.
    Strict,
}

impl IdComparison {
    pub fn same(self, a: &CategoryId, b: &CategoryId) -> bool {
        match self {
            IdComparison::Stringified => a.as_key() == b.as_key(),
            IdComparison::Strict => a == b,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoryError {
    #[error("missing category field `{0}`")]
    MissingField(&'static str),
}

/// Builds the category a batch item asks to merge, requiring all of id, name
/// and slug to be present and non-blank.
pub fn candidate_category(item: &BatchItem) -> Result<CategoryRef, CategoryError> {
    let id = item
        .category_id
        .as_ref()
        .filter(|id| !id.is_blank())
        .ok_or(CategoryError::MissingField("category_id"))?;
    let name = non_blank(item.category_name.as_deref())
        .ok_or(CategoryError::MissingField("category_name"))?;
    let slug = non_blank(item.category_slug.as_deref())
        .ok_or(CategoryError::MissingField("category_slug"))?;

    Ok(CategoryRef::new(id.clone(), name, slug))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

pub fn contains_category(
    existing: &[CategoryRef],
    id: &CategoryId,
    comparison: IdComparison,
) -> bool {
    existing.iter().any(|category| {
        category
            .id
            .as_ref()
            .is_some_and(|existing_id| comparison.same(existing_id, id))
    })
}

/// Whether `existing` already holds a category with the id of `category`.
///
/// A category without an id is never considered present.
pub fn has_category(
    existing: &[CategoryRef],
    category: &CategoryRef,
    comparison: IdComparison,
) -> bool {
    category
        .id
        .as_ref()
        .is_some_and(|id| contains_category(existing, id, comparison))
}

/// Returns `existing` with `new_category` appended unless a category with the
/// same id is already present. Existing entries are never touched or
/// reordered.
pub fn merge_category(
    existing: &[CategoryRef],
    new_category: &CategoryRef,
    comparison: IdComparison,
) -> Vec<CategoryRef> {
    let mut combined = existing.to_vec();
    if has_category(existing, new_category, comparison) {
        log::debug!(
            "Category {:?} already present; skipping addition",
            new_category.id
        );
    } else {
        combined.push(new_category.clone());
    }
    combined
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{CategoryError, IdComparison, candidate_category, merge_category};
    use crate::domain::category::{CategoryId, CategoryRef};
    use crate::domain::product::BatchItem;

    fn laptops() -> CategoryRef {
        CategoryRef::new(1, "Laptops", "laptops")
    }

    fn gaming() -> CategoryRef {
        CategoryRef::new(2, "Gaming", "gaming")
    }

    #[test]
    fn merge_appends_after_existing_categories() {
        let merged = merge_category(&[laptops()], &gaming(), IdComparison::Stringified);

        assert_eq!(merged, vec![laptops(), gaming()]);
    }

    #[test]
    fn merging_twice_keeps_a_single_entry() {
        let once = merge_category(&[laptops()], &gaming(), IdComparison::Stringified);
        let twice = merge_category(&once, &gaming(), IdComparison::Stringified);

        assert_eq!(twice, once);
        assert_eq!(
            twice
                .iter()
                .filter(|c| c.id == Some(CategoryId::Int(2)))
                .count(),
            1
        );
    }

    #[test]
    fn stringified_ids_match_across_types() {
        let textual = CategoryRef::new("2", "Gaming", "gaming");

        let stringified = merge_category(&[gaming()], &textual, IdComparison::Stringified);
        let strict = merge_category(&[gaming()], &textual, IdComparison::Strict);

        assert_eq!(stringified.len(), 1);
        assert_eq!(strict.len(), 2);
    }

    #[test]
    fn categories_without_ids_stay_untouched() {
        let partial: CategoryRef =
            serde_json::from_value(json!({"name": "Bez ID"})).expect("category");
        let null_id: CategoryRef =
            serde_json::from_value(json!({"id": null, "slug": "nic"})).expect("category");
        let existing = vec![partial, null_id];

        let merged = merge_category(&existing, &gaming(), IdComparison::Stringified);

        assert_eq!(merged.len(), 3);
        assert_eq!(merged[..2], existing[..]);
        assert_eq!(merged[2], gaming());
    }

    #[test]
    fn candidate_requires_every_field() {
        let mut item = BatchItem {
            category_id: Some(CategoryId::Int(2)),
            category_name: Some("Gaming".to_string()),
            category_slug: Some("gaming".to_string()),
            ..Default::default()
        };
        assert_eq!(candidate_category(&item), Ok(gaming()));

        item.category_slug = Some(" ".to_string());
        assert_eq!(
            candidate_category(&item),
            Err(CategoryError::MissingField("category_slug"))
        );

        item.category_id = Some(CategoryId::Int(0));
        assert_eq!(
            candidate_category(&item),
            Err(CategoryError::MissingField("category_id"))
        );
    }
}
