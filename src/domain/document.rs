//! File-level shapes accepted at the load boundary.
//!
//! Storefront exports and scraper output arrive either as a bare list of
//! records or wrapped in objects with a `products` (or `categories`) key.
//! Everything is resolved into explicit variants here so the matching code
//! only ever sees typed records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::category::{CategoryId, CategoryRef};
use crate::domain::product::{BatchItem, Product};

#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("expected {expected}, found {found}")]
    Unexpected {
        expected: &'static str,
        found: &'static str,
    },
    #[error("object has no `{0}` key")]
    MissingKey(&'static str),
    #[error("no products found")]
    NoProducts,
    #[error(transparent)]
    Record(#[from] serde_json::Error),
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Object wrapping a product list together with arbitrary export metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// A reference catalog file.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CatalogDocument {
    /// `[product, ...]`
    Products(Vec<Product>),
    /// `{"products": [...], ...}`
    Page(CatalogPage),
    /// `[{"products": [...], ...}, ...]`, as written by paginated exports.
    Pages(Vec<CatalogPage>),
}

/// Everything in a [`CatalogDocument`] except its products.
#[derive(Clone, Debug, PartialEq)]
pub enum CatalogLayout {
    Products,
    Page(Map<String, Value>),
    Pages(Vec<(Map<String, Value>, usize)>),
}

impl CatalogDocument {
    pub fn from_value(value: Value) -> Result<Self, ShapeError> {
        match value {
            Value::Object(map) => {
                if !map.get("products").is_some_and(Value::is_array) {
                    return Err(ShapeError::MissingKey("products"));
                }
                Ok(CatalogDocument::Page(serde_json::from_value(Value::Object(
                    map,
                ))?))
            }
            Value::Array(items) => {
                let paged = items
                    .first()
                    .and_then(Value::as_object)
                    .is_some_and(|first| first.get("products").is_some_and(Value::is_array));
                if paged {
                    Ok(CatalogDocument::Pages(serde_json::from_value(
                        Value::Array(items),
                    )?))
                } else {
                    Ok(CatalogDocument::Products(serde_json::from_value(
                        Value::Array(items),
                    )?))
                }
            }
            other => Err(ShapeError::Unexpected {
                expected: "a list or an object with `products`",
                found: kind(&other),
            }),
        }
    }

    pub fn product_count(&self) -> usize {
        match self {
            CatalogDocument::Products(products) => products.len(),
            CatalogDocument::Page(page) => page.products.len(),
            CatalogDocument::Pages(pages) => pages.iter().map(|page| page.products.len()).sum(),
        }
    }

    /// Splits the document into one flat product list and its envelope.
    pub fn into_parts(self) -> (Vec<Product>, CatalogLayout) {
        match self {
            CatalogDocument::Products(products) => (products, CatalogLayout::Products),
            CatalogDocument::Page(page) => (page.products, CatalogLayout::Page(page.rest)),
            CatalogDocument::Pages(pages) => {
                let mut products = Vec::new();
                let mut layout = Vec::with_capacity(pages.len());
                for page in pages {
                    layout.push((page.rest, page.products.len()));
                    products.extend(page.products);
                }
                (products, CatalogLayout::Pages(layout))
            }
        }
    }

    /// Reverses [`CatalogDocument::into_parts`].
    ///
    /// Products are handed back to pages in order; `products` must hold as
    /// many entries as the layout recorded.
    pub fn from_parts(products: Vec<Product>, layout: CatalogLayout) -> Self {
        match layout {
            CatalogLayout::Products => CatalogDocument::Products(products),
            CatalogLayout::Page(rest) => CatalogDocument::Page(CatalogPage { products, rest }),
            CatalogLayout::Pages(layout) => {
                let mut products = products.into_iter();
                let pages = layout
                    .into_iter()
                    .map(|(rest, count)| CatalogPage {
                        products: products.by_ref().take(count).collect(),
                        rest,
                    })
                    .collect();
                CatalogDocument::Pages(pages)
            }
        }
    }
}

/// Parses one batch file: a list of items or an object with a non-empty
/// `products` list.
pub fn parse_batch(value: Value) -> Result<Vec<BatchItem>, ShapeError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("products") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(ShapeError::Unexpected {
                    expected: "a `products` list",
                    found: kind(&other),
                });
            }
            None => return Err(ShapeError::MissingKey("products")),
        },
        other => {
            return Err(ShapeError::Unexpected {
                expected: "a list or an object with `products`",
                found: kind(&other),
            });
        }
    };

    if items.is_empty() {
        return Err(ShapeError::NoProducts);
    }

    let total = items.len();
    let mut parsed = Vec::with_capacity(total);
    let mut first_error = None;
    for (idx, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<BatchItem>(item) {
            Ok(item) => parsed.push(item),
            Err(e) => {
                log::warn!("Skipping malformed batch item #{}: {e}", idx + 1);
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) if parsed.is_empty() => Err(ShapeError::Record(e)),
        _ => {
            if parsed.len() < total {
                log::warn!("Kept {} of {total} batch items", parsed.len());
            }
            Ok(parsed)
        }
    }
}

/// Reduces a raw storefront category dump to `{id, name, slug}` triples.
///
/// The dump is an object with a `categories` list, or a list of such objects
/// when it was fetched page by page. Entries lacking any of the three fields
/// are dropped.
pub fn parse_category_dump(value: &Value) -> Result<Vec<CategoryRef>, ShapeError> {
    let fetches: Vec<&Value> = match value {
        Value::Array(fetches) => fetches.iter().collect(),
        Value::Object(_) => vec![value],
        other => {
            return Err(ShapeError::Unexpected {
                expected: "a list or an object with `categories`",
                found: kind(other),
            });
        }
    };

    let mut categories = Vec::new();
    for fetch in fetches {
        let Some(entries) = fetch.get("categories").and_then(Value::as_array) else {
            log::debug!("Category fetch without a `categories` list skipped");
            continue;
        };
        for entry in entries {
            match category_triple(entry) {
                Some(category) => categories.push(category),
                None => log::warn!("Dropping incomplete category entry: {entry}"),
            }
        }
    }

    Ok(categories)
}

fn category_triple(entry: &Value) -> Option<CategoryRef> {
    let id = match entry.get("id")? {
        Value::Number(number) => CategoryId::Int(number.as_i64()?),
        Value::String(text) => CategoryId::Text(text.clone()),
        _ => return None,
    };
    let name = entry.get("name")?.as_str()?;
    let slug = entry.get("slug")?.as_str()?;
    Some(CategoryRef::new(id, name, slug))
}
