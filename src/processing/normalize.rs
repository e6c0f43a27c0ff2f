use serde_json::Value;

use crate::domain::document::CatalogDocument;
use crate::domain::product::Product;
use crate::processing::canonical::normalize_whitespace;

/// Rewrites a string name to its whitespace-normalized form.
///
/// Returns `true` when the stored value changed.
pub fn normalize_name_in_place(name: &mut Value) -> bool {
    let Value::String(text) = name else {
        return false;
    };
    let normalized = normalize_whitespace(text);
    if normalized == *text {
        return false;
    }
    *text = normalized;
    true
}

/// Normalizes the stored name of every product and returns how many changed.
pub fn normalize_names_in_place(products: &mut [Product]) -> usize {
    let mut changed = 0;
    for product in products.iter_mut() {
        if let Some(name) = product.name.as_mut()
            && normalize_name_in_place(name)
        {
            log::debug!("Normalized product name to {name}");
            changed += 1;
        }
    }
    changed
}

/// Normalizes every product name in a catalog document.
///
/// Returns the rewritten document with the number of changed names.
pub fn normalize_catalog(catalog: CatalogDocument) -> (CatalogDocument, usize) {
    let (mut products, layout) = catalog.into_parts();
    let changed = normalize_names_in_place(&mut products);
    log::info!(
        "Normalized {changed} of {} product names",
        products.len()
    );
    (CatalogDocument::from_parts(products, layout), changed)
}
