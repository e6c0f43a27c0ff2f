use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::product::Product;
use crate::processing::canonical::canonical_name_of;
use crate::processing::similarity::sorted_tokens;

/// What to do when two catalog products share a canonical name.
///
/// Every collision is logged regardless of the policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// The later product replaces the earlier one under the shared key.
    #[default]
    LastWriteWins,
    /// The first product keeps the key; later ones are unreachable.
    FirstWriteWins,
    /// Abort index construction.
    Reject,
}

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("catalog products #{first} and #{second} share the canonical name '{key}'")]
    Collision {
        key: String,
        first: usize,
        second: usize,
    },
}

#[derive(Debug)]
pub(crate) struct IndexEntry {
    pub(crate) key: String,
    pub(crate) tokens: Vec<char>,
    pub(crate) position: usize,
}

/// Lookup from canonical name to a product's position in the catalog slice
/// it was built from.
///
/// Keys keep the order in which they were first seen; a replaced product
/// takes over the existing slot.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    entries: Vec<IndexEntry>,
    slots: HashMap<String, usize>,
    collisions: usize,
}

impl CatalogIndex {
    /// Catalog position of the product indexed under `key`.
    pub fn get(&self, key: &str) -> Option<usize> {
        self.slots.get(key).map(|&slot| self.entries[slot].position)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of products that collided with an already indexed name.
    pub fn collisions(&self) -> usize {
        self.collisions
    }

    pub(crate) fn entry(&self, key: &str) -> Option<&IndexEntry> {
        self.slots.get(key).map(|&slot| &self.entries[slot])
    }

    pub(crate) fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }
}

/// Indexes `products` by canonical name, skipping products without one.
///
/// Names are read as they are; run
/// [`normalize_names_in_place`](crate::processing::normalize::normalize_names_in_place)
/// first when stored names should be cleaned up as well.
pub fn build_index(
    products: &[Product],
    policy: CollisionPolicy,
) -> Result<CatalogIndex, IndexError> {
    let mut index = CatalogIndex::default();

    for (position, product) in products.iter().enumerate() {
        let key = canonical_name_of(product.name());
        if key.is_empty() {
            log::debug!("Catalog product #{position} has no usable name; not indexed");
            continue;
        }

        if let Some(&slot) = index.slots.get(&key) {
            let first = index.entries[slot].position;
            index.collisions += 1;
            match policy {
                CollisionPolicy::LastWriteWins => {
                    log::warn!(
                        "Catalog products #{first} and #{position} share canonical name '{key}'; keeping #{position}"
                    );
                    index.entries[slot].position = position;
                }
                CollisionPolicy::FirstWriteWins => {
                    log::warn!(
                        "Catalog products #{first} and #{position} share canonical name '{key}'; keeping #{first}"
                    );
                }
                CollisionPolicy::Reject => {
                    return Err(IndexError::Collision {
                        key,
                        first,
                        second: position,
                    });
                }
            }
            continue;
        }

        log::debug!("Indexed catalog product #{position} as '{key}'");
        index.slots.insert(key.clone(), index.entries.len());
        index.entries.push(IndexEntry {
            tokens: sorted_tokens(&key),
            key,
            position,
        });
    }

    log::info!(
        "Built catalog index with {} entries ({} collisions)",
        index.len(),
        index.collisions
    );
    Ok(index)
}
