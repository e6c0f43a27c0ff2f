pub mod category;
pub mod document;
pub mod product;

use serde::{Deserialize, Deserializer};

/// Deserializes a field that was present in the input, `null` included.
///
/// Paired with `#[serde(default)]` an absent key stays `None` while an
/// explicit `null` becomes `Some(null)`, so records are written back exactly
/// as they were read.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
