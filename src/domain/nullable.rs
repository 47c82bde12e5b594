// Serde helper for wire fields that may arrive as JSON null
use serde::{Deserialize, Deserializer};

/// Decode a field, treating an explicit `null` like a missing key.
///
/// Pair with `#[serde(default)]` so absent keys land on the same value.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
