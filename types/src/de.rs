//! Serde helpers for lenient LCD decoding.

use serde::{Deserialize, Deserializer};

/// Treat an explicit JSON `null` the same as a missing field.
///
/// Use together with `#[serde(default)]`.
pub fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "null_default")]
        name: String,
    }

    #[test]
    fn null_and_missing_become_default() {
        let a: Holder = serde_json::from_str(r#"{"name": null}"#).unwrap();
        let b: Holder = serde_json::from_str("{}").unwrap();
        let c: Holder = serde_json::from_str(r#"{"name": "x"}"#).unwrap();
        assert_eq!(a.name, "");
        assert_eq!(b.name, "");
        assert_eq!(c.name, "x");
    }
}
