//! Patch fields for nullable columns: an absent key leaves the column alone,
//! `null` clears it and a value sets it.
//!
//! ```ignore
//! #[serde(default, deserialize_with = "common::utils::nullable::deserialize")]
//! pub ph: Option<Option<f64>>,
//! ```

use serde::{Deserialize, Deserializer};

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "super::deserialize")]
        ph: Option<Option<f64>>,
    }

    #[test]
    fn absent_null_and_value_are_distinct() -> Result<(), serde_json::Error> {
        let absent: Patch = serde_json::from_str("{}")?;
        assert_eq!(absent.ph, None);
        let cleared: Patch = serde_json::from_str(r#"{"ph": null}"#)?;
        assert_eq!(cleared.ph, Some(None));
        let set: Patch = serde_json::from_str(r#"{"ph": 7.2}"#)?;
        assert_eq!(set.ph, Some(Some(7.2)));
        Ok(())
    }
}
