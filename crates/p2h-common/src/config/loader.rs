use serde::Deserialize;

/// Deserialize a number where zero stands for "unset".
pub fn deserialize_non_zero<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: num_traits::Zero + serde::Deserialize<'de>,
{
    let value = T::deserialize(deserializer)?;
    if value.is_zero() {
        Ok(None)
    } else {
        Ok(Some(value))
    }
}

pub fn serialize_non_zero<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    T: num_traits::Zero + serde::Serialize,
{
    match value {
        Some(v) => v.serialize(serializer),
        None => T::zero().serialize(serializer),
    }
}
