use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Represents optional field semantics in PUT/PATCH requests.
///
/// - `Unchanged` → field absent from the request body
/// - `SetToNull` → field sent as `null`
/// - `SetToValue` → field sent with a value
///
/// Fields of this type must carry `#[serde(default)]` so an absent key
/// deserializes to `Unchanged`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OptionField<T> {
    #[default]
    Unchanged,
    SetToNull,
    SetToValue(T),
}

impl<'de, T> Deserialize<'de> for OptionField<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => OptionField::SetToValue(value),
            None => OptionField::SetToNull,
        })
    }
}

impl<T: Serialize> Serialize for OptionField<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            OptionField::SetToValue(value) => serializer.serialize_some(value),
            _ => serializer.serialize_none(),
        }
    }
}

impl<T> OptionField<T> {
    /// True when `Unchanged`.
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// Borrowed flatten for references
    pub fn flatten_ref(&self) -> Option<&T> {
        match self {
            OptionField::SetToValue(v) => Some(v),
            _ => None
        }
    }

    /// Applies the change to an existing optional value.
    pub fn apply_to(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Unchanged => current,
            Self::SetToNull => None,
            Self::SetToValue(v) => Some(v),
        }
    }
}

impl OptionField<String> {
    pub fn flatten_str(&self) -> Option<&str> {
        self.flatten_ref().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default)]
        badge: OptionField<String>,
    }

    #[test]
    fn absent_null_and_value_are_distinguished() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"badge": null}"#).unwrap();
        let value: Patch = serde_json::from_str(r#"{"badge": "Best Seller"}"#).unwrap();

        assert!(absent.badge.is_unchanged());
        assert_eq!(null.badge, OptionField::SetToNull);
        assert_eq!(value.badge.flatten_str(), Some("Best Seller"));
    }

    #[test]
    fn apply_to_keeps_current_when_unchanged() {
        let current = Some("New".to_string());
        assert_eq!(OptionField::Unchanged.apply_to(current.clone()), current);
        assert_eq!(OptionField::<String>::SetToNull.apply_to(current), None);
    }
}
