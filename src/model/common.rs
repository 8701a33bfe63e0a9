use serde::{Deserialize, Serialize};

/// Auto-assigned integer primary key shared by every entity.
pub type Id = i32;

/// Minimal projection of a user embedded in child entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Id,
    pub username: String,
}

/// Tri-state value for partial updates.
///
/// `Unset` leaves the stored value alone, `Null` clears a nullable column and
/// `Value` overwrites it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Unset,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Unset
    }
}

impl<T> Patch<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Patch::Unset)
    }

    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Patch::Unset => Patch::Unset,
            Patch::Null => Patch::Null,
            Patch::Value(value) => Patch::Value(value),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Patch<U> {
        match self {
            Patch::Unset => Patch::Unset,
            Patch::Null => Patch::Null,
            Patch::Value(value) => Patch::Value(f(value)),
        }
    }

    /// Resolve the patch against the currently stored value.
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Patch::Unset => current,
            Patch::Null => None,
            Patch::Value(value) => Some(value),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_apply_distinguishes_unset_and_null() {
        assert_eq!(Patch::<i32>::Unset.apply(Some(3)), Some(3));
        assert_eq!(Patch::<i32>::Null.apply(Some(3)), None);
        assert_eq!(Patch::Value(7).apply(Some(3)), Some(7));
        assert_eq!(Patch::Value(7).apply(None), Some(7));
    }

    #[test]
    fn test_patch_map_keeps_state() {
        assert_eq!(Patch::Value(2).map(|v| v * 10), Patch::Value(20));
        assert!(Patch::<i32>::Unset.map(|v| v * 10).is_unset());
        assert_eq!(Patch::<i32>::Null.map(|v| v * 10), Patch::Null);
    }
}
