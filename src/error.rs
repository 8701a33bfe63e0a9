use std::fmt;
use thiserror::Error;

use crate::model::Id;
use crate::schema::Violations;

/// How the caller addressed a resource that turned out not to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetKey {
    Id(Id),
    Username(String),
}

impl fmt::Display for TargetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKey::Id(id) => write!(f, "ID {}", id),
            TargetKey::Username(username) => write!(f, "username '{}'", username),
        }
    }
}

/// Failures a use-case can report. The API layer maps each variant to one
/// HTTP status and error name.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed")]
    Validation(Violations),

    /// A foreign key supplied in the payload does not resolve.
    #[error("{entity} with ID {id} not found")]
    ReferencedEntityNotFound { entity: &'static str, id: Id },

    /// The resource addressed by the path does not exist.
    #[error("{entity} with {key} not found")]
    TargetNotFound { entity: &'static str, key: TargetKey },

    #[error("store failure: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: Id) -> Self {
        DomainError::TargetNotFound {
            entity,
            key: TargetKey::Id(id),
        }
    }

    pub fn referenced(entity: &'static str, id: Id) -> Self {
        DomainError::ReferencedEntityNotFound { entity, id }
    }
}

impl From<Violations> for DomainError {
    fn from(violations: Violations) -> Self {
        DomainError::Validation(violations)
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_entity() {
        assert_eq!(
            DomainError::referenced("User", 999999).to_string(),
            "User with ID 999999 not found"
        );
        assert_eq!(DomainError::not_found("Pet", 4).to_string(), "Pet with ID 4 not found");
        let by_name = DomainError::TargetNotFound {
            entity: "User",
            key: TargetKey::Username("ghost".to_string()),
        };
        assert_eq!(by_name.to_string(), "User with username 'ghost' not found");
    }

    #[test]
    fn test_store_errors_convert() {
        let err: DomainError = anyhow::anyhow!("connection refused").into();
        assert!(matches!(err, DomainError::Store(_)));
    }
}
