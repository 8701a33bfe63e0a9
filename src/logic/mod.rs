//! Use-cases, one operations type per resource.
//!
//! Inputs arrive already validated by [`crate::schema`]; what is left here is
//! the existence-check gate, pagination and the few rules that need stored
//! state to evaluate.

use std::future::Future;

pub mod event;
pub mod feedback;
pub mod note;
pub mod pet;
pub mod status;
pub mod user;

pub use event::EventOperations;
pub use feedback::FeedbackOperations;
pub use note::NoteOperations;
pub use pet::PetOperations;
pub use status::StatusOperations;
pub use user::UserOperations;

use crate::error::{DomainError, DomainResult};
use crate::model::{Id, PageRequest, Paginated, User};
use crate::store::traits::UserStore;

/// Resolve a caller-supplied user reference or fail with
/// [`DomainError::ReferencedEntityNotFound`].
pub(crate) async fn ensure_user_exists<S: UserStore>(store: &S, user_id: Id) -> DomainResult<User> {
    store
        .get_user(user_id)
        .await?
        .ok_or_else(|| DomainError::referenced("User", user_id))
}

/// Turn a missing row addressed by path id into [`DomainError::TargetNotFound`].
pub(crate) fn found<T>(entity: &'static str, id: Id, row: Option<T>) -> DomainResult<T> {
    row.ok_or_else(|| DomainError::not_found(entity, id))
}

/// Run the page query and the count query concurrently and assemble the page.
pub(crate) async fn paginate<T, I, C>(page: PageRequest, items: I, total: C) -> DomainResult<Paginated<T>>
where
    I: Future<Output = anyhow::Result<Vec<T>>>,
    C: Future<Output = anyhow::Result<u64>>,
{
    let (items, total) = tokio::try_join!(items, total)?;
    Ok(Paginated::new(items, page, total))
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::model::{NewUser, User};
    use crate::store::{MemoryStore, UserStore};

    pub async fn store_with_user(username: &str) -> (MemoryStore, User) {
        let store = MemoryStore::new();
        let user = store
            .create_user(NewUser {
                username: username.to_string(),
            })
            .await
            .unwrap();
        (store, user)
    }
}
