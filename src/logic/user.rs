use crate::error::{DomainError, DomainResult, TargetKey};
use crate::logic::paginate;
use crate::model::{
    ListQuery, NewUser, NoteFilter, Paginated, PetFilter, StatusFilter, User, UserCounts,
    UserDetails, UserFilter, UserWithCounts, Window,
};
use crate::store::traits::{NoteStore, PetStore, StatusStore, UserStore};

pub struct UserOperations;

impl UserOperations {
    pub async fn list<S: UserStore>(
        store: &S,
        query: ListQuery<UserFilter>,
    ) -> DomainResult<Paginated<UserWithCounts>> {
        paginate(
            query.page,
            store.list_users(&query.filter, query.page.into()),
            store.count_users(&query.filter),
        )
        .await
    }

    /// Returns the user with this username, creating it first when missing.
    /// The flag is `true` when the user was created by this call.
    pub async fn update_or_create<S: UserStore>(store: &S, user: NewUser) -> DomainResult<(User, bool)> {
        if let Some(existing) = store.get_user_by_username(&user.username).await? {
            return Ok((existing, false));
        }

        let username = user.username.clone();
        match store.create_user(user).await {
            Ok(created) => Ok((created, true)),
            Err(err) => {
                // a concurrent request may have inserted the same username
                match store.get_user_by_username(&username).await? {
                    Some(existing) => Ok((existing, false)),
                    None => Err(err.into()),
                }
            }
        }
    }

    /// The user with its notes and statuses (newest first) and pets (by name).
    pub async fn details<S: UserStore + NoteStore + StatusStore + PetStore>(
        store: &S,
        username: &str,
    ) -> DomainResult<UserDetails> {
        let user = store
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| DomainError::TargetNotFound {
                entity: "User",
                key: TargetKey::Username(username.to_string()),
            })?;

        let note_filter = NoteFilter {
            user_id: Some(user.id),
            search: None,
        };
        let status_filter = StatusFilter {
            user_id: Some(user.id),
        };
        let pet_filter = PetFilter {
            owner_id: Some(user.id),
            ..Default::default()
        };
        let (notes, statuses, pets) = tokio::try_join!(
            store.list_notes(&note_filter, Window::ALL),
            store.list_statuses(&status_filter, Window::ALL),
            store.list_pets(&pet_filter, Window::ALL),
        )?;

        let counts = UserCounts {
            notes: notes.len() as u64,
            statuses: statuses.len() as u64,
            pets: pets.len() as u64,
        };
        Ok(UserDetails {
            user,
            notes,
            statuses,
            pets,
            counts,
        })
    }
}
