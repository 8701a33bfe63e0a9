use crate::error::{DomainError, DomainResult};
use crate::logic::{ensure_user_exists, found, paginate};
use crate::model::{Id, ListQuery, NewStatus, Paginated, Status, StatusChanges, StatusFilter};
use crate::store::traits::{StatusStore, UserStore};

pub struct StatusOperations;

impl StatusOperations {
    pub async fn create<S: StatusStore + UserStore>(
        store: &S,
        status: NewStatus,
    ) -> DomainResult<Status> {
        ensure_user_exists(store, status.user_id).await?;
        Ok(store.create_status(status).await?)
    }

    pub async fn list<S: StatusStore>(
        store: &S,
        query: ListQuery<StatusFilter>,
    ) -> DomainResult<Paginated<Status>> {
        paginate(
            query.page,
            store.list_statuses(&query.filter, query.page.into()),
            store.count_statuses(&query.filter),
        )
        .await
    }

    pub async fn get<S: StatusStore>(store: &S, id: Id) -> DomainResult<Status> {
        found("Status", id, store.get_status(id).await?)
    }

    pub async fn update<S: StatusStore>(
        store: &S,
        id: Id,
        changes: StatusChanges,
    ) -> DomainResult<Status> {
        let existing = Self::get(store, id).await?;
        if changes.is_empty() {
            return Ok(existing);
        }
        found("Status", id, store.update_status(id, changes).await?)
    }

    pub async fn delete<S: StatusStore>(store: &S, id: Id) -> DomainResult<Status> {
        let existing = Self::get(store, id).await?;
        if !store.delete_status(id).await? {
            return Err(DomainError::not_found("Status", id));
        }
        Ok(existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::testing::store_with_user;
    use crate::model::Patch;

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let (store, user) = store_with_user("poster").await;
        let status = StatusOperations::create(
            &store,
            NewStatus {
                user_id: user.id,
                description: "Just hatched a dragon".to_string(),
                image_url: Some("https://cdn.example.com/dragon.png".to_string()),
            },
        )
        .await
        .unwrap();

        let updated = StatusOperations::update(
            &store,
            status.id,
            StatusChanges {
                description: Some("Dragon grew up".to_string()),
                image_url: Patch::Unset,
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.description, "Dragon grew up");
        assert_eq!(updated.image_url, status.image_url);
        assert_eq!(updated.created_at, status.created_at);
    }

    #[tokio::test]
    async fn test_filter_by_user() {
        let (store, user) = store_with_user("poster").await;
        StatusOperations::create(
            &store,
            NewStatus {
                user_id: user.id,
                description: "one".to_string(),
                image_url: None,
            },
        )
        .await
        .unwrap();
        let other = ListQuery {
            filter: StatusFilter {
                user_id: Some(user.id + 100),
            },
            ..Default::default()
        };
        let page = StatusOperations::list(&store, other).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total_pages, 0);
    }

    #[tokio::test]
    async fn test_create_for_unknown_user() {
        let (store, _) = store_with_user("poster").await;
        let err = StatusOperations::create(
            &store,
            NewStatus {
                user_id: 404,
                description: "ghost".to_string(),
                image_url: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "User with ID 404 not found");
    }
}
