use chrono::Utc;

use crate::error::{DomainError, DomainResult};
use crate::logic::{ensure_user_exists, found, paginate};
use crate::model::{
    is_chronological, Event, EventChanges, Id, ListQuery, NewEvent, Paginated,
};
use crate::schema::event::{EventListParams, END_BEFORE_START};
use crate::schema::Violations;
use crate::store::traits::{EventStore, UserStore};

pub struct EventOperations;

impl EventOperations {
    pub async fn create<S: EventStore + UserStore>(store: &S, event: NewEvent) -> DomainResult<Event> {
        ensure_user_exists(store, event.user_id).await?;
        Ok(store.create_event(event).await?)
    }

    /// `upcoming` is evaluated against the clock at call time.
    pub async fn list<S: EventStore>(
        store: &S,
        query: ListQuery<EventListParams>,
    ) -> DomainResult<Paginated<Event>> {
        let filter = query.filter.into_filter(Utc::now());
        paginate(
            query.page,
            store.list_events(&filter, query.page.into()),
            store.count_events(&filter),
        )
        .await
    }

    pub async fn get<S: EventStore>(store: &S, id: Id) -> DomainResult<Event> {
        found("Event", id, store.get_event(id).await?)
    }

    /// Applies a partial update. The resulting window must still be
    /// chronological once merged with the stored dates.
    pub async fn update<S: EventStore>(
        store: &S,
        id: Id,
        changes: EventChanges,
    ) -> DomainResult<Event> {
        let existing = Self::get(store, id).await?;
        if changes.is_empty() {
            return Ok(existing);
        }

        let start = changes.start_date.unwrap_or(existing.start_date);
        let end = changes.end_date.clone().apply(existing.end_date);
        if !is_chronological(start, end) {
            return Err(Violations::single("endDate", END_BEFORE_START).into());
        }

        found("Event", id, store.update_event(id, changes).await?)
    }

    pub async fn delete<S: EventStore>(store: &S, id: Id) -> DomainResult<Event> {
        let existing = Self::get(store, id).await?;
        if !store.delete_event(id).await? {
            return Err(DomainError::not_found("Event", id));
        }
        Ok(existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::testing::store_with_user;
    use crate::model::{PageRequest, Patch};
    use crate::store::MemoryStore;
    use chrono::Duration;

    async fn create_event(store: &MemoryStore, user_id: Id, title: &str, offset_hours: i64) -> Event {
        let start = Utc::now() + Duration::hours(offset_hours);
        EventOperations::create(
            store,
            NewEvent {
                user_id,
                title: title.to_string(),
                description: None,
                start_date: start,
                end_date: Some(start + Duration::hours(2)),
                location: Some("Lobby".to_string()),
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_upcoming_excludes_past_events() {
        let (store, user) = store_with_user("host").await;
        create_event(&store, user.id, "Yesterday", -24).await;
        create_event(&store, user.id, "Next week", 24 * 7).await;
        create_event(&store, user.id, "Tomorrow", 24).await;

        let upcoming = EventOperations::list(
            &store,
            ListQuery {
                page: PageRequest::default(),
                filter: EventListParams {
                    user_id: None,
                    upcoming: true,
                },
            },
        )
        .await
        .unwrap();
        let titles: Vec<_> = upcoming.items.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Tomorrow", "Next week"]);

        let all = EventOperations::list(&store, ListQuery::default()).await.unwrap();
        assert_eq!(all.pagination.total_items, 3);
        assert_eq!(all.items[0].title, "Yesterday");
    }

    #[tokio::test]
    async fn test_update_rejects_end_before_stored_start() {
        let (store, user) = store_with_user("host").await;
        let event = create_event(&store, user.id, "Raid", 48).await;

        let err = EventOperations::update(
            &store,
            event.id,
            EventChanges {
                end_date: Patch::Value(event.start_date - Duration::hours(1)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        match err {
            DomainError::Validation(violations) => {
                assert_eq!(violations.get("endDate").unwrap().messages, vec![END_BEFORE_START]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_clears_nullable_fields() {
        let (store, user) = store_with_user("host").await;
        let event = create_event(&store, user.id, "Raid", 48).await;

        let updated = EventOperations::update(
            &store,
            event.id,
            EventChanges {
                title: Some("Boss Raid".to_string()),
                location: Patch::Null,
                end_date: Patch::Null,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.title, "Boss Raid");
        assert_eq!(updated.location, None);
        assert_eq!(updated.end_date, None);
        assert_eq!(updated.start_date, event.start_date);
        assert!(updated.updated_at >= event.updated_at);
    }

    #[tokio::test]
    async fn test_delete_missing_event() {
        let (store, _) = store_with_user("host").await;
        assert!(matches!(
            EventOperations::delete(&store, 12).await.unwrap_err(),
            DomainError::TargetNotFound { entity: "Event", .. }
        ));
    }
}
