use crate::error::{DomainError, DomainResult};
use crate::logic::{ensure_user_exists, found, paginate};
use crate::model::{Id, ListQuery, NewNote, Note, NoteChanges, NoteFilter, Paginated};
use crate::store::traits::{NoteStore, UserStore};

pub struct NoteOperations;

impl NoteOperations {
    pub async fn create<S: NoteStore + UserStore>(store: &S, note: NewNote) -> DomainResult<Note> {
        ensure_user_exists(store, note.user_id).await?;
        Ok(store.create_note(note).await?)
    }

    pub async fn list<S: NoteStore>(
        store: &S,
        query: ListQuery<NoteFilter>,
    ) -> DomainResult<Paginated<Note>> {
        paginate(
            query.page,
            store.list_notes(&query.filter, query.page.into()),
            store.count_notes(&query.filter),
        )
        .await
    }

    pub async fn get<S: NoteStore>(store: &S, id: Id) -> DomainResult<Note> {
        found("Note", id, store.get_note(id).await?)
    }

    pub async fn update<S: NoteStore>(store: &S, id: Id, changes: NoteChanges) -> DomainResult<Note> {
        let existing = Self::get(store, id).await?;
        if changes.is_empty() {
            return Ok(existing);
        }
        found("Note", id, store.update_note(id, changes).await?)
    }

    /// Returns the note as it was before deletion.
    pub async fn delete<S: NoteStore>(store: &S, id: Id) -> DomainResult<Note> {
        let existing = Self::get(store, id).await?;
        if !store.delete_note(id).await? {
            return Err(DomainError::not_found("Note", id));
        }
        Ok(existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::testing::store_with_user;
    use crate::model::PageRequest;

    #[tokio::test]
    async fn test_create_note_for_existing_user() {
        let (store, user) = store_with_user("writer").await;
        let note = NoteOperations::create(
            &store,
            NewNote {
                content: "hello".to_string(),
                user_id: user.id,
            },
        )
        .await
        .unwrap();
        assert_eq!(note.user_id, user.id);
        assert_eq!(note.user.username, "writer");
        assert_eq!(NoteOperations::get(&store, note.id).await.unwrap(), note);
    }

    #[tokio::test]
    async fn test_create_note_for_unknown_user() {
        let (store, _) = store_with_user("writer").await;
        let err = NoteOperations::create(
            &store,
            NewNote {
                content: "hello".to_string(),
                user_id: 999999,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            DomainError::ReferencedEntityNotFound { entity: "User", id: 999999 }
        ));
        let page = NoteOperations::list(&store, ListQuery::default()).await.unwrap();
        assert_eq!(page.pagination.total_items, 0);
    }

    #[tokio::test]
    async fn test_list_notes_pages() {
        let (store, user) = store_with_user("writer").await;
        for i in 0..12 {
            NoteOperations::create(
                &store,
                NewNote {
                    content: format!("note {}", i),
                    user_id: user.id,
                },
            )
            .await
            .unwrap();
        }
        let page = NoteOperations::list(
            &store,
            ListQuery {
                page: PageRequest::new(2, 5),
                filter: NoteFilter::default(),
            },
        )
        .await
        .unwrap();
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.pagination.total_items, 12);
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.pagination.current_page, 2);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_note() {
        let (store, _) = store_with_user("writer").await;
        let err = NoteOperations::update(
            &store,
            7,
            NoteChanges {
                content: Some("x".to_string()),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DomainError::TargetNotFound { entity: "Note", .. }));
        assert!(matches!(
            NoteOperations::delete(&store, 7).await.unwrap_err(),
            DomainError::TargetNotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_delete_returns_snapshot() {
        let (store, user) = store_with_user("writer").await;
        let note = NoteOperations::create(
            &store,
            NewNote {
                content: "bye".to_string(),
                user_id: user.id,
            },
        )
        .await
        .unwrap();
        let deleted = NoteOperations::delete(&store, note.id).await.unwrap();
        assert_eq!(deleted, note);
        assert!(NoteOperations::get(&store, note.id).await.is_err());
    }
}
