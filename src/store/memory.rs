use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use itertools::Itertools;
use parking_lot::RwLock;
use std::cmp::Reverse;

use crate::model::{
    Event, EventChanges, EventFilter, Feedback, FeedbackFilter, FeedbackType, Id, NewEvent,
    NewFeedback, NewNote, NewPet, NewStatus, NewUser, Note, NoteChanges, NoteFilter, Pet,
    PetChanges, PetFilter, Status, StatusChanges, StatusFilter, User, UserCounts, UserFilter,
    UserSummary, UserWithCounts, Window,
};
use crate::store::traits::{
    EventStore, FeedbackStore, NoteStore, PetStore, StatusStore, Store, UserStore,
};

#[derive(Debug, Clone)]
struct NoteRow {
    id: Id,
    content: String,
    user_id: Id,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct StatusRow {
    id: Id,
    user_id: Id,
    description: String,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct PetRow {
    id: Id,
    pet_name: String,
    rarity: String,
    owner_id: Id,
}

#[derive(Debug, Clone)]
struct FeedbackRow {
    id: Id,
    user_id: Id,
    kind: FeedbackType,
    message: String,
    rating: Option<i32>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct EventRow {
    id: Id,
    user_id: Id,
    title: String,
    description: Option<String>,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    location: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    last_id: Id,
    users: Vec<User>,
    notes: Vec<NoteRow>,
    statuses: Vec<StatusRow>,
    pets: Vec<PetRow>,
    feedback: Vec<FeedbackRow>,
    events: Vec<EventRow>,
}

impl Tables {
    /// One sequence shared by every table; ids only need to be unique per table.
    fn next_id(&mut self) -> Result<Id> {
        self.last_id = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| anyhow!("id sequence exhausted"))?;
        Ok(self.last_id)
    }

    fn summary(&self, user_id: Id) -> Result<UserSummary> {
        self.users
            .iter()
            .find(|user| user.id == user_id)
            .map(|user| UserSummary {
                id: user.id,
                username: user.username.clone(),
            })
            .ok_or_else(|| anyhow!("row references missing user {}", user_id))
    }

    fn ensure_user(&self, user_id: Id) -> Result<()> {
        self.summary(user_id).map(|_| ())
    }

    fn counts(&self, user_id: Id) -> UserCounts {
        UserCounts {
            notes: self.notes.iter().filter(|n| n.user_id == user_id).count() as u64,
            statuses: self.statuses.iter().filter(|s| s.user_id == user_id).count() as u64,
            pets: self.pets.iter().filter(|p| p.owner_id == user_id).count() as u64,
        }
    }

    fn note(&self, row: &NoteRow) -> Result<Note> {
        Ok(Note {
            id: row.id,
            content: row.content.clone(),
            user_id: row.user_id,
            created_at: row.created_at,
            user: self.summary(row.user_id)?,
        })
    }

    fn status(&self, row: &StatusRow) -> Result<Status> {
        Ok(Status {
            id: row.id,
            user_id: row.user_id,
            description: row.description.clone(),
            image_url: row.image_url.clone(),
            created_at: row.created_at,
            user: self.summary(row.user_id)?,
        })
    }

    fn pet(&self, row: &PetRow) -> Result<Pet> {
        Ok(Pet {
            id: row.id,
            pet_name: row.pet_name.clone(),
            rarity: row.rarity.clone(),
            owner_id: row.owner_id,
            owner: self.summary(row.owner_id)?,
        })
    }

    fn feedback(&self, row: &FeedbackRow) -> Result<Feedback> {
        Ok(Feedback {
            id: row.id,
            user_id: row.user_id,
            kind: row.kind,
            message: row.message.clone(),
            rating: row.rating,
            created_at: row.created_at,
            user: self.summary(row.user_id)?,
        })
    }

    fn event(&self, row: &EventRow) -> Result<Event> {
        Ok(Event {
            id: row.id,
            user_id: row.user_id,
            title: row.title.clone(),
            description: row.description.clone(),
            start_date: row.start_date,
            end_date: row.end_date,
            location: row.location.clone(),
            created_at: row.created_at,
            updated_at: row.updated_at,
            user: self.summary(row.user_id)?,
        })
    }
}

/// Case-insensitive substring match, the in-memory counterpart of `ILIKE '%term%'`.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn window<T>(rows: impl Iterator<Item = T>, window: Window) -> Vec<T> {
    let skipped = rows.skip(usize::try_from(window.offset).unwrap_or(usize::MAX));
    match window.limit {
        Some(limit) => skipped
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect(),
        None => skipped.collect(),
    }
}

fn user_matches(filter: &UserFilter, user: &User) -> bool {
    filter
        .search
        .as_deref()
        .map_or(true, |term| contains_ci(&user.username, term))
}

fn note_matches(filter: &NoteFilter, row: &NoteRow) -> bool {
    filter.user_id.map_or(true, |id| row.user_id == id)
        && filter
            .search
            .as_deref()
            .map_or(true, |term| contains_ci(&row.content, term))
}

fn status_matches(filter: &StatusFilter, row: &StatusRow) -> bool {
    filter.user_id.map_or(true, |id| row.user_id == id)
}

fn pet_matches(filter: &PetFilter, row: &PetRow) -> bool {
    filter.owner_id.map_or(true, |id| row.owner_id == id)
        && filter.rarity.as_deref().map_or(true, |r| row.rarity == r)
        && filter
            .search
            .as_deref()
            .map_or(true, |term| contains_ci(&row.pet_name, term))
}

fn feedback_matches(filter: &FeedbackFilter, row: &FeedbackRow) -> bool {
    filter.kind.map_or(true, |kind| row.kind == kind)
        && filter.user_id.map_or(true, |id| row.user_id == id)
}

fn event_matches(filter: &EventFilter, row: &EventRow) -> bool {
    filter.user_id.map_or(true, |id| row.user_id == id)
        && filter
            .starts_at_or_after
            .map_or(true, |from| row.start_date >= from)
}

/// Process-local store used by tests and by `database.backend = "memory"`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryStore {
    async fn get_user(&self, id: Id) -> Result<Option<User>> {
        let tables = self.tables.read();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read();
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn list_users(&self, filter: &UserFilter, win: Window) -> Result<Vec<UserWithCounts>> {
        let tables = self.tables.read();
        let users = tables
            .users
            .iter()
            .filter(|u| user_matches(filter, u))
            .sorted_by_key(|u| Reverse((u.created_at, u.id)));
        Ok(window(users, win)
            .into_iter()
            .map(|user| UserWithCounts {
                counts: tables.counts(user.id),
                user: user.clone(),
            })
            .collect())
    }

    async fn count_users(&self, filter: &UserFilter) -> Result<u64> {
        let tables = self.tables.read();
        Ok(tables.users.iter().filter(|u| user_matches(filter, u)).count() as u64)
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.write();
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(anyhow!("username '{}' is already taken", user.username));
        }
        let user = User {
            id: tables.next_id()?,
            username: user.username,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait::async_trait]
impl NoteStore for MemoryStore {
    async fn get_note(&self, id: Id) -> Result<Option<Note>> {
        let tables = self.tables.read();
        tables
            .notes
            .iter()
            .find(|n| n.id == id)
            .map(|row| tables.note(row))
            .transpose()
    }

    async fn list_notes(&self, filter: &NoteFilter, win: Window) -> Result<Vec<Note>> {
        let tables = self.tables.read();
        let rows = tables
            .notes
            .iter()
            .filter(|n| note_matches(filter, n))
            .sorted_by_key(|n| Reverse((n.created_at, n.id)));
        window(rows, win).into_iter().map(|row| tables.note(row)).collect()
    }

    async fn count_notes(&self, filter: &NoteFilter) -> Result<u64> {
        let tables = self.tables.read();
        Ok(tables.notes.iter().filter(|n| note_matches(filter, n)).count() as u64)
    }

    async fn create_note(&self, note: NewNote) -> Result<Note> {
        let mut tables = self.tables.write();
        tables.ensure_user(note.user_id)?;
        let row = NoteRow {
            id: tables.next_id()?,
            content: note.content,
            user_id: note.user_id,
            created_at: Utc::now(),
        };
        tables.notes.push(row.clone());
        tables.note(&row)
    }

    async fn update_note(&self, id: Id, changes: NoteChanges) -> Result<Option<Note>> {
        let mut tables = self.tables.write();
        let Some(row) = tables.notes.iter_mut().find(|n| n.id == id) else {
            return Ok(None);
        };
        if let Some(content) = changes.content {
            row.content = content;
        }
        let row = row.clone();
        tables.note(&row).map(Some)
    }

    async fn delete_note(&self, id: Id) -> Result<bool> {
        let mut tables = self.tables.write();
        let before = tables.notes.len();
        tables.notes.retain(|n| n.id != id);
        Ok(tables.notes.len() < before)
    }
}

#[async_trait::async_trait]
impl StatusStore for MemoryStore {
    async fn get_status(&self, id: Id) -> Result<Option<Status>> {
        let tables = self.tables.read();
        tables
            .statuses
            .iter()
            .find(|s| s.id == id)
            .map(|row| tables.status(row))
            .transpose()
    }

    async fn list_statuses(&self, filter: &StatusFilter, win: Window) -> Result<Vec<Status>> {
        let tables = self.tables.read();
        let rows = tables
            .statuses
            .iter()
            .filter(|s| status_matches(filter, s))
            .sorted_by_key(|s| Reverse((s.created_at, s.id)));
        window(rows, win).into_iter().map(|row| tables.status(row)).collect()
    }

    async fn count_statuses(&self, filter: &StatusFilter) -> Result<u64> {
        let tables = self.tables.read();
        Ok(tables.statuses.iter().filter(|s| status_matches(filter, s)).count() as u64)
    }

    async fn create_status(&self, status: NewStatus) -> Result<Status> {
        let mut tables = self.tables.write();
        tables.ensure_user(status.user_id)?;
        let row = StatusRow {
            id: tables.next_id()?,
            user_id: status.user_id,
            description: status.description,
            image_url: status.image_url,
            created_at: Utc::now(),
        };
        tables.statuses.push(row.clone());
        tables.status(&row)
    }

    async fn update_status(&self, id: Id, changes: StatusChanges) -> Result<Option<Status>> {
        let mut tables = self.tables.write();
        let Some(row) = tables.statuses.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        if let Some(description) = changes.description {
            row.description = description;
        }
        row.image_url = changes.image_url.apply(row.image_url.take());
        let row = row.clone();
        tables.status(&row).map(Some)
    }

    async fn delete_status(&self, id: Id) -> Result<bool> {
        let mut tables = self.tables.write();
        let before = tables.statuses.len();
        tables.statuses.retain(|s| s.id != id);
        Ok(tables.statuses.len() < before)
    }
}

#[async_trait::async_trait]
impl PetStore for MemoryStore {
    async fn get_pet(&self, id: Id) -> Result<Option<Pet>> {
        let tables = self.tables.read();
        tables
            .pets
            .iter()
            .find(|p| p.id == id)
            .map(|row| tables.pet(row))
            .transpose()
    }

    async fn list_pets(&self, filter: &PetFilter, win: Window) -> Result<Vec<Pet>> {
        let tables = self.tables.read();
        let rows = tables
            .pets
            .iter()
            .filter(|p| pet_matches(filter, p))
            .sorted_by(|a, b| a.pet_name.cmp(&b.pet_name).then(a.id.cmp(&b.id)));
        window(rows, win).into_iter().map(|row| tables.pet(row)).collect()
    }

    async fn count_pets(&self, filter: &PetFilter) -> Result<u64> {
        let tables = self.tables.read();
        Ok(tables.pets.iter().filter(|p| pet_matches(filter, p)).count() as u64)
    }

    async fn create_pet(&self, pet: NewPet) -> Result<Pet> {
        let mut tables = self.tables.write();
        tables.ensure_user(pet.owner_id)?;
        let row = PetRow {
            id: tables.next_id()?,
            pet_name: pet.pet_name,
            rarity: pet.rarity,
            owner_id: pet.owner_id,
        };
        tables.pets.push(row.clone());
        tables.pet(&row)
    }

    async fn update_pet(&self, id: Id, changes: PetChanges) -> Result<Option<Pet>> {
        let mut tables = self.tables.write();
        let Some(row) = tables.pets.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(pet_name) = changes.pet_name {
            row.pet_name = pet_name;
        }
        if let Some(rarity) = changes.rarity {
            row.rarity = rarity;
        }
        let row = row.clone();
        tables.pet(&row).map(Some)
    }

    async fn delete_pet(&self, id: Id) -> Result<bool> {
        let mut tables = self.tables.write();
        let before = tables.pets.len();
        tables.pets.retain(|p| p.id != id);
        Ok(tables.pets.len() < before)
    }
}

#[async_trait::async_trait]
impl FeedbackStore for MemoryStore {
    async fn get_feedback(&self, id: Id) -> Result<Option<Feedback>> {
        let tables = self.tables.read();
        tables
            .feedback
            .iter()
            .find(|f| f.id == id)
            .map(|row| tables.feedback(row))
            .transpose()
    }

    async fn list_feedback(&self, filter: &FeedbackFilter, win: Window) -> Result<Vec<Feedback>> {
        let tables = self.tables.read();
        let rows = tables
            .feedback
            .iter()
            .filter(|f| feedback_matches(filter, f))
            .sorted_by_key(|f| Reverse((f.created_at, f.id)));
        window(rows, win)
            .into_iter()
            .map(|row| tables.feedback(row))
            .collect()
    }

    async fn count_feedback(&self, filter: &FeedbackFilter) -> Result<u64> {
        let tables = self.tables.read();
        Ok(tables
            .feedback
            .iter()
            .filter(|f| feedback_matches(filter, f))
            .count() as u64)
    }

    async fn create_feedback(&self, feedback: NewFeedback) -> Result<Feedback> {
        let mut tables = self.tables.write();
        tables.ensure_user(feedback.user_id)?;
        let row = FeedbackRow {
            id: tables.next_id()?,
            user_id: feedback.user_id,
            kind: feedback.kind,
            message: feedback.message,
            rating: feedback.rating,
            created_at: Utc::now(),
        };
        tables.feedback.push(row.clone());
        tables.feedback(&row)
    }
}

#[async_trait::async_trait]
impl EventStore for MemoryStore {
    async fn get_event(&self, id: Id) -> Result<Option<Event>> {
        let tables = self.tables.read();
        tables
            .events
            .iter()
            .find(|e| e.id == id)
            .map(|row| tables.event(row))
            .transpose()
    }

    async fn list_events(&self, filter: &EventFilter, win: Window) -> Result<Vec<Event>> {
        let tables = self.tables.read();
        let rows = tables
            .events
            .iter()
            .filter(|e| event_matches(filter, e))
            .sorted_by_key(|e| (e.start_date, e.id));
        window(rows, win).into_iter().map(|row| tables.event(row)).collect()
    }

    async fn count_events(&self, filter: &EventFilter) -> Result<u64> {
        let tables = self.tables.read();
        Ok(tables.events.iter().filter(|e| event_matches(filter, e)).count() as u64)
    }

    async fn create_event(&self, event: NewEvent) -> Result<Event> {
        let mut tables = self.tables.write();
        tables.ensure_user(event.user_id)?;
        let now = Utc::now();
        let row = EventRow {
            id: tables.next_id()?,
            user_id: event.user_id,
            title: event.title,
            description: event.description,
            start_date: event.start_date,
            end_date: event.end_date,
            location: event.location,
            created_at: now,
            updated_at: now,
        };
        tables.events.push(row.clone());
        tables.event(&row)
    }

    async fn update_event(&self, id: Id, changes: EventChanges) -> Result<Option<Event>> {
        let mut tables = self.tables.write();
        let Some(row) = tables.events.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            row.title = title;
        }
        if let Some(start_date) = changes.start_date {
            row.start_date = start_date;
        }
        row.description = changes.description.apply(row.description.take());
        row.end_date = changes.end_date.apply(row.end_date.take());
        row.location = changes.location.apply(row.location.take());
        row.updated_at = Utc::now();
        let row = row.clone();
        tables.event(&row).map(Some)
    }

    async fn delete_event(&self, id: Id) -> Result<bool> {
        let mut tables = self.tables.write();
        let before = tables.events.len();
        tables.events.retain(|e| e.id != id);
        Ok(tables.events.len() < before)
    }
}

impl Store for MemoryStore {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PageRequest, Patch};

    async fn store_with_user(username: &str) -> (MemoryStore, User) {
        let store = MemoryStore::new();
        let user = store
            .create_user(NewUser {
                username: username.to_string(),
            })
            .await
            .unwrap();
        (store, user)
    }

    #[tokio::test]
    async fn test_usernames_are_unique() {
        let (store, _) = store_with_user("alice").await;
        assert!(store
            .create_user(NewUser {
                username: "alice".to_string()
            })
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_children_require_existing_user() {
        let store = MemoryStore::new();
        let result = store
            .create_note(NewNote {
                content: "orphan".to_string(),
                user_id: 42,
            })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_pets_sorted_by_name_and_windowed() {
        let (store, user) = store_with_user("keeper").await;
        for name in ["Zed", "amber", "Bolt", "Ace"] {
            store
                .create_pet(NewPet {
                    pet_name: name.to_string(),
                    rarity: "common".to_string(),
                    owner_id: user.id,
                })
                .await
                .unwrap();
        }
        let filter = PetFilter::default();
        let all = store.list_pets(&filter, Window::ALL).await.unwrap();
        let names: Vec<_> = all.iter().map(|p| p.pet_name.as_str()).collect();
        assert_eq!(names, vec!["Ace", "Bolt", "Zed", "amber"]);

        let second = store
            .list_pets(&filter, PageRequest::new(2, 3).into())
            .await
            .unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].pet_name, "amber");
        assert_eq!(second[0].owner.username, "keeper");
    }

    #[tokio::test]
    async fn test_note_search_is_case_insensitive() {
        let (store, user) = store_with_user("writer").await;
        for content in ["Buy Milk", "walk the dog", "milkshake recipe"] {
            store
                .create_note(NewNote {
                    content: content.to_string(),
                    user_id: user.id,
                })
                .await
                .unwrap();
        }
        let filter = NoteFilter {
            user_id: None,
            search: Some("MILK".to_string()),
        };
        assert_eq!(store.count_notes(&filter).await.unwrap(), 2);
        let notes = store.list_notes(&filter, Window::ALL).await.unwrap();
        // newest first
        assert_eq!(notes[0].content, "milkshake recipe");
    }

    #[tokio::test]
    async fn test_status_image_url_can_be_cleared() {
        let (store, user) = store_with_user("poster").await;
        let status = store
            .create_status(NewStatus {
                user_id: user.id,
                description: "Level up".to_string(),
                image_url: Some("https://img.example.com/1.png".to_string()),
            })
            .await
            .unwrap();

        let untouched = store
            .update_status(
                status.id,
                StatusChanges {
                    description: Some("Level 2".to_string()),
                    image_url: Patch::Unset,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(untouched.image_url, status.image_url);

        let cleared = store
            .update_status(
                status.id,
                StatusChanges {
                    description: None,
                    image_url: Patch::Null,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cleared.image_url, None);
        assert_eq!(cleared.description, "Level 2");
    }

    #[tokio::test]
    async fn test_user_counts() {
        let (store, user) = store_with_user("counted").await;
        store
            .create_pet(NewPet {
                pet_name: "Rex".to_string(),
                rarity: "rare".to_string(),
                owner_id: user.id,
            })
            .await
            .unwrap();
        store
            .create_note(NewNote {
                content: "hi".to_string(),
                user_id: user.id,
            })
            .await
            .unwrap();
        let users = store
            .list_users(&UserFilter::default(), Window::ALL)
            .await
            .unwrap();
        assert_eq!(
            users[0].counts,
            UserCounts {
                notes: 1,
                statuses: 0,
                pets: 1
            }
        );
    }

    #[tokio::test]
    async fn test_missing_rows() {
        let store = MemoryStore::new();
        assert!(store.get_event(1).await.unwrap().is_none());
        assert!(!store.delete_pet(1).await.unwrap());
        assert!(store
            .update_note(1, NoteChanges::default())
            .await
            .unwrap()
            .is_none());
    }
}
