use crate::model::{
    Event, EventChanges, EventFilter, Feedback, FeedbackFilter, Id, NewEvent, NewFeedback,
    NewNote, NewPet, NewStatus, NewUser, Note, NoteChanges, NoteFilter, Pet, PetChanges,
    PetFilter, Status, StatusChanges, StatusFilter, User, UserFilter, UserWithCounts, Window,
};
use anyhow::Result;

#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, id: Id) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    /// Newest first, each user with the size of its note, status and pet collections.
    async fn list_users(&self, filter: &UserFilter, window: Window) -> Result<Vec<UserWithCounts>>;
    async fn count_users(&self, filter: &UserFilter) -> Result<u64>;
    async fn create_user(&self, user: NewUser) -> Result<User>;
}

#[async_trait::async_trait]
pub trait NoteStore: Send + Sync {
    async fn get_note(&self, id: Id) -> Result<Option<Note>>;
    /// Newest first.
    async fn list_notes(&self, filter: &NoteFilter, window: Window) -> Result<Vec<Note>>;
    async fn count_notes(&self, filter: &NoteFilter) -> Result<u64>;
    async fn create_note(&self, note: NewNote) -> Result<Note>;
    /// `None` when the row no longer exists.
    async fn update_note(&self, id: Id, changes: NoteChanges) -> Result<Option<Note>>;
    async fn delete_note(&self, id: Id) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait StatusStore: Send + Sync {
    async fn get_status(&self, id: Id) -> Result<Option<Status>>;
    /// Newest first.
    async fn list_statuses(&self, filter: &StatusFilter, window: Window) -> Result<Vec<Status>>;
    async fn count_statuses(&self, filter: &StatusFilter) -> Result<u64>;
    async fn create_status(&self, status: NewStatus) -> Result<Status>;
    async fn update_status(&self, id: Id, changes: StatusChanges) -> Result<Option<Status>>;
    async fn delete_status(&self, id: Id) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait PetStore: Send + Sync {
    async fn get_pet(&self, id: Id) -> Result<Option<Pet>>;
    /// Ordered by pet name, byte-wise (uppercase before lowercase), then id.
    async fn list_pets(&self, filter: &PetFilter, window: Window) -> Result<Vec<Pet>>;
    async fn count_pets(&self, filter: &PetFilter) -> Result<u64>;
    async fn create_pet(&self, pet: NewPet) -> Result<Pet>;
    async fn update_pet(&self, id: Id, changes: PetChanges) -> Result<Option<Pet>>;
    async fn delete_pet(&self, id: Id) -> Result<bool>;
}

/// Feedback is append-only.
#[async_trait::async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn get_feedback(&self, id: Id) -> Result<Option<Feedback>>;
    /// Newest first.
    async fn list_feedback(&self, filter: &FeedbackFilter, window: Window) -> Result<Vec<Feedback>>;
    async fn count_feedback(&self, filter: &FeedbackFilter) -> Result<u64>;
    async fn create_feedback(&self, feedback: NewFeedback) -> Result<Feedback>;
}

#[async_trait::async_trait]
pub trait EventStore: Send + Sync {
    async fn get_event(&self, id: Id) -> Result<Option<Event>>;
    /// Earliest start first.
    async fn list_events(&self, filter: &EventFilter, window: Window) -> Result<Vec<Event>>;
    async fn count_events(&self, filter: &EventFilter) -> Result<u64>;
    async fn create_event(&self, event: NewEvent) -> Result<Event>;
    /// Also bumps `updated_at`.
    async fn update_event(&self, id: Id, changes: EventChanges) -> Result<Option<Event>>;
    async fn delete_event(&self, id: Id) -> Result<bool>;
}

pub trait Store:
    UserStore + NoteStore + StatusStore + PetStore + FeedbackStore + EventStore + Send + Sync
{
}
