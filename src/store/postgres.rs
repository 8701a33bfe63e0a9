use anyhow::{Context, Result};
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    PgPool, Postgres, QueryBuilder, Row,
};

use crate::model::{
    Event, EventChanges, EventFilter, Feedback, FeedbackFilter, FeedbackType, Id, NewEvent,
    NewFeedback, NewNote, NewPet, NewStatus, NewUser, Note, NoteChanges, NoteFilter, Patch, Pet,
    PetChanges, PetFilter, Status, StatusChanges, StatusFilter, User, UserCounts, UserFilter,
    UserSummary, UserWithCounts, Window,
};
use crate::store::traits::{
    EventStore, FeedbackStore, NoteStore, PetStore, StatusStore, Store, UserStore,
};

const USER_COLUMNS: &str = "u.id, u.username, u.created_at";
const USER_SELECT: &str = "SELECT u.id, u.username, u.created_at, \
     (SELECT COUNT(*) FROM notes n WHERE n.user_id = u.id) AS note_count, \
     (SELECT COUNT(*) FROM statuses s WHERE s.user_id = u.id) AS status_count, \
     (SELECT COUNT(*) FROM pets p WHERE p.owner_id = u.id) AS pet_count \
     FROM users u";

const NOTE_SELECT: &str = "SELECT n.id, n.content, n.user_id, n.created_at, u.username \
     FROM notes n JOIN users u ON u.id = n.user_id";
const STATUS_SELECT: &str =
    "SELECT s.id, s.user_id, s.description, s.image_url, s.created_at, u.username \
     FROM statuses s JOIN users u ON u.id = s.user_id";
const PET_SELECT: &str = "SELECT p.id, p.pet_name, p.rarity, p.owner_id, u.username \
     FROM pets p JOIN users u ON u.id = p.owner_id";
const FEEDBACK_SELECT: &str =
    "SELECT f.id, f.user_id, f.type, f.message, f.rating, f.created_at, u.username \
     FROM feedbacks f JOIN users u ON u.id = f.user_id";
const EVENT_SELECT: &str = "SELECT e.id, e.user_id, e.title, e.description, e.start_date, \
     e.end_date, e.location, e.created_at, e.updated_at, u.username \
     FROM events e JOIN users u ON u.id = e.user_id";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Apply the SQL files under `migrations/`
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Byte-wise name order, matching the in-memory store whatever the database
/// collation is.
const PET_ORDER: &str = " ORDER BY p.pet_name COLLATE \"C\" ASC, p.id ASC";

/// `ILIKE` pattern matching `term` anywhere, with wildcards in the term escaped.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Pushes ` WHERE ` before the first condition and ` AND ` before the rest.
struct Conditions {
    any: bool,
}

impl Conditions {
    fn new() -> Self {
        Self { any: false }
    }

    fn next<'q, 'a>(
        &mut self,
        qb: &'q mut QueryBuilder<'a, Postgres>,
    ) -> &'q mut QueryBuilder<'a, Postgres> {
        let keyword = if self.any { " AND " } else { " WHERE " };
        self.any = true;
        qb.push(keyword)
    }
}

fn push_window(qb: &mut QueryBuilder<'_, Postgres>, window: Window) {
    if let Some(limit) = window.limit {
        qb.push(" LIMIT ")
            .push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
    }
    if window.offset > 0 {
        qb.push(" OFFSET ")
            .push_bind(i64::try_from(window.offset).unwrap_or(i64::MAX));
    }
}

fn count(row: &PgRow, column: &str) -> Result<u64> {
    let value: i64 = row.try_get(column)?;
    Ok(u64::try_from(value)?)
}

fn summary(row: &PgRow, id_column: &str) -> Result<UserSummary> {
    Ok(UserSummary {
        id: row.try_get(id_column)?,
        username: row.try_get("username")?,
    })
}

fn user_from_row(row: &PgRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        created_at: row.try_get("created_at")?,
    })
}

fn user_with_counts_from_row(row: &PgRow) -> Result<UserWithCounts> {
    Ok(UserWithCounts {
        user: user_from_row(row)?,
        counts: UserCounts {
            notes: count(row, "note_count")?,
            statuses: count(row, "status_count")?,
            pets: count(row, "pet_count")?,
        },
    })
}

fn note_from_row(row: &PgRow) -> Result<Note> {
    Ok(Note {
        id: row.try_get("id")?,
        content: row.try_get("content")?,
        user_id: row.try_get("user_id")?,
        created_at: row.try_get("created_at")?,
        user: summary(row, "user_id")?,
    })
}

fn status_from_row(row: &PgRow) -> Result<Status> {
    Ok(Status {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        description: row.try_get("description")?,
        image_url: row.try_get("image_url")?,
        created_at: row.try_get("created_at")?,
        user: summary(row, "user_id")?,
    })
}

fn pet_from_row(row: &PgRow) -> Result<Pet> {
    Ok(Pet {
        id: row.try_get("id")?,
        pet_name: row.try_get("pet_name")?,
        rarity: row.try_get("rarity")?,
        owner_id: row.try_get("owner_id")?,
        owner: summary(row, "owner_id")?,
    })
}

fn feedback_from_row(row: &PgRow) -> Result<Feedback> {
    let kind: String = row.try_get("type")?;
    Ok(Feedback {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        kind: kind.parse::<FeedbackType>().map_err(anyhow::Error::msg)?,
        message: row.try_get("message")?,
        rating: row.try_get("rating")?,
        created_at: row.try_get("created_at")?,
        user: summary(row, "user_id")?,
    })
}

fn event_from_row(row: &PgRow) -> Result<Event> {
    Ok(Event {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        location: row.try_get("location")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        user: summary(row, "user_id")?,
    })
}

fn push_user_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    let mut conditions = Conditions::new();
    if let Some(term) = &filter.search {
        conditions
            .next(qb)
            .push("u.username ILIKE ")
            .push_bind(contains_pattern(term));
    }
}

fn push_note_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &NoteFilter) {
    let mut conditions = Conditions::new();
    if let Some(user_id) = filter.user_id {
        conditions.next(qb).push("n.user_id = ").push_bind(user_id);
    }
    if let Some(term) = &filter.search {
        conditions
            .next(qb)
            .push("n.content ILIKE ")
            .push_bind(contains_pattern(term));
    }
}

fn push_status_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &StatusFilter) {
    let mut conditions = Conditions::new();
    if let Some(user_id) = filter.user_id {
        conditions.next(qb).push("s.user_id = ").push_bind(user_id);
    }
}

fn push_pet_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &PetFilter) {
    let mut conditions = Conditions::new();
    if let Some(owner_id) = filter.owner_id {
        conditions.next(qb).push("p.owner_id = ").push_bind(owner_id);
    }
    if let Some(rarity) = &filter.rarity {
        conditions
            .next(qb)
            .push("p.rarity = ")
            .push_bind(rarity.clone());
    }
    if let Some(term) = &filter.search {
        conditions
            .next(qb)
            .push("p.pet_name ILIKE ")
            .push_bind(contains_pattern(term));
    }
}

fn push_feedback_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &FeedbackFilter) {
    let mut conditions = Conditions::new();
    if let Some(kind) = filter.kind {
        conditions.next(qb).push("f.type = ").push_bind(kind.as_str());
    }
    if let Some(user_id) = filter.user_id {
        conditions.next(qb).push("f.user_id = ").push_bind(user_id);
    }
}

fn push_event_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &EventFilter) {
    let mut conditions = Conditions::new();
    if let Some(user_id) = filter.user_id {
        conditions.next(qb).push("e.user_id = ").push_bind(user_id);
    }
    if let Some(from) = filter.starts_at_or_after {
        conditions.next(qb).push("e.start_date >= ").push_bind(from);
    }
}

impl PostgresStore {
    async fn fetch_rows(&self, mut qb: QueryBuilder<'_, Postgres>, what: &str) -> Result<Vec<PgRow>> {
        qb.build()
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to list {}", what))
    }

    async fn fetch_count(&self, mut qb: QueryBuilder<'_, Postgres>, what: &str) -> Result<u64> {
        let total: i64 = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("Failed to count {}", what))?;
        Ok(u64::try_from(total)?)
    }

    async fn delete_row(&self, table: &str, id: Id) -> Result<bool> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", table))
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to delete from {}", table))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl UserStore for PostgresStore {
    async fn get_user(&self, id: Id) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users u WHERE u.id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user")?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users u WHERE u.username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by username")?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn list_users(&self, filter: &UserFilter, window: Window) -> Result<Vec<UserWithCounts>> {
        let mut qb = QueryBuilder::new(USER_SELECT);
        push_user_filter(&mut qb, filter);
        qb.push(" ORDER BY u.created_at DESC, u.id DESC");
        push_window(&mut qb, window);

        self.fetch_rows(qb, "users")
            .await?
            .iter()
            .map(user_with_counts_from_row)
            .collect()
    }

    async fn count_users(&self, filter: &UserFilter) -> Result<u64> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM users u");
        push_user_filter(&mut qb, filter);
        self.fetch_count(qb, "users").await
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let row = sqlx::query(
            "INSERT INTO users (username) VALUES ($1) RETURNING id, username, created_at",
        )
        .bind(&user.username)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create user")?;

        user_from_row(&row)
    }
}

#[async_trait::async_trait]
impl NoteStore for PostgresStore {
    async fn get_note(&self, id: Id) -> Result<Option<Note>> {
        let row = sqlx::query(&format!("{} WHERE n.id = $1", NOTE_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch note")?;

        row.as_ref().map(note_from_row).transpose()
    }

    async fn list_notes(&self, filter: &NoteFilter, window: Window) -> Result<Vec<Note>> {
        let mut qb = QueryBuilder::new(NOTE_SELECT);
        push_note_filter(&mut qb, filter);
        qb.push(" ORDER BY n.created_at DESC, n.id DESC");
        push_window(&mut qb, window);

        self.fetch_rows(qb, "notes")
            .await?
            .iter()
            .map(note_from_row)
            .collect()
    }

    async fn count_notes(&self, filter: &NoteFilter) -> Result<u64> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM notes n");
        push_note_filter(&mut qb, filter);
        self.fetch_count(qb, "notes").await
    }

    async fn create_note(&self, note: NewNote) -> Result<Note> {
        let row = sqlx::query(
            r#"
            WITH n AS (
                INSERT INTO notes (content, user_id) VALUES ($1, $2)
                RETURNING id, content, user_id, created_at
            )
            SELECT n.id, n.content, n.user_id, n.created_at, u.username
            FROM n JOIN users u ON u.id = n.user_id
            "#,
        )
        .bind(&note.content)
        .bind(note.user_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create note")?;

        note_from_row(&row)
    }

    async fn update_note(&self, id: Id, changes: NoteChanges) -> Result<Option<Note>> {
        let Some(content) = changes.content else {
            return self.get_note(id).await;
        };

        let result = sqlx::query("UPDATE notes SET content = $1 WHERE id = $2")
            .bind(content)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update note")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_note(id).await
    }

    async fn delete_note(&self, id: Id) -> Result<bool> {
        self.delete_row("notes", id).await
    }
}

#[async_trait::async_trait]
impl StatusStore for PostgresStore {
    async fn get_status(&self, id: Id) -> Result<Option<Status>> {
        let row = sqlx::query(&format!("{} WHERE s.id = $1", STATUS_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch status")?;

        row.as_ref().map(status_from_row).transpose()
    }

    async fn list_statuses(&self, filter: &StatusFilter, window: Window) -> Result<Vec<Status>> {
        let mut qb = QueryBuilder::new(STATUS_SELECT);
        push_status_filter(&mut qb, filter);
        qb.push(" ORDER BY s.created_at DESC, s.id DESC");
        push_window(&mut qb, window);

        self.fetch_rows(qb, "statuses")
            .await?
            .iter()
            .map(status_from_row)
            .collect()
    }

    async fn count_statuses(&self, filter: &StatusFilter) -> Result<u64> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM statuses s");
        push_status_filter(&mut qb, filter);
        self.fetch_count(qb, "statuses").await
    }

    async fn create_status(&self, status: NewStatus) -> Result<Status> {
        let row = sqlx::query(
            r#"
            WITH s AS (
                INSERT INTO statuses (user_id, description, image_url) VALUES ($1, $2, $3)
                RETURNING id, user_id, description, image_url, created_at
            )
            SELECT s.id, s.user_id, s.description, s.image_url, s.created_at, u.username
            FROM s JOIN users u ON u.id = s.user_id
            "#,
        )
        .bind(status.user_id)
        .bind(&status.description)
        .bind(&status.image_url)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create status")?;

        status_from_row(&row)
    }

    async fn update_status(&self, id: Id, changes: StatusChanges) -> Result<Option<Status>> {
        if changes.is_empty() {
            return self.get_status(id).await;
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE statuses SET ");
        let mut set = qb.separated(", ");
        if let Some(description) = changes.description {
            set.push("description = ").push_bind_unseparated(description);
        }
        match changes.image_url {
            Patch::Unset => {}
            Patch::Null => {
                set.push("image_url = NULL");
            }
            Patch::Value(url) => {
                set.push("image_url = ").push_bind_unseparated(url);
            }
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .context("Failed to update status")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_status(id).await
    }

    async fn delete_status(&self, id: Id) -> Result<bool> {
        self.delete_row("statuses", id).await
    }
}

#[async_trait::async_trait]
impl PetStore for PostgresStore {
    async fn get_pet(&self, id: Id) -> Result<Option<Pet>> {
        let row = sqlx::query(&format!("{} WHERE p.id = $1", PET_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch pet")?;

        row.as_ref().map(pet_from_row).transpose()
    }

    async fn list_pets(&self, filter: &PetFilter, window: Window) -> Result<Vec<Pet>> {
        let mut qb = QueryBuilder::new(PET_SELECT);
        push_pet_filter(&mut qb, filter);
        qb.push(PET_ORDER);
        push_window(&mut qb, window);

        self.fetch_rows(qb, "pets")
            .await?
            .iter()
            .map(pet_from_row)
            .collect()
    }

    async fn count_pets(&self, filter: &PetFilter) -> Result<u64> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM pets p");
        push_pet_filter(&mut qb, filter);
        self.fetch_count(qb, "pets").await
    }

    async fn create_pet(&self, pet: NewPet) -> Result<Pet> {
        let row = sqlx::query(
            r#"
            WITH p AS (
                INSERT INTO pets (pet_name, rarity, owner_id) VALUES ($1, $2, $3)
                RETURNING id, pet_name, rarity, owner_id
            )
            SELECT p.id, p.pet_name, p.rarity, p.owner_id, u.username
            FROM p JOIN users u ON u.id = p.owner_id
            "#,
        )
        .bind(&pet.pet_name)
        .bind(&pet.rarity)
        .bind(pet.owner_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create pet")?;

        pet_from_row(&row)
    }

    async fn update_pet(&self, id: Id, changes: PetChanges) -> Result<Option<Pet>> {
        if changes.is_empty() {
            return self.get_pet(id).await;
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE pets SET ");
        let mut set = qb.separated(", ");
        if let Some(pet_name) = changes.pet_name {
            set.push("pet_name = ").push_bind_unseparated(pet_name);
        }
        if let Some(rarity) = changes.rarity {
            set.push("rarity = ").push_bind_unseparated(rarity);
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .context("Failed to update pet")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_pet(id).await
    }

    async fn delete_pet(&self, id: Id) -> Result<bool> {
        self.delete_row("pets", id).await
    }
}

#[async_trait::async_trait]
impl FeedbackStore for PostgresStore {
    async fn get_feedback(&self, id: Id) -> Result<Option<Feedback>> {
        let row = sqlx::query(&format!("{} WHERE f.id = $1", FEEDBACK_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch feedback")?;

        row.as_ref().map(feedback_from_row).transpose()
    }

    async fn list_feedback(&self, filter: &FeedbackFilter, window: Window) -> Result<Vec<Feedback>> {
        let mut qb = QueryBuilder::new(FEEDBACK_SELECT);
        push_feedback_filter(&mut qb, filter);
        qb.push(" ORDER BY f.created_at DESC, f.id DESC");
        push_window(&mut qb, window);

        self.fetch_rows(qb, "feedback")
            .await?
            .iter()
            .map(feedback_from_row)
            .collect()
    }

    async fn count_feedback(&self, filter: &FeedbackFilter) -> Result<u64> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM feedbacks f");
        push_feedback_filter(&mut qb, filter);
        self.fetch_count(qb, "feedback").await
    }

    async fn create_feedback(&self, feedback: NewFeedback) -> Result<Feedback> {
        let row = sqlx::query(
            r#"
            WITH f AS (
                INSERT INTO feedbacks (user_id, type, message, rating) VALUES ($1, $2, $3, $4)
                RETURNING id, user_id, type, message, rating, created_at
            )
            SELECT f.id, f.user_id, f.type, f.message, f.rating, f.created_at, u.username
            FROM f JOIN users u ON u.id = f.user_id
            "#,
        )
        .bind(feedback.user_id)
        .bind(feedback.kind.as_str())
        .bind(&feedback.message)
        .bind(feedback.rating)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create feedback")?;

        feedback_from_row(&row)
    }
}

#[async_trait::async_trait]
impl EventStore for PostgresStore {
    async fn get_event(&self, id: Id) -> Result<Option<Event>> {
        let row = sqlx::query(&format!("{} WHERE e.id = $1", EVENT_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch event")?;

        row.as_ref().map(event_from_row).transpose()
    }

    async fn list_events(&self, filter: &EventFilter, window: Window) -> Result<Vec<Event>> {
        let mut qb = QueryBuilder::new(EVENT_SELECT);
        push_event_filter(&mut qb, filter);
        qb.push(" ORDER BY e.start_date ASC, e.id ASC");
        push_window(&mut qb, window);

        self.fetch_rows(qb, "events")
            .await?
            .iter()
            .map(event_from_row)
            .collect()
    }

    async fn count_events(&self, filter: &EventFilter) -> Result<u64> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM events e");
        push_event_filter(&mut qb, filter);
        self.fetch_count(qb, "events").await
    }

    async fn create_event(&self, event: NewEvent) -> Result<Event> {
        let row = sqlx::query(
            r#"
            WITH e AS (
                INSERT INTO events (user_id, title, description, start_date, end_date, location)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, user_id, title, description, start_date, end_date, location,
                          created_at, updated_at
            )
            SELECT e.id, e.user_id, e.title, e.description, e.start_date, e.end_date,
                   e.location, e.created_at, e.updated_at, u.username
            FROM e JOIN users u ON u.id = e.user_id
            "#,
        )
        .bind(event.user_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.start_date)
        .bind(event.end_date)
        .bind(&event.location)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create event")?;

        event_from_row(&row)
    }

    async fn update_event(&self, id: Id, changes: EventChanges) -> Result<Option<Event>> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE events SET ");
        let mut set = qb.separated(", ");
        set.push("updated_at = NOW()");
        if let Some(title) = changes.title {
            set.push("title = ").push_bind_unseparated(title);
        }
        if let Some(start_date) = changes.start_date {
            set.push("start_date = ").push_bind_unseparated(start_date);
        }
        match changes.description {
            Patch::Unset => {}
            Patch::Null => {
                set.push("description = NULL");
            }
            Patch::Value(description) => {
                set.push("description = ").push_bind_unseparated(description);
            }
        }
        match changes.end_date {
            Patch::Unset => {}
            Patch::Null => {
                set.push("end_date = NULL");
            }
            Patch::Value(end_date) => {
                set.push("end_date = ").push_bind_unseparated(end_date);
            }
        }
        match changes.location {
            Patch::Unset => {}
            Patch::Null => {
                set.push("location = NULL");
            }
            Patch::Value(location) => {
                set.push("location = ").push_bind_unseparated(location);
            }
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .context("Failed to update event")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_event(id).await
    }

    async fn delete_event(&self, id: Id) -> Result<bool> {
        self.delete_row("events", id).await
    }
}

impl Store for PostgresStore {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("milk"), "%milk%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_conditions_join_with_and() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM pets p");
        push_pet_filter(
            &mut qb,
            &PetFilter {
                owner_id: Some(3),
                rarity: Some("rare".to_string()),
                search: None,
            },
        );
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM pets p WHERE p.owner_id = $1 AND p.rarity = $2"
        );
    }

    #[test]
    fn test_pet_order_ignores_database_collation() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT p.id FROM pets p");
        push_pet_filter(&mut qb, &PetFilter::default());
        qb.push(PET_ORDER);
        assert_eq!(
            qb.sql(),
            "SELECT p.id FROM pets p ORDER BY p.pet_name COLLATE \"C\" ASC, p.id ASC"
        );
    }

    #[test]
    fn test_window_is_omitted_when_unbounded() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1");
        push_window(&mut qb, Window::ALL);
        assert_eq!(qb.sql(), "SELECT 1");

        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1");
        push_window(&mut qb, Window { offset: 10, limit: Some(5) });
        assert_eq!(qb.sql(), "SELECT 1 LIMIT $1 OFFSET $2");
    }
}
