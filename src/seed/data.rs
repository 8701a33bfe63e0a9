use anyhow::Result;
use chrono::{Duration, Utc};

use crate::model::{
    FeedbackType, NewEvent, NewFeedback, NewNote, NewPet, NewStatus, NewUser, UserFilter,
};
use crate::store::traits::Store;

const USERS: [&str; 3] = ["dragon_tamer", "pixel-knight", "moonwalker42"];

const PETS: [(&str, &str, usize); 5] = [
    ("Ember", "legendary", 0),
    ("Sprout", "common", 0),
    ("Glimmer", "rare", 1),
    ("Shadow Fox", "legendary", 1),
    ("Pebble", "uncommon", 2),
];

const NOTES: [(&str, usize); 3] = [
    ("Remember to feed Ember before the raid", 0),
    ("Trade offer: Glimmer for two rare eggs", 1),
    ("Looking for a team for the weekend event", 2),
];

/// Demo data for local development. Does nothing once any user exists.
pub async fn load_seed_data<S: Store>(store: &S) -> Result<()> {
    if store.count_users(&UserFilter::default()).await? > 0 {
        log::info!("Users already present - skipping seed data");
        return Ok(());
    }

    let mut users = Vec::with_capacity(USERS.len());
    for username in USERS {
        users.push(
            store
                .create_user(NewUser {
                    username: username.to_string(),
                })
                .await?,
        );
    }

    for (pet_name, rarity, owner) in PETS {
        store
            .create_pet(NewPet {
                pet_name: pet_name.to_string(),
                rarity: rarity.to_string(),
                owner_id: users[owner].id,
            })
            .await?;
    }

    for (content, author) in NOTES {
        store
            .create_note(NewNote {
                content: content.to_string(),
                user_id: users[author].id,
            })
            .await?;
    }

    store
        .create_status(NewStatus {
            user_id: users[0].id,
            description: "Ember just evolved!".to_string(),
            image_url: Some("https://picsum.photos/seed/ember/400/300".to_string()),
        })
        .await?;
    store
        .create_status(NewStatus {
            user_id: users[2].id,
            description: "First day in the arena".to_string(),
            image_url: None,
        })
        .await?;

    store
        .create_feedback(NewFeedback {
            user_id: users[1].id,
            kind: FeedbackType::FeatureRequest,
            message: "Would love to see dark mode added to the app".to_string(),
            rating: Some(4),
        })
        .await?;
    store
        .create_feedback(NewFeedback {
            user_id: users[2].id,
            kind: FeedbackType::BugReport,
            message: "Pets sometimes disappear from the inventory after relogging".to_string(),
            rating: None,
        })
        .await?;

    let start = Utc::now() + Duration::days(3);
    store
        .create_event(NewEvent {
            user_id: users[0].id,
            title: "Weekend Dragon Raid".to_string(),
            description: Some("Bring your strongest pets".to_string()),
            start_date: start,
            end_date: Some(start + Duration::hours(2)),
            location: Some("Volcano Arena".to_string()),
        })
        .await?;

    log::info!(
        "Seed data loaded: {} users, {} pets, {} notes",
        users.len(),
        PETS.len(),
        NOTES.len()
    );
    Ok(())
}
