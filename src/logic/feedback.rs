use crate::error::DomainResult;
use crate::logic::{ensure_user_exists, found, paginate};
use crate::model::{Feedback, FeedbackFilter, Id, ListQuery, NewFeedback, Paginated};
use crate::store::traits::{FeedbackStore, UserStore};

pub struct FeedbackOperations;

impl FeedbackOperations {
    pub async fn create<S: FeedbackStore + UserStore>(
        store: &S,
        feedback: NewFeedback,
    ) -> DomainResult<Feedback> {
        ensure_user_exists(store, feedback.user_id).await?;
        Ok(store.create_feedback(feedback).await?)
    }

    pub async fn list<S: FeedbackStore>(
        store: &S,
        query: ListQuery<FeedbackFilter>,
    ) -> DomainResult<Paginated<Feedback>> {
        paginate(
            query.page,
            store.list_feedback(&query.filter, query.page.into()),
            store.count_feedback(&query.filter),
        )
        .await
    }

    pub async fn get<S: FeedbackStore>(store: &S, id: Id) -> DomainResult<Feedback> {
        found("Feedback", id, store.get_feedback(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::testing::store_with_user;
    use crate::model::FeedbackType;

    #[tokio::test]
    async fn test_filter_by_type() {
        let (store, user) = store_with_user("critic").await;
        for (kind, message) in [
            (FeedbackType::BugReport, "Crash when opening the shop"),
            (FeedbackType::General, "Great game, keep it up"),
            (FeedbackType::BugReport, "Pets vanish after relogging"),
        ] {
            FeedbackOperations::create(
                &store,
                NewFeedback {
                    user_id: user.id,
                    kind,
                    message: message.to_string(),
                    rating: None,
                },
            )
            .await
            .unwrap();
        }
        let page = FeedbackOperations::list(
            &store,
            ListQuery {
                filter: FeedbackFilter {
                    kind: Some(FeedbackType::BugReport),
                    user_id: None,
                },
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(page.pagination.total_items, 2);
        assert_eq!(page.items[0].message, "Pets vanish after relogging");
    }

    #[tokio::test]
    async fn test_get_missing_feedback() {
        let (store, _) = store_with_user("critic").await;
        let err = FeedbackOperations::get(&store, 55).await.unwrap_err();
        assert_eq!(err.to_string(), "Feedback with ID 55 not found");
    }
}
