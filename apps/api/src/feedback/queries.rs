use crate::feedback::models::{Feedback, FEEDBACK_COLLECTION};
use crate::store::{DocumentStore, Query, StoreError};

/// Feedback for an (interview, user) pair. At most one is expected; the
/// first match wins.
pub async fn get_feedback_by_interview_id(
    store: &dyn DocumentStore,
    interview_id: &str,
    user_id: &str,
) -> Result<Option<Feedback>, StoreError> {
    let query = Query::new()
        .where_eq("interviewId", interview_id)
        .where_eq("userId", user_id)
        .limit(1);

    match store.query(FEEDBACK_COLLECTION, &query).await?.into_iter().next() {
        Some(doc) => Ok(Some(doc.decode()?)),
        None => Ok(None),
    }
}
