use serde::{Deserialize, Serialize};

use crate::store::Document;

pub const USERS_COLLECTION: &str = "users";

/// Stored body of `users/{uid}`. The document id is the identity-provider uid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub name: String,
    pub email: String,
    pub created_at: String,
}

/// A user with its uid attached.
pub type User = Document<UserRecord>;
