use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::modules::user::schema::AccountSummary;

/// One line of an account's activity feed. Derived on read, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedEvent {
    pub heading: String,
    pub date: DateTime<Utc>,
    /// The account that acted.
    pub subject: AccountSummary,
    /// The account the action was aimed at.
    pub related_account: AccountSummary,
}

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub events: Vec<FeedEvent>,
}
