//! # Domain Models
//!
//! These structs represent the core entities of Top 5 Lister.
//! Wire names are camelCase to match the REST payloads consumed by the
//! single-page client.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Every ranked list holds exactly this many items, rank 1 first.
pub const LIST_LEN: usize = 5;

/// Placeholder item value used before the owner fills a slot in.
pub const PLACEHOLDER_ITEM: &str = "?";

/// A registered account. `password_hash` never leaves the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// The public slice of a [`User`] returned by login/register/loggedIn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
        }
    }
}

/// A single comment on a published list. Comment sequences are newest-first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub username: String,
    pub text: String,
}

/// A user-authored top-5 list.
///
/// `items` always has exactly [`LIST_LEN`] entries (possibly placeholders
/// before completion). Name comparison throughout the system is
/// case-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedList {
    pub id: Uuid,
    pub name: String,
    pub owner_username: String,
    pub items: [String; LIST_LEN],
    pub published: bool,
    pub publish_date: Option<DateTime<Utc>>,
    pub views: i64,
    pub likes: i64,
    pub dislikes: i64,
    /// username -> one of {-1, 0, 1}
    pub ratings: HashMap<String, i16>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RankedList {
    /// A fresh, unpublished list with placeholder items.
    pub fn new(name: impl Into<String>, owner_username: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            owner_username: owner_username.into(),
            items: std::array::from_fn(|_| PLACEHOLDER_ITEM.to_string()),
            published: false,
            publish_date: None,
            views: 0,
            likes: 0,
            dislikes: 0,
            ratings: HashMap::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The caller's current rating for this list, defaulting to 0.
    pub fn rating_of(&self, username: &str) -> i16 {
        self.ratings.get(username).copied().unwrap_or(0)
    }

    pub fn same_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// One aggregated entry of a community list: the item string in its
/// first-seen casing plus its accumulated points.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoredItem {
    pub item: String,
    pub points: i64,
}

/// The system-computed consensus ranking merging all published
/// [`RankedList`]s that share a (case-insensitive) name.
///
/// Created, overwritten, and deleted exclusively by the aggregation engine;
/// users only touch its views/likes/dislikes/ratings/comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityList {
    pub id: Uuid,
    pub name: String,
    /// Sorted descending by points, first-seen order breaking ties.
    pub items: Vec<ScoredItem>,
    pub published: bool,
    pub publish_date: Option<DateTime<Utc>>,
    pub views: i64,
    pub likes: i64,
    pub dislikes: i64,
    pub ratings: HashMap<String, i16>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommunityList {
    /// A freshly aggregated community list.
    pub fn new(name: impl Into<String>, items: Vec<ScoredItem>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            items,
            published: true,
            publish_date: Some(now),
            views: 0,
            likes: 0,
            dislikes: 0,
            ratings: HashMap::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn rating_of(&self, username: &str) -> i16 {
        self.ratings.get(username).copied().unwrap_or(0)
    }
}

/// True for the only rating values users may submit.
pub fn is_valid_rating(value: i16) -> bool {
    matches!(value, -1 | 0 | 1)
}
