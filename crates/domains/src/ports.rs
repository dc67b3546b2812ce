//! # Core Traits (Ports)
//!
//! The adapter crates implement these contracts; services and handlers only
//! ever see the trait objects. `MockXxx` doubles are generated by mockall
//! under the `testing` feature for external test crates.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Comment, CommunityList, RankedList, ScoredItem, User};

/// Persistence contract for user accounts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn create_user(&self, user: User) -> Result<User>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
}

/// Persistence contract for user-authored top-5 lists.
///
/// Counter mutations (`bump_views`, `apply_rating`) must be atomic at the
/// storage boundary; callers never read-modify-write the whole document to
/// move a counter.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ListRepo: Send + Sync {
    async fn create_list(&self, list: RankedList) -> Result<RankedList>;
    async fn get_list(&self, id: Uuid) -> Result<Option<RankedList>>;
    /// Full-document replace. Returns `None` when the id is absent.
    async fn update_list(&self, list: RankedList) -> Result<Option<RankedList>>;
    /// Returns whether a document was actually removed.
    async fn delete_list(&self, id: Uuid) -> Result<bool>;
    async fn list_all(&self) -> Result<Vec<RankedList>>;
    /// All published lists whose name equals `name` case-insensitively,
    /// ordered by creation time (the aggregation tie-break relies on this).
    async fn find_published_by_name(&self, name: &str) -> Result<Vec<RankedList>>;

    async fn bump_views(&self, id: Uuid) -> Result<()>;
    /// Stores `rating` under `username` and applies both counter deltas in
    /// one atomic step.
    async fn apply_rating(
        &self,
        id: Uuid,
        username: &str,
        rating: i16,
        like_delta: i64,
        dislike_delta: i64,
    ) -> Result<()>;
    /// Prepends a comment (newest first).
    async fn push_comment(&self, id: Uuid, comment: Comment) -> Result<()>;
}

/// Persistence contract for aggregated community lists.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommunityRepo: Send + Sync {
    async fn create_community(&self, list: CommunityList) -> Result<CommunityList>;
    async fn get_community(&self, id: Uuid) -> Result<Option<CommunityList>>;
    /// Case-insensitive name lookup; at most one community list per name.
    async fn find_by_name(&self, name: &str) -> Result<Option<CommunityList>>;
    async fn list_all(&self) -> Result<Vec<CommunityList>>;
    /// Overwrites only the aggregated items, leaving views/likes/dislikes/
    /// ratings/comments untouched.
    async fn replace_items(&self, id: Uuid, items: Vec<ScoredItem>) -> Result<()>;
    async fn update_community(&self, list: CommunityList) -> Result<Option<CommunityList>>;
    async fn delete_community(&self, id: Uuid) -> Result<bool>;

    async fn bump_views(&self, id: Uuid) -> Result<()>;
    async fn apply_rating(
        &self,
        id: Uuid,
        username: &str,
        rating: i16,
        like_delta: i64,
        dislike_delta: i64,
    ) -> Result<()>;
    async fn push_comment(&self, id: Uuid, comment: Comment) -> Result<()>;
}

/// Identity contract: password hashing plus opaque session tokens carried
/// in an httpOnly cookie.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait AuthProvider: Send + Sync {
    fn hash_password(&self, password: &str) -> Result<String>;
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool>;
    fn sign_token(&self, user_id: Uuid) -> Result<String>;
    /// Returns the user id baked into a valid, unexpired token.
    fn verify_token(&self, token: &str) -> Result<Uuid>;
}
