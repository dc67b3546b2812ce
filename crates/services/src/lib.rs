//! Application services for Top 5 Lister.
//!
//! Everything here is storage-agnostic: services talk to the `domains` port
//! traits and carry the two pieces of real logic in the system — the
//! community-list aggregation engine and the client store state machine.

pub mod aggregation;
pub mod community;
pub mod lists;
pub mod rating;
pub mod store;
pub mod users;

pub use aggregation::{score_lists, AggregationEngine, Reconciliation};
pub use community::CommunityService;
pub use lists::{ListDraft, ListService, ListUpdate};
pub use rating::{transition, RatingOutcome};
pub use store::{reduce, SortOrder, Store, StoreAction, StoreEntry, StoreState, ViewMode};
pub use users::{Registration, UserService};
