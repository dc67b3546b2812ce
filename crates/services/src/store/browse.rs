//! The load-and-filter-and-sort pipeline behind every list view.
//!
//! Observers never trust a stale cached order: each load filters by the
//! active mode, sorts by the active sort order, and optionally narrows by
//! the search term.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use domains::{CommunityList, RankedList};

use super::{SortOrder, ViewMode};

/// The fields the browse pipeline needs from either list shape.
pub trait Browsable {
    fn name(&self) -> &str;
    fn publish_date(&self) -> Option<DateTime<Utc>>;
    fn views(&self) -> i64;
    fn likes(&self) -> i64;
    fn dislikes(&self) -> i64;
}

impl Browsable for RankedList {
    fn name(&self) -> &str {
        &self.name
    }
    fn publish_date(&self) -> Option<DateTime<Utc>> {
        self.publish_date
    }
    fn views(&self) -> i64 {
        self.views
    }
    fn likes(&self) -> i64 {
        self.likes
    }
    fn dislikes(&self) -> i64 {
        self.dislikes
    }
}

impl Browsable for CommunityList {
    fn name(&self) -> &str {
        &self.name
    }
    fn publish_date(&self) -> Option<DateTime<Utc>> {
        self.publish_date
    }
    fn views(&self) -> i64 {
        self.views
    }
    fn likes(&self) -> i64 {
        self.likes
    }
    fn dislikes(&self) -> i64 {
        self.dislikes
    }
}

/// Missing publish dates sort after present ones in both directions.
fn cmp_publish_dates(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>, newest_first: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            if newest_first {
                b.cmp(&a)
            } else {
                a.cmp(&b)
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort by the active order; numeric sorts are descending.
pub fn sort_lists<T: Browsable>(lists: &mut [T], sort: SortOrder) {
    match sort {
        SortOrder::PublishNewest => {
            lists.sort_by(|a, b| cmp_publish_dates(a.publish_date(), b.publish_date(), true))
        }
        SortOrder::PublishOldest => {
            lists.sort_by(|a, b| cmp_publish_dates(a.publish_date(), b.publish_date(), false))
        }
        SortOrder::Views => lists.sort_by(|a, b| b.views().cmp(&a.views())),
        SortOrder::Likes => lists.sort_by(|a, b| b.likes().cmp(&a.likes())),
        SortOrder::Dislikes => lists.sort_by(|a, b| b.dislikes().cmp(&a.dislikes())),
    }
}

/// Mode filter for ranked lists: `home` keeps the current user's own lists,
/// `all` and `user` keep every published list. Community mode fetches a
/// different shape and never reaches this function.
pub fn filter_by_mode(lists: Vec<RankedList>, mode: ViewMode, current_user: &str) -> Vec<RankedList> {
    match mode {
        ViewMode::Home => lists
            .into_iter()
            .filter(|l| l.owner_username == current_user)
            .collect(),
        ViewMode::All | ViewMode::User => lists.into_iter().filter(|l| l.published).collect(),
        ViewMode::Community => Vec::new(),
    }
}

fn search_matches(list: &RankedList, mode: ViewMode, query: &str) -> bool {
    match mode {
        // Prefix match on name.
        ViewMode::Home | ViewMode::All => list
            .name
            .to_lowercase()
            .starts_with(&query.to_lowercase()),
        // Exact match on owner.
        ViewMode::User => list.owner_username.eq_ignore_ascii_case(query),
        ViewMode::Community => false,
    }
}

/// Full pipeline for ranked lists: filter by mode, sort, then narrow by the
/// search term if one is set.
pub fn browse_ranked(
    lists: Vec<RankedList>,
    mode: ViewMode,
    sort: SortOrder,
    current_user: &str,
    search: Option<&str>,
) -> Vec<RankedList> {
    let mut lists = filter_by_mode(lists, mode, current_user);
    sort_lists(&mut lists, sort);
    match search {
        Some(query) if !query.is_empty() => lists
            .into_iter()
            .filter(|l| search_matches(l, mode, query))
            .collect(),
        _ => lists,
    }
}

/// Full pipeline for community lists; search is an exact name match.
pub fn browse_community(
    lists: Vec<CommunityList>,
    sort: SortOrder,
    search: Option<&str>,
) -> Vec<CommunityList> {
    let mut lists = lists;
    sort_lists(&mut lists, sort);
    match search {
        Some(query) if !query.is_empty() => lists
            .into_iter()
            .filter(|l| l.name.eq_ignore_ascii_case(query))
            .collect(),
        _ => lists,
    }
}
