//! Like/dislike rating transitions.
//!
//! A user's rating on a list is one of {-1, 0, 1}. Submitting a target
//! rating yields the counter deltas the storage layer applies atomically,
//! so "unlike" and "switch sides" are single operations rather than
//! read-modify-write round trips.

use domains::{is_valid_rating, DomainError, Result};

/// The net effect of moving a user's rating from one value to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingOutcome {
    pub rating: i16,
    pub like_delta: i64,
    pub dislike_delta: i64,
}

impl RatingOutcome {
    pub fn is_noop(&self) -> bool {
        self.like_delta == 0 && self.dislike_delta == 0
    }
}

/// Computes the transition from `previous` to `target`.
///
/// 0→1 adds a like, 1→0 removes one ("unlike"), -1→1 removes a dislike and
/// adds a like in the same step, and mirrored for dislikes.
pub fn transition(previous: i16, target: i16) -> Result<RatingOutcome> {
    if !is_valid_rating(target) {
        return Err(DomainError::validation(format!(
            "rating must be -1, 0 or 1, got {target}"
        )));
    }
    let previous = if is_valid_rating(previous) { previous } else { 0 };

    let was_like = i64::from(previous == 1);
    let was_dislike = i64::from(previous == -1);
    let is_like = i64::from(target == 1);
    let is_dislike = i64::from(target == -1);

    Ok(RatingOutcome {
        rating: target,
        like_delta: is_like - was_like,
        dislike_delta: is_dislike - was_dislike,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_from_neutral() {
        let out = transition(0, 1).unwrap();
        assert_eq!(out, RatingOutcome { rating: 1, like_delta: 1, dislike_delta: 0 });
    }

    #[test]
    fn unlike() {
        let out = transition(1, 0).unwrap();
        assert_eq!(out, RatingOutcome { rating: 0, like_delta: -1, dislike_delta: 0 });
    }

    #[test]
    fn switch_from_dislike_to_like_in_one_step() {
        let out = transition(-1, 1).unwrap();
        assert_eq!(out, RatingOutcome { rating: 1, like_delta: 1, dislike_delta: -1 });
    }

    #[test]
    fn switch_from_like_to_dislike_in_one_step() {
        let out = transition(1, -1).unwrap();
        assert_eq!(out, RatingOutcome { rating: -1, like_delta: -1, dislike_delta: 1 });
    }

    #[test]
    fn repeat_rating_is_a_noop() {
        assert!(transition(1, 1).unwrap().is_noop());
        assert!(transition(-1, -1).unwrap().is_noop());
        assert!(transition(0, 0).unwrap().is_noop());
    }

    #[test]
    fn rejects_out_of_range_target() {
        assert!(transition(0, 2).is_err());
        assert!(transition(0, -3).is_err());
    }
}
