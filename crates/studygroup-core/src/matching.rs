//! Heuristic group matching.
//!
//! A candidate earns one point each for an overlapping subject, an overlapping
//! goal and a free-time slot within two hours of the target's. Candidates with
//! at least two points are matches.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::FreeTimeError;
use crate::group::StudyGroup;
use crate::time::parse_free_time;

/// Minimum score for a candidate to be returned.
pub const MATCH_THRESHOLD: u8 = 2;

/// Largest free-time distance, in seconds, that still counts as close.
pub const TIME_WINDOW_SECS: i64 = 2 * 3600;

/// Per-criterion breakdown of a match score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScore {
    pub subject: bool,
    pub goal: bool,
    pub time: bool,
}

impl MatchScore {
    pub fn total(&self) -> u8 {
        u8::from(self.subject) + u8::from(self.goal) + u8::from(self.time)
    }

    pub fn is_match(&self) -> bool {
        self.total() >= MATCH_THRESHOLD
    }
}

/// Case-folded containment in either direction.
fn overlaps(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// The target side of a comparison, folded and parsed once.
struct Profile {
    subject: String,
    goal: String,
    time: Result<NaiveDateTime, FreeTimeError>,
}

impl Profile {
    fn of(group: &StudyGroup) -> Self {
        Self {
            subject: group.subject.to_lowercase(),
            goal: group.goal.to_lowercase(),
            time: parse_free_time(&group.free_time),
        }
    }

    fn score(&self, candidate: &StudyGroup) -> MatchScore {
        let time = match (&self.time, parse_free_time(&candidate.free_time)) {
            (Ok(ours), Ok(theirs)) => (*ours - theirs).num_seconds().abs() <= TIME_WINDOW_SECS,
            _ => false,
        };
        MatchScore {
            subject: overlaps(&self.subject, &candidate.subject.to_lowercase()),
            goal: overlaps(&self.goal, &candidate.goal.to_lowercase()),
            time,
        }
    }
}

/// Score one candidate against a target.
pub fn match_score(target: &StudyGroup, candidate: &StudyGroup) -> MatchScore {
    Profile::of(target).score(candidate)
}

/// Candidates scoring at least [`MATCH_THRESHOLD`], in input order, never
/// including the target itself.
pub fn find_matches<'a>(target: &StudyGroup, candidates: &'a [StudyGroup]) -> Vec<&'a StudyGroup> {
    let profile = Profile::of(target);
    candidates
        .iter()
        .filter(|candidate| candidate.id != target.id)
        .filter(|candidate| {
            let score = profile.score(candidate);
            tracing::trace!(
                target = %target.id,
                candidate = %candidate.id,
                score = score.total(),
                "scored candidate"
            );
            score.is_match()
        })
        .collect()
}
