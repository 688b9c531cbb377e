//! Global daily streak and score.
//!
//! The streak advances on the first full completion of any group on a given
//! calendar day. It is shared by all groups in a session and never decays.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Score added each time the streak advances.
pub const COMPLETION_AWARD: u32 = 100;

/// Snapshot of the session-wide streak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub last_completed: Option<NaiveDate>,
    pub streak: u32,
    pub total_score: u32,
}

/// Result of a completion check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakUpdate {
    pub streak_incremented: bool,
    pub new_streak: u32,
    pub new_score: u32,
}

#[derive(Debug, Default)]
pub struct StreakEngine {
    state: StreakState,
}

impl StreakEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StreakState {
        self.state
    }

    /// Advance the streak if a group is fully complete and no completion has
    /// been counted for `today` yet.
    pub fn record_completion_check(&mut self, fully_complete: bool, today: NaiveDate) -> StreakUpdate {
        let advance = fully_complete && self.state.last_completed != Some(today);
        if advance {
            self.state.last_completed = Some(today);
            self.state.streak = self.state.streak.saturating_add(1);
            self.state.total_score = self.state.total_score.saturating_add(COMPLETION_AWARD);
            tracing::debug!(
                streak = self.state.streak,
                total_score = self.state.total_score,
                %today,
                "streak advanced"
            );
        }
        StreakUpdate {
            streak_incremented: advance,
            new_streak: self.state.streak,
            new_score: self.state.total_score,
        }
    }
}
