use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::group::GroupId;
use crate::suggestion::SuggestionCategory;

/// Every state change in a session produces an Event.
/// The presentation layer drains them after each action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    GroupCreated {
        group_id: GroupId,
        subject: String,
        at: NaiveDateTime,
    },
    GroupRemoved {
        group_id: GroupId,
        at: NaiveDateTime,
    },
    TaskStatusChanged {
        group_id: GroupId,
        task: String,
        done: bool,
        at: NaiveDateTime,
    },
    /// First full completion of the day.
    StreakAdvanced {
        group_id: GroupId,
        day: NaiveDate,
        streak: u32,
        total_score: u32,
        at: NaiveDateTime,
    },
    /// Suggestion text computed and cached for the first time.
    SuggestionGenerated {
        group_id: GroupId,
        category: Option<SuggestionCategory>,
        at: NaiveDateTime,
    },
}
