//! # Study Group Core Library
//!
//! This library provides the domain logic for the study group organizer.
//! Any presentation layer (the bundled CLI, a web front end) is a thin shell
//! over the same [`Session`].
//!
//! ## Architecture
//!
//! - **Group Store**: active groups plus an append-only creation history
//! - **Progress Tracker**: closed, ordered subgoal checklist per group
//! - **Streak Engine**: one global streak that advances at most once per day
//! - **Matching Engine**: 0-3 point similarity, matches at two points or more
//! - **Suggestion Engine**: subject keyword to canned study advice, cached per group
//! - **Export**: flat history records and their comma-separated form
//!
//! All state is in memory and owned by one [`Session`] value; nothing is
//! shared between sessions.

pub mod error;
pub mod events;
pub mod export;
pub mod group;
pub mod matching;
pub mod progress;
pub mod session;
pub mod storage;
pub mod streak;
pub mod suggestion;
pub mod time;

pub use error::{
    ConfigError, CoreError, ExportError, FreeTimeError, NotFoundError, Result, ValidationError,
};
pub use events::Event;
pub use export::{from_csv, to_csv, HistoryRecord};
pub use group::{GroupId, GroupStore, StudyGroup};
pub use matching::{find_matches, match_score, MatchScore, MATCH_THRESHOLD, TIME_WINDOW_SECS};
pub use progress::{ProgressRecord, ProgressTracker, DEFAULT_SUBGOALS};
pub use session::{Session, SessionOptions, SubjectCount};
pub use storage::Config;
pub use streak::{StreakEngine, StreakState, StreakUpdate, COMPLETION_AWARD};
pub use suggestion::{suggest, SuggestionCache, SuggestionCategory};
pub use time::{parse_free_time, Clock, Countdown, ManualClock, SystemClock};
