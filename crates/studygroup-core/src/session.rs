//! Session facade.
//!
//! A [`Session`] owns every piece of per-user state: the group store, progress
//! records, streak, suggestion cache and event buffer. There are no globals;
//! a host serving several users keeps one session per user.

use chrono::Duration;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{NotFoundError, Result};
use crate::events::Event;
use crate::export::HistoryRecord;
use crate::group::{GroupId, GroupStore, StudyGroup};
use crate::matching::find_matches;
use crate::progress::{ProgressRecord, ProgressTracker, DEFAULT_SUBGOALS};
use crate::storage::Config;
use crate::streak::{StreakEngine, StreakState, StreakUpdate};
use crate::suggestion::{suggest, SuggestionCache, SuggestionCategory};
use crate::time::{starts_within, Clock, Countdown, SystemClock};

/// Per-session settings, usually taken from [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub subgoals: Vec<String>,
    pub reminder_lead: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            subgoals: DEFAULT_SUBGOALS.iter().map(|s| s.to_string()).collect(),
            reminder_lead: Duration::seconds(300),
        }
    }
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            subgoals: config.effective_subgoals(),
            reminder_lead: config.reminder_lead(),
        }
    }
}

/// Number of history entries per subject, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectCount {
    pub subject: String,
    pub count: usize,
}

pub struct Session<C: Clock = SystemClock> {
    clock: C,
    options: SessionOptions,
    store: GroupStore,
    progress: ProgressTracker,
    streak: StreakEngine,
    suggestions: SuggestionCache,
    events: Vec<Event>,
}

impl Session<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for Session<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Session<C> {
    pub fn with_clock(clock: C) -> Self {
        Self::with_options(clock, SessionOptions::default())
    }

    pub fn with_options(clock: C, options: SessionOptions) -> Self {
        Self {
            clock,
            options,
            store: GroupStore::new(),
            progress: ProgressTracker::new(),
            streak: StreakEngine::new(),
            suggestions: SuggestionCache::new(),
            events: Vec::new(),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    // ---- groups ----

    /// Create a group with the configured subgoals, all unset.
    pub fn create_group(&mut self, subject: &str, goal: &str, free_time: &str) -> Result<StudyGroup> {
        let now = self.clock.now();
        let group = self.store.create(subject, goal, free_time, now)?;
        self.progress.init(group.id, self.options.subgoals.iter().cloned());
        tracing::debug!(group_id = %group.id, subject = %group.subject, "group created");
        self.events.push(Event::GroupCreated {
            group_id: group.id,
            subject: group.subject.clone(),
            at: now,
        });
        Ok(group)
    }

    /// Remove a group from the active set along with its progress. History
    /// keeps it. Removing an unknown id is a no-op.
    pub fn remove_group(&mut self, id: &GroupId) -> Option<StudyGroup> {
        let removed = self.store.remove(id)?;
        self.progress.remove(id);
        tracing::debug!(group_id = %id, "group removed");
        self.events.push(Event::GroupRemoved {
            group_id: *id,
            at: self.clock.now(),
        });
        Some(removed)
    }

    pub fn group(&self, id: &GroupId) -> Result<&StudyGroup> {
        self.store
            .get(id)
            .ok_or_else(|| NotFoundError::Group { id: *id }.into())
    }

    pub fn list_active(&self) -> &[StudyGroup] {
        self.store.list_active()
    }

    pub fn list_history(&self) -> &[StudyGroup] {
        self.store.list_history()
    }

    pub fn search(&self, query: &str) -> Vec<&StudyGroup> {
        self.store.search(query)
    }

    // ---- progress ----

    /// Set a subgoal flag, then run the daily completion check.
    pub fn set_task_status(&mut self, id: &GroupId, task: &str, done: bool) -> Result<StreakUpdate> {
        self.progress.set_task_status(id, task, done)?;
        tracing::debug!(group_id = %id, task, done, "task status changed");
        self.events.push(Event::TaskStatusChanged {
            group_id: *id,
            task: task.to_string(),
            done,
            at: self.clock.now(),
        });
        self.record_completion_check(id)
    }

    pub fn progress(&self, id: &GroupId) -> Result<&ProgressRecord> {
        self.progress.record(id)
    }

    pub fn completion_ratio(&self, id: &GroupId) -> Result<f64> {
        self.progress.completion_ratio(id)
    }

    pub fn is_fully_complete(&self, id: &GroupId) -> Result<bool> {
        self.progress.is_fully_complete(id)
    }

    // ---- streak ----

    /// Advance the streak if `id` is fully complete and today has not been
    /// counted yet.
    pub fn record_completion_check(&mut self, id: &GroupId) -> Result<StreakUpdate> {
        let complete = self.progress.is_fully_complete(id)?;
        let today = self.clock.today();
        let update = self.streak.record_completion_check(complete, today);
        if update.streak_incremented {
            self.events.push(Event::StreakAdvanced {
                group_id: *id,
                day: today,
                streak: update.new_streak,
                total_score: update.new_score,
                at: self.clock.now(),
            });
        }
        Ok(update)
    }

    /// Run the completion check for every active group.
    ///
    /// A group left fully complete from an earlier day counts towards today
    /// the next time the board is refreshed.
    pub fn sweep_completions(&mut self) -> StreakUpdate {
        let ids: Vec<GroupId> = self.store.list_active().iter().map(|g| g.id).collect();
        let mut incremented = false;
        for id in &ids {
            if let Ok(update) = self.record_completion_check(id) {
                incremented |= update.streak_incremented;
            }
        }
        let state = self.streak.snapshot();
        StreakUpdate {
            streak_incremented: incremented,
            new_streak: state.streak,
            new_score: state.total_score,
        }
    }

    pub fn streak(&self) -> StreakState {
        self.streak.snapshot()
    }

    // ---- matching & suggestions ----

    /// Active groups similar to `id`.
    pub fn matches_for(&self, id: &GroupId) -> Result<Vec<&StudyGroup>> {
        let target = self.group(id)?;
        Ok(find_matches(target, self.store.list_active()))
    }

    /// Suggestion text for an active group, computed once and then served
    /// from cache. Removed groups are not found even though their cache entry
    /// stays.
    pub fn suggestion_for(&mut self, id: &GroupId) -> Result<String> {
        let group = self.group(id)?;
        if let Some(text) = self.suggestions.get(id) {
            return Ok(text.to_string());
        }

        let category = SuggestionCategory::classify(&group.subject);
        let text = suggest(&group.subject, &group.goal);
        let text = self.suggestions.get_or_insert_with(*id, || text).to_string();
        tracing::debug!(group_id = %id, ?category, "suggestion cached");
        self.events.push(Event::SuggestionGenerated {
            group_id: *id,
            category,
            at: self.clock.now(),
        });
        Ok(text)
    }

    pub fn cached_suggestion(&self, id: &GroupId) -> Option<&str> {
        self.suggestions.get(id)
    }

    // ---- time ----

    pub fn countdown(&self, id: &GroupId) -> Result<Countdown> {
        let group = self.group(id)?;
        Ok(Countdown::until(&group.free_time, self.clock.now()))
    }

    /// Active groups starting within the reminder lead time.
    pub fn upcoming_reminders(&self) -> Vec<&StudyGroup> {
        let now = self.clock.now();
        self.store
            .list_active()
            .iter()
            .filter(|g| starts_within(&g.free_time, now, self.options.reminder_lead))
            .collect()
    }

    // ---- history ----

    pub fn subject_tally(&self) -> Vec<SubjectCount> {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for group in self.store.list_history() {
            *counts.entry(group.subject.as_str()).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .map(|(subject, count)| SubjectCount {
                subject: subject.to_string(),
                count,
            })
            .collect()
    }

    pub fn export_history(&self) -> Vec<HistoryRecord> {
        self.store.list_history().iter().map(HistoryRecord::from).collect()
    }

    /// Take all events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
