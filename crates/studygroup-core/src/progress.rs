//! Per-group subgoal tracking.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{NotFoundError, Result};
use crate::group::GroupId;

/// Subgoals every new group starts with unless configured otherwise.
pub const DEFAULT_SUBGOALS: [&str; 3] = ["Read material", "Take notes", "Practice problems"];

/// Ordered subgoal name to completion flag. The key set is closed after
/// construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressRecord {
    tasks: IndexMap<String, bool>,
}

impl ProgressRecord {
    /// All flags start unset. Duplicate names collapse into one subgoal.
    pub fn new<I, S>(subgoals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tasks: subgoals.into_iter().map(|s| (s.into(), false)).collect(),
        }
    }

    /// Returns false when `task` is not one of this record's subgoals.
    pub fn set(&mut self, task: &str, done: bool) -> bool {
        match self.tasks.get_mut(task) {
            Some(flag) => {
                *flag = done;
                true
            }
            None => false,
        }
    }

    pub fn is_done(&self, task: &str) -> Option<bool> {
        self.tasks.get(task).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.tasks.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn completed(&self) -> usize {
        self.tasks.values().filter(|done| **done).count()
    }

    pub fn ratio(&self) -> f64 {
        if self.tasks.is_empty() {
            return 0.0;
        }
        self.completed() as f64 / self.tasks.len() as f64
    }

    pub fn is_complete(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.values().all(|done| *done)
    }
}

/// Progress records for every active group.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    records: HashMap<GroupId, ProgressRecord>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init<I, S>(&mut self, group_id: GroupId, subgoals: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.records.insert(group_id, ProgressRecord::new(subgoals));
    }

    pub fn remove(&mut self, group_id: &GroupId) -> Option<ProgressRecord> {
        self.records.remove(group_id)
    }

    pub fn record(&self, group_id: &GroupId) -> Result<&ProgressRecord> {
        self.records
            .get(group_id)
            .ok_or_else(|| NotFoundError::Group { id: *group_id }.into())
    }

    /// Set one subgoal flag. No streak bookkeeping happens here.
    pub fn set_task_status(&mut self, group_id: &GroupId, task: &str, done: bool) -> Result<()> {
        let record = self
            .records
            .get_mut(group_id)
            .ok_or(NotFoundError::Group { id: *group_id })?;
        if !record.set(task, done) {
            return Err(NotFoundError::Task {
                group_id: *group_id,
                task: task.to_string(),
            }
            .into());
        }
        Ok(())
    }

    pub fn completion_ratio(&self, group_id: &GroupId) -> Result<f64> {
        Ok(self.record(group_id)?.ratio())
    }

    pub fn is_fully_complete(&self, group_id: &GroupId) -> Result<bool> {
        Ok(self.record(group_id)?.is_complete())
    }
}
