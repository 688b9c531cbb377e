//! Study groups and the in-memory group store.
//!
//! The store keeps two lists: the active set, which the user can remove from,
//! and an append-only history of every group ever created.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, ValidationError};

/// Opaque, stable identifier of a study group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(Uuid);

impl GroupId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, enough to tell groups apart on screen.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for GroupId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// A user-created study session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyGroup {
    pub id: GroupId,
    pub subject: String,
    pub goal: String,
    /// Raw free-time text; see [`crate::time::parse_free_time`].
    pub free_time: String,
    pub created_at: NaiveDateTime,
}

/// Fields are stored exactly as given; only the empty string is rejected.
fn require(field: &'static str, value: &str) -> Result<String> {
    if value.is_empty() {
        return Err(ValidationError::EmptyField { field }.into());
    }
    Ok(value.to_string())
}

/// Active groups plus the full creation history.
#[derive(Debug, Default)]
pub struct GroupStore {
    active: Vec<StudyGroup>,
    history: Vec<StudyGroup>,
}

impl GroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a group and append it to both the active set and history.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first empty field.
    pub fn create(
        &mut self,
        subject: &str,
        goal: &str,
        free_time: &str,
        now: NaiveDateTime,
    ) -> Result<StudyGroup> {
        let subject = require("subject", subject)?;
        let goal = require("goal", goal)?;
        let free_time = require("free_time", free_time)?;

        let mut id = GroupId::new();
        while self.history.iter().any(|g| g.id == id) {
            id = GroupId::new();
        }

        let group = StudyGroup {
            id,
            subject,
            goal,
            free_time,
            created_at: now.with_nanosecond(0).unwrap_or(now),
        };
        self.active.push(group.clone());
        self.history.push(group.clone());
        Ok(group)
    }

    /// Drop a group from the active set. Returns the removed group, if any.
    pub fn remove(&mut self, id: &GroupId) -> Option<StudyGroup> {
        let pos = self.active.iter().position(|g| &g.id == id)?;
        Some(self.active.remove(pos))
    }

    pub fn get(&self, id: &GroupId) -> Option<&StudyGroup> {
        self.active.iter().find(|g| &g.id == id)
    }

    pub fn list_active(&self) -> &[StudyGroup] {
        &self.active
    }

    pub fn list_history(&self) -> &[StudyGroup] {
        &self.history
    }

    /// Case-insensitive substring search over subject and free time.
    pub fn search(&self, query: &str) -> Vec<&StudyGroup> {
        let needle = query.to_lowercase();
        self.active
            .iter()
            .filter(|g| {
                g.subject.to_lowercase().contains(&needle)
                    || g.free_time.to_lowercase().contains(&needle)
            })
            .collect()
    }
}
