//! Canned study advice keyed by subject keywords.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::group::GroupId;

/// Subject families with a dedicated template, in lookup order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionCategory {
    Math,
    Physics,
    ComputerScience,
    Chemistry,
    Biology,
}

impl SuggestionCategory {
    pub const ALL: [SuggestionCategory; 5] = [
        SuggestionCategory::Math,
        SuggestionCategory::Physics,
        SuggestionCategory::ComputerScience,
        SuggestionCategory::Chemistry,
        SuggestionCategory::Biology,
    ];

    /// Lowercase substrings that select this category.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            SuggestionCategory::Math => &["math"],
            SuggestionCategory::Physics => &["physics"],
            SuggestionCategory::ComputerScience => &["cs", "computer", "coding"],
            SuggestionCategory::Chemistry => &["chemistry"],
            SuggestionCategory::Biology => &["biology"],
        }
    }

    pub fn template(&self) -> &'static str {
        match self {
            SuggestionCategory::Math => {
                "1. Review key formulas and theorems relevant to your goal.\n\
                 2. Solve 3-5 practice problems with increasing difficulty.\n\
                 3. Summarize mistakes and retry incorrect ones after 10 minutes."
            }
            SuggestionCategory::Physics => {
                "1. Revisit key physical laws and their derivations.\n\
                 2. Solve conceptual and numerical questions from your syllabus.\n\
                 3. Watch a short visual explanation of the topic."
            }
            SuggestionCategory::ComputerScience => {
                "1. Write a short program related to your topic.\n\
                 2. Review concepts with flashcards or spaced repetition.\n\
                 3. Debug past code errors and document your learnings."
            }
            SuggestionCategory::Chemistry => {
                "1. Draw and review reaction mechanisms or chemical equations.\n\
                 2. Practice balancing equations and solving numericals.\n\
                 3. Create summary tables for periodic trends or compound types."
            }
            SuggestionCategory::Biology => {
                "1. Diagram key biological processes (e.g., photosynthesis).\n\
                 2. Use memory tricks to recall terminology and classifications.\n\
                 3. Review textbook summary points and quiz yourself."
            }
        }
    }

    /// First category whose keyword occurs in `subject`, ignoring case.
    pub fn classify(subject: &str) -> Option<SuggestionCategory> {
        let subject = subject.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.keywords().iter().any(|kw| subject.contains(kw)))
    }
}

fn fallback(goal: &str) -> String {
    format!(
        "1. Break your study goal '{goal}' into 3 small tasks and complete one now.\n\
         2. Spend 20 focused minutes on any material you've been avoiding.\n\
         3. Write a 3-point summary of what you learned at the end of the session."
    )
}

/// Study advice for a subject. Pure: equal inputs give equal output.
pub fn suggest(subject: &str, goal: &str) -> String {
    match SuggestionCategory::classify(subject) {
        Some(category) => category.template().to_string(),
        None => fallback(goal),
    }
}

/// Memoized suggestion text per group.
#[derive(Debug, Default)]
pub struct SuggestionCache {
    entries: HashMap<GroupId, String>,
}

impl SuggestionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &GroupId) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    pub fn get_or_insert_with<F>(&mut self, id: GroupId, compute: F) -> &str
    where
        F: FnOnce() -> String,
    {
        self.entries.entry(id).or_insert_with(compute)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
