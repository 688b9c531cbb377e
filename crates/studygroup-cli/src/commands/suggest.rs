//! One-shot commands that need no session state.

use clap::Args;
use serde::Serialize;
use studygroup_core::{match_score, suggest, Clock, GroupStore, MatchScore, SystemClock};

#[derive(Args)]
pub struct SuggestArgs {
    /// Group subject, e.g. "Physics"
    #[arg(long)]
    pub subject: String,
    /// Study goal, quoted back by the generic template
    #[arg(long)]
    pub goal: String,
}

#[derive(Args)]
pub struct MatchScoreArgs {
    #[arg(long)]
    pub subject: String,
    #[arg(long)]
    pub goal: String,
    #[arg(long)]
    pub free_time: String,
    #[arg(long)]
    pub other_subject: String,
    #[arg(long)]
    pub other_goal: String,
    #[arg(long)]
    pub other_free_time: String,
}

#[derive(Serialize)]
pub struct ScoreReport {
    #[serde(flatten)]
    pub score: MatchScore,
    pub total: u8,
    pub is_match: bool,
}

impl From<MatchScore> for ScoreReport {
    fn from(score: MatchScore) -> Self {
        Self {
            score,
            total: score.total(),
            is_match: score.is_match(),
        }
    }
}

pub fn run_suggest(args: SuggestArgs) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", suggest(&args.subject, &args.goal));
    Ok(())
}

pub fn run_match_score(args: MatchScoreArgs) -> Result<(), Box<dyn std::error::Error>> {
    let now = SystemClock.now();
    let mut store = GroupStore::new();
    let target = store.create(&args.subject, &args.goal, &args.free_time, now)?;
    let other = store.create(
        &args.other_subject,
        &args.other_goal,
        &args.other_free_time,
        now,
    )?;

    let report = ScoreReport::from(match_score(&target, &other));
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
