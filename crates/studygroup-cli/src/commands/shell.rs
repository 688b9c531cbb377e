//! Line-driven session shell.
//!
//! Each stdin line is one command, parsed with the same clap machinery as the
//! top-level CLI. Results are printed as one JSON document per line (the
//! `export` command prints CSV). Errors go to stderr and the shell keeps going;
//! state lives only as long as the process.

use std::io::{self, BufRead, Write};

use chrono::{Duration, NaiveDateTime};
use clap::builder::BoolishValueParser;
use clap::error::ErrorKind;
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use studygroup_core::{
    parse_free_time, to_csv, Clock, Config, GroupId, ManualClock, ProgressRecord, Session,
    SessionOptions, StreakUpdate, StudyGroup, SystemClock,
};

#[derive(Args)]
pub struct ShellArgs {
    /// Pin the session clock (e.g. "2026-10-19 09:00:00"); enables `advance`
    #[arg(long)]
    pub now: Option<String>,
}

#[derive(Parser)]
#[command(no_binary_name = true, name = "shell")]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand)]
enum ShellCommand {
    /// Create a study group
    Create {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        goal: String,
        #[arg(long)]
        free_time: String,
    },
    /// Remove a group from the active set
    Remove { id: GroupId },
    /// List active groups
    List,
    /// List every group ever created
    History,
    /// Search active groups by subject or free time
    Search { query: Option<String> },
    /// Mark a subgoal done or not done
    Task {
        id: GroupId,
        name: String,
        #[arg(action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        done: bool,
    },
    /// Show a group's subgoals and completion ratio
    Progress { id: GroupId },
    /// Show the daily streak and score
    Streak,
    /// Re-run the completion check over all active groups
    Sweep,
    /// Groups similar to the given one
    Matches { id: GroupId },
    /// Study suggestions for a group
    Suggest { id: GroupId },
    /// Time left until a group's session
    Countdown { id: GroupId },
    /// Groups starting within the reminder lead time
    Reminders,
    /// History counts per subject
    Tally,
    /// History as comma-separated text
    Export,
    /// Drain recorded events
    Events,
    /// Move a pinned clock forward
    Advance { minutes: u32 },
    /// Show the session clock
    Now,
    /// Leave the shell
    Quit,
}

/// Clock chosen by `--now`.
enum ShellClock {
    System(SystemClock),
    Manual(ManualClock),
}

impl Clock for ShellClock {
    fn now(&self) -> NaiveDateTime {
        match self {
            ShellClock::System(clock) => clock.now(),
            ShellClock::Manual(clock) => clock.now(),
        }
    }
}

enum Output {
    Json(serde_json::Value),
    Text(String),
}

#[derive(Serialize)]
struct ProgressReport<'a> {
    group_id: GroupId,
    ratio: f64,
    complete: bool,
    tasks: &'a ProgressRecord,
}

/// A group with the abbreviated id shown on the board.
#[derive(Serialize)]
struct ListEntry<'a> {
    short_id: String,
    #[serde(flatten)]
    group: &'a StudyGroup,
}

#[derive(Serialize)]
struct TaskReport<'a> {
    group_id: GroupId,
    task: &'a str,
    done: bool,
    ratio: f64,
    streak: StreakUpdate,
}

/// Split a line into words, honouring single and double quotes and
/// backslash escapes.
pub(crate) fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some('"') if c == '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            Some(_) => current.push(c),
            None => match c {
                '"' | '\'' => {
                    quote = Some(c);
                    in_word = true;
                }
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                        in_word = true;
                    }
                }
                c if c.is_whitespace() => {
                    if in_word {
                        words.push(std::mem::take(&mut current));
                        in_word = false;
                    }
                }
                c => {
                    current.push(c);
                    in_word = true;
                }
            },
        }
    }

    if quote.is_some() {
        return Err("unterminated quote".into());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

fn execute(
    session: &mut Session<ShellClock>,
    command: ShellCommand,
) -> Result<Output, Box<dyn std::error::Error>> {
    let value = match command {
        ShellCommand::Create {
            subject,
            goal,
            free_time,
        } => serde_json::to_value(session.create_group(&subject, &goal, &free_time)?)?,
        ShellCommand::Remove { id } => {
            let removed = session.remove_group(&id).is_some();
            json!({ "id": id, "removed": removed })
        }
        ShellCommand::List => {
            let entries: Vec<ListEntry<'_>> = session
                .list_active()
                .iter()
                .map(|group| ListEntry {
                    short_id: group.id.short(),
                    group,
                })
                .collect();
            serde_json::to_value(entries)?
        }
        ShellCommand::History => serde_json::to_value(session.list_history())?,
        ShellCommand::Search { query } => {
            serde_json::to_value(session.search(query.as_deref().unwrap_or("")))?
        }
        ShellCommand::Task { id, name, done } => {
            let streak = session.set_task_status(&id, &name, done)?;
            serde_json::to_value(TaskReport {
                group_id: id,
                task: &name,
                done,
                ratio: session.completion_ratio(&id)?,
                streak,
            })?
        }
        ShellCommand::Progress { id } => {
            let record = session.progress(&id)?;
            serde_json::to_value(ProgressReport {
                group_id: id,
                ratio: record.ratio(),
                complete: record.is_complete(),
                tasks: record,
            })?
        }
        ShellCommand::Streak => serde_json::to_value(session.streak())?,
        ShellCommand::Sweep => serde_json::to_value(session.sweep_completions())?,
        ShellCommand::Matches { id } => serde_json::to_value(session.matches_for(&id)?)?,
        ShellCommand::Suggest { id } => {
            let text = session.suggestion_for(&id)?;
            json!({ "group_id": id, "text": text })
        }
        ShellCommand::Countdown { id } => {
            let countdown = session.countdown(&id)?;
            json!({
                "group_id": id,
                "countdown": countdown.to_string(),
                "remaining_secs": countdown.remaining_secs(),
            })
        }
        ShellCommand::Reminders => serde_json::to_value(session.upcoming_reminders())?,
        ShellCommand::Tally => serde_json::to_value(session.subject_tally())?,
        ShellCommand::Export => return Ok(Output::Text(to_csv(&session.export_history()))),
        ShellCommand::Events => serde_json::to_value(session.drain_events())?,
        ShellCommand::Advance { minutes } => match session.clock() {
            ShellClock::Manual(clock) => {
                clock.advance(Duration::minutes(i64::from(minutes)));
                json!({ "now": clock.now() })
            }
            ShellClock::System(_) => return Err("advance needs a pinned clock (--now)".into()),
        },
        ShellCommand::Now => json!({ "now": session.clock().now() }),
        ShellCommand::Quit => json!({}),
    };
    Ok(Output::Json(value))
}

pub fn run(args: ShellArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let clock = match args.now {
        Some(text) => ShellClock::Manual(ManualClock::new(parse_free_time(&text)?)),
        None => ShellClock::System(SystemClock),
    };
    let mut session = Session::with_options(clock, SessionOptions::from(config));
    tracing::info!(subgoals = ?session.options().subgoals, "shell session started");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let words = match split_words(line) {
            Ok(words) => words,
            Err(e) => {
                eprintln!("error: {e}");
                continue;
            }
        };
        let parsed = match ShellLine::try_parse_from(&words) {
            Ok(parsed) => parsed,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                write!(out, "{e}")?;
                continue;
            }
            Err(e) => {
                eprint!("{e}");
                continue;
            }
        };

        if matches!(parsed.command, ShellCommand::Quit) {
            break;
        }
        match execute(&mut session, parsed.command) {
            Ok(Output::Json(value)) => writeln!(out, "{value}")?,
            Ok(Output::Text(text)) => write!(out, "{text}")?,
            Err(e) => eprintln!("error: {e}"),
        }
        out.flush()?;
    }

    tracing::info!("shell session ended");
    Ok(())
}
