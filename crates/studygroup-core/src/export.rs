//! Flat history records and their comma-separated text form.
//!
//! Fields are written in the order `id, subject, goal, free_time, created_at`.
//! A field is quoted when it contains a comma, a quote or a line break, and
//! inner quotes are doubled.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::group::{GroupId, StudyGroup};

pub const HEADER: [&str; 5] = ["id", "subject", "goal", "free_time", "created_at"];

/// Layout used for `created_at` in exports.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One exported history row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: GroupId,
    pub subject: String,
    pub goal: String,
    pub free_time: String,
    pub created_at: NaiveDateTime,
}

impl From<&StudyGroup> for HistoryRecord {
    fn from(group: &StudyGroup) -> Self {
        Self {
            id: group.id,
            subject: group.subject.clone(),
            goal: group.goal.clone(),
            free_time: group.free_time.clone(),
            created_at: group.created_at,
        }
    }
}

fn push_field(out: &mut String, value: &str) {
    if value.contains(&[',', '"', '\n', '\r'][..]) {
        out.push('"');
        out.push_str(&value.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(value);
    }
}

/// Encode records with a header row. Every row ends with `\n`.
pub fn to_csv(records: &[HistoryRecord]) -> String {
    let mut out = HEADER.join(",");
    out.push('\n');

    for record in records {
        let created_at = record.created_at.format(CREATED_AT_FORMAT).to_string();
        let id = record.id.to_string();
        let fields = [
            id.as_str(),
            record.subject.as_str(),
            record.goal.as_str(),
            record.free_time.as_str(),
            created_at.as_str(),
        ];
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            push_field(&mut out, field);
        }
        out.push('\n');
    }

    out
}

// Split text into rows of fields, honouring quoted commas and line breaks.
fn parse_rows(input: &str) -> Result<Vec<Vec<String>>, ExportError> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(ExportError::UnterminatedQuote {
            row: rows.len() + 1,
        });
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    // blank lines
    rows.retain(|r| !(r.len() == 1 && r[0].is_empty()));
    Ok(rows)
}

/// Decode text produced by [`to_csv`].
pub fn from_csv(input: &str) -> Result<Vec<HistoryRecord>, ExportError> {
    let mut rows = parse_rows(input)?.into_iter();

    let header = rows.next().ok_or(ExportError::MissingHeader)?;
    if header != HEADER {
        return Err(ExportError::BadHeader {
            found: header.join(","),
        });
    }

    rows.enumerate()
        .map(|(i, row)| {
            let row_no = i + 2;
            let [id, subject, goal, free_time, created_at]: [String; 5] =
                row.try_into().map_err(|row: Vec<String>| ExportError::ColumnCount {
                    row: row_no,
                    expected: HEADER.len(),
                    found: row.len(),
                })?;

            let id: GroupId = id.parse().map_err(|_| ExportError::InvalidId {
                row: row_no,
                value: id.clone(),
            })?;
            let created_at = NaiveDateTime::parse_from_str(&created_at, CREATED_AT_FORMAT)
                .map_err(|_| ExportError::InvalidTimestamp {
                    row: row_no,
                    value: created_at.clone(),
                })?;

            Ok(HistoryRecord {
                id,
                subject,
                goal,
                free_time,
                created_at,
            })
        })
        .collect()
}
