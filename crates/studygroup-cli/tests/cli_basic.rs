//! Basic CLI E2E tests.
//!
//! Tests run the built binary with HOME pointed at a temporary directory so
//! the config file never touches the real home.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use tempfile::TempDir;

/// Run a CLI command, optionally feeding stdin, and return (stdout, stderr, code).
fn run_cli(home: &TempDir, args: &[&str], stdin: &str) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_studygroup-cli"))
        .args(args)
        .env("HOME", home.path())
        .env_remove("STUDYGROUP_ENV")
        .env_remove("STUDYGROUP_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");

    let output = child.wait_with_output().expect("Failed to wait for CLI");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("each line is JSON"))
        .collect()
}

#[test]
fn test_suggest_physics() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(
        &home,
        &["suggest", "--subject", "Physics", "--goal", "anything"],
        "",
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("physical laws"));
}

#[test]
fn test_stateless_commands_leave_home_untouched() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(
        &home,
        &["suggest", "--subject", "Math", "--goal", "anything"],
        "",
    );
    assert_eq!(code, 0);
    assert!(stderr.is_empty(), "stderr: {stderr}");
    assert!(!home.path().join(".config").exists());
}

#[test]
fn test_broken_config_warns_and_falls_back() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join(".config/studygroup");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "reminder_lead_secs = \"soon\"").unwrap();

    let (stdout, stderr, code) = run_cli(&home, &["shell"], "streak\n");
    assert_eq!(code, 0);
    assert!(stderr.contains("warning:"), "stderr: {stderr}");
    assert_eq!(json_lines(&stdout)[0]["streak"], 0);
}

#[test]
fn test_suggest_fallback_quotes_goal() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&home, &["suggest", "--subject", "Art", "--goal", "x"], "");
    assert_eq!(code, 0);
    assert!(stdout.contains("'x'"));
}

#[test]
fn test_match_score() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(
        &home,
        &[
            "match-score",
            "--subject", "Math",
            "--goal", "Exam prep",
            "--free-time", "2026-10-19 18:00:00",
            "--other-subject", "Mathematics",
            "--other-goal", "Exam preparation",
            "--other-free-time", "2026-10-19 18:00:00",
        ],
        "",
    );
    assert_eq!(code, 0);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["total"], 3);
    assert_eq!(report["is_match"], true);
}

#[test]
fn test_match_score_rejects_empty_field() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(
        &home,
        &[
            "match-score",
            "--subject", "",
            "--goal", "g",
            "--free-time", "t",
            "--other-subject", "s",
            "--other-goal", "g",
            "--other-free-time", "t",
        ],
        "",
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("'subject' must not be empty"));
}

#[test]
fn test_config_set_get_reset() {
    let home = TempDir::new().unwrap();
    let (_, _, code) = run_cli(&home, &["config", "set", "reminder_lead_secs", "600"], "");
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(&home, &["config", "get", "reminder_lead_secs"], "");
    assert_eq!(stdout.trim(), "600");
    assert!(home.path().join(".config/studygroup/config.toml").exists());

    let (_, _, code) = run_cli(&home, &["config", "reset"], "");
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(&home, &["config", "get", "reminder_lead_secs"], "");
    assert_eq!(stdout.trim(), "300");

    let (_, stderr, code) = run_cli(&home, &["config", "get", "theme"], "");
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_shell_session() {
    let home = TempDir::new().unwrap();
    let script = "\
create --subject Chemistry --goal 'ace the quiz' --free-time '2026-10-19 09:00:00'
create --subject Chem --goal 'quiz prep' --free-time '2026-10-19 09:30:00'
streak
";
    let (stdout, stderr, code) = run_cli(&home, &["shell", "--now", "2026-10-19 09:00:00"], script);
    assert_eq!(code, 0, "stderr: {stderr}");
    let lines = json_lines(&stdout);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["subject"], "Chemistry");
    assert_eq!(lines[1]["subject"], "Chem");
    assert_eq!(lines[2]["streak"], 0);
}

/// Drives one shell process a line at a time so later commands can use the
/// ids returned by earlier ones.
struct ShellDriver {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl ShellDriver {
    fn start(home: &TempDir, now: &str) -> Self {
        let mut child = Command::new(env!("CARGO_BIN_EXE_studygroup-cli"))
            .args(["shell", "--now", now])
            .env("HOME", home.path())
            .env_remove("STUDYGROUP_ENV")
            .env_remove("STUDYGROUP_LOG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to spawn shell");
        let stdin = child.stdin.take().expect("stdin is piped");
        let stdout = BufReader::new(child.stdout.take().expect("stdout is piped"));
        Self {
            child,
            stdin,
            stdout,
        }
    }

    /// Send a command that succeeds and read its JSON line.
    fn send(&mut self, line: &str) -> serde_json::Value {
        writeln!(self.stdin, "{line}").expect("Failed to write command");
        self.stdin.flush().expect("Failed to flush command");
        let mut reply = String::new();
        self.stdout.read_line(&mut reply).expect("Failed to read reply");
        serde_json::from_str(&reply).unwrap_or_else(|e| panic!("bad reply to {line:?}: {e}: {reply:?}"))
    }

    fn finish(mut self) -> i32 {
        drop(self.stdin);
        self.child.wait().expect("shell exits").code().unwrap_or(-1)
    }
}

#[test]
fn test_shell_matches_tasks_and_streak() {
    let home = TempDir::new().unwrap();
    let mut shell = ShellDriver::start(&home, "2026-10-19 09:00:00");

    let a = shell.send("create --subject Chemistry --goal 'ace the quiz' --free-time '2026-10-19 09:00:00'");
    let b = shell.send("create --subject Chem --goal 'quiz prep' --free-time '2026-10-19 09:30:00'");
    let a_id = a["id"].as_str().unwrap().to_string();
    let b_id = b["id"].as_str().unwrap().to_string();

    let listed = shell.send("list");
    assert_eq!(listed.as_array().unwrap().len(), 2);
    assert_eq!(listed[0]["id"], a_id.as_str());
    assert_eq!(listed[0]["short_id"], &a_id[..8]);

    let matches = shell.send(&format!("matches {a_id}"));
    assert_eq!(matches.as_array().unwrap().len(), 1);
    assert_eq!(matches[0]["id"], b_id.as_str());

    let mut last = serde_json::Value::Null;
    for task in ["Read material", "Take notes", "Practice problems"] {
        last = shell.send(&format!("task {a_id} '{task}' true"));
    }
    assert_eq!(last["ratio"], 1.0);
    assert_eq!(last["streak"]["streak_incremented"], true);
    assert_eq!(last["streak"]["new_score"], 100);

    let progress = shell.send(&format!("progress {a_id}"));
    assert_eq!(progress["complete"], true);
    assert_eq!(progress["tasks"]["Take notes"], true);

    for task in ["Read material", "Take notes", "Practice problems"] {
        last = shell.send(&format!("task {b_id} '{task}' yes"));
    }
    assert_eq!(last["streak"]["streak_incremented"], false);
    assert_eq!(shell.send("streak")["streak"], 1);

    let suggestion = shell.send(&format!("suggest {b_id}"));
    assert!(suggestion["text"].as_str().unwrap().contains("'quiz prep'"));

    let countdown = shell.send(&format!("countdown {b_id}"));
    assert_eq!(countdown["remaining_secs"], 1800);
    assert_eq!(countdown["countdown"], "00:30:00");

    assert_eq!(shell.send(&format!("remove {b_id}"))["removed"], true);
    assert_eq!(shell.send("search").as_array().unwrap().len(), 1);
    assert_eq!(shell.send("history").as_array().unwrap().len(), 2);

    let events = shell.send("events");
    let kinds: Vec<_> = events
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["type"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(kinds.iter().filter(|k| *k == "StreakAdvanced").count(), 1);
    assert_eq!(kinds.last().map(String::as_str), Some("GroupRemoved"));

    assert_eq!(shell.finish(), 0);
}

#[test]
fn test_shell_survives_errors() {
    let home = TempDir::new().unwrap();
    let script = "\
task 00000000-0000-0000-0000-000000000000 'Take notes' true
bogus
create --subject Math --goal '' --free-time today
reminders
tally
advance 90
now
quit
streak
";
    let (stdout, stderr, code) = run_cli(&home, &["shell", "--now", "2026-10-19 09:00:00"], script);
    assert_eq!(code, 0);
    assert!(stderr.contains("no active group"));
    assert!(stderr.contains("'goal' must not be empty"));
    assert!(stderr.contains("bogus"));
    let lines = json_lines(&stdout);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], serde_json::json!([]));
    assert_eq!(lines[3]["now"], "2026-10-19T10:30:00");
}

#[test]
fn test_shell_export_is_csv() {
    let home = TempDir::new().unwrap();
    let script = "\
create --subject 'Math, Applied' --goal Exam --free-time '2026-10-19 18:00:00'
export
";
    let (stdout, _, code) = run_cli(&home, &["shell", "--now", "2026-10-19 09:00:00"], script);
    assert_eq!(code, 0);
    let mut lines = stdout.lines().skip(1);
    assert_eq!(lines.next(), Some("id,subject,goal,free_time,created_at"));
    let row = lines.next().unwrap();
    assert!(row.contains(",\"Math, Applied\",Exam,2026-10-19 18:00:00,2026-10-19 09:00:00"));
}

#[test]
fn test_shell_advance_needs_pinned_clock() {
    let home = TempDir::new().unwrap();
    let (stdout, stderr, code) = run_cli(&home, &["shell"], "advance 5\n");
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    assert!(stderr.contains("pinned clock"));
}
