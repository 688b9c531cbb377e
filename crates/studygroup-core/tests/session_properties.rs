use std::collections::HashSet;

use chrono::{Duration, NaiveDateTime};
use proptest::prelude::*;
use studygroup_core::{from_csv, to_csv, GroupId, HistoryRecord, ManualClock, Session};

const TASKS: [&str; 3] = ["Read material", "Take notes", "Practice problems"];

fn start() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2026-10-19 06:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
}

proptest! {
    #[test]
    fn ids_are_unique_and_history_grows_by_one(n in 1usize..40) {
        let mut session = Session::with_clock(ManualClock::new(start()));
        let mut seen = HashSet::new();
        for i in 0..n {
            let g = session.create_group(&format!("Subject {i}"), "goal", "today").unwrap();
            prop_assert!(seen.insert(g.id));
            prop_assert_eq!(session.list_history().len(), i + 1);
        }
    }

    #[test]
    fn ratio_is_monotone_when_only_setting_true(picks in prop::collection::vec(0usize..3, 0..12)) {
        let mut session = Session::with_clock(ManualClock::new(start()));
        let g = session.create_group("Math", "Exam", "today").unwrap();
        let mut last = session.completion_ratio(&g.id).unwrap();
        for pick in picks {
            session.set_task_status(&g.id, TASKS[pick], true).unwrap();
            let ratio = session.completion_ratio(&g.id).unwrap();
            prop_assert!(ratio >= last);
            prop_assert_eq!(ratio == 1.0, session.is_fully_complete(&g.id).unwrap());
            last = ratio;
        }
    }

    #[test]
    fn streak_moves_at_most_once_per_day(
        ops in prop::collection::vec((0usize..4, 0usize..3, any::<bool>()), 0..60),
        minutes in prop::collection::vec(0i64..18, 0..60),
    ) {
        let clock = ManualClock::new(start());
        let mut session = Session::with_clock(clock);
        let ids: Vec<GroupId> = (0..4)
            .map(|i| session.create_group(&format!("S{i}"), "g", "today").unwrap().id)
            .collect();

        for (i, (group, task, done)) in ops.into_iter().enumerate() {
            // At most 60 * 17 minutes past 06:00, so still the same day.
            if let Some(m) = minutes.get(i) {
                session.clock().advance(Duration::minutes(*m));
            }
            session.set_task_status(&ids[group], TASKS[task], done).unwrap();
            let state = session.streak();
            prop_assert!(state.streak <= 1);
            prop_assert!(state.total_score <= 100);
            prop_assert_eq!(state.total_score, state.streak * 100);
        }
    }

    #[test]
    fn csv_round_trip_preserves_text(
        rows in prop::collection::vec(("(?s).{0,24}", "(?s).{0,24}", "(?s).{0,24}", 0i64..86_400), 0..8)
    ) {
        let records: Vec<HistoryRecord> = rows
            .into_iter()
            .map(|(subject, goal, free_time, secs)| HistoryRecord {
                id: GroupId::new(),
                subject,
                goal,
                free_time,
                created_at: start() + Duration::seconds(secs),
            })
            .collect();
        let parsed = from_csv(&to_csv(&records)).unwrap();
        prop_assert_eq!(parsed, records);
    }
}
