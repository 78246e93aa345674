//! Workout pagination.
//!
//! Two policies: a fixed page cap, or a rolling window of days that relies on
//! the API returning workouts newest first. Page failures end pagination and
//! whatever was collected so far is returned; they never surface as errors.

use chrono::{DateTime, Duration, Utc};

use super::hevy::WorkoutSource;
use crate::core::{FetchConfig, FetchMode, Workout};

/// How far back to page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPolicy {
    /// Up to `max_pages` pages
    Pages {
        /// Page cap
        max_pages: u32,
    },
    /// Workouts started at or after `cutoff`
    Since {
        /// Oldest start time kept
        cutoff: DateTime<Utc>,
        /// Page cap, so a misbehaving API cannot page forever
        max_pages: u32,
    },
}

impl FetchPolicy {
    /// Build the policy described by `config`, with windows ending at `now`.
    pub fn from_config(config: &FetchConfig, now: DateTime<Utc>) -> Self {
        match config.mode {
            FetchMode::Pages => Self::Pages { max_pages: config.max_pages },
            FetchMode::Window => Self::Since {
                cutoff: now - Duration::days(i64::from(config.window_days)),
                max_pages: config.window_max_pages,
            },
        }
    }

    fn max_pages(&self) -> u32 {
        match self {
            Self::Pages { max_pages } | Self::Since { max_pages, .. } => *max_pages,
        }
    }
}

/// Why pagination stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStop {
    /// The page cap was reached
    PageLimit,
    /// A page came back empty
    EmptyPage,
    /// The API reported no further pages
    LastPage,
    /// A workout older than the cutoff was seen
    Cutoff,
    /// A page request failed
    Failed {
        /// Page that failed
        page: u32,
        /// Error description
        error: String,
    },
}

/// Result of a fetch: workouts newest first, plus how it ended.
#[derive(Debug, Clone)]
pub struct FetchReport {
    /// Collected workouts, newest first
    pub workouts: Vec<Workout>,
    /// Pages that returned successfully
    pub pages_fetched: u32,
    /// Why pagination stopped
    pub stop: FetchStop,
}

impl FetchReport {
    /// Whether the very first page failed, so nothing could be retrieved.
    pub fn failed_outright(&self) -> bool {
        self.pages_fetched == 0 && matches!(self.stop, FetchStop::Failed { .. })
    }
}

/// Page through `source` according to `policy`.
pub fn fetch_workouts(source: &dyn WorkoutSource, policy: FetchPolicy, page_size: u32) -> FetchReport {
    let mut workouts = Vec::new();
    let mut pages_fetched = 0;

    for page_num in 1..=policy.max_pages() {
        let page = match source.workouts_page(page_num, page_size) {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(page = page_num, error = %e, "Workout page failed, stopping");
                return FetchReport {
                    workouts,
                    pages_fetched,
                    stop: FetchStop::Failed { page: page_num, error: e.to_string() },
                };
            }
        };
        pages_fetched += 1;

        if page.workouts.is_empty() {
            tracing::debug!(page = page_num, "Empty workouts page");
            return FetchReport { workouts, pages_fetched, stop: FetchStop::EmptyPage };
        }

        match policy {
            FetchPolicy::Pages { .. } => workouts.extend(page.workouts),
            FetchPolicy::Since { cutoff, .. } => {
                for workout in page.workouts {
                    let Some(started) = workout.started_at() else {
                        tracing::warn!(
                            title = workout.title(),
                            start_time = ?workout.start_time,
                            "Skipping workout with unparseable start time"
                        );
                        continue;
                    };

                    if started < cutoff {
                        tracing::debug!(%started, %cutoff, "Reached workouts older than the cutoff");
                        return FetchReport { workouts, pages_fetched, stop: FetchStop::Cutoff };
                    }
                    workouts.push(workout);
                }
            }
        }

        if page.page_count.is_some_and(|count| page_num >= count) {
            return FetchReport { workouts, pages_fetched, stop: FetchStop::LastPage };
        }
    }

    FetchReport { workouts, pages_fetched, stop: FetchStop::PageLimit }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use chrono::TimeZone;

    use super::*;
    use crate::integrations::hevy::{HevyError, HevyResult, WorkoutPage};

    /// Serves canned pages and records which pages were requested.
    struct FakeSource {
        pages: Vec<HevyResult<WorkoutPage>>,
        requested: RefCell<Vec<u32>>,
    }

    impl FakeSource {
        fn new(pages: Vec<HevyResult<WorkoutPage>>) -> Self {
            Self { pages, requested: RefCell::new(Vec::new()) }
        }
    }

    impl WorkoutSource for FakeSource {
        fn workouts_page(&self, page: u32, _page_size: u32) -> HevyResult<WorkoutPage> {
            self.requested.borrow_mut().push(page);
            match self.pages.get(page as usize - 1) {
                Some(Ok(p)) => Ok(p.clone()),
                Some(Err(e)) => Err(HevyError::Api { status: 500, message: e.to_string() }),
                None => Ok(WorkoutPage::default()),
            }
        }
    }

    fn workout(title: &str, start: &str) -> Workout {
        Workout {
            title: Some(title.to_string()),
            start_time: Some(start.to_string()),
            ..Workout::default()
        }
    }

    fn page(workouts: Vec<Workout>) -> HevyResult<WorkoutPage> {
        Ok(WorkoutPage { page: None, page_count: None, workouts })
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_page_policy_stops_at_cap() {
        let source = FakeSource::new(vec![
            page(vec![workout("A", "2024-05-09T10:00:00Z")]),
            page(vec![workout("B", "2024-05-08T10:00:00Z")]),
            page(vec![workout("C", "2024-05-07T10:00:00Z")]),
            page(vec![workout("D", "2024-05-06T10:00:00Z")]),
        ]);

        let report = fetch_workouts(&source, FetchPolicy::Pages { max_pages: 3 }, 10);
        assert_eq!(report.workouts.len(), 3);
        assert_eq!(report.pages_fetched, 3);
        assert_eq!(report.stop, FetchStop::PageLimit);
        assert_eq!(*source.requested.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn test_page_policy_stops_on_empty_page() {
        let source = FakeSource::new(vec![page(vec![workout("A", "2024-05-09T10:00:00Z")])]);

        let report = fetch_workouts(&source, FetchPolicy::Pages { max_pages: 3 }, 10);
        assert_eq!(report.workouts.len(), 1);
        assert_eq!(report.stop, FetchStop::EmptyPage);
        assert_eq!(*source.requested.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_failure_keeps_partial_results() {
        let source = FakeSource::new(vec![
            page(vec![workout("A", "2024-05-09T10:00:00Z")]),
            Err(HevyError::InvalidResponse("boom".to_string())),
            page(vec![workout("C", "2024-05-07T10:00:00Z")]),
        ]);

        let report = fetch_workouts(&source, FetchPolicy::Pages { max_pages: 3 }, 10);
        assert_eq!(report.workouts.len(), 1);
        assert_eq!(report.pages_fetched, 1);
        assert!(matches!(report.stop, FetchStop::Failed { page: 2, .. }));
        assert!(!report.failed_outright());
        assert_eq!(*source.requested.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_first_page_failure_is_outright() {
        let source = FakeSource::new(vec![Err(HevyError::Auth("bad key".to_string()))]);

        let report = fetch_workouts(&source, FetchPolicy::Pages { max_pages: 3 }, 10);
        assert!(report.workouts.is_empty());
        assert!(report.failed_outright());
    }

    #[test]
    fn test_stops_after_reported_last_page() {
        let source = FakeSource::new(vec![Ok(WorkoutPage {
            page: Some(1),
            page_count: Some(1),
            workouts: vec![workout("A", "2024-05-09T10:00:00Z")],
        })]);

        let report = fetch_workouts(&source, FetchPolicy::Pages { max_pages: 3 }, 10);
        assert_eq!(report.stop, FetchStop::LastPage);
        assert_eq!(*source.requested.borrow(), vec![1]);
    }

    #[test]
    fn test_window_policy_stops_at_first_old_workout() {
        let source = FakeSource::new(vec![
            page(vec![
                workout("A", "2024-05-09T10:00:00Z"),
                workout("B", "2024-05-03T12:00:00Z"),
            ]),
            page(vec![
                workout("C", "2024-05-03T11:59:59Z"),
                workout("D", "2024-05-08T10:00:00Z"),
            ]),
            page(vec![workout("E", "2024-05-01T10:00:00Z")]),
        ]);

        let config = FetchConfig { mode: FetchMode::Window, ..FetchConfig::default() };
        let policy = FetchPolicy::from_config(&config, now());
        let report = fetch_workouts(&source, policy, 10);

        let titles: Vec<&str> = report.workouts.iter().map(Workout::title).collect();
        // B sits exactly on the cutoff and is kept; D is never looked at.
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(report.stop, FetchStop::Cutoff);
        assert_eq!(*source.requested.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_window_policy_skips_unparseable_timestamps() {
        let source = FakeSource::new(vec![page(vec![
            workout("A", "not a date"),
            Workout { title: Some("B".to_string()), ..Workout::default() },
            workout("C", "2024-05-09T10:00:00Z"),
        ])]);

        let policy = FetchPolicy::Since {
            cutoff: now() - Duration::days(7),
            max_pages: 5,
        };
        let report = fetch_workouts(&source, policy, 10);

        let titles: Vec<&str> = report.workouts.iter().map(Workout::title).collect();
        assert_eq!(titles, vec!["C"]);
        assert_eq!(report.stop, FetchStop::EmptyPage);
    }

    #[test]
    fn test_malformed_records_on_first_page_are_skipped() {
        let first: WorkoutPage = serde_json::from_str(
            r#"{
                "page": 1,
                "page_count": 2,
                "workouts": [
                    {"title": "A", "start_time": "2024-05-09T10:00:00Z", "exercises": [
                        {"title": "Squat", "sets": [{"reps": 8.0, "weight_kg": 100, "rpe": 8}]}
                    ]},
                    {"title": "Bad", "start_time": "2024-05-08T10:00:00Z", "exercises": {"oops": 1}},
                    {"title": "B", "start_time": "2024-05-07T10:00:00Z", "exercises": [
                        {"title": "Row", "sets": [{"reps": "ten", "weight_kg": "60"}]}
                    ]}
                ]
            }"#,
        )
        .unwrap();
        let source = FakeSource::new(vec![
            Ok(first),
            page(vec![workout("C", "2024-05-06T10:00:00Z")]),
        ]);

        let report = fetch_workouts(&source, FetchPolicy::Pages { max_pages: 3 }, 10);

        let titles: Vec<&str> = report.workouts.iter().map(Workout::title).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
        assert!(!report.failed_outright());
        assert_eq!(report.pages_fetched, 2);

        let squat = report.workouts[0].exercises()[0].sets()[0];
        assert_eq!(squat.reps, Some(8));
        let row = report.workouts[1].exercises()[0].sets()[0];
        assert_eq!(row.reps, None);
        assert_eq!(row.weight_kg, Some(60.0));
    }

    #[test]
    fn test_policy_from_config() {
        assert_eq!(
            FetchPolicy::from_config(&FetchConfig::default(), now()),
            FetchPolicy::Pages { max_pages: 3 }
        );

        let config = FetchConfig { mode: FetchMode::Window, window_days: 7, ..FetchConfig::default() };
        assert_eq!(
            FetchPolicy::from_config(&config, now()),
            FetchPolicy::Since {
                cutoff: Utc.with_ymd_and_hms(2024, 5, 3, 12, 0, 0).unwrap(),
                max_pages: 20,
            }
        );
    }
}
