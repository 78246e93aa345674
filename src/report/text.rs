//! Plain-text rendering.

use std::fmt::Write;

use super::{Report, EMPTY_ROUTINE, REPORT_INTRO, REPORT_TITLE};

/// Render the plain-text body.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", REPORT_TITLE.to_uppercase());
    let _ = writeln!(out, "{REPORT_INTRO}");
    out.push('\n');

    for routine in &report.routines {
        match routine.last_performed_label() {
            Some(date) => {
                let _ = writeln!(out, "=== {} (Last: {date}) ===", routine.title);
            }
            None => {
                let _ = writeln!(out, "=== {} ===", routine.title);
            }
        }

        if routine.recommendations.is_empty() {
            let _ = writeln!(out, "{EMPTY_ROUTINE}");
        }

        for rec in &routine.recommendations {
            let _ = writeln!(out, "[{}] {}: {}", rec.exercise, rec.action.tag(), rec.detail);
            let _ = writeln!(out, "    Last: {}", rec.summary);
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::core::{
        Exercise, ProgressionConfig, ProgressionEngine, RoutineSnapshot, WeightUnit, Workout,
        WorkoutSet,
    };

    fn report(unit: WeightUnit) -> Report {
        let workouts = vec![
            Workout {
                id: None,
                title: Some("Push Day".to_string()),
                start_time: Some("2024-05-09T10:00:00Z".to_string()),
                exercises: Some(vec![
                    Exercise {
                        title: Some("Bench Press".to_string()),
                        sets: Some(vec![WorkoutSet::new(12, 50.0, Some(8.0))]),
                    },
                    Exercise { title: Some("Plank".to_string()), sets: Some(vec![WorkoutSet::default()]) },
                ]),
            },
            Workout {
                id: None,
                title: Some("Cardio".to_string()),
                start_time: None,
                exercises: Some(vec![]),
            },
        ];
        let engine = ProgressionEngine::new(ProgressionConfig { unit, ..ProgressionConfig::default() });
        Report::build(&RoutineSnapshot::group(workouts), &engine, Utc::now())
    }

    #[test]
    fn test_render_text_layout() {
        let text = render_text(&report(WeightUnit::Pounds));
        let expected = "\
YOUR WORKOUT MENU
Targets calculated for your next session of each routine.

=== Push Day (Last: May 09) ===
[Bench Press] INCREASE WEIGHT: Add 5 lbs. New Target: 115.2 lbs.
    Last: 12 reps @ 110.2 lbs (RPE 8)

=== Cardio ===
No weighted sets to progress.

";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_text_omits_skipped_exercises() {
        let text = render_text(&report(WeightUnit::Kilograms));
        assert!(text.contains("[Bench Press] INCREASE WEIGHT: Add 2.5 kg. New Target: 52.5 kg."));
        assert!(!text.contains("Plank"));
    }
}
