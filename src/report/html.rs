//! HTML rendering with inline styles, for email clients.

use std::fmt::Write;

use html_escape::encode_text;

use super::{Report, EMPTY_ROUTINE, REPORT_INTRO, REPORT_TITLE};

/// Render the HTML body.
pub fn render_html(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">"#);
    out.push('\n');
    let _ = writeln!(out, r#"<h2 style="color: #333;">📋 {REPORT_TITLE}</h2>"#);
    let _ = writeln!(out, "<p>{REPORT_INTRO}</p>");

    for routine in &report.routines {
        out.push_str(
            r#"<div style="background-color: #f4f4f4; padding: 10px; margin-top: 20px; border-radius: 5px;">"#,
        );
        out.push('\n');
        let _ = writeln!(
            out,
            r#"<h3 style="margin: 0; color: #222;">{}</h3>"#,
            encode_text(&routine.title)
        );
        if let Some(date) = routine.last_performed_label() {
            let _ = writeln!(out, r#"<span style="font-size: 12px; color: #666;">Last: {date}</span>"#);
        }
        out.push_str("</div>\n");

        if routine.recommendations.is_empty() {
            let _ = writeln!(out, r#"<p style="color: #666; font-size: 13px;">{EMPTY_ROUTINE}</p>"#);
            continue;
        }

        out.push_str(r#"<ul style="list-style-type: none; padding: 0;">"#);
        out.push('\n');
        for rec in &routine.recommendations {
            out.push_str(r#"<li style="padding: 10px 0; border-bottom: 1px solid #eee;">"#);
            let _ = write!(out, "<strong>{}</strong><br>", encode_text(&rec.exercise));
            let _ = write!(
                out,
                r#"<span style="color: #666; font-size: 13px;">Last: {}</span><br>"#,
                encode_text(&rec.summary)
            );
            let _ = write!(
                out,
                r#"<strong style="color: {}; font-size: 14px;">👉 {}</strong>: {}"#,
                rec.color(),
                rec.action.tag(),
                encode_text(&rec.detail)
            );
            out.push_str("</li>\n");
        }
        out.push_str("</ul>\n");
    }

    out.push_str("</div>\n");
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

    fn report(exercises: Vec<Exercise>) -> Report {
        let workout = Workout {
            id: None,
            title: Some("Push & Pull <A>".to_string()),
            start_time: Some("2024-05-09T10:00:00Z".to_string()),
            exercises: Some(exercises),
        };
        let engine = ProgressionEngine::new(ProgressionConfig {
            unit: WeightUnit::Kilograms,
            ..ProgressionConfig::default()
        });
        Report::build(&RoutineSnapshot::group(vec![workout]), &engine, Utc::now())
    }

    fn exercise(title: &str, set: WorkoutSet) -> Exercise {
        Exercise { title: Some(title.to_string()), sets: Some(vec![set]) }
    }

    #[test]
    fn test_render_html_escapes_titles() {
        let html = render_html(&report(vec![exercise("Curl <EZ>", WorkoutSet::new(8, 20.0, Some(7.0)))]));
        assert!(html.contains("Push &amp; Pull &lt;A&gt;"));
        assert!(html.contains("<strong>Curl &lt;EZ&gt;</strong>"));
        assert!(!html.contains("<EZ>"));
    }

    #[test]
    fn test_render_html_colors_follow_action() {
        let html = render_html(&report(vec![
            exercise("Squat", WorkoutSet::new(12, 100.0, Some(8.0))),
            exercise("Row", WorkoutSet::new(8, 40.0, Some(7.0))),
            exercise("Deadlift", WorkoutSet::new(5, 60.0, Some(9.5))),
            exercise("Curl", WorkoutSet::new(10, 30.0, Some(9.0))),
        ]));

        assert!(html.contains(r#"<strong style="color: green; font-size: 14px;">👉 INCREASE WEIGHT</strong>"#));
        assert!(html.contains(r#"<strong style="color: blue; font-size: 14px;">👉 ADD REPS</strong>"#));
        assert!(html.contains(r#"<strong style="color: red; font-size: 14px;">👉 DELOAD</strong>: Performance dip. Drop to 54 kg to rebuild volume."#));
        assert!(html.contains(r#"<strong style="color: black; font-size: 14px;">👉 MAINTAIN</strong>"#));
        assert!(html.contains("Last: May 09"));
    }

    #[test]
    fn test_render_html_empty_routine() {
        let html = render_html(&report(vec![exercise("Plank", WorkoutSet::default())]));
        assert!(html.contains(EMPTY_ROUTINE));
        assert!(!html.contains("<ul"));
        assert!(!html.contains("Plank"));
    }
}
