//! Routine grouping.
//!
//! Workouts arrive newest-first. Each routine title keeps the first workout
//! seen for it; later (older) ones are dropped, never merged.

use std::collections::HashMap;

use super::workout::Workout;

/// The latest workout of each routine, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct RoutineSnapshot {
    routines: Vec<(String, Workout)>,
    index: HashMap<String, usize>,
}

impl RoutineSnapshot {
    /// Group newest-first workouts by title.
    pub fn group<I>(workouts: I) -> Self
    where
        I: IntoIterator<Item = Workout>,
    {
        let mut snapshot = Self::default();
        for workout in workouts {
            snapshot.insert(workout);
        }
        snapshot
    }

    /// Record `workout` unless its routine already has one. Returns whether it was kept.
    pub fn insert(&mut self, workout: Workout) -> bool {
        let title = workout.title().to_string();
        if self.index.contains_key(&title) {
            tracing::debug!(title = %title, "Ignoring older workout for routine");
            return false;
        }

        self.index.insert(title.clone(), self.routines.len());
        self.routines.push((title, workout));
        true
    }

    /// Latest workout for a routine title.
    pub fn get(&self, title: &str) -> Option<&Workout> {
        self.index.get(title).map(|&i| &self.routines[i].1)
    }

    /// Routines in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Workout)> {
        self.routines.iter().map(|(title, workout)| (title.as_str(), workout))
    }

    /// Routine titles in first-seen order.
    pub fn titles(&self) -> Vec<&str> {
        self.routines.iter().map(|(title, _)| title.as_str()).collect()
    }

    /// Number of routines.
    pub fn len(&self) -> usize {
        self.routines.len()
    }

    /// Whether no routine was found.
    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }
}
