//! Exercise catalog entries and next-session suggestions.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Number of exercises suggested for a client's next session.
pub const SUGGESTION_COUNT: usize = 5;

/// Label used for catalog entries that carry no name.
pub const UNNAMED_EXERCISE: &str = "Unnamed exercise";

/// One entry of the external exercise catalog.
///
/// Only `name` is read; every other catalog field is ignored.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Exercise {
    #[serde(default)]
    pub name: Option<String>,
}

impl Exercise {
    /// Display name, falling back to [`UNNAMED_EXERCISE`].
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNNAMED_EXERCISE)
    }
}

/// Picks up to `count` exercise names uniformly at random.
pub fn pick_suggestions<R>(mut exercises: Vec<Exercise>, count: usize, rng: &mut R) -> Vec<String>
where
    R: Rng + ?Sized,
{
    exercises.shuffle(rng);
    exercises
        .iter()
        .take(count)
        .map(|exercise| exercise.display_name().to_string())
        .collect()
}

/// Outcome of resolving next-session exercises for the detail page.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "status", content = "exercises", rename_all = "snake_case")]
pub enum ExerciseSuggestions {
    /// The client already had suggestions; no catalog call was made.
    Saved(Vec<String>),
    /// Freshly picked from the catalog and stored with the client.
    Generated(Vec<String>),
    /// The catalog could not be loaded.
    Failed,
}

impl ExerciseSuggestions {
    /// Status line shown above the list.
    pub fn status_message(&self) -> &'static str {
        match self {
            ExerciseSuggestions::Saved(_) => {
                "Loaded previously suggested exercises for this client."
            }
            ExerciseSuggestions::Generated(_) => {
                "Suggested exercises have been saved for this client."
            }
            ExerciseSuggestions::Failed => "Failed to load exercises.",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn catalog(names: &[&str]) -> Vec<Exercise> {
        names
            .iter()
            .map(|name| Exercise {
                name: Some(name.to_string()),
            })
            .collect()
    }

    #[test]
    fn picks_five_distinct_names_from_catalog() {
        let names = ["Squat", "Plank", "Row", "Lunge", "Press", "Curl", "Dip", "Pull-up"];
        let picked = pick_suggestions(catalog(&names), SUGGESTION_COUNT, &mut rand::rng());

        assert_eq!(picked.len(), SUGGESTION_COUNT);
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), SUGGESTION_COUNT);
        assert!(picked.iter().all(|name| names.contains(&name.as_str())));
    }

    #[test]
    fn short_catalog_yields_everything() {
        let picked = pick_suggestions(catalog(&["Squat", "Plank"]), SUGGESTION_COUNT, &mut rand::rng());
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn missing_names_are_labelled() {
        let exercises = vec![Exercise::default()];
        let picked = pick_suggestions(exercises, SUGGESTION_COUNT, &mut rand::rng());
        assert_eq!(picked, vec![UNNAMED_EXERCISE]);
    }

    #[test]
    fn catalog_entries_deserialize_with_extra_fields() {
        let exercises: Vec<Exercise> = serde_json::from_str(
            r#"[{"id":"3_4_Sit-Up","name":"3/4 Sit-Up","force":"pull","level":"beginner",
                "primaryMuscles":["abdominals"],"images":[]},{"id":"x"}]"#,
        )
        .unwrap();

        assert_eq!(exercises[0].display_name(), "3/4 Sit-Up");
        assert_eq!(exercises[1].display_name(), UNNAMED_EXERCISE);
    }

    #[test]
    fn suggestions_serialize_with_their_status() {
        let value = serde_json::to_value(ExerciseSuggestions::Saved(vec!["Plank".into()])).unwrap();
        assert_eq!(value, serde_json::json!({"status": "saved", "exercises": ["Plank"]}));

        let value = serde_json::to_value(ExerciseSuggestions::Failed).unwrap();
        assert_eq!(value, serde_json::json!({"status": "failed"}));
    }
}
