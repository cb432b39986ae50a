use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::types::{
    Age, ClientEmail, ClientId, ClientName, PhoneNumber, TrainingNote, TypeConstraintError,
};

/// Gender selection offered by the client form.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    #[default]
    Unspecified,
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 4] = [
        Gender::Unspecified,
        Gender::Male,
        Gender::Female,
        Gender::Other,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Gender::Unspecified => "unspecified",
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|gender| gender.as_str() == s.trim())
            .ok_or_else(|| TypeConstraintError::InvalidValue(s.to_string()))
    }
}

/// Fitness goal a client signs up with.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum FitnessGoal {
    WeightLoss,
    MuscleGain,
    Endurance,
    Flexibility,
    GeneralFitness,
}

impl FitnessGoal {
    pub const ALL: [FitnessGoal; 5] = [
        FitnessGoal::WeightLoss,
        FitnessGoal::MuscleGain,
        FitnessGoal::Endurance,
        FitnessGoal::Flexibility,
        FitnessGoal::GeneralFitness,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            FitnessGoal::WeightLoss => "weight-loss",
            FitnessGoal::MuscleGain => "muscle-gain",
            FitnessGoal::Endurance => "endurance",
            FitnessGoal::Flexibility => "flexibility",
            FitnessGoal::GeneralFitness => "general-fitness",
        }
    }
}

impl Display for FitnessGoal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitnessGoal {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FitnessGoal::ALL
            .into_iter()
            .find(|goal| goal.as_str() == s.trim())
            .ok_or_else(|| TypeConstraintError::InvalidValue(s.to_string()))
    }
}

/// One tracked gym member: profile plus session-planning data.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    /// Stable identifier; absent in records written by older versions.
    #[serde(default)]
    pub id: Option<ClientId>,
    pub full_name: ClientName,
    #[serde(default, deserialize_with = "deserialize_age")]
    pub age: Option<Age>,
    pub gender: Gender,
    pub email: ClientEmail,
    pub phone: PhoneNumber,
    pub goal: FitnessGoal,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub training_history: Vec<String>,
    #[serde(default)]
    pub next_exercises: Vec<String>,
}

/// Accepts the age as a number, a numeric string, an empty string or null.
///
/// Stored ages predate the whole-year rule, so fractional values are
/// truncated. Values that still fall outside the allowed range are read as
/// absent rather than rejecting the whole record.
fn deserialize_age<'de, D>(deserializer: D) -> Result<Option<Age>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAge {
        Number(f64),
        Text(String),
    }

    let years = match Option::<RawAge>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(RawAge::Number(years)) => years,
        Some(RawAge::Text(text)) if text.trim().is_empty() => return Ok(None),
        Some(RawAge::Text(text)) => match text.trim().parse::<f64>() {
            Ok(years) => years,
            Err(_) => {
                log::warn!("Ignoring unreadable stored age {text:?}");
                return Ok(None);
            }
        },
    };

    Ok(stored_age(years))
}

fn stored_age(years: f64) -> Option<Age> {
    if !years.is_finite() || years < 0.0 {
        log::warn!("Ignoring stored age {years}");
        return None;
    }
    // Whole years; `Age::new` rejects anything out of range.
    Age::new(years.trunc().min(f64::from(u32::MAX)) as u32)
        .map_err(|err| log::warn!("Ignoring stored age {years}: {err}"))
        .ok()
}

impl ClientRecord {
    /// Case-insensitive substring match against the client's name.
    pub fn name_matches(&self, query: &str) -> bool {
        self.full_name
            .as_str()
            .to_lowercase()
            .contains(&query.to_lowercase())
    }

    pub(crate) fn from_new(id: ClientId, new_client: NewClient) -> Self {
        Self {
            id: Some(id),
            full_name: new_client.full_name,
            age: new_client.age,
            gender: new_client.gender,
            email: new_client.email,
            phone: new_client.phone,
            goal: new_client.goal,
            start_date: new_client.start_date,
            training_history: Vec::new(),
            next_exercises: Vec::new(),
        }
    }

    pub fn push_history(&mut self, note: TrainingNote) {
        self.training_history.push(note.into_inner());
    }
}

/// Validated payload for creating a client record.
#[derive(Clone, Debug, PartialEq)]
pub struct NewClient {
    pub full_name: ClientName,
    pub age: Option<Age>,
    pub gender: Gender,
    pub email: ClientEmail,
    pub phone: PhoneNumber,
    pub goal: FitnessGoal,
    pub start_date: NaiveDate,
}

/// Replacement values for an existing client record.
///
/// `None` for the history or exercise lists keeps the stored value.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateClient {
    pub full_name: ClientName,
    pub age: Option<Age>,
    pub gender: Gender,
    pub email: ClientEmail,
    pub phone: PhoneNumber,
    pub goal: FitnessGoal,
    pub start_date: NaiveDate,
    pub training_history: Option<Vec<String>>,
    pub next_exercises: Option<Vec<String>>,
}

impl From<NewClient> for UpdateClient {
    fn from(value: NewClient) -> Self {
        Self {
            full_name: value.full_name,
            age: value.age,
            gender: value.gender,
            email: value.email,
            phone: value.phone,
            goal: value.goal,
            start_date: value.start_date,
            training_history: None,
            next_exercises: None,
        }
    }
}

impl UpdateClient {
    /// Produces the replacement record, carrying over the lists the update
    /// leaves out.
    pub fn apply_to(self, existing: &ClientRecord) -> ClientRecord {
        ClientRecord {
            id: existing.id,
            full_name: self.full_name,
            age: self.age,
            gender: self.gender,
            email: self.email,
            phone: self.phone,
            goal: self.goal,
            start_date: self.start_date,
            training_history: self
                .training_history
                .unwrap_or_else(|| existing.training_history.clone()),
            next_exercises: self
                .next_exercises
                .unwrap_or_else(|| existing.next_exercises.clone()),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn new_client(name: &str) -> NewClient {
        NewClient {
            full_name: ClientName::new(name).unwrap(),
            age: None,
            gender: Gender::Female,
            email: ClientEmail::new("jordan@example.com").unwrap(),
            phone: PhoneNumber::new("555-1234567").unwrap(),
            goal: FitnessGoal::WeightLoss,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }
}
