//! Client add/edit form and its validation rules.

use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::client::{ClientRecord, FitnessGoal, Gender, NewClient};
use crate::domain::types::{
    Age, ClientEmail, ClientId, ClientName, EMAIL_PATTERN, PHONE_PATTERN, PhoneNumber,
};
use crate::forms::FormError;

const NAME_MESSAGE: &str = "Please enter a full name (at least 3 characters).";
const AGE_MESSAGE: &str = "Please enter a valid age between 10 and 100.";
const EMAIL_MESSAGE: &str = "Please enter a valid email address.";
const PHONE_MESSAGE: &str =
    "Please enter a valid phone number (8-15 digits; digits, spaces, and - allowed).";
const GENDER_MESSAGE: &str = "Please select a gender.";
const GOAL_MESSAGE: &str = "Please select a fitness goal.";
const START_DATE_MISSING_MESSAGE: &str = "Please choose a membership start date.";
const START_DATE_FUTURE_MESSAGE: &str = "Membership start date cannot be in the future.";

/// Fields in the order their violations are reported.
const FIELD_ORDER: [&str; 6] = ["full_name", "age", "email", "phone", "gender", "goal"];

#[derive(Clone, Debug, Default, Deserialize, Serialize, Validate)]
/// Form data for adding a client or saving an edited one.
pub struct ClientForm {
    /// Present only when an existing client is being edited.
    #[serde(default)]
    pub id: Option<ClientId>,
    #[serde(default)]
    #[validate(length(min = 3, message = "Please enter a full name (at least 3 characters)."))]
    pub full_name: String,
    /// Optional; blank means not provided.
    #[serde(default)]
    #[validate(custom(function = validate_age))]
    pub age: String,
    #[serde(default)]
    #[validate(custom(function = validate_gender))]
    pub gender: String,
    #[serde(default)]
    #[validate(regex(path = *EMAIL_PATTERN, message = "Please enter a valid email address."))]
    pub email: String,
    #[serde(default)]
    #[validate(regex(
        path = *PHONE_PATTERN,
        message = "Please enter a valid phone number (8-15 digits; digits, spaces, and - allowed)."
    ))]
    pub phone: String,
    #[serde(default)]
    #[validate(custom(function = validate_goal))]
    pub goal: String,
    /// ISO date (`YYYY-MM-DD`) as sent by a date input.
    #[serde(default)]
    pub start_date: String,
}

/// One rule the candidate record failed.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Violation {
    /// Form field to highlight.
    pub field: &'static str,
    pub message: Cow<'static, str>,
}

impl Violation {
    fn new(field: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_age(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    value
        .parse::<Age>()
        .map(|_| ())
        .map_err(|_| rule_error("age", AGE_MESSAGE))
}

fn validate_gender(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<Gender>()
        .map(|_| ())
        .map_err(|_| rule_error("gender", GENDER_MESSAGE))
}

fn validate_goal(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<FitnessGoal>()
        .map(|_| ())
        .map_err(|_| rule_error("goal", GOAL_MESSAGE))
}

fn fallback_message(field: &str) -> &'static str {
    match field {
        "full_name" => NAME_MESSAGE,
        "age" => AGE_MESSAGE,
        "email" => EMAIL_MESSAGE,
        "phone" => PHONE_MESSAGE,
        "gender" => GENDER_MESSAGE,
        _ => GOAL_MESSAGE,
    }
}

impl ClientForm {
    /// Copy with surrounding whitespace removed from the free-text fields.
    pub fn normalized(&self) -> Self {
        Self {
            id: self.id,
            full_name: self.full_name.trim().to_string(),
            age: self.age.trim().to_string(),
            gender: self.gender.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            goal: self.goal.trim().to_string(),
            start_date: self.start_date.trim().to_string(),
        }
    }

    /// Checks every rule and returns all violations, in form order.
    ///
    /// The start date is compared against `today` at day granularity.
    pub fn violations(&self, today: NaiveDate) -> Vec<Violation> {
        let normalized = self.normalized();
        let errors = normalized.validate().err().unwrap_or_else(ValidationErrors::new);
        let field_errors = errors.field_errors();

        let mut violations: Vec<Violation> = FIELD_ORDER
            .iter()
            .filter_map(|&field| {
                let error = field_errors.get(field)?.first()?;
                let message = error
                    .message
                    .clone()
                    .unwrap_or(Cow::Borrowed(fallback_message(field)));
                Some(Violation::new(field, message))
            })
            .collect();

        match NaiveDate::parse_from_str(&normalized.start_date, "%Y-%m-%d") {
            Err(_) => violations.push(Violation::new("start_date", START_DATE_MISSING_MESSAGE)),
            Ok(date) if date > today => {
                violations.push(Violation::new("start_date", START_DATE_FUTURE_MESSAGE))
            }
            Ok(_) => {}
        }

        violations
    }

    /// Validates the form and converts it into a typed [`NewClient`].
    pub fn to_new_client(&self, today: NaiveDate) -> Result<NewClient, FormError> {
        let violations = self.violations(today);
        if !violations.is_empty() {
            return Err(FormError::Invalid(violations));
        }

        let form = self.normalized();
        let age = if form.age.is_empty() {
            None
        } else {
            Some(form.age.parse::<Age>()?)
        };

        Ok(NewClient {
            full_name: ClientName::new(form.full_name)?,
            age,
            gender: form.gender.parse()?,
            email: ClientEmail::new(form.email)?,
            phone: PhoneNumber::new(form.phone)?,
            goal: form.goal.parse()?,
            start_date: NaiveDate::parse_from_str(&form.start_date, "%Y-%m-%d")
                .map_err(|_| FormError::InvalidDate)?,
        })
    }
}

impl From<&ClientRecord> for ClientForm {
    /// Prefills the edit form with the stored values.
    fn from(record: &ClientRecord) -> Self {
        Self {
            id: record.id,
            full_name: record.full_name.to_string(),
            age: record.age.map(|age| age.to_string()).unwrap_or_default(),
            gender: record.gender.to_string(),
            email: record.email.to_string(),
            phone: record.phone.to_string(),
            goal: record.goal.to_string(),
            start_date: record.start_date.format("%Y-%m-%d").to_string(),
        }
    }
}
