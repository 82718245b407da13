use diesel::{AsChangeset, Insertable, Queryable};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::db::schema;
use crate::error::{Error, Result};

fn required(field: &str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn optional(field: &str, value: Option<String>) -> Result<Option<String>> {
    value.map(|v| required(field, v)).transpose()
}

pub(crate) fn check_weight(weight: f64) -> Result<f64> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(Error::invalid(format!(
            "weight must be a non-negative number, got {weight}"
        )));
    }
    Ok(weight)
}

pub(crate) fn check_reps(reps: i32) -> Result<i32> {
    if reps <= 0 {
        return Err(Error::invalid(format!("reps must be positive, got {reps}")));
    }
    Ok(reps)
}

pub(crate) fn check_set_number(set_number: Option<i32>) -> Result<Option<i32>> {
    match set_number {
        Some(n) if n <= 0 => Err(Error::invalid(format!(
            "set_number must be positive, got {n}"
        ))),
        other => Ok(other),
    }
}

// Exercise models
#[derive(Queryable, Serialize, Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: i32,
    pub name: String,
    pub muscle_group: String,
    pub note: Option<String>,
}

#[derive(Insertable, Deserialize, Debug, Clone)]
#[diesel(table_name = schema::exercises)]
pub struct NewExercise {
    pub name: String,
    pub muscle_group: String,
    #[serde(default)]
    pub note: Option<String>,
}

impl NewExercise {
    pub fn normalized(self) -> Result<Self> {
        Ok(Self {
            name: required("name", self.name)?,
            muscle_group: required("muscle_group", self.muscle_group)?,
            note: optional("note", self.note)?,
        })
    }
}

#[derive(AsChangeset, Deserialize, Debug, Clone, Default)]
#[diesel(table_name = schema::exercises)]
#[serde(default)]
pub struct UpdateExercise {
    pub name: Option<String>,
    pub muscle_group: Option<String>,
    pub note: Option<String>,
}

impl UpdateExercise {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.muscle_group.is_none() && self.note.is_none()
    }

    pub fn normalized(self) -> Result<Self> {
        if self.is_empty() {
            return Err(Error::invalid("Nothing to update"));
        }
        Ok(Self {
            name: optional("name", self.name)?,
            muscle_group: optional("muscle_group", self.muscle_group)?,
            note: optional("note", self.note)?,
        })
    }
}

// Workout models
#[derive(Queryable, Serialize, Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: i32,
    pub date: String,
    #[serde(rename = "type")]
    pub workout_type: String,
    pub note: Option<String>,
    pub template_id: Option<i32>,
}

#[derive(Insertable, Deserialize, Debug, Clone)]
#[diesel(table_name = schema::workouts)]
pub struct NewWorkout {
    pub date: String,
    #[serde(rename = "type")]
    pub workout_type: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub template_id: Option<i32>,
}

impl NewWorkout {
    pub fn normalized(self) -> Result<Self> {
        Ok(Self {
            date: required("date", self.date)?,
            workout_type: required("type", self.workout_type)?,
            note: optional("note", self.note)?,
            template_id: self.template_id,
        })
    }
}

#[derive(AsChangeset, Deserialize, Debug, Clone, Default)]
#[diesel(table_name = schema::workouts)]
#[serde(default)]
pub struct UpdateWorkout {
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub workout_type: Option<String>,
    pub note: Option<String>,
}

impl UpdateWorkout {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.workout_type.is_none() && self.note.is_none()
    }

    pub fn normalized(self) -> Result<Self> {
        if self.is_empty() {
            return Err(Error::invalid("Nothing to update"));
        }
        Ok(Self {
            date: optional("date", self.date)?,
            workout_type: optional("type", self.workout_type)?,
            note: optional("note", self.note)?,
        })
    }
}

// Set models
#[derive(Queryable, Serialize, Debug, Clone, PartialEq)]
pub struct WorkoutSet {
    pub id: i32,
    pub workout_id: i32,
    pub exercise_id: i32,
    pub weight: f64,
    pub reps: i32,
    pub set_number: Option<i32>,
}

#[derive(Insertable, Deserialize, Debug, Clone)]
#[diesel(table_name = schema::sets)]
pub struct NewWorkoutSet {
    pub workout_id: i32,
    pub exercise_id: i32,
    pub weight: f64,
    pub reps: i32,
    #[serde(default)]
    pub set_number: Option<i32>,
}

impl NewWorkoutSet {
    pub fn normalized(self) -> Result<Self> {
        Ok(Self {
            weight: check_weight(self.weight)?,
            reps: check_reps(self.reps)?,
            set_number: check_set_number(self.set_number)?,
            ..self
        })
    }
}

#[derive(AsChangeset, Deserialize, Debug, Clone, Default)]
#[diesel(table_name = schema::sets)]
#[serde(default)]
pub struct UpdateWorkoutSet {
    pub exercise_id: Option<i32>,
    pub weight: Option<f64>,
    pub reps: Option<i32>,
    pub set_number: Option<i32>,
}

impl UpdateWorkoutSet {
    pub fn is_empty(&self) -> bool {
        self.exercise_id.is_none()
            && self.weight.is_none()
            && self.reps.is_none()
            && self.set_number.is_none()
    }

    pub fn normalized(self) -> Result<Self> {
        if self.is_empty() {
            return Err(Error::invalid("Nothing to update"));
        }
        Ok(Self {
            exercise_id: self.exercise_id,
            weight: self.weight.map(check_weight).transpose()?,
            reps: self.reps.map(check_reps).transpose()?,
            set_number: check_set_number(self.set_number)?,
        })
    }
}

/// A set joined with the exercise it records, as shown inside a workout.
#[derive(Queryable, Serialize, Debug, Clone, PartialEq)]
pub struct SetDetail {
    pub id: i32,
    pub workout_id: i32,
    pub exercise_id: i32,
    pub exercise_name: String,
    pub muscle_group: String,
    pub weight: f64,
    pub reps: i32,
    pub set_number: Option<i32>,
}

impl SetDetail {
    pub fn volume(&self) -> f64 {
        self.weight * f64::from(self.reps)
    }
}

impl fmt::Display for SetDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let number = self
            .set_number
            .map(|n| format!("#{n} "))
            .unwrap_or_default();
        write!(
            f,
            "{}{}: {:.1}kg x {} reps",
            number, self.exercise_name, self.weight, self.reps
        )
    }
}

/// A set joined with its workout's date and type; the raw input of record computation.
#[derive(Queryable, Debug, Clone, PartialEq)]
pub struct SetEntry {
    pub set_id: i32,
    pub workout_id: i32,
    pub exercise_id: i32,
    pub weight: f64,
    pub reps: i32,
    pub date: String,
    pub workout_type: String,
}

impl SetEntry {
    pub fn volume(&self) -> f64 {
        self.weight * f64::from(self.reps)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WorkoutDetail {
    #[serde(flatten)]
    pub workout: Workout,
    pub sets: Vec<SetDetail>,
}

// Template models
#[derive(Queryable, Serialize, Debug, Clone, PartialEq)]
pub struct Template {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub workout_type: String,
    pub note: Option<String>,
}

#[derive(Insertable, Deserialize, Debug, Clone)]
#[diesel(table_name = schema::templates)]
pub struct NewTemplate {
    pub name: String,
    #[serde(rename = "type")]
    pub workout_type: String,
    #[serde(default)]
    pub note: Option<String>,
}

impl NewTemplate {
    pub fn normalized(self) -> Result<Self> {
        Ok(Self {
            name: required("name", self.name)?,
            workout_type: required("type", self.workout_type)?,
            note: optional("note", self.note)?,
        })
    }
}

#[derive(AsChangeset, Deserialize, Debug, Clone, Default)]
#[diesel(table_name = schema::templates)]
#[serde(default)]
pub struct UpdateTemplate {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub workout_type: Option<String>,
    pub note: Option<String>,
}

impl UpdateTemplate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.workout_type.is_none() && self.note.is_none()
    }

    pub fn normalized(self) -> Result<Self> {
        if self.is_empty() {
            return Err(Error::invalid("Nothing to update"));
        }
        Ok(Self {
            name: optional("name", self.name)?,
            workout_type: optional("type", self.workout_type)?,
            note: optional("note", self.note)?,
        })
    }
}

#[derive(Queryable, Serialize, Debug, Clone, PartialEq)]
pub struct TemplateSet {
    pub id: i32,
    pub template_id: i32,
    pub exercise_id: i32,
    pub weight: f64,
    pub reps: i32,
    pub set_number: Option<i32>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = schema::template_sets)]
pub struct NewTemplateSet {
    pub template_id: i32,
    pub exercise_id: i32,
    pub weight: f64,
    pub reps: i32,
    pub set_number: Option<i32>,
}

/// Body of a template set before it is attached to a template.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct TemplateSetInput {
    pub exercise_id: i32,
    pub weight: f64,
    pub reps: i32,
    #[serde(default)]
    pub set_number: Option<i32>,
}

impl TemplateSetInput {
    pub fn normalized(self) -> Result<Self> {
        Ok(Self {
            weight: check_weight(self.weight)?,
            reps: check_reps(self.reps)?,
            set_number: check_set_number(self.set_number)?,
            ..self
        })
    }

    pub(crate) fn attach(&self, template_id: i32) -> NewTemplateSet {
        NewTemplateSet {
            template_id,
            exercise_id: self.exercise_id,
            weight: self.weight,
            reps: self.reps,
            set_number: self.set_number,
        }
    }
}

#[derive(Queryable, Serialize, Debug, Clone, PartialEq)]
pub struct TemplateSetDetail {
    pub id: i32,
    pub template_id: i32,
    pub exercise_id: i32,
    pub exercise_name: String,
    pub muscle_group: String,
    pub weight: f64,
    pub reps: i32,
    pub set_number: Option<i32>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TemplateDetail {
    #[serde(flatten)]
    pub template: Template,
    pub sets: Vec<TemplateSetDetail>,
}
