use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ClientError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_base64: Option<String>,
    #[serde(default = "active_by_default", deserialize_with = "deserialize_flag")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}

/// The server stores the active flag as an integer column.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Int(value) => value != 0,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkoutStatus {
    #[serde(rename = "in progress", alias = "in_progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "abandoned")]
    Abandoned,
}

impl WorkoutStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, WorkoutStatus::InProgress)
    }

    pub fn label(self) -> &'static str {
        match self {
            WorkoutStatus::InProgress => "in progress",
            WorkoutStatus::Completed => "completed",
            WorkoutStatus::Abandoned => "abandoned",
        }
    }
}

/// One workout occurrence. History listings fill in the aggregate fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: i64,
    pub equipment_id: i64,
    #[serde(default)]
    pub equipment: Option<Equipment>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub status: WorkoutStatus,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub started_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub ended_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub sets_count: u32,
    #[serde(default)]
    pub max_reps: f64,
    #[serde(default)]
    pub max_weight: i64,
}

impl WorkoutSession {
    pub fn equipment_name(&self) -> &str {
        self.equipment
            .as_ref()
            .map(|eq| eq.name.as_str())
            .unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub id: i64,
    pub workout_id: i64,
    pub set_num: u32,
    pub reps_dist: f64,
    pub weight_time: i64,
    #[serde(default)]
    pub resistance: i64,
}

#[derive(Debug, Serialize)]
pub struct StartWorkoutRequest {
    pub equipment_id: i64,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateRequest {
    pub status: WorkoutStatus,
}

#[derive(Debug, Serialize)]
pub struct NewSetRequest {
    pub workout_id: i64,
    pub reps_dist: f64,
    pub weight_time: i64,
    pub resistance: i64,
}

/// Operator input for one set, before it is bound to a workout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetEntry {
    pub reps_dist: f64,
    pub weight_time: i64,
    pub resistance: Option<i64>,
}

impl SetEntry {
    pub fn new(reps_dist: f64, weight_time: i64) -> Self {
        Self {
            reps_dist,
            weight_time,
            resistance: None,
        }
    }

    pub fn with_resistance(mut self, resistance: i64) -> Self {
        self.resistance = Some(resistance);
        self
    }

    /// Parses raw form text. Weight and resistance read their leading integer,
    /// so `"40.5"` is 40. A resistance with no leading integer is omitted.
    pub fn parse(reps: &str, weight: &str, resistance: Option<&str>) -> Result<Self, ClientError> {
        let reps_dist = reps
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| ClientError::validation("Reps/distance must be a number"))?;
        let weight_time = leading_integer(weight)
            .ok_or_else(|| ClientError::validation("Weight/time must be a whole number"))?;
        let resistance = resistance.and_then(leading_integer);

        Ok(Self {
            reps_dist,
            weight_time,
            resistance,
        })
    }

    pub fn into_request(self, workout_id: i64) -> NewSetRequest {
        NewSetRequest {
            workout_id,
            reps_dist: self.reps_dist,
            weight_time: self.weight_time,
            resistance: self.resistance.unwrap_or(0),
        }
    }
}

/// Optional sign followed by digits; anything after the digits is ignored.
fn leading_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let digits_from = usize::from(raw.starts_with(['+', '-']));
    let end = raw[digits_from..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(raw.len(), |offset| digits_from + offset);
    if end == digits_from {
        return None;
    }
    raw[..end].parse().ok()
}

#[derive(Debug, Clone, Default)]
pub struct EquipmentForm {
    pub name: String,
    pub kind: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub image_path: Option<std::path::PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_units")]
    pub units: String,
    #[serde(default = "default_rest_time")]
    pub default_rest_time: u32,
    #[serde(default = "default_theme")]
    pub theme: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            units: default_units(),
            default_rest_time: default_rest_time(),
            theme: default_theme(),
        }
    }
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_rest_time() -> u32 {
    60
}

fn default_theme() -> String {
    "light".to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

impl PasswordChange {
    pub fn new(current: &str, new: &str, confirm: &str) -> Result<Self, ClientError> {
        if new != confirm {
            return Err(ClientError::validation("New passwords do not match"));
        }

        Ok(Self {
            current_password: current.to_string(),
            new_password: new.to_string(),
        })
    }
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.error
            .or(self.message)
            .filter(|message| !message.trim().is_empty())
    }
}
