//! Patient models.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::note::NoteHistory;

/// Opaque, unique patient identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PatientId(String);

impl PatientId {
    /// Generate a fresh identifier (UUID v4).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PatientId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for PatientId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PatientId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Older stores wrote millisecond timestamps as bare JSON numbers.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(id) => Self(id),
            RawId::Number(id) => Self(id.to_string()),
        })
    }
}

/// Demographics and vitals snapshot.
///
/// Every field is free text; no numeric validation or unit handling is done.
/// Serialized field names follow the stored patient blob (`sexo`, `edad`, ...)
/// so existing data keeps loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientInfo {
    /// Display name, required when registering a patient
    pub name: String,
    #[serde(rename = "sexo")]
    pub sex: String,
    #[serde(rename = "edad")]
    pub age: String,
    /// Weight (kg)
    #[serde(rename = "peso")]
    pub weight: String,
    /// Height (cm)
    #[serde(rename = "talla")]
    pub height: String,
    #[serde(rename = "imc")]
    pub bmi: String,
    #[serde(rename = "pa")]
    pub blood_pressure: String,
    #[serde(rename = "fc")]
    pub heart_rate: String,
    #[serde(rename = "fr")]
    pub respiratory_rate: String,
    /// Temperature (°C)
    #[serde(rename = "temp")]
    pub temperature: String,
    /// Oxygen saturation (%)
    #[serde(rename = "spo2")]
    pub oxygen_saturation: String,
}

impl PatientInfo {
    /// Create an info block with only a name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// True when the name contains something other than whitespace.
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn field(&self, field: InfoField) -> &str {
        match field {
            InfoField::Name => &self.name,
            InfoField::Sex => &self.sex,
            InfoField::Age => &self.age,
            InfoField::Weight => &self.weight,
            InfoField::Height => &self.height,
            InfoField::Bmi => &self.bmi,
            InfoField::BloodPressure => &self.blood_pressure,
            InfoField::HeartRate => &self.heart_rate,
            InfoField::RespiratoryRate => &self.respiratory_rate,
            InfoField::Temperature => &self.temperature,
            InfoField::OxygenSaturation => &self.oxygen_saturation,
        }
    }

    pub fn set_field(&mut self, field: InfoField, value: impl Into<String>) {
        let slot = match field {
            InfoField::Name => &mut self.name,
            InfoField::Sex => &mut self.sex,
            InfoField::Age => &mut self.age,
            InfoField::Weight => &mut self.weight,
            InfoField::Height => &mut self.height,
            InfoField::Bmi => &mut self.bmi,
            InfoField::BloodPressure => &mut self.blood_pressure,
            InfoField::HeartRate => &mut self.heart_rate,
            InfoField::RespiratoryRate => &mut self.respiratory_rate,
            InfoField::Temperature => &mut self.temperature,
            InfoField::OxygenSaturation => &mut self.oxygen_saturation,
        };
        *slot = value.into();
    }
}

/// The eleven editable fields of a [`PatientInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoField {
    Name,
    Sex,
    Age,
    Weight,
    Height,
    Bmi,
    BloodPressure,
    HeartRate,
    RespiratoryRate,
    Temperature,
    OxygenSaturation,
}

impl InfoField {
    /// All fields in form order.
    pub const ALL: [InfoField; 11] = [
        InfoField::Name,
        InfoField::Sex,
        InfoField::Age,
        InfoField::Weight,
        InfoField::Height,
        InfoField::Bmi,
        InfoField::BloodPressure,
        InfoField::HeartRate,
        InfoField::RespiratoryRate,
        InfoField::Temperature,
        InfoField::OxygenSaturation,
    ];
}

/// A registered patient and their note history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    /// Current demographics and vitals
    pub info: PatientInfo,
    /// Saved notes, oldest first
    #[serde(default)]
    pub history: NoteHistory,
}

impl Patient {
    /// Register a new patient with a fresh id and an empty history.
    pub fn new(info: PatientInfo) -> Self {
        Self {
            id: PatientId::generate(),
            info,
            history: NoteHistory::new(),
        }
    }
}
