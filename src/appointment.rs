//! Appointments, and the form values they are created from

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::dates::{format_date_time, parse_date_time};
use crate::error::ValidationError;


/// A stable identifier for an appointment, that does not change when the appointment is edited or moved
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AppointmentId {
    content: Uuid,
}

impl AppointmentId {
    /// Generate a random AppointmentId.
    pub fn random() -> Self {
        Self { content: Uuid::new_v4() }
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.content
    }
}

impl From<Uuid> for AppointmentId {
    fn from(uuid: Uuid) -> Self {
        Self { content: uuid }
    }
}

impl FromStr for AppointmentId {
    type Err = uuid::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let u = Uuid::parse_str(s)?;
        Ok(Self::from(u))
    }
}

impl Display for AppointmentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content.to_hyphenated())
    }
}

/// Used to support serde
impl Serialize for AppointmentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
/// Used to support serde
impl<'de> Deserialize<'de> for AppointmentId {
    fn deserialize<D>(deserializer: D) -> Result<AppointmentId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}



/// One scheduled event
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    /// Blobs written before appointments had an id get a fresh one when they are read
    #[serde(default = "AppointmentId::random")]
    id: AppointmentId,

    /// The display name of the appointment. Never empty.
    title: String,

    #[serde(default)]
    description: String,

    #[serde(serialize_with = "serialize_date", deserialize_with = "deserialize_date")]
    date: NaiveDateTime,
}

impl Appointment {
    /// Create a brand new appointment.
    /// This will pick a new (random) appointment ID.
    ///
    /// Fails in case `title` is blank
    pub fn new(title: String, description: String, date: NaiveDateTime) -> Result<Self, ValidationError> {
        Self::new_with_id(AppointmentId::random(), title, description, date)
    }

    /// Create an appointment that keeps an existing ID
    pub fn new_with_id(id: AppointmentId, title: String, description: String, date: NaiveDateTime) -> Result<Self, ValidationError> {
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(Self { id, title, description, date })
    }

    pub fn id(&self) -> &AppointmentId  { &self.id          }
    pub fn title(&self) -> &str         { &self.title       }
    pub fn description(&self) -> &str   { &self.description }
    pub fn date(&self) -> &NaiveDateTime { &self.date       }

    /// Whether two appointments have the same title, description and calendar day.
    /// IDs and time of day are not compared.
    pub fn has_same_observable_content_as(&self, other: &Appointment) -> bool {
           self.title == other.title
        && self.description == other.description
        && crate::dates::is_same_day(self.date, other.date)
    }
}

fn serialize_date<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_date_time(date))
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_date_time(&s)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date {:?}", s)))
}



/// The values of the appointment form, before they are validated
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppointmentInput {
    pub title: String,
    pub description: String,
    pub date: Option<NaiveDateTime>,
}

impl AppointmentInput {
    /// An empty form, whose date is pre-filled
    pub fn new(date: NaiveDateTime) -> Self {
        Self { title: String::new(), description: String::new(), date: Some(date) }
    }

    /// The form values of an existing appointment
    pub fn from_appointment(appointment: &Appointment) -> Self {
        Self {
            title: appointment.title().to_string(),
            description: appointment.description().to_string(),
            date: Some(*appointment.date()),
        }
    }

    /// Check the required fields are set
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.date.is_none() {
            return Err(ValidationError::MissingDate);
        }
        Ok(())
    }

    /// Build an appointment with the given ID from these values
    pub fn to_appointment(&self, id: AppointmentId) -> Result<Appointment, ValidationError> {
        self.validate()?;
        let date = self.date.ok_or(ValidationError::MissingDate)?;
        Appointment::new_with_id(id, self.title.clone(), self.description.clone(), date)
    }
}
