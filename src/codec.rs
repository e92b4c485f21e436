//! Conversion between the appointment collection and the persisted blob
//!
//! The blob is a JSON array, in collection order:
//! ```text
//! [ { "id": "<uuid>", "title": "...", "description": "...", "date": "2024-05-01T09:00:00" }, ... ]
//! ```

use crate::appointment::Appointment;
use crate::error::CalendarResult;

/// Serialize the whole collection
pub fn encode(appointments: &[Appointment]) -> CalendarResult<String> {
    Ok(serde_json::to_string(appointments)?)
}

/// Deserialize a whole collection.
///
/// Records with a blank title are dropped (with a warning), since stored appointments must always have one.
pub fn decode(blob: &str) -> CalendarResult<Vec<Appointment>> {
    let parsed: Vec<Appointment> = serde_json::from_str(blob)?;
    let total = parsed.len();
    let appointments: Vec<Appointment> = parsed.into_iter()
        .filter(|appointment| appointment.title().trim().is_empty() == false)
        .collect();
    if appointments.len() != total {
        log::warn!("Ignoring {} persisted appointment(s) without a title", total - appointments.len());
    }
    Ok(appointments)
}
