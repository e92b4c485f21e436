//! This module provides the ordered, persisted collection of appointments

use crate::appointment::{Appointment, AppointmentId};
use crate::backend::Backend;
use crate::codec;
use crate::config::STORAGE_KEY;
use crate::error::{CalendarError, CalendarResult};


/// An ordered list of appointments, backed by a single blob in a [`Backend`]
///
/// Order is meaningful: it is the display order of appointments within a day, and the target of reorder operations.
/// Mutations only change the in-memory collection, call [`Self::save`] to persist them.
#[derive(Debug)]
pub struct AppointmentStore<B: Backend> {
    backend: B,
    key: String,
    appointments: Vec<Appointment>,
}

impl<B: Backend> AppointmentStore<B> {
    /// Create an empty store that persists under the default [`STORAGE_KEY`]
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, STORAGE_KEY)
    }

    /// Create an empty store that persists under a custom key
    pub fn with_key(backend: B, key: &str) -> Self {
        Self {
            backend,
            key: key.to_string(),
            appointments: Vec::new(),
        }
    }

    /// Create a store and fill it with the persisted appointments. See [`Self::load`]
    pub fn open(backend: B) -> Self {
        let mut store = Self::new(backend);
        store.load();
        store
    }

    pub fn key(&self) -> &str { &self.key }
    pub fn backend(&self) -> &B { &self.backend }
    pub fn backend_mut(&mut self) -> &mut B { &mut self.backend }
    pub fn appointments(&self) -> &[Appointment] { &self.appointments }
    pub fn len(&self) -> usize { self.appointments.len() }
    pub fn is_empty(&self) -> bool { self.appointments.is_empty() }

    /// Replace the in-memory collection with the persisted one.
    ///
    /// In case nothing has been persisted yet, or the persisted blob cannot be read or decoded, the collection is left empty.
    /// This is logged, but not reported.
    pub fn load(&mut self) {
        self.appointments = match self.backend.read(&self.key) {
            Ok(None) => {
                log::debug!("No persisted appointments under {:?}", self.key);
                Vec::new()
            },
            Ok(Some(blob)) => match codec::decode(&blob) {
                Ok(appointments) => appointments,
                Err(err) => {
                    log::warn!("Invalid persisted appointments: {}. Starting from an empty calendar", err);
                    Vec::new()
                },
            },
            Err(err) => {
                log::warn!("Unable to read persisted appointments: {}. Starting from an empty calendar", err);
                Vec::new()
            },
        };
        log::debug!("Loaded {} appointment(s)", self.appointments.len());
    }

    /// Overwrite the persisted blob with the whole current collection
    pub fn save(&mut self) -> CalendarResult<()> {
        let blob = codec::encode(&self.appointments)?;
        if let Err(err) = self.backend.write(&self.key, &blob) {
            log::error!("Unable to save {} appointment(s): {}", self.appointments.len(), err);
            return Err(CalendarError::Persistence(err));
        }
        Ok(())
    }

    /// Append an appointment at the end of the collection
    pub fn insert(&mut self, appointment: Appointment) {
        log::debug!("Inserting appointment {}", appointment.id());
        self.appointments.push(appointment);
    }

    /// Overwrite the appointment at `position`
    pub fn replace_at(&mut self, position: usize, appointment: Appointment) -> CalendarResult<()> {
        self.check_bounds(position)?;
        self.appointments[position] = appointment;
        Ok(())
    }

    /// Delete the appointment at `position`, shifting the following ones. Returns the deleted appointment
    pub fn remove_at(&mut self, position: usize) -> CalendarResult<Appointment> {
        self.check_bounds(position)?;
        Ok(self.appointments.remove(position))
    }

    /// Move the appointment at `from` so that it ends up at `to`, keeping the relative order of every other appointment.
    ///
    /// Both positions must exist in the current collection, otherwise nothing is changed.
    pub fn move_within_collection(&mut self, from: usize, to: usize) -> CalendarResult<()> {
        self.check_bounds(from)?;
        self.check_bounds(to)?;
        if from < to {
            self.appointments[from..=to].rotate_left(1);
        } else {
            self.appointments[to..=from].rotate_right(1);
        }
        Ok(())
    }

    /// The current position of an appointment
    pub fn position_of(&self, id: &AppointmentId) -> Option<usize> {
        self.appointments.iter().position(|appointment| appointment.id() == id)
    }

    pub fn get(&self, id: &AppointmentId) -> Option<&Appointment> {
        self.appointments.iter().find(|appointment| appointment.id() == id)
    }

    /// Overwrite the appointment with the given ID, wherever it is
    pub fn replace(&mut self, id: &AppointmentId, appointment: Appointment) -> CalendarResult<()> {
        let position = self.position_of(id).ok_or_else(|| CalendarError::NotFound(id.clone()))?;
        self.replace_at(position, appointment)
    }

    /// Delete the appointment with the given ID. Returns the deleted appointment
    pub fn remove(&mut self, id: &AppointmentId) -> CalendarResult<Appointment> {
        let position = self.position_of(id).ok_or_else(|| CalendarError::NotFound(id.clone()))?;
        self.remove_at(position)
    }

    fn check_bounds(&self, position: usize) -> CalendarResult<()> {
        if position >= self.appointments.len() {
            return Err(CalendarError::OutOfBounds { position, len: self.appointments.len() });
        }
        Ok(())
    }
}
