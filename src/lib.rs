//! This crate provides a month-grid appointment calendar.
//!
//! Appointments are kept in an ordered [`AppointmentStore`](store::AppointmentStore), that persists them as a single blob into a [`Backend`](backend::Backend)
//! (a [folder](backend::FolderBackend) on disk, or [memory](backend::MemoryBackend)).
//!
//! The [`AppointmentController`](controller::AppointmentController) is the entry point for front ends: it handles the appointment form (creation and edition),
//! deletions (that need a confirmation), reordering, month navigation, and it tells which appointments fall on every displayed day.
//! The days to display for a month are computed by a [`CalendarGridBuilder`](grid::CalendarGridBuilder).

pub mod appointment;
pub use appointment::{Appointment, AppointmentId, AppointmentInput};
pub mod backend;
pub mod codec;
pub mod config;
pub mod controller;
pub use controller::AppointmentController;
pub mod dates;
pub mod error;
pub use error::{CalendarError, CalendarResult, ValidationError};
pub mod grid;
pub use grid::{CalendarGridBuilder, CalendarMonth};
pub mod ics_export;
pub mod mock_behaviour;
pub mod store;
pub use store::AppointmentStore;

pub mod utils;
