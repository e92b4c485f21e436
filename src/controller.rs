//! The entry point of the calendar: form state, appointment mutations, navigation and queries
//!
//! An [`AppointmentController`] owns the [`AppointmentStore`] it is given, and rebuilds its [`CalendarMonth`] whenever what is displayed may have changed.
//! Every mutation is applied in memory first, then persisted. In case persisting fails, the in-memory state is kept,
//! the error is returned, and [`AppointmentController::has_unsaved_changes`] tells that [`AppointmentController::save`] should be retried.

use std::fmt::{Display, Formatter};

use chrono::{Local, NaiveDate, NaiveDateTime, SubsecRound};

use crate::appointment::{Appointment, AppointmentId, AppointmentInput};
use crate::backend::Backend;
use crate::dates::{self, CalendarDay};
use crate::error::{CalendarError, CalendarResult};
use crate::grid::{CalendarGridBuilder, CalendarMonth};
use crate::ics_export;
use crate::store::AppointmentStore;

/// Whether the appointment form is shown, and which appointment it edits (if any)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditSession {
    form_visible: bool,
    edit_target: Option<AppointmentId>,
}

impl EditSession {
    pub fn is_form_visible(&self) -> bool { self.form_visible }
    /// The appointment being edited, or `None` in case the form creates a new one
    pub fn edit_target(&self) -> Option<&AppointmentId> { self.edit_target.as_ref() }
}


/// The answer to a deletion request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Confirm,
    Decline,
}

impl From<bool> for Decision {
    fn from(confirmed: bool) -> Self {
        if confirmed { Decision::Confirm } else { Decision::Decline }
    }
}

/// A deletion that waits for a [`Decision`]. See [`AppointmentController::request_delete`]
#[derive(Clone, Debug, PartialEq)]
pub struct PendingDeletion {
    id: AppointmentId,
    title: String,
}

impl PendingDeletion {
    pub fn id(&self) -> &AppointmentId { &self.id }
    pub fn title(&self) -> &str { &self.title }
}

impl Display for PendingDeletion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Are you sure you want to delete \"{}\"?", self.title)
    }
}

/// Something that can approve or refuse a deletion (usually, by asking the user)
pub trait Confirm {
    fn confirm(&mut self, pending: &PendingDeletion) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&PendingDeletion) -> bool,
{
    fn confirm(&mut self, pending: &PendingDeletion) -> bool {
        self(pending)
    }
}

/// What a deletion request ended up doing
#[derive(Clone, Debug, PartialEq)]
pub enum DeleteOutcome {
    Deleted(Appointment),
    Kept,
}


/// The current local time, to the second (the precision dates are persisted with)
fn local_now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

/// Orchestrates the appointment form, the appointment store and the displayed month
#[derive(Debug)]
pub struct AppointmentController<B: Backend> {
    store: AppointmentStore<B>,
    grid_builder: CalendarGridBuilder,
    month: CalendarMonth,
    session: EditSession,
    /// The pending values of the form
    input: AppointmentInput,
    selected_date: Option<NaiveDate>,
    unsaved_changes: bool,
    clock: fn() -> NaiveDateTime,
}

impl<B: Backend> AppointmentController<B> {
    /// Create a controller that displays the month `anchor_month` is in.
    ///
    /// `store` is usually already loaded, see [`AppointmentStore::open`].
    /// Fails with [`CalendarError::InvalidDate`] in case this month cannot be displayed (at the very limits of the supported date range).
    pub fn new(store: AppointmentStore<B>, anchor_month: NaiveDate) -> CalendarResult<Self> {
        let grid_builder = CalendarGridBuilder::default();
        let month = grid_builder.build(anchor_month)
            .ok_or_else(|| CalendarError::InvalidDate(anchor_month.to_string()))?;

        Ok(Self {
            store,
            grid_builder,
            month,
            session: EditSession::default(),
            input: AppointmentInput::new(local_now()),
            selected_date: None,
            unsaved_changes: false,
            clock: local_now,
        })
    }

    /// Use another first day of the week.
    ///
    /// In case the displayed month cannot be built with this week start, the current one is kept.
    pub fn with_grid_builder(mut self, grid_builder: CalendarGridBuilder) -> Self {
        match grid_builder.build(self.month.anchor()) {
            Some(month) => {
                self.grid_builder = grid_builder;
                self.month = month;
            },
            None => log::warn!("Unable to display {} with weeks starting on {}", self.month.anchor(), grid_builder.week_start()),
        }
        self
    }

    /// Use another source for "now" (used to pre-fill the form date)
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self.input = self.default_input();
        self
    }

    pub fn store(&self) -> &AppointmentStore<B> { &self.store }
    pub fn into_store(self) -> AppointmentStore<B> { self.store }
    pub fn appointments(&self) -> &[Appointment] { self.store.appointments() }
    pub fn month(&self) -> &CalendarMonth { &self.month }
    pub fn session(&self) -> &EditSession { &self.session }
    pub fn is_form_visible(&self) -> bool { self.session.form_visible }
    pub fn edit_target(&self) -> Option<&AppointmentId> { self.session.edit_target.as_ref() }
    pub fn selected_date(&self) -> Option<NaiveDate> { self.selected_date }
    /// The pending values of the form
    pub fn input(&self) -> &AppointmentInput { &self.input }
    pub fn input_mut(&mut self) -> &mut AppointmentInput { &mut self.input }

    /// Whether the last attempt to persist the appointments failed
    pub fn has_unsaved_changes(&self) -> bool { self.unsaved_changes }

    /// Show the form if it is hidden, hide it otherwise. The edited appointment (if any) is kept
    pub fn toggle_form(&mut self) {
        self.session.form_visible = !self.session.form_visible;
    }

    /// Open the form, pre-filled with the values of an existing appointment
    pub fn start_edit(&mut self, id: &AppointmentId) -> CalendarResult<()> {
        let appointment = self.store.get(id).ok_or_else(|| CalendarError::NotFound(id.clone()))?;
        self.input = AppointmentInput::from_appointment(appointment);
        self.session.edit_target = Some(id.clone());
        self.session.form_visible = true;
        Ok(())
    }

    /// Stop editing, discard the pending values and hide the form
    pub fn cancel_edit(&mut self) {
        self.session.edit_target = None;
        self.session.form_visible = false;
        self.input = self.default_input();
    }

    /// Select a day of the grid, and open the form to create an appointment on this day.
    ///
    /// In case an appointment is being edited, its pending values are left untouched.
    pub fn select_date(&mut self, day: NaiveDate) {
        self.selected_date = Some(day);
        if self.session.edit_target.is_none() {
            self.input.date = day.and_hms_opt(0, 0, 0);
        }
        self.session.form_visible = true;
    }

    /// Submit the pending values of the form. See [`Self::submit`]
    pub fn submit_pending(&mut self) -> CalendarResult<AppointmentId> {
        let input = self.input.clone();
        self.submit(&input)
    }

    /// Create an appointment from `input`, or update the edited appointment.
    ///
    /// Invalid values are refused: nothing changes and the form stays open.
    /// Otherwise, the edit session is closed and the form values are reset. Returns the ID of the created or updated appointment.
    pub fn submit(&mut self, input: &AppointmentInput) -> CalendarResult<AppointmentId> {
        input.validate()?;

        let id = match &self.session.edit_target {
            Some(target) => {
                let updated = input.to_appointment(target.clone())?;
                self.store.replace(target, updated)?;
                log::debug!("Updated appointment {}", target);
                target.clone()
            },
            None => {
                let created = input.to_appointment(AppointmentId::random())?;
                let id = created.id().clone();
                self.store.insert(created);
                id
            },
        };

        self.session.edit_target = None;
        self.session.form_visible = false;
        self.input = self.default_input();
        self.rebuild_grid();
        self.persist()?;
        Ok(id)
    }

    /// First step of a deletion: describes what is about to be deleted, so that it can be confirmed
    pub fn request_delete(&self, id: &AppointmentId) -> CalendarResult<PendingDeletion> {
        let appointment = self.store.get(id).ok_or_else(|| CalendarError::NotFound(id.clone()))?;
        Ok(PendingDeletion {
            id: id.clone(),
            title: appointment.title().to_string(),
        })
    }

    /// Second step of a deletion: actually delete the appointment, unless the deletion has been declined
    pub fn resolve_delete(&mut self, pending: PendingDeletion, decision: Decision) -> CalendarResult<DeleteOutcome> {
        if decision == Decision::Decline {
            log::debug!("Deletion of {} declined", pending.id);
            return Ok(DeleteOutcome::Kept);
        }

        let removed = self.store.remove(&pending.id)?;
        if self.session.edit_target.as_ref() == Some(&pending.id) {
            self.cancel_edit();
        }
        self.rebuild_grid();
        self.persist()?;
        Ok(DeleteOutcome::Deleted(removed))
    }

    /// Delete an appointment once `confirm` approves it
    pub fn delete<C: Confirm>(&mut self, id: &AppointmentId, confirm: &mut C) -> CalendarResult<DeleteOutcome> {
        let pending = self.request_delete(id)?;
        let decision = Decision::from(confirm.confirm(&pending));
        self.resolve_delete(pending, decision)
    }

    /// Move the appointment at `from` to position `to` in the whole collection (e.g. at the end of a drag and drop)
    ///
    /// This does not change which day appointments are on, so the grid is not rebuilt.
    pub fn reorder(&mut self, from: usize, to: usize) -> CalendarResult<()> {
        self.store.move_within_collection(from, to)?;
        self.persist()
    }

    /// Move an appointment within the list of a single day. `from` and `to` are positions in [`Self::appointments_on`] for this day.
    ///
    /// Appointments of other days keep their relative order.
    pub fn reorder_within_day(&mut self, day: NaiveDate, from: usize, to: usize) -> CalendarResult<()> {
        let slots: Vec<usize> = self.store.appointments().iter()
            .enumerate()
            .filter(|(_, appointment)| dates::is_same_day(appointment.date(), day))
            .map(|(position, _)| position)
            .collect();

        for position in [from, to].iter() {
            if *position >= slots.len() {
                return Err(CalendarError::OutOfBounds { position: *position, len: slots.len() });
            }
        }

        self.store.move_within_collection(slots[from], slots[to])?;
        self.persist()
    }

    /// Display the previous month
    pub fn previous_month(&mut self) {
        self.shift_month(-1);
    }

    /// Display the next month
    pub fn next_month(&mut self) {
        self.shift_month(1);
    }

    /// Display the month `date` is in.
    ///
    /// Months whose grid would go past the supported date range are not displayed, the current month is kept instead.
    pub fn go_to_month(&mut self, date: NaiveDate) {
        match self.grid_builder.build(date) {
            Some(month) => self.month = month,
            None => log::warn!("Unable to display the month of {}: it is too close to the limits of the supported dates", date),
        }
    }

    /// Display the current month
    pub fn go_to_today(&mut self) {
        let today = (self.clock)().date();
        self.go_to_month(today);
    }

    /// The appointments that happen on the same calendar day as `date`, in collection order
    pub fn appointments_on<D: CalendarDay>(&self, date: D) -> Vec<&Appointment> {
        let day = date.day();
        self.store.appointments().iter()
            .filter(|appointment| dates::is_same_day(appointment.date(), day))
            .collect()
    }

    /// Try to persist the appointments again
    pub fn save(&mut self) -> CalendarResult<()> {
        self.persist()
    }

    /// Every appointment, as an iCal file generated at `stamp`
    pub fn export_ics(&self, stamp: &NaiveDateTime) -> String {
        ics_export::build_from(self.store.appointments(), stamp)
    }

    fn shift_month(&mut self, months: i32) {
        match dates::add_months(self.month.anchor(), months) {
            Some(anchor) => self.go_to_month(anchor),
            None => log::warn!("Unable to move {} month(s) away from {}", months, self.month.anchor()),
        }
    }

    fn rebuild_grid(&mut self) {
        self.go_to_month(self.month.anchor());
    }

    fn default_input(&self) -> AppointmentInput {
        AppointmentInput::new((self.clock)())
    }

    fn persist(&mut self) -> CalendarResult<()> {
        let result = self.store.save();
        self.unsaved_changes = result.is_err();
        result
    }
}
