//! Some utility functions to display a calendar in a terminal

use std::fmt::Write;

use chrono::{Datelike, Duration, NaiveDate};

use crate::appointment::Appointment;
use crate::backend::Backend;
use crate::controller::AppointmentController;

/// Renders the displayed month as a text grid.
///
/// Days of adjacent months are shown between brackets, days that have appointments are followed by a `*`.
pub fn render_month<B: Backend>(controller: &AppointmentController<B>) -> String {
    let month = controller.month();
    let mut out = String::new();

    let _ = writeln!(out, "{:^35}", month.anchor().format("%B %Y").to_string());
    if let Some(first) = month.first_day() {
        for offset in 0..7 {
            let weekday = (first + Duration::days(offset)).format("%a").to_string();
            let _ = write!(out, " {:<4}", weekday);
        }
        out.push('\n');
    }

    for week in month.weeks() {
        for day in week {
            let marker = if controller.appointments_on(*day).is_empty() { ' ' } else { '*' };
            if month.is_in_month(*day) {
                let _ = write!(out, " {:>2}{}  ", day.day(), marker);
            } else {
                let _ = write!(out, "[{:>2}]{} ", day.day(), marker);
            }
        }
        out.push('\n');
    }
    out
}

/// Renders the appointments of the displayed month, day by day.
///
/// Every appointment is prefixed by its position in its day, which is what [`AppointmentController::reorder_within_day`] expects.
pub fn render_agenda<B: Backend>(controller: &AppointmentController<B>) -> String {
    let month = controller.month();
    let mut out = String::new();

    for day in month.days().iter().filter(|day| month.is_in_month(**day)) {
        let appointments = controller.appointments_on(*day);
        if appointments.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{}", day.format("%a %d %b"));
        for (index, appointment) in appointments.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", index, describe(appointment));
        }
    }
    out
}

/// A one-line description of an appointment
pub fn describe(appointment: &Appointment) -> String {
    let mut line = format!("{} {}", appointment.date().format("%H:%M"), appointment.title());
    if appointment.description().is_empty() == false {
        line.push_str(" - ");
        line.push_str(appointment.description());
    }
    line
}

/// A debug utility that pretty-prints the displayed month and its appointments
pub fn print_month<B: Backend>(controller: &AppointmentController<B>) {
    print!("{}", render_month(controller));
    println!();
    print!("{}", render_agenda(controller));
}

/// Parse a `YYYY-MM` month
pub fn parse_month(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d").ok()
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointment::AppointmentInput;
    use crate::backend::MemoryBackend;
    use crate::store::AppointmentStore;

    #[test]
    fn test_render() {
        let store = AppointmentStore::new(MemoryBackend::new());
        let mut controller = AppointmentController::new(store, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap().and_hms_opt(9, 15, 0).unwrap();
        controller.submit(&AppointmentInput { title: "Dentist".into(), description: "Bring the card".into(), date: Some(date) }).unwrap();

        let grid = render_month(&controller);
        let lines: Vec<&str> = grid.lines().collect();
        assert_eq!(lines[0].trim(), "May 2024");
        assert!(lines[1].trim_start().starts_with("Sun"));
        assert!(lines[2].starts_with("[28]"));
        assert!(lines[2].contains(" 2* "));
        assert_eq!(lines.len(), 2 + 5);

        let agenda = render_agenda(&controller);
        assert_eq!(agenda, "Thu 02 May\n  0. 09:15 Dentist - Bring the card\n");
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-06"), NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(parse_month("june"), None);
    }
}
