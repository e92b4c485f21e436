//! A module to export appointments as an iCal file

use chrono::NaiveDateTime;
use ics::properties::{Description, DtStart, Summary};
use ics::{escape_text, Event, ICalendar};

use crate::appointment::Appointment;
use crate::config::prod_id;

/// Build an iCal calendar that contains one `VEVENT` per appointment.
///
/// `stamp` is the time the file is generated (the iCal `DTSTAMP`). Dates are written as floating (timezone-less) times.
pub fn build_from(appointments: &[Appointment], stamp: &NaiveDateTime) -> String {
    let s_stamp = format_date_time(stamp);
    let mut calendar = ICalendar::new("2.0", prod_id());

    for appointment in appointments {
        let mut event = Event::new(appointment.id().to_string(), s_stamp.clone());
        event.push(DtStart::new(format_date_time(appointment.date())));
        event.push(Summary::new(escape_text(appointment.title())));
        if appointment.description().is_empty() == false {
            event.push(Description::new(escape_text(appointment.description())));
        }
        calendar.add_event(event);
    }

    calendar.to_string()
}

fn format_date_time(dt: &NaiveDateTime) -> String {
    dt.format("%Y%m%dT%H%M%S").to_string()
}
