//! An interactive terminal calendar

use std::error::Error;
use std::path::PathBuf;

use chrono::{Datelike, Local, NaiveDate, Weekday};
use clap::Parser;
use dialoguer::{Confirm as ConfirmPrompt, Input};

use wall_calendar::backend::FolderBackend;
use wall_calendar::controller::{Confirm, DeleteOutcome, PendingDeletion};
use wall_calendar::dates::{format_date_time, parse_date_time};
use wall_calendar::{AppointmentController, AppointmentId, AppointmentStore, CalendarError, CalendarGridBuilder};
use wall_calendar::utils::{parse_month, print_month};

const DEFAULT_DATA_DIR: &str = "wall-calendar-data";

const HELP: &str = "\
Commands:
  n | next                 show the next month
  p | prev                 show the previous month
  t | today                show the current month
  add [DAY]                add an appointment (on DAY of the displayed month)
  edit DAY INDEX           edit an appointment
  del DAY INDEX            delete an appointment
  move DAY FROM TO         reorder the appointments of a day
  export PATH              write every appointment to an iCal file
  save                     retry saving after an error
  q | quit";

#[derive(Parser)]
#[command(about = "A month-grid appointment calendar")]
struct Cli {
    /// Folder the appointments are stored into
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// First day of the week in the grid (e.g. "sun" or "mon")
    #[arg(long, default_value = "sun")]
    week_start: Weekday,

    /// Month to display first, as YYYY-MM. Defaults to the current month
    #[arg(long, value_parser = parse_month_arg)]
    month: Option<NaiveDate>,
}

fn parse_month_arg(s: &str) -> Result<NaiveDate, String> {
    parse_month(s).ok_or_else(|| format!("Invalid month '{}'. Expected YYYY-MM", s))
}

/// Asks the user before deleting anything
struct PromptConfirm;

impl Confirm for PromptConfirm {
    fn confirm(&mut self, pending: &PendingDeletion) -> bool {
        ConfirmPrompt::new()
            .with_prompt(pending.to_string())
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let store = AppointmentStore::open(FolderBackend::new(&cli.data_dir));
    let anchor = cli.month.unwrap_or_else(|| Local::now().date_naive());
    let mut controller = AppointmentController::new(store, anchor)?
        .with_grid_builder(CalendarGridBuilder::new(cli.week_start));

    loop {
        print_month(&controller);
        if controller.has_unsaved_changes() {
            println!("(some changes could not be saved, type 'save' to retry)");
        }

        let line: String = Input::new().with_prompt("calendar").allow_empty(true).interact_text()?;
        let words: Vec<&str> = line.split_whitespace().collect();
        match run_command(&mut controller, &words) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {},
            Err(err) => println!("Error: {}", err),
        }
    }

    Ok(())
}

enum Flow {
    Continue,
    Quit,
}

fn run_command(controller: &mut AppointmentController<FolderBackend>, words: &[&str]) -> Result<Flow, Box<dyn Error>> {
    match words {
        [] => {},
        ["q"] | ["quit"] => return Ok(Flow::Quit),
        ["n"] | ["next"] => controller.next_month(),
        ["p"] | ["prev"] => controller.previous_month(),
        ["t"] | ["today"] => controller.go_to_today(),
        ["add"] => {
            controller.toggle_form();
            fill_form(controller)?;
        },
        ["add", day] => {
            let day = day_of_displayed_month(controller, day)?;
            controller.select_date(day);
            fill_form(controller)?;
        },
        ["edit", day, index] => {
            let id = find_appointment(controller, day, index)?;
            controller.start_edit(&id)?;
            fill_form(controller)?;
        },
        ["del", day, index] => {
            let id = find_appointment(controller, day, index)?;
            if let DeleteOutcome::Deleted(appointment) = controller.delete(&id, &mut PromptConfirm)? {
                println!("Deleted \"{}\"", appointment.title());
            }
        },
        ["move", day, from, to] => {
            let day = day_of_displayed_month(controller, day)?;
            controller.reorder_within_day(day, from.parse()?, to.parse()?)?;
        },
        ["export", path] => {
            let ical = controller.export_ics(&Local::now().naive_local());
            std::fs::write(path, ical)?;
            println!("Exported {} appointment(s) to {}", controller.appointments().len(), path);
        },
        ["save"] => controller.save()?,
        _ => println!("{}", HELP),
    }
    Ok(Flow::Continue)
}

/// Prompt for the form values until they are valid, or until the user gives up
fn fill_form(controller: &mut AppointmentController<FolderBackend>) -> Result<(), Box<dyn Error>> {
    while controller.is_form_visible() {
        let pending = controller.input().clone();
        let title: String = Input::new()
            .with_prompt("Title")
            .with_initial_text(pending.title.clone())
            .allow_empty(true)
            .interact_text()?;
        let description: String = Input::new()
            .with_prompt("Description")
            .with_initial_text(pending.description.clone())
            .allow_empty(true)
            .interact_text()?;
        let date: String = Input::new()
            .with_prompt("Date (YYYY-MM-DD HH:MM)")
            .with_initial_text(pending.date.map(|d| format_date_time(&d)).unwrap_or_default())
            .allow_empty(true)
            .interact_text()?;

        let input = controller.input_mut();
        input.title = title;
        input.description = description;
        input.date = parse_date_time(&date);
        if input.date.is_none() && date.trim().is_empty() == false {
            println!("Error: {}", CalendarError::InvalidDate(date));
        }

        match controller.submit_pending() {
            Ok(_) => {},
            Err(CalendarError::Validation(err)) => {
                println!("Error: {}", err);
                if ConfirmPrompt::new().with_prompt("Try again?").default(true).interact()? == false {
                    controller.cancel_edit();
                }
            },
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn day_of_displayed_month(controller: &AppointmentController<FolderBackend>, day: &str) -> Result<NaiveDate, Box<dyn Error>> {
    let anchor = controller.month().anchor();
    let day: u32 = day.parse()?;
    anchor.with_day(day)
        .ok_or_else(|| format!("{} has no day {}", anchor.format("%B %Y"), day).into())
}

fn find_appointment(controller: &AppointmentController<FolderBackend>, day: &str, index: &str) -> Result<AppointmentId, Box<dyn Error>> {
    let day = day_of_displayed_month(controller, day)?;
    let index: usize = index.parse()?;
    controller.appointments_on(day)
        .get(index)
        .map(|appointment| appointment.id().clone())
        .ok_or_else(|| format!("No appointment #{} on {}", index, day).into())
}
