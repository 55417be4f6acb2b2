//! Interactive menu loop.
//!
//! Reads choices from any `BufRead` and writes prompts to any `Write`, so the
//! loop runs the same against a terminal or an in-memory script.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::clock::{format_timestamp, Clock};
use crate::error::TimecardError;
use crate::render;
use crate::report::{active_session_info, recent_sessions};
use crate::tracker::{ClockOutOutcome, CompanySelector, Tracker};

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    StartSession,
    ClockOut,
    DisplaySessions,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::StartSession),
            "2" => Some(Self::ClockOut),
            "3" => Some(Self::DisplaySessions),
            "4" => Some(Self::Exit),
            _ => None,
        }
    }
}

const MENU: &str = "1. Start a new session\n2. Clock out\n3. Display Sessions\n4. Exit\n";

pub struct Shell<'t, R, W, C: Clock> {
    tracker: &'t mut Tracker<C>,
    input: R,
    output: W,
}

impl<'t, R: BufRead, W: Write, C: Clock> Shell<'t, R, W, C> {
    pub fn new(tracker: &'t mut Tracker<C>, input: R, output: W) -> Self {
        Self {
            tracker,
            input,
            output,
        }
    }

    /// Run until the operator exits or input ends, then save once more.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.print_status()?;
            write!(self.output, "{}", MENU)?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                break;
            };
            match MenuChoice::parse(&line) {
                Some(MenuChoice::StartSession) => self.start_session()?,
                Some(MenuChoice::ClockOut) => self.clock_out()?,
                Some(MenuChoice::DisplaySessions) => self.display_sessions()?,
                Some(MenuChoice::Exit) => break,
                None => writeln!(self.output, "Invalid choice.")?,
            }
        }

        self.tracker.save().context("Failed to save profile on exit")?;
        Ok(())
    }

    fn print_status(&mut self) -> Result<()> {
        let now = format_timestamp(&self.tracker.clock().now());
        writeln!(self.output, "Current Time: {}", now)?;
        let active = active_session_info(self.tracker.profile());
        write!(self.output, "{}", render::render_status(active.as_ref()))?;
        Ok(())
    }

    fn start_session(&mut self) -> Result<()> {
        let companies = self.tracker.profile().list_companies();
        write!(self.output, "{}", render::render_companies(&companies))?;
        self.print_active_only()?;

        let Some(choice) = self.prompt(&format!(
            "Select a job (1-{}) or enter 0 to create a new job: ",
            companies.len()
        ))?
        else {
            return Ok(());
        };
        let selector = match choice.trim().parse::<usize>() {
            Ok(n) if n > 0 && n <= companies.len() => CompanySelector::Existing(n - 1),
            // 0 always creates, and with no companies there is nothing to pick
            Ok(0) => {
                let Some(name) = self.prompt("Enter the company name: ")? else {
                    return Ok(());
                };
                CompanySelector::New(name)
            }
            _ => {
                writeln!(self.output, "Invalid job selection.")?;
                return Ok(());
            }
        };

        let Some(rate) = self.prompt("Enter the pay rate per hour: ")? else {
            return Ok(());
        };
        let Ok(pay_rate) = rate.trim().parse::<f64>() else {
            writeln!(self.output, "Invalid pay rate.")?;
            return Ok(());
        };

        match self.tracker.start_session(selector, pay_rate) {
            Ok(outcome) => {
                if let Some(closed) = outcome.auto_closed {
                    writeln!(
                        self.output,
                        "Previous session for {} was closed.",
                        closed.company_name
                    )?;
                }
                writeln!(
                    self.output,
                    "START TIME STAMP: {}",
                    outcome.session.start_timestamp
                )?;
                writeln!(self.output, "Session started.")?;
            }
            Err(TimecardError::Validation(msg)) => writeln!(self.output, "{}", msg)?,
            Err(e) => return Err(e).context("Failed to save session"),
        }
        Ok(())
    }

    fn print_active_only(&mut self) -> Result<()> {
        if let Some(info) = active_session_info(self.tracker.profile()) {
            write!(self.output, "{}", render::render_status(Some(&info)))?;
        }
        Ok(())
    }

    fn clock_out(&mut self) -> Result<()> {
        if self.tracker.profile().active.is_none() {
            writeln!(self.output, "No active sessions.")?;
            return Ok(());
        }

        let Some(description) = self.prompt("Enter a brief description of the work done: ")?
        else {
            return Ok(());
        };

        match self
            .tracker
            .clock_out(&description)
            .context("Failed to save session")?
        {
            ClockOutOutcome::Closed(_) => writeln!(self.output, "Session ended.")?,
            ClockOutOutcome::NoActiveSession => writeln!(self.output, "No active sessions.")?,
        }
        Ok(())
    }

    fn display_sessions(&mut self) -> Result<()> {
        let Some(count) = self.prompt("How many sessions: ")? else {
            return Ok(());
        };
        let Ok(count) = count.trim().parse::<i64>() else {
            writeln!(self.output, "Invalid number.")?;
            return Ok(());
        };

        let recent = recent_sessions(self.tracker.profile(), count);
        write!(self.output, "{}", render::render_sessions(&recent))?;
        Ok(())
    }

    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;
        self.read_line()
    }

    /// Next line without its terminator; `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(&['\n', '\r'][..]).to_string();
        Ok(Some(trimmed))
    }
}
