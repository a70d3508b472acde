//! Countdown handlers
//!
//! Each call refreshes the stored countdown first, so a countdown that ran out
//! since the last command is reported once as finished.

use crate::Planner;
use crate::date;
use crate::formatting;
use crate::validation;
use anyhow::Result;

fn with_finished_notice(finished: bool, message: String) -> String {
    if finished {
        format!("Countdown finished.\n{}", message)
    } else {
        message
    }
}

impl Planner {
    pub async fn handle_countdown_start(&self, target: String) -> Result<String> {
        let tz = self.tz();
        let now = date::now_utc();
        let target = validation::parse_datetime(&target, tz)?;
        let (mut clock, _) = self.clock(now)?;
        clock.start(target, now)?;
        self.save_clock(&clock)?;
        Ok(formatting::format_clock(&clock, tz))
    }

    pub async fn handle_countdown_pause(&self) -> Result<String> {
        let now = date::now_utc();
        let (mut clock, finished) = self.clock(now)?;
        if finished {
            return Ok(with_finished_notice(true, formatting::format_clock(&clock, self.tz())));
        }
        clock.pause(now)?;
        self.save_clock(&clock)?;
        Ok(formatting::format_clock(&clock, self.tz()))
    }

    pub async fn handle_countdown_resume(&self) -> Result<String> {
        let now = date::now_utc();
        let (mut clock, _) = self.clock(now)?;
        clock.resume(now)?;
        self.save_clock(&clock)?;
        Ok(formatting::format_clock(&clock, self.tz()))
    }

    pub async fn handle_countdown_reset(&self) -> Result<String> {
        let (mut clock, _) = self.clock(date::now_utc())?;
        clock.reset();
        self.save_clock(&clock)?;
        Ok(formatting::format_clock(&clock, self.tz()))
    }

    pub async fn handle_countdown_mute(&self) -> Result<String> {
        let (mut clock, _) = self.clock(date::now_utc())?;
        let muted = clock.toggle_mute();
        self.save_clock(&clock)?;
        Ok(if muted { "Countdown muted" } else { "Countdown unmuted" }.to_string())
    }

    pub async fn handle_countdown_status(&self) -> Result<String> {
        let (clock, finished) = self.clock(date::now_utc())?;
        Ok(with_finished_notice(finished, formatting::format_clock(&clock, self.tz())))
    }
}
