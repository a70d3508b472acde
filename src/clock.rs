//! Countdown timer state
//!
//! A running countdown stores its target instant; a paused one stores only the
//! remaining milliseconds. Every operation takes `now` explicitly, so the
//! state machine is driven by whoever owns the clock.

use crate::storage::{Storage, keys};
use anyhow::{Result, bail};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockState {
    /// Target of a running countdown; stored as `""` when there is none
    #[serde(
        rename = "countdownTargetISO",
        serialize_with = "serialize_target",
        deserialize_with = "deserialize_target"
    )]
    pub target: Option<DateTime<Utc>>,
    #[serde(rename = "remainingMs")]
    pub remaining_ms: i64,
    pub running: bool,
    pub muted: bool,
}

fn serialize_target<S: Serializer>(
    target: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match target {
        Some(instant) => {
            serializer.serialize_str(&instant.to_rfc3339_opts(SecondsFormat::Millis, true))
        }
        None => serializer.serialize_str(""),
    }
}

fn deserialize_target<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let text: Option<String> = Option::deserialize(deserializer)?;
    Ok(text
        .as_deref()
        .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
        .map(|instant| instant.with_timezone(&Utc)))
}

impl ClockState {
    pub fn load(storage: &Storage) -> Self {
        storage.get_state(keys::CLOCK, ClockState::default())
    }

    pub fn save(&self, storage: &Storage) -> Result<()> {
        storage.set_state(keys::CLOCK, self)
    }

    /// Start counting down to `target`
    pub fn start(&mut self, target: DateTime<Utc>, now: DateTime<Utc>) -> Result<()> {
        if target <= now {
            bail!("Target time must be later than the current time");
        }
        self.target = Some(target);
        self.running = true;
        self.remaining_ms = (target - now).num_milliseconds();
        Ok(())
    }

    /// Freeze the remaining time
    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<()> {
        let Some(target) = self.target.filter(|_| self.running) else {
            bail!("Countdown is not running");
        };
        self.remaining_ms = (target - now).num_milliseconds().max(0);
        self.running = false;
        self.target = None;
        Ok(())
    }

    /// Continue a paused countdown from its remaining time
    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.running {
            bail!("Countdown is already running");
        }
        if self.remaining_ms <= 0 {
            bail!("No paused countdown to resume");
        }
        let target = Duration::try_milliseconds(self.remaining_ms)
            .and_then(|remaining| now.checked_add_signed(remaining));
        let Some(target) = target else {
            bail!("Stored countdown time is out of range");
        };
        self.target = Some(target);
        self.running = true;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.target = None;
        self.remaining_ms = 0;
        self.running = false;
    }

    /// Flip the mute flag and return the new value
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Refresh `remaining_ms` against `now`
    ///
    /// # Returns
    /// `true` exactly when this call observed the countdown reaching zero
    pub fn recalc(&mut self, now: DateTime<Utc>) -> bool {
        let Some(target) = self.target.filter(|_| self.running) else {
            return false;
        };
        let remaining = (target - now).num_milliseconds();
        if remaining <= 0 {
            self.reset();
            return true;
        }
        self.remaining_ms = remaining;
        false
    }

    /// Remaining time as `HH:MM:SS`; hours keep counting past 24
    pub fn format_remaining(&self) -> String {
        format_remaining(self.remaining_ms)
    }
}

pub fn format_remaining(remaining_ms: i64) -> String {
    let total_seconds = remaining_ms.max(0) / 1000;
    format!(
        "{:02}:{:02}:{:02}",
        total_seconds / 3600,
        (total_seconds % 3600) / 60,
        total_seconds % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use tempfile::TempDir;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, h, m, s).unwrap()
    }

    #[test]
    fn test_start_requires_future_target() {
        let mut clock = ClockState::default();
        assert!(clock.start(at(9, 0, 0), at(9, 0, 0)).is_err());
        assert!(!clock.running);

        clock.start(at(10, 0, 0), at(9, 0, 0)).unwrap();
        assert!(clock.running);
        assert_eq!(clock.remaining_ms, 3_600_000);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut clock = ClockState::default();
        clock.start(at(10, 0, 0), at(9, 0, 0)).unwrap();
        clock.pause(at(9, 30, 0)).unwrap();
        assert!(!clock.running);
        assert_eq!(clock.target, None);
        assert_eq!(clock.remaining_ms, 1_800_000);
        assert!(clock.pause(at(9, 31, 0)).is_err());

        clock.resume(at(12, 0, 0)).unwrap();
        assert_eq!(clock.target, Some(at(12, 30, 0)));
        assert!(clock.resume(at(12, 1, 0)).is_err());
    }

    #[test]
    fn test_resume_without_remaining_fails() {
        let mut clock = ClockState::default();
        assert!(clock.resume(at(9, 0, 0)).is_err());
    }

    #[test]
    fn test_resume_with_out_of_range_remaining_fails() {
        let mut clock = ClockState {
            remaining_ms: i64::MAX,
            ..ClockState::default()
        };
        assert!(clock.resume(at(9, 0, 0)).is_err());
        assert!(!clock.running);
        assert_eq!(clock.target, None);
    }

    #[test]
    fn test_recalc_reports_finish_once() {
        let mut clock = ClockState::default();
        clock.start(at(9, 0, 10), at(9, 0, 0)).unwrap();
        assert!(!clock.recalc(at(9, 0, 4)));
        assert_eq!(clock.remaining_ms, 6_000);

        assert!(clock.recalc(at(9, 0, 10)));
        assert!(!clock.running);
        assert_eq!(clock.remaining_ms, 0);
        assert_eq!(clock.target, None);
        assert!(!clock.recalc(at(9, 0, 11)));
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(0), "00:00:00");
        assert_eq!(format_remaining(-5), "00:00:00");
        assert_eq!(format_remaining(3_723_999), "01:02:03");
        assert_eq!(format_remaining(100 * 3_600_000), "100:00:00");
    }

    #[test]
    fn test_stored_shape() {
        let mut clock = ClockState::default();
        assert!(clock.toggle_mute());
        let value = serde_json::to_value(&clock).unwrap();
        assert_eq!(
            value,
            json!({"countdownTargetISO": "", "remainingMs": 0, "running": false, "muted": true})
        );

        clock.start(at(10, 0, 0), at(9, 0, 0)).unwrap();
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        clock.save(&storage).unwrap();
        assert_eq!(ClockState::load(&storage), clock);
    }
}
