use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveTime, TimeDelta, TimeZone};
use regex::Regex;
use serde::{Deserialize, Serialize};

static POMODORO_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(\d+)$").expect("valid pomodoro pattern"));
static CLOCK_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("valid clock pattern"));
static MINUTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)$").expect("valid minutes pattern"));

const POMODORO_WORK_SECS: u64 = 25 * 60;
const POMODORO_BREAK_SECS: u64 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimerMode {
    /// Counts up from zero, forever
    Stopwatch,
    /// Counts down to zero, then stops
    Countdown,
    /// Alternates work and break countdowns
    Pomodoro { work_secs: u64, break_secs: u64 },
}

/// Parsed timer directive: its mode and the starting value in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSpec {
    pub mode: TimerMode,
    pub initial_secs: u64,
}

impl TimerSpec {
    pub fn stopwatch() -> Self {
        Self {
            mode: TimerMode::Stopwatch,
            initial_secs: 0,
        }
    }

    fn countdown(secs: u64) -> Self {
        Self {
            mode: TimerMode::Countdown,
            initial_secs: secs,
        }
    }

    fn pomodoro(work_secs: u64, break_secs: u64) -> Self {
        Self {
            mode: TimerMode::Pomodoro {
                work_secs,
                break_secs,
            },
            initial_secs: work_secs,
        }
    }

    /// Parse a directive argument against the local clock.
    pub fn parse(args: &str) -> Self {
        Self::parse_at(args, &Local::now())
    }

    /// Parse a directive argument. `now` only matters for `<h>:<mm>`, which
    /// counts down to that wall-clock time today, or tomorrow if it has
    /// passed. Anything unrecognised is a stopwatch.
    pub fn parse_at<Tz: TimeZone>(args: &str, now: &DateTime<Tz>) -> Self {
        let args = args.trim().to_lowercase();

        if args.is_empty() {
            return Self::stopwatch();
        }
        if args == "pomo" {
            return Self::pomodoro(POMODORO_WORK_SECS, POMODORO_BREAK_SECS);
        }
        if let Some(caps) = POMODORO_PAIR.captures(&args) {
            return match (minutes_to_secs(&caps[1]), minutes_to_secs(&caps[2])) {
                (Some(work), Some(rest)) => Self::pomodoro(work, rest),
                _ => Self::stopwatch(),
            };
        }
        if let Some(caps) = CLOCK_TIME.captures(&args) {
            return match secs_until(&caps[1], &caps[2], now) {
                Some(secs) => Self::countdown(secs),
                None => Self::stopwatch(),
            };
        }
        if let Some(caps) = MINUTES.captures(&args) {
            return match minutes_to_secs(&caps[1]) {
                Some(secs) => Self::countdown(secs),
                None => Self::stopwatch(),
            };
        }

        Self::stopwatch()
    }
}

fn minutes_to_secs(digits: &str) -> Option<u64> {
    digits.parse::<u64>().ok()?.checked_mul(60)
}

fn secs_until<Tz: TimeZone>(hours: &str, minutes: &str, now: &DateTime<Tz>) -> Option<u64> {
    let time = NaiveTime::from_hms_opt(hours.parse().ok()?, minutes.parse().ok()?, 0)?;
    let local_now = now.naive_local();
    let mut target = local_now.date().and_time(time);
    if target <= local_now {
        target += TimeDelta::days(1);
    }
    u64::try_from((target - local_now).num_seconds()).ok()
}
