use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::spec::{TimerMode, TimerSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Work,
    Break,
}

/// Something the host may want to react to (sound, notification).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// A countdown reached zero and stopped
    Completed,
    /// A pomodoro phase ran out and the next one started
    PhaseChanged(Phase),
}

/// External controls, also reachable by typing `timer p|r|s` below a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerControl {
    /// Pause or resume
    Toggle,
    /// Back to the initial state, running
    Restart,
    /// Back to the initial state, paused
    Stop,
}

impl TimerControl {
    pub fn from_token(args: &str) -> Option<Self> {
        match args.trim().to_lowercase().as_str() {
            "p" => Some(Self::Toggle),
            "r" => Some(Self::Restart),
            "s" => Some(Self::Stop),
            _ => None,
        }
    }
}

/// Live state of one timer line.
///
/// The displayed value is never decremented in place. While running it is
/// derived from `base` and the time since `epoch`, so a late or skipped tick
/// only delays the display, never skews it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerRuntime {
    spec: TimerSpec,
    phase: Phase,
    /// Elapsed seconds for a stopwatch, remaining seconds otherwise
    base: u64,
    /// Set while running
    epoch: Option<DateTime<Utc>>,
    done: bool,
}

impl TimerRuntime {
    /// A fresh timer starts running immediately.
    pub fn new(spec: TimerSpec, now: DateTime<Utc>) -> Self {
        Self {
            spec,
            phase: Phase::Work,
            base: spec.initial_secs,
            epoch: Some(now),
            done: false,
        }
    }

    pub fn spec(&self) -> &TimerSpec {
        &self.spec
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.epoch.is_some()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    fn elapsed(&self, now: DateTime<Utc>) -> u64 {
        self.epoch
            .map(|epoch| u64::try_from((now - epoch).num_seconds()).unwrap_or(0))
            .unwrap_or(0)
    }

    /// The value to display at `now`: elapsed for a stopwatch, remaining
    /// (never below zero) otherwise.
    pub fn seconds(&self, now: DateTime<Utc>) -> u64 {
        if self.done {
            return 0;
        }
        let elapsed = self.elapsed(now);
        match self.spec.mode {
            TimerMode::Stopwatch => self.base.saturating_add(elapsed),
            TimerMode::Countdown | TimerMode::Pomodoro { .. } => self.base.saturating_sub(elapsed),
        }
    }

    /// Re-synchronise against the wall clock. Call on every periodic tick and
    /// whenever the host becomes visible again after being suspended.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<TimerEvent> {
        let epoch = self.epoch?;
        if self.done {
            return None;
        }

        let remaining = match self.spec.mode {
            TimerMode::Stopwatch => return None,
            TimerMode::Countdown | TimerMode::Pomodoro { .. } => {
                i64::try_from(self.base).unwrap_or(i64::MAX) - (now - epoch).num_seconds()
            }
        };
        if remaining > 0 {
            return None;
        }

        match self.spec.mode {
            TimerMode::Pomodoro {
                work_secs,
                break_secs,
            } => {
                self.phase = match self.phase {
                    Phase::Work => Phase::Break,
                    Phase::Break => Phase::Work,
                };
                self.base = match self.phase {
                    Phase::Work => work_secs,
                    Phase::Break => break_secs,
                };
                self.epoch = Some(now);
                Some(TimerEvent::PhaseChanged(self.phase))
            }
            _ => {
                self.base = 0;
                self.epoch = None;
                self.done = true;
                Some(TimerEvent::Completed)
            }
        }
    }

    /// Pause a running timer, resume a paused one. A finished countdown
    /// starts over.
    pub fn toggle(&mut self, now: DateTime<Utc>) {
        if self.done {
            self.base = self.spec.initial_secs;
            self.done = false;
            self.epoch = Some(now);
            return;
        }

        match self.epoch {
            Some(_) => {
                self.base = self.seconds(now);
                self.epoch = None;
            }
            None => self.epoch = Some(now),
        }
    }

    pub fn restart(&mut self, now: DateTime<Utc>) {
        self.reset();
        self.epoch = Some(now);
    }

    pub fn stop(&mut self) {
        self.reset();
        self.epoch = None;
    }

    fn reset(&mut self) {
        self.phase = Phase::Work;
        self.done = false;
        self.base = match self.spec.mode {
            TimerMode::Stopwatch => 0,
            _ => self.spec.initial_secs,
        };
    }

    pub fn apply(&mut self, control: TimerControl, now: DateTime<Utc>) {
        match control {
            TimerControl::Toggle => self.toggle(now),
            TimerControl::Restart => self.restart(now),
            TimerControl::Stop => self.stop(),
        }
    }

    pub fn label(&self) -> &'static str {
        match (self.spec.mode, self.phase) {
            (TimerMode::Pomodoro { .. }, Phase::Work) => "WORK",
            (TimerMode::Pomodoro { .. }, Phase::Break) => "BREAK",
            (TimerMode::Countdown, _) => "COUNTDOWN",
            (TimerMode::Stopwatch, _) => "STOPWATCH",
        }
    }

    pub fn display(&self, now: DateTime<Utc>) -> String {
        if self.done {
            "00:00 ✓".to_string()
        } else {
            format_time(self.seconds(now))
        }
    }
}

/// `h:mm:ss` from one hour up, `mm:ss` below.
pub fn format_time(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}
