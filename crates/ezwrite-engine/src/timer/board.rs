use chrono::{DateTime, Local, Utc};
use uuid::Uuid;

use super::runtime::{TimerControl, TimerEvent, TimerRuntime};
use super::spec::TimerSpec;
use crate::editing::LineType;
use crate::editing::classify::timer_args;

/// Identifier for a live timer that survives line moves and re-renders
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TimerId(pub Uuid);

impl TimerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Debug, Clone)]
struct Slot {
    id: TimerId,
    line: usize,
    args: String,
    runtime: TimerRuntime,
}

/// What the host needs to draw one timer widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerView {
    pub id: TimerId,
    pub line: usize,
    pub label: &'static str,
    pub display: String,
    pub running: bool,
    pub done: bool,
}

/// The live timers of one page, keyed to the timer lines of its document.
///
/// Runtime state is never persisted. After every document change the board
/// is reconciled against the new lines: the k-th occurrence of a directive
/// keeps the runtime of the k-th occurrence before the change, so moving a
/// timer line or editing around it does not restart it. Order alone cannot
/// tell identical directives apart when one of them is deleted, so the
/// editor calls [`TimerBoard::forget_line`] for a removed line first.
#[derive(Debug, Clone, Default)]
pub struct TimerBoard {
    slots: Vec<Slot>,
}

impl TimerBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Match the board to the document's timer lines. A line in timer-edit
    /// mode is still being typed and gets no runtime.
    pub fn reconcile<S: AsRef<str>>(
        &mut self,
        lines: &[S],
        types: &[LineType],
        editing_line: Option<usize>,
        now: DateTime<Utc>,
    ) {
        let mut previous = std::mem::take(&mut self.slots);

        for (index, (line, kind)) in lines.iter().zip(types).enumerate() {
            if *kind != LineType::Timer || editing_line == Some(index) {
                continue;
            }
            let args = timer_args(line.as_ref()).trim().to_lowercase();

            let slot = match previous.iter().position(|slot| slot.args == args) {
                Some(found) => {
                    let mut slot = previous.remove(found);
                    slot.line = index;
                    slot
                }
                None => {
                    let spec = TimerSpec::parse_at(&args, &now.with_timezone(&Local));
                    log::debug!("starting {:?} timer on line {index}", spec.mode);
                    Slot {
                        id: TimerId::new(),
                        line: index,
                        args,
                        runtime: TimerRuntime::new(spec, now),
                    }
                }
            };
            self.slots.push(slot);
        }

        if !previous.is_empty() {
            log::debug!("dropping {} timer(s) no longer in the document", previous.len());
        }
    }

    /// Drop the runtime on `line`, which is about to leave the document.
    pub fn forget_line(&mut self, line: usize) {
        if let Some(found) = self.slots.iter().position(|slot| slot.line == line) {
            log::debug!("forgetting timer on removed line {line}");
            self.slots.remove(found);
        }
    }

    pub fn runtime_at(&self, line: usize) -> Option<&TimerRuntime> {
        self.slots
            .iter()
            .find(|slot| slot.line == line)
            .map(|slot| &slot.runtime)
    }

    /// The closest timer line strictly above `line`.
    pub fn nearest_above(&self, line: usize) -> Option<usize> {
        self.slots
            .iter()
            .map(|slot| slot.line)
            .filter(|&l| l < line)
            .max()
    }

    /// Apply `control` to the timer on `line`. Returns false if there is none.
    pub fn control(&mut self, line: usize, control: TimerControl, now: DateTime<Utc>) -> bool {
        match self.slots.iter_mut().find(|slot| slot.line == line) {
            Some(slot) => {
                log::debug!("{control:?} timer on line {line}");
                slot.runtime.apply(control, now);
                true
            }
            None => false,
        }
    }

    /// Re-synchronise every timer with the wall clock.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<(TimerId, TimerEvent)> {
        self.slots
            .iter_mut()
            .filter_map(|slot| slot.runtime.tick(now).map(|event| (slot.id, event)))
            .collect()
    }

    pub fn views(&self, now: DateTime<Utc>) -> Vec<TimerView> {
        self.slots
            .iter()
            .map(|slot| TimerView {
                id: slot.id,
                line: slot.line,
                label: slot.runtime.label(),
                display: slot.runtime.display(now),
                running: slot.runtime.is_running(),
                done: slot.runtime.is_done(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::classify::classify_all;
    use chrono::{TimeDelta, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn reconcile(board: &mut TimerBoard, lines: &[&str], now: DateTime<Utc>) {
        let types = classify_all(lines);
        board.reconcile(lines, &types, None, now);
    }

    #[test]
    fn test_one_runtime_per_timer_line() {
        let mut board = TimerBoard::new();
        reconcile(&mut board, &["notes", "timer 5", "more", "timer"], start());
        let views = board.views(start());
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].line, 1);
        assert_eq!(views[0].label, "COUNTDOWN");
        assert_eq!(views[0].display, "05:00");
        assert_eq!(views[1].line, 3);
        assert_eq!(views[1].label, "STOPWATCH");
    }

    #[test]
    fn test_moving_a_line_keeps_runtime() {
        let mut board = TimerBoard::new();
        reconcile(&mut board, &["timer 5", "a"], start());
        let id = board.views(start())[0].id;

        let later = start() + TimeDelta::seconds(30);
        reconcile(&mut board, &["a", "timer 5"], later);
        let views = board.views(later);
        assert_eq!(views[0].id, id);
        assert_eq!(views[0].line, 1);
        assert_eq!(views[0].display, "04:30");
    }

    #[test]
    fn test_changed_directive_gets_fresh_runtime() {
        let mut board = TimerBoard::new();
        reconcile(&mut board, &["timer 5"], start());
        let id = board.views(start())[0].id;
        reconcile(&mut board, &["timer 10"], start());
        assert_ne!(board.views(start())[0].id, id);
    }

    #[test]
    fn test_forgotten_line_keeps_identical_survivor() {
        let mut board = TimerBoard::new();
        reconcile(&mut board, &["timer 5", "timer 5"], start());
        let second = board.views(start())[1].id;
        board.control(1, TimerControl::Toggle, start());

        board.forget_line(0);
        reconcile(&mut board, &["timer 5"], start());
        let views = board.views(start());
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].id, second);
        assert!(!views[0].running);
    }

    #[test]
    fn test_editing_line_has_no_runtime() {
        let mut board = TimerBoard::new();
        let lines = ["timer 5"];
        let types = classify_all(&lines);
        board.reconcile(&lines, &types, Some(0), start());
        assert!(board.is_empty());
    }

    #[test]
    fn test_control_nearest_above() {
        let mut board = TimerBoard::new();
        reconcile(&mut board, &["timer 5", "x", "timer", "y"], start());
        assert_eq!(board.nearest_above(3), Some(2));
        assert_eq!(board.nearest_above(2), Some(0));
        assert_eq!(board.nearest_above(0), None);

        assert!(board.control(2, TimerControl::Toggle, start()));
        assert!(!board.runtime_at(2).unwrap().is_running());
        assert!(board.runtime_at(0).unwrap().is_running());
        assert!(!board.control(1, TimerControl::Stop, start()));
    }

    #[test]
    fn test_tick_reports_completion() {
        let mut board = TimerBoard::new();
        reconcile(&mut board, &["timer 1", "timer"], start());
        let id = board.views(start())[0].id;
        let events = board.tick(start() + TimeDelta::seconds(61));
        assert_eq!(events, vec![(id, TimerEvent::Completed)]);
    }
}
