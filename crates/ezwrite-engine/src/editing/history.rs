use std::collections::VecDeque;

use chrono::{DateTime, TimeDelta, Utc};

/// Default debounce window (ms) coalescing a burst of keystrokes into one entry.
pub const DEFAULT_DEBOUNCE_MS: i64 = 500;

/// Default number of undo entries kept.
pub const DEFAULT_CAPACITY: usize = 100;

/// Undo/redo over full document snapshots.
///
/// `push` is called with the text as it was *before* a change. Unforced
/// pushes inside the debounce window are dropped, so fast typing produces a
/// single entry per burst. The undo stack is bounded; the oldest entry goes
/// first.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<String>,
    redo: Vec<String>,
    last_push: Option<DateTime<Utc>>,
    debounce: TimeDelta,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(TimeDelta::milliseconds(DEFAULT_DEBOUNCE_MS), DEFAULT_CAPACITY)
    }
}

impl History {
    pub fn new(debounce: TimeDelta, capacity: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            last_push: None,
            debounce,
            capacity: capacity.max(1),
        }
    }

    /// Record `snapshot` ahead of an edit. Returns whether an entry was added.
    ///
    /// A new edit always invalidates the redo stack, even when the snapshot
    /// itself is coalesced into the previous entry.
    pub fn push(&mut self, snapshot: String, force: bool, now: DateTime<Utc>) -> bool {
        self.redo.clear();

        if !force
            && let Some(last) = self.last_push
            && now - last < self.debounce
        {
            return false;
        }

        self.undo.push_back(snapshot);
        while self.undo.len() > self.capacity {
            self.undo.pop_front();
        }
        self.last_push = Some(now);
        true
    }

    /// Step back. `current` is kept for redo; returns the text to restore.
    pub fn undo(&mut self, current: String) -> Option<String> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        self.last_push = None;
        Some(previous)
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self, current: String) -> Option<String> {
        let next = self.redo.pop()?;
        self.undo.push_back(current);
        while self.undo.len() > self.capacity {
            self.undo.pop_front();
        }
        self.last_push = None;
        Some(next)
    }

    /// Forget everything (e.g. when switching pages).
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.last_push = None;
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000 + ms).unwrap()
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let mut history = History::default();
        assert_eq!(history.undo("now".into()), None);
        assert_eq!(history.redo("now".into()), None);
    }

    #[test]
    fn test_burst_coalesces_into_one_entry() {
        let mut history = History::default();
        assert!(history.push("".into(), false, at(0)));
        assert!(!history.push("a".into(), false, at(100)));
        assert!(!history.push("ab".into(), false, at(499)));
        assert!(history.push("abc".into(), false, at(600)));
        assert_eq!(history.undo_len(), 2);
    }

    #[test]
    fn test_force_bypasses_debounce() {
        let mut history = History::default();
        assert!(history.push("a".into(), true, at(0)));
        assert!(history.push("b".into(), true, at(1)));
        assert_eq!(history.undo_len(), 2);
    }

    #[test]
    fn test_undo_n_then_redo_n_restores_latest() {
        let states: Vec<String> = (0..=5).map(|i| format!("state {i}")).collect();
        let mut history = History::default();
        let mut current = states[0].clone();
        for (i, next) in states.iter().enumerate().skip(1) {
            history.push(current.clone(), true, at(i as i64));
            current = next.clone();
        }

        for _ in 1..states.len() {
            current = history.undo(current).unwrap();
        }
        assert_eq!(current, states[0]);

        for _ in 1..states.len() {
            current = history.redo(current).unwrap();
        }
        assert_eq!(current, states[5]);
    }

    #[test]
    fn test_new_edit_after_undo_clears_redo() {
        let mut history = History::default();
        history.push("a".into(), true, at(0));
        let restored = history.undo("b".into()).unwrap();
        assert_eq!(restored, "a");
        assert!(history.can_redo());

        // Coalesced or not, a fresh edit drops the forward timeline
        history.push("a".into(), false, at(10));
        assert!(!history.can_redo());
        assert_eq!(history.redo("c".into()), None);
    }

    #[test]
    fn test_edit_right_after_undo_is_recorded() {
        let mut history = History::default();
        history.push("a".into(), false, at(0));
        history.undo("b".into());
        assert!(history.push("a".into(), false, at(50)));
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = History::new(TimeDelta::milliseconds(DEFAULT_DEBOUNCE_MS), 3);
        for i in 0..5 {
            history.push(format!("s{i}"), true, at(i));
        }
        assert_eq!(history.undo_len(), 3);

        let mut current = "s5".to_string();
        let mut seen = Vec::new();
        while let Some(previous) = history.undo(current.clone()) {
            seen.push(previous.clone());
            current = previous;
        }
        assert_eq!(seen, vec!["s4", "s3", "s2"]);
    }

    #[test]
    fn test_clear_forgets_both_stacks() {
        let mut history = History::default();
        history.push("a".into(), true, at(0));
        history.undo("b".into());
        history.push("c".into(), true, at(1));
        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
