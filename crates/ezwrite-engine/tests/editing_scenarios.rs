use std::rc::Rc;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;

use ezwrite_engine::editing::strike::{self, STRUCK_MARKER};
use ezwrite_engine::editing::{
    Editor, EditorKey, History, LineType, LogicalCursor, SyncPath, classify, classify_all,
    extract_lines, render_surface,
};
use ezwrite_engine::export::{ExportFormat, export};
use ezwrite_engine::timer::{
    ManualClock, Phase, TimerEvent, TimerMode, TimerRuntime, TimerSpec,
};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap()
}

fn clock() -> ManualClock {
    ManualClock::new(start())
}

fn editor(text: &str) -> (Editor, ManualClock) {
    let clock = clock();
    (Editor::from_text(text, Rc::new(clock.clone())), clock)
}

fn type_str(editor: &mut Editor, text: &str) {
    for c in text.chars() {
        editor.handle_key(EditorKey::Char(c));
    }
}

/// Documents mixing every line type, blank runs and struck lines
fn corpus() -> Vec<Vec<String>> {
    let struck = format!("{STRUCK_MARKER}done");
    [
        "",
        "list\nbuy milk\n\nfoo",
        "list\n\n\nafter",
        "list\nline\nx",
        "list\ntimer\nx",
        "list\n# head\nx",
        "LIST\na\nb\n  c",
        "# one\n## two\n#three\n##four",
        "timer 5\ntimer pomo\nTimer\ntimerx",
        "list\nSTRUCK\nnext",
    ]
    .iter()
    .map(|doc| {
        doc.replace("STRUCK", &struck)
            .split('\n')
            .map(str::to_string)
            .collect()
    })
    .collect()
}

#[test]
fn classification_depends_only_on_preceding_lines() {
    for lines in corpus() {
        for i in 0..lines.len() {
            let expected = classify(&lines, i);
            assert_eq!(classify(&lines[..=i], i), expected);

            let mut changed_tail = lines.clone();
            changed_tail.truncate(i + 1);
            changed_tail.extend(["list".to_string(), String::new(), "line".to_string()]);
            assert_eq!(classify(&changed_tail, i), expected);
        }
    }
}

#[test]
fn classification_is_idempotent() {
    for lines in corpus() {
        assert_eq!(classify_all(&lines), classify_all(&lines));
    }
}

#[test]
fn render_then_extract_is_lossless() {
    for lines in corpus() {
        let types = classify_all(&lines);
        let surface = render_surface(&lines, &types, None);
        assert_eq!(extract_lines(&surface), lines);
    }
}

#[rstest]
#[case("plain")]
#[case("")]
#[case("\u{200B}\u{2713}already")]
#[case("\u{200B}half")]
fn strike_round_trip(#[case] line: &str) {
    assert_eq!(strike::clean(&strike::mark(strike::clean(line))), strike::clean(line));
}

#[test]
fn list_scenario() {
    assert_eq!(
        classify_all(&["list", "buy milk", "", "foo"]),
        vec![
            LineType::ListHeader,
            LineType::ListItem,
            LineType::Text,
            LineType::Text
        ]
    );
}

#[test]
fn direct_edits_stay_on_the_edited_line() {
    let (mut editor, _) = editor("list\nmilk\n\nprose here");
    for (line, offset) in [(1, 2), (3, 0), (3, 10)] {
        editor.move_to(LogicalCursor::new(line, offset));
        for key in [
            EditorKey::Char('z'),
            EditorKey::Char('ß'),
            EditorKey::Backspace,
            EditorKey::Left,
            EditorKey::Delete,
        ] {
            let patch = editor.handle_key(key);
            if patch.path == SyncPath::Direct {
                assert_eq!(patch.cursor.line, line);
            }
        }
    }
}

#[test]
fn undo_all_then_redo_all_restores_latest() {
    let states: Vec<String> = (0..=6).map(|i| format!("s{i}")).collect();
    let mut history = History::default();
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut current = states[0].clone();
    for next in &states[1..] {
        history.push(current.clone(), true, at);
        current = next.clone();
    }
    for _ in 1..states.len() {
        current = history.undo(current).unwrap();
    }
    assert_eq!(current, "s0");
    for _ in 1..states.len() {
        current = history.redo(current).unwrap();
    }
    assert_eq!(current, "s6");
}

#[test]
fn five_minute_countdown_completes_without_going_negative() {
    let start = start();
    let mut timer = TimerRuntime::new(TimerSpec::parse_at("5", &start), start);
    let end = start + TimeDelta::seconds(301);
    assert_eq!(timer.tick(end), Some(TimerEvent::Completed));
    assert!(timer.is_done());
    assert_eq!(timer.seconds(end), 0);
}

#[test]
fn pomodoro_flips_to_break_once() {
    let start = start();
    let mut timer = TimerRuntime::new(TimerSpec::parse_at("1 1", &start), start);
    let mut flips = 0;
    for s in 0..=61 {
        if let Some(TimerEvent::PhaseChanged(_)) = timer.tick(start + TimeDelta::seconds(s)) {
            flips += 1;
            assert_eq!(timer.seconds(start + TimeDelta::seconds(s)), 60);
        }
    }
    assert_eq!(flips, 1);
    assert_eq!(timer.phase(), Phase::Break);
}

#[test]
fn timer_directive_parses_to_countdown() {
    let (editor, _) = editor("timer 5");
    assert_eq!(editor.line_types(), &[LineType::Timer]);
    let spec = TimerSpec::parse_at(
        &ezwrite_engine::editing::classify::timer_args(&editor.document().lines()[0]),
        &Utc::now(),
    );
    assert_eq!(spec.mode, TimerMode::Countdown);
    assert_eq!(spec.initial_secs, 300);
}

#[test]
fn slash_filter_and_digit_commit() {
    let (mut editor, _) = editor("");
    type_str(&mut editor, "/li");
    let names: Vec<&str> = editor
        .slash_popup()
        .unwrap()
        .matches
        .iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["list", "line"]);

    editor.handle_key(EditorKey::Char('2'));
    assert_eq!(editor.text(), "line\n");
    assert_eq!(editor.line_types(), &[LineType::Divider, LineType::Text]);
}

#[test]
fn struck_item_exports_as_checked_task() {
    let (mut editor, _) = editor("list\nbuy milk");
    editor.click_checkbox(1);
    let markdown = export(editor.document(), ExportFormat::Markdown);
    assert_eq!(markdown, "- [x] buy milk");
}

#[test]
fn building_a_checklist_from_scratch() {
    let (mut editor, _) = editor("");
    type_str(&mut editor, "/list");
    editor.handle_key(EditorKey::Enter);
    type_str(&mut editor, "milk");
    editor.handle_key(EditorKey::Enter);
    type_str(&mut editor, "eggs");
    editor.handle_key(EditorKey::ToggleStrike);
    editor.handle_key(EditorKey::Enter);
    editor.handle_key(EditorKey::Enter);
    type_str(&mut editor, "notes");

    assert_eq!(
        editor.document().lines(),
        &[
            "list".to_string(),
            "milk".to_string(),
            format!("{STRUCK_MARKER}eggs"),
            String::new(),
            "notes".to_string(),
        ]
    );
    assert_eq!(
        editor.line_types(),
        &[
            LineType::ListHeader,
            LineType::ListItem,
            LineType::ListItem,
            LineType::Text,
            LineType::Text
        ]
    );
    assert_eq!(editor.cursor(), LogicalCursor::new(4, 5));
}
