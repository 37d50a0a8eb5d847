use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableFocusChange, DisableMouseCapture, EnableBracketedPaste,
        EnableFocusChange, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ezwrite_config::Config;
use ezwrite_engine::export::{ExportFormat, export, export_file_name};
use ezwrite_engine::timer::{SystemClock, TimerControl, TimerEvent, TimerId};
use ezwrite_engine::{Editor, EditorKey, EditorSettings, LocalStore, Motion, io};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::{
    env,
    fs::{self, OpenOptions},
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
    rc::Rc,
    time::Duration,
};

mod ui;

const LOG_FILE: &str = "ezwrite.log";

struct App {
    editor: Editor,
    store: LocalStore,
    data_dir: PathBuf,
    tick: Duration,
    /// Last message shown in the status bar
    status: Option<String>,
    /// First document line shown
    scroll: usize,
    /// Where the document was drawn last frame, for mouse hit-testing
    editor_area: Rect,
    popup_area: Option<Rect>,
    quit: bool,
}

impl App {
    fn new(config: &Config) -> Result<Self> {
        let store = LocalStore::open(&config.data_dir)?;
        let pages = io::load_pages(&store);
        let settings = EditorSettings::from_millis(
            config.editor.undo_debounce_ms,
            config.editor.undo_capacity,
            config.editor.typing_timeout_ms,
        );
        let editor = Editor::new(pages, Rc::new(SystemClock), settings);
        log::info!(
            "Opened page {} from {}",
            editor.active_page() + 1,
            store.path().display()
        );

        Ok(Self {
            editor,
            store,
            data_dir: config.data_dir.clone(),
            tick: Duration::from_millis(config.editor.timer_tick_ms.max(50)),
            status: None,
            scroll: 0,
            editor_area: Rect::default(),
            popup_area: None,
            quit: false,
        })
    }

    fn on_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match (key.code, ctrl, alt) {
            (KeyCode::Char('q'), true, _) => self.quit = true,
            (KeyCode::Char('z'), true, _) => self.send(EditorKey::Undo),
            (KeyCode::Char('y'), true, _) => self.send(EditorKey::Redo),
            (KeyCode::Char('d'), true, _) => self.send(EditorKey::ToggleStrike),
            (KeyCode::Char('k'), true, _) => self.send(EditorKey::DeleteLine),
            (KeyCode::Char('p'), true, _) => self.control_timer(TimerControl::Toggle),
            (KeyCode::Char('r'), true, _) => self.control_timer(TimerControl::Restart),
            (KeyCode::Char('s'), true, _) => self.control_timer(TimerControl::Stop),
            (KeyCode::Char('e'), true, _) => self.export(ExportFormat::PlainText),
            (KeyCode::Char('t'), true, _) => self.export(ExportFormat::Markdown),
            (KeyCode::Home, true, _) => {
                self.editor.move_cursor(Motion::DocumentStart);
            }
            (KeyCode::End, true, _) => {
                self.editor.move_cursor(Motion::DocumentEnd);
            }
            (KeyCode::Up, _, true) => self.send(EditorKey::MoveLineUp),
            (KeyCode::Down, _, true) => self.send(EditorKey::MoveLineDown),
            (KeyCode::Char(c @ '1'..='5'), _, true) => self.switch_page(c as usize - '1' as usize),
            (KeyCode::F(n @ 1..=5), _, _) => self.switch_page(usize::from(n - 1)),
            (code, false, false) => {
                if let Some(key) = editor_key(code) {
                    self.send(key);
                }
            }
            _ => {}
        }
    }

    fn send(&mut self, key: EditorKey) {
        self.editor.handle_key(key);
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }

        if let Some(area) = self.popup_area
            && let Some(entry) = ui::popup_entry_at(area, mouse.column, mouse.row)
        {
            self.editor.slash_pick(entry);
            return;
        }

        match ui::hit_test(self, mouse.column, mouse.row) {
            Some(ui::Hit::Checkbox(line)) => {
                self.editor.click_checkbox(line);
            }
            Some(ui::Hit::Delete(line)) => {
                self.editor.click_delete(line);
            }
            Some(ui::Hit::Text(cursor)) => {
                self.editor.move_to(cursor);
            }
            None => {}
        }
    }

    /// Control the timer on the cursor line, or the nearest one above it.
    fn control_timer(&mut self, control: TimerControl) {
        let line = self.editor.cursor().line;
        let target = self
            .editor
            .timer_views()
            .iter()
            .map(|view| view.line)
            .filter(|&timer_line| timer_line <= line)
            .max();
        match target {
            Some(timer_line) => {
                self.editor.control_timer(timer_line, control);
            }
            None => self.status = Some("No timer above the cursor".to_string()),
        }
    }

    fn switch_page(&mut self, index: usize) {
        if self.editor.switch_page(index) {
            self.scroll = 0;
            self.status = Some(format!("Page {}", index + 1));
        }
    }

    fn export(&mut self, format: ExportFormat) {
        let file_name = export_file_name(format, Local::now().date_naive());
        let content = export(self.editor.document(), format);
        match io::write_export(&self.data_dir, &file_name, &content) {
            Ok(path) => {
                log::info!("Exported page {} to {}", self.editor.active_page() + 1, path.display());
                self.status = Some(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                log::error!("Export failed: {e}");
                self.status = Some(format!("Export failed: {e}"));
            }
        }
    }

    fn report(&mut self, events: Vec<(TimerId, TimerEvent)>) {
        for (_, event) in events {
            self.status = Some(match event {
                TimerEvent::Completed => "Timer finished".to_string(),
                TimerEvent::PhaseChanged(phase) => format!("Pomodoro: {phase:?} time"),
            });
        }
    }

    fn autosave(&mut self) {
        if self.editor.take_dirty() {
            self.save();
        }
    }

    fn save(&mut self) {
        if let Err(e) = io::save_pages(&mut self.store, &self.editor.pages()) {
            log::error!("Failed to save pages: {e}");
            self.status = Some(format!("Save failed: {e}"));
        }
    }
}

fn editor_key(code: KeyCode) -> Option<EditorKey> {
    Some(match code {
        KeyCode::Char(c) => EditorKey::Char(c),
        KeyCode::Enter => EditorKey::Enter,
        KeyCode::Backspace => EditorKey::Backspace,
        KeyCode::Delete => EditorKey::Delete,
        KeyCode::Tab => EditorKey::Tab,
        KeyCode::BackTab => EditorKey::BackTab,
        KeyCode::Esc => EditorKey::Escape,
        KeyCode::Left => EditorKey::Left,
        KeyCode::Right => EditorKey::Right,
        KeyCode::Up => EditorKey::Up,
        KeyCode::Down => EditorKey::Down,
        KeyCode::Home => EditorKey::Home,
        KeyCode::End => EditorKey::End,
        _ => return None,
    })
}

/// Log to a file in the data directory; the terminal belongs to the UI.
fn init_logging(data_dir: &Path) -> Result<()> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("creating data directory {}", data_dir.display()))?;
    let log_path = data_dir.join(LOG_FILE);
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    // Determine the data directory from CLI args or config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Fix or remove {}", config_path.display());
            process::exit(1);
        }
    };

    let config = match args.len() {
        1 => config,
        2 => config.with_data_dir(Path::new(&args[1])),
        _ => {
            eprintln!("Usage: {} [data-dir]", args[0]);
            process::exit(1);
        }
    };

    init_logging(&config.data_dir)?;
    log::info!("ezwrite starting up, config path: {}", config_path.display());

    let mut app = App::new(&config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);
    app.save();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("{err:?}");
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    while !app.quit {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(app.tick)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
                Event::Mouse(mouse) => app.on_mouse(mouse),
                Event::Paste(text) => {
                    app.editor.input_text(&text.replace("\r\n", "\n"));
                }
                Event::FocusGained => {
                    let events = app.editor.on_visible();
                    app.report(events);
                }
                _ => {}
            }
        }

        let events = app.editor.tick();
        app.report(events);
        app.autosave();
    }
    Ok(())
}
