use std::sync::LazyLock;

use regex::Regex;

static TRIGGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/\w{0,10}$").expect("valid slash trigger pattern"));

/// A command offered by the slash popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlashCommand {
    pub name: &'static str,
    pub description: &'static str,
}

/// The built-in commands, in popup order.
pub const SLASH_COMMANDS: [SlashCommand; 3] = [
    SlashCommand {
        name: "list",
        description: "Create a checklist",
    },
    SlashCommand {
        name: "line",
        description: "Insert a divider",
    },
    SlashCommand {
        name: "timer",
        description: "Start a timer",
    },
];

/// Whether a line's text opens the slash popup: a slash followed by up to ten
/// word characters and nothing else (surrounding whitespace ignored).
pub fn is_trigger(text: &str) -> bool {
    TRIGGER.is_match(text.trim())
}

/// Keys the popup reacts to while open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlashKey {
    Up,
    Down,
    Enter,
    Escape,
    /// A digit key, `1` selecting the first match
    Digit(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlashOutcome {
    /// The popup is closed or the key is not for it
    Ignored,
    /// The highlight moved
    Moved,
    /// A command was chosen for the triggering line; the popup is closed
    Commit { line: usize, command: SlashCommand },
    /// Escape closed the popup without choosing
    Dismissed,
}

/// State of an open popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashPopup {
    /// The triggering line
    pub line: usize,
    /// Text after the slash, lowercased
    pub query: String,
    /// Commands whose name starts with the query, in popup order
    pub matches: Vec<SlashCommand>,
    /// Highlighted entry, always within `matches`
    pub highlight: usize,
}

/// Trigger detection, live filtering and selection for slash commands.
#[derive(Debug, Clone)]
pub struct SlashController {
    commands: Vec<SlashCommand>,
    popup: Option<SlashPopup>,
}

impl Default for SlashController {
    fn default() -> Self {
        Self::new(SLASH_COMMANDS.to_vec())
    }
}

impl SlashController {
    pub fn new(commands: Vec<SlashCommand>) -> Self {
        Self {
            commands,
            popup: None,
        }
    }

    pub fn popup(&self) -> Option<&SlashPopup> {
        self.popup.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.popup.is_some()
    }

    pub fn close(&mut self) {
        self.popup = None;
    }

    /// Re-evaluate the popup for the line holding the cursor. Called after
    /// every keystroke; closes when the line stops being a trigger or no
    /// command matches.
    pub fn refresh(&mut self, line: usize, text: &str) {
        let trimmed = text.trim();
        if !is_trigger(trimmed) {
            self.close();
            return;
        }

        let query = trimmed[1..].to_lowercase();
        let matches: Vec<SlashCommand> = self
            .commands
            .iter()
            .filter(|cmd| cmd.name.to_lowercase().starts_with(&query))
            .copied()
            .collect();
        if matches.is_empty() {
            self.close();
            return;
        }

        let highlight = match &self.popup {
            Some(popup) if popup.line == line && popup.query == query => {
                popup.highlight.min(matches.len() - 1)
            }
            _ => 0,
        };

        self.popup = Some(SlashPopup {
            line,
            query,
            matches,
            highlight,
        });
    }

    /// Close the popup when the cursor leaves the triggering line.
    pub fn cursor_moved(&mut self, line: usize) {
        if self.popup.as_ref().is_some_and(|popup| popup.line != line) {
            self.close();
        }
    }

    pub fn handle_key(&mut self, key: SlashKey) -> SlashOutcome {
        let Some(popup) = self.popup.as_mut() else {
            return SlashOutcome::Ignored;
        };
        let last = popup.matches.len() - 1;

        match key {
            SlashKey::Down => {
                popup.highlight = (popup.highlight + 1).min(last);
                SlashOutcome::Moved
            }
            SlashKey::Up => {
                popup.highlight = popup.highlight.saturating_sub(1);
                SlashOutcome::Moved
            }
            SlashKey::Enter => {
                let index = popup.highlight;
                self.commit(index)
            }
            SlashKey::Digit(digit) => {
                let digit = usize::from(digit);
                if (1..=last + 1).contains(&digit) {
                    self.commit(digit - 1)
                } else {
                    SlashOutcome::Ignored
                }
            }
            SlashKey::Escape => {
                self.close();
                SlashOutcome::Dismissed
            }
        }
    }

    /// Pointer selection of the `index`-th visible match.
    pub fn pick(&mut self, index: usize) -> SlashOutcome {
        match &self.popup {
            Some(popup) if index < popup.matches.len() => self.commit(index),
            _ => SlashOutcome::Ignored,
        }
    }

    fn commit(&mut self, index: usize) -> SlashOutcome {
        match self.popup.take() {
            Some(popup) => SlashOutcome::Commit {
                line: popup.line,
                command: popup.matches[index],
            },
            None => SlashOutcome::Ignored,
        }
    }
}
