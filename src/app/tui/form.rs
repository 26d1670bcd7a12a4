use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::entry::{CATEGORIES, Entry, MAX_EPISODES, MAX_RATING, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormField {
    Title,
    Category,
    Status,
    Rating,
    Episodes,
    Notes,
}

impl FormField {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Title => "Title *",
            Self::Category => "Category *",
            Self::Status => "Status",
            Self::Rating => "Rating (0-5)",
            Self::Episodes => "Episodes Watched",
            Self::Notes => "Notes",
        }
    }

    pub(crate) fn is_text(self) -> bool {
        matches!(self, Self::Title | Self::Category | Self::Notes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormMode {
    Add,
    Edit { position: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormOutcome {
    Continue,
    Submit,
    Cancel,
}

/// Field values being edited, independent of the terminal.
#[derive(Debug, Clone)]
pub(crate) struct FormState {
    pub(crate) mode: FormMode,
    pub(crate) title: String,
    pub(crate) category: String,
    pub(crate) status: Status,
    pub(crate) rating: u8,
    pub(crate) episodes: u32,
    pub(crate) notes: String,
    pub(crate) focus: FormField,
}

impl FormState {
    pub(crate) fn blank() -> Self {
        Self {
            mode: FormMode::Add,
            title: String::new(),
            category: String::new(),
            status: Status::default(),
            rating: 0,
            episodes: 0,
            notes: String::new(),
            focus: FormField::Title,
        }
    }

    pub(crate) fn edit(position: usize, entry: &Entry) -> Self {
        Self {
            mode: FormMode::Edit { position },
            title: entry.title.clone(),
            category: entry.category.clone(),
            status: entry.status,
            rating: entry.rating.min(MAX_RATING),
            episodes: entry.episodes.unwrap_or(0),
            notes: entry.notes.clone(),
            focus: FormField::Title,
        }
    }

    /// Episodes only shows up while the status is Watching.
    pub(crate) fn visible_fields(&self) -> Vec<FormField> {
        let mut fields = vec![
            FormField::Title,
            FormField::Category,
            FormField::Status,
            FormField::Rating,
        ];
        if self.status == Status::Watching {
            fields.push(FormField::Episodes);
        }
        fields.push(FormField::Notes);
        fields
    }

    pub(crate) fn to_draft(&self) -> Entry {
        Entry {
            title: self.title.clone(),
            category: self.category.clone(),
            status: self.status,
            rating: self.rating,
            episodes: (self.status == Status::Watching).then_some(self.episodes),
            notes: self.notes.clone(),
            image: String::new(),
        }
    }

    pub(crate) fn field_value(&self, field: FormField) -> String {
        match field {
            FormField::Title => self.title.clone(),
            FormField::Category => self.category.clone(),
            FormField::Status => self.status.label().to_string(),
            FormField::Rating => self.rating.to_string(),
            FormField::Episodes => self.episodes.to_string(),
            FormField::Notes => self.notes.clone(),
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> FormOutcome {
        match key.code {
            KeyCode::Esc => return FormOutcome::Cancel,
            KeyCode::Enter => return FormOutcome::Submit,
            KeyCode::Tab | KeyCode::Down => self.move_focus(true),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(false),
            KeyCode::Right => self.adjust(true),
            KeyCode::Left => self.adjust(false),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.insert_char(ch)
            }
            _ => {}
        }
        FormOutcome::Continue
    }

    fn move_focus(&mut self, forward: bool) {
        let fields = self.visible_fields();
        let current = fields
            .iter()
            .position(|field| *field == self.focus)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % fields.len()
        } else {
            (current + fields.len() - 1) % fields.len()
        };
        self.focus = fields[next];
    }

    fn adjust(&mut self, forward: bool) {
        match self.focus {
            FormField::Category => {
                self.category = cycle_category(&self.category, forward).to_string();
            }
            FormField::Status => {
                self.status = if forward {
                    self.status.next()
                } else {
                    self.status.previous()
                };
            }
            FormField::Rating => {
                self.rating = if forward {
                    (self.rating + 1).min(MAX_RATING)
                } else {
                    self.rating.saturating_sub(1)
                };
            }
            FormField::Episodes => {
                self.episodes = if forward {
                    (self.episodes + 1).min(MAX_EPISODES)
                } else {
                    self.episodes.saturating_sub(1)
                };
            }
            FormField::Title | FormField::Notes => {}
        }
    }

    fn backspace(&mut self) {
        match self.focus {
            FormField::Title => {
                self.title.pop();
            }
            FormField::Category => {
                self.category.pop();
            }
            FormField::Notes => {
                self.notes.pop();
            }
            FormField::Rating => self.rating = 0,
            FormField::Episodes => self.episodes /= 10,
            FormField::Status => {}
        }
    }

    fn insert_char(&mut self, ch: char) {
        match self.focus {
            FormField::Title => self.title.push(ch),
            FormField::Category => self.category.push(ch),
            FormField::Notes => self.notes.push(ch),
            FormField::Rating => {
                if let Some(digit) = ch.to_digit(10)
                    && digit <= u32::from(MAX_RATING)
                {
                    self.rating = digit as u8;
                }
            }
            FormField::Episodes => {
                if let Some(digit) = ch.to_digit(10) {
                    self.episodes = self
                        .episodes
                        .saturating_mul(10)
                        .saturating_add(digit)
                        .min(MAX_EPISODES);
                }
            }
            FormField::Status => {
                if ch == ' ' {
                    self.status = self.status.next();
                }
            }
        }
    }
}

fn cycle_category(current: &str, forward: bool) -> &'static str {
    let count = CATEGORIES.len();
    let index = CATEGORIES
        .iter()
        .position(|category| category.eq_ignore_ascii_case(current.trim()));
    let next = match (index, forward) {
        (Some(idx), true) => (idx + 1) % count,
        (Some(idx), false) => (idx + count - 1) % count,
        (None, true) => 0,
        (None, false) => count - 1,
    };
    CATEGORIES[next]
}
