//! Input - key handling and UI-only state

use crate::app::{AppState, Message, Page};
use crossterm::event::{KeyCode, KeyModifiers};
use std::path::PathBuf;

/// Focused input on the analyze page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Title,
    Description,
    FilePath,
    TrueLabel,
}

impl Focus {
    const ORDER: [Focus; 4] = [
        Focus::Title,
        Focus::Description,
        Focus::FilePath,
        Focus::TrueLabel,
    ];

    fn step(self, forward: bool) -> Focus {
        let len = Self::ORDER.len();
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        let next = if forward { (i + 1) % len } else { (i + len - 1) % len };
        Self::ORDER[next]
    }
}

/// State that only matters to the terminal front end
#[derive(Debug, Clone)]
pub struct TuiView {
    pub focus: Focus,
    /// Path typed into the file field, not yet attached
    pub file_input: String,
    /// Highlighted dashboard row
    pub selected_row: usize,
}

impl Default for TuiView {
    fn default() -> Self {
        Self {
            focus: Focus::Title,
            file_input: String::new(),
            selected_row: 0,
        }
    }
}

/// Translate a key press into an application message
pub fn handle_key(
    view: &mut TuiView,
    app: &AppState,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Option<Message> {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);

    match code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => return Some(Message::Quit),
        KeyCode::Esc if app.notice().is_some() => return Some(Message::DismissNotice),
        KeyCode::Esc => return Some(Message::Quit),
        KeyCode::Tab | KeyCode::BackTab => return Some(Message::NextPage),
        _ => {}
    }

    match app.page() {
        Page::Dashboard => dashboard_key(view, app, code, ctrl),
        Page::Analyze => analyze_key(view, app, code, ctrl),
    }
}

fn dashboard_key(view: &mut TuiView, app: &AppState, code: KeyCode, ctrl: bool) -> Option<Message> {
    let search = app.dashboard().search_input();
    match code {
        KeyCode::Char('f') if ctrl => Some(Message::CycleStatusFilter),
        KeyCode::Char('u') if ctrl => Some(Message::SearchChanged(String::new())),
        KeyCode::Char(c) if !ctrl => Some(Message::SearchChanged(format!("{}{}", search, c))),
        KeyCode::Backspace => Some(Message::SearchChanged(without_last(search))),
        KeyCode::Down => {
            let last = app.dashboard().visible(app.store().tickets()).len().saturating_sub(1);
            view.selected_row = (view.selected_row + 1).min(last);
            None
        }
        KeyCode::Up => {
            view.selected_row = view.selected_row.saturating_sub(1);
            None
        }
        _ => None,
    }
}

fn analyze_key(view: &mut TuiView, app: &AppState, code: KeyCode, ctrl: bool) -> Option<Message> {
    let form = app.analyze().form();
    match code {
        KeyCode::Char('s') if ctrl => Some(Message::Submit),
        KeyCode::Down => {
            view.focus = view.focus.step(true);
            None
        }
        KeyCode::Up => {
            view.focus = view.focus.step(false);
            None
        }
        KeyCode::Delete if view.focus == Focus::FilePath => Some(Message::RemoveFile),
        KeyCode::Enter => match view.focus {
            Focus::Title => {
                view.focus = Focus::Description;
                None
            }
            Focus::Description => Some(Message::Submit),
            Focus::FilePath => {
                let path = view.file_input.trim().to_string();
                if path.is_empty() {
                    return None;
                }
                view.file_input.clear();
                Some(Message::AttachFile(PathBuf::from(path)))
            }
            Focus::TrueLabel => Some(Message::SubmitFeedback),
        },
        KeyCode::Char(c) if !ctrl => match view.focus {
            Focus::Title => Some(Message::TitleChanged(format!("{}{}", form.title, c))),
            Focus::Description => {
                Some(Message::DescriptionChanged(format!("{}{}", form.description, c)))
            }
            Focus::FilePath => {
                view.file_input.push(c);
                None
            }
            Focus::TrueLabel => Some(Message::TrueLabelChanged(format!(
                "{}{}",
                app.analyze().true_label(),
                c
            ))),
        },
        KeyCode::Backspace => match view.focus {
            Focus::Title => Some(Message::TitleChanged(without_last(&form.title))),
            Focus::Description => Some(Message::DescriptionChanged(without_last(&form.description))),
            Focus::FilePath => {
                view.file_input.pop();
                None
            }
            Focus::TrueLabel => Some(Message::TrueLabelChanged(without_last(
                app.analyze().true_label(),
            ))),
        },
        _ => None,
    }
}

fn without_last(text: &str) -> String {
    let mut s = text.to_string();
    s.pop();
    s
}
