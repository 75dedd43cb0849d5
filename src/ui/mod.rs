//! Selection menus
//!
//! The export flow only needs "pick one of these". `Selector` is that seam;
//! [`TerminalSelector`] draws it full-screen, tests script it.

mod terminal;

pub use terminal::TerminalSelector;

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::widgets::ListState;

use crate::error::Result;

/// Rows moved by PageUp/PageDown
const PAGE: usize = 10;

/// Single-choice picker
pub trait Selector {
    /// Block until the user picks one of `items`, returning its index,
    /// or `None` if they cancel.
    fn select(&mut self, title: &str, items: &[String]) -> Result<Option<usize>>;
}

/// Outcome of one key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Continue,
    Chosen(usize),
    Cancelled,
}

/// Cursor over a fixed number of rows
#[derive(Debug, Default)]
pub struct Menu {
    state: ListState,
    len: usize,
}

impl Menu {
    pub fn new(len: usize) -> Self {
        Self {
            state: ListState::default().with_selected((len > 0).then_some(0)),
            len,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    pub(crate) fn state_mut(&mut self) -> &mut ListState {
        &mut self.state
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> MenuAction {
        if key.kind != KeyEventKind::Press {
            return MenuAction::Continue;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                MenuAction::Cancelled
            }
            KeyCode::Esc | KeyCode::Char('q') => MenuAction::Cancelled,
            KeyCode::Enter => match self.selected() {
                Some(index) => MenuAction::Chosen(index),
                None => MenuAction::Continue,
            },
            KeyCode::Up | KeyCode::Char('k') => self.move_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.move_down(1),
            KeyCode::PageUp => self.move_up(PAGE),
            KeyCode::PageDown => self.move_down(PAGE),
            KeyCode::Home | KeyCode::Char('g') => self.move_up(self.len),
            KeyCode::End | KeyCode::Char('G') => self.move_down(self.len),
            _ => MenuAction::Continue,
        }
    }

    fn move_up(&mut self, by: usize) -> MenuAction {
        if let Some(current) = self.state.selected() {
            self.state.select(Some(current.saturating_sub(by)));
        }
        MenuAction::Continue
    }

    fn move_down(&mut self, by: usize) -> MenuAction {
        if let Some(current) = self.state.selected() {
            let last = self.len.saturating_sub(1);
            self.state.select(Some(current.saturating_add(by).min(last)));
        }
        MenuAction::Continue
    }
}
