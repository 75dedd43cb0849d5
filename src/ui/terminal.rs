//! Full-screen menu drawn with ratatui

use std::io;

use ratatui::crossterm::event::{self, Event};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, List, Paragraph};
use ratatui::{DefaultTerminal, Frame};
use tracing::{debug, warn};

use super::{Menu, MenuAction, Selector};
use crate::error::{Error, Result};

const HELP: &str = " ↑/↓ move   Enter select   Esc cancel";

/// Selector that takes over the terminal while a menu is open
#[derive(Debug, Default)]
pub struct TerminalSelector;

impl TerminalSelector {
    pub fn new() -> Self {
        Self
    }
}

impl Selector for TerminalSelector {
    fn select(&mut self, title: &str, items: &[String]) -> Result<Option<usize>> {
        if items.is_empty() {
            return Ok(None);
        }

        let mut session = Session::start().map_err(Error::Terminal)?;
        let mut menu = Menu::new(items.len());

        loop {
            session
                .terminal
                .draw(|frame| draw(frame, title, items, &mut menu))
                .map_err(Error::Terminal)?;

            if let Event::Key(key) = event::read().map_err(Error::Terminal)? {
                match menu.handle_key(key) {
                    MenuAction::Continue => {}
                    MenuAction::Chosen(index) => {
                        debug!("{}: picked {:?}", title, items[index]);
                        return Ok(Some(index));
                    }
                    MenuAction::Cancelled => {
                        debug!("{}: cancelled", title);
                        return Ok(None);
                    }
                }
            }
        }
    }
}

/// Raw mode and alternate screen, undone on drop
struct Session {
    terminal: DefaultTerminal,
}

impl Session {
    fn start() -> io::Result<Self> {
        Ok(Self {
            terminal: ratatui::try_init()?,
        })
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Err(e) = ratatui::try_restore() {
            warn!("Failed to restore terminal: {}", e);
        }
    }
}

fn draw(frame: &mut Frame, title: &str, items: &[String], menu: &mut Menu) {
    let [list_area, help_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    let list = List::new(items.iter().map(String::as_str))
        .block(Block::bordered().title(format!(" {title} ")))
        .highlight_symbol(">> ")
        .highlight_style(Style::new().fg(Color::Black).bg(Color::Red));
    frame.render_stateful_widget(list, list_area, menu.state_mut());

    frame.render_widget(
        Paragraph::new(HELP).style(Style::new().add_modifier(Modifier::DIM)),
        help_area,
    );
}
