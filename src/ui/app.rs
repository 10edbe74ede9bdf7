use std::mem;

use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use rusqlite::Connection;
use tracing::error;

use crate::controller::{dispatch, Action, Notice, NoticeKind, Outcome};

use super::forms::{StudentField, StudentForm};
use super::helpers::{centered_rect, notice_style, surface_error};
use super::screens::ResultsPanel;

/// Height of the banner at the top of the screen.
const TITLE_HEIGHT: u16 = 1;
/// Form block: one row per input plus borders.
const FORM_HEIGHT: u16 = 5;
/// Action legend block: two rows of shortcuts plus borders.
const ACTIONS_HEIGHT: u16 = 4;
/// Lines moved per PageUp/PageDown in the results area.
const PAGE_STEP: isize = 5;

/// Whether a modal notice is covering the form.
enum Mode {
    Normal,
    Notice(Notice),
}

/// Central application state: the owned store handle plus what the form
/// currently shows.
pub struct App {
    conn: Connection,
    form: StudentForm,
    results: ResultsPanel,
    mode: Mode,
}

impl App {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            form: StudentForm::default(),
            results: ResultsPanel::default(),
            mode: Mode::Normal,
        }
    }

    /// Hand the connection back so it can be closed on shutdown.
    pub fn into_connection(self) -> Connection {
        self.conn
    }

    /// Run one action and fold its outcome into the visible state. Storage
    /// failures are shown as a notice so the form stays usable.
    pub fn perform(&mut self, action: Action) {
        match dispatch(&self.conn, action, &self.form.fields()) {
            Ok(outcome) => self.apply(outcome),
            Err(err) => {
                error!(?action, error = %format!("{err:#}"), "store operation failed");
                self.mode = Mode::Notice(Notice {
                    kind: NoticeKind::Error,
                    title: "Storage Error".to_string(),
                    message: surface_error(&err),
                });
            }
        }
    }

    fn apply(&mut self, outcome: Outcome) {
        if outcome.clear_fields {
            self.form.clear();
        }
        if let Some(output) = &outcome.output {
            self.results.show(output);
        }
        if let Some(notice) = outcome.notice {
            self.mode = Mode::Notice(notice);
        }
    }

    /// Process a key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => {
                self.handle_normal_key(code, &mut exit);
                // An action may have raised a notice while we held `Normal`.
                mem::replace(&mut self.mode, Mode::Normal)
            }
            Mode::Notice(notice) => self.handle_notice_key(code, notice),
        };

        exit
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) {
        match code {
            KeyCode::Esc => *exit = true,
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_previous(),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::PageUp => self.results.scroll_by(-PAGE_STEP),
            KeyCode::PageDown => self.results.scroll_by(PAGE_STEP),
            KeyCode::Enter | KeyCode::F(1) => self.perform(Action::Add),
            KeyCode::F(2) => self.perform(Action::ShowAll),
            KeyCode::F(3) => self.perform(Action::Search),
            KeyCode::F(4) => self.perform(Action::Delete),
            KeyCode::F(5) => self.perform(Action::Update),
            KeyCode::F(6) => self.perform(Action::Total),
            KeyCode::F(7) => self.perform(Action::SortByName),
            KeyCode::F(8) => self.perform(Action::SortByMarks),
            KeyCode::F(9) => self.perform(Action::Clear),
            KeyCode::Char(ch) => {
                self.form.push_char(ch);
            }
            _ => {}
        }
    }

    fn handle_notice_key(&mut self, code: KeyCode, notice: Notice) -> Mode {
        match code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Mode::Normal,
            _ => Mode::Notice(notice),
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(TITLE_HEIGHT),
                Constraint::Length(FORM_HEIGHT),
                Constraint::Length(ACTIONS_HEIGHT),
                Constraint::Min(0),
            ])
            .split(area);

        self.draw_title(frame, chunks[0]);
        self.draw_form(frame, chunks[1]);
        self.draw_actions(frame, chunks[2]);
        self.draw_results(frame, chunks[3]);

        if let Mode::Notice(notice) = &self.mode {
            self.draw_notice(frame, area, notice);
        }
    }

    fn draw_title(&self, frame: &mut Frame, area: Rect) {
        let title = Paragraph::new("STUDENT RECORD MANAGEMENT SYSTEM")
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(title, area);
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().title("Student").borders(Borders::ALL);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let lines: Vec<Line> = StudentField::ALL
            .iter()
            .map(|field| self.form.build_line(*field))
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);

        if matches!(self.mode, Mode::Normal) && inner.height > 0 {
            let row = StudentField::ALL
                .iter()
                .position(|field| *field == self.form.active)
                .unwrap_or(0) as u16;
            let cursor_x = inner.x + self.form.cursor_offset(self.form.active) as u16;
            let cursor_y = inner.y + row.min(inner.height - 1);
            frame.set_cursor_position((cursor_x, cursor_y));
        }
    }

    fn draw_actions(&self, frame: &mut Frame, area: Rect) {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let entry = |key: &'static str, label: &'static str| {
            [Span::styled(key, key_style), Span::raw(label)]
        };

        let first: Vec<Span> = [
            entry("[Enter/F1]", " Add   "),
            entry("[F2]", " Show All   "),
            entry("[F3]", " Search   "),
            entry("[F4]", " Delete   "),
            entry("[F5]", " Update"),
        ]
        .into_iter()
        .flatten()
        .collect();
        let second: Vec<Span> = [
            entry("[F6]", " Total   "),
            entry("[F7]", " Sort Name   "),
            entry("[F8]", " Sort Marks   "),
            entry("[F9]", " Clear   "),
            entry("[Tab]", " Next Field   "),
            entry("[Esc]", " Quit"),
        ]
        .into_iter()
        .flatten()
        .collect();

        let paragraph = Paragraph::new(vec![Line::from(first), Line::from(second)])
            .block(Block::default().title("Actions").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_results(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .results
            .lines
            .iter()
            .map(|line| Line::from(line.clone()))
            .collect();

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .title("Records [PgUp/PgDn]")
                    .borders(Borders::ALL),
            )
            .scroll((self.results.scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn draw_notice(&self, frame: &mut Frame, area: Rect, notice: &Notice) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(notice.title.clone())
            .borders(Borders::ALL)
            .border_style(notice_style(notice.kind));
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(notice.message.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter or Esc to close.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}
