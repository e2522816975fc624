use anyhow::Result;
use crossterm::event::KeyCode;
use log::{debug, warn};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::service::{DisplaySurface, RegistrationService};

use super::forms::{Focus, TextInput};
use super::helpers::{centered_rect, key_hint, surface_error};
use super::screens::{Notice, NoticeKind, RegistersScreen};

/// Footer space reserved for the key legend.
const FOOTER_HEIGHT: u16 = 3;
/// Column headings of the listing, in [`crate::models::StudentRow::cells`]
/// order.
const COLUMNS: [&str; 6] = ["id", "name", "email", "sex", "branch", "programming"];

/// Actions bound to control-key chords.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    Submit,
    Update,
    Delete,
    Display,
}

impl Action {
    pub(crate) fn from_ctrl(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            's' => Some(Action::Submit),
            'u' => Some(Action::Update),
            'd' => Some(Action::Delete),
            'r' => Some(Action::Display),
            _ => None,
        }
    }
}

/// Central application state: the service it talks to and the screen that
/// acts as its display surface.
pub struct App {
    service: RegistrationService,
    screen: RegistersScreen,
    focus: Focus,
}

impl App {
    /// Build the app around an already-wired service and load the listing.
    pub fn new(service: RegistrationService) -> Self {
        let mut screen = RegistersScreen::default();
        service.refresh(&mut screen);
        Self {
            service,
            screen,
            focus: Focus::default(),
        }
    }

    /// Handle a plain key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        if self.screen.current_notice().is_some() {
            if matches!(code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.screen.dismiss_notice();
            }
            return Ok(false);
        }

        match code {
            KeyCode::Esc => return Ok(true),
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.previous(),
            _ if self.focus == Focus::Table => self.handle_table_key(code),
            _ => self.handle_form_key(code),
        }

        Ok(false)
    }

    /// Run the action bound to `Ctrl+<ch>`. Chords are ignored while a notice
    /// is open.
    pub(crate) fn handle_ctrl(&mut self, ch: char) -> Result<()> {
        if self.screen.current_notice().is_some() {
            return Ok(());
        }
        if let Some(action) = Action::from_ctrl(ch) {
            self.perform(action);
        }
        Ok(())
    }

    pub(crate) fn perform(&mut self, action: Action) {
        let selected = self.screen.table.selected_id();
        let outcome = match action {
            Action::Submit => {
                let input = self.screen.form.read_input();
                self.service.register(&input, &mut self.screen)
            }
            Action::Update => {
                let input = self.screen.form.read_input();
                self.service.update(selected, &input, &mut self.screen)
            }
            Action::Delete => self.service.delete(selected, &mut self.screen),
            Action::Display => {
                self.service.refresh(&mut self.screen);
                Ok(())
            }
        };

        if let Err(err) = outcome {
            debug!("{action:?} did not complete: {err}");
        }
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        if let Some(input) = self.screen.form.text_input_mut(self.focus) {
            match code {
                KeyCode::Char(ch) => {
                    input.push_char(ch);
                }
                KeyCode::Backspace => input.backspace(),
                KeyCode::Enter | KeyCode::Down => self.focus = self.focus.next(),
                KeyCode::Up => self.focus = self.focus.previous(),
                _ => {}
            }
            return;
        }

        if let Some(choice) = self.screen.form.choice_mut(self.focus) {
            match code {
                KeyCode::Left => choice.cycle(-1),
                KeyCode::Right | KeyCode::Char(' ') => choice.cycle(1),
                KeyCode::Enter | KeyCode::Down => self.focus = self.focus.next(),
                KeyCode::Up => self.focus = self.focus.previous(),
                _ => {}
            }
        }
    }

    fn handle_table_key(&mut self, code: KeyCode) {
        let table = &mut self.screen.table;
        match code {
            KeyCode::Up => table.move_selection(-1),
            KeyCode::Down => table.move_selection(1),
            KeyCode::PageUp => table.move_selection(-5),
            KeyCode::PageDown => table.move_selection(5),
            KeyCode::Home => table.select_first(),
            KeyCode::End => table.select_last(),
            _ => return,
        }
        self.fill_form();
    }

    /// Copy the selected student into the form so it can be edited.
    fn fill_form(&mut self) {
        let Some(id) = self.screen.table.selected_id() else {
            return;
        };

        match self.service.get(id) {
            Ok(Some(row)) => self.screen.form.fill(&row),
            Ok(None) => debug!("selected student {id} no longer exists"),
            Err(err) => {
                warn!("failed to load student {id}: {err}");
                self.screen.show_warning("Error", &surface_error(&err));
            }
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let (content_area, footer_area) = split_footer(area);

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(content_area);

        self.draw_form(frame, panes[0]);
        self.draw_table(frame, panes[1]);

        if let Some(footer_area) = footer_area {
            self.draw_footer(frame, footer_area);
        }

        if let Some(notice) = self.screen.current_notice() {
            self.draw_notice(frame, area, notice);
        }
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let block = pane_block("Register", self.focus != Focus::Table);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let lines = self.screen.form.build_lines(self.focus);
        frame.render_widget(Paragraph::new(lines), inner);

        if self.screen.current_notice().is_some() {
            return;
        }

        let cursor = match self.focus {
            Focus::Name => Some((&self.screen.form.name, "Full name: ", 0)),
            Focus::Email => Some((&self.screen.form.email, "Email: ", 2)),
            _ => None,
        };
        if let Some((input, prefix, row)) = cursor {
            frame.set_cursor_position(cursor_for(inner, input, prefix, row));
        }
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let block = pane_block("Students", self.focus == Focus::Table);

        if self.screen.table.rows.is_empty() {
            let message = Paragraph::new("No students yet. Fill the form and press Ctrl+S.")
                .block(block)
                .wrap(Wrap { trim: true });
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new(COLUMNS).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
        let rows = self.screen.table.rows.iter().map(|row| Row::new(row.cells()));
        let widths = [
            Constraint::Length(5),
            Constraint::Percentage(22),
            Constraint::Percentage(30),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Min(11),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(self.screen.table.selected);
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let mut spans = Vec::new();
        for (key, label) in [
            ("Tab", "Next field"),
            ("Ctrl+S", "Submit"),
            ("Ctrl+R", "Display"),
            ("Ctrl+U", "Update"),
            ("Ctrl+D", "Delete"),
            ("Esc", "Quit"),
        ] {
            spans.extend(key_hint(key, label));
        }

        let paragraph = Paragraph::new(Line::from(spans)).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_notice(&self, frame: &mut Frame, area: Rect, notice: &Notice) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        let color = match notice.kind {
            NoticeKind::Info => Color::Green,
            NoticeKind::Warning => Color::Red,
        };
        let block = Block::default()
            .title(notice.title.clone())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));

        let lines = vec![
            Line::from(Span::styled(
                notice.message.clone(),
                Style::default().fg(color),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Enter to close",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }
}

fn pane_block(title: &str, active: bool) -> Block<'static> {
    let border = if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(border)
}

/// Carve the footer off the bottom of `area`. Terminals too short to hold the
/// footer and at least one content row get no footer at all.
fn split_footer(area: Rect) -> (Rect, Option<Rect>) {
    if area.height <= FOOTER_HEIGHT {
        return (area, None);
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(FOOTER_HEIGHT)])
        .split(area);
    (chunks[0], Some(chunks[1]))
}

/// Cursor position after the text of `input`, kept inside `inner`.
fn cursor_for(inner: Rect, input: &TextInput, prefix: &str, row: u16) -> (u16, u16) {
    let offset = u16::try_from(prefix.chars().count().saturating_add(input.value_len()))
        .unwrap_or(u16::MAX);
    let x = inner.x.saturating_add(offset);
    (
        x.min(inner.right().saturating_sub(1)),
        inner.y.saturating_add(row),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::StudentStore;
    use crate::ui::forms::TextField;
    use tempfile::TempDir;

    fn app() -> (TempDir, App) {
        let dir = TempDir::new().expect("create temp dir");
        let store = StudentStore::open(dir.path().join("students.sqlite")).expect("open store");
        (dir, App::new(RegistrationService::new(store)))
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).expect("key");
        }
    }

    #[test]
    fn typing_and_submitting_registers_a_student() {
        let (_dir, mut app) = app();
        type_text(&mut app, "Ada");
        app.handle_key(KeyCode::Tab).expect("tab");
        type_text(&mut app, "a@x.com");
        app.handle_ctrl('s').expect("submit");

        assert_eq!(app.screen.table.rows.len(), 1);
        assert_eq!(app.screen.table.rows[0].name, "Ada");
        assert_eq!(app.screen.table.rows[0].sex, "male");
        assert_eq!(app.screen.form.name.text(), "");
        let notice = app.screen.current_notice().expect("success notice");
        assert_eq!(notice.kind, NoticeKind::Info);
    }

    #[test]
    fn keys_only_dismiss_an_open_notice() {
        let (_dir, mut app) = app();
        app.handle_ctrl('u').expect("update");
        assert!(app.screen.current_notice().is_some());

        assert!(!app.handle_key(KeyCode::Esc).expect("esc"));
        assert!(app.screen.current_notice().is_none());
        assert!(app.handle_key(KeyCode::Esc).expect("esc quits"));
    }

    #[test]
    fn selecting_a_row_fills_the_form_and_enables_delete() {
        let (_dir, mut app) = app();
        type_text(&mut app, "Grace");
        app.handle_key(KeyCode::Tab).expect("tab");
        type_text(&mut app, "g@x.com");
        app.handle_key(KeyCode::Tab).expect("tab");
        app.handle_key(KeyCode::Right).expect("female");
        app.handle_ctrl('s').expect("submit");
        app.handle_key(KeyCode::Enter).expect("dismiss");

        app.focus = Focus::Table;
        app.handle_key(KeyCode::Down).expect("select");
        assert_eq!(app.screen.form.name.text(), "Grace");
        assert_eq!(app.screen.form.read_input().sex, "female");

        app.handle_ctrl('d').expect("delete");
        assert!(app.screen.table.rows.is_empty());
        assert!(app.service.list().expect("list").is_empty());
    }

    #[test]
    fn short_terminals_get_no_footer() {
        let (content, footer) = split_footer(Rect::new(0, 0, 80, FOOTER_HEIGHT));
        assert_eq!(content, Rect::new(0, 0, 80, FOOTER_HEIGHT));
        assert!(footer.is_none());

        let (content, footer) = split_footer(Rect::new(0, 0, 80, 24));
        assert_eq!(content.height, 24 - FOOTER_HEIGHT);
        assert_eq!(footer, Some(Rect::new(0, 24 - FOOTER_HEIGHT, 80, FOOTER_HEIGHT)));
    }

    #[test]
    fn cursor_stays_inside_the_pane_for_long_input() {
        let inner = Rect::new(2, 1, 30, 10);
        let mut input = TextInput::default();
        input.set_text(&"x".repeat(70_000));

        assert_eq!(cursor_for(inner, &input, "Full name: ", 0), (31, 1));

        input.set_text("Ada");
        assert_eq!(cursor_for(inner, &input, "Email: ", 2), (2 + 7 + 3, 3));
    }

    #[test]
    fn unknown_chords_are_ignored() {
        let (_dir, mut app) = app();
        app.handle_ctrl('x').expect("ignored");
        assert!(app.screen.current_notice().is_none());
    }
}
