//! Ratatui front-end for the plate lookup tool. This file records not just
//! *what* each UI state does but also *why* the interactions behave the way
//! they do. The search flow is deliberately a small state machine: a form, a
//! result panel, and two popups (category picker, record detail), with every
//! input edit invalidating the previous result.

use std::io::{self, Stdout};
use std::mem;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap,
};
use ratatui::{Frame, Terminal};
use rusqlite::Connection;

use crate::db::{fetch_categories, search_plates, SearchQuery};
use crate::models::PlateRecord;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Label shown for the empty category choice. Picking it removes the category
/// predicate from the search entirely.
const ANY_CATEGORY_LABEL: &str = "(any)";

/// Which input of the search form currently has focus. The form only has two
/// fields: a narrow category selector and a wide plate-number box.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum SearchField {
    Category,
    Plate,
}

impl Default for SearchField {
    fn default() -> Self {
        SearchField::Plate
    }
}

impl SearchField {
    fn toggled(self) -> Self {
        match self {
            SearchField::Category => SearchField::Plate,
            SearchField::Plate => SearchField::Category,
        }
    }
}

/// Fine-grained interaction modes. `Editing` is the resting state; the other
/// two are modal overlays that capture the keyboard until dismissed.
enum Mode {
    Editing,
    SelectingCategory(CategoryPicker),
    BrowsingResults(ResultsBrowser),
}

/// Outcome of the most recent search, driving what the result panel shows.
/// `Failed` is kept separate from `Empty` so a broken query is never presented
/// as a clean "no matches".
enum ResultsView {
    /// No search performed since the last input change.
    Idle,
    /// The search ran and matched nothing.
    Empty,
    /// Exactly one match: rendered as the two-column detail panel.
    Single(PlateRecord),
    /// Several matches: collapsed notice first, expandable into a table.
    Multiple(Vec<PlateRecord>),
    /// The search itself errored; the message is shown in place of results.
    Failed(String),
}

/// Central application state shared across the TUI. The struct combines the
/// persistent connection, the loaded category list, the form inputs, and the
/// active mode.
pub struct App {
    /// Long-lived read-only SQLite connection. We keep it on the struct so
    /// every handler can synchronously issue queries without extra plumbing.
    conn: Connection,
    /// Distinct categories loaded once per session for the picker. Stays empty
    /// if the load failed; the rest of the UI keeps working without a filter.
    categories: Vec<String>,
    /// Which form field receives keystrokes while in `Mode::Editing`.
    active_field: SearchField,
    /// Raw plate-number input as typed.
    plate_input: String,
    /// Currently selected category filter; `None` means no filter.
    category: Option<String>,
    /// Result of the last submitted search.
    results: ResultsView,
    /// Current interaction mode.
    mode: Mode,
    /// Optional status line surfaced in the footer.
    status: Option<StatusMessage>,
}

impl App {
    /// Construct the app over an opened connection. The category list is
    /// requested here, once per session; a failure is downgraded to a footer
    /// warning because searching by plate alone still works fine.
    pub fn new(conn: Connection) -> Self {
        let (categories, status) = match fetch_categories(&conn) {
            Ok(categories) => (categories, None),
            Err(err) => (
                Vec::new(),
                Some(StatusMessage {
                    text: format!("{err}; category filtering is unavailable."),
                    kind: StatusKind::Warning,
                }),
            ),
        };

        Self {
            conn,
            categories,
            active_field: SearchField::default(),
            plate_input: String::new(),
            category: None,
            results: ResultsView::Idle,
            mode: Mode::Editing,
            status,
        }
    }

    /// Top-level key dispatcher. Every key is funneled through the active
    /// `Mode`, which returns the next mode to run. The boolean result tells
    /// the outer loop whether the user requested an exit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Editing);

        self.mode = match mode {
            Mode::Editing => self.handle_editing_key(code, &mut exit),
            Mode::SelectingCategory(picker) => self.handle_category_picker(code, picker),
            Mode::BrowsingResults(browser) => self.handle_results_browser(code, browser),
        };

        Ok(exit)
    }

    /// Handle keys while the search form has focus. Printable input flows into
    /// the plate field; the category field is driven entirely through the
    /// picker popup so the filter can only ever hold values that exist in the
    /// data.
    fn handle_editing_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.active_field = self.active_field.toggled();
            }
            KeyCode::Enter => match self.active_field {
                SearchField::Category => return self.open_category_picker(),
                SearchField::Plate => {
                    // A fresh Enter on an already-displayed multi-match result
                    // expands it instead of re-running the identical query.
                    // Any input edit resets `results`, so this can never show
                    // stale rows.
                    if matches!(self.results, ResultsView::Multiple(_)) {
                        return Mode::BrowsingResults(ResultsBrowser::new());
                    }
                    self.submit_search();
                }
            },
            KeyCode::Down => {
                if self.active_field == SearchField::Category {
                    return self.open_category_picker();
                }
            }
            KeyCode::Char(ch) => match self.active_field {
                SearchField::Plate => {
                    if !ch.is_control() {
                        self.plate_input.push(ch);
                        self.reset_results();
                    }
                }
                SearchField::Category => {
                    if ch == ' ' {
                        return self.open_category_picker();
                    }
                }
            },
            KeyCode::Backspace => {
                if self.active_field == SearchField::Plate && self.plate_input.pop().is_some() {
                    self.reset_results();
                }
            }
            _ => {}
        }
        Mode::Editing
    }

    /// Handle keys while the category picker popup is open.
    fn handle_category_picker(&mut self, code: KeyCode, mut picker: CategoryPicker) -> Mode {
        match code {
            KeyCode::Esc => return Mode::Editing,
            KeyCode::Up => picker.move_selection(-1),
            KeyCode::Down => picker.move_selection(1),
            KeyCode::PageUp => picker.move_selection(-5),
            KeyCode::PageDown => picker.move_selection(5),
            KeyCode::Home => picker.select_first(),
            KeyCode::End => picker.select_last(),
            KeyCode::Enter => {
                let chosen = picker.chosen();
                if chosen != self.category {
                    self.category = chosen;
                    self.reset_results();
                }
                return Mode::Editing;
            }
            _ => {}
        }
        Mode::SelectingCategory(picker)
    }

    /// Handle keys while the expanded results table is open. `Esc` steps back
    /// one level at a time: detail popup, then table, then the form.
    fn handle_results_browser(&mut self, code: KeyCode, mut browser: ResultsBrowser) -> Mode {
        let len = match &self.results {
            ResultsView::Multiple(records) => records.len(),
            _ => return Mode::Editing,
        };

        match code {
            KeyCode::Esc => {
                if browser.show_detail {
                    browser.show_detail = false;
                } else {
                    return Mode::Editing;
                }
            }
            KeyCode::Up => browser.move_selection(-1, len),
            KeyCode::Down => browser.move_selection(1, len),
            KeyCode::PageUp => browser.move_selection(-5, len),
            KeyCode::PageDown => browser.move_selection(5, len),
            KeyCode::Home => browser.select_first(),
            KeyCode::End => browser.select_last(len),
            KeyCode::Enter => browser.show_detail = true,
            _ => {}
        }
        Mode::BrowsingResults(browser)
    }

    fn open_category_picker(&mut self) -> Mode {
        Mode::SelectingCategory(CategoryPicker::new(&self.categories, self.category.as_deref()))
    }

    /// Run the search with the current inputs and map the outcome onto the
    /// result states. The empty-input guard lives here, before the store layer
    /// is ever called, and shows the prompt instead of executing a search.
    fn submit_search(&mut self) {
        self.clear_status();

        let plate = self.plate_input.trim();
        if plate.is_empty() {
            self.results = ResultsView::Idle;
            self.set_status(
                "Please enter a Plate Number to search.",
                StatusKind::Warning,
            );
            return;
        }

        let query = SearchQuery::new(plate, self.category.as_deref());
        match search_plates(&self.conn, &query) {
            Ok(mut records) => {
                self.results = match records.len() {
                    0 => ResultsView::Empty,
                    1 => ResultsView::Single(records.remove(0)),
                    count => {
                        self.set_status(
                            format!("{count} records found. Press Enter to expand."),
                            StatusKind::Info,
                        );
                        ResultsView::Multiple(records)
                    }
                };
            }
            Err(err) => {
                self.set_status("Search failed.", StatusKind::Error);
                self.results = ResultsView::Failed(err.to_string());
            }
        }
    }

    /// Drop the previous result and status. Called on every input change so
    /// the display always corresponds to the inputs currently on screen.
    fn reset_results(&mut self) {
        self.results = ResultsView::Idle;
        self.clear_status();
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    /// Text shown inside the category box: the active filter or the
    /// "anything goes" placeholder.
    fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(ANY_CATEGORY_LABEL)
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_title(frame, chunks[0]);
        self.draw_search_form(frame, chunks[1]);
        self.draw_footer(frame, chunks[3]);

        let results_area = chunks[2];
        match &mut self.mode {
            Mode::Editing => draw_results_panel(frame, results_area, &self.results),
            Mode::SelectingCategory(picker) => {
                draw_results_panel(frame, results_area, &self.results);
                draw_category_picker(frame, area, picker);
            }
            Mode::BrowsingResults(browser) => {
                if let ResultsView::Multiple(records) = &self.results {
                    draw_results_table(frame, results_area, records, browser);
                    if browser.show_detail {
                        if let Some(record) = records.get(browser.selected) {
                            draw_record_popup(frame, area, record);
                        }
                    }
                }
            }
        }
    }

    fn draw_title(&self, frame: &mut Frame, area: Rect) {
        let title = Paragraph::new(Span::styled(
            "Plate Lookup",
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(title, area);
    }

    /// Render the two-field search row. The 30/70 split keeps the category box
    /// narrow since its values are short labels while plate numbers plus the
    /// cursor need the room.
    fn draw_search_form(&self, frame: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
            .split(area);

        let focus_style = Style::default().fg(Color::Yellow);

        let mut category_block = Block::default().borders(Borders::ALL).title("Category");
        if self.active_field == SearchField::Category {
            category_block = category_block.border_style(focus_style);
        }
        let category = Paragraph::new(Span::raw(self.category_label().to_string()))
            .block(category_block);
        frame.render_widget(category, columns[0]);

        let mut plate_block = Block::default().borders(Borders::ALL).title("Plate Number");
        if self.active_field == SearchField::Plate {
            plate_block = plate_block.border_style(focus_style);
        }
        let plate = Paragraph::new(Span::raw(self.plate_input.clone())).block(plate_block.clone());
        frame.render_widget(plate, columns[1]);

        if matches!(self.mode, Mode::Editing) && self.active_field == SearchField::Plate {
            let inner = plate_block.inner(columns[1]);
            let cursor_x = inner.x + self.plate_input.chars().count() as u16;
            frame.set_cursor_position((cursor_x.min(inner.x + inner.width), inner.y));
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    /// Build the instruction line based on the active mode. Keeping this logic
    /// centralized avoids duplication inside `draw_footer`.
    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.mode {
            Mode::Editing => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Switch Field   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Search   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Quit"),
            ]),
            Mode::SelectingCategory(_) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Choose   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::BrowsingResults(_) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Details   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back"),
            ]),
        }
    }
}

/// Drive the terminal: raw mode, alternate screen, a 250 ms poll loop, and a
/// guaranteed cleanup on the way out so a failing draw never leaves the shell
/// in raw mode.
pub fn run_app(app: &mut App) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;

    let result = loop {
        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw frame")?;

        if event::poll(Duration::from_millis(250)).context("event polling failed")? {
            if let Event::Key(key_event) = event::read().context("failed to read event")? {
                if key_event.kind == KeyEventKind::Press && app.handle_key(key_event.code)? {
                    break Ok(());
                }
            }
        }
    };

    cleanup_terminal(&mut terminal)?;
    result
}

/// Restore the terminal to its original state after the app exits.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal
        .show_cursor()
        .context("failed to restore cursor visibility")
}

/// State of the category picker popup. The options are snapshotted when the
/// popup opens, with the wildcard entry prepended at index zero.
struct CategoryPicker {
    options: Vec<String>,
    list_state: ListState,
}

impl CategoryPicker {
    fn new(categories: &[String], current: Option<&str>) -> Self {
        let mut options = Vec::with_capacity(categories.len() + 1);
        options.push(ANY_CATEGORY_LABEL.to_string());
        options.extend(categories.iter().cloned());

        let selected = current
            .and_then(|current| categories.iter().position(|category| category == current))
            .map(|index| index + 1)
            .unwrap_or(0);
        let mut list_state = ListState::default();
        list_state.select(Some(selected));

        Self {
            options,
            list_state,
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.options.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0) as isize;
        let last = self.options.len() as isize - 1;
        let next = (current + delta).clamp(0, last) as usize;
        self.list_state.select(Some(next));
    }

    fn select_first(&mut self) {
        self.list_state.select(Some(0));
    }

    fn select_last(&mut self) {
        if !self.options.is_empty() {
            self.list_state.select(Some(self.options.len() - 1));
        }
    }

    /// The filter value the current highlight stands for; the wildcard entry
    /// maps to `None`.
    fn chosen(&self) -> Option<String> {
        match self.list_state.selected().unwrap_or(0) {
            0 => None,
            index => self.options.get(index).cloned(),
        }
    }
}

/// Selection state for the expanded results table plus whether the per-row
/// detail popup is open.
struct ResultsBrowser {
    selected: usize,
    table_state: TableState,
    show_detail: bool,
}

impl ResultsBrowser {
    fn new() -> Self {
        Self {
            selected: 0,
            table_state: TableState::default(),
            show_detail: false,
        }
    }

    fn move_selection(&mut self, delta: isize, len: usize) {
        if len == 0 {
            return;
        }
        let current = self.selected as isize;
        let last = len as isize - 1;
        self.selected = (current.saturating_add(delta)).clamp(0, last) as usize;
    }

    fn select_first(&mut self) {
        self.selected = 0;
    }

    fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer. `Warning` covers the recoverable
/// cases (missing input, category list unavailable); `Error` is reserved for
/// a search that actually failed.
enum StatusKind {
    Info,
    Warning,
    Error,
}

impl StatusKind {
    /// Convert the status kind to a Ratatui style.
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Warning => Style::default().fg(Color::Yellow),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Render the collapsed result panel for every state except the expanded
/// table, which needs mutable table state and has its own drawing path.
fn draw_results_panel(frame: &mut Frame, area: Rect, results: &ResultsView) {
    let lines = match results {
        ResultsView::Single(record) => {
            draw_record_detail(frame, area, record);
            return;
        }
        ResultsView::Idle => vec![Line::from(Span::styled(
            "Enter a plate number and press Enter to search.",
            Style::default().fg(Color::DarkGray),
        ))],
        ResultsView::Empty => vec![Line::from(Span::styled(
            "No results found.",
            Style::default().fg(Color::Red),
        ))],
        ResultsView::Multiple(records) => vec![
            Line::from(Span::styled(
                "Multiple results found.",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "{} records match. Press Enter to expand the search results.",
                records.len()
            )),
        ],
        ResultsView::Failed(message) => vec![
            Line::from(Span::styled(
                "Search failed.",
                Style::default().fg(Color::Red),
            )),
            Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            )),
        ],
    };

    let block = Block::default().borders(Borders::ALL).title("Results");
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Two-column detail panel for a single record: owner fields on the left,
/// vehicle fields on the right. Long values wrap instead of truncating.
fn draw_record_detail(frame: &mut Frame, area: Rect, record: &PlateRecord) {
    let category = record.category.trim();
    let title = if category.is_empty() {
        format!("Plate {}", record.plate_number)
    } else {
        format!("Plate {} ({category})", record.plate_number)
    };

    let block = Block::default().borders(Borders::ALL).title(title);
    frame.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let owner = Paragraph::new(owner_lines(record)).wrap(Wrap { trim: false });
    frame.render_widget(owner, columns[0]);

    let vehicle = Paragraph::new(vehicle_lines(record)).wrap(Wrap { trim: false });
    frame.render_widget(vehicle, columns[1]);
}

fn owner_lines(record: &PlateRecord) -> Vec<Line<'static>> {
    vec![
        field_line("Full Name", &record.full_name()),
        field_line("Phone Number", &record.phone),
        field_line("Birth Details", &record.birth_summary()),
        field_line("Mother Name", &record.mother_name),
        field_line("Address", &record.address),
    ]
}

fn vehicle_lines(record: &PlateRecord) -> Vec<Line<'static>> {
    vec![
        field_line("Car Description", &record.vehicle_description()),
        field_line("Model Year", &record.production_date),
        field_line("Chassis#", &record.chassis),
        field_line("Engine#", &record.engine),
    ]
}

/// Bold label followed by the raw value.
fn field_line(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{label}: "),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(value.to_string()),
    ])
}

/// Render the expanded results table with one row per matching record.
fn draw_results_table(
    frame: &mut Frame,
    area: Rect,
    records: &[PlateRecord],
    browser: &mut ResultsBrowser,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Search Results ({})", records.len()));

    let header = Row::new(["Plate", "Category", "Owner", "Vehicle", "Year"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = records.iter().map(|record| {
        Row::new([
            record.plate_number.clone(),
            record.category.clone(),
            record.full_name(),
            record.vehicle_description(),
            record.production_date.clone(),
        ])
    });

    let widths = [
        Constraint::Length(10),
        Constraint::Length(14),
        Constraint::Percentage(35),
        Constraint::Percentage(35),
        Constraint::Length(6),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    browser.table_state.select(Some(browser.selected));
    frame.render_stateful_widget(table, area, &mut browser.table_state);
}

/// Full detail for the highlighted table row, shown as a centered popup over
/// the table.
fn draw_record_popup(frame: &mut Frame, area: Rect, record: &PlateRecord) {
    let popup_area = centered_rect(80, 70, area);
    frame.render_widget(Clear, popup_area);
    draw_record_detail(frame, popup_area, record);
}

/// Render the category picker as a centered popup list.
fn draw_category_picker(frame: &mut Frame, area: Rect, picker: &mut CategoryPicker) {
    let popup_area = centered_rect(40, 60, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default().borders(Borders::ALL).title("Select Category");
    let items = picker
        .options
        .iter()
        .map(|option| ListItem::new(option.clone()))
        .collect::<Vec<_>>();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, popup_area, &mut picker.list_state);
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;
    use rusqlite::{params, Connection};

    use super::{App, Mode, ResultsView, SearchField, StatusKind};

    /// Minimal registry with one single-match plate and one duplicated plate,
    /// enough to walk every result state.
    fn seeded_connection() -> Connection {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        conn.execute(
            "CREATE TABLE CARMDI (
                ActualNB TEXT, CodeDesc TEXT, Prenom TEXT, Nom TEXT, TelProp TEXT,
                AgeProp TEXT, BirthPlace TEXT, NomMere TEXT, Addresse TEXT,
                MarqueDesc TEXT, TypeDesc TEXT, PRODDATE TEXT, Chassis TEXT, Moteur TEXT
            )",
            [],
        )
        .expect("create CARMDI");

        let rows: [[&str; 14]; 3] = [
            [
                "123456", "Private", "Jane", "Doe", "0312345", "1980", "Beirut", "Mary",
                "Hamra Street", "Toyota", "Corolla", "2004", "CH-1", "EN-1",
            ],
            [
                "123456", "Taxi", "John", "Smith", "0354321", "1975", "Tripoli", "Rita",
                "Mina Road", "Nissan", "Sunny", "1999", "CH-2", "EN-2",
            ],
            [
                "777777", "Private", "Ali", "Khalil", "0311111", "1988", "Sidon", "Huda",
                "Corniche", "Kia", "Rio", "2015", "CH-3", "EN-3",
            ],
        ];
        for row in rows {
            conn.execute(
                "INSERT INTO CARMDI VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    row[0], row[1], row[2], row[3], row[4], row[5], row[6], row[7], row[8],
                    row[9], row[10], row[11], row[12], row[13]
                ],
            )
            .expect("insert row");
        }

        conn
    }

    fn app() -> App {
        App::new(seeded_connection())
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).expect("key handled");
        }
    }

    #[test]
    fn categories_load_on_construction() {
        let app = app();
        assert_eq!(app.categories, vec!["Private".to_string(), "Taxi".to_string()]);
        assert!(app.status.is_none());
    }

    #[test]
    fn category_load_failure_becomes_warning() {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        let app = App::new(conn);
        assert!(app.categories.is_empty());
        let status = app.status.expect("warning status");
        assert!(matches!(status.kind, StatusKind::Warning));
    }

    #[test]
    fn empty_submit_shows_prompt_and_runs_no_search() {
        let mut app = app();
        app.handle_key(KeyCode::Enter).expect("key handled");
        assert!(matches!(app.results, ResultsView::Idle));
        let status = app.status.as_ref().expect("prompt status");
        assert_eq!(status.text, "Please enter a Plate Number to search.");
        assert!(matches!(status.kind, StatusKind::Warning));
    }

    #[test]
    fn single_match_shows_detail_state() {
        let mut app = app();
        type_text(&mut app, "777777");
        app.handle_key(KeyCode::Enter).expect("key handled");
        match &app.results {
            ResultsView::Single(record) => {
                assert_eq!(record.plate_number, "777777");
                assert_eq!(record.full_name(), "Ali Khalil");
            }
            _ => panic!("expected single-record result"),
        }
    }

    #[test]
    fn duplicate_plate_shows_multiple_then_enter_expands() {
        let mut app = app();
        type_text(&mut app, "123456");
        app.handle_key(KeyCode::Enter).expect("key handled");
        match &app.results {
            ResultsView::Multiple(records) => assert_eq!(records.len(), 2),
            _ => panic!("expected multi-record result"),
        }
        let status = app.status.as_ref().expect("info status");
        assert!(matches!(status.kind, StatusKind::Info));

        app.handle_key(KeyCode::Enter).expect("key handled");
        assert!(matches!(app.mode, Mode::BrowsingResults(_)));
    }

    #[test]
    fn unknown_plate_shows_empty_state() {
        let mut app = app();
        type_text(&mut app, "000000");
        app.handle_key(KeyCode::Enter).expect("key handled");
        assert!(matches!(app.results, ResultsView::Empty));
    }

    #[test]
    fn editing_input_resets_results_to_idle() {
        let mut app = app();
        type_text(&mut app, "777777");
        app.handle_key(KeyCode::Enter).expect("key handled");
        assert!(matches!(app.results, ResultsView::Single(_)));

        app.handle_key(KeyCode::Backspace).expect("key handled");
        assert!(matches!(app.results, ResultsView::Idle));
        assert!(app.status.is_none());
        assert_eq!(app.plate_input, "77777");
    }

    #[test]
    fn category_filter_narrows_duplicates_to_single() {
        let mut app = app();

        app.handle_key(KeyCode::Tab).expect("key handled");
        assert_eq!(app.active_field, SearchField::Category);
        app.handle_key(KeyCode::Enter).expect("key handled");
        assert!(matches!(app.mode, Mode::SelectingCategory(_)));

        // Options are [(any), Private, Taxi]; move to Taxi and choose it.
        app.handle_key(KeyCode::Down).expect("key handled");
        app.handle_key(KeyCode::Down).expect("key handled");
        app.handle_key(KeyCode::Enter).expect("key handled");
        assert_eq!(app.category.as_deref(), Some("Taxi"));
        assert!(matches!(app.mode, Mode::Editing));

        app.handle_key(KeyCode::Tab).expect("key handled");
        type_text(&mut app, "123456");
        app.handle_key(KeyCode::Enter).expect("key handled");
        match &app.results {
            ResultsView::Single(record) => assert_eq!(record.category, "Taxi"),
            _ => panic!("expected the taxi record only"),
        }
    }

    #[test]
    fn picking_wildcard_category_clears_filter() {
        let mut app = app();
        app.category = Some("Taxi".to_string());

        app.handle_key(KeyCode::Tab).expect("key handled");
        app.handle_key(KeyCode::Enter).expect("key handled");
        app.handle_key(KeyCode::Home).expect("key handled");
        app.handle_key(KeyCode::Enter).expect("key handled");
        assert_eq!(app.category, None);
    }

    #[test]
    fn browser_steps_back_through_detail_then_table() {
        let mut app = app();
        type_text(&mut app, "123456");
        app.handle_key(KeyCode::Enter).expect("key handled");
        app.handle_key(KeyCode::Enter).expect("key handled");

        app.handle_key(KeyCode::Down).expect("key handled");
        app.handle_key(KeyCode::Enter).expect("key handled");
        match &app.mode {
            Mode::BrowsingResults(browser) => {
                assert_eq!(browser.selected, 1);
                assert!(browser.show_detail);
            }
            _ => panic!("expected results browser"),
        }

        app.handle_key(KeyCode::Esc).expect("key handled");
        match &app.mode {
            Mode::BrowsingResults(browser) => assert!(!browser.show_detail),
            _ => panic!("expected results browser"),
        }

        app.handle_key(KeyCode::Esc).expect("key handled");
        assert!(matches!(app.mode, Mode::Editing));
    }

    #[test]
    fn search_failure_is_distinct_from_empty() {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        let mut app = App::new(conn);
        type_text(&mut app, "123456");
        app.handle_key(KeyCode::Enter).expect("key handled");
        assert!(matches!(app.results, ResultsView::Failed(_)));
        let status = app.status.as_ref().expect("error status");
        assert!(matches!(status.kind, StatusKind::Error));
    }

    #[test]
    fn escape_requests_exit_from_the_form() {
        let mut app = app();
        let exit = app.handle_key(KeyCode::Esc).expect("key handled");
        assert!(exit);
    }
}
