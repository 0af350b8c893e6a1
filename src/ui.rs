// 🖥️ Operator UI - Scanner and manual lookup pages over one Station
//
// Scanner page: type or scan a barcode, Enter resolves it.
// Manual page: type search terms, pick a label from the list.
// Both pages print the current selection with F5.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use label_scanner::{DisambiguationPrompt, NumberMode, PrintMode, Station, WarningPresenter};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState,
        Wrap,
    },
    Frame, Terminal,
};
use std::io;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Scanner,
    Manual,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Scanner => Page::Manual,
            Page::Manual => Page::Scanner,
        }
    }

    pub fn previous(&self) -> Self {
        // Two pages: previous and next coincide
        self.next()
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Scanner => "Scanner",
            Page::Manual => "Manual lookup",
        }
    }
}

/// Warnings raised during an action, shown one at a time as a popup
#[derive(Debug, Default)]
pub struct WarningQueue {
    pending: Vec<(String, String)>,
}

impl WarningQueue {
    pub fn current(&self) -> Option<&(String, String)> {
        self.pending.first()
    }

    pub fn dismiss(&mut self) {
        if !self.pending.is_empty() {
            self.pending.remove(0);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl WarningPresenter for WarningQueue {
    fn show(&mut self, title: &str, message: &str) {
        self.pending.push((title.to_string(), message.to_string()));
    }
}

pub struct App {
    pub station: Station,
    pub current_page: Page,
    pub scan_input: String,
    pub search_query: String,
    pub number_mode: NumberMode,
    pub labels: Vec<String>,
    pub state: TableState,
    pub copies: u32,
    pub warnings: WarningQueue,
    pub status: Option<String>,
}

impl App {
    pub fn new(station: Station) -> Self {
        let number_mode = NumberMode::default();
        let labels = station.search("", number_mode);

        let mut state = TableState::default();
        if !labels.is_empty() {
            state.select(Some(0));
        }

        Self {
            station,
            current_page: Page::Scanner,
            scan_input: String::new(),
            search_query: String::new(),
            number_mode,
            labels,
            state,
            copies: 1,
            warnings: WarningQueue::default(),
            status: None,
        }
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    // ------------------------------------------------------------------------
    // Copies
    // ------------------------------------------------------------------------

    pub fn more_copies(&mut self) {
        self.copies = self.copies.saturating_add(1).min(self.station.max_copies());
    }

    pub fn fewer_copies(&mut self) {
        self.copies = self.copies.saturating_sub(1).max(1);
    }

    /// Empty the input line of the current page
    pub fn clear_input(&mut self) {
        match self.current_page {
            Page::Scanner => self.scan_input.clear(),
            Page::Manual => {
                self.search_query.clear();
                self.refresh_labels();
            }
        }
    }

    // ------------------------------------------------------------------------
    // Scanner page
    // ------------------------------------------------------------------------

    /// Resolve the typed barcode; ambiguous scans ask through `prompt`
    pub fn submit_scan(&mut self, prompt: &mut dyn DisambiguationPrompt) {
        let input = std::mem::take(&mut self.scan_input);
        if input.is_empty() {
            return;
        }
        self.status = None;
        self.station.scan(&input, prompt, &mut self.warnings);
    }

    // ------------------------------------------------------------------------
    // Manual page
    // ------------------------------------------------------------------------

    pub fn refresh_labels(&mut self) {
        self.labels = self.station.search(&self.search_query, self.number_mode);
        if self.labels.is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    pub fn toggle_number_mode(&mut self) {
        self.number_mode = self.number_mode.toggle();
        self.refresh_labels();
    }

    pub fn select_label(&mut self) {
        let Some(label) = self.state.selected().and_then(|i| self.labels.get(i)).cloned() else {
            return;
        };
        self.status = None;
        self.station
            .select_manual(&label, self.number_mode, &mut self.warnings);
    }

    pub fn next(&mut self) {
        let len = self.labels.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.labels.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    // ------------------------------------------------------------------------
    // Printing
    // ------------------------------------------------------------------------

    pub fn print(&mut self) {
        let printing = self
            .station
            .selection()
            .map(|selection| (selection.item.name.clone(), selection.mode));

        if self.station.print(self.copies, &mut self.warnings).is_err() {
            // The station has already queued the operator warning
            return;
        }

        if let Some((name, mode)) = printing {
            self.status = Some(format!("Printed {} x {}", self.copies, name));
            if mode == PrintMode::Scanner {
                self.copies = 1;
            }
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // A warning blocks everything until acknowledged
        if !app.warnings.is_empty() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                app.warnings.dismiss();
            }
            continue;
        }

        if is_quit(&key) {
            return Ok(());
        }

        match key.code {
            KeyCode::Tab => app.next_page(),
            KeyCode::BackTab => app.previous_page(),
            KeyCode::F(5) => app.print(),
            KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => app.print(),
            KeyCode::Right => app.more_copies(),
            KeyCode::Left => app.fewer_copies(),
            KeyCode::Esc => app.clear_input(),
            _ => match app.current_page {
                Page::Scanner => handle_scanner_key(terminal, app, key),
                Page::Manual => handle_manual_key(app, key),
            },
        }
    }
}

/// Ctrl+C or Ctrl+Q. Esc is reserved for cancelling prompts and clearing input.
fn is_quit(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
}

fn handle_scanner_key<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            let mut prompt = TerminalPrompt {
                terminal,
                scanned: app.scan_input.clone(),
            };
            app.submit_scan(&mut prompt);
        }
        KeyCode::Backspace => {
            app.scan_input.pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scan_input.push(c);
        }
        _ => {}
    }
}

fn handle_manual_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.select_label(),
        KeyCode::Down => app.next(),
        KeyCode::Up => app.previous(),
        KeyCode::F(2) => app.toggle_number_mode(),
        KeyCode::Backspace => {
            app.search_query.pop();
            app.refresh_labels();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search_query.push(c);
            app.refresh_labels();
        }
        _ => {}
    }
}

// ============================================================================
// DISAMBIGUATION
// ============================================================================

/// Modal list drawn over the screen; blocks until the operator answers
struct TerminalPrompt<'t, B: Backend> {
    terminal: &'t mut Terminal<B>,
    scanned: String,
}

impl<B: Backend> DisambiguationPrompt for TerminalPrompt<'_, B> {
    fn ask(&mut self, labels: &[String]) -> Option<String> {
        let mut state = ListState::default();
        state.select(Some(0));

        loop {
            let title = format!(
                " {} - which item was scanned? (Enter choose, Esc cancel) ",
                self.scanned
            );
            let drawn = self
                .terminal
                .draw(|f| render_disambiguation(f, &title, labels, &mut state));
            if let Err(err) = drawn {
                warn!(error = %err, "disambiguation prompt could not be drawn");
                return None;
            }

            let key = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => key,
                Ok(_) => continue,
                Err(err) => {
                    warn!(error = %err, "disambiguation prompt lost the terminal");
                    return None;
                }
            };

            let selected = state.selected().unwrap_or(0);
            match key.code {
                KeyCode::Enter => return labels.get(selected).cloned(),
                KeyCode::Esc => return None,
                KeyCode::Down => state.select(Some((selected + 1) % labels.len().max(1))),
                KeyCode::Up => {
                    let last = labels.len().saturating_sub(1);
                    state.select(Some(selected.checked_sub(1).unwrap_or(last)));
                }
                _ => {}
            }
        }
    }
}

fn render_disambiguation(f: &mut Frame, title: &str, labels: &[String], state: &mut ListState) {
    let area = centered_rect(70, 50, f.size());

    let items: Vec<ListItem> = labels.iter().map(|l| ListItem::new(l.as_str())).collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(title.to_string()),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    f.render_widget(Clear, area);
    f.render_stateful_widget(list, area, state);
}

// ============================================================================
// LAYOUT
// ============================================================================

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Length(3), // Input line
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_inputs(f, chunks[1], app);

    match app.current_page {
        Page::Scanner => {
            let content = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(chunks[2]);
            render_item_panel(f, content[0], app);
            render_preview_panel(f, content[1], app);
        }
        Page::Manual => {
            let content = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(chunks[2]);
            let side = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(content[1]);
            render_label_table(f, content[0], app);
            render_item_panel(f, side[0], app);
            render_preview_panel(f, side[1], app);
        }
    }

    render_status_bar(f, chunks[3], app);

    if let Some((title, message)) = app.warnings.current() {
        render_warning(f, title, message);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, page) in [Page::Scanner, Page::Manual].iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    let data = app.station.data();
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Items: {}", data.catalog.len()),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("Corrections: {}", data.corrections.len()),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        app.station.printer_description(),
        Style::default().fg(Color::Green),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_inputs(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(area);

    let (title, text) = match app.current_page {
        Page::Scanner => (" Barcode ".to_string(), &app.scan_input),
        Page::Manual => (format!(" Search ({}) ", app.number_mode.title()), &app.search_query),
    };
    let input = Paragraph::new(Line::from(vec![
        Span::raw(text.as_str()),
        Span::styled("▏", Style::default().fg(Color::Yellow)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(title),
    );
    f.render_widget(input, chunks[0]);

    let copies = Paragraph::new(format!("{}", app.copies)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" Copies (1-{}) ", app.station.max_copies())),
    );
    f.render_widget(copies, chunks[1]);
}

fn render_label_table(f: &mut Frame, area: Rect, app: &mut App) {
    let rows = app
        .labels
        .iter()
        .map(|label| Row::new(vec![Cell::from(label.clone())]).height(1));

    let table = Table::new(rows, [Constraint::Percentage(100)])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" Items ({}) ", app.labels.len())),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_item_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Item ");

    let Some(selection) = app.station.selection() else {
        let hint = match app.current_page {
            Page::Scanner => "Scan a barcode",
            Page::Manual => "Choose an item from the list",
        };
        let empty = Paragraph::new(Span::styled(
            format!("  {}", hint),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))
        .block(block);
        f.render_widget(empty, area);
        return;
    };

    let item = &selection.item;
    let field = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(
                format!("  {:<12}", label),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(value),
        ])
    };

    let content = vec![
        Line::from(""),
        field("Name:", item.name.clone()),
        field("Color:", item.color.clone()),
        field("Old number:", item.old_number.clone()),
        field("New number:", item.new_number.clone()),
        Line::from(""),
        field("Barcode:", selection.barcode_display.clone()),
        Line::from(""),
        Line::from(Span::styled(
            format!("  Selected in {} mode", selection.mode.tag()),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ];

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn render_preview_panel(f: &mut Frame, area: Rect, app: &App) {
    let content = match (app.station.selection(), app.station.preview()) {
        (_, Some(image)) => vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  File: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                Span::styled(image.path.display().to_string(), Style::default().fg(Color::Green)),
            ]),
            Line::from(vec![
                Span::styled("  Size: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                Span::raw(format!("{} bytes", image.bytes.len())),
            ]),
        ],
        (Some(_), None) => vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No label artwork for this item",
                Style::default().fg(Color::Red),
            )),
        ],
        (None, None) => vec![Line::from("")],
    };

    let preview = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Label "),
    );
    f.render_widget(preview, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![];

    if let Some(status) = &app.status {
        status_spans.push(Span::styled(
            format!(" {} ", status),
            Style::default().fg(Color::Green),
        ));
        status_spans.push(Span::raw("| "));
    }

    status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
    match app.current_page {
        Page::Scanner => status_spans.push(Span::raw(" Scan | ")),
        Page::Manual => {
            status_spans.push(Span::raw(" Select | "));
            status_spans.push(Span::styled("F2", Style::default().fg(Color::Yellow)));
            status_spans.push(Span::raw(" Old/New | "));
        }
    }
    status_spans.push(Span::styled("←/→", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Copies | "));
    status_spans.push(Span::styled("F5", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Print | "));
    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Page | "));
    status_spans.push(Span::styled("Esc", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Clear | "));
    status_spans.push(Span::styled("Ctrl+Q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_warning(f: &mut Frame, title: &str, message: &str) {
    let area = centered_rect(50, 25, f.size());

    let content = vec![
        Line::from(""),
        Line::from(format!("  {}", message)),
        Line::from(""),
        Line::from(Span::styled(
            "  Press Enter to close",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ];

    let popup = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(format!(" {} ", title)),
        );

    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use label_scanner::{
        Catalog, CorrectionIndex, DirectoryPrinter, LabelData, PngLabelStore, PrintJournal,
    };
    use std::path::Path;
    use std::sync::Arc;

    const CATALOG: &str = "\
Gammelt varenummer;Varenavn;Farve;Stregkode;Nyt varenummer
1001;Palissade Seat Cushion FR;Anthracite;5710000000017;AB100
1002;Palissade Seat Cushion FR;Sky Grey;5710000000024;AB101
";

    fn app(dir: &Path) -> App {
        app_with_max(dir, 3)
    }

    fn app_with_max(dir: &Path, max_copies: u32) -> App {
        let data = Arc::new(LabelData::new(
            Catalog::parse(CATALOG, Path::new("catalog.txt")).unwrap(),
            CorrectionIndex::new(),
        ));
        std::fs::write(dir.join("5710000000017.png"), b"png").unwrap();
        let station = Station::new(
            data,
            PrintJournal::new(dir.join("log.txt")),
            Box::new(PngLabelStore::new(dir)),
            Box::new(DirectoryPrinter::new(dir.join("out"))),
            max_copies,
        );
        App::new(station)
    }

    #[test]
    fn test_copies_stay_in_range() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        app.fewer_copies();
        assert_eq!(app.copies, 1);
        for _ in 0..10 {
            app.more_copies();
        }
        assert_eq!(app.copies, 3);
    }

    #[test]
    fn test_search_filters_labels() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        assert_eq!(app.labels.len(), 2);

        app.search_query = "grey".to_string();
        app.refresh_labels();
        assert_eq!(app.labels, vec!["1002 - Seat Cushion - Sky Grey".to_string()]);

        app.toggle_number_mode();
        assert_eq!(app.labels, vec!["AB101 - Seat Cushion - Sky Grey".to_string()]);
    }

    #[test]
    fn test_scan_then_print_resets_copies() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        let mut never = |_: &[String]| -> Option<String> { None };

        app.scan_input = "5710000000017".to_string();
        app.submit_scan(&mut never);
        assert!(app.scan_input.is_empty());
        assert!(app.station.selection().is_some());

        app.more_copies();
        app.print();

        assert_eq!(app.copies, 1);
        assert!(app.station.selection().is_none());
        assert_eq!(app.status.as_deref(), Some("Printed 2 x Palissade Seat Cushion FR"));
        assert!(app.warnings.is_empty());
    }

    #[test]
    fn test_unknown_scan_queues_warning() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        let mut never = |_: &[String]| -> Option<String> { None };

        app.scan_input = "5710000000999".to_string();
        app.submit_scan(&mut never);

        assert_eq!(app.warnings.current().unwrap().0, "Unknown barcode");
        app.warnings.dismiss();
        assert!(app.warnings.is_empty());
    }

    #[test]
    fn test_copies_saturate_at_largest_maximum() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_max(dir.path(), u32::MAX);

        app.copies = u32::MAX;
        app.more_copies();

        assert_eq!(app.copies, u32::MAX);
    }

    #[test]
    fn test_esc_clears_input_instead_of_quitting() {
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert!(!is_quit(&esc));
        assert!(is_quit(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)));
        assert!(is_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));

        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        app.current_page = Page::Manual;
        app.search_query = "grey".to_string();
        app.refresh_labels();

        app.clear_input();

        assert!(app.search_query.is_empty());
        assert_eq!(app.labels.len(), 2);
    }

    #[test]
    fn test_print_without_selection_warns_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        app.print();

        assert_eq!(
            app.warnings.current().map(|w| w.1.as_str()),
            Some("Scan an item before printing.")
        );
        app.warnings.dismiss();
        assert!(app.warnings.is_empty());
        assert!(app.status.is_none());
    }
}
