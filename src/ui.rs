// Browser UI for the template model.
//
// The model is the single source of truth; everything here is transient view
// state. The browser subscribes a redraw flag to the model, and whenever the
// flag fires it re-pulls deployments(), kinds(), and objects(...) and
// re-renders. Filter keystrokes are debounced: each one re-arms a short
// deadline, and only when the deadline passes quietly does the browser ask
// the model for a refresh.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use arm_maker::{kinds, KindNode, ModelObserver, TemplateModel};

/// Pause after the last filter keystroke before the object list re-queries.
const FILTER_DEBOUNCE: Duration = Duration::from_millis(100);

/// Idle redraw cadence of the event loop.
const TICK: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Deployments,
    Kinds,
    Objects,
}

impl Pane {
    pub fn next(&self) -> Self {
        match self {
            Pane::Deployments => Pane::Kinds,
            Pane::Kinds => Pane::Objects,
            Pane::Objects => Pane::Deployments,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Pane::Deployments => Pane::Objects,
            Pane::Kinds => Pane::Deployments,
            Pane::Objects => Pane::Kinds,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Pane::Deployments => "Deployments",
            Pane::Kinds => "Classes",
            Pane::Objects => "Objects",
        }
    }
}

/// What the keyboard is currently driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Filter,
    NewDeployment,
    NewEntry,
}

/// Observer registered with the model. Only flips a flag; the event loop
/// consumes it and re-queries outside of any model borrow.
struct RedrawFlag {
    dirty: Cell<bool>,
}

impl ModelObserver for RedrawFlag {
    fn update(&self) {
        self.dirty.set(true);
    }
}

/// One visible row of the kinds tree.
struct KindRow {
    depth: usize,
    name: String,
}

fn flatten_kinds(tree: &[KindNode]) -> Vec<KindRow> {
    fn walk(nodes: &[KindNode], depth: usize, out: &mut Vec<KindRow>) {
        for node in nodes {
            out.push(KindRow {
                depth,
                name: node.name.clone(),
            });
            walk(&node.children, depth + 1, out);
        }
    }
    let mut rows = Vec::new();
    walk(tree, 0, &mut rows);
    rows
}

pub struct Browser {
    model: Rc<RefCell<TemplateModel>>,
    redraw: Rc<RedrawFlag>,

    // View caches, rebuilt from the model on every refresh
    deployments: Vec<String>,
    kind_rows: Vec<KindRow>,
    objects: Vec<String>,

    // Transient UI state - lives here, never in the model
    pane: Pane,
    deployments_state: ListState,
    kinds_state: ListState,
    selected_kinds: BTreeSet<String>,
    objects_state: ListState,
    filter_text: String,
    input: InputMode,
    pending: String,
    status: String,
    filter_deadline: Option<Instant>,
}

impl Browser {
    pub fn new(model: Rc<RefCell<TemplateModel>>) -> Self {
        let redraw = Rc::new(RedrawFlag {
            dirty: Cell::new(false),
        });

        let mut browser = Browser {
            model,
            redraw,
            deployments: Vec::new(),
            kind_rows: Vec::new(),
            objects: Vec::new(),
            pane: Pane::Deployments,
            deployments_state: ListState::default(),
            kinds_state: ListState::default(),
            selected_kinds: BTreeSet::new(),
            objects_state: ListState::default(),
            filter_text: String::new(),
            input: InputMode::Normal,
            pending: String::new(),
            status: String::new(),
            filter_deadline: None,
        };

        // Subscribe once, then force the initial render.
        browser
            .model
            .borrow_mut()
            .subscribe(&(browser.redraw.clone() as Rc<dyn ModelObserver>));
        browser.model.borrow().update();

        browser
    }

    fn take_redraw(&self) -> bool {
        self.redraw.dirty.replace(false)
    }

    /// Re-pull everything the panes display from the model.
    fn refresh(&mut self) {
        let model = self.model.borrow();

        self.deployments = model.deployments();
        match self.deployments_state.selected() {
            Some(i) if i < self.deployments.len() => {}
            _ if self.deployments.is_empty() => self.deployments_state.select(None),
            _ => self.deployments_state.select(Some(0)),
        }

        self.kind_rows = flatten_kinds(model.kinds());
        match self.kinds_state.selected() {
            Some(i) if i < self.kind_rows.len() => {}
            _ => self.kinds_state.select(Some(0)),
        }
        if self.selected_kinds.is_empty() {
            self.selected_kinds.insert(kinds::RESOURCE.to_string());
        }

        self.objects = model.objects(
            &self.selected_deployment_set(),
            &self.selected_kinds,
            &self.filter_text,
        );
        match self.objects_state.selected() {
            Some(i) if i < self.objects.len() => {}
            _ if self.objects.is_empty() => self.objects_state.select(None),
            _ => self.objects_state.select(Some(0)),
        }
    }

    fn selected_deployment(&self) -> Option<&String> {
        self.deployments_state
            .selected()
            .and_then(|i| self.deployments.get(i))
    }

    fn selected_deployment_set(&self) -> BTreeSet<String> {
        self.selected_deployment().cloned().into_iter().collect()
    }

    fn selected_object(&self) -> Option<&String> {
        self.objects_state
            .selected()
            .and_then(|i| self.objects.get(i))
    }

    fn navigate(&mut self, delta: isize) {
        let (state, len) = match self.pane {
            Pane::Deployments => (&mut self.deployments_state, self.deployments.len()),
            Pane::Kinds => (&mut self.kinds_state, self.kind_rows.len()),
            Pane::Objects => (&mut self.objects_state, self.objects.len()),
        };
        if len == 0 {
            return;
        }
        let current = state.selected().unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len as isize) as usize;
        state.select(Some(next));

        // Moving the deployment selection changes what the object pane shows.
        if self.pane == Pane::Deployments {
            self.refresh();
        }
    }

    fn toggle_kind(&mut self) {
        let Some(row) = self.kinds_state.selected().and_then(|i| self.kind_rows.get(i)) else {
            return;
        };
        let name = row.name.clone();
        if !self.selected_kinds.remove(&name) {
            self.selected_kinds.insert(name);
        }
        self.refresh();
    }

    fn begin_new_deployment(&mut self) {
        self.pending.clear();
        self.input = InputMode::NewDeployment;
    }

    fn begin_new_entry(&mut self) {
        if self.selected_kinds.len() != 1 {
            self.status = "Select exactly one class to create an object of.".to_string();
            return;
        }
        if self.selected_deployment().is_none() {
            self.status = "Select exactly one deployment to create an object in.".to_string();
            return;
        }
        self.pending.clear();
        self.input = InputMode::NewEntry;
    }

    fn commit_new_deployment(&mut self) {
        let name = std::mem::take(&mut self.pending);
        self.input = InputMode::Normal;
        if name.is_empty() {
            return;
        }
        if let Err(err) = self.model.borrow_mut().add_deployment(&name) {
            self.status = format!("Error: {err}");
        } else {
            self.status.clear();
        }
    }

    fn commit_new_entry(&mut self) {
        let name = std::mem::take(&mut self.pending);
        self.input = InputMode::Normal;
        if name.is_empty() {
            return;
        }
        let kind = match self.selected_kinds.iter().next() {
            Some(kind) => kind.clone(),
            None => return,
        };
        let deployment = match self.selected_deployment() {
            Some(deployment) => deployment.clone(),
            None => return,
        };
        if let Err(err) = self.model.borrow_mut().add_object(&deployment, &kind, &name) {
            self.status = err.to_string();
        } else {
            self.status.clear();
        }
    }

    /// A filter keystroke cancels any pending re-query and starts a new one.
    fn arm_filter_timer(&mut self) {
        self.filter_deadline = Some(Instant::now() + FILTER_DEBOUNCE);
    }

    /// Fire the debounced re-query once the deadline passes quietly.
    fn tick(&mut self) {
        if let Some(deadline) = self.filter_deadline {
            if Instant::now() >= deadline {
                self.filter_deadline = None;
                self.model.borrow().update();
            }
        }
    }

    fn poll_timeout(&self) -> Duration {
        match self.filter_deadline {
            Some(deadline) => deadline
                .saturating_duration_since(Instant::now())
                .min(TICK),
            None => TICK,
        }
    }

    /// Returns true when the browser should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match self.input {
            InputMode::Normal => match code {
                KeyCode::Char('q') | KeyCode::Esc => return true,
                KeyCode::Tab => self.pane = self.pane.next(),
                KeyCode::BackTab => self.pane = self.pane.previous(),
                KeyCode::Down | KeyCode::Char('j') => self.navigate(1),
                KeyCode::Up | KeyCode::Char('k') => self.navigate(-1),
                KeyCode::Char(' ') if self.pane == Pane::Kinds => self.toggle_kind(),
                KeyCode::Char('/') => {
                    self.input = InputMode::Filter;
                    self.pane = Pane::Objects;
                }
                KeyCode::Char('n') => match self.pane {
                    Pane::Deployments => self.begin_new_deployment(),
                    Pane::Kinds | Pane::Objects => self.begin_new_entry(),
                },
                _ => {}
            },
            InputMode::Filter => match code {
                KeyCode::Enter | KeyCode::Esc => {
                    self.input = InputMode::Normal;
                    self.filter_deadline = None;
                    self.model.borrow().update();
                }
                KeyCode::Backspace => {
                    self.filter_text.pop();
                    self.arm_filter_timer();
                }
                KeyCode::Char(c) => {
                    self.filter_text.push(c);
                    self.arm_filter_timer();
                }
                _ => {}
            },
            InputMode::NewDeployment => match code {
                KeyCode::Esc => self.input = InputMode::Normal,
                KeyCode::Enter => self.commit_new_deployment(),
                KeyCode::Backspace => {
                    self.pending.pop();
                }
                KeyCode::Char(c) => self.pending.push(c),
                _ => {}
            },
            InputMode::NewEntry => match code {
                KeyCode::Esc => self.input = InputMode::Normal,
                KeyCode::Enter => self.commit_new_entry(),
                KeyCode::Backspace => {
                    self.pending.pop();
                }
                KeyCode::Char(c) => self.pending.push(c),
                _ => {}
            },
        }
        false
    }
}

pub fn run_ui(browser: &mut Browser) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, browser);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    browser: &mut Browser,
) -> io::Result<()> {
    loop {
        if browser.take_redraw() {
            browser.refresh();
        }

        terminal.draw(|f| ui(f, browser))?;

        if event::poll(browser.poll_timeout())? {
            if let Event::Key(key) = event::read()? {
                if browser.handle_key(key.code) {
                    return Ok(());
                }
            }
        }

        browser.tick();
    }
}

fn ui(f: &mut Frame, browser: &mut Browser) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title with pane tabs
            Constraint::Min(0),    // Three browser panes
            Constraint::Length(4), // Content strip
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], browser);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(40),
        ])
        .split(chunks[1]);

    render_deployments(f, panes[0], browser);
    render_kinds(f, panes[1], browser);
    render_objects(f, panes[2], browser);

    render_content(f, chunks[2], browser);
    render_status_bar(f, chunks[3], browser);
}

fn pane_border(browser: &Browser, pane: Pane) -> Style {
    if browser.pane == pane {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_header(f: &mut Frame, area: Rect, browser: &Browser) {
    let title = {
        let model = browser.model.borrow();
        format!("ARM Maker - {}", model.filename().unwrap_or("Untitled"))
    };

    let mut spans = vec![
        Span::styled(title, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Span::raw("  |  "),
    ];
    for (i, pane) in [Pane::Deployments, Pane::Kinds, Pane::Objects].iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" │ "));
        }
        let style = if *pane == browser.pane {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(pane.title(), style));
    }

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_deployments(f: &mut Frame, area: Rect, browser: &mut Browser) {
    let items: Vec<ListItem> = browser
        .deployments
        .iter()
        .map(|name| ListItem::new(name.clone()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(pane_border(browser, Pane::Deployments))
                .title(" Deployments "),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    f.render_stateful_widget(list, area, &mut browser.deployments_state);
}

fn render_kinds(f: &mut Frame, area: Rect, browser: &mut Browser) {
    let items: Vec<ListItem> = browser
        .kind_rows
        .iter()
        .map(|row| {
            let marker = if browser.selected_kinds.contains(&row.name) {
                "[x] "
            } else {
                "[ ] "
            };
            let line = format!("{}{}{}", "  ".repeat(row.depth), marker, row.name);
            let style = if browser.selected_kinds.contains(&row.name) {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(pane_border(browser, Pane::Kinds))
                .title(" Classes "),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    f.render_stateful_widget(list, area, &mut browser.kinds_state);
}

fn render_objects(f: &mut Frame, area: Rect, browser: &mut Browser) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let items: Vec<ListItem> = browser
        .objects
        .iter()
        .map(|name| ListItem::new(name.clone()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(pane_border(browser, Pane::Objects))
                .title(format!(" Objects ({}) ", browser.objects.len())),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    f.render_stateful_widget(list, rows[0], &mut browser.objects_state);

    let editing = browser.input == InputMode::Filter;
    let mut filter = browser.filter_text.clone();
    if editing {
        filter.push('▏');
    }
    let filter_box = Paragraph::new(filter)
        .style(if editing {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(pane_border(browser, Pane::Objects))
                .title(" Filter "),
        );
    f.render_widget(filter_box, rows[1]);
}

fn render_content(f: &mut Frame, area: Rect, browser: &Browser) {
    let model = browser.model.borrow();
    let lines = match browser.selected_object().and_then(|name| model.entry(name)) {
        Some(entry) => vec![
            Line::from(vec![
                Span::styled("  Name: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                Span::raw(entry.name.clone()),
                Span::raw("    "),
                Span::styled("Deployment: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                Span::raw(entry.deployment.clone()),
            ]),
            Line::from(vec![
                Span::styled("  Classes: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                Span::raw(entry.classes.join(", ")),
            ]),
        ],
        None => vec![Line::from(Span::styled(
            "  No object selected",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))],
    };

    let content = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Content "),
    );

    f.render_widget(content, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, browser: &Browser) {
    let spans = match browser.input {
        InputMode::NewDeployment => vec![
            Span::styled(" Name for deployment: ", Style::default().fg(Color::Yellow)),
            Span::raw(browser.pending.clone()),
            Span::raw("▏"),
        ],
        InputMode::NewEntry => vec![
            Span::styled(" Name for object: ", Style::default().fg(Color::Yellow)),
            Span::raw(browser.pending.clone()),
            Span::raw("▏"),
        ],
        InputMode::Filter => vec![
            Span::styled(" Filtering objects ", Style::default().fg(Color::Yellow)),
            Span::raw("| "),
            Span::styled("Enter/Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" Done"),
        ],
        InputMode::Normal if !browser.status.is_empty() => vec![Span::styled(
            format!(" {} ", browser.status),
            Style::default().fg(Color::Red),
        )],
        InputMode::Normal => vec![
            Span::raw(" "),
            Span::styled("Tab", Style::default().fg(Color::Yellow)),
            Span::raw(" Pane | "),
            Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
            Span::raw(" Nav | "),
            Span::styled("Space", Style::default().fg(Color::Yellow)),
            Span::raw(" Toggle class | "),
            Span::styled("n", Style::default().fg(Color::Yellow)),
            Span::raw(" New | "),
            Span::styled("/", Style::default().fg(Color::Yellow)),
            Span::raw(" Filter | "),
            Span::styled("q", Style::default().fg(Color::Red)),
            Span::raw(" Quit"),
        ],
    };

    let status_bar = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}
