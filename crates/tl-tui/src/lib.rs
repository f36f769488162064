use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    BarChart, Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap,
};
use ratatui::{Frame, Terminal};
use std::collections::HashSet;
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use tl_core::{
    daily_set, difficulty_counts, drill_items, related_of, search, CommandEntry, Difficulty,
    Exercise, Lab, Member, Phase, Post, SolutionMatch, Validator, Verdict, Workbook,
};

const TICK_RATE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Dashboard,
    Commands,
    Curriculum,
    Labs,
    Practice,
    Community,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    List,
    Detail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum InputMode {
    None,
    Filter,
    Palette,
    Answer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommunityView {
    Posts,
    Members,
}

#[derive(Debug, Default, Clone)]
struct TextInput {
    content: String,
    cursor: usize,
}

impl TextInput {
    fn from(content: String) -> Self {
        let cursor = content.len();
        Self { content, cursor }
    }

    fn insert(&mut self, c: char) {
        if self.cursor <= self.content.len() {
            self.content.insert(self.cursor, c);
            self.cursor += 1;
        }
    }

    fn delete_back(&mut self) {
        if self.cursor > 0 && self.cursor <= self.content.len() {
            self.content.remove(self.cursor - 1);
            self.cursor -= 1;
        }
    }

    fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    fn move_right(&mut self) {
        if self.cursor < self.content.len() {
            self.cursor += 1;
        }
    }

    fn move_home(&mut self) {
        self.cursor = 0;
    }

    fn move_end(&mut self) {
        self.cursor = self.content.len();
    }

    fn reset(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }
}

#[derive(Debug, Clone, Copy)]
enum Move {
    Up,
    Down,
    PageUp,
    PageDown,
    First,
    Last,
}

#[derive(Debug, Clone, Copy)]
enum PaletteAction {
    GoDashboard,
    GoCommands,
    GoCurriculum,
    GoLabs,
    GoPractice,
    GoCommunity,
    ClearFilter,
    CopyExample,
    ToggleHelp,
    Quit,
}

#[derive(Debug, Clone, Copy)]
struct PaletteCommand {
    name: &'static str,
    description: &'static str,
    action: PaletteAction,
}

struct App {
    tab: Tab,
    focus: Focus,
    entries: Vec<CommandEntry>,
    curriculum: Vec<Phase>,
    workbooks: Vec<Workbook>,
    labs: Vec<Lab>,
    exercises: Vec<Exercise>,
    posts: Vec<Post>,
    members: Vec<Member>,

    command_state: ListState,
    curriculum_state: ListState,
    lab_state: ListState,
    exercise_state: ListState,
    community_state: ListState,
    palette_state: ListState,

    source_index: usize,
    difficulty_index: usize,
    active_filter: Option<String>,
    filter_input: TextInput,
    answer_input: TextInput,
    palette_input: TextInput,
    palette: Vec<PaletteCommand>,

    learned: HashSet<String>,
    completed_labs: HashSet<String>,
    liked_posts: HashSet<String>,
    solved_exercises: HashSet<String>,
    show_solution: bool,
    community_view: CommunityView,

    input_mode: InputMode,
    status: Option<String>,
    show_help: bool,
}

struct AppData {
    entries: Vec<CommandEntry>,
    curriculum: Vec<Phase>,
    workbooks: Vec<Workbook>,
    labs: Vec<Lab>,
    exercises: Vec<Exercise>,
    posts: Vec<Post>,
    members: Vec<Member>,
}

impl App {
    fn new(data: AppData) -> Self {
        let mut command_state = ListState::default();
        command_state.select(Some(0));
        let mut curriculum_state = ListState::default();
        curriculum_state.select(Some(0));
        let mut lab_state = ListState::default();
        lab_state.select(Some(0));
        let mut exercise_state = ListState::default();
        exercise_state.select(Some(0));
        let mut community_state = ListState::default();
        community_state.select(Some(0));

        Self {
            tab: Tab::Dashboard,
            focus: Focus::List,
            entries: data.entries,
            curriculum: data.curriculum,
            workbooks: data.workbooks,
            labs: data.labs,
            exercises: data.exercises,
            posts: data.posts,
            members: data.members,
            command_state,
            curriculum_state,
            lab_state,
            exercise_state,
            community_state,
            palette_state: ListState::default(),
            source_index: 0,
            difficulty_index: 0,
            active_filter: None,
            filter_input: TextInput::default(),
            answer_input: TextInput::default(),
            palette_input: TextInput::default(),
            palette: build_palette(),
            learned: HashSet::new(),
            completed_labs: HashSet::new(),
            liked_posts: HashSet::new(),
            solved_exercises: HashSet::new(),
            show_solution: false,
            community_view: CommunityView::Posts,
            input_mode: InputMode::None,
            status: None,
            show_help: false,
        }
    }

    fn next_tab(&mut self) {
        self.tab = match self.tab {
            Tab::Dashboard => Tab::Commands,
            Tab::Commands => Tab::Curriculum,
            Tab::Curriculum => Tab::Labs,
            Tab::Labs => Tab::Practice,
            Tab::Practice => Tab::Community,
            Tab::Community => Tab::Dashboard,
        };
        self.focus = Focus::List;
    }

    fn prev_tab(&mut self) {
        self.tab = match self.tab {
            Tab::Dashboard => Tab::Community,
            Tab::Commands => Tab::Dashboard,
            Tab::Curriculum => Tab::Commands,
            Tab::Labs => Tab::Curriculum,
            Tab::Practice => Tab::Labs,
            Tab::Community => Tab::Practice,
        };
        self.focus = Focus::List;
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::List => Focus::Detail,
            Focus::Detail => Focus::List,
        };
    }

    fn available_sources(&self) -> Vec<String> {
        let mut sources: Vec<String> = self
            .entries
            .iter()
            .map(|entry| entry.source.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        sources.sort();
        let mut all = vec!["All".to_string()];
        all.extend(sources);
        all
    }

    fn next_source(&mut self) {
        let count = self.available_sources().len();
        if count > 0 {
            self.source_index = (self.source_index + 1) % count;
            self.command_state.select(Some(0));
        }
    }

    fn prev_source(&mut self) {
        let count = self.available_sources().len();
        if count > 0 {
            if self.source_index == 0 {
                self.source_index = count - 1;
            } else {
                self.source_index -= 1;
            }
            self.command_state.select(Some(0));
        }
    }

    fn difficulty_filter(&self) -> Option<Difficulty> {
        if self.difficulty_index == 0 {
            None
        } else {
            Some(Difficulty::ALL[self.difficulty_index - 1])
        }
    }

    fn cycle_difficulty(&mut self) {
        self.difficulty_index = (self.difficulty_index + 1) % (Difficulty::ALL.len() + 1);
        self.command_state.select(Some(0));
        self.lab_state.select(Some(0));
    }

    fn filter_text(&self) -> &str {
        self.active_filter.as_deref().unwrap_or("")
    }

    fn filtered_commands(&self) -> Vec<&CommandEntry> {
        let mut matches = search(
            &self.entries,
            self.filter_text(),
            None,
            self.difficulty_filter(),
        );
        let sources = self.available_sources();
        let current = sources
            .get(self.source_index)
            .map_or("All", String::as_str);
        if current != "All" {
            matches.retain(|entry| entry.source == current);
        }
        matches
    }

    fn filtered_labs(&self) -> Vec<&Lab> {
        let needle = self.filter_text().trim().to_lowercase();
        self.labs
            .iter()
            .filter(|lab| {
                self.difficulty_filter()
                    .map_or(true, |wanted| lab.difficulty == wanted)
            })
            .filter(|lab| {
                needle.is_empty()
                    || lab.title.to_lowercase().contains(&needle)
                    || lab.description.to_lowercase().contains(&needle)
                    || lab
                        .skills
                        .iter()
                        .any(|skill| skill.to_lowercase().contains(&needle))
            })
            .collect()
    }

    fn selected_command(&self) -> Option<&CommandEntry> {
        let filtered = self.filtered_commands();
        self.command_state
            .selected()
            .and_then(|index| filtered.get(index).copied())
    }

    fn selected_phase(&self) -> Option<&Phase> {
        self.curriculum_state
            .selected()
            .and_then(|index| self.curriculum.get(index))
    }

    fn selected_lab(&self) -> Option<&Lab> {
        let filtered = self.filtered_labs();
        self.lab_state
            .selected()
            .and_then(|index| filtered.get(index).copied())
    }

    fn selected_exercise(&self) -> Option<&Exercise> {
        self.exercise_state
            .selected()
            .and_then(|index| self.exercises.get(index))
    }

    fn selected_post(&self) -> Option<&Post> {
        self.community_state
            .selected()
            .and_then(|index| self.posts.get(index))
    }

    fn selected_member(&self) -> Option<&Member> {
        self.community_state
            .selected()
            .and_then(|index| self.members.get(index))
    }

    fn learned_key(entry: &CommandEntry) -> String {
        format!("{}/{}", entry.source, entry.name)
    }
}

pub fn run() -> Result<()> {
    let data = load_data().context("failed to load datasets")?;
    let mut app = App::new(data);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| render_app(frame, &app))?;

        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(&mut app, key) {
                    break;
                }
            }
        }

        if last_tick.elapsed() >= TICK_RATE {
            last_tick = Instant::now();
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

fn load_data() -> Result<AppData> {
    let mut entries = tl_data::load_entries(&tl_data::default_sources())
        .context("failed to load built-in datasets")?;
    let data_dir = tl_fs::resolve_data_dir().context("failed to resolve data directory")?;
    entries.extend(
        tl_fs::load_custom_entries(&data_dir).context("failed to load custom entries")?,
    );

    Ok(AppData {
        entries,
        curriculum: tl_data::curriculum().context("failed to load curriculum")?,
        workbooks: tl_data::workbooks().context("failed to load workbooks")?,
        labs: tl_data::labs().context("failed to load labs")?,
        exercises: tl_data::exercises().context("failed to load exercises")?,
        posts: tl_data::posts().context("failed to load posts")?,
        members: tl_data::members().context("failed to load members")?,
    })
}

fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    match app.input_mode {
        InputMode::Filter => return handle_filter_input(app, key),
        InputMode::Palette => return handle_palette_input(app, key),
        InputMode::Answer => return handle_answer_input(app, key),
        InputMode::None => {}
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('u') => {
                handle_list_move(app, Move::PageUp);
                return false;
            }
            KeyCode::Char('d') => {
                handle_list_move(app, Move::PageDown);
                return false;
            }
            _ => {}
        }
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('?') => {
            app.show_help = !app.show_help;
        }
        KeyCode::Char('p') | KeyCode::Char(':') => open_palette(app),
        KeyCode::Char('/') => {
            if matches!(app.tab, Tab::Commands | Tab::Labs) {
                app.input_mode = InputMode::Filter;
                app.filter_input.reset();
                if let Some(current) = &app.active_filter {
                    app.filter_input = TextInput::from(current.clone());
                }
            }
        }
        KeyCode::Esc => {
            app.active_filter = None;
            app.filter_input.reset();
            app.status = None;
        }
        KeyCode::Right => app.next_tab(),
        KeyCode::Left => app.prev_tab(),
        KeyCode::Char('h') => match app.tab {
            Tab::Commands => app.prev_source(),
            Tab::Community => toggle_community_view(app),
            _ => app.prev_tab(),
        },
        KeyCode::Char('l') => match app.tab {
            Tab::Commands => app.next_source(),
            Tab::Community => toggle_community_view(app),
            _ => app.next_tab(),
        },
        KeyCode::Char('j') | KeyCode::Down => handle_list_move(app, Move::Down),
        KeyCode::Char('k') | KeyCode::Up => handle_list_move(app, Move::Up),
        KeyCode::PageDown => handle_list_move(app, Move::PageDown),
        KeyCode::PageUp => handle_list_move(app, Move::PageUp),
        KeyCode::Home | KeyCode::Char('g') => handle_list_move(app, Move::First),
        KeyCode::End | KeyCode::Char('G') => handle_list_move(app, Move::Last),
        KeyCode::Char('d') => {
            if matches!(app.tab, Tab::Commands | Tab::Labs) {
                app.cycle_difficulty();
            }
        }
        KeyCode::Char('y') => {
            if app.tab == Tab::Commands {
                copy_selected_example(app);
            }
        }
        KeyCode::Char('s') => {
            if app.tab == Tab::Practice {
                app.show_solution = !app.show_solution;
            }
        }
        KeyCode::Char(' ') => toggle_selection(app),
        KeyCode::Enter => {
            if app.tab == Tab::Practice {
                app.input_mode = InputMode::Answer;
                app.answer_input.reset();
            } else {
                app.toggle_focus();
            }
        }
        KeyCode::Tab | KeyCode::BackTab => {
            if app.tab != Tab::Dashboard {
                app.toggle_focus();
            }
        }
        _ => {}
    }

    false
}

fn handle_filter_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::None;
            app.filter_input.reset();
        }
        KeyCode::Enter => {
            let query = app.filter_input.content.trim().to_string();
            app.active_filter = if query.is_empty() { None } else { Some(query) };
            app.input_mode = InputMode::None;
            app.command_state.select(Some(0));
            app.lab_state.select(Some(0));
        }
        KeyCode::Backspace => app.filter_input.delete_back(),
        KeyCode::Left => app.filter_input.move_left(),
        KeyCode::Right => app.filter_input.move_right(),
        KeyCode::Home => app.filter_input.move_home(),
        KeyCode::End => app.filter_input.move_end(),
        KeyCode::Char(c) => app.filter_input.insert(c),
        _ => {}
    }
    false
}

fn handle_answer_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::None;
            app.answer_input.reset();
        }
        KeyCode::Enter => {
            submit_answer(app);
            app.input_mode = InputMode::None;
        }
        KeyCode::Backspace => app.answer_input.delete_back(),
        KeyCode::Left => app.answer_input.move_left(),
        KeyCode::Right => app.answer_input.move_right(),
        KeyCode::Home => app.answer_input.move_home(),
        KeyCode::End => app.answer_input.move_end(),
        KeyCode::Char(c) => app.answer_input.insert(c),
        _ => {}
    }
    false
}

fn submit_answer(app: &mut App) {
    let Some(exercise) = app.selected_exercise().cloned() else {
        return;
    };
    // The answer popup is a single line; ';' separates commands.
    let submission = app.answer_input.content.replace(';', "\n");
    match SolutionMatch.validate(&exercise, &submission) {
        Verdict::Correct => {
            app.solved_exercises.insert(exercise.id.clone());
            app.status = Some(format!("Correct! {} solved.", exercise.title));
        }
        Verdict::TryAgain { hint } => {
            app.status = Some(match hint {
                Some(hint) => format!("Not quite. Hint: {hint}"),
                None => "Not quite. Check the tasks and try again.".to_string(),
            });
        }
    }
    app.answer_input.reset();
}

fn handle_palette_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::None;
            app.palette_input.reset();
        }
        KeyCode::Enter => {
            let filtered = filtered_palette(app);
            let action = app
                .palette_state
                .selected()
                .and_then(|index| filtered.get(index))
                .map(|command| command.action);
            app.input_mode = InputMode::None;
            app.palette_input.reset();
            if let Some(action) = action {
                return run_palette_action(app, action);
            }
        }
        KeyCode::Up => {
            let len = filtered_palette(app).len();
            move_list(&mut app.palette_state, len, Move::Up);
        }
        KeyCode::Down => {
            let len = filtered_palette(app).len();
            move_list(&mut app.palette_state, len, Move::Down);
        }
        KeyCode::Backspace => {
            app.palette_input.delete_back();
            app.palette_state.select(Some(0));
        }
        KeyCode::Char(c) => {
            app.palette_input.insert(c);
            app.palette_state.select(Some(0));
        }
        _ => {}
    }
    false
}

fn run_palette_action(app: &mut App, action: PaletteAction) -> bool {
    match action {
        PaletteAction::GoDashboard => app.tab = Tab::Dashboard,
        PaletteAction::GoCommands => app.tab = Tab::Commands,
        PaletteAction::GoCurriculum => app.tab = Tab::Curriculum,
        PaletteAction::GoLabs => app.tab = Tab::Labs,
        PaletteAction::GoPractice => app.tab = Tab::Practice,
        PaletteAction::GoCommunity => app.tab = Tab::Community,
        PaletteAction::ClearFilter => {
            app.active_filter = None;
            app.status = Some("Filter cleared".to_string());
        }
        PaletteAction::CopyExample => copy_selected_example(app),
        PaletteAction::ToggleHelp => app.show_help = !app.show_help,
        PaletteAction::Quit => return true,
    }
    false
}

fn toggle_community_view(app: &mut App) {
    app.community_view = match app.community_view {
        CommunityView::Posts => CommunityView::Members,
        CommunityView::Members => CommunityView::Posts,
    };
    app.community_state.select(Some(0));
}

fn copy_selected_example(app: &mut App) {
    let Some(text) = app
        .selected_command()
        .and_then(|entry| entry.examples.first())
        .map(|example| example.command.clone())
    else {
        app.status = Some("No example to copy".to_string());
        return;
    };

    match arboard::Clipboard::new() {
        Ok(mut clipboard) => match clipboard.set_text(&text) {
            Ok(()) => app.status = Some(format!("Copied: {text}")),
            Err(err) => app.status = Some(format!("Copy failed: {err}")),
        },
        Err(err) => app.status = Some(format!("Clipboard unavailable: {err}")),
    }
}

fn toggle_selection(app: &mut App) {
    match app.tab {
        Tab::Commands => {
            if let Some(key) = app.selected_command().map(App::learned_key) {
                if !app.learned.remove(&key) {
                    app.learned.insert(key);
                }
            }
        }
        Tab::Labs => {
            if let Some(id) = app.selected_lab().map(|lab| lab.id.clone()) {
                if !app.completed_labs.remove(&id) {
                    app.completed_labs.insert(id);
                }
            }
        }
        Tab::Community => {
            if app.community_view == CommunityView::Posts {
                if let Some(id) = app.selected_post().map(|post| post.id.clone()) {
                    if !app.liked_posts.remove(&id) {
                        app.liked_posts.insert(id);
                    }
                }
            }
        }
        _ => {}
    }
}

fn open_palette(app: &mut App) {
    app.input_mode = InputMode::Palette;
    app.palette_input.reset();
    app.palette_state.select(Some(0));
}

fn handle_list_move(app: &mut App, movement: Move) {
    match app.tab {
        Tab::Dashboard => {}
        Tab::Commands => {
            let len = app.filtered_commands().len();
            move_list(&mut app.command_state, len, movement);
        }
        Tab::Curriculum => {
            let len = app.curriculum.len();
            move_list(&mut app.curriculum_state, len, movement);
        }
        Tab::Labs => {
            let len = app.filtered_labs().len();
            move_list(&mut app.lab_state, len, movement);
        }
        Tab::Practice => {
            let len = app.exercises.len();
            move_list(&mut app.exercise_state, len, movement);
            app.show_solution = false;
        }
        Tab::Community => {
            let len = match app.community_view {
                CommunityView::Posts => app.posts.len(),
                CommunityView::Members => app.members.len(),
            };
            move_list(&mut app.community_state, len, movement);
        }
    }
}

fn move_list(state: &mut ListState, len: usize, movement: Move) {
    if len == 0 {
        state.select(None);
        return;
    }
    let current = state.selected().unwrap_or(0).min(len - 1);
    let next = match movement {
        Move::Up => current.saturating_sub(1),
        Move::Down => (current + 1).min(len - 1),
        Move::PageUp => current.saturating_sub(10),
        Move::PageDown => (current + 10).min(len - 1),
        Move::First => 0,
        Move::Last => len - 1,
    };
    state.select(Some(next));
}

fn render_app(frame: &mut Frame, app: &App) {
    let size = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(size);

    let titles = vec![
        "Dashboard",
        "Commands",
        "Curriculum",
        "Labs",
        "Practice",
        "Community",
    ]
    .iter()
    .map(|title| Line::from(Span::styled(*title, Style::default())))
    .collect::<Vec<_>>();

    let tabs = Tabs::new(titles)
        .select(match app.tab {
            Tab::Dashboard => 0,
            Tab::Commands => 1,
            Tab::Curriculum => 2,
            Tab::Labs => 3,
            Tab::Practice => 4,
            Tab::Community => 5,
        })
        .block(Block::default().borders(Borders::ALL).title("tuxlab"))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));

    frame.render_widget(tabs, chunks[0]);

    match app.tab {
        Tab::Dashboard => render_dashboard(frame, chunks[1], app),
        Tab::Commands => render_commands(frame, chunks[1], app),
        Tab::Curriculum => render_curriculum(frame, chunks[1], app),
        Tab::Labs => render_labs(frame, chunks[1], app),
        Tab::Practice => render_practice(frame, chunks[1], app),
        Tab::Community => render_community(frame, chunks[1], app),
    }

    render_guide_bar(frame, chunks[2], app);

    if app.show_help {
        render_help_popup(frame, size, &help_text(app));
    }

    if matches!(app.input_mode, InputMode::Filter) {
        render_input_popup(frame, size, "Filter", &app.filter_input);
    }

    if matches!(app.input_mode, InputMode::Answer) {
        render_input_popup(frame, size, "Answer (separate commands with ;)", &app.answer_input);
    }

    if matches!(app.input_mode, InputMode::Palette) {
        render_palette_popup(frame, size, app);
    }
}

fn render_dashboard(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Summary stats
            Constraint::Min(10),   // Difficulty chart
            Constraint::Length(9), // Today's drills
        ])
        .split(area);

    let summary_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(chunks[0]);

    let s1 = Paragraph::new(format!("\n{}", app.entries.len()))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Commands"))
        .style(Style::default().fg(Color::Cyan));
    let s2 = Paragraph::new(format!("\n{}", app.curriculum.len()))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Phases"))
        .style(Style::default().fg(Color::Cyan));
    let s3 = Paragraph::new(format!("\n{}", app.labs.len()))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Labs"))
        .style(Style::default().fg(Color::Cyan));
    let s4 = Paragraph::new(format!("\n{}", app.learned.len()))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Learned"))
        .style(Style::default().fg(if app.learned.is_empty() {
            Color::DarkGray
        } else {
            Color::Green
        }));

    frame.render_widget(s1, summary_chunks[0]);
    frame.render_widget(s2, summary_chunks[1]);
    frame.render_widget(s3, summary_chunks[2]);
    frame.render_widget(s4, summary_chunks[3]);

    let counts = difficulty_counts(&app.entries);
    let bars_data: Vec<(&str, u64)> = counts
        .iter()
        .map(|(level, count)| (level.label(), *count as u64))
        .collect();

    let barchart = BarChart::default()
        .block(
            Block::default()
                .title("Catalog by difficulty")
                .borders(Borders::ALL),
        )
        .data(&bars_data)
        .bar_width(14)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Yellow))
        .value_style(Style::default().fg(Color::Black).bg(Color::Yellow));
    frame.render_widget(barchart, chunks[1]);

    let items = drill_items(&app.entries);
    let day = usize::try_from(Utc::now().date_naive().num_days_from_ce()).unwrap_or(0);
    let drills = daily_set(&items, day, 5);
    let drill_rows: Vec<ListItem> = drills
        .iter()
        .map(|drill| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("[{}] ", drill.command),
                    Style::default().fg(Color::Blue),
                ),
                Span::raw(drill.prompt.to_string()),
            ]))
        })
        .collect();
    let drill_list = List::new(drill_rows).block(
        Block::default()
            .title("Today's drills")
            .borders(Borders::ALL),
    );
    frame.render_widget(drill_list, chunks[2]);
}

fn render_commands(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    // Source tabs, "All" first.
    let sources = app.available_sources();
    let source_titles: Vec<Line> = sources.iter().map(|s| Line::from(s.as_str())).collect();
    let selected_index = if app.source_index >= sources.len() {
        0
    } else {
        app.source_index
    };

    let tabs = Tabs::new(source_titles)
        .select(selected_index)
        .block(Block::default().borders(Borders::BOTTOM))
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, chunks[0]);

    let list_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)].as_ref())
        .split(chunks[1]);

    let filtered = app.filtered_commands();
    let items = filtered
        .iter()
        .map(|entry| {
            let marker = if app.learned.contains(&App::learned_key(entry)) {
                "[x]"
            } else {
                "[ ]"
            };
            ListItem::new(format!(
                "{marker} {}  ({})",
                entry.name, entry.difficulty
            ))
        })
        .collect::<Vec<_>>();

    let mut list_title = match (&app.active_filter, app.difficulty_filter()) {
        (Some(filter), Some(level)) => format!("Commands ({filter}, {level})"),
        (Some(filter), None) => format!("Commands ({filter})"),
        (None, Some(level)) => format!("Commands ({level})"),
        (None, None) => "Commands".to_string(),
    };
    if filtered.is_empty() {
        list_title.push_str(" - no matches");
    }

    let list_block = Block::default()
        .borders(Borders::ALL)
        .title(list_title)
        .border_style(if app.focus == Focus::List {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });
    let list = List::new(items)
        .block(list_block)
        .highlight_style(Style::default().bg(Color::DarkGray));
    frame.render_stateful_widget(list, list_chunks[0], &mut app.command_state.clone());

    let detail = match app.selected_command() {
        Some(entry) => command_detail_lines(app, entry),
        None => vec![
            Line::from("No commands found."),
            Line::from("Adjust the filter with / or clear it with Esc."),
        ],
    };

    let detail_block = Block::default()
        .borders(Borders::ALL)
        .title("Reference")
        .border_style(if app.focus == Focus::Detail {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });
    let detail_p = Paragraph::new(detail)
        .block(detail_block)
        .wrap(Wrap { trim: true });
    frame.render_widget(detail_p, list_chunks[1]);
}

fn command_detail_lines<'a>(app: &'a App, entry: &'a CommandEntry) -> Vec<Line<'a>> {
    let mut lines = Vec::new();
    lines.push(Line::from(Span::styled(
        entry.name.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(entry.description.clone()));
    lines.push(Line::from(format!(
        "{} | {} | {}",
        entry.category, entry.difficulty, entry.source
    )));
    if !entry.tags.is_empty() {
        let tags: Vec<&str> = entry.tags.iter().map(tl_core::Tag::as_str).collect();
        lines.push(Line::from(format!("Tags: {}", tags.join(", "))));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Syntax",
        Style::default().add_modifier(Modifier::UNDERLINED),
    )));
    lines.push(Line::from(format!("  {}", entry.syntax)));

    if !entry.options.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Options",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )));
        for option in &entry.options {
            lines.push(Line::from(format!(
                "  {}  {}",
                option.flag, option.description
            )));
        }
    }

    if !entry.examples.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Examples",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )));
        for example in &entry.examples {
            let mut spans = vec![Span::styled(
                format!("  $ {}", example.command),
                Style::default().fg(Color::Green),
            )];
            if tl_utils::is_destructive_command(&example.command) {
                spans.push(Span::styled(
                    "  [destructive]",
                    Style::default().fg(Color::Red),
                ));
            }
            lines.push(Line::from(spans));
            if let Some(description) = &example.description {
                lines.push(Line::from(format!("    {description}")));
            }
        }
    }

    if let Some(use_case) = &entry.use_case {
        lines.push(Line::from(""));
        lines.push(Line::from(format!("Use case: {use_case}")));
    }

    if !entry.tips.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Tips",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )));
        for tip in &entry.tips {
            lines.push(Line::from(format!("  - {tip}")));
        }
    }

    if !entry.common_errors.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Common errors",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )));
        for error in &entry.common_errors {
            lines.push(Line::from(format!("  - {error}")));
        }
    }

    let related = related_of(&app.entries, &entry.name);
    if !related.is_empty() {
        let names: Vec<&str> = related.iter().map(|r| r.name.as_str()).collect();
        lines.push(Line::from(""));
        lines.push(Line::from(format!("Related: {}", names.join(", "))));
    }

    lines
}

fn render_curriculum(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)].as_ref())
        .split(area);

    let items = app
        .curriculum
        .iter()
        .map(|phase| ListItem::new(format!("{} {} ({})", phase.icon, phase.title, phase.duration)))
        .collect::<Vec<_>>();
    let list_block = Block::default()
        .borders(Borders::ALL)
        .title("Curriculum")
        .border_style(if app.focus == Focus::List {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });
    let list = List::new(items)
        .block(list_block)
        .highlight_style(Style::default().bg(Color::DarkGray));
    frame.render_stateful_widget(list, chunks[0], &mut app.curriculum_state.clone());

    let detail = match app.selected_phase() {
        Some(phase) => phase_detail_lines(app, phase),
        None => vec![Line::from("No phase selected")],
    };
    let detail_block = Block::default()
        .borders(Borders::ALL)
        .title("Phase")
        .border_style(if app.focus == Focus::Detail {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });
    let detail_p = Paragraph::new(detail)
        .block(detail_block)
        .wrap(Wrap { trim: true });
    frame.render_widget(detail_p, chunks[1]);
}

fn phase_detail_lines<'a>(app: &'a App, phase: &'a Phase) -> Vec<Line<'a>> {
    let mut lines = Vec::new();
    lines.push(Line::from(Span::styled(
        format!("{} ({})", phase.title, phase.duration),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(phase.description.clone()));

    let sections: [(&str, &Vec<String>); 4] = [
        ("Topics", &phase.topics),
        ("Labs", &phase.labs),
        ("Projects", &phase.projects),
        ("Assessments", &phase.assessments),
    ];
    for (title, items) in sections {
        if items.is_empty() {
            continue;
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::UNDERLINED),
        )));
        for item in items {
            lines.push(Line::from(format!("  - {item}")));
        }
    }

    if let Some(workbook) = app
        .workbooks
        .iter()
        .find(|workbook| workbook.phase_id == phase.id)
    {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Practice sets",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )));
        for practice in &workbook.practices {
            lines.push(Line::from(format!(
                "  {} [{}]",
                practice.title, practice.difficulty
            )));
        }
        for project in &workbook.projects {
            lines.push(Line::from(format!(
                "  Project: {} - {}",
                project.title, project.expected_outcome
            )));
        }
    }

    lines
}

fn render_labs(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)].as_ref())
        .split(area);

    let filtered = app.filtered_labs();
    let items = filtered
        .iter()
        .map(|lab| {
            let marker = if app.completed_labs.contains(&lab.id) {
                "[x]"
            } else {
                "[ ]"
            };
            ListItem::new(format!("{marker} {} ({})", lab.title, lab.difficulty))
        })
        .collect::<Vec<_>>();

    let mut title = match app.difficulty_filter() {
        Some(level) => format!("Labs ({level})"),
        None => "Labs".to_string(),
    };
    if filtered.is_empty() {
        title.push_str(" - no matches");
    }
    let list_block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(if app.focus == Focus::List {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });
    let list = List::new(items)
        .block(list_block)
        .highlight_style(Style::default().bg(Color::DarkGray));
    frame.render_stateful_widget(list, chunks[0], &mut app.lab_state.clone());

    let detail = match app.selected_lab() {
        Some(lab) => {
            let mut lines = Vec::new();
            lines.push(Line::from(Span::styled(
                lab.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(lab.description.clone()));
            lines.push(Line::from(format!(
                "{} | {} | {} | popularity {}",
                lab.category, lab.difficulty, lab.duration, lab.popularity
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(format!("Scenario: {}", lab.scenario)));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Objectives",
                Style::default().add_modifier(Modifier::UNDERLINED),
            )));
            for objective in &lab.objectives {
                lines.push(Line::from(format!("  - {objective}")));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(format!("Skills: {}", lab.skills.join(", "))));
            lines
        }
        None => vec![
            Line::from("No labs found."),
            Line::from("Adjust the filter with / or clear it with Esc."),
        ],
    };
    let detail_block = Block::default()
        .borders(Borders::ALL)
        .title("Lab")
        .border_style(if app.focus == Focus::Detail {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });
    let detail_p = Paragraph::new(detail)
        .block(detail_block)
        .wrap(Wrap { trim: true });
    frame.render_widget(detail_p, chunks[1]);
}

fn render_practice(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)].as_ref())
        .split(area);

    let items = app
        .exercises
        .iter()
        .map(|exercise| {
            let marker = if app.solved_exercises.contains(&exercise.id) {
                "[x]"
            } else {
                "[ ]"
            };
            ListItem::new(format!(
                "{marker} {} ({})",
                exercise.title, exercise.difficulty
            ))
        })
        .collect::<Vec<_>>();
    let list_block = Block::default()
        .borders(Borders::ALL)
        .title("Exercises")
        .border_style(if app.focus == Focus::List {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });
    let list = List::new(items)
        .block(list_block)
        .highlight_style(Style::default().bg(Color::DarkGray));
    frame.render_stateful_widget(list, chunks[0], &mut app.exercise_state.clone());

    let detail = match app.selected_exercise() {
        Some(exercise) => {
            let mut lines = Vec::new();
            lines.push(Line::from(Span::styled(
                exercise.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(format!(
                "{} | {}",
                exercise.category, exercise.difficulty
            )));
            lines.push(Line::from(exercise.description.clone()));
            lines.push(Line::from(""));
            lines.push(Line::from(format!("Objective: {}", exercise.objective)));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Tasks",
                Style::default().add_modifier(Modifier::UNDERLINED),
            )));
            for task in &exercise.tasks {
                lines.push(Line::from(format!("  - {task}")));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Hints",
                Style::default().add_modifier(Modifier::UNDERLINED),
            )));
            for hint in &exercise.hints {
                lines.push(Line::from(format!("  - {hint}")));
            }
            if app.show_solution {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Sample solution",
                    Style::default().add_modifier(Modifier::UNDERLINED),
                )));
                for line in exercise.solution.lines() {
                    lines.push(Line::from(Span::styled(
                        format!("  {line}"),
                        Style::default().fg(Color::Green),
                    )));
                }
            } else {
                lines.push(Line::from(""));
                lines.push(Line::from("Press Enter to answer, s to reveal the solution."));
            }
            lines
        }
        None => vec![Line::from("No exercise selected")],
    };
    let detail_block = Block::default()
        .borders(Borders::ALL)
        .title("Exercise")
        .border_style(if app.focus == Focus::Detail {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });
    let detail_p = Paragraph::new(detail)
        .block(detail_block)
        .wrap(Wrap { trim: true });
    frame.render_widget(detail_p, chunks[1]);
}

fn render_community(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let view_titles = vec![Line::from("Posts"), Line::from("Members")];
    let tabs = Tabs::new(view_titles)
        .select(match app.community_view {
            CommunityView::Posts => 0,
            CommunityView::Members => 1,
        })
        .block(Block::default().borders(Borders::BOTTOM))
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, chunks[0]);

    let list_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)].as_ref())
        .split(chunks[1]);

    let now = Utc::now();
    match app.community_view {
        CommunityView::Posts => {
            let items = app
                .posts
                .iter()
                .map(|post| {
                    let marker = if app.liked_posts.contains(&post.id) {
                        "♥"
                    } else {
                        " "
                    };
                    ListItem::new(format!(
                        "{marker} {} - {}",
                        post.author.name,
                        tl_utils::format_relative(post.posted_at, now)
                    ))
                })
                .collect::<Vec<_>>();
            let list_block = Block::default()
                .borders(Borders::ALL)
                .title("Feed")
                .border_style(if app.focus == Focus::List {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                });
            let list = List::new(items)
                .block(list_block)
                .highlight_style(Style::default().bg(Color::DarkGray));
            frame.render_stateful_widget(list, list_chunks[0], &mut app.community_state.clone());

            let detail = match app.selected_post() {
                Some(post) => {
                    let likes =
                        post.likes + u32::from(app.liked_posts.contains(&post.id));
                    let mut lines = Vec::new();
                    lines.push(Line::from(Span::styled(
                        format!(
                            "{} ({}, {})",
                            post.author.name, post.author.role, post.author.level
                        ),
                        Style::default().add_modifier(Modifier::BOLD),
                    )));
                    lines.push(Line::from(format!(
                        "{} | {likes} likes | {} comments",
                        tl_utils::format_relative(post.posted_at, now),
                        post.comments
                    )));
                    lines.push(Line::from(""));
                    lines.push(Line::from(post.content.clone()));
                    lines.push(Line::from(""));
                    lines.push(Line::from(format!("Tags: {}", post.tags.join(", "))));
                    lines
                }
                None => vec![Line::from("No post selected")],
            };
            let detail_block = Block::default()
                .borders(Borders::ALL)
                .title("Post")
                .border_style(if app.focus == Focus::Detail {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                });
            frame.render_widget(
                Paragraph::new(detail)
                    .block(detail_block)
                    .wrap(Wrap { trim: true }),
                list_chunks[1],
            );
        }
        CommunityView::Members => {
            let items = app
                .members
                .iter()
                .map(|member| {
                    ListItem::new(format!("{} ({})", member.name, member.level))
                })
                .collect::<Vec<_>>();
            let list_block = Block::default()
                .borders(Borders::ALL)
                .title("Top contributors")
                .border_style(if app.focus == Focus::List {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                });
            let list = List::new(items)
                .block(list_block)
                .highlight_style(Style::default().bg(Color::DarkGray));
            frame.render_stateful_widget(list, list_chunks[0], &mut app.community_state.clone());

            let detail = match app.selected_member() {
                Some(member) => {
                    let mut lines = Vec::new();
                    lines.push(Line::from(Span::styled(
                        format!("{} ({})", member.name, member.role),
                        Style::default().add_modifier(Modifier::BOLD),
                    )));
                    lines.push(Line::from(format!(
                        "{} | {} contributions | joined {}",
                        member.level, member.contributions, member.joined
                    )));
                    lines.push(Line::from(""));
                    lines.push(Line::from(format!("Skills: {}", member.skills.join(", "))));
                    if let Some(location) = &member.location {
                        lines.push(Line::from(format!("Location: {location}")));
                    }
                    if let Some(github) = &member.github {
                        lines.push(Line::from(format!("GitHub: {github}")));
                    }
                    lines
                }
                None => vec![Line::from("No member selected")],
            };
            let detail_block = Block::default()
                .borders(Borders::ALL)
                .title("Member")
                .border_style(if app.focus == Focus::Detail {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                });
            frame.render_widget(
                Paragraph::new(detail)
                    .block(detail_block)
                    .wrap(Wrap { trim: true }),
                list_chunks[1],
            );
        }
    }
}

fn render_guide_bar(frame: &mut Frame, area: Rect, app: &App) {
    let content = match &app.status {
        Some(status) => Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Cyan),
        )),
        None => {
            let hints = get_key_hints(app);
            let mut spans = Vec::new();
            for (key, label) in hints {
                spans.push(Span::styled(
                    format!(" {key} "),
                    Style::default().fg(Color::Black).bg(Color::DarkGray),
                ));
                spans.push(Span::raw(format!(" {label}  ")));
            }
            Line::from(spans)
        }
    };
    let bar = Paragraph::new(content).block(Block::default().borders(Borders::ALL));
    frame.render_widget(bar, area);
}

fn get_key_hints(app: &App) -> Vec<(&'static str, &'static str)> {
    match app.tab {
        Tab::Dashboard => vec![
            ("←/→", "tabs"),
            ("p", "palette"),
            ("?", "help"),
            ("q", "quit"),
        ],
        Tab::Commands => vec![
            ("j/k", "move"),
            ("h/l", "source"),
            ("/", "filter"),
            ("d", "difficulty"),
            ("y", "copy"),
            ("space", "learned"),
            ("q", "quit"),
        ],
        Tab::Curriculum => vec![
            ("j/k", "move"),
            ("←/→", "tabs"),
            ("?", "help"),
            ("q", "quit"),
        ],
        Tab::Labs => vec![
            ("j/k", "move"),
            ("/", "filter"),
            ("d", "difficulty"),
            ("space", "done"),
            ("q", "quit"),
        ],
        Tab::Practice => vec![
            ("j/k", "move"),
            ("enter", "answer"),
            ("s", "solution"),
            ("q", "quit"),
        ],
        Tab::Community => vec![
            ("j/k", "move"),
            ("h/l", "posts/members"),
            ("space", "like"),
            ("q", "quit"),
        ],
    }
}

fn help_text(app: &App) -> String {
    let mut text = String::from(
        "tuxlab\n\n\
         Global\n\
         \x20 q quit, ? help, p or : palette\n\
         \x20 Left/Right switch tabs, Tab toggle list/detail\n\
         \x20 j/k move, Ctrl-u/Ctrl-d page, g/G first/last\n\n",
    );
    match app.tab {
        Tab::Commands => text.push_str(
            "Commands\n\
             \x20 h/l cycle source, / filter, Esc clear filter\n\
             \x20 d cycle difficulty filter\n\
             \x20 y copy the first example to the clipboard\n\
             \x20 space toggle learned\n",
        ),
        Tab::Labs => text.push_str(
            "Labs\n\
             \x20 / filter, d cycle difficulty, space toggle completed\n",
        ),
        Tab::Practice => text.push_str(
            "Practice\n\
             \x20 Enter answer the selected exercise (separate commands with ;)\n\
             \x20 s reveal the sample solution\n",
        ),
        Tab::Community => text.push_str(
            "Community\n\
             \x20 h/l switch posts/members, space like a post\n",
        ),
        _ => {}
    }
    text
}

fn render_help_popup(frame: &mut Frame, area: Rect, content: &str) {
    let popup = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup);
    let paragraph = Paragraph::new(content)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup);
}

fn render_input_popup(frame: &mut Frame, area: Rect, title: &str, input: &TextInput) {
    let popup = centered_rect(60, 20, area);
    frame.render_widget(Clear, popup);
    let paragraph = Paragraph::new(input.content.as_str())
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(paragraph, popup);
    let cursor_x = popup.x + 1 + u16::try_from(input.cursor).unwrap_or(0);
    frame.set_cursor(cursor_x.min(popup.x + popup.width.saturating_sub(2)), popup.y + 1);
}

fn render_palette_popup(frame: &mut Frame, area: Rect, app: &App) {
    let popup = centered_rect(50, 50, area);
    frame.render_widget(Clear, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(popup);

    let input = Paragraph::new(app.palette_input.content.as_str())
        .block(Block::default().borders(Borders::ALL).title("Palette"));
    frame.render_widget(input, chunks[0]);

    let items = filtered_palette(app)
        .iter()
        .map(|command| {
            ListItem::new(Line::from(vec![
                Span::styled(command.name, Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!("  {}", command.description)),
            ]))
        })
        .collect::<Vec<_>>();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::DarkGray));
    frame.render_stateful_widget(list, chunks[1], &mut app.palette_state.clone());
}

fn filtered_palette(app: &App) -> Vec<PaletteCommand> {
    let needle = app.palette_input.content.to_lowercase();
    app.palette
        .iter()
        .filter(|command| {
            needle.is_empty()
                || command.name.to_lowercase().contains(&needle)
                || command.description.to_lowercase().contains(&needle)
        })
        .copied()
        .collect()
}

fn build_palette() -> Vec<PaletteCommand> {
    vec![
        PaletteCommand {
            name: "dashboard",
            description: "Go to the dashboard",
            action: PaletteAction::GoDashboard,
        },
        PaletteCommand {
            name: "commands",
            description: "Browse the command catalog",
            action: PaletteAction::GoCommands,
        },
        PaletteCommand {
            name: "curriculum",
            description: "Browse the curriculum phases",
            action: PaletteAction::GoCurriculum,
        },
        PaletteCommand {
            name: "labs",
            description: "Browse the lab scenarios",
            action: PaletteAction::GoLabs,
        },
        PaletteCommand {
            name: "practice",
            description: "Work through guided exercises",
            action: PaletteAction::GoPractice,
        },
        PaletteCommand {
            name: "community",
            description: "Read the community feed",
            action: PaletteAction::GoCommunity,
        },
        PaletteCommand {
            name: "clear filter",
            description: "Clear the active text filter",
            action: PaletteAction::ClearFilter,
        },
        PaletteCommand {
            name: "copy example",
            description: "Copy the selected command's first example to the clipboard",
            action: PaletteAction::CopyExample,
        },
        PaletteCommand {
            name: "help",
            description: "Toggle the help popup",
            action: PaletteAction::ToggleHelp,
        },
        PaletteCommand {
            name: "quit",
            description: "Exit tuxlab",
            action: PaletteAction::Quit,
        },
    ]
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
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
        .split(popup_layout[1])[1]
}

fn restore_terminal(
    mut terminal: Terminal<ratatui::backend::CrosstermBackend<Stdout>>,
) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tl_core::Example;

    fn entry(name: &str, source: &str, difficulty: Difficulty) -> CommandEntry {
        CommandEntry::new(
            name,
            source,
            "File Management",
            difficulty,
            format!("{name} description"),
            format!("{name} [OPTIONS]"),
            vec![Example {
                command: format!("{name} -x"),
                description: None,
            }],
            Vec::new(),
            None,
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            None,
        )
        .unwrap()
    }

    fn app_with_entries(entries: Vec<CommandEntry>) -> App {
        App::new(AppData {
            entries,
            curriculum: Vec::new(),
            workbooks: Vec::new(),
            labs: Vec::new(),
            exercises: Vec::new(),
            posts: Vec::new(),
            members: Vec::new(),
        })
    }

    #[test]
    fn source_cycling_filters_commands() {
        let mut app = app_with_entries(vec![
            entry("ls", "dictionary", Difficulty::Beginner),
            entry("pwd", "phase-guide", Difficulty::Beginner),
        ]);

        assert_eq!(app.available_sources(), ["All", "dictionary", "phase-guide"]);
        assert_eq!(app.filtered_commands().len(), 2);

        app.next_source();
        let filtered = app.filtered_commands();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].source, "dictionary");
    }

    #[test]
    fn difficulty_cycling_wraps_back_to_all() {
        let mut app = app_with_entries(vec![entry("ls", "dictionary", Difficulty::Beginner)]);
        assert_eq!(app.difficulty_filter(), None);
        app.cycle_difficulty();
        assert_eq!(app.difficulty_filter(), Some(Difficulty::Beginner));
        for _ in 0..4 {
            app.cycle_difficulty();
        }
        assert_eq!(app.difficulty_filter(), None);
    }

    #[test]
    fn empty_filter_results_deselect_nothing_but_render_notice() {
        let mut app = app_with_entries(vec![entry("ls", "dictionary", Difficulty::Beginner)]);
        app.active_filter = Some("zzzznotacommand".to_string());
        assert!(app.filtered_commands().is_empty());
        assert!(app.selected_command().is_none());
    }

    #[test]
    fn liking_a_post_is_reversible() {
        let mut app = app_with_entries(Vec::new());
        app.posts = vec![Post {
            id: "post-001".into(),
            author: tl_core::Author {
                name: "Alex Chen".into(),
                avatar: "AC".into(),
                role: "System Administrator".into(),
                level: "Expert".into(),
            },
            content: "Hello".into(),
            posted_at: Utc::now(),
            likes: 3,
            comments: 0,
            tags: Vec::new(),
        }];
        app.tab = Tab::Community;
        app.community_state.select(Some(0));

        toggle_selection(&mut app);
        assert!(app.liked_posts.contains("post-001"));
        toggle_selection(&mut app);
        assert!(!app.liked_posts.contains("post-001"));
    }

    #[test]
    fn answer_submission_marks_solved_exercise() {
        let mut app = app_with_entries(Vec::new());
        app.exercises = vec![Exercise {
            id: "file-nav-1".into(),
            title: "Navigation".into(),
            difficulty: Difficulty::Beginner,
            category: "File System".into(),
            description: "desc".into(),
            objective: "obj".into(),
            tasks: Vec::new(),
            hints: vec!["Use cd".into()],
            solution: "cd /var/log\nls -lah".into(),
            validation: "check".into(),
        }];
        app.tab = Tab::Practice;
        app.exercise_state.select(Some(0));

        app.answer_input = TextInput::from("cd /var/log; ls -lah".to_string());
        submit_answer(&mut app);
        assert!(app.solved_exercises.contains("file-nav-1"));

        app.answer_input = TextInput::from("pwd".to_string());
        submit_answer(&mut app);
        assert_eq!(app.status.as_deref(), Some("Not quite. Hint: Use cd"));
    }

    #[test]
    fn palette_filters_by_name_and_description() {
        let mut app = app_with_entries(Vec::new());
        app.palette_input = TextInput::from("clip".to_string());
        let filtered = filtered_palette(&app);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "copy example");
    }
}
