use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph, Wrap};

use pokedex_terminal::provider::spawn_provider;
use pokedex_terminal::state::{
    AppState, Delta, FetchPhase, ProviderCommand, ResultView, apply_delta,
};
use pokedex_terminal::views::{PokemonCard, StatLine};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.input_active {
            match key.code {
                KeyCode::Esc => self.state.input_active = false,
                KeyCode::Enter => {
                    self.state.input_active = false;
                    self.submit_lookup();
                }
                KeyCode::Backspace => {
                    self.state.input.pop();
                }
                KeyCode::Char(c) => self.state.input.push(c),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') | KeyCode::Char('i') => self.state.input_active = true,
            KeyCode::Enter | KeyCode::Char('s') => self.submit_lookup(),
            KeyCode::Char('r') => self.send(ProviderCommand::RandomLookup),
            KeyCode::Char('c') => self.submit_compare(),
            KeyCode::Char('t') => self.send(ProviderCommand::BuildTeam),
            KeyCode::Char('1') => self.send(ProviderCommand::ShowRaw),
            KeyCode::Char('2') => self.send(ProviderCommand::ShowStats),
            KeyCode::Char('3') => self.send(ProviderCommand::ShowMoves),
            KeyCode::Char('4') => self.send(ProviderCommand::ShowTypes),
            KeyCode::Char('x') => self.send(ProviderCommand::ClearCurrent),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn submit_lookup(&mut self) {
        let identifier = self.state.input.clone();
        self.state.input.clear();
        self.send(ProviderCommand::Lookup { identifier });
    }

    fn submit_compare(&mut self) {
        let parts: Vec<String> = self
            .state
            .input
            .split([',', ' '])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();

        if parts.len() != 2 {
            self.state.phase = FetchPhase::Failure;
            self.state.view = ResultView::Error(
                "Please enter both Pokemon names to compare! (type them as \"name1, name2\")"
                    .to_string(),
            );
            return;
        }

        self.state.input.clear();
        let mut parts = parts.into_iter();
        let first = parts.next().unwrap_or_default();
        let second = parts.next().unwrap_or_default();
        self.send(ProviderCommand::Compare { first, second });
    }

    fn send(&mut self, cmd: ProviderCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Provider unavailable");
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_provider(tx, cmd_rx);

    let mut app = App::new(cmd_tx);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_input_bar(frame, chunks[1], &app.state);
    render_results(frame, chunks[2], &app.state);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[3]);

    let footer = Paragraph::new(footer_text(&app.state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[4]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    format!("POKEDEX TERMINAL | {}", phase_label(state.phase))
}

fn phase_label(phase: FetchPhase) -> &'static str {
    match phase {
        FetchPhase::Idle => "IDLE",
        FetchPhase::Loading => "LOADING",
        FetchPhase::Success => "OK",
        FetchPhase::Failure => "ERROR",
    }
}

fn footer_text(state: &AppState) -> String {
    if state.input_active {
        "Type a name or id | Enter Search | Esc Cancel".to_string()
    } else {
        "/ Input | Enter/s Search | r Random | c Compare | t Team | 1 Raw | 2 Stats | 3 Moves | 4 Types | x Clear | ? Help | q Quit"
            .to_string()
    }
}

fn render_input_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let style = if state.input_active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let cursor = if state.input_active { "_" } else { "" };
    let input = Paragraph::new(format!("{}{cursor}", state.input))
        .style(style)
        .block(Block::default().title("Pokemon name or id").borders(Borders::ALL));
    frame.render_widget(input, area);
}

fn render_results(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Results").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    if state.phase == FetchPhase::Loading {
        let loading = Paragraph::new("Fetching data from the Pokedex...")
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(loading, inner);
        return;
    }

    match &state.view {
        ResultView::Empty => {
            let hint = Paragraph::new(
                "Search for a Pokemon to get started.\nTry: pikachu, charizard, 25",
            )
            .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(hint, inner);
        }
        ResultView::Card(card) => render_card(frame, inner, card),
        ResultView::Raw(panel) => {
            let raw = Paragraph::new(panel.pretty.as_str())
                .block(
                    Block::default()
                        .title(format!("JSON Data for {}", panel.name))
                        .borders(Borders::TOP),
                )
                .wrap(Wrap { trim: false });
            frame.render_widget(raw, inner);
        }
        ResultView::Stats(panel) => {
            let sections = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(1)])
                .split(inner);
            let title = Paragraph::new(format!("{} Stats", panel.name))
                .style(Style::default().add_modifier(Modifier::BOLD));
            frame.render_widget(title, sections[0]);
            frame.render_widget(stat_bar_chart(&panel.lines), sections[1]);
        }
        ResultView::Moves(panel) => {
            let mut lines = vec![format!(
                "{} Moves (First {}, {} known)",
                panel.name, panel.limit, panel.total
            )];
            for name in &panel.shown {
                lines.push(format!("  {name}"));
            }
            if panel.shown.is_empty() {
                lines.push("  (no moves)".to_string());
            }
            frame.render_widget(Paragraph::new(lines.join("\n")), inner);
        }
        ResultView::Types(panel) => {
            let mut spans = vec![Span::styled(
                format!("{} Types: ", panel.name),
                Style::default().add_modifier(Modifier::BOLD),
            )];
            for (idx, name) in panel.types.iter().enumerate() {
                if idx > 0 {
                    spans.push(Span::raw("  "));
                }
                spans.push(Span::styled(
                    format!(" {name} "),
                    Style::default().fg(Color::Black).bg(type_color(name)),
                ));
            }
            frame.render_widget(Paragraph::new(Line::from(spans)), inner);
        }
        ResultView::Comparison(view) => {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(inner);
            render_compare_side(frame, cols[0], &view.left);
            render_compare_side(frame, cols[1], &view.right);
        }
        ResultView::Team(team) => {
            let mut lines = vec!["Your Random Pokemon Team".to_string(), String::new()];
            for member in team {
                lines.push(format!(
                    "#{:<5} {:<16} {}",
                    member.id, member.name, member.primary_type
                ));
            }
            frame.render_widget(Paragraph::new(lines.join("\n")), inner);
        }
        ResultView::Error(message) => render_error(frame, inner, message),
    }
}

fn render_card(frame: &mut Frame, area: Rect, card: &PokemonCard) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(28), Constraint::Percentage(55)])
        .split(area);

    let mut lines = vec![
        format!("#{} {}", card.id, card.name),
        String::new(),
        format!("Height: {}", card.height),
        format!("Weight: {}", card.weight),
        format!("Types:  {}", card.types.join(", ")),
    ];
    if let Some(url) = &card.sprite_url {
        lines.push(format!("Sprite: {url}"));
    }
    let info = Paragraph::new(lines.join("\n")).wrap(Wrap { trim: false });
    frame.render_widget(info, columns[0]);

    frame.render_widget(stat_bar_chart(&card.stats), columns[1]);
}

fn render_compare_side(frame: &mut Frame, area: Rect, card: &PokemonCard) {
    let mut lines = vec![
        format!("{} (#{})", card.name, card.id),
        format!("Height: {}", card.height),
        format!("Weight: {}", card.weight),
        format!("Types:  {}", card.types.join(", ")),
        String::new(),
    ];
    for stat in &card.stats {
        lines.push(format!("{:<16} {:>4}", stat.label, stat.value));
    }
    let side = Paragraph::new(lines.join("\n"))
        .block(Block::default().borders(Borders::LEFT));
    frame.render_widget(side, area);
}

fn render_error(frame: &mut Frame, area: Rect, message: &str) {
    let text = format!(
        "Oops!\n\n{message}\n\nTry searching for: pikachu, charizard, or any Pokemon name!"
    );
    let error = Paragraph::new(text)
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: false });
    frame.render_widget(error, area);
}

fn stat_bar_chart(lines: &[StatLine]) -> BarChart<'static> {
    let bars: Vec<Bar> = lines
        .iter()
        .map(|line| {
            Bar::default()
                .value(u64::from(line.value))
                .label(Line::from(line.label.clone()))
                .style(Style::default().fg(Color::Cyan))
        })
        .collect();

    BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .max(255)
}

fn type_color(name: &str) -> Color {
    match name {
        "fire" => Color::Red,
        "water" => Color::Blue,
        "grass" | "bug" => Color::Green,
        "electric" => Color::Yellow,
        "psychic" | "fairy" => Color::Magenta,
        "ice" => Color::Cyan,
        "ground" | "rock" | "fighting" => Color::LightRed,
        "poison" | "ghost" => Color::LightMagenta,
        "dragon" | "flying" => Color::LightBlue,
        "dark" | "steel" => Color::Gray,
        _ => Color::White,
    }
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No activity yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Pokedex Terminal - Help",
        "",
        "Input:",
        "  / or i       Focus the input bar",
        "  Enter        Search the typed name or id",
        "  Esc          Leave the input bar",
        "",
        "Actions:",
        "  s / Enter    Search",
        "  r            Random Pokemon",
        "  c            Compare (input: \"name1, name2\")",
        "  t            Build a random team",
        "  1/2/3/4      Raw / Stats / Moves / Types",
        "  x            Clear current Pokemon",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
