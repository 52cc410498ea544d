use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use std::{error::Error, io};

use stats_client::{StatKey, Stats, StatsClient};
use ventti::{Deck, Outcome, Round, RoundSnapshot};

mod tui_logger;
use tui_logger::TuiLogger;

#[derive(Parser)]
#[command(name = "ventti-tui", about = "Ventti blackjack terminal client")]
struct Cli {
    /// Base URL of the stats server
    #[arg(long, env = "STATS_URL", default_value = "http://127.0.0.1:8790")]
    stats_url: String,

    /// Player name; skips the name-entry screen
    #[arg(long, env = "VENTTI_PLAYER")]
    name: Option<String>,
}

#[derive(PartialEq)]
enum GamePhase {
    NameEntry,
    Table,
}

/// The counter a settled round bumps on the stats server.
fn stat_key_for(outcome: Outcome) -> StatKey {
    match outcome {
        Outcome::Win => StatKey::Wins,
        Outcome::Loss => StatKey::Losses,
        Outcome::Draw => StatKey::Draws,
    }
}

/// Dealer cards as the player may see them: the hole card and every later
/// draw stay masked until the round is over. The engine keeps the real hand;
/// this is a render-side transform only.
fn dealer_card_labels(snapshot: &RoundSnapshot) -> Vec<String> {
    snapshot
        .dealer_hand
        .iter()
        .enumerate()
        .map(|(idx, card)| {
            if idx > 0 && !snapshot.is_terminal {
                "??".to_string()
            } else {
                card.to_display()
            }
        })
        .collect()
}

/// Dealer value as the player may see it: up-card only until the reveal.
fn dealer_value_label(snapshot: &RoundSnapshot) -> u8 {
    if snapshot.is_terminal {
        snapshot.dealer_value()
    } else {
        snapshot.dealer_up_card_value()
    }
}

/// Key legend for the table, with hit dropped once it would be a no-op.
fn play_legend(snapshot: &RoundSnapshot) -> String {
    if snapshot.is_terminal {
        format!("{} Press [N] for the next round", snapshot.message)
    } else if snapshot.deck_remaining == 0 {
        "[S]tand".to_string()
    } else {
        "[H]it or [S]tand".to_string()
    }
}

struct App {
    phase: GamePhase,
    name_input: String,
    player_name: Option<String>,
    round: Option<Round>,
    stats: Option<Stats>,
    status: String,
    logs: Vec<String>,
    log_buffer: Arc<Mutex<Vec<String>>>, // Shared buffer for capturing log:: messages
    log_visible: bool,
    client: StatsClient,
    stats_task: Option<tokio::task::JoinHandle<Result<Stats, String>>>,
    pending_reports: VecDeque<StatKey>, // Outcomes waiting for a free stats slot
}

impl App {
    fn new(client: StatsClient, log_buffer: Arc<Mutex<Vec<String>>>) -> App {
        App {
            phase: GamePhase::NameEntry,
            name_input: String::new(),
            player_name: None,
            round: None,
            stats: None,
            status: "Type your name, press [Enter] to sit down".to_string(),
            logs: vec!["Welcome to Ventti!".to_string()],
            log_buffer,
            log_visible: true,
            client,
            stats_task: None,
            pending_reports: VecDeque::new(),
        }
    }

    fn sync_logs(&mut self) {
        // Pull any new log messages from the shared buffer
        let messages: Vec<String> = if let Ok(mut buffer) = self.log_buffer.lock() {
            buffer.drain(..).collect()
        } else {
            Vec::new()
        };

        for msg in messages {
            self.add_log(msg);
        }
    }

    fn add_log(&mut self, message: String) {
        self.logs.push(message);
        // Keep only last 20 log entries
        if self.logs.len() > 20 {
            self.logs.remove(0);
        }
    }

    /// At most one stats call runs at a time; round outcomes queue behind it.
    fn stats_busy(&self) -> bool {
        self.stats_task.is_some() || !self.pending_reports.is_empty()
    }

    fn confirm_name(&mut self, name: String) {
        self.add_log(format!("Playing as {name}"));
        let client = self.client.clone();
        let lookup = name.clone();
        self.stats_task = Some(tokio::task::spawn(async move {
            client
                .fetch_or_create(&lookup)
                .await
                .map_err(|e| e.to_string())
        }));
        self.player_name = Some(name);
        self.phase = GamePhase::Table;
        self.deal_round();
    }

    fn deal_round(&mut self) {
        match Round::deal(Deck::shuffled()) {
            Ok(round) => {
                let snapshot = round.snapshot();
                self.add_log(format!(
                    "New round: you have {}, dealer shows {}",
                    snapshot.player_value(),
                    snapshot.dealer_up_card_value()
                ));
                self.status = play_legend(&snapshot);
                self.round = Some(round);
            }
            Err(e) => self.add_log(format!("Deal failed: {e}")),
        }
    }

    fn new_round(&mut self) {
        let in_progress = self
            .round
            .as_ref()
            .map(|r| !r.is_terminal())
            .unwrap_or(false);
        if in_progress {
            self.status = "Finish this round first".to_string();
            return;
        }
        if self.stats_busy() {
            self.status = "Stats update in flight, one moment...".to_string();
            return;
        }
        self.deal_round();
    }

    fn player_hit(&mut self) {
        let Some(round) = &mut self.round else {
            return;
        };
        if round.is_terminal() {
            return;
        }
        if round.deck_remaining() == 0 {
            self.add_log("Deck is empty, stand to finish".to_string());
            return;
        }

        let snapshot = round.hit();
        self.add_log(format!("You hit, have {}", snapshot.player_value()));
        self.status = play_legend(&snapshot);
        self.settle(&snapshot);
    }

    fn player_stand(&mut self) {
        let Some(round) = &mut self.round else {
            return;
        };
        if round.is_terminal() {
            return;
        }

        let snapshot = round.stand();
        self.add_log(format!(
            "You stand on {}, dealer reveals {}",
            snapshot.player_value(),
            snapshot.dealer_value()
        ));
        self.status = play_legend(&snapshot);
        self.settle(&snapshot);
    }

    /// Forward the outcome of a freshly settled round to the stats queue.
    /// `take_report` yields each outcome once, so repeated no-op presses
    /// after the round is over cannot double count.
    fn settle(&mut self, snapshot: &RoundSnapshot) {
        let Some(outcome) = self.round.as_mut().and_then(|r| r.take_report()) else {
            return;
        };
        self.add_log(snapshot.message.clone());
        if self.player_name.is_some() {
            self.pending_reports.push_back(stat_key_for(outcome));
        }
    }

    fn reset_stats(&mut self) {
        if self.stats_busy() {
            self.status = "Stats update in flight, one moment...".to_string();
            return;
        }
        let Some(name) = self.player_name.clone() else {
            return;
        };
        self.add_log("Resetting stats...".to_string());
        let client = self.client.clone();
        self.stats_task = Some(tokio::task::spawn(async move {
            client.delete(&name).await.map_err(|e| e.to_string())?;
            client.create(&name).await.map_err(|e| e.to_string())
        }));
    }

    /// Reap the in-flight stats call if it finished, then start the next
    /// queued one. Failures are surfaced in the log pane and never touch
    /// round state.
    async fn pump_stats(&mut self) {
        if let Some(task) = &self.stats_task {
            if task.is_finished() {
                let task = self.stats_task.take().unwrap();
                match task.await {
                    Ok(Ok(stats)) => {
                        self.stats = Some(stats);
                        self.add_log(format!(
                            "Stats: {} wins, {} losses, {} draws",
                            stats.wins, stats.losses, stats.draws
                        ));
                    }
                    Ok(Err(e)) => self.add_log(format!("Stats error: {e}")),
                    Err(e) => self.add_log(format!("Stats task error: {e}")),
                }
            }
        }

        if self.stats_task.is_none() {
            if let (Some(key), Some(name)) =
                (self.pending_reports.pop_front(), self.player_name.clone())
            {
                let client = self.client.clone();
                self.stats_task = Some(tokio::task::spawn(async move {
                    client
                        .increment(&name, key)
                        .await
                        .map_err(|e| e.to_string())
                }));
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize custom logger
    let (logger, log_buffer) = TuiLogger::new();
    log::set_boxed_logger(Box::new(logger))
        .map(|()| log::set_max_level(log::LevelFilter::Info))
        .expect("Failed to initialize logger");

    let client = StatsClient::new(&cli.stats_url)?;

    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // create app and run it
    let mut app = App::new(client, log_buffer);
    if let Some(name) = cli.name.filter(|n| !n.is_empty()) {
        app.confirm_name(name);
    }
    let res = run_app(&mut terminal, app).await;

    // restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}")
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<(), Box<dyn Error>>
where
    B::Error: 'static,
{
    loop {
        app.sync_logs();
        app.pump_stats().await;

        terminal.draw(|f| ui(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                match app.phase {
                    GamePhase::NameEntry => match key.code {
                        KeyCode::Enter => {
                            if !app.name_input.is_empty() {
                                let name = app.name_input.clone();
                                app.confirm_name(name);
                            }
                        }
                        KeyCode::Backspace => {
                            app.name_input.pop();
                        }
                        KeyCode::Esc => return Ok(()),
                        KeyCode::Char(c) => app.name_input.push(c),
                        _ => {}
                    },
                    GamePhase::Table => match key.code {
                        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Up => app.player_hit(),
                        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => {
                            app.player_stand()
                        }
                        KeyCode::Char('n') | KeyCode::Char('N') => app.new_round(),
                        KeyCode::Char('r') | KeyCode::Char('R') => app.reset_stats(),
                        KeyCode::Char('l') | KeyCode::Char('L') => {
                            app.log_visible = !app.log_visible;
                        }
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                        _ => {}
                    },
                }
            }
        }
    }
}

fn card_span(label: String) -> Span<'static> {
    let color = match label.chars().last() {
        Some('♥') => Color::Red,
        Some('♦') => Color::from_u32(0xFF_A5_00), // Orange
        Some('♣') => Color::Magenta,              // Purple
        Some('♠') => Color::Black,
        _ => Color::White,
    };
    Span::styled(format!("{label} "), Style::default().fg(color).bg(Color::Gray))
}

fn ui(f: &mut Frame, app: &App) {
    // Main layout: title, body, status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3), // Title bar
                Constraint::Min(10),   // Main game area
                Constraint::Length(3), // Status bar
            ]
            .as_ref(),
        )
        .split(f.area());

    let title_text = if let Some(name) = &app.player_name {
        format!("Ventti - playing as {name}")
    } else {
        "Ventti - Blackjack".to_string()
    };
    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, main_chunks[0]);

    match app.phase {
        GamePhase::NameEntry => render_name_entry(f, app, main_chunks[1]),
        GamePhase::Table => render_table(f, app, main_chunks[1]),
    }

    // Status bar at bottom
    let status_text = if app.phase == GamePhase::NameEntry {
        format!("{} > {}", app.status, app.name_input)
    } else {
        app.status.clone()
    };
    let status_bar = Paragraph::new(status_text.as_str())
        .style(Style::default().fg(Color::White))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status_bar, main_chunks[2]);
}

fn render_name_entry(f: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let block_height = area.height.saturating_sub(2);
    let padding_top = block_height.saturating_sub(3) / 2;

    let mut lines: Vec<Line> = vec![Line::from(""); padding_top as usize];
    lines.push(Line::from("Who is playing tonight?"));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("> "),
        Span::styled(
            app.name_input.as_str(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled("_", Style::default().fg(Color::DarkGray)),
    ]));

    let entry = Paragraph::new(lines)
        .block(Block::default().title(" Welcome ").borders(Borders::ALL))
        .alignment(Alignment::Center);
    f.render_widget(entry, area);
}

fn render_table(f: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    // Split body: left (table) and right (logs if visible)
    let (table_container, log_area) = if app.log_visible {
        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)].as_ref())
            .split(area);
        (horizontal[0], Some(horizontal[1]))
    } else {
        (area, None)
    };

    // Dealer on top, player below, stats strip at the bottom
    let table_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage(40),
                Constraint::Percentage(40),
                Constraint::Min(4),
            ]
            .as_ref(),
        )
        .split(table_container);

    let snapshot = app.round.as_ref().map(|r| r.snapshot());

    // Dealer hand, hole card masked until the reveal
    let (dealer_cards, dealer_title) = if let Some(ref snapshot) = snapshot {
        let cards: Vec<Span> = dealer_card_labels(snapshot)
            .into_iter()
            .map(card_span)
            .collect();
        let title = format!(" Dealer Hand ({}) ", dealer_value_label(snapshot));
        (cards, title)
    } else {
        (vec![Span::raw("No round started")], " Dealer Hand ".to_string())
    };

    let dealer_block_height = table_area[0].height.saturating_sub(2);
    let mut dealer_lines: Vec<Line> = vec![Line::from(""); (dealer_block_height / 2) as usize];
    dealer_lines.push(Line::from(dealer_cards));

    let dealer_block = Paragraph::new(dealer_lines)
        .block(Block::default().title(dealer_title).borders(Borders::ALL))
        .alignment(Alignment::Center);
    f.render_widget(dealer_block, table_area[0]);

    // Player hand, border colored by outcome once the round is over
    let (player_cards, player_title, border_style) = if let Some(ref snapshot) = snapshot {
        let cards: Vec<Span> = snapshot
            .player_hand
            .iter()
            .map(|card| card_span(card.to_display()))
            .collect();
        let title = format!(" Your Hand ({}) ", snapshot.player_value());
        let border_style = match snapshot.outcome {
            None => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            Some(Outcome::Win) => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            Some(Outcome::Loss) => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            Some(Outcome::Draw) => Style::default().fg(Color::DarkGray),
        };
        (cards, title, border_style)
    } else {
        (
            vec![Span::raw("Press [N] to deal")],
            " Your Hand ".to_string(),
            Style::default(),
        )
    };

    let player_block_height = table_area[1].height.saturating_sub(2);
    let mut player_lines: Vec<Line> = vec![Line::from(""); (player_block_height / 2) as usize];
    player_lines.push(Line::from(player_cards));

    let player_block = Paragraph::new(player_lines)
        .block(
            Block::default()
                .title(player_title)
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .alignment(Alignment::Center);
    f.render_widget(player_block, table_area[1]);

    // Stats strip
    let stats_lines: Vec<Line> = match app.stats {
        Some(stats) => vec![
            Line::from(format!(
                "Wins {}   Losses {}   Draws {}",
                stats.wins, stats.losses, stats.draws
            )),
            Line::from(format!(
                "Games {}   Win rate {:.1}%",
                stats.games_played(),
                stats.win_rate()
            )),
        ],
        None => vec![Line::from("Loading stats...")],
    };
    let stats_block = Paragraph::new(stats_lines)
        .block(
            Block::default()
                .title(" Stats  [N]ew round  [R]eset  [L]og  [Q]uit ")
                .borders(Borders::ALL),
        )
        .alignment(Alignment::Center);
    f.render_widget(stats_block, table_area[2]);

    // Logs/Info box - only render if visible
    if let Some(log_area) = log_area {
        let log_frame_height = log_area.height.saturating_sub(2) as usize;
        let log_start_idx = app.logs.len().saturating_sub(log_frame_height);

        let log_lines: Vec<Line> = app
            .logs
            .iter()
            .skip(log_start_idx)
            .map(|log| {
                Line::from(vec![
                    Span::styled("• ", Style::default().fg(Color::DarkGray)),
                    Span::raw(log.clone()),
                ])
            })
            .collect();

        let logs_widget = Paragraph::new(log_lines)
            .block(
                Block::default()
                    .title(" Game Log ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Green)),
            )
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true });
        f.render_widget(logs_widget, log_area);
    }
}
