mod app;
mod config;
mod feed;
mod network;
mod source;
mod ui;
mod utils;

use std::{
    fs::File,
    io,
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Tabs},
};
use simplelog::{Config as LogConfig, LevelFilter, WriteLogger};

use crate::app::{App, Tab};
use crate::config::Config;
use crate::network::aggregator::HostStats;
use crate::source::start_record_source;
use crate::ui::*;

fn draw_ui(f: &mut Frame, app: &mut App) {
    // Clear the entire frame first to prevent artifacts
    f.render_widget(ratatui::widgets::Clear, f.size());

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(f.size());

    // Tabs
    let titles = vec![
        Tab::Packets.to_string(),
        Tab::RemoteHosts.to_string(),
        Tab::Sockets.to_string(),
    ];

    let selected_index = match app.current_tab {
        Tab::Packets => 0,
        Tab::RemoteHosts => 1,
        Tab::Sockets => 2,
    };

    let tabs = Tabs::new(titles)
        .block(Block::default().title("Network Telemetry").borders(Borders::ALL))
        .select(selected_index)
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, main_chunks[0]);

    // Clear the content area to prevent artifacts when switching tabs
    f.render_widget(ratatui::widgets::Clear, main_chunks[1]);

    match app.current_tab {
        Tab::Packets => draw_packets(f, app, main_chunks[1]),
        Tab::RemoteHosts => draw_hosts(f, app, main_chunks[1]),
        Tab::Sockets => draw_sockets(f, app, main_chunks[1]),
    }

    if app.show_detail {
        if let Some(ext) = app.detail_packet() {
            draw_packet_detail(f, &ext, f.size());
        }
    }

    if app.show_help {
        draw_help_overlay(f, f.size());
    }
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| draw_ui(f, &mut app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // If help is showing, any key closes it
                if app.show_help {
                    app.show_help = false;
                } else {
                    match key.code {
                        KeyCode::Char('q') => {
                            app.running.store(false, Ordering::Relaxed);
                            return Ok(());
                        }
                        KeyCode::Left => {
                            app.current_tab = app.current_tab.prev();
                        }
                        KeyCode::Right => {
                            app.current_tab = app.current_tab.next();
                        }
                        KeyCode::Char('h') => {
                            app.show_help = true;
                        }
                        // Sort remote hosts with 's' (when on that tab)
                        KeyCode::Char('s') => {
                            if app.current_tab == Tab::RemoteHosts {
                                app.host_sort = app.host_sort.next();
                            }
                        }
                        // Drop accumulated host aggregates with 'c'
                        KeyCode::Char('c') => {
                            if app.current_tab == Tab::RemoteHosts {
                                if let Ok(mut stats) = app.host_stats.lock() {
                                    stats.reset();
                                }
                                app.host_offset = 0;
                            }
                        }
                        KeyCode::Enter => {
                            if app.current_tab == Tab::Packets {
                                app.show_detail = !app.show_detail;
                            }
                        }
                        KeyCode::Esc => {
                            app.show_detail = false;
                        }
                        KeyCode::Up => match app.current_tab {
                            Tab::Packets => app.scroll_packets_by(-1),
                            Tab::RemoteHosts => {
                                app.host_offset = app.host_offset.saturating_sub(1)
                            }
                            Tab::Sockets => {
                                app.socket_offset = app.socket_offset.saturating_sub(1)
                            }
                        },
                        KeyCode::Down => match app.current_tab {
                            Tab::Packets => app.scroll_packets_by(1),
                            Tab::RemoteHosts => app.host_offset += 1,
                            Tab::Sockets => app.socket_offset += 1,
                        },
                        KeyCode::PageUp => {
                            if app.current_tab == Tab::Packets {
                                app.scroll_packets_by(-(app.packet_viewport as isize));
                            }
                        }
                        KeyCode::PageDown => {
                            if app.current_tab == Tab::Packets {
                                app.scroll_packets_by(app.packet_viewport as isize);
                            }
                        }
                        KeyCode::Home => {
                            if app.current_tab == Tab::Packets {
                                app.scroll_packets_to_top();
                            }
                        }
                        KeyCode::End => {
                            if app.current_tab == Tab::Packets {
                                app.scroll_packets_to_bottom();
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.update();
            last_tick = Instant::now();
        }
    }
}

fn usage() -> ! {
    eprintln!("Usage: netfeed <records.ndjson | -> [config.json]");
    eprintln!("  Reads newline-delimited JSON records from a file, or stdin for '-'.");
    std::process::exit(2);
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let records_path = match args.get(1) {
        Some(path) => path.clone(),
        None => usage(),
    };
    let config = match args.get(2) {
        Some(path) => Config::load(Path::new(path))?,
        None => Config::default(),
    };

    // Log to a file; writing to the terminal would corrupt the TUI.
    let log_file = File::create(&config.log_file)
        .with_context(|| format!("failed to create log file {}", config.log_file))?;
    WriteLogger::init(LevelFilter::Info, LogConfig::default(), log_file)?;
    log::info!("netfeed starting, record source: {}", records_path);

    let running = Arc::new(AtomicBool::new(true));
    let host_stats = Arc::new(Mutex::new(HostStats::new(config.local_ranges())));
    let (tx, rx) = crossbeam_channel::unbounded();

    // Producer thread: parses records, updates the shared aggregation and
    // hands records to the UI thread.
    start_record_source(records_path, tx, host_stats.clone(), running.clone())?;

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(&config, rx, host_stats, running.clone());
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    running.store(false, Ordering::Relaxed);

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}
