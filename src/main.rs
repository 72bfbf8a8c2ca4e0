mod app;
mod cli;
mod config;
mod datasources;
mod db;
mod error;
mod logic;
mod models;
mod ui;

use anyhow::Context;
use app::{App, Screen};
use chrono::Utc;
use clap::Parser;
use cli::{Cli, Commands, ExportFormat};
use config::Config;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use db::Database;
use logic::calculations::{status_counts, weekly_activity, Agenda};
use logic::calendar::{ics_file_name, CalendarEvent};
use logic::WeatherSyncService;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use ui::screens::{AgendaScreen, DashboardScreen, PlantsScreen};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let tui = cli.command.is_none();
    init_logging(cli.verbose, tui, cli.data_dir.as_ref())?;

    if let Some(Commands::Init) = cli.command {
        Config::setup_interactive(cli.config.as_ref()).context("Interactive setup failed")?;
        return Ok(());
    }

    let config = if Config::exists(cli.config.as_ref()) {
        Config::load(cli.config.as_ref()).context("Failed to load configuration")?
    } else {
        Config::setup_interactive(cli.config.as_ref())
            .context("Interactive setup failed")?
            .0
    };

    let db = Database::open(cli.data_dir.as_ref()).context("Failed to open database")?;
    let weather = WeatherSyncService::new(&config);
    let mut app = App::new(config, db).context("Failed to load garden")?;

    match cli.command {
        None => run_tui(app, weather).await,
        Some(command) => run_command(command, &mut app, &weather).await,
    }
}

fn init_logging(verbose: u8, tui: bool, data_dir: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Log lines would tear the alternate screen, so the TUI logs to a file.
    if tui {
        let path = Config::log_path(data_dir).context("Failed to resolve log path")?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
    Ok(())
}

async fn run_command(
    command: Commands,
    app: &mut App,
    weather: &WeatherSyncService,
) -> anyhow::Result<()> {
    let now = Utc::now();

    match command {
        // Setup runs before the garden is opened.
        Commands::Init => {}
        Commands::Check => {
            println!("Gardener:   {}", app.profile.name);
            println!("Location:   {}", app.config.location.city);
            println!("Database:   {}", app.db.path().display());
            println!("Plants:     {}", app.profile.plants.len());
            for key in app.db.profile_backups()? {
                println!("Backup:     {} (unreadable garden set aside)", key);
            }
            let rules: Vec<&str> = app
                .evaluator
                .list_rules()
                .into_iter()
                .map(|(_, name)| name)
                .collect();
            println!("Rules:      {}", rules.join(", "));
            let ok = weather.check_connection().await;
            println!(
                "Weather:    {} ({})",
                weather.provider_name(),
                if ok { "OK" } else { "OFFLINE" }
            );
            if !ok {
                anyhow::bail!("weather provider is unreachable");
            }
        }
        Commands::List => {
            app.update_weather(weather.refresh().await);
            if app.profile.plants.is_empty() {
                println!("No plants yet. Try `plantops add pothos`.");
            }
            for (plant, schedule) in app.schedules(now) {
                println!(
                    "{:<8}  {:<20} {:<12} {}",
                    short_id(&plant.id),
                    plant.common_name,
                    schedule.status_label(),
                    schedule.reason
                );
            }
        }
        Commands::Add { name, manual } => {
            let added = if manual.is_requested() {
                app.add_custom_plant(manual.into_draft(name.clone()), now)
            } else {
                app.add_plant(&name, now)
            };
            let (plant, unlocked) = added.with_context(|| {
                format!("Could not add '{}' (use --manual to enter it by hand)", name)
            })?;
            println!(
                "Added {} ({}) [{}]",
                plant.common_name,
                plant.scientific_name,
                short_id(&plant.id)
            );
            print_achievements(&unlocked);
        }
        Commands::Water { id } => {
            let plant_id = resolve(app, &id)?;
            let unlocked = app.water_plant(&plant_id, now)?;
            if let Some(plant) = app.profile.plant(&plant_id) {
                println!("Watered {}.", plant.common_name);
            }
            print_achievements(&unlocked);
        }
        Commands::Remove { id } => {
            let plant_id = resolve(app, &id)?;
            let removed = app.remove_plant(&plant_id, now)?;
            println!("Removed {}.", removed.common_name);
        }
        Commands::Schedule => {
            app.update_weather(weather.refresh().await);
            let agenda = Agenda::build(&app.profile.plants, app.weather.as_ref(), now);
            if agenda.is_empty() {
                println!("Nothing to water.");
            }
            for (title, entries) in [
                ("Today", &agenda.today),
                ("This week", &agenda.this_week),
                ("Later", &agenda.later),
            ] {
                if entries.is_empty() {
                    continue;
                }
                println!("{}:", title);
                for entry in entries {
                    println!(
                        "  {}  {:<20} {}",
                        entry.schedule.next_date.with_timezone(&chrono::Local).format("%a %d %b"),
                        entry.plant.common_name,
                        entry.schedule.reason
                    );
                }
            }
            let counts = status_counts(&app.profile.plants, app.weather.as_ref(), now);
            println!("On time: {}  Late: {}", counts.on_time, counts.late);
        }
        Commands::Alerts => {
            let snapshot = weather.refresh().await;
            if snapshot.is_none() {
                println!("Weather unavailable - no alerts can be evaluated.");
            }
            app.update_weather(snapshot);
            for alert in &app.alerts {
                let name = app
                    .profile
                    .plant(&alert.plant_id)
                    .map(|p| p.common_name.as_str())
                    .unwrap_or("?");
                println!("{} {:<20} {}", alert.level.symbol(), name, alert.message);
            }
            if let Some(ref n) = app.notification {
                if app.config.notifications.enabled {
                    println!();
                    println!("{}: {}", n.title, n.body);
                }
            }
        }
        Commands::Export { id, format, out } => {
            app.update_weather(weather.refresh().await);
            let plant_id = resolve(app, &id)?;
            let (plant, schedule) = app
                .schedules(now)
                .into_iter()
                .find(|(p, _)| p.id == plant_id)
                .context("plant disappeared")?;
            let event = CalendarEvent::for_plant(plant, schedule.next_date);

            match format {
                ExportFormat::Ics => {
                    let path = out.unwrap_or_else(|| PathBuf::from(ics_file_name(plant)));
                    std::fs::write(&path, event.to_ics(now))
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Wrote {}", path.display());
                }
                ExportFormat::Google => println!("{}", event.google_url()?),
                ExportFormat::Outlook => println!("{}", event.outlook_url()?),
            }
        }
    }

    Ok(())
}

fn resolve(app: &App, key: &str) -> anyhow::Result<String> {
    app.find_plant(key)
        .map(|p| p.id.clone())
        .with_context(|| format!("No plant matches '{}'", key))
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn print_achievements(unlocked: &[&models::Achievement]) {
    for a in unlocked {
        println!("{} Achievement unlocked: {} - {}", a.icon, a.title, a.description);
    }
}

async fn run_tui(mut app: App, weather: WeatherSyncService) -> anyhow::Result<()> {
    app.update_weather(weather.refresh().await);
    if app.status_message.is_none() {
        let status = if app.weather.is_some() {
            format!("Weather: {} OK", weather.provider_name())
        } else {
            format!("Weather: {} unavailable", weather.provider_name())
        };
        app.set_status(&status);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &weather).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    weather: &WeatherSyncService,
) -> anyhow::Result<()> {
    loop {
        let now = Utc::now();

        terminal.draw(|f| {
            let area = f.area();
            let schedules = app.schedules(now);

            match app.screen {
                Screen::Dashboard => {
                    let screen = DashboardScreen::new(
                        &app.profile,
                        app.weather.as_ref(),
                        &app.alerts,
                        &schedules,
                    )
                    .with_notification(app.notification.as_ref())
                    .with_status(app.status_message.as_deref());
                    f.render_widget(screen, area);
                }
                Screen::Plants => {
                    let suggestions = app.catalog().suggestions();
                    let input = app
                        .plants_state
                        .adding
                        .then_some(app.plants_state.input_buffer.as_str());
                    let screen = PlantsScreen::new(&schedules, &app.alerts)
                        .with_selection(app.plants_state.selected_index)
                        .adding(input, &suggestions);
                    f.render_widget(screen, area);
                }
                Screen::Agenda => {
                    let agenda = Agenda::build(&app.profile.plants, app.weather.as_ref(), now);
                    let status = status_counts(&app.profile.plants, app.weather.as_ref(), now);
                    let activity = weekly_activity(&app.profile.plants, now);
                    f.render_widget(AgendaScreen::new(&agenda, status, &activity), area);
                }
            }
        })?;

        // Handle input with timeout for async operations
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let typing = app.plants_state.adding;
                match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.quit();
                    }
                    KeyCode::Char('q') if !typing => {
                        app.quit();
                    }
                    KeyCode::Esc if !typing => {
                        app.switch_screen(Screen::Dashboard);
                    }
                    KeyCode::Char(c) if !typing => {
                        if let Some(screen) = Screen::from_key(c) {
                            app.switch_screen(screen);
                        } else {
                            handle_screen_input(app, key.code);
                        }
                    }
                    _ => {
                        handle_screen_input(app, key.code);
                    }
                }
            }
        }

        if app.needs_refresh {
            app.needs_refresh = false;
            app.refreshing = true;
            let snapshot = weather.refresh().await;
            if snapshot.is_some() {
                app.set_status("Weather refreshed");
            } else {
                app.set_status("Weather refresh failed - using standard schedules");
            }
            app.update_weather(snapshot);
            app.refreshing = false;
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_screen_input(app: &mut App, code: KeyCode) {
    match app.screen {
        Screen::Dashboard | Screen::Agenda => {
            if let KeyCode::Char('r') = code {
                app.request_refresh();
            }
        }
        Screen::Plants => handle_plants_input(app, code),
    }
}

fn handle_plants_input(app: &mut App, code: KeyCode) {
    let now = Utc::now();

    if app.plants_state.adding {
        match code {
            KeyCode::Esc => app.plants_state.cancel_adding(),
            KeyCode::Enter => {
                let query = app.plants_state.finish_adding();
                match app.add_plant(&query, now) {
                    Ok((plant, unlocked)) => {
                        app.plants_state.selected_index = app.profile.plants.len() - 1;
                        let mut status = format!("Added {}", plant.common_name);
                        for a in unlocked {
                            status.push_str(&format!(" | {} {}", a.icon, a.title));
                        }
                        app.set_status(&status);
                    }
                    Err(e) => app.set_status(&format!(
                        "Add failed: {} - use `plantops add --manual` for other plants",
                        e
                    )),
                }
            }
            KeyCode::Backspace => {
                app.plants_state.input_buffer.pop();
            }
            KeyCode::Char(c) => app.plants_state.input_buffer.push(c),
            _ => {}
        }
        return;
    }

    let count = app.profile.plants.len();
    let selected = app.selected_plant().map(|p| p.id.clone());
    match code {
        KeyCode::Up => app.plants_state.prev(),
        KeyCode::Down => app.plants_state.next(count),
        KeyCode::Char('a') => app.plants_state.start_adding(),
        KeyCode::Char('w') => {
            if let Some(id) = selected {
                match app.water_plant(&id, now) {
                    Ok(unlocked) => {
                        let mut status = "Watered".to_string();
                        for a in unlocked {
                            status.push_str(&format!(" | {} {}", a.icon, a.title));
                        }
                        app.set_status(&status);
                    }
                    Err(e) => app.set_status(&format!("Water failed: {}", e)),
                }
            }
        }
        KeyCode::Char('d') => {
            if let Some(id) = selected {
                match app.remove_plant(&id, now) {
                    Ok(p) => app.set_status(&format!("Removed {}", p.common_name)),
                    Err(e) => app.set_status(&format!("Remove failed: {}", e)),
                }
            }
        }
        KeyCode::Char('e') => {
            if let Some(id) = selected {
                match export_ics(app, &id) {
                    Ok(path) => app.set_status(&format!("Saved {}", path.display())),
                    Err(e) => app.set_status(&format!("Export failed: {}", e)),
                }
            }
        }
        _ => {}
    }
}

/// Write the selected plant's next watering next to the database.
fn export_ics(app: &App, plant_id: &str) -> anyhow::Result<PathBuf> {
    let now = Utc::now();
    let (plant, schedule) = app
        .schedules(now)
        .into_iter()
        .find(|(p, _)| p.id == plant_id)
        .context("plant not found")?;

    let dir = app
        .db
        .path()
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    let path = dir.join(ics_file_name(plant));
    let event = CalendarEvent::for_plant(plant, schedule.next_date);
    std::fs::write(&path, event.to_ics(now))?;
    tracing::info!(path = %path.display(), "Exported calendar reminder");
    Ok(path)
}
