//! Command-line driver.
//!
//! Runs the shell headless: each line on stdin is translated into an
//! [`Event`], the runtime drains the resulting timers and requests, and the
//! rendered screen is printed.
//!
//! # Commands
//!
//! - `type <text>`: Replace the search input
//! - `down` / `up` / `enter` / `esc`: Keys in the search input
//! - `pick <n>`: Click dropdown item `n`
//! - `go <path>`: Navigate programmatically
//! - `link <href>`: Click an in-app link
//! - `back` / `forward`: History traversal
//! - `tab <web|images|videos|news>`: Switch vertical
//! - `more`: Report the infinite-scroll sentinel as visible
//! - `open <n>`: Open result `n`
//! - `set <key> <value>`: Change a setting
//! - `forget <query>` / `clear`: Edit recent searches
//! - `quit`

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use search_shell::api::{HttpSearchApi, SearchApi};
use search_shell::app::{PageState, ResultsContent, ResultsPage};
use search_shell::domain::{SafeSearch, Vertical};
use search_shell::observability::init_tracing;
use search_shell::router::{History, LinkClick, MemoryHistory};
use search_shell::runtime::Runtime;
use search_shell::store::{ColorScheme, Settings, Store};
use search_shell::suggest::{Key, SuggestEvent};
use search_shell::ui::render_to_string;
use search_shell::{open_store, App, Config, Event, ShellError};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Headless multi-vertical search shell
#[derive(Parser, Debug)]
#[command(name = "search-shell")]
#[command(version)]
#[command(about = "Headless multi-vertical search shell driven from stdin", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides the config file)
    #[arg(long)]
    api: Option<String>,

    /// Directory for persisted state and logs
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep state in memory only
    #[arg(long)]
    memory: bool,

    /// Path to open at start
    #[arg(default_value = "/")]
    path: String,
}

/// One parsed stdin line.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Dispatch(Event),
    Back,
    Forward,
    More,
    Set(String, String),
    Quit,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("search-shell: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config);

    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("search-shell: {e}");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli, config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "shell exited with error");
            eprintln!("search-shell: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config, ShellError> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(api) = &cli.api {
        config.api_base_url.clone_from(api);
    }
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    Ok(config)
}

async fn run(cli: Cli, config: Config) -> Result<(), ShellError> {
    let api: Arc<dyn SearchApi> =
        Arc::new(HttpSearchApi::new(&config.api_base_url, config.request_timeout())?);
    let store = if cli.memory {
        Store::in_memory()
    } else {
        open_store(&config)
    };

    tracing::info!(api = %config.api_base_url, path = %cli.path, "starting shell");

    let mut app = App::new(config, store, MemoryHistory::new(cli.path));
    let mut runtime = Runtime::new(api);

    runtime.dispatch(&mut app, &Event::Start)?;
    runtime.run_until_idle(&mut app).await;
    print_screen(&app, &runtime, 0);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = parse_command(&line) else {
            if !line.trim().is_empty() {
                println!("? unknown command: {}", line.trim());
            }
            continue;
        };

        let opened_before = runtime.opened().len();
        let event = match command {
            Command::Quit => break,
            Command::Dispatch(event) => Some(event),
            Command::Back => app
                .router_mut()
                .history_mut()
                .back()
                .then_some(Event::PopState),
            Command::Forward => app
                .router_mut()
                .history_mut()
                .forward()
                .then_some(Event::PopState),
            Command::More => current_sentinel(&app).map(Event::SentinelVisible),
            Command::Set(key, value) => {
                let mut settings = app.store().get().settings;
                if let Err(e) = apply_setting(&mut settings, &key, &value) {
                    println!("! {e}");
                    continue;
                }
                Some(Event::UpdateSettings(settings))
            }
        };

        if let Some(event) = event {
            if let Err(e) = runtime.dispatch(&mut app, &event) {
                println!("! {e}");
            }
        }
        runtime.run_until_idle(&mut app).await;
        print_screen(&app, &runtime, opened_before);
    }

    Ok(())
}

fn print_screen<H: History>(app: &App<H>, runtime: &Runtime, opened_before: usize) {
    for (url, new_tab) in &runtime.opened()[opened_before..] {
        let target = if *new_tab { "new tab" } else { "same tab" };
        println!("-> open {url} ({target})");
    }
    println!("{}", render_to_string(&app.compute_viewmodel()));
}

fn current_sentinel<H: History>(app: &App<H>) -> Option<search_shell::paginate::SentinelId> {
    match app.page() {
        PageState::Results(ResultsPage {
            content: ResultsContent::Grid { scroll, .. },
            ..
        }) => Some(scroll.sentinel()),
        _ => None,
    }
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let (name, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    let suggest = |event| Some(Command::Dispatch(Event::Suggest(event)));
    match name {
        "type" => suggest(SuggestEvent::InputChanged(rest.to_string())),
        "down" => suggest(SuggestEvent::Key(Key::ArrowDown)),
        "up" => suggest(SuggestEvent::Key(Key::ArrowUp)),
        "enter" => suggest(SuggestEvent::Key(Key::Enter)),
        "esc" => suggest(SuggestEvent::Key(Key::Escape)),
        "pick" => {
            let index = rest.parse::<usize>().ok()?.checked_sub(1)?;
            suggest(SuggestEvent::PointerDown(index))
        }
        "go" if !rest.is_empty() => Some(Command::Dispatch(Event::Navigate(rest.to_string()))),
        "link" if !rest.is_empty() => Some(Command::Dispatch(Event::LinkClicked(
            LinkClick::in_app(rest),
        ))),
        "back" => Some(Command::Back),
        "forward" => Some(Command::Forward),
        "tab" => {
            let vertical = Vertical::ALL.into_iter().find(|v| {
                v.route().trim_start_matches('/') == rest || (rest == "web" && *v == Vertical::Web)
            })?;
            Some(Command::Dispatch(Event::SelectVertical(vertical)))
        }
        "more" => Some(Command::More),
        "open" => {
            let index = rest.parse::<usize>().ok()?.checked_sub(1)?;
            Some(Command::Dispatch(Event::OpenResult(index)))
        }
        "set" => {
            let (key, value) = rest.split_once(' ')?;
            Some(Command::Set(key.to_string(), value.trim().to_string()))
        }
        "forget" if !rest.is_empty() => Some(Command::Dispatch(Event::RemoveRecent(rest.to_string()))),
        "clear" => Some(Command::Dispatch(Event::ClearRecent)),
        "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

fn apply_setting(settings: &mut Settings, key: &str, value: &str) -> Result<(), ShellError> {
    let invalid = || ShellError::Config(format!("invalid value for {key}: {value}"));
    let flag = || match value {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => Err(invalid()),
    };

    match key {
        "safe_search" => settings.safe_search = SafeSearch::parse(value).ok_or_else(invalid)?,
        "results_per_page" => settings.results_per_page = value.parse().map_err(|_| invalid())?,
        "region" => settings.region = value.to_string(),
        "language" => settings.language = value.to_string(),
        "theme" => {
            settings.theme = match value {
                "system" => ColorScheme::System,
                "light" => ColorScheme::Light,
                "dark" => ColorScheme::Dark,
                _ => return Err(invalid()),
            }
        }
        "open_in_new_tab" => settings.open_in_new_tab = flag()?,
        "show_thumbnails" => settings.show_thumbnails = flag()?,
        "infinite_scroll" => settings.infinite_scroll = flag()?,
        _ => return Err(ShellError::Config(format!("unknown setting: {key}"))),
    }
    Ok(())
}
