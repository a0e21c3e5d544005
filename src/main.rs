//! Rythm'it discover client
//!
//! Usage:
//!   rythmit                              - Open the discover window
//!   rythmit search [text] [--tag T]...   - Run one search and print the results
//!   rythmit tags                         - List available tags
//!   rythmit help                         - Show help

use std::env;

use iced::{window, Size};
use rythmit_lib::app::Discover;
use rythmit_lib::backend::{BackendClient, SearchAttempt};
use rythmit_lib::config::Config;
use rythmit_lib::search::{render, DisplayRecord, TagSelection, REJECTION_WARNING};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> iced::Result {
    // Use try_init so a second call never panics
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring config file: {}", e);
            Config::default()
        }
    };

    let backend = match BackendClient::from_config(&config) {
        Ok(backend) => backend,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(());
        }
    };

    let args: Vec<String> = env::args().skip(1).collect();
    match args.first() {
        Some(cmd) => handle_cli_command(cmd, &args[1..], backend),
        None => start_window(backend),
    }
}

fn handle_cli_command(cmd: &str, rest: &[String], backend: BackendClient) -> iced::Result {
    match cmd {
        "search" | "s" => {
            let (text, selection) = parse_search_args(rest);
            run_blocking(search_once(&backend, &text, &selection));
            Ok(())
        }
        "tags" => {
            run_blocking(async {
                match backend.list_tags().await {
                    Ok(tags) if tags.is_empty() => println!("No tags available"),
                    Ok(tags) => {
                        for tag in tags {
                            match tag.kind {
                                Some(kind) => println!("{} ({})", tag.name, kind),
                                None => println!("{}", tag.name),
                            }
                        }
                    }
                    Err(e) => eprintln!("Error: {}", e),
                }
            });
            Ok(())
        }
        "help" | "--help" | "-h" => {
            println!("Rythm'it - discover threads by text and tags\n");
            println!("Usage: rythmit [command]\n");
            println!("Commands:");
            println!("  (none)                        Open the discover window");
            println!("  search [text] [--tag T]...    Search threads and print results");
            println!("  tags                          List available tags");
            println!("  help                          Show this help message");
            println!("\nBackend URL: {} (override with RYTHMIT_API_URL)", backend.base_url());
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", cmd);
            eprintln!("Run 'rythmit help' for usage");
            Ok(())
        }
    }
}

/// Split `search` arguments into free text and `--tag` values.
fn parse_search_args(args: &[String]) -> (String, TagSelection) {
    let mut words = Vec::new();
    let mut selection = TagSelection::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--tag" | "-t" => {
                if let Some(tag) = iter.next() {
                    selection.add(tag);
                }
            }
            _ => words.push(arg.as_str()),
        }
    }

    (words.join(" "), selection)
}

async fn search_once(backend: &BackendClient, text: &str, selection: &TagSelection) {
    let pending = match backend.prepare_search(text, selection) {
        SearchAttempt::Rejected => {
            eprintln!("{}", REJECTION_WARNING);
            return;
        }
        SearchAttempt::Pending(pending) => pending,
    };

    let query = pending.query().clone();
    let outcome = pending.send().await;
    println!("Results for {}\n", query.headline());

    for record in render(&outcome, &query, chrono::Utc::now()) {
        match record {
            DisplayRecord::Thread(card) => {
                println!("[{}] {} - {}", card.initials, card.author, card.time_ago);
                println!("  {}", card.title);
                if !card.preview.is_empty() {
                    println!("  {}", card.preview);
                }
                if !card.tags.is_empty() {
                    println!("  tags: {}", card.tags.join(", "));
                }
                println!(
                    "  likes: {}  comments: {}  {}\n",
                    card.likes,
                    card.comments,
                    card.link.unwrap_or_default()
                );
            }
            DisplayRecord::NoResults { headline, suggestions, .. } => {
                println!("No thread matches {}.", headline);
                println!("Suggestions:");
                for suggestion in suggestions {
                    println!("  - {}", suggestion);
                }
            }
            DisplayRecord::Error { message, detail, .. } => {
                eprintln!("{} ({})", message, detail);
            }
        }
    }
}

fn run_blocking<F: std::future::Future<Output = ()>>(future: F) {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(future),
        Err(e) => eprintln!("Error: failed to start tokio runtime: {}", e),
    }
}

fn start_window(backend: BackendClient) -> iced::Result {
    tracing::info!("Opening discover window against {}", backend.base_url());

    iced::application(Discover::title, Discover::update, Discover::view)
        .subscription(Discover::subscription)
        .theme(Discover::theme)
        .window(window::Settings {
            size: Size::new(820.0, 640.0),
            position: window::Position::Centered,
            resizable: true,
            ..Default::default()
        })
        .antialiasing(true)
        .run_with(move || Discover::boot(backend))
}
