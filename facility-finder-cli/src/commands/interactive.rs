//! Search-as-you-type on stdin.
//!
//! Every plain line replaces the search text, as if typed into the search
//! box. Lines starting with `:` are commands:
//!
//! | input           | action                                      |
//! |-----------------|---------------------------------------------|
//! | `:go`           | commit (Enter)                              |
//! | `:down`, `:up`  | move the highlight                          |
//! | `:pick N`       | select the N-th shown result                |
//! | `:esc`          | hide the list, keep the text                |
//! | `:focus`        | re-show the last results                    |
//! | `:search [cat]` | search facilities around the current center |
//! | `:help`, `:q`   | help, quit                                  |

use std::time::Duration;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;

use facility_finder::category::CategoryKey;
use facility_finder::geocode::CandidateSource;
use facility_finder::service::FacilityFinder;
use facility_finder::session::{SearchSession, SessionEvent, SessionState};

use super::common::{categories_or_all, format_candidate, parse_category, resolve_center};
use super::search::print_result;
use crate::error::CliError;
use crate::runner::CliRunner;

#[derive(Debug, Args)]
pub struct InteractiveArgs {
    /// Initial latitude (default: map.default_lat)
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Initial longitude (default: map.default_lon)
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

/// One parsed line of input.
#[derive(Debug, PartialEq)]
enum Input {
    Text(String),
    Commit,
    Down,
    Up,
    Pick(usize),
    Escape,
    Focus,
    Search(Vec<CategoryKey>),
    Help,
    Quit,
    Invalid(String),
}

fn parse_line(line: &str) -> Input {
    let Some(command) = line.trim().strip_prefix(':') else {
        return Input::Text(line.to_string());
    };

    let mut parts = command.split_whitespace();
    match parts.next().unwrap_or("") {
        "go" => Input::Commit,
        "down" => Input::Down,
        "up" => Input::Up,
        "esc" => Input::Escape,
        "focus" => Input::Focus,
        "help" => Input::Help,
        "q" | "quit" => Input::Quit,
        "pick" => match parts.next().map(str::parse::<usize>) {
            Some(Ok(n)) if n >= 1 => Input::Pick(n),
            _ => Input::Invalid("usage: :pick N (N starts at 1)".to_string()),
        },
        "search" => {
            let keys: Result<Vec<_>, _> = parts.map(parse_category).collect();
            match keys {
                Ok(keys) => Input::Search(keys),
                Err(e) => Input::Invalid(e),
            }
        }
        other => Input::Invalid(format!("unknown command ':{}' (try :help)", other)),
    }
}

fn print_help() {
    println!("Type a place name to search. Commands:");
    println!("  :go            select the highlighted result, or the best match");
    println!("  :down / :up    move the highlight");
    println!("  :pick N        select result N");
    println!("  :esc           hide the list");
    println!("  :focus         show the last results again");
    println!("  :search [cat]  find facilities around the current center");
    println!("  :q             quit");
}

fn print_list<S: CandidateSource>(session: &SearchSession<S>) {
    let snapshot = session.snapshot();
    if snapshot.results.is_empty() {
        println!("  (no matches)");
        return;
    }
    for (i, candidate) in snapshot.results.iter().enumerate() {
        println!(
            "{}",
            format_candidate(i + 1, candidate, snapshot.highlighted == Some(i))
        );
    }
}

fn print_event<S: CandidateSource>(session: &SearchSession<S>, event: &SessionEvent) {
    match event {
        SessionEvent::Show(_) => print_list(session),
        SessionEvent::Hide => println!("  (list hidden)"),
        SessionEvent::Recenter(candidate) => {
            println!("Map centered on {} ({})", candidate.display_name, candidate.coordinate)
        }
    }
}

/// Print events until no query is pending or `limit` passes.
async fn drain_pending<S: CandidateSource>(
    session: &SearchSession<S>,
    events: &mut UnboundedReceiver<SessionEvent>,
    limit: Duration,
) {
    let deadline = tokio::time::Instant::now() + limit;
    while matches!(
        session.state(),
        SessionState::Debouncing | SessionState::Querying
    ) {
        match tokio::time::timeout_at(deadline, events.recv()).await {
            Ok(Some(event)) => print_event(session, &event),
            _ => break,
        }
    }
    while let Ok(event) = events.try_recv() {
        print_event(session, &event);
    }
}

/// Run the interactive command.
pub async fn run(runner: &CliRunner, args: InteractiveArgs) -> Result<(), CliError> {
    runner.log_startup("interactive");
    let finder = runner.create_finder()?;
    let center = resolve_center(&finder, args.lat, args.lon)?;
    let (session, mut events) = finder.start_session(center);

    let config = runner.config();
    let settle_limit = Duration::from_millis(config.search.debounce_ms)
        + Duration::from_millis(config.geocode.transport_timeout_ms) * 2;

    println!("Map centered on {}", center);
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_line(&line) {
                    Input::Quit => break,
                    input => handle(&finder, &session, input).await?,
                }
            }
            Some(event) = events.recv() => print_event(&session, &event),
        }
    }

    drain_pending(&session, &mut events, settle_limit).await;
    Ok(())
}

async fn handle<S: CandidateSource>(
    finder: &FacilityFinder,
    session: &SearchSession<S>,
    input: Input,
) -> Result<(), CliError> {
    match input {
        Input::Text(text) => session.on_text_changed(&text),
        Input::Commit => {
            if session.on_commit().await.is_none() {
                println!("  (nothing to select)");
            }
        }
        Input::Down => {
            if session.highlight_next().is_some() {
                print_list(session);
            }
        }
        Input::Up => {
            if session.highlight_previous().is_some() {
                print_list(session);
            }
        }
        Input::Pick(n) => {
            if session.select_index(n - 1).is_none() {
                println!("  (no result {} on screen)", n);
            }
        }
        Input::Escape => session.on_escape(),
        Input::Focus => session.on_focus(),
        Input::Search(keys) => {
            let categories = categories_or_all(&keys);
            match finder.search(session.center(), None, &categories).await {
                Ok(result) => print_result(&result, finder.language()),
                Err(e) => println!("  {}", e),
            }
        }
        Input::Help => print_help(),
        Input::Invalid(msg) => println!("  {}", msg),
        Input::Quit => {}
    }
    Ok(())
}
