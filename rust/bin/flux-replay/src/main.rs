//! `flux-replay`: apply a captured action log to a fresh store.
//!
//! Usage:
//!   flux-replay [LOG] [-c <config.toml>] [--strict] [--event <id>] [--compact]
//!               [-- --toast-prefix=<p> --route=<name>=<path> ...]
//!
//! LOG holds one JSON action per line; stdin is read when it is omitted.
//! Store overrides after `--` are layered over the config file.
//! The resulting selector view is printed to stdout as JSON.

use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::sync::Arc;

use agora_flux::model::{AuthenticationMode, LinkGuard, Message, Routes, Toast, User};
use agora_flux::{AppState, Store, StoreConfig, selectors};
use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

/// Replay a JSON-lines action log and print the resulting state.
#[derive(Parser, Debug)]
#[command(name = "flux-replay", about = "Replay a flux action log")]
struct Cli {
    /// Action log, one JSON action per line. Reads stdin when omitted.
    log: Option<PathBuf>,

    /// Store config file (TOML). Missing file means defaults.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Abort on the first line that is not a valid action.
    #[arg(long)]
    strict: bool,

    /// Also list the messages attached to this event.
    #[arg(long = "event")]
    event: Option<String>,

    /// Single-line JSON output.
    #[arg(long)]
    compact: bool,

    /// Store overrides (`--toast-prefix=P`, `--route=NAME=PATH`).
    #[arg(last = true, value_name = "OVERRIDES")]
    overrides: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct View<'a> {
    is_session_loaded: bool,
    is_connected: bool,
    has_router: bool,
    user: Option<&'a User>,
    authentication: Option<AuthenticationMode>,
    is_political_support: bool,
    bookmarked_emails: &'a [String],
    routes: &'a Routes,
    page_title: Option<&'a str>,
    back_link: Option<&'a LinkGuard>,
    top_bar_right_link: Option<&'a LinkGuard>,
    admin_link: Option<&'a LinkGuard>,
    toasts: Vec<&'a Toast>,
    messages: Vec<&'a Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    event_messages: Option<Vec<&'a Message>>,
    is_loading: bool,
    is_updating: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    applied: usize,
    rejected: usize,
    state: View<'a>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            info!("Loading store config from {}", path.display());
            StoreConfig::load(path)?
        }
        None => StoreConfig::default(),
    };
    let config = config.with_args(&cli.overrides)?;
    let store = Store::with_config(config);

    let input: Box<dyn Read> = match &cli.log {
        Some(path) => Box::new(
            std::fs::File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?,
        ),
        None => Box::new(std::io::stdin()),
    };

    let mut applied = 0;
    let mut rejected = 0;
    for (index, line) in BufReader::new(input).lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match store.dispatch_json(line) {
            Ok(_) => applied += 1,
            Err(e) if cli.strict => {
                return Err(anyhow::anyhow!("line {}: {}", index + 1, e));
            }
            Err(e) => {
                warn!("skipping line {}: {}", index + 1, e);
                rejected += 1;
            }
        }
    }
    info!("Replayed {} actions ({} rejected)", applied, rejected);

    let state = store.state();
    let messages = selectors::get_messages(&state);
    let event_messages = cli
        .event
        .as_deref()
        .map(|event| selectors::get_messages_for_event(&state, event));

    let report = Report {
        applied,
        rejected,
        state: view(&state, &messages, event_messages.as_deref()),
    };
    let out = if cli.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{out}");
    Ok(())
}

fn view<'a>(
    state: &'a AppState,
    messages: &'a [Arc<Message>],
    event_messages: Option<&'a [Arc<Message>]>,
) -> View<'a> {
    View {
        is_session_loaded: selectors::get_is_session_loaded(state),
        is_connected: selectors::get_is_connected(state),
        has_router: selectors::get_has_router(state),
        user: selectors::get_user(state),
        authentication: selectors::get_authentication(state),
        is_political_support: selectors::get_is_political_support(state),
        bookmarked_emails: selectors::get_bookmarked_emails(state),
        routes: selectors::get_routes(state),
        page_title: selectors::get_page_title(state),
        back_link: selectors::get_back_link(state),
        top_bar_right_link: selectors::get_top_bar_right_link(state),
        admin_link: selectors::get_admin_link(state),
        toasts: selectors::get_toasts(state),
        messages: messages.iter().map(AsRef::as_ref).collect(),
        event_messages: event_messages.map(|list| list.iter().map(AsRef::as_ref).collect()),
        is_loading: selectors::get_is_loading(state),
        is_updating: selectors::get_is_updating(state),
    }
}

