// src/bin/polar_ble_receiver.rs
//! Stdin bridge for the heart rate receiver.
//!
//! Each input line is an action, optionally followed by a tab and the
//! payload:
//!
//! ```text
//! ACTION_GATT_CONNECTED
//! ACTION_HR_DATA_AVAILABLE	72;810;795
//! ```
//!
//! Bare action names are qualified with the configured namespace. The latest
//! reading is printed once input ends.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use polar_ble_receiver::{ReceiverConfig, ReceiverHost};

#[derive(Parser, Debug)]
#[command(name = "polar-ble-receiver", about = "Feed BLE heart rate events from stdin")]
struct Args {
    /// JSON receiver config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Payload token delimiter
    #[arg(long)]
    delimiter: Option<char>,

    /// Reject payloads with more than three tokens
    #[arg(long)]
    strict: bool,

    /// Print the final reading as JSON
    #[arg(long)]
    json: bool,
}

/// Split a line into a qualified action and optional payload.
fn parse_line<'a>(line: &'a str, prefix: &str) -> Option<(String, Option<&'a str>)> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return None;
    }

    let (action, payload) = match line.split_once('\t') {
        Some((action, payload)) => (action.trim(), Some(payload)),
        None => (line.trim(), None),
    };

    let action = if action.contains('.') {
        action.to_string()
    } else {
        format!("{prefix}{action}")
    };
    Some((action, payload))
}

fn build_config(args: &Args) -> anyhow::Result<ReceiverConfig> {
    let mut config = match &args.config {
        Some(path) => ReceiverConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ReceiverConfig::default(),
    };
    if let Some(delimiter) = args.delimiter {
        config.delimiter = delimiter;
    }
    if args.strict {
        config.strict_token_count = true;
    }
    config.validate()?;
    Ok(config)
}

/// Feed every line of `reader` to the host's receiver. Returns the number of
/// rejected events; processing continues past them.
async fn run<R: AsyncBufRead + Unpin>(reader: R, host: &ReceiverHost) -> anyhow::Result<usize> {
    let receiver = host.receiver();
    let mut lines = reader.lines();
    let mut failures = 0usize;

    while let Some(line) = lines.next_line().await.context("reading input")? {
        let Some((action, payload)) = parse_line(&line, &host.config().action_prefix) else {
            continue;
        };
        if receiver.handle(&action, payload).is_err() {
            // Already logged by the handler.
            failures += 1;
        }
    }

    if failures > 0 {
        log::warn!("{} event(s) rejected", failures);
    }
    Ok(failures)
}

/// Final line printed once input ends.
fn render_latest(host: &ReceiverHost, json: bool) -> anyhow::Result<String> {
    Ok(match host.cache().snapshot() {
        Some(snapshot) if json => serde_json::to_string(&snapshot)?,
        Some(snapshot) => snapshot.reading.to_string(),
        None => "no reading".to_string(),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = build_config(&args)?;
    let host = ReceiverHost::new(config);

    run(BufReader::new(tokio::io::stdin()), &host).await?;
    println!("{}", render_latest(&host, args.json)?);

    Ok(())
}
