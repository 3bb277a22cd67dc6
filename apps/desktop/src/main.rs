use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{CounterSession, InMemoryCounter};
use shared::domain::TxState;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod config;
mod console;

use console::Command;

#[derive(Parser, Debug)]
struct Args {
    /// Settings file; defaults to ./counter.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    initial_value: Option<u64>,
    #[arg(long)]
    latency_ms: Option<u64>,
    #[arg(long)]
    reset_delay_ms: Option<u64>,
    /// Semicolon-separated commands run in order, e.g. "set 5; add 3; inc".
    #[arg(long)]
    script: Option<String>,
    /// Print each view update as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(args.config.as_deref())?;
    if let Some(v) = args.initial_value {
        settings.initial_value = v;
    }
    if let Some(v) = args.latency_ms {
        settings.confirmation_latency_ms = v;
    }
    if let Some(v) = args.reset_delay_ms {
        settings.reset_delay_ms = v;
    }
    tracing::debug!(?settings, "settings loaded");

    let counter = InMemoryCounter::new(settings.initial_value)
        .with_confirmation_latency(settings.confirmation_latency());
    let session = CounterSession::new(Arc::new(counter), settings.controller_config());

    let renderer = tokio::spawn(console::render_loop(session.clone(), args.json));
    session.start().await;

    match args.script {
        Some(script) => run_script(&session, &script).await?,
        None => run_interactive(&session).await?,
    }

    renderer.abort();
    Ok(())
}

async fn run_script(session: &CounterSession, script: &str) -> Result<()> {
    for line in script.split(';').filter(|l| !l.trim().is_empty()) {
        match console::parse_command(line).map_err(anyhow::Error::msg)? {
            Command::Run { kind, input } => {
                let outcome = session.run(kind, &input).await;
                if let Some(notice) = console::describe_outcome(kind, &outcome) {
                    println!("{notice}");
                }
            }
            Command::Show => println!("{}", console::render(&session.view())),
            Command::Help => println!("{}", console::HELP),
            Command::Quit => break,
        }
    }

    // Let the final status clear so the whole lifecycle is printed.
    session
        .controller()
        .subscribe()
        .wait_for(|status| status.state() == TxState::Idle)
        .await
        .context("transaction controller dropped")?;
    Ok(())
}

async fn run_interactive(session: &CounterSession) -> Result<()> {
    println!("{}", console::HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        match console::parse_command(&line) {
            Ok(Command::Run { kind, input }) => {
                let handle = session.dispatch(kind, input);
                tokio::spawn(async move {
                    if let Ok(outcome) = handle.await {
                        if let Some(notice) = console::describe_outcome(kind, &outcome) {
                            println!("{notice}");
                        }
                    }
                });
            }
            Ok(Command::Show) => println!("{}", console::render(&session.view())),
            Ok(Command::Help) => println!("{}", console::HELP),
            Ok(Command::Quit) => break,
            Err(message) => println!("{message}"),
        }
    }
    Ok(())
}
