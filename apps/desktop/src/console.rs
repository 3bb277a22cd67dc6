//! Line-oriented front end: command parsing and status rendering.

use client_core::{AlertTone, CounterSession, SessionView, Submission, ValueDisplay};
use shared::protocol::OperationKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run { kind: OperationKind, input: String },
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "commands: set <n> | add <n> | mul <n> | inc | show | help | quit";

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

    match verb.to_ascii_lowercase().as_str() {
        "show" | "view" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => OperationKind::parse(other)
            .map(|kind| Command::Run {
                kind,
                // Passed through untouched; the session validates it.
                input: rest.to_string(),
            })
            .ok_or_else(|| format!("unknown command '{verb}'; {HELP}")),
    }
}

pub fn render(view: &SessionView) -> String {
    let value = match view.value {
        ValueDisplay::Loading => "…".to_string(),
        ValueDisplay::Value(v) => v.to_string(),
    };

    let alert = view.alert.as_ref().map_or(String::new(), |alert| {
        let marker = match alert.tone {
            AlertTone::Info => "[..]",
            AlertTone::Success => "[ok]",
            AlertTone::Danger => "[!!]",
        };
        format!("  {marker} {}", alert.message)
    });

    let controls = view
        .controls
        .iter()
        .map(|c| {
            if c.disabled {
                format!("({})", c.label)
            } else {
                c.label.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    format!("Current Number: {value}{alert}\n  controls: {controls}")
}

pub fn describe_outcome(kind: OperationKind, outcome: &Submission) -> Option<String> {
    match outcome {
        Submission::Dropped => Some(format!(
            "{} ignored: another operation is pending",
            kind.tag_str()
        )),
        _ => None,
    }
}

/// Prints the session view on every status or value change.
pub async fn render_loop(session: CounterSession, json: bool) {
    let mut status_rx = session.controller().subscribe();
    let mut value_rx = session.reader().subscribe();

    loop {
        tokio::select! {
            changed = status_rx.changed() => if changed.is_err() { break },
            changed = value_rx.changed() => if changed.is_err() { break },
        }
        // One print covers both changes.
        status_rx.mark_unchanged();
        value_rx.mark_unchanged();

        let view = session.view();
        if json {
            match serde_json::to_string(&view) {
                Ok(line) => println!("{line}"),
                Err(err) => tracing::warn!(error = %err, "failed to encode session view"),
            }
        } else {
            println!("{}", render(&view));
        }
    }
}
