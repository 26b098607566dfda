//! Drives a session from text lines and prints what the player would see.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::ValueEnum;
use crawler_core::{CommandJournal, CommandOutcome, RunState, ScoreSink, Session, SessionSnapshot};
use log::debug;

use crate::command_text::{Line, parse_line};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One status line plus the newest log message per command.
    #[default]
    Text,
    /// One JSON snapshot per command.
    Json,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaySummary {
    pub lines_read: usize,
    pub commands_applied: usize,
    pub commands_rejected: usize,
    pub errors: usize,
    pub final_state: RunState,
    pub snapshot_hash: u64,
}

/// Feeds every line of `input` to the session until it ends or a `quit` arrives.
///
/// Unparseable lines and commands the session refuses are reported on `out` and skipped;
/// only commands the session accepted reach the journal, so it always replays.
pub fn run_script<S, R, W>(
    session: &mut Session<'_, S>,
    input: R,
    out: &mut W,
    format: OutputFormat,
    mut journal: Option<&mut CommandJournal>,
) -> Result<PlaySummary>
where
    S: ScoreSink,
    R: BufRead,
    W: Write,
{
    let mut summary = PlaySummary {
        lines_read: 0,
        commands_applied: 0,
        commands_rejected: 0,
        errors: 0,
        final_state: session.state(),
        snapshot_hash: session.snapshot_hash(),
    };

    for line in input.lines() {
        let line = line.context("failed to read command input")?;
        summary.lines_read += 1;

        let command = match parse_line(&line) {
            Ok(Line::Blank) => continue,
            Ok(Line::Wait(by)) => {
                session.advance_clock(by);
                if let Some(journal) = journal.as_deref_mut() {
                    journal.append_clock(by);
                }
                continue;
            }
            Ok(Line::Command(command)) => command,
            Err(err) => {
                summary.errors += 1;
                writeln!(out, "error: {err}")?;
                continue;
            }
        };

        debug!("play: {command:?} in {:?}", session.state());
        match session.handle(command.clone()) {
            Ok(outcome) => {
                if let Some(journal) = journal.as_deref_mut() {
                    journal.append_command(command);
                }
                match outcome {
                    CommandOutcome::Applied => summary.commands_applied += 1,
                    CommandOutcome::Rejected(_) => summary.commands_rejected += 1,
                    CommandOutcome::Quit => break,
                }
                render(&session.snapshot(), format, out)?;
            }
            Err(err) => {
                summary.errors += 1;
                writeln!(out, "error: {err}")?;
            }
        }
    }

    summary.final_state = session.state();
    summary.snapshot_hash = session.snapshot_hash();
    Ok(summary)
}

pub fn render<W: Write>(
    snapshot: &SessionSnapshot,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, snapshot).context("failed to encode snapshot")?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            writeln!(out, "{}", status_line(snapshot))?;
            if let Some(message) = snapshot.log.last() {
                writeln!(out, "  > {message}")?;
            }
        }
    }
    Ok(())
}

pub fn status_line(snapshot: &SessionSnapshot) -> String {
    let Some(player) = &snapshot.player else {
        return format!("[{:?}] class {}", snapshot.state, snapshot.selected_class);
    };
    let mut line = format!(
        "[{:?}] floor {} {:.1}m | {} lv{} hp {}/{} gold {} potions {} @ {}",
        snapshot.state,
        snapshot.floor.unwrap_or(1),
        snapshot.elapsed_minutes,
        player.class_name,
        player.level,
        player.current_hp,
        player.max_hp,
        player.currency,
        player.potions,
        player.position,
    );
    if !snapshot.occupants.is_empty() {
        let foes: Vec<String> = snapshot
            .occupants
            .iter()
            .map(|foe| format!("{} {}/{}", foe.name, foe.hp, foe.max_hp))
            .collect();
        line.push_str(&format!(" | vs {}", foes.join(", ")));
    }
    line
}
