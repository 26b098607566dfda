use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use crawler_core::{
    Command, CommandJournal, ContentPack, RunState, ScoreBoard, ScoreFile, ScoreSink, Session,
    replay_journal,
};
use crawler_tools::{OutputFormat, PlaySummary, format_command, paths, run_script};
use log::info;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Play from a script file or stdin, one command per line
    Play(PlayArgs),
    /// Rebuild a session from a recorded journal
    Replay(ReplayArgs),
    /// Show the best recorded runs
    Scores(ScoresArgs),
    /// Load and validate a content pack
    CheckContent {
        /// Path to the content TOML file
        path: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RulesPreset {
    Timed,
    Classic,
}

#[derive(Args)]
struct ContentArgs {
    /// Content TOML file; the built-in pack is used when absent
    #[arg(long)]
    content: Option<PathBuf>,
    /// Rules for the built-in pack
    #[arg(long, value_enum, default_value_t = RulesPreset::Timed)]
    rules: RulesPreset,
}

#[derive(Args)]
struct PlayArgs {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Script to read commands from instead of stdin
    #[arg(long)]
    script: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write the accepted commands to this journal file
    #[arg(long)]
    record: Option<PathBuf>,
    /// Score file; defaults to the platform data directory
    #[arg(long)]
    scores: Option<PathBuf>,
    /// Keep finished runs in memory only
    #[arg(long)]
    no_scores: bool,
    #[command(flatten)]
    content: ContentArgs,
}

#[derive(Args)]
struct ReplayArgs {
    /// Path to the journal JSON file to replay
    #[arg(short, long)]
    journal: PathBuf,
    /// Print the journaled commands before replaying them
    #[arg(long)]
    echo: bool,
    #[command(flatten)]
    content: ContentArgs,
}

#[derive(Args)]
struct ScoresArgs {
    #[arg(long)]
    scores: Option<PathBuf>,
    #[arg(short = 'n', long, default_value_t = 10)]
    top: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    match Cli::parse().command {
        Action::Play(args) => play(args),
        Action::Replay(args) => replay(args),
        Action::Scores(args) => scores(args),
        Action::CheckContent { path } => check_content(&path),
    }
}

fn load_content(args: &ContentArgs) -> Result<ContentPack> {
    match (&args.content, args.rules) {
        (Some(path), _) => ContentPack::load(path)
            .with_context(|| format!("Failed to load content pack: {}", path.display())),
        (None, RulesPreset::Timed) => Ok(ContentPack::default()),
        (None, RulesPreset::Classic) => Ok(ContentPack::classic()),
    }
}

fn play(args: PlayArgs) -> Result<()> {
    let content = load_content(&args.content)?;
    let input: Box<dyn BufRead> = match &args.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path)
                .with_context(|| format!("Failed to open script: {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let summary = if args.no_scores {
        play_with(&content, &args, input, ScoreBoard::new())?
    } else {
        let Some(path) = paths::resolve_score_path(args.scores.clone()) else {
            bail!("No data directory on this platform; pass --scores or --no-scores");
        };
        info!("recording finished runs to {}", path.display());
        play_with(&content, &args, input, ScoreFile::new(path))?
    };

    eprintln!(
        "{} lines, {} applied, {} rejected, {} errors; final state {:?}, hash {:016x}",
        summary.lines_read,
        summary.commands_applied,
        summary.commands_rejected,
        summary.errors,
        summary.final_state,
        summary.snapshot_hash,
    );
    Ok(())
}

fn play_with<S: ScoreSink>(
    content: &ContentPack,
    args: &PlayArgs,
    input: Box<dyn BufRead>,
    sink: S,
) -> Result<PlaySummary> {
    let mut session = Session::new(content, args.seed, sink);
    let mut journal = args.record.as_ref().map(|_| CommandJournal::new(args.seed));
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let summary = run_script(&mut session, input, &mut out, args.format, journal.as_mut())?;
    out.flush()?;

    if let (Some(path), Some(journal)) = (&args.record, &journal) {
        journal
            .write_atomic(path)
            .with_context(|| format!("Failed to write journal: {}", path.display()))?;
        info!("journal written to {}", path.display());
    }
    Ok(summary)
}

fn replay(args: ReplayArgs) -> Result<()> {
    let content = load_content(&args.content)?;
    let journal = CommandJournal::load(&args.journal)
        .with_context(|| format!("Failed to read journal file: {}", args.journal.display()))?;

    if args.echo {
        for command in journal.commands() {
            println!("{}", format_command(command));
        }
    }

    let result = replay_journal(&content, &journal).context("Replay failed during execution")?;

    println!("Replay complete.");
    println!("Seed: {}", journal.seed);
    println!("Final State: {:?}", result.final_state);
    println!(
        "Commands: {} applied, {} rejected",
        result.commands_applied, result.commands_rejected
    );
    println!("Runs Ended: {}", result.recorded_runs.records().len());
    println!("Snapshot Hash: {:016x}", result.final_snapshot_hash);
    Ok(())
}

fn scores(args: ScoresArgs) -> Result<()> {
    let Some(path) = paths::resolve_score_path(args.scores) else {
        bail!("No data directory on this platform; pass --scores");
    };
    let file = ScoreFile::new(&path);
    let top = file.top(args.top).with_context(|| format!("Failed to read {}", path.display()))?;
    if top.is_empty() {
        println!("No runs recorded yet in {}.", path.display());
        return Ok(());
    }

    for (rank, record) in top.iter().enumerate() {
        println!(
            "{:>2}. {:>6}  {:<8} lv{:<3} {:>5} gold {:>6.1}  {:?}",
            rank + 1,
            record.score(),
            record.class_name,
            record.level,
            record.currency,
            record.duration,
            record.outcome,
        );
    }
    Ok(())
}

fn check_content(path: &Path) -> Result<()> {
    let content = ContentPack::load(path)
        .with_context(|| format!("Failed to load content pack: {}", path.display()))?;

    let classes: Vec<&str> = content.classes.iter().map(|class| class.key.as_str()).collect();
    println!("Content OK: {}", path.display());
    println!("Classes: {}", classes.join(", "));
    println!("Bestiary: {} roster monsters", content.bestiary.roster.len());
    println!("Shop: {} entries", content.shop.len());
    println!("Encounters: {:?}", content.rules.encounter_policy);

    // A fresh session must be able to start with this pack.
    let mut session = Session::new(&content, 0, ScoreBoard::new());
    session.handle(Command::ConfirmStart)?;
    if session.state() != RunState::Explore {
        bail!("content pack cannot start a run (ended in {:?})", session.state());
    }
    Ok(())
}
