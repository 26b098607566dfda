use anyhow::{Context, Result};
use clap::Parser;
use crawler_core::{
    Attribute, CombatAction, Command, CommandOutcome, ContentPack, Direction, GridPos, RunState,
    ScoreBoard, Session,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    commands: u32,
    /// Use the distance-scaled floor rules
    #[arg(long)]
    classic: bool,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn is_over(state: RunState) -> bool {
    matches!(state, RunState::Victory | RunState::Defeated)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Starting Fuzz harness on seed {} for max {} commands...", args.seed, args.commands);
    let content = if args.classic { ContentPack::classic() } else { ContentPack::default() };
    let mut session = Session::new(&content, args.seed, ScoreBoard::new());
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let mut ended_runs = 0;
    for _ in 0..args.commands {
        session.advance_clock(Duration::from_secs(rng.next_u64() % 30));
        let command = match session.state() {
            RunState::Menu => Command::ConfirmStart,
            RunState::Explore => {
                if rng.next_u64() % 15 == 0 {
                    Command::OpenShop
                } else {
                    Command::Move(choose(&mut rng, &Direction::ALL))
                }
            }
            RunState::Shop => {
                choose(&mut rng, &[Command::Purchase(0), Command::Purchase(99), Command::CloseShop])
            }
            RunState::Combat => choose(
                &mut rng,
                &[
                    Command::Combat(CombatAction::Attack),
                    Command::Combat(CombatAction::Attack),
                    Command::Combat(CombatAction::Heal),
                    Command::Combat(CombatAction::Flee),
                ],
            ), // Bias to fight
            RunState::LevelUp => Command::ChooseAttribute(choose(&mut rng, &Attribute::ALL)),
            RunState::NextFloor => Command::ConfirmStart,
            RunState::Victory | RunState::Defeated => Command::ReturnToMenu,
        };

        let before = session.snapshot_hash();
        let was_over = is_over(session.state());
        let outcome = session.handle(command).context("fuzz issued an illegal command")?;
        if let CommandOutcome::Rejected(reason) = outcome {
            assert_eq!(before, session.snapshot_hash(), "Invariant failed: {reason:?} mutated state");
        }
        if !was_over && is_over(session.state()) {
            ended_runs += 1;
            println!(
                "Run {} ended in {:?} on floor {}",
                ended_runs,
                session.state(),
                session.floor().unwrap_or(1)
            );
        }

        // Assert invariants
        if let (Some(player), Some(map)) = (session.player(), session.map()) {
            assert!(player.current_hp <= player.max_hp, "Invariant failed: HP > Max HP");
            let origin = map.get_room(GridPos::ORIGIN)?;
            assert!(origin.occupants.is_empty(), "Invariant failed: occupied origin");
            let here = map.get_room(player.position)?;
            if session.state() == RunState::Combat {
                assert!(!here.occupants.is_empty(), "Invariant failed: combat in empty room");
            }
        }
    }

    assert_eq!(session.score_sink().records().len(), ended_runs, "Invariant failed: lost records");
    println!("Fuzzing completed successfully.");
    Ok(())
}
