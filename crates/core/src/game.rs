//! Run/session controller: the state machine that owns at most one run at a time.
//! Every command is processed to completion before the next one is accepted.

mod combat_flow;
mod explore;
mod hash;
mod run;
mod snapshot;

use std::collections::VecDeque;
use std::time::Duration;

use thiserror::Error;

use crate::content::ContentPack;
use crate::entity::{Character, Monster};
use crate::map::{DungeonMap, MapError};
use crate::rng::SeededRng;
use crate::score::{RunRecord, ScoreSink};
use crate::types::*;

pub use snapshot::{MonsterView, PlayerView, RoomView, SessionSnapshot, ShopEntryView};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("{command:?} is not allowed in state {state:?}")]
    NotAllowed { command: Command, state: RunState },
    #[error("state {0:?} has no active run")]
    NoActiveRun(RunState),
    #[error("unknown class '{0}'")]
    UnknownClass(String),
    #[error(transparent)]
    Map(#[from] MapError),
}

/// Bounded player-facing log; the oldest line is dropped first.
#[derive(Clone, Debug)]
pub struct MessageLog {
    capacity: usize,
    entries: VecDeque<LogEvent>,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { capacity, entries: VecDeque::with_capacity(capacity) }
    }

    pub fn push(&mut self, event: LogEvent) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEvent> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&LogEvent> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Everything that lives exactly as long as one run.
#[derive(Clone, Debug)]
struct Run {
    player: Character,
    map: DungeonMap,
    floor: u32,
    elapsed: Duration,
    boss_spawned: bool,
}

pub struct Session<'c, S: ScoreSink> {
    content: &'c ContentPack,
    seed: u64,
    rng: SeededRng,
    state: RunState,
    selected_class: usize,
    run: Option<Run>,
    log: MessageLog,
    sink: S,
    last_record: Option<RunRecord>,
    commands_applied: u64,
    quit_requested: bool,
}

impl<'c, S: ScoreSink> Session<'c, S> {
    pub fn new(content: &'c ContentPack, seed: u64, sink: S) -> Self {
        Self {
            content,
            seed,
            rng: SeededRng::from_seed(seed),
            state: RunState::Menu,
            selected_class: 0,
            run: None,
            log: MessageLog::new(content.rules.message_log_capacity),
            sink,
            last_record: None,
            commands_applied: 0,
            quit_requested: false,
        }
    }

    /// Applies one command atomically. Commands the current state does not accept
    /// are errors; commands it accepts but refuses come back as `Rejected`.
    pub fn handle(&mut self, command: Command) -> Result<CommandOutcome, SessionError> {
        let state = self.state;
        let outcome = match (state, &command) {
            (_, Command::Quit) => {
                self.quit_requested = true;
                CommandOutcome::Quit
            }
            (RunState::Menu, Command::SelectClass(key)) => self.select_class(key)?,
            (RunState::Menu, Command::ConfirmStart) => self.start_run()?,
            (RunState::Menu, Command::ReturnToMenu) => {
                self.emit(LogEvent::AlreadyInMenu);
                CommandOutcome::Rejected(Rejection::AlreadyInMenu)
            }
            (RunState::Explore | RunState::Combat, Command::Move(direction)) => {
                self.attempt_move(*direction)?
            }
            (RunState::Explore, Command::OpenShop) => self.open_shop(),
            (RunState::Shop, Command::CloseShop) => self.close_shop(),
            (RunState::Shop, Command::Purchase(index)) => self.purchase(*index)?,
            (RunState::Combat, Command::Combat(action)) => self.combat_round(*action)?,
            (RunState::LevelUp, Command::ChooseAttribute(attribute)) => {
                self.choose_attribute(*attribute)?
            }
            (RunState::NextFloor, Command::ConfirmStart) => self.descend()?,
            (_, Command::ReturnToMenu) => self.return_to_menu(),
            _ => return Err(SessionError::NotAllowed { command: command.clone(), state }),
        };

        if !matches!(outcome, CommandOutcome::Rejected(_)) {
            self.commands_applied += 1;
        }
        if self.state != state {
            log::debug!("session {:?} -> {:?} on {:?}", state, self.state, command);
        }
        Ok(outcome)
    }

    /// Advances run time. Ignored outside the states in which the clock runs.
    pub fn advance_clock(&mut self, by: Duration) {
        if !self.state.clock_running() {
            return;
        }
        if let Some(run) = self.run.as_mut() {
            run.elapsed = run.elapsed.saturating_add(by);
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn content(&self) -> &'c ContentPack {
        self.content
    }

    pub fn player(&self) -> Option<&Character> {
        self.run.as_ref().map(|run| &run.player)
    }

    pub fn map(&self) -> Option<&DungeonMap> {
        self.run.as_ref().map(|run| &run.map)
    }

    pub fn floor(&self) -> Option<u32> {
        self.run.as_ref().map(|run| run.floor)
    }

    pub fn elapsed(&self) -> Duration {
        self.run.as_ref().map_or(Duration::ZERO, |run| run.elapsed)
    }

    pub fn boss_spawned(&self) -> bool {
        self.run.as_ref().is_some_and(|run| run.boss_spawned)
    }

    /// Occupants of the player's current room; empty outside a run.
    pub fn occupants(&self) -> &[Monster] {
        self.run
            .as_ref()
            .and_then(|run| run.map.get_room(run.player.position).ok())
            .map(|room| room.occupants.as_slice())
            .unwrap_or_default()
    }

    pub fn selected_class(&self) -> &str {
        self.content.classes.get(self.selected_class).map_or("", |class| class.key.as_str())
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn last_record(&self) -> Option<&RunRecord> {
        self.last_record.as_ref()
    }

    pub fn commands_applied(&self) -> u64 {
        self.commands_applied
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn score_sink(&self) -> &S {
        &self.sink
    }

    pub fn into_score_sink(self) -> S {
        self.sink
    }

    fn emit(&mut self, event: LogEvent) {
        self.log.push(event);
    }

    fn select_class(&mut self, key: &str) -> Result<CommandOutcome, SessionError> {
        let index = self
            .content
            .class_index(key)
            .ok_or_else(|| SessionError::UnknownClass(key.to_string()))?;
        self.selected_class = index;
        Ok(CommandOutcome::Applied)
    }

    fn active_run(&mut self) -> Result<&mut Run, SessionError> {
        self.run.as_mut().ok_or(SessionError::NoActiveRun(self.state))
    }
}
