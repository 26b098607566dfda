//! Run lifecycle (start, floors, end, menu) plus the shop and level-up screens.

use super::*;
use crate::encounter::EncounterPolicy;
use crate::progression::{Purchase, ShopError, level_up, shop_purchase};

impl<S: ScoreSink> Session<'_, S> {
    pub(super) fn start_run(&mut self) -> Result<CommandOutcome, SessionError> {
        let content = self.content;
        let class = content
            .classes
            .get(self.selected_class)
            .ok_or_else(|| SessionError::UnknownClass(format!("#{}", self.selected_class)))?;
        let player = class.build_character(content.rules.experience_to_next);
        let class_name = player.class_name.clone();
        self.run = Some(Run {
            player,
            map: DungeonMap::new(content.rules.exit_open_chance),
            floor: 1,
            elapsed: Duration::ZERO,
            boss_spawned: false,
        });
        self.log.clear();
        self.emit(LogEvent::RunStarted { class_name: class_name.clone(), floor: 1 });
        self.state = RunState::Explore;
        log::info!("run started as {class_name} with seed {}", self.seed);
        Ok(CommandOutcome::Applied)
    }

    /// Regenerates the map one floor deeper; the player keeps everything but the key.
    pub(super) fn descend(&mut self) -> Result<CommandOutcome, SessionError> {
        let exit_open_chance = self.content.rules.exit_open_chance;
        let run = self.active_run()?;
        run.floor += 1;
        run.map = DungeonMap::new(exit_open_chance);
        run.boss_spawned = false;
        run.player.position = GridPos::ORIGIN;
        run.player.has_boss_key = false;
        let floor = run.floor;
        let pending = run.player.pending_level_ups;

        self.emit(LogEvent::Descended { floor });
        self.state = if pending > 0 { RunState::LevelUp } else { RunState::Explore };
        log::info!("descended to floor {floor}");
        Ok(CommandOutcome::Applied)
    }

    /// Records the run with the score sink and enters the matching end state.
    /// A sink failure is logged and never blocks the transition.
    pub(super) fn finish_run(&mut self, outcome: RunOutcome) {
        self.state = match outcome {
            RunOutcome::Victory => RunState::Victory,
            RunOutcome::Defeat => RunState::Defeated,
        };
        let Some(run) = self.run.as_ref() else {
            return;
        };
        let duration = match self.content.rules.encounter_policy {
            EncounterPolicy::TimeScaled => run.elapsed.as_secs_f64() / 60.0,
            EncounterPolicy::DistanceScaled => f64::from(run.floor),
        };
        let record = RunRecord {
            class_name: run.player.class_name.clone(),
            duration,
            level: run.player.level,
            currency: run.player.currency,
            outcome,
        };

        match self.sink.record_run(&record) {
            Ok(()) => {
                log::info!("run recorded: {outcome:?} with score {}", record.score());
                self.emit(LogEvent::RunRecorded { score: record.score() });
            }
            Err(err) => {
                log::warn!("failed to record run: {err}");
                self.emit(LogEvent::ScoreNotSaved);
            }
        }
        self.last_record = Some(record);
    }

    /// Drops the current run without recording it, unless it already ended.
    pub(super) fn return_to_menu(&mut self) -> CommandOutcome {
        self.run = None;
        self.state = RunState::Menu;
        self.emit(LogEvent::ReturnedToMenu);
        CommandOutcome::Applied
    }

    pub(super) fn open_shop(&mut self) -> CommandOutcome {
        self.state = RunState::Shop;
        CommandOutcome::Applied
    }

    pub(super) fn close_shop(&mut self) -> CommandOutcome {
        self.state = RunState::Explore;
        CommandOutcome::Applied
    }

    pub(super) fn purchase(&mut self, index: usize) -> Result<CommandOutcome, SessionError> {
        let content = self.content;
        let bonus = content.rules.upgrade_damage_bonus;
        let run = self.active_run()?;
        let event = match shop_purchase(&mut run.player, &content.shop, index, bonus) {
            Ok(Purchase::WeaponUpgraded { bonus }) => LogEvent::WeaponUpgraded { bonus },
            Ok(
                Purchase::WeaponEquipped { name }
                | Purchase::ArmorEquipped { name }
                | Purchase::Stocked { name },
            ) => LogEvent::Purchased { name },
            Err(ShopError::InsufficientFunds { price, .. }) => {
                self.emit(LogEvent::InsufficientFunds { price });
                return Ok(CommandOutcome::Rejected(Rejection::InsufficientFunds { price }));
            }
            Err(ShopError::UnknownEntry(index)) => {
                return Ok(CommandOutcome::Rejected(Rejection::UnknownShopEntry { index }));
            }
        };
        self.emit(event);
        Ok(CommandOutcome::Applied)
    }

    pub(super) fn choose_attribute(
        &mut self,
        attribute: Attribute,
    ) -> Result<CommandOutcome, SessionError> {
        let run = self.active_run()?;
        level_up(&mut run.player, attribute);
        run.player.pending_level_ups = run.player.pending_level_ups.saturating_sub(1);
        let remaining = run.player.pending_level_ups;
        let locked = run.map.get_room(run.player.position)?.is_locked();

        self.emit(LogEvent::AttributesRaised { chosen: attribute });
        if remaining == 0 {
            self.state = if locked { RunState::Combat } else { RunState::Explore };
        }
        Ok(CommandOutcome::Applied)
    }
}
