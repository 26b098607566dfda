//! Movement between rooms: door checks, the combat lock and lazy room generation.

use super::*;
use crate::encounter::{EncounterContext, EncounterGenerator};

impl<S: ScoreSink> Session<'_, S> {
    pub(super) fn attempt_move(
        &mut self,
        direction: Direction,
    ) -> Result<CommandOutcome, SessionError> {
        let content = self.content;
        let state = self.state;
        let run = self.run.as_mut().ok_or(SessionError::NoActiveRun(state))?;
        let here = run.player.position;
        let room = run.map.get_room(here)?;

        if room.is_locked() {
            self.log.push(LogEvent::DoorsSealed);
            return Ok(CommandOutcome::Rejected(Rejection::MovementLocked));
        }
        if !room.exits.is_open(direction) {
            self.log.push(LogEvent::NoDoor);
            return Ok(CommandOutcome::Rejected(Rejection::NoExit));
        }

        let target = here.step(direction);
        let ctx = EncounterContext {
            coord: target,
            elapsed_minutes: run.elapsed.as_secs_f64() / 60.0,
            floor: run.floor,
            boss_spawned: run.boss_spawned,
            has_boss_key: run.player.has_boss_key,
        };
        let generator = EncounterGenerator::new(&content.bestiary, &content.rules);
        let created = run
            .map
            .ensure_room(target, direction, &mut self.rng, |rng| generator.generate(&ctx, rng));

        run.player.position = target;
        let room = run.map.get_room_mut(target)?;
        let first_visit = !room.visited;
        room.visited = true;

        if created && room.occupants.iter().any(Monster::is_boss) {
            run.boss_spawned = true;
            log::info!("boss spawned at {target} on floor {}", run.floor);
        }
        if first_visit && room.occupants.iter().any(Monster::is_key_holder) {
            self.log.push(LogEvent::KeyHolderSensed);
        }

        if !room.occupants.is_empty() {
            let names = room.occupants.iter().map(|monster| monster.name.clone()).collect();
            self.log.push(LogEvent::EncounterStarted { names });
            self.state = RunState::Combat;
        }
        Ok(CommandOutcome::Applied)
    }
}
