use super::*;
use crate::combat::{RoundOutcome, resolve_round};
use crate::content::BossDefeat;

impl<S: ScoreSink> Session<'_, S> {
    pub(super) fn combat_round(
        &mut self,
        action: CombatAction,
    ) -> Result<CommandOutcome, SessionError> {
        let content = self.content;
        let rules = &content.rules;
        let state = self.state;
        let run = self.run.as_mut().ok_or(SessionError::NoActiveRun(state))?;
        let room = run.map.get_room_mut(run.player.position)?;
        let report = resolve_round(
            &mut run.player,
            &mut room.occupants,
            rules,
            run.floor,
            action,
            &mut self.rng,
        );

        for event in report.events {
            self.log.push(event);
        }

        let outcome = match report.outcome {
            RoundOutcome::Continue => CommandOutcome::Applied,
            RoundOutcome::Cleared | RoundOutcome::Fled => {
                self.state = RunState::Explore;
                CommandOutcome::Applied
            }
            RoundOutcome::LevelUp => {
                self.state = RunState::LevelUp;
                CommandOutcome::Applied
            }
            RoundOutcome::BossDefeated => {
                match rules.boss_defeat {
                    BossDefeat::EndRun => self.finish_run(RunOutcome::Victory),
                    BossDefeat::NextFloor => self.state = RunState::NextFloor,
                }
                CommandOutcome::Applied
            }
            RoundOutcome::Defeated => {
                self.finish_run(RunOutcome::Defeat);
                CommandOutcome::Applied
            }
            RoundOutcome::Rejected(rejection) => CommandOutcome::Rejected(rejection),
        };
        Ok(outcome)
    }
}
