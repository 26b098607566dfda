//! One combat round: the player's action followed by retaliation from every survivor.

use crate::content::{FleeScaling, RunRules};
use crate::entity::{Character, Item, Monster};
use crate::rng::RandomSource;
use crate::types::{CombatAction, LogEvent, Rejection};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Occupants remain and the player is still standing.
    Continue,
    /// The last occupant died without crossing a level threshold.
    Cleared,
    /// A kill crossed at least one level threshold; survivors, if any, wait.
    LevelUp,
    BossDefeated,
    Fled,
    Defeated,
    /// Nothing was mutated apart from the explanatory log line.
    Rejected(Rejection),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundReport {
    pub outcome: RoundOutcome,
    pub events: Vec<LogEvent>,
}

impl RoundReport {
    fn new(outcome: RoundOutcome, events: Vec<LogEvent>) -> Self {
        Self { outcome, events }
    }
}

pub fn flee_cost(rules: &RunRules, floor: u32, occupants: usize) -> u32 {
    let multiplier = match rules.flee_scaling {
        FleeScaling::PerFloor => floor.max(1),
        FleeScaling::PerOccupant => u32::try_from(occupants.max(1)).unwrap_or(u32::MAX),
    };
    rules.flee_base_cost.saturating_mul(multiplier)
}

pub fn resolve_round<R: RandomSource + ?Sized>(
    player: &mut Character,
    occupants: &mut Vec<Monster>,
    rules: &RunRules,
    floor: u32,
    action: CombatAction,
    rng: &mut R,
) -> RoundReport {
    let mut events = Vec::new();

    match action {
        CombatAction::Attack => {
            let Some(target) = occupants.first_mut() else {
                return RoundReport::new(RoundOutcome::Cleared, events);
            };
            let roll = player.roll_attack(rng);
            events.push(LogEvent::PlayerHit {
                target: target.name.clone(),
                damage: roll.damage,
                critical: roll.critical,
            });
            if target.take_hit(roll.damage) {
                let slain = occupants.remove(0);
                let levels = reward_kill(player, &slain, rules, rng, &mut events);
                if slain.is_boss() {
                    occupants.clear();
                    events.push(LogEvent::BossDefeated { name: slain.name });
                    return RoundReport::new(RoundOutcome::BossDefeated, events);
                }
                if levels > 0 {
                    return RoundReport::new(RoundOutcome::LevelUp, events);
                }
                if occupants.is_empty() {
                    return RoundReport::new(RoundOutcome::Cleared, events);
                }
            }
        }
        CombatAction::Heal => match player.take_first_potion() {
            Some(potion) => {
                let healed = player.heal(potion.heal_amount);
                events.push(LogEvent::PotionDrunk { name: potion.name, healed });
            }
            None => {
                events.push(LogEvent::NoPotions);
                if !rules.failed_heal_consumes_turn {
                    return RoundReport::new(RoundOutcome::Rejected(Rejection::NoPotions), events);
                }
            }
        },
        CombatAction::Flee => {
            let cost = flee_cost(rules, floor, occupants.len());
            if player.currency < cost {
                events.push(LogEvent::FleeUnaffordable { cost });
                return RoundReport::new(
                    RoundOutcome::Rejected(Rejection::FleeUnaffordable { cost }),
                    events,
                );
            }
            player.currency -= cost;
            occupants.clear();
            events.push(LogEvent::Fled { cost });
            return RoundReport::new(RoundOutcome::Fled, events);
        }
    }

    retaliate(player, occupants, events)
}

/// Currency, experience, loot and key for one kill. Returns levels gained.
fn reward_kill<R: RandomSource + ?Sized>(
    player: &mut Character,
    slain: &Monster,
    rules: &RunRules,
    rng: &mut R,
    events: &mut Vec<LogEvent>,
) -> u32 {
    let luck = player.attributes.luck.max(0) as u32;
    let currency = slain.currency_reward + luck * rules.kill_bonus_per_luck;
    player.currency = player.currency.saturating_add(currency);
    events.push(LogEvent::MonsterSlain {
        name: slain.name.clone(),
        currency,
        experience: slain.experience_reward,
    });

    if slain.is_key_holder() && !player.has_boss_key {
        player.has_boss_key = true;
        events.push(LogEvent::BossKeyObtained);
    }

    let levels = player.grant_experience(slain.experience_reward, rules.level_up_policy);

    if rng.roll_percent() <= rules.loot_base_percent + luck {
        let potion = rules.loot_potion.clone();
        events.push(LogEvent::LootDropped { item: potion.name.clone() });
        player.inventory.push(Item::Potion(potion));
    }

    for step in 0..levels {
        events.push(LogEvent::LevelReached { level: player.level - levels + step + 1 });
    }
    levels
}

fn retaliate(
    player: &mut Character,
    occupants: &[Monster],
    mut events: Vec<LogEvent>,
) -> RoundReport {
    if occupants.is_empty() {
        return RoundReport::new(RoundOutcome::Cleared, events);
    }
    let damage: i32 = occupants.iter().map(|monster| player.apply_damage(monster.damage)).sum();
    events.push(LogEvent::Retaliation { attackers: occupants.len(), damage });

    if player.is_dead() {
        events.push(LogEvent::PlayerDied);
        return RoundReport::new(RoundOutcome::Defeated, events);
    }
    RoundReport::new(RoundOutcome::Continue, events)
}
