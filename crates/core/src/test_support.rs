//! Shared test fixtures for the core unit test suites.
//! It does not own production gameplay logic.

use std::collections::VecDeque;

use crate::entity::{Armor, Attributes, Character, Monster, MonsterRole, Weapon};
use crate::rng::RandomSource;
use crate::types::ScalingAttribute;

/// Replays a fixed list of raw draws, cycling when it runs out.
#[derive(Clone, Debug)]
pub(crate) struct ScriptedRng {
    draws: VecDeque<u64>,
    script: Vec<u64>,
}

impl ScriptedRng {
    pub(crate) fn new(script: Vec<u64>) -> Self {
        let script = if script.is_empty() { vec![0] } else { script };
        Self { draws: script.iter().copied().collect(), script }
    }

    /// A source whose every draw is zero: `unit()` is 0.0, ranges yield their minimum
    /// and percent rolls are 1.
    pub(crate) fn zeros() -> Self {
        Self::new(vec![0])
    }

    /// A source whose every `unit()` sits just under 1.0, so every chance fails.
    pub(crate) fn highs() -> Self {
        Self::new(vec![u64::MAX - 1])
    }
}

impl RandomSource for ScriptedRng {
    fn next_u64(&mut self) -> u64 {
        if self.draws.is_empty() {
            self.draws.extend(self.script.iter().copied());
        }
        self.draws.pop_front().unwrap_or(0)
    }
}

pub(crate) fn bare_character() -> Character {
    Character::new(
        "Tester",
        Attributes { vigor: 10, strength: 10, dexterity: 10, intelligence: 10, luck: 5, defense: 0 },
        Weapon {
            name: "Rusty Sword".to_string(),
            value: 0,
            min_damage: 5,
            max_damage: 8,
            scaling_attribute: ScalingAttribute::Strength,
            scaling_rank: 0.8,
        },
        Armor { name: "Nothing".to_string(), value: 0, bonus_hp: 0, bonus_defense: 0 },
        100,
    )
}

pub(crate) fn monster(name: &str, hp: i32, damage: i32) -> Monster {
    Monster {
        name: name.to_string(),
        hp,
        max_hp: hp,
        damage,
        experience_reward: 25,
        currency_reward: 10,
        role: MonsterRole::Normal,
    }
}

pub(crate) fn goblin() -> Monster {
    monster("Goblin", 25, 10)
}

pub(crate) fn boss() -> Monster {
    Monster {
        role: MonsterRole::Boss,
        experience_reward: 500,
        currency_reward: 300,
        ..monster("Overlord", 5, 25)
    }
}
