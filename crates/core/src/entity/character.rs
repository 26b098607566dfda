use serde::{Deserialize, Serialize};

use super::item::{Armor, Item, Potion, Weapon};
use crate::rng::RandomSource;
use crate::types::{Attribute, GridPos, LevelUpPolicy};

const MAX_CRIT_CHANCE: i32 = 75;
const HP_PER_VIGOR: i32 = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attributes {
    pub vigor: i32,
    pub strength: i32,
    pub dexterity: i32,
    pub intelligence: i32,
    pub luck: i32,
    pub defense: i32,
}

impl Attributes {
    pub fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Vigor => self.vigor,
            Attribute::Strength => self.strength,
            Attribute::Dexterity => self.dexterity,
            Attribute::Intelligence => self.intelligence,
            Attribute::Luck => self.luck,
            Attribute::Defense => self.defense,
        }
    }

    pub fn get_mut(&mut self, attribute: Attribute) -> &mut i32 {
        match attribute {
            Attribute::Vigor => &mut self.vigor,
            Attribute::Strength => &mut self.strength,
            Attribute::Dexterity => &mut self.dexterity,
            Attribute::Intelligence => &mut self.intelligence,
            Attribute::Luck => &mut self.luck,
            Attribute::Defense => &mut self.defense,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackRoll {
    pub damage: i32,
    pub critical: bool,
}

/// The player. Derived stats (`max_hp`, `total_defense`) are only valid after
/// [`Character::recompute_derived`] has run for the current attributes and armor.
#[derive(Clone, Debug, PartialEq)]
pub struct Character {
    pub class_name: String,
    pub attributes: Attributes,
    pub weapon: Weapon,
    pub armor: Armor,
    pub inventory: Vec<Item>,
    pub max_hp: i32,
    pub current_hp: i32,
    pub total_defense: i32,
    pub level: u32,
    pub experience: u32,
    pub experience_to_next: u32,
    pub pending_level_ups: u32,
    pub currency: u32,
    pub position: GridPos,
    pub has_boss_key: bool,
}

impl Character {
    pub fn new(
        class_name: impl Into<String>,
        attributes: Attributes,
        weapon: Weapon,
        armor: Armor,
        experience_to_next: u32,
    ) -> Self {
        let mut character = Self {
            class_name: class_name.into(),
            attributes,
            weapon,
            armor,
            inventory: Vec::new(),
            max_hp: 0,
            current_hp: 0,
            total_defense: 0,
            level: 1,
            experience: 0,
            experience_to_next: experience_to_next.max(1),
            pending_level_ups: 0,
            currency: 0,
            position: GridPos::ORIGIN,
            has_boss_key: false,
        };
        character.recompute_derived();
        character.current_hp = character.max_hp;
        character
    }

    /// Pure function of attributes and armor. Never raises `current_hp`.
    pub fn recompute_derived(&mut self) {
        self.max_hp = (self.attributes.vigor * HP_PER_VIGOR + self.armor.bonus_hp).max(0);
        self.total_defense = (self.attributes.defense / 2 + self.armor.bonus_defense).max(0);
        if self.current_hp > self.max_hp {
            self.current_hp = self.max_hp;
        }
    }

    pub fn crit_chance(&self) -> i32 {
        self.attributes.luck.clamp(0, MAX_CRIT_CHANCE)
    }

    pub fn roll_attack<R: RandomSource + ?Sized>(&self, rng: &mut R) -> AttackRoll {
        let base = rng.range_inclusive(self.weapon.min_damage, self.weapon.max_damage);
        let scaling = self.attributes.get(self.weapon.scaling_attribute.attribute());
        let bonus = (scaling as f32 * self.weapon.scaling_rank) as i32;
        let mut damage = base + bonus;

        let critical = rng.roll_percent() as i32 <= self.crit_chance();
        if critical {
            let multiplier = 1.5 + f64::from(self.attributes.dexterity) * 0.01;
            damage = (f64::from(damage) * multiplier) as i32;
        }

        AttackRoll { damage: damage.max(1), critical }
    }

    /// A hit always lands for at least one point.
    pub fn apply_damage(&mut self, raw: i32) -> i32 {
        let actual = raw.saturating_sub(self.total_defense).max(1);
        self.current_hp -= actual;
        actual
    }

    /// Adds experience and returns how many levels were gained by this grant.
    pub fn grant_experience(&mut self, amount: u32, policy: LevelUpPolicy) -> u32 {
        self.experience = self.experience.saturating_add(amount);
        let mut gained = 0;
        while self.experience >= self.experience_to_next {
            self.experience -= self.experience_to_next;
            self.level += 1;
            gained += 1;
            if policy == LevelUpPolicy::SingleStep {
                break;
            }
        }
        self.pending_level_ups += gained;
        gained
    }

    /// Heals without exceeding `max_hp`; returns the amount actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.current_hp;
        self.current_hp = (self.current_hp + amount.max(0)).min(self.max_hp).max(before);
        self.current_hp - before
    }

    pub fn potion_count(&self) -> usize {
        self.inventory.iter().filter(|item| matches!(item, Item::Potion(_))).count()
    }

    pub fn take_first_potion(&mut self) -> Option<Potion> {
        let index = self.inventory.iter().position(|item| matches!(item, Item::Potion(_)))?;
        match self.inventory.remove(index) {
            Item::Potion(potion) => Some(potion),
            _ => None,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.current_hp <= 0
    }
}
