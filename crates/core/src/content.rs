//! Static configuration: starting classes, bestiary, shop catalog and run rules.
//! Loaded once at process start and only ever read afterwards.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encounter::EncounterPolicy;
use crate::entity::{Armor, Attributes, Character, Item, Monster, MonsterRole, Potion, Weapon};
use crate::rng::RandomSource;
use crate::types::{Attribute, LevelUpPolicy, ScalingAttribute};

pub mod keys {
    pub const CLASS_WARRIOR: &str = "warrior";
    pub const CLASS_ROGUE: &str = "rogue";
    pub const CLASS_MAGE: &str = "mage";
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("could not read content file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("content file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid content: {0}")]
    Invalid(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BossDefeat {
    /// Killing the boss wins the run.
    EndRun,
    /// Killing the boss opens the way to a deeper floor.
    NextFloor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FleeScaling {
    PerFloor,
    PerOccupant,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunRules {
    pub encounter_policy: EncounterPolicy,
    pub boss_defeat: BossDefeat,
    pub flee_base_cost: u32,
    pub flee_scaling: FleeScaling,
    pub loot_base_percent: u32,
    pub loot_potion: Potion,
    pub kill_bonus_per_luck: u32,
    pub level_up_policy: LevelUpPolicy,
    pub failed_heal_consumes_turn: bool,
    pub experience_to_next: u32,
    pub exit_open_chance: f64,
    pub upgrade_damage_bonus: i32,
    pub boss_after_minutes: f64,
    pub message_log_capacity: usize,
    pub view_radius: u32,
}

impl RunRules {
    /// Time-scaled multi-enemy rules; the boss ends the run.
    pub fn timed() -> Self {
        Self {
            encounter_policy: EncounterPolicy::TimeScaled,
            boss_defeat: BossDefeat::EndRun,
            flee_base_cost: 50,
            flee_scaling: FleeScaling::PerOccupant,
            loot_base_percent: 20,
            loot_potion: default_loot_potion(),
            kill_bonus_per_luck: 2,
            level_up_policy: LevelUpPolicy::Repeated,
            failed_heal_consumes_turn: false,
            experience_to_next: 100,
            exit_open_chance: 0.65,
            upgrade_damage_bonus: 5,
            boss_after_minutes: 12.0,
            message_log_capacity: 8,
            view_radius: 6,
        }
    }

    /// Distance-scaled rules with key holders and endless floors.
    pub fn classic() -> Self {
        Self {
            encounter_policy: EncounterPolicy::DistanceScaled,
            boss_defeat: BossDefeat::NextFloor,
            flee_scaling: FleeScaling::PerFloor,
            loot_base_percent: 30,
            ..Self::timed()
        }
    }
}

impl Default for RunRules {
    fn default() -> Self {
        Self::timed()
    }
}

fn default_loot_potion() -> Potion {
    Potion { name: "Potion".to_string(), value: 20, heal_amount: 30 }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    pub key: String,
    pub name: String,
    pub attributes: Attributes,
    pub weapon: Weapon,
    pub armor: Armor,
    #[serde(default)]
    pub inventory: Vec<Item>,
    pub currency: u32,
}

impl ClassDef {
    pub fn build_character(&self, experience_to_next: u32) -> Character {
        let mut character = Character::new(
            self.name.clone(),
            self.attributes,
            self.weapon.clone(),
            self.armor.clone(),
            experience_to_next,
        );
        character.inventory = self.inventory.clone();
        character.currency = self.currency;
        character
    }
}

/// Base stats before scaling. `unlock_at` is in elapsed minutes and only gates the
/// time-scaled roster; distance-scaled runs borrow names from the whole roster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonsterTemplate {
    pub name: String,
    #[serde(default)]
    pub unlock_at: f64,
    pub hp: i32,
    pub damage: i32,
    pub experience: u32,
    pub currency_min: u32,
    pub currency_max: u32,
}

impl MonsterTemplate {
    pub fn spawn<R: RandomSource + ?Sized>(
        &self,
        role: MonsterRole,
        scale: f64,
        rng: &mut R,
    ) -> Monster {
        let currency =
            rng.range_inclusive(self.currency_min as i32, self.currency_max as i32).max(0);
        let hp = ((f64::from(self.hp) * scale) as i32).max(1);
        Monster {
            name: self.name.clone(),
            hp,
            max_hp: hp,
            damage: (f64::from(self.damage) * scale) as i32,
            experience_reward: (f64::from(self.experience) * scale) as u32,
            currency_reward: (f64::from(currency) * scale) as u32,
            role,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bestiary {
    /// Time-scaled tiers, each eligible once its unlock threshold is reached.
    pub roster: Vec<MonsterTemplate>,
    /// Stats for distance-scaled normal monsters; the name is drawn from the roster.
    pub wanderer: MonsterTemplate,
    pub key_holder: MonsterTemplate,
    pub boss: MonsterTemplate,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShopEntry {
    FlatUpgrade { price: u32 },
    Item { item: Item },
}

impl ShopEntry {
    pub fn price(&self) -> u32 {
        match self {
            Self::FlatUpgrade { price } => *price,
            Self::Item { item } => item.value(),
        }
    }

    pub fn label(&self, upgrade_bonus: i32) -> String {
        match self {
            Self::FlatUpgrade { .. } => format!("Weapon upgrade (+{upgrade_bonus} dmg)"),
            Self::Item { item: Item::Weapon(weapon) } => format!(
                "{} [{}: {}]",
                weapon.name,
                weapon.scaling_attribute.attribute().short_label(),
                weapon.grade()
            ),
            Self::Item { item } => item.name().to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentPack {
    pub classes: Vec<ClassDef>,
    pub bestiary: Bestiary,
    pub shop: Vec<ShopEntry>,
    #[serde(default)]
    pub rules: RunRules,
}

impl ContentPack {
    pub fn build_default() -> Self {
        Self {
            classes: vec![warrior(), rogue(), mage()],
            bestiary: default_bestiary(),
            shop: default_shop(),
            rules: RunRules::default(),
        }
    }

    /// Default content played with the distance-scaled floor rules.
    pub fn classic() -> Self {
        Self { rules: RunRules::classic(), ..Self::build_default() }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ContentError> {
        let pack: Self = toml::from_str(text)?;
        pack.validate()?;
        Ok(pack)
    }

    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ContentError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&text)
    }

    pub fn class_index(&self, key: &str) -> Option<usize> {
        self.classes.iter().position(|class| class.key.eq_ignore_ascii_case(key))
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        if self.classes.is_empty() {
            return invalid("at least one class is required");
        }
        let mut seen = BTreeSet::new();
        for class in &self.classes {
            if !seen.insert(class.key.to_ascii_lowercase()) {
                return invalid(format!("duplicate class key '{}'", class.key));
            }
            check_weapon(&class.weapon)?;
            check_armor(&class.armor)?;
            if Attribute::ALL.into_iter().any(|attribute| class.attributes.get(attribute) < 0) {
                return invalid(format!("class '{}' has a negative attribute", class.key));
            }
        }

        if self.bestiary.roster.is_empty() {
            return invalid("the bestiary roster is empty");
        }
        if !self.bestiary.roster.iter().any(|template| template.unlock_at <= 0.0) {
            return invalid("at least one roster monster must be unlocked from the start");
        }
        let templates = self
            .bestiary
            .roster
            .iter()
            .chain([&self.bestiary.wanderer, &self.bestiary.key_holder, &self.bestiary.boss]);
        for template in templates {
            if template.hp <= 0 || template.damage < 0 {
                return invalid(format!("monster '{}' has invalid stats", template.name));
            }
            if template.currency_min > template.currency_max {
                return invalid(format!("monster '{}' has an inverted reward", template.name));
            }
        }

        for entry in &self.shop {
            match entry {
                ShopEntry::Item { item: Item::Weapon(weapon) } => check_weapon(weapon)?,
                ShopEntry::Item { item: Item::Armor(armor) } => check_armor(armor)?,
                _ => {}
            }
        }

        let rules = &self.rules;
        if rules.experience_to_next == 0 {
            return invalid("experience_to_next must be positive");
        }
        if !(0.0..=1.0).contains(&rules.exit_open_chance) {
            return invalid("exit_open_chance must be a probability");
        }
        if rules.message_log_capacity == 0 {
            return invalid("message_log_capacity must be positive");
        }
        Ok(())
    }
}

impl Default for ContentPack {
    fn default() -> Self {
        Self::build_default()
    }
}

fn invalid<T>(message: impl Into<String>) -> Result<T, ContentError> {
    Err(ContentError::Invalid(message.into()))
}

fn check_weapon(weapon: &Weapon) -> Result<(), ContentError> {
    if weapon.min_damage > weapon.max_damage {
        return invalid(format!("weapon '{}' has min_damage above max_damage", weapon.name));
    }
    if weapon.scaling_rank < 0.0 {
        return invalid(format!("weapon '{}' has a negative scaling rank", weapon.name));
    }
    Ok(())
}

fn check_armor(armor: &Armor) -> Result<(), ContentError> {
    if armor.bonus_hp < 0 || armor.bonus_defense < 0 {
        return invalid(format!("armor '{}' has a negative bonus", armor.name));
    }
    Ok(())
}

fn weapon(
    name: &str,
    min_damage: i32,
    max_damage: i32,
    scaling_attribute: ScalingAttribute,
    scaling_rank: f32,
    value: u32,
) -> Weapon {
    Weapon { name: name.to_string(), value, min_damage, max_damage, scaling_attribute, scaling_rank }
}

fn armor(name: &str, bonus_hp: i32, bonus_defense: i32, value: u32) -> Armor {
    Armor { name: name.to_string(), value, bonus_hp, bonus_defense }
}

fn potions(count: usize) -> Vec<Item> {
    vec![Item::Potion(default_loot_potion()); count]
}

fn warrior() -> ClassDef {
    ClassDef {
        key: keys::CLASS_WARRIOR.to_string(),
        name: "Warrior".to_string(),
        attributes: Attributes {
            vigor: 10,
            strength: 10,
            dexterity: 10,
            intelligence: 10,
            luck: 5,
            defense: 0,
        },
        weapon: weapon("Rusty Sword", 5, 8, ScalingAttribute::Strength, 0.8, 0),
        armor: armor("Cloth Rags", 0, 1, 0),
        inventory: potions(1),
        currency: 100,
    }
}

fn rogue() -> ClassDef {
    ClassDef {
        key: keys::CLASS_ROGUE.to_string(),
        name: "Rogue".to_string(),
        attributes: Attributes {
            vigor: 8,
            strength: 6,
            dexterity: 14,
            intelligence: 8,
            luck: 10,
            defense: 0,
        },
        weapon: weapon("Worn Dagger", 4, 7, ScalingAttribute::Dexterity, 1.0, 0),
        armor: armor("Leather Vest", 10, 1, 0),
        inventory: potions(2),
        currency: 80,
    }
}

fn mage() -> ClassDef {
    ClassDef {
        key: keys::CLASS_MAGE.to_string(),
        name: "Mage".to_string(),
        attributes: Attributes {
            vigor: 7,
            strength: 4,
            dexterity: 8,
            intelligence: 15,
            luck: 6,
            defense: 0,
        },
        weapon: weapon("Apprentice Staff", 3, 9, ScalingAttribute::Intelligence, 1.2, 0),
        armor: armor("Robe", 0, 0, 0),
        inventory: potions(2),
        currency: 120,
    }
}

fn template(
    name: &str,
    unlock_at: f64,
    hp: i32,
    damage: i32,
    experience: u32,
    currency: (u32, u32),
) -> MonsterTemplate {
    MonsterTemplate {
        name: name.to_string(),
        unlock_at,
        hp,
        damage,
        experience,
        currency_min: currency.0,
        currency_max: currency.1,
    }
}

fn default_bestiary() -> Bestiary {
    Bestiary {
        roster: vec![
            template("Goblin", 0.0, 25, 6, 25, (5, 15)),
            template("Slime", 0.0, 20, 5, 20, (4, 10)),
            template("Bat", 1.0, 18, 7, 22, (5, 12)),
            template("Skeleton", 3.0, 40, 9, 40, (10, 20)),
            template("Orc", 6.0, 60, 12, 60, (15, 30)),
            template("Demon", 10.0, 90, 16, 100, (25, 45)),
        ],
        wanderer: template("Wanderer", 0.0, 25, 6, 25, (5, 15)),
        key_holder: template("Key Warden", 0.0, 80, 15, 150, (80, 80)),
        boss: template("Floor Overlord", 0.0, 250, 25, 500, (300, 300)),
    }
}

fn default_shop() -> Vec<ShopEntry> {
    let stock = |item: Item| ShopEntry::Item { item };
    vec![
        stock(Item::Potion(Potion {
            name: "Large Potion".to_string(),
            value: 50,
            heal_amount: 100,
        })),
        stock(Item::Weapon(weapon("Katana", 12, 18, ScalingAttribute::Dexterity, 1.2, 200))),
        stock(Item::Weapon(weapon(
            "Gilded Katana",
            20,
            28,
            ScalingAttribute::Dexterity,
            1.8,
            550,
        ))),
        stock(Item::Weapon(weapon(
            "Shojin's Lost Katana",
            30,
            48,
            ScalingAttribute::Dexterity,
            2.1,
            950,
        ))),
        stock(Item::Weapon(weapon("War Hammer", 15, 25, ScalingAttribute::Strength, 1.2, 250))),
        stock(Item::Weapon(weapon(
            "Demon's Greathammer",
            35,
            55,
            ScalingAttribute::Strength,
            2.0,
            1100,
        ))),
        stock(Item::Weapon(weapon(
            "Magic Staff",
            10,
            30,
            ScalingAttribute::Intelligence,
            1.5,
            300,
        ))),
        stock(Item::Armor(armor("Knight's Plate", 50, 5, 400))),
        stock(Item::Armor(armor("Dragon Hide", 100, 10, 1000))),
        ShopEntry::FlatUpgrade { price: 500 },
    ]
}
