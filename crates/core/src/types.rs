use std::fmt;

use serde::{Deserialize, Serialize};

/// Room coordinate on the dungeon grid. North is `y + 1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const ORIGIN: GridPos = GridPos { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self { x: self.x + dx, y: self.y + dy }
    }

    pub fn distance_from_origin(self) -> f64 {
        f64::from(self.x).hypot(f64::from(self.y))
    }

    pub fn chebyshev(self, other: GridPos) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::North, Direction::South, Direction::East, Direction::West];

    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::South => (0, -1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::South => 1,
            Self::East => 2,
            Self::West => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Vigor,
    Strength,
    Dexterity,
    Intelligence,
    Luck,
    Defense,
}

impl Attribute {
    pub const ALL: [Attribute; 6] = [
        Attribute::Vigor,
        Attribute::Strength,
        Attribute::Dexterity,
        Attribute::Intelligence,
        Attribute::Luck,
        Attribute::Defense,
    ];

    pub fn short_label(self) -> &'static str {
        match self {
            Self::Vigor => "VIG",
            Self::Strength => "STR",
            Self::Dexterity => "DEX",
            Self::Intelligence => "INT",
            Self::Luck => "LCK",
            Self::Defense => "DEF",
        }
    }
}

/// The attributes a weapon may scale its bonus damage from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingAttribute {
    Strength,
    Dexterity,
    Intelligence,
}

impl ScalingAttribute {
    pub fn attribute(self) -> Attribute {
        match self {
            Self::Strength => Attribute::Strength,
            Self::Dexterity => Attribute::Dexterity,
            Self::Intelligence => Attribute::Intelligence,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatAction {
    Attack,
    Heal,
    Flee,
}

/// Already-decoded player input. The core never reads a device directly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Move(Direction),
    OpenShop,
    CloseShop,
    Purchase(usize),
    Combat(CombatAction),
    ChooseAttribute(Attribute),
    SelectClass(String),
    ConfirmStart,
    ReturnToMenu,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunState {
    Menu,
    Explore,
    Combat,
    Shop,
    LevelUp,
    NextFloor,
    Victory,
    Defeated,
}

impl RunState {
    pub fn run_active(self) -> bool {
        !matches!(self, Self::Menu)
    }

    pub fn clock_running(self) -> bool {
        matches!(self, Self::Explore | Self::Combat | Self::Shop | Self::LevelUp)
    }

    pub(crate) fn code(self) -> u8 {
        match self {
            Self::Menu => 0,
            Self::Explore => 1,
            Self::Combat => 2,
            Self::Shop => 3,
            Self::LevelUp => 4,
            Self::NextFloor => 5,
            Self::Victory => 6,
            Self::Defeated => 7,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Victory,
    Defeat,
}

/// How many thresholds one experience grant may cross.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelUpPolicy {
    /// Every crossed threshold becomes a pending level-up.
    #[default]
    Repeated,
    /// At most one level per grant; leftover experience waits for the next grant.
    SingleStep,
}

/// A command that was understood but refused. The session is left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    MovementLocked,
    NoExit,
    NoPotions,
    FleeUnaffordable { cost: u32 },
    InsufficientFunds { price: u32 },
    UnknownShopEntry { index: usize },
    AlreadyInMenu,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    Rejected(Rejection),
    Quit,
}

/// One line of the player-facing message log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogEvent {
    RunStarted { class_name: String, floor: u32 },
    NoDoor,
    DoorsSealed,
    EncounterStarted { names: Vec<String> },
    KeyHolderSensed,
    PlayerHit { target: String, damage: i32, critical: bool },
    MonsterSlain { name: String, currency: u32, experience: u32 },
    LootDropped { item: String },
    BossKeyObtained,
    Retaliation { attackers: usize, damage: i32 },
    PotionDrunk { name: String, healed: i32 },
    NoPotions,
    Fled { cost: u32 },
    FleeUnaffordable { cost: u32 },
    LevelReached { level: u32 },
    AttributesRaised { chosen: Attribute },
    Purchased { name: String },
    WeaponUpgraded { bonus: i32 },
    InsufficientFunds { price: u32 },
    BossDefeated { name: String },
    Descended { floor: u32 },
    PlayerDied,
    RunRecorded { score: u64 },
    ScoreNotSaved,
    AlreadyInMenu,
    ReturnedToMenu,
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RunStarted { class_name, floor } => {
                write!(f, "The {class_name} enters floor {floor}.")
            }
            Self::NoDoor => write!(f, "There is no door that way."),
            Self::DoorsSealed => write!(f, "The doors are sealed. Fight!"),
            Self::EncounterStarted { names } => write!(f, "Combat: {}!", names.join(", ")),
            Self::KeyHolderSensed => write!(f, "You sense the presence of the Key Warden."),
            Self::PlayerHit { target, damage, critical: true } => {
                write!(f, "You hit {target} for {damage} (CRIT!).")
            }
            Self::PlayerHit { target, damage, critical: false } => {
                write!(f, "You hit {target} for {damage}.")
            }
            Self::MonsterSlain { name, currency, experience } => {
                write!(f, "{name} falls. +{currency} gold, +{experience} xp.")
            }
            Self::LootDropped { item } => write!(f, "Drop: {item}!"),
            Self::BossKeyObtained => write!(f, ">>> You hold the boss key! <<<"),
            Self::Retaliation { attackers: 1, damage } => {
                write!(f, "The enemy strikes you for {damage}.")
            }
            Self::Retaliation { attackers, damage } => {
                write!(f, "{attackers} enemies strike you for {damage} in total.")
            }
            Self::PotionDrunk { name, healed } => write!(f, "You drink {name} (+{healed} hp)."),
            Self::NoPotions => write!(f, "You have no potions!"),
            Self::Fled { cost } => write!(f, "You fled (-{cost} gold)."),
            Self::FleeUnaffordable { cost } => write!(f, "You need {cost} gold to flee!"),
            Self::LevelReached { level } => write!(f, "Level {level} reached!"),
            Self::AttributesRaised { chosen } => {
                write!(f, "Level up! All attributes +1, {} +2.", chosen.short_label())
            }
            Self::Purchased { name } => write!(f, "Bought {name}."),
            Self::WeaponUpgraded { bonus } => write!(f, "Weapon upgraded: +{bonus} damage."),
            Self::InsufficientFunds { price } => write!(f, "Not enough gold ({price} needed)."),
            Self::BossDefeated { name } => write!(f, "{name} is defeated!"),
            Self::Descended { floor } => write!(f, "Welcome to floor {floor}."),
            Self::PlayerDied => write!(f, "You have died."),
            Self::RunRecorded { score } => write!(f, "Run recorded with score {score}."),
            Self::ScoreNotSaved => write!(f, "The run could not be recorded."),
            Self::AlreadyInMenu => write!(f, "You are already at the menu."),
            Self::ReturnedToMenu => write!(f, "Back at the menu."),
        }
    }
}
