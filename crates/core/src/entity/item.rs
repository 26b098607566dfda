use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::ScalingAttribute;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub value: u32,
    pub min_damage: i32,
    pub max_damage: i32,
    pub scaling_attribute: ScalingAttribute,
    pub scaling_rank: f32,
}

impl Weapon {
    pub fn grade(&self) -> WeaponGrade {
        WeaponGrade::from_rank(self.scaling_rank)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponGrade {
    S,
    A,
    B,
    C,
}

impl WeaponGrade {
    pub fn from_rank(rank: f32) -> Self {
        if rank >= 1.8 {
            Self::S
        } else if rank >= 1.4 {
            Self::A
        } else if rank >= 1.0 {
            Self::B
        } else {
            Self::C
        }
    }
}

impl fmt::Display for WeaponGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        };
        f.write_str(letter)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Armor {
    pub name: String,
    pub value: u32,
    pub bonus_hp: i32,
    pub bonus_defense: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Potion {
    pub name: String,
    pub value: u32,
    pub heal_amount: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Item {
    Weapon(Weapon),
    Armor(Armor),
    Potion(Potion),
}

impl Item {
    pub fn name(&self) -> &str {
        match self {
            Self::Weapon(weapon) => &weapon.name,
            Self::Armor(armor) => &armor.name,
            Self::Potion(potion) => &potion.name,
        }
    }

    pub fn value(&self) -> u32 {
        match self {
            Self::Weapon(weapon) => weapon.value,
            Self::Armor(armor) => armor.value,
            Self::Potion(potion) => potion.value,
        }
    }
}
