//! Value types for equipment, the player character and monsters.

mod character;
mod item;
mod monster;

pub use character::{AttackRoll, Attributes, Character};
pub use item::{Armor, Item, Potion, Weapon, WeaponGrade};
pub use monster::{Monster, MonsterRole};
