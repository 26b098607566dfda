use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterRole {
    Normal,
    KeyHolder,
    Boss,
}

/// Stats are fixed when the monster is created; only `hp` changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub damage: i32,
    pub experience_reward: u32,
    pub currency_reward: u32,
    pub role: MonsterRole,
}

impl Monster {
    pub fn is_boss(&self) -> bool {
        self.role == MonsterRole::Boss
    }

    pub fn is_key_holder(&self) -> bool {
        self.role == MonsterRole::KeyHolder
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Returns `true` when the hit was lethal.
    pub fn take_hit(&mut self, damage: i32) -> bool {
        self.hp -= damage;
        !self.is_alive()
    }
}
