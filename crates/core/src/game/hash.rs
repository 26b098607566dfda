//! Stable snapshot hashing for deterministic verification.
//! It does not own replay execution or journal persistence.

use std::hash::Hasher;

use xxhash_rust::xxh3::Xxh3;

use super::*;

impl<S: ScoreSink> Session<'_, S> {
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u8(self.state.code());
        hasher.write_u64(self.selected_class as u64);
        hasher.write_u64(self.commands_applied);

        if let Some(run) = self.run.as_ref() {
            hasher.write_u32(run.floor);
            hasher.write_u128(run.elapsed.as_millis());
            hasher.write_u8(u8::from(run.boss_spawned));
            write_player(&mut hasher, &run.player);

            hasher.write_usize(run.map.len());
            for room in run.map.rooms() {
                hasher.write_i32(room.coord.x);
                hasher.write_i32(room.coord.y);
                for direction in Direction::ALL {
                    hasher.write_u8(u8::from(room.exits.is_open(direction)));
                }
                hasher.write_u8(u8::from(room.visited));
                hasher.write_usize(room.occupants.len());
                for monster in &room.occupants {
                    hasher.write(monster.name.as_bytes());
                    hasher.write_i32(monster.hp);
                    hasher.write_i32(monster.damage);
                }
            }
        }
        hasher.finish()
    }
}

fn write_player(hasher: &mut Xxh3, player: &Character) {
    for attribute in Attribute::ALL {
        hasher.write_i32(player.attributes.get(attribute));
    }
    hasher.write_i32(player.current_hp);
    hasher.write_i32(player.max_hp);
    hasher.write_i32(player.total_defense);
    hasher.write_u32(player.level);
    hasher.write_u32(player.experience);
    hasher.write_u32(player.pending_level_ups);
    hasher.write_u32(player.currency);
    hasher.write_i32(player.position.x);
    hasher.write_i32(player.position.y);
    hasher.write_u8(u8::from(player.has_boss_key));
    hasher.write(player.weapon.name.as_bytes());
    hasher.write_i32(player.weapon.min_damage);
    hasher.write_i32(player.weapon.max_damage);
    hasher.write(player.armor.name.as_bytes());
    hasher.write_usize(player.inventory.len());
}
