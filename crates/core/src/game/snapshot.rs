//! Read-only view handed to renderers and the headless CLI.

use serde::Serialize;

use super::*;
use crate::entity::Attributes;
use crate::map::Room;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: RunState,
    pub selected_class: String,
    pub floor: Option<u32>,
    pub elapsed_minutes: f64,
    pub player: Option<PlayerView>,
    /// Generated rooms within the view radius of the player.
    pub rooms: Vec<RoomView>,
    pub occupants: Vec<MonsterView>,
    pub log: Vec<String>,
    pub shop: Vec<ShopEntryView>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerView {
    pub class_name: String,
    pub level: u32,
    pub experience: u32,
    pub experience_to_next: u32,
    pub pending_level_ups: u32,
    pub current_hp: i32,
    pub max_hp: i32,
    pub total_defense: i32,
    pub currency: u32,
    pub potions: usize,
    pub weapon: String,
    pub armor: String,
    pub attributes: Attributes,
    pub position: GridPos,
    pub has_boss_key: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RoomView {
    pub coord: GridPos,
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
    pub visited: bool,
    pub occupied: bool,
    pub current: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonsterView {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub damage: i32,
    pub boss: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShopEntryView {
    pub index: usize,
    pub label: String,
    pub price: u32,
    pub affordable: bool,
}

impl RoomView {
    fn from_room(room: &Room, player_at: GridPos) -> Self {
        Self {
            coord: room.coord,
            north: room.exits.is_open(Direction::North),
            south: room.exits.is_open(Direction::South),
            east: room.exits.is_open(Direction::East),
            west: room.exits.is_open(Direction::West),
            visited: room.visited,
            occupied: room.is_locked(),
            current: room.coord == player_at,
        }
    }
}

impl<S: ScoreSink> Session<'_, S> {
    pub fn snapshot(&self) -> SessionSnapshot {
        let rules = &self.content.rules;
        let player = self.player();
        let currency = player.map_or(0, |player| player.currency);

        let rooms = match self.run.as_ref() {
            Some(run) => run
                .map
                .window(run.player.position, rules.view_radius)
                .map(|room| RoomView::from_room(room, run.player.position))
                .collect(),
            None => Vec::new(),
        };
        let occupants = self
            .occupants()
            .iter()
            .map(|monster| MonsterView {
                name: monster.name.clone(),
                hp: monster.hp,
                max_hp: monster.max_hp,
                damage: monster.damage,
                boss: monster.is_boss(),
            })
            .collect();
        let shop = self
            .content
            .shop
            .iter()
            .enumerate()
            .map(|(index, entry)| ShopEntryView {
                index,
                label: entry.label(rules.upgrade_damage_bonus),
                price: entry.price(),
                affordable: player.is_some() && currency >= entry.price(),
            })
            .collect();

        SessionSnapshot {
            state: self.state,
            selected_class: self.selected_class().to_string(),
            floor: self.floor(),
            elapsed_minutes: self.elapsed().as_secs_f64() / 60.0,
            player: player.map(player_view),
            rooms,
            occupants,
            log: self.log.iter().map(ToString::to_string).collect(),
            shop,
        }
    }
}

fn player_view(player: &Character) -> PlayerView {
    PlayerView {
        class_name: player.class_name.clone(),
        level: player.level,
        experience: player.experience,
        experience_to_next: player.experience_to_next,
        pending_level_ups: player.pending_level_ups,
        current_hp: player.current_hp,
        max_hp: player.max_hp,
        total_defense: player.total_defense,
        currency: player.currency,
        potions: player.potion_count(),
        weapon: format!(
            "{} {}-{} [{}: {}]",
            player.weapon.name,
            player.weapon.min_damage,
            player.weapon.max_damage,
            player.weapon.scaling_attribute.attribute().short_label(),
            player.weapon.grade()
        ),
        armor: player.armor.name.clone(),
        attributes: player.attributes,
        position: player.position,
        has_boss_key: player.has_boss_key,
    }
}
