//! Sparse room grid for one floor. Rooms appear on first entry and never change shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::Monster;
use crate::rng::RandomSource;
use crate::types::{Direction, GridPos};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("no room has been generated at {0}")]
    NotFound(GridPos),
}

/// Openness of the four walls, indexed N/S/E/W.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Exits([bool; 4]);

impl Exits {
    pub const ALL_OPEN: Exits = Exits([true; 4]);

    pub fn is_open(self, direction: Direction) -> bool {
        self.0[direction.index()]
    }

    pub fn set(&mut self, direction: Direction, open: bool) {
        self.0[direction.index()] = open;
    }

    pub fn open_count(self) -> usize {
        self.0.iter().filter(|open| **open).count()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Room {
    pub coord: GridPos,
    pub exits: Exits,
    /// Attack order: the head is always the target.
    pub occupants: Vec<Monster>,
    pub visited: bool,
}

impl Room {
    /// Exits stay sealed while anything hostile remains inside.
    pub fn is_locked(&self) -> bool {
        !self.occupants.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct DungeonMap {
    rooms: BTreeMap<GridPos, Room>,
    exit_open_chance: f64,
}

impl DungeonMap {
    /// A map holding only the origin: fully open, empty, already visited.
    pub fn new(exit_open_chance: f64) -> Self {
        let origin = Room {
            coord: GridPos::ORIGIN,
            exits: Exits::ALL_OPEN,
            occupants: Vec::new(),
            visited: true,
        };
        Self { rooms: BTreeMap::from([(GridPos::ORIGIN, origin)]), exit_open_chance }
    }

    /// Generates the room at `coord` if it does not exist yet; returns whether it did.
    ///
    /// `entry_direction` is the direction of travel that leads into the room, so the
    /// wall facing back along it is forced open. Walls shared with any other generated
    /// neighbor copy that neighbor's side. Exits are rolled before `populate` runs.
    pub fn ensure_room<R, F>(
        &mut self,
        coord: GridPos,
        entry_direction: Direction,
        rng: &mut R,
        populate: F,
    ) -> bool
    where
        R: RandomSource + ?Sized,
        F: FnOnce(&mut R) -> Vec<Monster>,
    {
        if self.rooms.contains_key(&coord) {
            return false;
        }

        let mut exits = Exits::default();
        for direction in Direction::ALL {
            exits.set(direction, rng.chance(self.exit_open_chance));
        }
        for direction in Direction::ALL {
            if let Some(neighbor) = self.rooms.get(&coord.step(direction)) {
                exits.set(direction, neighbor.exits.is_open(direction.opposite()));
            }
        }
        exits.set(entry_direction.opposite(), true);

        let occupants = populate(rng);
        self.rooms.insert(coord, Room { coord, exits, occupants, visited: false });
        true
    }

    pub fn get_room(&self, coord: GridPos) -> Result<&Room, MapError> {
        self.rooms.get(&coord).ok_or(MapError::NotFound(coord))
    }

    pub fn get_room_mut(&mut self, coord: GridPos) -> Result<&mut Room, MapError> {
        self.rooms.get_mut(&coord).ok_or(MapError::NotFound(coord))
    }

    pub fn contains(&self, coord: GridPos) -> bool {
        self.rooms.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    /// Generated rooms within `radius` (Chebyshev) of `center`, in coordinate order.
    pub fn window(&self, center: GridPos, radius: u32) -> impl Iterator<Item = &Room> {
        self.rooms.values().filter(move |room| room.coord.chebyshev(center) <= radius)
    }
}
