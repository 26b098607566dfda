//! Decides what waits inside a freshly generated room.

use serde::{Deserialize, Serialize};

use crate::content::{Bestiary, MonsterTemplate, RunRules};
use crate::entity::{Monster, MonsterRole};
use crate::rng::RandomSource;
use crate::types::GridPos;

const DISTANCE_ENCOUNTER_CHANCE: f64 = 0.6;
const DISTANCE_BOSS_CHANCE: f64 = 0.10;
const DISTANCE_BOSS_MIN: f64 = 12.0;
const DISTANCE_KEY_HOLDER_CHANCE: f64 = 0.15;
const DISTANCE_KEY_HOLDER_MIN: f64 = 6.0;

const TIME_SPAWN_BASE: f64 = 0.6;
const TIME_SPAWN_PER_MINUTE: f64 = 0.035;
const TIME_SPAWN_CAP: f64 = 0.95;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterPolicy {
    /// Single occupants scaled by distance from the origin; key holders gate the boss.
    DistanceScaled,
    /// Groups of occupants scaled by elapsed run time; one boss after a time threshold.
    TimeScaled,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EncounterContext {
    pub coord: GridPos,
    pub elapsed_minutes: f64,
    pub floor: u32,
    pub boss_spawned: bool,
    pub has_boss_key: bool,
}

pub fn floor_multiplier(floor: u32) -> f64 {
    1.0 + f64::from(floor.saturating_sub(1)) * 0.2
}

pub fn distance_scale(distance: f64, floor: u32) -> f64 {
    ((distance / 3.0).floor() + 1.0) * floor_multiplier(floor)
}

pub fn time_scale(minutes: f64, floor: u32) -> f64 {
    (1.0 + (minutes.max(0.0) / 60.0) * 0.25) * floor_multiplier(floor)
}

pub fn spawn_probability(minutes: f64) -> f64 {
    (TIME_SPAWN_BASE + minutes * TIME_SPAWN_PER_MINUTE).clamp(TIME_SPAWN_BASE, TIME_SPAWN_CAP)
}

/// Inclusive bounds on how many occupants a time-scaled room holds.
pub fn occupant_count_range(minutes: f64) -> (i32, i32) {
    if minutes < 2.0 {
        (1, 1)
    } else if minutes < 5.0 {
        (1, 2)
    } else if minutes < 10.0 {
        (1, 3)
    } else {
        (2, 4)
    }
}

pub struct EncounterGenerator<'c> {
    bestiary: &'c Bestiary,
    rules: &'c RunRules,
}

impl<'c> EncounterGenerator<'c> {
    pub fn new(bestiary: &'c Bestiary, rules: &'c RunRules) -> Self {
        Self { bestiary, rules }
    }

    /// Zero or more occupants for the room at `ctx.coord`. The origin is always empty.
    pub fn generate<R: RandomSource + ?Sized>(
        &self,
        ctx: &EncounterContext,
        rng: &mut R,
    ) -> Vec<Monster> {
        if ctx.coord == GridPos::ORIGIN {
            return Vec::new();
        }
        match self.rules.encounter_policy {
            EncounterPolicy::DistanceScaled => self.by_distance(ctx, rng),
            EncounterPolicy::TimeScaled => self.by_time(ctx, rng),
        }
    }

    fn by_distance<R: RandomSource + ?Sized>(
        &self,
        ctx: &EncounterContext,
        rng: &mut R,
    ) -> Vec<Monster> {
        let distance = ctx.coord.distance_from_origin();
        if distance <= 0.0 || !rng.chance(DISTANCE_ENCOUNTER_CHANCE) {
            return Vec::new();
        }
        let scale = distance_scale(distance, ctx.floor);

        let monster = if ctx.has_boss_key
            && distance > DISTANCE_BOSS_MIN
            && rng.chance(DISTANCE_BOSS_CHANCE)
        {
            self.bestiary.boss.spawn(MonsterRole::Boss, scale, rng)
        } else if !ctx.has_boss_key
            && distance > DISTANCE_KEY_HOLDER_MIN
            && rng.chance(DISTANCE_KEY_HOLDER_CHANCE)
        {
            self.bestiary.key_holder.spawn(MonsterRole::KeyHolder, scale, rng)
        } else {
            let name = rng
                .pick_index(self.bestiary.roster.len())
                .map(|index| self.bestiary.roster[index].name.clone());
            let mut monster = self.bestiary.wanderer.spawn(MonsterRole::Normal, scale, rng);
            if let Some(name) = name {
                monster.name = name;
            }
            monster
        };
        vec![monster]
    }

    fn by_time<R: RandomSource + ?Sized>(
        &self,
        ctx: &EncounterContext,
        rng: &mut R,
    ) -> Vec<Monster> {
        let minutes = ctx.elapsed_minutes.max(0.0);
        let scale = time_scale(minutes, ctx.floor);

        if !ctx.boss_spawned && minutes >= self.rules.boss_after_minutes {
            return vec![self.bestiary.boss.spawn(MonsterRole::Boss, scale, rng)];
        }
        if !rng.chance(spawn_probability(minutes)) {
            return Vec::new();
        }

        let eligible: Vec<&MonsterTemplate> =
            self.bestiary.roster.iter().filter(|template| template.unlock_at <= minutes).collect();
        let (min, max) = occupant_count_range(minutes);
        let count = rng.range_inclusive(min, max);

        let mut occupants = Vec::with_capacity(count.max(0) as usize);
        for _ in 0..count {
            let Some(index) = rng.pick_index(eligible.len()) else {
                break;
            };
            occupants.push(eligible[index].spawn(MonsterRole::Normal, scale, rng));
        }
        occupants
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentPack;
    use crate::test_support::ScriptedRng;

    fn context(x: i32, y: i32) -> EncounterContext {
        EncounterContext {
            coord: GridPos::new(x, y),
            elapsed_minutes: 0.0,
            floor: 1,
            boss_spawned: false,
            has_boss_key: false,
        }
    }

    #[test]
    fn spawn_probability_is_clamped() {
        assert!((spawn_probability(0.0) - 0.6).abs() < 1e-9);
        assert!((spawn_probability(4.0) - 0.74).abs() < 1e-9);
        assert!((spawn_probability(60.0) - 0.95).abs() < 1e-9);
        assert!((spawn_probability(-3.0) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn occupant_bands_follow_elapsed_time() {
        assert_eq!(occupant_count_range(0.5), (1, 1));
        assert_eq!(occupant_count_range(2.0), (1, 2));
        assert_eq!(occupant_count_range(7.5), (1, 3));
        assert_eq!(occupant_count_range(10.0), (2, 4));
    }

    #[test]
    fn distance_scale_steps_every_three_rooms_and_per_floor() {
        assert!((distance_scale(2.9, 1) - 1.0).abs() < 1e-9);
        assert!((distance_scale(3.0, 1) - 2.0).abs() < 1e-9);
        assert!((distance_scale(1.0, 3) - 1.4).abs() < 1e-9);
    }

    #[test]
    fn origin_never_spawns() {
        for content in [ContentPack::default(), ContentPack::classic()] {
            let generator = EncounterGenerator::new(&content.bestiary, &content.rules);
            let mut ctx = context(0, 0);
            ctx.elapsed_minutes = 30.0;
            assert!(generator.generate(&ctx, &mut ScriptedRng::zeros()).is_empty());
        }
    }

    #[test]
    fn distance_policy_spawns_a_single_scaled_wanderer() {
        let content = ContentPack::classic();
        let generator = EncounterGenerator::new(&content.bestiary, &content.rules);
        let occupants = generator.generate(&context(1, 0), &mut ScriptedRng::zeros());
        assert_eq!(occupants.len(), 1);
        let monster = &occupants[0];
        assert_eq!(monster.role, MonsterRole::Normal);
        assert_eq!(monster.name, "Goblin");
        assert_eq!((monster.hp, monster.damage, monster.experience_reward), (25, 6, 25));
        assert_eq!(monster.currency_reward, 5);
    }

    #[test]
    fn distance_policy_names_ignore_unlock_thresholds() {
        let content = ContentPack::classic();
        let generator = EncounterGenerator::new(&content.bestiary, &content.rules);
        // Encounter roll passes, then the last roster slot is picked.
        let mut rng = ScriptedRng::new(vec![0, 5]);
        let occupants = generator.generate(&context(1, 0), &mut rng);
        assert_eq!(occupants[0].name, "Demon");
        assert_eq!(occupants[0].hp, content.bestiary.wanderer.hp);
    }

    #[test]
    fn distance_policy_spawns_key_holder_far_out_without_key() {
        let content = ContentPack::classic();
        let generator = EncounterGenerator::new(&content.bestiary, &content.rules);
        let occupants = generator.generate(&context(7, 0), &mut ScriptedRng::zeros());
        assert_eq!(occupants.len(), 1);
        assert!(occupants[0].is_key_holder());
        // distance 7 -> scale 3
        assert_eq!(occupants[0].hp, 240);
    }

    #[test]
    fn distance_policy_spawns_boss_only_with_key() {
        let content = ContentPack::classic();
        let generator = EncounterGenerator::new(&content.bestiary, &content.rules);
        let mut ctx = context(13, 0);
        ctx.has_boss_key = true;
        let occupants = generator.generate(&ctx, &mut ScriptedRng::zeros());
        assert!(occupants[0].is_boss());
    }

    #[test]
    fn distance_policy_can_leave_rooms_empty() {
        let content = ContentPack::classic();
        let generator = EncounterGenerator::new(&content.bestiary, &content.rules);
        assert!(generator.generate(&context(2, 2), &mut ScriptedRng::highs()).is_empty());
    }

    #[test]
    fn time_policy_spawns_boss_once_threshold_passes() {
        let content = ContentPack::default();
        let generator = EncounterGenerator::new(&content.bestiary, &content.rules);
        let mut ctx = context(1, 1);
        ctx.elapsed_minutes = content.rules.boss_after_minutes;
        let occupants = generator.generate(&ctx, &mut ScriptedRng::highs());
        assert_eq!(occupants.len(), 1);
        assert!(occupants[0].is_boss());

        ctx.boss_spawned = true;
        let occupants = generator.generate(&ctx, &mut ScriptedRng::zeros());
        assert!(occupants.iter().all(|monster| !monster.is_boss()));
    }

    #[test]
    fn time_policy_only_uses_unlocked_tiers() {
        let content = ContentPack::default();
        let generator = EncounterGenerator::new(&content.bestiary, &content.rules);
        let mut ctx = context(0, 1);
        ctx.elapsed_minutes = 0.5;
        for seed in 0..32_u64 {
            let mut rng = ScriptedRng::new(vec![0, seed, seed * 7 + 1, seed * 13 + 5]);
            for monster in generator.generate(&ctx, &mut rng) {
                assert!(
                    monster.name == "Goblin" || monster.name == "Slime",
                    "{} is not unlocked yet",
                    monster.name
                );
            }
        }
    }

    #[test]
    fn time_policy_late_rooms_hold_groups() {
        let content = ContentPack::default();
        let generator = EncounterGenerator::new(&content.bestiary, &content.rules);
        let mut ctx = context(2, 0);
        ctx.elapsed_minutes = 11.0;
        ctx.boss_spawned = true;
        let occupants = generator.generate(&ctx, &mut ScriptedRng::zeros());
        assert_eq!(occupants.len(), 2);
    }

    #[test]
    fn time_scale_combines_elapsed_time_and_floor() {
        assert!((time_scale(0.0, 1) - 1.0).abs() < 1e-9);
        assert!((time_scale(30.0, 1) - 1.125).abs() < 1e-9);
        assert!((time_scale(30.0, 3) - 1.575).abs() < 1e-9);
    }

    #[test]
    fn time_policy_scales_stats_by_minutes_and_floor() {
        let content = ContentPack::default();
        let generator = EncounterGenerator::new(&content.bestiary, &content.rules);
        let mut ctx = context(1, 0);
        ctx.elapsed_minutes = 30.0;
        ctx.boss_spawned = true;

        let first_floor = generator.generate(&ctx, &mut ScriptedRng::zeros());
        let goblin = &first_floor[0];
        assert_eq!(goblin.name, "Goblin");
        assert_eq!((goblin.hp, goblin.damage, goblin.experience_reward), (28, 6, 28));

        ctx.floor = 3;
        let third_floor = generator.generate(&ctx, &mut ScriptedRng::zeros());
        let goblin = &third_floor[0];
        assert_eq!((goblin.hp, goblin.damage, goblin.experience_reward), (39, 9, 39));
    }
}
