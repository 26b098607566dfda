use super::support::*;

fn enter_fight<S: ScoreSink>(session: &mut Session<'_, S>, occupants: Vec<Monster>) {
    prepare_room(session, Direction::North, occupants);
    session.handle(Command::Move(Direction::North)).expect("enter");
    assert_eq!(session.state(), RunState::Combat);
}

#[test]
fn non_lethal_round_against_ten_damage_leaves_ninety() {
    let content = ContentPack::default();
    let mut session = started(&content);
    bare_defense(&mut session);
    assert_eq!(session.player().expect("player").max_hp, 100);
    enter_fight(&mut session, vec![monster("Troll", 10_000, 10)]);

    session.handle(Command::Combat(CombatAction::Attack)).expect("attack");
    assert_eq!(session.player().expect("player").current_hp, 90);
    assert_eq!(session.state(), RunState::Combat);
}

#[test]
fn unaffordable_flee_keeps_everything() {
    let content = ContentPack::classic();
    let mut session = started(&content);
    run_mut(&mut session).player.currency = 40;
    enter_fight(&mut session, vec![monster("Orc", 500, 1)]);
    let hp = session.player().expect("player").current_hp;

    let outcome = session.handle(Command::Combat(CombatAction::Flee)).expect("flee");
    assert_eq!(outcome, CommandOutcome::Rejected(Rejection::FleeUnaffordable { cost: 50 }));
    let player = session.player().expect("player");
    assert_eq!(player.currency, 40);
    assert_eq!(player.current_hp, hp);
    assert_eq!(session.state(), RunState::Combat);
    assert_eq!(session.occupants().len(), 1);
}

#[test]
fn paid_flee_empties_the_room_and_unlocks_it() {
    let content = ContentPack::default();
    let mut session = started(&content);
    enter_fight(&mut session, vec![monster("Orc", 500, 1), monster("Orc", 500, 1)]);

    session.handle(Command::Combat(CombatAction::Flee)).expect("flee");
    assert_eq!(session.state(), RunState::Explore);
    assert_eq!(session.player().expect("player").currency, 0);
    assert!(session.occupants().is_empty());
    session.handle(Command::Move(Direction::South)).expect("leave");
    assert_eq!(session.player().expect("player").position, GridPos::ORIGIN);
}

#[test]
fn boss_kill_ends_timed_run_in_victory_and_records_once() {
    let content = ContentPack::default();
    let mut session = started(&content);
    session.advance_clock(Duration::from_secs(90));
    enter_fight(&mut session, vec![boss(1)]);

    session.handle(Command::Combat(CombatAction::Attack)).expect("attack");
    assert_eq!(session.state(), RunState::Victory);

    let player = session.player().expect("player");
    let records = session.score_sink().records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, RunOutcome::Victory);
    assert_eq!(records[0].level, player.level);
    assert_eq!(records[0].currency, player.currency);
    assert!((records[0].duration - 1.5).abs() < 1e-9);
    assert!(player.pending_level_ups > 0, "boss kill skips the level-up screen");

    session.handle(Command::ReturnToMenu).expect("menu");
    assert_eq!(session.state(), RunState::Menu);
    assert_eq!(session.score_sink().records().len(), 1);
}

#[test]
fn level_up_returns_to_combat_while_occupants_remain() {
    let content = ContentPack::default();
    let mut session = started(&content);
    let weak = Monster { experience_reward: 100, ..monster("Imp", 1, 1) };
    enter_fight(&mut session, vec![weak, monster("Brute", 10_000, 1)]);

    session.handle(Command::Combat(CombatAction::Attack)).expect("attack");
    assert_eq!(session.state(), RunState::LevelUp);
    let hp_before = session.player().expect("player").current_hp;

    let err = session.handle(Command::Combat(CombatAction::Attack)).expect_err("level screen");
    assert!(matches!(err, SessionError::NotAllowed { state: RunState::LevelUp, .. }));

    session.handle(Command::ChooseAttribute(Attribute::Strength)).expect("choose");
    let player = session.player().expect("player");
    assert_eq!(player.attributes.strength, 12);
    assert_eq!(player.attributes.vigor, 11);
    assert_eq!(player.current_hp, player.max_hp);
    assert!(player.current_hp >= hp_before);
    assert_eq!(session.state(), RunState::Combat);
    assert_eq!(session.occupants().len(), 1);
}

#[test]
fn several_thresholds_keep_the_level_screen_open() {
    let content = ContentPack::default();
    let mut session = started(&content);
    let rich = Monster { experience_reward: 250, ..monster("Hoard", 1, 1) };
    enter_fight(&mut session, vec![rich]);

    session.handle(Command::Combat(CombatAction::Attack)).expect("attack");
    assert_eq!(session.state(), RunState::LevelUp);
    session.handle(Command::ChooseAttribute(Attribute::Luck)).expect("first");
    assert_eq!(session.state(), RunState::LevelUp);
    session.handle(Command::ChooseAttribute(Attribute::Vigor)).expect("second");
    assert_eq!(session.state(), RunState::Explore);
    assert_eq!(session.player().expect("player").level, 3);
}

#[test]
fn death_records_a_defeat() {
    let content = ContentPack::default();
    let mut session = started(&content);
    run_mut(&mut session).player.current_hp = 5;
    enter_fight(&mut session, vec![monster("Ogre", 10_000, 50)]);

    session.handle(Command::Combat(CombatAction::Attack)).expect("attack");
    assert_eq!(session.state(), RunState::Defeated);
    assert_eq!(session.score_sink().records()[0].outcome, RunOutcome::Defeat);
    assert!(session.log().iter().any(|event| *event == LogEvent::PlayerDied));

    let err = session.handle(Command::Move(Direction::South)).expect_err("dead");
    assert!(matches!(err, SessionError::NotAllowed { state: RunState::Defeated, .. }));
}

#[test]
fn failing_score_sink_never_blocks_the_end_state() {
    let content = ContentPack::default();
    let mut session = Session::new(&content, SEED, BrokenSink);
    session.handle(Command::ConfirmStart).expect("start");
    enter_fight(&mut session, vec![boss(1)]);

    session.handle(Command::Combat(CombatAction::Attack)).expect("attack");
    assert_eq!(session.state(), RunState::Victory);
    assert_eq!(session.log().latest(), Some(&LogEvent::ScoreNotSaved));
    assert!(session.last_record().is_some());
}

#[test]
fn heal_without_potions_is_rejected_and_logged() {
    let content = ContentPack::default();
    let mut session = started(&content);
    run_mut(&mut session).player.inventory.clear();
    enter_fight(&mut session, vec![monster("Bat", 500, 5)]);
    let before = session.player().expect("player").current_hp;

    let outcome = session.handle(Command::Combat(CombatAction::Heal)).expect("heal");
    assert_eq!(outcome, CommandOutcome::Rejected(Rejection::NoPotions));
    assert_eq!(session.player().expect("player").current_hp, before);
    assert_eq!(session.log().latest(), Some(&LogEvent::NoPotions));
}

#[test]
fn classic_boss_opens_the_next_floor() {
    let content = ContentPack::classic();
    let mut session = started(&content);
    run_mut(&mut session).player.has_boss_key = true;
    enter_fight(&mut session, vec![boss(1)]);

    session.handle(Command::Combat(CombatAction::Attack)).expect("attack");
    assert_eq!(session.state(), RunState::NextFloor);
    assert!(session.score_sink().records().is_empty());

    session.handle(Command::ConfirmStart).expect("descend");
    assert_eq!(session.floor(), Some(2));
    let player = session.player().expect("player");
    assert_eq!(player.position, GridPos::ORIGIN);
    assert!(!player.has_boss_key);
    assert_eq!(session.map().expect("map").len(), 1);
    assert_eq!(session.state(), RunState::LevelUp);

    let pending = player.pending_level_ups;
    for _ in 0..pending {
        session.handle(Command::ChooseAttribute(Attribute::Dexterity)).expect("spend");
    }
    assert_eq!(session.state(), RunState::Explore);
    assert!(session.log().iter().any(|event| *event == LogEvent::Descended { floor: 2 }));
}
