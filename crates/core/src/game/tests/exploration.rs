use super::support::*;

#[test]
fn start_places_player_at_open_origin() {
    let content = ContentPack::default();
    let session = started(&content);
    assert_eq!(session.state(), RunState::Explore);
    let player = session.player().expect("player");
    assert_eq!(player.position, GridPos::ORIGIN);
    assert_eq!(player.current_hp, player.max_hp);
    let origin = session.map().expect("map").get_room(GridPos::ORIGIN).expect("origin");
    assert!(origin.occupants.is_empty());
    assert_eq!(origin.exits.open_count(), 4);
}

#[test]
fn moving_through_an_open_exit_generates_and_visits_the_room() {
    let content = ContentPack::default();
    let mut session = started(&content);
    let outcome = session.handle(Command::Move(Direction::North)).expect("move");
    assert_eq!(outcome, CommandOutcome::Applied);

    let here = GridPos::new(0, 1);
    assert_eq!(session.player().expect("player").position, here);
    let room = session.map().expect("map").get_room(here).expect("generated");
    assert!(room.visited);
    assert!(room.exits.is_open(Direction::South));
}

#[test]
fn closed_exit_is_rejected_without_moving() {
    let content = ContentPack::default();
    let mut session = started(&content);
    let run = run_mut(&mut session);
    let target = GridPos::new(1, 0);
    run.map.ensure_room(target, Direction::East, &mut ScriptedRng::highs(), |_| Vec::new());
    run.player.position = target;
    let before = session.snapshot_hash();

    let outcome = session.handle(Command::Move(Direction::North)).expect("wall");
    assert_eq!(outcome, CommandOutcome::Rejected(Rejection::NoExit));
    assert_eq!(session.player().expect("player").position, target);
    assert_eq!(session.log().latest(), Some(&LogEvent::NoDoor));
    assert_eq!(session.snapshot_hash(), before);
}

#[test]
fn entering_an_occupied_room_starts_combat_with_its_occupants() {
    let content = ContentPack::default();
    let mut session = started(&content);
    let occupants = vec![monster("Goblin", 30, 6), monster("Bat", 18, 7)];
    prepare_room(&mut session, Direction::East, occupants);

    session.handle(Command::Move(Direction::East)).expect("move");
    assert_eq!(session.state(), RunState::Combat);
    let names: Vec<&str> = session.occupants().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Goblin", "Bat"]);
    assert_eq!(
        session.log().latest(),
        Some(&LogEvent::EncounterStarted { names: vec!["Goblin".into(), "Bat".into()] })
    );
}

#[test]
fn first_entry_into_a_key_holder_room_announces_it() {
    let content = ContentPack::classic();
    let mut session = started(&content);
    let warden = Monster { role: MonsterRole::KeyHolder, ..monster("Key Warden", 500, 1) };
    prepare_room(&mut session, Direction::North, vec![warden]);

    session.handle(Command::Move(Direction::North)).expect("move");
    assert_eq!(session.state(), RunState::Combat);
    let events: Vec<&LogEvent> = session.log().iter().collect();
    let sensed = events.iter().position(|event| **event == LogEvent::KeyHolderSensed);
    let started_fight =
        events.iter().position(|event| matches!(event, LogEvent::EncounterStarted { .. }));
    assert!(sensed.is_some(), "no key holder announcement in {events:?}");
    assert!(sensed < started_fight);
    assert_eq!(
        LogEvent::KeyHolderSensed.to_string(),
        "You sense the presence of the Key Warden."
    );
}

#[test]
fn ordinary_rooms_do_not_announce_a_key_holder() {
    let content = ContentPack::classic();
    let mut session = started(&content);
    prepare_room(&mut session, Direction::East, vec![monster("Goblin", 500, 1)]);

    session.handle(Command::Move(Direction::East)).expect("move");
    assert!(session.log().iter().all(|event| *event != LogEvent::KeyHolderSensed));
}

#[test]
fn occupied_room_keeps_its_exits_locked() {
    let content = ContentPack::default();
    let mut session = started(&content);
    prepare_room(&mut session, Direction::West, vec![monster("Slime", 500, 1)]);
    session.handle(Command::Move(Direction::West)).expect("move");

    for direction in Direction::ALL {
        let outcome = session.handle(Command::Move(direction)).expect("locked move");
        assert_eq!(outcome, CommandOutcome::Rejected(Rejection::MovementLocked));
    }
    assert_eq!(session.player().expect("player").position, GridPos::new(-1, 0));
    assert_eq!(session.log().latest(), Some(&LogEvent::DoorsSealed));
    assert_eq!(session.state(), RunState::Combat);
}

#[test]
fn moving_from_the_menu_is_an_error() {
    let content = ContentPack::default();
    let mut session = Session::new(&content, SEED, ScoreBoard::new());
    let err = session.handle(Command::Move(Direction::North)).expect_err("menu move");
    assert_eq!(
        err,
        SessionError::NotAllowed { command: Command::Move(Direction::North), state: RunState::Menu }
    );
}

#[test]
fn revisiting_a_room_does_not_reroll_it() {
    let content = ContentPack::default();
    let mut session = started(&content);
    session.handle(Command::Move(Direction::South)).expect("move");
    if session.state() == RunState::Combat {
        let room = run_mut(&mut session).map.get_room_mut(GridPos::new(0, -1)).expect("room");
        room.occupants.clear();
        session.state = RunState::Explore;
    }
    let first = session.map().expect("map").get_room(GridPos::new(0, -1)).expect("room").clone();

    session.handle(Command::Move(Direction::North)).expect("back");
    session.handle(Command::Move(Direction::South)).expect("again");
    let second = session.map().expect("map").get_room(GridPos::new(0, -1)).expect("room");
    assert_eq!(second.exits, first.exits);
    assert_eq!(session.map().expect("map").len(), 2);
}

#[test]
fn time_scaled_boss_spawns_once_past_threshold() {
    let content = ContentPack::default();
    let mut session = started(&content);
    session.advance_clock(Duration::from_secs(13 * 60));
    session.handle(Command::Move(Direction::East)).expect("move");

    assert_eq!(session.state(), RunState::Combat);
    assert!(session.occupants().iter().any(Monster::is_boss));
    assert!(session.boss_spawned());
}
