use crawler_core::{
    Command, ContentError, ContentPack, EncounterPolicy, RunState, ScoreBoard, Session,
};
use std::fs;
use tempfile::tempdir;

#[test]
fn default_pack_survives_a_trip_through_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("content.toml");
    let pack = ContentPack::classic();
    fs::write(&path, toml::to_string(&pack).unwrap()).unwrap();

    let loaded = ContentPack::load(&path).unwrap();
    assert_eq!(loaded, pack);
    assert_eq!(loaded.rules.encounter_policy, EncounterPolicy::DistanceScaled);
}

#[test]
fn loaded_pack_drives_a_session() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("content.toml");
    let mut pack = ContentPack::default();
    pack.classes.retain(|class| class.key == "rogue");
    fs::write(&path, toml::to_string(&pack).unwrap()).unwrap();

    let loaded = ContentPack::load(&path).unwrap();
    let mut session = Session::new(&loaded, 5, ScoreBoard::new());
    session.handle(Command::ConfirmStart).unwrap();
    assert_eq!(session.state(), RunState::Explore);
    assert_eq!(session.player().unwrap().class_name, "Rogue");
}

#[test]
fn missing_file_reports_its_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    match ContentPack::load(&path) {
        Err(ContentError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected an io error, got {other:?}"),
    }
}

#[test]
fn broken_toml_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("content.toml");
    fs::write(&path, "classes = [ this is not toml").unwrap();
    assert!(matches!(ContentPack::load(&path), Err(ContentError::Parse(_))));
}

#[test]
fn semantically_invalid_pack_is_refused() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("content.toml");
    let mut pack = ContentPack::default();
    pack.rules.exit_open_chance = 1.5;
    fs::write(&path, toml::to_string(&pack).unwrap()).unwrap();
    assert!(matches!(ContentPack::load(&path), Err(ContentError::Invalid(_))));
}
