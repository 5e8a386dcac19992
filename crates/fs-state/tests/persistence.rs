//! Persistence integration tests against a live slot machine

use fs_core::ScriptedSource;
use fs_slot_lab::{
    Action, CheatAction, ForcedRow, GameConfig, Phase, SlotMachine, SymbolId,
};
use fs_state::{SaveError, SaveStore};
use tempfile::TempDir;

const LOSS: [f64; 10] = [0.9, 0.1, 0.3, 0.5, 0.3, 0.5, 0.1, 0.65, 0.1, 0.3];

fn machine() -> SlotMachine<ScriptedSource> {
    SlotMachine::new(GameConfig::default(), ScriptedSource::new(LOSS)).unwrap()
}

#[test]
fn test_autosave_after_each_round() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("save.json");
    let mut m = machine().with_sink(Box::new(SaveStore::new(&path)));

    m.dispatch(Action::Spin);
    assert!(!path.exists());

    m.advance(1600);
    let loaded = SaveStore::new(&path).load().unwrap().unwrap();
    assert_eq!(loaded.credits, 995);
    assert_eq!(loaded.stats.total_spins, 1);
    assert_eq!(loaded.stats.total_lost, 5);
    assert_eq!(loaded.phase, Phase::Idle);
}

#[test]
fn test_export_import_round_trip() {
    let dir = TempDir::new().unwrap();
    let export = dir.path().join("export.json");
    let store = SaveStore::new(dir.path().join("save.json"));

    let mut m = machine();
    m.dispatch(Action::SetLineBet(4));
    m.dispatch(Action::Cheat(CheatAction::ToggleEnabled));
    m.dispatch(Action::Cheat(CheatAction::SetForceSymbols(
        ForcedRow::new(vec![SymbolId::from_name("Diamond"), None, None]).ok(),
    )));
    m.dispatch(Action::Spin);
    m.finish_round();
    store.export_to(m.state(), &export).unwrap();

    let mut fresh = machine();
    let imported = store.import_from(&export).unwrap();
    assert!(fresh.dispatch(Action::Restore(Box::new(imported))).is_applied());

    let (a, b) = (m.state(), fresh.state());
    assert_eq!(b.credits, a.credits);
    assert_eq!(b.line_bet, 4);
    assert_eq!(b.total_bet, 20);
    assert_eq!(b.stats, a.stats);
    assert!(b.stats.has_cheated);
    assert_eq!(b.cheats, a.cheats);
    assert_eq!(b.phase, Phase::Idle);
}

#[test]
fn test_export_refused_mid_round() {
    let dir = TempDir::new().unwrap();
    let store = SaveStore::new(dir.path().join("save.json"));

    let mut m = machine();
    m.dispatch(Action::Spin);
    let result = store.export_to(m.state(), &dir.path().join("export.json"));
    assert!(matches!(result, Err(SaveError::Invalid(_))));
}

#[test]
fn test_invalid_import_leaves_state_unchanged() {
    let dir = TempDir::new().unwrap();
    let store = SaveStore::new(dir.path().join("save.json"));

    let mut m = machine();
    m.dispatch(Action::Spin);
    m.finish_round();
    let before = m.state().clone();

    let bad_balance = dir.path().join("bad_balance.json");
    std::fs::write(&bad_balance, r#"{"credits":"lots","lineBet":1}"#).unwrap();
    let bad_symbol = dir.path().join("bad_symbol.json");
    std::fs::write(
        &bad_symbol,
        r#"{"credits":10,"lineBet":1,"cheats":{"forceSymbols":["X",null,null]}}"#,
    )
    .unwrap();
    let not_json = dir.path().join("not_json.json");
    std::fs::write(&not_json, "credits=10").unwrap();

    for path in [&bad_balance, &bad_symbol, &not_json] {
        let err = store.import_from(path).expect_err("import should be rejected");
        assert!(!err.to_string().is_empty());
    }
    assert!(matches!(
        store.import_from(&dir.path().join("missing.json")),
        Err(SaveError::Io(_))
    ));
    assert_eq!(m.state(), &before);
}
