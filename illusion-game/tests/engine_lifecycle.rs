//! Self-destruct cycle, snapshot contract and config loading.
use illusion_game::{
    ConfigError, ConfigLoader, ConstRandom, Engine, EngineConfig, Snapshot, VehicleState,
    load_config,
};

fn quiet_config() -> EngineConfig {
    EngineConfig {
        chaos_period_ms: 1_000_000,
        label_swap_period_ms: 1_000_000,
        road_tick_ms: 1_000_000,
        ..EngineConfig::default()
    }
}

#[test]
fn self_destruct_sets_destroyed_immediately() {
    let mut engine = Engine::with_seed(11);
    engine.self_destruct();
    assert!(engine.snapshot().destroyed);
}

#[test]
fn respawn_restores_the_documented_initial_state() {
    let mut engine = Engine::new(EngineConfig::default(), Box::new(ConstRandom(0.5)));
    engine.advance(50);
    engine.press_clutch();
    assert!(engine.vehicle().engine_on);
    engine.self_destruct();
    assert!(engine.snapshot().destroyed);

    engine.advance(3000);
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.vehicle, VehicleState::default());
    assert!(!snapshot.destroyed);
    assert!(snapshot.message.is_none());
    assert!(!snapshot.high_rpm_warning);
    assert!(!snapshot.crow_visible);
    assert!(!snapshot.labels_swapped);
    // The inactivity clock restarts at the respawn instant.
    assert_eq!(engine.session().last_action_at, 3050);
}

#[test]
fn stale_auto_clear_timer_clobbers_a_fresh_press() {
    // Repeating an action does not cancel the earlier auto-clear; the
    // stale timer fires mid-hold and wipes the flag. Defined behavior.
    let mut engine = Engine::new(quiet_config(), Box::new(ConstRandom(0.0)));
    engine.press_brake();
    engine.advance(400);
    engine.press_brake();
    assert!(engine.vehicle().brake_pressed);
    engine.advance(200);
    assert!(!engine.vehicle().brake_pressed);
}

#[test]
fn snapshot_serializes_with_stable_field_names() {
    let engine = Engine::with_seed(1);
    let value = serde_json::to_value(engine.snapshot()).unwrap();
    assert_eq!(value["vehicle"]["gear"], "N");
    assert_eq!(value["vehicle"]["engine_on"], serde_json::json!(false));
    assert_eq!(value["vehicle"]["handbrake_on"], serde_json::json!(true));
    assert_eq!(
        value["vehicle"]["movement_direction"],
        serde_json::json!("stopped")
    );
    assert!(value["message"].is_null());
    assert_eq!(value["destroyed"], serde_json::json!(false));
}

#[test]
fn same_seed_same_story() {
    fn run(seed: u64) -> Snapshot {
        let mut engine = Engine::with_seed(seed);
        engine.press_clutch();
        engine.advance(1000);
        engine.press_brake();
        engine.advance(5000);
        engine.toggle_wiper();
        engine.advance(2500);
        engine.snapshot()
    }
    assert_eq!(run(9), run(9));
}

#[test]
fn platform_loader_feeds_the_engine() {
    struct JsonLoader(&'static str);

    impl ConfigLoader for JsonLoader {
        type Error = ConfigError;

        fn load_engine_config(&self) -> Result<EngineConfig, ConfigError> {
            EngineConfig::from_json(self.0)
        }
    }

    let cfg = load_config(&JsonLoader(r#"{"respawn_delay_ms": 1000}"#)).unwrap();
    assert_eq!(cfg.respawn_delay_ms, 1000);

    let mut engine = Engine::new(cfg, Box::new(ConstRandom(0.5)));
    engine.self_destruct();
    engine.advance(1000);
    assert!(!engine.snapshot().destroyed);

    assert!(load_config(&JsonLoader(r#"{"road_wrap": -1}"#)).is_err());
}
