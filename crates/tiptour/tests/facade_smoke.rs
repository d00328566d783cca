//! Facade smoke test: a configured, persisted tour driven through the prelude.
//!
//! ```sh
//! cargo test -p tiptour --test facade_smoke
//! ```

#![cfg(all(feature = "config", feature = "state-persistence"))]

use std::sync::Arc;

use tempfile::TempDir;
use tiptour::RecordingPresenter;
use tiptour::prelude::*;

fn write_config(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("tour.json");
    std::fs::write(
        &path,
        r#"{ "key": "welcome", "appearance": { "button_mode": "next_only" } }"#,
    )
    .unwrap();
    path
}

fn build(dir: &TempDir, config: TourConfig) -> TourSimulator<StaticResolver> {
    let resolver = StaticResolver::new(Rect::from_size(375.0, 800.0))
        .with_target("compose", Rect::new(300.0, 700.0, 48.0, 48.0))
        .with_target("search", Rect::new(16.0, 60.0, 200.0, 32.0));
    let store = FileCompletionStore::new(dir.path().join("state").join("completed.json"));
    let tour = TourController::new(resolver, RecordingPresenter::new())
        .with_store(Arc::new(store))
        .with_config(config);
    let mut sim = TourSimulator::from_controller(tour);
    sim.controller_mut().append_all([
        TooltipItem::new("search", "Search everything", Side::Bottom),
        TooltipItem::new("compose", "Write a message", Side::Top),
    ]);
    sim
}

#[test]
fn configured_tour_runs_once() -> tiptour::Result<()> {
    let dir = TempDir::new().unwrap();
    let config = TourConfig::load(write_config(&dir))?;
    assert_eq!(config.appearance.button_mode, ButtonMode::NextOnly);

    let mut first = build(&dir, config.clone());
    first.start();
    let step = first.visible().cloned().unwrap();
    assert!(!step.buttons.show_previous);
    assert_eq!(first.run_to_completion(10), 2);
    assert!(first.is_completed());

    let mut second = build(&dir, config);
    second.start();
    assert_eq!(second.event_names(), ["completed"]);

    second.controller().reset_completion()?;
    let mut third = build(&dir, TourConfig::load(write_config(&dir))?);
    third.start();
    assert_eq!(third.shown_indices(), [0]);
    Ok(())
}

#[test]
fn missing_config_surfaces_as_facade_error() {
    let dir = TempDir::new().unwrap();
    let err: Error = TourConfig::load(dir.path().join("absent.json"))
        .unwrap_err()
        .into();
    assert!(err.to_string().starts_with("failed to read tour config"));
}
