//! Blockbox Runtime
//!
//! Headless binary: loads settings and the saved game, drives a short
//! scripted session, then saves and tears everything down.

use anyhow::{Context, Result};
use blockbox_core::{BlockKind, GridCoord};
use blockbox_runtime::{HeadlessPresenter, InputEvent, Outcome, Session, SurfaceHit};
use blockbox_services::{SaveStore, Settings};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_SETTINGS_PATH: &str = "blockbox.json";

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Blockbox v{}", blockbox_core::VERSION);

    let settings_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));
    let settings = Settings::load_or_default(&settings_path)
        .with_context(|| format!("loading settings from {}", settings_path.display()))?;

    let store = SaveStore::new(&settings.save_path);
    let save = store
        .load_or_new_game(settings.starting_quantity)
        .context("loading saved game")?;

    let mut session = Session::start(settings, HeadlessPresenter::new(), &save)
        .context("starting session")?;
    run_script(&mut session)?;

    store
        .save(&session.snapshot())
        .context("saving game")?;

    let (presenter, report) = session.shutdown();
    info!(
        blocks = report.blocks.destroyed,
        effects = report.effects.destroyed,
        cues = presenter.cues().len(),
        "shutdown complete"
    );
    Ok(())
}

/// Place one block of every kind on the ground, take the first one back
/// out, and let the effects run to completion.
fn run_script(session: &mut Session<HeadlessPresenter>) -> Result<()> {
    let frame = Duration::from_millis(16);
    let mut placed = Vec::new();

    for (row, kind) in BlockKind::ALL.into_iter().enumerate() {
        let cell = first_free_ground_cell(session, row as i32);
        session.handle(InputEvent::BeginDrag(kind))?;
        session.handle(InputEvent::Drag {
            hit: Some(SurfaceHit::on_ground(cell.x as f32, cell.z as f32)),
            over_ui: false,
        })?;
        match session.handle(InputEvent::Release { over_ui: false })? {
            Outcome::Placed { cell, .. } => placed.push(cell),
            outcome => info!(%kind, ?outcome, "placement skipped"),
        }
        session.tick(frame)?;
    }

    if let Some(&cell) = placed.first() {
        session.handle(InputEvent::Remove {
            target: Some(cell),
            over_ui: false,
        })?;
    }

    let lifetime = session.settings().effect_lifetime();
    let mut elapsed = Duration::ZERO;
    while session.live_effects() > 0 && elapsed <= lifetime {
        session.tick(frame)?;
        elapsed += frame;
    }

    for kind in BlockKind::ALL {
        info!(%kind, left = session.quantity(kind), "inventory");
    }
    Ok(())
}

fn first_free_ground_cell(session: &Session<HeadlessPresenter>, row: i32) -> GridCoord {
    (0..)
        .map(|x| GridCoord::new(x, 0, row))
        .find(|&cell| session.is_free(cell))
        .unwrap_or(GridCoord::new(0, 0, row))
}
