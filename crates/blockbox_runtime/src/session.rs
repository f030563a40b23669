//! Sandbox session
//!
//! A [`Session`] owns every piece of live game state and is driven
//! explicitly: [`Session::start`] once, then [`Session::handle`] for each
//! input event and [`Session::tick`] as time passes, and finally
//! [`Session::snapshot`] / [`Session::shutdown`] at teardown.

use crate::effects::Effects;
use crate::placement::{Placer, SurfaceHit, Track};
use crate::presenter::{Cue, GhostState, Presenter, VisualId};
use blockbox_core::{
    BlockKind, EffectKind, GridCoord, Lifecycle, OccupancyError, OccupancyIndex, PoolError,
    PoolRegistry, PoolStats, PooledEntity, ShutdownReport,
};
use blockbox_services::{Inventory, InventoryError, SaveData, Settings};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors here mean the session's own bookkeeping was violated; ordinary
/// player mistakes come back as [`Outcome::Rejected`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    BlockPool(#[from] PoolError<BlockKind>),

    #[error(transparent)]
    EffectPool(#[from] PoolError<EffectKind>),

    #[error(transparent)]
    Occupancy(#[from] OccupancyError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

/// Pointer input, already resolved against the scene by the caller.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed on the inventory slot for a kind.
    BeginDrag(BlockKind),
    /// Pointer moved while the primary button is held.
    Drag { hit: Option<SurfaceHit>, over_ui: bool },
    /// Primary button released.
    Release { over_ui: bool },
    /// Secondary click; `target` is the cell of the block under the pointer.
    Remove {
        target: Option<GridCoord>,
        over_ui: bool,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Rejection {
    OutOfStock,
    Occupied,
    OverUi,
    NoTarget,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    DragStarted(BlockKind),
    Hover { cell: GridCoord, available: bool },
    Placed { kind: BlockKind, cell: GridCoord },
    Removed { kind: BlockKind, cell: GridCoord },
    Rejected(Rejection),
    Ignored,
}

/// Pooled block instance.
#[derive(Debug)]
pub struct BlockInstance {
    pub visual: VisualId,
}

/// Shutdown results for both registries.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SessionReport {
    pub blocks: ShutdownReport,
    pub effects: ShutdownReport,
}

pub struct Session<P> {
    settings: Settings,
    presenter: P,
    blocks: PoolRegistry<BlockKind, BlockInstance, P>,
    occupancy: OccupancyIndex<BlockKind, PooledEntity<BlockKind>>,
    inventory: Inventory,
    placer: Placer,
    effects: Effects<P>,
}

impl<P: Presenter + 'static> Session<P> {
    /// Build every pool and lookup table, then restore `save` without
    /// animations, effects or cues.
    pub fn start(settings: Settings, presenter: P, save: &SaveData) -> Result<Self, SessionError> {
        let mut blocks: PoolRegistry<BlockKind, BlockInstance, P> = PoolRegistry::new();
        for kind in BlockKind::ALL {
            blocks.configure(kind, block_lifecycle(kind))?;
        }
        let effects = Effects::new(settings.effect_lifetime())?;

        let mut session = Self {
            settings,
            presenter,
            blocks,
            occupancy: OccupancyIndex::new(),
            inventory: save.inventory(),
            placer: Placer::new(),
            effects,
        };

        for (kind, quantity) in session.inventory.iter() {
            session.presenter.set_quantity(kind, quantity);
        }
        for record in &save.blocks {
            session.spawn_block(record.kind, record.position)?;
        }

        info!(blocks = session.occupancy.len(), "session started");
        Ok(session)
    }

    pub fn handle(&mut self, event: InputEvent) -> Result<Outcome, SessionError> {
        match event {
            InputEvent::BeginDrag(kind) => Ok(self.begin_drag(kind)),
            InputEvent::Drag { hit, over_ui } => Ok(self.drag(hit, over_ui)),
            InputEvent::Release { over_ui } => self.release(over_ui),
            InputEvent::Remove { target, over_ui } => self.remove(target, over_ui),
        }
    }

    /// Advance time; finished effects go back to their pools.
    pub fn tick(&mut self, elapsed: Duration) -> Result<usize, SessionError> {
        Ok(self.effects.advance(elapsed, &mut self.presenter)?)
    }

    pub fn snapshot(&self) -> SaveData {
        SaveData::capture(&self.occupancy, &self.inventory)
    }

    pub fn is_free(&self, cell: GridCoord) -> bool {
        self.occupancy.is_free(cell)
    }

    pub fn occupant_at(&self, cell: GridCoord) -> Option<(BlockKind, PooledEntity<BlockKind>)> {
        self.occupancy
            .occupant_at(cell)
            .ok()
            .map(|occupant| (occupant.kind, occupant.entity))
    }

    /// Number of placed blocks.
    pub fn block_count(&self) -> usize {
        self.occupancy.len()
    }

    pub fn quantity(&self, kind: BlockKind) -> u32 {
        self.inventory.quantity(kind)
    }

    pub fn is_dragging(&self) -> bool {
        self.placer.is_dragging()
    }

    pub fn live_effects(&self) -> usize {
        self.effects.live()
    }

    pub fn block_stats(&self, kind: BlockKind) -> Option<PoolStats> {
        self.blocks.stats(kind)
    }

    pub fn effect_stats(&self, kind: EffectKind) -> Option<PoolStats> {
        self.effects.stats(kind)
    }

    /// Visual backing a placed block.
    pub fn block_visual(&self, entity: PooledEntity<BlockKind>) -> Option<VisualId> {
        self.blocks.get(entity).map(|block| block.visual)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Return every block and effect to its pool, destroy all pooled
    /// instances, and hand the presenter back.
    pub fn shutdown(self) -> (P, SessionReport) {
        let Self {
            mut presenter,
            mut blocks,
            mut occupancy,
            placer,
            effects,
            ..
        } = self;

        if let Some(kind) = placer.kind() {
            presenter.hide_ghost(kind);
        }
        for (cell, occupant) in occupancy.drain() {
            if let Err(err) = blocks.release(occupant.entity, &mut presenter) {
                warn!(%cell, %err, "failed to release placed block");
            }
        }

        let report = SessionReport {
            effects: effects.shutdown(&mut presenter),
            blocks: blocks.shutdown(&mut presenter),
        };
        info!(
            blocks_destroyed = report.blocks.destroyed,
            effects_destroyed = report.effects.destroyed,
            "session shut down"
        );
        (presenter, report)
    }

    fn begin_drag(&mut self, kind: BlockKind) -> Outcome {
        if !self.inventory.has_any(kind) {
            debug!(%kind, "drag rejected, none left");
            return Outcome::Rejected(Rejection::OutOfStock);
        }
        if let Some(previous) = self.placer.begin(kind) {
            self.presenter.hide_ghost(previous);
        }
        Outcome::DragStarted(kind)
    }

    fn drag(&mut self, hit: Option<SurfaceHit>, over_ui: bool) -> Outcome {
        let Some(kind) = self.placer.kind() else {
            return Outcome::Ignored;
        };
        match self.placer.track(hit, over_ui) {
            Track::Idle | Track::NoHit => Outcome::Ignored,
            Track::Hidden => {
                self.presenter.hide_ghost(kind);
                Outcome::Ignored
            }
            Track::Moved { cell, changed } => {
                let available = self.occupancy.is_free(cell);
                let state = if available {
                    GhostState::Available
                } else {
                    GhostState::Blocked
                };
                self.presenter.show_ghost(kind, cell.to_world(), state);
                if changed {
                    self.presenter.play_cue(Cue::Move);
                }
                Outcome::Hover { cell, available }
            }
        }
    }

    fn release(&mut self, over_ui: bool) -> Result<Outcome, SessionError> {
        let Some((kind, target)) = self.placer.finish() else {
            return Ok(Outcome::Ignored);
        };
        self.presenter.hide_ghost(kind);

        let cell = match self.placement_target(kind, target, over_ui) {
            Ok(cell) => cell,
            Err(rejection) => {
                debug!(%kind, ?target, ?rejection, "placement rejected");
                return Ok(Outcome::Rejected(rejection));
            }
        };

        let visual = self.spawn_block(kind, cell)?;
        self.presenter.play_spawn_animation(visual);

        let left = self.inventory.take(kind)?;
        self.presenter.set_quantity(kind, left);

        self.effects
            .play(EffectKind::Spawn, cell.to_world(), &mut self.presenter)?;
        self.presenter.play_cue(Cue::Place);

        info!(%kind, %cell, left, "block placed");
        Ok(Outcome::Placed { kind, cell })
    }

    fn placement_target(
        &self,
        kind: BlockKind,
        target: Option<GridCoord>,
        over_ui: bool,
    ) -> Result<GridCoord, Rejection> {
        if over_ui {
            return Err(Rejection::OverUi);
        }
        let cell = target.ok_or(Rejection::NoTarget)?;
        if !self.occupancy.is_free(cell) {
            return Err(Rejection::Occupied);
        }
        if !self.inventory.has_any(kind) {
            return Err(Rejection::OutOfStock);
        }
        Ok(cell)
    }

    fn remove(&mut self, target: Option<GridCoord>, over_ui: bool) -> Result<Outcome, SessionError> {
        if self.placer.is_dragging() || over_ui {
            return Ok(Outcome::Ignored);
        }
        let Some(cell) = target.filter(|&cell| !self.occupancy.is_free(cell)) else {
            return Ok(Outcome::Ignored);
        };

        let occupant = self.occupancy.remove_at(cell)?;
        self.blocks.release(occupant.entity, &mut self.presenter)?;

        let left = self.inventory.give(occupant.kind);
        self.presenter.set_quantity(occupant.kind, left);

        self.effects
            .play(EffectKind::Destroy, cell.to_world(), &mut self.presenter)?;
        self.presenter.play_cue(Cue::Remove);

        info!(kind = %occupant.kind, %cell, left, "block removed");
        Ok(Outcome::Removed {
            kind: occupant.kind,
            cell,
        })
    }

    /// Lease a block of `kind`, show it at `cell` and record the occupancy.
    fn spawn_block(&mut self, kind: BlockKind, cell: GridCoord) -> Result<VisualId, SessionError> {
        if !self.occupancy.is_free(cell) {
            return Err(OccupancyError::Occupied { coord: cell }.into());
        }
        let entity = self.blocks.acquire(kind, &mut self.presenter)?;
        let visual = self
            .blocks
            .get(entity)
            .map(|block| block.visual)
            .ok_or(PoolError::NotLeased {
                kind,
                index: entity.index(),
            })?;
        self.presenter.move_visual(visual, cell.to_world());
        self.occupancy.place(cell, kind, entity)?;
        Ok(visual)
    }
}

fn block_lifecycle<P: Presenter + 'static>(kind: BlockKind) -> Lifecycle<BlockInstance, P> {
    Lifecycle::new(
        move |presenter: &mut P| BlockInstance {
            visual: presenter.create_block(kind),
        },
        |presenter, block| presenter.set_visible(block.visual, true),
        |presenter, block| presenter.set_visible(block.visual, false),
        |presenter, block| presenter.destroy_visual(block.visual),
    )
}
