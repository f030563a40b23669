//! Presentation boundary
//!
//! The session never renders, plays audio or draws UI itself. It asks a
//! [`Presenter`] to, and pool lifecycle callbacks receive the presenter as
//! their context.

use blockbox_core::glam::Vec3;
use blockbox_core::{BlockKind, EffectKind};
use std::collections::HashMap;
use tracing::debug;

/// Opaque handle to something the presenter is showing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct VisualId(pub u64);

/// Audio feedback events.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Cue {
    /// The drag ghost moved to a different cell.
    Move,
    Place,
    Remove,
}

/// How the drag ghost should be drawn.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GhostState {
    Available,
    Blocked,
}

pub trait Presenter {
    fn create_block(&mut self, kind: BlockKind) -> VisualId;
    fn create_effect(&mut self, kind: EffectKind) -> VisualId;
    fn destroy_visual(&mut self, visual: VisualId);
    fn set_visible(&mut self, visual: VisualId, visible: bool);
    fn move_visual(&mut self, visual: VisualId, position: Vec3);
    fn play_spawn_animation(&mut self, visual: VisualId);
    fn play_cue(&mut self, cue: Cue);
    fn set_quantity(&mut self, kind: BlockKind, quantity: u32);
    fn show_ghost(&mut self, kind: BlockKind, position: Vec3, state: GhostState);
    fn hide_ghost(&mut self, kind: BlockKind);
}

/// Current drag ghost as last shown.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ghost {
    pub kind: BlockKind,
    pub position: Vec3,
    pub state: GhostState,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum VisualSource {
    Block(BlockKind),
    Effect(EffectKind),
}

#[derive(Debug, Clone)]
struct VisualState {
    source: VisualSource,
    visible: bool,
    position: Vec3,
}

/// Presenter with no output device; logs calls and keeps enough state to
/// inspect what a real one would show.
#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    next_visual: u64,
    visuals: HashMap<VisualId, VisualState>,
    destroyed: usize,
    spawn_animations: usize,
    cues: Vec<Cue>,
    quantities: HashMap<BlockKind, u32>,
    ghost: Option<Ghost>,
}

impl HeadlessPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visuals created and not yet destroyed.
    pub fn live_visuals(&self) -> usize {
        self.visuals.len()
    }

    /// Visible block visuals of `kind`.
    pub fn visible_blocks(&self, kind: BlockKind) -> usize {
        self.count_visible(VisualSource::Block(kind))
    }

    /// Visible effect visuals of `kind`.
    pub fn visible_effects(&self, kind: EffectKind) -> usize {
        self.count_visible(VisualSource::Effect(kind))
    }

    pub fn is_visible(&self, visual: VisualId) -> bool {
        self.visuals.get(&visual).is_some_and(|v| v.visible)
    }

    pub fn position(&self, visual: VisualId) -> Option<Vec3> {
        self.visuals.get(&visual).map(|v| v.position)
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed
    }

    pub fn spawn_animations(&self) -> usize {
        self.spawn_animations
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    /// Quantity last pushed to the UI for `kind`.
    pub fn quantity(&self, kind: BlockKind) -> Option<u32> {
        self.quantities.get(&kind).copied()
    }

    pub fn ghost(&self) -> Option<&Ghost> {
        self.ghost.as_ref()
    }

    fn count_visible(&self, source: VisualSource) -> usize {
        self.visuals
            .values()
            .filter(|v| v.visible && v.source == source)
            .count()
    }

    fn spawn_visual(&mut self, source: VisualSource) -> VisualId {
        self.next_visual += 1;
        let id = VisualId(self.next_visual);
        self.visuals.insert(
            id,
            VisualState {
                source,
                visible: false,
                position: Vec3::ZERO,
            },
        );
        id
    }
}

impl Presenter for HeadlessPresenter {
    fn create_block(&mut self, kind: BlockKind) -> VisualId {
        let id = self.spawn_visual(VisualSource::Block(kind));
        debug!(%kind, visual = id.0, "create block visual");
        id
    }

    fn create_effect(&mut self, kind: EffectKind) -> VisualId {
        let id = self.spawn_visual(VisualSource::Effect(kind));
        debug!(?kind, visual = id.0, "create effect visual");
        id
    }

    fn destroy_visual(&mut self, visual: VisualId) {
        if self.visuals.remove(&visual).is_some() {
            self.destroyed += 1;
        }
        debug!(visual = visual.0, "destroy visual");
    }

    fn set_visible(&mut self, visual: VisualId, visible: bool) {
        if let Some(state) = self.visuals.get_mut(&visual) {
            state.visible = visible;
        }
    }

    fn move_visual(&mut self, visual: VisualId, position: Vec3) {
        if let Some(state) = self.visuals.get_mut(&visual) {
            state.position = position;
        }
    }

    fn play_spawn_animation(&mut self, visual: VisualId) {
        self.spawn_animations += 1;
        debug!(visual = visual.0, "spawn animation");
    }

    fn play_cue(&mut self, cue: Cue) {
        debug!(?cue, "cue");
        self.cues.push(cue);
    }

    fn set_quantity(&mut self, kind: BlockKind, quantity: u32) {
        debug!(%kind, quantity, "quantity");
        self.quantities.insert(kind, quantity);
    }

    fn show_ghost(&mut self, kind: BlockKind, position: Vec3, state: GhostState) {
        self.ghost = Some(Ghost {
            kind,
            position,
            state,
        });
    }

    fn hide_ghost(&mut self, kind: BlockKind) {
        if self.ghost.is_some_and(|ghost| ghost.kind == kind) {
            self.ghost = None;
        }
    }
}
