//! Drag-to-place state machine
//!
//! Tracks which kind is being dragged and which cell the ghost points at.
//! It knows nothing about occupancy or the presenter; the session asks it
//! where the ghost is and decides what that means.

use blockbox_core::glam::Vec3;
use blockbox_core::{BlockKind, GridCoord};

/// Result of a pointer ray against the scene.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceHit {
    /// Where the ray hit.
    pub point: Vec3,
    /// Top face of whatever was hit (ground or another block).
    pub top_y: f32,
}

impl SurfaceHit {
    pub fn new(point: Vec3, top_y: f32) -> Self {
        Self { point, top_y }
    }

    /// Hit on top of the block occupying `cell`.
    pub fn on_block(cell: GridCoord) -> Self {
        let centre = cell.to_world();
        Self::new(centre, cell.y as f32 + 1.0)
    }

    /// Hit on flat ground at height 0.
    pub fn on_ground(x: f32, z: f32) -> Self {
        Self::new(Vec3::new(x, 0.0, z), 0.0)
    }
}

/// What a pointer update did to the ghost.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Track {
    /// No drag in progress.
    Idle,
    /// Pointer is over UI; ghost should be hidden.
    Hidden,
    /// Pointer ray hit nothing usable; ghost stays where it was.
    NoHit,
    /// Ghost points at `cell`. `changed` is set when the cell differs from
    /// the last one the ghost was shown at.
    Moved { cell: GridCoord, changed: bool },
}

#[derive(Debug, Clone)]
struct Drag {
    kind: BlockKind,
    target: Option<GridCoord>,
}

#[derive(Debug, Clone, Default)]
pub struct Placer {
    drag: Option<Drag>,
    /// Last cell the ghost was shown at; survives between drags.
    last_ghost_cell: Option<GridCoord>,
}

impl Placer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start dragging `kind`, returning the kind of any drag it replaced.
    pub fn begin(&mut self, kind: BlockKind) -> Option<BlockKind> {
        self.drag
            .replace(Drag { kind, target: None })
            .map(|previous| previous.kind)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn kind(&self) -> Option<BlockKind> {
        self.drag.as_ref().map(|drag| drag.kind)
    }

    pub fn target(&self) -> Option<GridCoord> {
        self.drag.as_ref().and_then(|drag| drag.target)
    }

    pub fn track(&mut self, hit: Option<SurfaceHit>, over_ui: bool) -> Track {
        let Some(drag) = self.drag.as_mut() else {
            return Track::Idle;
        };
        if over_ui {
            return Track::Hidden;
        }
        let Some(cell) = hit.and_then(|hit| GridCoord::from_surface_hit(hit.point, hit.top_y))
        else {
            return Track::NoHit;
        };

        drag.target = Some(cell);
        let changed = self.last_ghost_cell != Some(cell);
        self.last_ghost_cell = Some(cell);
        Track::Moved { cell, changed }
    }

    /// End the drag, returning the dragged kind and the last targeted cell.
    pub fn finish(&mut self) -> Option<(BlockKind, Option<GridCoord>)> {
        self.drag.take().map(|drag| (drag.kind, drag.target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_without_drag_is_idle() {
        let mut placer = Placer::new();
        assert_eq!(
            placer.track(Some(SurfaceHit::on_ground(0.0, 0.0)), false),
            Track::Idle
        );
        assert_eq!(placer.finish(), None);
    }

    #[test]
    fn move_reports_cell_changes_only() {
        let mut placer = Placer::new();
        placer.begin(BlockKind::Red);

        let first = placer.track(Some(SurfaceHit::on_ground(0.1, 0.2)), false);
        assert_eq!(
            first,
            Track::Moved {
                cell: GridCoord::new(0, 0, 0),
                changed: true
            }
        );
        let same = placer.track(Some(SurfaceHit::on_ground(-0.3, 0.4)), false);
        assert_eq!(
            same,
            Track::Moved {
                cell: GridCoord::new(0, 0, 0),
                changed: false
            }
        );
        let next = placer.track(Some(SurfaceHit::on_ground(1.2, 0.0)), false);
        assert_eq!(
            next,
            Track::Moved {
                cell: GridCoord::new(1, 0, 0),
                changed: true
            }
        );
    }

    #[test]
    fn over_ui_and_misses_keep_last_target() {
        let mut placer = Placer::new();
        placer.begin(BlockKind::Green);
        placer.track(Some(SurfaceHit::on_ground(3.0, 3.0)), false);

        assert_eq!(placer.track(Some(SurfaceHit::on_ground(9.0, 9.0)), true), Track::Hidden);
        assert_eq!(placer.track(None, false), Track::NoHit);
        assert_eq!(placer.target(), Some(GridCoord::new(3, 0, 3)));
        assert_eq!(
            placer.finish(),
            Some((BlockKind::Green, Some(GridCoord::new(3, 0, 3))))
        );
        assert!(!placer.is_dragging());
    }

    #[test]
    fn stacking_on_a_block_targets_the_cell_above() {
        let mut placer = Placer::new();
        placer.begin(BlockKind::Blue);
        let below = GridCoord::new(2, 0, -1);
        assert_eq!(
            placer.track(Some(SurfaceHit::on_block(below)), false),
            Track::Moved {
                cell: GridCoord::new(2, 1, -1),
                changed: true
            }
        );
    }

    #[test]
    fn begin_replaces_running_drag() {
        let mut placer = Placer::new();
        assert_eq!(placer.begin(BlockKind::Red), None);
        placer.track(Some(SurfaceHit::on_ground(0.0, 0.0)), false);
        assert_eq!(placer.begin(BlockKind::Blue), Some(BlockKind::Red));
        assert_eq!(placer.kind(), Some(BlockKind::Blue));
        assert_eq!(placer.target(), None);
    }
}
