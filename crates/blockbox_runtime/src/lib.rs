//! Blockbox Runtime
//!
//! Drives a sandbox session: wires the core pools and occupancy index to
//! the inventory, persistence and an external [`Presenter`].
//!
//! # Usage
//!
//! ```ignore
//! let save = store.load_or_new_game(settings.starting_quantity)?;
//! let mut session = Session::start(settings, HeadlessPresenter::new(), &save)?;
//!
//! session.handle(InputEvent::BeginDrag(BlockKind::Red))?;
//! session.handle(InputEvent::Drag { hit: Some(hit), over_ui: false })?;
//! session.handle(InputEvent::Release { over_ui: false })?;
//! session.tick(frame_time)?;
//!
//! store.save(&session.snapshot())?;
//! session.shutdown();
//! ```

pub mod effects;
pub mod placement;
pub mod presenter;
pub mod session;

pub use placement::SurfaceHit;
pub use presenter::{Cue, Ghost, GhostState, HeadlessPresenter, Presenter, VisualId};
pub use session::{InputEvent, Outcome, Rejection, Session, SessionError, SessionReport};
