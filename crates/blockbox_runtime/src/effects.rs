//! Pooled one-shot effects
//!
//! Effects are leased from a pool when played and released once their
//! lifetime runs out on [`Effects::advance`].

use crate::presenter::{Presenter, VisualId};
use blockbox_core::glam::Vec3;
use blockbox_core::{EffectKind, Lifecycle, PoolError, PoolRegistry, PoolStats, PooledEntity, ShutdownReport};
use std::time::Duration;
use tracing::warn;

/// Pooled effect instance.
#[derive(Debug)]
pub struct EffectInstance {
    pub visual: VisualId,
}

#[derive(Debug, Clone)]
struct LiveEffect {
    entity: PooledEntity<EffectKind>,
    remaining: Duration,
}

pub struct Effects<P> {
    pool: PoolRegistry<EffectKind, EffectInstance, P>,
    live: Vec<LiveEffect>,
    lifetime: Duration,
}

impl<P: Presenter + 'static> Effects<P> {
    /// Configure one pool per [`EffectKind`]; every effect lives for `lifetime`.
    pub fn new(lifetime: Duration) -> Result<Self, PoolError<EffectKind>> {
        let mut pool = PoolRegistry::new();
        for kind in EffectKind::ALL {
            pool.configure(kind, effect_lifecycle(kind))?;
        }
        Ok(Self {
            pool,
            live: Vec::new(),
            lifetime,
        })
    }

    pub fn play(
        &mut self,
        kind: EffectKind,
        position: Vec3,
        presenter: &mut P,
    ) -> Result<PooledEntity<EffectKind>, PoolError<EffectKind>> {
        let entity = self.pool.acquire(kind, presenter)?;
        if let Some(effect) = self.pool.get(entity) {
            presenter.move_visual(effect.visual, position);
        }
        self.live.push(LiveEffect {
            entity,
            remaining: self.lifetime,
        });
        Ok(entity)
    }

    /// Age live effects by `elapsed`, releasing the finished ones. Returns
    /// how many were released.
    pub fn advance(
        &mut self,
        elapsed: Duration,
        presenter: &mut P,
    ) -> Result<usize, PoolError<EffectKind>> {
        let mut finished = Vec::new();
        self.live.retain_mut(|effect| {
            effect.remaining = effect.remaining.saturating_sub(elapsed);
            if effect.remaining.is_zero() {
                finished.push(effect.entity);
                false
            } else {
                true
            }
        });
        for entity in &finished {
            self.pool.release(*entity, presenter)?;
        }
        Ok(finished.len())
    }

    pub fn live(&self) -> usize {
        self.live.len()
    }

    pub fn stats(&self, kind: EffectKind) -> Option<PoolStats> {
        self.pool.stats(kind)
    }

    /// Release every live effect and destroy all pooled instances.
    pub fn shutdown(mut self, presenter: &mut P) -> ShutdownReport {
        for effect in self.live.drain(..) {
            if let Err(err) = self.pool.release(effect.entity, presenter) {
                warn!(%err, "failed to release live effect");
            }
        }
        self.pool.shutdown(presenter)
    }
}

fn effect_lifecycle<P: Presenter + 'static>(kind: EffectKind) -> Lifecycle<EffectInstance, P> {
    Lifecycle::new(
        move |presenter: &mut P| EffectInstance {
            visual: presenter.create_effect(kind),
        },
        |presenter, effect| presenter.set_visible(effect.visual, true),
        |presenter, effect| presenter.set_visible(effect.visual, false),
        |presenter, effect| presenter.destroy_visual(effect.visual),
    )
}
