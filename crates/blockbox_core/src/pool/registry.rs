use crate::pool::{Lifecycle, PoolError, PooledEntity};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use tracing::{debug, warn};

/// Snapshot of a single pool's counters.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Instances ever produced by `create`.
    pub created: usize,
    /// Instances sitting in the idle set.
    pub idle: usize,
    /// Instances currently leased.
    pub leased: usize,
    /// Highest `leased` value observed so far.
    pub high_water: usize,
}

/// Outcome of [`PoolRegistry::shutdown`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Instances passed to `destroy`.
    pub destroyed: usize,
    /// Instances that were still leased when shutdown ran.
    pub leaked: usize,
}

/// Owns one pool per kind and every instance those pools ever created.
///
/// Instances never leave the registry: callers hold [`PooledEntity`]
/// handles and reach the value through [`get`](Self::get) /
/// [`get_mut`](Self::get_mut) while the lease lasts. Pools grow to their
/// high-water mark and never shrink.
pub struct PoolRegistry<K, T, C = ()> {
    pools: HashMap<K, Pool<T, C>>,
    slots: Vec<Slot<K, T>>,
}

struct Pool<T, C> {
    lifecycle: Lifecycle<T, C>,
    /// Slot indices available for reuse; popped LIFO.
    idle: Vec<u32>,
    created: usize,
    leased: usize,
    high_water: usize,
}

struct Slot<K, T> {
    kind: K,
    value: T,
    leased: bool,
}

impl<K, T, C> PoolRegistry<K, T, C>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    pub fn new() -> Self {
        Self {
            pools: HashMap::new(),
            slots: Vec::new(),
        }
    }

    /// Register the lifecycle for `kind`. Each kind may be configured once.
    pub fn configure(&mut self, kind: K, lifecycle: Lifecycle<T, C>) -> Result<(), PoolError<K>> {
        if self.pools.contains_key(&kind) {
            return Err(PoolError::AlreadyConfigured { kind });
        }
        self.pools.insert(
            kind,
            Pool {
                lifecycle,
                idle: Vec::new(),
                created: 0,
                leased: 0,
                high_water: 0,
            },
        );
        debug!(?kind, "pool configured");
        Ok(())
    }

    pub fn is_configured(&self, kind: K) -> bool {
        self.pools.contains_key(&kind)
    }

    /// Lease an instance of `kind`, reusing an idle one when possible.
    pub fn acquire(&mut self, kind: K, ctx: &mut C) -> Result<PooledEntity<K>, PoolError<K>> {
        let pool = self
            .pools
            .get_mut(&kind)
            .ok_or(PoolError::UnknownKind { kind })?;

        let index = match pool.idle.pop() {
            Some(index) => {
                debug!(?kind, index, "reusing idle instance");
                index
            }
            None => {
                let value = (pool.lifecycle.create)(ctx);
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    kind,
                    value,
                    leased: false,
                });
                pool.created += 1;
                debug!(?kind, index, created = pool.created, "created instance");
                index
            }
        };

        let slot = &mut self.slots[index as usize];
        (pool.lifecycle.activate)(ctx, &mut slot.value);
        slot.leased = true;
        pool.leased += 1;
        pool.high_water = pool.high_water.max(pool.leased);

        Ok(PooledEntity::new(kind, index))
    }

    /// Return a leased instance to its pool.
    pub fn release(&mut self, entity: PooledEntity<K>, ctx: &mut C) -> Result<(), PoolError<K>> {
        let not_leased = PoolError::NotLeased {
            kind: entity.kind(),
            index: entity.index(),
        };
        let slot = match self.slots.get_mut(entity.index() as usize) {
            Some(slot) if slot.leased && slot.kind == entity.kind() => slot,
            _ => return Err(not_leased),
        };
        let pool = self.pools.get_mut(&slot.kind).ok_or(not_leased)?;

        (pool.lifecycle.deactivate)(ctx, &mut slot.value);
        slot.leased = false;
        pool.leased -= 1;
        pool.idle.push(entity.index());
        debug!(kind = ?entity.kind(), index = entity.index(), "released instance");
        Ok(())
    }

    pub fn is_leased(&self, entity: PooledEntity<K>) -> bool {
        self.leased_slot(entity).is_some()
    }

    /// Borrow a leased instance.
    pub fn get(&self, entity: PooledEntity<K>) -> Option<&T> {
        self.leased_slot(entity).map(|slot| &slot.value)
    }

    /// Mutably borrow a leased instance.
    pub fn get_mut(&mut self, entity: PooledEntity<K>) -> Option<&mut T> {
        self.slots
            .get_mut(entity.index() as usize)
            .filter(|slot| slot.leased && slot.kind == entity.kind())
            .map(|slot| &mut slot.value)
    }

    pub fn stats(&self, kind: K) -> Option<PoolStats> {
        self.pools.get(&kind).map(|pool| PoolStats {
            created: pool.created,
            idle: pool.idle.len(),
            leased: pool.leased,
            high_water: pool.high_water,
        })
    }

    /// Total number of instances across all pools.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Destroy every instance and drop all pools.
    ///
    /// Instances should all be released first. Any that are still leased
    /// are deactivated, destroyed, and counted in
    /// [`ShutdownReport::leaked`].
    pub fn shutdown(mut self, ctx: &mut C) -> ShutdownReport {
        let mut report = ShutdownReport::default();
        for (index, slot) in self.slots.drain(..).enumerate() {
            let Some(pool) = self.pools.get_mut(&slot.kind) else {
                continue;
            };
            let mut value = slot.value;
            if slot.leased {
                warn!(kind = ?slot.kind, index, "instance still leased at shutdown");
                (pool.lifecycle.deactivate)(ctx, &mut value);
                report.leaked += 1;
            }
            (pool.lifecycle.destroy)(ctx, value);
            report.destroyed += 1;
        }
        self.pools.clear();
        debug!(destroyed = report.destroyed, leaked = report.leaked, "pools shut down");
        report
    }

    fn leased_slot(&self, entity: PooledEntity<K>) -> Option<&Slot<K, T>> {
        self.slots
            .get(entity.index() as usize)
            .filter(|slot| slot.leased && slot.kind == entity.kind())
    }
}

impl<K, T, C> Default for PoolRegistry<K, T, C>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    enum Color {
        Red,
        Green,
    }

    /// Instance payload: which kind it was made for plus a serial number.
    #[derive(Debug, PartialEq)]
    struct Block {
        color: Color,
        serial: usize,
        visible: bool,
    }

    #[derive(Default)]
    struct Log {
        created: usize,
        activated: usize,
        deactivated: usize,
        destroyed: Vec<usize>,
    }

    fn lifecycle(color: Color) -> Lifecycle<Block, Log> {
        Lifecycle::new(
            move |log: &mut Log| {
                log.created += 1;
                Block {
                    color,
                    serial: log.created,
                    visible: false,
                }
            },
            |log, block| {
                log.activated += 1;
                block.visible = true;
            },
            |log, block| {
                log.deactivated += 1;
                block.visible = false;
            },
            |log, block| log.destroyed.push(block.serial),
        )
    }

    fn registry() -> PoolRegistry<Color, Block, Log> {
        let mut registry = PoolRegistry::new();
        registry.configure(Color::Red, lifecycle(Color::Red)).unwrap();
        registry.configure(Color::Green, lifecycle(Color::Green)).unwrap();
        registry
    }

    #[test]
    fn configure_twice_fails() {
        let mut registry = registry();
        let err = registry
            .configure(Color::Red, lifecycle(Color::Red))
            .unwrap_err();
        assert_eq!(err, PoolError::AlreadyConfigured { kind: Color::Red });
    }

    #[test]
    fn acquire_unknown_kind_fails() {
        let mut registry: PoolRegistry<Color, Block, Log> = PoolRegistry::new();
        registry.configure(Color::Red, lifecycle(Color::Red)).unwrap();
        let mut log = Log::default();
        let err = registry.acquire(Color::Green, &mut log).unwrap_err();
        assert_eq!(err, PoolError::UnknownKind { kind: Color::Green });
        assert_eq!(log.created, 0);
    }

    #[test]
    fn release_then_acquire_reuses_instance() {
        let mut registry = registry();
        let mut log = Log::default();

        let a = registry.acquire(Color::Red, &mut log).unwrap();
        assert_eq!(log.created, 1);
        assert!(registry.get(a).unwrap().visible);

        registry.release(a, &mut log).unwrap();
        assert_eq!(log.deactivated, 1);
        assert!(registry.get(a).is_none());

        let again = registry.acquire(Color::Red, &mut log).unwrap();
        assert_eq!(again, a);
        assert_eq!(log.created, 1);
        assert_eq!(log.activated, 2);
        assert!(registry.get(again).unwrap().visible);
    }

    #[test]
    fn kinds_do_not_share_instances() {
        let mut registry = registry();
        let mut log = Log::default();

        let red = registry.acquire(Color::Red, &mut log).unwrap();
        registry.release(red, &mut log).unwrap();
        let green = registry.acquire(Color::Green, &mut log).unwrap();

        assert_ne!(red, green);
        assert_eq!(registry.get(green).unwrap().color, Color::Green);
        assert_eq!(log.created, 2);
    }

    #[test]
    fn created_count_tracks_high_water_mark() {
        let mut registry = registry();
        let mut log = Log::default();

        // Lease pattern: up to 3, down to 1, up to 2, down to 0, up to 4.
        let mut held = Vec::new();
        for _ in 0..3 {
            held.push(registry.acquire(Color::Red, &mut log).unwrap());
        }
        for _ in 0..2 {
            registry.release(held.pop().unwrap(), &mut log).unwrap();
        }
        held.push(registry.acquire(Color::Red, &mut log).unwrap());
        while let Some(entity) = held.pop() {
            registry.release(entity, &mut log).unwrap();
        }
        for _ in 0..4 {
            held.push(registry.acquire(Color::Red, &mut log).unwrap());
        }

        let stats = registry.stats(Color::Red).unwrap();
        assert_eq!(stats.high_water, 4);
        assert_eq!(stats.created, 4);
        assert_eq!(stats.leased, 4);
        assert_eq!(stats.idle, 0);
        assert_eq!(log.created, 4);
    }

    #[test]
    fn double_release_fails() {
        let mut registry = registry();
        let mut log = Log::default();

        let a = registry.acquire(Color::Red, &mut log).unwrap();
        registry.release(a, &mut log).unwrap();
        let err = registry.release(a, &mut log).unwrap_err();

        assert_eq!(
            err,
            PoolError::NotLeased {
                kind: Color::Red,
                index: a.index()
            }
        );
        assert_eq!(log.deactivated, 1);
        assert_eq!(registry.stats(Color::Red).unwrap().idle, 1);
    }

    #[test]
    fn release_with_mismatched_kind_fails() {
        let mut registry = registry();
        let mut log = Log::default();

        let a = registry.acquire(Color::Red, &mut log).unwrap();
        let forged = PooledEntity::new(Color::Green, a.index());
        assert!(registry.release(forged, &mut log).is_err());
        assert!(registry.is_leased(a));
    }

    #[test]
    fn shutdown_destroys_every_instance() {
        let mut registry = registry();
        let mut log = Log::default();

        let a = registry.acquire(Color::Red, &mut log).unwrap();
        let b = registry.acquire(Color::Red, &mut log).unwrap();
        let _c = registry.acquire(Color::Green, &mut log).unwrap();
        registry.release(a, &mut log).unwrap();
        registry.release(b, &mut log).unwrap();

        let report = registry.shutdown(&mut log);
        assert_eq!(report.destroyed, 3);
        assert_eq!(report.leaked, 1);

        log.destroyed.sort_unstable();
        assert_eq!(log.destroyed, vec![1, 2, 3]);
        // The leaked green instance was deactivated before being destroyed.
        assert_eq!(log.deactivated, 3);
    }

    #[test]
    fn builder_defaults_are_noops() {
        let mut registry: PoolRegistry<Color, u32> = PoolRegistry::new();
        registry
            .configure(Color::Red, Lifecycle::from_create(|_| 7))
            .unwrap();

        let entity = registry.acquire(Color::Red, &mut ()).unwrap();
        *registry.get_mut(entity).unwrap() += 1;
        assert_eq!(registry.get(entity), Some(&8));
        registry.release(entity, &mut ()).unwrap();

        let report = registry.shutdown(&mut ());
        assert_eq!(report, ShutdownReport { destroyed: 1, leaked: 0 });
    }

    #[test]
    fn builder_overrides_individual_callbacks() {
        let mut registry: PoolRegistry<Color, u32, Vec<&'static str>> = PoolRegistry::new();
        let lifecycle = Lifecycle::from_create(|events: &mut Vec<&'static str>| {
            events.push("create");
            0
        })
        .with_activate(|events, _| events.push("activate"))
        .with_deactivate(|events, value| {
            events.push("deactivate");
            *value = 0;
        })
        .with_destroy(|events, _| events.push("destroy"));
        registry.configure(Color::Green, lifecycle).unwrap();

        let mut events = Vec::new();
        let entity = registry.acquire(Color::Green, &mut events).unwrap();
        *registry.get_mut(entity).unwrap() = 42;
        registry.release(entity, &mut events).unwrap();
        registry.acquire(Color::Green, &mut events).unwrap();
        assert_eq!(registry.get(entity), Some(&0));

        registry.shutdown(&mut events);
        assert_eq!(
            events,
            vec!["create", "activate", "deactivate", "activate", "deactivate", "destroy"]
        );
    }
}
