//! Lifecycle callbacks for a single pool.

type CreateFn<T, C> = Box<dyn FnMut(&mut C) -> T>;
type HookFn<T, C> = Box<dyn FnMut(&mut C, &mut T)>;
type DestroyFn<T, C> = Box<dyn FnMut(&mut C, T)>;

/// The four callbacks a pool runs around its instances.
///
/// Every callback receives the context `C` passed to the registry call
/// that triggered it. Side effects (spawning a visual, hiding it, playing
/// a sound) live in that context; the registry never interprets them.
///
/// - `create`: produce a brand new instance when the idle set is empty
/// - `activate`: prepare an instance right before it is leased
/// - `deactivate`: prepare an instance as it returns to the idle set
/// - `destroy`: consume an instance during shutdown
pub struct Lifecycle<T, C = ()> {
    pub(crate) create: CreateFn<T, C>,
    pub(crate) activate: HookFn<T, C>,
    pub(crate) deactivate: HookFn<T, C>,
    pub(crate) destroy: DestroyFn<T, C>,
}

impl<T: 'static, C: 'static> Lifecycle<T, C> {
    pub fn new(
        create: impl FnMut(&mut C) -> T + 'static,
        activate: impl FnMut(&mut C, &mut T) + 'static,
        deactivate: impl FnMut(&mut C, &mut T) + 'static,
        destroy: impl FnMut(&mut C, T) + 'static,
    ) -> Self {
        Self {
            create: Box::new(create),
            activate: Box::new(activate),
            deactivate: Box::new(deactivate),
            destroy: Box::new(destroy),
        }
    }

    /// Lifecycle with only a `create` callback; the others do nothing.
    pub fn from_create(create: impl FnMut(&mut C) -> T + 'static) -> Self {
        Self::new(create, |_, _| {}, |_, _| {}, |_, _| {})
    }

    pub fn with_activate(mut self, activate: impl FnMut(&mut C, &mut T) + 'static) -> Self {
        self.activate = Box::new(activate);
        self
    }

    pub fn with_deactivate(mut self, deactivate: impl FnMut(&mut C, &mut T) + 'static) -> Self {
        self.deactivate = Box::new(deactivate);
        self
    }

    pub fn with_destroy(mut self, destroy: impl FnMut(&mut C, T) + 'static) -> Self {
        self.destroy = Box::new(destroy);
        self
    }
}
