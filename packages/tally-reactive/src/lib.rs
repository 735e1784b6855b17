//! Reactive primitives for tally.
//!
//! All reactive state lives in a [`Scope`]: signals, effects and cleanup callbacks are allocated
//! in a scope and released together when its disposer runs.

pub mod effect;
pub mod memo;
pub mod signal;

use std::cell::RefCell;
use std::mem::ManuallyDrop;
use std::rc::Rc;

pub use indexmap::IndexMap;

pub use effect::*;
pub use signal::*;

use effect::EffectState;
use signal::AnySignal;

/// Arena for reactive state.
///
/// A scope is only ever handed out as a [`ScopeRef`], so everything allocated in it can borrow
/// from it for `'a`. Root scopes come from [`create_scope`], nested ones from
/// [`Scope::create_child_scope`].
pub struct Scope<'a> {
    effects: RefCell<Vec<Rc<RefCell<Option<EffectState<'a>>>>>>,
    cleanups: RefCell<Vec<Box<dyn FnOnce() + 'a>>>,
    /// Live children. A child removes itself when its own disposer runs.
    child_scopes: RefCell<Vec<*mut Scope<'a>>>,
    /// Owned; freed in [`Scope::dispose`].
    signals: RefCell<Vec<*mut (dyn AnySignal + 'a)>>,
    parent: Option<&'a Self>,
}

impl<'a> Scope<'a> {
    pub(crate) fn new() -> Self {
        Self {
            effects: Default::default(),
            cleanups: Default::default(),
            child_scopes: Default::default(),
            signals: Default::default(),
            parent: None,
        }
    }
}

/// How scopes are passed around: every allocation in the scope borrows it for `'a`.
pub type ScopeRef<'a> = &'a Scope<'a>;

/// Runs `f` in a new root scope and returns the disposer that frees it.
///
/// Nothing owned by the scope is released until the disposer runs.
///
/// # Examples
///
/// ```
/// # use tally_reactive::*;
/// let disposer = create_scope(|ctx| {
///     let count = ctx.create_signal(0);
///     count.set(1);
/// });
/// disposer();
/// ```
#[must_use = "the scope leaks unless the disposer is called"]
pub fn create_scope(f: impl FnOnce(ScopeRef<'_>)) -> Box<dyn FnOnce()> {
    let ptr = Box::into_raw(Box::new(ManuallyDrop::new(Scope::new())));
    // SAFETY: `ptr` is a live heap allocation until the disposer below frees it.
    f(unsafe { &**ptr });
    Box::new(move || {
        // SAFETY: `ptr` came from `Box::into_raw` and the disposer runs at most once.
        let ctx = unsafe { Box::from_raw(ptr) };
        ctx.dispose();
    })
}

/// Runs `f` in a new root scope and disposes it as soon as `f` returns.
pub fn create_scope_immediate(f: impl FnOnce(ScopeRef<'_>)) {
    let disposer = create_scope(f);
    disposer();
}

impl<'a> Scope<'a> {
    /// Allocates a [`Signal`] holding `value` in this scope.
    pub fn create_signal<T: 'a>(&'a self, value: T) -> &'a Signal<T> {
        let ptr = Box::into_raw(Box::new(Signal::new(value)));
        self.signals.borrow_mut().push(ptr);
        // SAFETY: signals are only freed by `dispose`, which runs when the scope itself goes away.
        unsafe { &*ptr }
    }

    /// Registers `f` to run when this scope is disposed.
    pub fn on_cleanup(&self, f: impl FnOnce() + 'a) {
        self.cleanups.borrow_mut().push(Box::new(f));
    }

    /// Runs `f` in a nested scope.
    ///
    /// The child is disposed together with `self`, or earlier by calling the returned disposer.
    pub fn create_child_scope(&'a self, f: impl FnOnce(ScopeRef<'a>)) -> Box<dyn FnOnce() + 'a> {
        let mut ctx = Scope::new();
        ctx.parent = Some(self);
        let ptr = Box::into_raw(Box::new(ctx));
        self.child_scopes.borrow_mut().push(ptr);
        // SAFETY: the child is freed either by its disposer or by `self.dispose`, whichever comes
        // first, and both happen after `f` returns.
        f(unsafe { &*ptr });
        Box::new(move || {
            let removed = {
                let mut children = self.child_scopes.borrow_mut();
                children
                    .iter()
                    .position(|&child| child == ptr)
                    .map(|index| children.remove(index))
            };
            if let Some(ptr) = removed {
                // SAFETY: `ptr` came from `Box::into_raw` and was still listed, so nobody freed it.
                drop(unsafe { Box::from_raw(ptr) });
            }
        })
    }

    /// Returns the parent scope, if any.
    pub fn parent(&self) -> Option<&'a Self> {
        self.parent
    }

    /// Releases everything owned by the scope: effects first, then child scopes, then cleanup
    /// callbacks, then signals. Disposing twice does nothing.
    pub(crate) fn dispose(&self) {
        let effects = self.effects.take();
        let signals = self.signals.take();
        if !effects.is_empty() || !signals.is_empty() {
            tracing::trace!(
                effects = effects.len(),
                signals = signals.len(),
                "disposing scope"
            );
        }
        drop(effects);
        for child in self.child_scopes.take() {
            // SAFETY: listed children are live allocations from `create_child_scope`.
            drop(unsafe { Box::from_raw(child) });
        }
        for cb in self.cleanups.take() {
            cb();
        }
        for signal in signals {
            // SAFETY: allocated in `create_signal` and taken out of the list above.
            drop(unsafe { Box::from_raw(signal) });
        }
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn cleanup_runs_on_dispose() {
        let called = Rc::new(Cell::new(false));
        let disposer = create_scope({
            let called = called.clone();
            move |ctx| ctx.on_cleanup(move || called.set(true))
        });
        assert!(!called.get());
        disposer();
        assert!(called.get());
    }

    #[test]
    fn child_scope_disposed_with_parent() {
        let called = Rc::new(Cell::new(0));
        create_scope_immediate(|ctx| {
            let _ = ctx.create_child_scope(|child| {
                assert!(child.parent().is_some());
                let called = called.clone();
                child.on_cleanup(move || called.set(called.get() + 1));
            });
        });
        assert_eq!(called.get(), 1);
    }

    #[test]
    fn child_scope_disposer_is_idempotent() {
        let called = Rc::new(Cell::new(0));
        create_scope_immediate(|ctx| {
            let dispose_child = ctx.create_child_scope(|child| {
                let called = called.clone();
                child.on_cleanup(move || called.set(called.get() + 1));
            });
            dispose_child();
            assert_eq!(called.get(), 1);
        });
        // Parent disposal does not run the child's cleanups again.
        assert_eq!(called.get(), 1);
    }

    #[test]
    fn disposed_effects_stop_running() {
        let runs = Rc::new(Cell::new(0));
        create_scope_immediate(|ctx| {
            let state = ctx.create_signal(0);
            let dispose_child = ctx.create_child_scope(|child| {
                let runs = runs.clone();
                child.create_effect(move || {
                    state.track();
                    runs.set(runs.get() + 1);
                });
            });
            assert_eq!(runs.get(), 1);
            state.set(1);
            assert_eq!(runs.get(), 2);

            dispose_child();
            state.set(2);
            assert_eq!(runs.get(), 2);
        });
    }

    #[test]
    fn disposed_child_scopes_release_their_subscriptions() {
        create_scope_immediate(|ctx| {
            let state = ctx.create_signal(0);
            for _ in 0..100 {
                let dispose_child = ctx.create_child_scope(|child| {
                    child.create_effect(move || state.track());
                });
                assert_eq!(state.subscriber_count(), 1);
                dispose_child();
            }
            assert_eq!(state.subscriber_count(), 0);
            assert!(ctx.child_scopes.borrow().is_empty());
        });
    }
}
