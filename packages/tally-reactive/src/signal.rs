//! Reactive signals.

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::effect::EFFECTS;

pub(crate) type WeakEffectCallback = Weak<RefCell<dyn FnMut()>>;
pub(crate) type EffectCallbackPtr = *const ();

/// A struct for managing subscriptions to signals.
///
/// Cloning a [`SignalEmitter`] yields another handle to the same subscriber list.
#[derive(Default, Clone)]
pub struct SignalEmitter(Rc<RefCell<IndexMap<EffectCallbackPtr, WeakEffectCallback>>>);

impl SignalEmitter {
    /// Adds a callback to the subscriber list. If the callback is already a subscriber, does nothing.
    pub(crate) fn subscribe(&self, cb: WeakEffectCallback) {
        self.0.borrow_mut().insert(cb.as_ptr() as *const (), cb);
    }

    /// Removes a callback from the subscriber list. If the callback is not a subscriber, does
    /// nothing.
    pub(crate) fn unsubscribe(&self, cb: EffectCallbackPtr) {
        self.0.borrow_mut().shift_remove(&cb);
    }

    /// Address of the shared subscriber list. Used as the identity of the emitter.
    pub(crate) fn as_ptr(&self) -> *const () {
        Rc::as_ptr(&self.0) as *const ()
    }

    /// Track the current signal in the effect scope.
    pub fn track(&self) {
        EFFECTS.with(|effects| {
            if let Some(last) = effects.borrow().last() {
                // SAFETY: See guarantee on EffectState within EFFECTS.
                let last = unsafe { &mut **last };
                last.add_dependency(self.clone());
            }
        });
    }

    /// Calls every live subscriber.
    pub fn trigger_subscribers(&self) {
        // Clone subscribers to prevent modifying list when calling callbacks.
        let subscribers = self.0.borrow().clone();
        // Reverse order of subscribers to trigger outer effects before inner effects.
        for subscriber in subscribers.values().rev() {
            // subscriber might have already been destroyed in the case of nested effects
            if let Some(callback) = subscriber.upgrade() {
                // Might already be inside a callback, if infinite loop.
                // Do nothing if infinite loop.
                if let Ok(mut callback) = callback.try_borrow_mut() {
                    (&mut *callback)()
                }
            }
        }
    }
}

/// A read-only view of a [`Signal`].
pub struct ReadSignal<T> {
    value: RefCell<Rc<T>>,
    emitter: SignalEmitter,
}

impl<T> ReadSignal<T> {
    /// Returns the current value and subscribes the running effect, if any, to this signal.
    #[must_use = "to only subscribe the signal without using the value, use .track() instead"]
    pub fn get(&self) -> Rc<T> {
        self.emitter.track();
        self.value.borrow().clone()
    }

    /// Returns the current value without subscribing the running effect.
    #[must_use = "discarding the returned value does nothing"]
    pub fn get_untracked(&self) -> Rc<T> {
        self.value.borrow().clone()
    }

    /// Subscribes the running effect to this signal without reading the value.
    pub fn track(&self) {
        self.emitter.track();
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.emitter.0.borrow().len()
    }
}

impl<T: fmt::Debug> fmt::Debug for ReadSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReadSignal")
            .field(&self.get_untracked())
            .finish()
    }
}

/// Reactive state that can be updated and subscribed to.
pub struct Signal<T>(ReadSignal<T>);

impl<T> Signal<T> {
    pub(crate) fn new(value: T) -> Self {
        Self(ReadSignal {
            value: RefCell::new(Rc::new(value)),
            emitter: Default::default(),
        })
    }

    /// Replaces the value and notifies every subscriber.
    pub fn set(&self, value: T) {
        self.set_silent(value);
        self.trigger_subscribers();
    }

    /// Replaces the value without notifying subscribers.
    pub fn set_silent(&self, value: T) {
        *self.0.value.borrow_mut() = Rc::new(value);
    }

    /// Notifies every subscriber without changing the value.
    pub fn trigger_subscribers(&self) {
        self.0.emitter.trigger_subscribers();
    }
}

impl<T> Deref for Signal<T> {
    type Target = ReadSignal<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signal").field(&self.get_untracked()).finish()
    }
}

/// Type-erased signal so that a [`Scope`](crate::Scope) can own signals of any type.
pub(crate) trait AnySignal {}

impl<T> AnySignal for Signal<T> {}
