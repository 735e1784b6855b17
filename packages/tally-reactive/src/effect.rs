//! Side effects that re-run whenever the signals they read are updated.

use std::cell::RefCell;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use ahash::AHashSet;

use crate::signal::SignalEmitter;
use crate::Scope;

thread_local! {
    /// While the [`EffectState`] is inside the Vec, it is owned by [`EFFECTS`].
    /// Because this is a global variable, the lifetime is necessarily `'static`. However, that does not mean
    /// that it can last forever. The `EffectState` should only be used the time it is inside [`EFFECTS`].
    pub(crate) static EFFECTS: RefCell<Vec<*mut EffectState<'static>>> = Default::default();
}

pub(crate) struct EffectState<'a> {
    /// The callback when the effect is re-executed.
    cb: Rc<RefCell<dyn FnMut() + 'a>>,
    dependencies: AHashSet<EffectDependency>,
}

/// Implements reference equality for [`SignalEmitter`]s.
pub(crate) struct EffectDependency(SignalEmitter);

impl PartialEq for EffectDependency {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0.as_ptr(), other.0.as_ptr())
    }
}

impl Eq for EffectDependency {}

impl Hash for EffectDependency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.as_ptr().hash(state);
    }
}

impl<'a> EffectState<'a> {
    /// Clears the dependencies (both links and backlinks).
    /// Should be called when re-executing an effect to recreate all dependencies.
    pub fn clear_dependencies(&mut self) {
        let cb = Rc::as_ptr(&self.cb) as *const ();
        for dependency in &self.dependencies {
            dependency.0.unsubscribe(cb);
        }
        self.dependencies.clear();
    }

    pub fn add_dependency(&mut self, emitter: SignalEmitter) {
        self.dependencies.insert(EffectDependency(emitter));
    }
}

impl Drop for EffectState<'_> {
    fn drop(&mut self) {
        self.clear_dependencies();
    }
}

impl<'a> Scope<'a> {
    /// Creates an effect on signals used inside the effect closure.
    ///
    /// The closure runs once immediately and then again every time one of the signals it read
    /// during its previous run is set. The effect lives as long as the scope.
    ///
    /// # Example
    /// ```
    /// # use tally_reactive::*;
    /// # create_scope_immediate(|ctx| {
    /// let state = ctx.create_signal(0);
    ///
    /// ctx.create_effect(move || {
    ///     println!("State changed. New state value = {}", state.get());
    /// }); // Prints "State changed. New state value = 0"
    ///
    /// state.set(1); // Prints "State changed. New state value = 1"
    /// # });
    /// ```
    pub fn create_effect(&'a self, mut f: impl FnMut() + 'a) {
        let effect = Rc::new(RefCell::new(None::<EffectState<'a>>));
        let cb: Rc<RefCell<dyn FnMut() + 'a>> = Rc::new(RefCell::new({
            let effect = Rc::downgrade(&effect);
            move || {
                EFFECTS.with(|effects| {
                    // Record initial effect stack length to verify that it is the same after.
                    let initial_effect_stack_len = effects.borrow().len();
                    // Upgrade the effect to an Rc now so that it is valid for the rest of the callback.
                    let effect_ref = match effect.upgrade() {
                        Some(effect_ref) => effect_ref,
                        None => return,
                    };

                    // Take effect out.
                    let mut state = match effect_ref.take() {
                        Some(state) => state,
                        None => return,
                    };
                    state.clear_dependencies();

                    let ptr: *mut EffectState<'a> = Box::into_raw(Box::new(state));
                    // Push the effect onto the effect stack so that it is visible by signals.
                    effects.borrow_mut().push(ptr.cast::<EffectState<'static>>());
                    // Now we can call the user-provided function.
                    f();
                    // Pop the effect from the effect stack.
                    effects.borrow_mut().pop();

                    // SAFETY: Now that the effect has been popped from EFFECTS,
                    // get a boxed EffectState with the correct lifetime back.
                    let state = unsafe { Box::from_raw(ptr) };

                    // For all the signals collected by the EffectState,
                    // we need to add backlinks from the signal to the effect, so that
                    // updating the signal will trigger the effect.
                    for dependency in &state.dependencies {
                        dependency.0.subscribe(erase_lifetime(Rc::downgrade(&state.cb)));
                    }

                    // Get the effect state back into the Rc
                    *effect_ref.borrow_mut() = Some(*state);

                    debug_assert_eq!(effects.borrow().len(), initial_effect_stack_len);
                });
            }
        }));

        // Initialize initial effect state.
        *effect.borrow_mut() = Some(EffectState {
            cb: cb.clone(),
            dependencies: AHashSet::new(),
        });

        // Initial callback call to get everything started.
        (&mut *cb.borrow_mut())();

        self.effects.borrow_mut().push(effect);
    }
}

/// Erases the lifetime of an effect callback so that it can be stored inside a signal.
///
/// The callback is only ever reached through the [`Weak`], which stops upgrading once the owning
/// [`Scope`] drops the effect.
fn erase_lifetime<'a>(cb: Weak<RefCell<dyn FnMut() + 'a>>) -> Weak<RefCell<dyn FnMut()>> {
    // SAFETY: Only the lifetime changes. The scope that owns the strong reference outlives every
    // successful upgrade of the weak reference.
    unsafe {
        std::mem::transmute::<Weak<RefCell<dyn FnMut() + 'a>>, Weak<RefCell<dyn FnMut() + 'static>>>(
            cb,
        )
    }
}

/// Run the passed closure inside an untracked scope.
///
/// Signals read inside `f` are not added as dependencies of the running effect.
///
/// # Example
///
/// ```
/// # use tally_reactive::*;
/// # create_scope_immediate(|ctx| {
/// let state = ctx.create_signal(1);
///
/// let double = ctx.create_memo(move || untrack(|| *state.get() * 2));
/// assert_eq!(*double.get(), 2);
///
/// state.set(2);
/// // double value should still be old value because state was untracked
/// assert_eq!(*double.get(), 2);
/// # });
/// ```
pub fn untrack<T>(f: impl FnOnce() -> T) -> T {
    let stack = EFFECTS.with(|effects| effects.take());
    let ret = f();
    EFFECTS.with(|effects| *effects.borrow_mut() = stack);
    ret
}
