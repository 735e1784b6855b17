//! A counter widget: a numeric display and a button that increments it.

use tally::prelude::*;

pub mod cli;

/// Values of the [`TEST_ATTRIBUTE`] on the nodes rendered by [`Counter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestId {
    /// The root `div`.
    App,
    /// The `h1` showing the current value.
    CounterDisplay,
    /// The `button` that increments the value.
    IncrementButton,
}

impl TestId {
    pub const fn as_str(self) -> &'static str {
        match self {
            TestId::App => "component-app",
            TestId::CounterDisplay => "counter-display",
            TestId::IncrementButton => "increment-button",
        }
    }
}

impl AsRef<str> for TestId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<TestId> for Selector {
    fn from(id: TestId) -> Self {
        Selector::test_id(id)
    }
}

/// Messages understood by [`CounterState::reduce`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterMsg {
    Increment,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterState {
    value: i64,
}

impl CounterState {
    pub fn new(value: i64) -> Self {
        Self { value }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    /// Returns the state after handling `msg`. The value saturates at [`i64::MAX`].
    pub fn reduce(&self, msg: CounterMsg) -> Self {
        match msg {
            CounterMsg::Increment => Self {
                value: self.value.saturating_add(1),
            },
        }
    }
}

/// Props for [`Counter`]. The default starts counting at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterProps {
    pub initial: i64,
}

/// Renders
///
/// ```html
/// <div data-test="component-app">
///   <h1 data-test="counter-display">Value: 0</h1>
///   <button data-test="increment-button">Increment</button>
/// </div>
/// ```
///
/// Clicking the button increments the value by one and updates the display.
#[allow(non_snake_case)]
pub fn Counter<G: Html>(ctx: ScopeRef<'_>, props: CounterProps) -> View<G> {
    tracing::debug!(initial = props.initial, "creating counter");
    let (state, dispatch) =
        ctx.create_reducer(CounterState::new(props.initial), CounterState::reduce);

    let display = element::<G>(ctx, "h1")
        .test_id(TestId::CounterDisplay)
        .text("Value: ")
        .dyn_text(move || lexical::to_string(state.get().value()))
        .build();

    let increment = element::<G>(ctx, "button")
        .test_id(TestId::IncrementButton)
        .on("click", move |_| dispatch(CounterMsg::Increment))
        .text("Increment")
        .build();

    element::<G>(ctx, "div")
        .test_id(TestId::App)
        .child(display)
        .child(increment)
        .build()
}

/// Mounts a [`Counter`] starting at `initial` into its own container.
pub fn mount_counter(initial: i64) -> Mounted {
    mount(move |ctx| instantiate(&Counter::<TreeNode>, ctx, CounterProps { initial }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_adds_one() {
        let state = CounterState::default();
        assert_eq!(state.value(), 0);
        assert_eq!(state.reduce(CounterMsg::Increment).value(), 1);
        assert_eq!(CounterState::new(-1).reduce(CounterMsg::Increment).value(), 0);
    }

    #[test]
    fn increment_saturates() {
        let state = CounterState::new(i64::MAX);
        assert_eq!(state.reduce(CounterMsg::Increment).value(), i64::MAX);
    }

    #[test]
    fn test_ids() {
        assert_eq!(TestId::App.as_str(), "component-app");
        assert_eq!(
            Selector::from(TestId::CounterDisplay),
            Selector::test_id("counter-display")
        );
        assert_eq!(
            Selector::from(TestId::IncrementButton).to_string(),
            "[data-test='increment-button']"
        );
    }
}
