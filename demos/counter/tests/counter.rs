use counter::{mount_counter, Counter, CounterProps, TestId};
use expect_test::expect;
use tally::prelude::*;

fn display_text(app: &Mounted) -> String {
    app.query_one(TestId::CounterDisplay)
        .expect("exactly one counter display")
        .text_content()
}

fn click_increment(app: &Mounted) {
    let button = app
        .query_one(TestId::IncrementButton)
        .expect("exactly one increment button");
    assert_eq!(button.click(), 1);
}

#[test]
fn renders_without_error() {
    let app = mount_counter(0);
    assert_eq!(app.query_all(TestId::App).len(), 1);
}

#[test]
fn renders_increment_button() {
    let app = mount_counter(0);
    let buttons = app.query_all(TestId::IncrementButton);
    assert_eq!(buttons.len(), 1);
    assert_eq!(buttons[0].tag().as_deref(), Some("button"));
}

#[test]
fn renders_counter_display() {
    let app = mount_counter(0);
    assert_eq!(app.query_all(TestId::CounterDisplay).len(), 1);
}

#[test]
fn counter_starts_at_zero() {
    let app = mount_counter(CounterProps::default().initial);
    assert!(app.query_all(Selector::test_id("counter")).is_empty());
    assert_eq!(display_text(&app), "Value: 0");
}

#[test]
fn display_and_button_live_under_root() {
    let app = mount_counter(0);
    let root = app.query_one(TestId::App).unwrap();
    assert_eq!(root.query_all(TestId::CounterDisplay).len(), 1);
    assert_eq!(root.query_all(TestId::IncrementButton).len(), 1);
}

#[test]
fn clicking_button_increments_counter_display() {
    let app = mount_counter(7);
    click_increment(&app);
    assert!(display_text(&app).contains("8"));
}

#[test]
fn clicking_three_times_from_zero() {
    let app = mount_counter(0);
    for _ in 0..3 {
        click_increment(&app);
    }
    assert_eq!(display_text(&app), "Value: 3");
}

#[test]
fn one_click_adds_one_for_any_start() {
    for k in [0, 1, 2, 9, 10, 41, 99, 1_000, 123_456_789, i64::MAX - 1] {
        let app = mount_counter(k);
        click_increment(&app);
        let text = display_text(&app);
        assert!(text.contains(&(k + 1).to_string()), "{text} after starting at {k}");
        assert_eq!(text, format!("Value: {}", k + 1));
    }
}

#[test]
fn display_node_is_updated_in_place() {
    let app = mount_counter(0);
    let display = app.query_one(TestId::CounterDisplay).unwrap();
    click_increment(&app);
    assert_eq!(app.query_one(TestId::CounterDisplay), Ok(display.clone()));
    assert_eq!(display.text_content(), "Value: 1");
}

#[test]
fn unmounted_counter_ignores_clicks() {
    let mut app = mount_counter(5);
    let button = app.query_one(TestId::IncrementButton).unwrap();
    app.unmount();

    assert_eq!(button.click(), 0);
    assert_eq!(display_text(&app), "Value: 5");
}

#[test]
fn two_counters_are_independent() {
    let first = mount_counter(0);
    let second = mount_counter(0);
    click_increment(&first);
    assert_eq!(display_text(&first), "Value: 1");
    assert_eq!(display_text(&second), "Value: 0");
}

#[test]
fn render_to_string_snapshot() {
    let html = render_to_string(|ctx| {
        instantiate(&Counter::<TreeNode>, ctx, CounterProps { initial: 41 })
    });
    expect![[r#"<div data-test="component-app"><h1 data-test="counter-display">Value: 41</h1><button data-test="increment-button">Increment</button></div>"#]]
        .assert_eq(&html);
}
