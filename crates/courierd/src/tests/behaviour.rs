//! Behavioural tests for the runtime bootstrap sequence.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use super::support::{self, CatalogChoice, HealthEvent, TestWorld};

#[fixture]
fn world() -> RefCell<TestWorld> {
    support::world()
}

fn unquote(value: &str) -> &str {
    value.trim_matches('"')
}

#[given("a healthy configuration loader")]
fn given_healthy_loader(world: &RefCell<TestWorld>) {
    world.borrow_mut().use_successful_loader();
}

#[given("a failing configuration loader")]
fn given_failing_loader(world: &RefCell<TestWorld>) {
    world.borrow_mut().use_failing_loader();
}

#[given("a catalog without the core plugin")]
fn given_catalog_without_core(world: &RefCell<TestWorld>) {
    world.borrow_mut().use_catalog(CatalogChoice::WithoutCore);
}

#[given("a catalog with a dependency cycle")]
fn given_cyclic_catalog(world: &RefCell<TestWorld>) {
    world.borrow_mut().use_catalog(CatalogChoice::Cyclic);
}

#[when("the runtime bootstrap runs")]
fn when_bootstrap_runs(world: &RefCell<TestWorld>) {
    world.borrow_mut().bootstrap();
}

#[then("bootstrap succeeds")]
fn then_bootstrap_succeeds(world: &RefCell<TestWorld>) {
    let state = world.borrow();
    assert!(
        state.bootstrap_error().is_none(),
        "bootstrap error: {:?}",
        state.bootstrap_error()
    );
    assert!(state.runtime().is_some(), "runtime should have been built");
}

#[then("bootstrap fails")]
fn then_bootstrap_fails(world: &RefCell<TestWorld>) {
    assert!(
        world.borrow().bootstrap_error().is_some(),
        "bootstrap succeeded unexpectedly"
    );
}

#[then("bootstrap fails mentioning {text}")]
fn then_bootstrap_fails_mentioning(world: &RefCell<TestWorld>, text: String) {
    let state = world.borrow();
    let error = state
        .bootstrap_error()
        .expect("bootstrap succeeded unexpectedly");
    let message = error.to_string();
    assert!(
        message.contains(unquote(&text)),
        "expected {text} in '{message}'"
    );
}

#[then("the reporter recorded bootstrap success")]
fn then_reporter_success(world: &RefCell<TestWorld>) {
    assert!(
        world
            .borrow()
            .reporter
            .events()
            .contains(&HealthEvent::BootstrapSucceeded),
        "bootstrap success event missing"
    );
}

#[then("the reporter recorded bootstrap failure")]
fn then_reporter_failure(world: &RefCell<TestWorld>) {
    let events = world.borrow().reporter.events();
    let failed = events
        .iter()
        .any(|event| matches!(event, HealthEvent::BootstrapFailed(_)));
    assert!(failed, "bootstrap failure event missing: {events:?}");
}

#[then("the reporter saw plugins {order} activate")]
fn then_plugins_activated(world: &RefCell<TestWorld>, order: String) {
    let expected: Vec<String> = unquote(&order)
        .split(", ")
        .map(str::to_owned)
        .collect();
    assert_eq!(world.borrow().reporter.activated_plugins(), expected);
}

#[then("the reporter saw {count} methods registered")]
fn then_methods_registered(world: &RefCell<TestWorld>, count: usize) {
    assert!(
        world
            .borrow()
            .reporter
            .events()
            .contains(&HealthEvent::MethodsRegistered(count)),
        "methods registered event missing"
    );
}

#[scenario(path = "tests/features/runtime_bootstrap.feature")]
fn runtime_bootstrap(world: RefCell<TestWorld>) {
    let _ = world;
}
