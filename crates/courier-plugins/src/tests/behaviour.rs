//! Behaviour-driven tests for plugin loading.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use crate::descriptor::{PluginCatalog, PluginDescriptor};
use crate::error::LoaderError;
use crate::loader::{LoadedPlugins, PluginLoader};

use super::{marker_descriptor, provider_descriptor};

// ---------------------------------------------------------------------------
// Test world
// ---------------------------------------------------------------------------

#[derive(Default)]
struct TestWorld {
    descriptors: Vec<PluginDescriptor>,
    outcome: Option<Result<LoadedPlugins, LoaderError>>,
}

#[fixture]
fn world() -> TestWorld {
    TestWorld::default()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn unquote(value: &str) -> &str {
    value.trim_matches('"')
}

fn loaded(world: &TestWorld) -> &LoadedPlugins {
    world
        .outcome
        .as_ref()
        .expect("catalog not loaded")
        .as_ref()
        .expect("expected load to succeed")
}

fn load_error(world: &TestWorld) -> &LoaderError {
    world
        .outcome
        .as_ref()
        .expect("catalog not loaded")
        .as_ref()
        .expect_err("expected load to fail")
}

fn add_provider(world: &mut TestWorld, id: &str, method: &str, requires: &[&str]) {
    let (container, name) = unquote(method)
        .split_once('.')
        .expect("qualified method name");
    world
        .descriptors
        .push(provider_descriptor(unquote(id), container, &[name], requires));
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given("a standalone plugin {id}")]
fn given_plugin(world: &mut TestWorld, id: String) {
    world.descriptors.push(marker_descriptor(unquote(&id), &[]));
}

#[given("a plugin {id} requiring {dependency}")]
fn given_plugin_requiring(world: &mut TestWorld, id: String, dependency: String) {
    world
        .descriptors
        .push(marker_descriptor(unquote(&id), &[unquote(&dependency)]));
}

#[given("a method provider {id} exposing {method} with no dependencies")]
fn given_provider(world: &mut TestWorld, id: String, method: String) {
    add_provider(world, &id, &method, &[]);
}

#[given("a method provider {id} exposing {method} requiring {dependency}")]
fn given_provider_requiring(world: &mut TestWorld, id: String, method: String, dependency: String) {
    add_provider(world, &id, &method, &[unquote(&dependency)]);
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when("the catalog is loaded")]
fn when_loaded(world: &mut TestWorld) {
    let mut catalog = PluginCatalog::new();
    for descriptor in world.descriptors.drain(..) {
        catalog.add(descriptor).expect("unique identities");
    }
    world.outcome = Some(PluginLoader::new().load(catalog));
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("the activation order is {order}")]
fn then_order(world: &mut TestWorld, order: String) {
    let expected: Vec<&str> = unquote(&order).split(", ").collect();
    assert_eq!(loaded(world).activation_order(), expected);
}

#[then("method {method} is provided by {plugin}")]
fn then_method_provider(world: &mut TestWorld, method: String, plugin: String) {
    let registry = loaded(world).registry();
    let registered = registry
        .get(unquote(&method))
        .unwrap_or_else(|| panic!("{method} not registered: {:?}", registry.names()));
    assert_eq!(registered.plugin(), unquote(&plugin));
}

#[then("loading fails because {plugin} is missing {dependency}")]
fn then_missing(world: &mut TestWorld, plugin: String, dependency: String) {
    let expected = LoaderError::MissingDependency {
        plugin: unquote(&plugin).to_owned(),
        dependency: unquote(&dependency).to_owned(),
    };
    assert_eq!(load_error(world), &expected);
}

#[then("loading fails with a cycle between {members}")]
fn then_cycle(world: &mut TestWorld, members: String) {
    let expected: Vec<String> = unquote(&members)
        .split(", ")
        .map(str::to_owned)
        .collect();
    assert_eq!(
        load_error(world),
        &LoaderError::DependencyCycle { members: expected }
    );
}

// ---------------------------------------------------------------------------
// Scenario registration
// ---------------------------------------------------------------------------

#[scenario(path = "tests/features/plugin_loading.feature")]
fn plugin_loading_behaviour(world: TestWorld) {
    let _ = world;
}
