//! BDD step definitions for the lifecycle feature.
//!
//! These steps map scenarios in `tests/features/lifecycle.feature` onto a
//! simulated host whose commands are answered by a scripted runner.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use super::support::TestHost;
use crate::naming::InstanceIdentity;
use crate::ocf::{InvocationKind, OcfStatus, ResourceAction};

struct LifecycleWorld {
    host: TestHost,
    instance: String,
    status: Option<OcfStatus>,
}

impl LifecycleWorld {
    fn run(&mut self, action: ResourceAction, invocation: InvocationKind) {
        let instance = self.instance.clone();
        self.status = Some(self.host.run(&instance, action, invocation));
    }

    fn unit_name(&self) -> String {
        InstanceIdentity::parse(&self.instance)
            .expect("parsable identifier")
            .unit_name()
    }
}

#[fixture]
fn world() -> RefCell<LifecycleWorld> {
    RefCell::new(LifecycleWorld {
        host: TestHost::new(),
        instance: String::new(),
        status: None,
    })
}

#[given("the instance \"{instance}\"")]
fn given_instance(world: &RefCell<LifecycleWorld>, instance: String) {
    world.borrow_mut().instance = instance;
}

#[given("the SAP executables are installed")]
fn given_executables(world: &RefCell<LifecycleWorld>) {
    let world = world.borrow();
    let exe_dir = world.host.exe_dir(&world.instance);
    world.host.install_executables(&exe_dir);
}

#[given("systemctl is installed")]
fn given_systemctl(world: &RefCell<LifecycleWorld>) {
    world.borrow().host.install_systemctl();
}

#[given("the systemd unit file is installed")]
fn given_unit_file(world: &RefCell<LifecycleWorld>) {
    let world = world.borrow();
    world.host.install_unit_file(&world.unit_name());
}

#[given("stale sapstream sockets exist")]
fn given_stale_sockets(world: &RefCell<LifecycleWorld>) {
    world.borrow().host.create_stale_sockets();
}

#[given("the command \"{pattern}\" exits with code {code}")]
fn given_command_exits(world: &RefCell<LifecycleWorld>, pattern: String, code: i32) {
    world.borrow().host.runner.respond(&pattern, code, "", "");
}

#[given("the command \"{pattern}\" succeeds with output \"{stdout}\"")]
fn given_command_succeeds(world: &RefCell<LifecycleWorld>, pattern: String, stdout: String) {
    world.borrow().host.runner.respond(&pattern, 0, &stdout, "");
}

#[given("the command \"{pattern}\" fails with error \"{stderr}\"")]
fn given_command_fails(world: &RefCell<LifecycleWorld>, pattern: String, stderr: String) {
    world.borrow().host.runner.respond(&pattern, 1, "", &stderr);
}

#[when("the cluster runs \"{action}\"")]
fn when_cluster_runs(world: &RefCell<LifecycleWorld>, action: String) {
    let action = action
        .parse::<ResourceAction>()
        .unwrap_or_else(|error| panic!("unknown action '{action}': {error}"));
    world.borrow_mut().run(action, InvocationKind::Recurring);
}

#[when("the cluster runs a recurring monitor")]
fn when_recurring_monitor(world: &RefCell<LifecycleWorld>) {
    world
        .borrow_mut()
        .run(ResourceAction::Monitor, InvocationKind::Recurring);
}

#[when("the cluster probes the instance")]
fn when_probe(world: &RefCell<LifecycleWorld>) {
    world
        .borrow_mut()
        .run(ResourceAction::Monitor, InvocationKind::Probe);
}

#[then("the agent returns \"{status}\"")]
fn then_status(world: &RefCell<LifecycleWorld>, status: String) {
    let actual = world.borrow().status.expect("an action should have run");
    assert_eq!(actual.to_string(), status);
}

#[then("the command \"{pattern}\" was issued")]
fn then_command_issued(world: &RefCell<LifecycleWorld>, pattern: String) {
    let world = world.borrow();
    assert!(
        world.host.runner.issued(&pattern),
        "expected '{pattern}' in {:?}",
        world.host.runner.calls()
    );
}

#[then("the command \"{pattern}\" was not issued")]
fn then_command_not_issued(world: &RefCell<LifecycleWorld>, pattern: String) {
    let world = world.borrow();
    assert!(
        !world.host.runner.issued(&pattern),
        "unexpected '{pattern}' in {:?}",
        world.host.runner.calls()
    );
}

#[then("no commands were issued")]
fn then_no_commands(world: &RefCell<LifecycleWorld>) {
    assert!(world.borrow().host.runner.calls().is_empty());
}

#[then("the stale sapstream sockets are gone")]
fn then_sockets_gone(world: &RefCell<LifecycleWorld>) {
    assert!(!world.borrow().host.stale_sockets_present());
}

#[then("the log contains {level} \"{message}\"")]
fn then_log_contains(world: &RefCell<LifecycleWorld>, level: String, message: String) {
    let world = world.borrow();
    assert!(
        world.host.logs.contains(&level, &message),
        "expected {level} '{message}' in {:?}",
        world.host.logs.lines()
    );
}

#[scenario(path = "tests/features/lifecycle.feature", index = 0)]
fn start_is_idempotent_for_active_unit(world: RefCell<LifecycleWorld>) {
    let _ = world;
}

#[scenario(path = "tests/features/lifecycle.feature", index = 1)]
fn start_launches_inactive_unit(world: RefCell<LifecycleWorld>) {
    let _ = world;
}

#[scenario(path = "tests/features/lifecycle.feature", index = 2)]
fn failing_systemd_start_is_generic_error(world: RefCell<LifecycleWorld>) {
    let _ = world;
}

#[scenario(path = "tests/features/lifecycle.feature", index = 3)]
fn start_without_systemctl_launches_directly(world: RefCell<LifecycleWorld>) {
    let _ = world;
}

#[scenario(path = "tests/features/lifecycle.feature", index = 4)]
fn direct_launch_not_coming_up_is_not_running(world: RefCell<LifecycleWorld>) {
    let _ = world;
}

#[scenario(path = "tests/features/lifecycle.feature", index = 5)]
fn stop_of_stopped_instance_is_noop(world: RefCell<LifecycleWorld>) {
    let _ = world;
}

#[scenario(path = "tests/features/lifecycle.feature", index = 6)]
fn stop_of_running_instance(world: RefCell<LifecycleWorld>) {
    let _ = world;
}

#[scenario(path = "tests/features/lifecycle.feature", index = 7)]
fn failing_stop_is_generic_error(world: RefCell<LifecycleWorld>) {
    let _ = world;
}

#[scenario(path = "tests/features/lifecycle.feature", index = 8)]
fn status_of_stopped_instance(world: RefCell<LifecycleWorld>) {
    let _ = world;
}

#[scenario(path = "tests/features/lifecycle.feature", index = 9)]
fn recurring_monitor_skips_query(world: RefCell<LifecycleWorld>) {
    let _ = world;
}

#[scenario(path = "tests/features/lifecycle.feature", index = 10)]
fn probe_monitor_queries_instance(world: RefCell<LifecycleWorld>) {
    let _ = world;
}

#[scenario(path = "tests/features/lifecycle.feature", index = 11)]
fn malformed_identifier_is_args_error(world: RefCell<LifecycleWorld>) {
    let _ = world;
}

#[scenario(path = "tests/features/lifecycle.feature", index = 12)]
fn missing_executables_is_args_error(world: RefCell<LifecycleWorld>) {
    let _ = world;
}

#[scenario(path = "tests/features/lifecycle.feature", index = 13)]
fn validation_names_invalid_field(world: RefCell<LifecycleWorld>) {
    let _ = world;
}

#[scenario(path = "tests/features/lifecycle.feature", index = 14)]
fn validation_needs_no_executables(world: RefCell<LifecycleWorld>) {
    let _ = world;
}
