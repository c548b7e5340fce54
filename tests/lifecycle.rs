mod common;

use beanwire::{BeanDefinition, BeanError, Container, ContainerObserver, Scope};
use common::{entries, journal, probe_types};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[test]
fn test_close_runs_destroy_hooks_in_reverse_order() {
    let log = journal();
    let mut container = Container::load(
        probe_types(&log),
        vec![
            BeanDefinition::new("service", "Probe")
                .constructor_arg("service")
                .constructor_ref("repo")
                .destroy_hook("destroy"),
            BeanDefinition::new("repo", "Probe")
                .constructor_arg("repo")
                .property_ref("dep", "pool")
                .destroy_hook("destroy"),
            BeanDefinition::new("pool", "Probe").constructor_arg("pool").destroy_hook("destroy"),
            BeanDefinition::new("plain", "Probe").constructor_arg("plain"),
        ],
    )
    .unwrap();
    log.lock().unwrap().clear();

    container.close().unwrap();
    assert_eq!(entries(&log), vec!["destroy:service", "destroy:repo", "destroy:pool"]);

    // Exactly once
    container.close().unwrap();
    assert_eq!(entries(&log).len(), 3);
}

#[test]
fn test_close_is_best_effort() {
    let log = journal();
    let mut container = Container::load(
        probe_types(&log),
        vec![
            BeanDefinition::new("a", "Probe").constructor_arg("a").destroy_hook("destroy"),
            BeanDefinition::new("b", "Probe").constructor_arg("b").destroy_hook("fail"),
            BeanDefinition::new("c", "Probe").constructor_arg("c").destroy_hook("panic"),
            BeanDefinition::new("d", "Probe").constructor_arg("d").destroy_hook("destroy"),
        ],
    )
    .unwrap();
    log.lock().unwrap().clear();

    let err = container.close().unwrap_err();
    assert_eq!(entries(&log), vec!["destroy:d", "panic:c", "fail:b", "destroy:a"]);

    let failed: Vec<_> = err.failures.iter().map(|f| (f.bean.as_str(), f.hook.as_str())).collect();
    assert_eq!(failed, vec![("c", "panic"), ("b", "fail")]);
    assert!(err.failures[0].reason.contains("c blew up"));
    assert_eq!(err.failures[1].reason, "b could not release");
    assert!(err.to_string().starts_with("2 destroy hook(s) failed"));
}

#[test]
fn test_lookup_after_close() {
    let log = journal();
    let mut container = Container::load(
        probe_types(&log),
        vec![BeanDefinition::new("a", "Probe").constructor_arg("a")],
    )
    .unwrap();

    let held = container.get_bean("a").unwrap();
    container.close().unwrap();

    assert!(container.is_closed());
    assert!(matches!(container.get_bean("a"), Err(BeanError::Closed)));
    // Handles taken before close stay valid
    assert!(held.downcast_ref::<common::Probe>().is_some());
}

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl ContainerObserver for Recorder {
    fn instantiating(&self, id: &str, scope: Scope) {
        self.events.lock().unwrap().push(format!("instantiating {id} {scope}"));
    }

    fn instantiated(&self, id: &str, _scope: Scope, _elapsed: Duration) {
        self.events.lock().unwrap().push(format!("instantiated {id}"));
    }

    fn destroyed(&self, id: &str) {
        self.events.lock().unwrap().push(format!("destroyed {id}"));
    }

    fn destroy_failed(&self, id: &str, hook: &str, _reason: &str) {
        self.events.lock().unwrap().push(format!("destroy_failed {id}.{hook}"));
    }
}

#[test]
fn test_observer_sees_lifecycle() {
    let log = journal();
    let recorder = Arc::new(Recorder::default());
    let mut container = Container::builder(probe_types(&log))
        .observer(recorder.clone())
        .definition(BeanDefinition::new("one", "Probe").constructor_arg("one").destroy_hook("destroy"))
        .definition(BeanDefinition::new("two", "Probe").constructor_arg("two").destroy_hook("fail"))
        .definition(BeanDefinition::new("proto", "Probe").scope(Scope::Prototype).constructor_arg("proto"))
        .load()
        .unwrap();

    container.get_bean("proto").unwrap();
    let _ = container.close();

    assert_eq!(
        *recorder.events.lock().unwrap(),
        vec![
            "instantiating one singleton",
            "instantiated one",
            "instantiating two singleton",
            "instantiated two",
            "instantiating proto prototype",
            "instantiated proto",
            "destroy_failed two.fail",
            "destroyed one",
        ]
    );
}
