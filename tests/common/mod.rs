//! Shared test fixtures: the developer/computer domain and a journaling probe.
#![allow(dead_code)]

use beanwire::TypeRegistry;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub struct Computer {
    compiled: AtomicUsize,
}

impl Computer {
    pub fn compile(&self) -> String {
        self.compiled.fetch_add(1, Ordering::SeqCst);
        "Compiling".to_string()
    }

    pub fn compile_count(&self) -> usize {
        self.compiled.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
pub struct Developer {
    pub age: u32,
    pub name: String,
    pub computer: Option<Arc<Computer>>,
}

impl Developer {
    pub fn code(&self) -> Option<String> {
        self.computer.as_ref().map(|c| c.compile())
    }
}

/// Types for the developer/computer scenarios.
pub fn developer_types() -> TypeRegistry {
    let mut types = TypeRegistry::new();
    types.register::<Computer>("Computer").default_constructor(Computer::default);
    types
        .register::<Developer>("Developer")
        .default_constructor(Developer::default)
        .constructor(|(name, age): (String, u32)| Developer {
            name,
            age,
            computer: None,
        })
        .constructor(|(name, age, computer): (String, u32, Arc<Computer>)| Developer {
            name,
            age,
            computer: Some(computer),
        })
        .property("age", |d: &mut Developer, age: u32| d.age = age)
        .property("name", |d: &mut Developer, name: String| d.name = name)
        .property("computer", |d: &mut Developer, c: Arc<Computer>| d.computer = Some(c));
    types
}

pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

/// A bean that writes every lifecycle step into a shared journal.
#[derive(Debug)]
pub struct Probe {
    pub label: String,
    pub deps: Vec<Arc<Probe>>,
    pub initialized: bool,
    journal: Journal,
}

impl Probe {
    fn new(label: String, deps: Vec<Arc<Probe>>, journal: Journal) -> Self {
        journal.lock().unwrap().push(format!("new:{label}"));
        Self {
            label,
            deps,
            initialized: false,
            journal,
        }
    }

    fn log(&self, event: &str) {
        self.journal.lock().unwrap().push(format!("{event}:{}", self.label));
    }
}

/// Registers `Probe` with constructors, a `dep` property and hooks:
/// `init`, `fail_init`, `destroy`, `fail` (returns an error) and `panic`.
pub fn probe_types(journal: &Journal) -> TypeRegistry {
    let mut types = TypeRegistry::new();
    register_probe(&mut types, journal);
    types
}

pub fn register_probe(types: &mut TypeRegistry, journal: &Journal) {
    let j1 = journal.clone();
    let j2 = journal.clone();
    types
        .register::<Probe>("Probe")
        .constructor(move |(label,): (String,)| Probe::new(label, Vec::new(), j1.clone()))
        .constructor(move |(label, dep): (String, Arc<Probe>)| Probe::new(label, vec![dep], j2.clone()))
        .property("dep", |p: &mut Probe, dep: Arc<Probe>| {
            p.log(&format!("set({})", dep.label));
            p.deps.push(dep);
        })
        .init_hook("init", |p: &mut Probe| {
            p.initialized = true;
            p.log("init");
        })
        .try_init_hook("fail_init", |_: &mut Probe| Err("refused"))
        .destroy_hook("destroy", |p: &Probe| p.log("destroy"))
        .try_destroy_hook("fail", |p: &Probe| {
            p.log("fail");
            Err(format!("{} could not release", p.label))
        })
        .destroy_hook("panic", |p: &Probe| {
            p.log("panic");
            panic!("{} blew up", p.label);
        });
}
