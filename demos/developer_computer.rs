/// Demo: wiring a developer and their computer from a YAML bean document
///
/// Run with:
///
/// ```text
/// cargo run --example developer_computer --features config
/// RUST_LOG=beanwire=trace cargo run --example developer_computer --features config
/// ```

use beanwire::{BeanDocument, BeanResult, Container, LoggingObserver, TypeRegistry};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// ===== Domain =====

#[derive(Debug)]
pub struct Computer {
    model: String,
}

impl Computer {
    pub fn new(model: String) -> Self {
        println!("Computer object created");
        Self { model }
    }

    pub fn compile(&self) {
        println!("Compiling on {}", self.model);
    }

    pub fn shutdown(&self) {
        println!("{} shutting down", self.model);
    }
}

#[derive(Debug, Default)]
pub struct Developer {
    age: u32,
    name: String,
    computer: Option<Arc<Computer>>,
}

impl Developer {
    pub fn code(&self) {
        match &self.computer {
            Some(computer) => computer.compile(),
            None => println!("{} has nothing to code on", self.name),
        }
    }
}

const BEANS: &str = r#"
beans:
  - id: computer
    class: Computer
    constructor-args:
      - value: ThinkPad
    destroy-method: shutdown
  - id: developer
    class: Developer
    aliases: [dev]
    properties:
      - { name: age, value: 25 }
      - { name: name, value: John Doe }
      - { name: computer, ref: computer }
  - id: intern
    class: Developer
    scope: prototype
    properties:
      - { name: age, value: 19 }
      - { name: name, value: Sam }
"#;

fn types() -> TypeRegistry {
    let mut types = TypeRegistry::new();
    types
        .register::<Computer>("Computer")
        .constructor(|(model,): (String,)| Computer::new(model))
        .destroy_hook("shutdown", Computer::shutdown);
    types
        .register::<Developer>("Developer")
        .default_constructor(Developer::default)
        .property("age", |d: &mut Developer, age: u32| d.age = age)
        .property("name", |d: &mut Developer, name: String| d.name = name)
        .property("computer", |d: &mut Developer, c: Arc<Computer>| d.computer = Some(c));
    types
}

fn main() -> BeanResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("beanwire=debug")))
        .init();

    let definitions = BeanDocument::from_yaml_str(BEANS)?.into_definitions()?;
    let mut container = Container::builder(types())
        .observer(Arc::new(LoggingObserver::new()))
        .definitions(definitions)
        .load()?;

    let developer = container.get::<Developer>("developer")?;
    println!("{} is {}", developer.name, developer.age);
    developer.code();

    // Same singleton through the alias
    let dev = container.get::<Developer>("dev")?;
    println!("alias shares instance: {}", Arc::ptr_eq(&developer, &dev));

    // Prototypes are built per lookup
    let a = container.get::<Developer>("intern")?;
    let b = container.get::<Developer>("intern")?;
    println!("interns are distinct: {}", !Arc::ptr_eq(&a, &b));
    a.code();

    if let Err(err) = container.close() {
        eprintln!("{err}");
    }
    Ok(())
}
