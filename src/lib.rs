//! # beanwire
//!
//! A declarative bean container for Rust: named object definitions wired
//! together by constructor and property injection, with singleton and
//! prototype scopes and init/destroy lifecycle hooks.
//!
//! ## Features
//!
//! - **Declarative wiring**: beans are described as data ([`BeanDefinition`]),
//!   in code or in JSON/YAML documents (feature `config`)
//! - **No reflection**: types are registered once with typed constructors,
//!   setters and hooks in a [`TypeRegistry`]
//! - **Scopes**: eager singletons with stable identity, fresh prototypes per lookup
//! - **Fail fast**: duplicate ids, dangling references and reference cycles
//!   are rejected before anything is constructed
//! - **Ordered lifecycle**: dependencies are built first, destroy hooks run
//!   in reverse construction order
//!
//! ## Quick Start
//!
//! ```rust
//! use beanwire::{BeanDefinition, Container, TypeRegistry};
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Computer;
//!
//! #[derive(Default)]
//! struct Developer {
//!     age: u32,
//!     name: String,
//!     computer: Option<Arc<Computer>>,
//! }
//!
//! // Describe what the container may build
//! let mut types = TypeRegistry::new();
//! types.register::<Computer>("Computer").default_constructor(Computer::default);
//! types
//!     .register::<Developer>("Developer")
//!     .default_constructor(Developer::default)
//!     .property("age", |d: &mut Developer, v: u32| d.age = v)
//!     .property("name", |d: &mut Developer, v: String| d.name = v)
//!     .property("computer", |d: &mut Developer, c: Arc<Computer>| d.computer = Some(c));
//!
//! // Describe the object graph
//! let mut container = Container::load(types, vec![
//!     BeanDefinition::new("computer", "Computer"),
//!     BeanDefinition::new("developer", "Developer")
//!         .property("age", 25)
//!         .property("name", "John Doe")
//!         .property_ref("computer", "computer"),
//! ]).unwrap();
//!
//! let developer = container.get::<Developer>("developer").unwrap();
//! assert_eq!(developer.age, 25);
//! assert_eq!(developer.name, "John Doe");
//! assert!(developer.computer.is_some());
//!
//! container.close().unwrap();
//! ```
//!
//! ## Scopes
//!
//! - **Singleton** (default): built during load, one shared instance,
//!   destroyed on [`Container::close`]
//! - **Prototype**: built on every lookup and owned by the caller

pub mod container;
pub mod definition;
pub mod error;
pub mod observer;
pub mod scope;
pub mod types;
pub mod value;

#[cfg(feature = "config")]
pub mod config;

mod graph;

pub use container::{Container, ContainerBuilder};
pub use definition::BeanDefinition;
pub use error::{BeanError, BeanResult, CloseError, ConfigError, HookFailure};
pub use observer::{ContainerObserver, LoggingObserver};
pub use scope::Scope;
pub use types::{TypeBuilder, TypeRegistry};
pub use value::{ArgValue, Bean, ConstructorArgs, Inject, Resolved};

#[cfg(feature = "config")]
pub use config::{BeanDocument, BeanSpec, LiteralSpec, PropertySpec, ValueSpec};
