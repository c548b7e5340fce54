//! Observers for container lifecycle events.
//!
//! Observers see every bean construction and destruction, which makes them
//! the hook for tracing, timing and debugging wiring problems.

use std::sync::Arc;
use std::time::Duration;

use crate::scope::Scope;

/// Observer trait for container lifecycle events.
///
/// Calls are made synchronously from `load`, `get_bean` and `close`. Keep
/// implementations cheap.
///
/// # Examples
///
/// ```
/// use beanwire::{BeanDefinition, Container, ContainerObserver, Scope, TypeRegistry};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder(Mutex<Vec<String>>);
///
/// impl ContainerObserver for Recorder {
///     fn instantiated(&self, id: &str, scope: Scope, _elapsed: Duration) {
///         self.0.lock().unwrap().push(format!("{id}:{scope}"));
///     }
/// }
///
/// #[derive(Default)]
/// struct Computer;
///
/// let mut types = TypeRegistry::new();
/// types.register::<Computer>("Computer").default_constructor(Computer::default);
///
/// let recorder = Arc::new(Recorder::default());
/// let _container = Container::builder(types)
///     .observer(recorder.clone())
///     .definition(BeanDefinition::new("computer", "Computer"))
///     .load()
///     .unwrap();
///
/// assert_eq!(*recorder.0.lock().unwrap(), vec!["computer:singleton"]);
/// ```
pub trait ContainerObserver: Send + Sync {
    /// Called before a bean's constructor runs.
    fn instantiating(&self, _id: &str, _scope: Scope) {}

    /// Called once a bean is fully built: constructed, injected, initialized.
    fn instantiated(&self, _id: &str, _scope: Scope, _elapsed: Duration) {}

    /// Called when a singleton is released, after its destroy hook (if any)
    /// completed.
    fn destroyed(&self, _id: &str) {}

    /// Called when a destroy hook fails or panics.
    fn destroy_failed(&self, _id: &str, _hook: &str, _reason: &str) {}
}

/// Observer that reports every event through `tracing`.
///
/// Construction events go to `debug`, destroy failures to `warn`.
///
/// # Examples
///
/// ```
/// use beanwire::{Container, LoggingObserver, TypeRegistry};
/// use std::sync::Arc;
///
/// let container = Container::builder(TypeRegistry::new())
///     .observer(Arc::new(LoggingObserver::new()))
///     .load()
///     .unwrap();
/// assert!(container.bean_names().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self {
            prefix: "beanwire".to_string(),
        }
    }

    /// Creates a logging observer with a custom prefix field.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerObserver for LoggingObserver {
    fn instantiating(&self, id: &str, scope: Scope) {
        tracing::debug!(prefix = %self.prefix, bean = id, %scope, "instantiating bean");
    }

    fn instantiated(&self, id: &str, scope: Scope, elapsed: Duration) {
        tracing::debug!(prefix = %self.prefix, bean = id, %scope, ?elapsed, "bean ready");
    }

    fn destroyed(&self, id: &str) {
        tracing::debug!(prefix = %self.prefix, bean = id, "bean destroyed");
    }

    fn destroy_failed(&self, id: &str, hook: &str, reason: &str) {
        tracing::warn!(prefix = %self.prefix, bean = id, hook, reason, "destroy hook failed");
    }
}

/// Registered observers, fanned out in registration order.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn ContainerObserver>>,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Arc<dyn ContainerObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    pub(crate) fn instantiating(&self, id: &str, scope: Scope) {
        for o in &self.observers {
            o.instantiating(id, scope);
        }
    }

    pub(crate) fn instantiated(&self, id: &str, scope: Scope, elapsed: Duration) {
        for o in &self.observers {
            o.instantiated(id, scope, elapsed);
        }
    }

    pub(crate) fn destroyed(&self, id: &str) {
        for o in &self.observers {
            o.destroyed(id);
        }
    }

    pub(crate) fn destroy_failed(&self, id: &str, hook: &str, reason: &str) {
        for o in &self.observers {
            o.destroy_failed(id, hook, reason);
        }
    }
}
