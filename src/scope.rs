//! Bean scope definitions.

/// Bean scopes controlling how many instances a definition yields
///
/// # Examples
///
/// ```rust
/// use beanwire::{BeanDefinition, Container, Scope, TypeRegistry};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Counter;
///
/// let mut types = TypeRegistry::new();
/// types.register::<Counter>("Counter").default_constructor(Counter::default);
///
/// let container = Container::load(types, vec![
///     BeanDefinition::new("shared", "Counter"),
///     BeanDefinition::new("fresh", "Counter").scope(Scope::Prototype),
/// ]).unwrap();
///
/// // Singleton: same instance on every lookup
/// let a = container.get::<Counter>("shared").unwrap();
/// let b = container.get::<Counter>("shared").unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
///
/// // Prototype: a new instance on every lookup
/// let c = container.get::<Counter>("fresh").unwrap();
/// let d = container.get::<Counter>("fresh").unwrap();
/// assert!(!Arc::ptr_eq(&c, &d));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum Scope {
    /// One instance per container, built eagerly during load
    ///
    /// The container owns the instance until it is closed. Every lookup
    /// returns a handle to the same object, and its destroy hook runs
    /// when the container closes.
    #[default]
    Singleton,
    /// New instance per lookup, never cached
    ///
    /// The caller owns what it gets back. Destroy hooks are never run for
    /// prototypes since the container keeps no reference to them.
    Prototype,
}

impl Scope {
    /// Lowercase name as used in bean documents and log output.
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Singleton => "singleton",
            Scope::Prototype => "prototype",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
