//! Error types for the bean container.

use thiserror::Error;

/// Static configuration errors, detected while loading definitions.
///
/// A `ConfigError` means the definition set itself is unusable. `load` never
/// returns a partially initialized container alongside one.
///
/// # Examples
///
/// ```rust
/// use beanwire::ConfigError;
///
/// let err = ConfigError::Cycle(vec!["a".into(), "b".into(), "a".into()]);
/// assert_eq!(err.to_string(), "reference cycle: a -> b -> a");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A definition was declared with an empty id
    #[error("bean definition has an empty id")]
    EmptyId,
    /// Two definitions share an id
    #[error("duplicate bean id `{0}`")]
    DuplicateId(String),
    /// An alias collides with a bean id or another alias
    #[error("alias `{alias}` of bean `{bean}` is already in use")]
    AliasConflict { alias: String, bean: String },
    /// The same property is declared twice on one definition
    #[error("property `{property}` declared more than once on bean `{bean}`")]
    DuplicateProperty { bean: String, property: String },
    /// A reference or depends-on entry names no known bean
    #[error("bean `{bean}` references unknown bean `{target}`")]
    UnresolvedReference { bean: String, target: String },
    /// A definition references itself directly
    #[error("bean `{0}` references itself")]
    SelfReference(String),
    /// The static reference graph contains a cycle (includes path)
    #[error("reference cycle: {}", .0.join(" -> "))]
    Cycle(Vec<String>),
    /// The type reference is not registered in the type registry
    #[error("bean `{bean}` uses unregistered type `{type_ref}`")]
    UnknownType { bean: String, type_ref: String },
    /// A lifecycle hook name is not registered for the bean's type
    #[error("bean `{bean}` declares unknown {kind} hook `{hook}`")]
    UnknownHook {
        bean: String,
        hook: String,
        kind: &'static str,
    },
    /// A document value entry is neither a literal nor a reference
    #[error("bean `{bean}`: {reason}")]
    MalformedValue { bean: String, reason: String },
    /// A bean document could not be read or parsed
    #[error("cannot parse bean document: {0}")]
    Parse(String),
}

/// Bean container errors
///
/// Everything the container can fail with at load time or lookup time.
/// Construction failures carry the id of the bean being built.
///
/// # Examples
///
/// ```rust
/// use beanwire::{BeanError, Container, TypeRegistry};
///
/// let container = Container::load(TypeRegistry::new(), Vec::new()).unwrap();
/// match container.get_bean("developer") {
///     Err(BeanError::NotFound(id)) => assert_eq!(id, "developer"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BeanError {
    /// Definition set rejected at load time
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// No bean registered under the requested id or alias
    #[error("no bean named `{0}`")]
    NotFound(String),
    /// No registered constructor matches the declared arguments
    #[error("cannot instantiate bean `{bean}`: {reason}")]
    Instantiation { bean: String, reason: String },
    /// A property could not be applied
    #[error("cannot inject property `{property}` into bean `{bean}`: {reason}")]
    Injection {
        bean: String,
        property: String,
        reason: String,
    },
    /// The init hook reported a failure
    #[error("init hook `{hook}` of bean `{bean}` failed: {reason}")]
    Init {
        bean: String,
        hook: String,
        reason: String,
    },
    /// Typed lookup asked for a different type than the bean holds
    #[error("bean `{bean}` is a `{actual}`, not a `{expected}`")]
    TypeMismatch {
        bean: String,
        expected: &'static str,
        actual: &'static str,
    },
    /// The container has already been closed
    #[error("container is closed")]
    Closed,
}

/// A destroy hook that failed during [`Container::close`](crate::Container::close).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookFailure {
    pub bean: String,
    pub hook: String,
    pub reason: String,
}

/// Collected destroy-hook failures.
///
/// Teardown is best effort: every hook runs even if earlier ones fail, and
/// the failures are reported together in the order they occurred.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} destroy hook(s) failed: {}", .failures.len(), summary(.failures))]
pub struct CloseError {
    pub failures: Vec<HookFailure>,
}

fn summary(failures: &[HookFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}.{} ({})", f.bean, f.hook, f.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for container operations
pub type BeanResult<T> = Result<T, BeanError>;
