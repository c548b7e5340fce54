//! Bean definitions: the declarative template for one managed object.

use crate::scope::Scope;
use crate::value::ArgValue;

/// Bean definition describing how to build one managed object
///
/// Definitions are plain data. They name a type registered in the
/// [`TypeRegistry`](crate::TypeRegistry), list constructor arguments and
/// properties, and optionally name lifecycle hooks. The container validates
/// them as a set during [`Container::load`](crate::Container::load).
///
/// # Examples
///
/// ```rust
/// use beanwire::{ArgValue, BeanDefinition, Scope};
///
/// let developer = BeanDefinition::new("developer", "Developer")
///     .property("age", 25)
///     .property("name", "John Doe")
///     .property_ref("computer", "computer");
///
/// assert_eq!(developer.scope, Scope::Singleton);
/// assert_eq!(developer.properties.len(), 3);
/// assert_eq!(developer.references().collect::<Vec<_>>(), vec!["computer"]);
///
/// let laptop = BeanDefinition::new("laptop", "Computer")
///     .scope(Scope::Prototype)
///     .constructor_arg("ThinkPad")
///     .destroy_hook("shutdown");
/// assert_eq!(laptop.constructor_args, vec![ArgValue::Literal("ThinkPad".into())]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeanDefinition {
    /// Unique bean id
    pub id: String,
    /// Name of the registered type to instantiate
    pub type_ref: String,
    /// Bean scope
    pub scope: Scope,
    /// Constructor arguments, in declared order
    pub constructor_args: Vec<ArgValue>,
    /// Properties applied after construction, in declared order
    pub properties: Vec<(String, ArgValue)>,
    /// Init hook run once after properties are applied
    pub init_hook: Option<String>,
    /// Destroy hook run when the container closes (singletons only)
    pub destroy_hook: Option<String>,
    /// Beans that must be built first without being injected
    pub depends_on: Vec<String>,
    /// Additional lookup names
    pub aliases: Vec<String>,
}

impl BeanDefinition {
    pub fn new(id: impl Into<String>, type_ref: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_ref: type_ref.into(),
            scope: Scope::default(),
            constructor_args: Vec::new(),
            properties: Vec::new(),
            init_hook: None,
            destroy_hook: None,
            depends_on: Vec::new(),
            aliases: Vec::new(),
        }
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Appends a literal constructor argument.
    pub fn constructor_arg(mut self, value: impl ToString) -> Self {
        self.constructor_args.push(ArgValue::value(value));
        self
    }

    /// Appends a constructor argument referencing another bean.
    pub fn constructor_ref(mut self, id: impl Into<String>) -> Self {
        self.constructor_args.push(ArgValue::reference(id));
        self
    }

    /// Sets a literal property.
    pub fn property(self, name: impl Into<String>, value: impl ToString) -> Self {
        self.with_property(name, ArgValue::value(value))
    }

    /// Sets a property referencing another bean.
    pub fn property_ref(self, name: impl Into<String>, id: impl Into<String>) -> Self {
        self.with_property(name, ArgValue::reference(id))
    }

    /// Appends a property with an already built value.
    ///
    /// Duplicate names are kept here and rejected at load time.
    pub fn with_property(mut self, name: impl Into<String>, value: ArgValue) -> Self {
        self.properties.push((name.into(), value));
        self
    }

    pub fn init_hook(mut self, hook: impl Into<String>) -> Self {
        self.init_hook = Some(hook.into());
        self
    }

    pub fn destroy_hook(mut self, hook: impl Into<String>) -> Self {
        self.destroy_hook = Some(hook.into());
        self
    }

    pub fn depends_on(mut self, id: impl Into<String>) -> Self {
        self.depends_on.push(id.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Ids referenced by constructor arguments and properties, in declared order.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.constructor_args
            .iter()
            .chain(self.properties.iter().map(|(_, v)| v))
            .filter_map(ArgValue::as_ref_id)
    }

    /// Every id this definition needs built first: references, then depends-on.
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.references().chain(self.depends_on.iter().map(String::as_str))
    }

    pub fn is_singleton(&self) -> bool {
        self.scope == Scope::Singleton
    }

    pub fn is_prototype(&self) -> bool {
        self.scope == Scope::Prototype
    }
}
