//! The bean container.
//!
//! A [`Container`] is built once from a [`TypeRegistry`] and a set of
//! [`BeanDefinition`]s, eagerly constructs every singleton in dependency
//! order, serves lookups, and runs destroy hooks when closed.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::definition::BeanDefinition;
use crate::error::{BeanError, BeanResult, CloseError, ConfigError, HookFailure};
use crate::observer::{ContainerObserver, Observers};
use crate::scope::Scope;
use crate::types::{TypeDescriptor, TypeRegistry};
use crate::value::{ArgValue, Bean, Resolved};

mod registry;
mod teardown;

use registry::DefinitionRegistry;
use teardown::run_destroy_hook;

/// Bean container owning the definition registry and the singleton cache.
///
/// The singleton cache is only written while loading; afterwards every
/// lookup goes through `&self`, so a loaded container can be shared between
/// threads without locking.
///
/// # Examples
///
/// ```
/// use beanwire::{BeanDefinition, Container, TypeRegistry};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Computer;
///
/// impl Computer {
///     fn compile(&self) -> &'static str {
///         "compiling"
///     }
/// }
///
/// #[derive(Default)]
/// struct Developer {
///     age: u32,
///     computer: Option<Arc<Computer>>,
/// }
///
/// let mut types = TypeRegistry::new();
/// types.register::<Computer>("Computer").default_constructor(Computer::default);
/// types
///     .register::<Developer>("Developer")
///     .default_constructor(Developer::default)
///     .property("age", |d: &mut Developer, age: u32| d.age = age)
///     .property("computer", |d: &mut Developer, c: Arc<Computer>| d.computer = Some(c));
///
/// let mut container = Container::load(types, vec![
///     BeanDefinition::new("computer", "Computer"),
///     BeanDefinition::new("developer", "Developer")
///         .property("age", 25)
///         .property_ref("computer", "computer"),
/// ]).unwrap();
///
/// let developer = container.get::<Developer>("developer").unwrap();
/// assert_eq!(developer.age, 25);
/// assert_eq!(developer.computer.as_ref().unwrap().compile(), "compiling");
///
/// container.close().unwrap();
/// ```
pub struct Container {
    types: TypeRegistry,
    registry: DefinitionRegistry,
    singletons: HashMap<String, Bean>,
    creation_order: Vec<String>,
    observers: Observers,
    closed: bool,
}

/// Builder collecting definitions and observers before [`Container`] load.
pub struct ContainerBuilder {
    types: TypeRegistry,
    definitions: Vec<BeanDefinition>,
    observers: Observers,
}

impl ContainerBuilder {
    pub fn definition(mut self, definition: BeanDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    pub fn definitions(mut self, definitions: impl IntoIterator<Item = BeanDefinition>) -> Self {
        self.definitions.extend(definitions);
        self
    }

    /// Adds an observer notified of every construction and destruction.
    pub fn observer(mut self, observer: Arc<dyn ContainerObserver>) -> Self {
        self.observers.add(observer);
        self
    }

    /// Validates the definitions and eagerly builds every singleton.
    ///
    /// All-or-nothing: if any singleton fails, the ones already built are
    /// destroyed in reverse order and the error is returned.
    pub fn load(self) -> BeanResult<Container> {
        let registry = DefinitionRegistry::build(self.definitions, &self.types)?;
        let order: Vec<String> = registry
            .graph()
            .topological_order()?
            .into_iter()
            .map(str::to_owned)
            .collect();

        let mut container = Container {
            types: self.types,
            registry,
            singletons: HashMap::new(),
            creation_order: Vec::new(),
            observers: self.observers,
            closed: false,
        };

        for id in order {
            let built = match container.registry.get(&id) {
                Some(def) if def.is_singleton() => container.instantiate(def),
                _ => continue,
            };
            match built {
                Ok(bean) => {
                    container.singletons.insert(id.clone(), bean);
                    container.creation_order.push(id);
                }
                Err(err) => {
                    tracing::warn!(bean = %id, error = %err, "singleton construction failed, rolling back");
                    let failures = container.teardown();
                    if !failures.is_empty() {
                        tracing::warn!(count = failures.len(), "destroy hooks failed during rollback");
                    }
                    return Err(err);
                }
            }
        }

        tracing::debug!(
            definitions = container.registry.iter().count(),
            singletons = container.creation_order.len(),
            "container loaded"
        );
        Ok(container)
    }
}

impl Container {
    pub fn builder(types: TypeRegistry) -> ContainerBuilder {
        ContainerBuilder {
            types,
            definitions: Vec::new(),
            observers: Observers::default(),
        }
    }

    /// Loads `definitions` against `types`; shorthand for the builder.
    pub fn load(types: TypeRegistry, definitions: impl IntoIterator<Item = BeanDefinition>) -> BeanResult<Self> {
        Self::builder(types).definitions(definitions).load()
    }

    /// Looks up a bean by id or alias.
    ///
    /// Singletons return the cached instance; prototypes are built fresh on
    /// every call and not retained.
    pub fn get_bean(&self, name: &str) -> BeanResult<Bean> {
        let def = self.lookup_definition(name)?;
        self.obtain(def)
    }

    /// Typed lookup.
    ///
    /// ```
    /// use beanwire::{BeanDefinition, BeanError, Container, TypeRegistry};
    ///
    /// let mut types = TypeRegistry::new();
    /// types.register::<String>("String").constructor(|(s,): (String,)| s);
    ///
    /// let container = Container::load(types, vec![
    ///     BeanDefinition::new("greeting", "String").constructor_arg("hello"),
    /// ]).unwrap();
    ///
    /// assert_eq!(*container.get::<String>("greeting").unwrap(), "hello");
    /// assert!(matches!(container.get::<u32>("greeting"), Err(BeanError::TypeMismatch { .. })));
    /// ```
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> BeanResult<Arc<T>> {
        let def = self.lookup_definition(name)?;
        let descriptor = self.descriptor(def)?;
        let mismatch = || BeanError::TypeMismatch {
            bean: def.id.clone(),
            expected: type_name::<T>(),
            actual: descriptor.type_name,
        };
        if descriptor.type_id != TypeId::of::<T>() {
            return Err(mismatch());
        }
        self.obtain(def)?.downcast::<T>().map_err(|_| mismatch())
    }

    pub fn contains_bean(&self, name: &str) -> bool {
        self.registry.get(name).is_some()
    }

    pub fn is_singleton(&self, name: &str) -> BeanResult<bool> {
        self.scope_of(name).map(|s| s == Scope::Singleton)
    }

    pub fn is_prototype(&self, name: &str) -> BeanResult<bool> {
        self.scope_of(name).map(|s| s == Scope::Prototype)
    }

    fn scope_of(&self, name: &str) -> BeanResult<Scope> {
        self.registry
            .get(name)
            .map(|def| def.scope)
            .ok_or_else(|| BeanError::NotFound(name.to_string()))
    }

    /// Bean ids in declaration order (aliases excluded).
    pub fn bean_names(&self) -> Vec<&str> {
        self.registry.iter().map(|def| def.id.as_str()).collect()
    }

    /// The definition behind an id or alias.
    pub fn definition(&self, name: &str) -> Option<&BeanDefinition> {
        self.registry.get(name)
    }

    pub fn aliases(&self, name: &str) -> Vec<&str> {
        self.registry.aliases_of(name)
    }

    /// Ids of live singletons in the order they were constructed.
    pub fn singleton_order(&self) -> &[String] {
        &self.creation_order
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Runs destroy hooks of all live singletons in reverse construction
    /// order and releases them.
    ///
    /// Every hook runs even if an earlier one fails or panics; failures are
    /// returned together. Closing twice is a no-op, and lookups on a closed
    /// container fail with [`BeanError::Closed`].
    pub fn close(&mut self) -> Result<(), CloseError> {
        if self.closed {
            return Ok(());
        }
        let failures = self.teardown();
        tracing::debug!(failures = failures.len(), "container closed");
        if failures.is_empty() {
            Ok(())
        } else {
            Err(CloseError { failures })
        }
    }

    fn teardown(&mut self) -> Vec<HookFailure> {
        self.closed = true;
        let mut failures = Vec::new();

        while let Some(id) = self.creation_order.pop() {
            let Some(bean) = self.singletons.remove(&id) else {
                continue;
            };
            let Some(def) = self.registry.get(&id) else {
                continue;
            };
            let Some(hook) = def.destroy_hook.as_deref() else {
                self.observers.destroyed(&id);
                continue;
            };
            let result = match self.types.get(&def.type_ref) {
                Some(descriptor) => run_destroy_hook(descriptor, hook, &*bean),
                None => Err(format!("type `{}` is no longer registered", def.type_ref)),
            };
            match result {
                Ok(()) => self.observers.destroyed(&id),
                Err(reason) => {
                    tracing::warn!(bean = %id, hook, %reason, "destroy hook failed");
                    self.observers.destroy_failed(&id, hook, &reason);
                    failures.push(HookFailure {
                        bean: id.clone(),
                        hook: hook.to_string(),
                        reason,
                    });
                }
            }
        }

        self.singletons.clear();
        failures
    }

    fn lookup_definition(&self, name: &str) -> BeanResult<&BeanDefinition> {
        if self.closed {
            return Err(BeanError::Closed);
        }
        self.registry
            .get(name)
            .ok_or_else(|| BeanError::NotFound(name.to_string()))
    }

    fn descriptor(&self, def: &BeanDefinition) -> BeanResult<&TypeDescriptor> {
        self.types.get(&def.type_ref).ok_or_else(|| {
            BeanError::Config(ConfigError::UnknownType {
                bean: def.id.clone(),
                type_ref: def.type_ref.clone(),
            })
        })
    }

    fn obtain(&self, def: &BeanDefinition) -> BeanResult<Bean> {
        match def.scope {
            Scope::Singleton => self
                .singletons
                .get(&def.id)
                .cloned()
                .ok_or_else(|| BeanError::NotFound(def.id.clone())),
            Scope::Prototype => self.instantiate(def),
        }
    }

    /// Builds one instance of `def` together with every prototype it
    /// references, nested prototypes included.
    ///
    /// Each pending bean is a [`Frame`] on an explicit stack: its declared
    /// values are resolved in order, a prototype reference pushes a new frame,
    /// and a finished frame hands its bean to the frame below. Singleton
    /// references are already cached, since singletons are built in
    /// dependency order.
    fn instantiate<'d>(&'d self, def: &'d BeanDefinition) -> BeanResult<Bean> {
        let mut stack = vec![self.begin(def)];

        while let Some(frame) = stack.last_mut() {
            match frame.pending() {
                Some(ArgValue::Literal(text)) => frame.values.push(Resolved::Literal(text.clone())),
                Some(ArgValue::Ref(name)) => {
                    let target = self
                        .registry
                        .get(name)
                        .ok_or_else(|| BeanError::NotFound(name.clone()))?;
                    match target.scope {
                        Scope::Singleton => frame.values.push(Resolved::Bean {
                            id: target.id.clone(),
                            instance: self.obtain(target)?,
                        }),
                        Scope::Prototype => stack.push(self.begin(target)),
                    }
                }
                None => {
                    let Some(done) = stack.pop() else { break };
                    let def = done.def;
                    let bean = self.complete(done)?;
                    match stack.last_mut() {
                        Some(parent) => parent.values.push(Resolved::Bean {
                            id: def.id.clone(),
                            instance: bean,
                        }),
                        None => return Ok(bean),
                    }
                }
            }
        }
        Err(BeanError::NotFound(def.id.clone()))
    }

    fn begin<'d>(&self, def: &'d BeanDefinition) -> Frame<'d> {
        let started = self.observers.has_observers().then(Instant::now);
        if started.is_some() {
            self.observers.instantiating(&def.id, def.scope);
        }
        tracing::trace!(bean = %def.id, type_ref = %def.type_ref, scope = %def.scope, "instantiating");
        Frame {
            def,
            values: Vec::with_capacity(def.constructor_args.len() + def.properties.len()),
            started,
        }
    }

    /// Runs the constructor, properties and init hook of a fully resolved frame.
    fn complete(&self, frame: Frame<'_>) -> BeanResult<Bean> {
        let Frame { def, mut values, started } = frame;
        let descriptor = self.descriptor(def)?;
        let properties = values.split_off(def.constructor_args.len());

        let mut instance = descriptor.construct(&values).map_err(|reason| BeanError::Instantiation {
            bean: def.id.clone(),
            reason,
        })?;

        for ((property, _), value) in def.properties.iter().zip(properties) {
            descriptor
                .inject(instance.as_mut(), property, &value)
                .map_err(|reason| BeanError::Injection {
                    bean: def.id.clone(),
                    property: property.clone(),
                    reason,
                })?;
        }

        if let Some(hook) = &def.init_hook {
            descriptor
                .run_init(hook, instance.as_mut())
                .map_err(|reason| BeanError::Init {
                    bean: def.id.clone(),
                    hook: hook.clone(),
                    reason,
                })?;
        }

        if let Some(started) = started {
            self.observers.instantiated(&def.id, def.scope, started.elapsed());
        }
        Ok(Arc::from(instance))
    }

    fn pending_destroy_hooks(&self) -> usize {
        self.creation_order
            .iter()
            .filter_map(|id| self.registry.get(id))
            .filter(|def| def.destroy_hook.is_some())
            .count()
    }
}

/// A bean under construction: its declared values resolved so far.
struct Frame<'d> {
    def: &'d BeanDefinition,
    // constructor arguments first, then properties, in declared order
    values: Vec<Resolved>,
    started: Option<Instant>,
}

impl<'d> Frame<'d> {
    /// The next declared value still to resolve, if any.
    fn pending(&self) -> Option<&'d ArgValue> {
        let def: &'d BeanDefinition = self.def;
        let i = self.values.len();
        def.constructor_args
            .get(i)
            .or_else(|| def.properties.get(i - def.constructor_args.len()).map(|(_, v)| v))
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("beans", &self.bean_names())
            .field("singletons", &self.creation_order)
            .field("closed", &self.closed)
            .finish()
    }
}

impl Drop for Container {
    fn drop(&mut self) {
        if !self.closed {
            let pending = self.pending_destroy_hooks();
            if pending > 0 {
                tracing::warn!(pending, "container dropped with destroy hooks pending; call close() before dropping");
            }
        }
    }
}
