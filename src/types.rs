//! Type registry: the capability map that replaces reflection.
//!
//! Every type a definition may name is registered once with its
//! constructors, property setters and lifecycle hooks. Registration is
//! statically typed; the registry stores type-erased closures keyed by name.

use std::any::{type_name, Any, TypeId};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::Display;
use std::marker::PhantomData;

use crate::value::{ConstructorArgs, Inject, Resolved};

// Type-erased instance under construction
pub(crate) type Instance = Box<dyn Any + Send + Sync>;

type CtorFn = Box<dyn Fn(&[Resolved]) -> Result<Instance, String> + Send + Sync>;
type SetterFn = Box<dyn Fn(&mut (dyn Any + Send + Sync), &Resolved) -> Result<(), String> + Send + Sync>;
type InitFn = Box<dyn Fn(&mut (dyn Any + Send + Sync)) -> Result<(), String> + Send + Sync>;
type DestroyFn = Box<dyn Fn(&(dyn Any + Send + Sync)) -> Result<(), String> + Send + Sync>;

struct Constructor {
    arity: usize,
    signature: &'static str,
    build: CtorFn,
}

/// Everything the container knows about one registered type.
pub(crate) struct TypeDescriptor {
    pub(crate) type_name: &'static str,
    pub(crate) type_id: TypeId,
    constructors: Vec<Constructor>,
    setters: HashMap<String, SetterFn>,
    init_hooks: HashMap<String, InitFn>,
    destroy_hooks: HashMap<String, DestroyFn>,
}

impl TypeDescriptor {
    fn new<T: Any>() -> Self {
        Self {
            type_name: type_name::<T>(),
            type_id: TypeId::of::<T>(),
            constructors: Vec::new(),
            setters: HashMap::new(),
            init_hooks: HashMap::new(),
            destroy_hooks: HashMap::new(),
        }
    }

    /// Builds an instance with the first constructor whose arity matches and
    /// whose parameter conversions all succeed.
    pub(crate) fn construct(&self, args: &[Resolved]) -> Result<Instance, String> {
        let mut rejected = Vec::new();
        for ctor in self.constructors.iter().filter(|c| c.arity == args.len()) {
            match (ctor.build)(args) {
                Ok(instance) => return Ok(instance),
                Err(reason) => rejected.push(format!("{}: {}", ctor.signature, reason)),
            }
        }

        if rejected.is_empty() {
            let available: Vec<_> = self.constructors.iter().map(|c| c.arity.to_string()).collect();
            Err(format!(
                "`{}` has no constructor taking {} argument(s) (available arities: [{}])",
                self.type_name,
                args.len(),
                available.join(", ")
            ))
        } else {
            Err(format!("no matching constructor; {}", rejected.join("; ")))
        }
    }

    pub(crate) fn inject(
        &self,
        instance: &mut (dyn Any + Send + Sync),
        property: &str,
        value: &Resolved,
    ) -> Result<(), String> {
        let setter = self
            .setters
            .get(property)
            .ok_or_else(|| format!("`{}` has no settable property `{}`", self.type_name, property))?;
        setter(instance, value)
    }

    pub(crate) fn run_init(&self, hook: &str, instance: &mut (dyn Any + Send + Sync)) -> Result<(), String> {
        match self.init_hooks.get(hook) {
            Some(f) => f(instance),
            None => Err(format!("`{}` has no init hook `{}`", self.type_name, hook)),
        }
    }

    pub(crate) fn run_destroy(&self, hook: &str, instance: &(dyn Any + Send + Sync)) -> Result<(), String> {
        match self.destroy_hooks.get(hook) {
            Some(f) => f(instance),
            None => Err(format!("`{}` has no destroy hook `{}`", self.type_name, hook)),
        }
    }

    pub(crate) fn has_init_hook(&self, hook: &str) -> bool {
        self.init_hooks.contains_key(hook)
    }

    pub(crate) fn has_destroy_hook(&self, hook: &str) -> bool {
        self.destroy_hooks.contains_key(hook)
    }
}

/// Registry of constructible types, keyed by the name definitions use in
/// their `type_ref`.
///
/// # Examples
///
/// ```rust
/// use beanwire::TypeRegistry;
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Computer;
///
/// #[derive(Default)]
/// struct Developer {
///     age: u32,
///     name: String,
///     computer: Option<Arc<Computer>>,
/// }
///
/// let mut types = TypeRegistry::new();
/// types.register::<Computer>("Computer").default_constructor(Computer::default);
/// types
///     .register::<Developer>("Developer")
///     .default_constructor(Developer::default)
///     .constructor(|(name, age): (String, u32)| Developer { name, age, computer: None })
///     .property("age", |d: &mut Developer, age: u32| d.age = age)
///     .property("name", |d: &mut Developer, name: String| d.name = name)
///     .property("computer", |d: &mut Developer, c: Arc<Computer>| d.computer = Some(c));
///
/// assert!(types.contains("Developer"));
/// assert_eq!(types.len(), 2);
/// ```
#[derive(Default)]
pub struct TypeRegistry {
    types: HashMap<String, TypeDescriptor>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or replaces) the registration of `T` under `name`.
    pub fn register<T: Any + Send + Sync>(&mut self, name: impl Into<String>) -> TypeBuilder<'_, T> {
        let descriptor = match self.types.entry(name.into()) {
            Entry::Occupied(mut slot) => {
                slot.insert(TypeDescriptor::new::<T>());
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(TypeDescriptor::new::<T>()),
        };
        TypeBuilder {
            descriptor,
            _marker: PhantomData,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub(crate) fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry").field("types", &self.names()).finish()
    }
}

fn downcast_mut<T: Any>(instance: &mut (dyn Any + Send + Sync)) -> Result<&mut T, String> {
    instance
        .downcast_mut::<T>()
        .ok_or_else(|| format!("instance is not a `{}`", type_name::<T>()))
}

fn downcast_ref<T: Any>(instance: &(dyn Any + Send + Sync)) -> Result<&T, String> {
    instance
        .downcast_ref::<T>()
        .ok_or_else(|| format!("instance is not a `{}`", type_name::<T>()))
}

/// Typed builder returned by [`TypeRegistry::register`].
///
/// Each method erases its closure and stores it on the type's descriptor.
/// Constructors are tried in registration order.
pub struct TypeBuilder<'r, T> {
    descriptor: &'r mut TypeDescriptor,
    _marker: PhantomData<fn() -> T>,
}

impl<'r, T: Any + Send + Sync> TypeBuilder<'r, T> {
    /// Zero-argument constructor, used when a definition declares no
    /// constructor arguments.
    pub fn default_constructor<F>(self, f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.constructor(move |()| f())
    }

    /// Constructor taking a tuple of injectable parameters.
    pub fn constructor<A, F>(self, f: F) -> Self
    where
        A: ConstructorArgs + 'static,
        F: Fn(A) -> T + Send + Sync + 'static,
    {
        self.try_constructor(move |args: A| Ok::<T, String>(f(args)))
    }

    /// Fallible constructor; an `Err` is reported as an instantiation error.
    pub fn try_constructor<A, E, F>(self, f: F) -> Self
    where
        A: ConstructorArgs + 'static,
        E: Display,
        F: Fn(A) -> Result<T, E> + Send + Sync + 'static,
    {
        self.descriptor.constructors.push(Constructor {
            arity: A::ARITY,
            signature: type_name::<A>(),
            build: Box::new(move |args: &[Resolved]| {
                let args = A::from_resolved(args)?;
                f(args).map(|t| Box::new(t) as Instance).map_err(|e| e.to_string())
            }),
        });
        self
    }

    /// Named property setter.
    pub fn property<V, F>(self, name: impl Into<String>, f: F) -> Self
    where
        V: Inject + 'static,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.try_property(name, move |t: &mut T, v: V| {
            f(t, v);
            Ok::<(), String>(())
        })
    }

    /// Fallible property setter; an `Err` is reported as an injection error.
    pub fn try_property<V, E, F>(self, name: impl Into<String>, f: F) -> Self
    where
        V: Inject + 'static,
        E: Display,
        F: Fn(&mut T, V) -> Result<(), E> + Send + Sync + 'static,
    {
        self.descriptor.setters.insert(
            name.into(),
            Box::new(move |instance: &mut (dyn Any + Send + Sync), value: &Resolved| {
                let value = V::inject(value)?;
                f(downcast_mut::<T>(instance)?, value).map_err(|e| e.to_string())
            }),
        );
        self
    }

    /// Named init hook, run after all properties are applied.
    pub fn init_hook<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.try_init_hook(name, move |t: &mut T| {
            f(t);
            Ok::<(), String>(())
        })
    }

    pub fn try_init_hook<E, F>(self, name: impl Into<String>, f: F) -> Self
    where
        E: Display,
        F: Fn(&mut T) -> Result<(), E> + Send + Sync + 'static,
    {
        self.descriptor.init_hooks.insert(
            name.into(),
            Box::new(move |instance: &mut (dyn Any + Send + Sync)| f(downcast_mut::<T>(instance)?).map_err(|e| e.to_string())),
        );
        self
    }

    /// Named destroy hook, run when the owning container closes.
    pub fn destroy_hook<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.try_destroy_hook(name, move |t: &T| {
            f(t);
            Ok::<(), String>(())
        })
    }

    pub fn try_destroy_hook<E, F>(self, name: impl Into<String>, f: F) -> Self
    where
        E: Display,
        F: Fn(&T) -> Result<(), E> + Send + Sync + 'static,
    {
        self.descriptor.destroy_hooks.insert(
            name.into(),
            Box::new(move |instance: &(dyn Any + Send + Sync)| f(downcast_ref::<T>(instance)?).map_err(|e| e.to_string())),
        );
        self
    }
}
