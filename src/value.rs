//! Declared values and their conversion into injected parameters.

use std::any::{type_name, Any};
use std::sync::Arc;

/// Type-erased handle to a constructed bean.
pub type Bean = Arc<dyn Any + Send + Sync>;

/// A value declared for a constructor argument or property.
///
/// Literals stay as text until injection time, where they are coerced to
/// whatever primitive type the target parameter declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// Literal text, e.g. `"25"` or `"John Doe"`
    Literal(String),
    /// Id (or alias) of another bean definition
    Ref(String),
}

impl ArgValue {
    /// Literal value from anything displayable.
    ///
    /// ```rust
    /// use beanwire::ArgValue;
    ///
    /// assert_eq!(ArgValue::value(25), ArgValue::Literal("25".into()));
    /// assert_eq!(ArgValue::value("John Doe"), ArgValue::Literal("John Doe".into()));
    /// ```
    pub fn value(v: impl ToString) -> Self {
        ArgValue::Literal(v.to_string())
    }

    /// Reference to another bean.
    pub fn reference(id: impl Into<String>) -> Self {
        ArgValue::Ref(id.into())
    }

    /// The referenced id, if this is a reference.
    pub fn as_ref_id(&self) -> Option<&str> {
        match self {
            ArgValue::Ref(id) => Some(id),
            ArgValue::Literal(_) => None,
        }
    }
}

/// A declared value after resolution, ready to be converted by [`Inject`].
#[derive(Clone)]
pub enum Resolved {
    /// Literal text, not yet coerced
    Literal(String),
    /// A constructed bean together with the id it was resolved from
    Bean { id: String, instance: Bean },
}

impl std::fmt::Debug for Resolved {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolved::Literal(s) => f.debug_tuple("Literal").field(s).finish(),
            Resolved::Bean { id, .. } => f.debug_struct("Bean").field("id", id).finish_non_exhaustive(),
        }
    }
}

/// Conversion from a resolved value into a constructor parameter or setter
/// argument.
///
/// Primitive types parse the literal text; `Arc<T>` downcasts a referenced
/// bean. The error string explains the mismatch and ends up inside an
/// instantiation or injection error.
///
/// # Examples
///
/// ```rust
/// use beanwire::{Inject, Resolved};
///
/// let age = u32::inject(&Resolved::Literal("25".into())).unwrap();
/// assert_eq!(age, 25);
///
/// assert!(bool::inject(&Resolved::Literal("maybe".into())).is_err());
/// ```
pub trait Inject: Sized {
    fn inject(value: &Resolved) -> Result<Self, String>;
}

fn literal<'a, T>(value: &'a Resolved) -> Result<&'a str, String> {
    match value {
        Resolved::Literal(s) => Ok(s),
        Resolved::Bean { id, .. } => Err(format!(
            "expected a literal `{}`, found reference to bean `{}`",
            type_name::<T>(),
            id
        )),
    }
}

macro_rules! inject_parsed {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Inject for $ty {
                fn inject(value: &Resolved) -> Result<Self, String> {
                    let text = literal::<$ty>(value)?;
                    text.trim().parse::<$ty>().map_err(|e| {
                        format!("cannot convert `{}` to `{}`: {}", text, stringify!($ty), e)
                    })
                }
            }
        )*
    };
}

inject_parsed!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char);

impl Inject for String {
    fn inject(value: &Resolved) -> Result<Self, String> {
        literal::<String>(value).map(str::to_owned)
    }
}

impl<T: Any + Send + Sync> Inject for Arc<T> {
    fn inject(value: &Resolved) -> Result<Self, String> {
        match value {
            Resolved::Bean { id, instance } => instance.clone().downcast::<T>().map_err(|_| {
                format!("bean `{}` is not a `{}`", id, type_name::<T>())
            }),
            Resolved::Literal(s) => Err(format!(
                "expected a reference to a `{}`, found literal `{}`",
                type_name::<T>(),
                s
            )),
        }
    }
}

impl<T: Inject> Inject for Option<T> {
    fn inject(value: &Resolved) -> Result<Self, String> {
        match value {
            Resolved::Literal(s) if s.is_empty() => Ok(None),
            _ => T::inject(value).map(Some),
        }
    }
}

/// Constructor parameter lists, implemented for tuples of [`Inject`] types.
///
/// The arity is used to pick candidate constructors before any conversion
/// is attempted.
pub trait ConstructorArgs: Sized {
    const ARITY: usize;

    fn from_resolved(args: &[Resolved]) -> Result<Self, String>;
}

impl ConstructorArgs for () {
    const ARITY: usize = 0;

    fn from_resolved(_args: &[Resolved]) -> Result<Self, String> {
        Ok(())
    }
}

macro_rules! constructor_args {
    ($arity:expr; $($name:ident : $idx:tt),+) => {
        impl<$($name: Inject),+> ConstructorArgs for ($($name,)+) {
            const ARITY: usize = $arity;

            fn from_resolved(args: &[Resolved]) -> Result<Self, String> {
                if args.len() != Self::ARITY {
                    return Err(format!("expected {} arguments, got {}", Self::ARITY, args.len()));
                }
                Ok(($(
                    $name::inject(&args[$idx]).map_err(|e| format!("argument {}: {}", $idx, e))?,
                )+))
            }
        }
    };
}

constructor_args!(1; A: 0);
constructor_args!(2; A: 0, B: 1);
constructor_args!(3; A: 0, B: 1, C: 2);
constructor_args!(4; A: 0, B: 1, C: 2, D: 3);
constructor_args!(5; A: 0, B: 1, C: 2, D: 3, E: 4);
constructor_args!(6; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
