//! Runtime values: the `Value` enum and the handful of safe container
//! types it wraps.

pub mod dict;
pub mod function;
pub mod integer;
pub mod list;
pub mod native;
pub mod set;
pub mod string;

pub use dict::SafeDict;
pub use function::Function;
pub use integer::Int;
pub use list::SafeList;
pub use native::NativeFunction;
pub use set::SafeSet;
pub use string::SafeStr;

use crate::container::RefCount;
use crate::error::Error;
use crate::parser::SourceLocation;
use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};

/// A trait indicating a type has a name, used for error messages and the
/// `typeof` builtin.
pub trait NamedType {
	fn type_name(&self) -> &'static str;
}

#[derive(Clone)]
pub enum Value {
	None,
	Bool(bool),
	Int(Int),
	Float(f64),
	Str(SafeStr),
	List(SafeList),
	Set(SafeSet),
	Dict(SafeDict),
	Function(RefCount<Function>),
	Native(RefCount<NativeFunction>),
}

impl Debug for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::None => write!(f, "None"),
			Self::Bool(b) => write!(f, "{b}"),
			Self::Int(i) => write!(f, "{i}"),
			Self::Float(x) => write!(f, "{x}"),
			Self::Str(s) => write!(f, "{s:?}"),
			Self::List(l) => Debug::fmt(l, f),
			Self::Set(s) => Debug::fmt(s, f),
			Self::Dict(d) => Debug::fmt(d, f),
			Self::Function(func) => write!(f, "<function {}>", func.name),
			Self::Native(nf) => Debug::fmt(nf, f),
		}
	}
}

impl NamedType for Value {
	fn type_name(&self) -> &'static str {
		match self {
			Self::None => "NoneType",
			Self::Bool(_) => "bool",
			Self::Int(_) => "int",
			Self::Float(_) => "float",
			Self::Str(_) => "str",
			Self::List(_) => "list",
			Self::Set(_) => "set",
			Self::Dict(_) => "dict",
			Self::Function(_) => "function",
			Self::Native(_) => "builtin_function_or_method",
		}
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Self::Bool(b)
	}
}

impl From<Int> for Value {
	fn from(i: Int) -> Self {
		Self::Int(i)
	}
}

impl From<f64> for Value {
	fn from(x: f64) -> Self {
		Self::Float(x)
	}
}

impl From<SafeStr> for Value {
	fn from(s: SafeStr) -> Self {
		Self::Str(s)
	}
}

impl From<SafeList> for Value {
	fn from(l: SafeList) -> Self {
		Self::List(l)
	}
}

impl From<SafeSet> for Value {
	fn from(s: SafeSet) -> Self {
		Self::Set(s)
	}
}

impl From<SafeDict> for Value {
	fn from(d: SafeDict) -> Self {
		Self::Dict(d)
	}
}

impl Value {
	/// Truthiness, used by `if`/`while`/`and`/`or` and boolean coercion.
	/// Mirrors Python: zero/empty/`None` is false, everything else true.
	pub fn is_truthy(&self) -> bool {
		match self {
			Self::None => false,
			Self::Bool(b) => *b,
			Self::Int(i) => *i != Int::ZERO,
			Self::Float(x) => *x != 0.0,
			Self::Str(s) => !s.as_str().is_empty(),
			Self::List(l) => !l.read().is_empty(),
			Self::Set(s) => !s.read().is_empty(),
			Self::Dict(d) => !d.read().is_empty(),
			Self::Function(_) => true,
			Self::Native(_) => true,
		}
	}

	/// Structural equality used by `==`/`!=`, dict key lookups, and set
	/// membership. Numeric values compare across `Int`/`Float`/`Bool`, same
	/// as Python's numeric tower.
	pub fn value_eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::None, Self::None) => true,
			(Self::Bool(a), Self::Bool(b)) => a == b,
			(Self::Int(a), Self::Int(b)) => a == b,
			(Self::Float(a), Self::Float(b)) => a == b,
			(Self::Str(a), Self::Str(b)) => a.as_str() == b.as_str(),
			(Self::List(a), Self::List(b)) => {
				let a = a.read();
				let b = b.read();
				a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.value_eq(y))
			}
			(Self::Set(a), Self::Set(b)) => {
				let a = a.read();
				let b = b.read();
				a.len() == b.len() && a.iter().all(|x| b.iter().any(|y| x.value_eq(y)))
			}
			(Self::Dict(a), Self::Dict(b)) => {
				let a = a.read();
				let b = b.read();
				a.len() == b.len()
					&& a.iter().all(|(k, v)| b.iter().any(|(k2, v2)| k.value_eq(k2) && v.value_eq(v2)))
			}
			(Self::Function(a), Self::Function(b)) => RefCount::ptr_eq(a, b),
			(Self::Native(a), Self::Native(b)) => RefCount::ptr_eq(a, b),
			(Self::Int(a), Self::Bool(b)) | (Self::Bool(b), Self::Int(a)) => *a == Int::from(*b),
			(Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => a.to_f64() == *b,
			_ => false,
		}
	}

	/// Dict keys and set members must be hashable; `HashKey` is the wrapper
	/// that provides a consistent `Eq`/`Hash` pair matching `value_eq`. Only
	/// `None`, `Bool`, `Int`, and `Str` are hashable — `Float` (equality
	/// between floats is unreliable to hash consistently), the container
	/// types, and callables (`Function`/`Native`) all raise a `TypeError`
	/// when asked to be used as a key or set member.
	pub fn check_hashable(&self, where_: &SourceLocation) -> Result<(), Error> {
		match self {
			Self::None | Self::Bool(_) | Self::Int(_) | Self::Str(_) => Ok(()),
			_ => Err(Error::TypeError {
				where_: where_.clone(),
				detail: format!("unhashable type: '{}'", self.type_name()),
			}),
		}
	}
}

/// Wraps a [`Value`] known to be hashable (checked via
/// [`Value::check_hashable`]) so it can be used as an `IndexMap`/`IndexSet`
/// key with `Eq`/`Hash` consistent with [`Value::value_eq`].
#[derive(Clone, Debug)]
pub struct HashKey(pub Value);

impl PartialEq for HashKey {
	fn eq(&self, other: &Self) -> bool {
		self.0.value_eq(&other.0)
	}
}

impl Eq for HashKey {}

impl Hash for HashKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		match &self.0 {
			Value::None => 0u8.hash(state),
			Value::Bool(b) => {
				1u8.hash(state);
				Int::from(*b).inner().hash(state);
			}
			Value::Int(i) => {
				1u8.hash(state);
				i.inner().hash(state);
			}
			Value::Str(s) => {
				2u8.hash(state);
				s.as_str().hash(state);
			}
			Value::Float(_) | Value::List(_) | Value::Set(_) | Value::Dict(_) | Value::Function(_) | Value::Native(_) => {
				unreachable!("unhashable values are rejected by check_hashable before insertion")
			}
		}
	}
}
