//! Type references used by reflection nodes
//!
//! A [`TypeRef`] is what a property, parameter or method return resolves to.
//! It is either a builtin, a class known to the host, a symbolic generic
//! template name still waiting for substitution, or an array of one of those.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Identity of a class known to the reflection host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassId(pub(crate) u32);

impl ClassId {
    /// The implicit root every hierarchy terminates in
    pub const OBJECT: ClassId = ClassId(0);

    /// Create an id from its raw value
    pub fn from_raw(raw: u32) -> Self {
        ClassId(raw)
    }

    /// Get the raw id value
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({})", self.0)
    }
}

/// Builtin types that are never treated as user-defined classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Builtin {
    /// `Object`, also the element type of an untyped array
    Object,
    /// `String`
    String,
    /// `Number`
    Number,
    /// `Boolean`
    Boolean,
    /// `Date`
    Date,
    /// `Array` as emitted for array declarations, before refinement
    Array,
    /// `Promise`
    Promise,
    /// `Function`
    Function,
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Builtin::Object => "Object",
            Builtin::String => "String",
            Builtin::Number => "Number",
            Builtin::Boolean => "Boolean",
            Builtin::Date => "Date",
            Builtin::Array => "Array",
            Builtin::Promise => "Promise",
            Builtin::Function => "Function",
        };
        f.write_str(name)
    }
}

/// A resolved (or partially resolved) member type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A builtin type
    Builtin(Builtin),
    /// A class declared to the host (including synthetic generic instances)
    Class(ClassId),
    /// Symbolic generic template name, e.g. `T`
    Template(String),
    /// Array of the wrapped type
    Array(Box<TypeRef>),
}

impl TypeRef {
    /// `Object`
    pub const OBJECT: TypeRef = TypeRef::Builtin(Builtin::Object);
    /// `String`
    pub const STRING: TypeRef = TypeRef::Builtin(Builtin::String);
    /// `Number`
    pub const NUMBER: TypeRef = TypeRef::Builtin(Builtin::Number);
    /// `Boolean`
    pub const BOOLEAN: TypeRef = TypeRef::Builtin(Builtin::Boolean);
    /// `Date`
    pub const DATE: TypeRef = TypeRef::Builtin(Builtin::Date);

    /// Reference a class
    pub fn class(id: ClassId) -> Self {
        TypeRef::Class(id)
    }

    /// Reference a symbolic template parameter
    pub fn template(name: impl Into<String>) -> Self {
        TypeRef::Template(name.into())
    }

    /// Wrap a type as "array of T"
    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array(Box::new(element))
    }

    /// The array marker for a declaration whose element type is unknown
    pub fn unknown_array() -> Self {
        TypeRef::array(TypeRef::OBJECT)
    }

    /// Check if this is an array wrap
    pub fn is_array(&self) -> bool {
        matches!(self, TypeRef::Array(_))
    }

    /// The type with one level of array wrapping removed
    pub fn scalar(&self) -> &TypeRef {
        match self {
            TypeRef::Array(element) => element,
            other => other,
        }
    }

    /// The template name, if this is a symbolic reference
    pub fn as_template(&self) -> Option<&str> {
        match self {
            TypeRef::Template(name) => Some(name),
            _ => None,
        }
    }

    /// Check if this (ignoring one array level) is still symbolic
    pub fn is_symbolic(&self) -> bool {
        self.scalar().as_template().is_some()
    }

    /// The class id, if this references a class
    pub fn as_class(&self) -> Option<ClassId> {
        match self {
            TypeRef::Class(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Builtin(builtin) => write!(f, "{}", builtin),
            TypeRef::Class(id) => write!(f, "{}", id),
            TypeRef::Template(name) => write!(f, "'{}'", name),
            TypeRef::Array(element) => write!(f, "[{}]", element),
        }
    }
}

impl From<Builtin> for TypeRef {
    fn from(builtin: Builtin) -> Self {
        TypeRef::Builtin(builtin)
    }
}

impl From<ClassId> for TypeRef {
    fn from(id: ClassId) -> Self {
        TypeRef::Class(id)
    }
}

/// Where an explicit type annotation gets its type from
///
/// The lazy form defers evaluation so an annotation can name a class that is
/// declared after it.
#[derive(Clone)]
pub enum TypeSource {
    /// The type is known when the annotation is written
    Direct(TypeRef),
    /// The type is produced by a callback when the override is extracted
    Lazy(Arc<dyn Fn() -> TypeRef + Send + Sync>),
}

impl TypeSource {
    /// Create a lazily evaluated source
    pub fn lazy(callback: impl Fn() -> TypeRef + Send + Sync + 'static) -> Self {
        TypeSource::Lazy(Arc::new(callback))
    }

    /// Evaluate the source
    pub fn resolve(&self) -> TypeRef {
        match self {
            TypeSource::Direct(ty) => ty.clone(),
            TypeSource::Lazy(callback) => callback(),
        }
    }
}

impl fmt::Debug for TypeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSource::Direct(ty) => f.debug_tuple("Direct").field(ty).finish(),
            TypeSource::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

impl From<TypeRef> for TypeSource {
    fn from(ty: TypeRef) -> Self {
        TypeSource::Direct(ty)
    }
}

/// Coarse classification of a resolved type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeClassification {
    /// A user-defined class
    Class,
    /// An array wrap
    Array,
    /// Anything else
    Primitive,
}

impl TypeClassification {
    /// Classify a resolved type; `None` when nothing was resolved
    pub fn of(ty: Option<&TypeRef>) -> Option<Self> {
        match ty? {
            TypeRef::Array(_) => Some(TypeClassification::Array),
            TypeRef::Class(_) => Some(TypeClassification::Class),
            TypeRef::Builtin(_) | TypeRef::Template(_) => Some(TypeClassification::Primitive),
        }
    }
}
