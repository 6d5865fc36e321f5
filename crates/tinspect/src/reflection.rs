//! Reflection tree nodes
//!
//! A reflection tree describes one class: its constructor, properties and
//! methods, each with resolved types and attached annotations. Constructor
//! parameters promoted to properties appear in the property list with their
//! parameter index set.

use crate::decorator::DecoratorEntry;
use crate::types::{ClassId, TypeClassification, TypeRef};

/// Kinds of reflection nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectionKind {
    /// A class
    Class,
    /// A constructor
    Constructor,
    /// A method
    Method,
    /// A declared property
    Property,
    /// A method or constructor parameter
    Parameter,
    /// A constructor parameter exposed as a property
    ParameterProperty,
}

/// Reflection of a class
#[derive(Debug, Clone)]
pub struct ClassReflection {
    /// Identity of the reflected class
    pub ty: ClassId,
    /// Class name
    pub name: String,
    /// Identity of the direct parent ([`ClassId::OBJECT`] at the root)
    pub super_type: ClassId,
    /// The constructor
    pub ctor: ConstructorReflection,
    /// Properties, including parameter properties
    pub properties: Vec<PropertyReflection>,
    /// Methods
    pub methods: Vec<MethodReflection>,
    /// Class-level annotations
    pub decorators: Vec<DecoratorEntry>,
    /// Class-level annotations moved onto members by redistribution
    pub removed_decorators: Vec<DecoratorEntry>,
    /// Always `Class` once classified
    pub type_classification: Option<TypeClassification>,
}

impl ClassReflection {
    /// Create an empty reflection for a class
    pub fn new(ty: ClassId, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: name.into(),
            super_type: ClassId::OBJECT,
            ctor: ConstructorReflection::default(),
            properties: Vec::new(),
            methods: Vec::new(),
            decorators: Vec::new(),
            removed_decorators: Vec::new(),
            type_classification: None,
        }
    }

    /// The synthetic base every hierarchy is merged onto
    pub fn empty_base() -> Self {
        Self::new(ClassId::OBJECT, "Object")
    }

    /// Find a property by name
    pub fn property(&self, name: &str) -> Option<&PropertyReflection> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Find a method by name
    pub fn method(&self, name: &str) -> Option<&MethodReflection> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Reflection of a constructor
#[derive(Debug, Clone, Default)]
pub struct ConstructorReflection {
    /// Parameters in declaration order
    pub parameters: Vec<ParameterReflection>,
    /// Constructor annotations
    pub decorators: Vec<DecoratorEntry>,
}

/// Reflection of a method
#[derive(Debug, Clone)]
pub struct MethodReflection {
    /// Method name
    pub name: String,
    /// Parameters in declaration order
    pub parameters: Vec<ParameterReflection>,
    /// Resolved return type
    pub return_type: Option<TypeRef>,
    /// Method annotations
    pub decorators: Vec<DecoratorEntry>,
    /// Classification of the return type
    pub type_classification: Option<TypeClassification>,
}

impl MethodReflection {
    /// Create a method without parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type: None,
            decorators: Vec::new(),
            type_classification: None,
        }
    }
}

/// Reflection of a property or of a parameter property
#[derive(Debug, Clone)]
pub struct PropertyReflection {
    /// Property name
    pub name: String,
    /// Constructor parameter index when this is a parameter property
    pub index: Option<usize>,
    /// Resolved type
    pub ty: Option<TypeRef>,
    /// Property annotations
    pub decorators: Vec<DecoratorEntry>,
    /// Classification of the type
    pub type_classification: Option<TypeClassification>,
}

impl PropertyReflection {
    /// Create a declared property
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
            ty: None,
            decorators: Vec::new(),
            type_classification: None,
        }
    }

    /// Create a property backed by constructor parameter `index`
    pub fn from_parameter(name: impl Into<String>, index: usize) -> Self {
        Self {
            index: Some(index),
            ..Self::new(name)
        }
    }

    /// Check if this property comes from a constructor parameter
    pub fn is_parameter_property(&self) -> bool {
        self.index.is_some()
    }
}

/// Reflection of a parameter
#[derive(Debug, Clone)]
pub struct ParameterReflection {
    /// Parameter name
    pub name: String,
    /// Position in the owning parameter list
    pub index: usize,
    /// Resolved type
    pub ty: Option<TypeRef>,
    /// Parameter annotations
    pub decorators: Vec<DecoratorEntry>,
    /// Classification of the type
    pub type_classification: Option<TypeClassification>,
}

impl ParameterReflection {
    /// Create a parameter
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
            ty: None,
            decorators: Vec::new(),
            type_classification: None,
        }
    }
}

/// Any reflection node, as seen by member visitors
#[derive(Debug, Clone)]
pub enum Reflection {
    /// A class
    Class(ClassReflection),
    /// A constructor
    Constructor(ConstructorReflection),
    /// A method
    Method(MethodReflection),
    /// A property or parameter property
    Property(PropertyReflection),
    /// A parameter
    Parameter(ParameterReflection),
}

impl Reflection {
    /// The node kind
    pub fn kind(&self) -> ReflectionKind {
        match self {
            Reflection::Class(_) => ReflectionKind::Class,
            Reflection::Constructor(_) => ReflectionKind::Constructor,
            Reflection::Method(_) => ReflectionKind::Method,
            Reflection::Property(p) if p.is_parameter_property() => {
                ReflectionKind::ParameterProperty
            }
            Reflection::Property(_) => ReflectionKind::Property,
            Reflection::Parameter(_) => ReflectionKind::Parameter,
        }
    }

    /// The node name; constructors are named `"constructor"`
    pub fn name(&self) -> &str {
        match self {
            Reflection::Class(c) => &c.name,
            Reflection::Constructor(_) => "constructor",
            Reflection::Method(m) => &m.name,
            Reflection::Property(p) => &p.name,
            Reflection::Parameter(p) => &p.name,
        }
    }

    /// Attached annotations
    pub fn decorators(&self) -> &[DecoratorEntry] {
        match self {
            Reflection::Class(c) => &c.decorators,
            Reflection::Constructor(c) => &c.decorators,
            Reflection::Method(m) => &m.decorators,
            Reflection::Property(p) => &p.decorators,
            Reflection::Parameter(p) => &p.decorators,
        }
    }

    /// Attached annotations, mutably
    pub fn decorators_mut(&mut self) -> &mut Vec<DecoratorEntry> {
        match self {
            Reflection::Class(c) => &mut c.decorators,
            Reflection::Constructor(c) => &mut c.decorators,
            Reflection::Method(m) => &mut m.decorators,
            Reflection::Property(p) => &mut p.decorators,
            Reflection::Parameter(p) => &mut p.decorators,
        }
    }

    /// The resolved type, or the return type for methods
    pub fn resolved_type(&self) -> Option<&TypeRef> {
        match self {
            Reflection::Method(m) => m.return_type.as_ref(),
            Reflection::Property(p) => p.ty.as_ref(),
            Reflection::Parameter(p) => p.ty.as_ref(),
            Reflection::Class(_) | Reflection::Constructor(_) => None,
        }
    }

    /// Replace the type (or return type); ignored for classes and constructors
    pub fn set_resolved_type(&mut self, ty: Option<TypeRef>) {
        match self {
            Reflection::Method(m) => m.return_type = ty,
            Reflection::Property(p) => p.ty = ty,
            Reflection::Parameter(p) => p.ty = ty,
            Reflection::Class(_) | Reflection::Constructor(_) => {}
        }
    }

    /// Unwrap a class node
    pub fn into_class(self) -> Option<ClassReflection> {
        match self {
            Reflection::Class(c) => Some(c),
            _ => None,
        }
    }

    /// Unwrap a constructor node
    pub fn into_constructor(self) -> Option<ConstructorReflection> {
        match self {
            Reflection::Constructor(c) => Some(c),
            _ => None,
        }
    }

    /// Unwrap a method node
    pub fn into_method(self) -> Option<MethodReflection> {
        match self {
            Reflection::Method(m) => Some(m),
            _ => None,
        }
    }

    /// Unwrap a property or parameter property node
    pub fn into_property(self) -> Option<PropertyReflection> {
        match self {
            Reflection::Property(p) => Some(p),
            _ => None,
        }
    }

    /// Unwrap a parameter node
    pub fn into_parameter(self) -> Option<ParameterReflection> {
        match self {
            Reflection::Parameter(p) => Some(p),
            _ => None,
        }
    }

    /// Set the classification; ignored for constructors
    pub fn set_type_classification(&mut self, classification: Option<TypeClassification>) {
        match self {
            Reflection::Class(c) => c.type_classification = classification,
            Reflection::Method(m) => m.type_classification = classification,
            Reflection::Property(p) => p.type_classification = classification,
            Reflection::Parameter(p) => p.type_classification = classification,
            Reflection::Constructor(_) => {}
        }
    }
}
