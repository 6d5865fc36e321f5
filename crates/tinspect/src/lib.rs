//! Tinspect Reflection
//!
//! Inheritance-aware reflection trees for classes. A class level is parsed,
//! purified by a pipeline of member visitors (design types, annotations, type
//! overrides, generic substitution, classification, filtering), merged over
//! its ancestors and finally rewritten by a parent visitor that redistributes
//! class-level annotations onto members.

#![warn(missing_docs)]

pub mod decorator;
pub mod error;
pub mod generic;
pub mod host;
pub mod merge;
pub mod reflection;
pub mod reflector;
pub mod registry;
pub mod store;
pub mod types;
pub mod visitor;
pub mod walker;

pub use decorator::{
    ApplyTo, DecoratorEntry, DecoratorOption, DecoratorTarget, DecoratorValue, TypeOverride,
};
pub use error::{ReflectError, Result};
pub use generic::GenericMap;
pub use host::{
    AncestorProvider, AnnotationSource, ClassParser, DesignTypeSource, ReflectHost, TypeFactory,
};
pub use reflection::{
    ClassReflection, ConstructorReflection, MethodReflection, ParameterReflection,
    PropertyReflection, Reflection, ReflectionKind,
};
pub use reflector::{ReflectConfig, ReflectOptions, Reflector};
pub use registry::{ClassDecl, ClassRegistry, MethodDecl};
pub use store::AnnotationStore;
pub use types::{Builtin, ClassId, TypeClassification, TypeRef, TypeSource};
pub use walker::{MemberContext, MemberVisitor, ParentContext, ParentVisitor};
