//! Collaborator interfaces
//!
//! The walkers never inspect class declarations directly. Everything they
//! need (the single-level parse, the parent of a class, design-time types,
//! annotations, synthetic generic classes) comes through these traits, so the
//! pipeline can run against [`crate::ClassRegistry`] or any other source.

use crate::decorator::{DecoratorEntry, DecoratorTarget};
use crate::error::Result;
use crate::reflection::ClassReflection;
use crate::types::{ClassId, TypeRef};

/// Produces the unmerged reflection of one class level.
pub trait ClassParser: Send + Sync {
    /// Parse the members declared directly on `ty`.
    ///
    /// Annotation lists are empty and types unset; the member pipeline fills
    /// them in.
    fn parse(&self, ty: ClassId) -> Result<ClassReflection>;
}

/// Provides the inheritance chain.
pub trait AncestorProvider: Send + Sync {
    /// Get the direct parent of a class.
    ///
    /// Returns `None` when the chain terminates at the implicit root.
    fn parent_of(&self, ty: ClassId) -> Option<ClassId>;

    /// Get the declared name of a class.
    fn class_name(&self, ty: ClassId) -> String;
}

/// Design-time types captured by the compiler.
pub trait DesignTypeSource: Send + Sync {
    /// Declared type of a property.
    fn property_type(&self, ty: ClassId, property: &str) -> Option<TypeRef>;

    /// Declared return type of a method.
    fn return_type(&self, ty: ClassId, method: &str) -> Option<TypeRef>;

    /// Declared parameter types, by position.
    ///
    /// `method` is `None` for the constructor.
    fn parameter_types(&self, ty: ClassId, method: Option<&str>) -> Vec<Option<TypeRef>>;
}

/// Creates concrete classes for generic instantiations.
pub trait TypeFactory: Send + Sync {
    /// Return a class extending `parent` with the given type arguments.
    fn create_generic(&self, parent: ClassId, args: Vec<TypeRef>) -> ClassId;
}

/// Read access to the annotation store.
pub trait AnnotationSource: Send + Sync {
    /// Annotations attached to exactly this target of `ty`.
    fn annotations(
        &self,
        ty: ClassId,
        target: DecoratorTarget,
        name: &str,
        index: Option<usize>,
    ) -> Vec<DecoratorEntry>;

    /// Class-level annotations of `ty`.
    fn class_annotations(&self, ty: ClassId, class_name: &str) -> Vec<DecoratorEntry> {
        self.annotations(ty, DecoratorTarget::Class, class_name, None)
    }
}

/// The combined host interface used by the walkers.
pub trait ReflectHost:
    ClassParser + AncestorProvider + DesignTypeSource + TypeFactory + AnnotationSource
{
}

impl<T> ReflectHost for T where
    T: ClassParser + AncestorProvider + DesignTypeSource + TypeFactory + AnnotationSource
{
}
