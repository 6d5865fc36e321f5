//! In-memory class registry
//!
//! Holds class declarations (members plus the design-time types the compiler
//! captured for them) and the annotation store, and implements every host
//! interface on top of them. Generic instantiations requested during a walk
//! are registered here as synthetic subclasses.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::decorator::{DecoratorEntry, DecoratorTarget};
use crate::error::{ReflectError, Result};
use crate::host::{AncestorProvider, AnnotationSource, ClassParser, DesignTypeSource, TypeFactory};
use crate::reflection::{
    ClassReflection, MethodReflection, ParameterReflection, PropertyReflection,
};
use crate::store::AnnotationStore;
use crate::types::{ClassId, TypeRef};

/// Declared parameter
#[derive(Debug, Clone)]
pub struct ParameterDecl {
    /// Parameter name
    pub name: String,
    /// Design-time type
    pub ty: Option<TypeRef>,
}

/// Declared property
#[derive(Debug, Clone)]
pub struct PropertyDecl {
    /// Property name
    pub name: String,
    /// Design-time type
    pub ty: Option<TypeRef>,
}

/// Declared method
#[derive(Debug, Clone)]
pub struct MethodDecl {
    /// Method name
    pub name: String,
    /// Design-time return type
    pub return_type: Option<TypeRef>,
    /// Parameters in order
    pub parameters: Vec<ParameterDecl>,
}

impl MethodDecl {
    /// Create a method without parameters or return type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: None,
            parameters: Vec::new(),
        }
    }

    /// Set the design-time return type
    pub fn returns(mut self, ty: impl Into<Option<TypeRef>>) -> Self {
        self.return_type = ty.into();
        self
    }

    /// Append a parameter
    pub fn param(mut self, name: impl Into<String>, ty: impl Into<Option<TypeRef>>) -> Self {
        self.parameters.push(ParameterDecl {
            name: name.into(),
            ty: ty.into(),
        });
        self
    }
}

/// Declaration of one class level
#[derive(Debug, Clone)]
pub struct ClassDecl {
    /// Class name
    pub name: String,
    /// Direct parent, if any
    pub parent: Option<ClassId>,
    /// Constructor parameters
    pub constructor: Vec<ParameterDecl>,
    /// Declared properties
    pub properties: Vec<PropertyDecl>,
    /// Declared methods
    pub methods: Vec<MethodDecl>,
}

impl ClassDecl {
    /// Create an empty declaration
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            constructor: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Set the parent class
    pub fn extends(mut self, parent: ClassId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Append a constructor parameter
    pub fn constructor_param(
        mut self,
        name: impl Into<String>,
        ty: impl Into<Option<TypeRef>>,
    ) -> Self {
        self.constructor.push(ParameterDecl {
            name: name.into(),
            ty: ty.into(),
        });
        self
    }

    /// Append a property
    pub fn property(mut self, name: impl Into<String>, ty: impl Into<Option<TypeRef>>) -> Self {
        self.properties.push(PropertyDecl {
            name: name.into(),
            ty: ty.into(),
        });
        self
    }

    /// Append a method
    pub fn method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }
}

/// Registry of class declarations and their annotations
///
/// Ids are assigned in declaration order, and a parent must already be
/// registered when its child is declared, so hierarchies are acyclic.
#[derive(Debug)]
pub struct ClassRegistry {
    /// Declarations indexed by class id; index 0 is the implicit root
    classes: RwLock<Vec<ClassDecl>>,
    /// Annotation side-table
    annotations: RwLock<AnnotationStore>,
    /// Synthetic generic instantiations by (parent, arguments)
    generics: RwLock<FxHashMap<(ClassId, Vec<TypeRef>), ClassId>>,
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRegistry {
    /// Create a registry holding only the implicit root
    pub fn new() -> Self {
        Self {
            classes: RwLock::new(vec![ClassDecl::new("Object")]),
            annotations: RwLock::new(AnnotationStore::new()),
            generics: RwLock::new(FxHashMap::default()),
        }
    }

    /// Register a class declaration
    pub fn declare(&self, decl: ClassDecl) -> Result<ClassId> {
        let mut classes = self.classes.write();
        if let Some(parent) = decl.parent {
            if parent.0 as usize >= classes.len() {
                return Err(ReflectError::UnknownClass { id: parent });
            }
        }
        let id = ClassId(classes.len() as u32);
        classes.push(decl);
        Ok(id)
    }

    /// Number of registered classes, including the implicit root
    pub fn len(&self) -> usize {
        self.classes.read().len()
    }

    /// Check if only the implicit root is registered
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Annotate the class itself
    pub fn decorate_class(&self, ty: ClassId, entry: DecoratorEntry) {
        let name = self.class_name(ty);
        self.annotations
            .write()
            .define(ty, DecoratorTarget::Class, name, None, entry);
    }

    /// Annotate a property
    pub fn decorate_property(&self, ty: ClassId, property: &str, entry: DecoratorEntry) {
        self.annotations
            .write()
            .define(ty, DecoratorTarget::Property, property, None, entry);
    }

    /// Annotate a method
    pub fn decorate_method(&self, ty: ClassId, method: &str, entry: DecoratorEntry) {
        self.annotations
            .write()
            .define(ty, DecoratorTarget::Method, method, None, entry);
    }

    /// Annotate the constructor
    pub fn decorate_constructor(&self, ty: ClassId, entry: DecoratorEntry) {
        self.annotations
            .write()
            .define(ty, DecoratorTarget::Constructor, "constructor", None, entry);
    }

    /// Annotate parameter `index` of a method
    pub fn decorate_parameter(
        &self,
        ty: ClassId,
        method: &str,
        index: usize,
        entry: DecoratorEntry,
    ) {
        self.annotations
            .write()
            .define(ty, DecoratorTarget::Parameter, method, Some(index), entry);
    }

    /// Annotate constructor parameter `index`
    pub fn decorate_constructor_parameter(&self, ty: ClassId, index: usize, entry: DecoratorEntry) {
        self.decorate_parameter(ty, "constructor", index, entry);
    }

    /// Remove every annotation declared on `ty`; returns true if any existed
    ///
    /// Reflections already cached by a [`Reflector`](crate::Reflector) keep
    /// the old annotations until they are flushed.
    pub fn clear_annotations(&self, ty: ClassId) -> bool {
        self.annotations.write().clear_target(ty)
    }

    fn type_name(&self, classes: &[ClassDecl], ty: &TypeRef) -> String {
        match ty {
            TypeRef::Class(id) => classes
                .get(id.0 as usize)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| id.to_string()),
            TypeRef::Array(element) => format!("{}[]", self.type_name(classes, element)),
            TypeRef::Builtin(builtin) => builtin.to_string(),
            TypeRef::Template(name) => name.clone(),
        }
    }
}

impl ClassParser for ClassRegistry {
    fn parse(&self, ty: ClassId) -> Result<ClassReflection> {
        let classes = self.classes.read();
        let decl = classes
            .get(ty.0 as usize)
            .ok_or(ReflectError::UnknownClass { id: ty })?;

        let mut reflection = ClassReflection::new(ty, decl.name.clone());
        reflection.super_type = decl.parent.unwrap_or(ClassId::OBJECT);
        reflection.ctor.parameters = decl
            .constructor
            .iter()
            .enumerate()
            .map(|(i, p)| ParameterReflection::new(p.name.clone(), i))
            .collect();
        reflection.properties = decl
            .properties
            .iter()
            .map(|p| PropertyReflection::new(p.name.clone()))
            .collect();
        for (i, param) in decl.constructor.iter().enumerate() {
            if !decl.properties.iter().any(|p| p.name == param.name) {
                reflection
                    .properties
                    .push(PropertyReflection::from_parameter(param.name.clone(), i));
            }
        }
        reflection.methods = decl
            .methods
            .iter()
            .map(|m| MethodReflection {
                parameters: m
                    .parameters
                    .iter()
                    .enumerate()
                    .map(|(i, p)| ParameterReflection::new(p.name.clone(), i))
                    .collect(),
                ..MethodReflection::new(m.name.clone())
            })
            .collect();
        Ok(reflection)
    }
}

impl AncestorProvider for ClassRegistry {
    fn parent_of(&self, ty: ClassId) -> Option<ClassId> {
        self.classes
            .read()
            .get(ty.0 as usize)
            .and_then(|c| c.parent)
            .filter(|p| *p != ClassId::OBJECT)
    }

    fn class_name(&self, ty: ClassId) -> String {
        self.classes
            .read()
            .get(ty.0 as usize)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| ty.to_string())
    }
}

impl DesignTypeSource for ClassRegistry {
    fn property_type(&self, ty: ClassId, property: &str) -> Option<TypeRef> {
        let classes = self.classes.read();
        let decl = classes.get(ty.0 as usize)?;
        decl.properties
            .iter()
            .find(|p| p.name == property)
            .and_then(|p| p.ty.clone())
    }

    fn return_type(&self, ty: ClassId, method: &str) -> Option<TypeRef> {
        let classes = self.classes.read();
        let decl = classes.get(ty.0 as usize)?;
        decl.methods
            .iter()
            .find(|m| m.name == method)
            .and_then(|m| m.return_type.clone())
    }

    fn parameter_types(&self, ty: ClassId, method: Option<&str>) -> Vec<Option<TypeRef>> {
        let classes = self.classes.read();
        let Some(decl) = classes.get(ty.0 as usize) else {
            return Vec::new();
        };
        let params = match method {
            None => Some(&decl.constructor),
            Some(name) => decl
                .methods
                .iter()
                .find(|m| m.name == name)
                .map(|m| &m.parameters),
        };
        params
            .map(|params| params.iter().map(|p| p.ty.clone()).collect())
            .unwrap_or_default()
    }
}

impl TypeFactory for ClassRegistry {
    fn create_generic(&self, parent: ClassId, args: Vec<TypeRef>) -> ClassId {
        let key = (parent, args);
        if let Some(id) = self.generics.read().get(&key) {
            return *id;
        }

        let mut generics = self.generics.write();
        if let Some(id) = generics.get(&key) {
            return *id;
        }
        let (parent, args) = key;
        let id = {
            let mut classes = self.classes.write();
            let arg_names: Vec<String> =
                args.iter().map(|a| self.type_name(&classes, a)).collect();
            let name = format!(
                "{}<{}>",
                self.type_name(&classes, &TypeRef::Class(parent)),
                arg_names.join(", ")
            );
            let id = ClassId(classes.len() as u32);
            classes.push(ClassDecl::new(name.clone()).extends(parent));
            self.annotations.write().define(
                id,
                DecoratorTarget::Class,
                name.clone(),
                None,
                DecoratorEntry::generic_type(args.clone()),
            );
            tracing::debug!(class = %name, %id, "created synthetic generic class");
            id
        };
        generics.insert((parent, args), id);
        id
    }
}

impl AnnotationSource for ClassRegistry {
    fn annotations(
        &self,
        ty: ClassId,
        target: DecoratorTarget,
        name: &str,
        index: Option<usize>,
    ) -> Vec<DecoratorEntry> {
        self.annotations.read().lookup(ty, target, name, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorator::find_type_arguments;
    use crate::reflection::ReflectionKind;
    use crate::reflection::Reflection;

    #[test]
    fn test_declare_assigns_sequential_ids() {
        let registry = ClassRegistry::new();
        assert!(registry.is_empty());
        let a = registry.declare(ClassDecl::new("A")).unwrap();
        let b = registry.declare(ClassDecl::new("B").extends(a)).unwrap();
        assert_eq!(a.as_u32(), 1);
        assert_eq!(b.as_u32(), 2);
        assert_eq!(registry.parent_of(b), Some(a));
        assert_eq!(registry.parent_of(a), None);
        assert_eq!(registry.class_name(b), "B");
    }

    #[test]
    fn test_declare_rejects_unknown_parent() {
        let registry = ClassRegistry::new();
        let err = registry
            .declare(ClassDecl::new("Orphan").extends(ClassId(42)))
            .unwrap_err();
        assert_eq!(err, ReflectError::UnknownClass { id: ClassId(42) });
    }

    #[test]
    fn test_parse_single_level() {
        let registry = ClassRegistry::new();
        let ty = registry
            .declare(
                ClassDecl::new("User")
                    .constructor_param("id", TypeRef::NUMBER)
                    .constructor_param("name", TypeRef::STRING)
                    .property("name", TypeRef::STRING)
                    .method(MethodDecl::new("save").param("force", TypeRef::BOOLEAN)),
            )
            .unwrap();

        let parsed = registry.parse(ty).unwrap();
        assert_eq!(parsed.name, "User");
        assert_eq!(parsed.ctor.parameters.len(), 2);
        // "name" is declared, so only "id" becomes a parameter property
        assert_eq!(parsed.properties.len(), 2);
        assert_eq!(parsed.properties[0].name, "name");
        assert_eq!(parsed.properties[1].name, "id");
        assert_eq!(parsed.properties[1].index, Some(0));
        assert_eq!(
            Reflection::Property(parsed.properties[1].clone()).kind(),
            ReflectionKind::ParameterProperty
        );
        assert_eq!(parsed.methods[0].parameters[0].name, "force");
        assert!(parsed.decorators.is_empty());
        assert!(parsed.properties[0].ty.is_none());
    }

    #[test]
    fn test_parse_unknown_class() {
        let registry = ClassRegistry::new();
        assert!(registry.parse(ClassId(9)).is_err());
    }

    #[test]
    fn test_design_types() {
        let registry = ClassRegistry::new();
        let ty = registry
            .declare(
                ClassDecl::new("Order")
                    .constructor_param("total", TypeRef::NUMBER)
                    .property("items", TypeRef::Builtin(crate::types::Builtin::Array))
                    .method(
                        MethodDecl::new("find")
                            .returns(TypeRef::STRING)
                            .param("id", TypeRef::NUMBER)
                            .param("hint", None),
                    ),
            )
            .unwrap();

        assert_eq!(registry.return_type(ty, "find"), Some(TypeRef::STRING));
        assert_eq!(
            registry.parameter_types(ty, Some("find")),
            vec![Some(TypeRef::NUMBER), None]
        );
        assert_eq!(registry.parameter_types(ty, None), vec![Some(TypeRef::NUMBER)]);
        assert!(registry.parameter_types(ty, Some("missing")).is_empty());
        assert!(registry.property_type(ty, "missing").is_none());
    }

    #[test]
    fn test_create_generic_is_memoized() {
        let registry = ClassRegistry::new();
        let base = registry.declare(ClassDecl::new("Box")).unwrap();

        let first = registry.create_generic(base, vec![TypeRef::STRING]);
        let again = registry.create_generic(base, vec![TypeRef::STRING]);
        let other = registry.create_generic(base, vec![TypeRef::NUMBER]);

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(registry.parent_of(first), Some(base));
        assert_eq!(registry.class_name(first), "Box<String>");

        let name = registry.class_name(first);
        let annotations = registry.class_annotations(first, &name);
        assert_eq!(find_type_arguments(&annotations), Some(&[TypeRef::STRING][..]));
    }

    #[test]
    fn test_decorations_are_visible_through_source() {
        let registry = ClassRegistry::new();
        let ty = registry.declare(ClassDecl::new("Item")).unwrap();
        registry.decorate_class(ty, DecoratorEntry::parameter_properties());
        registry.decorate_constructor_parameter(ty, 0, DecoratorEntry::ignore());

        assert_eq!(registry.class_annotations(ty, "Item").len(), 1);
        assert_eq!(
            registry
                .annotations(ty, DecoratorTarget::Parameter, "constructor", Some(0))
                .len(),
            1
        );
    }
}
