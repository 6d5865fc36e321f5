//! Annotation entries
//!
//! An annotation ("decorator") is a value attached to a class, member or
//! parameter by the authoring layer. The value rides together with an
//! explicit [`DecoratorOption`] record that controls how it is inherited,
//! deduplicated and redistributed from the class onto its members.

use std::slice;

use serde::{Deserialize, Serialize};

use crate::types::{TypeRef, TypeSource};

/// The kind of declaration an annotation is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecoratorTarget {
    /// The class itself
    Class,
    /// The constructor
    Constructor,
    /// A method
    Method,
    /// A property
    Property,
    /// A parameter of a method or of the constructor
    Parameter,
}

/// Member names a class-level annotation is copied onto
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApplyTo {
    /// A single member name
    One(String),
    /// Any number of member names
    Many(Vec<String>),
}

impl ApplyTo {
    /// The target names as a slice
    pub fn names(&self) -> &[String] {
        match self {
            ApplyTo::One(name) => slice::from_ref(name),
            ApplyTo::Many(names) => names,
        }
    }

    /// Check if there are no targets
    pub fn is_empty(&self) -> bool {
        self.names().is_empty()
    }

    /// Check if `name` is one of the targets
    pub fn contains(&self, name: &str) -> bool {
        self.names().iter().any(|n| n == name)
    }
}

impl Default for ApplyTo {
    fn default() -> Self {
        ApplyTo::Many(Vec::new())
    }
}

/// Distribution options carried by every annotation entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecoratorOption {
    /// Allow several entries with the same identity key on one declaration
    pub allow_multiple: bool,
    /// Copy the entry onto overriding members / subclasses
    pub inherit: bool,
    /// Members a class-level entry is redistributed onto
    pub apply_to: ApplyTo,
    /// Drop the class-level entry once it has been redistributed
    pub remove_applied: bool,
}

impl Default for DecoratorOption {
    fn default() -> Self {
        Self {
            allow_multiple: true,
            inherit: true,
            apply_to: ApplyTo::default(),
            remove_applied: true,
        }
    }
}

impl DecoratorOption {
    /// Options for entries that must appear at most once per declaration
    pub fn single(inherit: bool) -> Self {
        Self {
            allow_multiple: false,
            inherit,
            ..Default::default()
        }
    }
}

/// Explicit type annotation payload
#[derive(Debug, Clone)]
pub struct TypeDecorator {
    /// The declared type, possibly symbolic or lazily evaluated
    pub source: TypeSource,
    /// Generic arguments applied to the declared type
    pub generic_params: Vec<TypeRef>,
}

/// The payload of an annotation entry
#[derive(Debug, Clone)]
pub enum DecoratorValue {
    /// Overrides the inferred type of a member or parameter
    Type(TypeDecorator),
    /// Declares the generic template parameter names of a class
    GenericTemplate(Vec<String>),
    /// Supplies the type arguments a class passes to its generic parent
    GenericType(Vec<TypeRef>),
    /// Enables constructor parameters as properties
    ParameterProperties,
    /// Removes a property or method from the reflection tree
    Ignore,
    /// Domain-specific payload owned by the consumer
    Custom(serde_json::Value),
}

/// Identity key of [`DecoratorValue::Type`] entries
pub const TYPE_KEY: &str = "reflect:type";
/// Identity key of [`DecoratorValue::GenericTemplate`] entries
pub const GENERIC_TEMPLATE_KEY: &str = "reflect:generic-template";
/// Identity key of [`DecoratorValue::GenericType`] entries
pub const GENERIC_TYPE_KEY: &str = "reflect:generic-type";
/// Identity key of [`DecoratorValue::ParameterProperties`] entries
pub const PARAMETER_PROPERTIES_KEY: &str = "reflect:parameter-properties";
/// Identity key of [`DecoratorValue::Ignore`] entries
pub const IGNORE_KEY: &str = "reflect:ignore";

/// An annotation value paired with its distribution options
#[derive(Debug, Clone)]
pub struct DecoratorEntry {
    /// Identity used for deduplication when multiplicity is disallowed
    pub key: String,
    /// The payload
    pub value: DecoratorValue,
    /// Distribution options
    pub options: DecoratorOption,
}

impl DecoratorEntry {
    /// Create an entry with explicit key and default options
    pub fn new(key: impl Into<String>, value: DecoratorValue) -> Self {
        Self {
            key: key.into(),
            value,
            options: DecoratorOption::default(),
        }
    }

    /// A consumer-defined annotation
    pub fn custom(key: impl Into<String>, value: serde_json::Value) -> Self {
        Self::new(key, DecoratorValue::Custom(value))
    }

    /// Explicit type override
    pub fn type_override(ty: impl Into<TypeSource>) -> Self {
        Self::generic_override(ty, Vec::new())
    }

    /// Explicit type override that instantiates `ty` with generic arguments
    pub fn generic_override(ty: impl Into<TypeSource>, generic_params: Vec<TypeRef>) -> Self {
        Self {
            key: TYPE_KEY.to_string(),
            value: DecoratorValue::Type(TypeDecorator {
                source: ty.into(),
                generic_params,
            }),
            options: DecoratorOption::single(true),
        }
    }

    /// Generic template declaration, e.g. `["T", "U"]`
    pub fn generic_template<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key: GENERIC_TEMPLATE_KEY.to_string(),
            value: DecoratorValue::GenericTemplate(names.into_iter().map(Into::into).collect()),
            options: DecoratorOption::single(false),
        }
    }

    /// Type arguments passed to the generic parent
    pub fn generic_type(types: Vec<TypeRef>) -> Self {
        Self {
            key: GENERIC_TYPE_KEY.to_string(),
            value: DecoratorValue::GenericType(types),
            options: DecoratorOption::single(false),
        }
    }

    /// Class-level marker enabling constructor parameters as properties
    pub fn parameter_properties() -> Self {
        Self {
            key: PARAMETER_PROPERTIES_KEY.to_string(),
            value: DecoratorValue::ParameterProperties,
            options: DecoratorOption::single(false),
        }
    }

    /// Member-level marker removing the member from the tree
    pub fn ignore() -> Self {
        Self {
            key: IGNORE_KEY.to_string(),
            value: DecoratorValue::Ignore,
            options: DecoratorOption::single(true),
        }
    }

    /// Replace the options
    pub fn with_options(mut self, options: DecoratorOption) -> Self {
        self.options = options;
        self
    }

    /// Set whether several entries with the same key may coexist
    pub fn allow_multiple(mut self, allow: bool) -> Self {
        self.options.allow_multiple = allow;
        self
    }

    /// Set whether the entry is inherited
    pub fn inherit(mut self, inherit: bool) -> Self {
        self.options.inherit = inherit;
        self
    }

    /// Redistribute a class-level entry onto the named members
    pub fn apply_to<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.apply_to = ApplyTo::Many(names.into_iter().map(Into::into).collect());
        self
    }

    /// Set whether the class-level entry is dropped after redistribution
    pub fn remove_applied(mut self, remove: bool) -> Self {
        self.options.remove_applied = remove;
        self
    }

    /// Check if this is an ignore marker
    pub fn is_ignore(&self) -> bool {
        matches!(self.value, DecoratorValue::Ignore)
    }

    /// Check if this is the parameter-properties marker
    pub fn is_parameter_properties(&self) -> bool {
        matches!(self.value, DecoratorValue::ParameterProperties)
    }

    /// The custom payload, if any
    pub fn custom_value(&self) -> Option<&serde_json::Value> {
        match &self.value {
            DecoratorValue::Custom(value) => Some(value),
            _ => None,
        }
    }
}

/// Template parameter names declared in a list of class annotations
pub fn find_templates(decorators: &[DecoratorEntry]) -> Option<&[String]> {
    decorators.iter().find_map(|d| match &d.value {
        DecoratorValue::GenericTemplate(names) => Some(names.as_slice()),
        _ => None,
    })
}

/// Type arguments declared in a list of class annotations
pub fn find_type_arguments(decorators: &[DecoratorEntry]) -> Option<&[TypeRef]> {
    decorators.iter().find_map(|d| match &d.value {
        DecoratorValue::GenericType(types) => Some(types.as_slice()),
        _ => None,
    })
}

/// Type override extracted from a node's annotations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeOverride {
    /// The declared type with any callback already evaluated
    pub ty: TypeRef,
    /// Generic arguments, possibly symbolic
    pub generic_params: Vec<TypeRef>,
}

impl TypeOverride {
    /// Extract the first type override from a list of annotations
    pub fn find(decorators: &[DecoratorEntry]) -> Option<Self> {
        decorators.iter().find_map(|d| match &d.value {
            DecoratorValue::Type(decorator) => Some(TypeOverride {
                ty: decorator.source.resolve(),
                generic_params: decorator.generic_params.clone(),
            }),
            _ => None,
        })
    }

    /// Check if resolving this override needs the generic map
    pub fn is_generic(&self) -> bool {
        self.ty.is_symbolic() || !self.generic_params.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClassId;
    use serde_json::json;

    #[test]
    fn test_default_options() {
        let option = DecoratorOption::default();
        assert!(option.allow_multiple);
        assert!(option.inherit);
        assert!(option.apply_to.is_empty());
        assert!(option.remove_applied);
    }

    #[test]
    fn test_options_from_json() {
        let option: DecoratorOption =
            serde_json::from_value(json!({ "applyTo": "bar", "allowMultiple": false })).unwrap();
        assert!(option.apply_to.contains("bar"));
        assert_eq!(option.apply_to.names().len(), 1);
        assert!(!option.allow_multiple);
        assert!(option.inherit);

        let option: DecoratorOption =
            serde_json::from_value(json!({ "applyTo": ["a", "b"], "removeApplied": false }))
                .unwrap();
        assert_eq!(option.apply_to.names(), ["a".to_string(), "b".to_string()]);
        assert!(!option.remove_applied);
    }

    #[test]
    fn test_type_override_resolves_callback() {
        let decorators = vec![
            DecoratorEntry::custom("min", json!(3)),
            DecoratorEntry::type_override(TypeSource::lazy(|| {
                TypeRef::array(TypeRef::class(ClassId(4)))
            })),
        ];
        let found = TypeOverride::find(&decorators).unwrap();
        assert_eq!(found.ty, TypeRef::array(TypeRef::Class(ClassId(4))));
        assert!(!found.is_generic());
    }

    #[test]
    fn test_type_override_is_generic() {
        let symbolic = DecoratorEntry::type_override(TypeRef::template("T"));
        assert!(TypeOverride::find(&[symbolic]).unwrap().is_generic());

        let parameterized = DecoratorEntry::generic_override(
            TypeRef::class(ClassId(2)),
            vec![TypeRef::template("T")],
        );
        assert!(TypeOverride::find(&[parameterized]).unwrap().is_generic());

        assert!(TypeOverride::find(&[DecoratorEntry::ignore()]).is_none());
    }

    #[test]
    fn test_find_templates_and_arguments() {
        let decorators = vec![
            DecoratorEntry::generic_template(["T", "U"]),
            DecoratorEntry::generic_type(vec![TypeRef::STRING]),
        ];
        assert_eq!(
            find_templates(&decorators),
            Some(&["T".to_string(), "U".to_string()][..])
        );
        assert_eq!(find_type_arguments(&decorators), Some(&[TypeRef::STRING][..]));
        assert!(find_templates(&[]).is_none());
    }
}
