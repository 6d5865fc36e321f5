//! Reflection errors
//!
//! Every error raised while building a reflection tree is a configuration
//! error in the class hierarchy. None of them are recoverable inside the walk;
//! they abort it and surface to the caller of [`crate::Reflector::reflect`].

use thiserror::Error;

use crate::types::ClassId;

/// Errors that can occur while walking a class hierarchy
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReflectError {
    /// A symbolic type is used below a parent that declares no generic template
    #[error(
        "Configuration Error: {parent_name} uses a symbolic template type but doesn't declare generic template parameters (required by {type_name})"
    )]
    MissingTemplate {
        /// Type whose parent lacks the template declaration
        type_name: String,
        /// Parent that should declare the template
        parent_name: String,
    },

    /// A type extends a generic parent without supplying type arguments
    #[error(
        "Configuration Error: {type_name} inherits from generic class {parent_name} but doesn't declare generic type arguments"
    )]
    MissingTypeArguments {
        /// Type missing its type arguments
        type_name: String,
        /// Generic parent
        parent_name: String,
    },

    /// Template parameter count differs from type argument count
    #[error(
        "Configuration Error: Number of parameters mismatch between generic template on {parent_name} ({expected}) and generic type arguments on {type_name} ({actual})"
    )]
    TypeArgumentMismatch {
        /// Type supplying the arguments
        type_name: String,
        /// Parent declaring the template
        parent_name: String,
        /// Number of template parameters on the parent
        expected: usize,
        /// Number of type arguments on the type
        actual: usize,
    },

    /// The host has no declaration for a class id
    #[error("Unknown class: {id}")]
    UnknownClass {
        /// The unknown id
        id: ClassId,
    },
}

/// Result alias for reflection operations
pub type Result<T> = std::result::Result<T, ReflectError>;
