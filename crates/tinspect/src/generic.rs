//! Generic template substitution across inheritance levels
//!
//! For every class on the class path, the template parameter names declared
//! on its parent are paired with the type arguments the class supplies. The
//! resulting tables are searched from the level nearest the declaring class
//! outward, so a template can be re-parameterized several levels down:
//!
//! ```text
//! GrandBase<T>  <-  Base<U> extends GrandBase<U>  <-  Child extends Base<String>
//!   T -> 'U' -> String
//! ```

use rustc_hash::FxHashMap;

use crate::decorator::{find_templates, find_type_arguments};
use crate::error::{ReflectError, Result};
use crate::host::{AncestorProvider, AnnotationSource};
use crate::types::{ClassId, TypeRef};

/// Substitution tables for one class path
#[derive(Debug, Clone, Default)]
pub struct GenericMap {
    /// One table per level, innermost (closest to the declaring class) first
    maps: Vec<FxHashMap<String, TypeRef>>,
}

impl GenericMap {
    /// Build the tables for a class path
    ///
    /// `class_path` lists the descendants of the level being walked, from the
    /// most-derived class down to the level's direct child. Fails when a
    /// parent lacks its template declaration, when a class omits its type
    /// arguments, or when the two counts differ.
    ///
    /// Every level of the path must take part in the chain. A non-generic
    /// subclass of a class that already supplied all type arguments fails
    /// with [`ReflectError::MissingTemplate`] naming that subclass.
    pub fn new<H>(host: &H, class_path: &[ClassId]) -> Result<Self>
    where
        H: AncestorProvider + AnnotationSource + ?Sized,
    {
        let mut maps = Vec::with_capacity(class_path.len());
        for &ty in class_path {
            let type_name = host.class_name(ty);
            let parent = host.parent_of(ty).unwrap_or(ClassId::OBJECT);
            let parent_name = host.class_name(parent);

            let parent_annotations = host.class_annotations(parent, &parent_name);
            let Some(templates) = find_templates(&parent_annotations) else {
                return Err(ReflectError::MissingTemplate {
                    type_name,
                    parent_name,
                });
            };
            let annotations = host.class_annotations(ty, &type_name);
            let Some(types) = find_type_arguments(&annotations) else {
                return Err(ReflectError::MissingTypeArguments {
                    type_name,
                    parent_name,
                });
            };
            if templates.len() != types.len() {
                return Err(ReflectError::TypeArgumentMismatch {
                    type_name,
                    parent_name,
                    expected: templates.len(),
                    actual: types.len(),
                });
            }
            maps.push(
                templates
                    .iter()
                    .cloned()
                    .zip(types.iter().cloned())
                    .collect::<FxHashMap<_, _>>(),
            );
        }
        maps.reverse();
        Ok(Self { maps })
    }

    /// Resolve a possibly symbolic type
    ///
    /// An array wrap is preserved around the resolved element. Names that no
    /// table maps are returned unchanged.
    pub fn get(&self, raw: &TypeRef) -> TypeRef {
        match raw {
            TypeRef::Array(element) => TypeRef::array(self.resolve(element)),
            other => self.resolve(other),
        }
    }

    fn resolve(&self, ty: &TypeRef) -> TypeRef {
        let mut current = ty.clone();
        for map in &self.maps {
            let TypeRef::Template(name) = &current else {
                break;
            };
            match map.get(name) {
                Some(next) => {
                    tracing::trace!(template = %name, resolved = %next, "generic substitution");
                    current = next.clone();
                }
                None => break,
            }
        }
        current
    }

    /// Number of levels
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Check if there are no levels
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}
