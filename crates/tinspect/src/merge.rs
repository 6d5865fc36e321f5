//! Merging a class level over its already-merged ancestors
//!
//! Members declared on the child replace same-named inherited members; the
//! rest of the inherited members pass through unchanged. Annotations flagged
//! as inheritable flow from the parent onto the overriding declaration.

use rustc_hash::FxHashSet;

use crate::decorator::DecoratorEntry;
use crate::reflection::{ClassReflection, MethodReflection, PropertyReflection};

/// A member that can be matched by name across levels
trait Member {
    fn name(&self) -> &str;
    fn decorators_mut(&mut self) -> &mut Vec<DecoratorEntry>;
    fn decorators(&self) -> &[DecoratorEntry];
}

impl Member for PropertyReflection {
    fn name(&self) -> &str {
        &self.name
    }
    fn decorators_mut(&mut self) -> &mut Vec<DecoratorEntry> {
        &mut self.decorators
    }
    fn decorators(&self) -> &[DecoratorEntry] {
        &self.decorators
    }
}

impl Member for MethodReflection {
    fn name(&self) -> &str {
        &self.name
    }
    fn decorators_mut(&mut self) -> &mut Vec<DecoratorEntry> {
        &mut self.decorators
    }
    fn decorators(&self) -> &[DecoratorEntry] {
        &self.decorators
    }
}

/// Merge a child level over its parent
pub fn extend(child: ClassReflection, parent: ClassReflection) -> ClassReflection {
    let ClassReflection {
        ty: parent_ty,
        decorators: parent_decorators,
        properties: parent_properties,
        methods: parent_methods,
        ..
    } = parent;
    ClassReflection {
        super_type: parent_ty,
        decorators: merge_decorators(child.decorators, &parent_decorators),
        properties: merge_members(child.properties, parent_properties),
        methods: merge_members(child.methods, parent_methods),
        ..child
    }
}

/// Append the inheritable parent annotations to the child's own
///
/// A parent entry is skipped when it is not inheritable, or when it disallows
/// multiplicity and the child already carries an entry with the same key.
pub fn merge_decorators(
    own: Vec<DecoratorEntry>,
    parent: &[DecoratorEntry],
) -> Vec<DecoratorEntry> {
    let mut result = own;
    let own_len = result.len();
    for decorator in parent {
        if !decorator.options.inherit {
            continue;
        }
        if !decorator.options.allow_multiple
            && result[..own_len].iter().any(|d| d.key == decorator.key)
        {
            continue;
        }
        result.push(decorator.clone());
    }
    result
}

fn merge_members<M: Member>(children: Vec<M>, parents: Vec<M>) -> Vec<M> {
    let mut seen = FxHashSet::default();
    let mut result = Vec::with_capacity(children.len() + parents.len());
    for mut child in children {
        if let Some(parent) = parents.iter().find(|p| p.name() == child.name()) {
            let own = std::mem::take(child.decorators_mut());
            *child.decorators_mut() = merge_decorators(own, parent.decorators());
        }
        seen.insert(child.name().to_string());
        result.push(child);
    }
    for parent in parents {
        if !seen.contains(parent.name()) {
            result.push(parent);
        }
    }
    result
}
