//! Class-level annotation redistribution
//!
//! A class-level entry whose options name members in `apply_to` is copied
//! onto those members once the hierarchy has been merged. Entries that were
//! applied and ask for it are then moved from `decorators` into
//! `removed_decorators`.

use crate::decorator::DecoratorEntry;
use crate::error::Result;
use crate::reflection::ClassReflection;
use crate::walker::ParentContext;

/// Append `copied` to a member's list, replacing a same-key entry when
/// multiplicity is disallowed
pub fn append_decorator(decorators: &mut Vec<DecoratorEntry>, copied: DecoratorEntry) {
    if copied.options.allow_multiple {
        decorators.push(copied);
        return;
    }
    match decorators.iter().position(|d| d.key == copied.key) {
        Some(first) => {
            let key = copied.key.clone();
            decorators[first] = copied;
            let mut index = 0;
            decorators.retain(|d| {
                let keep = index <= first || d.key != key;
                index += 1;
                keep
            });
        }
        None => decorators.push(copied),
    }
}

/// Redistribute class-level annotations of the walked type onto its members
///
/// Merged ancestor levels pass through untouched; only the level whose
/// identity equals the walk target is rewritten.
pub fn apply_to(mut current: ClassReflection, ctx: &ParentContext<'_>) -> Result<ClassReflection> {
    if current.ty != ctx.target {
        return Ok(current);
    }

    let mut kept = Vec::with_capacity(current.decorators.len());
    let mut removed = Vec::new();
    for decorator in std::mem::take(&mut current.decorators) {
        let targets = decorator.options.apply_to.names();
        for property in current
            .properties
            .iter_mut()
            .filter(|p| targets.contains(&p.name))
        {
            tracing::debug!(
                decorator = %decorator.key,
                member = %property.name,
                "applying class decorator"
            );
            append_decorator(&mut property.decorators, decorator.clone());
        }
        for method in current
            .methods
            .iter_mut()
            .filter(|m| targets.contains(&m.name))
        {
            tracing::debug!(
                decorator = %decorator.key,
                member = %method.name,
                "applying class decorator"
            );
            append_decorator(&mut method.decorators, decorator.clone());
        }

        if decorator.options.remove_applied && !targets.is_empty() {
            removed.push(decorator);
        } else {
            kept.push(decorator);
        }
    }
    current.decorators = kept;
    current.removed_decorators.extend(removed);
    Ok(current)
}
