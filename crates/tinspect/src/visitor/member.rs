//! Member purification pipeline
//!
//! Each step takes one node of a freshly parsed class level and returns the
//! rewritten node, or `None` to remove it. The steps only look at the node,
//! the host and the owning node in the context.

use crate::decorator::{DecoratorTarget, TypeOverride};
use crate::error::Result;
use crate::generic::GenericMap;
use crate::reflection::{Reflection, ReflectionKind};
use crate::types::{Builtin, TypeClassification, TypeRef};
use crate::walker::{MemberContext, MemberVisitor};

/// The default pipeline, in application order
pub const PURIFY: [MemberVisitor; 7] = [
    add_design_types,
    add_decorators,
    add_type_override,
    add_generic_override,
    add_type_classification,
    filter_parameter_properties,
    remove_ignored,
];

/// The default pipeline as an owned list
pub fn purify_pipeline() -> Vec<MemberVisitor> {
    PURIFY.to_vec()
}

fn design_type(ty: Option<TypeRef>) -> Option<TypeRef> {
    match ty {
        Some(TypeRef::Builtin(Builtin::Array)) => Some(TypeRef::unknown_array()),
        other => other,
    }
}

fn parameter_type(
    ctx: &MemberContext<'_>,
    method: Option<&str>,
    index: usize,
) -> Option<TypeRef> {
    ctx.host
        .parameter_types(ctx.target, method)
        .into_iter()
        .nth(index)
        .flatten()
}

/// Fill in the compiler-captured type of methods, properties and parameters
pub fn add_design_types(
    mut node: Reflection,
    ctx: &MemberContext<'_>,
) -> Result<Option<Reflection>> {
    let ty = match &node {
        Reflection::Method(method) => Some(ctx.host.return_type(ctx.target, &method.name)),
        Reflection::Property(property) => Some(match property.index {
            Some(index) => parameter_type(ctx, None, index),
            None => ctx.host.property_type(ctx.target, &property.name),
        }),
        Reflection::Parameter(parameter) => match ctx.parent {
            Some(Reflection::Constructor(_)) => Some(parameter_type(ctx, None, parameter.index)),
            Some(Reflection::Method(method)) => {
                Some(parameter_type(ctx, Some(&method.name), parameter.index))
            }
            _ => None,
        },
        Reflection::Class(_) | Reflection::Constructor(_) => None,
    };
    if let Some(ty) = ty {
        node.set_resolved_type(design_type(ty));
    }
    Ok(Some(node))
}

/// Append the annotations stored for this node
pub fn add_decorators(
    mut node: Reflection,
    ctx: &MemberContext<'_>,
) -> Result<Option<Reflection>> {
    let found = match &node {
        Reflection::Parameter(parameter) => {
            let owner = ctx.parent.map(Reflection::name).unwrap_or("constructor");
            ctx.host.annotations(
                ctx.target,
                DecoratorTarget::Parameter,
                owner,
                Some(parameter.index),
            )
        }
        Reflection::Property(property) => match property.index {
            Some(index) => ctx.host.annotations(
                ctx.target,
                DecoratorTarget::Parameter,
                "constructor",
                Some(index),
            ),
            None => ctx
                .host
                .annotations(ctx.target, DecoratorTarget::Property, &property.name, None),
        },
        Reflection::Method(method) => {
            ctx.host.annotations(ctx.target, DecoratorTarget::Method, &method.name, None)
        }
        Reflection::Class(class) => ctx.host.class_annotations(ctx.target, &class.name),
        Reflection::Constructor(_) => ctx.host.annotations(
            ctx.target,
            DecoratorTarget::Constructor,
            "constructor",
            None,
        ),
    };
    node.decorators_mut().extend(found);
    Ok(Some(node))
}

/// Replace the inferred type with an explicit type annotation
pub fn add_type_override(
    mut node: Reflection,
    _ctx: &MemberContext<'_>,
) -> Result<Option<Reflection>> {
    if matches!(node, Reflection::Class(_) | Reflection::Constructor(_)) {
        return Ok(Some(node));
    }
    if let Some(overridden) = TypeOverride::find(node.decorators()) {
        node.set_resolved_type(Some(overridden.ty));
    }
    Ok(Some(node))
}

/// Resolve a symbolic or parameterized type annotation through the class path
///
/// Fails when the class path does not form a consistent generic chain.
pub fn add_generic_override(
    mut node: Reflection,
    ctx: &MemberContext<'_>,
) -> Result<Option<Reflection>> {
    if matches!(node, Reflection::Class(_) | Reflection::Constructor(_)) {
        return Ok(Some(node));
    }
    let Some(overridden) = TypeOverride::find(node.decorators()) else {
        return Ok(Some(node));
    };
    if !overridden.is_generic() {
        return Ok(Some(node));
    }

    let map = GenericMap::new(ctx.host, ctx.class_path)?;
    let ty = if overridden.ty.is_symbolic() {
        map.get(&overridden.ty)
    } else {
        let args: Vec<TypeRef> = overridden
            .generic_params
            .iter()
            .map(|param| map.get(param))
            .collect();
        match overridden.ty.scalar().as_class() {
            Some(parent) => {
                let created = TypeRef::Class(ctx.host.create_generic(parent, args));
                if overridden.ty.is_array() {
                    TypeRef::array(created)
                } else {
                    created
                }
            }
            None => {
                tracing::warn!(
                    member = node.name(),
                    ty = %overridden.ty,
                    "generic parameters on a non-class type are ignored"
                );
                overridden.ty
            }
        }
    };
    node.set_resolved_type(Some(ty));
    Ok(Some(node))
}

/// Classify the resolved type
pub fn add_type_classification(
    mut node: Reflection,
    _ctx: &MemberContext<'_>,
) -> Result<Option<Reflection>> {
    let classification = match &node {
        Reflection::Class(_) => Some(TypeClassification::Class),
        other => TypeClassification::of(other.resolved_type()),
    };
    node.set_type_classification(classification);
    Ok(Some(node))
}

/// Keep parameter properties only on classes carrying the enabling marker
pub fn filter_parameter_properties(
    node: Reflection,
    ctx: &MemberContext<'_>,
) -> Result<Option<Reflection>> {
    if node.kind() != ReflectionKind::ParameterProperty {
        return Ok(Some(node));
    }
    match ctx.parent {
        Some(owner @ Reflection::Class(_)) => {
            let enabled = owner.decorators().iter().any(|d| d.is_parameter_properties());
            Ok(enabled.then_some(node))
        }
        _ => Ok(Some(node)),
    }
}

/// Drop properties and methods carrying an ignore marker
pub fn remove_ignored(node: Reflection, _ctx: &MemberContext<'_>) -> Result<Option<Reflection>> {
    let member = matches!(node, Reflection::Property(_) | Reflection::Method(_));
    if member && node.decorators().iter().any(|d| d.is_ignore()) {
        return Ok(None);
    }
    Ok(Some(node))
}
