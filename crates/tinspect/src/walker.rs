//! Tree walkers
//!
//! Two recursions build a reflection tree:
//!
//! - [`walk_parents`] climbs the ancestor chain first, so every level is
//!   merged over an already complete base, then runs the parent visitor on
//!   the merged result.
//! - [`walk_members`] rewrites a single level top-down: the member visitors
//!   run on a node, then on each of its children in declaration order. A
//!   child the visitors reject is dropped from its list.

use std::iter;

use crate::error::Result;
use crate::host::ReflectHost;
use crate::merge;
use crate::reflection::{
    ClassReflection, ConstructorReflection, MethodReflection, ParameterReflection,
    PropertyReflection, Reflection,
};
use crate::types::ClassId;

/// A member pipeline step; `Ok(None)` removes the node
pub type MemberVisitor = fn(Reflection, &MemberContext<'_>) -> Result<Option<Reflection>>;

/// Runs on every merged level of the ancestor walk
pub type ParentVisitor = fn(ClassReflection, &ParentContext<'_>) -> Result<ClassReflection>;

/// Context handed to member visitors
#[derive(Clone, Copy)]
pub struct MemberContext<'a> {
    /// Source of declarations, design types and annotations
    pub host: &'a dyn ReflectHost,
    /// The class level being walked
    pub target: ClassId,
    /// Descendants of `target`, most-derived first
    pub class_path: &'a [ClassId],
    /// The already visited node owning the current one; `None` for the class
    pub parent: Option<&'a Reflection>,
    /// The full per-level pipeline
    pub visitors: &'a [MemberVisitor],
}

impl<'a> MemberContext<'a> {
    /// Run the pipeline on one node, stopping as soon as a step removes it
    pub fn visit(&self, node: Reflection) -> Result<Option<Reflection>> {
        let mut current = node;
        for visitor in self.visitors {
            match visitor(current, self)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    fn with_parent<'b>(&'b self, parent: &'b Reflection) -> MemberContext<'b> {
        MemberContext {
            parent: Some(parent),
            ..*self
        }
    }
}

/// Context of the ancestor walk
#[derive(Clone, Copy)]
pub struct ParentContext<'a> {
    /// Source of declarations, design types and annotations
    pub host: &'a dyn ReflectHost,
    /// The class the whole walk was started for
    pub target: ClassId,
    /// Descendants of the level being walked, most-derived first
    pub class_path: &'a [ClassId],
    /// Member pipeline applied to every level
    pub member_visitors: &'a [MemberVisitor],
    /// Visitor applied to each merged level
    pub parent_visitor: ParentVisitor,
}

#[derive(Default)]
struct Children {
    ctor: Option<ConstructorReflection>,
    parameters: Vec<ParameterReflection>,
    properties: Vec<PropertyReflection>,
    methods: Vec<MethodReflection>,
}

fn take_children(node: &mut Reflection) -> Children {
    match node {
        Reflection::Class(class) => Children {
            ctor: Some(std::mem::take(&mut class.ctor)),
            properties: std::mem::take(&mut class.properties),
            methods: std::mem::take(&mut class.methods),
            ..Default::default()
        },
        Reflection::Constructor(ctor) => Children {
            parameters: std::mem::take(&mut ctor.parameters),
            ..Default::default()
        },
        Reflection::Method(method) => Children {
            parameters: std::mem::take(&mut method.parameters),
            ..Default::default()
        },
        Reflection::Property(_) | Reflection::Parameter(_) => Children::default(),
    }
}

fn restore_children(node: &mut Reflection, children: Children) {
    match node {
        Reflection::Class(class) => {
            class.ctor = children.ctor.unwrap_or_default();
            class.properties = children.properties;
            class.methods = children.methods;
        }
        Reflection::Constructor(ctor) => ctor.parameters = children.parameters,
        Reflection::Method(method) => method.parameters = children.parameters,
        Reflection::Property(_) | Reflection::Parameter(_) => {}
    }
}

fn walk_list<T>(
    items: Vec<T>,
    ctx: &MemberContext<'_>,
    wrap: fn(T) -> Reflection,
    unwrap: fn(Reflection) -> Option<T>,
) -> Result<Vec<T>> {
    let mut result = Vec::with_capacity(items.len());
    for item in items {
        if let Some(item) = walk_members(wrap(item), ctx)?.and_then(unwrap) {
            result.push(item);
        }
    }
    Ok(result)
}

fn walk_children(children: Children, ctx: &MemberContext<'_>) -> Result<Children> {
    let parameters = walk_list(
        children.parameters,
        ctx,
        Reflection::Parameter,
        Reflection::into_parameter,
    )?;
    let properties = walk_list(
        children.properties,
        ctx,
        Reflection::Property,
        Reflection::into_property,
    )?;
    let methods = walk_list(children.methods, ctx, Reflection::Method, Reflection::into_method)?;
    let ctor = match children.ctor {
        Some(ctor) => walk_members(Reflection::Constructor(ctor), ctx)?
            .and_then(Reflection::into_constructor),
        None => None,
    };
    Ok(Children {
        ctor,
        parameters,
        properties,
        methods,
    })
}

/// Apply the member pipeline to a node and, recursively, to its children
///
/// Returns `None` when the pipeline removes the node; its children are not
/// visited in that case. A child whose visit yields a node of another kind is
/// dropped as well.
pub fn walk_members(node: Reflection, ctx: &MemberContext<'_>) -> Result<Option<Reflection>> {
    let Some(mut node) = ctx.visit(node)? else {
        return Ok(None);
    };
    let children = take_children(&mut node);
    let children = walk_children(children, &ctx.with_parent(&node))?;
    restore_children(&mut node, children);
    Ok(Some(node))
}

/// Parse and purify a single class level
pub fn walk_class(ty: ClassId, ctx: &ParentContext<'_>) -> Result<ClassReflection> {
    let raw = ctx.host.parse(ty)?;
    let name = raw.name.clone();
    let member_ctx = MemberContext {
        host: ctx.host,
        target: ty,
        class_path: ctx.class_path,
        parent: None,
        visitors: ctx.member_visitors,
    };
    let purified = walk_members(Reflection::Class(raw), &member_ctx)?;
    Ok(purified
        .and_then(Reflection::into_class)
        .unwrap_or_else(|| ClassReflection::new(ty, name)))
}

/// Build the merged reflection of `ty` and all of its ancestors
pub fn walk_parents(ty: ClassId, ctx: &ParentContext<'_>) -> Result<ClassReflection> {
    let parent_meta = match ctx.host.parent_of(ty) {
        Some(parent) => {
            let class_path: Vec<ClassId> =
                ctx.class_path.iter().copied().chain(iter::once(ty)).collect();
            walk_parents(
                parent,
                &ParentContext {
                    class_path: &class_path,
                    ..*ctx
                },
            )?
        }
        None => ClassReflection::empty_base(),
    };
    tracing::debug!(
        class = %ctx.host.class_name(ty),
        depth = ctx.class_path.len(),
        "walking class level"
    );
    let child_meta = walk_class(ty, ctx)?;
    let merged = merge::extend(child_meta, parent_meta);
    (ctx.parent_visitor)(merged, ctx)
}
