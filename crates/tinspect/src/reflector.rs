//! Reflection entry point
//!
//! [`Reflector`] runs the ancestor walk for a class with the configured
//! visitors and memoizes the result per class identity.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

use crate::error::Result;
use crate::host::ReflectHost;
use crate::reflection::ClassReflection;
use crate::types::ClassId;
use crate::visitor::{self, member};
use crate::walker::{self, MemberVisitor, ParentContext, ParentVisitor};

/// Pipeline and caching configuration
#[derive(Clone)]
pub struct ReflectConfig {
    /// Visitors applied to every node of every class level, in order
    pub member_visitors: Vec<MemberVisitor>,
    /// Visitor applied to every merged level
    pub parent_visitor: ParentVisitor,
    /// Memoize results per class
    pub cache: bool,
}

impl Default for ReflectConfig {
    fn default() -> Self {
        Self {
            member_visitors: member::purify_pipeline(),
            parent_visitor: visitor::apply_to,
            cache: true,
        }
    }
}

impl fmt::Debug for ReflectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectConfig")
            .field("member_visitors", &self.member_visitors.len())
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl ReflectConfig {
    /// Replace the member pipeline
    pub fn with_member_visitors(mut self, visitors: Vec<MemberVisitor>) -> Self {
        self.member_visitors = visitors;
        self
    }

    /// Append a visitor after the current pipeline
    pub fn with_member_visitor(mut self, visitor: MemberVisitor) -> Self {
        self.member_visitors.push(visitor);
        self
    }

    /// Replace the parent visitor
    pub fn with_parent_visitor(mut self, visitor: ParentVisitor) -> Self {
        self.parent_visitor = visitor;
        self
    }

    /// Enable or disable the per-class cache
    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }
}

/// Per-call options
#[derive(Debug, Clone, Copy, Default)]
pub struct ReflectOptions {
    /// Discard the cached entry for this class before reflecting
    pub flush_cache: bool,
}

/// Builds and caches reflection trees from a host
pub struct Reflector<H> {
    host: H,
    config: ReflectConfig,
    cache: DashMap<ClassId, Arc<ClassReflection>>,
}

impl<H: ReflectHost> Reflector<H> {
    /// Create a reflector with the default pipeline
    pub fn new(host: H) -> Self {
        Self::with_config(host, ReflectConfig::default())
    }

    /// Create a reflector with a custom configuration
    pub fn with_config(host: H, config: ReflectConfig) -> Self {
        Self {
            host,
            config,
            cache: DashMap::new(),
        }
    }

    /// The underlying host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The active configuration
    pub fn config(&self) -> &ReflectConfig {
        &self.config
    }

    /// Reflect a class
    pub fn reflect(&self, ty: ClassId) -> Result<Arc<ClassReflection>> {
        self.reflect_with(ty, ReflectOptions::default())
    }

    /// Reflect a class with per-call options
    ///
    /// Configuration errors are returned as-is and nothing is cached for the
    /// class.
    pub fn reflect_with(
        &self,
        ty: ClassId,
        options: ReflectOptions,
    ) -> Result<Arc<ClassReflection>> {
        if !self.config.cache {
            return self.walk(ty).map(Arc::new);
        }
        if options.flush_cache {
            self.cache.remove(&ty);
        } else if let Some(cached) = self.cache.get(&ty) {
            tracing::trace!(%ty, "reflection cache hit");
            return Ok(Arc::clone(cached.value()));
        }

        tracing::trace!(%ty, "reflection cache miss");
        let reflection = Arc::new(self.walk(ty)?);
        let entry = self.cache.entry(ty).or_insert(reflection);
        Ok(Arc::clone(entry.value()))
    }

    /// Discard every cached reflection
    pub fn flush(&self) {
        self.cache.clear();
    }

    /// Number of cached reflections
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    fn walk(&self, ty: ClassId) -> Result<ClassReflection> {
        let ctx = ParentContext {
            host: &self.host,
            target: ty,
            class_path: &[],
            member_visitors: &self.config.member_visitors,
            parent_visitor: self.config.parent_visitor,
        };
        walker::walk_parents(ty, &ctx)
    }
}

impl<H> fmt::Debug for Reflector<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reflector")
            .field("config", &self.config)
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}
