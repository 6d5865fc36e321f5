//! Annotation storage
//!
//! Side-table of annotation records written by the authoring layer. Records
//! are grouped by the class they were declared on and keyed by target kind,
//! target name and, for parameters, the parameter index.

use rustc_hash::FxHashMap;

use crate::decorator::{DecoratorEntry, DecoratorTarget};
use crate::types::ClassId;

/// A single stored annotation
#[derive(Debug, Clone)]
pub struct AnnotationRecord {
    /// Kind of the annotated declaration
    pub target: DecoratorTarget,
    /// Name of the annotated declaration; for parameters, the owning method
    /// name or `"constructor"`
    pub name: String,
    /// Parameter index for parameter annotations
    pub index: Option<usize>,
    /// The annotation
    pub entry: DecoratorEntry,
}

/// Annotation side-table for all classes
#[derive(Debug, Default)]
pub struct AnnotationStore {
    /// Records per declaring class, in authoring order
    records: FxHashMap<ClassId, Vec<AnnotationRecord>>,
}

impl AnnotationStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an annotation on a declaration of `ty`
    pub fn define(
        &mut self,
        ty: ClassId,
        target: DecoratorTarget,
        name: impl Into<String>,
        index: Option<usize>,
        entry: DecoratorEntry,
    ) {
        self.records.entry(ty).or_default().push(AnnotationRecord {
            target,
            name: name.into(),
            index,
            entry,
        });
    }

    /// All annotations attached to exactly this target
    ///
    /// When `index` is given only records with that parameter index match.
    /// Absence yields an empty list.
    pub fn lookup(
        &self,
        ty: ClassId,
        target: DecoratorTarget,
        name: &str,
        index: Option<usize>,
    ) -> Vec<DecoratorEntry> {
        let Some(records) = self.records.get(&ty) else {
            return Vec::new();
        };
        records
            .iter()
            .filter(|r| r.target == target && r.name == name)
            .filter(|r| index.is_none() || r.index == index)
            .map(|r| r.entry.clone())
            .collect()
    }

    /// Remove every record of `ty`; returns true if any existed
    pub fn clear_target(&mut self, ty: ClassId) -> bool {
        self.records.remove(&ty).is_some()
    }
}
