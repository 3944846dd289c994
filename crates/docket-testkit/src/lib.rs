// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use docket_engine::{PositionSurface, ResolveError, ValueResolver, ViewSnapshot};
use docket_model::{
    ChangeKind, ChangeRecord, ChangeSet, ColumnValues, KindDescriptor, KindRegistry, RecordId,
    SurfaceId, Value,
};
use time::OffsetDateTime;
use time::macros::datetime;

pub const DOCUMENT_KIND: &str = "document";
pub const GROUP_KIND: &str = "doc_group";
pub const VENDOR_KIND: &str = "vendor";

pub const SERVICE_COLUMNS: [&str; 3] = ["created_at", "modified_at", "modified_by"];

pub fn fixture_timestamp() -> OffsetDateTime {
    datetime!(2026-01-15 09:30:00 UTC)
}

// The canonical three-kind registry: grouped documents, the group
// hierarchy they point into, and a vendor kind for the reference hop.
pub fn sample_registry() -> KindRegistry {
    let mut registry = KindRegistry::new();
    registry.register(
        KindDescriptor::new(DOCUMENT_KIND)
            .with_reference("vendor_id", VENDOR_KIND)
            .with_reference("group_id", GROUP_KIND)
            .with_derived("vendor_name", "vendor_id", "name")
            .with_service_columns(&SERVICE_COLUMNS)
            .with_grouping("group_id", GROUP_KIND),
    );
    registry.register(KindDescriptor::new(GROUP_KIND).with_reference("parent_id", GROUP_KIND));
    registry.register(KindDescriptor::new(VENDOR_KIND));
    registry
}

pub fn values(pairs: &[(&str, Value)]) -> ColumnValues {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_owned(), value.clone()))
        .collect()
}

pub fn inserted(id: i64, pairs: &[(&str, Value)]) -> ChangeRecord {
    ChangeRecord::new(ChangeKind::Inserted, RecordId::new(id), values(pairs))
}

pub fn modified(id: i64, pairs: &[(&str, Value)]) -> ChangeRecord {
    ChangeRecord::new(ChangeKind::Modified, RecordId::new(id), values(pairs))
}

// Deletions arrive with the live id cleared; only the original side
// still identifies the row.
pub fn deleted(id: i64, original_pairs: &[(&str, Value)]) -> ChangeRecord {
    ChangeRecord::new(ChangeKind::Deleted, RecordId::NONE, ColumnValues::new())
        .with_original(RecordId::new(id), values(original_pairs))
}

pub fn unchanged(id: i64) -> ChangeRecord {
    ChangeRecord::new(ChangeKind::Unchanged, RecordId::new(id), ColumnValues::new())
}

pub fn document_change_set(records: Vec<ChangeRecord>) -> ChangeSet {
    let mut set = ChangeSet::new();
    for record in records {
        set.push(DOCUMENT_KIND, record);
    }
    set
}

#[derive(Debug, Default)]
pub struct MemoryResolver {
    records: BTreeMap<String, BTreeMap<RecordId, ColumnValues>>,
    lookups: RefCell<usize>,
    invalidations: RefCell<Vec<(String, Vec<RecordId>)>>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, kind: &str, id: i64, column: &str, value: Value) {
        self.records
            .entry(kind.to_owned())
            .or_default()
            .entry(RecordId::new(id))
            .or_default()
            .insert(column.to_owned(), value);
    }

    // Seeds every service column so reconciled rows get deterministic
    // store-stamped values.
    pub fn stamp_service_columns(&mut self, kind: &str, id: i64, user: &str) {
        self.set(kind, id, "created_at", Value::from(fixture_timestamp()));
        self.set(kind, id, "modified_at", Value::from(fixture_timestamp()));
        self.set(kind, id, "modified_by", Value::from(user));
    }

    pub fn remove(&mut self, kind: &str, id: i64) {
        if let Some(records) = self.records.get_mut(kind) {
            records.remove(&RecordId::new(id));
        }
    }

    pub fn lookup_count(&self) -> usize {
        *self.lookups.borrow()
    }

    pub fn invalidations(&self) -> Vec<(String, Vec<RecordId>)> {
        self.invalidations.borrow().clone()
    }
}

impl ValueResolver for MemoryResolver {
    fn value(&self, kind: &str, id: RecordId, column: &str) -> Result<Value, ResolveError> {
        *self.lookups.borrow_mut() += 1;
        let records = self
            .records
            .get(kind)
            .ok_or_else(|| ResolveError::UnknownKind(kind.to_owned()))?;
        let record = records.get(&id).ok_or_else(|| ResolveError::UnknownRecord {
            kind: kind.to_owned(),
            id,
        })?;
        record
            .get(column)
            .cloned()
            .ok_or_else(|| ResolveError::UnknownColumn {
                kind: kind.to_owned(),
                column: column.to_owned(),
            })
    }

    fn invalidate(&self, kind: &str, ids: &[RecordId]) {
        self.invalidations
            .borrow_mut()
            .push((kind.to_owned(), ids.to_vec()));
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryHierarchy {
    groups: BTreeSet<RecordId>,
    children: BTreeMap<RecordId, Vec<RecordId>>,
}

impl MemoryHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_group(&mut self, id: i64, parent: i64) {
        let id = RecordId::new(id);
        self.groups.insert(id);
        self.children
            .entry(RecordId::new(parent))
            .or_default()
            .push(id);
    }
}

impl docket_engine::GroupHierarchy for MemoryHierarchy {
    fn contains(&self, group: RecordId) -> bool {
        self.groups.contains(&group)
    }

    fn descendant_ids(&self, group: RecordId) -> Vec<RecordId> {
        let mut ids = Vec::new();
        let mut stack = vec![group];
        while let Some(next) = stack.pop() {
            if let Some(children) = self.children.get(&next) {
                for child in children {
                    ids.push(*child);
                    stack.push(*child);
                }
            }
        }
        ids
    }
}

// A display surface stub: a snapshot plus the attached/loaded lifecycle
// flags the positioning queue polls.
#[derive(Debug, Clone, PartialEq)]
pub struct TestSurface {
    pub snapshot: ViewSnapshot,
    pub attached: bool,
    pub loaded: bool,
}

impl TestSurface {
    pub fn new(snapshot: ViewSnapshot) -> Self {
        Self {
            snapshot,
            attached: false,
            loaded: false,
        }
    }

    pub fn realize(&mut self) {
        self.attached = true;
        self.loaded = true;
    }
}

impl PositionSurface for TestSurface {
    fn is_ready(&self) -> bool {
        self.attached && self.loaded
    }

    fn apply_position(&mut self, current: RecordId, selected: &[RecordId]) -> bool {
        self.snapshot.set_position(current, selected)
    }

    fn clear_position(&mut self) {
        self.snapshot.clear_position();
    }
}

pub fn document_snapshot(surface: i64) -> ViewSnapshot {
    ViewSnapshot::new(DOCUMENT_KIND, SurfaceId::new(surface)).with_grouping_column("group_id")
}
