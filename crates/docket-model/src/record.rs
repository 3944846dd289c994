// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{ColumnValues, RecordId, SurfaceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Unchanged,
    Inserted,
    Modified,
    Deleted,
}

impl ChangeKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Inserted => "inserted",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "unchanged" => Some(Self::Unchanged),
            "inserted" => Some(Self::Inserted),
            "modified" => Some(Self::Modified),
            "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub kind: ChangeKind,
    pub id: RecordId,
    // Deletions may arrive with the live id column already cleared; the
    // original id is the one the displayed row was keyed under.
    pub original_id: RecordId,
    pub current: ColumnValues,
    pub original: ColumnValues,
}

impl ChangeRecord {
    pub fn new(kind: ChangeKind, id: RecordId, current: ColumnValues) -> Self {
        Self {
            kind,
            id,
            original_id: id,
            current,
            original: ColumnValues::new(),
        }
    }

    pub fn with_original(mut self, original_id: RecordId, original: ColumnValues) -> Self {
        self.original_id = original_id;
        self.original = original;
        self
    }

    pub fn effective_id(&self) -> RecordId {
        match self.kind {
            ChangeKind::Deleted => self.original_id,
            _ => self.id,
        }
    }

    // The values a filter should see for this record's change kind.
    pub fn filter_values(&self) -> &ColumnValues {
        match self.kind {
            ChangeKind::Deleted => &self.original,
            _ => &self.current,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChangeSet {
    origin: Option<SurfaceId>,
    changes: BTreeMap<String, Vec<ChangeRecord>>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_origin(origin: SurfaceId) -> Self {
        Self {
            origin: Some(origin),
            changes: BTreeMap::new(),
        }
    }

    pub fn origin(&self) -> Option<SurfaceId> {
        self.origin
    }

    pub fn push(&mut self, kind_name: &str, record: ChangeRecord) {
        self.changes
            .entry(kind_name.to_owned())
            .or_default()
            .push(record);
    }

    pub fn records_for(&self, kind_name: &str) -> &[ChangeRecord] {
        self.changes.get(kind_name).map_or(&[], Vec::as_slice)
    }

    pub fn kind_names(&self) -> impl Iterator<Item = &str> {
        self.changes.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.changes.values().all(Vec::is_empty)
    }
}
