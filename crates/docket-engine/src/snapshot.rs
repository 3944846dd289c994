// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::{BTreeMap, BTreeSet};

use docket_model::{ColumnValues, RecordId, SurfaceId, Value};

use crate::FilterSet;

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRow {
    pub values: ColumnValues,
    pub needs_redraw: bool,
}

// The in-memory projection bound to one display surface. Exactly one
// snapshot per surface; all mutation goes through that surface's
// synchronization calls.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    kind: String,
    surface: SurfaceId,
    show_deleted: bool,
    grouping_column: Option<String>,
    base_filter: FilterSet,
    // None: unrestricted. Empty set: only records with a cleared group
    // reference. Otherwise: only records grouped under one of these ids.
    auxiliary: Option<BTreeSet<RecordId>>,
    rows: BTreeMap<RecordId, SnapshotRow>,
    current: RecordId,
    selected: Vec<RecordId>,
}

impl ViewSnapshot {
    pub fn new(kind: &str, surface: SurfaceId) -> Self {
        Self {
            kind: kind.to_owned(),
            surface,
            show_deleted: false,
            grouping_column: None,
            base_filter: FilterSet::new(),
            auxiliary: None,
            rows: BTreeMap::new(),
            current: RecordId::NONE,
            selected: Vec::new(),
        }
    }

    pub fn with_filter(mut self, filter: FilterSet) -> Self {
        self.base_filter = filter;
        self
    }

    pub fn with_show_deleted(mut self, show_deleted: bool) -> Self {
        self.show_deleted = show_deleted;
        self
    }

    pub fn with_grouping_column(mut self, column: &str) -> Self {
        self.grouping_column = Some(column.to_owned());
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    pub fn show_deleted(&self) -> bool {
        self.show_deleted
    }

    pub fn base_filter(&self) -> &FilterSet {
        &self.base_filter
    }

    pub fn set_base_filter(&mut self, filter: FilterSet) {
        self.base_filter = filter;
    }

    // The auxiliary restriction composes with the base filter; it never
    // replaces it. Returns whether the restriction actually changed.
    pub fn set_auxiliary_restriction(&mut self, ids: Option<Vec<RecordId>>) -> bool {
        let next = ids.map(|ids| ids.into_iter().collect::<BTreeSet<_>>());
        if next == self.auxiliary {
            return false;
        }
        self.auxiliary = next;
        true
    }

    pub fn auxiliary_restriction(&self) -> Option<&BTreeSet<RecordId>> {
        self.auxiliary.as_ref()
    }

    pub fn admits_group(&self, group: RecordId) -> bool {
        match &self.auxiliary {
            None => true,
            Some(ids) if group.is_none() => ids.is_empty(),
            Some(ids) => ids.contains(&group),
        }
    }

    pub fn group_of(&self, id: RecordId) -> RecordId {
        let Some(column) = &self.grouping_column else {
            return RecordId::NONE;
        };
        self.rows
            .get(&id)
            .and_then(|row| row.values.get(column))
            .and_then(Value::as_id)
            .unwrap_or(RecordId::NONE)
    }

    pub fn insert_row(&mut self, id: RecordId, values: ColumnValues) {
        self.rows.insert(
            id,
            SnapshotRow {
                values,
                needs_redraw: true,
            },
        );
    }

    pub fn overwrite_row(&mut self, id: RecordId, values: ColumnValues) -> bool {
        match self.rows.get_mut(&id) {
            Some(row) => {
                row.values = values;
                row.needs_redraw = true;
                true
            }
            None => false,
        }
    }

    pub fn remove_row(&mut self, id: RecordId) -> bool {
        let removed = self.rows.remove(&id).is_some();
        if removed {
            if self.current == id {
                self.current = RecordId::NONE;
            }
            self.selected.retain(|selected| *selected != id);
        }
        removed
    }

    pub fn row(&self, id: RecordId) -> Option<&SnapshotRow> {
        self.rows.get(&id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.rows.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.rows.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_visible(&self, id: RecordId) -> bool {
        self.contains(id) && self.admits_group(self.group_of(id))
    }

    // Loaded rows the auxiliary restriction still admits.
    pub fn visible_ids(&self) -> Vec<RecordId> {
        self.rows
            .keys()
            .copied()
            .filter(|id| self.admits_group(self.group_of(*id)))
            .collect()
    }

    pub fn current(&self) -> RecordId {
        self.current
    }

    pub fn selected(&self) -> &[RecordId] {
        &self.selected
    }

    // Push-only positioning: succeeds when the requested current row is
    // visible (or the request clears the position). Selected ids that are
    // not visible are dropped rather than failing the whole request.
    pub fn set_position(&mut self, current: RecordId, selected: &[RecordId]) -> bool {
        if current.is_none() {
            self.clear_position();
            return true;
        }
        if !self.is_visible(current) {
            return false;
        }
        self.current = current;
        self.selected = selected
            .iter()
            .copied()
            .filter(|id| self.is_visible(*id))
            .collect();
        if self.selected.is_empty() {
            self.selected.push(current);
        }
        true
    }

    pub fn clear_position(&mut self) {
        self.current = RecordId::NONE;
        self.selected.clear();
    }

    pub fn take_redraws(&mut self) -> Vec<RecordId> {
        let mut ids = Vec::new();
        for (id, row) in &mut self.rows {
            if row.needs_redraw {
                row.needs_redraw = false;
                ids.push(*id);
            }
        }
        ids
    }
}
