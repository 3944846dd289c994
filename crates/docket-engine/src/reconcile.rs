// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};

use docket_model::{
    ChangeKind, ChangeRecord, ChangeSet, ColumnValues, KindDescriptor, KindRegistry, RecordId,
    Value,
};

use crate::{ApplyReport, Diagnostic, FilterEvaluator, ResolveError, ValueResolver, ViewSnapshot};

pub struct ChangeReconciler<'a> {
    registry: &'a KindRegistry,
    resolver: &'a dyn ValueResolver,
}

impl<'a> ChangeReconciler<'a> {
    pub fn new(registry: &'a KindRegistry, resolver: &'a dyn ValueResolver) -> Self {
        Self { registry, resolver }
    }

    // Reconciles one consumed-once change-set into one live snapshot. The
    // change-set is applied in order; a bad record is reported and skipped,
    // never allowed to stall the records after it.
    pub fn apply(&self, snapshot: &mut ViewSnapshot, change_set: &ChangeSet) -> Result<ApplyReport> {
        let descriptor = self
            .registry
            .get(snapshot.kind())
            .with_context(|| format!("record kind `{}` is not registered", snapshot.kind()))?;
        let evaluator = FilterEvaluator::new(self.resolver);
        let own_edit = change_set.origin() == Some(snapshot.surface());
        let mut report = ApplyReport::default();

        for record in change_set.records_for(snapshot.kind()) {
            if record.kind == ChangeKind::Unchanged {
                continue;
            }
            let id = record.effective_id();
            if id.is_none() {
                report.diagnostics.push(Diagnostic::MissingIdentity {
                    kind: descriptor.name.clone(),
                });
                continue;
            }

            // The record changed, so any cached values for it are stale.
            self.resolver.invalidate(&descriptor.name, &[id]);

            let visible = self.required_visibility(
                descriptor,
                snapshot,
                &evaluator,
                record,
                own_edit,
                &mut report.diagnostics,
            );

            match (visible, snapshot.contains(id)) {
                (true, present) => {
                    let mut values = record.filter_values().clone();
                    values.insert(descriptor.id_column.clone(), Value::from(id));
                    self.refresh_columns(descriptor, id, &mut values, &mut report.diagnostics);
                    if present {
                        snapshot.overwrite_row(id, values);
                        report.updated.push(id);
                    } else {
                        snapshot.insert_row(id, values);
                        // Only brand-new records drive selection; a row
                        // that surfaced through an edit is just an update.
                        if record.kind == ChangeKind::Inserted {
                            report.inserted_selection.push(id);
                        } else {
                            report.updated.push(id);
                        }
                    }
                }
                (false, true) => {
                    snapshot.remove_row(id);
                    report.removed.push(id);
                }
                (false, false) => {}
            }
        }

        Ok(report)
    }

    fn required_visibility(
        &self,
        descriptor: &KindDescriptor,
        snapshot: &ViewSnapshot,
        evaluator: &FilterEvaluator<'_>,
        record: &ChangeRecord,
        own_edit: bool,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> bool {
        match record.kind {
            // The surface that performed the insert must see its own new
            // record even when a concurrently edited filter rejects it.
            ChangeKind::Inserted => {
                own_edit
                    || evaluator.matches(
                        descriptor,
                        &record.current,
                        snapshot.base_filter(),
                        diagnostics,
                    )
            }
            ChangeKind::Modified => evaluator.matches(
                descriptor,
                &record.current,
                snapshot.base_filter(),
                diagnostics,
            ),
            ChangeKind::Deleted => {
                snapshot.show_deleted()
                    && evaluator.matches(
                        descriptor,
                        &record.original,
                        snapshot.base_filter(),
                        diagnostics,
                    )
            }
            ChangeKind::Unchanged => false,
        }
    }

    // Service columns are stamped by the store, and derived columns belong
    // to the referenced record; both may be stale in the change-set, so
    // they are re-read through the resolver instead of copied.
    fn refresh_columns(
        &self,
        descriptor: &KindDescriptor,
        id: RecordId,
        values: &mut ColumnValues,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        for column in &descriptor.service_columns {
            let value = match self.resolver.value(&descriptor.name, id, column) {
                Ok(value) => value,
                Err(error) => {
                    diagnostics.push(Diagnostic::ResolverMiss {
                        kind: descriptor.name.clone(),
                        id,
                        column: column.clone(),
                        error,
                    });
                    Value::Null
                }
            };
            values.insert(column.clone(), value);
        }

        for derived in &descriptor.derived {
            let target = values.get(&derived.ref_column).and_then(Value::as_id);
            let value = match target {
                None => Value::Null,
                Some(ref_id) => match descriptor.reference_target(&derived.ref_column) {
                    None => {
                        diagnostics.push(Diagnostic::ResolverMiss {
                            kind: descriptor.name.clone(),
                            id,
                            column: derived.ref_column.clone(),
                            error: ResolveError::UnknownColumn {
                                kind: descriptor.name.clone(),
                                column: derived.ref_column.clone(),
                            },
                        });
                        Value::Null
                    }
                    Some(target_kind) => {
                        match self.resolver.value(target_kind, ref_id, &derived.target_column) {
                            Ok(value) => value,
                            Err(error) => {
                                diagnostics.push(Diagnostic::ResolverMiss {
                                    kind: target_kind.to_owned(),
                                    id: ref_id,
                                    column: derived.target_column.clone(),
                                    error,
                                });
                                Value::Null
                            }
                        }
                    }
                },
            };
            values.insert(derived.column.clone(), value);
        }
    }
}
