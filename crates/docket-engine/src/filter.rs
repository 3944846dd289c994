// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;

use docket_model::{ChangeRecord, ColumnRef, ColumnValues, KindDescriptor, Value};

use crate::{Diagnostic, ResolveError, ValueResolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Equals,
    NotEquals,
    StartsWith,
    Contains,
    IsNull,
    IsNotNull,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    pub column: ColumnRef,
    pub op: FilterOp,
    pub operand: Value,
}

impl FilterClause {
    pub fn new(column: &str, op: FilterOp, operand: Value) -> Self {
        Self {
            column: ColumnRef::parse(column),
            op,
            operand,
        }
    }

    // Null compares equal only to an explicit null operand; the text ops
    // never match a null or non-text value.
    fn accepts(&self, value: &Value) -> bool {
        match self.op {
            FilterOp::Equals => *value == self.operand,
            FilterOp::NotEquals => *value != self.operand,
            FilterOp::StartsWith => match (value.as_text(), self.operand.as_text()) {
                (Some(text), Some(prefix)) => text.starts_with(prefix),
                _ => false,
            },
            FilterOp::Contains => match (value.as_text(), self.operand.as_text()) {
                (Some(text), Some(needle)) => text.contains(needle),
                _ => false,
            },
            FilterOp::IsNull => value.is_null(),
            FilterOp::IsNotNull => !value.is_null(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterSet {
    clauses: Vec<FilterClause>,
    // Rebuilt on every clause change so visibility checks never re-derive it.
    columns: BTreeSet<ColumnRef>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clause(mut self, column: &str, op: FilterOp, operand: Value) -> Self {
        self.push(FilterClause::new(column, op, operand));
        self
    }

    pub fn push(&mut self, clause: FilterClause) {
        self.clauses.push(clause);
        self.rebuild_columns();
    }

    pub fn set_clauses(&mut self, clauses: Vec<FilterClause>) {
        self.clauses = clauses;
        self.rebuild_columns();
    }

    pub fn clear(&mut self) {
        self.clauses.clear();
        self.columns.clear();
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn required_columns(&self) -> &BTreeSet<ColumnRef> {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    fn rebuild_columns(&mut self) {
        self.columns = self
            .clauses
            .iter()
            .map(|clause| clause.column.clone())
            .collect();
    }
}

pub struct FilterEvaluator<'a> {
    resolver: &'a dyn ValueResolver,
}

impl<'a> FilterEvaluator<'a> {
    pub fn new(resolver: &'a dyn ValueResolver) -> Self {
        Self { resolver }
    }

    // Conjunction over all clauses, short-circuiting on the first miss.
    pub fn matches(
        &self,
        kind: &KindDescriptor,
        values: &ColumnValues,
        filter: &FilterSet,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> bool {
        filter.clauses().iter().all(|clause| {
            let value = self.column_value(kind, values, &clause.column, diagnostics);
            clause.accepts(&value)
        })
    }

    // Picks the values the visibility rule prescribes for the record's
    // change kind: original for deletions, current otherwise.
    pub fn matches_record(
        &self,
        kind: &KindDescriptor,
        record: &ChangeRecord,
        filter: &FilterSet,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> bool {
        self.matches(kind, record.filter_values(), filter, diagnostics)
    }

    // Resolves what a filter (or a host rendering one) sees for a column:
    // the row's own value, or the referenced record's value for a hop.
    pub fn column_value(
        &self,
        kind: &KindDescriptor,
        values: &ColumnValues,
        column: &ColumnRef,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Value {
        match column {
            ColumnRef::Plain(name) => values.get(name).cloned().unwrap_or(Value::Null),
            ColumnRef::Reference {
                ref_column,
                target_column,
            } => {
                let Some(ref_id) = values.get(ref_column).and_then(Value::as_id) else {
                    // Cleared reference: the target value is unknown and
                    // matches only an explicit null operand.
                    return Value::Null;
                };
                let Some(target_kind) = kind.reference_target(ref_column) else {
                    diagnostics.push(Diagnostic::ResolverMiss {
                        kind: kind.name.clone(),
                        id: ref_id,
                        column: ref_column.clone(),
                        error: ResolveError::UnknownColumn {
                            kind: kind.name.clone(),
                            column: ref_column.clone(),
                        },
                    });
                    return Value::Null;
                };
                match self.resolver.value(target_kind, ref_id, target_column) {
                    Ok(value) => value,
                    Err(error) => {
                        diagnostics.push(Diagnostic::ResolverMiss {
                            kind: target_kind.to_owned(),
                            id: ref_id,
                            column: target_column.clone(),
                            error,
                        });
                        Value::Null
                    }
                }
            }
        }
    }
}
