// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use docket_model::RecordId;

use crate::ResolveError;

// Classified partial failures. Hosts route these to a status line or log;
// tests assert on them directly. A diagnostic never aborts the rest of
// the change-set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    MissingIdentity {
        kind: String,
    },
    ResolverMiss {
        kind: String,
        id: RecordId,
        column: String,
        error: ResolveError,
    },
}

impl Diagnostic {
    pub fn message(&self) -> String {
        match self {
            Self::MissingIdentity { kind } => {
                format!("`{kind}` record without an id skipped")
            }
            Self::ResolverMiss {
                kind,
                id,
                column,
                error,
            } => format!(
                "`{kind}` record {} column `{column}` unresolved: {error}",
                id.get()
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplyReport {
    // Brand-new visible rows, in change-set order; the caller pushes these
    // into the surface's selection.
    pub inserted_selection: Vec<RecordId>,
    pub updated: Vec<RecordId>,
    pub removed: Vec<RecordId>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ApplyReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn has_changes(&self) -> bool {
        !(self.inserted_selection.is_empty() && self.updated.is_empty() && self.removed.is_empty())
    }
}
