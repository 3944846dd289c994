// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use docket_model::{RecordId, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    UnknownKind(String),
    UnknownColumn { kind: String, column: String },
    UnknownRecord { kind: String, id: RecordId },
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownKind(kind) => write!(f, "unknown record kind `{kind}`"),
            Self::UnknownColumn { kind, column } => {
                write!(f, "unknown column `{column}` on record kind `{kind}`")
            }
            Self::UnknownRecord { kind, id } => {
                write!(f, "no `{kind}` record with id {}", id.get())
            }
        }
    }
}

impl std::error::Error for ResolveError {}

// Read-through seam over the shared per-kind value cache. The cache is
// shared read-only across every snapshot of one kind; full invalidation
// before a reload is the host's job, the engine only point-invalidates
// the ids a change-set touched.
pub trait ValueResolver {
    fn value(&self, kind: &str, id: RecordId, column: &str) -> Result<Value, ResolveError>;

    fn invalidate(&self, kind: &str, ids: &[RecordId]);
}
