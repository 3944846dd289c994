// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ColumnRef {
    Plain(String),
    Reference {
        ref_column: String,
        target_column: String,
    },
}

impl ColumnRef {
    // "A.B" crosses the reference in column A to column B on the target
    // kind; anything without a dot is a plain column read.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('.') {
            Some((ref_column, target_column)) if !ref_column.is_empty() => Self::Reference {
                ref_column: ref_column.to_owned(),
                target_column: target_column.to_owned(),
            },
            _ => Self::Plain(raw.to_owned()),
        }
    }

    pub fn plain(name: &str) -> Self {
        Self::Plain(name.to_owned())
    }
}

impl std::fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain(name) => f.write_str(name),
            Self::Reference {
                ref_column,
                target_column,
            } => write!(f, "{ref_column}.{target_column}"),
        }
    }
}

// A displayed column denormalized from a referenced record, e.g. the
// vendor name shown next to a vendor id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedColumn {
    pub column: String,
    pub ref_column: String,
    pub target_column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grouping {
    pub column: String,
    pub group_kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindDescriptor {
    pub name: String,
    pub id_column: String,
    // Reference column name -> target kind name. Relations are expressed
    // as name lookups through the registry, never as back-references.
    pub references: BTreeMap<String, String>,
    pub derived: Vec<DerivedColumn>,
    // Stamped by the store on every write; a change-set may carry stale
    // copies, so these are always re-read through the resolver.
    pub service_columns: Vec<String>,
    pub grouping: Option<Grouping>,
}

impl KindDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            id_column: "id".to_owned(),
            references: BTreeMap::new(),
            derived: Vec::new(),
            service_columns: Vec::new(),
            grouping: None,
        }
    }

    pub fn with_reference(mut self, column: &str, target_kind: &str) -> Self {
        self.references
            .insert(column.to_owned(), target_kind.to_owned());
        self
    }

    pub fn with_derived(mut self, column: &str, ref_column: &str, target_column: &str) -> Self {
        self.derived.push(DerivedColumn {
            column: column.to_owned(),
            ref_column: ref_column.to_owned(),
            target_column: target_column.to_owned(),
        });
        self
    }

    pub fn with_service_columns(mut self, columns: &[&str]) -> Self {
        self.service_columns = columns.iter().map(|c| (*c).to_owned()).collect();
        self
    }

    pub fn with_grouping(mut self, column: &str, group_kind: &str) -> Self {
        self.grouping = Some(Grouping {
            column: column.to_owned(),
            group_kind: group_kind.to_owned(),
        });
        self
    }

    pub fn reference_target(&self, column: &str) -> Option<&str> {
        self.references.get(column).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KindRegistry {
    kinds: BTreeMap<String, KindDescriptor>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: KindDescriptor) {
        self.kinds.insert(descriptor.name.clone(), descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&KindDescriptor> {
        self.kinds.get(name)
    }

    pub fn kind_names(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }
}
