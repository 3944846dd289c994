// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::RecordId;

// Shared by every control that displays the group filter for one document
// kind; the controls must never disagree on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupState {
    pub current_group: RecordId,
    pub include_nested: bool,
}

impl GroupState {
    pub const fn new(current_group: RecordId, include_nested: bool) -> Self {
        Self {
            current_group,
            include_nested,
        }
    }

    // Root with nesting: every record passes, no restriction derived.
    pub const fn unrestricted() -> Self {
        Self {
            current_group: RecordId::NONE,
            include_nested: true,
        }
    }

    pub const fn is_unrestricted(self) -> bool {
        self.current_group.is_none() && self.include_nested
    }
}

impl Default for GroupState {
    fn default() -> Self {
        Self::unrestricted()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPosition {
    pub current: RecordId,
    pub selected: Vec<RecordId>,
}

impl PendingPosition {
    pub fn new(current: RecordId, selected: Vec<RecordId>) -> Self {
        Self { current, selected }
    }
}
