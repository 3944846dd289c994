// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use docket_model::{GroupState, RecordId};

// The grouping hierarchy as loaded by the host (group records with parent
// references). Descendants are transitive and exclude the group itself.
pub trait GroupHierarchy {
    fn contains(&self, group: RecordId) -> bool;

    fn descendant_ids(&self, group: RecordId) -> Vec<RecordId>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Tree,
    Combo,
}

impl ControlKind {
    pub const fn peer(self) -> Self {
        match self {
            Self::Tree => Self::Combo,
            Self::Combo => Self::Tree,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tree => "tree",
            Self::Combo => "combo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Propagation {
    Idle,
    Propagating,
}

// A value the host must push into a control. Performing the write fires
// that control's change handler, whose notification lands back here while
// the guard is still held and is suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlWrite {
    pub target: ControlKind,
    pub state: GroupState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    // State updated; perform the peer write, then call
    // `propagation_complete`.
    Propagate(ControlWrite),
    // The control re-selected the value it already shows.
    Unchanged,
    // Notification arrived from inside a propagation; ignored.
    Suppressed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupCorrection {
    // Every target is admitted by the current restriction.
    Covered,
    // All targets share one known group; the selection narrowed to it.
    Switched { writes: [ControlWrite; 2] },
    // Mixed or orphaned groups; failed open to no restriction.
    Widened { writes: [ControlWrite; 2] },
}

impl GroupCorrection {
    pub fn writes(&self) -> &[ControlWrite] {
        match self {
            Self::Covered => &[],
            Self::Switched { writes } | Self::Widened { writes } => writes,
        }
    }
}

// Keeps the tree selector and the combo selector agreeing on one
// GroupState without feedback loops: every cross-control write happens
// inside an Idle -> Propagating -> Idle bracket, and change notifications
// received while Propagating are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupFilterCoordinator {
    state: GroupState,
    guard: Propagation,
}

impl Default for GroupFilterCoordinator {
    fn default() -> Self {
        Self::new(GroupState::unrestricted())
    }
}

impl GroupFilterCoordinator {
    pub fn new(state: GroupState) -> Self {
        Self {
            state,
            guard: Propagation::Idle,
        }
    }

    pub fn state(&self) -> GroupState {
        self.state
    }

    pub fn is_propagating(&self) -> bool {
        self.guard == Propagation::Propagating
    }

    pub fn selection_changed(&mut self, source: ControlKind, group: RecordId) -> SelectionOutcome {
        if self.guard == Propagation::Propagating {
            return SelectionOutcome::Suppressed;
        }
        if self.state.current_group == group {
            return SelectionOutcome::Unchanged;
        }
        self.state.current_group = group;
        self.guard = Propagation::Propagating;
        SelectionOutcome::Propagate(ControlWrite {
            target: source.peer(),
            state: self.state,
        })
    }

    pub fn propagation_complete(&mut self) {
        self.guard = Propagation::Idle;
    }

    // The nesting flag lives in a single shared checkbox, so flipping it
    // needs no peer write, only a re-derivation of the restriction.
    pub fn set_include_nested(&mut self, include_nested: bool) -> bool {
        if self.state.include_nested == include_nested {
            return false;
        }
        self.state.include_nested = include_nested;
        true
    }

    // Derives the group-id restriction for the current state. Pure: the
    // same state always derives the same restriction.
    pub fn derive_auxiliary_ids(&self, hierarchy: &dyn GroupHierarchy) -> Option<Vec<RecordId>> {
        Self::derive_for(self.state, hierarchy)
    }

    fn derive_for(state: GroupState, hierarchy: &dyn GroupHierarchy) -> Option<Vec<RecordId>> {
        match (state.current_group, state.include_nested) {
            (group, true) if group.is_none() => None,
            (group, false) if group.is_none() => Some(Vec::new()),
            (group, false) => Some(vec![group]),
            (group, true) => {
                let mut ids = vec![group];
                ids.extend(hierarchy.descendant_ids(group));
                Some(ids)
            }
        }
    }

    // Before forcing specific records into view, make sure their groups
    // are admitted. Never drops the request: narrows to a single shared
    // group, otherwise fails open to no restriction.
    pub fn correct_group_for_ids(
        &mut self,
        target_groups: &[RecordId],
        hierarchy: &dyn GroupHierarchy,
    ) -> GroupCorrection {
        if target_groups.is_empty() {
            return GroupCorrection::Covered;
        }
        let restriction = Self::derive_for(self.state, hierarchy);
        let admitted = |group: RecordId| match &restriction {
            None => true,
            Some(ids) if group.is_none() => ids.is_empty(),
            Some(ids) => ids.contains(&group),
        };
        if target_groups.iter().all(|group| admitted(*group)) {
            return GroupCorrection::Covered;
        }

        let mut distinct: Vec<RecordId> = target_groups.to_vec();
        distinct.sort_unstable();
        distinct.dedup();

        if let [only] = distinct.as_slice() {
            if only.is_none() || hierarchy.contains(*only) {
                self.state.current_group = *only;
                self.guard = Propagation::Propagating;
                return GroupCorrection::Switched {
                    writes: self.writes_for_both(),
                };
            }
        }

        // Mixed groups, or a group the hierarchy does not know: show
        // everything rather than silently hiding the requested records.
        self.state = GroupState::unrestricted();
        self.guard = Propagation::Propagating;
        GroupCorrection::Widened {
            writes: self.writes_for_both(),
        }
    }

    fn writes_for_both(&self) -> [ControlWrite; 2] {
        [
            ControlWrite {
                target: ControlKind::Tree,
                state: self.state,
            },
            ControlWrite {
                target: ControlKind::Combo,
                state: self.state,
            },
        ]
    }
}
