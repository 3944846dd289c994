// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use docket_engine::{
    ControlKind, FilterOp, FilterSet, GroupCorrection, GroupFilterCoordinator, SelectionOutcome,
};
use docket_model::{GroupState, RecordId, Value};
use docket_testkit::{MemoryHierarchy, document_snapshot, values};

// Group 5 contains 6, which contains 8; group 7 stands alone.
fn fixture_hierarchy() -> MemoryHierarchy {
    let mut hierarchy = MemoryHierarchy::new();
    hierarchy.add_group(5, 0);
    hierarchy.add_group(6, 5);
    hierarchy.add_group(8, 6);
    hierarchy.add_group(7, 0);
    hierarchy
}

fn grouped_snapshot() -> docket_engine::ViewSnapshot {
    let mut snapshot = document_snapshot(1)
        .with_filter(FilterSet::new().with_clause("title", FilterOp::StartsWith, Value::from("A")));
    for (id, title, group) in [(1, "Annex", 5), (2, "Attic", 7), (3, "Atlas", 0)] {
        snapshot.insert_row(
            RecordId::new(id),
            values(&[
                ("id", Value::Int(id)),
                ("title", Value::from(title)),
                ("group_id", Value::Int(group)),
            ]),
        );
    }
    snapshot.take_redraws();
    snapshot
}

#[test]
fn nested_derivation_includes_transitive_descendants() {
    let hierarchy = fixture_hierarchy();
    let coordinator = GroupFilterCoordinator::new(GroupState::new(RecordId::new(5), true));

    let mut ids = coordinator
        .derive_auxiliary_ids(&hierarchy)
        .expect("restricted state");
    ids.sort_unstable();
    assert_eq!(ids, vec![RecordId::new(5), RecordId::new(6), RecordId::new(8)]);
}

#[test]
fn derivation_is_stable_across_repeated_calls() {
    let hierarchy = fixture_hierarchy();
    let coordinator = GroupFilterCoordinator::new(GroupState::new(RecordId::new(5), true));

    let first = coordinator.derive_auxiliary_ids(&hierarchy);
    let second = coordinator.derive_auxiliary_ids(&hierarchy);
    assert_eq!(first, second);
    assert_eq!(coordinator.state(), GroupState::new(RecordId::new(5), true));
}

#[test]
fn correction_switches_to_a_single_shared_group() {
    let hierarchy = fixture_hierarchy();
    let mut coordinator = GroupFilterCoordinator::new(GroupState::new(RecordId::new(5), false));

    let correction = coordinator.correct_group_for_ids(&[RecordId::new(7)], &hierarchy);
    assert!(matches!(correction, GroupCorrection::Switched { .. }));
    assert_eq!(coordinator.state(), GroupState::new(RecordId::new(7), false));

    // Both controls receive the same corrected state.
    let states: Vec<GroupState> = correction.writes().iter().map(|write| write.state).collect();
    assert_eq!(states, vec![coordinator.state(), coordinator.state()]);
    coordinator.propagation_complete();
}

#[test]
fn correction_fails_open_on_mixed_groups() {
    let hierarchy = fixture_hierarchy();
    let mut coordinator = GroupFilterCoordinator::new(GroupState::new(RecordId::new(5), false));

    let correction =
        coordinator.correct_group_for_ids(&[RecordId::new(5), RecordId::new(7)], &hierarchy);
    assert!(matches!(correction, GroupCorrection::Widened { .. }));
    assert!(coordinator.state().is_unrestricted());
}

#[test]
fn correction_leaves_admitted_targets_alone() {
    let hierarchy = fixture_hierarchy();
    let mut coordinator = GroupFilterCoordinator::new(GroupState::new(RecordId::new(5), true));

    // Group 8 is a transitive descendant of 5.
    let correction = coordinator.correct_group_for_ids(&[RecordId::new(8)], &hierarchy);
    assert_eq!(correction, GroupCorrection::Covered);
    assert_eq!(coordinator.state(), GroupState::new(RecordId::new(5), true));
}

#[test]
fn correction_echoes_are_suppressed_until_complete() {
    let hierarchy = fixture_hierarchy();
    let mut coordinator = GroupFilterCoordinator::new(GroupState::new(RecordId::new(5), false));

    let correction = coordinator.correct_group_for_ids(&[RecordId::new(7)], &hierarchy);
    assert!(!correction.writes().is_empty());

    // Writing the corrected value into the controls fires their change
    // handlers; the coordinator must not treat those as user edits.
    assert_eq!(
        coordinator.selection_changed(ControlKind::Tree, RecordId::new(7)),
        SelectionOutcome::Suppressed
    );
    assert_eq!(
        coordinator.selection_changed(ControlKind::Combo, RecordId::new(7)),
        SelectionOutcome::Suppressed
    );
    coordinator.propagation_complete();

    assert_eq!(
        coordinator.selection_changed(ControlKind::Tree, RecordId::new(7)),
        SelectionOutcome::Unchanged
    );
}

#[test]
fn restriction_composes_with_the_base_filter() {
    let hierarchy = fixture_hierarchy();
    let mut snapshot = grouped_snapshot();
    let filter_before = snapshot.base_filter().clone();

    let coordinator = GroupFilterCoordinator::new(GroupState::new(RecordId::new(5), false));
    snapshot.set_auxiliary_restriction(coordinator.derive_auxiliary_ids(&hierarchy));

    assert_eq!(snapshot.visible_ids(), vec![RecordId::new(1)]);
    assert_eq!(snapshot.base_filter(), &filter_before);

    // Widening back to the root shows every loaded row again.
    let coordinator = GroupFilterCoordinator::new(GroupState::unrestricted());
    snapshot.set_auxiliary_restriction(coordinator.derive_auxiliary_ids(&hierarchy));
    assert_eq!(snapshot.visible_ids().len(), 3);
}

#[test]
fn ungrouped_restriction_admits_only_cleared_group_references() {
    let hierarchy = fixture_hierarchy();
    let mut snapshot = grouped_snapshot();

    let coordinator = GroupFilterCoordinator::new(GroupState::new(RecordId::NONE, false));
    snapshot.set_auxiliary_restriction(coordinator.derive_auxiliary_ids(&hierarchy));

    assert_eq!(snapshot.visible_ids(), vec![RecordId::new(3)]);
}

#[test]
fn previous_position_is_restored_best_effort() {
    let hierarchy = fixture_hierarchy();
    let mut snapshot = grouped_snapshot();
    assert!(snapshot.set_position(RecordId::new(1), &[RecordId::new(1)]));

    // Narrowing to group 7 hides the positioned row; re-applying the old
    // position fails, so the host clears rather than pointing at a
    // hidden record.
    let coordinator = GroupFilterCoordinator::new(GroupState::new(RecordId::new(7), false));
    let previous = (snapshot.current(), snapshot.selected().to_vec());
    snapshot.set_auxiliary_restriction(coordinator.derive_auxiliary_ids(&hierarchy));
    if !snapshot.set_position(previous.0, &previous.1) {
        snapshot.clear_position();
    }
    assert_eq!(snapshot.current(), RecordId::NONE);

    // Widening back makes the restore succeed.
    let coordinator = GroupFilterCoordinator::new(GroupState::unrestricted());
    snapshot.set_auxiliary_restriction(coordinator.derive_auxiliary_ids(&hierarchy));
    assert!(snapshot.set_position(previous.0, &previous.1));
    assert_eq!(snapshot.current(), RecordId::new(1));
}

#[test]
fn include_nested_toggle_re_derives_without_a_peer_write() {
    let hierarchy = fixture_hierarchy();
    let mut coordinator = GroupFilterCoordinator::new(GroupState::new(RecordId::new(5), false));

    assert_eq!(
        coordinator.derive_auxiliary_ids(&hierarchy),
        Some(vec![RecordId::new(5)])
    );
    assert!(coordinator.set_include_nested(true));
    assert!(!coordinator.set_include_nested(true));

    let mut ids = coordinator
        .derive_auxiliary_ids(&hierarchy)
        .expect("restricted state");
    ids.sort_unstable();
    assert_eq!(ids, vec![RecordId::new(5), RecordId::new(6), RecordId::new(8)]);
    assert!(!coordinator.is_propagating());
}
