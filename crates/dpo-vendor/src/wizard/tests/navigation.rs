use super::common::*;
use crate::wizard::{FieldEdit, SectionId, StepMarker, WizardError};
use serde_json::{json, Value};
use std::sync::Arc;

const THIRTEEN: [&str; 13] = [
    "s1", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "s12", "s13",
];

#[test]
fn new_rejects_empty_section_lists() {
    let result = crate::wizard::FormWizard::new(
        Vec::new(),
        Arc::new(RecordingAdapter::default()),
        Arc::new(FixedIdentity(None)),
    );
    assert!(matches!(result, Err(WizardError::EmptySections)));
}

#[test]
fn new_rejects_duplicate_section_ids() {
    let result = crate::wizard::FormWizard::new(
        sections(&["A", "B", "A"]),
        Arc::new(RecordingAdapter::default()),
        Arc::new(FixedIdentity(None)),
    );
    match result {
        Err(WizardError::DuplicateSection(id)) => assert_eq!(id, SectionId::from("A")),
        Err(other) => panic!("expected duplicate section error, got {other:?}"),
        Ok(_) => panic!("expected duplicate section error"),
    }
}

#[test]
fn starts_on_first_section_with_empty_state() {
    let (wizard, _) = wizard(&["A", "B", "C"]);
    assert_eq!(wizard.cursor(), 0);
    assert!(wizard.state().is_empty());
    assert_eq!(wizard.active_section().id, SectionId::from("A"));
}

#[test]
fn advance_is_clamped_at_last_section() {
    let (mut wizard, _) = wizard(&["A", "B", "C"]);
    assert_eq!(wizard.advance(), 1);
    assert_eq!(wizard.advance(), 2);
    assert_eq!(wizard.advance(), 2);
    assert_eq!(wizard.advance(), 2);
    assert!(wizard.is_last_step());
}

#[test]
fn retreat_is_clamped_at_first_section() {
    let (mut wizard, _) = wizard(&["A", "B", "C"]);
    assert_eq!(wizard.retreat(), 0);
    wizard.advance();
    assert_eq!(wizard.retreat(), 0);
    assert_eq!(wizard.retreat(), 0);
    assert!(wizard.is_first_step());
}

#[test]
fn jump_to_allows_skipping_ahead_and_back() {
    let (mut wizard, _) = wizard(&["A", "B", "C", "D"]);
    assert_eq!(wizard.jump_to(3).expect("in range"), 3);
    assert_eq!(wizard.jump_to(1).expect("in range"), 1);
    assert_eq!(wizard.cursor(), 1);
}

#[test]
fn jump_to_rejects_out_of_range_without_moving() {
    let (mut wizard, _) = wizard(&["A", "B", "C"]);
    wizard.advance();

    match wizard.jump_to(3) {
        Err(WizardError::NavigationBounds { index, len }) => {
            assert_eq!(index, 3);
            assert_eq!(len, 3);
        }
        other => panic!("expected bounds error, got {other:?}"),
    }
    assert!(wizard.jump_to(usize::MAX).is_err());
    assert_eq!(wizard.cursor(), 1);
}

#[test]
fn cursor_stays_in_range_across_mixed_navigation() {
    let (mut wizard, _) = wizard(&["A", "B", "C", "D", "E"]);
    let len = wizard.section_count();

    for step in 0..60usize {
        match step % 4 {
            0 => {
                wizard.advance();
            }
            1 => {
                wizard.retreat();
            }
            2 => {
                let _ = wizard.jump_to(step % 7);
            }
            _ => {
                wizard.advance();
                wizard.advance();
            }
        }
        assert!(wizard.cursor() < len, "cursor escaped at step {step}");
    }
}

#[test]
fn update_section_replaces_instead_of_merging() {
    let (mut wizard, _) = wizard(&["basic_info", "vendor_info"]);
    let id = SectionId::from("basic_info");

    wizard
        .update_section(id.clone(), data(json!({ "name": "Acme" })))
        .expect("known section");
    wizard
        .update_section(id.clone(), data(json!({ "email": "a@b.com" })))
        .expect("known section");

    assert_eq!(
        wizard.state().get(&id),
        Some(&data(json!({ "email": "a@b.com" })))
    );
}

#[test]
fn update_section_rejects_unknown_ids() {
    let (mut wizard, _) = wizard(&["A"]);
    let result = wizard.update_section(SectionId::from("Z"), data(json!({ "x": 1 })));
    assert!(matches!(result, Err(WizardError::UnknownSection(_))));
    assert!(wizard.state().is_empty());
}

#[test]
fn update_section_may_target_inactive_sections() {
    let (mut wizard, _) = wizard(&["A", "B"]);
    wizard
        .update_section(SectionId::from("B"), data(json!({ "y": 2 })))
        .expect("known section");
    assert_eq!(wizard.cursor(), 0);
    assert!(wizard.state().contains(&SectionId::from("B")));
}

#[test]
fn edit_active_flows_through_the_view_callback() {
    let (mut wizard, _) = wizard(&["A", "B"]);
    assert!(wizard.edit_active(FieldEdit::new("x", 1)));
    assert!(wizard.edit_active(FieldEdit::new("y", "two")));
    wizard.advance();
    assert!(!wizard.edit_active(FieldEdit::new("undeclared", true)));

    assert_eq!(
        wizard.state().get(&SectionId::from("A")),
        Some(&data(json!({ "x": 1, "y": "two" })))
    );
    assert!(!wizard.state().contains(&SectionId::from("B")));
}

#[test]
fn render_active_uses_empty_object_for_unvisited_sections() {
    let (wizard, _) = wizard(&["A"]);
    let render = wizard.render_active();
    assert!(render.fields.iter().all(|field| field.value == Value::Null));
}

#[test]
fn progress_reports_fraction_of_steps() {
    let (mut wizard, _) = wizard(&THIRTEEN);
    assert_eq!(wizard.progress(), 1.0 / 13.0);
    assert_eq!(wizard.progress_percent(), 8);

    wizard.jump_to(12).expect("last step");
    assert_eq!(wizard.progress(), 1.0);
    assert_eq!(wizard.progress_percent(), 100);
}

#[test]
fn navigator_marks_position_of_each_section() {
    let (mut wizard, _) = wizard(&["A", "B", "C"]);
    wizard.advance();

    let markers: Vec<StepMarker> = wizard.navigator().iter().map(|entry| entry.marker).collect();
    assert_eq!(
        markers,
        vec![StepMarker::Passed, StepMarker::Current, StepMarker::Upcoming]
    );
    assert_eq!(wizard.navigator()[2].number, 3);
}

#[test]
fn view_exposes_actions_for_current_step() {
    let (mut wizard, _) = wizard(&["A", "B"]);
    let first = wizard.view();
    assert_eq!(first.step, 1);
    assert_eq!(first.total_steps, 2);
    assert!(first.can_save && first.can_advance);
    assert!(!first.can_submit && !first.can_retreat);

    wizard.advance();
    let last = wizard.view();
    assert_eq!(last.section_id, SectionId::from("B"));
    assert!(last.can_submit && last.can_retreat);
    assert!(!last.can_save && !last.can_advance);
}
