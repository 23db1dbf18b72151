use super::*;
use crate::entry::{SECTION_ENTRY_SUFFIX, SECTION_RESERVE};

fn reserves(output: &[MemoryEntry]) -> Vec<(u64, u64)> {
    output
        .iter()
        .filter(|e| e.kind == EntryKind::Reserve)
        .map(|e| (e.address_start, e.address_length))
        .collect()
}

fn count(output: &[MemoryEntry], kind: EntryKind) -> usize {
    output.iter().filter(|e| e.kind == kind).count()
}

#[test]
fn section_length_is_conserved() {
    let sections = vec![section("MCU", ".data", 0x100, 0x100)];
    let objects = vec![object("MCU", ".data", "a.o", 0x100, 0x80)];
    let output = project_objects_in_sections(&sections, &objects);

    assert_eq!(output.len(), 3);
    assert_eq!(count(&output, EntryKind::SectionMarker), 1);
    assert_eq!(count(&output, EntryKind::Object), 1);
    assert_eq!(reserves(&output), vec![(0x180, 0x80)]);

    let consumed: u64 = output
        .iter()
        .filter(|e| e.kind != EntryKind::SectionMarker)
        .map(|e| e.address_length)
        .sum();
    assert_eq!(consumed, sections[0].address_length_original());
}

#[test]
fn marker_is_a_zero_length_copy() {
    let sections = vec![section("MCU", ".bss", 0x400, 0x10)];
    let output = project_objects_in_sections(&sections, &[]);
    let marker = output
        .iter()
        .find(|e| e.kind == EntryKind::SectionMarker)
        .expect("marker");
    assert_eq!(marker.address_start, 0x400);
    assert_eq!(marker.address_length, 0);
    assert_eq!(marker.object_name, format!(".bss {}", SECTION_ENTRY_SUFFIX));
}

#[test]
fn empty_section_becomes_one_reserve() {
    let sections = vec![section("MCU", ".bss", 0x400, 0x10)];
    let output = project_objects_in_sections(&sections, &[]);
    assert_eq!(reserves(&output), vec![(0x400, 0x10)]);
    let reserve = output.iter().find(|e| e.kind == EntryKind::Reserve).expect("reserve");
    assert_eq!(reserve.object_name, SECTION_RESERVE);
    assert_eq!(reserve.section_name, ".bss");
}

#[test]
fn object_inside_leaves_reserve_on_both_sides() {
    let sections = vec![section("MCU", ".text", 0x0, 0x100)];
    let objects = vec![object("MCU", ".text", "a.o", 0x40, 0x40)];
    let output = project_objects_in_sections(&sections, &objects);
    assert_eq!(reserves(&output), vec![(0x0, 0x40), (0x80, 0x80)]);
}

#[test]
fn object_past_the_tail_stops_the_section() {
    let sections = vec![section("MCU", ".text", 0x0, 0x100)];
    let objects = vec![object("MCU", ".text", "a.o", 0x80, 0x100)];
    let output = project_objects_in_sections(&sections, &objects);
    assert_eq!(reserves(&output), vec![(0x0, 0x80)]);
}

#[test]
fn object_ending_with_the_section_leaves_head_reserve() {
    let sections = vec![section("MCU", ".text", 0x0, 0x100)];
    let objects = vec![object("MCU", ".text", "a.o", 0x80, 0x80)];
    let output = project_objects_in_sections(&sections, &objects);
    assert_eq!(reserves(&output), vec![(0x0, 0x80)]);
}

#[test]
fn fully_covered_section_has_no_reserve() {
    let sections = vec![section("MCU", ".text", 0x10, 0x10)];
    let objects = vec![object("MCU", ".text", "big.o", 0x0, 0x100)];
    let output = project_objects_in_sections(&sections, &objects);
    assert!(reserves(&output).is_empty());
    assert_eq!(count(&output, EntryKind::SectionMarker), 1);
    assert_eq!(count(&output, EntryKind::Object), 1);
}

#[test]
fn several_objects_fill_gaps_in_order() {
    let sections = vec![section("MCU", ".text", 0x0, 0x100)];
    let objects = sorted(vec![
        object("MCU", ".text", "a.o", 0x00, 0x20),
        object("MCU", ".text", "b.o", 0x40, 0x20),
        object("MCU", ".text", "far.o", 0x200, 0x20),
    ]);
    let output = project_objects_in_sections(&sections, &objects);
    assert_eq!(reserves(&output), vec![(0x20, 0x20), (0x60, 0xA0)]);
    assert_eq!(count(&output, EntryKind::Object), 3);
}

#[test]
fn contained_and_empty_sections_only_emit_markers() {
    let mut contained = section("MCU", ".inner", 0x10, 0x10);
    contained.containment = Some("app.map: .outer".to_string());
    let collapsed = section("MCU", ".dup", 0x100, 0);
    let sections = sorted(vec![contained, collapsed]);

    let output = project_objects_in_sections(&sections, &[]);
    assert_eq!(output.len(), 2);
    assert_eq!(count(&output, EntryKind::SectionMarker), 2);
}

#[test]
fn objects_of_other_configurations_are_ignored() {
    let sections = vec![section("MCU", ".text", 0x0, 0x100)];
    let objects = vec![object("DSP", ".text", "a.o", 0x0, 0x100)];
    let output = project_objects_in_sections(&sections, &objects);
    assert_eq!(reserves(&output), vec![(0x0, 0x100)]);
}

#[test]
fn output_is_ordered_and_inputs_untouched() {
    let sections = sorted(vec![
        section("MCU", ".text", 0x0, 0x100),
        section("MCU", ".data", 0x200, 0x40),
    ]);
    let objects = sorted(vec![
        object("MCU", ".text", "a.o", 0x10, 0x10),
        object("MCU", ".data", "b.o", 0x200, 0x20),
    ]);
    let output = project_objects_in_sections(&sections, &objects);

    assert!(output
        .windows(2)
        .all(|pair| pair[0].address_start <= pair[1].address_start));
    assert_eq!(sections[0].address_length, 0x100);
    assert_eq!(sections[0].kind, EntryKind::Section);
    assert_eq!(objects[1].address_start, 0x200);
    assert_eq!(reserves(&output), vec![(0x0, 0x10), (0x20, 0xE0), (0x220, 0x20)]);
}
