use super::*;
use crate::address_space::RawAddressSpace;

#[test]
fn classifies_into_containing_region() {
    let space = mcu_configuration().address_space;
    assert_eq!(space.classify(0x10), Some(("FLASH", "INT_FLASH")));
    assert_eq!(space.classify(0x1_0000), Some(("RAM", "INT_RAM")));
    assert_eq!(space.classify(0xFFFF), Some(("FLASH", "INT_FLASH")));
    assert_eq!(space.classify(0x2_0000), None);
}

#[test]
fn last_defined_overlapping_region_wins() {
    let space = AddressSpace::new(
        vec![
            region("SMALL", 0x100, 0x1FF, "A"),
            region("WIDE", 0x000, 0xFFF, "B"),
        ],
        0,
    )
    .expect("address space");
    assert_eq!(space.classify(0x150), Some(("WIDE", "B")));
    assert_eq!(space.overlapping_regions().len(), 1);

    let reversed = AddressSpace::new(
        vec![
            region("WIDE", 0x000, 0xFFF, "B"),
            region("SMALL", 0x100, 0x1FF, "A"),
        ],
        0,
    )
    .expect("address space");
    assert_eq!(reversed.classify(0x150), Some(("SMALL", "A")));
}

#[test]
fn classification_is_repeatable() {
    let space = mcu_configuration().address_space;
    assert_eq!(space.classify(0x1_2345), space.classify(0x1_2345));
}

#[test]
fn rejects_inverted_region() {
    let err = AddressSpace::new(vec![region("BAD", 0x200, 0x100, "X")], 0)
        .expect_err("inverted region should fail");
    assert!(err.to_string().contains("BAD"));
}

#[test]
fn rejects_duplicate_region_names() {
    let result = AddressSpace::new(
        vec![region("RAM", 0, 0xF, "X"), region("RAM", 0x10, 0x1F, "X")],
        0,
    );
    assert!(result.is_err());
}

#[test]
fn raw_space_drops_ignored_regions_and_parses_offset() {
    let raw: RawAddressSpace = serde_json::from_str(
        r#"{
            "regions": [
                {"name": "FLASH", "start": "0x0", "end": "0xFFFF", "type": "INT_FLASH"},
                {"name": "BOOTROM", "start": 0, "end": 4095, "type": "ROM"}
            ],
            "ignore": ["BOOTROM"],
            "offset": "-0x10"
        }"#,
    )
    .expect("raw address space");
    let space = AddressSpace::from_raw(&raw).expect("address space");
    assert_eq!(space.regions().len(), 1);
    assert_eq!(space.offset(), -0x10);
    assert_eq!(space.apply_offset(0x20).expect("offset"), 0x10);
    assert!(space.apply_offset(0x8).is_err());
}

#[test]
fn raw_space_rejects_malformed_address() {
    let raw: RawAddressSpace = serde_json::from_str(
        r#"{"regions": [{"name": "FLASH", "start": "0xZZ", "end": "0xFF", "type": "F"}]}"#,
    )
    .expect("raw address space");
    assert!(AddressSpace::from_raw(&raw).is_err());
}

#[test]
fn ignoring_an_undefined_region_only_warns() {
    let raw: RawAddressSpace = serde_json::from_str(
        r#"{
            "regions": [
                {"name": "FLASH", "start": "0x0", "end": "0xFFFF", "type": "INT_FLASH"},
                {"name": "RAM", "start": "0x10000", "end": "0x1FFFF", "type": "INT_RAM"}
            ],
            "ignore": ["NOPE"]
        }"#,
    )
    .expect("raw address space");
    let space = AddressSpace::from_raw(&raw).expect("address space");
    let names: Vec<&str> = space.regions().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["FLASH", "RAM"]);
    assert_eq!(space.offset(), 0);
}
