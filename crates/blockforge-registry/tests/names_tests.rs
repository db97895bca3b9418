use blockforge_registry::{display_name, display_name_with};

#[test]
fn namespace_word_is_upper_cased() {
    assert_eq!(display_name("block.gizmo.gizmo_lamp_block"), "GIZMO Lamp");
    assert_eq!(display_name("block.gizmo.small_gizmo"), "Small GIZMO");
}

#[test]
fn small_words_stay_lower_case() {
    assert_eq!(display_name("item.gizmo.heart_of_the_sea"), "Heart of the Sea");
    assert_eq!(display_name("item.gizmo.the_end"), "The End");
}

#[test]
fn block_suffix_handling() {
    assert_eq!(display_name("block.gizmo.copper_block"), "Copper");
    assert_eq!(display_name("block.gizmo.stone_blocks"), "Stone Blocks");
    assert_eq!(display_name_with("block.gizmo.copper_block", false), "Copper Block");
}

#[test]
fn dashes_and_case_are_normalized() {
    assert_eq!(display_name("block.gizmo.GLOW-stone_block"), "Glow Stone");
}

#[test]
fn ids_without_dots() {
    assert_eq!(display_name("lamp_block"), "Lamp");
    assert_eq!(display_name("gizmo.gizmo_lamp"), "GIZMO Lamp");
}
