use std::sync::Arc;

use blockforge_geom::Direction;
use blockforge_registry::config::ContentConfig;
use blockforge_registry::registry::{BlockSettings, ItemKind, ItemSettings, TabRow};
use blockforge_registry::{
    ContentRegistry, IdError, ModContext, Registry, RegistryError, ResourceId,
};
use blockforge_shapes::{Shape, ShapeLibrary, rotated};

fn id(s: &str) -> ResourceId {
    s.parse().unwrap()
}

#[test]
fn resource_id_parsing() {
    let lamp = id("gizmo:lamps/oak_lamp");
    assert_eq!(lamp.namespace(), "gizmo");
    assert_eq!(lamp.path(), "lamps/oak_lamp");
    assert_eq!(lamp.to_string(), "gizmo:lamps/oak_lamp");
    assert_eq!(lamp.translation_key("block"), "block.gizmo.lamps.oak_lamp");
    assert_eq!(
        "lamp".parse::<ResourceId>(),
        Err(IdError::MissingSeparator("lamp".into()))
    );
    assert_eq!(
        "Gizmo:lamp".parse::<ResourceId>(),
        Err(IdError::InvalidNamespace("Gizmo".into()))
    );
    assert_eq!(
        "gizmo:oak lamp".parse::<ResourceId>(),
        Err(IdError::InvalidPath("oak lamp".into()))
    );
    assert!(ModContext::new("").is_err());
}

#[test]
fn registry_rejects_duplicates_and_keeps_order() {
    let mut reg: Registry<u32> = Registry::new();
    assert_eq!(reg.register(id("b:two"), 2), Ok(0));
    assert_eq!(reg.register(id("a:one"), 1), Ok(1));
    assert_eq!(
        reg.register(id("b:two"), 3),
        Err(RegistryError::Duplicate(id("b:two")))
    );
    assert_eq!(reg.len(), 2);
    assert_eq!(reg.get_by_id(&id("a:one")), Some(&1));
    assert_eq!(reg.id_of(0), Some(&id("b:two")));
    assert_eq!(reg.index_of(&id("c:none")), None);
}

#[test]
fn entries_for_mod_are_filtered_and_sorted() {
    let mut reg: Registry<&str> = Registry::new();
    for name in ["gizmo:zeta", "other:alpha", "gizmo:alpha", "gizmo:mid"] {
        reg.register(id(name), name).unwrap();
    }
    let paths: Vec<&str> = reg
        .entries_for_mod("gizmo")
        .into_iter()
        .map(|(id, _)| id.path())
        .collect();
    assert_eq!(paths, vec!["alpha", "mid", "zeta"]);
    assert!(reg.entries_for_mod("none").is_empty());
}

#[test]
fn blocks_register_items_unless_asked_not_to() {
    let ctx = ModContext::new("gizmo").unwrap();
    let mut reg = ContentRegistry::new();
    let lamp = reg
        .register_block(ctx.id("lamp").unwrap(), BlockSettings::default())
        .unwrap();
    reg.register_block_without_item(ctx.id("fire").unwrap(), BlockSettings::default())
        .unwrap();
    reg.register_block_with_item(
        ctx.id("crate").unwrap(),
        BlockSettings::default(),
        ItemSettings { max_stack: 16 },
    )
    .unwrap();
    reg.register_item(ctx.id("wrench").unwrap(), ItemSettings { max_stack: 1 })
        .unwrap();

    assert_eq!(reg.blocks.len(), 3);
    assert_eq!(reg.items.len(), 3);
    assert_eq!(reg.block_name(lamp), Some("lamp"));
    assert_eq!(reg.item_name(2), Some("wrench"));
    let lamp_item = reg.items.get_by_id(&id("gizmo:lamp")).unwrap();
    assert_eq!(lamp_item.kind, ItemKind::Block(lamp));
    assert_eq!(lamp_item.settings.max_stack, 64);
    assert!(reg.items.get_by_id(&id("gizmo:fire")).is_none());

    let pairs: Vec<(&str, u8)> = reg
        .block_items_for_mod("gizmo")
        .into_iter()
        .map(|(block, item)| (block.id.path(), item.settings.max_stack))
        .collect();
    assert_eq!(pairs, vec![("crate", 16), ("lamp", 64)]);
}

#[test]
fn failed_block_registration_leaves_no_half_entry() {
    let mut reg = ContentRegistry::new();
    reg.register_item(id("gizmo:lamp"), ItemSettings::default())
        .unwrap();
    let err = reg
        .register_block(id("gizmo:lamp"), BlockSettings::default())
        .unwrap_err();
    assert_eq!(err, RegistryError::Duplicate(id("gizmo:lamp")));
    assert!(reg.blocks.is_empty());
}

#[test]
fn tab_rows_follow_column_rule() {
    assert_eq!(TabRow::for_column(0), TabRow::Top);
    assert_eq!(TabRow::for_column(1), TabRow::Top);
    assert_eq!(TabRow::for_column(2), TabRow::Bottom);
    assert_eq!(TabRow::for_column(3), TabRow::Top);
    assert_eq!(TabRow::for_column(5), TabRow::Top);
    assert_eq!(TabRow::for_column(6), TabRow::Bottom);
}

#[test]
fn tabs_need_a_registered_icon() {
    let mut reg = ContentRegistry::new();
    assert_eq!(
        reg.register_tab(id("gizmo:main"), id("gizmo:lamp"), 1, Vec::new()),
        Err(RegistryError::UnknownIcon(id("gizmo:lamp")))
    );
    reg.register_block(id("gizmo:lamp"), BlockSettings::default())
        .unwrap();
    let tab = reg
        .register_tab(id("gizmo:main"), id("gizmo:lamp"), 2, vec![id("gizmo:lamp")])
        .unwrap();
    let tab = reg.tabs.get(tab).unwrap();
    assert_eq!(tab.title_key, "creativeTab.gizmo.main");
    assert_eq!(tab.slot, 8);
    assert_eq!(tab.row, TabRow::Bottom);
    assert_eq!(tab.items, vec![id("gizmo:lamp")]);
}

#[test]
fn tab_items_must_be_registered() {
    let mut reg = ContentRegistry::new();
    reg.register_block(id("gizmo:lamp"), BlockSettings::default())
        .unwrap();
    reg.register_block_without_item(id("gizmo:fire"), BlockSettings::default())
        .unwrap();
    assert_eq!(
        reg.register_tab(
            id("gizmo:main"),
            id("gizmo:lamp"),
            1,
            vec![id("gizmo:lamp"), id("gizmo:fire")],
        ),
        Err(RegistryError::UnknownTabItem(id("gizmo:fire")))
    );
    assert!(reg.tabs.is_empty());
}

#[test]
fn tab_column_overflow_is_an_error() {
    let mut reg = ContentRegistry::new();
    reg.register_item(id("gizmo:wrench"), ItemSettings::default())
        .unwrap();
    assert_eq!(
        reg.register_tab(id("gizmo:main"), id("gizmo:wrench"), i32::MAX, Vec::new()),
        Err(RegistryError::InvalidColumn(i32::MAX))
    );
    let cfg: ContentConfig = toml::from_str(
        r#"
        namespace = "gizmo"
        [[items]]
        name = "wrench"
        [[tabs]]
        name = "main"
        icon = "wrench"
        column = 2147483647
    "#,
    )
    .unwrap();
    let err = ContentRegistry::from_configs(&ShapeLibrary::new(), cfg).unwrap_err();
    assert_eq!(err.to_string(), "tab column 2147483647 out of range");
}

#[test]
fn directional_blocks_rotate_their_shape() {
    let slab = Arc::new(Shape::from_pixels(0.0, 0.0, 0.0, 16.0, 8.0, 16.0));
    let mut reg = ContentRegistry::new();
    let wall = reg
        .register_block(
            id("gizmo:wall_slab"),
            BlockSettings {
                shape: Arc::clone(&slab),
                directional: true,
                ..BlockSettings::default()
            },
        )
        .unwrap();
    let flat = reg
        .register_block(
            id("gizmo:flat_slab"),
            BlockSettings {
                shape: Arc::clone(&slab),
                ..BlockSettings::default()
            },
        )
        .unwrap();
    let wall = reg.blocks.get(wall).unwrap();
    let flat = reg.blocks.get(flat).unwrap();
    assert_eq!(*wall.shape_for(Direction::East), rotated(&slab, Direction::East));
    assert!(Arc::ptr_eq(&wall.shape_for(Direction::East), &wall.shape_for(Direction::East)));
    assert!(Arc::ptr_eq(&flat.shape_for(Direction::East), &slab));
    assert_eq!(wall.display_name(), "Wall Slab");
}

const SHAPES: &str = r#"
    [shapes.lamp]
    boxes = [[5, 0, 5, 11, 10, 11]]
"#;

const CONTENT: &str = r#"
    namespace = "gizmo"

    [[blocks]]
    name = "gizmo_lamp_block"
    shape = "lamp"
    directional = true
    hardness = 0.5

    [[blocks]]
    name = "glow_air"
    item = false

    [[items]]
    name = "wrench"
    max_stack = 1

    [[tabs]]
    name = "main"
    icon = "gizmo_lamp_block"
    column = 0
    items = ["gizmo_lamp_block", "gizmo:wrench"]
"#;

#[test]
fn loads_content_from_toml() {
    let shapes = ShapeLibrary::from_toml_str(SHAPES).unwrap();
    let cfg: ContentConfig = toml::from_str(CONTENT).unwrap();
    let reg = ContentRegistry::from_configs(&shapes, cfg).unwrap();

    assert_eq!(reg.blocks.len(), 2);
    assert_eq!(reg.items.len(), 2);
    let lamp = reg.blocks.get_by_id(&id("gizmo:gizmo_lamp_block")).unwrap();
    assert_eq!(lamp.display_name(), "GIZMO Lamp");
    assert_eq!(lamp.settings.resistance, 0.5);
    assert!(Arc::ptr_eq(&lamp.settings.shape, shapes.get("lamp").unwrap()));
    let wrench = reg.items.get_by_id(&id("gizmo:wrench")).unwrap();
    assert_eq!(wrench.display_name(), "Wrench");
    let tab = reg.tabs.get(0).unwrap();
    assert_eq!(tab.row, TabRow::Top);
    assert_eq!(tab.slot, 6);
    assert_eq!(tab.icon, id("gizmo:gizmo_lamp_block"));
    assert_eq!(
        tab.items,
        vec![id("gizmo:gizmo_lamp_block"), id("gizmo:wrench")]
    );
}

#[test]
fn unknown_shape_is_reported() {
    let shapes = ShapeLibrary::new();
    let cfg: ContentConfig = toml::from_str(
        r#"
        namespace = "gizmo"
        [[blocks]]
        name = "lamp"
        shape = "missing"
    "#,
    )
    .unwrap();
    let err = ContentRegistry::from_configs(&shapes, cfg).unwrap_err();
    assert_eq!(err.to_string(), "unknown shape 'missing'");
}
