use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use blockforge_geom::Direction;
use blockforge_shapes::{Shape, ShapeLibrary, rotate_shape};
use log::Level;

use crate::config::ContentConfig;
use crate::id::{IdError, ModContext, ResourceId};
use crate::names::display_name;

#[derive(Debug, Clone, PartialEq)]
pub enum RegistryError {
    Duplicate(ResourceId),
    UnknownIcon(ResourceId),
    UnknownTabItem(ResourceId),
    InvalidColumn(i32),
    UnknownShape(String),
    InvalidId(IdError),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Duplicate(id) => write!(f, "duplicate id {}", id),
            RegistryError::UnknownIcon(id) => write!(f, "tab icon {} is not a registered item", id),
            RegistryError::UnknownTabItem(id) => {
                write!(f, "tab entry {} is not a registered item", id)
            }
            RegistryError::InvalidColumn(column) => write!(f, "tab column {} out of range", column),
            RegistryError::UnknownShape(name) => write!(f, "unknown shape '{}'", name),
            RegistryError::InvalidId(e) => write!(f, "{}", e),
        }
    }
}

impl Error for RegistryError {}

impl From<IdError> for RegistryError {
    fn from(e: IdError) -> Self {
        RegistryError::InvalidId(e)
    }
}

/// Insertion-ordered registry with id lookup. Indices are stable.
#[derive(Clone, Debug)]
pub struct Registry<T> {
    entries: Vec<(ResourceId, T)>,
    by_id: HashMap<ResourceId, usize>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            by_id: HashMap::new(),
        }
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: ResourceId, value: T) -> Result<usize, RegistryError> {
        if self.by_id.contains_key(&id) {
            return Err(RegistryError::Duplicate(id));
        }
        let index = self.entries.len();
        self.by_id.insert(id.clone(), index);
        self.entries.push((id, value));
        Ok(index)
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index).map(|(_, v)| v)
    }

    pub fn get_by_id(&self, id: &ResourceId) -> Option<&T> {
        self.index_of(id).and_then(|i| self.get(i))
    }

    pub fn index_of(&self, id: &ResourceId) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn id_of(&self, index: usize) -> Option<&ResourceId> {
        self.entries.get(index).map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceId, &T)> {
        self.entries.iter().map(|(id, v)| (id, v))
    }

    /// Entries in `namespace`, sorted by id.
    pub fn entries_for_mod(&self, namespace: &str) -> Vec<(&ResourceId, &T)> {
        let mut out: Vec<(&ResourceId, &T)> = self
            .iter()
            .filter(|(id, _)| id.namespace() == namespace)
            .collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }
}

#[derive(Clone, Debug)]
pub struct BlockSettings {
    pub hardness: f32,
    pub resistance: f32,
    pub shape: Arc<Shape>,
    // Shape is authored facing down and rotated per facing
    pub directional: bool,
}

impl Default for BlockSettings {
    fn default() -> Self {
        Self {
            hardness: 1.0,
            resistance: 1.0,
            shape: Arc::new(Shape::full()),
            directional: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: ResourceId,
    pub settings: BlockSettings,
}

impl BlockType {
    /// Occupied volume when placed facing `facing`.
    pub fn shape_for(&self, facing: Direction) -> Arc<Shape> {
        if self.settings.directional {
            rotate_shape(&self.settings.shape, facing)
        } else {
            Arc::clone(&self.settings.shape)
        }
    }

    pub fn display_name(&self) -> String {
        display_name(&self.id.translation_key("block"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemSettings {
    pub max_stack: u8,
}

impl Default for ItemSettings {
    fn default() -> Self {
        Self { max_stack: 64 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    Plain,
    /// Places the block at this index of the block registry.
    Block(usize),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ItemType {
    pub id: ResourceId,
    pub kind: ItemKind,
    pub settings: ItemSettings,
}

impl ItemType {
    pub fn display_name(&self) -> String {
        let prefix = match self.kind {
            ItemKind::Plain => "item",
            ItemKind::Block(_) => "block",
        };
        display_name(&self.id.translation_key(prefix))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TabRow {
    Top,
    Bottom,
}

impl TabRow {
    /// Row for a tab in `column`: top when floor(5 / column) is odd. Done in
    /// f64, so column 0 divides to infinity and lands on the top row.
    pub fn for_column(column: i32) -> TabRow {
        if (5.0 / f64::from(column)).floor() % 2.0 != 0.0 {
            TabRow::Top
        } else {
            TabRow::Bottom
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CreativeTab {
    pub title_key: String,
    pub icon: ResourceId,
    pub row: TabRow,
    pub slot: i32,
    /// Items listed on the tab, in display order.
    pub items: Vec<ResourceId>,
}

/// Blocks, items and creative tabs of one or more mods.
#[derive(Default, Clone, Debug)]
pub struct ContentRegistry {
    pub blocks: Registry<BlockType>,
    pub items: Registry<ItemType>,
    pub tabs: Registry<CreativeTab>,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block plus a block item with default settings.
    pub fn register_block(
        &mut self,
        id: ResourceId,
        settings: BlockSettings,
    ) -> Result<usize, RegistryError> {
        self.register_block_inner(id, settings, Some(ItemSettings::default()))
    }

    pub fn register_block_with_item(
        &mut self,
        id: ResourceId,
        settings: BlockSettings,
        item: ItemSettings,
    ) -> Result<usize, RegistryError> {
        self.register_block_inner(id, settings, Some(item))
    }

    pub fn register_block_without_item(
        &mut self,
        id: ResourceId,
        settings: BlockSettings,
    ) -> Result<usize, RegistryError> {
        self.register_block_inner(id, settings, None)
    }

    fn register_block_inner(
        &mut self,
        id: ResourceId,
        settings: BlockSettings,
        item: Option<ItemSettings>,
    ) -> Result<usize, RegistryError> {
        // Check the item slot first so a failure leaves both registries untouched.
        if item.is_some() && self.items.index_of(&id).is_some() {
            return Err(RegistryError::Duplicate(id));
        }
        let block = self.blocks.register(
            id.clone(),
            BlockType {
                id: id.clone(),
                settings,
            },
        )?;
        if let Some(settings) = item {
            self.items.register(
                id.clone(),
                ItemType {
                    id,
                    kind: ItemKind::Block(block),
                    settings,
                },
            )?;
        }
        Ok(block)
    }

    pub fn register_item(
        &mut self,
        id: ResourceId,
        settings: ItemSettings,
    ) -> Result<usize, RegistryError> {
        self.items.register(
            id.clone(),
            ItemType {
                id,
                kind: ItemKind::Plain,
                settings,
            },
        )
    }

    /// Tab titled `creativeTab.<namespace>.<path>` at slot `6 + column`,
    /// listing `items`. The icon and every listed item must already be
    /// registered items.
    pub fn register_tab(
        &mut self,
        id: ResourceId,
        icon: ResourceId,
        column: i32,
        items: Vec<ResourceId>,
    ) -> Result<usize, RegistryError> {
        if self.items.index_of(&icon).is_none() {
            return Err(RegistryError::UnknownIcon(icon));
        }
        if let Some(missing) = items.iter().find(|i| self.items.index_of(i).is_none()) {
            return Err(RegistryError::UnknownTabItem(missing.clone()));
        }
        let slot = column
            .checked_add(6)
            .ok_or(RegistryError::InvalidColumn(column))?;
        let tab = CreativeTab {
            title_key: id.translation_key("creativeTab"),
            icon,
            row: TabRow::for_column(column),
            slot,
            items,
        };
        self.tabs.register(id, tab)
    }

    /// Block items of `namespace` with the block each places, ordered by item id.
    pub fn block_items_for_mod(&self, namespace: &str) -> Vec<(&BlockType, &ItemType)> {
        self.items
            .entries_for_mod(namespace)
            .into_iter()
            .filter_map(|(_, item)| match item.kind {
                ItemKind::Block(b) => self.blocks.get(b).map(|block| (block, item)),
                ItemKind::Plain => None,
            })
            .collect()
    }

    pub fn block_name(&self, index: usize) -> Option<&str> {
        self.blocks.id_of(index).map(ResourceId::path)
    }

    pub fn item_name(&self, index: usize) -> Option<&str> {
        self.items.id_of(index).map(ResourceId::path)
    }

    pub fn load_from_paths(
        shapes_path: impl AsRef<Path>,
        content_path: impl AsRef<Path>,
    ) -> Result<Self, Box<dyn Error>> {
        let shapes = ShapeLibrary::from_path(shapes_path)?;
        let content_toml = fs::read_to_string(content_path)?;
        let cfg: ContentConfig = toml::from_str(&content_toml)?;
        Self::from_configs(&shapes, cfg)
    }

    pub fn from_configs(shapes: &ShapeLibrary, cfg: ContentConfig) -> Result<Self, Box<dyn Error>> {
        let ctx = ModContext::new(&cfg.namespace)?;
        let mut reg = ContentRegistry::new();
        for def in cfg.blocks {
            let id = ctx.resolve(&def.name)?;
            let shape = match def.shape.as_deref() {
                Some(name) => shapes
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RegistryError::UnknownShape(name.to_owned()))?,
                None => Arc::new(Shape::full()),
            };
            let settings = BlockSettings {
                hardness: def.hardness.unwrap_or(1.0),
                resistance: def.resistance.unwrap_or(def.hardness.unwrap_or(1.0)),
                shape,
                directional: def.directional.unwrap_or(false),
            };
            let item = ItemSettings {
                max_stack: def.max_stack.unwrap_or(64),
            };
            if def.item.unwrap_or(true) {
                reg.register_block_with_item(id, settings, item)?;
            } else {
                reg.register_block_without_item(id, settings)?;
            }
        }
        for def in cfg.items {
            let id = ctx.resolve(&def.name)?;
            let settings = ItemSettings {
                max_stack: def.max_stack.unwrap_or(64),
            };
            reg.register_item(id, settings)?;
        }
        for def in cfg.tabs {
            let id = ctx.resolve(&def.name)?;
            let icon = ctx.resolve(&def.icon)?;
            let items = def
                .items
                .iter()
                .map(|name| ctx.resolve(name))
                .collect::<Result<Vec<_>, _>>()?;
            reg.register_tab(id, icon, def.column.unwrap_or(0), items)?;
        }
        ctx.log(
            Level::Info,
            &format!(
                "registered {} block(s), {} item(s), {} tab(s)",
                reg.blocks.len(),
                reg.items.len(),
                reg.tabs.len()
            ),
        );
        Ok(reg)
    }
}
