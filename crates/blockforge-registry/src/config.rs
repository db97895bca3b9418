use serde::Deserialize;

// Top-level content file for one mod namespace
#[derive(Deserialize, Debug)]
pub struct ContentConfig {
    pub namespace: String,
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
    #[serde(default)]
    pub items: Vec<ItemDef>,
    #[serde(default)]
    pub tabs: Vec<TabDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    // Path in the namespace, or a full namespace:path id
    pub name: String,
    #[serde(default)]
    pub hardness: Option<f32>,
    // Defaults to hardness
    #[serde(default)]
    pub resistance: Option<f32>,
    // Name of a shape in the shapes file; full cube when absent
    #[serde(default)]
    pub shape: Option<String>,
    #[serde(default)]
    pub directional: Option<bool>,
    // Register a block item alongside (default true)
    #[serde(default)]
    pub item: Option<bool>,
    #[serde(default)]
    pub max_stack: Option<u8>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ItemDef {
    pub name: String,
    #[serde(default)]
    pub max_stack: Option<u8>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TabDef {
    pub name: String,
    pub icon: String,
    #[serde(default)]
    pub column: Option<i32>,
    // Listed items, same naming rules as the icon
    #[serde(default)]
    pub items: Vec<String>,
}
