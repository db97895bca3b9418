use std::fmt;
use std::str::FromStr;

use log::Level;
use serde::Deserialize;

/// Namespaced identifier, written `namespace:path`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub struct ResourceId {
    namespace: String,
    path: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdError {
    MissingSeparator(String),
    InvalidNamespace(String),
    InvalidPath(String),
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdError::MissingSeparator(s) => write!(f, "expected namespace:path, got {:?}", s),
            IdError::InvalidNamespace(s) => write!(f, "invalid namespace {:?}", s),
            IdError::InvalidPath(s) => write!(f, "invalid path {:?}", s),
        }
    }
}

impl std::error::Error for IdError {}

fn valid_namespace(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'_' | b'.' | b'-'))
}

fn valid_path(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'_' | b'.' | b'-' | b'/'))
}

impl ResourceId {
    pub fn new(namespace: &str, path: &str) -> Result<Self, IdError> {
        if !valid_namespace(namespace) {
            return Err(IdError::InvalidNamespace(namespace.to_owned()));
        }
        if !valid_path(path) {
            return Err(IdError::InvalidPath(path.to_owned()));
        }
        Ok(Self {
            namespace: namespace.to_owned(),
            path: path.to_owned(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The name part of the id, e.g. `oak_lamp` for `deco:oak_lamp`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// `prefix.namespace.path`, with path separators turned into dots.
    pub fn translation_key(&self, prefix: &str) -> String {
        format!("{}.{}.{}", prefix, self.namespace, self.path.replace('/', "."))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for ResourceId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, path) = s
            .split_once(':')
            .ok_or_else(|| IdError::MissingSeparator(s.to_owned()))?;
        ResourceId::new(namespace, path)
    }
}

impl TryFrom<String> for ResourceId {
    type Error = IdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Per-mod handle: builds ids in the mod's namespace and logs under the mod
/// id as the log target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModContext {
    mod_id: String,
}

impl ModContext {
    pub fn new(mod_id: &str) -> Result<Self, IdError> {
        if !valid_namespace(mod_id) {
            return Err(IdError::InvalidNamespace(mod_id.to_owned()));
        }
        Ok(Self {
            mod_id: mod_id.to_owned(),
        })
    }

    pub fn mod_id(&self) -> &str {
        &self.mod_id
    }

    pub fn id(&self, path: &str) -> Result<ResourceId, IdError> {
        ResourceId::new(&self.mod_id, path)
    }

    /// Resolve `name` as a full `namespace:path` id, or as a path in this
    /// mod's namespace when it has no separator.
    pub fn resolve(&self, name: &str) -> Result<ResourceId, IdError> {
        if name.contains(':') {
            name.parse()
        } else {
            self.id(name)
        }
    }

    pub fn log(&self, level: Level, message: &str) {
        log::log!(target: self.mod_id.as_str(), level, "{}", message);
    }
}

/// Single-letter level codes: `d` debug, `w` warn, `e` error, anything else info.
pub fn level_from_code(code: char) -> Level {
    match code {
        'd' => Level::Debug,
        'w' => Level::Warn,
        'e' => Level::Error,
        _ => Level::Info,
    }
}
