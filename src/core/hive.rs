//! Store abstraction for the per-user hierarchical key store.
//!
//! Components talk to the store only through [`KeyStore`], so the same
//! registrar and propagator code runs against the OS registry, a TOML hive
//! file, or an in-memory tree in tests.
//!
//! Key names compare ASCII case-insensitively and keep the case they were
//! created with, matching the OS store.

use crate::core::error::KoyukiError;
use crate::core::paths::KeyPath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Capability interface over a hierarchical key store.
///
/// Handles returned by `open_key`/`create_key` are scoped to the caller and
/// released when dropped.
pub trait KeyStore {
    type Key;

    /// Open an existing key. Fails with `KeyOpen` when the path is missing.
    fn open_key(&self, path: &KeyPath) -> Result<Self::Key, KoyukiError>;

    /// Open a key, creating it and any missing parents.
    fn create_key(&mut self, path: &KeyPath) -> Result<Self::Key, KoyukiError>;

    /// Names of the direct children of `key`, in store order.
    fn child_key_names(&self, key: &Self::Key) -> Result<Vec<String>, KoyukiError>;

    /// Set the unnamed (default) string value of `key`.
    fn set_default_value(&mut self, key: &Self::Key, value: &str) -> Result<(), KoyukiError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiveNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub keys: BTreeMap<String, HiveNode>,
}

impl HiveNode {
    fn stored_name(&self, name: &str) -> Option<&String> {
        self.keys.keys().find(|k| k.eq_ignore_ascii_case(name))
    }

    pub fn child(&self, name: &str) -> Option<&HiveNode> {
        self.stored_name(name).and_then(|k| self.keys.get(k))
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut HiveNode> {
        let stored = self.stored_name(name)?.clone();
        self.keys.get_mut(&stored)
    }

    fn child_or_insert(&mut self, name: &str) -> &mut HiveNode {
        let stored = self
            .stored_name(name)
            .cloned()
            .unwrap_or_else(|| name.to_string());
        self.keys.entry(stored).or_default()
    }
}

/// In-memory store, also the backing tree of [`FileHive`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryHive {
    root: HiveNode,
}

impl MemoryHive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_root(root: HiveNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &HiveNode {
        &self.root
    }

    pub fn node(&self, path: &KeyPath) -> Option<&HiveNode> {
        path.segments()
            .try_fold(&self.root, |node, segment| node.child(segment))
    }

    fn node_mut(&mut self, path: &KeyPath) -> Option<&mut HiveNode> {
        path.segments()
            .try_fold(&mut self.root, |node, segment| node.child_mut(segment))
    }

    pub fn contains_key(&self, path: &KeyPath) -> bool {
        self.node(path).is_some()
    }

    pub fn default_value(&self, path: &KeyPath) -> Option<&str> {
        self.node(path).and_then(|n| n.default.as_deref())
    }

    /// Create `path` and its parents, returning the node.
    pub fn insert_key(&mut self, path: &KeyPath) -> &mut HiveNode {
        path.segments()
            .fold(&mut self.root, |node, segment| node.child_or_insert(segment))
    }

    /// Every key path in the tree, parents before children.
    pub fn key_paths(&self) -> Vec<KeyPath> {
        fn walk(node: &HiveNode, at: &KeyPath, out: &mut Vec<KeyPath>) {
            for (name, child) in &node.keys {
                let path = at.child(name);
                out.push(path.clone());
                walk(child, &path, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.root, &KeyPath::default(), &mut out);
        out
    }
}

fn missing_key() -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, "the system cannot find the key specified")
}

impl KeyStore for MemoryHive {
    type Key = KeyPath;

    fn open_key(&self, path: &KeyPath) -> Result<KeyPath, KoyukiError> {
        if self.contains_key(path) {
            Ok(path.clone())
        } else {
            Err(KoyukiError::KeyOpen {
                path: path.to_string(),
                source: missing_key(),
            })
        }
    }

    fn create_key(&mut self, path: &KeyPath) -> Result<KeyPath, KoyukiError> {
        self.insert_key(path);
        Ok(path.clone())
    }

    fn child_key_names(&self, key: &KeyPath) -> Result<Vec<String>, KoyukiError> {
        self.node(key)
            .map(|node| node.keys.keys().cloned().collect())
            .ok_or_else(|| KoyukiError::Enumerate {
                path: key.to_string(),
                source: missing_key(),
            })
    }

    fn set_default_value(&mut self, key: &KeyPath, value: &str) -> Result<(), KoyukiError> {
        let node = self.node_mut(key).ok_or_else(|| KoyukiError::SetValue {
            path: key.to_string(),
            source: missing_key(),
        })?;
        node.default = Some(value.to_string());
        Ok(())
    }
}

/// First key whose children include two names equal up to ASCII case.
fn case_clash(node: &HiveNode, at: &KeyPath) -> Option<KeyPath> {
    let names: Vec<&String> = node.keys.keys().collect();
    let clashes = names
        .iter()
        .enumerate()
        .any(|(i, a)| names[i + 1..].iter().any(|b| a.eq_ignore_ascii_case(b)));
    if clashes {
        return Some(at.clone());
    }
    node.keys
        .iter()
        .find_map(|(name, child)| case_clash(child, &at.child(name)))
}

/// A [`MemoryHive`] persisted as a TOML document.
///
/// Every mutation is written back before the call returns.
#[derive(Debug)]
pub struct FileHive {
    path: PathBuf,
    hive: MemoryHive,
}

impl FileHive {
    /// Load the hive at `path`; a missing file is an empty hive.
    pub fn open(path: &Path) -> Result<Self, KoyukiError> {
        let hive = if path.exists() {
            let content = fs::read_to_string(path)?;
            let root: HiveNode = toml::from_str(&content)
                .map_err(|e| KoyukiError::HiveFile(format!("{}: {}", path.display(), e)))?;
            if let Some(clash) = case_clash(&root, &KeyPath::default()) {
                return Err(KoyukiError::HiveFile(format!(
                    "{}: keys differing only by case under {}",
                    path.display(),
                    clash
                )));
            }
            MemoryHive::from_root(root)
        } else {
            MemoryHive::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            hive,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn hive(&self) -> &MemoryHive {
        &self.hive
    }

    fn flush(&self) -> io::Result<()> {
        let content = toml::to_string_pretty(self.hive.root()).map_err(io::Error::other)?;
        fs::write(&self.path, content)
    }
}

impl KeyStore for FileHive {
    type Key = KeyPath;

    fn open_key(&self, path: &KeyPath) -> Result<KeyPath, KoyukiError> {
        self.hive.open_key(path)
    }

    fn create_key(&mut self, path: &KeyPath) -> Result<KeyPath, KoyukiError> {
        let key = self.hive.create_key(path)?;
        self.flush().map_err(|source| KoyukiError::KeyCreate {
            path: path.to_string(),
            source,
        })?;
        Ok(key)
    }

    fn child_key_names(&self, key: &KeyPath) -> Result<Vec<String>, KoyukiError> {
        self.hive.child_key_names(key)
    }

    fn set_default_value(&mut self, key: &KeyPath, value: &str) -> Result<(), KoyukiError> {
        self.hive.set_default_value(key, value)?;
        self.flush().map_err(|source| KoyukiError::SetValue {
            path: key.to_string(),
            source,
        })
    }
}
