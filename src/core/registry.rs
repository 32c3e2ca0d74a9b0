//! `KeyStore` over the current user's registry hive.

use crate::core::error::KoyukiError;
use crate::core::hive::KeyStore;
use crate::core::paths::KeyPath;
use winreg::RegKey;
use winreg::enums::{HKEY_CURRENT_USER, KEY_ALL_ACCESS};

/// Open registry handle together with the path it was opened at.
pub struct RegistryKey {
    path: KeyPath,
    key: RegKey,
}

pub struct RegistryHive {
    root: RegKey,
}

impl RegistryHive {
    pub fn current_user() -> Self {
        Self {
            root: RegKey::predef(HKEY_CURRENT_USER),
        }
    }
}

impl KeyStore for RegistryHive {
    type Key = RegistryKey;

    fn open_key(&self, path: &KeyPath) -> Result<RegistryKey, KoyukiError> {
        let key = self
            .root
            .open_subkey_with_flags(path.as_str(), KEY_ALL_ACCESS)
            .map_err(|source| KoyukiError::KeyOpen {
                path: path.to_string(),
                source,
            })?;
        Ok(RegistryKey {
            path: path.clone(),
            key,
        })
    }

    fn create_key(&mut self, path: &KeyPath) -> Result<RegistryKey, KoyukiError> {
        let (key, _disposition) = self
            .root
            .create_subkey_with_flags(path.as_str(), KEY_ALL_ACCESS)
            .map_err(|source| KoyukiError::KeyCreate {
                path: path.to_string(),
                source,
            })?;
        Ok(RegistryKey {
            path: path.clone(),
            key,
        })
    }

    fn child_key_names(&self, key: &RegistryKey) -> Result<Vec<String>, KoyukiError> {
        key.key
            .enum_keys()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| KoyukiError::Enumerate {
                path: key.path.to_string(),
                source,
            })
    }

    fn set_default_value(&mut self, key: &RegistryKey, value: &str) -> Result<(), KoyukiError> {
        key.key
            .set_value("", &value.to_string())
            .map_err(|source| KoyukiError::SetValue {
                path: key.path.to_string(),
                source,
            })
    }
}
