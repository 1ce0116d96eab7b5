//! NVS (non-volatile storage) adapter.
//!
//! Implements [`StoragePort`]: a namespaced typed key-value store. On the
//! device this is the ESP-IDF NVS partition (atomic per-key commits); the
//! simulation backend is a `HashMap`.

use crate::error::StorageError;
use crate::ports::StoragePort;

// ───────────────────────────────────────────────────────────────
// ESP-IDF backend
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod esp {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};
    use log::info;

    use super::{StorageError, StoragePort};

    /// StoragePort over the default NVS partition. Namespace handles are
    /// opened read-write on first touch and cached for the life of the
    /// process. Accessed only from the main task.
    pub struct NvsStorage {
        partition: EspDefaultNvsPartition,
        namespaces: RefCell<HashMap<String, EspNvs<NvsDefault>>>,
    }

    impl NvsStorage {
        pub fn new() -> Result<Self, StorageError> {
            let partition = EspDefaultNvsPartition::take().map_err(|_| StorageError::IoError)?;
            info!("nvs: partition ready");
            Ok(Self { partition, namespaces: RefCell::new(HashMap::new()) })
        }

        fn with_namespace<T>(
            &self,
            namespace: &str,
            f: impl FnOnce(&mut EspNvs<NvsDefault>) -> Result<T, StorageError>,
        ) -> Result<T, StorageError> {
            let mut map = self.namespaces.borrow_mut();
            if !map.contains_key(namespace) {
                let nvs = EspNvs::new(self.partition.clone(), namespace, true)
                    .map_err(|_| StorageError::IoError)?;
                map.insert(namespace.to_owned(), nvs);
            }
            let nvs = map.get_mut(namespace).ok_or(StorageError::IoError)?;
            f(nvs)
        }
    }

    impl StoragePort for NvsStorage {
        fn get_i32(&self, namespace: &str, key: &str) -> Result<i32, StorageError> {
            self.with_namespace(namespace, |nvs| {
                nvs.get_i32(key).map_err(|_| StorageError::IoError)?.ok_or(StorageError::NotFound)
            })
        }

        fn set_i32(&mut self, namespace: &str, key: &str, value: i32) -> Result<(), StorageError> {
            self.with_namespace(namespace, |nvs| {
                nvs.set_i32(key, value).map_err(|_| StorageError::IoError)
            })
        }

        fn get_str(&self, namespace: &str, key: &str) -> Result<String, StorageError> {
            self.with_namespace(namespace, |nvs| {
                let len = nvs
                    .str_len(key)
                    .map_err(|_| StorageError::IoError)?
                    .ok_or(StorageError::NotFound)?;
                let mut buf = vec![0u8; len];
                let s = nvs
                    .get_str(key, &mut buf)
                    .map_err(|_| StorageError::IoError)?
                    .ok_or(StorageError::NotFound)?;
                Ok(s.to_owned())
            })
        }

        fn set_str(&mut self, namespace: &str, key: &str, value: &str) -> Result<(), StorageError> {
            self.with_namespace(namespace, |nvs| {
                nvs.set_str(key, value).map_err(|_| StorageError::IoError)
            })
        }

        fn get_blob(&self, namespace: &str, key: &str) -> Result<Vec<u8>, StorageError> {
            self.with_namespace(namespace, |nvs| {
                let len = nvs
                    .blob_len(key)
                    .map_err(|_| StorageError::IoError)?
                    .ok_or(StorageError::NotFound)?;
                let mut buf = vec![0u8; len];
                let data = nvs
                    .get_blob(key, &mut buf)
                    .map_err(|_| StorageError::IoError)?
                    .ok_or(StorageError::NotFound)?;
                Ok(data.to_vec())
            })
        }

        fn set_blob(
            &mut self,
            namespace: &str,
            key: &str,
            value: &[u8],
        ) -> Result<(), StorageError> {
            self.with_namespace(namespace, |nvs| {
                nvs.set_blob(key, value).map_err(|_| StorageError::IoError)
            })
        }

        fn exists(&self, namespace: &str, key: &str) -> bool {
            self.with_namespace(namespace, |nvs| {
                nvs.contains(key).map_err(|_| StorageError::IoError)
            })
            .unwrap_or(false)
        }
    }
}

#[cfg(target_os = "espidf")]
pub use esp::NvsStorage;

// ───────────────────────────────────────────────────────────────
// Simulation backend
// ───────────────────────────────────────────────────────────────

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Int(i32),
    Str(String),
    Blob(Vec<u8>),
}

/// In-memory StoragePort for host tests and simulation runs.
#[derive(Debug, Default)]
pub struct MemStorage {
    entries: HashMap<(String, String), Entry>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn key(namespace: &str, key: &str) -> (String, String) {
        (namespace.to_owned(), key.to_owned())
    }
}

impl StoragePort for MemStorage {
    fn get_i32(&self, namespace: &str, key: &str) -> Result<i32, StorageError> {
        match self.entries.get(&Self::key(namespace, key)) {
            Some(Entry::Int(v)) => Ok(*v),
            Some(_) => Err(StorageError::Corrupted),
            None => Err(StorageError::NotFound),
        }
    }

    fn set_i32(&mut self, namespace: &str, key: &str, value: i32) -> Result<(), StorageError> {
        self.entries.insert(Self::key(namespace, key), Entry::Int(value));
        Ok(())
    }

    fn get_str(&self, namespace: &str, key: &str) -> Result<String, StorageError> {
        match self.entries.get(&Self::key(namespace, key)) {
            Some(Entry::Str(v)) => Ok(v.clone()),
            Some(_) => Err(StorageError::Corrupted),
            None => Err(StorageError::NotFound),
        }
    }

    fn set_str(&mut self, namespace: &str, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(Self::key(namespace, key), Entry::Str(value.to_owned()));
        Ok(())
    }

    fn get_blob(&self, namespace: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        match self.entries.get(&Self::key(namespace, key)) {
            Some(Entry::Blob(v)) => Ok(v.clone()),
            Some(_) => Err(StorageError::Corrupted),
            None => Err(StorageError::NotFound),
        }
    }

    fn set_blob(&mut self, namespace: &str, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.entries.insert(Self::key(namespace, key), Entry::Blob(value.to_vec()));
        Ok(())
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.entries.contains_key(&Self::key(namespace, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_round_trips() {
        let mut s = MemStorage::new();
        s.set_i32("ns", "i", -7).unwrap();
        s.set_str("ns", "s", "hello").unwrap();
        s.set_blob("ns", "b", &[1, 2, 3]).unwrap();
        assert_eq!(s.get_i32("ns", "i").unwrap(), -7);
        assert_eq!(s.get_str("ns", "s").unwrap(), "hello");
        assert_eq!(s.get_blob("ns", "b").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn namespaces_are_isolated() {
        let mut s = MemStorage::new();
        s.set_i32("a", "k", 1).unwrap();
        assert!(s.exists("a", "k"));
        assert!(!s.exists("b", "k"));
        assert_eq!(s.get_i32("b", "k"), Err(StorageError::NotFound));
    }

    #[test]
    fn type_confusion_is_corruption() {
        let mut s = MemStorage::new();
        s.set_str("ns", "k", "text").unwrap();
        assert_eq!(s.get_i32("ns", "k"), Err(StorageError::Corrupted));
    }
}
