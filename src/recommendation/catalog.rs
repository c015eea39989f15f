//! Catalog Store
//!
//! Add-only storage of entertainment items, one shelf per media kind.
//! Shelves enumerate in insertion order.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use super::item::{EntertainmentItem, MediaKind};
use crate::error::{Error, Result};

/// What to do when an item id is added twice to the same kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail with `DuplicateId`
    #[default]
    Reject,
    /// Replace the stored item, keeping its position
    Overwrite,
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::Reject => write!(f, "reject"),
            DuplicatePolicy::Overwrite => write!(f, "overwrite"),
        }
    }
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(DuplicatePolicy::Reject),
            "overwrite" => Ok(DuplicatePolicy::Overwrite),
            other => Err(format!(
                "unknown duplicate policy '{}' (expected reject or overwrite)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Shelf {
    items: Vec<EntertainmentItem>,
    index: HashMap<String, usize>,
}

/// In-memory catalog of entertainment items
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    policy: DuplicatePolicy,
    shelves: BTreeMap<MediaKind, Shelf>,
}

impl CatalogStore {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            shelves: BTreeMap::new(),
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Add an item to the shelf of `kind`
    pub fn add(&mut self, kind: MediaKind, item: EntertainmentItem) -> Result<()> {
        if item.kind() != kind {
            return Err(Error::KindMismatch {
                expected: kind,
                found: item.kind(),
            });
        }
        item.validate()?;

        let shelf = self.shelves.entry(kind).or_default();
        let existing = shelf.index.get(&item.id).copied();
        match existing {
            Some(pos) => match self.policy {
                DuplicatePolicy::Reject => Err(Error::DuplicateId {
                    kind,
                    id: item.id.clone(),
                }),
                DuplicatePolicy::Overwrite => {
                    debug!("Overwriting {} {}", kind, item.id);
                    shelf.items[pos] = item;
                    Ok(())
                }
            },
            None => {
                debug!("Added {} {} ({})", kind, item.id, item.title);
                shelf.index.insert(item.id.clone(), shelf.items.len());
                shelf.items.push(item);
                Ok(())
            }
        }
    }

    /// Add an item to the shelf matching its own kind
    pub fn insert(&mut self, item: EntertainmentItem) -> Result<()> {
        self.add(item.kind(), item)
    }

    pub fn get(&self, kind: MediaKind, id: &str) -> Option<&EntertainmentItem> {
        let shelf = self.shelves.get(&kind)?;
        shelf.index.get(id).map(|&pos| &shelf.items[pos])
    }

    /// Items of a kind in insertion order
    pub fn list(&self, kind: MediaKind) -> &[EntertainmentItem] {
        self.shelves
            .get(&kind)
            .map(|shelf| shelf.items.as_slice())
            .unwrap_or(&[])
    }

    pub fn count(&self, kind: MediaKind) -> usize {
        self.list(kind).len()
    }

    pub fn len(&self) -> usize {
        self.shelves.values().map(|s| s.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Case-insensitive search over titles and genres
    pub fn search(&self, query: &str, kind: Option<MediaKind>) -> Vec<&EntertainmentItem> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let kinds: &[MediaKind] = match kind {
            Some(ref k) => std::slice::from_ref(k),
            None => &MediaKind::ALL,
        };

        kinds
            .iter()
            .flat_map(|&k| self.list(k))
            .filter(|item| item.matches_query(&needle))
            .collect()
    }

    /// Persisted form: `{"movies": {id: item}, "music": {..}, "books": {..}, "games": {..}}`
    pub fn to_record(&self) -> Result<Value> {
        let mut record = Map::new();
        for kind in MediaKind::ALL {
            let mut bucket = Map::new();
            for item in self.list(kind) {
                bucket.insert(item.id.clone(), serde_json::to_value(item)?);
            }
            record.insert(kind.bucket().to_string(), Value::Object(bucket));
        }
        Ok(Value::Object(record))
    }

    /// Rebuild a catalog from its persisted form.
    ///
    /// Missing buckets are empty and unknown buckets are skipped. The first
    /// malformed entry aborts the load with a `CatalogLoad` error naming it.
    pub fn from_record(record: &Value, policy: DuplicatePolicy) -> Result<Self> {
        let obj = record
            .as_object()
            .ok_or_else(|| Error::catalog_load("$", "catalog record must be an object"))?;

        for key in obj.keys() {
            if !MediaKind::ALL.iter().any(|k| k.bucket() == key) {
                warn!("Skipping unknown catalog bucket '{}'", key);
            }
        }

        let mut catalog = Self::new(policy);
        for kind in MediaKind::ALL {
            let bucket_name = kind.bucket();
            let bucket = match obj.get(bucket_name) {
                None | Some(Value::Null) => continue,
                Some(Value::Object(bucket)) => bucket,
                Some(_) => return Err(Error::catalog_load(bucket_name, "bucket must be an object")),
            };

            for (id, entry) in bucket {
                let entry_name = format!("{}.{}", bucket_name, id);
                let item: EntertainmentItem = serde_json::from_value(entry.clone())
                    .map_err(|e| Error::catalog_load(entry_name.clone(), e.to_string()))?;

                if item.kind() != kind {
                    return Err(Error::catalog_load(
                        entry_name,
                        format!("{} entry stored under {}", item.kind(), bucket_name),
                    ));
                }
                if &item.id != id {
                    return Err(Error::catalog_load(
                        entry_name,
                        format!("key does not match id '{}'", item.id),
                    ));
                }

                catalog
                    .add(kind, item)
                    .map_err(|e| Error::catalog_load(entry_name, e.to_string()))?;
            }
        }

        Ok(catalog)
    }
}
