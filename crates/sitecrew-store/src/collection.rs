//! Generic in-memory collection mirrored to a JSON file.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{error, info, warn};

use sitecrew_core::error::AppError;
use sitecrew_core::result::AppResult;
use sitecrew_core::traits::{DeletionPolicy, Record};

use crate::mirror::JsonMirror;

/// Ordered records of one kind plus their mirror file.
///
/// Readers share the lock. Every mutation goes through a
/// [`CollectionGuard`], which holds the exclusive lock for the whole
/// validate, mutate, persist sequence.
#[derive(Debug)]
pub struct Collection<T: Record> {
    records: RwLock<Vec<T>>,
    mirror: JsonMirror,
}

impl<T: Record> Collection<T> {
    /// Load the collection from its mirror, creating an empty one if absent.
    pub async fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        Self::open_with(path, |_| Ok(())).await
    }

    /// Load, normalize, apply a kind-specific fixup, then re-persist.
    pub async fn open_with<F>(path: impl Into<PathBuf>, fixup: F) -> AppResult<Self>
    where
        F: FnOnce(&mut Vec<T>) -> AppResult<()>,
    {
        let mirror = JsonMirror::new(path);
        let mut records = match mirror.read::<T>().await? {
            Some(records) => records,
            None => {
                info!(kind = T::KIND, path = %mirror.path().display(), "Mirror absent, starting empty");
                Vec::new()
            }
        };

        let mut seen = HashSet::new();
        for record in records.iter_mut() {
            record.normalize();
            if record.id().to_string().trim().is_empty() || seen.contains(record.id()) {
                let fresh = T::Id::default();
                warn!(kind = T::KIND, old_id = %record.id(), new_id = %fresh, "Reassigning blank or duplicate id");
                record.set_id(fresh);
            }
            seen.insert(record.id().clone());
        }

        fixup(&mut records)?;
        mirror.write(records.as_slice()).await?;

        info!(
            kind = T::KIND,
            count = records.len(),
            path = %mirror.path().display(),
            "Collection loaded"
        );

        Ok(Self {
            records: RwLock::new(records),
            mirror,
        })
    }

    /// Copy of every record in listing order.
    pub async fn snapshot(&self) -> Vec<T> {
        let mut all = self.records.read().await.clone();
        all.sort_by(T::ordering);
        all
    }

    /// Records matching a predicate, in listing order.
    pub async fn filter<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        let mut matching: Vec<T> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect();
        matching.sort_by(T::ordering);
        matching
    }

    /// First record matching a predicate, in storage order.
    pub async fn find<P>(&self, predicate: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        self.records.read().await.iter().find(|r| predicate(r)).cloned()
    }

    /// Record by identifier.
    pub async fn get(&self, id: &T::Id) -> AppResult<T> {
        self.find(|r| r.id() == id)
            .await
            .ok_or_else(|| not_found::<T>(id))
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Shared read access for cross-collection checks.
    pub async fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.records.read().await
    }

    /// Exclusive access for a validate, mutate, persist sequence.
    pub async fn lock(&self) -> CollectionGuard<'_, T> {
        CollectionGuard {
            records: self.records.write().await,
            mirror: &self.mirror,
        }
    }
}

/// Exclusive handle on a collection.
///
/// Each mutating method persists the full collection before returning and
/// restores the previous in-memory state when the write fails.
pub struct CollectionGuard<'a, T: Record> {
    records: RwLockWriteGuard<'a, Vec<T>>,
    mirror: &'a JsonMirror,
}

impl<T: Record> CollectionGuard<'_, T> {
    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.iter()
    }

    /// Assign a fresh identifier, append, persist.
    pub async fn insert(&mut self, mut record: T) -> AppResult<T> {
        let mut id = T::Id::default();
        while self.get(&id).is_some() {
            id = T::Id::default();
        }
        record.set_id(id);

        self.records.push(record.clone());
        if let Err(e) = self.persist().await {
            self.records.pop();
            return Err(e);
        }

        info!(kind = T::KIND, id = %record.id(), "Record created");
        Ok(record)
    }

    /// Replace the record with the same identifier, persist.
    pub async fn replace(&mut self, record: T) -> AppResult<T> {
        let index = self.position(record.id())?;
        let previous = std::mem::replace(&mut self.records[index], record.clone());
        if let Err(e) = self.persist().await {
            self.records[index] = previous;
            return Err(e);
        }

        info!(kind = T::KIND, id = %record.id(), "Record updated");
        Ok(record)
    }

    /// Delete according to the kind's policy, persist. Returns the record as
    /// it was removed or as it now stands after retirement.
    pub async fn remove(&mut self, id: &T::Id, at: DateTime<Utc>) -> AppResult<T> {
        let index = self.position(id)?;

        match T::DELETION {
            DeletionPolicy::Physical => {
                let removed = self.records.remove(index);
                if let Err(e) = self.persist().await {
                    self.records.insert(index, removed);
                    return Err(e);
                }
                info!(kind = T::KIND, id = %id, "Record deleted");
                Ok(removed)
            }
            DeletionPolicy::SoftRetire => {
                let previous = self.records[index].clone();
                self.records[index].retire(at);
                if let Err(e) = self.persist().await {
                    self.records[index] = previous;
                    return Err(e);
                }
                info!(kind = T::KIND, id = %id, "Record retired");
                Ok(self.records[index].clone())
            }
        }
    }

    /// Apply an in-place change to one record, persist.
    pub async fn modify<F>(&mut self, id: &T::Id, change: F) -> AppResult<T>
    where
        F: FnOnce(&mut T),
    {
        let index = self.position(id)?;
        let previous = self.records[index].clone();
        change(&mut self.records[index]);
        if let Err(e) = self.persist().await {
            self.records[index] = previous;
            return Err(e);
        }
        Ok(self.records[index].clone())
    }

    fn position(&self, id: &T::Id) -> AppResult<usize> {
        self.records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| not_found::<T>(id))
    }

    async fn persist(&self) -> AppResult<()> {
        self.mirror.write(self.records.as_slice()).await.map_err(|e| {
            error!(kind = T::KIND, error = %e, "Persisting collection failed, rolling back");
            e
        })
    }
}

fn not_found<T: Record>(id: &T::Id) -> AppError {
    AppError::not_found(format!("{} '{id}' not found", T::KIND))
}
