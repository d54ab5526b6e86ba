//! JSON-file request store.
//!
//! Read-full / mutate / write-full on every operation, guarded by one
//! mutex so overlapping mutations (a command removing a request while
//! the scheduler stamps `last_checked`) serialize instead of clobbering
//! each other. All file I/O is synchronous, so the critical section
//! never spans an await point.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use classwatch_core::error::{Result, WatchError};
use classwatch_core::types::Owner;

use crate::request::{CachedMetadata, RequestKind, TrackingRequest};

/// On-disk document wrapping the ordered request list.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RequestDocument {
    #[serde(default)]
    requests: Vec<TrackingRequest>,
}

/// Partial update applied to exactly one record.
#[derive(Debug, Clone, Default)]
pub struct RequestUpdate {
    pub last_checked: Option<DateTime<Utc>>,
    pub last_notified: Option<DateTime<Utc>>,
    pub metadata: Option<CachedMetadata>,
}

/// Durable mapping of request id to [`TrackingRequest`].
pub struct RequestStore {
    path: PathBuf,
    max_per_user: usize,
    lock: Mutex<()>,
}

impl RequestStore {
    pub fn new(path: &Path, max_per_user: usize) -> Self {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        Self {
            path: path.to_path_buf(),
            max_per_user,
            lock: Mutex::new(()),
        }
    }

    /// Append a new request after duplicate and quota checks.
    ///
    /// Returns the allocated id. A failed save means the request was
    /// not durably created and is reported as [`WatchError::Persist`].
    pub fn create(
        &self,
        kind: RequestKind,
        owner: Owner,
        term: &str,
        metadata: CachedMetadata,
    ) -> Result<String> {
        let _guard = self.lock.lock().expect("store lock poisoned");
        let mut requests = self.load();

        if Self::duplicate_in(&requests, owner.user_id, &kind, term) {
            return Err(WatchError::Duplicate(format!(
                "already tracking {} (term {term})",
                kind.describe()
            )));
        }
        let held = requests.iter().filter(|r| r.user_id == owner.user_id).count();
        if held >= self.max_per_user {
            return Err(WatchError::QuotaExceeded {
                limit: self.max_per_user,
            });
        }

        let request = TrackingRequest::new(kind, owner, term, metadata);
        let id = request.id.clone();
        requests.push(request);
        self.save(&requests)?;
        tracing::info!("📌 Watch added: {id}");
        Ok(id)
    }

    /// Remove one record. `Ok(false)` when the id is unknown.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let _guard = self.lock.lock().expect("store lock poisoned");
        let mut requests = self.load();
        let before = requests.len();
        requests.retain(|r| r.id != id);
        if requests.len() == before {
            return Ok(false);
        }
        self.save(&requests)?;
        Ok(true)
    }

    /// Remove every record owned by `user_id`; returns how many.
    pub fn remove_all_for_user(&self, user_id: u64) -> Result<usize> {
        let _guard = self.lock.lock().expect("store lock poisoned");
        let mut requests = self.load();
        let before = requests.len();
        requests.retain(|r| r.user_id != user_id);
        let removed = before - requests.len();
        if removed > 0 {
            self.save(&requests)?;
        }
        Ok(removed)
    }

    /// All live requests in insertion order.
    pub fn list_all(&self) -> Vec<TrackingRequest> {
        let _guard = self.lock.lock().expect("store lock poisoned");
        self.load()
    }

    pub fn list_for_user(&self, user_id: u64) -> Vec<TrackingRequest> {
        self.list_all()
            .into_iter()
            .filter(|r| r.user_id == user_id)
            .collect()
    }

    pub fn count_for_user(&self, user_id: u64) -> usize {
        self.list_for_user(user_id).len()
    }

    /// Pure query: does the owner already track this exact watch?
    pub fn is_duplicate(&self, user_id: u64, kind: &RequestKind, term: &str) -> bool {
        let _guard = self.lock.lock().expect("store lock poisoned");
        Self::duplicate_in(&self.load(), user_id, kind, term)
    }

    /// Stamp `last_checked` with the current time.
    pub fn update_checked(&self, id: &str) -> Result<bool> {
        self.update(
            id,
            RequestUpdate {
                last_checked: Some(Utc::now()),
                ..Default::default()
            },
        )
    }

    /// Stamp `last_notified` with the current time.
    pub fn update_notified(&self, id: &str) -> Result<bool> {
        self.update(
            id,
            RequestUpdate {
                last_notified: Some(Utc::now()),
                ..Default::default()
            },
        )
    }

    /// Apply a partial update to exactly one record, leaving all
    /// others untouched. `Ok(false)` when the id is unknown.
    pub fn update(&self, id: &str, patch: RequestUpdate) -> Result<bool> {
        let _guard = self.lock.lock().expect("store lock poisoned");
        let mut requests = self.load();
        let Some(request) = requests.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };
        if let Some(ts) = patch.last_checked {
            request.last_checked = Some(ts);
        }
        if let Some(ts) = patch.last_notified {
            request.last_notified = Some(ts);
        }
        if let Some(metadata) = patch.metadata {
            request.metadata = metadata;
        }
        self.save(&requests)?;
        Ok(true)
    }

    fn duplicate_in(
        requests: &[TrackingRequest],
        user_id: u64,
        kind: &RequestKind,
        term: &str,
    ) -> bool {
        requests
            .iter()
            .any(|r| r.user_id == user_id && r.kind == *kind && r.term == term)
    }

    /// Read the full document. Unreadable or corrupt state degrades to
    /// an empty list with a warning; it never takes the process down.
    fn load(&self) -> Vec<TrackingRequest> {
        if !self.path.exists() {
            return Vec::new();
        }
        match std::fs::read_to_string(&self.path) {
            Ok(json) => match serde_json::from_str::<RequestDocument>(&json) {
                Ok(doc) => doc.requests,
                Err(e) => {
                    tracing::warn!("⚠️ Failed to parse {}: {e}", self.path.display());
                    Vec::new()
                }
            },
            Err(e) => {
                tracing::warn!("⚠️ Failed to read {}: {e}", self.path.display());
                Vec::new()
            }
        }
    }

    /// Write the full document back.
    fn save(&self, requests: &[TrackingRequest]) -> Result<()> {
        let doc = serde_json::json!({ "requests": requests });
        let json = serde_json::to_string_pretty(&doc)
            .map_err(|e| WatchError::Persist(format!("Serialize error: {e}")))?;
        std::fs::write(&self.path, &json)
            .map_err(|e| WatchError::Persist(format!("Write error: {e}")))?;
        tracing::debug!(
            "💾 Saved {} request(s) to {}",
            requests.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("classwatch-store-{name}"));
        std::fs::remove_dir_all(&dir).ok();
        std::fs::create_dir_all(&dir).ok();
        dir.join("class_requests.json")
    }

    fn owner(user_id: u64) -> Owner {
        Owner {
            user_id,
            username: format!("user{user_id}"),
            channel_id: 555,
        }
    }

    fn class_kind(num: &str) -> RequestKind {
        RequestKind::class(num, "CSE").unwrap()
    }

    #[test]
    fn create_then_list_for_user() {
        let store = RequestStore::new(&scratch("create"), 10);
        let id = store
            .create(class_kind("205"), owner(1), "2261", CachedMetadata::default())
            .unwrap();
        let mine = store.list_for_user(1);
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, id);
        assert!(store.list_for_user(2).is_empty());
    }

    #[test]
    fn duplicate_create_is_rejected_and_size_unchanged() {
        let store = RequestStore::new(&scratch("dup"), 10);
        store
            .create(class_kind("205"), owner(1), "2261", CachedMetadata::default())
            .unwrap();
        let err = store
            .create(class_kind("205"), owner(1), "2261", CachedMetadata::default())
            .unwrap_err();
        assert!(matches!(err, WatchError::Duplicate(_)));
        assert_eq!(store.list_all().len(), 1);

        // Same payload, different term or different owner: not a dup.
        store
            .create(class_kind("205"), owner(1), "2267", CachedMetadata::default())
            .unwrap();
        store
            .create(class_kind("205"), owner(2), "2261", CachedMetadata::default())
            .unwrap();
        assert_eq!(store.list_all().len(), 3);
    }

    #[test]
    fn quota_boundary_then_remove_frees_a_slot() {
        let store = RequestStore::new(&scratch("quota"), 3);
        for num in ["101", "102", "103"] {
            store
                .create(class_kind(num), owner(1), "2261", CachedMetadata::default())
                .unwrap();
        }
        let err = store
            .create(class_kind("104"), owner(1), "2261", CachedMetadata::default())
            .unwrap_err();
        assert!(matches!(err, WatchError::QuotaExceeded { limit: 3 }));

        // Other users are unaffected by user 1's cap.
        store
            .create(class_kind("104"), owner(2), "2261", CachedMetadata::default())
            .unwrap();

        let victim = store.list_for_user(1)[0].id.clone();
        assert!(store.remove(&victim).unwrap());
        store
            .create(class_kind("104"), owner(1), "2261", CachedMetadata::default())
            .unwrap();
        assert_eq!(store.count_for_user(1), 3);
    }

    #[test]
    fn double_remove_returns_false_second_time() {
        let store = RequestStore::new(&scratch("remove"), 10);
        let id = store
            .create(class_kind("205"), owner(1), "2261", CachedMetadata::default())
            .unwrap();
        assert!(store.remove(&id).unwrap());
        assert!(!store.remove(&id).unwrap());
        assert!(store.list_all().is_empty());
    }

    #[test]
    fn remove_all_for_user_leaves_others_untouched() {
        let store = RequestStore::new(&scratch("removeall"), 10);
        for num in ["101", "102"] {
            store
                .create(class_kind(num), owner(1), "2261", CachedMetadata::default())
                .unwrap();
        }
        store
            .create(class_kind("103"), owner(2), "2261", CachedMetadata::default())
            .unwrap();

        assert_eq!(store.remove_all_for_user(1).unwrap(), 2);
        assert_eq!(store.remove_all_for_user(1).unwrap(), 0);
        assert_eq!(store.list_all().len(), 1);
        assert_eq!(store.list_all()[0].user_id, 2);
    }

    #[test]
    fn timestamp_updates_touch_exactly_one_record() {
        let store = RequestStore::new(&scratch("stamps"), 10);
        let a = store
            .create(class_kind("101"), owner(1), "2261", CachedMetadata::default())
            .unwrap();
        let b = store
            .create(class_kind("102"), owner(1), "2261", CachedMetadata::default())
            .unwrap();

        assert!(store.update_checked(&a).unwrap());
        let all = store.list_all();
        let first = all.iter().find(|r| r.id == a).unwrap();
        let second = all.iter().find(|r| r.id == b).unwrap();
        assert!(first.last_checked.is_some());
        assert!(first.last_notified.is_none());
        assert!(second.last_checked.is_none());

        assert!(store.update_notified(&a).unwrap());
        let stamped = store.list_all().into_iter().find(|r| r.id == a).unwrap();
        assert!(stamped.last_notified.unwrap() >= stamped.added_at);
        assert!(!store.update_checked("no-such-id").unwrap());
    }

    #[test]
    fn metadata_patch_replaces_snapshot() {
        let store = RequestStore::new(&scratch("patch"), 10);
        let id = store
            .create(class_kind("205"), owner(1), "2261", CachedMetadata::default())
            .unwrap();
        let patch = RequestUpdate {
            metadata: Some(CachedMetadata {
                class_title: Some("Object-Oriented Programming".into()),
                instructor: Some("R. Stallman".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(store.update(&id, patch).unwrap());
        let got = store.list_all().into_iter().find(|r| r.id == id).unwrap();
        assert_eq!(got.title(), Some("Object-Oriented Programming"));
    }

    #[test]
    fn corrupt_file_degrades_to_empty() {
        let path = scratch("corrupt");
        std::fs::write(&path, "{not json").unwrap();
        let store = RequestStore::new(&path, 10);
        assert!(store.list_all().is_empty());
        // And the store recovers on the next write.
        store
            .create(class_kind("205"), owner(1), "2261", CachedMetadata::default())
            .unwrap();
        assert_eq!(store.list_all().len(), 1);
    }

    #[test]
    fn reload_preserves_insertion_order_and_fields() {
        let path = scratch("reload");
        let nums = ["301", "101", "201"];
        {
            let store = RequestStore::new(&path, 10);
            for num in nums {
                store
                    .create(class_kind(num), owner(1), "2261", CachedMetadata::default())
                    .unwrap();
            }
        }
        let store = RequestStore::new(&path, 10);
        let loaded = store.list_all();
        let got: Vec<_> = loaded
            .iter()
            .map(|r| match &r.kind {
                RequestKind::Class { class_num, .. } => class_num.clone(),
                RequestKind::Course { course_id } => course_id.clone(),
            })
            .collect();
        assert_eq!(got, nums);

        // save(load()) is a field-for-field no-op.
        let before = std::fs::read_to_string(&path).unwrap();
        store.save(&loaded).unwrap();
        let after = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&before).unwrap(),
            serde_json::from_str::<serde_json::Value>(&after).unwrap()
        );
    }

    #[test]
    fn is_duplicate_is_a_pure_query() {
        let store = RequestStore::new(&scratch("isdup"), 10);
        store
            .create(class_kind("205"), owner(1), "2261", CachedMetadata::default())
            .unwrap();
        assert!(store.is_duplicate(1, &class_kind("205"), "2261"));
        assert!(!store.is_duplicate(1, &class_kind("205"), "2267"));
        assert!(!store.is_duplicate(2, &class_kind("205"), "2261"));
        assert_eq!(store.list_all().len(), 1);
    }
}
