//! Shared test doubles for the gateway test suites
//!
//! One in-memory fake per leaf service, each recording the calls it
//! receives so tests can assert on what the orchestrator did and did
//! not dispatch.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use photure_gw::clients::{
    GalleryCatalog, IdentityVerifier, LeafError, LeafResult, MediaStore,
};
use photure_common::api::types::{
    CreatePhotoRequest, DeletePhotoResult, MediaUploadResponse, PhotoRecord, PhotoRecordPage,
    VerifyResponse,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ========================================
// Identity verifier fake
// ========================================

pub struct MockVerifier {
    users: HashMap<String, String>,
    unreachable: bool,
    calls: Mutex<Vec<String>>,
}

impl MockVerifier {
    /// Verifier accepting the given `(token, user_id)` pairs
    pub fn accepting(pairs: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            users: pairs
                .iter()
                .map(|(t, u)| (t.to_string(), u.to_string()))
                .collect(),
            unreachable: false,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Verifier that never answers
    pub fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            users: HashMap::new(),
            unreachable: true,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl IdentityVerifier for MockVerifier {
    async fn verify(&self, bearer: &str) -> LeafResult<VerifyResponse> {
        self.calls.lock().unwrap().push(bearer.to_string());

        if self.unreachable {
            return Err(LeafError::Unreachable("connection refused".to_string()));
        }

        let token = bearer.strip_prefix("Bearer ").unwrap_or(bearer).trim();
        match self.users.get(token) {
            Some(user_id) => Ok(VerifyResponse {
                user_id: user_id.clone(),
                session_id: None,
            }),
            None => Err(LeafError::Rejected {
                status: 401,
                message: "Invalid or expired token".to_string(),
            }),
        }
    }
}

// ========================================
// Media store fake
// ========================================

pub struct MockMediaStore {
    blobs: Mutex<HashMap<String, (Bytes, String)>>,
    counter: AtomicUsize,
    unreachable: AtomicBool,
    fail_delete: AtomicBool,
    upload_calls: AtomicUsize,
    delete_calls: Mutex<Vec<String>>,
}

impl MockMediaStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            blobs: Mutex::new(HashMap::new()),
            counter: AtomicUsize::new(0),
            unreachable: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
            upload_calls: AtomicUsize::new(0),
            delete_calls: Mutex::new(Vec::new()),
        })
    }

    pub fn set_unreachable(&self, value: bool) {
        self.unreachable.store(value, Ordering::SeqCst);
    }

    /// Make every delete call fail with a store-side error
    pub fn set_fail_delete(&self, value: bool) {
        self.fail_delete.store(value, Ordering::SeqCst);
    }

    pub fn upload_count(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.delete_calls.lock().unwrap().clone()
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    /// Drop a blob behind the catalog's back, producing a dangling
    /// reference
    pub fn lose_blob(&self, storage_key: &str) {
        self.blobs.lock().unwrap().remove(storage_key);
    }
}

#[async_trait]
impl MediaStore for MockMediaStore {
    async fn upload(
        &self,
        data: Bytes,
        content_type: &str,
        filename: &str,
    ) -> LeafResult<MediaUploadResponse> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);

        if self.unreachable.load(Ordering::SeqCst) {
            return Err(LeafError::Unreachable("connection refused".to_string()));
        }

        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let extension = Path::new(filename)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let storage_key = format!("blob-{}{}", n, extension);

        let size = data.len() as i64;
        self.blobs
            .lock()
            .unwrap()
            .insert(storage_key.clone(), (data, content_type.to_string()));

        Ok(MediaUploadResponse {
            storage_key,
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            size,
        })
    }

    async fn fetch(
        &self,
        storage_key: &str,
        _download_name: &str,
        _content_type: &str,
    ) -> LeafResult<Bytes> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(LeafError::Unreachable("connection refused".to_string()));
        }

        match self.blobs.lock().unwrap().get(storage_key) {
            Some((data, _)) => Ok(data.clone()),
            None => Err(LeafError::Rejected {
                status: 404,
                message: "Media not found".to_string(),
            }),
        }
    }

    async fn delete(&self, storage_key: &str) -> LeafResult<()> {
        self.delete_calls
            .lock()
            .unwrap()
            .push(storage_key.to_string());

        if self.unreachable.load(Ordering::SeqCst) {
            return Err(LeafError::Unreachable("connection refused".to_string()));
        }
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(LeafError::Rejected {
                status: 500,
                message: "Storage backend error".to_string(),
            });
        }

        match self.blobs.lock().unwrap().remove(storage_key) {
            Some(_) => Ok(()),
            None => Err(LeafError::Rejected {
                status: 404,
                message: "Media not found".to_string(),
            }),
        }
    }
}

// ========================================
// Gallery catalog fake
// ========================================

pub struct MockGallery {
    records: Mutex<Vec<PhotoRecord>>,
    counter: AtomicUsize,
    base_time: DateTime<Utc>,
    unreachable: AtomicBool,
    fail_create: AtomicBool,
    create_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl MockGallery {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(Vec::new()),
            counter: AtomicUsize::new(0),
            base_time: Utc::now(),
            unreachable: AtomicBool::new(false),
            fail_create: AtomicBool::new(false),
            create_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
        })
    }

    pub fn set_unreachable(&self, value: bool) {
        self.unreachable.store(value, Ordering::SeqCst);
    }

    /// Make every create call fail after the media upload succeeded
    pub fn set_fail_create(&self, value: bool) {
        self.fail_create.store(value, Ordering::SeqCst);
    }

    pub fn create_count(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn list_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl GalleryCatalog for MockGallery {
    async fn create(&self, request: &CreatePhotoRequest) -> LeafResult<PhotoRecord> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        if self.unreachable.load(Ordering::SeqCst) {
            return Err(LeafError::Unreachable("connection refused".to_string()));
        }
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(LeafError::Rejected {
                status: 500,
                message: "Record creation failed".to_string(),
            });
        }

        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let record = PhotoRecord {
            id: format!("photo-{}", n),
            filename: request.filename.clone(),
            original_name: request.original_name.clone(),
            content_type: request.content_type.clone(),
            size: request.size,
            user_id: request.user_id.clone(),
            // Strictly increasing timestamps make newest-first ordering
            // deterministic in tests
            upload_date: self.base_time + Duration::seconds(n as i64),
            storage_key: request.storage_key.clone(),
        };

        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn list(&self, owner: &str, skip: i64, limit: i64) -> LeafResult<PhotoRecordPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if self.unreachable.load(Ordering::SeqCst) {
            return Err(LeafError::Unreachable("connection refused".to_string()));
        }

        let records = self.records.lock().unwrap();
        let mut owned: Vec<PhotoRecord> = records
            .iter()
            .filter(|r| r.user_id == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));

        let total = owned.len() as i64;
        let photos = owned
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect();

        Ok(PhotoRecordPage { photos, total })
    }

    async fn get(&self, photo_id: &str, owner: &str) -> LeafResult<PhotoRecord> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(LeafError::Unreachable("connection refused".to_string()));
        }

        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == photo_id && r.user_id == owner)
            .cloned()
            .ok_or(LeafError::Rejected {
                status: 404,
                message: "Photo not found".to_string(),
            })
    }

    async fn delete(&self, photo_id: &str, owner: &str) -> LeafResult<DeletePhotoResult> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(LeafError::Unreachable("connection refused".to_string()));
        }

        let mut records = self.records.lock().unwrap();
        let position = records
            .iter()
            .position(|r| r.id == photo_id && r.user_id == owner);

        match position {
            Some(index) => {
                let removed = records.remove(index);
                Ok(DeletePhotoResult {
                    storage_key: removed.storage_key,
                    deleted: true,
                })
            }
            None => Err(LeafError::Rejected {
                status: 404,
                message: "Photo not found".to_string(),
            }),
        }
    }
}

// ========================================
// Helpers
// ========================================

/// Poll until `condition` holds, up to roughly one second
///
/// The compensating delete runs on a spawned task, so tests observing it
/// must give the runtime a chance to schedule it.
pub async fn wait_for(condition: impl Fn() -> bool) -> bool {
    for _ in 0..100 {
        if condition() {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    condition()
}
