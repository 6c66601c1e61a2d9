use anyhow::{Context, Result};
use chrono::{Local, Utc};
use uuid::Uuid;

use crate::db::export::{parse_import, render_text_report};
use crate::db::repository::KvStore;
use crate::error::ImportError;
use crate::models::{NewRequest, PrayerData, PrayerRequest, RequestPatch};

pub const STORAGE_KEY: &str = "prayer-tracker-data";
pub const DARK_MODE_KEY: &str = "dark-mode";

/// What an accepted import brought in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub requests: usize,
    pub members: usize,
}

/// Gateway to the persisted prayer data.
///
/// The whole collection lives as one JSON document under [`STORAGE_KEY`].
/// Every mutation is load, change, save. Read and write failures are logged
/// and swallowed; only import reports failure to the caller.
pub struct PrayerStorage<S: KvStore> {
    store: S,
}

impl<S: KvStore> PrayerStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the persisted data, falling back to an empty collection.
    pub fn get_data(&self) -> PrayerData {
        match self.try_get_data() {
            Ok(Some(data)) => data,
            Ok(None) => PrayerData::default(),
            Err(e) => {
                log::error!("Error reading prayer data: {:#}", e);
                PrayerData::default()
            }
        }
    }

    fn try_get_data(&self) -> Result<Option<PrayerData>> {
        let Some(raw) = self.store.get(STORAGE_KEY)? else {
            return Ok(None);
        };
        let data = serde_json::from_str(&raw).context("Parsing stored prayer data")?;
        Ok(Some(data))
    }

    /// Stamp `last_updated` and persist. Failures are logged, not returned.
    pub fn save_data(&self, data: &mut PrayerData) {
        data.last_updated = Utc::now();
        if let Err(e) = self.try_save_data(data) {
            log::error!("Error saving prayer data: {:#}", e);
        }
    }

    fn try_save_data(&self, data: &PrayerData) -> Result<()> {
        let json = serde_json::to_string(data).context("Serializing prayer data")?;
        self.store.set(STORAGE_KEY, &json)
    }

    pub fn add_request(&self, request: NewRequest) -> PrayerRequest {
        let mut data = self.get_data();
        let now = Utc::now();
        let request = request.into_request(generate_id(now.timestamp_millis()), now);

        data.requests.push(request.clone());
        if data.register_member(&request.member_name) {
            log::debug!("Registered new member {}", request.member_name);
        }

        self.save_data(&mut data);
        log::debug!("Added request {}", request.id);
        request
    }

    /// Merge `patch` into the request with `id`. Returns false, without
    /// saving, when no request matches.
    pub fn update_request(&self, id: &str, patch: &RequestPatch) -> bool {
        let mut data = self.get_data();
        let Some(request) = data.requests.iter_mut().find(|r| r.id == id) else {
            log::debug!("Update skipped, no request {}", id);
            return false;
        };

        patch.apply_to(request);
        self.save_data(&mut data);
        log::debug!("Updated request {}", id);
        true
    }

    pub fn delete_request(&self, id: &str) -> bool {
        let mut data = self.get_data();
        let before = data.requests.len();
        data.requests.retain(|r| r.id != id);
        let removed = data.requests.len() != before;

        self.save_data(&mut data);
        if removed {
            log::debug!("Deleted request {}", id);
        }
        removed
    }

    /// Pretty-printed JSON in the persisted shape.
    pub fn export_data(&self) -> String {
        let data = self.get_data();
        serde_json::to_string_pretty(&data).unwrap_or_else(|e| {
            log::error!("Error exporting prayer data: {}", e);
            String::from("{}")
        })
    }

    pub fn export_as_text(&self) -> String {
        let data = self.get_data();
        render_text_report(&data, &Local, Local::now().date_naive())
    }

    /// Replace everything with the imported data. Nothing is written unless
    /// the blob validates.
    pub fn import_data(&self, raw: &str) -> Result<ImportSummary, ImportError> {
        let mut data = parse_import(raw).inspect_err(|e| {
            log::warn!("Error importing data: {}", e);
        })?;

        let summary = ImportSummary {
            requests: data.requests.len(),
            members: data.members.len(),
        };
        self.save_data(&mut data);
        Ok(summary)
    }

    pub fn dark_mode(&self) -> bool {
        match self.store.get(DARK_MODE_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                log::error!("Error reading theme preference: {:#}", e);
                false
            }
        }
    }

    pub fn set_dark_mode(&self, enabled: bool) {
        if let Err(e) = self.store.set(DARK_MODE_KEY, &enabled.to_string()) {
            log::error!("Error saving theme preference: {:#}", e);
        }
    }
}

const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `pr_<millis>_<9 random lowercase alphanumerics>`
fn generate_id(millis: i64) -> String {
    let mut bits = Uuid::new_v4().as_u128();
    let suffix: String = (0..9)
        .map(|_| {
            let c = ID_ALPHABET[(bits % 36) as usize] as char;
            bits /= 36;
            c
        })
        .collect();
    format!("pr_{}_{}", millis, suffix)
}
