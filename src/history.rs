//! History management for BrandMeld
//!
//! The history is a bounded, most-recent-first list of past generation
//! sessions. `HistoryStore` owns the in-memory sequence and keeps the
//! durable copy in the injected [`Storage`] identical to it after every
//! mutation.

use crate::backend::{Storage, HISTORY_KEY};
use crate::error::{Error, Result};
use crate::types::HistoryId;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, info, warn};

/// Maximum number of sessions retained
pub const HISTORY_CAPACITY: usize = 20;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[^>]+(>|$)").expect("tag pattern is valid"));

/// A single past generation session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HistoryItem {
    /// Creation time in epoch milliseconds, unique within the history
    pub id: HistoryId,
    /// Voice description at the time of generation
    pub brand_voice: String,
    /// Request at the time of generation
    pub content_request: String,
    /// The generated Markdown, stored verbatim
    pub generated_content: String,
}

impl HistoryItem {
    /// Create a new history item
    pub fn new(
        id: HistoryId,
        brand_voice: impl Into<String>,
        content_request: impl Into<String>,
        generated_content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            brand_voice: brand_voice.into(),
            content_request: content_request.into(),
            generated_content: generated_content.into(),
        }
    }

    /// When this session was recorded
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.id.timestamp()
    }

    /// Formatted creation time, or the raw id if it is out of range
    pub fn formatted_timestamp(&self) -> String {
        match self.created_at() {
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => self.id.to_string(),
        }
    }

    /// Plain-text preview of the generated content
    ///
    /// HTML tags are replaced by spaces, whitespace runs collapse to one
    /// space, and the result is cut to `max_chars` characters.
    pub fn preview(&self, max_chars: usize) -> String {
        preview_text(&self.generated_content, max_chars)
    }
}

/// Strip markup from `text` and shorten it for single-line display
pub fn preview_text(text: &str, max_chars: usize) -> String {
    let stripped = TAG_PATTERN.replace_all(text, " ");
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }

    let mut cut: String = collapsed.chars().take(max_chars).collect();
    cut.push('…');
    cut
}

/// Decode a durable copy, failing on any schema mismatch
pub fn decode_history(raw: &str) -> serde_json::Result<Vec<HistoryItem>> {
    serde_json::from_str(raw)
}

/// Encode a sequence for the durable copy
pub fn encode_history(items: &[HistoryItem]) -> serde_json::Result<String> {
    serde_json::to_string(items)
}

/// Bounded history backed by durable storage
pub struct HistoryStore<S: Storage> {
    storage: S,
    items: Vec<HistoryItem>,
}

impl<S: Storage> HistoryStore<S> {
    /// Load the durable copy into memory
    ///
    /// A missing copy yields an empty history. A copy that fails to
    /// decode is deleted and the history starts empty; this is not an
    /// error. Storage failures are propagated.
    #[must_use = "History store must be used to record sessions"]
    pub fn initialize(mut storage: S) -> Result<Self> {
        let items = match storage.read(HISTORY_KEY)? {
            None => Vec::new(),
            Some(raw) => match decode_history(&raw) {
                Ok(items) => items,
                Err(e) => {
                    warn!(error = %e, backend = storage.name(), "discarding corrupt history");
                    storage.delete(HISTORY_KEY)?;
                    Vec::new()
                }
            },
        };

        let mut store = Self { storage, items };

        // A copy written by something other than this store may be longer
        if store.items.len() > HISTORY_CAPACITY {
            warn!(
                len = store.items.len(),
                capacity = HISTORY_CAPACITY,
                "stored history over capacity, truncating"
            );
            let mut items = store.items.clone();
            items.truncate(HISTORY_CAPACITY);
            store.commit(items)?;
        }

        debug!(len = store.items.len(), "history initialized");
        Ok(store)
    }

    /// Prepend `item`, evict beyond capacity, and persist the result
    ///
    /// If the durable write fails the in-memory sequence is unchanged.
    pub fn append(&mut self, item: HistoryItem) -> Result<()> {
        let mut next = Vec::with_capacity(HISTORY_CAPACITY);
        next.push(item);
        next.extend(self.items.iter().cloned());
        let evicted = next.len().saturating_sub(HISTORY_CAPACITY);
        next.truncate(HISTORY_CAPACITY);

        self.commit(next)?;
        info!(len = self.items.len(), evicted, "history item appended");
        Ok(())
    }

    /// Record a finished generation under a fresh id
    pub fn record(
        &mut self,
        brand_voice: &str,
        content_request: &str,
        generated_content: &str,
    ) -> Result<&HistoryItem> {
        let id = HistoryId::next_after(self.latest().map(|item| item.id))
            .ok_or_else(|| Error::custom("No history id is available after the newest session"))?;
        self.append(HistoryItem::new(
            id,
            brand_voice,
            content_request,
            generated_content,
        ))?;
        Ok(&self.items[0])
    }

    /// Empty the history and delete the durable copy
    pub fn clear(&mut self) -> Result<()> {
        self.storage.delete(HISTORY_KEY)?;
        self.items.clear();
        info!("history cleared");
        Ok(())
    }

    /// Find the item with the given id
    pub fn load(&self, id: HistoryId) -> Option<&HistoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// All items, most recent first
    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    /// The most recent item
    pub fn latest(&self) -> Option<&HistoryItem> {
        self.items.first()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The backing storage
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Mutable access to the backing storage for unrelated keys
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Give back the backing storage
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn commit(&mut self, items: Vec<HistoryItem>) -> Result<()> {
        let encoded = encode_history(&items)?;
        self.storage.write(HISTORY_KEY, &encoded)?;
        self.items = items;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStorage;

    fn item(n: i64) -> HistoryItem {
        HistoryItem::new(
            HistoryId::new(n),
            format!("voice {}", n),
            format!("request {}", n),
            format!("**content {}**", n),
        )
    }

    fn ids<S: Storage>(store: &HistoryStore<S>) -> Vec<i64> {
        store.items().iter().map(|i| i.id.as_i64()).collect()
    }

    fn durable_ids(storage: &MemoryStorage) -> Vec<i64> {
        let raw = storage.read(HISTORY_KEY).unwrap().unwrap();
        decode_history(&raw)
            .unwrap()
            .iter()
            .map(|i| i.id.as_i64())
            .collect()
    }

    /// Storage whose writes always fail
    struct ReadOnlyStorage(MemoryStorage);

    impl Storage for ReadOnlyStorage {
        fn read(&self, key: &str) -> Result<Option<String>> {
            self.0.read(key)
        }
        fn write(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::custom("read-only"))
        }
        fn delete(&mut self, key: &str) -> Result<()> {
            self.0.delete(key)
        }
        fn name(&self) -> &'static str {
            "read-only"
        }
    }

    #[test]
    fn test_initialize_without_durable_copy() {
        let store = HistoryStore::initialize(MemoryStorage::new()).unwrap();
        assert!(store.is_empty());
        assert!(!store.storage().contains(HISTORY_KEY));
    }

    #[test]
    fn test_append_order_most_recent_first() {
        let mut store = HistoryStore::initialize(MemoryStorage::new()).unwrap();
        store.append(item(1)).unwrap();
        store.append(item(2)).unwrap();
        store.append(item(3)).unwrap();

        assert_eq!(ids(&store), vec![3, 2, 1]);
        assert_eq!(durable_ids(store.storage()), vec![3, 2, 1]);
    }

    #[test]
    fn test_capacity_evicts_oldest_first() {
        let mut store = HistoryStore::initialize(MemoryStorage::new()).unwrap();
        for n in 1..=3 {
            store.append(item(n)).unwrap();
        }
        for n in 4..=21 {
            store.append(item(n)).unwrap();
        }

        assert_eq!(store.len(), HISTORY_CAPACITY);
        assert_eq!(store.latest().unwrap().id.as_i64(), 21);
        assert!(store.load(HistoryId::new(1)).is_none());
        assert!(store.load(HistoryId::new(2)).is_some());

        store.append(item(22)).unwrap();
        assert!(store.load(HistoryId::new(2)).is_none());
        assert_eq!(ids(&store), (3..=22).rev().collect::<Vec<_>>());
        assert_eq!(durable_ids(store.storage()), ids(&store));
    }

    #[test]
    fn test_n_appends_keep_last_min_n_capacity() {
        for n in [0usize, 1, 19, 20, 21, 45] {
            let mut store = HistoryStore::initialize(MemoryStorage::new()).unwrap();
            for i in 0..n {
                store.append(item(i as i64)).unwrap();
            }
            let expected: Vec<i64> = (0..n as i64)
                .rev()
                .take(n.min(HISTORY_CAPACITY))
                .collect();
            assert_eq!(ids(&store), expected, "after {} appends", n);
        }
    }

    #[test]
    fn test_round_trip_through_durable_copy() {
        let mut store = HistoryStore::initialize(MemoryStorage::new()).unwrap();
        store.append(item(10)).unwrap();
        store
            .append(HistoryItem::new(
                HistoryId::new(11),
                "Voice with \"quotes\" and\nnewlines",
                "Request ✓",
                "# Title\n\n- a\n- b",
            ))
            .unwrap();
        let before = store.items().to_vec();

        let storage = store.into_storage();
        let reloaded = HistoryStore::initialize(storage).unwrap();
        assert_eq!(reloaded.items(), before.as_slice());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut store = HistoryStore::initialize(MemoryStorage::new()).unwrap();
        store.append(item(1)).unwrap();

        store.clear().unwrap();
        assert!(store.is_empty());
        assert!(!store.storage().contains(HISTORY_KEY));

        store.clear().unwrap();
        assert!(store.is_empty());
        assert!(!store.storage().contains(HISTORY_KEY));
    }

    #[test]
    fn test_corrupt_copy_is_discarded() {
        let mut storage = MemoryStorage::new();
        storage.write(HISTORY_KEY, "{not json").unwrap();

        let store = HistoryStore::initialize(storage).unwrap();
        assert!(store.is_empty());
        assert!(!store.storage().contains(HISTORY_KEY));
    }

    #[test]
    fn test_schema_mismatch_is_corruption() {
        let cases = [
            r#"{"id":1}"#,
            r#"[{"id":1,"brandVoice":"v","contentRequest":"r"}]"#,
            r#"[{"id":"1","brandVoice":"v","contentRequest":"r","generatedContent":"c"}]"#,
            r#"[{"id":1,"brandVoice":"v","contentRequest":"r","generatedContent":"c","extra":true}]"#,
            "",
        ];
        for raw in cases {
            let mut storage = MemoryStorage::new();
            storage.write(HISTORY_KEY, raw).unwrap();
            let store = HistoryStore::initialize(storage).unwrap();
            assert!(store.is_empty(), "accepted {:?}", raw);
            assert!(!store.storage().contains(HISTORY_KEY));
        }
    }

    #[test]
    fn test_decodes_camel_case_records() {
        let raw = r#"[{"id":1700000000000,"brandVoice":"Playful","contentRequest":"A tweet","generatedContent":"Hi!"}]"#;
        let mut storage = MemoryStorage::new();
        storage.write(HISTORY_KEY, raw).unwrap();

        let store = HistoryStore::initialize(storage).unwrap();
        let loaded = store.load(HistoryId::new(1_700_000_000_000)).unwrap();
        assert_eq!(loaded.brand_voice, "Playful");
        assert_eq!(loaded.content_request, "A tweet");
        assert_eq!(loaded.generated_content, "Hi!");
    }

    #[test]
    fn test_over_capacity_copy_is_truncated() {
        let items: Vec<HistoryItem> = (0..25).rev().map(item).collect();
        let mut storage = MemoryStorage::new();
        storage
            .write(HISTORY_KEY, &encode_history(&items).unwrap())
            .unwrap();

        let store = HistoryStore::initialize(storage).unwrap();
        assert_eq!(store.len(), HISTORY_CAPACITY);
        assert_eq!(store.latest().unwrap().id.as_i64(), 24);
        assert_eq!(durable_ids(store.storage()), ids(&store));
    }

    #[test]
    fn test_load_returns_exact_triple_without_reordering() {
        let mut store = HistoryStore::initialize(MemoryStorage::new()).unwrap();
        store.append(item(1)).unwrap();
        store.append(item(2)).unwrap();

        let loaded = store.load(HistoryId::new(1)).unwrap().clone();
        assert_eq!(loaded.brand_voice, "voice 1");
        assert_eq!(loaded.content_request, "request 1");
        assert_eq!(loaded.generated_content, "**content 1**");
        assert_eq!(ids(&store), vec![2, 1]);
        assert!(store.load(HistoryId::new(99)).is_none());
    }

    #[test]
    fn test_failed_write_keeps_memory_unchanged() {
        let mut seed = MemoryStorage::new();
        seed.write(HISTORY_KEY, &encode_history(&[item(1)]).unwrap())
            .unwrap();

        let mut store = HistoryStore::initialize(ReadOnlyStorage(seed)).unwrap();
        assert!(store.append(item(2)).is_err());
        assert_eq!(ids(&store), vec![1]);
    }

    #[test]
    fn test_record_assigns_unique_ids() {
        let mut store = HistoryStore::initialize(MemoryStorage::new()).unwrap();
        let first = store.record("v", "r", "one").unwrap().id;
        let second = store.record("v", "r", "two").unwrap().id;
        let third = store.record("v", "r", "three").unwrap().id;

        assert!(second > first);
        assert!(third > second);
        assert_eq!(store.latest().unwrap().generated_content, "three");
    }

    #[test]
    fn test_unrepresentable_id_is_corruption() {
        let raw = r#"[{"id":9223372036854775807,"brandVoice":"v","contentRequest":"r","generatedContent":"c"}]"#;
        let mut storage = MemoryStorage::new();
        storage.write(HISTORY_KEY, raw).unwrap();

        let mut store = HistoryStore::initialize(storage).unwrap();
        assert!(store.is_empty());
        assert!(!store.storage().contains(HISTORY_KEY));

        let id = store.record("v", "r", "c").unwrap().id;
        assert!(id.timestamp().is_some());
    }

    #[test]
    fn test_preview_strips_tags() {
        let text = "<p>Hello <b>world</b></p>\n\n<br/>Second   line";
        assert_eq!(preview_text(text, 100), "Hello world Second line");
    }

    #[test]
    fn test_preview_unterminated_tag() {
        assert_eq!(preview_text("Intro <span class=", 100), "Intro");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let entry = HistoryItem::new(HistoryId::new(1), "v", "r", "ééééé");
        assert_eq!(entry.preview(3), "ééé…");
        assert_eq!(entry.preview(5), "ééééé");
    }
}
