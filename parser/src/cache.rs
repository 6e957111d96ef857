//! @ai:module:intent Share parsed annotation tables between identical doc comments
//! @ai:module:layer infrastructure
//! @ai:module:public_api AnnotationCache
//! @ai:module:depends_on parser, source, table
//! @ai:module:thread_safe true

use crate::error::Result;
use crate::parser::{parse_annotations, parse_annotations_strict};
use crate::source::CommentSource;
use crate::table::AnnotationTable;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::sync::{Arc, LazyLock};

static EMPTY_TABLE: LazyLock<Arc<AnnotationTable>> = LazyLock::new(|| Arc::new(AnnotationTable::new()));

type ContentKey = [u8; 32];

/// @ai:intent Insert-if-absent cache of parsed tables keyed by comment content hash
/// @ai:invariant each distinct normalized text is parsed at most once while it stays cached
/// @ai:invariant readers only ever see fully built tables
#[derive(Debug, Default)]
pub struct AnnotationCache {
    entries: DashMap<ContentKey, Arc<AnnotationTable>>,
}

impl AnnotationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Annotations of a comment source, parsed once per distinct comment
    /// @ai:post absent comment => shared empty table
    /// @ai:effects cache:write
    pub fn get<S: CommentSource + ?Sized>(&self, source: &S) -> Result<Arc<AnnotationTable>> {
        Ok(match source.doc_comment()? {
            Some(doc) => self.get_text(&doc),
            None => Arc::clone(&EMPTY_TABLE),
        })
    }

    /// @ai:intent Annotations of raw doc comment text, parsed once per distinct text
    /// @ai:effects cache:write
    pub fn get_text(&self, doc: &str) -> Arc<AnnotationTable> {
        let doc = normalize(doc);
        if doc.is_empty() {
            return Arc::clone(&EMPTY_TABLE);
        }

        // The entry guard holds the shard lock, so concurrent callers with the
        // same text wait for this parse instead of starting their own.
        let entry = self
            .entries
            .entry(content_key(doc))
            .or_insert_with(|| Arc::new(parse_annotations(doc)));
        Arc::clone(entry.value())
    }

    /// @ai:intent Strict lookup: an undecodable embedded value is an error and is not cached
    /// @ai:effects cache:write
    pub fn get_text_strict(&self, doc: &str) -> Result<Arc<AnnotationTable>> {
        let doc = normalize(doc);
        if doc.is_empty() {
            return Ok(Arc::clone(&EMPTY_TABLE));
        }

        let key = content_key(doc);
        if let Some(hit) = self.entries.get(&key) {
            if hit.invalid_values().is_empty() {
                return Ok(Arc::clone(hit.value()));
            }
        }

        let table = Arc::new(parse_annotations_strict(doc)?);
        let entry = self.entries.entry(key).or_insert(table);
        Ok(Arc::clone(entry.value()))
    }

    /// Strict counterpart of [`AnnotationCache::get`].
    pub fn get_strict<S: CommentSource + ?Sized>(&self, source: &S) -> Result<Arc<AnnotationTable>> {
        match source.doc_comment()? {
            Some(doc) => self.get_text_strict(&doc),
            None => Ok(Arc::clone(&EMPTY_TABLE)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

/// Trailing whitespace only; leading lines count toward reported line numbers.
fn normalize(doc: &str) -> &str {
    doc.trim_end()
}

fn content_key(doc: &str) -> ContentKey {
    Sha256::digest(doc.as_bytes()).into()
}
