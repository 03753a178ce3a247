//! Document assembler
//!
//!     The entry point for both directions.
//!
//!     Render: every block is rendered in order and the fragments are concatenated with no
//!     separator. The result is the HTML string the application stores as "content".
//!
//!     Parse: the HTML is parsed into a tree, its top-level nodes are classified into blocks, and
//!     the resulting document is stamped with fresh block ids, the current time and the schema
//!     version.
//!
//!     Neither direction keeps state between calls; a [`Converter`] is just its options and can
//!     be shared freely across threads.

use crate::error::ConvertError;
use crate::formats::html::{parser, serializer};
use crate::model::{Block, BlockDocument};
use crate::options::ConvertOptions;
use log::trace;
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Converts block documents to HTML and back.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Converter { options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Render a document to HTML. Never fails; degraded blocks render degraded fragments.
    pub fn render(&self, doc: &BlockDocument) -> String {
        let mut out = String::new();
        for block in &doc.blocks {
            serializer::write_block(&mut out, &block.data, &self.options);
        }
        out
    }

    /// Render the editor's JSON directly. Fails only if the JSON is not a block document.
    pub fn render_json(&self, source: &str) -> Result<String, ConvertError> {
        let doc: BlockDocument = serde_json::from_str(source)?;
        Ok(self.render(&doc))
    }

    /// Parse HTML into a document with random block ids.
    pub fn parse(&self, html: &str) -> BlockDocument {
        let mut ids = RandomIds::new(self.options.id_length);
        self.parse_with_ids(html, &mut ids)
    }

    /// Parse HTML, drawing block ids from `ids`.
    pub fn parse_with_ids(&self, html: &str, ids: &mut impl IdSource) -> BlockDocument {
        let mut blocks: Vec<Block> = parser::parse_blocks(html, &self.options)
            .into_iter()
            .map(|data| Block::new(ids.next_id(), data))
            .collect();
        stamp_ids(&mut blocks, ids);
        trace!("parsed {} blocks", blocks.len());

        BlockDocument {
            time: now_millis(),
            version: self.options.version.clone(),
            blocks,
        }
    }

    /// Parse raw bytes. Fails only if they are not UTF-8.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<BlockDocument, ConvertError> {
        let html = std::str::from_utf8(bytes)?;
        Ok(self.parse(html))
    }
}

/// Source of block ids.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Random ids: a prefix of the hex form of a v4 UUID.
#[derive(Debug, Clone)]
pub struct RandomIds {
    length: usize,
}

impl RandomIds {
    pub fn new(length: usize) -> Self {
        RandomIds {
            length: length.clamp(1, 32),
        }
    }
}

impl Default for RandomIds {
    fn default() -> Self {
        Self::new(ConvertOptions::default().id_length)
    }
}

impl IdSource for RandomIds {
    fn next_id(&mut self) -> String {
        let hex = Uuid::new_v4().simple().to_string();
        hex[..self.length].to_string()
    }
}

/// Predictable ids (`{prefix}{n}`), for tests and reproducible output.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: usize,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        SequentialIds {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Give every block without an id, or with an id already used earlier in the list, a fresh one.
pub(crate) fn stamp_ids(blocks: &mut [Block], ids: &mut (impl IdSource + ?Sized)) {
    let mut taken: HashSet<String> = blocks
        .iter()
        .filter(|block| !block.id.is_empty())
        .map(|block| block.id.clone())
        .collect();
    let mut seen = HashSet::new();

    for block in blocks.iter_mut() {
        if block.id.is_empty() || !seen.insert(block.id.clone()) {
            let id = fresh_id(ids, &taken);
            taken.insert(id.clone());
            seen.insert(id.clone());
            block.id = id;
        }
    }
}

fn fresh_id(ids: &mut (impl IdSource + ?Sized), taken: &HashSet<String>) -> String {
    const ATTEMPTS: usize = 16;

    let mut candidate = ids.next_id();
    for _ in 0..ATTEMPTS {
        if !taken.contains(&candidate) {
            return candidate;
        }
        candidate = ids.next_id();
    }

    let mut suffix = 1;
    while taken.contains(&format!("{}-{}", candidate, suffix)) {
        suffix += 1;
    }
    format!("{}-{}", candidate, suffix)
}

/// Current time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or_default()
}
