//! Block document model
//!
//!     The editor's native save format: a document is an ordered list of typed blocks plus
//!     provenance metadata. Block order is significant and is preserved by every conversion.
//!
//!     | type      | data                                          |
//!     |-----------|-----------------------------------------------|
//!     | paragraph | `{text}`                                      |
//!     | header    | `{text, level}`                               |
//!     | list      | `{style, items: [{content, items?, style?}]}` |
//!     | image     | `{url, caption?, alt?}`                       |
//!     | quote     | `{text, caption?}`                            |
//!     | code      | `{code, language?}`                           |
//!     | delimiter | `{}`                                          |
//!     | table     | `{withHeadings?, content: [[cell]]}`          |
//!     | raw       | `{html}`                                      |
//!
//!     Blocks whose type is known but whose data does not fit are kept as
//!     [`BlockData::Malformed`]; blocks of any other type are kept as [`BlockData::Unknown`].
//!     Both carry their original JSON so nothing is lost on a load/save cycle.

mod wire;

pub use wire::classify;

use crate::error::ConvertError;
use crate::inline::RichText;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Schema version of the block format this crate reads and writes.
pub const SCHEMA_VERSION: &str = "2.31.0";

fn default_version() -> String {
    SCHEMA_VERSION.to_string()
}

/// An ordered list of blocks plus provenance metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDocument {
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub time: i64,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Default for BlockDocument {
    fn default() -> Self {
        BlockDocument {
            time: 0,
            version: default_version(),
            blocks: Vec::new(),
        }
    }
}

impl BlockDocument {
    /// A fresh, empty document stamped with the current time.
    pub fn new() -> Self {
        BlockDocument {
            time: crate::assembler::now_millis(),
            ..Default::default()
        }
    }

    pub fn with_blocks(blocks: Vec<Block>) -> Self {
        BlockDocument {
            blocks,
            ..Self::new()
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Block kinds in document order, `None` for unknown types.
    pub fn kinds(&self) -> Vec<Option<BlockKind>> {
        self.blocks.iter().map(Block::kind).collect()
    }

    /// Load a document from the editor's JSON. Missing or duplicate block ids are replaced.
    pub fn from_json(source: &str) -> Result<Self, ConvertError> {
        let mut doc: BlockDocument = serde_json::from_str(source)?;
        crate::assembler::stamp_ids(&mut doc.blocks, &mut crate::assembler::RandomIds::default());
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String, ConvertError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConvertError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One structural unit of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "wire::RawBlock", into = "wire::RawBlock")]
pub struct Block {
    /// Unique within the document; empty until stamped.
    pub id: String,
    pub data: BlockData,
}

impl Block {
    pub fn new(id: impl Into<String>, data: BlockData) -> Self {
        Block {
            id: id.into(),
            data,
        }
    }

    /// A block without an id; one is assigned when the document is assembled.
    pub fn anonymous(data: BlockData) -> Self {
        Self::new(String::new(), data)
    }

    pub fn kind(&self) -> Option<BlockKind> {
        self.data.kind()
    }

    /// The `type` string this block carries on the wire.
    pub fn type_name(&self) -> &str {
        self.data.type_name()
    }
}

/// The closed set of block types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Paragraph,
    Header,
    List,
    Image,
    Quote,
    Code,
    Delimiter,
    Table,
    Raw,
}

impl BlockKind {
    pub const ALL: [BlockKind; 9] = [
        BlockKind::Paragraph,
        BlockKind::Header,
        BlockKind::List,
        BlockKind::Image,
        BlockKind::Quote,
        BlockKind::Code,
        BlockKind::Delimiter,
        BlockKind::Table,
        BlockKind::Raw,
    ];

    pub fn type_name(self) -> &'static str {
        match self {
            BlockKind::Paragraph => "paragraph",
            BlockKind::Header => "header",
            BlockKind::List => "list",
            BlockKind::Image => "image",
            BlockKind::Quote => "quote",
            BlockKind::Code => "code",
            BlockKind::Delimiter => "delimiter",
            BlockKind::Table => "table",
            BlockKind::Raw => "raw",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_name() == name)
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Typed block payload.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockData {
    Paragraph(Paragraph),
    Header(Header),
    List(List),
    Image(Image),
    Quote(Quote),
    Code(Code),
    Delimiter,
    Table(Table),
    Raw(Raw),
    /// Known type whose data did not deserialize; `data` is the original JSON.
    Malformed { kind: BlockKind, data: Value },
    /// Type outside the closed set, kept verbatim.
    Unknown { type_name: String, data: Value },
}

impl BlockData {
    pub fn kind(&self) -> Option<BlockKind> {
        match self {
            BlockData::Paragraph(_) => Some(BlockKind::Paragraph),
            BlockData::Header(_) => Some(BlockKind::Header),
            BlockData::List(_) => Some(BlockKind::List),
            BlockData::Image(_) => Some(BlockKind::Image),
            BlockData::Quote(_) => Some(BlockKind::Quote),
            BlockData::Code(_) => Some(BlockKind::Code),
            BlockData::Delimiter => Some(BlockKind::Delimiter),
            BlockData::Table(_) => Some(BlockKind::Table),
            BlockData::Raw(_) => Some(BlockKind::Raw),
            BlockData::Malformed { kind, .. } => Some(*kind),
            BlockData::Unknown { .. } => None,
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            BlockData::Unknown { type_name, .. } => type_name.as_str(),
            other => other.kind().map_or("", BlockKind::type_name),
        }
    }

    pub fn paragraph(text: impl Into<RichText>) -> Self {
        BlockData::Paragraph(Paragraph { text: text.into() })
    }

    pub fn header(level: u8, text: impl Into<RichText>) -> Self {
        BlockData::Header(Header {
            text: text.into(),
            level,
        })
    }

    pub fn raw(html: impl Into<String>) -> Self {
        BlockData::Raw(Raw { html: html.into() })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: RichText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub text: RichText,
    /// Clamped to 1..=6 when rendered. Any JSON integer is accepted and clamped on load.
    #[serde(deserialize_with = "wire::clamped_level")]
    pub level: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    Ordered,
    #[default]
    Unordered,
}

impl ListStyle {
    pub fn tag(self) -> &'static str {
        match self {
            ListStyle::Ordered => "ol",
            ListStyle::Unordered => "ul",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ol" => Some(ListStyle::Ordered),
            "ul" => Some(ListStyle::Unordered),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct List {
    #[serde(default)]
    pub style: ListStyle,
    pub items: Vec<ListItem>,
}

/// A list entry. A non-empty `items` is the nested list under this entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "wire::ListItemRepr")]
pub struct ListItem {
    pub content: RichText,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ListItem>,
    /// Style of the nested list when it differs from the parent's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ListStyle>,
}

impl ListItem {
    pub fn new(content: impl Into<RichText>) -> Self {
        ListItem {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_children(mut self, style: Option<ListStyle>, items: Vec<ListItem>) -> Self {
        self.style = style;
        self.items = items;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<RichText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub text: RichText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<RichText>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Code {
    #[serde(alias = "text")]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default)]
    pub with_headings: bool,
    pub content: Vec<Vec<RichText>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Raw {
    pub html: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::{InlineRun, Mark};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn block(value: Value) -> Block {
        serde_json::from_value(value).expect("block to deserialize")
    }

    #[test]
    fn kinds_round_trip_through_type_names() {
        for kind in BlockKind::ALL {
            assert_eq!(BlockKind::from_type_name(kind.type_name()), Some(kind));
        }
        assert_eq!(BlockKind::from_type_name("embed"), None);
    }

    #[rstest]
    #[case(json!(300), 6)]
    #[case(json!(-1), 1)]
    #[case(json!(0), 1)]
    #[case(json!(u64::MAX), 6)]
    #[case(json!(4), 4)]
    fn header_level_is_clamped_on_load(#[case] level: Value, #[case] expected: u8) {
        let block = block(json!({"type": "header", "data": {"text": "Hello", "level": level}}));
        assert_eq!(block.data, BlockData::header(expected, "Hello"));
    }

    #[test]
    fn fractional_header_level_is_malformed() {
        let block = block(json!({"type": "header", "data": {"text": "Hello", "level": 2.5}}));
        assert!(matches!(block.data, BlockData::Malformed { kind: BlockKind::Header, .. }));
    }

    #[test]
    fn header_block_from_json() {
        let block = block(json!({"id": "h", "type": "header", "data": {"text": "Hello", "level": 2}}));
        assert_eq!(block.id, "h");
        assert_eq!(block.data, BlockData::header(2, "Hello"));
    }

    #[test]
    fn paragraph_with_runs() {
        let block = block(json!({
            "type": "paragraph",
            "data": {"text": [{"text": "bold", "marks": ["bold"]}]}
        }));
        assert_eq!(block.id, "");
        assert_eq!(
            block.data,
            BlockData::Paragraph(Paragraph {
                text: RichText::from_runs(vec![InlineRun::new("bold", vec![Mark::Bold])]),
            })
        );
    }

    #[test]
    fn legacy_string_list_items() {
        let block = block(json!({"type": "list", "data": {"style": "ordered", "items": ["A", "B"]}}));
        match block.data {
            BlockData::List(list) => {
                assert_eq!(list.style, ListStyle::Ordered);
                let texts: Vec<_> = list.items.iter().map(|i| i.content.plain_text()).collect();
                assert_eq!(texts, vec!["A", "B"]);
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn nested_list_items() {
        let block = block(json!({"type": "list", "data": {"style": "unordered", "items": [
            {"content": "A", "items": [{"content": "A.1"}], "style": "ordered"}
        ]}}));
        let BlockData::List(list) = block.data else {
            panic!("expected list");
        };
        assert_eq!(list.items[0].style, Some(ListStyle::Ordered));
        assert_eq!(list.items[0].items[0].content.plain_text(), "A.1");
    }

    #[test]
    fn code_accepts_text_alias() {
        let block = block(json!({"type": "code", "data": {"text": "x = 1", "language": "py"}}));
        assert_eq!(
            block.data,
            BlockData::Code(Code {
                code: "x = 1".into(),
                language: Some("py".into()),
            })
        );
    }

    #[test]
    fn missing_required_field_is_malformed() {
        let data = json!({"caption": "no url"});
        let block = block(json!({"type": "image", "data": data.clone()}));
        assert_eq!(
            block.data,
            BlockData::Malformed {
                kind: BlockKind::Image,
                data,
            }
        );
    }

    #[test]
    fn unknown_type_is_kept() {
        let data = json!({"service": "youtube", "embed": "https://youtube.com/embed/x"});
        let block = block(json!({"id": "e", "type": "embed", "data": data.clone()}));
        assert_eq!(block.type_name(), "embed");
        assert_eq!(
            block.data,
            BlockData::Unknown {
                type_name: "embed".into(),
                data,
            }
        );
    }

    #[test]
    fn unknown_and_malformed_serialize_verbatim() {
        let original = json!({"id": "e", "type": "embed", "data": {"a": [1, 2]}});
        let block = block(original.clone());
        assert_eq!(serde_json::to_value(&block).unwrap(), original);

        let original = json!({"id": "m", "type": "header", "data": {"level": "big"}});
        let block = self::block(original.clone());
        assert_eq!(serde_json::to_value(&block).unwrap(), original);
    }

    #[test]
    fn typed_blocks_serialize_with_type_and_data() {
        let block = Block::new("d", BlockData::Delimiter);
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({"id": "d", "type": "delimiter", "data": {}})
        );
    }

    #[test]
    fn document_defaults() {
        let doc: BlockDocument = serde_json::from_str(r#"{"blocks": []}"#).unwrap();
        assert_eq!(doc.time, 0);
        assert_eq!(doc.version, SCHEMA_VERSION);
        assert!(doc.is_empty());
    }

    #[test]
    fn from_json_assigns_missing_ids() {
        let doc = BlockDocument::from_json(
            r#"{"blocks": [{"type": "delimiter"}, {"id": "x", "type": "delimiter"}, {"id": "x", "type": "delimiter"}]}"#,
        )
        .unwrap();
        assert!(!doc.blocks[0].id.is_empty());
        assert_eq!(doc.blocks[1].id, "x");
        assert_ne!(doc.blocks[2].id, "x");
    }

    #[test]
    fn from_json_rejects_non_documents() {
        assert!(BlockDocument::from_json("not json").is_err());
        assert!(BlockDocument::from_json(r#"{"blocks": 3}"#).is_err());
    }
}
