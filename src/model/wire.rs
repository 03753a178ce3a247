//! JSON wire shapes and block classification
//!
//! Blocks travel as `{id, type, data}` with an untyped `data` object. Classification turns that
//! into [`BlockData`] without ever failing: a known type with bad data becomes
//! [`BlockData::Malformed`], an unknown type becomes [`BlockData::Unknown`].

use super::{Block, BlockData, BlockKind, ListItem, ListStyle};
use crate::inline::RichText;
use log::debug;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RawBlock {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    id: String,
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    data: Value,
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        Block {
            id: raw.id,
            data: classify(&raw.block_type, raw.data),
        }
    }
}

impl From<Block> for RawBlock {
    fn from(block: Block) -> Self {
        let block_type = block.type_name().to_string();
        RawBlock {
            id: block.id,
            block_type,
            data: data_to_value(block.data),
        }
    }
}

/// Header level from any JSON integer, clamped to 1..=6.
pub(super) fn clamped_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let number = Number::deserialize(deserializer)?;
    let level = match (number.as_i64(), number.as_u64()) {
        (Some(level), _) => level.clamp(1, 6),
        (None, Some(_)) => 6,
        _ => {
            return Err(de::Error::custom(format!(
                "header level {} is not an integer",
                number
            )))
        }
    };
    Ok(level as u8)
}

/// Classify a `type` name and its JSON data into a typed payload.
pub fn classify(type_name: &str, data: Value) -> BlockData {
    match BlockKind::from_type_name(type_name) {
        Some(kind) => classify_known(kind, data),
        None => {
            debug!("keeping block of unknown type '{}' verbatim", type_name);
            BlockData::Unknown {
                type_name: type_name.to_string(),
                data,
            }
        }
    }
}

fn classify_known(kind: BlockKind, data: Value) -> BlockData {
    let parsed = match kind {
        BlockKind::Paragraph => Deserialize::deserialize(&data).map(BlockData::Paragraph),
        BlockKind::Header => Deserialize::deserialize(&data).map(BlockData::Header),
        BlockKind::List => Deserialize::deserialize(&data).map(BlockData::List),
        BlockKind::Image => Deserialize::deserialize(&data).map(BlockData::Image),
        BlockKind::Quote => Deserialize::deserialize(&data).map(BlockData::Quote),
        BlockKind::Code => Deserialize::deserialize(&data).map(BlockData::Code),
        BlockKind::Delimiter => Ok(BlockData::Delimiter),
        BlockKind::Table => Deserialize::deserialize(&data).map(BlockData::Table),
        BlockKind::Raw => Deserialize::deserialize(&data).map(BlockData::Raw),
    };

    parsed.unwrap_or_else(|err| {
        debug!("malformed {} block data: {}", kind, err);
        BlockData::Malformed { kind, data }
    })
}

fn data_to_value(data: BlockData) -> Value {
    let value = match data {
        BlockData::Paragraph(p) => serde_json::to_value(p),
        BlockData::Header(h) => serde_json::to_value(h),
        BlockData::List(l) => serde_json::to_value(l),
        BlockData::Image(i) => serde_json::to_value(i),
        BlockData::Quote(q) => serde_json::to_value(q),
        BlockData::Code(c) => serde_json::to_value(c),
        BlockData::Delimiter => Ok(Value::Object(Map::new())),
        BlockData::Table(t) => serde_json::to_value(t),
        BlockData::Raw(r) => serde_json::to_value(r),
        BlockData::Malformed { data, .. } | BlockData::Unknown { data, .. } => Ok(data),
    };
    // Plain structs with string keys always serialize
    value.unwrap_or_default()
}

/// List items are either full objects or, in older documents, bare strings.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum ListItemRepr {
    Full {
        content: RichText,
        #[serde(default)]
        items: Vec<ListItem>,
        #[serde(default)]
        style: Option<ListStyle>,
    },
    Text(RichText),
}

impl From<ListItemRepr> for ListItem {
    fn from(repr: ListItemRepr) -> Self {
        match repr {
            ListItemRepr::Full {
                content,
                items,
                style,
            } => ListItem {
                content,
                items,
                style,
            },
            ListItemRepr::Text(content) => ListItem::new(content),
        }
    }
}
