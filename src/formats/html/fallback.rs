//! Fallback for content outside the closed block set
//!
//! HTML the parser cannot classify is kept as a `raw` block holding the node's outer HTML.
//! Blocks of unknown type render either their `data.html` string or an envelope element that
//! carries the type and the JSON data as attributes, so a later parse restores the block.

use crate::dom;
use crate::escape::escape;
use crate::model::{classify, BlockData};
use log::debug;
use markup5ever_rcdom::Handle;
use serde_json::Value;

/// Attribute carrying the block type on an envelope element.
pub const TYPE_ATTR: &str = "data-block-type";
/// Attribute carrying the block data as JSON on an envelope element.
pub const DATA_ATTR: &str = "data-block-data";

/// Keep a node verbatim as a raw block.
pub(crate) fn raw_block(node: &Handle) -> BlockData {
    let html = dom::outer_html(node);
    debug!(
        "keeping <{}> as raw html",
        dom::tag_name(node).unwrap_or("#node")
    );
    BlockData::raw(html)
}

/// Keep a run of sibling nodes verbatim as one raw block.
///
/// Whitespace-only text at either end is left out.
pub(crate) fn raw_group(nodes: &[Handle]) -> BlockData {
    let start = nodes
        .iter()
        .position(|node| !dom::is_whitespace_text(node))
        .unwrap_or(nodes.len());
    let end = nodes
        .iter()
        .rposition(|node| !dom::is_whitespace_text(node))
        .map_or(start, |last| last + 1);

    debug!("keeping {} loose inline nodes as raw html", end - start);
    BlockData::raw(nodes[start..end].iter().map(dom::outer_html).collect::<String>())
}

/// Render a block of unknown type.
pub(crate) fn render_unknown(type_name: &str, data: &Value) -> String {
    if let Some(html) = data.get("html").and_then(Value::as_str) {
        return html.to_string();
    }

    debug!("enveloping block of unknown type '{}'", type_name);
    format!(
        r#"<div {}="{}" {}="{}"></div>"#,
        TYPE_ATTR,
        escape(type_name),
        DATA_ATTR,
        escape(&data.to_string())
    )
}

/// Restore a block from its envelope element, if the node is one.
pub(crate) fn decode_envelope(node: &Handle) -> Option<BlockData> {
    if !dom::is_element(node, "div") {
        return None;
    }
    // Present but blank still marks an envelope: unknown types may be named "".
    let type_name = dom::attr(node, TYPE_ATTR)?;
    let data = dom::attr(node, DATA_ATTR)
        .and_then(|json| match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(err) => {
                debug!("envelope for '{}' has unreadable data: {}", type_name, err);
                None
            }
        })
        .unwrap_or(Value::Null);
    Some(classify(&type_name, data))
}
