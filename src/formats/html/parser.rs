//! HTML → blocks
//!
//!     The source is parsed with html5ever's tree builder, which accepts any input, and the
//!     top-level nodes are classified one by one in source order:
//!
//!     - elements are looked up in [`BLOCK_RULES`]; a rule may decline a node it cannot map
//!       cleanly (a `figure` without an image, say), and declined or unlisted elements are kept
//!       as `raw` blocks holding their outer HTML
//!     - envelope `div`s written for unknown block types are restored to those blocks
//!     - loose text and inline mark tags between blocks are gathered into a paragraph
//!     - text-bearing blocks (paragraph, header, quote, list, table) are declined when they hold
//!       content inline text cannot carry, such as an image or a nested table; the same goes for
//!       loose inline content, which is then kept as one `raw` block
//!     - comments become `raw` blocks
//!     - `script`, `style`, `template` and `noscript` are dropped, or kept as `raw` when
//!       stripping is turned off

use super::fallback;
use crate::dom;
use crate::inline::{decode_children, decode_nodes, MarkKind, RichText, BREAK_TAG, STRIPPED_TAGS};
use crate::model::{BlockData, Code, Header, Image, List, ListItem, ListStyle, Paragraph, Quote, Table};
use crate::options::ConvertOptions;
use log::trace;
use markup5ever_rcdom::{Handle, NodeData};
use once_cell::sync::Lazy;
use regex::Regex;

/// Maps an element to a block, or declines it.
type Rule = fn(&Handle) -> Option<BlockData>;

/// Tag names handled by each block rule.
pub(crate) const BLOCK_RULES: &[(&[&str], Rule)] = &[
    (&["h1", "h2", "h3", "h4", "h5", "h6"], parse_header),
    (&["p"], parse_paragraph),
    (&["ul", "ol"], parse_list),
    (&["blockquote"], parse_quote),
    (&["pre"], parse_code),
    (&["hr"], parse_delimiter),
    (&["table"], parse_table),
    (&["figure"], parse_figure),
    (&["img"], parse_image),
];

const CAPTION_TAGS: &[&str] = &["cite", "footer", "figcaption"];
const LIST_TAGS: &[&str] = &["ul", "ol"];

/// Content that decoded text cannot carry: media, and structure beyond lines of text.
const OPAQUE_TAGS: &[&str] = &[
    "img", "picture", "video", "audio", "iframe", "object", "embed", "svg", "canvas", "ul",
    "ol", "table", "pre", "blockquote", "figure", "hr", "dl",
];

/// Nested lists deeper than this are kept as raw HTML.
const MAX_LIST_DEPTH: usize = 32;

static LANGUAGE_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)(?:language|lang)-(\S+)").unwrap());

/// Parse an HTML string into block payloads, in source order.
pub(crate) fn parse_blocks(html: &str, options: &ConvertOptions) -> Vec<BlockData> {
    if html.trim().is_empty() {
        return Vec::new();
    }

    let dom = dom::parse(html);
    let mut builder = BlockBuilder::new(options);
    for node in dom::top_level_nodes(&dom) {
        builder.push(&node);
    }
    builder.finish()
}

struct BlockBuilder<'a> {
    options: &'a ConvertOptions,
    blocks: Vec<BlockData>,
    /// Loose inline nodes waiting to become a paragraph.
    pending: Vec<Handle>,
}

impl<'a> BlockBuilder<'a> {
    fn new(options: &'a ConvertOptions) -> Self {
        BlockBuilder {
            options,
            blocks: Vec::new(),
            pending: Vec::new(),
        }
    }

    fn push(&mut self, node: &Handle) {
        match &node.data {
            NodeData::Text { .. } => self.pending.push(node.clone()),
            NodeData::Comment { .. } => {
                self.flush();
                self.blocks.push(fallback::raw_block(node));
            }
            NodeData::Element { name, .. } => {
                let tag = &*name.local;
                if STRIPPED_TAGS.contains(&tag) {
                    if self.options.strip_unsafe {
                        trace!("dropping <{}>", tag);
                    } else {
                        self.flush();
                        self.blocks.push(fallback::raw_block(node));
                    }
                    return;
                }
                if is_inline(tag) {
                    self.pending.push(node.clone());
                    return;
                }

                self.flush();
                trace!("classifying <{}>", tag);
                self.blocks.push(classify_element(node, tag));
            }
            _ => {}
        }
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.pending);
        if pending.iter().any(is_opaque) {
            self.blocks.push(fallback::raw_group(&pending));
            return;
        }
        let text = decode_nodes(pending.iter()).trimmed();
        if !text.is_empty() {
            self.blocks.push(BlockData::Paragraph(Paragraph { text }));
        }
    }

    fn finish(mut self) -> Vec<BlockData> {
        self.flush();
        self.blocks
    }
}

fn is_inline(tag: &str) -> bool {
    tag == BREAK_TAG || MarkKind::from_tag(tag).is_some()
}

/// Whether `node` is, or holds, content that decoded text would lose.
fn is_opaque(node: &Handle) -> bool {
    dom::tag_name(node).is_some_and(|tag| OPAQUE_TAGS.contains(&tag))
        || dom::has_descendant(node, OPAQUE_TAGS)
}

fn classify_element(node: &Handle, tag: &str) -> BlockData {
    if let Some(block) = fallback::decode_envelope(node) {
        return block;
    }

    BLOCK_RULES
        .iter()
        .find(|(tags, _)| tags.contains(&tag))
        .and_then(|(_, rule)| rule(node))
        .unwrap_or_else(|| fallback::raw_block(node))
}

fn parse_header(node: &Handle) -> Option<BlockData> {
    if is_opaque(node) {
        return None;
    }
    let level = dom::tag_name(node)?.strip_prefix('h')?.parse().ok()?;
    Some(BlockData::Header(Header {
        text: decode_children(node),
        level,
    }))
}

fn parse_paragraph(node: &Handle) -> Option<BlockData> {
    if let Some(img) = sole_image(node) {
        return Some(image_from(&img, None));
    }
    if is_opaque(node) {
        return None;
    }
    Some(BlockData::Paragraph(Paragraph {
        text: decode_children(node),
    }))
}

/// The only content of `node`, if that is a single `img`.
fn sole_image(node: &Handle) -> Option<Handle> {
    let children = node.children.borrow();
    let mut meaningful = children.iter().filter(|child| !dom::is_whitespace_text(child));
    let first = meaningful.next()?;
    if meaningful.next().is_some() || !dom::is_element(first, "img") {
        return None;
    }
    Some(first.clone())
}

fn parse_list(node: &Handle) -> Option<BlockData> {
    let style = ListStyle::from_tag(dom::tag_name(node)?)?;
    Some(BlockData::List(List {
        style,
        items: list_items(node, 1)?,
    }))
}

fn list_items(list: &Handle, depth: usize) -> Option<Vec<ListItem>> {
    if depth > MAX_LIST_DEPTH {
        trace!("list nested deeper than {} levels", MAX_LIST_DEPTH);
        return None;
    }
    dom::children_named(list, &["li"])
        .iter()
        .map(|li| list_item(li, depth))
        .collect()
}

/// A list item; lists directly inside it become its children.
fn list_item(li: &Handle, depth: usize) -> Option<ListItem> {
    let children = li.children.borrow();
    let (nested, inline): (Vec<&Handle>, Vec<&Handle>) = children
        .iter()
        .partition(|child| dom::tag_name(child).is_some_and(|tag| LIST_TAGS.contains(&tag)));
    if inline.iter().any(|child| is_opaque(child)) {
        return None;
    }

    let mut item = ListItem::new(decode_nodes(inline).trimmed());
    for list in nested {
        if item.style.is_none() {
            item.style = dom::tag_name(list).and_then(ListStyle::from_tag);
        }
        item.items.extend(list_items(list, depth + 1)?);
    }
    Some(item)
}

fn parse_quote(node: &Handle) -> Option<BlockData> {
    let children = node.children.borrow();
    let (captions, body): (Vec<&Handle>, Vec<&Handle>) =
        children.iter().partition(|child| is_caption(child));
    if body.iter().any(|child| is_opaque(child)) {
        return None;
    }

    let caption = captions
        .first()
        .map(|cite| decode_children(cite).trimmed())
        .filter(|caption| !caption.is_empty());

    Some(BlockData::Quote(Quote {
        text: decode_nodes(body).trimmed(),
        caption,
    }))
}

fn is_caption(node: &Handle) -> bool {
    dom::tag_name(node).is_some_and(|tag| CAPTION_TAGS.contains(&tag))
}

fn parse_code(node: &Handle) -> Option<BlockData> {
    let code = dom::find_descendant(node, "code");
    let source = code.as_ref().unwrap_or(node);

    let language = code
        .as_ref()
        .and_then(language_of)
        .or_else(|| language_of(node));

    Some(BlockData::Code(Code {
        code: dom::text_content(source),
        language,
    }))
}

fn language_of(node: &Handle) -> Option<String> {
    let class = dom::attr(node, "class")?;
    LANGUAGE_CLASS
        .captures(&class)
        .and_then(|captures| captures.get(1))
        .map(|lang| lang.as_str().to_string())
}

fn parse_delimiter(_node: &Handle) -> Option<BlockData> {
    Some(BlockData::Delimiter)
}

fn parse_table(node: &Handle) -> Option<BlockData> {
    let mut rows: Vec<(Handle, bool)> = Vec::new();
    for child in dom::element_children(node) {
        match dom::tag_name(&child) {
            Some("tr") => rows.push((child.clone(), false)),
            Some(section @ ("thead" | "tbody" | "tfoot")) => {
                let in_head = section == "thead";
                for tr in dom::children_named(&child, &["tr"]) {
                    rows.push((tr, in_head));
                }
            }
            _ => {}
        }
    }

    let cells = |tr: &Handle| dom::children_named(tr, &["td", "th"]);
    let opaque_cell = rows
        .iter()
        .flat_map(|(tr, _)| cells(tr))
        .any(|cell| dom::has_descendant(&cell, OPAQUE_TAGS));
    if opaque_cell {
        return None;
    }

    let with_headings = rows
        .first()
        .is_some_and(|(tr, in_head)| *in_head || is_heading_row(tr));

    let content: Vec<Vec<RichText>> = rows
        .iter()
        .map(|(tr, _)| {
            cells(tr)
                .iter()
                .map(|cell| decode_children(cell).trimmed())
                .collect::<Vec<_>>()
        })
        .collect();

    Some(BlockData::Table(Table {
        with_headings,
        content,
    }))
}

fn is_heading_row(tr: &Handle) -> bool {
    let cells = dom::children_named(tr, &["td", "th"]);
    !cells.is_empty() && cells.iter().all(|cell| dom::is_element(cell, "th"))
}

fn parse_figure(node: &Handle) -> Option<BlockData> {
    let img = dom::find_descendant(node, "img")?;
    let caption = dom::find_descendant(node, "figcaption")
        .map(|figcaption| decode_children(&figcaption).trimmed())
        .filter(|caption| !caption.is_empty());
    Some(image_from(&img, caption))
}

fn parse_image(node: &Handle) -> Option<BlockData> {
    Some(image_from(node, None))
}

fn image_from(img: &Handle, caption: Option<RichText>) -> BlockData {
    BlockData::Image(Image {
        url: dom::attr(img, "src").unwrap_or_default(),
        caption,
        alt: dom::non_empty_attr(img, "alt"),
    })
}
