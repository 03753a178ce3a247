//! Block → HTML fragment
//!
//! One match arm per block type. Rendering is total: malformed blocks produce an empty instance
//! of their tag and unknown blocks go through the fallback envelope.

use super::fallback;
use crate::escape::push_escaped;
use crate::inline::{encode, RichText};
use crate::model::{BlockData, BlockKind, Code, Image, List, ListItem, ListStyle, Quote, Table};
use crate::options::ConvertOptions;
use log::debug;

/// Render one block to a standalone fragment.
pub fn render_block(data: &BlockData, options: &ConvertOptions) -> String {
    let mut out = String::new();
    write_block(&mut out, data, options);
    out
}

pub(crate) fn write_block(out: &mut String, data: &BlockData, options: &ConvertOptions) {
    match data {
        BlockData::Paragraph(paragraph) => write_inline_element(out, "p", &paragraph.text),
        BlockData::Header(header) => {
            let tag = header_tag(header.level);
            write_inline_element(out, &tag, &header.text);
        }
        BlockData::List(list) => write_list(out, list),
        BlockData::Image(image) => write_image(out, image),
        BlockData::Quote(quote) => write_quote(out, quote),
        BlockData::Code(code) => write_code(out, code),
        BlockData::Delimiter => out.push_str("<hr>"),
        BlockData::Table(table) => write_table(out, table),
        BlockData::Raw(raw) => out.push_str(&raw.html),
        BlockData::Malformed { kind, .. } => {
            debug!("rendering malformed {} block as an empty element", kind);
            write_empty(out, *kind, options);
        }
        BlockData::Unknown { type_name, data } => {
            out.push_str(&fallback::render_unknown(type_name, data));
        }
    }
}

fn header_tag(level: u8) -> String {
    format!("h{}", level.clamp(1, 6))
}

fn write_inline_element(out: &mut String, tag: &str, text: &RichText) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    out.push_str(&encode(text.runs()));
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn write_list(out: &mut String, list: &List) {
    write_items(out, list.style, &list.items);
}

fn write_items(out: &mut String, style: ListStyle, items: &[ListItem]) {
    let tag = style.tag();
    out.push('<');
    out.push_str(tag);
    out.push('>');
    for item in items {
        out.push_str("<li>");
        out.push_str(&encode(item.content.runs()));
        if !item.items.is_empty() {
            write_items(out, item.style.unwrap_or(style), &item.items);
        }
        out.push_str("</li>");
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn write_image(out: &mut String, image: &Image) {
    let caption = image.caption.as_ref().filter(|caption| !caption.is_empty());

    if caption.is_some() {
        out.push_str("<figure>");
    }
    out.push_str("<img src=\"");
    push_escaped(out, &image.url);
    out.push_str("\" alt=\"");
    push_escaped(out, image.alt.as_deref().unwrap_or_default());
    out.push_str("\">");
    if let Some(caption) = caption {
        write_inline_element(out, "figcaption", caption);
        out.push_str("</figure>");
    }
}

fn write_quote(out: &mut String, quote: &Quote) {
    out.push_str("<blockquote>");
    write_inline_element(out, "p", &quote.text);
    if let Some(caption) = quote.caption.as_ref().filter(|caption| !caption.is_empty()) {
        write_inline_element(out, "cite", caption);
    }
    out.push_str("</blockquote>");
}

fn write_code(out: &mut String, code: &Code) {
    out.push_str("<pre><code");
    if let Some(language) = code.language.as_deref().filter(|lang| !lang.is_empty()) {
        out.push_str(" class=\"language-");
        push_escaped(out, language);
        out.push('"');
    }
    out.push('>');
    push_escaped(out, &code.code);
    out.push_str("</code></pre>");
}

fn write_table(out: &mut String, table: &Table) {
    out.push_str("<table>");
    for (index, row) in table.content.iter().enumerate() {
        let cell_tag = if index == 0 && table.with_headings {
            "th"
        } else {
            "td"
        };
        out.push_str("<tr>");
        for cell in row {
            write_inline_element(out, cell_tag, cell);
        }
        out.push_str("</tr>");
    }
    out.push_str("</table>");
}

fn write_empty(out: &mut String, kind: BlockKind, options: &ConvertOptions) {
    match kind {
        BlockKind::Paragraph => out.push_str("<p></p>"),
        BlockKind::Header => {
            let tag = header_tag(options.header_level());
            out.push_str(&format!("<{tag}></{tag}>"));
        }
        BlockKind::List => out.push_str("<ul></ul>"),
        BlockKind::Image => out.push_str("<img src=\"\" alt=\"\">"),
        BlockKind::Quote => out.push_str("<blockquote></blockquote>"),
        BlockKind::Code => out.push_str("<pre><code></code></pre>"),
        BlockKind::Delimiter => out.push_str("<hr>"),
        BlockKind::Table => out.push_str("<table></table>"),
        BlockKind::Raw => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::{InlineRun, Mark};
    use crate::model::{Header, Paragraph, Raw};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn render(data: BlockData) -> String {
        render_block(&data, &ConvertOptions::default())
    }

    #[test]
    fn header_and_paragraph() {
        assert_eq!(render(BlockData::header(2, "Hello")), "<h2>Hello</h2>");
        assert_eq!(
            render(BlockData::Paragraph(Paragraph {
                text: RichText::from_runs(vec![InlineRun::new("bold", vec![Mark::Bold])]),
            })),
            "<p><strong>bold</strong></p>"
        );
    }

    #[rstest]
    #[case(0, "<h1>x</h1>")]
    #[case(1, "<h1>x</h1>")]
    #[case(6, "<h6>x</h6>")]
    #[case(9, "<h6>x</h6>")]
    fn header_level_is_clamped(#[case] level: u8, #[case] expected: &str) {
        assert_eq!(
            render(BlockData::Header(Header {
                text: "x".into(),
                level,
            })),
            expected
        );
    }

    #[test]
    fn empty_blocks_keep_their_tags() {
        assert_eq!(render(BlockData::paragraph("")), "<p></p>");
        assert_eq!(
            render(BlockData::List(List::default())),
            "<ul></ul>"
        );
    }

    #[test]
    fn nested_list_uses_item_style() {
        let list = List {
            style: ListStyle::Unordered,
            items: vec![
                ListItem::new("A").with_children(
                    Some(ListStyle::Ordered),
                    vec![ListItem::new("A.1"), ListItem::new("A.2")],
                ),
                ListItem::new("B").with_children(None, vec![ListItem::new("B.1")]),
            ],
        };
        assert_eq!(
            render(BlockData::List(list)),
            "<ul><li>A<ol><li>A.1</li><li>A.2</li></ol></li><li>B<ul><li>B.1</li></ul></li></ul>"
        );
    }

    #[test]
    fn image_with_and_without_caption() {
        let image = Image {
            url: "/a.png?x=1&y=\"2\"".into(),
            caption: None,
            alt: Some("A <b>".into()),
        };
        assert_eq!(
            render(BlockData::Image(image.clone())),
            r#"<img src="/a.png?x=1&amp;y=&quot;2&quot;" alt="A &lt;b&gt;">"#
        );

        let captioned = Image {
            caption: Some("Cap".into()),
            alt: None,
            ..image
        };
        assert_eq!(
            render(BlockData::Image(captioned)),
            r#"<figure><img src="/a.png?x=1&amp;y=&quot;2&quot;" alt=""><figcaption>Cap</figcaption></figure>"#
        );
    }

    #[test]
    fn quote_with_caption() {
        let quote = Quote {
            text: "line one\nline two".into(),
            caption: Some("Someone".into()),
        };
        assert_eq!(
            render(BlockData::Quote(quote)),
            "<blockquote><p>line one<br>line two</p><cite>Someone</cite></blockquote>"
        );
    }

    #[test]
    fn code_is_escaped_and_tagged() {
        let code = Code {
            code: "if a < b && c {\n}".into(),
            language: Some("rust".into()),
        };
        assert_eq!(
            render(BlockData::Code(code)),
            "<pre><code class=\"language-rust\">if a &lt; b &amp;&amp; c {\n}</code></pre>"
        );
        let plain = Code {
            code: "x".into(),
            language: None,
        };
        assert_eq!(render(BlockData::Code(plain)), "<pre><code>x</code></pre>");
    }

    #[test]
    fn table_with_headings() {
        let table = Table {
            with_headings: true,
            content: vec![
                vec!["Name".into(), "Qty".into()],
                vec!["Apple".into(), "3".into()],
            ],
        };
        assert_eq!(
            render(BlockData::Table(table)),
            "<table><tr><th>Name</th><th>Qty</th></tr><tr><td>Apple</td><td>3</td></tr></table>"
        );
    }

    #[test]
    fn raw_is_verbatim() {
        let html = r#"<iframe src="https://x" allowfullscreen></iframe>"#;
        assert_eq!(
            render(BlockData::Raw(Raw { html: html.into() })),
            html
        );
    }

    #[rstest]
    #[case(BlockKind::Paragraph, "<p></p>")]
    #[case(BlockKind::Header, "<h2></h2>")]
    #[case(BlockKind::List, "<ul></ul>")]
    #[case(BlockKind::Image, "<img src=\"\" alt=\"\">")]
    #[case(BlockKind::Quote, "<blockquote></blockquote>")]
    #[case(BlockKind::Code, "<pre><code></code></pre>")]
    #[case(BlockKind::Delimiter, "<hr>")]
    #[case(BlockKind::Table, "<table></table>")]
    #[case(BlockKind::Raw, "")]
    fn malformed_blocks_render_empty(#[case] kind: BlockKind, #[case] expected: &str) {
        let data = BlockData::Malformed {
            kind,
            data: json!({"nonsense": true}),
        };
        assert_eq!(render(data), expected);
    }

    #[test]
    fn malformed_header_uses_configured_level() {
        let options = ConvertOptions {
            default_header_level: 4,
            ..Default::default()
        };
        let data = BlockData::Malformed {
            kind: BlockKind::Header,
            data: json!(null),
        };
        assert_eq!(render_block(&data, &options), "<h4></h4>");
    }
}
