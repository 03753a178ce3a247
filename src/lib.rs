//! Block document ⇄ HTML conversion
//!
//!     A rich-text editor saves content as a list of typed blocks (paragraph, header, list,
//!     image, quote, code, delimiter, table, raw) whose text carries inline marks. The application
//!     stores and serves HTML. This crate converts between the two, in both directions, without
//!     ever refusing a document: content it cannot classify is carried through as raw HTML or as
//!     an opaque envelope, so nothing is lost on a load/save cycle.
//!
//! Architecture
//!
//!     - model: the block document, its typed payloads and the JSON wire shape
//!     - inline: the run ⇄ inline HTML codec for marked-up text
//!     - formats/html: block renderer, block parser and the fallback for unknown content
//!     - assembler: the [`Converter`] tying both directions together, plus id stamping
//!
//!     This is a pure lib: no printing, no environment lookups. The command line lives in
//!     `blockhtml-cli` and layered configuration in `blockhtml-config`.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── escape.rs
//!     ├── dom.rs                  # html5ever tree helpers
//!     ├── options.rs
//!     ├── assembler.rs            # Converter, id stamping
//!     ├── model
//!     │   ├── mod.rs
//!     │   └── wire.rs             # {id, type, data} and classification
//!     ├── inline
//!     │   ├── decode.rs
//!     │   ├── encode.rs
//!     │   ├── normalize.rs
//!     │   └── spans.rs
//!     ├── formats
//!     │   ├── html
//!     │   │   ├── parser.rs
//!     │   │   ├── serializer.rs
//!     │   │   ├── fallback.rs
//!     │   │   └── mod.rs
//!     │   └── mod.rs
//!     └── lib.rs
//!
//! Errors
//!
//!     Only input that is not text at all fails: bytes that are not UTF-8, or JSON that is not a
//!     block document. Everything else degrades: unknown tags become raw blocks, unknown block
//!     types are enveloped, malformed block data renders an empty element.
//!
//! Example
//!
//! ```ignore
//! use blockhtml::{blocks_to_html, html_to_blocks};
//!
//! let doc = html_to_blocks("<h2>Hello</h2><ul><li>A</li></ul>")?;
//! assert_eq!(blocks_to_html(&doc), "<h2>Hello</h2><ul><li>A</li></ul>");
//! ```

pub mod assembler;
mod dom;
pub mod error;
mod escape;
pub mod formats;
pub mod inline;
pub mod model;
pub mod options;

pub use assembler::{Converter, IdSource, RandomIds, SequentialIds};
pub use error::ConvertError;
pub use inline::{InlineRun, Mark, RichText};
pub use model::{Block, BlockData, BlockDocument, BlockKind};
pub use options::ConvertOptions;

/// Render a document to HTML with default options.
pub fn blocks_to_html(doc: &BlockDocument) -> String {
    Converter::default().render(doc)
}

/// Parse HTML into a document with default options.
///
/// Every string parses; the `Result` is kept so callers treat both directions alike.
pub fn html_to_blocks(html: &str) -> Result<BlockDocument, ConvertError> {
    Ok(Converter::default().parse(html))
}

/// Parse HTML bytes. Fails only when they are not UTF-8.
pub fn html_bytes_to_blocks(bytes: &[u8]) -> Result<BlockDocument, ConvertError> {
    Converter::default().parse_bytes(bytes)
}

/// Render the editor's JSON save format to HTML.
pub fn json_to_html(json: &str) -> Result<String, ConvertError> {
    Converter::default().render_json(json)
}
