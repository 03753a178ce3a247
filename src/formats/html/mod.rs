//! HTML representation of block documents
//!
//! Strategy: direct block → HTML generation, and html5ever tree → blocks on the way back.
//!
//! # Data Model
//!
//! | Block     | HTML Element                                   | Notes                              |
//! |-----------|------------------------------------------------|------------------------------------|
//! | paragraph | `<p>`                                          | a `<p>` holding only an image parses as image |
//! | header    | `<h1>`-`<h6>`                                  | level clamped when rendering       |
//! | list      | `<ul>` / `<ol>` with `<li>`                    | nested lists live inside the `<li>` |
//! | image     | `<img>`, or `<figure>` with `<figcaption>`     | figure only when captioned         |
//! | quote     | `<blockquote><p>` + `<cite>`                   | `footer`/`figcaption` also read as caption |
//! | code      | `<pre><code class="language-X">`               | `lang-X` also accepted             |
//! | delimiter | `<hr>`                                         |                                    |
//! | table     | `<table>` of `<tr>`                            | `<th>` first row when headed       |
//! | raw       | stored HTML, verbatim                          | anything unclassified parses to raw |
//!
//! Blocks of unknown type render as a `div[data-block-type]` envelope (see [`fallback`]) and
//! parse back into the same block.

pub(crate) mod fallback;
pub(crate) mod parser;
pub mod serializer;

pub use fallback::{DATA_ATTR, TYPE_ATTR};
pub use serializer::render_block;
