//! Markdown paste pipeline: detection, conversion, sanitization and insertion.

pub mod convert;
pub mod detect;
pub mod fragment;
pub mod lexer;
pub mod paste;
pub mod sanitize;

pub use convert::{markdown_to_fragment, markdown_to_html};
pub use detect::{looks_like_markdown, MarkdownDetector};
pub use fragment::html_to_fragment;
pub use lexer::{BlockLexer, BlockToken, PulldownLexer, TokenKind};
pub use paste::{plan_paste, Clipboard, MarkdownPaste, PasteEvent, PasteOutcome, PastePlan};
pub use sanitize::{is_allowed_url, sanitize_html, ALLOWED_PROTOCOLS};
