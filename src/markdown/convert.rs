use pulldown_cmark::{html, Parser};

use super::fragment::html_to_fragment;
use super::lexer::parser_options;
use super::sanitize::sanitize_html;
use crate::document::Fragment;

/// Renders markdown to (unsanitized) HTML.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, parser_options());
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Markdown → HTML → sanitized HTML → structural fragment.
pub fn markdown_to_fragment(markdown: &str) -> (String, Fragment) {
    let sanitized = sanitize_html(&markdown_to_html(markdown));
    let fragment = html_to_fragment(&sanitized);
    (sanitized, fragment)
}
