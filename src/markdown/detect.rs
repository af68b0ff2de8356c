use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::lexer::{BlockLexer, PulldownLexer};

/// Inline constructs that, on multi-line text, are enough to call it markdown:
/// `**bold**`, `__bold__`, `` `code` `` and `[text](url)`.
static INLINE_MARKDOWN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*.+?\*\*|__.+?__|`[^`]+`|\[.+?\]\(.+?\)")
        .expect("valid inline markdown pattern")
});

/// Decides whether pasted plain text is markdown rather than prose.
#[derive(Debug, Clone, Default)]
pub struct MarkdownDetector<L = PulldownLexer> {
    lexer: L,
}

impl MarkdownDetector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: BlockLexer> MarkdownDetector<L> {
    pub fn with_lexer(lexer: L) -> Self {
        Self { lexer }
    }

    pub fn classify<'a>(&self, text: impl Into<Option<&'a str>>) -> bool {
        let Some(text) = text.into() else {
            return false;
        };
        if text.trim().is_empty() {
            return false;
        }

        let non_empty_lines = text.lines().filter(|l| !l.trim().is_empty()).count();
        if non_empty_lines > 1 && INLINE_MARKDOWN.is_match(text) {
            trace!("markdown detected by inline fast path");
            return true;
        }

        let structural = self
            .lexer
            .tokenize(text)
            .iter()
            .any(|token| token.kind.is_structural());
        trace!(structural, "markdown block scan finished");
        structural
    }
}

/// Classifies `text` with the default pulldown-cmark lexer.
pub fn looks_like_markdown(text: &str) -> bool {
    MarkdownDetector::new().classify(text)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::markdown::lexer::{BlockToken, TokenKind};

    #[test]
    fn empty_and_missing_text_are_not_markdown() {
        let detector = MarkdownDetector::new();
        assert!(!detector.classify(""));
        assert!(!detector.classify(None::<&str>));
        assert!(!detector.classify("   \n\t "));
    }

    #[test]
    fn prose_is_not_markdown() {
        assert!(!looks_like_markdown("hello world"));
        assert!(!looks_like_markdown("just talking normally"));
    }

    #[test]
    fn hashtag_is_not_a_heading() {
        assert!(!looks_like_markdown("#hashtag"));
    }

    #[test]
    fn block_structure_is_markdown() {
        assert!(looks_like_markdown("# Title\n\n- a\n- b"));
        assert!(looks_like_markdown("1. First\n2. Second"));
        assert!(looks_like_markdown("> a quote"));
        assert!(looks_like_markdown("| a | b |\n|---|---|\n| 1 | 2 |"));
    }

    #[test]
    fn multiline_inline_markup_takes_fast_path() {
        assert!(looks_like_markdown(
            "Some **bold** text\nand a [link](http://x)"
        ));
    }

    #[test]
    fn single_line_inline_markup_needs_block_structure() {
        assert!(!looks_like_markdown("Some **bold** text"));
    }

    #[test]
    fn underscore_bold_takes_fast_path() {
        let detector = MarkdownDetector::with_lexer(CountingLexer(Cell::new(0)));
        assert!(detector.classify("a __strong__ word\nsecond line"));
    }

    #[test]
    fn code_span_may_cross_a_line_break() {
        let detector = MarkdownDetector::with_lexer(CountingLexer(Cell::new(0)));
        assert!(detector.classify("run `cargo\nbuild` first\nthen ship"));
        assert!(looks_like_markdown("run `cargo\nbuild` first\nthen ship"));
    }

    #[test]
    fn link_text_may_contain_a_bracket() {
        let detector = MarkdownDetector::with_lexer(CountingLexer(Cell::new(0)));
        assert!(detector.classify("see [a]b](http://x)\nnext line"));
    }

    struct CountingLexer(Cell<usize>);

    impl BlockLexer for CountingLexer {
        fn tokenize(&self, _text: &str) -> Vec<BlockToken> {
            self.0.set(self.0.get() + 1);
            vec![BlockToken {
                kind: TokenKind::Paragraph,
            }]
        }
    }

    #[test]
    fn fast_path_skips_the_lexer() {
        let detector = MarkdownDetector::with_lexer(CountingLexer(Cell::new(0)));
        assert!(detector.classify("use `cargo`\nthen run it"));
        assert_eq!(detector.lexer.0.get(), 0);

        assert!(!detector.classify("plain\ntext"));
        assert_eq!(detector.lexer.0.get(), 1);
    }
}
