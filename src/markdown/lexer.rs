use pulldown_cmark::{Event, Options, Parser, Tag};

/// Block-level token categories the paste heuristic cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Heading,
    List,
    Code,
    Blockquote,
    Rule,
    Table,
    Paragraph,
    Html,
    Other,
}

impl TokenKind {
    /// Whether a token of this kind only appears in structured markdown.
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            Self::Heading | Self::List | Self::Code | Self::Blockquote | Self::Rule | Self::Table
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockToken {
    pub kind: TokenKind,
}

/// A block-level markdown lexer. Only the top-level block kinds are reported.
pub trait BlockLexer {
    fn tokenize(&self, text: &str) -> Vec<BlockToken>;
}

/// Parser options shared by the lexer and the HTML converter.
pub fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PulldownLexer;

impl BlockLexer for PulldownLexer {
    fn tokenize(&self, text: &str) -> Vec<BlockToken> {
        let mut tokens = Vec::new();
        let mut depth = 0usize;
        for event in Parser::new_ext(text, parser_options()) {
            match event {
                Event::Start(tag) => {
                    if depth == 0 {
                        tokens.push(BlockToken {
                            kind: block_kind(&tag),
                        });
                    }
                    depth += 1;
                }
                Event::End(_) => depth = depth.saturating_sub(1),
                Event::Rule if depth == 0 => tokens.push(BlockToken {
                    kind: TokenKind::Rule,
                }),
                _ => {}
            }
        }
        tokens
    }
}

fn block_kind(tag: &Tag<'_>) -> TokenKind {
    match tag {
        Tag::Heading { .. } => TokenKind::Heading,
        Tag::List(_) => TokenKind::List,
        Tag::CodeBlock(_) => TokenKind::Code,
        Tag::BlockQuote(_) => TokenKind::Blockquote,
        Tag::Table(_) => TokenKind::Table,
        Tag::Paragraph => TokenKind::Paragraph,
        Tag::HtmlBlock => TokenKind::Html,
        _ => TokenKind::Other,
    }
}
