pub mod document;
pub mod error;
pub mod markdown;
pub mod mention;
pub mod slash;
pub mod suggest;

// Convenience re-exports
pub use document::{Editor, EditorHandle, Fragment, Node, NodeKind};
pub use error::{AssistError, Result};
pub use markdown::{looks_like_markdown, MarkdownDetector, MarkdownPaste};
pub use mention::{Member, MentionMenu};
pub use slash::SlashMenu;
pub use suggest::{SuggestionAdapter, SuggestionController, SuggestionPlugin};
