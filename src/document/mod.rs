//! Document model and host editor the suggestion menus and paste handler act on.

pub mod editor;
pub mod handle;
pub mod node;

pub use editor::{Editor, ImageUploadHook, ListKind, Prompt, Selection};
pub use handle::{EditorHandle, WeakEditor};
pub use node::{Fragment, Mark, Node, NodeKind, ATOM_CHAR};
