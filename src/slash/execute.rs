use tracing::debug;

use super::types::SlashAction;
use crate::document::{Editor, ImageUploadHook, ListKind, Prompt};
use crate::suggest::TriggerRange;

/// Removes the `/query` text, then applies `action` at the cursor.
///
/// The image action returns the editor's upload hook instead of calling it, so the
/// caller can run it once the editor is no longer borrowed. Without a hook the
/// editor is asked to prompt for an image URL.
pub fn execute(
    action: SlashAction,
    editor: &mut Editor,
    range: &TriggerRange,
) -> Option<ImageUploadHook> {
    if !editor.delete_range(&range.path, range.range.clone()) {
        return None;
    }
    debug!(?action, "running slash command");
    match action {
        SlashAction::SetHeading(level) => editor.set_heading(level),
        SlashAction::ToggleBulletList => editor.toggle_list(ListKind::Bullet),
        SlashAction::ToggleOrderedList => editor.toggle_list(ListKind::Ordered),
        SlashAction::ToggleTaskList => editor.toggle_list(ListKind::Task),
        SlashAction::ToggleBlockquote => editor.toggle_blockquote(),
        SlashAction::ToggleCodeBlock => editor.toggle_code_block(),
        SlashAction::HorizontalRule => editor.insert_horizontal_rule(),
        SlashAction::Image => match editor.image_upload_hook() {
            Some(hook) => return Some(hook),
            None => editor.request_prompt(Prompt::ImageUrl),
        },
    }
    None
}
