use super::types::{SlashAction, SlashCommand};

pub(super) const CMD: SlashCommand = SlashCommand {
    title: "Task List",
    description: "List with checkboxes",
    icon: "☐",
    action: SlashAction::ToggleTaskList,
};
