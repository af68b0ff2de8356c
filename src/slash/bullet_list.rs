use super::types::{SlashAction, SlashCommand};

pub(super) const CMD: SlashCommand = SlashCommand {
    title: "Bullet List",
    description: "Unordered list of items",
    icon: "•",
    action: SlashAction::ToggleBulletList,
};
