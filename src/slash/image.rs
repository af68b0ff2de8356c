use super::types::{SlashAction, SlashCommand};

pub(super) const CMD: SlashCommand = SlashCommand {
    title: "Image",
    description: "Upload an image",
    icon: "▣",
    action: SlashAction::Image,
};
