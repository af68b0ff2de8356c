//! The `/` command menu.

pub mod execute;
mod types;

mod blockquote;
mod bullet_list;
mod code_block;
mod h1;
mod h2;
mod h3;
mod horizontal_rule;
mod image;
mod ordered_list;
mod task_list;

pub use types::*;

use crate::suggest::{InsertionContext, QueryContext, SuggestionAdapter, TriggerConfig};

pub fn all_commands() -> Vec<SlashCommand> {
    vec![
        h1::CMD,
        h2::CMD,
        h3::CMD,
        bullet_list::CMD,
        ordered_list::CMD,
        task_list::CMD,
        blockquote::CMD,
        code_block::CMD,
        horizontal_rule::CMD,
        image::CMD,
    ]
}

/// Commands whose title contains `query`, ignoring case.
pub fn filter(query: &str) -> Vec<SlashCommand> {
    let q = query.to_lowercase();
    all_commands()
        .into_iter()
        .filter(|c| c.title.to_lowercase().contains(&q))
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SlashMenu;

impl SuggestionAdapter for SlashMenu {
    type Item = SlashCommand;

    fn trigger(&self) -> TriggerConfig {
        TriggerConfig::new('/')
    }

    fn items(&self, ctx: &QueryContext<'_>) -> Vec<SlashCommand> {
        filter(ctx.query)
    }

    fn command(&self, item: &SlashCommand, ctx: &InsertionContext) {
        let upload = ctx
            .apply(|editor, range| execute::execute(item.action, editor, range))
            .flatten();
        if let Some(upload) = upload {
            upload();
        }
    }
}
