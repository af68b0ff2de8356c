use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::document::{Fragment, Node};
use crate::error::Result;
use crate::markdown::{markdown_to_html, plan_paste, sanitize_html, Clipboard};

#[derive(Parser, Debug)]
#[command(name = "assist")]
#[command(version)]
#[command(about = "A block editor with slash commands, @mentions and markdown paste")]
#[command(
    long_about = "assist - a terminal block editor with typeahead popups.\n\n\
    Type '/' for block commands and '@' to mention someone. Pasted text that looks\n\
    like markdown is inserted as headings, lists, tables and code blocks.\n\n\
    Examples:\n  \
    assist                        # Empty document\n  \
    assist notes.md               # Start from a markdown file\n  \
    assist convert notes.md       # Print the paste plan as JSON\n  \
    assist convert --html notes.md"
)]
pub struct Cli {
    /// Markdown file to start from. It goes through the same pipeline as a paste.
    pub file: Option<PathBuf>,

    /// Config file to use instead of the one in the config directory
    #[arg(short = 'c', long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Convert a markdown file the way a paste would and print the result
    Convert {
        file: PathBuf,

        /// Print only the sanitized HTML
        #[arg(long)]
        html: bool,
    },
}

/// Output of `assist convert`.
pub fn convert(file: &Path, html_only: bool) -> Result<String> {
    let text = std::fs::read_to_string(file)?;
    let plan = plan_paste(&Clipboard::plain(text.as_str()));
    debug!(proceed = plan.proceed, file = %file.display(), "converted file");
    if html_only {
        return Ok(plan
            .sanitized_html
            .unwrap_or_else(|| sanitize_html(&markdown_to_html(&text))));
    }
    Ok(serde_json::to_string_pretty(&plan)?)
}

/// Initial document for `assist FILE`. Text the detector rejects becomes one
/// paragraph per line, as a plain paste would.
pub fn seed_document(file: &Path) -> Result<Fragment> {
    let text = std::fs::read_to_string(file)?;
    let plan = plan_paste(&Clipboard::plain(text.as_str()));
    if let Some(fragment) = plan.fragment.filter(|_| plan.proceed) {
        return Ok(fragment);
    }
    Ok(Fragment::new(
        text.lines().map(Node::paragraph).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::NodeKind;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parses_editor_invocation() {
        let cli = Cli::try_parse_from(["assist", "--config", "/tmp/a.toml", "notes.md"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("notes.md")));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/a.toml")));
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_convert_subcommand() {
        let cli = Cli::try_parse_from(["assist", "convert", "--html", "doc.md"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Convert {
                file: PathBuf::from("doc.md"),
                html: true
            })
        );
    }

    #[test]
    fn convert_prints_plan_json() {
        let file = write_temp("# Title\n\n- a\n- b\n");
        let out = convert(file.path(), false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["proceed"], true);
        assert_eq!(value["fragment"][0]["type"], "heading");
    }

    #[test]
    fn convert_html_is_sanitized() {
        let file = write_temp("# Hi <script>alert(1)</script>\n\n[x](javascript:alert(1))\n");
        let out = convert(file.path(), true).unwrap();
        assert!(out.contains("<h1>"));
        assert!(!out.contains("<script"));
        assert!(!out.contains("javascript:"));
    }

    #[test]
    fn convert_plain_text_declines() {
        let file = write_temp("just a sentence\n");
        let out = convert(file.path(), false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["proceed"], false);
        assert!(value.get("fragment").is_none());
    }

    #[test]
    fn seed_uses_structure_for_markdown() {
        let file = write_temp("## Plan\n\n1. one\n2. two\n");
        let fragment = seed_document(file.path()).unwrap();
        assert_eq!(fragment.nodes()[0].kind, NodeKind::Heading { level: 2 });
    }

    #[test]
    fn seed_falls_back_to_paragraph_lines() {
        let file = write_temp("first\nsecond\n");
        let fragment = seed_document(file.path()).unwrap();
        assert_eq!(fragment.nodes().len(), 2);
        assert_eq!(fragment.nodes()[1].text_content(), "second");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = convert(Path::new("/nonexistent/file.md"), false).unwrap_err();
        assert!(matches!(err, crate::error::AssistError::Io(_)));
    }
}
