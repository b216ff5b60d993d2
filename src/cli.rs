//! Command-line interface
//!
//! Argument definitions and the `run` entry point used by the binary.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;

use clap::{Parser, ValueEnum};
use log::info;

use crate::config::{load_config, load_config_from, save_config, Settings, Theme};
use crate::diagram::{DiagramEngine, MermaidEngine};
use crate::error::Result;
use crate::slide::{render_deck_html, render_slide_html, Deck};

/// Color theme choice on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(theme: ThemeArg) -> Self {
        match theme {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

/// Render a Markdown slide deck to standalone HTML
#[derive(Parser, Debug)]
#[command(name = "slidemark", author, version, about, long_about = None)]
pub struct Args {
    /// Path to the deck file (TOML)
    pub deck: PathBuf,

    /// Output HTML file; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Render only this slide (1-based)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub slide: Option<u32>,

    /// Path to a settings file (JSON); the user config file when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Color theme
    #[arg(long, value_enum)]
    pub theme: Option<ThemeArg>,

    /// Fence tag that marks diagram source
    #[arg(long)]
    pub diagram_tag: Option<String>,

    /// Omit line numbers from highlighted code
    #[arg(long)]
    pub no_line_numbers: bool,

    /// Write the effective settings to the user config file
    #[arg(long)]
    pub save_config: bool,
}

impl Args {
    /// Loaded settings with command-line overrides applied.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => load_config_from(path)?,
            None => load_config(),
        };
        if let Some(theme) = self.theme {
            settings.theme = theme.into();
        }
        if let Some(tag) = &self.diagram_tag {
            settings.diagram_tag = tag.clone();
        }
        if self.no_line_numbers {
            settings.show_line_numbers = false;
        }
        settings.sanitize();
        Ok(settings)
    }
}

/// Load the deck, render it, and write the HTML.
pub fn run(args: &Args) -> Result<()> {
    let settings = args.settings()?;
    if args.save_config {
        save_config(&settings)?;
    }

    let deck = Deck::load(&args.deck)?;
    let engine: Rc<dyn DiagramEngine> = Rc::new(MermaidEngine::new(settings.diagram.clone()));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = tokio::task::LocalSet::new();
    let html = match args.slide {
        Some(number) => {
            let index = number.saturating_sub(1) as usize;
            local.block_on(&runtime, render_slide_html(deck, settings, engine, index))?
        }
        None => local.block_on(&runtime, render_deck_html(deck, settings, engine))?,
    };

    match &args.output {
        Some(path) => {
            fs::write(path, html)?;
            info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::tempdir;

    const DECK: &str = r#"
title = "CLI deck"

[[slides]]
title = "Only"
body = """
```mermaid
flowchart TD
  A --> B
```
"""
"#;

    #[test]
    fn test_parse_args() {
        let args = Args::parse_from([
            "slidemark",
            "talk.toml",
            "-o",
            "out.html",
            "--slide",
            "2",
            "--theme",
            "light",
            "--diagram-tag",
            "graph",
            "--no-line-numbers",
        ]);
        assert_eq!(args.deck, PathBuf::from("talk.toml"));
        assert_eq!(args.output, Some(PathBuf::from("out.html")));
        assert_eq!(args.slide, Some(2));
        assert_eq!(args.theme, Some(ThemeArg::Light));
        assert!(args.no_line_numbers);
    }

    #[test]
    fn test_slide_zero_is_rejected() {
        assert!(Args::try_parse_from(["slidemark", "talk.toml", "--slide", "0"]).is_err());
    }

    #[test]
    fn test_overrides_apply_to_settings() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("settings.json");
        fs::write(&config, r#"{"theme": "dark", "diagram_tag": "mermaid"}"#).unwrap();

        let args = Args::parse_from([
            "slidemark",
            "talk.toml",
            "--config",
            config.to_str().unwrap(),
            "--theme",
            "light",
            "--diagram-tag",
            "  graph ",
            "--no-line-numbers",
        ]);
        let settings = args.settings().unwrap();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.diagram_tag, "graph");
        assert!(!settings.show_line_numbers);
    }

    #[test]
    fn test_run_writes_html() {
        let dir = tempdir().unwrap();
        let deck = dir.path().join("deck.toml");
        let output = dir.path().join("deck.html");
        let config = dir.path().join("missing.json");
        fs::write(&deck, DECK).unwrap();

        let args = Args::parse_from([
            "slidemark",
            deck.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ]);
        run(&args).unwrap();

        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains("<title>CLI deck</title>"));
        assert!(html.contains("<svg"));
    }

    #[test]
    fn test_run_reports_missing_deck() {
        let dir = tempdir().unwrap();
        let args = Args::parse_from([
            "slidemark",
            dir.path().join("nope.toml").to_str().unwrap(),
            "--config",
            dir.path().join("missing.json").to_str().unwrap(),
        ]);
        assert!(matches!(run(&args), Err(Error::DeckLoad { .. })));
    }
}
