use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use mermaid_relay::render::RenderSource;
use mermaid_relay::theme::format_theme_config;
use mermaid_relay::{RenderConfig, RenderEvent, RenderSession, Renderer, ThemeConfig};
use tokio::task::JoinHandle;

#[derive(Parser, Debug)]
#[command(name = "mermaid-relay")]
#[command(version, about = "Render Mermaid diagrams to PNG through remote rendering services")]
struct Cli {
    /// Log progress of every rendering attempt
    #[arg(long, short = 'v', global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Debug logging (request URLs, response sizes)
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a diagram file ("-" for stdin) to a PNG file
    Render {
        input: PathBuf,

        #[arg(long, short = 'o', value_name = "FILE")]
        output: PathBuf,

        /// Built-in palette name
        #[arg(long, value_name = "NAME", conflicts_with_all = ["palette_file", "no_theme"])]
        palette: Option<String>,

        /// Palette TOML file with one `role = "#RRGGBB"` entry per color role
        #[arg(long, value_name = "FILE", conflicts_with = "no_theme")]
        palette_file: Option<PathBuf>,

        /// Submit the diagram without a theme block
        #[arg(long, action = ArgAction::SetTrue)]
        no_theme: bool,

        /// Budget per rendering service, in seconds
        #[arg(long, value_name = "SECS", default_value_t = mermaid_relay::config::DEFAULT_TIMEOUT_SECS)]
        timeout: u64,

        /// Reject responses that are not PNG data
        #[arg(long, action = ArgAction::SetTrue)]
        strict_png: bool,
    },

    /// List built-in palettes
    Presets,

    /// Print the theme block that would be prepended to a diagram
    Theme {
        #[arg(long, value_name = "NAME", conflicts_with = "palette_file")]
        palette: Option<String>,

        #[arg(long, value_name = "FILE")]
        palette_file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        tracing::Level::DEBUG
    } else if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    match cli.command {
        Command::Render {
            input,
            output,
            palette,
            palette_file,
            no_theme,
            timeout,
            strict_png,
        } => {
            let mut session = RenderSession::new();
            session.set_use_custom_colors(!no_theme);
            if let Some((name, theme)) = resolve_palette(palette.as_deref(), palette_file.as_deref())? {
                session.remember_palette(name, theme);
            }

            let code = read_input(&input)?;
            let request = session.prepare(&code)?;

            let config = RenderConfig::default()
                .with_timeout_seconds(timeout)
                .with_strict_png(strict_png);
            let renderer = Renderer::new(&config)?;

            let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<RenderEvent>();
            let progress = tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    tracing::info!("{}", event.message());
                }
            });

            let result = renderer.render_with_events(&request, tx).await;
            finish_progress(progress).await;
            let rendered = result?;

            if let RenderSource::Backend { name, .. } = &rendered.source {
                tracing::info!("Diagram rendered by {}", name);
            }

            fs::write(&output, rendered.image.as_bytes())
                .with_context(|| format!("Failed to write {}", output.display()))?;
            tracing::info!(
                "Wrote {} bytes to {}",
                rendered.image.len(),
                output.display()
            );
        }

        Command::Presets => {
            let mut stdout = io::stdout().lock();
            for (name, theme) in ThemeConfig::presets() {
                writeln!(
                    stdout,
                    "{:<18} primary {}  secondary {}  background {}",
                    name, theme.primary, theme.secondary, theme.background
                )?;
            }
        }

        Command::Theme {
            palette,
            palette_file,
        } => {
            let theme = resolve_palette(palette.as_deref(), palette_file.as_deref())?
                .map(|(_, theme)| theme)
                .unwrap_or_else(|| RenderSession::new().palette().to_owned());
            writeln!(io::stdout().lock(), "{}", format_theme_config(&theme))?;
        }
    }

    Ok(())
}

fn resolve_palette(
    name: Option<&str>,
    file: Option<&Path>,
) -> anyhow::Result<Option<(String, ThemeConfig)>> {
    if let Some(name) = name {
        return Ok(Some((name.to_string(), ThemeConfig::require_preset(name)?)));
    }

    if let Some(path) = file {
        let theme = ThemeConfig::load(path)
            .with_context(|| format!("Failed to load palette {}", path.display()))?;
        return Ok(Some(("Custom".to_string(), theme)));
    }

    Ok(None)
}

/// Wait for the progress logger; returns false if it died early
async fn finish_progress(progress: JoinHandle<()>) -> bool {
    match progress.await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Progress reporting stopped: {}", e);
            false
        }
    }
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut code = String::new();
        io::stdin().read_to_string(&mut code)?;
        return Ok(code);
    }

    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_finish_progress_reports_panicked_logger() {
        let clean = tokio::spawn(async {});
        assert!(finish_progress(clean).await);

        let crashed = tokio::spawn(async { panic!("logger crashed") });
        assert!(!finish_progress(crashed).await);
    }
}
