//! Command-line surface.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use studio_telemetry::LogFormat;
use tracing::info;
use url::Url;

use crate::config::StudioConfig;
use crate::orchestrator::{GenerationMode, Studio};
use crate::render::{render_project, render_research, render_suggestions, write_wav};

/// Deploy Studio - describe an app, get a runnable Python project
#[derive(Parser, Debug)]
#[command(name = "deploy-studio")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Gemini API key (falls back to API_KEY or GOOGLE_API_KEY)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Override the Gemini REST endpoint
    #[arg(long, env = "GEMINI_BASE_URL", global = true)]
    pub base_url: Option<Url>,

    /// Log line format
    #[arg(long, value_enum, default_value_t = CliLogFormat::Pretty, global = true)]
    pub log_format: CliLogFormat,
}

/// CLI log format (maps to LogFormat)
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliLogFormat {
    Pretty,
    Json,
}

impl From<CliLogFormat> for LogFormat {
    fn from(cli: CliLogFormat) -> Self {
        match cli {
            CliLogFormat::Pretty => LogFormat::Pretty,
            CliLogFormat::Json => LogFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a Python project from a description
    Generate {
        /// What the app should do
        #[arg(required = true)]
        prompt: Vec<String>,

        /// Speed/quality trade-off
        #[arg(short, long, value_enum, default_value_t = GenerationMode::Standard)]
        mode: GenerationMode,

        /// Write the generated files into this directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Also synthesize the setup instructions into this WAV file
        #[arg(long, value_name = "WAV")]
        speak: Option<PathBuf>,
    },

    /// Print example prompts
    Suggest,

    /// Ask a web-grounded question about a tech stack
    Research {
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Turn text into speech
    Speak {
        #[arg(required = true)]
        text: Vec<String>,

        /// Output WAV file
        #[arg(short, long, default_value = "speech.wav")]
        out: PathBuf,

        /// Play through the default output device after writing
        #[cfg(feature = "desktop-audio")]
        #[arg(long)]
        play: bool,
    },

    /// Brainstorm out loud with Gemini Live (Ctrl-C to stop)
    #[cfg(feature = "desktop-audio")]
    Voice,
}

impl Cli {
    /// Environment configuration with command-line overrides applied.
    pub fn studio_config(&self) -> crate::Result<StudioConfig> {
        let mut config = StudioConfig::from_env()?;
        if let Some(key) = &self.api_key {
            config = config.with_api_key(key.clone());
        }
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url.clone());
        }
        Ok(config)
    }
}

/// Execute one command, writing results to `out`.
pub async fn run<W: Write>(cli: Cli, out: &mut W) -> anyhow::Result<()> {
    let config = cli.studio_config()?;

    match cli.command {
        Commands::Suggest => {
            write!(out, "{}", render_suggestions())?;
        }
        Commands::Generate { prompt, mode, out: dir, speak } => {
            let studio = Studio::new(config)?;
            let project = studio.generate_project(&prompt.join(" "), mode).await?;
            write!(out, "{}", render_project(&project))?;

            if let Some(dir) = dir {
                let written = project
                    .write_to(&dir)
                    .with_context(|| format!("writing project to {}", dir.display()))?;
                info!(files = written.len(), dir = %dir.display(), "project written");
                writeln!(out, "\nWrote {} files to {}", written.len(), dir.display())?;
            }
            if let Some(wav) = speak {
                let audio = studio.synthesize_speech(&project.setup_instructions).await?;
                write_wav(&wav, &audio)
                    .with_context(|| format!("writing audio to {}", wav.display()))?;
                writeln!(out, "Saved spoken instructions to {}", wav.display())?;
            }
        }
        Commands::Research { query } => {
            let studio = Studio::new(config)?;
            let result = studio.research_tech_stack(&query.join(" ")).await?;
            write!(out, "{}", render_research(&result))?;
        }
        #[cfg(not(feature = "desktop-audio"))]
        Commands::Speak { text, out: wav } => {
            let studio = Studio::new(config)?;
            let audio = studio.synthesize_speech(&text.join(" ")).await?;
            write_wav(&wav, &audio).with_context(|| format!("writing audio to {}", wav.display()))?;
            writeln!(out, "Saved {:.1}s of audio to {}", audio.duration(), wav.display())?;
        }
        #[cfg(feature = "desktop-audio")]
        Commands::Speak { text, out: wav, play } => {
            let studio = Studio::new(config)?;
            let audio = studio.synthesize_speech(&text.join(" ")).await?;
            write_wav(&wav, &audio).with_context(|| format!("writing audio to {}", wav.display()))?;
            writeln!(out, "Saved {:.1}s of audio to {}", audio.duration(), wav.display())?;
            if play {
                crate::voice::play_speech(&audio).await?;
            }
        }
        #[cfg(feature = "desktop-audio")]
        Commands::Voice => {
            crate::voice::run_voice_session(&config).await?;
        }
    }
    Ok(())
}
