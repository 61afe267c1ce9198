use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Describe a website, get a website", long_about = None)]
pub struct Args {
    /// Path to the configuration file [default: ~/.sitegen/config.yaml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// AI provider to use [possible values: openai, openrouter, deepseek]
    #[arg(short, long, global = true)]
    pub provider: Option<String>,

    /// Model to use (provider-specific)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Gallery database, e.g. sqlite://gallery.db
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Serve the web page
    Serve {
        /// Address to listen on
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Interactive terminal session
    Chat,
    /// Generate a single website and print its HTML
    Generate {
        /// What the website should be; read from stdin when piped
        description: Option<String>,

        /// Write the HTML here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
