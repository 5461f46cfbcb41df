use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};
use richtext_common::config::{FileStore, Loader};
use richtext_common::telemetry::{self, TelemetryConfig};
use richtext_core::{EditorConfig, RichTextEditor};

mod session;

use session::Session;

#[derive(Parser)]
#[command(version, about = "richtext - drive the rich text editor from a script or the terminal", long_about = None)]
struct Cli {
    /// Initial markup value
    #[arg(long)]
    value: Option<String>,

    /// Path to an editor config file (.json or .toml)
    #[arg(long, env = "RICHTEXT_CONFIG")]
    config: Option<PathBuf>,

    /// Session script to run instead of reading stdin
    #[arg(long)]
    script: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_miette();
    telemetry::init_tracing(TelemetryConfig::from_env("richtext"));

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => FileStore::new(path)
            .load()
            .into_diagnostic()
            .wrap_err_with(|| format!("loading config from {}", path.display()))?,
        None => EditorConfig::default(),
    };
    let editor = RichTextEditor::new(cli.value.as_deref(), Vec::new(), config);
    let stdout = std::io::stdout().lock();

    match cli.script {
        Some(path) => {
            let file = File::open(&path)
                .into_diagnostic()
                .wrap_err_with(|| format!("opening script {}", path.display()))?;
            Session::new(editor, BufReader::new(file), stdout).run()
        }
        None => Session::new(editor, std::io::stdin().lock(), stdout).run(),
    }
}

fn init_miette() {
    let hook = miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(2)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }));
    if hook.is_err() {
        tracing::debug!("miette hook already installed");
    }
    miette::set_panic_hook();
}
