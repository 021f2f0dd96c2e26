//! Quire demo host: replays an input script against one editor.
use anyhow::{Context, Result};
use clap::Parser;
use core_config::{ConfigContext, load_from};
use core_editor::{Editor, EditorOptions};
use core_layout::Size;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

mod player;
mod script;

use player::Player;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "quire", version, about = "Quire text-editing engine demo")]
struct Args {
    /// Input script to replay. Reads standard input when omitted.
    pub script: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery of `quire.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Maximum view width in pixels.
    #[arg(long, default_value_t = 320)]
    pub width: u32,
    /// Maximum view height in pixels.
    #[arg(long, default_value_t = 96)]
    pub height: u32,
    /// Force single-line mode regardless of configuration.
    #[arg(long)]
    pub single_line: bool,
    /// Disable Submit: Enter always inserts a line break.
    #[arg(long)]
    pub no_submit: bool,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join("quire.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, "quire.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(()) => Some(guard),
        // A global subscriber is already installed; dropping the guard shuts the writer down.
        Err(_) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn read_script(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("reading script {}", p.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading script from stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let mut config = load_from(args.config.clone())?;
    config.apply_context(ConfigContext::new(args.width, args.height));
    let mut opts = EditorOptions::from_config(&config);
    opts.single_line |= args.single_line;
    opts.submit &= !args.no_submit;
    info!(
        target: "runtime",
        single_line = opts.single_line,
        submit = opts.submit,
        caret_width = config.effective_caret_width,
        config_override = args.config.is_some(),
        "bootstrap_complete"
    );

    let src = read_script(args.script.as_deref())?;
    let steps = script::parse(&src)?;
    let size = Size::new(
        i32::try_from(args.width).unwrap_or(i32::MAX),
        i32::try_from(args.height).unwrap_or(i32::MAX),
    );
    let stdout = std::io::stdout().lock();
    let mut player = Player::new(Editor::new(opts), config, size, stdout);
    player.run(&steps)?;
    info!(target: "runtime", frames = player.frames(), "shutdown");
    Ok(())
}
