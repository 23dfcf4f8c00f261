//! `tool-launcher` binary.
//!
//! ```bash
//! tool-launcher --dir ./tools list --search disk
//! tool-launcher --dir ./tools launch --search build
//! tool-launcher --dir ./tools --view list render --out frame.png
//! tool-launcher --dir ./tools run --snapshot last.png < commands.jsonl
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use tool_launcher::config::{self, Config, WindowConfig};
use tool_launcher::error::ResultExt;
use tool_launcher::layout::ViewMode;
use tool_launcher::launcher::{ProcessLauncher, RecordingLauncher, ShellLauncher};
use tool_launcher::stdin_commands;
use tool_launcher::text::TextPainter;
use tool_launcher::tools::{filter_tools, Scanner};
use tool_launcher::{logging, Controller, LauncherError, WindowRegistry};

#[derive(Parser, Debug)]
#[command(name = "tool-launcher", version, about = "Search and launch the tools in a folder")]
struct Cli {
    /// Directory to scan for tools
    #[arg(long, global = true, default_value = ".")]
    dir: PathBuf,

    /// Config file (default: ~/.tool-launcher/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Initial view mode: grid, list or details
    #[arg(long, global = true)]
    view: Option<ViewMode>,

    /// Record launches instead of opening tools
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tools that match the search
    List {
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Launch the first tool that matches the search
    Launch {
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Render one frame to a PNG file
    Render {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
    },
    /// Apply JSONL commands from stdin, printing the status line after each
    Run {
        /// Write the final frame here once input ends
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = logging::init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!(error = ?e, "tool-launcher failed");
            let launcher_error = e.downcast_ref::<LauncherError>();
            let message = match launcher_error {
                Some(launcher_error) => launcher_error.user_message(),
                None => format!("{:#}", e),
            };
            eprintln!("tool-launcher: {}", message);
            if launcher_error.is_some_and(LauncherError::is_fatal) {
                for line in logging::recent_logs() {
                    eprintln!("  {}", line);
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(view) = cli.view {
        config.view_mode = Some(view);
    }
    info!(dir = %cli.dir.display(), dry_run = cli.dry_run, "Starting tool-launcher");

    let launcher: Box<dyn ProcessLauncher> = if cli.dry_run {
        Box::new(RecordingLauncher::new())
    } else {
        Box::new(ShellLauncher)
    };

    match cli.command.unwrap_or(Command::Run { snapshot: None }) {
        Command::List { search } => list(&cli.dir, &config, &search),
        Command::Launch { search } => {
            let mut controller = start_controller(&cli.dir, &config, launcher)?;
            controller.set_search(&search);
            let launched = controller.quick_launch();
            println!("{}", controller.status_text());
            Ok(match launched {
                Some(true) => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            })
        }
        Command::Render {
            out,
            search,
            width,
            height,
        } => {
            let base = config.get_window();
            config.window = Some(WindowConfig {
                width: width.unwrap_or(base.width),
                height: height.unwrap_or(base.height),
            });
            let mut controller = start_controller(&cli.dir, &config, launcher)?;
            controller.set_search(&search);
            controller
                .snapshot(&out)
                .with_context(|| format!("Failed to render {}", out.display()))?;
            println!("{}", controller.status_text());
            Ok(ExitCode::SUCCESS)
        }
        Command::Run { snapshot } => {
            let controller = start_controller(&cli.dir, &config, launcher)?;
            let mut registry = WindowRegistry::new();
            let id = registry.register(controller);

            let stdin = io::stdin();
            let mut stdout = io::stdout().lock();
            stdin_commands::run_commands(stdin.lock(), &mut stdout, &mut registry, id)?;

            if let Some(path) = snapshot {
                registry.get_mut(id)?.snapshot(&path)?;
            }
            registry.remove(id).warn_on_err();
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config()?,
    };
    Ok(config)
}

fn start_controller(
    dir: &Path,
    config: &Config,
    launcher: Box<dyn ProcessLauncher>,
) -> Result<Controller<Box<dyn ProcessLauncher>>> {
    let text = Rc::new(TextPainter::system());
    let mut controller = Controller::new(dir, config, text, launcher)?;
    controller.start();
    Ok(controller)
}

/// Metadata-only listing; icons are never created here
fn list(dir: &Path, config: &Config, search: &str) -> Result<ExitCode> {
    let scanner = Scanner::new(config.scan_options());
    let tools = match scanner.discover(dir) {
        Ok(tools) => tools,
        Err(e) => {
            eprintln!("{}", e.user_message());
            return Ok(ExitCode::SUCCESS);
        }
    };
    for tool in filter_tools(&tools, search) {
        println!("{}\t{}", tool.label(), tool.filename);
    }
    Ok(ExitCode::SUCCESS)
}
