//! Mochi Edit - terminal text editor
//!
//! Usage: `mochi-edit [OPTIONS] [FILE]`

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;

use mochi_edit::app::{init_logging, CliArgs, Config};
use mochi_edit::editor::{Editor, EditorResult};
use mochi_edit::renderer::clear_screen;
use mochi_edit::storage::FileStorage;
use mochi_edit::tty::StdTerminal;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config = match Config::load_with_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("mochi-edit: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(path) = &config.log_file {
        if let Err(e) = init_logging(path) {
            eprintln!("mochi-edit: cannot open log file {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    }

    tracing::info!("Starting Mochi Edit");

    // The terminal is back in cooked mode once run() returns
    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let mut stdout = io::stdout();
            let _ = stdout.write_all(clear_screen().as_bytes());
            let _ = stdout.flush();
            tracing::error!("Fatal error: {}", e);
            eprintln!("mochi-edit: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs, config: &Config) -> EditorResult<()> {
    let terminal = StdTerminal::new()?;
    let mut editor = Editor::new(terminal, FileStorage, config)?;

    if let Some(path) = &args.file {
        editor.open(path);
    }

    editor.run()?;
    editor.terminal_mut().restore()?;
    Ok(())
}
