//! Corelisp CLI.
//! Orchestrates run, repl, and conf commands.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser as ClapParser, Subcommand};
use colored::Colorize;
use miette::{IntoDiagnostic, Result};

use corelisp::conf::{cmd_conf_describe, cmd_conf_get, cmd_conf_list, cmd_conf_reset, cmd_conf_set, AxConf};
use corelisp::env::Env;
use corelisp::errors::AxError;
use corelisp::evaluator::Runtime;
use corelisp::reader;

// 64 MB stack — handles deeply-recursive user programs without overflowing
// the native stack before the evaluator's own call-depth guard trips.
const STACK_SIZE: usize = 64 * 1024 * 1024;

#[derive(ClapParser)]
#[command(
    name = "corelisp",
    version = "0.1.0",
    about = "A small Clojure-family Lisp with a tagged numeric tower",
    long_about = "corelisp — run scripts, start an interactive REPL, and manage runtime configuration."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a corelisp script
    Run { path: PathBuf },
    /// Start the interactive read-eval-print loop (default with no subcommand)
    Repl,
    /// Manage corelisp runtime configuration (~/.corelisp/conf.txt)
    Conf {
        #[command(subcommand)]
        cmd: ConfCommands,
    },
}

#[derive(Subcommand)]
enum ConfCommands {
    /// Set a property: corelisp conf set property=value
    Set { spec: String },
    /// Get a property: corelisp conf get property
    Get { key: String },
    /// List all properties with current values
    List,
    /// Reset all properties to their defaults
    Reset,
    /// Show detailed documentation for a property
    Describe { key: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let result = std::thread::Builder::new()
        .name("corelisp-worker".into())
        .stack_size(STACK_SIZE)
        .spawn(move || std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| run(cli))))
        .expect("failed to spawn corelisp worker thread")
        .join();

    match result {
        Ok(Ok(inner)) => inner,
        Ok(Err(panic_payload)) | Err(panic_payload) => {
            let msg = if let Some(s) = panic_payload.downcast_ref::<&str>() {
                format!("internal error (panic): {}", s)
            } else if let Some(s) = panic_payload.downcast_ref::<String>() {
                format!("internal error (panic): {}", s)
            } else {
                "internal error: unexpected panic in corelisp runtime".to_string()
            };
            eprintln!("{}", msg.red());
            Err(miette::miette!("{}", msg))
        }
    }
}

fn init_tracing(conf: &AxConf) {
    let default_filter = conf.log_level().to_string();
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn run(cli: Cli) -> Result<()> {
    let conf = AxConf::load();
    init_tracing(&conf);

    match cli.command.unwrap_or(Commands::Repl) {
        // ------------------------------------------------------------
        // corelisp run <file>
        // ------------------------------------------------------------
        Commands::Run { path } => {
            let source = std::fs::read_to_string(&path)
                .map_err(|e| miette::miette!("Cannot read '{}': {}", path.display(), e))?;

            let forms = reader::read_all(&source, 0).map_err(|e| miette::miette!("Parse error: {}", e))?;

            let mut rt = Runtime::with_max_call_depth(conf.max_call_depth() as usize);
            let mut env = Env::new();
            rt.eval_all(&forms, &mut env).map_err(|e| {
                eprintln!("{}", format_error(&e).red());
                miette::miette!("{}", e)
            })?;

            print!("{}", corelisp::builtins::io::take_output());
            std::io::stdout().flush().into_diagnostic()?;
        }

        // ------------------------------------------------------------
        // corelisp repl
        // ------------------------------------------------------------
        Commands::Repl => run_repl(&conf)?,

        // ------------------------------------------------------------
        // corelisp conf <set|get|list|reset|describe>
        // ------------------------------------------------------------
        Commands::Conf { cmd } => match cmd {
            ConfCommands::Set { spec } => {
                cmd_conf_set(&spec).map_err(|e| miette::miette!("{}", e))?;
            }
            ConfCommands::Get { key } => {
                cmd_conf_get(&key).map_err(|e| miette::miette!("{}", e))?;
            }
            ConfCommands::List => cmd_conf_list(),
            ConfCommands::Reset => {
                cmd_conf_reset().map_err(|e| miette::miette!("{}", e))?;
            }
            ConfCommands::Describe { key } => cmd_conf_describe(&key),
        },
    }

    Ok(())
}

fn run_repl(conf: &AxConf) -> Result<()> {
    let mut rt = Runtime::with_max_call_depth(conf.max_call_depth() as usize);
    let mut env = Env::new();

    println!("corelisp 0.1.0 — Ctrl-D to exit");
    let stdin = std::io::stdin();
    loop {
        print!("{}", conf.prompt());
        std::io::stdout().flush().into_diagnostic()?;

        let mut line = String::new();
        if stdin.read_line(&mut line).into_diagnostic()? == 0 {
            println!();
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        match reader::read_all(&line, 0) {
            Ok(forms) => {
                for form in &forms {
                    match rt.eval(form, &mut env) {
                        Ok(value) => {
                            print!("{}", corelisp::builtins::io::take_output());
                            if conf.print_result_tag() {
                                println!("=> {}", value.pr_str());
                            } else {
                                println!("{}", value.pr_str());
                            }
                        }
                        Err(e) => {
                            print!("{}", corelisp::builtins::io::take_output());
                            println!("{}", format_error(&e).red());
                        }
                    }
                }
            }
            Err(e) => println!("{}", format_error(&e).red()),
        }
    }
    Ok(())
}

fn format_error(e: &AxError) -> String {
    format!("{}: {}", e.kind, e.message)
}
