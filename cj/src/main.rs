use crate::settings::Settings;
use anyhow::Result;
use cj_frecency::{
    add, current_time, list, query, reinforce, Action, Candidate, QueryOptions, QueryResult,
    SortMethod,
};
use clap::{Parser, Subcommand};
use crossterm::style::{Color, Stylize};
use std::io::{self, Write as _};
use std::process::ExitCode;
use tracing::debug;

mod settings;

#[derive(Parser)]
#[command(
    name = "cj",
    version,
    about = "Jump to the directory most associated with a command",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Print all candidates ranked instead of acting
    #[arg(short = 'l', long)]
    list: bool,

    /// Print the best match without changing state
    #[arg(short = 'p', long)]
    print: bool,

    /// Jump only, never execute the matched command
    #[arg(short = 'j', long)]
    jump_only: bool,

    /// Ask for confirmation before executing
    #[arg(short = 'c', long)]
    confirm: bool,

    /// Rank by raw frequency instead of frecency
    #[arg(short = 't', long)]
    rank: bool,

    /// Rank by recency instead of frecency
    #[arg(short = 'r', long)]
    recency: bool,

    /// Only match directories containing this substring
    #[arg(short = 'd', long, value_name = "PATH")]
    filter: Option<String>,

    /// Turn persistent debug logging on
    #[arg(long)]
    debug_on: bool,

    /// Turn persistent debug logging off
    #[arg(long)]
    debug_off: bool,

    /// Query tokens; the keyword `in` separates command from path filter
    tokens: Vec<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Record a command executed in a directory
    Add {
        /// Working directory of the command (defaults to the current one)
        #[arg(long)]
        dir: Option<String>,

        /// The command line as executed
        #[arg(trailing_var_arg = true, required = true)]
        command: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = Settings::from_env();

    if cli.debug_on || cli.debug_off {
        return match settings.set_debug(cli.debug_on) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("cj: {}", err);
                ExitCode::FAILURE
            }
        };
    }

    if settings.debug_enabled() {
        if let Err(err) = init_tracing(&settings) {
            eprintln!("cj: failed to initialize logging: {err}");
        }
    }

    match run(&cli, &settings) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("cj: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(settings: &Settings) -> Result<()> {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(settings.log_file())?;
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::sync::Arc::new(log_file))
        .init();
    Ok(())
}

fn run(cli: &Cli, settings: &Settings) -> Result<bool> {
    let config = &settings.config;
    let now = current_time();

    if let Some(Command::Add { dir, command }) = &cli.command {
        let directory = match dir {
            Some(d) => d.clone(),
            None => std::env::current_dir()?.to_string_lossy().into_owned(),
        };
        let stored = add(&command.join(" "), &directory, config, now)?;
        debug!("add stored={}", stored);
        return Ok(stored);
    }

    let action = if cli.list {
        Action::List
    } else if cli.print {
        Action::Print
    } else if cli.jump_only {
        Action::Jump
    } else if cli.confirm {
        Action::Confirm
    } else {
        Action::JumpAndExecute
    };
    let sort = if cli.rank {
        SortMethod::Frequent
    } else if cli.recency {
        SortMethod::Recent
    } else {
        SortMethod::Frecent
    };
    let opts = QueryOptions {
        sort,
        action,
        path_filter: cli.filter.clone(),
    };

    if action == Action::List {
        let candidates = list(&cli.tokens, &opts, config, now)?;
        if candidates.is_empty() {
            eprintln!("cj: no matching entries");
            return Ok(false);
        }
        print_candidates(&candidates);
        return Ok(true);
    }

    let Some(result) = query(&cli.tokens, &opts, config, now)? else {
        eprintln!("cj: no matching entries");
        return Ok(false);
    };
    debug!("matched {} in {}", result.command, result.directory);

    // The shell wrapper consumes stdout: the directory to cd into and,
    // in execute modes, the command to run there.
    match action {
        Action::Jump => println!("{}", result.directory),
        Action::Print | Action::JumpAndExecute => {
            println!("{}", result.directory);
            println!("{}", result.command);
            if action == Action::JumpAndExecute {
                reinforce(&result, config, now)?;
            }
        }
        Action::Confirm => {
            if confirm_execute(&result)? {
                println!("{}", result.directory);
                println!("{}", result.command);
                reinforce(&result, config, now)?;
            } else {
                println!("{}", result.directory);
            }
        }
        Action::List => unreachable!(),
    }
    Ok(true)
}

fn confirm_execute(result: &QueryResult) -> Result<bool> {
    eprint!("execute '{}' in {}? [y/N] ", result.command, result.directory);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

fn print_candidates(candidates: &[Candidate]) {
    for cand in candidates {
        println!(
            "{:>12.0} {} {}",
            cand.rank,
            cand.entry.directory.as_str().with(Color::Blue),
            cand.entry.command.as_str().with(Color::DarkGrey),
        );
    }
}
