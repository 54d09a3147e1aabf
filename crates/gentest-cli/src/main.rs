//! `gentest` command line entry point

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use gentest_cli::{commands, init_logging, parse_contains, parse_newer, Overrides, StepFile};
use std::path::PathBuf;

fn file_arg() -> Arg {
    Arg::new("file")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Step file (.yaml, .yml or .json)")
}

fn max_loop_arg() -> Arg {
    Arg::new("max-loop")
        .long("max-loop")
        .value_parser(value_parser!(u32))
        .help("Revisits allowed per step (overrides the step file)")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

fn cli() -> Command {
    Command::new("gentest")
        .version(gentest_cli::VERSION)
        .about("Generate scenario tests from step graphs")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("scenarios")
                .about("List every generated scenario")
                .arg(file_arg())
                .arg(max_loop_arg())
                .arg(
                    Arg::new("start")
                        .long("start")
                        .help("Walk from this step instead of the start step"),
                )
                .arg(
                    Arg::new("contains")
                        .long("contains")
                        .action(ArgAction::Append)
                        .value_name("A,B")
                        .help("Keep scenarios running these steps back to back"),
                )
                .arg(
                    Arg::new("newer")
                        .long("newer")
                        .action(ArgAction::Append)
                        .value_name("OLDER,NEWER")
                        .help("Keep scenarios where NEWER was reached after OLDER"),
                )
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("plan")
                .about("Show the test methods of every scenario")
                .arg(file_arg())
                .arg(max_loop_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("graph")
                .about("Summarize the step graph")
                .arg(file_arg())
                .arg(json_arg()),
        )
}

fn overrides(args: &ArgMatches, with_filters: bool) -> Result<Overrides> {
    let mut overrides = Overrides {
        max_loop: args.get_one::<u32>("max-loop").copied(),
        ..Overrides::default()
    };
    if !with_filters {
        return Ok(overrides);
    }

    overrides.start = args.get_one::<String>("start").cloned();
    if let Some(runs) = args.get_many::<String>("contains") {
        overrides.filters.extend(runs.map(|run| parse_contains(run)));
    }
    if let Some(pairs) = args.get_many::<String>("newer") {
        for pair in pairs {
            overrides.filters.push(parse_newer(pair)?);
        }
    }
    Ok(overrides)
}

fn load(args: &ArgMatches) -> Result<StepFile> {
    let path = args
        .get_one::<PathBuf>("file")
        .context("missing step file argument")?;
    let file = StepFile::load(path)?;
    init_logging(&file.config.log_level, file.config.log_format)?;
    Ok(file)
}

fn run() -> Result<()> {
    let matches = cli().get_matches();

    let output = match matches.subcommand() {
        Some(("scenarios", args)) => {
            let file = load(args)?;
            commands::scenarios(&file, overrides(args, true)?, args.get_flag("json"))?
        }
        Some(("plan", args)) => {
            let file = load(args)?;
            commands::plan_text(&file, overrides(args, false)?, args.get_flag("json"))?
        }
        Some(("graph", args)) => {
            let file = load(args)?;
            commands::graph(&file, args.get_flag("json"))?
        }
        _ => unreachable!("subcommand is required"),
    };

    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
