use clap::{Arg, ArgAction, ArgMatches, Command};
use pyll_core::ast::{load_ast_from_source, AstNode};
use pyll_core::location::{Location, Span};
use pyll_core::{
    lower_ast_to_ir, run_function, verify_module, ExecOptions, IrModule, Level, LowerOptions, PyllErrorExt,
    Source,
};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

mod logger;
mod output;

fn main() {
    let cli = Command::new("pyll")
        .version("0.1.0")
        .about("Lower a Python-like syntax tree to a block IR");

    let cli = setup_cli(cli);
    let matches = cli.get_matches();

    let verbose = matches.get_count("verbose");
    let quiet = matches.get_flag("quiet");
    logger::init(verbose, quiet);

    if let Err(err) = dispatch_commands(&matches) {
        output::print_error(err.as_ref());
        std::process::exit(1);
    }
}

/// Arguments shared by every subcommand that reads a tree.
fn tree_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("file")
            .help("The JSON syntax tree to compile")
            .required(true)
            .index(1),
    )
    .arg(
        Arg::new("entry")
            .help("Name of the function holding top-level statements")
            .long("entry")
            .value_parser(clap::value_parser!(String))
            .value_name("NAME"),
    )
    .arg(
        Arg::new("no-auto-declare")
            .help("Reject calls to functions that are not yet defined")
            .long("no-auto-declare")
            .action(ArgAction::SetTrue),
    )
}

/// Sets up the subcommands and their arguments.
fn setup_cli(cli: Command) -> Command {
    cli.arg(
        Arg::new("verbose")
            .help("More log output (-v info, -vv debug, -vvv trace)")
            .short('v')
            .long("verbose")
            .action(ArgAction::Count)
            .global(true),
    )
    .arg(
        Arg::new("quiet")
            .help("Only log errors")
            .short('q')
            .long("quiet")
            .action(ArgAction::SetTrue)
            .global(true),
    )
    .subcommand_required(true)
    .subcommand(
        tree_args(Command::new("build").about("Lower a syntax tree and print the IR"))
            .arg(
                Arg::new("dump")
                    .help("What to emit")
                    .short('d')
                    .long("dump")
                    .value_parser(["ast", "ir", "json"])
                    .default_value("ir")
                    .value_name("STAGE"),
            )
            .arg(
                Arg::new("output")
                    .help("Write to FILE instead of stdout")
                    .short('o')
                    .long("output")
                    .value_parser(clap::value_parser!(PathBuf))
                    .value_name("FILE"),
            )
            .arg(
                Arg::new("stats")
                    .help("Print a per-function summary")
                    .long("stats")
                    .action(ArgAction::SetTrue),
            ),
    )
    .subcommand(
        tree_args(Command::new("run").about("Lower a syntax tree and interpret it"))
            .arg(
                Arg::new("function")
                    .help("Function to call (defaults to the entry function)")
                    .short('f')
                    .long("function")
                    .value_parser(clap::value_parser!(String))
                    .value_name("NAME"),
            )
            .arg(
                Arg::new("args")
                    .help("Integer arguments passed to the function")
                    .index(2)
                    .num_args(0..)
                    .allow_negative_numbers(true)
                    .value_parser(clap::value_parser!(i32)),
            )
            .arg(
                Arg::new("max-steps")
                    .help("Abort after this many executed instructions")
                    .long("max-steps")
                    .value_parser(clap::value_parser!(usize))
                    .value_name("N"),
            )
            .arg(
                Arg::new("trace")
                    .help("Log every executed instruction")
                    .long("trace")
                    .action(ArgAction::SetTrue),
            ),
    )
    .subcommand(tree_args(Command::new("check").about("Lower and verify a syntax tree without emitting")))
}

/// Failures that happen in the driver itself rather than in the compiler.
#[derive(Debug)]
struct CliError {
    message: String,
}

impl PyllErrorExt for CliError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        "pyll.cli".to_string()
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        None
    }
}

fn cli_error(message: String) -> Box<dyn PyllErrorExt> {
    Box::new(CliError { message })
}

fn lower_options(sub_m: &ArgMatches) -> LowerOptions {
    let mut options = LowerOptions::default();
    if let Some(entry) = sub_m.get_one::<String>("entry") {
        options.entry_name = entry.clone();
    }
    if sub_m.get_flag("no-auto-declare") {
        options.auto_declare_callees = false;
    }
    options
}

fn load_tree(sub_m: &ArgMatches) -> Result<AstNode, Box<dyn PyllErrorExt>> {
    let file = sub_m
        .get_one::<String>("file")
        .ok_or_else(|| cli_error("missing syntax tree path".to_string()))?;
    let source = Source::new(PathBuf::from(file))?;
    load_ast_from_source(&source)
}

fn lower_and_verify(tree: &AstNode, options: &LowerOptions) -> Result<IrModule, Box<dyn PyllErrorExt>> {
    let module = lower_ast_to_ir(tree, options)?;
    verify_module(&module)?;
    Ok(module)
}

fn dispatch_commands(matches: &ArgMatches) -> Result<(), Box<dyn PyllErrorExt>> {
    match matches.subcommand() {
        Some(("build", sub_m)) => build(sub_m),
        Some(("run", sub_m)) => run(sub_m),
        Some(("check", sub_m)) => check(sub_m),
        _ => Err(cli_error("No valid subcommand was used. Use --help for more information.".to_string())),
    }
}

fn build(sub_m: &ArgMatches) -> Result<(), Box<dyn PyllErrorExt>> {
    let tree = load_tree(sub_m)?;
    let module = lower_and_verify(&tree, &lower_options(sub_m))?;

    let stage = sub_m.get_one::<String>("dump").map(String::as_str).unwrap_or("ir");
    let rendered = match stage {
        "ast" => tree.to_string(),
        "json" => serde_json::to_string_pretty(&module)
            .map_err(|e| cli_error(format!("Cannot serialize module: {}", e)))?,
        _ => module.to_string(),
    };

    match sub_m.get_one::<PathBuf>("output") {
        Some(path) => {
            fs::write(path, rendered).map_err(|e| cli_error(format!("Cannot write {:?}: {}", path, e)))?;
            log::info!("wrote {} to {:?}", stage, path);
        }
        None => print!("{}", rendered),
    }

    if sub_m.get_flag("stats") {
        println!("{}", output::stats_table(&module));
    }
    Ok(())
}

fn run(sub_m: &ArgMatches) -> Result<(), Box<dyn PyllErrorExt>> {
    let tree = load_tree(sub_m)?;
    let lower = lower_options(sub_m);
    let module = lower_and_verify(&tree, &lower)?;

    let mut exec = ExecOptions::default();
    if let Some(steps) = sub_m.get_one::<usize>("max-steps") {
        exec.max_steps = *steps;
    }
    exec.trace = sub_m.get_flag("trace");

    let name = sub_m.get_one::<String>("function").unwrap_or(&lower.entry_name);
    let args: Vec<i32> = sub_m
        .get_many::<i32>("args")
        .map(|values| values.copied().collect())
        .unwrap_or_default();

    let outcome = run_function(&module, name, &args, &exec)?;
    let mut stdout = std::io::stdout().lock();
    for value in outcome.output.iter() {
        writeln!(stdout, "{}", value).map_err(|e| cli_error(format!("Cannot write output: {}", e)))?;
    }
    output::print_result(&mut std::io::stderr(), name, outcome.value)
        .map_err(|e| cli_error(format!("Cannot write output: {}", e)))?;
    log::info!("@{} finished after {} steps", name, outcome.steps);
    Ok(())
}

fn check(sub_m: &ArgMatches) -> Result<(), Box<dyn PyllErrorExt>> {
    let tree = load_tree(sub_m)?;
    let module = lower_and_verify(&tree, &lower_options(sub_m))?;
    let defined = module.functions().filter(|(_, f)| !f.is_declaration()).count();
    output::print_success(
        &mut std::io::stdout(),
        &format!("ok: {} function(s) defined, {} declared", defined, module.len() - defined),
    )
    .map_err(|e| cli_error(format!("Cannot write output: {}", e)))
}
