use clap::{Parser as ClapParser, Subcommand};
use jmespath_compiler::{
    CompileOptions,
    cli::{self, CliError, CompileCommand, RunOptions},
};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "jmesc")]
#[command(about = "jmesc - Compile JMESPath ASTs into executable procedures")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the generated source for an AST
    Compile {
        /// The AST as JSON
        ast: String,

        /// Name of the generated procedure
        #[arg(short, long, default_value = "compiled")]
        name: String,

        /// Query text to write as a comment above the procedure
        #[arg(short, long, default_value = "")]
        display: String,
    },

    /// Compile an AST and evaluate it against JSON input
    Run {
        /// The AST as JSON
        ast: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Compile { ast, name, display } => run_compile(ast, name, display),
        Commands::Run { ast, input, pretty } => run_query(ast, input, pretty),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "jmespath_compiler=debug",
        _ => "jmespath_compiler=trace",
    };
    let filter = EnvFilter::try_from_env("JMESC_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_compile(ast: String, name: String, display: String) -> Result<(), CliError> {
    let command = CompileCommand {
        ast,
        options: CompileOptions::new(name, display),
    };
    let procedure = cli::execute_compile(&command)?;
    print!("{}", procedure.source());
    Ok(())
}

fn run_query(ast: String, input: Option<String>, pretty: bool) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let output = cli::execute_run(&RunOptions { ast, input })?;
    let json = if pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }?;
    println!("{}", json);
    Ok(())
}
