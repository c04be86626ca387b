use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use basil::ast_printer::AstPrinter;
use basil::error::BasilError;
use basil::scanner::Scanner;
use basil::token::Token;
use basil::{Outcome, Session};

#[derive(ClapParser, Debug)]
#[command(version, about = "Basil language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to basil.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the token list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parses a file and prints every statement in prefix form
    Parse { filename: PathBuf },

    /// Runs a file as a Basil program
    Run { filename: PathBuf },

    /// Starts an interactive prompt
    Repl,
}

fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);

    let source: String = std::fs::read_to_string(filename)
        .with_context(|| format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", source.len(), filename);

    Ok(source)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("basil.log").context("Failed to create basil.log")?;

    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("basil::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .init();

    info!("Logger initialized, writing to basil.log");
    Ok(())
}

fn report(errors: &[BasilError]) {
    for e in errors {
        debug!("Reporting: {}", e);
        eprintln!("{}", e);
    }
}

fn report_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Ok => {}
        Outcome::CompileErrors(errors) => report(errors),
        Outcome::RuntimeError(e) => report(std::slice::from_ref(e)),
    }
}

fn tokenize(filename: &Path, json: bool) -> Result<u8> {
    let source: String = read_file(filename)?;

    let mut tokens: Vec<Token> = Vec::new();
    let mut errors: Vec<BasilError> = Vec::new();

    for item in Scanner::new(&source) {
        match item {
            Ok(token) => tokens.push(token),
            Err(e) => errors.push(e),
        }
    }

    report(&errors);

    if json {
        let out: String =
            serde_json::to_string_pretty(&tokens).context("Failed to serialize tokens")?;
        println!("{}", out);
    } else {
        for token in &tokens {
            println!("{}", token);
        }
    }

    Ok(if errors.is_empty() { 0 } else { 65 })
}

fn parse(filename: &Path) -> Result<u8> {
    let source: String = read_file(filename)?;

    match Session::new().parse(&source) {
        Ok(statements) => {
            info!("Parsed {} statements", statements.len());
            for stmt in &statements {
                println!("{}", AstPrinter::print_stmt(stmt));
            }
            Ok(0)
        }
        Err(errors) => {
            report(&errors);
            Ok(65)
        }
    }
}

fn run(filename: &Path) -> Result<u8> {
    let source: String = read_file(filename)?;

    let outcome: Outcome = Session::new().run(&source);
    report_outcome(&outcome);

    Ok(outcome.exit_code() as u8)
}

fn repl() -> Result<u8> {
    let mut session = Session::new();
    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().context("Failed to flush stdout")?;

        line.clear();
        let read: usize = stdin
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;

        if read == 0 {
            println!();
            return Ok(0);
        }

        report_outcome(&session.run(&line));
    }
}

fn main() -> Result<ExitCode> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    let code: u8 = match &args.commands {
        Commands::Tokenize { filename, json } => tokenize(filename, *json)?,
        Commands::Parse { filename } => parse(filename)?,
        Commands::Run { filename } => run(filename)?,
        Commands::Repl => repl()?,
    };

    info!("Exiting with code {}", code);

    Ok(ExitCode::from(code))
}
