mod error_formatter;
mod formatter;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shunt::evaluator::functions::BUILTINS;
use shunt::{default_environment, Environment, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser)]
#[command(name = "shunt")]
#[command(about = "Evaluate Shunt expressions from the command line.")]
#[command(
    long_about = "Shunt is an embeddable expression language for rules and computed fields.\nThe CLI evaluates a single expression against constants given as arguments or loaded from a JSON file, and can dump the token stream of an expression."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression and print its value
    ///
    /// The default functions (if, coalesce, min, max) and the numeric
    /// builtins (abs, sqrt, round, ...) are available.
    Eval {
        /// Expression to evaluate, e.g. "price * (1 + vat)"
        expression: String,
        /// Constants (format: name=value)
        ///
        /// Values are read as JSON when they parse as JSON and as text otherwise.
        /// Examples: price=100, vat=0.21, name=Alice, tags='["a","b"]'
        constants: Vec<String>,
        /// Fail on names that are not bound to a constant
        #[arg(short = 's', long)]
        strict: bool,
        /// JSON file with an object of constants
        #[arg(short = 'c', long = "constants", value_name = "FILE")]
        constants_file: Option<PathBuf>,
        /// Print the result as JSON
        #[arg(short = 'j', long)]
        json: bool,
    },
    /// Show the tokens an expression scans into
    Tokens {
        /// Expression to scan
        expression: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shunt=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (result, source) = match &cli.command {
        Commands::Eval {
            expression,
            constants,
            strict,
            constants_file,
            json,
        } => (
            eval_command(
                expression,
                constants,
                *strict,
                constants_file.as_deref(),
                *json,
            ),
            expression,
        ),
        Commands::Tokens { expression } => (tokens_command(expression), expression),
    };

    if let Err(e) = result {
        // Spanned library errors get a source excerpt, everything else prints plainly
        if let Some(shunt_err) = e.downcast_ref::<shunt::ShuntError>() {
            eprintln!("{}", error_formatter::format_error(shunt_err, source));
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

fn eval_command(
    expression: &str,
    constants: &[String],
    strict: bool,
    constants_file: Option<&Path>,
    json: bool,
) -> Result<()> {
    let mut env = host_environment()?;
    env.set_strict_mode(strict);

    if let Some(path) = constants_file {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read constants file {}", path.display()))?;
        for (name, value) in shunt::serializers::from_json(&bytes)? {
            env.define_constant(name, value);
        }
    }

    for (name, value) in parse_constants(constants)? {
        env.define_constant(name, value);
    }

    debug!(constants = env.constants().len(), "environment ready");
    let value = env.evaluate(expression)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", value);
    }
    Ok(())
}

fn tokens_command(expression: &str) -> Result<()> {
    let stream = shunt::tokenize(expression)?;
    let formatter = formatter::Formatter::new();
    print!("{}", formatter.format_tokens(&stream));
    if let Some(rest) = stream.remainder() {
        println!("(unscanned: {})", rest);
    }
    Ok(())
}

/// Default environment plus every numeric host builtin
fn host_environment() -> Result<Environment> {
    let mut env = default_environment();
    for name in BUILTINS {
        if env.has_function(name) {
            continue;
        }
        env.define_builtin(name)?;
    }
    Ok(env)
}

fn parse_constants(args: &[String]) -> Result<Vec<(String, Value)>> {
    args.iter()
        .map(|arg| {
            let (name, raw) = arg.split_once('=').ok_or_else(|| {
                anyhow::anyhow!("Invalid constant '{}', expected name=value", arg)
            })?;
            if name.is_empty() {
                anyhow::bail!("Invalid constant '{}', the name is empty", arg);
            }
            let value = match serde_json::from_str::<serde_json::Value>(raw) {
                Ok(json) => Value::from(json),
                Err(_) => Value::from(raw),
            };
            Ok((name.to_string(), value))
        })
        .collect()
}
