use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use stackmath::output::{to_mathml, to_text};
use stackmath::{
  builtins, evaluate_source, render, tokenize, Evaluation, Fragment,
};
use std::io::Read;
use std::process::ExitCode;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// How rendered equations are printed
  #[arg(
    long,
    value_enum,
    global = true,
    env = "STACKMATH_FORMAT",
    default_value_t = Format::Text
  )]
  format: Format,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
  Text,
  Mathml,
  Json,
}

#[derive(Subcommand)]
enum Commands {
  /// Evaluate a program and print every result as an equation
  Eval {
    /// Program words, read from stdin when omitted
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    program: Vec<String>,
  },
  /// Print the tokens of a program, one per line
  Tokens {
    /// Program words, read from stdin when omitted
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    program: Vec<String>,
  },
  /// List the builtin operators, functions and constants
  Builtins,
}

#[derive(Serialize)]
struct Report<'a> {
  #[serde(flatten)]
  evaluation: &'a Evaluation,
  message: Option<String>,
  equations: Vec<Fragment>,
  text: Vec<String>,
}

/// Logging is off unless `RUST_LOG` is set, e.g. `RUST_LOG=stackmath=trace`.
fn init_tracing() {
  use tracing_subscriber::{fmt, prelude::*, EnvFilter};

  if std::env::var("RUST_LOG").is_ok() {
    tracing_subscriber::registry()
      .with(
        fmt::layer()
          .with_writer(std::io::stderr)
          .with_target(true)
          .with_level(true),
      )
      .with(EnvFilter::from_default_env())
      .init();
  }
}

fn read_program(program: Vec<String>) -> anyhow::Result<String> {
  if !program.is_empty() {
    return Ok(program.join(" "));
  }
  let mut input = String::new();
  std::io::stdin()
    .read_to_string(&mut input)
    .context("failed to read program from stdin")?;
  Ok(input)
}

fn eval(source: &str, format: Format) -> anyhow::Result<ExitCode> {
  let evaluation = evaluate_source(source)?;
  let equations = render(&evaluation);

  match format {
    Format::Text => {
      for equation in &equations {
        println!("{}", equation);
      }
    }
    Format::Mathml => {
      for equation in &equations {
        println!("{}", to_mathml(equation.items()));
      }
    }
    Format::Json => {
      let report = Report {
        evaluation: &evaluation,
        message: evaluation.error.as_ref().map(ToString::to_string),
        text: equations.iter().map(|e| to_text(e.items())).collect(),
        equations,
      };
      let json = serde_json::to_string_pretty(&report)
        .context("failed to serialize evaluation")?;
      println!("{}", json);
    }
  }

  match &evaluation.error {
    Some(error) => {
      eprintln!("Error: {}", error);
      Ok(ExitCode::FAILURE)
    }
    None => Ok(ExitCode::SUCCESS),
  }
}

fn main() -> anyhow::Result<ExitCode> {
  init_tracing();
  let cli = Cli::parse();

  match cli.command {
    Commands::Eval { program } => {
      let source = read_program(program)?;
      eval(&source, cli.format)
    }
    Commands::Tokens { program } => {
      let source = read_program(program)?;
      for token in tokenize(&source)? {
        println!("{}", token);
      }
      Ok(ExitCode::SUCCESS)
    }
    Commands::Builtins => {
      for builtin in builtins::builtins() {
        println!(
          "{}\t{}\t{}",
          builtin.name,
          builtin.arity,
          builtin.display()
        );
      }
      Ok(ExitCode::SUCCESS)
    }
  }
}
