use std::fs;

use clap::Parser;
use wavexpr::Expression;

/// wavexpr compiles and evaluates small numeric formulas, such as waveform
/// generators evaluated once per audio sample.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells wavexpr to read the formula from a file instead of the
    /// command line.
    #[arg(short, long)]
    file: bool,

    /// Runs the constant-folding optimizer before evaluating.
    #[arg(short, long)]
    optimize: bool,

    /// Binds a variable before evaluation, e.g. `--var t=0.5`. Repeatable.
    #[arg(short, long, value_name = "NAME=VALUE")]
    var: Vec<String>,

    contents: String,
}

fn main() {
    let args = Args::parse();

    let source = if args.file {
        fs::read_to_string(&args.contents).unwrap_or_else(|_| {
            eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                      &args.contents);
            std::process::exit(1);
        })
    } else {
        args.contents
    };

    let mut bindings = Vec::new();
    for var in &args.var {
        match parse_binding(var) {
            Some(binding) => bindings.push(binding),
            None => {
                eprintln!("Invalid binding '{var}'. Expected NAME=VALUE.");
                std::process::exit(1);
            },
        }
    }

    let names: Vec<&str> = bindings.iter().map(|(name, _)| name.as_str()).collect();
    let values: Vec<f64> = bindings.iter().map(|(_, value)| *value).collect();

    let mut expression = match Expression::compile(&source, &names) {
        Ok(expression) => expression,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        },
    };

    if args.optimize {
        expression.optimize();
    }

    match expression.evaluate(&values) {
        Ok(result) => println!("{result}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        },
    }
}

/// Splits a `NAME=VALUE` argument into its parts.
fn parse_binding(var: &str) -> Option<(String, f64)> {
    let (name, value) = var.split_once('=')?;
    let value = value.trim().parse().ok()?;
    Some((name.trim().to_string(), value))
}
