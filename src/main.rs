#![allow(nonstandard_style)]

use qc_rs::{Evaluator, PositionedError};

use clap::Parser;
use std::io::{BufRead, Write};
use std::process::ExitCode;

/// Evaluates arithmetic expressions.
#[derive(Parser, Debug)]
#[command(name = "qc", version)]
struct Args {
    /// Expression to evaluate. Without one, expressions are read line by line from stdin.
    expression: Option<String>,

    /// Significant digits shown in results.
    #[arg(short, long, default_value_t = 15, value_parser = clap::value_parser!(u8).range(1..=17))]
    precision: u8,
}

/// Logs go to stderr, and only when `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

/// Drops trailing zeros of a fraction, and the dot if nothing is left after it.
fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// `printf("%.*g")`: fixed notation unless the exponent is below -4 or at
/// least `precision`, trailing zeros removed either way.
fn format_result(value: f64, precision: u8) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let precision = usize::from(precision.max(1));
    let scientific = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exponent.abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn render_error(line: &str, error: &PositionedError) -> String {
    let width = error.end().saturating_sub(error.start()) + 1;
    format!(
        "Error parsing expression:\n{line}\n{}{}\n{error}",
        " ".repeat(error.start()),
        "^".repeat(width),
    )
}

fn run(evaluator: &mut Evaluator, line: &str, precision: u8) -> bool {
    let result = evaluator.set(line).and_then(|()| evaluator.evaluate());
    match result {
        Ok(value) => {
            println!("{}", format_result(value, precision));
            true
        },
        Err(e) => {
            eprintln!("{}", render_error(line, &e));
            false
        },
    }
}

/// Evaluates one expression per line until end of input; blank lines are skipped.
fn repl<R: BufRead>(evaluator: &mut Evaluator, input: R, precision: u8) -> std::io::Result<bool> {
    let mut last_ok = true;

    print!("> ");
    std::io::stdout().flush()?;

    for line in input.lines() {
        let line = line?;
        if !line.is_empty() {
            last_ok = run(evaluator, &line, precision);
        }

        print!("> ");
        std::io::stdout().flush()?;
    }
    Ok(last_ok)
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();
    let mut evaluator = Evaluator::new();

    let ok = match &args.expression {
        Some(expression) => run(&mut evaluator, expression, args.precision),
        None => match repl(&mut evaluator, std::io::stdin().lock(), args.precision) {
            Ok(ok) => ok,
            Err(e) => {
                eprintln!("Error reading input, {e}");
                false
            },
        },
    };

    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
