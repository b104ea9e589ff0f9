#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # sheetgrade
//!
//! Grades a photographed or scanned arithmetic worksheet.
//!
//! `sheetgrade image page.png` runs tesseract on the page, repairs common
//! recognition mistakes, checks every `question = answer` it finds using
//! exact arithmetic and prints a score out of 100.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bpaf::*;
use colored::Colorize;
use dotenvy::dotenv;
use serde::Serialize;
use sheetgrade::{
    Annotations, GradeReport, Grader,
    annotate::render_table,
    compare::equivalent,
    config,
    equation::split,
    evaluate, grade_page,
    recognize::{TesseractRecognizer, parse_tsv, tokens_from_lines},
};
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Where the page's tokens come from.
#[derive(Debug, Clone)]
enum Source {
    /// A page image run through tesseract
    Image(PathBuf),
    /// Saved `tesseract ... tsv` output
    Tsv(PathBuf),
    /// Plain recognized text, one equation per line
    Lines(PathBuf),
}

/// How to print the result.
#[derive(Debug, Clone, Copy)]
struct Output {
    /// print JSON instead of text
    json:  bool,
    /// print a table of verdicts
    table: bool,
}

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Grade a page
    Grade(Source, Output),
    /// Evaluate one expression or check one equation
    Eval(String),
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    /// parses the input path
    fn p() -> impl Parser<PathBuf> {
        positional("PATH").help("File to grade")
    }

    /// parses output flags
    fn o() -> impl Parser<Output> {
        let json = long("json")
            .help("Print the report and marks as JSON")
            .switch();
        let table = long("table").help("Print a table of verdicts").switch();
        construct!(Output { json, table })
    }

    /// parses the expression to evaluate
    fn e() -> impl Parser<String> {
        positional("EXPR").help("An expression like `6/4` or an equation like `2t2=4`")
    }

    let image_path = p().map(Source::Image);
    let image = construct!(Cmd::Grade(image_path, o()))
        .to_options()
        .command("image")
        .help("Recognize a worksheet image with tesseract and grade it");

    let tsv_path = p().map(Source::Tsv);
    let tsv = construct!(Cmd::Grade(tsv_path, o()))
        .to_options()
        .command("tsv")
        .help("Grade saved tesseract TSV output");

    let lines_path = p().map(Source::Lines);
    let lines = construct!(Cmd::Grade(lines_path, o()))
        .to_options()
        .command("lines")
        .help("Grade plain recognized text, one equation per line");

    let eval = construct!(Cmd::Eval(e()))
        .to_options()
        .command("eval")
        .help("Evaluate an expression, or check the answer of an equation");

    let cmd = construct!([image, tsv, lines, eval]);

    cmd.to_options()
        .descr("Grades arithmetic worksheets")
        .run()
}

/// Everything printed for `--json`.
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// score and verdicts
    report:      &'a GradeReport,
    /// drawing instructions and report text
    annotations: &'a Annotations,
}

/// Collects tokens from `source` and grades them.
async fn grade(source: &Source, grader: &Grader) -> Result<GradeReport> {
    let read = |path: &PathBuf| {
        std::fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))
    };

    let report = match source {
        Source::Image(path) => {
            let tesseract = config::ensure_initialized()?.tesseract().clone();
            let recognizer = TesseractRecognizer::new(tesseract);
            grade_page(&recognizer, grader, path)
                .await
                .with_context(|| format!("Failed to recognize {}", path.display()))?
        }
        Source::Tsv(path) => grader.grade(&parse_tsv(&read(path)?)?),
        Source::Lines(path) => grader.grade(&tokens_from_lines(&read(path)?)),
    };
    Ok(report)
}

/// Prints the result of grading
fn show(report: &GradeReport, output: Output) -> Result<()> {
    let annotations = config::ensure_initialized()?
        .mark_layout()
        .annotate(report.verdicts());

    if output.json {
        let json = JsonOutput {
            report,
            annotations: &annotations,
        };
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    if output.table {
        println!("{}", render_table(report));
    } else {
        print!("{}", annotations.report);
    }

    let summary = report.to_string();
    match report.score_percent() {
        100 => println!("{}", summary.green().bold()),
        0 => println!("{}", summary.red().bold()),
        _ => println!("{}", summary.yellow().bold()),
    }
    Ok(())
}

/// Evaluates an expression, or checks the answer of an equation.
fn eval(text: &str, grader: &Grader) -> Result<()> {
    let candidate = split(&grader.confusions().normalize(text));
    let expected = evaluate(&candidate.expression)
        .with_context(|| format!("Could not evaluate `{}`", candidate.expression))?;

    match candidate.answer() {
        None => println!("{} = {expected}", candidate.expression),
        Some(claim) if equivalent(&expected, claim) => {
            println!("{} = {claim} {}", candidate.expression, "✓".green())
        }
        Some(claim) => println!(
            "{} = {claim} {}",
            candidate.expression,
            format!("✗ (expected {expected})").red()
        ),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);
    let level = std::env::var("SHEETGRADE_LOG")
        .ok()
        .and_then(|value| value.trim().parse::<Level>().ok())
        .unwrap_or(Level::WARN);
    let filter_layer = LevelFilter::from_level(level);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    let grader = Grader::from_config()?;

    match options() {
        Cmd::Grade(source, output) => {
            let report = grade(&source, &grader).await?;
            show(&report, output)?;
        }
        Cmd::Eval(text) => eval(&text, &grader)?,
    }

    Ok(())
}
