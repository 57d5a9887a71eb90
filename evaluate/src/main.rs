use std::fs::File;
use std::io::{prelude::*, BufReader};
use std::path::PathBuf;

use clap::Parser;
use langid::{Classifier, Evaluator, Model, Tally};

#[derive(Parser, Debug)]
#[command(about = "A program to evaluate the precision of a language identification model.")]
struct Args {
    /// The model file to use when analyzing text
    #[arg(long)]
    model: PathBuf,

    /// The directory containing one <code>.txt test file per language
    #[arg(long)]
    data: PathBuf,

    /// The language codes to evaluate on
    #[arg(long, required = true, num_args = 1..)]
    langs: Vec<String>,
}

fn format_precision(tally: &Tally) -> String {
    match tally.precision() {
        Some(p) => format!("{p}%"),
        None => "n/a".to_string(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    eprintln!("Loading model file...");
    let mut f = zstd::Decoder::new(File::open(args.model)?)?;
    let model = Model::read(&mut f)?;
    let classifier = Classifier::new(model)?;

    eprintln!("Start evaluation");
    let mut evaluator = Evaluator::new();
    for lang in &args.langs {
        let path = args.data.join(format!("{lang}.txt"));
        eprintln!("Loading {path:?} ...");
        let f = BufReader::new(File::open(path)?);
        for line in f.lines() {
            let outcome = classifier.classify(&line?);
            evaluator.add(lang, outcome.label());
        }
    }

    let report = evaluator.report();
    println!(
        "Language=ALL, succeeded/failed: {}/{} (precision={})",
        report.global.matches(),
        report.global.mismatches(),
        format_precision(&report.global),
    );
    for (lang, tally) in &report.per_label {
        println!(
            "Language={lang}, succeeded/failed: {}/{} (precision={})",
            tally.matches(),
            tally.mismatches(),
            format_precision(tally),
        );
    }

    Ok(())
}
