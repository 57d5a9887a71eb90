use std::fs::File;
use std::io::{prelude::*, stdin};
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use langid::{Classifier, Model};

#[derive(Parser, Debug)]
#[command(about = "A program to identify the language of text lines.")]
struct Args {
    /// The model file to use when analyzing text
    #[arg(long)]
    model: PathBuf,

    /// Print the full probability distribution instead of the best language
    #[arg(long)]
    probs: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    eprintln!("Loading model file...");
    let mut f = zstd::Decoder::new(File::open(args.model)?)?;
    let model = Model::read(&mut f)?;
    let classifier = Classifier::new(model)?;

    eprintln!("Start identification");
    let mut n_lines = 0;
    let start = Instant::now();
    for line in stdin().lock().lines() {
        let line = line?;
        let outcome = classifier.classify(&line);
        if args.probs {
            let probs: Vec<String> = outcome
                .distribution()
                .iter()
                .map(|(label, p)| format!("{label}={p:.6}"))
                .collect();
            println!("{}\t{}", outcome.label(), probs.join(" "));
        } else {
            println!("{}", outcome.label());
        }
        n_lines += 1;
    }
    let duration = start.elapsed();
    eprintln!("Elapsed: {} [sec]", duration.as_secs_f64());
    eprintln!(
        "Speed: {} [lines/sec]",
        f64::from(n_lines) / duration.as_secs_f64()
    );

    Ok(())
}
