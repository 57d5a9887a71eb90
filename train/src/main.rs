use std::fs::File;
use std::io::{prelude::*, stderr, BufReader};
use std::path::PathBuf;

use clap::Parser;
use langid::Trainer;

#[derive(Parser, Debug)]
#[command(about = "A program to train language identification models.")]
struct Args {
    /// The directory containing one <code>.txt corpus file per language
    #[arg(long)]
    data: PathBuf,

    /// The language codes to train on
    #[arg(long, required = true, num_args = 1..)]
    langs: Vec<String>,

    /// The file to write the trained model to
    #[arg(long)]
    model: PathBuf,

    /// The minimum character n-gram length
    #[arg(long, default_value = "1")]
    minn: usize,

    /// The maximum character n-gram length
    #[arg(long, default_value = "3")]
    maxn: usize,

    /// The number of GIS iterations
    #[arg(long, default_value = "100")]
    iters: usize,

    /// Stop iterating early when the relative log-likelihood improvement
    /// falls below this value
    #[arg(long)]
    tol: Option<f64>,

    /// The number of workers for zstd (0 means multithreaded will be disabled)
    #[arg(long, default_value = "0")]
    zstd_workers: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut trainer = Trainer::new(args.minn, args.maxn, args.iters)?;
    if let Some(tol) = args.tol {
        trainer = trainer.with_tolerance(tol);
    }

    eprintln!("Loading dataset...");
    for lang in &args.langs {
        let path = args.data.join(format!("{lang}.txt"));
        eprintln!("Loading {path:?} ...");
        let f = BufReader::new(File::open(path)?);
        let mut n_lines = 0;
        for (i, line) in f.lines().enumerate() {
            if i % 10000 == 0 {
                eprint!("# of sentences: {i}\r");
                stderr().flush()?;
            }
            trainer.push_line(lang, &line?)?;
            n_lines += 1;
        }
        eprintln!("# of sentences: {n_lines}");
    }
    eprintln!("# of features: {}", trainer.n_features());

    eprintln!("Start training...");
    let model = trainer.train()?;
    eprintln!("Finish training.");

    let mut f = zstd::Encoder::new(File::create(args.model)?, 19)?;
    f.multithread(args.zstd_workers)?;
    model.write(&mut f)?;
    f.finish()?;

    Ok(())
}
