use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use vocab_quiz::generator::sino_numbers::generate_drill_records;

/// Writes a headerless `term,translation` CSV of Sino-Korean number drills.
#[derive(Parser)]
#[command(name = "generate_drill_pool", version)]
struct Args {
    #[arg(short, long, default_value_t = 200, help = "Number of rows")]
    count: usize,

    #[arg(short, long, default_value_t = 1_000_000, help = "Largest number drawn")]
    max_value: u64,

    #[arg(short, long, default_value_t = 2024, help = "Seed, so reruns produce the same file")]
    seed: u64,

    #[arg(short, long, default_value = "drill-pools/numbers.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let mut rng = SmallRng::seed_from_u64(args.seed);
    let records = generate_drill_records(args.count, args.max_value, &mut rng);

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&args.output)
        .with_context(|| format!("opening {}", args.output.display()))?;
    for record in &records {
        writer.write_record([&record.term, &record.translation])?;
    }
    writer.flush()?;

    println!("Wrote {} ({} rows)", args.output.display(), records.len());
    Ok(())
}
