use anyhow::{bail, Context};
use clap::Args;
use matsum::{partition, reduce_with, MergeStrategy, ReduceOptionsBuilder};
use matsum_rng::Generator;

/// Sum one generated matrix with every worker count and both merge strategies
#[derive(Args, Debug)]
pub struct SweepArgs {
    /// Matrix size N
    #[arg(short = 'n', long, default_value_t = 64)]
    pub size: usize,

    /// Generator seed
    #[arg(long, default_value_t = 0x5EED)]
    pub seed: u64,

    /// Random generator: lcg or chacha
    #[arg(long, default_value = "chacha")]
    pub generator: Generator,

    /// Repeat each configuration this many times
    #[arg(long, default_value_t = 3)]
    pub trials: usize,
}

pub fn run(args: SweepArgs) -> anyhow::Result<()> {
    let matrix = matsum_rng::generate(args.size, &mut args.generator.source(args.seed))?;
    let expected = matrix.sequential_sum();
    log::info!(
        "[sweep] {n}x{n} {} matrix, seed {}, sequential total {expected}",
        args.generator,
        args.seed,
        n = args.size
    );

    let mut mismatches = 0usize;
    for merge in MergeStrategy::ALL {
        let options = ReduceOptionsBuilder::default().merge(merge).build()?;
        for workers in 1..=args.size {
            let ranges = partition(args.size, workers)?;
            for trial in 0..args.trials {
                let reduction = reduce_with(&matrix, &ranges, &options)
                    .with_context(|| format!("{merge}, {workers} workers, trial {trial}"))?;
                if reduction.total != expected {
                    mismatches += 1;
                    log::error!(
                        "[sweep] {merge} with {workers} workers (trial {trial}): {} != {expected}",
                        reduction.total
                    );
                }
            }
            log::debug!("[sweep] {merge} with {workers} workers ok");
        }
    }

    if mismatches > 0 {
        bail!("{mismatches} reductions disagreed with the sequential total");
    }
    println!("[sweep] done");
    Ok(())
}
