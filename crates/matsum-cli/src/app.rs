use std::io::{BufRead, Write};

use anyhow::{ensure, Context};
use matsum::{
    partition, reduce_with, validate, Assignment, AssignmentReport, Matrix, ReduceOptionsBuilder,
    Summary,
};

use crate::config::{Mode, Settings};
use crate::prompt::Prompter;

/// Obtain a matrix and worker count, sum it, and write the report to `output`.
///
/// Prompts read `input` and are written to `prompts`; only the report goes to
/// `output`, so `--json` output stays parseable.
pub fn run<R: BufRead, P: Write, W: Write>(
    settings: &Settings,
    input: R,
    prompts: P,
    mut output: W,
) -> anyhow::Result<Summary> {
    let mut prompt = Prompter::new(input, prompts);

    let matrix = obtain_matrix(settings, &mut prompt, &mut output)?;
    let size = matrix.size();

    let workers = match settings.workers {
        Some(workers) => workers,
        None => prompt.workers(size)?,
    };
    let ranges = partition(size, workers).context("invalid worker count")?;

    let out = &mut output;
    if !settings.json {
        writeln!(out)?;
        write!(out, "{}", AssignmentReport(&Assignment::from_ranges(&ranges)))?;
    }

    let options = ReduceOptionsBuilder::default()
        .merge(settings.merge)
        .build()?;
    let reduction = reduce_with(&matrix, &ranges, &options).context("parallel reduction failed")?;

    if settings.verify {
        let expected = matrix.sequential_sum();
        ensure!(
            reduction.total == expected,
            "parallel total {} does not match sequential total {expected}",
            reduction.total
        );
        tracing::info!(total = expected, "verified against sequential sum");
    }

    let summary = Summary::new(size, settings.merge, &reduction);
    if settings.json {
        serde_json::to_writer_pretty(&mut *out, &summary)?;
        writeln!(out)?;
    } else {
        writeln!(out)?;
        writeln!(out, "Total Sum of Matrix: {}", summary.total)?;
        writeln!(out, "Time taken: {} microseconds", summary.elapsed_micros)?;
    }
    out.flush()?;

    Ok(summary)
}

fn obtain_matrix<R: BufRead, P: Write, W: Write>(
    settings: &Settings,
    prompt: &mut Prompter<R, P>,
    out: &mut W,
) -> anyhow::Result<Matrix> {
    if let Some(path) = &settings.input {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading matrix {}", path.display()))?;
        let matrix =
            Matrix::parse(&text).with_context(|| format!("parsing matrix {}", path.display()))?;
        if let Some(size) = settings.size {
            ensure!(
                size == matrix.size(),
                "{} holds a {n}x{n} matrix, but size {size} was requested",
                path.display(),
                n = matrix.size()
            );
        }
        tracing::debug!(path = %path.display(), size = matrix.size(), "loaded matrix");
        return Ok(matrix);
    }

    let size = match settings.size {
        Some(size) => {
            validate(size, 1).context("invalid matrix size")?;
            size
        }
        None => prompt.size()?,
    };
    Matrix::check_size(size).context("invalid matrix size")?;

    let mode = match settings.mode {
        Some(mode) => mode,
        None => prompt.mode()?,
    };

    match mode {
        Mode::Manual => {
            writeln!(prompt.output())?;
            prompt.matrix(size)
        }
        Mode::Random => {
            tracing::info!(
                seed = settings.seed,
                generator = %settings.generator,
                size,
                "generating matrix"
            );
            let mut source = settings.generator.source(settings.seed);
            let matrix = matsum_rng::generate(size, &mut source)?;
            if settings.print_matrix && !settings.json {
                writeln!(out)?;
                writeln!(out, "Generated Matrix:")?;
                write!(out, "{matrix}")?;
            }
            Ok(matrix)
        }
    }
}
