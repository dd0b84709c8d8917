//! Searches for stripe arrangements with the most balanced reconstruction load.

#![warn(missing_docs, trivial_casts, unused_import_braces, unused_qualifications)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::default_trait_access)]

use std::convert::TryFrom;
use std::path::PathBuf;

use eyre::WrapErr;
use indicatif::{ProgressBar, ProgressStyle};
use structopt::StructOpt;

use stripes::{
    CancellationToken, Dimension, Mode, Objective, Report, SearchBuilder, SearchConfig, Silent,
};

/// Searches for stripe arrangements with the most balanced reconstruction load.
#[derive(Debug, StructOpt)]
struct Opt {
    #[structopt(long)]
    /// Number of disks the stripe is rotated over.
    disks: usize,

    #[structopt(long)]
    /// Number of parity groups in a stripe.
    groups: u16,

    #[structopt(long)]
    /// Number of members of each parity group.
    group_len: u16,

    #[structopt(long, default_value = "max")]
    /// Minimized metric: `max` or `spread`.
    objective: Objective,

    #[structopt(long, default_value = "exhaustive")]
    /// Arrangement generator: `exhaustive` or `sampling`.
    mode: Mode,

    #[structopt(long)]
    /// Number of workers; defaults to the number of logical CPUs.
    workers: Option<usize>,

    #[structopt(long)]
    /// Stop once this many arrangements reach the lowest possible objective value.
    target: Option<usize>,

    #[structopt(long)]
    /// Assign local parity to the most loaded member of each group.
    local_parity: bool,

    #[structopt(long)]
    /// Maximum number of iterations of each worker.
    max_iterations: Option<u64>,

    #[structopt(long)]
    /// Random seed for sampling.
    seed: Option<u64>,

    #[structopt(long)]
    /// Number of best arrangements kept in memory by each worker; defaults to `--limit`.
    retain: Option<usize>,

    #[structopt(long, default_value = "100")]
    /// Maximum number of arrangements to print.
    limit: usize,

    #[structopt(long)]
    /// Print the report in JSON format.
    json: bool,

    #[structopt(long)]
    /// Do not print progress.
    no_progress: bool,

    #[structopt(short, long, parse(from_occurrences))]
    /// Verbosity.
    verbose: u64,

    #[structopt(long)]
    /// Store the logs in this file.
    log_output: Option<PathBuf>,
}

fn search_config(opt: &Opt) -> eyre::Result<SearchConfig> {
    let mut builder = SearchBuilder::new(Dimension {
        disks_count: opt.disks,
        groups_count: opt.groups,
        group_len: opt.group_len,
    });
    builder
        .objective(opt.objective)
        .mode(opt.mode)
        .workers(opt.workers.unwrap_or_else(rayon::current_num_threads))
        .local_parity(opt.local_parity)
        .retain(opt.retain.unwrap_or(opt.limit));
    if let Some(target) = opt.target {
        builder.target(target);
    }
    if let Some(max_iterations) = opt.max_iterations {
        builder.max_iterations(max_iterations);
    }
    if let Some(seed) = opt.seed {
        builder.seed(seed);
    }
    builder.build().wrap_err("invalid search configuration")
}

fn set_up_logger(opt: &Opt) -> Result<(), fern::InitError> {
    let log_level = match opt.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let dispatch = fern::Dispatch::new()
        .format(|out, message, record| out.finish(format_args!("[{}] {}", record.level(), message)))
        .level(log_level)
        .chain(std::io::stderr());
    let dispatch = if let Some(path) = &opt.log_output {
        dispatch.chain(fern::log_file(path)?)
    } else {
        dispatch
    };
    dispatch.apply()?;
    Ok(())
}

/// Sets `token` on Ctrl-C. The listener lives on a helper thread for the rest of the process.
fn cancel_on_ctrl_c(token: CancellationToken) -> eyre::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("unable to start signal listener")?;
    std::thread::Builder::new()
        .name(String::from("ctrl-c"))
        .spawn(move || {
            runtime.block_on(async {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        log::warn!("Interrupted: stopping workers");
                        token.cancel();
                    }
                    Err(err) => log::error!("Unable to listen for Ctrl-C: {}", err),
                }
            });
        })
        .wrap_err("unable to spawn signal listener")?;
    Ok(())
}

/// Total number of iterations of all workers, if it is known in advance.
fn progress_len(config: &SearchConfig) -> Option<u64> {
    let budget = config.max_iterations.and_then(|budget| {
        u64::try_from(config.workers)
            .ok()
            .and_then(|workers| budget.checked_mul(workers))
    });
    let enumerated = match config.mode {
        Mode::Exhaustive => config
            .alphabet()
            .distinct_permutations()
            .and_then(|count| u64::try_from(count).ok()),
        Mode::Sampling => None,
    };
    match (enumerated, budget) {
        (Some(count), Some(budget)) => Some(count.min(budget)),
        (count, budget) => count.or(budget),
    }
}

/// Progress bar sized to the number of iterations if it is known in advance.
fn progress_bar(config: &SearchConfig) -> ProgressBar {
    if let Some(len) = progress_len(config) {
        ProgressBar::new(len).with_style(
            ProgressStyle::default_bar().template("{msg} {wide_bar} {percent}% [ETA {eta}]"),
        )
    } else {
        ProgressBar::new_spinner()
            .with_style(ProgressStyle::default_spinner().template("{spinner} {pos} {msg}"))
    }
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let opt = Opt::from_args();
    set_up_logger(&opt)?;
    let config = search_config(&opt)?;
    let token = CancellationToken::new();
    cancel_on_ctrl_c(token.clone())?;
    let outcome = if opt.no_progress {
        stripes::search(&config, &token, &Silent)?
    } else {
        let pb = progress_bar(&config);
        let outcome = stripes::search(&config, &token, &pb)?;
        pb.finish();
        outcome
    };
    let report = Report::new(&config, &outcome, opt.limit);
    if opt.json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        print!("{}", report);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    fn config(mode: Mode, max_iterations: Option<u64>, workers: usize) -> SearchConfig {
        let mut builder = SearchBuilder::new(Dimension {
            disks_count: 6,
            groups_count: 1,
            group_len: 2,
        });
        builder.mode(mode).workers(workers);
        if let Some(max_iterations) = max_iterations {
            builder.max_iterations(max_iterations);
        }
        builder.build().unwrap()
    }

    #[rstest(
        mode,
        max_iterations,
        workers,
        expected,
        case(Mode::Exhaustive, None, 1, Some(12)),
        case(Mode::Exhaustive, None, 4, Some(12)),
        case(Mode::Exhaustive, Some(5), 2, Some(10)),
        case(Mode::Exhaustive, Some(100), 2, Some(12)),
        case(Mode::Sampling, None, 2, None),
        case(Mode::Sampling, Some(7), 3, Some(21))
    )]
    fn test_progress_len(
        mode: Mode,
        max_iterations: Option<u64>,
        workers: usize,
        expected: Option<u64>,
    ) {
        assert_eq!(progress_len(&config(mode, max_iterations, workers)), expected);
    }

    #[test]
    fn test_progress_len_overflow() {
        let config = config(Mode::Sampling, Some(u64::MAX), 2);
        assert_eq!(progress_len(&config), None);
    }

    #[test]
    fn test_search_config() {
        let args = ["search-stripes", "--disks", "6", "--groups", "1", "--group-len", "2"];
        let config = search_config(&Opt::from_iter(&args)).unwrap();
        assert_eq!(config.retain, Some(100));
        assert_eq!(config.objective, Objective::Max);
        assert_eq!(config.mode, Mode::Exhaustive);
        assert_eq!(config.target, None);

        let args = [
            "search-stripes",
            "--disks",
            "6",
            "--groups",
            "1",
            "--group-len",
            "2",
            "--retain",
            "5",
            "--workers",
            "3",
            "--mode",
            "sampling",
            "--seed",
            "7",
        ];
        let config = search_config(&Opt::from_iter(&args)).unwrap();
        assert_eq!(config.retain, Some(5));
        assert_eq!(config.workers, 3);
        assert_eq!(config.mode, Mode::Sampling);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_search_config_invalid() {
        let args = ["search-stripes", "--disks", "5", "--groups", "2", "--group-len", "2"];
        assert!(search_config(&Opt::from_iter(&args)).is_err());
    }
}
