use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use log::info;

use nsga2_nas::benchmark::{write_records, LookupEvaluator};
use nsga2_nas::demo_data::synthetic_benchmark;
use nsga2_nas::indicators::igd;
use nsga2_nas::report::{append_summary, timestamped_name, write_front, write_history, RunSummary};
use nsga2_nas::visualization::plot_search_progress;
use nsga2_nas::{Nsga2Config, Nsga2Optimizer, ParallelEvaluator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Dataset {
    Cifar10,
    Cifar100,
    Imagenet,
}

impl Dataset {
    fn file_stem(self) -> &'static str {
        match self {
            Dataset::Cifar10 => "cifar10",
            Dataset::Cifar100 => "cifar100",
            Dataset::Imagenet => "ImageNet16-120",
        }
    }
}

/// Multi-objective architecture search with NSGA-II.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    #[arg(long, value_enum, default_value = "cifar10")]
    dataset: Dataset,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    pop_size: Option<usize>,

    #[arg(long)]
    n_gens: Option<usize>,

    #[arg(long)]
    n_offspring: Option<usize>,

    /// TOML file with optimizer settings; flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding `<dataset>.csv` benchmark tables.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Search a synthetic benchmark instead of a table on disk.
    #[arg(long)]
    demo: bool,

    #[arg(long, default_value = "populations")]
    output_dir: PathBuf,

    /// Render a PNG of the search progress.
    #[arg(long)]
    plot: bool,
}

fn load_config(args: &Args) -> Result<Nsga2Config> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            toml::from_str::<Nsga2Config>(&text)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => Nsga2Config::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(pop_size) = args.pop_size {
        config.pop_size = pop_size;
    }
    if let Some(n_gens) = args.n_gens {
        config.n_generations = n_gens;
    }
    if let Some(n_offspring) = args.n_offspring {
        config.n_offsprings = n_offspring;
    }

    config.validate()?;
    Ok(config)
}

fn load_benchmark(args: &Args, config: &Nsga2Config) -> Result<LookupEvaluator> {
    if args.demo {
        let records = synthetic_benchmark(&config.bounds, config.seed)?;
        let path = args
            .output_dir
            .join(format!("synthetic_{}.csv", args.dataset.file_stem()));
        write_records(&records, File::create(&path)?)?;
        info!("Synthetic benchmark written to {}", path.display());
        return Ok(LookupEvaluator::from_records(records)?);
    }

    let path = args
        .data_dir
        .join(format!("{}.csv", args.dataset.file_stem()));
    LookupEvaluator::from_path(&path)
        .with_context(|| format!("Failed to load benchmark {}", path.display()))
}

fn output_file(dir: &Path, dataset: Dataset, name: &str, extension: &str) -> PathBuf {
    dir.join(timestamped_name(
        &format!("{}_{}", dataset.file_stem(), name),
        extension,
    ))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args)?;

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;

    let benchmark = load_benchmark(&args, &config)?;
    if benchmark.n_var() != config.n_var() {
        bail!(
            "Benchmark architectures have {} genes but the search space has {}",
            benchmark.n_var(),
            config.n_var()
        );
    }
    let reference = benchmark.reference_front();

    let start = Instant::now();
    let mut optimizer = Nsga2Optimizer::new(config.clone(), ParallelEvaluator::new(benchmark))?;
    let result = optimizer.run(|generation: usize, objectives: &[Vec<f64>]| {
        let best_error = objectives
            .iter()
            .map(|o| o[0])
            .fold(f64::INFINITY, f64::min);
        println!(
            "{}: best error {:.3}, population {}",
            format!("Generation {:3}", generation).bold().red(),
            best_error,
            objectives.len()
        );
    })?;
    let runtime = start.elapsed().as_secs_f64();

    let history_path = output_file(&args.output_dir, args.dataset, "history", "csv");
    write_history(&result.history, File::create(&history_path)?)?;

    let front_path = output_file(&args.output_dir, args.dataset, "front", "csv");
    write_front(&result.front, File::create(&front_path)?)?;

    let front: Vec<Vec<f64>> = result
        .front
        .iter()
        .map(|individual| individual.objectives.clone())
        .collect();
    let score = igd(&front, &reference);

    append_summary(
        &RunSummary {
            timestamp: Local::now().format("%Y-%m-%d_%H-%M-%S").to_string(),
            dataset: args.dataset.file_stem().to_string(),
            seed: config.seed,
            pop_size: config.pop_size,
            n_offsprings: config.n_offsprings,
            generations: result.generations,
            evaluations: result.evaluations,
            front_size: result.front.len(),
            igd: score,
            runtime_secs: runtime,
        },
        &args.output_dir.join("summary.csv"),
    )?;

    if args.plot {
        let plot_path = output_file(&args.output_dir, args.dataset, "progress", "png");
        plot_search_progress(&result.history, &result.front, &plot_path)?;
    }

    println!(
        "{} {} architectures on the front after {} evaluations",
        "Done:".bold().green(),
        result.front.len(),
        result.evaluations
    );
    println!("IGD: {}", score);
    info!(
        "History in {}, front in {}",
        history_path.display(),
        front_path.display()
    );

    Ok(())
}
