use anyhow::{anyhow, Context, Result};
use antenna_algorithms::Strategy;
use antenna_challenges::{Challenge, InstanceStats, Solution, Track};
use clap::{arg, ArgMatches, Command};
use log::{error, info};
use logging_timer::time;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::{Map, Value};
use std::{
    fs,
    panic::{self, AssertUnwindSafe},
    path::{Path, PathBuf},
};

fn cli() -> Command {
    Command::new("antenna-runtime")
        .about("Places antennas over building grids")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("solve")
                .about("Optimizes every instance file and dumps the solutions")
                .arg(
                    arg!(<INSTANCES>... "Instance files")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--strategy [STRATEGY] "hill_climb, grid_descent or window_descent")
                        .default_value("hill_climb")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--hyperparameters [HYPERPARAMETERS] "Hyperparameters json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--workers [WORKERS] "Number of instances solved in parallel")
                        .default_value("6")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"output-dir" [OUTPUT_DIR] "Directory for solution files (default: next to each instance)")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("verify")
                .about("Scores a solution file against its instance")
                .arg(arg!(<INSTANCE> "Instance file").value_parser(clap::value_parser!(PathBuf)))
                .arg(arg!(<SOLUTION> "Solution file").value_parser(clap::value_parser!(PathBuf))),
        )
        .subcommand(
            Command::new("stats")
                .about("Prints size and weight statistics of instance files")
                .arg(
                    arg!(<INSTANCES>... "Instance files")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("generate")
                .about("Writes a random instance to stdout")
                .arg(arg!(<SEED> "Seed value").value_parser(clap::value_parser!(u64)))
                .arg(arg!(<WIDTH> "Grid width").value_parser(clap::value_parser!(usize)))
                .arg(arg!(<HEIGHT> "Grid height").value_parser(clap::value_parser!(usize)))
                .arg(arg!(<BUILDINGS> "Number of buildings").value_parser(clap::value_parser!(usize)))
                .arg(arg!(<ANTENNAS> "Number of antennas").value_parser(clap::value_parser!(usize)))
                .arg(
                    arg!(--reward [REWARD] "Bonus for connecting every building")
                        .default_value("0")
                        .value_parser(clap::value_parser!(u32)),
                ),
        )
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("solve", sub_m)) => solve_command(sub_m),
        Some(("verify", sub_m)) => verify_command(sub_m),
        Some(("stats", sub_m)) => stats_command(sub_m),
        Some(("generate", sub_m)) => generate_command(sub_m),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn required<'a, T: Clone + Send + Sync + 'static>(
    matches: &'a ArgMatches,
    id: &str,
) -> Result<&'a T> {
    matches
        .get_one::<T>(id)
        .ok_or_else(|| anyhow!("Missing argument {}", id))
}

fn solve_command(sub_m: &ArgMatches) -> Result<()> {
    let instances: Vec<PathBuf> = sub_m
        .get_many::<PathBuf>("INSTANCES")
        .map(|paths| paths.cloned().collect())
        .unwrap_or_default();
    let strategy = required::<String>(sub_m, "strategy")?.parse::<Strategy>()?;
    let hyperparameters = sub_m
        .get_one::<String>("hyperparameters")
        .map(|s| load_hyperparameters(s))
        .transpose()?;
    solve(
        &instances,
        strategy,
        &hyperparameters,
        *required::<usize>(sub_m, "workers")?,
        sub_m.get_one::<PathBuf>("output-dir").map(PathBuf::as_path),
    )
}

#[derive(Serialize, Debug)]
struct SolveSummary {
    instance: PathBuf,
    solution: PathBuf,
    strategy: String,
    score: i64,
    antennas: usize,
}

/// Solves every instance independently on a pool of `workers` threads. A
/// failing instance is logged and does not stop the others.
pub fn solve(
    instances: &[PathBuf],
    strategy: Strategy,
    hyperparameters: &Option<Map<String, Value>>,
    workers: usize,
    output_dir: Option<&Path>,
) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| anyhow!("Failed to start worker pool: {}", e))?;

    let results: Vec<Result<SolveSummary>> = pool.install(|| {
        instances
            .par_iter()
            .map(|path| {
                panic::catch_unwind(AssertUnwindSafe(|| {
                    solve_file(path, strategy, hyperparameters, output_dir)
                }))
                .unwrap_or_else(|_| Err(anyhow!("Solver panicked")))
            })
            .collect()
    });

    let mut failed = 0;
    for (path, result) in instances.iter().zip(results) {
        match result {
            Ok(summary) => println!("{}", serde_json::to_string(&summary)?),
            Err(e) => {
                error!("Failed to solve {}: {:#}", path.display(), e);
                failed += 1;
            }
        }
    }
    if failed > 0 {
        return Err(anyhow!("{} of {} instances failed", failed, instances.len()));
    }
    Ok(())
}

#[time]
fn solve_file(
    path: &Path,
    strategy: Strategy,
    hyperparameters: &Option<Map<String, Value>>,
    output_dir: Option<&Path>,
) -> Result<SolveSummary> {
    let challenge = Challenge::from_file(path)?;
    info!("problem loaded {}", path.display());

    let (solution, score) = strategy.solve(&challenge, hyperparameters)?;
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    let output = dir.join(Solution::file_name(&challenge.name, score)?);
    fs::write(&output, solution.to_string())
        .with_context(|| format!("Failed to write solution {}", output.display()))?;
    info!("{}: score {} written to {}", challenge.name, score, output.display());

    Ok(SolveSummary {
        instance: path.to_path_buf(),
        solution: output,
        strategy: strategy.to_string(),
        score,
        antennas: solution.antennas.len(),
    })
}

fn verify_command(sub_m: &ArgMatches) -> Result<()> {
    verify_solution(
        required::<PathBuf>(sub_m, "INSTANCE")?,
        required::<PathBuf>(sub_m, "SOLUTION")?,
    )
}

pub fn verify_solution(instance: &Path, solution: &Path) -> Result<()> {
    let challenge = Challenge::from_file(instance)?;
    let solution = Solution::from_file(solution)?;
    let score = challenge.evaluate_solution(&solution)?;
    println!("{}", score);
    Ok(())
}

fn stats_command(sub_m: &ArgMatches) -> Result<()> {
    for path in sub_m.get_many::<PathBuf>("INSTANCES").into_iter().flatten() {
        let challenge = Challenge::from_file(path)?;
        println!("{}", serde_json::to_string(&InstanceStats::of(&challenge))?);
    }
    Ok(())
}

fn generate_command(sub_m: &ArgMatches) -> Result<()> {
    let mut seed = [0u8; 32];
    seed[..8].copy_from_slice(&required::<u64>(sub_m, "SEED")?.to_le_bytes());
    let track = Track {
        width: *required::<usize>(sub_m, "WIDTH")?,
        height: *required::<usize>(sub_m, "HEIGHT")?,
        num_buildings: *required::<usize>(sub_m, "BUILDINGS")?,
        num_antennas: *required::<usize>(sub_m, "ANTENNAS")?,
        reward: *required::<u32>(sub_m, "reward")?,
    };
    print!("{}", Challenge::generate_instance(&seed, &track)?);
    Ok(())
}

fn load_hyperparameters(hyperparameters: &str) -> Result<Map<String, Value>> {
    let hyperparameters = if hyperparameters.ends_with(".json") {
        fs::read_to_string(hyperparameters)
            .with_context(|| format!("Failed to read hyperparameters file {}", hyperparameters))?
    } else {
        hyperparameters.to_string()
    };
    serde_json::from_str(&hyperparameters)
        .map_err(|e| anyhow!("Failed to parse hyperparameters: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli() {
        cli().debug_assert();
    }

    #[test]
    fn test_solve_arguments() {
        let matches = cli()
            .try_get_matches_from([
                "antenna-runtime",
                "solve",
                "a.txt",
                "b.txt",
                "--strategy",
                "grid_descent",
                "--output-dir",
                "out",
            ])
            .unwrap();
        let (name, sub_m) = matches.subcommand().unwrap();
        assert_eq!(name, "solve");
        assert_eq!(
            sub_m.get_one::<PathBuf>("output-dir"),
            Some(&PathBuf::from("out"))
        );
        assert_eq!(*required::<usize>(sub_m, "workers").unwrap(), 6);
        assert_eq!(
            sub_m.get_many::<PathBuf>("INSTANCES").unwrap().count(),
            2
        );
    }
}
