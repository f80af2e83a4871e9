use std::io::Error;
use std::path::Path;

use clap::Args;
use serde_derive::Serialize;

use crate::grasp::{ConvergenceLog, Grasp};
use crate::instance_data::read_instance;
use crate::solution::Solution;
use crate::utils::{opt_field, parse_class_name, ClassParams};

pub const SUMMARY_HEADER: &str = "class,file,T,tau,var,cost,feasible,elapsed_seconds";

/// Machine-readable record of one solve, written for the external
/// analysis tooling that joins heuristic results against the exact
/// baseline.
#[derive(Debug, Serialize)]
pub struct SolveReport {
    pub instance: String,
    pub class: String,
    pub horizon: usize,
    pub tau: Option<f64>,
    pub var: Option<f64>,
    pub cost: f64,
    pub feasible: bool,
    pub elapsed_seconds: f64,
    pub log_points: usize,
}

/// Runs GRASP on a single instance file and prints one summary row.
#[derive(Debug, Args)]
pub struct Solve {
    /// Path to the instance file
    #[clap(short, long)]
    pub instance: String,
    /// Maximum number of GRASP iterations
    #[clap(long, default_value = "200")]
    pub max_iter: usize,
    /// RCL greediness: 0 is pure greedy, 1 admits every candidate
    #[clap(long, default_value = "0.3")]
    pub alpha: f64,
    /// Largest lot length considered during construction
    #[clap(long, default_value = "10")]
    pub l_max: usize,
    /// Seed for the random source; omitted means one is drawn
    #[clap(short, long)]
    pub seed: Option<u64>,
    /// Wall-clock budget in seconds
    #[clap(short, long, default_value = "1800")]
    pub time_limit: f64,
    /// Where to write the convergence log CSV
    #[clap(long)]
    pub log_output: Option<String>,
    /// Where to write the JSON solve report
    #[clap(long)]
    pub report: Option<String>,
    /// Print per-iteration progress
    #[clap(short, long)]
    pub verbose: bool,
}

impl Solve {
    pub fn solve(&self) -> Result<(), Error> {
        let instance = read_instance(&self.instance)?;

        let class_name = Path::new(&self.instance)
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let file_name = Path::new(&self.instance)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.instance)
            .to_string();
        let params = parse_class_name(&class_name);

        let start = std::time::Instant::now();
        let mut builder = Grasp::builder(
            &instance,
            self.max_iter,
            self.alpha,
            self.l_max,
            self.time_limit,
            self.verbose,
        );
        if let Some(seed) = self.seed {
            builder = builder.set_seed(seed);
        }
        let (best, log) = builder.build().run();
        let elapsed = start.elapsed().as_secs_f64();

        if let Some(log_path) = &self.log_output {
            log.write_csv(log_path)?;
        }

        if let Some(report_path) = &self.report {
            let report = SolveReport {
                instance: file_name.clone(),
                class: class_name.clone(),
                horizon: instance.horizon,
                tau: params.tau,
                var: params.var,
                cost: best.cost,
                feasible: best.is_feasible(),
                elapsed_seconds: elapsed,
                log_points: log.len(),
            };
            let json = serde_json::to_string_pretty(&report)?;
            std::fs::write(report_path, json)?;
        }

        println!("{SUMMARY_HEADER}");
        println!(
            "{}",
            summary_row(&class_name, &file_name, &instance_horizon_params(instance.horizon, &params), &best, elapsed)
        );
        eprintln!(
            "[ok] {file_name} | cost={:.2} feasible={} time={elapsed:.2}s | log_points={}",
            best.cost,
            best.is_feasible(),
            log.len()
        );
        Ok(())
    }
}

fn instance_horizon_params(horizon: usize, params: &ClassParams) -> ClassParams {
    // The horizon reported comes from the file itself, not the directory
    // name, so mislabeled classes never corrupt the summary.
    ClassParams {
        horizon: Some(horizon),
        tau: params.tau,
        var: params.var,
    }
}

/// Formats one summary row in `SUMMARY_HEADER` order.
pub fn summary_row(
    class: &str,
    file: &str,
    params: &ClassParams,
    best: &Solution,
    elapsed: f64,
) -> String {
    format!(
        "{},{},{},{},{},{:.6},{},{:.3}",
        class,
        file,
        opt_field(&params.horizon),
        opt_field(&params.tau),
        opt_field(&params.var),
        best.cost,
        u8::from(best.is_feasible()),
        elapsed,
    )
}

/// Writes the convergence log for one instance under
/// `<log_dir>/<class>/<file>_log.csv`, mirroring the instance tree.
pub fn write_instance_log(
    log: &ConvergenceLog,
    log_dir: &str,
    class: &str,
    file: &str,
) -> Result<(), Error> {
    let class_dir = Path::new(log_dir).join(class);
    std::fs::create_dir_all(&class_dir)?;
    let log_name = file.replace(".txt", "_log.csv");
    log.write_csv(class_dir.join(log_name).to_str().unwrap())
}
