use std::fs;
use std::io::{Error, Write};
use std::path::Path;
use std::time::Instant;

use clap::Args;
use itertools::Itertools;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::grasp::Grasp;
use crate::instance_data::read_instance;
use crate::solve::{summary_row, write_instance_log, SUMMARY_HEADER};
use crate::utils::{parse_class_name, ClassParams};

/// Runs GRASP over every instance under `<root>/<class>/<file>.txt`,
/// writing one summary CSV and one convergence log per instance.
/// Instances are solved sequentially; a broken instance file is reported
/// and skipped, never aborting the batch.
#[derive(Debug, Args)]
pub struct Batch {
    /// Root directory holding the instance-class directories
    #[clap(short, long)]
    instances: String,
    /// Maximum number of GRASP iterations per instance
    #[clap(long, default_value = "200")]
    max_iter: usize,
    /// RCL greediness: 0 is pure greedy, 1 admits every candidate
    #[clap(long, default_value = "0.3")]
    alpha: f64,
    /// Largest lot length considered during construction
    #[clap(long, default_value = "10")]
    l_max: usize,
    /// Base seed; each instance draws its own seed from it
    #[clap(short, long, default_value = "42")]
    seed: u64,
    /// Wall-clock budget in seconds, per instance
    #[clap(short, long, default_value = "1800")]
    time_limit: f64,
    /// Summary CSV file, relative to the instances root
    #[clap(long, default_value = "grasp_results.csv")]
    summary: String,
    /// Convergence-log directory, relative to the instances root
    #[clap(long, default_value = "grasp_logs")]
    log_dir: String,
    /// Print per-iteration progress
    #[clap(short, long)]
    verbose: bool,
}

impl Batch {
    pub fn run(&self) -> Result<(), Error> {
        let root = Path::new(&self.instances);
        let summary_path = root.join(&self.summary);
        let log_dir = root.join(&self.log_dir);
        fs::create_dir_all(&log_dir)?;

        let mut master_rng = Pcg64::seed_from_u64(self.seed);
        let mut rows: Vec<String> = Vec::new();

        let classes = fs::read_dir(root)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .sorted_by_key(|entry| entry.file_name());

        for class_entry in classes {
            if class_entry.path() == log_dir {
                continue;
            }
            let class_name = class_entry.file_name().to_string_lossy().to_string();
            let params = parse_class_name(&class_name);

            let files = match fs::read_dir(class_entry.path()) {
                Ok(entries) => entries,
                Err(e) => {
                    eprintln!("skipping class {class_name}: {e}");
                    continue;
                }
            };
            let instance_files = files
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "txt"))
                .sorted_by_key(|entry| entry.file_name());

            for file_entry in instance_files {
                let path = file_entry.path();
                let file_name = file_entry.file_name().to_string_lossy().to_string();

                let instance = match read_instance(&path.to_string_lossy()) {
                    Ok(instance) => instance,
                    Err(e) => {
                        eprintln!("skipping {}: {e}", path.display());
                        continue;
                    }
                };

                let instance_seed: u64 = master_rng.gen();
                let start = Instant::now();
                let (best, log) = Grasp::builder(
                    &instance,
                    self.max_iter,
                    self.alpha,
                    self.l_max,
                    self.time_limit,
                    self.verbose,
                )
                .set_seed(instance_seed)
                .build()
                .run();
                let elapsed = start.elapsed().as_secs_f64();

                println!(
                    "{class_name}/{file_name} | T={} | cost={:.2} feasible={} time={:.3}s | log_points={}",
                    instance.horizon,
                    best.cost,
                    best.is_feasible(),
                    elapsed,
                    log.len(),
                );

                let row_params = ClassParams {
                    horizon: Some(instance.horizon),
                    tau: params.tau,
                    var: params.var,
                };
                rows.push(summary_row(
                    &class_name,
                    &file_name,
                    &row_params,
                    &best,
                    elapsed,
                ));

                if let Err(e) =
                    write_instance_log(&log, &log_dir.to_string_lossy(), &class_name, &file_name)
                {
                    eprintln!("failed to write log for {class_name}/{file_name}: {e}");
                }
            }
        }

        if rows.is_empty() {
            println!("no instances found under {}", self.instances);
            return Ok(());
        }

        let mut summary = fs::File::create(&summary_path)?;
        writeln!(summary, "{SUMMARY_HEADER}")?;
        for row in &rows {
            writeln!(summary, "{row}")?;
        }
        println!(
            "wrote {} summary rows to {}",
            rows.len(),
            summary_path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance_data::{write_instance, InstanceData};

    #[test]
    fn batch_skips_broken_files_and_writes_outputs() {
        let root = std::env::temp_dir().join(format!("csilsp_batch_ut_{}", std::process::id()));
        let class_dir = root.join("T2_tau1.5_var0.2");
        fs::create_dir_all(&class_dir).unwrap();

        let instance = InstanceData::new(
            "T2_tau1.5_var0.2/inst_01.txt".to_string(),
            2,
            vec![10.0, 10.0],
            vec![5.0, 5.0],
            vec![1.0, 1.0],
            vec![1.0, 1.0],
            vec![30.0, 30.0],
        )
        .unwrap();
        write_instance(&instance, class_dir.join("inst_01.txt").to_str().unwrap()).unwrap();
        // Truncated file: must be reported and skipped.
        fs::write(class_dir.join("inst_02.txt"), "2\n10 10\n").unwrap();

        let batch = Batch {
            instances: root.to_string_lossy().to_string(),
            max_iter: 5,
            alpha: 0.3,
            l_max: 2,
            seed: 42,
            time_limit: 30.0,
            summary: "grasp_results.csv".to_string(),
            log_dir: "grasp_logs".to_string(),
            verbose: false,
        };
        batch.run().unwrap();

        let summary = fs::read_to_string(root.join("grasp_results.csv")).unwrap();
        let lines = summary.lines().collect::<Vec<&str>>();
        assert_eq!(lines[0], SUMMARY_HEADER);
        assert_eq!(lines.len(), 2, "one data row expected:\n{summary}");
        assert!(lines[1].starts_with("T2_tau1.5_var0.2,inst_01.txt,2,1.5,0.2,"));

        let log = fs::read_to_string(
            root.join("grasp_logs")
                .join("T2_tau1.5_var0.2")
                .join("inst_01_log.csv"),
        )
        .unwrap();
        assert!(log.starts_with("elapsed_seconds,best_cost"));

        fs::remove_dir_all(&root).ok();
    }
}
