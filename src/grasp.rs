use crate::construction::{greedy_randomized, naive};
use crate::instance_data::InstanceData;
use crate::local_search::bit_flip;
use crate::solution::{Solution, BIGM};
use cached::Cached;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use std::fs::File;
use std::io::Write;
use std::time::Instant;

/// Append-only trace of (elapsed seconds, best cost) samples, one per
/// global improvement. The first sample is the trivial fallback.
#[derive(Debug, Clone)]
pub struct ConvergenceLog {
    samples: Vec<(f64, f64)>,
}

impl ConvergenceLog {
    fn new() -> Self {
        Self {
            samples: Vec::new(),
        }
    }

    fn record(&mut self, elapsed: f64, cost: f64) {
        self.samples.push((elapsed, cost));
    }

    pub fn samples(&self) -> &[(f64, f64)] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn write_csv(&self, path: &str) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        writeln!(file, "elapsed_seconds,best_cost")?;
        for &(elapsed, cost) in &self.samples {
            writeln!(file, "{elapsed:.6},{cost:.6}")?;
        }
        Ok(())
    }
}

pub struct GraspBuilder<'a> {
    instance: &'a InstanceData,
    max_iter: usize,
    alpha: f64,
    l_max: usize,
    time_limit: f64,
    verbose: bool,
    seed: Option<u64>,
}

impl<'a> GraspBuilder<'a> {
    pub fn new(
        instance: &'a InstanceData,
        max_iter: usize,
        alpha: f64,
        l_max: usize,
        time_limit: f64,
        verbose: bool,
    ) -> Self {
        Self {
            instance,
            max_iter,
            alpha,
            l_max,
            time_limit,
            verbose,
            seed: None,
        }
    }

    /// Fixes the random source for reproducible runs.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Grasp<'a> {
        if !(0.0..=1.0).contains(&self.alpha) {
            panic!("alpha must be within [0, 1]!");
        }
        if self.l_max == 0 {
            panic!("l_max must be at least 1!");
        }
        if self.time_limit < 0.0 {
            panic!("time_limit must be non-negative!");
        }

        let rng = Pcg64::seed_from_u64(self.seed.unwrap_or_else(rand::random));
        Grasp {
            instance: self.instance,
            max_iter: self.max_iter,
            alpha: self.alpha,
            l_max: self.l_max,
            time_limit: self.time_limit,
            verbose: self.verbose,
            rng,
        }
    }
}

/// Time-budgeted multi-start GRASP: repeat greedy randomized construction
/// plus bit-flip local search, keeping the best setup vector seen.
pub struct Grasp<'a> {
    instance: &'a InstanceData,
    max_iter: usize,
    alpha: f64,
    l_max: usize,
    time_limit: f64,
    verbose: bool,
    rng: Pcg64,
}

impl<'a> Grasp<'a> {
    pub fn builder(
        instance: &'a InstanceData,
        max_iter: usize,
        alpha: f64,
        l_max: usize,
        time_limit: f64,
        verbose: bool,
    ) -> GraspBuilder<'a> {
        GraspBuilder::new(instance, max_iter, alpha, l_max, time_limit, verbose)
    }

    /// Runs the loop and returns the best solution with its convergence
    /// log. Never fails: when nothing feasible is found the best
    /// penalized solution is returned and its feasibility flag is false.
    pub fn run(&mut self) -> (Solution, ConvergenceLog) {
        Grasp::reset_cache();

        let start = Instant::now();
        let mut log = ConvergenceLog::new();

        let mut best_setups = naive(self.instance);
        let mut best_cost = Solution::decode(&best_setups, self.instance).cost;
        // Small delta keeps the first timestamp strictly positive.
        log.record(start.elapsed().as_secs_f64() + 1e-6, best_cost);

        let l_max = self.l_max.min(self.instance.horizon);

        for it in 0..self.max_iter {
            if start.elapsed().as_secs_f64() >= self.time_limit {
                break;
            }

            let mut candidate = greedy_randomized(self.instance, self.alpha, l_max, &mut self.rng);

            let constructed = Solution::decode(&candidate, self.instance);
            if constructed.cost >= BIGM / 2.0 {
                // Clearly infeasible construction; skip the local-search
                // budget it would burn.
                continue;
            }

            let cost = bit_flip(&mut candidate, self.instance, start, self.time_limit);

            if self.verbose {
                println!(
                    "{:.2}, {}, {:.2}, {:.2}",
                    start.elapsed().as_secs_f64(),
                    it,
                    cost,
                    best_cost,
                );
            }

            if cost < best_cost {
                best_cost = cost;
                best_setups = candidate;
                log.record(start.elapsed().as_secs_f64(), best_cost);
            }
        }

        let best = Solution::decode(&best_setups, self.instance);
        (best, log)
    }

    fn reset_cache() {
        let mut cache = crate::utils::LOT_AVG_COST.lock().unwrap();
        cache.cache_reset();
    }
}
