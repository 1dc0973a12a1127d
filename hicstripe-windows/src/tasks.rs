use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use log::info;
use rayon::prelude::*;

use hicstripe_core::config::ScanConfig;
use hicstripe_core::models::Chromosome;
use hicstripe_core::traits::{ContactMatrixStore, SpatialFeatureIndex};

use crate::errors::Result;
use crate::scan::{ScanTask, TaskSummary};

///
/// Runs one [`ScanTask`] per `(resolution, chromosome)` pair on a bounded worker pool.
///
/// The store, feature index and configuration are shared read-only by every task. Tasks never
/// affect one another: a failed or skipped task is reported in its [`TaskSummary`] and the
/// others run to completion.
///
pub struct StripeScanner<'a> {
    config: ScanConfig,
    store: &'a dyn ContactMatrixStore,
    index: &'a dyn SpatialFeatureIndex,
    output_dir: PathBuf,
}

impl<'a> StripeScanner<'a> {
    /// Fails if `config` does not validate.
    pub fn new(
        config: ScanConfig,
        store: &'a dyn ContactMatrixStore,
        index: &'a dyn SpatialFeatureIndex,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            store,
            index,
            output_dir: output_dir.into(),
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    ///
    /// The `(resolution, chromosome)` pairs to scan, resolution-major, skipping the
    /// whole-genome pseudo chromosome.
    ///
    pub fn tasks(&self) -> Vec<(u32, Chromosome)> {
        let chromosomes: Vec<Chromosome> = self
            .store
            .chromosomes()
            .into_iter()
            .filter(|c| !c.is_whole_genome())
            .collect();

        self.config
            .resolutions
            .iter()
            .flat_map(|res| chromosomes.iter().map(move |c| (*res, c.clone())))
            .collect()
    }

    ///
    /// Scan every task and wait for all of them. Summaries come back in [`Self::tasks`] order.
    ///
    /// Only failing to set up the run (output directory, worker pool) is an error; task
    /// failures are logged and reported per task.
    ///
    pub fn run(&self) -> Result<Vec<TaskSummary>> {
        create_dir_all(&self.output_dir)?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.thread_count())
            .build()?;

        let tasks = self.tasks();
        info!(
            "Scanning {} tasks on {} threads into {}",
            tasks.len(),
            pool.current_num_threads(),
            self.output_dir.display()
        );

        let bar = if self.config.show_progress {
            ProgressBar::new(tasks.len() as u64)
        } else {
            ProgressBar::hidden()
        };

        let summaries: Vec<TaskSummary> = pool.install(|| {
            tasks
                .par_iter()
                .map(|(resolution, chromosome)| {
                    let summary = ScanTask::new(
                        &self.config,
                        self.store,
                        self.index,
                        chromosome,
                        *resolution,
                        &self.output_dir,
                    )
                    .run();
                    bar.inc(1);
                    summary
                })
                .collect()
        });
        bar.finish();

        Ok(summaries)
    }
}
