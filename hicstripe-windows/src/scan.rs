use std::any::Any;
use std::fmt::{self, Display};
use std::fs::create_dir_all;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::{debug, error, info, warn};

use hicstripe_core::config::ScanConfig;
use hicstripe_core::models::Chromosome;
use hicstripe_core::traits::{ContactMatrixStore, SpatialFeatureIndex, ZoomData};

use crate::batch::{BatchWriter, OutputRecord, RecordKind};
use crate::extract::{Extraction, WindowExtractor};
use crate::labels::FeatureLabeler;
use crate::orientation::{Anchor, Orientation};

/// How a scan task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Completed,
    /// Matrix or zoom data unavailable; nothing was written.
    Skipped,
    /// The task hit an error or panicked. Details are in the log.
    Failed,
}

/// Counters reported by one `(resolution, chromosome)` task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSummary {
    pub resolution: u32,
    pub chromosome: String,
    pub status: TaskStatus,
    /// Anchors visited
    pub windows: usize,
    pub positives: usize,
    pub negatives: usize,
    /// Windows the extractor skipped
    pub skipped_windows: usize,
    /// Batches opened
    pub batches: usize,
}

impl TaskSummary {
    pub fn new(resolution: u32, chromosome: impl Into<String>) -> Self {
        Self {
            resolution,
            chromosome: chromosome.into(),
            status: TaskStatus::Skipped,
            windows: 0,
            positives: 0,
            negatives: 0,
            skipped_windows: 0,
            batches: 0,
        }
    }
}

impl Display for TaskSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "chr{} at {} bp: {:?}, {} windows, {} positive, {} negative, {} skipped, {} batches",
            self.chromosome,
            self.resolution,
            self.status,
            self.windows,
            self.positives,
            self.negatives,
            self.skipped_windows,
            self.batches
        )
    }
}

///
/// Anchors of the horizontal pass: rows `0..=bins-y`, columns within `offset` of the row and
/// no further than `bins-y`, both stepped by `stride`.
///
pub fn horizontal_anchors(
    bin_count: i64,
    y: usize,
    offset: u32,
    stride: u32,
) -> impl Iterator<Item = Anchor> {
    let last = bin_count - y as i64;
    band(0, last, 0, last, offset, stride, Orientation::Horizontal)
}

///
/// Anchors of the vertical pass: rows `y..=bins`, columns within `offset` of the row, no
/// lower than `y` and no further than `bins`, both stepped by `stride`.
///
pub fn vertical_anchors(
    bin_count: i64,
    y: usize,
    offset: u32,
    stride: u32,
) -> impl Iterator<Item = Anchor> {
    let first = y as i64;
    band(first, bin_count, first, bin_count, offset, stride, Orientation::Vertical)
}

/// Every anchor of a scan: the horizontal pass, then the vertical pass for non-square windows.
pub fn scan_anchors(config: &ScanConfig, bin_count: i64) -> impl Iterator<Item = Anchor> {
    let vertical = (!config.is_square()).then(|| {
        vertical_anchors(bin_count, config.y, config.offset_from_diagonal, config.stride)
    });
    horizontal_anchors(bin_count, config.y, config.offset_from_diagonal, config.stride)
        .chain(vertical.into_iter().flatten())
}

fn band(
    row_first: i64,
    row_last: i64,
    col_floor: i64,
    col_ceil: i64,
    offset: u32,
    stride: u32,
    orientation: Orientation,
) -> impl Iterator<Item = Anchor> {
    let offset = i64::from(offset);
    let step = stride.max(1) as usize;
    let rows = if row_first <= row_last {
        row_first..=row_last
    } else {
        // empty
        1..=0
    };
    rows.step_by(step).flat_map(move |row| {
        let first = col_floor.max(row - offset);
        let last = col_ceil.min(row + offset);
        (first..=last)
            .step_by(step)
            .map(move |col| Anchor::new(row, col, orientation))
    })
}

///
/// Batch writer plus the rollover counter of one task.
///
/// The counter counts persisted records. Once it exceeds `max_batch_size` the writer moves on
/// to the next batch and the counter restarts.
///
pub struct BatchCursor {
    writer: BatchWriter,
    since_rollover: usize,
    max_batch_size: usize,
}

impl BatchCursor {
    pub fn new(writer: BatchWriter, max_batch_size: usize) -> Self {
        Self {
            writer,
            since_rollover: 0,
            max_batch_size,
        }
    }

    pub fn batch(&self) -> usize {
        self.writer.batch()
    }

    pub fn write(&mut self, record: &OutputRecord) -> crate::errors::Result<()> {
        self.writer.write(record)?;
        self.since_rollover += 1;
        if self.since_rollover > self.max_batch_size {
            self.since_rollover = 0;
            let next = self.writer.batch() + 1;
            debug!(
                "Rolling over to batch {} in {}",
                next,
                self.writer.positive_dir().display()
            );
            self.writer.reopen(next)?;
        }
        Ok(())
    }

    pub fn close(&mut self) -> crate::errors::Result<()> {
        self.writer.close()
    }
}

///
/// Scan of one chromosome at one resolution.
///
/// Owns no shared mutable state: everything it writes lives under its own task folder
/// `<output_dir>/<resolution>_chr<name>`.
///
pub struct ScanTask<'a> {
    config: &'a ScanConfig,
    store: &'a dyn ContactMatrixStore,
    index: &'a dyn SpatialFeatureIndex,
    chromosome: &'a Chromosome,
    resolution: u32,
    output_dir: &'a Path,
}

impl<'a> ScanTask<'a> {
    pub fn new(
        config: &'a ScanConfig,
        store: &'a dyn ContactMatrixStore,
        index: &'a dyn SpatialFeatureIndex,
        chromosome: &'a Chromosome,
        resolution: u32,
        output_dir: &'a Path,
    ) -> Self {
        Self {
            config,
            store,
            index,
            chromosome,
            resolution,
            output_dir,
        }
    }

    pub fn folder(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_chr{}", self.resolution, self.chromosome.name))
    }

    ///
    /// Run the task to completion. Errors and panics are caught here, logged, and reported
    /// as [`TaskStatus::Failed`]. Index files opened before a failure are still closed.
    ///
    pub fn run(&self) -> TaskSummary {
        let mut summary = TaskSummary::new(self.resolution, self.chromosome.name.clone());

        match catch_unwind(AssertUnwindSafe(|| self.scan(&mut summary))) {
            Ok(Ok(status)) => summary.status = status,
            Ok(Err(e)) => {
                error!(
                    "Task for chromosome {} at {} bp failed: {:#}",
                    self.chromosome.name, self.resolution, e
                );
                summary.status = TaskStatus::Failed;
            }
            Err(payload) => {
                error!(
                    "Task for chromosome {} at {} bp panicked: {}",
                    self.chromosome.name,
                    self.resolution,
                    panic_message(payload.as_ref())
                );
                summary.status = TaskStatus::Failed;
            }
        }

        summary
    }

    fn scan(&self, summary: &mut TaskSummary) -> Result<TaskStatus> {
        let Some(zoom_data) = self.zoom_data() else {
            return Ok(TaskStatus::Skipped);
        };
        info!(
            "Processing chromosome {} at resolution {}",
            self.chromosome.name, self.resolution
        );

        let folder = self.folder();
        create_dir_all(&folder)
            .with_context(|| format!("Failed to create task folder: {:?}", folder))?;
        let writer = BatchWriter::open(&folder, 0)
            .with_context(|| format!("Failed to open batch 0 in {:?}", folder))?;
        let mut cursor = BatchCursor::new(writer, self.config.max_batch_size);

        let scanned =
            catch_unwind(AssertUnwindSafe(|| self.scan_band(zoom_data, &mut cursor, summary)));
        summary.batches = cursor.batch() + 1;
        let closed = cursor
            .close()
            .with_context(|| format!("Failed to close index files in {:?}", folder));
        match scanned {
            Ok(scanned) => scanned?,
            Err(payload) => bail!("Scan panicked: {}", panic_message(payload.as_ref())),
        }
        closed?;

        info!("Finished {}", summary);
        Ok(TaskStatus::Completed)
    }

    fn zoom_data(&self) -> Option<&'a dyn ZoomData> {
        let Some(matrix) = self.store.matrix(self.chromosome) else {
            warn!("No matrix for chromosome {}, skipping", self.chromosome.name);
            return None;
        };
        let Some(zoom) = self.store.zoom_for_resolution(self.resolution) else {
            warn!(
                "No zoom at {} bp, skipping chromosome {}",
                self.resolution, self.chromosome.name
            );
            return None;
        };
        let zd = matrix.zoom_data(&zoom);
        if zd.is_none() {
            warn!("No {} data for chromosome {}, skipping", zoom, self.chromosome.name);
        }
        zd
    }

    fn scan_band(
        &self,
        zoom_data: &dyn ZoomData,
        cursor: &mut BatchCursor,
        summary: &mut TaskSummary,
    ) -> Result<()> {
        let config = self.config;
        let extractor = WindowExtractor::new(
            self.store,
            zoom_data,
            config.normalization,
            config.use_observed_over_expected,
            config.oe_log_threshold,
        );
        let labeler = FeatureLabeler::new(
            self.index,
            self.chromosome.index,
            self.resolution,
            config.ignore_orientation,
            config.use_intensity_labeling.then_some(config.enrichment),
        );

        let bin_count = self.chromosome.bin_count(self.resolution);
        for anchor in scan_anchors(config, bin_count) {
            summary.windows += 1;
            let window = anchor.window(config.x, config.y);

            let data = match extractor
                .extract(&window)
                .with_context(|| format!("Failed to extract window {}", window.rect))?
            {
                Extraction::Extracted(data) => data,
                Extraction::Skipped(_) => {
                    summary.skipped_windows += 1;
                    continue;
                }
            };

            let grids = labeler.label(&window, &data);
            let kind = if grids.found {
                RecordKind::Positive
            } else if config.only_positive_examples {
                continue;
            } else {
                RecordKind::Negative
            };

            let orientation = anchor.orientation;
            let grids = grids.canonicalize(orientation);
            let record = OutputRecord {
                prefix: format!(
                    "{}_{}_{}{}",
                    self.chromosome.name,
                    anchor.row,
                    anchor.col,
                    orientation.tag()
                ),
                kind,
                data: orientation.canonicalize(data),
                labels: (kind == RecordKind::Positive).then_some(grids.labels),
                intensity: match kind {
                    RecordKind::Positive => grids.intensity,
                    RecordKind::Negative => None,
                },
            };

            cursor
                .write(&record)
                .with_context(|| write_context(&record, cursor.batch()))?;
            match kind {
                RecordKind::Positive => summary.positives += 1,
                RecordKind::Negative => summary.negatives += 1,
            }
        }
        Ok(())
    }
}

fn write_context(record: &OutputRecord, batch: usize) -> String {
    format!(
        "Failed to write {} into batch {}",
        record.matrix_file_name(),
        batch
    )
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
