use std::fmt::Display;
use std::fs::{File, create_dir_all};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use ndarray::Array2;

use crate::consts::{
    CELL_SEPARATOR, INDEX_EXT, INTENSITY_LABEL_EXT, LABEL_EXT, MATRIX_SUFFIX,
    NEGATIVE_DIR_PREFIX, NEGATIVE_INDEX_PREFIX, POSITIVE_DIR_PREFIX, POSITIVE_INDEX_PREFIX,
    POSITIVE_LABEL_INDEX_PREFIX,
};
use crate::errors::Result;

/// Which set a record is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Positive,
    Negative,
}

///
/// One window ready for persistence, already in canonical orientation.
///
/// Label grids are only written for positive records.
///
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    /// `<chrom>_<row>_<col><orientation tag>`
    pub prefix: String,
    pub kind: RecordKind,
    pub data: Array2<f64>,
    pub labels: Option<Array2<u8>>,
    pub intensity: Option<Array2<u8>>,
}

impl OutputRecord {
    pub fn matrix_file_name(&self) -> String {
        format!("{}{}", self.prefix, MATRIX_SUFFIX)
    }

    pub fn label_file_name(&self) -> String {
        format!("{}{}{}", self.prefix, MATRIX_SUFFIX, LABEL_EXT)
    }

    pub fn intensity_label_file_name(&self) -> String {
        format!("{}{}{}", self.prefix, MATRIX_SUFFIX, INTENSITY_LABEL_EXT)
    }
}

/// The three file name index streams of one batch.
struct IndexStreams {
    positive_index: BufWriter<File>,
    negative_index: BufWriter<File>,
    positive_label_index: BufWriter<File>,
}

impl IndexStreams {
    fn create(folder: &Path, batch: usize) -> io::Result<Self> {
        let open = |prefix: &str| -> io::Result<BufWriter<File>> {
            let path = folder.join(format!("{}{}{}", prefix, batch, INDEX_EXT));
            Ok(BufWriter::new(File::create(path)?))
        };
        Ok(IndexStreams {
            positive_index: open(POSITIVE_INDEX_PREFIX)?,
            negative_index: open(NEGATIVE_INDEX_PREFIX)?,
            positive_label_index: open(POSITIVE_LABEL_INDEX_PREFIX)?,
        })
    }

    fn flush(&mut self) -> io::Result<()> {
        self.positive_index.flush()?;
        self.negative_index.flush()?;
        self.positive_label_index.flush()
    }
}

///
/// Writes the records of one scan task into numbered batches under the task folder.
///
/// Batch `b` owns the directories `positive_<b>/` and `negative_<b>/` plus the index files
/// `pos_file_names_<b>.txt`, `neg_file_names_<b>.txt` and `pos_label_file_names_<b>.txt`.
/// Opening a batch truncates any index files left over for the same number.
///
pub struct BatchWriter {
    folder: PathBuf,
    batch: usize,
    positive_dir: PathBuf,
    negative_dir: PathBuf,
    streams: Option<IndexStreams>,
}

impl BatchWriter {
    /// Open batch `batch` under `folder`, which must already exist.
    pub fn open(folder: &Path, batch: usize) -> Result<Self> {
        let mut writer = BatchWriter {
            folder: folder.to_path_buf(),
            batch,
            positive_dir: PathBuf::new(),
            negative_dir: PathBuf::new(),
            streams: None,
        };
        writer.open_batch(batch)?;
        Ok(writer)
    }

    ///
    /// Close the current batch and continue in batch `batch`.
    ///
    pub fn reopen(&mut self, batch: usize) -> Result<()> {
        self.close()?;
        self.open_batch(batch)
    }

    fn open_batch(&mut self, batch: usize) -> Result<()> {
        let positive_dir = self
            .folder
            .join(format!("{}{}", POSITIVE_DIR_PREFIX, batch));
        let negative_dir = self
            .folder
            .join(format!("{}{}", NEGATIVE_DIR_PREFIX, batch));
        create_dir_all(&positive_dir)?;
        create_dir_all(&negative_dir)?;

        self.streams = Some(IndexStreams::create(&self.folder, batch)?);
        self.batch = batch;
        self.positive_dir = positive_dir;
        self.negative_dir = negative_dir;
        Ok(())
    }

    pub fn batch(&self) -> usize {
        self.batch
    }

    pub fn positive_dir(&self) -> &Path {
        &self.positive_dir
    }

    pub fn negative_dir(&self) -> &Path {
        &self.negative_dir
    }

    pub fn is_open(&self) -> bool {
        self.streams.is_some()
    }

    ///
    /// Persist a record into the current batch and list its files in the index streams.
    ///
    pub fn write(&mut self, record: &OutputRecord) -> Result<()> {
        let streams = self
            .streams
            .as_mut()
            .ok_or_else(|| io::Error::other("batch writer is closed"))?;

        let matrix_name = record.matrix_file_name();
        match record.kind {
            RecordKind::Positive => {
                write_grid(&self.positive_dir.join(&matrix_name), &record.data)?;
                writeln!(streams.positive_index, "{}", matrix_name)?;

                if let Some(labels) = record.labels.as_ref() {
                    let name = record.label_file_name();
                    write_grid(&self.positive_dir.join(&name), labels)?;
                    writeln!(streams.positive_label_index, "{}", name)?;
                }
                if let Some(intensity) = record.intensity.as_ref() {
                    let name = record.intensity_label_file_name();
                    write_grid(&self.positive_dir.join(&name), intensity)?;
                    writeln!(streams.positive_label_index, "{}", name)?;
                }
            }
            RecordKind::Negative => {
                write_grid(&self.negative_dir.join(&matrix_name), &record.data)?;
                writeln!(streams.negative_index, "{}", matrix_name)?;
            }
        }
        Ok(())
    }

    ///
    /// Flush and close the index streams. Closing an already closed writer does nothing.
    ///
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut streams) = self.streams.take() {
            streams.flush()?;
        }
        Ok(())
    }
}

///
/// Write a grid as text: one row per line, cells separated by a single space.
///
pub fn write_grid<T: Display>(path: &Path, grid: &Array2<T>) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    for row in grid.rows() {
        let mut first = true;
        for value in row.iter() {
            if !first {
                file.write_all(CELL_SEPARATOR.as_bytes())?;
            }
            write!(file, "{}", value)?;
            first = false;
        }
        file.write_all(b"\n")?;
    }
    file.flush()
}
