use crate::config::ImportConfig;
use crate::error::{ImportError, Stage};
use crate::fs::list_input_files;
use crate::ingest::{BatchIngestor, IngestCounts, WriteMode};
use crate::mapper::{map_block, map_transactions};
use crate::progress::Progress;
use blk_format::{block_hash, parse_block_at, FrameConfig, FrameScanner};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};


#[derive(Debug)]
pub struct FileFailure {
    pub stage: Stage,
    pub error: ImportError,
}


#[derive(Debug)]
pub struct FileReport {
    pub file_name: String,
    pub frames: u64,
    /// Frames whose payload did not decode into a block.
    pub skipped_blocks: u64,
    /// Bytes consumed from the file.
    pub bytes: u64,
    pub counts: IngestCounts,
    pub failures: Vec<FileFailure>,
}


impl FileReport {
    fn new(file_name: String) -> Self {
        Self {
            file_name,
            frames: 0,
            skipped_blocks: 0,
            bytes: 0,
            counts: IngestCounts::default(),
            failures: Vec::new(),
        }
    }

    fn fail(&mut self, stage: Stage, error: ImportError) {
        self.failures.push(FileFailure { stage, error })
    }

    pub fn is_failed(&self) -> bool {
        !self.failures.is_empty()
    }
}


#[derive(Debug, Default)]
pub struct RunSummary {
    pub files: u64,
    pub failed_files: u64,
    pub frames: u64,
    pub skipped_blocks: u64,
    pub block_records: u64,
    pub transaction_records: u64,
    pub dry_run: bool,
    /// `false` when the run was interrupted before the last file.
    pub completed: bool,
    pub reports: Vec<FileReport>,
}


impl RunSummary {
    fn add(&mut self, report: FileReport) {
        self.files += 1;
        if report.is_failed() {
            self.failed_files += 1;
        }
        self.frames += report.frames;
        self.skipped_blocks += report.skipped_blocks;
        self.block_records += report.counts.blocks;
        self.transaction_records += report.counts.transactions;
        self.reports.push(report);
    }

    pub fn log(&self) {
        info!(
            files = self.files,
            failed_files = self.failed_files,
            frames = self.frames,
            skipped_blocks = self.skipped_blocks,
            block_records = self.block_records,
            transaction_records = self.transaction_records,
            dry_run = self.dry_run,
            completed = self.completed,
            "import finished"
        );
    }

    /// Rows bypass the write-ahead log, so whatever was not flushed is
    /// lost when the process exits.
    pub fn log_flush_failure(&self, error: &anyhow::Error) {
        error!(
            error = ?error,
            block_records = self.block_records,
            transaction_records = self.transaction_records,
            "failed to flush database, written rows may be lost"
        );
    }
}


/// Drives every input file through scanning, decoding, mapping and
/// the batched write, one file at a time.
pub struct Pipeline<'a> {
    config: &'a ImportConfig,
    mode: WriteMode<'a>,
    frame_config: FrameConfig,
    shutdown: Option<Arc<AtomicBool>>,
}


impl<'a> Pipeline<'a> {
    pub fn new(config: &'a ImportConfig, mode: WriteMode<'a>) -> Self {
        Self {
            config,
            mode,
            frame_config: config.frame_config(),
            shutdown: None,
        }
    }

    /// The flag is checked before each file.
    pub fn with_shutdown(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown = Some(flag);
        self
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown.as_ref().map_or(false, |flag| flag.load(Ordering::SeqCst))
    }

    /// Fails only when the input directory can not be listed, everything
    /// else is recorded in the returned summary.
    pub fn run(&self) -> Result<RunSummary, ImportError> {
        let files = list_input_files(&self.config.input_dir, &self.config.file_prefix)?;

        info!(
            dir = %self.config.input_dir.display(),
            files = files.len(),
            dry_run = self.mode.is_dry_run(),
            "starting import"
        );

        let mut summary = RunSummary {
            dry_run: self.mode.is_dry_run(),
            ..RunSummary::default()
        };

        let mut progress = Progress::new(10, Duration::from_secs(1));
        progress.start();

        for path in files.iter() {
            if self.is_shutdown() {
                warn!(remaining = files.len() as u64 - summary.files, "import interrupted");
                return Ok(summary);
            }

            summary.add(self.process_file(path));

            progress.record(summary.block_records);
            info!(
                blocks = progress.blocks(),
                blocks_per_second = progress.blocks_per_second(),
                "progress"
            );
        }

        summary.completed = true;
        Ok(summary)
    }

    pub fn process_file(&self, path: &Path) -> FileReport {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mut report = FileReport::new(file_name.clone());

        info!(file = %file_name, "processing file");
        let file = match File::open(path) {
            Ok(file) => file,
            Err(error) => {
                warn!(file = %file_name, error = %error, "failed to open file");
                report.fail(Stage::Opening, ImportError::OpenFailed { file: file_name, error });
                return report;
            }
        };

        let reader = BufReader::with_capacity(self.config.read_buffer_size, file);
        let mut scanner = FrameScanner::new(reader, self.frame_config.clone());
        let mut ingestor = BatchIngestor::new(self.mode, file_name.as_str());

        for frame in scanner.by_ref() {
            let frame = match frame {
                Ok(frame) => frame,
                Err(error) => {
                    warn!(
                        file = %file_name,
                        offset = error.offset(),
                        error = %error,
                        "abandoning the rest of the file"
                    );
                    report.fail(Stage::Scanning, ImportError::Format {
                        file: file_name.clone(),
                        error,
                    });
                    break;
                }
            };
            report.frames += 1;

            match parse_block_at(&frame.payload, frame.payload_offset()) {
                Ok(block) => {
                    let hash = block_hash(&block.header).to_hex();
                    ingestor.extend_transactions(map_transactions(&block, &hash));
                    ingestor.push_block(map_block(&block, &hash, &file_name));
                }
                Err(error) => {
                    // the frame length keeps the scanner aligned
                    report.skipped_blocks += 1;
                    warn!(
                        file = %file_name,
                        offset = frame.offset,
                        error = %error,
                        "skipping malformed block"
                    );
                }
            }
        }
        report.bytes = scanner.position();

        match ingestor.flush() {
            Ok(counts) => {
                info!(file = %file_name, table = "block", records = counts.blocks, written = counts.written, "records");
                info!(file = %file_name, table = "transaction", records = counts.transactions, written = counts.written, "records");
                report.counts = counts;
            }
            Err(error) => {
                warn!(file = %file_name, error = %error, "records of the file are discarded");
                report.fail(Stage::Flushing, error);
            }
        }

        report
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use blk_format::testing::synthetic_block;
    use blk_format::{write_frame, MAINNET_MAGIC};
    use std::io::Write;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture_logs(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        captured.text()
    }

    #[test]
    fn test_file_start_is_logged() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = Vec::new();
        write_frame(&mut bytes, MAINNET_MAGIC, &synthetic_block(1, 1));
        let path = dir.path().join("blk00042.dat");
        std::fs::write(&path, bytes).unwrap();

        let config = ImportConfig {
            input_dir: dir.path().to_path_buf(),
            ..ImportConfig::default()
        };
        let logs = capture_logs(|| {
            Pipeline::new(&config, WriteMode::DryRun).process_file(&path);
        });

        let first = logs.lines().next().unwrap();
        assert!(first.contains("processing file"), "{}", logs);
        assert!(first.contains("blk00042.dat"), "{}", logs);
    }

    #[test]
    fn test_flush_failure_reports_totals() {
        let summary = RunSummary {
            block_records: 3,
            transaction_records: 7,
            ..RunSummary::default()
        };
        let logs = capture_logs(|| summary.log_flush_failure(&anyhow::anyhow!("disk full")));

        assert!(logs.contains("ERROR"), "{}", logs);
        assert!(logs.contains("block_records=3"), "{}", logs);
        assert!(logs.contains("transaction_records=7"), "{}", logs);
        assert!(logs.contains("disk full"), "{}", logs);
    }
}
