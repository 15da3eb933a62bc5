//! Bounded JSONL error log.

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use synclab_application::ports::error_sink::ErrorSink;
use synclab_domain::ErrorRecord;
use tracing::warn;

/// [`ErrorSink`] that keeps the last `capacity` records in memory and in a
/// JSONL file.
///
/// New records are appended to the file; once the window overflows the file
/// is rewritten with only the retained records. Records from earlier
/// sessions are loaded on open so they can be replayed.
pub struct JsonlErrorSink {
    path: PathBuf,
    capacity: usize,
    records: Mutex<VecDeque<ErrorRecord>>,
}

impl JsonlErrorSink {
    /// Open the log, loading whatever an earlier session left behind.
    ///
    /// Unreadable lines are skipped. A missing file is not an error.
    pub fn open(path: impl Into<PathBuf>, capacity: usize) -> std::io::Result<Self> {
        let path = path.into();
        let capacity = capacity.max(1);

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let mut records = VecDeque::with_capacity(capacity);
        match File::open(&path) {
            Ok(file) => {
                for (index, line) in BufReader::new(file).lines().enumerate() {
                    let line = line?;
                    if line.trim().is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<ErrorRecord>(&line) {
                        Ok(record) => {
                            records.push_back(record);
                            if records.len() > capacity {
                                records.pop_front();
                            }
                        }
                        Err(e) => warn!(
                            "Skipping unreadable error log line {} in {}: {}",
                            index + 1,
                            path.display(),
                            e
                        ),
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }

        let sink = Self {
            path,
            capacity,
            records: Mutex::new(records),
        };
        // Trim a file that grew past the window in an earlier session.
        if let Ok(records) = sink.records.lock() {
            sink.rewrite(&records)?;
        }
        Ok(sink)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn append(&self, record: &ErrorRecord) -> std::io::Result<()> {
        let line = serde_json::to_string(record)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }

    fn rewrite(&self, records: &VecDeque<ErrorRecord>) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        for record in records {
            writeln!(writer, "{}", serde_json::to_string(record)?)?;
        }
        writer.flush()
    }
}

impl ErrorSink for JsonlErrorSink {
    fn record(&self, record: &ErrorRecord) {
        let Ok(mut records) = self.records.lock() else {
            return;
        };
        records.push_back(record.clone());

        let result = if records.len() > self.capacity {
            while records.len() > self.capacity {
                records.pop_front();
            }
            self.rewrite(&records)
        } else {
            self.append(record)
        };
        if let Err(e) = result {
            warn!("Could not write error log {}: {}", self.path.display(), e);
        }
    }

    fn recent(&self) -> Vec<ErrorRecord> {
        self.records
            .lock()
            .map(|records| records.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synclab_domain::ErrorKind;

    fn record(n: usize) -> ErrorRecord {
        ErrorRecord::new(ErrorKind::Server, format!("failure {}", n), "turn:critic")
    }

    fn file_lines(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_records_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.jsonl");
        let sink = JsonlErrorSink::open(&path, 5).unwrap();
        assert!(sink.recent().is_empty());

        sink.record(&record(1));
        sink.record(&record(2));

        let recent = sink.recent();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].message, "failure 1");
        assert_eq!(file_lines(&path).len(), 2);
    }

    #[test]
    fn test_window_is_bounded_in_memory_and_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.jsonl");
        let sink = JsonlErrorSink::open(&path, 3).unwrap();

        for n in 1..=5 {
            sink.record(&record(n));
        }

        let messages: Vec<String> = sink.recent().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, vec!["failure 3", "failure 4", "failure 5"]);
        assert_eq!(file_lines(&path).len(), 3);
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("errors.jsonl");
        {
            let sink = JsonlErrorSink::open(&path, 10).unwrap();
            sink.record(&record(1));
            sink.record(&record(2));
        }

        let reopened = JsonlErrorSink::open(&path, 10).unwrap();
        let recent = reopened.recent();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[1].message, "failure 2");
        assert_eq!(recent[1].kind, ErrorKind::Server);
        assert!(recent[1].hint.is_some());
    }

    #[test]
    fn test_reopen_with_smaller_capacity_trims_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.jsonl");
        {
            let sink = JsonlErrorSink::open(&path, 10).unwrap();
            for n in 1..=6 {
                sink.record(&record(n));
            }
        }

        let reopened = JsonlErrorSink::open(&path, 2).unwrap();
        let messages: Vec<String> = reopened.recent().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, vec!["failure 5", "failure 6"]);
        assert_eq!(file_lines(&path).len(), 2);
    }

    #[test]
    fn test_unreadable_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.jsonl");
        let good = serde_json::to_string(&record(7)).unwrap();
        std::fs::write(&path, format!("garbage\n{}\n\n", good)).unwrap();

        let sink = JsonlErrorSink::open(&path, 5).unwrap();
        let recent = sink.recent();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].message, "failure 7");
    }
}
