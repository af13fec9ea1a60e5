//! Memory-mapped step-trace readers.
//!
//! A trace holds one JSON-encoded [`SimulatedEvent`] per line. Blank lines
//! are skipped.

use crate::{Error, Result};
use memmap2::Mmap;
use scintsim_core::SimulatedEvent;
use std::fs::File;
use std::path::{Path, PathBuf};

/// A memory-mapped file reader.
///
/// Uses memmap2 to access file contents without loading the entire file
/// into memory.
pub struct MappedFileReader {
    mmap: Mmap,
    path: PathBuf,
}

impl MappedFileReader {
    /// Opens a file for memory-mapped reading.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or memory-mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;
        // SAFETY: The file is opened read-only and we assume it is not modified concurrently.
        // This is the standard safety contract for memory mapping.
        #[allow(unsafe_code)]
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self {
            mmap,
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Returns the file contents as a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap[..]
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    /// Returns true if the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Returns the path the reader was opened with.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Reader for JSON-lines step traces.
pub struct StepTraceReader {
    reader: MappedFileReader,
}

impl StepTraceReader {
    /// Opens a trace file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or memory-mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            reader: MappedFileReader::open(path)?,
        })
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn file_size(&self) -> usize {
        self.reader.len()
    }

    /// Iterates over the events of the trace in file order.
    ///
    /// Each item carries its own decoding error, tagged with the 1-based
    /// line number.
    pub fn events(&self) -> impl Iterator<Item = Result<SimulatedEvent>> + '_ {
        self.reader
            .as_bytes()
            .split(|&b| b == b'\n')
            .enumerate()
            .filter(|(_, line)| !line.trim_ascii().is_empty())
            .map(|(idx, line)| {
                serde_json::from_slice(line).map_err(|e| Error::InvalidFormat {
                    line: idx + 1,
                    message: e.to_string(),
                })
            })
    }

    /// Reads every event of the trace.
    ///
    /// # Errors
    /// Returns the first decoding error.
    pub fn read_events(&self) -> Result<Vec<SimulatedEvent>> {
        let events = self.events().collect::<Result<Vec<_>>>()?;
        log::info!(
            "read {} events from {}",
            events.len(),
            self.reader.path().display()
        );
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_mapped_file_reader() {
        let mut file = NamedTempFile::new().unwrap();
        let data: Vec<u8> = (0..64).collect();
        file.write_all(&data).unwrap();
        file.flush().unwrap();

        let reader = MappedFileReader::open(file.path()).unwrap();
        assert_eq!(reader.len(), 64);
        assert!(!reader.is_empty());
        assert_eq!(reader.as_bytes(), &data[..]);
    }

    #[test]
    fn test_trace_reader_empty() {
        let file = NamedTempFile::new().unwrap();
        let reader = StepTraceReader::open(file.path()).unwrap();
        assert_eq!(reader.file_size(), 0);
        assert!(reader.read_events().unwrap().is_empty());
    }

    #[test]
    fn test_trace_reader_partial_records() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"event_id": 4, "primaries": [{{"track_id": 1, "tag": {{"multiplicity": 2, "index": 1}}}}]}}"#
        )
        .unwrap();
        writeln!(file).unwrap();
        writeln!(
            file,
            r#"{{"event_id": 5, "deposits": [{{"edep": 0.2, "time": 1.5, "volume_id": 3}}]}}"#
        )
        .unwrap();
        file.flush().unwrap();

        let events = StepTraceReader::open(file.path())
            .unwrap()
            .read_events()
            .unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_id, 4);
        assert_eq!(events[0].primaries[0].tag.multiplicity, 2);
        assert!(events[0].deposits.is_empty());
        assert_eq!(events[1].deposits[0].volume_id, 3);
        assert_eq!(events[1].deposits[0].process, "");
    }

    #[test]
    fn test_trace_reader_reports_line() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"event_id": 1}}"#).unwrap();
        writeln!(file, "not json").unwrap();
        file.flush().unwrap();

        let reader = StepTraceReader::open(file.path()).unwrap();
        match reader.read_events() {
            Err(Error::InvalidFormat { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected format error, got {other:?}"),
        }
    }
}
