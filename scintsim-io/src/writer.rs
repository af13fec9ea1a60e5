//! File writers for aggregated hits.

use crate::Result;
use scintsim_aggregation::EventHits;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const CSV_HEADER: &str =
    "event_id,hit_id,volume_id,track_id,pdg,process,energy,time,x,y,z,interactions,multiplicity,index";

/// Writer for per-event hit collections.
pub struct HitFileWriter {
    writer: BufWriter<File>,
}

impl HitFileWriter {
    /// Creates a new file writer.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self { writer })
    }

    /// Writes hits as CSV, one row per hit.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_hits_csv(&mut self, events: &[EventHits]) -> Result<()> {
        writeln!(self.writer, "{CSV_HEADER}")?;

        for event in events {
            for (hit_id, h) in event.hits.iter().enumerate() {
                writeln!(
                    self.writer,
                    "{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
                    event.event_id,
                    hit_id,
                    h.volume_id,
                    h.track_id,
                    h.pdg,
                    h.process,
                    h.energy,
                    h.time,
                    h.position.x,
                    h.position.y,
                    h.position.z,
                    h.interactions,
                    h.gen_multiplicity,
                    h.gen_index
                )?;
            }
        }

        self.writer.flush()?;
        Ok(())
    }

    /// Writes each event's hits as one JSON line.
    ///
    /// # Errors
    /// Returns an error if encoding or writing fails.
    pub fn write_hits_jsonl(&mut self, events: &[EventHits]) -> Result<()> {
        for event in events {
            serde_json::to_writer(&mut self.writer, event)?;
            self.writer.write_all(b"\n")?;
        }

        self.writer.flush()?;
        Ok(())
    }

    /// Flushes the writer.
    ///
    /// # Errors
    /// Returns an error if flushing fails.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
