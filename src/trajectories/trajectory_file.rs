//! # Trajectory table export
//!
//! Writes the entries of a [`TrajectoryTable`] as CSV, one row per sample, with the header
//! `time_of_flight,true_anomaly_deg,f,g,f_dot,g_dot`. Rows are serialized through `serde`, so
//! the column set always follows [`TrajectorySample`](crate::trajectories::TrajectorySample).
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::{conic_errors::ConicError, trajectories::TrajectoryTable};

impl TrajectoryTable {
    /// Serialize every sample to a writer.
    ///
    /// Arguments
    /// -----------------
    /// * `writer`: destination of the CSV text.
    ///
    /// Return
    /// ----------
    /// * [`ConicError::CsvError`] if a row cannot be written.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ConicError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for sample in self.samples() {
            csv_writer.serialize(sample)?;
        }
        csv_writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Serialize every sample to a file, created or truncated.
    pub fn write_csv_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConicError> {
        let file = File::create(path).map_err(csv::Error::from)?;
        self.write_csv(file)
    }
}
