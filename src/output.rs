// src/output.rs
use crate::contract::ContractSpec;
use crate::mc::paths::PathBatch;
use chrono::Utc;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write simulated paths for external plotting
///
/// One row per observation time: `time,barrier,strike,path_0,...`. The barrier and
/// strike columns are constant and give a plotter the two reference lines. At most
/// `max_paths` paths are written when given.
pub fn write_paths_to_csv<P: AsRef<Path>>(
    filename: P,
    batch: &PathBatch,
    contract: &ContractSpec,
    max_paths: Option<usize>,
) -> io::Result<()> {
    let n = max_paths.map_or(batch.num_paths(), |m| m.min(batch.num_paths()));
    let mut file = BufWriter::new(File::create(filename)?);

    write!(file, "time,barrier,strike")?;
    for i in 0..n {
        write!(file, ",path_{}", i)?;
    }
    writeln!(file)?;

    let prices = batch.as_array();
    for (k, t) in batch.time_grid().iter().enumerate() {
        write!(
            file,
            "{},{},{}",
            t,
            contract.barrier_level(),
            contract.strike()
        )?;
        for i in 0..n {
            write!(file, ",{}", prices[[i, k]])?;
        }
        writeln!(file)?;
    }
    file.flush()
}

/// Write `key,value` rows followed by a `generated_at` timestamp
pub fn write_summary_to_csv<P: AsRef<Path>>(
    filename: P,
    summary_data: &[(&str, String)],
) -> io::Result<()> {
    let mut file = File::create(filename)?;
    for (key, value) in summary_data {
        writeln!(file, "{},{}", key, value)?;
    }
    writeln!(file, "generated_at,{}", Utc::now().to_rfc3339())?;
    Ok(())
}
