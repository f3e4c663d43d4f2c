//! Snapshot and summary file serialization

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::runtime::Domain;

/// Text snapshot stream: one header line `"<n> <size>"` written before the
/// first frame, then one `"<x> <y>"` line per particle per frame.
pub struct SnapshotWriter {
    out: BufWriter<File>,
    wrote_header: bool,
}

impl SnapshotWriter {
    /// Create (truncate) the snapshot file.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Self {
            out: BufWriter::new(File::create(path)?),
            wrote_header: false,
        })
    }

    /// Append one frame of particle positions.
    pub fn write_frame(&mut self, domain: &Domain, positions: &[(f64, f64)]) -> io::Result<()> {
        if !self.wrote_header {
            writeln!(self.out, "{} {}", positions.len(), domain.size())?;
            self.wrote_header = true;
        }
        for (x, y) in positions {
            writeln!(self.out, "{} {}", x, y)?;
        }
        self.out.flush()
    }
}

/// Append one run summary line `"<n> <workers> <seconds>"`.
pub fn append_summary<P: AsRef<Path>>(
    path: P,
    num_particles: usize,
    num_workers: usize,
    seconds: f64,
) -> io::Result<()> {
    let mut out = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(out, "{} {} {}", num_particles, num_workers, seconds)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    fn temp_path(name: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("binmd-output-test-{}-{}", std::process::id(), name));
        path
    }

    #[test]
    fn snapshot_writes_header_once() {
        let path = temp_path("snapshot");
        let domain = Domain::for_particle_count(500);
        {
            let mut writer = SnapshotWriter::create(&path).unwrap();
            writer.write_frame(&domain, &[(0.1, 0.2), (0.3, 0.4)]).unwrap();
            writer.write_frame(&domain, &[(0.1, 0.2), (0.3, 0.4)]).unwrap();
        }
        let contents = fs::read_to_string(&path).unwrap();
        let lines = contents.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 1 + 2 * 2);
        assert_eq!(lines[0], "2 0.5");
        assert_eq!(lines[1], "0.1 0.2");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn summary_appends() {
        let path = temp_path("summary");
        let _ = fs::remove_file(&path);
        append_summary(&path, 500, 4, 1.25).unwrap();
        append_summary(&path, 500, 8, 0.75).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        let lines = contents.lines().collect::<Vec<_>>();
        assert_eq!(lines, vec!["500 4 1.25", "500 8 0.75"]);
        fs::remove_file(&path).unwrap();
    }
}
