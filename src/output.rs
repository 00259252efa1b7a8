//! Read-only output collaborators: CSV export and UDP transmission.
//!
//! Both consume processor outputs without touching pipeline state. The
//! exporter dumps the raw (timestamp, intensity) series; the sink sends
//! only the current smoothed BPM.

use std::net::UdpSocket;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from output collaborators.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid udp destination: {0}")]
    InvalidAddress(String),
}

/// Writes the raw time series to a timestamped CSV file.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    dir: PathBuf,
}

impl CsvExporter {
    /// Creates an exporter writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Writes one `timestamp,intensity` row per sample and returns the
    /// path of the created file.
    pub fn export(&self, times: &[f64], intensities: &[f64]) -> Result<PathBuf, OutputError> {
        let name = format!(
            "pulse-{}.csv",
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        let path = self.dir.join(name);

        let mut rows = String::with_capacity(times.len() * 24);
        for (t, v) in times.iter().zip(intensities.iter()) {
            rows.push_str(&format!("{t},{v}\n"));
        }
        std::fs::write(&path, rows)?;

        tracing::info!(path = %path.display(), rows = times.len(), "series exported");
        Ok(path)
    }

    /// Directory files are written into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Sends the current BPM as text datagrams to a fixed destination.
#[derive(Debug)]
pub struct UdpSink {
    socket: UdpSocket,
    dest: String,
}

impl UdpSink {
    /// Connects to `dest`, which is `host` or `host:port`; the port
    /// defaults to 5005.
    pub fn new(dest: &str) -> Result<Self, OutputError> {
        let dest = if dest.contains(':') {
            dest.to_string()
        } else {
            format!("{dest}:5005")
        };
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket
            .connect(&dest)
            .map_err(|e| OutputError::InvalidAddress(format!("{dest}: {e}")))?;
        tracing::info!(dest = %dest, "udp sink connected");
        Ok(Self { socket, dest })
    }

    /// Sends one BPM reading.
    pub fn send_bpm(&self, bpm: f64) -> Result<(), OutputError> {
        self.socket.send(format!("{bpm:.1}").as_bytes())?;
        Ok(())
    }

    /// Destination address.
    pub fn dest(&self) -> &str {
        &self.dest
    }
}
