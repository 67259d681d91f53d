//! Byte-range access to stored summary objects.
//!
//! The decoder only ever pulls bytes through the [`RangeSource`] trait;
//! which store backs it is the caller's business. The HTTP implementation
//! speaks plain `Range` requests, which is what S3-style object stores
//! serve.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;

use crate::types::{Result, ScanError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Gives the decoder a readable byte sequence for part of a stored
/// object. Byte positions are inclusive on both ends, mirroring HTTP
/// range semantics; `end_byte == u64::MAX` means "through end of object".
pub trait RangeSource {
    fn fetch(&self, location: &str, start_byte: u64, end_byte: u64) -> Result<Box<dyn Read>>;
}

/// Range requests against an HTTP(S) object store.
///
/// Transient failures are retried here with exponential backoff; by the
/// time an error reaches the decoder it is final.
pub struct HttpRangeSource {
    client: Client,
    max_retries: u32,
}

impl HttpRangeSource {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| ScanError::Fetch(e.to_string()))?;
        Ok(Self {
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    fn fetch_once(
        &self,
        url: &str,
        start_byte: u64,
        end_byte: u64,
    ) -> Result<reqwest::blocking::Response> {
        let range_header = if end_byte == u64::MAX {
            format!("bytes={}-", start_byte)
        } else {
            format!("bytes={}-{}", start_byte, end_byte)
        };
        let response = self
            .client
            .get(url)
            .header("Range", range_header)
            .send()
            .map_err(|e| ScanError::Fetch(e.to_string()))?;
        match response.status().as_u16() {
            206 => Ok(response),
            // a 200 means the server ignored the range header and is about
            // to ship the entire object
            200 => Err(ScanError::Fetch(format!(
                "{} does not support range requests",
                url
            ))),
            416 => Err(ScanError::Fetch(format!(
                "range {}-{} is not satisfiable for {}",
                start_byte, end_byte, url
            ))),
            status => Err(ScanError::Fetch(format!(
                "{} returned HTTP {}",
                url, status
            ))),
        }
    }
}

impl RangeSource for HttpRangeSource {
    fn fetch(&self, location: &str, start_byte: u64, end_byte: u64) -> Result<Box<dyn Read>> {
        let mut attempts = 0;
        let mut backoff = Duration::from_millis(100);
        loop {
            debug!("GET {} bytes {}-{}", location, start_byte, end_byte);
            match self.fetch_once(location, start_byte, end_byte) {
                Ok(response) => return Ok(Box::new(response)),
                Err(e) => {
                    attempts += 1;
                    if attempts >= self.max_retries {
                        return Err(e);
                    }
                    warn!("range fetch attempt {} failed ({}), retrying", attempts, e);
                    std::thread::sleep(backoff);
                    backoff *= 2;
                }
            }
        }
    }
}

/// Local-filesystem stand-in for the object store, used for summary files
/// that are already on disk. `location` is the file path.
pub struct FileRangeSource;

impl RangeSource for FileRangeSource {
    fn fetch(&self, location: &str, start_byte: u64, end_byte: u64) -> Result<Box<dyn Read>> {
        let mut file = File::open(location)
            .map_err(|e| ScanError::Fetch(format!("{}: {}", location, e)))?;
        file.seek(SeekFrom::Start(start_byte))
            .map_err(|e| ScanError::Fetch(format!("{}: {}", location, e)))?;
        let window = end_byte.saturating_sub(start_byte).saturating_add(1);
        Ok(Box::new(file.take(window)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fixture(bytes: &[u8]) -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.bin");
        File::create(&path).unwrap().write_all(bytes).unwrap();
        (dir, path.to_str().unwrap().to_string())
    }

    #[test]
    fn test_file_source_returns_requested_window() {
        let (_dir, path) = fixture(b"0123456789");
        let mut out = Vec::new();
        FileRangeSource
            .fetch(&path, 3, 7)
            .unwrap()
            .read_to_end(&mut out)
            .unwrap();
        assert_eq!(out, b"34567");
    }

    #[test]
    fn test_file_source_open_end_reads_to_eof() {
        let (_dir, path) = fixture(b"0123456789");
        let mut out = Vec::new();
        FileRangeSource
            .fetch(&path, 4, u64::MAX)
            .unwrap()
            .read_to_end(&mut out)
            .unwrap();
        assert_eq!(out, b"456789");
    }

    #[test]
    fn test_missing_object_is_a_fetch_error() {
        let err = FileRangeSource
            .fetch("/no/such/summary.bin", 0, u64::MAX)
            .err()
            .unwrap();
        assert!(matches!(err, ScanError::Fetch(_)));
    }
}
