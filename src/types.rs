use std::io;
use std::mem::size_of;

use thiserror::Error;

/// How many decompressed bytes the scan window holds at once.
pub(crate) const BUFFER_SIZE: usize = 1024;

/// Smallest legal record: the position field plus one string length prefix.
pub(crate) const MIN_RECORD_SIZE: usize = size_of::<u64>() + size_of::<u32>();

pub(crate) type Text = Vec<u8>;

pub type Result<T> = std::result::Result<T, ScanError>;

/// One range request: the stored summary object plus the inclusive genomic
/// window to extract from it. Summary files carry a single contig each, so
/// the contig names the file's contents rather than a per-record filter.
#[derive(Debug, Clone)]
pub struct RegionQuery {
    pub location: String,
    pub contig: u16,
    pub start_pos: u64,
    pub end_pos: u64,
}

#[derive(Debug, Error)]
pub enum ScanError {
    /// The storage range request failed (network, permissions, missing
    /// object). Never retried here.
    #[error("range fetch failed: {0}")]
    Fetch(String),

    /// The compressed stream is malformed. Fatal to the scan.
    #[error("malformed compressed stream: {0}")]
    Decompression(#[source] io::Error),

    /// A decoded length is out of plausible bounds, or the stream ended in
    /// the middle of a record. Fatal to the scan.
    #[error("corrupt record: {0}")]
    CorruptRecord(String),
}

impl ScanError {
    /// Sort a failed read on the decompressed stream into the taxonomy:
    /// the inflater signals bad input through these error kinds, anything
    /// else bubbled up from the range fetch underneath it.
    pub(crate) fn from_read(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::InvalidData
            | io::ErrorKind::InvalidInput
            | io::ErrorKind::UnexpectedEof => ScanError::Decompression(e),
            _ => ScanError::Fetch(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_record_display() {
        let error =
            ScanError::CorruptRecord("string length 70000 exceeds the 1024 byte window".into());
        let msg = format!("{}", error);
        assert!(msg.contains("corrupt record"));
        assert!(msg.contains("70000"));
    }

    #[test]
    fn test_read_error_classification() {
        let corrupt = io::Error::new(io::ErrorKind::InvalidData, "corrupt deflate stream");
        assert!(matches!(
            ScanError::from_read(corrupt),
            ScanError::Decompression(_)
        ));

        let refused = io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused");
        assert!(matches!(ScanError::from_read(refused), ScanError::Fetch(_)));
    }
}
