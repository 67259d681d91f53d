use std::io;
use std::io::Read;
use std::path::Path;

use log::{debug, info};

use crate::buffer::RecordBuffer;
use crate::fetch::RangeSource;
use crate::parser;
use crate::record::VariantRecord;
use crate::types::{RegionQuery, Result, ScanError, MIN_RECORD_SIZE};

/// Streaming decoder for one region query.
///
/// Iterates over exactly the records whose position falls inside the
/// query window, in stream order. The stream delivers records in
/// non-decreasing position order, so the first position past the window
/// end finishes the scan without touching the rest of the file.
pub struct RangeScan<R: Read> {
    query: RegionQuery,
    buffer: RecordBuffer<R>,
    done: bool,
}

impl RangeScan<Box<dyn Read>> {
    /// Scan a summary file on the local filesystem, recognizing its
    /// compression from the magic bytes.
    pub fn from_path<P: AsRef<Path>>(path: P, query: RegionQuery) -> Result<Self> {
        let (reader, _format) = niffler::from_path(path).map_err(open_error)?;
        Ok(Self::new(reader, query))
    }

    /// Fetch `query.location` from the object store and scan it. The
    /// whole object is requested; the early-exit filter bounds how much
    /// of it actually gets decompressed.
    pub fn from_source<S: RangeSource + ?Sized>(source: &S, query: RegionQuery) -> Result<Self> {
        let raw = source.fetch(&query.location, 0, u64::MAX)?;
        let (reader, _format) = niffler::get_reader(raw).map_err(open_error)?;
        Ok(Self::new(reader, query))
    }
}

fn open_error(e: niffler::Error) -> ScanError {
    match e {
        niffler::Error::IOError(e) => ScanError::from_read(e),
        other => ScanError::Decompression(io::Error::new(
            io::ErrorKind::InvalidData,
            other.to_string(),
        )),
    }
}

impl<R: Read> RangeScan<R> {
    /// Scan an already-decompressed byte stream.
    pub fn new(reader: R, query: RegionQuery) -> Self {
        Self {
            buffer: RecordBuffer::new(reader),
            query,
            done: false,
        }
    }

    fn decode_next(&mut self) -> Result<Option<VariantRecord>> {
        loop {
            if !self.buffer.ensure_available(MIN_RECORD_SIZE)? {
                let trailing = self.buffer.available();
                if trailing > 0 {
                    return Err(ScanError::CorruptRecord(format!(
                        "stream ended mid-record with {} trailing bytes",
                        trailing
                    )));
                }
                return Ok(None);
            }
            let pos = parser::read_position(&mut self.buffer);
            if pos > self.query.end_pos {
                // sorted stream: nothing after this record can match
                debug!(
                    "position {} is past the window end {}, stopping",
                    pos, self.query.end_pos
                );
                return Ok(None);
            }
            // decode the whole record even when it lands below the window,
            // so the cursor comes to rest on the next header
            let ref_allele = parser::read_string(&mut self.buffer)?;
            let alt_allele = parser::read_string(&mut self.buffer)?;
            if pos >= self.query.start_pos {
                return Ok(Some(VariantRecord {
                    contig: self.query.contig,
                    pos,
                    ref_allele,
                    alt_allele,
                }));
            }
        }
    }
}

impl<R: Read> Iterator for RangeScan<R> {
    type Item = Result<VariantRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.decode_next() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Decode every record of `query.location` that falls inside the query
/// window, in stream order. Built in full or not at all: any fetch,
/// decompression, or corruption failure discards the partial sequence.
pub fn scan<S: RangeSource + ?Sized>(source: &S, query: &RegionQuery) -> Result<Vec<VariantRecord>> {
    info!(
        "scanning {} contig {} window {}..={}",
        query.location, query.contig, query.start_pos, query.end_pos
    );
    let records = RangeScan::from_source(source, query.clone())?.collect::<Result<Vec<_>>>()?;
    debug!("{} records matched", records.len());
    Ok(records)
}
