use std::io::Read;
use std::mem::size_of;

use nom::number::complete::{le_u32, le_u64};
use nom::IResult;

use crate::buffer::RecordBuffer;
use crate::types::{Result, ScanError, Text, BUFFER_SIZE};

fn position(input: &[u8]) -> IResult<&[u8], u64> {
    le_u64(input)
}

fn string_length(input: &[u8]) -> IResult<&[u8], u32> {
    le_u32(input)
}

/// Decode the fixed-width record position at the cursor. The caller must
/// have secured `size_of::<u64>()` bytes beforehand, so the parse itself
/// cannot fail.
pub(crate) fn read_position<R: Read>(buffer: &mut RecordBuffer<R>) -> u64 {
    position(buffer.take(size_of::<u64>())).unwrap().1
}

/// Decode one 4-byte-length-prefixed string at the cursor, refilling as
/// needed. The length is checked against the window capacity before any
/// allocation happens, so a garbage prefix cannot trigger an unbounded
/// request. A stream that ends inside the prefix or the payload is a
/// corrupt record.
pub(crate) fn read_string<R: Read>(buffer: &mut RecordBuffer<R>) -> Result<Text> {
    if !buffer.ensure_available(size_of::<u32>())? {
        return Err(ScanError::CorruptRecord(format!(
            "stream ended inside a string length prefix ({} trailing bytes)",
            buffer.available()
        )));
    }
    let length = string_length(buffer.take(size_of::<u32>())).unwrap().1 as usize;
    if length > BUFFER_SIZE {
        return Err(ScanError::CorruptRecord(format!(
            "string length {} exceeds the {} byte window",
            length, BUFFER_SIZE
        )));
    }
    if !buffer.ensure_available(length)? {
        return Err(ScanError::CorruptRecord(format!(
            "stream ended inside a string payload ({} of {} bytes present)",
            buffer.available(),
            length
        )));
    }
    Ok(buffer.take(length).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn buffer_over(bytes: Vec<u8>) -> RecordBuffer<Cursor<Vec<u8>>> {
        RecordBuffer::new(Cursor::new(bytes))
    }

    #[test]
    fn test_position_is_little_endian() {
        let mut buffer = buffer_over(0x0102_0304_0506_0708u64.to_le_bytes().to_vec());
        buffer.ensure_available(8).unwrap();
        assert_eq!(read_position(&mut buffer), 0x0102_0304_0506_0708);
    }

    #[test]
    fn test_string_decoding() {
        let mut bytes = 4u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(b"ACGT");
        let mut buffer = buffer_over(bytes);
        assert_eq!(read_string(&mut buffer).unwrap(), b"ACGT");
    }

    #[test]
    fn test_empty_string_is_legal() {
        let mut buffer = buffer_over(0u32.to_le_bytes().to_vec());
        assert_eq!(read_string(&mut buffer).unwrap(), b"");
    }

    #[test]
    fn test_length_beyond_window_is_corrupt() {
        let mut buffer = buffer_over(u32::MAX.to_le_bytes().to_vec());
        match read_string(&mut buffer) {
            Err(ScanError::CorruptRecord(msg)) => assert!(msg.contains("exceeds")),
            other => panic!("expected a corrupt record, got {:?}", other),
        }
    }

    #[test]
    fn test_payload_cut_short_is_corrupt() {
        let mut bytes = 10u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(b"ACG");
        let mut buffer = buffer_over(bytes);
        match read_string(&mut buffer) {
            Err(ScanError::CorruptRecord(msg)) => assert!(msg.contains("payload")),
            other => panic!("expected a corrupt record, got {:?}", other),
        }
    }

    #[test]
    fn test_prefix_cut_short_is_corrupt() {
        let mut buffer = buffer_over(vec![0x05, 0x00]);
        match read_string(&mut buffer) {
            Err(ScanError::CorruptRecord(msg)) => assert!(msg.contains("prefix")),
            other => panic!("expected a corrupt record, got {:?}", other),
        }
    }
}
