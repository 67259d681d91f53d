pub mod buffer;
pub mod fetch;
pub(crate) mod parser;
pub mod reader;
pub mod record;
pub mod types;

pub use fetch::{FileRangeSource, HttpRangeSource, RangeSource};
pub use reader::{scan, RangeScan};
pub use record::VariantRecord;
pub use types::{RegionQuery, Result, ScanError};

#[cfg(test)]
mod test {

    use std::io::Cursor;

    use super::reader::RangeScan;
    use super::types::RegionQuery;

    #[test]
    fn test_empty_stream_yields_nothing() {
        let query = RegionQuery {
            location: "mem".into(),
            contig: 1,
            start_pos: 0,
            end_pos: u64::MAX,
        };
        let records = RangeScan::new(Cursor::new(Vec::<u8>::new()), query)
            .collect::<crate::Result<Vec<_>>>()
            .unwrap();
        assert!(records.is_empty());
    }
}
