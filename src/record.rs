use getset::{CopyGetters, Getters};

use crate::types::Text;

/// One decoded summary entry. Alleles are kept as raw bytes; positions
/// compare and sort the way the file orders them. The contig comes from
/// the query, since each summary file covers exactly one contig.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct VariantRecord {
    #[getset(get_copy = "pub")]
    pub(crate) contig: u16,
    #[getset(get_copy = "pub")]
    pub(crate) pos: u64,
    #[getset(get = "pub")]
    pub(crate) ref_allele: Text,
    #[getset(get = "pub")]
    pub(crate) alt_allele: Text,
}

impl VariantRecord {
    pub fn new(contig: u16, pos: u64, ref_allele: Text, alt_allele: Text) -> Self {
        Self {
            contig,
            pos,
            ref_allele,
            alt_allele,
        }
    }
}
