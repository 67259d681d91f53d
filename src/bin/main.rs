use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::info;

use vcf_summary_scan::{scan, HttpRangeSource, RangeScan, RegionQuery};

/// Extract the records of one genomic window from a compressed variant
/// summary file, stored locally or behind an HTTP range-capable store.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Object URL (http/https) or local file path
    location: String,
    /// Contig the summary file covers
    #[arg(long)]
    contig: u16,
    /// First position of the window (inclusive)
    #[arg(long)]
    start: u64,
    /// Last position of the window (inclusive)
    #[arg(long)]
    end: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let query = RegionQuery {
        location: args.location.clone(),
        contig: args.contig,
        start_pos: args.start,
        end_pos: args.end,
    };
    let records = if query.location.starts_with("http://") || query.location.starts_with("https://")
    {
        scan(&HttpRangeSource::new()?, &query)?
    } else {
        RangeScan::from_path(&args.location, query)?
            .collect::<std::result::Result<Vec<_>, _>>()?
    };

    info!("{} records in window", records.len());
    for record in &records {
        println!(
            "{}\t{}\t{}\t{}",
            record.contig(),
            record.pos(),
            String::from_utf8_lossy(record.ref_allele()),
            String::from_utf8_lossy(record.alt_allele()),
        );
    }
    Ok(())
}
