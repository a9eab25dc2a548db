use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::PathBuf;

use procmarc::pipeline::{process_dir, EmitMode, RunContext, Services};
use procmarc::services::{CatalogClient, GrobidClient, RefExtractClient};

/// Convert conference-proceedings PDFs into MARCXML exchange records.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input directory scanned recursively for PDF files
    #[arg(short, long)]
    input_dir: PathBuf,
    /// Publication date; the PDFs carry no date, so it must be supplied
    #[arg(short, long)]
    pubdate: String,
    /// Output directory for the MARCXML records
    #[arg(short, long, default_value = "marc_records")]
    output: PathBuf,
    /// Write one concatenated file per collection instead of one per record
    #[arg(long)]
    concat: bool,
    /// Only process files whose name starts with this prefix
    #[arg(long)]
    prefix: Option<String>,
    /// Also extract references and link them against the catalog
    #[arg(long)]
    references: bool,
    /// Base URL of the document-structure extraction service
    #[arg(long, default_value = "http://inspire-grobid.cern.ch:8080")]
    grobid_url: String,
    /// Base URL of the reference-extraction service
    #[arg(long, default_value = "http://localhost:8080")]
    refextract_url: String,
    /// Base URL of the catalog search service
    #[arg(long, default_value = "https://inspirehep.net")]
    catalog_url: String,
    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Configure logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    if !args.input_dir.exists() {
        anyhow::bail!("Path {:?} doesn't exist!", args.input_dir);
    }

    let structure = GrobidClient::new(&args.grobid_url);
    let references = RefExtractClient::new(&args.refextract_url);
    let catalog = CatalogClient::new(&args.catalog_url);
    let services = Services {
        structure: &structure,
        references: &references,
        catalog: &catalog,
    };

    let mode = if args.concat {
        EmitMode::Concatenated
    } else {
        EmitMode::PerDocument
    };
    let mut ctx = RunContext::new(&args.pubdate, &args.output, mode);
    ctx.prefix = args.prefix.clone();
    ctx.with_references = args.references;

    info!("Processing directory {:?}", args.input_dir);
    process_dir(&mut ctx, &args.input_dir, &services)?;

    Ok(())
}
