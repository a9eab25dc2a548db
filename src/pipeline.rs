use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use walkdir::WalkDir;

use crate::build::{build_canonical, to_marc};
use crate::dedupe::resolve_reference;
use crate::filename::{classify, FilenameMatch};
use crate::marc::wrap_collection;
use crate::model::RawDocument;
use crate::normalize::{clean_reference, fpage_from_range};
use crate::services::{CatalogSearch, ReferenceExtractor, StructureExtractor};

/// How serialized records are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitMode {
    /// One file per record: `<outdir>/<cnum>/<cnum>_<fpage>.xml`.
    PerDocument,
    /// One concatenated `<outdir>/<cnum>.xml` per collection, records in
    /// ascending numeric page order, pre-existing files replaced wholesale.
    Concatenated,
}

/// Per-run state: configuration plus the accumulators owned by the single
/// processing thread. Created at run start, summarized once at run end.
pub struct RunContext {
    pub pubdate: String,
    pub output_dir: PathBuf,
    pub mode: EmitMode,
    pub prefix: Option<String>,
    pub with_references: bool,
    /// Documents whose structure extraction failed; reported once at the end
    /// of the run, not per document.
    pub not_processed: Vec<PathBuf>,
    /// Output paths written more than once in this run (two inputs mapping
    /// to the same collection id and page locator); the last record wins.
    pub collisions: Vec<PathBuf>,
    pub written: usize,
}

impl RunContext {
    pub fn new(pubdate: impl Into<String>, output_dir: impl Into<PathBuf>, mode: EmitMode) -> Self {
        Self {
            pubdate: pubdate.into(),
            output_dir: output_dir.into(),
            mode,
            prefix: None,
            with_references: false,
            not_processed: Vec::new(),
            collisions: Vec::new(),
            written: 0,
        }
    }

    /// Log the end-of-run summary: record count and the warning list of
    /// documents that were only partially processed.
    pub fn report(&self) {
        info!("Wrote {} records.", self.written);
        if !self.not_processed.is_empty() {
            warn!(
                "{} document(s) could not be fully processed:",
                self.not_processed.len()
            );
            for path in &self.not_processed {
                warn!("  {}", path.display());
            }
        }
        if !self.collisions.is_empty() {
            warn!(
                "{} output path(s) were written more than once:",
                self.collisions.len()
            );
            for path in &self.collisions {
                warn!("  {}", path.display());
            }
        }
    }
}

/// The three external collaborators, injected so the pipeline can run
/// against fakes in tests.
pub struct Services<'a> {
    pub structure: &'a dyn StructureExtractor,
    pub references: &'a dyn ReferenceExtractor,
    pub catalog: &'a dyn CatalogSearch,
}

/// Recursively collect the PDF files of a directory, optionally keeping only
/// names starting with `prefix`. Order is stable (sorted by path).
pub fn find_pdf_files(input_dir: &Path, prefix: Option<&str>) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(input_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| {
            entry.path().is_file()
                && entry
                    .path()
                    .extension()
                    .is_some_and(|ext| ext == "pdf" || ext == "pdfa")
        })
        .filter(|entry| match prefix {
            Some(prefix) => entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(prefix)),
            None => true,
        })
        .map(|entry| entry.path().to_path_buf())
        .collect();
    paths.sort();
    paths
}

/// Process one directory tree end to end: match, extract, normalize,
/// aggregate and write. A failing extraction or lookup degrades that
/// document, never the run.
pub fn process_dir(ctx: &mut RunContext, input_dir: &Path, services: &Services) -> Result<()> {
    let pdf_files = find_pdf_files(input_dir, ctx.prefix.as_deref());
    info!(
        "Found {} PDF files under {}",
        pdf_files.len(),
        input_dir.display()
    );

    // cnum -> (numeric order key, fpage, serialized record)
    let mut collections: BTreeMap<String, Vec<(u64, Option<String>, String)>> = BTreeMap::new();

    for path in pdf_files {
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let (cnum, fpage, proceedings) = match classify(filename) {
            // Filename-derived pages go through the same digit-extraction
            // rule as catalog page-range strings.
            FilenameMatch::Paper { cnum, fpage } => (cnum, Some(fpage_from_range(&fpage)), false),
            FilenameMatch::Proceedings { cnum } => (cnum, None, true),
            FilenameMatch::Garbage { stem } => (stem, None, false),
        };

        let pdf = fs::read(&path).with_context(|| format!("failed to read {:?}", path))?;
        let structure = match services.structure.extract(&pdf) {
            Ok(structure) => Some(structure),
            Err(e) => {
                warn!("Structure extraction failed for {:?}: {}", path, e);
                ctx.not_processed.push(path.clone());
                None
            }
        };

        let references = if ctx.with_references {
            match services.references.extract(&path) {
                Ok(references) => references
                    .into_iter()
                    .map(clean_reference)
                    .map(|mut reference| {
                        reference.recids = resolve_reference(&reference, services.catalog);
                        reference
                    })
                    .collect(),
                Err(e) => {
                    warn!("Reference extraction failed for {:?}: {}", path, e);
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        let document = RawDocument {
            path: path.clone(),
            cnum,
            fpage,
            proceedings,
            structure,
        };
        let record = build_canonical(document, references);
        let xml = to_marc(&record, &ctx.pubdate).to_xml();

        let order_key = record
            .fpage
            .as_deref()
            .and_then(|fpage| fpage.parse::<u64>().ok())
            // Records without a usable page locator sort last.
            .unwrap_or(u64::MAX);
        collections
            .entry(record.cnum.clone())
            .or_default()
            .push((order_key, record.fpage.clone(), xml));
    }

    emit_collections(ctx, collections)?;
    ctx.report();
    Ok(())
}

fn emit_collections(
    ctx: &mut RunContext,
    collections: BTreeMap<String, Vec<(u64, Option<String>, String)>>,
) -> Result<()> {
    fs::create_dir_all(&ctx.output_dir)
        .with_context(|| format!("failed to create {:?}", ctx.output_dir))?;

    let mut written_paths: HashSet<PathBuf> = HashSet::new();
    for (cnum, mut records) in collections {
        match ctx.mode {
            EmitMode::PerDocument => {
                let collection_dir = ctx.output_dir.join(&cnum);
                fs::create_dir_all(&collection_dir)
                    .with_context(|| format!("failed to create {:?}", collection_dir))?;
                for (_, fpage, xml) in records {
                    let filename = match &fpage {
                        Some(fpage) => format!("{}_{}.xml", cnum, fpage),
                        None => format!("{}.xml", cnum),
                    };
                    let target = collection_dir.join(filename);
                    if !written_paths.insert(target.clone()) {
                        warn!(
                            "Output path {:?} written more than once, keeping the last record",
                            target
                        );
                        ctx.collisions.push(target.clone());
                    }
                    fs::write(&target, &xml)
                        .with_context(|| format!("failed to write {:?}", target))?;
                    ctx.written += 1;
                }
            }
            EmitMode::Concatenated => {
                // Numeric page order, not lexicographic: 10 sorts after 9.
                records.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));
                let xmls: Vec<String> = records.into_iter().map(|(_, _, xml)| xml).collect();
                let target = ctx.output_dir.join(format!("{}.xml", cnum));
                // fs::write truncates, so a previous run's file is replaced
                // rather than grown.
                fs::write(&target, wrap_collection(&xmls))
                    .with_context(|| format!("failed to write {:?}", target))?;
                ctx.written += xmls.len();
            }
        }
        info!("Finished collection {}", cnum);
    }
    Ok(())
}
