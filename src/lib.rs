pub mod build;
pub mod dedupe;
pub mod filename;
pub mod marc;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod services;

pub use build::{build_canonical, to_marc};
pub use filename::{classify, FilenameMatch};
pub use marc::{wrap_collection, MarcRecord, Subfields};
pub use model::{Author, CanonicalRecord, DocumentStructure, RawDocument, Reference};
pub use pipeline::{process_dir, EmitMode, RunContext, Services};
