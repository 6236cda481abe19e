use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenomeError {
    #[error("Contig not found in sequence dictionary: {0}")]
    UnknownContig(String),

    #[error("Invalid interval {contig}:{start}-{end}")]
    InvalidInterval { contig: String, start: u32, end: u32 },

    #[error("Error parsing sequence dictionary line: {0}")]
    DictionaryParseError(String),

    #[error("Duplicate contig in sequence dictionary: {0}")]
    DuplicateContig(String),

    #[error("Sequence dictionary is empty: {0}")]
    EmptyDictionary(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GenomeError>;
