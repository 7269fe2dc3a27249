use std::io;

use thiserror::Error;

use crate::pattern::PatternError;
use crate::tree::TreeError;

/// Violations of the input contract.
///
/// These errors indicate that an upstream annotator produced data that
/// the extraction core cannot safely interpret.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ContractError {
    #[error("dependency {relation}({governor}, {dependent}) refers to a token beyond sentence length {len}")]
    EdgeOutOfRange {
        governor: usize,
        dependent: usize,
        relation: String,
        len: usize,
    },

    #[error("sentence without tokens")]
    EmptySentence,

    #[error("tree has {leaves} leaves, but the sentence has {tokens} tokens")]
    LeafCountMismatch { leaves: usize, tokens: usize },

    #[error("sentence index {index} out of range for a document with {len} sentences")]
    SentenceOutOfRange { index: usize, len: usize },

    #[error("token index {index} out of range for a sentence with {len} tokens")]
    TokenOutOfRange { index: usize, len: usize },
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EmoCauseError {
    #[error(transparent)]
    ContractError(#[from] ContractError),

    #[error("Illegal configuration: {0}")]
    IllegalConfigurationError(String),

    #[error(transparent)]
    IoError(#[from] io::Error),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    PatternError(#[from] PatternError),

    #[error("Cannot relativize path: {0}")]
    RelativizePathError(String),

    #[error(transparent)]
    TomlDeserializationError(#[from] toml::de::Error),

    #[error("cannot read tree of sentence {sentence}: {source}")]
    TreeError { sentence: usize, source: TreeError },
}
