//! Annotated sentences and documents.

use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

use crate::coref::{CorefChain, Mention, MentionIndex};
use crate::dependency::{DependencyEdge, DependencyIndex};
use crate::error::{ContractError, EmoCauseError};
use crate::token::{Token, TokenBuilder};
use crate::tree::Tree;

/// A sentence with its token store, constituency tree and dependencies.
#[derive(Clone, Debug)]
pub struct Sentence {
    tokens: Vec<Token>,
    tree: Tree,
    dependencies: DependencyIndex,
}

impl Sentence {
    /// Construct a sentence.
    ///
    /// Token indices are set to the position of the token in the
    /// sentence. Construction fails when the sentence is empty, when
    /// the number of tree leaves differs from the number of tokens or
    /// when a dependency edge refers to a token outside the sentence.
    pub fn new<I>(mut tokens: Vec<Token>, tree: Tree, edges: I) -> Result<Self, ContractError>
    where
        I: IntoIterator<Item = DependencyEdge>,
    {
        if tokens.is_empty() {
            return Err(ContractError::EmptySentence);
        }

        if tree.leaves().len() != tokens.len() {
            return Err(ContractError::LeafCountMismatch {
                leaves: tree.leaves().len(),
                tokens: tokens.len(),
            });
        }

        for (idx, token) in tokens.iter_mut().enumerate() {
            token.set_index(idx);
        }

        let dependencies = DependencyIndex::new(tokens.len(), edges)?;

        Ok(Sentence {
            tokens,
            tree,
            dependencies,
        })
    }

    pub fn dependencies(&self) -> &DependencyIndex {
        &self.dependencies
    }

    /// Get the token at `index`.
    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Get the number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// A document: sentences plus the coreference chains that link them.
#[derive(Clone, Debug)]
pub struct Document {
    id: String,
    sentences: Vec<Sentence>,
    chains: Vec<CorefChain>,
}

impl Document {
    /// Construct a document.
    ///
    /// Mentions that refer to a sentence or tokens that do not exist
    /// are removed from their chains with a warning. Malformed
    /// coreference data never makes a document unusable.
    pub fn new(id: impl Into<String>, sentences: Vec<Sentence>, chains: Vec<CorefChain>) -> Self {
        let id = id.into();

        let chains = chains
            .into_iter()
            .map(|chain| {
                chain
                    .into_iter()
                    .filter(|mention| {
                        let valid = mention_in_range(&sentences, mention);
                        if !valid {
                            log::warn!("Dropping out-of-range mention {:?} in document {}", mention, id);
                        }
                        valid
                    })
                    .collect::<CorefChain>()
            })
            .filter(|chain| !chain.is_empty())
            .collect();

        Document {
            id,
            sentences,
            chains,
        }
    }

    pub fn chains(&self) -> &[CorefChain] {
        &self.chains
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Build the index from sentences to their mentions.
    pub fn mention_index(&self) -> MentionIndex {
        MentionIndex::new(&self.chains)
    }

    /// Get the sentence at `index`.
    pub fn sentence(&self, index: usize) -> Result<&Sentence, ContractError> {
        self.sentences
            .get(index)
            .ok_or(ContractError::SentenceOutOfRange {
                index,
                len: self.sentences.len(),
            })
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Read a document from its JSON serialization.
    pub fn from_json(json: &str) -> Result<Self, EmoCauseError> {
        let data: DocumentData = serde_json::from_str(json)?;
        Document::try_from(data)
    }
}

fn mention_in_range(sentences: &[Sentence], mention: &Mention) -> bool {
    match sentences.get(mention.sentence()) {
        Some(sentence) => {
            mention.start() < mention.end()
                && mention.end() <= sentence.len()
                && mention.start() <= mention.head()
                && mention.head() < mention.end()
        }
        None => false,
    }
}

/// Serialized form of a token.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TokenData {
    pub word: String,
    #[serde(default)]
    pub lemma: Option<String>,
    #[serde(default)]
    pub pos: Option<String>,
    #[serde(default)]
    pub ner: Option<String>,
}

impl From<TokenData> for Token {
    fn from(data: TokenData) -> Self {
        let mut builder = TokenBuilder::new(data.word);
        if let Some(lemma) = data.lemma {
            builder = builder.lemma(lemma);
        }
        if let Some(pos) = data.pos {
            builder = builder.pos(pos);
        }
        if let Some(ner) = data.ner {
            builder = builder.ner(ner);
        }
        builder.into()
    }
}

/// Serialized form of a sentence.
///
/// The constituency tree is stored in bracket notation.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SentenceData {
    pub tokens: Vec<TokenData>,
    pub tree: String,
    #[serde(default)]
    pub dependencies: Vec<DependencyEdge>,
}

/// Serialized form of a document, one JSON object per line.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentData {
    pub id: String,
    pub sentences: Vec<SentenceData>,
    #[serde(default)]
    pub coref: Vec<CorefChain>,
}

impl TryFrom<DocumentData> for Document {
    type Error = EmoCauseError;

    fn try_from(data: DocumentData) -> Result<Self, Self::Error> {
        let mut sentences = Vec::with_capacity(data.sentences.len());
        for (idx, sentence) in data.sentences.into_iter().enumerate() {
            let tree: Tree = sentence
                .tree
                .parse()
                .map_err(|source| EmoCauseError::TreeError {
                    sentence: idx,
                    source,
                })?;
            let tokens = sentence.tokens.into_iter().map(Token::from).collect();
            sentences.push(Sentence::new(tokens, tree, sentence.dependencies)?);
        }

        Ok(Document::new(data.id, sentences, data.coref))
    }
}
