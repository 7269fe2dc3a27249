//! Coreference chains and pronoun substitution.

use std::borrow::Cow;
use std::collections::HashMap;
use std::iter::FromIterator;
use std::vec;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::clause::ClauseRenderer;
use crate::config::{ExtractionConfig, NormalizationConfig};
use crate::constants::is_pronoun;
use crate::document::Document;
use crate::normalize::SpanNormalizer;
use crate::token::Token;

/// A mention of an entity.
///
/// `start` is inclusive and `end` is exclusive. `head` is the index of
/// the head token of the mention.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Mention {
    sentence: usize,
    start: usize,
    end: usize,
    head: usize,
    #[serde(default)]
    representative: bool,
}

impl Mention {
    pub fn new(sentence: usize, start: usize, end: usize, head: usize, representative: bool) -> Self {
        Mention {
            sentence,
            start,
            end,
            head,
            representative,
        }
    }

    pub fn sentence(&self) -> usize {
        self.sentence
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Get the end of the mention (exclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn head(&self) -> usize {
        self.head
    }

    /// Is this the representative mention of its chain?
    pub fn is_representative(&self) -> bool {
        self.representative
    }

    /// Get the number of tokens of the mention.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Mentions that refer to the same entity.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CorefChain(Vec<Mention>);

impl CorefChain {
    /// Get the representative mention.
    ///
    /// If more than one mention is marked as representative, the first
    /// one is used.
    pub fn representative(&self) -> Option<&Mention> {
        self.0.iter().find(|mention| mention.is_representative())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mention> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Mention>> for CorefChain {
    fn from(mentions: Vec<Mention>) -> Self {
        CorefChain(mentions)
    }
}

impl FromIterator<Mention> for CorefChain {
    fn from_iter<T: IntoIterator<Item = Mention>>(iter: T) -> Self {
        CorefChain(iter.into_iter().collect())
    }
}

impl IntoIterator for CorefChain {
    type Item = Mention;
    type IntoIter = vec::IntoIter<Mention>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A mention with the representative mention of its chain.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MentionPair {
    pub mention: Mention,
    pub representative: Option<Mention>,
}

/// Index from sentences to the mentions in that sentence.
#[derive(Clone, Debug, Default)]
pub struct MentionIndex {
    pairs: HashMap<usize, Vec<MentionPair>>,
}

impl MentionIndex {
    /// Build the index from a document's coreference chains.
    ///
    /// Pairs are stored in chain order.
    pub fn new(chains: &[CorefChain]) -> Self {
        let mut pairs: HashMap<usize, Vec<MentionPair>> = HashMap::new();

        for chain in chains {
            let representative = chain.representative().copied();
            if representative.is_none() {
                log::debug!("Coreference chain without representative: {:?}", chain);
            }

            for &mention in chain.iter() {
                pairs
                    .entry(mention.sentence())
                    .or_default()
                    .push(MentionPair {
                        mention,
                        representative,
                    });
            }
        }

        MentionIndex { pairs }
    }

    /// Get the mentions of a sentence with their representatives.
    pub fn mentions(&self, sentence: usize) -> &[MentionPair] {
        self.pairs
            .get(&sentence)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// The string form of a representative mention.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RepresentativeForm {
    /// The surface words of the mention.
    Surface,

    /// The head of the mention with its modifiers and prepositional
    /// objects, normalized without coreference substitution.
    Dependency,
}

/// Replaces pronouns in a sentence by representative mentions.
#[derive(Clone)]
pub struct CorefSubstitutor<'a> {
    document: &'a Document,
    mentions: &'a [MentionPair],
    normalization: NormalizationConfig,
    max_len: usize,
}

impl<'a> CorefSubstitutor<'a> {
    /// Construct a substitutor for the sentence at index `sentence`.
    pub fn new(
        document: &'a Document,
        index: &'a MentionIndex,
        sentence: usize,
        config: &ExtractionConfig,
    ) -> Self {
        CorefSubstitutor {
            document,
            mentions: index.mentions(sentence),
            normalization: config.normalization,
            max_len: config.coref.max_representative_len,
        }
    }

    /// Get the representative string for the mention starting at `token`.
    ///
    /// Returns `None` if no mention starts at `token` or none of the
    /// mentions starting there has a representative that is short
    /// enough.
    pub fn resolve(&self, token: usize, form: RepresentativeForm) -> Option<String> {
        for pair in self.mentions {
            if pair.mention.start() != token {
                continue;
            }

            let representative = match pair.representative {
                Some(representative) => representative,
                None => continue,
            };

            if representative.len() > self.max_len {
                log::trace!(
                    "Representative {:?} exceeds {} tokens",
                    representative,
                    self.max_len
                );
                continue;
            }

            if let Some(rendered) = self.render(&representative, form) {
                if !rendered.is_empty() {
                    return Some(rendered);
                }
            }
        }

        None
    }

    /// Replace `word` at index `token` if it is a pronoun.
    ///
    /// Words that are not pronouns are returned unchanged, so applying
    /// this to a substituted word returns it as-is.
    pub fn resolve_word<'w>(
        &self,
        token: usize,
        word: &'w str,
        form: RepresentativeForm,
    ) -> Cow<'w, str> {
        if !is_pronoun(word) {
            return Cow::Borrowed(word);
        }

        match self.resolve(token, form) {
            Some(representative) => Cow::Owned(representative),
            None => Cow::Borrowed(word),
        }
    }

    fn render(&self, mention: &Mention, form: RepresentativeForm) -> Option<String> {
        let sentence = self.document.sentence(mention.sentence()).ok()?;

        match form {
            RepresentativeForm::Surface => {
                let tokens = sentence.tokens().get(mention.start()..mention.end())?;
                Some(tokens.iter().map(Token::word).join(" "))
            }
            RepresentativeForm::Dependency => {
                let normalization = NormalizationConfig {
                    substitute_coref: false,
                    include_prepositional_objects: true,
                    ..self.normalization
                };
                let renderer = ClauseRenderer::new(SpanNormalizer::new(sentence, normalization));
                Some(renderer.phrase(mention.head()))
            }
        }
    }
}
