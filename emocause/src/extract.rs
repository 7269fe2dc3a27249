//! Emotion holder and cause extraction.

use std::fmt;

use crate::clause::{Clause, ClauseRenderer};
use crate::config::ExtractionConfig;
use crate::constants::{is_verb, CLAUSAL_RELATIONS, PUNCTUATION_FORMS};
use crate::coref::{CorefSubstitutor, MentionIndex};
use crate::document::{Document, Sentence};
use crate::error::{ContractError, EmoCauseError};
use crate::normalize::SpanNormalizer;
use crate::pattern::{CauseType, Emotion, PatternSet, Trigger};
use crate::tree::{find_constituent, maximal_projection, NodeId, SearchDirection};

/// An emotion with its holder and cause.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Extraction {
    /// Document identifier and sentence index, `<document>/<sentence>`.
    pub id: String,
    pub emotion: Emotion,

    /// The trigger pattern that matched.
    pub pattern: String,
    pub holder: String,

    /// The cause if it is a noun phrase, empty otherwise.
    pub np_cause: String,

    /// The cause if it is a clause.
    pub s_cause: Option<Clause>,

    /// Lemmas and tags of the constituent that contains the cause.
    pub bag_of_words: Vec<String>,
}

impl Extraction {
    /// Format the bag of words as `[lemma/TAG, ...]`.
    pub fn bag_of_words_string(&self) -> String {
        if self.bag_of_words.is_empty() {
            return String::new();
        }

        format!("[{}]", self.bag_of_words.join(", "))
    }
}

impl fmt::Display for Extraction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t",
            self.id, self.emotion, self.pattern, self.holder, self.np_cause
        )?;

        match &self.s_cause {
            Some(clause) => write!(f, "{}", clause)?,
            None => f.write_str("\t\t\t")?,
        }

        write!(f, "\t{}", self.bag_of_words_string())
    }
}

/// Extracts emotion holders and causes from the sentences of a document.
///
/// The mention index must be built from the same document.
pub struct Extractor<'a> {
    document: &'a Document,
    mentions: &'a MentionIndex,
    config: &'a ExtractionConfig,
}

impl<'a> Extractor<'a> {
    pub fn new(
        document: &'a Document,
        mentions: &'a MentionIndex,
        config: &'a ExtractionConfig,
    ) -> Self {
        Extractor {
            document,
            mentions,
            config,
        }
    }

    /// Extract the holder and cause of a trigger.
    ///
    /// Without a passive form, the holder is the noun phrase left of
    /// the trigger and the cause the phrase right of it. Triggers with
    /// a passive form have the holder on the right and a noun phrase
    /// cause on the left.
    ///
    /// Returns `Ok(None)` when the holder or cause cannot be found. An
    /// error is only returned when the sentence or the trigger head do
    /// not exist.
    pub fn extract(
        &self,
        sentence_idx: usize,
        trigger: &Trigger,
    ) -> Result<Option<Extraction>, EmoCauseError> {
        let sentence = self.document.sentence(sentence_idx)?;
        let tree = sentence.tree();
        let head = trigger.head();
        let leaf = tree.leaf(head).ok_or(ContractError::TokenOutOfRange {
            index: head,
            len: sentence.len(),
        })?;

        let pattern = trigger.pattern;
        let heights = self.config.search.heights();

        let (holder_direction, holder_label, cause_direction, cause_type) =
            if pattern.is_reversed() {
                (
                    SearchDirection::Right,
                    pattern.cause_type().label(),
                    SearchDirection::Left,
                    CauseType::Np,
                )
            } else {
                (
                    SearchDirection::Left,
                    CauseType::Np.label(),
                    SearchDirection::Right,
                    pattern.cause_type(),
                )
            };

        let holder = match find_constituent(
            tree,
            leaf,
            holder_label,
            holder_direction,
            None,
            heights.clone(),
        ) {
            Some(holder) => holder,
            None => {
                log::debug!(
                    "No holder for '{}' in sentence {}/{}",
                    pattern.text(),
                    self.document.id(),
                    sentence_idx
                );
                return Ok(None);
            }
        };

        let cause = match find_constituent(
            tree,
            leaf,
            cause_type.label(),
            cause_direction,
            Some(holder),
            heights,
        ) {
            Some(cause) => cause,
            None => {
                log::debug!(
                    "No cause for '{}' in sentence {}/{}",
                    pattern.text(),
                    self.document.id(),
                    sentence_idx
                );
                return Ok(None);
            }
        };

        let normalizer = self.normalizer(sentence, sentence_idx);
        let holder = normalizer.normalize_node(holder);

        let (np_cause, s_cause) = match cause_type {
            CauseType::Np => (normalizer.normalize_node(cause), None),
            CauseType::S => {
                let renderer = ClauseRenderer::new(normalizer);
                let clause = clause_predicate(sentence, head, cause)
                    .and_then(|predicate| renderer.clause(predicate));
                (String::new(), clause)
            }
        };

        Ok(Some(Extraction {
            id: format!("{}/{}", self.document.id(), sentence_idx),
            emotion: pattern.emotion(),
            pattern: pattern.text().to_owned(),
            holder,
            np_cause,
            s_cause,
            bag_of_words: self.bag_of_words(sentence, cause, cause_type),
        }))
    }

    /// Extract from the first trigger in a sentence that has a holder
    /// and a cause.
    pub fn extract_sentence(
        &self,
        sentence_idx: usize,
        patterns: &PatternSet,
    ) -> Result<Option<Extraction>, EmoCauseError> {
        let sentence = self.document.sentence(sentence_idx)?;

        for trigger in patterns.triggers(sentence.tokens()) {
            log::trace!(
                "Pattern '{}' matches sentence {}/{} at {}",
                trigger.pattern.text(),
                self.document.id(),
                sentence_idx,
                trigger.head()
            );

            if let Some(extraction) = self.extract(sentence_idx, &trigger)? {
                return Ok(Some(extraction));
            }
        }

        Ok(None)
    }

    /// Extract from every sentence of the document.
    pub fn extract_document(&self, patterns: &PatternSet) -> Result<Vec<Extraction>, EmoCauseError> {
        let mut extractions = Vec::new();
        for sentence_idx in 0..self.document.sentences().len() {
            if let Some(extraction) = self.extract_sentence(sentence_idx, patterns)? {
                extractions.push(extraction);
            }
        }

        Ok(extractions)
    }

    fn normalizer(&self, sentence: &'a Sentence, sentence_idx: usize) -> SpanNormalizer<'a> {
        SpanNormalizer::new(sentence, self.config.normalization).with_coref(CorefSubstitutor::new(
            self.document,
            self.mentions,
            sentence_idx,
            self.config,
        ))
    }

    /// Lemmas and tags of the largest constituent of the cause type that
    /// starts the cause, without punctuation.
    fn bag_of_words(&self, sentence: &Sentence, cause: NodeId, cause_type: CauseType) -> Vec<String> {
        let tree = sentence.tree();
        let projection = tree
            .leaf(tree.span(cause).start())
            .and_then(|leaf| {
                maximal_projection(tree, leaf, cause_type.label(), self.config.search.heights())
            });

        let span = match projection {
            Some(projection) => tree.span(projection),
            None => return Vec::new(),
        };

        sentence.tokens()[span.start()..=span.end()]
            .iter()
            .filter(|token| !PUNCTUATION_FORMS.contains(token.word()))
            .map(|token| format!("{}/{}", token.lemma(), token.pos()))
            .collect()
    }
}

/// Find the predicate of a clausal cause.
///
/// This is the clausal complement of the trigger if it lies within the
/// cause, otherwise the first verb of the cause.
fn clause_predicate(sentence: &Sentence, trigger: usize, cause: NodeId) -> Option<usize> {
    let span = sentence.tree().span(cause);

    sentence
        .dependencies()
        .dependents_with(trigger, |rel| CLAUSAL_RELATIONS.contains(rel))
        .into_iter()
        .find(|&dependent| span.contains(dependent))
        .or_else(|| {
            (span.start()..=span.end()).find(|&idx| {
                sentence
                    .token(idx)
                    .map(|token| is_verb(token.pos()))
                    .unwrap_or(false)
            })
        })
}

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;

    use super::{Extraction, Extractor};
    use crate::clause::Clause;
    use crate::config::{ExtractionConfig, NormalizationConfig};
    use crate::dependency::DependencyEdge;
    use crate::document::tests::{tokens, trust_sentence};
    use crate::document::{Document, DocumentData, Sentence};
    use crate::error::{ContractError, EmoCauseError};
    use crate::pattern::{Emotion, PatternMatch, PatternSet, Trigger};
    use crate::tree::Tree;

    fn test_patterns() -> PatternSet {
        PatternSet::from_read(include_bytes!("../testdata/triggers.txt").as_ref()).unwrap()
    }

    fn fixture() -> Document {
        let data: DocumentData =
            serde_json::from_str(include_str!("../testdata/document.json")).unwrap();
        Document::try_from(data).unwrap()
    }

    fn storm_document() -> Document {
        let tree: Tree = "(ROOT (S (NP (DT The) (NN storm)) (VP (VBD frightened) (NP (DT the) (NNS children))) (. .)))"
            .parse()
            .unwrap();
        let sentence = Sentence::new(
            tokens(&[
                "The/the/DT",
                "storm/storm/NN",
                "frightened/frighten/VBD",
                "the/the/DT",
                "children/child/NNS",
                "././.",
            ]),
            tree,
            vec![
                DependencyEdge::new(1, "det", 0),
                DependencyEdge::new(2, "nsubj", 1),
                DependencyEdge::new(4, "det", 3),
                DependencyEdge::new(2, "dobj", 4),
            ],
        )
        .unwrap();

        Document::new("storm", vec![sentence], vec![])
    }

    #[test]
    fn clausal_cause_with_coreference() {
        let document = fixture();
        let mentions = document.mention_index();
        let config = ExtractionConfig::default();
        let extractor = Extractor::new(&document, &mentions, &config);

        let extractions = extractor.extract_document(&test_patterns()).unwrap();
        assert_eq!(extractions.len(), 1);

        let extraction = &extractions[0];
        assert_eq!(
            extraction,
            &Extraction {
                id: "nyt-1998-04/12/1".to_string(),
                emotion: Emotion::Fear,
                pattern: "fear/Verb that/IN".to_string(),
                holder: "Anna Berg".to_string(),
                np_cause: String::new(),
                s_cause: Some(Clause {
                    subject: "bank".to_string(),
                    predicate: "close".to_string(),
                    object: "account".to_string(),
                    prepositional_objects: vec![],
                }),
                bag_of_words: vec![
                    "that/IN".to_string(),
                    "the/DT".to_string(),
                    "bank/NN".to_string(),
                    "close/VBD".to_string(),
                    "she/PRP$".to_string(),
                    "account/NN".to_string()
                ],
            }
        );

        assert_eq!(
            extraction.to_string(),
            "nyt-1998-04/12/1\tfear\tfear/Verb that/IN\tAnna Berg\t\tbank\tclose\taccount\t\t[that/IN, the/DT, bank/NN, close/VBD, she/PRP$, account/NN]"
        );
    }

    #[test]
    fn reversed_trigger() {
        let document = storm_document();
        let mentions = document.mention_index();
        let config = ExtractionConfig::default();
        let extractor = Extractor::new(&document, &mentions, &config);

        let extraction = extractor
            .extract_sentence(0, &test_patterns())
            .unwrap()
            .unwrap();

        assert_eq!(extraction.pattern, "frighten/Verb");
        assert_eq!(extraction.holder, "the child");
        assert_eq!(extraction.np_cause, "the storm");
        assert_eq!(extraction.s_cause, None);
        assert_eq!(
            extraction.to_string(),
            "storm/0\tfear\tfrighten/Verb\tthe child\tthe storm\t\t\t\t\t[the/DT, storm/NN]"
        );
    }

    #[test]
    fn surface_forms() {
        let document = Document::new("trust", vec![trust_sentence()], vec![]);
        let mentions = document.mention_index();
        let config = ExtractionConfig {
            normalization: NormalizationConfig {
                lemmatize: false,
                substitute_coref: false,
                substitute_ner: false,
                include_prepositional_objects: false,
            },
            ..ExtractionConfig::default()
        };
        let extractor = Extractor::new(&document, &mentions, &config);
        let patterns = PatternSet::from_read("trust\ttrust/Verb that/IN\tS\tfalse".as_bytes())
            .unwrap();

        let extraction = extractor.extract_sentence(0, &patterns).unwrap().unwrap();
        assert_eq!(extraction.emotion, Emotion::Trust);
        assert_eq!(extraction.holder, "He");
        assert_eq!(
            extraction.s_cause.unwrap().to_string(),
            "Mary\tleave\t\t"
        );
    }

    #[test]
    fn missing_cause_is_not_an_error() {
        let tree: Tree = "(S (NP (PRP They)) (VP (VBP regret)) (. .))".parse().unwrap();
        let sentence = Sentence::new(
            tokens(&["They/they/PRP", "regret/regret/VBP", "././."]),
            tree,
            vec![DependencyEdge::new(1, "nsubj", 0)],
        )
        .unwrap();
        let document = Document::new("regret", vec![sentence], vec![]);
        let mentions = document.mention_index();
        let config = ExtractionConfig::default();
        let extractor = Extractor::new(&document, &mentions, &config);
        let patterns = test_patterns();

        assert!(patterns.find(document.sentences()[0].tokens()).is_some());
        assert_eq!(extractor.extract_sentence(0, &patterns).unwrap(), None);
    }

    #[test]
    fn contract_violations() {
        let document = storm_document();
        let mentions = document.mention_index();
        let config = ExtractionConfig::default();
        let extractor = Extractor::new(&document, &mentions, &config);
        let patterns = test_patterns();

        assert!(matches!(
            extractor.extract_sentence(3, &patterns),
            Err(EmoCauseError::ContractError(
                ContractError::SentenceOutOfRange { index: 3, len: 1 }
            ))
        ));

        let trigger = Trigger {
            pattern: &patterns.patterns(Emotion::Fear)[0],
            location: PatternMatch {
                start: 0,
                end: 1,
                head: 42,
            },
        };
        assert!(matches!(
            extractor.extract(0, &trigger),
            Err(EmoCauseError::ContractError(
                ContractError::TokenOutOfRange { index: 42, len: 6 }
            ))
        ));
    }
}
