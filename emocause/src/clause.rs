//! Dependency-based rendering of phrases and clauses.

use std::fmt;

use itertools::Itertools;

use crate::constants::{DIRECT_OBJECT_RELATION, SUBJECT_RELATIONS};
use crate::dependency::{modifiers, prepositional_objects};
use crate::normalize::SpanNormalizer;

/// A prepositional object, e.g. `of:the_bank`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PrepositionalObject {
    pub preposition: String,

    /// The object and its modifiers, joined by `_`.
    pub object: String,
}

impl fmt::Display for PrepositionalObject {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.preposition, self.object)
    }
}

/// Subject, predicate and object of a clause.
///
/// The subject and object are empty when the predicate does not have
/// them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Clause {
    pub subject: String,
    pub predicate: String,
    pub object: String,
    pub prepositional_objects: Vec<PrepositionalObject>,
}

impl Clause {
    /// Format the prepositional objects as `[prep:obj, ...]`.
    ///
    /// Returns an empty string when the clause has no prepositional
    /// objects.
    pub fn prepositional_objects_string(&self) -> String {
        if self.prepositional_objects.is_empty() {
            return String::new();
        }

        format!("[{}]", self.prepositional_objects.iter().join(", "))
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.subject,
            self.predicate,
            self.object,
            self.prepositional_objects_string()
        )
    }
}

/// Renders phrases and clauses from the dependencies of a sentence.
pub struct ClauseRenderer<'a> {
    normalizer: SpanNormalizer<'a>,
}

impl<'a> ClauseRenderer<'a> {
    pub fn new(normalizer: SpanNormalizer<'a>) -> Self {
        ClauseRenderer { normalizer }
    }

    /// Render the phrase headed by `head`.
    ///
    /// The phrase consists of the head and its modifiers in surface
    /// order. Prepositional objects are appended as `prep:obj` when
    /// enabled in the normalization configuration.
    pub fn phrase(&self, head: usize) -> String {
        let dependencies = self.normalizer.sentence().dependencies();

        let mut phrase = self
            .normalizer
            .normalize_indices(&modifiers(dependencies, head), " ");

        if self.normalizer.config().include_prepositional_objects {
            for pobj in self.prepositional_objects(head) {
                phrase.push(' ');
                phrase.push_str(&pobj.to_string());
            }
        }

        phrase.trim().to_owned()
    }

    /// Render the prepositional objects of `head`, ordered by
    /// preposition.
    pub fn prepositional_objects(&self, head: usize) -> Vec<PrepositionalObject> {
        prepositional_objects(self.normalizer.sentence().dependencies(), head)
            .into_iter()
            .map(|(preposition, indices)| PrepositionalObject {
                preposition,
                object: self.normalizer.normalize_indices(&indices, "_"),
            })
            .collect()
    }

    /// Render the clause of which `predicate` is the predicate.
    ///
    /// The subject is the leftmost `nsubj`/`nsubjpass` dependent and the
    /// object the leftmost `dobj` dependent of the predicate. Returns
    /// `None` if `predicate` is not a token of the sentence.
    pub fn clause(&self, predicate: usize) -> Option<Clause> {
        let sentence = self.normalizer.sentence();
        let token = sentence.token(predicate)?;
        let dependencies = sentence.dependencies();

        let subject = dependencies
            .dependents_with(predicate, |rel| SUBJECT_RELATIONS.contains(rel))
            .first()
            .map(|&subject| self.phrase(subject))
            .unwrap_or_default();

        let object = dependencies
            .dependents_with(predicate, |rel| rel == DIRECT_OBJECT_RELATION)
            .first()
            .map(|&object| self.phrase(object))
            .unwrap_or_default();

        let prepositional_objects = if self.normalizer.config().include_prepositional_objects {
            self.prepositional_objects(predicate)
        } else {
            Vec::new()
        };

        Some(Clause {
            subject,
            predicate: token.lemma().to_owned(),
            object,
            prepositional_objects,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Clause, ClauseRenderer, PrepositionalObject};
    use crate::config::NormalizationConfig;
    use crate::dependency::DependencyEdge;
    use crate::document::tests::tokens;
    use crate::document::Sentence;
    use crate::normalize::SpanNormalizer;
    use crate::tree::Tree;

    const SURFACE: NormalizationConfig = NormalizationConfig {
        lemmatize: false,
        substitute_coref: false,
        substitute_ner: false,
        include_prepositional_objects: false,
    };

    fn regret_sentence() -> Sentence {
        let tree: Tree = "(S (NP (PRP He)) (VP (VBZ regrets) (NP (JJ rash) (NN decision))))"
            .parse()
            .unwrap();
        Sentence::new(
            tokens(&[
                "He/he/PRP",
                "regrets/regret/VBZ",
                "rash/rash/JJ",
                "decision/decision/NN",
            ]),
            tree,
            vec![
                DependencyEdge::new(1, "nsubj", 0),
                DependencyEdge::new(1, "dobj", 3),
                DependencyEdge::new(3, "amod", 2),
            ],
        )
        .unwrap()
    }

    // The bank closed the account of three clients in March
    fn bank_sentence() -> Sentence {
        let tree: Tree = "(S (NP (DT The) (NN bank)) (VP (VBD closed) (NP (NP (DT the) (NN account)) (PP (IN of) (NP (CD three) (NNS clients)))) (PP (IN in) (NP (NNP March)))))"
            .parse()
            .unwrap();
        Sentence::new(
            tokens(&[
                "The/the/DT",
                "bank/bank/NN/ORGANIZATION",
                "closed/close/VBD",
                "the/the/DT",
                "account/account/NN",
                "of/of/IN",
                "three/three/CD/NUMBER",
                "clients/client/NNS",
                "in/in/IN",
                "March/March/NNP/DATE",
            ]),
            tree,
            vec![
                DependencyEdge::new(1, "det", 0),
                DependencyEdge::new(2, "nsubj", 1),
                DependencyEdge::new(4, "det", 3),
                DependencyEdge::new(2, "dobj", 4),
                DependencyEdge::new(7, "num", 6),
                DependencyEdge::new(4, "prep_of", 7),
                DependencyEdge::new(2, "prep_in", 9),
            ],
        )
        .unwrap()
    }

    #[test]
    fn subject_predicate_object() {
        let sentence = regret_sentence();
        let renderer = ClauseRenderer::new(SpanNormalizer::new(&sentence, SURFACE));

        let clause = renderer.clause(1).unwrap();
        assert_eq!(
            clause,
            Clause {
                subject: "He".to_string(),
                predicate: "regret".to_string(),
                object: "rash decision".to_string(),
                prepositional_objects: vec![],
            }
        );
        assert_eq!(clause.to_string(), "He\tregret\trash decision\t");
    }

    #[test]
    fn missing_arguments_are_empty() {
        let sentence = regret_sentence();
        let renderer = ClauseRenderer::new(SpanNormalizer::new(&sentence, SURFACE));

        let clause = renderer.clause(3).unwrap();
        assert_eq!(clause.subject, "");
        assert_eq!(clause.predicate, "decision");
        assert_eq!(clause.object, "");

        assert_eq!(renderer.clause(4), None);
    }

    #[test]
    fn prepositional_objects() {
        let sentence = bank_sentence();
        let renderer = ClauseRenderer::new(SpanNormalizer::new(
            &sentence,
            NormalizationConfig::default(),
        ));

        let clause = renderer.clause(2).unwrap();
        assert_eq!(clause.subject, "bank/ORGANIZATION");
        assert_eq!(clause.predicate, "close");
        assert_eq!(clause.object, "account of:NUMBER_client");
        assert_eq!(
            clause.prepositional_objects,
            vec![PrepositionalObject {
                preposition: "in".to_string(),
                object: "March".to_string()
            }]
        );
        assert_eq!(
            clause.to_string(),
            "bank/ORGANIZATION\tclose\taccount of:NUMBER_client\t[in:March]"
        );
    }

    #[test]
    fn prepositional_objects_can_be_disabled() {
        let sentence = bank_sentence();
        let renderer = ClauseRenderer::new(SpanNormalizer::new(
            &sentence,
            NormalizationConfig {
                include_prepositional_objects: false,
                ..NormalizationConfig::default()
            },
        ));

        let clause = renderer.clause(2).unwrap();
        assert_eq!(clause.object, "account");
        assert!(clause.prepositional_objects.is_empty());
        assert_eq!(renderer.phrase(4), "account");
    }
}
