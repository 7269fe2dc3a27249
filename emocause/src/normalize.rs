//! Linearization of spans and index lists into normalized strings.

use crate::config::NormalizationConfig;
use crate::constants::{
    is_pronoun, ENTITY_CLASSES, NUMBER_ENTITY, NUMBER_PLACEHOLDER, POSSESSIVE_PRONOUNS,
};
use crate::coref::{CorefSubstitutor, RepresentativeForm};
use crate::document::Sentence;
use crate::token::Token;
use crate::tree::{excluded_spans, ExcludedSpans, NodeId, Span};

/// Builds normalized strings from the tokens of a sentence.
///
/// Each token is rendered as follows:
///
/// 1. Numbers are replaced by `NUMBER` when named entity substitution
///    is enabled.
/// 2. Otherwise, pronouns are replaced by their representative mention
///    when coreference substitution is enabled and the mention has a
///    usable representative.
/// 3. Otherwise, the lemma is used when lemmatization is enabled,
///    except for possessive pronouns.
///
/// Persons, locations and organizations get a `/CLASS` suffix when
/// named entity substitution is enabled.
#[derive(Clone)]
pub struct SpanNormalizer<'a> {
    sentence: &'a Sentence,
    config: NormalizationConfig,
    coref: Option<CorefSubstitutor<'a>>,
}

impl<'a> SpanNormalizer<'a> {
    pub fn new(sentence: &'a Sentence, config: NormalizationConfig) -> Self {
        SpanNormalizer {
            sentence,
            config,
            coref: None,
        }
    }

    /// Use `coref` to replace pronouns.
    pub fn with_coref(mut self, coref: CorefSubstitutor<'a>) -> Self {
        self.coref = Some(coref);
        self
    }

    pub fn config(&self) -> NormalizationConfig {
        self.config
    }

    pub fn sentence(&self) -> &'a Sentence {
        self.sentence
    }

    /// Linearize a constituent, leaving out its excluded spans.
    pub fn normalize_node(&self, node: NodeId) -> String {
        let tree = self.sentence.tree();
        self.normalize_span(tree.span(node), &excluded_spans(tree, node))
    }

    /// Linearize the tokens of `span` that are not in `excluded`.
    pub fn normalize_span(&self, span: Span, excluded: &ExcludedSpans) -> String {
        let mut normalized = String::new();

        for index in span.start()..=span.end() {
            if excluded.contains(index) {
                continue;
            }

            let token = match self.sentence.token(index) {
                Some(token) => token,
                None => break,
            };

            normalized.push(' ');
            normalized.push_str(&self.normalize_token(token, RepresentativeForm::Surface));
        }

        normalized.trim().to_owned()
    }

    /// Linearize the tokens at `indices`, joined by `separator`.
    ///
    /// Indices outside the sentence are ignored.
    pub fn normalize_indices(&self, indices: &[usize], separator: &str) -> String {
        let normalized = indices
            .iter()
            .filter_map(|&index| self.sentence.token(index))
            .map(|token| self.normalize_token(token, RepresentativeForm::Dependency))
            .collect::<Vec<_>>()
            .join(separator);

        normalized.trim().to_owned()
    }

    fn normalize_token(&self, token: &Token, form: RepresentativeForm) -> String {
        let entity = token.ner();

        let mut normalized = if self.config.substitute_ner && entity == NUMBER_ENTITY {
            NUMBER_PLACEHOLDER.to_owned()
        } else if let Some(representative) = self.representative(token, form) {
            representative
        } else if self.config.lemmatize && !POSSESSIVE_PRONOUNS.contains(token.word()) {
            token.lemma().to_owned()
        } else {
            token.word().to_owned()
        };

        if self.config.substitute_ner && ENTITY_CLASSES.contains(entity) {
            normalized.push('/');
            normalized.push_str(entity);
        }

        normalized
    }

    /// Get the representative mention that replaces `token`, if it is a
    /// pronoun with a usable representative.
    fn representative(&self, token: &Token, form: RepresentativeForm) -> Option<String> {
        if !self.config.substitute_coref || !is_pronoun(token.word()) {
            return None;
        }

        self.coref.as_ref()?.resolve(token.index(), form)
    }
}

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;

    use super::SpanNormalizer;
    use crate::config::{ExtractionConfig, NormalizationConfig};
    use crate::coref::CorefSubstitutor;
    use crate::document::tests::{tokens, trust_sentence};
    use crate::document::{Document, DocumentData, Sentence};
    use crate::tree::{ExcludedSpans, Span, Tree};

    const SURFACE: NormalizationConfig = NormalizationConfig {
        lemmatize: false,
        substitute_coref: false,
        substitute_ner: false,
        include_prepositional_objects: false,
    };

    fn fixture() -> Document {
        let data: DocumentData =
            serde_json::from_str(include_str!("../testdata/document.json")).unwrap();
        Document::try_from(data).unwrap()
    }

    #[test]
    fn holder_of_trust_sentence() {
        let sentence = trust_sentence();
        let normalizer = SpanNormalizer::new(&sentence, SURFACE);
        let holder = sentence.tree().children(sentence.tree().root())[0];

        assert_eq!(normalizer.normalize_node(holder), "He");
    }

    #[test]
    fn clause_without_complementizer() {
        let sentence = trust_sentence();
        let normalizer = SpanNormalizer::new(&sentence, SURFACE);
        let sbar = sentence
            .tree()
            .ancestor(sentence.tree().leaf(2).unwrap(), 2)
            .unwrap();

        assert_eq!(normalizer.normalize_node(sbar), "Mary left");
    }

    #[test]
    fn empty_index_list() {
        let sentence = trust_sentence();
        let normalizer = SpanNormalizer::new(&sentence, NormalizationConfig::default());

        assert_eq!(normalizer.normalize_indices(&[], " "), "");
        assert_eq!(normalizer.normalize_indices(&[17], " "), "");
    }

    #[test]
    fn single_token_matches_lookup() {
        let sentence = trust_sentence();
        let normalizer = SpanNormalizer::new(&sentence, SURFACE);

        for (idx, token) in sentence.tokens().iter().enumerate() {
            assert_eq!(
                normalizer.normalize_span(Span::new(idx, idx), &ExcludedSpans::default()),
                token.word()
            );
            assert_eq!(normalizer.normalize_indices(&[idx], " "), token.word());
        }
    }

    #[test]
    fn lemmas_and_entities() {
        let tree: Tree = "(S (NP (PRP$ her) (CD three) (NNS daughters)) (VP (VBD visited) (NP (NNP Paris))))"
            .parse()
            .unwrap();
        let sentence = Sentence::new(
            tokens(&[
                "her/she/PRP$",
                "three/three/CD/NUMBER",
                "daughters/daughter/NNS",
                "visited/visit/VBD",
                "Paris/Paris/NNP/LOCATION",
            ]),
            tree,
            vec![],
        )
        .unwrap();

        let normalizer = SpanNormalizer::new(&sentence, NormalizationConfig::default());
        assert_eq!(
            normalizer.normalize_node(sentence.tree().root()),
            "her NUMBER daughter visit Paris/LOCATION"
        );
        assert_eq!(
            normalizer.normalize_indices(&[0, 1, 2], "_"),
            "her_NUMBER_daughter"
        );

        let normalizer = SpanNormalizer::new(
            &sentence,
            NormalizationConfig {
                lemmatize: true,
                ..SURFACE
            },
        );
        assert_eq!(
            normalizer.normalize_node(sentence.tree().root()),
            "her three daughter visit Paris"
        );
    }

    #[test]
    fn excluded_tokens_leave_no_whitespace() {
        let sentence = trust_sentence();
        let normalizer = SpanNormalizer::new(&sentence, SURFACE);
        let excluded = ExcludedSpans::from(vec![Span::new(0, 0), Span::new(2, 3)]);

        assert_eq!(
            normalizer.normalize_span(Span::new(0, 4), &excluded),
            "trusts left"
        );
    }

    #[test]
    fn substitutes_pronouns() {
        let document = fixture();
        let index = document.mention_index();
        let config = ExtractionConfig::default();
        let sentence = document.sentence(1).unwrap();
        let normalizer = SpanNormalizer::new(sentence, config.normalization)
            .with_coref(CorefSubstitutor::new(&document, &index, 1, &config));

        assert_eq!(
            normalizer.normalize_span(Span::new(0, 1), &ExcludedSpans::default()),
            "Anna Berg fear"
        );
        assert_eq!(
            normalizer.normalize_indices(&[0], " "),
            "Anna/PERSON Berg/PERSON"
        );

        let without_coref = SpanNormalizer::new(
            sentence,
            NormalizationConfig {
                substitute_coref: false,
                ..config.normalization
            },
        );
        assert_eq!(without_coref.normalize_indices(&[0, 1], " "), "she fear");
    }

    #[test]
    fn unresolved_pronouns_are_lemmatized() {
        let tree: Tree = "(S (NP (PRP They)) (VP (VBD sued) (NP (NNP US)) (NP (NNP IT))))"
            .parse()
            .unwrap();
        let sentence = Sentence::new(
            tokens(&[
                "They/they/PRP",
                "sued/sue/VBD",
                "US/U.S./NNP/LOCATION",
                "IT/IT/NNP",
            ]),
            tree,
            vec![],
        )
        .unwrap();
        let document = Document::new("sued", vec![sentence], vec![]);
        let index = document.mention_index();
        let config = ExtractionConfig::default();
        let normalizer = SpanNormalizer::new(document.sentence(0).unwrap(), config.normalization)
            .with_coref(CorefSubstitutor::new(&document, &index, 0, &config));

        assert_eq!(
            normalizer.normalize_indices(&[0, 1, 2, 3], " "),
            "they sue U.S./LOCATION IT"
        );
    }
}
