//! Emotion trigger patterns.
//!
//! Trigger patterns are read from a tab-separated file with the columns
//! emotion, pattern, cause type (`NP` or `S`) and whether the trigger
//! has a passive form. A pattern is a space-separated sequence of
//! elements that are matched against the lemmas and part-of-speech
//! tags of a sentence:
//!
//! * `lemma/TAG` matches a token with the given lemma and tag. The
//!   lemma `*` matches any lemma, the tag `Verb` matches any finite
//!   verb or gerund (`VBD`, `VBG`, `VBP`, `VBZ`). Without a tag, any
//!   tag is matched.
//! * Words starting with `that` are optional.
//! * `RB` fails on a following negation and otherwise matches an
//!   optional adverb.
//! * `!lemma/TAG` fails when the next token matches, without consuming
//!   it.

use std::collections::BTreeMap;
use std::fmt;
use std::io::BufRead;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{is_verb, NEGATIONS};
use crate::error::EmoCauseError;
use crate::token::Token;

static ADVERB_ELEMENT: &str = "RB";
static ADVERB_TAG: &str = "RB";
static COPULA_LEMMA: &str = "be";
static NEGATIVE_PREFIX: char = '!';
static OPTIONAL_PREFIX: &str = "that";
static PARTICIPLE_TAG: &str = "VBN";
static VERB_TAG: &str = "Verb";

/// Pattern file errors.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum PatternError {
    #[error("line {line}: pattern without words")]
    EmptyPattern { line: usize },

    #[error("line {line}: invalid pattern element '{element}'")]
    InvalidElement { line: usize, element: String },

    #[error("line {line}: invalid passive flag '{value}', expected 'true' or 'false'")]
    InvalidPassive { line: usize, value: String },

    #[error("line {line}: pattern only consists of optional elements")]
    MissingHead { line: usize },

    #[error("line {line}: expected 4 tab-separated fields, found {fields}")]
    MissingFields { line: usize, fields: usize },

    #[error("line {line}: unknown cause type '{cause_type}', expected 'NP' or 'S'")]
    UnknownCauseType { line: usize, cause_type: String },

    #[error("line {line}: unknown emotion '{emotion}'")]
    UnknownEmotion { line: usize, emotion: String },
}

/// Plutchik's eight basic emotions.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Joy,
    Trust,
    Fear,
    Surprise,
    Sadness,
    Disgust,
    Anger,
    Anticipation,
}

impl Emotion {
    pub fn as_str(&self) -> &'static str {
        use Emotion::*;
        match self {
            Joy => "joy",
            Trust => "trust",
            Fear => "fear",
            Surprise => "surprise",
            Sadness => "sadness",
            Disgust => "disgust",
            Anger => "anger",
            Anticipation => "anticipation",
        }
    }

    fn parse(line: usize, emotion: &str) -> Result<Self, PatternError> {
        use Emotion::*;
        Ok(match emotion {
            "joy" => Joy,
            "trust" => Trust,
            "fear" => Fear,
            "surprise" => Surprise,
            "sadness" => Sadness,
            "disgust" => Disgust,
            "anger" => Anger,
            "anticipation" => Anticipation,
            _ => {
                return Err(PatternError::UnknownEmotion {
                    line,
                    emotion: emotion.to_owned(),
                })
            }
        })
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phrase type of an emotion cause.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum CauseType {
    /// Noun phrase.
    Np,

    /// Clause.
    S,
}

impl CauseType {
    /// Get the constituent label of the cause type.
    pub fn label(&self) -> &'static str {
        match self {
            CauseType::Np => "NP",
            CauseType::S => "S",
        }
    }

    fn parse(line: usize, cause_type: &str) -> Result<Self, PatternError> {
        match cause_type {
            "NP" => Ok(CauseType::Np),
            "S" => Ok(CauseType::S),
            _ => Err(PatternError::UnknownCauseType {
                line,
                cause_type: cause_type.to_owned(),
            }),
        }
    }
}

impl fmt::Display for CauseType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum TagMatcher {
    Any,
    Exact(String),
    Verb,
}

impl TagMatcher {
    fn matches(&self, tag: &str) -> bool {
        match self {
            TagMatcher::Any => true,
            TagMatcher::Exact(exact) => exact == tag,
            TagMatcher::Verb => is_verb(tag) && tag.len() == 3 && tag != PARTICIPLE_TAG,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct WordMatcher {
    lemma: Option<String>,
    tag: TagMatcher,
}

impl WordMatcher {
    fn parse(line: usize, word: &str) -> Result<Self, PatternError> {
        let (lemma, tag) = match word.split_once('/') {
            Some((lemma, tag)) => (lemma, Some(tag)),
            None => (word, None),
        };

        if lemma.is_empty() || tag.map(str::is_empty).unwrap_or(false) {
            return Err(PatternError::InvalidElement {
                line,
                element: word.to_owned(),
            });
        }

        let lemma = if lemma == "*" {
            None
        } else {
            Some(lemma.to_owned())
        };

        let tag = match tag {
            None => TagMatcher::Any,
            Some(tag) if tag == VERB_TAG => TagMatcher::Verb,
            Some(tag) => TagMatcher::Exact(tag.to_owned()),
        };

        Ok(WordMatcher { lemma, tag })
    }

    fn matches(&self, token: &Token) -> bool {
        self.lemma
            .as_ref()
            .map(|lemma| lemma == token.lemma())
            .unwrap_or(true)
            && self.tag.matches(token.pos())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Element {
    Word { word: WordMatcher, optional: bool },
    Adverb,
    NotFollowedBy(WordMatcher),
}

impl Element {
    fn parse(line: usize, element: &str) -> Result<Self, PatternError> {
        if element == ADVERB_ELEMENT {
            Ok(Element::Adverb)
        } else if let Some(word) = element.strip_prefix(NEGATIVE_PREFIX) {
            Ok(Element::NotFollowedBy(WordMatcher::parse(line, word)?))
        } else {
            Ok(Element::Word {
                word: WordMatcher::parse(line, element)?,
                optional: element.starts_with(OPTIONAL_PREFIX),
            })
        }
    }
}

/// Location of a pattern match in a sentence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PatternMatch {
    /// Index of the first matched token.
    pub start: usize,

    /// Index after the last matched token.
    pub end: usize,

    /// Index of the trigger head, the emotion word.
    pub head: usize,
}

/// An emotion trigger pattern.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TriggerPattern {
    emotion: Emotion,
    text: String,
    cause_type: CauseType,
    reversed: bool,
    elements: Vec<Element>,
    head: usize,
}

impl TriggerPattern {
    fn new(
        line: usize,
        emotion: Emotion,
        text: String,
        cause_type: CauseType,
        reversed: bool,
        elements: Vec<Element>,
    ) -> Result<Self, PatternError> {
        let head = Self::find_head(&elements).ok_or(PatternError::MissingHead { line })?;

        Ok(TriggerPattern {
            emotion,
            text,
            cause_type,
            reversed,
            elements,
            head,
        })
    }

    /// The head is the first required word that is not a copula. If
    /// all required words are copulas, the first one is used.
    fn find_head(elements: &[Element]) -> Option<usize> {
        let required = elements
            .iter()
            .enumerate()
            .filter_map(|(idx, element)| match element {
                Element::Word {
                    word,
                    optional: false,
                } => Some((idx, word)),
                _ => None,
            })
            .collect::<Vec<_>>();

        required
            .iter()
            .find(|(_, word)| word.lemma.as_deref() != Some(COPULA_LEMMA))
            .or_else(|| required.first())
            .map(|&(idx, _)| idx)
    }

    pub fn cause_type(&self) -> CauseType {
        self.cause_type
    }

    pub fn emotion(&self) -> Emotion {
        self.emotion
    }

    /// Does the pattern reverse the order of holder and cause?
    ///
    /// Triggers with a passive form, such as *frighten*, have the
    /// cause as their subject and the holder as their object.
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Find the leftmost match of the pattern in `tokens`.
    pub fn find(&self, tokens: &[Token]) -> Option<PatternMatch> {
        let mut bound = vec![None; self.elements.len()];

        for start in 0..tokens.len() {
            bound.iter_mut().for_each(|b| *b = None);

            if let Some(end) = self.match_elements(tokens, 0, start, &mut bound) {
                let head = bound[self.head]?;
                let start = bound.iter().flatten().copied().min().unwrap_or(head);
                return Some(PatternMatch { start, end, head });
            }
        }

        None
    }

    fn match_elements(
        &self,
        tokens: &[Token],
        element: usize,
        pos: usize,
        bound: &mut [Option<usize>],
    ) -> Option<usize> {
        let current = match self.elements.get(element) {
            Some(current) => current,
            None => return Some(pos),
        };

        match current {
            Element::Word { word, optional } => {
                if let Some(token) = tokens.get(pos) {
                    if word.matches(token) {
                        bound[element] = Some(pos);
                        if let Some(end) = self.match_elements(tokens, element + 1, pos + 1, bound)
                        {
                            return Some(end);
                        }
                        bound[element] = None;
                    }
                }

                if *optional {
                    self.match_elements(tokens, element + 1, pos, bound)
                } else {
                    None
                }
            }
            Element::Adverb => {
                let token = tokens.get(pos);
                if token
                    .map(|token| NEGATIONS.contains(token.lemma()))
                    .unwrap_or(false)
                {
                    return None;
                }

                if let Some(token) = token {
                    if token.pos() == ADVERB_TAG && is_plain_word(token.lemma()) {
                        bound[element] = Some(pos);
                        if let Some(end) = self.match_elements(tokens, element + 1, pos + 1, bound)
                        {
                            return Some(end);
                        }
                        bound[element] = None;
                    }
                }

                self.match_elements(tokens, element + 1, pos, bound)
            }
            Element::NotFollowedBy(word) => {
                if tokens
                    .get(pos)
                    .map(|token| word.matches(token))
                    .unwrap_or(false)
                {
                    None
                } else {
                    self.match_elements(tokens, element + 1, pos, bound)
                }
            }
        }
    }
}

impl fmt::Display for TriggerPattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.emotion, self.text, self.cause_type)
    }
}

fn is_plain_word(lemma: &str) -> bool {
    !lemma.is_empty() && lemma.chars().all(|c| c.is_ascii_lowercase())
}

/// A pattern match in a sentence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Trigger<'a> {
    pub pattern: &'a TriggerPattern,
    pub location: PatternMatch,
}

impl<'a> Trigger<'a> {
    /// Get the index of the trigger head.
    pub fn head(&self) -> usize {
        self.location.head
    }
}

/// Trigger patterns, grouped by emotion.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PatternSet {
    patterns: BTreeMap<Emotion, Vec<TriggerPattern>>,
}

impl PatternSet {
    /// Read trigger patterns.
    ///
    /// Empty lines and lines starting with `#` are skipped. For each
    /// trigger with a passive form, two additional patterns are added:
    /// a passive with a clausal cause introduced by *that* and a
    /// passive with a noun phrase cause introduced by *by*.
    pub fn from_read<R>(read: R) -> Result<Self, EmoCauseError>
    where
        R: BufRead,
    {
        let mut patterns = PatternSet::default();

        for (idx, line) in read.lines().enumerate() {
            let line = line?;
            let line_number = idx + 1;

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            for pattern in Self::parse_line(line_number, &line)? {
                patterns.insert(pattern);
            }
        }

        log::debug!("Read {} trigger patterns", patterns.len());

        Ok(patterns)
    }

    fn parse_line(line: usize, data: &str) -> Result<Vec<TriggerPattern>, PatternError> {
        let fields = data.split('\t').collect::<Vec<_>>();
        if fields.len() < 4 {
            return Err(PatternError::MissingFields {
                line,
                fields: fields.len(),
            });
        }

        let emotion = Emotion::parse(line, fields[0])?;
        let text = fields[1].trim();
        let cause_type = CauseType::parse(line, fields[2].trim())?;
        let passive = match fields[3].trim().to_lowercase().as_str() {
            "true" => true,
            "false" => false,
            value => {
                return Err(PatternError::InvalidPassive {
                    line,
                    value: value.to_owned(),
                })
            }
        };

        let words = text.split_whitespace().collect::<Vec<_>>();
        if words.is_empty() {
            return Err(PatternError::EmptyPattern { line });
        }

        let elements = words
            .iter()
            .map(|word| Element::parse(line, word))
            .collect::<Result<Vec<_>, _>>()?;

        let mut patterns = vec![TriggerPattern::new(
            line,
            emotion,
            text.to_owned(),
            cause_type,
            passive,
            elements,
        )?];

        if passive {
            let participle = match words[0].split_once('/') {
                Some((lemma, _)) => lemma,
                None => words[0],
            };

            patterns.push(Self::passive(line, emotion, participle, "that", CauseType::S)?);
            patterns.push(Self::passive(line, emotion, participle, "by", CauseType::Np)?);
        }

        Ok(patterns)
    }

    /// Construct a passive pattern such as `be/Verb RB frighten/VBN by/IN`.
    fn passive(
        line: usize,
        emotion: Emotion,
        lemma: &str,
        preposition: &str,
        cause_type: CauseType,
    ) -> Result<TriggerPattern, PatternError> {
        let required = |lemma: &str, tag: TagMatcher| Element::Word {
            word: WordMatcher {
                lemma: Some(lemma.to_owned()),
                tag,
            },
            optional: false,
        };

        let elements = vec![
            required(COPULA_LEMMA, TagMatcher::Verb),
            Element::Adverb,
            required(lemma, TagMatcher::Exact(PARTICIPLE_TAG.to_owned())),
            required(preposition, TagMatcher::Exact("IN".to_owned())),
        ];

        let text = format!(
            "{}/{} {} {}/{} {}/IN",
            COPULA_LEMMA, VERB_TAG, ADVERB_ELEMENT, lemma, PARTICIPLE_TAG, preposition
        );

        TriggerPattern::new(line, emotion, text, cause_type, false, elements)
    }

    fn insert(&mut self, pattern: TriggerPattern) {
        self.patterns
            .entry(pattern.emotion())
            .or_default()
            .push(pattern);
    }

    /// Find the first matching pattern in `tokens`.
    ///
    /// Patterns are tried in emotion order and within an emotion in
    /// file order.
    pub fn find<'a>(&'a self, tokens: &[Token]) -> Option<Trigger<'a>> {
        self.triggers(tokens).next()
    }

    /// Get the leftmost match of every pattern that matches `tokens`,
    /// in pattern order.
    pub fn triggers<'a, 't>(&'a self, tokens: &'t [Token]) -> impl Iterator<Item = Trigger<'a>> + 't
    where
        'a: 't,
    {
        self.iter().filter_map(move |pattern| {
            pattern
                .find(tokens)
                .map(|location| Trigger { pattern, location })
        })
    }

    /// Iterate over all patterns in emotion order.
    pub fn iter(&self) -> impl Iterator<Item = &TriggerPattern> {
        self.patterns.values().flatten()
    }

    /// Get the patterns of an emotion.
    pub fn patterns(&self, emotion: Emotion) -> &[TriggerPattern] {
        self.patterns
            .get(&emotion)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.patterns.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::io::BufReader;

    use super::{CauseType, Emotion, PatternError, PatternMatch, PatternSet};
    use crate::document::tests::tokens;
    use crate::error::EmoCauseError;

    fn test_patterns() -> PatternSet {
        PatternSet::from_read(BufReader::new(
            include_bytes!("../testdata/triggers.txt").as_ref(),
        ))
        .unwrap()
    }

    fn parse_error(data: &str) -> PatternError {
        match PatternSet::from_read(data.as_bytes()) {
            Err(EmoCauseError::PatternError(err)) => err,
            other => panic!("Expected pattern error, got: {:?}", other),
        }
    }

    #[test]
    fn reads_patterns_with_passives() {
        let patterns = test_patterns();

        assert_eq!(patterns.len(), 7);
        assert_eq!(patterns.patterns(Emotion::Joy).len(), 1);
        assert!(patterns.patterns(Emotion::Trust).is_empty());

        let fear = patterns
            .patterns(Emotion::Fear)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        assert_eq!(
            fear,
            vec![
                "fear\tfear/Verb that/IN\tS",
                "fear\tfrighten/Verb\tNP",
                "fear\tbe/Verb RB frighten/VBN that/IN\tS",
                "fear\tbe/Verb RB frighten/VBN by/IN\tNP",
            ]
        );

        let frighten = &patterns.patterns(Emotion::Fear)[1];
        assert!(frighten.is_reversed());
        assert!(!patterns.patterns(Emotion::Fear)[3].is_reversed());
        assert_eq!(
            patterns.patterns(Emotion::Fear)[3].cause_type(),
            CauseType::Np
        );
    }

    #[test]
    fn emotion_order() {
        let emotions = test_patterns()
            .iter()
            .map(|pattern| pattern.emotion())
            .collect::<Vec<_>>();
        let mut sorted = emotions.clone();
        sorted.sort();
        assert_eq!(emotions, sorted);
        assert_eq!(emotions[0], Emotion::Joy);
    }

    #[test]
    fn optional_words_and_adverbs() {
        let patterns = test_patterns();
        let joy = &patterns.patterns(Emotion::Joy)[0];

        let sentence = tokens(&[
            "She/she/PRP",
            "is/be/VBZ",
            "very/very/RB",
            "happy/happy/JJ",
            "that/that/IN",
            "he/he/PRP",
            "came/come/VBD",
        ]);
        assert_eq!(
            joy.find(&sentence),
            Some(PatternMatch {
                start: 1,
                end: 5,
                head: 3
            })
        );

        let without_that = tokens(&["She/she/PRP", "was/be/VBD", "happy/happy/JJ"]);
        assert_eq!(
            joy.find(&without_that),
            Some(PatternMatch {
                start: 1,
                end: 3,
                head: 2
            })
        );
    }

    #[test]
    fn negations_block_matches() {
        let patterns = test_patterns();
        let joy = &patterns.patterns(Emotion::Joy)[0];

        let negated = tokens(&["She/she/PRP", "is/be/VBZ", "not/not/RB", "happy/happy/JJ"]);
        assert_eq!(joy.find(&negated), None);

        let anger = &patterns.patterns(Emotion::Anger)[0];
        let with_person = tokens(&[
            "He/he/PRP",
            "was/be/VBD",
            "angry/angry/JJ",
            "with/with/IN",
            "her/she/PRP",
        ]);
        assert_eq!(anger.find(&with_person), None);

        let with_clause = tokens(&[
            "He/he/PRP",
            "was/be/VBD",
            "angry/angry/JJ",
            "that/that/IN",
            "she/she/PRP",
            "left/leave/VBD",
        ]);
        assert_eq!(anger.find(&with_clause).map(|m| m.head), Some(2));
    }

    #[test]
    fn verb_tags() {
        let patterns = test_patterns();
        let fear = &patterns.patterns(Emotion::Fear)[0];

        for tag in &["VBD", "VBG", "VBP", "VBZ"] {
            let verb = format!("fear/fear/{}", tag);
            let sentence = tokens(&["They/they/PRP", verb.as_str()]);
            assert!(fear.find(&sentence).is_some(), "{} should match", tag);
        }

        for tag in &["VBN", "VB", "NN"] {
            let verb = format!("fear/fear/{}", tag);
            let sentence = tokens(&["They/they/PRP", verb.as_str()]);
            assert!(fear.find(&sentence).is_none(), "{} should not match", tag);
        }
    }

    #[test]
    fn passive_head_is_participle() {
        let patterns = test_patterns();
        let sentence = tokens(&[
            "John/John/NNP",
            "was/be/VBD",
            "frightened/frighten/VBN",
            "by/by/IN",
            "the/the/DT",
            "dog/dog/NN",
        ]);

        let trigger = patterns.find(&sentence).unwrap();
        assert_eq!(trigger.pattern.text(), "be/Verb RB frighten/VBN by/IN");
        assert_eq!(trigger.head(), 2);
        assert_eq!(trigger.pattern.cause_type(), CauseType::Np);
    }

    #[test]
    fn first_pattern_wins() {
        let patterns = test_patterns();
        let sentence = tokens(&[
            "They/they/PRP",
            "regret/regret/VBP",
            "and/and/CC",
            "fear/fear/VBP",
            "it/it/PRP",
        ]);

        // Fear precedes sadness.
        let trigger = patterns.find(&sentence).unwrap();
        assert_eq!(trigger.pattern.emotion(), Emotion::Fear);
        assert_eq!(trigger.head(), 3);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(
            parse_error("joy\thappy/JJ\tNP"),
            PatternError::MissingFields { line: 1, fields: 3 }
        );
        assert_eq!(
            parse_error("# comment\n\nglee\thappy/JJ\tNP\tfalse"),
            PatternError::UnknownEmotion {
                line: 3,
                emotion: "glee".to_string()
            }
        );
        assert_eq!(
            parse_error("joy\thappy/JJ\tVP\tfalse"),
            PatternError::UnknownCauseType {
                line: 1,
                cause_type: "VP".to_string()
            }
        );
        assert_eq!(
            parse_error("joy\thappy/JJ\tNP\tmaybe"),
            PatternError::InvalidPassive {
                line: 1,
                value: "maybe".to_string()
            }
        );
        assert_eq!(
            parse_error("joy\t \tNP\tfalse"),
            PatternError::EmptyPattern { line: 1 }
        );
        assert_eq!(
            parse_error("joy\thappy/\tNP\tfalse"),
            PatternError::InvalidElement {
                line: 1,
                element: "happy/".to_string()
            }
        );
        assert_eq!(
            parse_error("joy\tthat/IN RB\tS\tfalse"),
            PatternError::MissingHead { line: 1 }
        );
    }
}
