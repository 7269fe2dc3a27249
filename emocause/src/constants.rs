use std::collections::HashSet;

use lazy_static::lazy_static;
use maplit::hashset;

pub(crate) static BAR_SUFFIX: &str = "BAR";
pub(crate) static COMMA_LABEL: &str = ",";
pub(crate) static PP_LABEL: &str = "PP";

pub(crate) static NUMBER_ENTITY: &str = "NUMBER";
pub(crate) static NUMBER_PLACEHOLDER: &str = "NUMBER";

pub(crate) static PREP_RELATION_PREFIX: &str = "prep_";
pub(crate) static DIRECT_OBJECT_RELATION: &str = "dobj";

lazy_static! {
    /// Personal pronouns that are replaced by their representative mention.
    pub(crate) static ref PRONOUNS: HashSet<&'static str> = hashset! {
        "I", "you", "he", "she", "it", "him", "her", "we", "they", "me", "us", "them",
    };

    /// Possessive pronouns keep their surface form when lemmatizing.
    pub(crate) static ref POSSESSIVE_PRONOUNS: HashSet<&'static str> = hashset! {
        "my", "your", "his", "her", "its", "our", "their",
    };

    /// Entity classes that are marked with a `/CLASS` suffix.
    pub(crate) static ref ENTITY_CLASSES: HashSet<&'static str> = hashset! {
        "PERSON", "LOCATION", "ORGANIZATION",
    };

    /// Constituents that are dropped wholesale from a linearized span.
    pub(crate) static ref EXCLUDED_LABELS: HashSet<&'static str> = hashset! {
        "SBAR", ":", ",", "''", "_", "``",
    };

    /// Pre-terminals of a complementizer or preposition that opens a
    /// clause or prepositional phrase.
    pub(crate) static ref MARKER_LABELS: HashSet<&'static str> = hashset! {
        "IN", "TO",
    };

    /// Punctuation that is left out of bag-of-words representations.
    pub(crate) static ref PUNCTUATION_FORMS: HashSet<&'static str> = hashset! {
        ":", ",", "''", "_", "``",
    };

    /// Compound noun, adjectival and numeric modifiers, in the collapsed
    /// Stanford and Universal Dependencies flavors.
    pub(crate) static ref MODIFIER_RELATIONS: HashSet<&'static str> = hashset! {
        "nn", "compound", "amod", "num", "nummod",
    };

    pub(crate) static ref SUBJECT_RELATIONS: HashSet<&'static str> = hashset! {
        "nsubj", "nsubjpass",
    };

    /// Relations that attach the predicate of a clausal complement.
    pub(crate) static ref CLAUSAL_RELATIONS: HashSet<&'static str> = hashset! {
        "ccomp", "xcomp", "dep",
    };

    pub(crate) static ref NEGATIONS: HashSet<&'static str> = hashset! {
        "not", "never",
    };
}

pub(crate) fn is_verb<S>(tag: S) -> bool
where
    S: AsRef<str>,
{
    tag.as_ref().starts_with("VB")
}

/// Check whether a word is a personal pronoun.
///
/// A capitalized pronoun, as at the start of a sentence, is also
/// accepted. All-caps words such as *US* or *IT* are not pronouns.
pub(crate) fn is_pronoun(word: &str) -> bool {
    if PRONOUNS.contains(word) {
        return true;
    }

    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() && chars.all(char::is_lowercase) => {
            PRONOUNS.contains(word.to_lowercase().as_str())
        }
        _ => false,
    }
}
