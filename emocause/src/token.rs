//! Token store.

use serde::{Deserialize, Serialize};

/// Named entity tag of a token that is not part of an entity.
pub static NO_ENTITY: &str = "O";

/// An annotated token.
///
/// Tokens are immutable once a sentence is constructed. The index is
/// the 0-based position of the token in its sentence.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Token {
    index: usize,
    word: String,
    lemma: String,
    pos: String,
    ner: String,
}

impl Token {
    /// Get the position of the token in its sentence.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Get the surface form.
    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn lemma(&self) -> &str {
        &self.lemma
    }

    /// Get the part-of-speech tag.
    pub fn pos(&self) -> &str {
        &self.pos
    }

    /// Get the named entity tag, `O` if the token is not an entity.
    pub fn ner(&self) -> &str {
        &self.ner
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }
}

/// Builder for `Token`.
///
/// The lemma defaults to the word, the part-of-speech tag to `_` and
/// the named entity tag to `O`.
pub struct TokenBuilder {
    token: Token,
}

impl TokenBuilder {
    pub fn new(word: impl Into<String>) -> Self {
        let word = word.into();

        TokenBuilder {
            token: Token {
                index: 0,
                lemma: word.clone(),
                word,
                pos: "_".to_string(),
                ner: NO_ENTITY.to_string(),
            },
        }
    }

    pub fn index(mut self, index: usize) -> Self {
        self.token.index = index;
        self
    }

    pub fn lemma(mut self, lemma: impl Into<String>) -> Self {
        self.token.lemma = lemma.into();
        self
    }

    pub fn pos(mut self, pos: impl Into<String>) -> Self {
        self.token.pos = pos.into();
        self
    }

    pub fn ner(mut self, ner: impl Into<String>) -> Self {
        self.token.ner = ner.into();
        self
    }
}

impl From<TokenBuilder> for Token {
    fn from(builder: TokenBuilder) -> Self {
        builder.token
    }
}

#[cfg(test)]
mod tests {
    use super::{Token, TokenBuilder, NO_ENTITY};

    #[test]
    fn builder_defaults() {
        let token: Token = TokenBuilder::new("regrets").into();

        assert_eq!(token.word(), "regrets");
        assert_eq!(token.lemma(), "regrets");
        assert_eq!(token.pos(), "_");
        assert_eq!(token.ner(), NO_ENTITY);
        assert_eq!(token.index(), 0);
    }

    #[test]
    fn builder_sets_annotations() {
        let token: Token = TokenBuilder::new("Paris")
            .index(3)
            .lemma("Paris")
            .pos("NNP")
            .ner("LOCATION")
            .into();

        assert_eq!(token.index(), 3);
        assert_eq!(token.pos(), "NNP");
        assert_eq!(token.ner(), "LOCATION");
    }
}
