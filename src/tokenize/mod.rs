use unicode_segmentation::UnicodeSegmentation;

/// Kind of a token produced by a [`Tokenizer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A word (carries at least one alphanumeric character)
    Word,
    /// Visible non-word material: punctuation, symbols
    Punctuation,
    /// Structural token with no textual content (whitespace runs,
    /// sentence boundaries). Writers drop these.
    Boundary,
}

/// One token of an utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    /// Whether the token carries textual content worth emitting
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }
}

/// Capability interface for splitting utterance text into tokens.
///
/// The corpus pipeline depends only on this contract; the bundled
/// [`WordTokenizer`] is a plain word-boundary splitter, not a model of
/// Icelandic orthography.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

/// Unicode word-boundary tokenizer (UAX #29 word bounds)
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        text.split_word_bounds()
            .map(|segment| {
                if segment.chars().all(char::is_whitespace) {
                    Token {
                        text: String::new(),
                        kind: TokenKind::Boundary,
                    }
                } else if segment.chars().any(char::is_alphanumeric) {
                    Token {
                        text: segment.to_string(),
                        kind: TokenKind::Word,
                    }
                } else {
                    Token {
                        text: segment.to_string(),
                        kind: TokenKind::Punctuation,
                    }
                }
            })
            .collect()
    }
}
