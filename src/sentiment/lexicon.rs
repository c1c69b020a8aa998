//! Lexicon-based polarity estimator.
//!
//! Scores each known word, scales it by an immediately preceding intensifier
//! and flips/halves it when a negator appeared within a short window in the
//! same clause. The polarity is the mean of the scored words.

use std::collections::HashMap;

use super::PolarityModel;
use crate::constants::sentiment::{NEGATION_FACTOR, NEGATION_WINDOW};
use crate::error::SentimentError;

/// (word, polarity)
const LEXICON: &[(&str, f64)] = &[
    // positive
    ("love", 0.5),
    ("loved", 0.7),
    ("lovely", 0.5),
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 1.0),
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("wonderful", 1.0),
    ("fantastic", 0.4),
    ("happy", 0.8),
    ("glad", 0.5),
    ("helpful", 0.5),
    ("nice", 0.6),
    ("best", 1.0),
    ("better", 0.5),
    ("perfect", 1.0),
    ("quick", 0.33),
    ("fast", 0.2),
    ("easy", 0.43),
    ("clean", 0.37),
    ("friendly", 0.375),
    ("satisfied", 0.5),
    ("pleased", 0.5),
    ("thanks", 0.2),
    ("thank", 0.2),
    ("beautiful", 0.85),
    ("superb", 1.0),
    ("brilliant", 0.9),
    ("impressive", 1.0),
    ("reliable", 0.4),
    ("useful", 0.3),
    ("convenient", 0.3),
    ("safe", 0.5),
    ("fair", 0.7),
    ("kind", 0.6),
    ("polite", 0.3),
    ("smooth", 0.4),
    ("responsive", 0.3),
    ("appreciate", 0.4),
    ("enjoy", 0.4),
    ("positive", 0.23),
    ("fine", 0.4),
    // negative
    ("terrible", -1.0),
    ("broken", -0.4),
    ("bad", -0.7),
    ("awful", -1.0),
    ("horrible", -1.0),
    ("worst", -1.0),
    ("worse", -0.4),
    ("poor", -0.4),
    ("slow", -0.3),
    ("hate", -0.8),
    ("angry", -0.5),
    ("sad", -0.5),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("useless", -0.5),
    ("rude", -0.3),
    ("dirty", -0.6),
    ("unsafe", -0.5),
    ("unfair", -0.5),
    ("difficult", -0.5),
    ("wrong", -0.5),
    ("annoying", -0.8),
    ("frustrating", -0.4),
    ("frustrated", -0.7),
    ("late", -0.3),
    ("delayed", -0.3),
    ("expensive", -0.5),
    ("corrupt", -0.5),
    ("dangerous", -0.6),
    ("ugly", -0.7),
    ("stupid", -0.8),
    ("failed", -0.5),
    ("unacceptable", -0.5),
    ("confusing", -0.3),
    ("lazy", -0.25),
    ("painful", -0.7),
    ("nasty", -1.0),
    ("incompetent", -0.5),
    ("unhelpful", -0.5),
    ("ridiculous", -0.33),
    ("pathetic", -1.0),
];

/// (word, multiplier) applied to the next scored word
const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.3),
    ("extremely", 1.5),
    ("absolutely", 1.5),
    ("incredibly", 1.5),
    ("highly", 1.3),
    ("quite", 1.1),
    ("fairly", 0.8),
    ("somewhat", 0.7),
    ("slightly", 0.5),
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "nor", "neither", "hardly", "without", "cannot", "dont", "doesnt",
    "isnt", "wasnt", "cant", "wont",
];

#[derive(Debug, PartialEq)]
enum Token {
    Word(String),
    /// Clause punctuation; negation does not cross it
    Boundary,
}

fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if ch.is_alphanumeric() || ch == '\'' || ch == '\u{2019}' {
            if ch == '\u{2019}' {
                current.push('\'');
            } else {
                current.extend(ch.to_lowercase());
            }
            continue;
        }
        if !current.is_empty() {
            tokens.push(Token::Word(std::mem::take(&mut current)));
        }
        if matches!(ch, '.' | ',' | ';' | ':' | '!' | '?') {
            tokens.push(Token::Boundary);
        }
    }
    if !current.is_empty() {
        tokens.push(Token::Word(current));
    }
    tokens
}

#[derive(Clone, Debug)]
pub struct LexiconPolarity {
    words: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
}

impl LexiconPolarity {
    pub fn new() -> Self {
        Self {
            words: LEXICON.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }

    fn is_negator(word: &str) -> bool {
        NEGATORS.contains(&word) || word.ends_with("n't")
    }

    /// Polarity in [-1, 1]; 0.0 when no known word is present.
    pub fn score(&self, text: &str) -> f64 {
        let mut scores = Vec::new();
        let mut negation_left = 0usize;
        let mut intensity: Option<f64> = None;

        for token in tokenize(text) {
            let word = match token {
                Token::Word(word) => word,
                Token::Boundary => {
                    negation_left = 0;
                    intensity = None;
                    continue;
                }
            };

            if Self::is_negator(&word) {
                negation_left = NEGATION_WINDOW;
                intensity = None;
                continue;
            }
            if let Some(&factor) = self.intensifiers.get(word.as_str()) {
                intensity = Some(factor);
                continue;
            }

            if let Some(&polarity) = self.words.get(word.as_str()) {
                let mut value = (polarity * intensity.unwrap_or(1.0)).clamp(-1.0, 1.0);
                if negation_left > 0 {
                    value *= NEGATION_FACTOR;
                }
                scores.push(value);
                negation_left = 0;
            } else {
                negation_left = negation_left.saturating_sub(1);
            }
            intensity = None;
        }

        if scores.is_empty() {
            return 0.0;
        }
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}

impl Default for LexiconPolarity {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityModel for LexiconPolarity {
    fn polarity(&self, text: &str) -> Result<f64, SentimentError> {
        Ok(self.score(text))
    }
}
