pub mod lexicon;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::constants::sentiment::{NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD};
use crate::error::SentimentError;

pub use lexicon::LexiconPolarity;

/// Coarse sentiment label attached to every interaction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Map a polarity score onto a label using the fixed thresholds.
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > POSITIVE_THRESHOLD {
            Sentiment::Positive
        } else if polarity < NEGATIVE_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any estimator that scores text in [-1.0, 1.0]
pub trait PolarityModel: Send + Sync {
    fn polarity(&self, text: &str) -> Result<f64, SentimentError>;
}

#[derive(Clone)]
pub struct SentimentClassifier {
    model: Arc<dyn PolarityModel>,
}

impl SentimentClassifier {
    pub fn new(model: Arc<dyn PolarityModel>) -> Self {
        Self { model }
    }

    /// Classifier backed by the built-in lexicon
    pub fn lexicon() -> Self {
        Self::new(Arc::new(LexiconPolarity::new()))
    }

    /// Model failures propagate; a non-finite or out-of-range score is a failure too.
    pub fn classify(&self, text: &str) -> Result<Sentiment, SentimentError> {
        let polarity = self.model.polarity(text)?;
        if !polarity.is_finite() || !(-1.0..=1.0).contains(&polarity) {
            return Err(SentimentError::OutOfRange(polarity));
        }
        Ok(Sentiment::from_polarity(polarity))
    }
}

impl Default for SentimentClassifier {
    fn default() -> Self {
        Self::lexicon()
    }
}
