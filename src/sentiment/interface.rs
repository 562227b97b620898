use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::NeutralRule;
use crate::error::GatewayResult;

const NEUTRAL_LOW: f64 = 0.495;
const NEUTRAL_HIGH: f64 = 0.509;

/// Scores for the fixed emotion label set; absent labels stay at zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub joy: f64,
    pub anger: f64,
    pub sadness: f64,
    pub fear: f64,
    pub neutral: f64,
    pub surprise: f64,
    pub disgust: f64,
    pub love: f64,
}

impl SentimentScores {
    /// Build from raw classifier output, ignoring unknown labels
    pub fn from_labels<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut scores = Self::default();
        for (label, score) in labels {
            if let Some(slot) = scores.slot_mut(label) {
                *slot = score;
            }
        }
        scores
    }

    fn slot_mut(&mut self, label: &str) -> Option<&mut f64> {
        match label {
            "joy" => Some(&mut self.joy),
            "anger" => Some(&mut self.anger),
            "sadness" => Some(&mut self.sadness),
            "fear" => Some(&mut self.fear),
            "neutral" => Some(&mut self.neutral),
            "surprise" => Some(&mut self.surprise),
            "disgust" => Some(&mut self.disgust),
            "love" => Some(&mut self.love),
            _ => None,
        }
    }

    pub fn negative_score(&self) -> f64 {
        self.sadness + self.anger + self.fear + self.disgust
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallSentiment {
    Neutral,
    Positive,
    Negative,
}

pub fn overall_sentiment(scores: &SentimentScores, rule: NeutralRule) -> OverallSentiment {
    let positive = scores.joy;
    let is_neutral = match rule {
        NeutralRule::Observed => positive >= NEUTRAL_LOW || positive <= NEUTRAL_HIGH,
        NeutralRule::Band => (NEUTRAL_LOW..=NEUTRAL_HIGH).contains(&positive),
    };

    if is_neutral {
        OverallSentiment::Neutral
    } else if positive > scores.negative_score() {
        OverallSentiment::Positive
    } else {
        OverallSentiment::Negative
    }
}

/// Emotion classification capability
#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> GatewayResult<(SentimentScores, OverallSentiment)>;
}
