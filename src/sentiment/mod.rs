pub mod interface;
pub mod client;

pub use interface::{overall_sentiment, OverallSentiment, SentimentAnalyzer, SentimentScores};
pub use client::SentimentClient;
