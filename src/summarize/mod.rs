pub mod interface;
pub mod client;

pub use interface::Summarizer;
pub use client::SummarizeClient;
