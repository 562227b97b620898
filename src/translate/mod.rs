pub mod interface;
pub mod client;

pub use interface::Translator;
pub use client::TranslateClient;
