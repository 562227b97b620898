pub mod interface;
pub mod client;

pub use interface::{PosTagger, PosToken};
pub use client::PosClient;
