use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatewayResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosToken {
    pub token: String,
    pub pos: String,
}

/// Part-of-speech tagging capability
#[async_trait]
pub trait PosTagger: Send + Sync {
    /// Tag already-translated text in the tagger's language
    async fn tag(&self, text: &str) -> GatewayResult<Vec<PosToken>>;
}
