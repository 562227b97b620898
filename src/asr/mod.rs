pub mod interface;
pub mod assemblyai;

pub use interface::Transcriber;
pub use assemblyai::AssemblyAiClient;
