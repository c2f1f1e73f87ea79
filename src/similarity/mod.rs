// Cross-group name similarity — the embedder capability, the ONNX
// implementation, the bipartite scorer, and the model downloader.

pub mod download;
pub mod embeddings;
pub mod scorer;
pub mod traits;
