pub use crate::vertex::{LightmappedVertex, Vertex, VertexAttribute};
pub use crate::vfile::{VFile, VFileSystem};
