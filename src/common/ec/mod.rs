pub mod block;
pub mod decoder;
pub mod encoder;
pub mod galois;
pub mod poly;

pub use block::*;
pub use decoder::*;
pub use encoder::*;
pub use galois::*;
pub use poly::*;
