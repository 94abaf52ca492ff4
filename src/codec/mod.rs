//! The wire protocol: QTC header framing, the encoder, and the decoder.

pub mod decoder;
pub mod encoder;
pub mod format;

pub use decoder::{decode, decode_with_progress};
pub use encoder::{encode, encode_with_progress};
