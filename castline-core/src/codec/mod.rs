//! Reference codec implementations of the [`VideoEncoder`] /
//! [`VideoDecoder`] collaborator traits.
//!
//! [`VideoEncoder`]: crate::collab::VideoEncoder
//! [`VideoDecoder`]: crate::collab::VideoDecoder

pub mod zstd;

pub use zstd::{ZstdFrameDecoder, ZstdFrameEncoder};
