/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! This crate provides an encoder and a decoder for the mcmp2 image format.
//!
//! mcmp2 is a two-layer lossy format for RGB images: a downsampled copy of
//! the image stored losslessly as PNG (the base layer), plus a zlib-deflated
//! blob of quantised 8x8 DCT coefficients that encodes the difference
//! between the original image and the upscaled base layer (the residual).
//! Decoding upscales the base layer and adds the decoded residual back.
//!
//! Compression is controlled by two knobs, a JPEG-style quality factor in
//! `[1, 100]` and a downsampling factor for the base layer.
//!
//! # Features
//!  - Pure Rust, no unsafe code
//!  - Self describing container, decodable without side information
//!  - Deterministic output, the same input always encodes to the same bytes
//!
//! # Usage
//! Add the crate to the dependencies in the project Cargo.toml
//!
//! ```toml
//! [dependencies]
//! mcmp2 = "0.1"
//! ```
//!
//! # Examples
//!
//! ## Encode an RGB image with default settings
//! ```
//! use mcmp2::Mc2Encoder;
//!
//! // a 16x16 RGB image
//! let pixels = vec![128_u8; 16 * 16 * 3];
//!
//! let encoder = Mc2Encoder::new(&pixels, 16, 16);
//! let (container, stats) = encoder.encode().unwrap();
//!
//! assert_eq!(stats.out_bytes, container.len());
//! ```
//!
//! ## Decode an mcmp2 container back to raw pixels
//! ```no_run
//! use mcmp2::Mc2Decoder;
//!
//! let data = std::fs::read("image.mcmp2").unwrap();
//!
//! let mut decoder = Mc2Decoder::new(&data);
//! let pixels = decoder.decode_raw().unwrap();
//! ```
//!
//! ## Decode to PNG bytes
//!
//! The decoder can also hand back the reconstruction re-encoded in the
//! same lossless format the base layer uses, which is convenient when the
//! result is served or written to disk as-is.
//!
//! ```no_run
//! use mcmp2::Mc2Decoder;
//!
//! let data = std::fs::read("image.mcmp2").unwrap();
//!
//! let mut decoder = Mc2Decoder::new(&data);
//! let (png_bytes, stats) = decoder.decode().unwrap();
//! ```

#![warn(
    clippy::correctness,
    clippy::perf,
    clippy::pedantic,
    clippy::panic
)]
#![allow(
    clippy::needless_return,
    clippy::similar_names,
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::needless_range_loop,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
#![forbid(unsafe_code)]

#[macro_use]
extern crate log;

pub use crate::constants::MC2_MAGIC;
pub use crate::decoder::{DecodeStats, Mc2Decoder};
pub use crate::encoder::{EncodeStats, Mc2Encoder};
pub use crate::errors::{Mc2DecodeErrors, Mc2EncodeErrors};
pub use crate::headers::Mc2Header;
pub use crate::options::Mc2Options;

mod base;
mod blocks;
mod coefficients;
mod constants;
mod dct;
mod decoder;
mod encoder;
pub mod errors;
mod headers;
mod options;
mod quantize;
mod resample;
mod residual;

/// Probe whether a byte slice looks like an mcmp2 container.
///
/// This only inspects the magic bytes, it does not validate the rest
/// of the header.
#[must_use]
pub fn is_mc2(data: &[u8]) -> bool {
    data.len() >= MC2_MAGIC.len() && &data[..MC2_MAGIC.len()] == MC2_MAGIC
}
