/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during encoding and decoding

use std::fmt::{Debug, Formatter};

use zune_inflate::errors::InflateDecodeErrors;
use zune_png::error::PngDecodeErrors;

/// Errors that may arise when decoding an mcmp2 container
pub enum Mc2DecodeErrors {
    /// The container does not start with the `MC2v1` magic bytes
    BadMagic,
    /// The buffer ends before the fixed header is complete
    TooShort(usize),
    /// A length-prefixed section extends past the end of the buffer.
    ///
    /// Contains the section name, the number of bytes needed and the
    /// number of bytes present.
    Truncated(&'static str, usize, usize),
    /// The header declares a channel count other than 3
    UnsupportedChannels(u8),
    /// The header declares a block size other than 8
    UnsupportedBlockSize(u8),
    /// The header carries a quality outside `[1, 100]`
    BadQuality(u8),
    /// The header carries a downsample factor of 0
    BadDownsample(u8),
    /// A header dimension is zero
    ZeroDimension(&'static str),
    /// The payload is not a valid zlib stream
    Inflate(InflateDecodeErrors),
    /// The inflated payload does not hold three well formed
    /// coefficient arrays
    BadCoefficients(String),
    /// The embedded base layer is not a PNG the decoder understands
    BaseLayer(PngDecodeErrors),
    /// The base layer decoded to something other than the expected
    /// RGB raster, expected and found descriptions
    BaseLayerMismatch(String),
    /// Re-encoding the reconstruction to PNG failed
    Reencode(String),
    /// Generic message
    GenericStatic(&'static str),
    /// Generic message
    Generic(String)
}

impl Debug for Mc2DecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadMagic => writeln!(f, "Wrong magic bytes, not an mcmp2 file"),
            Self::TooShort(found) => writeln!(
                f,
                "Header needs {} bytes but the buffer holds {found}",
                crate::constants::HEADER_SIZE
            ),
            Self::Truncated(section, needed, found) => writeln!(
                f,
                "Truncated container, {section} needs {needed} bytes but only {found} are left"
            ),
            Self::UnsupportedChannels(c) => {
                writeln!(f, "Unsupported channel count {c}, only 3 channel RGB is defined")
            }
            Self::UnsupportedBlockSize(b) => {
                writeln!(f, "Unsupported block size {b}, only 8 is defined")
            }
            Self::BadQuality(q) => writeln!(f, "Quality {q} is outside the range 1..=100"),
            Self::BadDownsample(d) => writeln!(f, "Downsample factor {d} must be at least 1"),
            Self::ZeroDimension(dim) => writeln!(f, "Image {dim} may not be zero"),
            Self::Inflate(e) => writeln!(f, "Could not inflate payload: {e:?}"),
            Self::BadCoefficients(reason) => writeln!(f, "Bad coefficient payload: {reason}"),
            Self::BaseLayer(e) => writeln!(f, "Could not decode base layer: {e:?}"),
            Self::BaseLayerMismatch(reason) => {
                writeln!(f, "Base layer does not match header: {reason}")
            }
            Self::Reencode(reason) => {
                writeln!(f, "Could not re-encode reconstruction to PNG: {reason}")
            }
            Self::GenericStatic(msg) => writeln!(f, "{msg}"),
            Self::Generic(msg) => writeln!(f, "{msg}")
        }
    }
}

impl From<InflateDecodeErrors> for Mc2DecodeErrors {
    fn from(err: InflateDecodeErrors) -> Mc2DecodeErrors {
        Mc2DecodeErrors::Inflate(err)
    }
}

impl From<PngDecodeErrors> for Mc2DecodeErrors {
    fn from(err: PngDecodeErrors) -> Mc2DecodeErrors {
        Mc2DecodeErrors::BaseLayer(err)
    }
}

impl From<&'static str> for Mc2DecodeErrors {
    fn from(msg: &'static str) -> Mc2DecodeErrors {
        Mc2DecodeErrors::GenericStatic(msg)
    }
}

impl From<String> for Mc2DecodeErrors {
    fn from(msg: String) -> Mc2DecodeErrors {
        Mc2DecodeErrors::Generic(msg)
    }
}

/// Errors that may arise when encoding an image into an mcmp2 container
pub enum Mc2EncodeErrors {
    /// An input dimension is zero
    ZeroDimension(&'static str),
    /// Quality is outside `[1, 100]`
    BadQuality(u8),
    /// The downsample factor is 0
    BadDownsample(u8),
    /// Mismatch between the pixel buffer length expected from the
    /// dimensions and what was passed, expected then found
    LengthMismatch(usize, usize),
    /// The dimensions overflow internal buffer arithmetic
    TooLargeDimensions(usize),
    /// A quantised coefficient fell outside the signed 16 bit range the
    /// payload stores.
    ///
    /// Carries the offending value; this only happens for pathological
    /// high frequency content.
    CoefficientOverflow(f64),
    /// Encoding the base layer to PNG failed
    BaseLayer(String),
    /// Deflating the payload failed
    Deflate(String),
    /// Generic message
    GenericStatic(&'static str)
}

impl Debug for Mc2EncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension(dim) => writeln!(f, "Image {dim} may not be zero"),
            Self::BadQuality(q) => writeln!(f, "Quality {q} is outside the range 1..=100"),
            Self::BadDownsample(d) => writeln!(f, "Downsample factor {d} must be at least 1"),
            Self::LengthMismatch(expected, found) => writeln!(
                f,
                "Expected an RGB buffer of {expected} bytes but found {found}"
            ),
            Self::TooLargeDimensions(value) => {
                writeln!(f, "Dimension product {value} is too large to encode")
            }
            Self::CoefficientOverflow(value) => writeln!(
                f,
                "Quantised coefficient {value} does not fit in 16 bits"
            ),
            Self::BaseLayer(reason) => writeln!(f, "Could not encode base layer: {reason}"),
            Self::Deflate(reason) => writeln!(f, "Could not deflate payload: {reason}"),
            Self::GenericStatic(msg) => writeln!(f, "{msg}")
        }
    }
}

impl From<&'static str> for Mc2EncodeErrors {
    fn from(msg: &'static str) -> Mc2EncodeErrors {
        Mc2EncodeErrors::GenericStatic(msg)
    }
}
