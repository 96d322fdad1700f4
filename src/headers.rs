/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Reading and writing of the fixed mcmp2 container header
//!
//! Layout, all integers big endian:
//!
//! | offset | size | field      |
//! |--------|------|------------|
//! | 0      | 5    | magic      |
//! | 5      | 4    | width      |
//! | 9      | 4    | height     |
//! | 13     | 1    | channels   |
//! | 14     | 1    | block size |
//! | 15     | 1    | down       |
//! | 16     | 1    | quality    |
//! | 17     | 8    | base len   |

use zune_core::bytestream::ZByteReader;

use crate::constants::{BLOCK_SIZE, CHANNELS, HEADER_SIZE, MC2_MAGIC};
use crate::errors::Mc2DecodeErrors;

/// Parsed representation of the container header.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Mc2Header {
    /// Width of the full resolution image
    pub width:      usize,
    /// Height of the full resolution image
    pub height:     usize,
    /// Number of interleaved channels, always 3
    pub channels:   u8,
    /// Coefficient block side length, always 8
    pub block_size: u8,
    /// Base layer downsample factor
    pub down:       u8,
    /// Quality factor the image was encoded with
    pub quality:    u8,
    /// Byte length of the embedded base layer
    pub base_len:   usize
}

impl Mc2Header {
    /// Build a header for an encode in progress.
    pub(crate) fn new(width: usize, height: usize, down: u8, quality: u8, base_len: usize) -> Mc2Header {
        Mc2Header {
            width,
            height,
            channels: CHANNELS as u8,
            block_size: BLOCK_SIZE as u8,
            down,
            quality,
            base_len
        }
    }

    /// Append the 25 byte header to `sink`.
    pub(crate) fn write_to(&self, sink: &mut Vec<u8>) {
        sink.extend_from_slice(MC2_MAGIC);
        sink.extend_from_slice(&(self.width as u32).to_be_bytes());
        sink.extend_from_slice(&(self.height as u32).to_be_bytes());
        sink.push(self.channels);
        sink.push(self.block_size);
        sink.push(self.down);
        sink.push(self.quality);
        sink.extend_from_slice(&(self.base_len as u64).to_be_bytes());
    }

    /// Read and validate a header from the front of `stream`.
    ///
    /// On success the stream points to the first byte of the base layer.
    pub(crate) fn read_from(stream: &mut ZByteReader) -> Result<Mc2Header, Mc2DecodeErrors> {
        if !stream.has(HEADER_SIZE) {
            return Err(Mc2DecodeErrors::TooShort(stream.remaining()));
        }

        let magic = stream.get_as_ref(MC2_MAGIC.len())?;

        if magic != MC2_MAGIC {
            return Err(Mc2DecodeErrors::BadMagic);
        }

        let width = stream.get_u32_be_err()? as usize;
        let height = stream.get_u32_be_err()? as usize;
        let channels = stream.get_u8_err()?;
        let block_size = stream.get_u8_err()?;
        let down = stream.get_u8_err()?;
        let quality = stream.get_u8_err()?;
        let base_len = stream.get_u64_be_err()? as usize;

        if width == 0 {
            return Err(Mc2DecodeErrors::ZeroDimension("width"));
        }
        if height == 0 {
            return Err(Mc2DecodeErrors::ZeroDimension("height"));
        }
        if channels != CHANNELS as u8 {
            return Err(Mc2DecodeErrors::UnsupportedChannels(channels));
        }
        if block_size != BLOCK_SIZE as u8 {
            return Err(Mc2DecodeErrors::UnsupportedBlockSize(block_size));
        }
        if down < 1 {
            return Err(Mc2DecodeErrors::BadDownsample(down));
        }
        if quality < 1 || quality > 100 {
            return Err(Mc2DecodeErrors::BadQuality(quality));
        }

        trace!("Image width: {}", width);
        trace!("Image height: {}", height);
        trace!("Downsample factor: {}", down);
        trace!("Quality: {}", quality);
        trace!("Base layer length: {}", base_len);

        Ok(Mc2Header {
            width,
            height,
            channels,
            block_size,
            down,
            quality,
            base_len
        })
    }
}
