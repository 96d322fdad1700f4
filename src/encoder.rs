/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The mcmp2 encoder

use crate::base::encode_base_layer;
use crate::blocks::{block_count, split_planes};
use crate::coefficients::serialize_coefficients;
use crate::constants::{CHANNELS, HEADER_SIZE};
use crate::dct::Dct8;
use crate::errors::Mc2EncodeErrors;
use crate::headers::Mc2Header;
use crate::options::Mc2Options;
use crate::quantize::quant_matrix;
use crate::residual::encode_channel;

/// Dimension product cap keeping all internal buffer arithmetic in range.
const MAX_DIMENSIONS: usize = 1 << 30;

/// Byte counts and parameters observed during one encode.
///
/// Purely informational, nothing here is needed to decode the output.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EncodeStats {
    /// Raw raster size of the input, `width * height * 3`
    pub original_bytes: usize,
    /// Size of the embedded base layer PNG
    pub base_bytes:     usize,
    /// Size of the deflated coefficient payload
    pub payload_bytes:  usize,
    /// Total container size
    pub out_bytes:      usize,
    /// Input width
    pub width:          usize,
    /// Input height
    pub height:         usize,
    /// Quality the image was encoded with
    pub quality:        u8,
    /// Downsample factor the base layer was shrunk by
    pub down:           u8
}

/// Compresses an interleaved RGB8 raster into an mcmp2 container.
///
/// The encoder is a pure function of its input, the same pixels and
/// options always produce byte identical output. Nothing is written on
/// failure, the container is assembled in memory and returned whole.
///
/// # Example
/// ```
/// use mcmp2::{Mc2Encoder, Mc2Options};
///
/// let pixels = vec![64_u8; 32 * 32 * 3];
///
/// let encoder = Mc2Encoder::new_with_options(
///     &pixels, 32, 32,
///     Mc2Options::default().set_quality(75)
/// );
/// let (container, stats) = encoder.encode().unwrap();
///
/// assert!(mcmp2::is_mc2(&container));
/// assert_eq!(stats.quality, 75);
/// ```
pub struct Mc2Encoder<'a> {
    data:    &'a [u8],
    width:   usize,
    height:  usize,
    options: Mc2Options
}

impl<'a> Mc2Encoder<'a> {
    /// Create an encoder with the default options, quality 50 and
    /// downsample factor 2.
    ///
    /// `data` is interleaved RGB8 of `width * height * 3` bytes.
    pub fn new(data: &'a [u8], width: usize, height: usize) -> Mc2Encoder<'a> {
        Mc2Encoder::new_with_options(data, width, height, Mc2Options::default())
    }

    /// Create an encoder with explicit options.
    pub fn new_with_options(
        data: &'a [u8], width: usize, height: usize, options: Mc2Options
    ) -> Mc2Encoder<'a> {
        Mc2Encoder {
            data,
            width,
            height,
            options
        }
    }

    fn validate(&self) -> Result<(), Mc2EncodeErrors> {
        if self.width == 0 {
            return Err(Mc2EncodeErrors::ZeroDimension("width"));
        }
        if self.height == 0 {
            return Err(Mc2EncodeErrors::ZeroDimension("height"));
        }

        let pixels = self
            .width
            .checked_mul(self.height)
            .ok_or(Mc2EncodeErrors::TooLargeDimensions(usize::MAX))?;

        if pixels > MAX_DIMENSIONS {
            return Err(Mc2EncodeErrors::TooLargeDimensions(pixels));
        }

        let expected = pixels * CHANNELS;

        if self.data.len() != expected {
            return Err(Mc2EncodeErrors::LengthMismatch(expected, self.data.len()));
        }

        self.options.validate()
    }

    /// Compress the image, returning the container bytes and encode
    /// statistics.
    pub fn encode(&self) -> Result<(Vec<u8>, EncodeStats), Mc2EncodeErrors> {
        self.validate()?;

        let quality = self.options.quality();
        let down = self.options.down();

        trace!(
            "Encoding {}x{} at quality {} down {}",
            self.width,
            self.height,
            quality,
            down
        );

        // base layer, and the upscaled copy residuals are measured against
        let (base_bytes, upscaled_base) =
            encode_base_layer(self.data, self.width, self.height, down)?;

        // residual layer
        let matrix = quant_matrix(quality);
        let dct = Dct8::new();
        let planes = split_planes(self.data, self.width, self.height);

        let mut channels: [Vec<i16>; CHANNELS] = [Vec::new(), Vec::new(), Vec::new()];

        for c in 0..CHANNELS {
            channels[c] = encode_channel(
                &planes[c],
                &upscaled_base[c],
                self.width,
                self.height,
                &matrix,
                &dct
            )?;

            debug_assert_eq!(
                channels[c].len(),
                block_count(self.width, self.height) * 64
            );
        }

        let payload = serialize_coefficients(&channels)?;

        debug!(
            "Base layer {} bytes, payload {} bytes",
            base_bytes.len(),
            payload.len()
        );

        // container
        let header = Mc2Header::new(self.width, self.height, down, quality, base_bytes.len());

        let mut container =
            Vec::with_capacity(HEADER_SIZE + base_bytes.len() + 8 + payload.len());

        header.write_to(&mut container);
        container.extend_from_slice(&base_bytes);
        container.extend_from_slice(&(payload.len() as u64).to_be_bytes());
        container.extend_from_slice(&payload);

        let stats = EncodeStats {
            original_bytes: self.data.len(),
            base_bytes:     base_bytes.len(),
            payload_bytes:  payload.len(),
            out_bytes:      container.len(),
            width:          self.width,
            height:         self.height,
            quality,
            down
        };

        Ok((container, stats))
    }
}

#[cfg(test)]
mod tests {
    use crate::encoder::Mc2Encoder;
    use crate::errors::Mc2EncodeErrors;
    use crate::options::Mc2Options;

    #[test]
    fn wrong_buffer_length_is_rejected() {
        let pixels = vec![0_u8; 10];

        let err = Mc2Encoder::new(&pixels, 4, 4).encode().unwrap_err();
        assert!(matches!(err, Mc2EncodeErrors::LengthMismatch(48, 10)));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let err = Mc2Encoder::new(&[], 0, 4).encode().unwrap_err();
        assert!(matches!(err, Mc2EncodeErrors::ZeroDimension("width")));

        let err = Mc2Encoder::new(&[], 4, 0).encode().unwrap_err();
        assert!(matches!(err, Mc2EncodeErrors::ZeroDimension("height")));
    }

    #[test]
    fn bad_options_are_rejected() {
        let pixels = vec![0_u8; 4 * 4 * 3];

        let encoder =
            Mc2Encoder::new_with_options(&pixels, 4, 4, Mc2Options::new(0, 2));
        assert!(matches!(
            encoder.encode().unwrap_err(),
            Mc2EncodeErrors::BadQuality(0)
        ));

        let encoder =
            Mc2Encoder::new_with_options(&pixels, 4, 4, Mc2Options::new(50, 0));
        assert!(matches!(
            encoder.encode().unwrap_err(),
            Mc2EncodeErrors::BadDownsample(0)
        ));
    }

    #[test]
    fn stats_account_for_every_byte() {
        let pixels: Vec<u8> = (0..24 * 24 * 3).map(|i| (i % 255) as u8).collect();

        let (container, stats) = Mc2Encoder::new(&pixels, 24, 24).encode().unwrap();

        assert_eq!(stats.out_bytes, container.len());
        assert_eq!(
            stats.out_bytes,
            25 + stats.base_bytes + 8 + stats.payload_bytes
        );
        assert_eq!(stats.original_bytes, pixels.len());
    }
}
