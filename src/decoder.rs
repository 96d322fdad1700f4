/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The mcmp2 decoder

use zune_core::bytestream::ZByteReader;

use crate::base::{decode_base_layer, encode_png};
use crate::blocks::block_count;
use crate::coefficients::deserialize_coefficients;
use crate::constants::CHANNELS;
use crate::dct::Dct8;
use crate::errors::Mc2DecodeErrors;
use crate::headers::Mc2Header;
use crate::quantize::quant_matrix;
use crate::residual::{decode_channel, reconstruct};

/// Parameters and byte counts observed during one decode.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DecodeStats {
    /// Width of the reconstructed image
    pub width:       usize,
    /// Height of the reconstructed image
    pub height:      usize,
    /// Downsample factor read from the header
    pub down:        u8,
    /// Quality read from the header
    pub quality:     u8,
    /// Size of the PNG the reconstruction was re-encoded into
    pub recon_bytes: usize
}

/// Decompresses an mcmp2 container back into an RGB8 raster.
///
/// Mirrors the usual decoder shape: [`decode_headers`](Self::decode_headers)
/// parses and validates the fixed header without touching the layers, so
/// dimensions and parameters can be inspected cheaply, then
/// [`decode_raw`](Self::decode_raw) reconstructs the pixels, or
/// [`decode`](Self::decode) additionally re-encodes them as a PNG.
///
/// # Example
/// ```
/// use mcmp2::{Mc2Decoder, Mc2Encoder};
///
/// let pixels = vec![90_u8; 8 * 8 * 3];
/// let (container, _) = Mc2Encoder::new(&pixels, 8, 8).encode().unwrap();
///
/// let mut decoder = Mc2Decoder::new(&container);
/// decoder.decode_headers().unwrap();
/// assert_eq!(decoder.dimensions(), Some((8, 8)));
///
/// let rgb = decoder.decode_raw().unwrap();
/// assert_eq!(rgb.len(), 8 * 8 * 3);
/// ```
pub struct Mc2Decoder<'a> {
    stream: ZByteReader<'a>,
    header: Option<Mc2Header>
}

impl<'a> Mc2Decoder<'a> {
    /// Create a decoder over a container byte slice.
    pub fn new(data: &'a [u8]) -> Mc2Decoder<'a> {
        Mc2Decoder {
            stream: ZByteReader::new(data),
            header: None
        }
    }

    /// Parse and validate the fixed container header.
    ///
    /// Idempotent, later calls are no-ops.
    pub fn decode_headers(&mut self) -> Result<(), Mc2DecodeErrors> {
        if self.header.is_some() {
            return Ok(());
        }

        let header = Mc2Header::read_from(&mut self.stream)?;
        self.header = Some(header);

        Ok(())
    }

    /// Dimensions of the full resolution image, present after
    /// [`decode_headers`](Self::decode_headers) has run.
    #[must_use]
    pub const fn dimensions(&self) -> Option<(usize, usize)> {
        match &self.header {
            Some(header) => Some((header.width, header.height)),
            None => None
        }
    }

    /// The parsed header, present after
    /// [`decode_headers`](Self::decode_headers) has run.
    #[must_use]
    pub fn header(&self) -> Option<&Mc2Header> {
        self.header.as_ref()
    }

    /// Reconstruct the image, returning interleaved RGB8 of
    /// `width * height * 3` bytes.
    pub fn decode_raw(&mut self) -> Result<Vec<u8>, Mc2DecodeErrors> {
        self.decode_headers()?;

        // both reads below only run once the header parsed, so unwrap
        // cannot be reached without one present
        let header = self.header.ok_or(Mc2DecodeErrors::GenericStatic(
            "header disappeared between calls"
        ))?;

        // base layer section
        if !self.stream.has(header.base_len) {
            return Err(Mc2DecodeErrors::Truncated(
                "base layer",
                header.base_len,
                self.stream.remaining()
            ));
        }
        let base_bytes = self.stream.get(header.base_len)?;

        // payload section, 8 byte length prefix then the blob
        if !self.stream.has(8) {
            return Err(Mc2DecodeErrors::Truncated(
                "payload length",
                8,
                self.stream.remaining()
            ));
        }
        let payload_len = self.stream.get_u64_be_err()? as usize;

        if !self.stream.has(payload_len) {
            return Err(Mc2DecodeErrors::Truncated(
                "payload",
                payload_len,
                self.stream.remaining()
            ));
        }
        let payload = self.stream.get_as_ref(payload_len)?;

        trace!(
            "Decoding {}x{}, base {} bytes, payload {} bytes",
            header.width,
            header.height,
            header.base_len,
            payload_len
        );

        let expected_blocks = block_count(header.width, header.height);
        let channels = deserialize_coefficients(payload, expected_blocks)?;

        let upscaled_base =
            decode_base_layer(base_bytes, header.width, header.height, header.down)?;

        let matrix = quant_matrix(header.quality);
        let dct = Dct8::new();

        let mut residuals: [Vec<f32>; CHANNELS] = [Vec::new(), Vec::new(), Vec::new()];

        for c in 0..CHANNELS {
            residuals[c] =
                decode_channel(&channels[c], header.width, header.height, &matrix, &dct);
        }

        Ok(reconstruct(&upscaled_base, &residuals))
    }

    /// Reconstruct the image and re-encode it in the container's own
    /// lossless raster format.
    ///
    /// Returns the PNG bytes and decode statistics. Callers that want
    /// the pixels themselves should use [`decode_raw`](Self::decode_raw)
    /// and skip the re-encode.
    pub fn decode(&mut self) -> Result<(Vec<u8>, DecodeStats), Mc2DecodeErrors> {
        let rgb = self.decode_raw()?;

        let header = self.header.ok_or(Mc2DecodeErrors::GenericStatic(
            "header disappeared between calls"
        ))?;

        let png_bytes = encode_png(&rgb, header.width, header.height)
            .map_err(|e| Mc2DecodeErrors::Reencode(format!("{e}")))?;

        let stats = DecodeStats {
            width:       header.width,
            height:      header.height,
            down:        header.down,
            quality:     header.quality,
            recon_bytes: png_bytes.len()
        };

        Ok((png_bytes, stats))
    }
}

#[cfg(test)]
mod tests {
    use crate::decoder::Mc2Decoder;
    use crate::encoder::Mc2Encoder;
    use crate::errors::Mc2DecodeErrors;

    fn sample_container() -> Vec<u8> {
        let pixels: Vec<u8> = (0..16 * 16 * 3).map(|i| (i % 200) as u8).collect();
        Mc2Encoder::new(&pixels, 16, 16).encode().unwrap().0
    }

    #[test]
    fn header_sniffing_is_cheap_and_idempotent() {
        let container = sample_container();

        let mut decoder = Mc2Decoder::new(&container);
        assert_eq!(decoder.dimensions(), None);

        decoder.decode_headers().unwrap();
        decoder.decode_headers().unwrap();

        assert_eq!(decoder.dimensions(), Some((16, 16)));

        let header = decoder.header().unwrap();
        assert_eq!(header.quality, 50);
        assert_eq!(header.down, 2);
    }

    #[test]
    fn truncated_base_layer_is_detected() {
        let container = sample_container();

        let mut decoder = Mc2Decoder::new(&container[..30]);
        let err = decoder.decode_raw().unwrap_err();
        assert!(matches!(err, Mc2DecodeErrors::Truncated("base layer", _, _)));
    }

    #[test]
    fn truncated_payload_is_detected() {
        let container = sample_container();

        let mut decoder = Mc2Decoder::new(&container[..container.len() - 1]);
        let err = decoder.decode_raw().unwrap_err();
        assert!(matches!(err, Mc2DecodeErrors::Truncated("payload", _, _)));
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut container = sample_container();
        container.extend_from_slice(b"garbage after the payload");

        let rgb = Mc2Decoder::new(&container).decode_raw().unwrap();
        assert_eq!(rgb.len(), 16 * 16 * 3);
    }
}
