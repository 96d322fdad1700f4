/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Serialisation of the quantised coefficient arrays
//!
//! The payload is, per channel in r, g, b order, a big endian `u32` block
//! count followed by `count * 64` big endian `i16` coefficients, the whole
//! blob deflated as a zlib stream at level 6.
//!
//! All three channels must carry the same block count and it must match
//! the count implied by the dimensions in the container header.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use zune_inflate::DeflateDecoder;

use crate::constants::{BLOCK_AREA, CHANNELS};
use crate::errors::{Mc2DecodeErrors, Mc2EncodeErrors};

/// Deflate level applied to the serialised blob.
const PAYLOAD_DEFLATE_LEVEL: u32 = 6;

/// Pack the three per-channel coefficient arrays and deflate them.
pub(crate) fn serialize_coefficients(
    channels: &[Vec<i16>; CHANNELS]
) -> Result<Vec<u8>, Mc2EncodeErrors> {
    let mut blob = Vec::with_capacity(
        channels.iter().map(|c| 4 + c.len() * 2).sum::<usize>()
    );

    for coefficients in channels {
        debug_assert_eq!(coefficients.len() % BLOCK_AREA, 0);

        let count = (coefficients.len() / BLOCK_AREA) as u32;

        blob.extend_from_slice(&count.to_be_bytes());

        for value in coefficients {
            blob.extend_from_slice(&value.to_be_bytes());
        }
    }

    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(blob.len() / 2),
        Compression::new(PAYLOAD_DEFLATE_LEVEL)
    );

    encoder
        .write_all(&blob)
        .map_err(|e| Mc2EncodeErrors::Deflate(format!("{e}")))?;

    encoder
        .finish()
        .map_err(|e| Mc2EncodeErrors::Deflate(format!("{e}")))
}

/// Inflate a payload and unpack the three coefficient arrays.
///
/// `expected_blocks` is the block count the header dimensions imply;
/// every channel must match it.
pub(crate) fn deserialize_coefficients(
    payload: &[u8], expected_blocks: usize
) -> Result<[Vec<i16>; CHANNELS], Mc2DecodeErrors> {
    let mut decoder = DeflateDecoder::new(payload);
    let blob = decoder.decode_zlib()?;

    let mut channels: [Vec<i16>; CHANNELS] = [Vec::new(), Vec::new(), Vec::new()];
    let mut position = 0_usize;

    for (c, name) in ["r", "g", "b"].iter().enumerate() {
        if blob.len() - position < 4 {
            return Err(Mc2DecodeErrors::BadCoefficients(format!(
                "channel {name} is missing its block count"
            )));
        }

        let mut count_bytes = [0_u8; 4];
        count_bytes.copy_from_slice(&blob[position..position + 4]);
        position += 4;

        let count = u32::from_be_bytes(count_bytes) as usize;

        if count != expected_blocks {
            return Err(Mc2DecodeErrors::BadCoefficients(format!(
                "channel {name} holds {count} blocks, dimensions imply {expected_blocks}"
            )));
        }

        let byte_len = count * BLOCK_AREA * 2;

        if blob.len() - position < byte_len {
            return Err(Mc2DecodeErrors::BadCoefficients(format!(
                "channel {name} needs {byte_len} coefficient bytes, {} are left",
                blob.len() - position
            )));
        }

        let mut coefficients = Vec::with_capacity(count * BLOCK_AREA);

        for pair in blob[position..position + byte_len].chunks_exact(2) {
            coefficients.push(i16::from_be_bytes([pair[0], pair[1]]));
        }
        position += byte_len;

        channels[c] = coefficients;
    }

    Ok(channels)
}

#[cfg(test)]
mod tests {
    use crate::coefficients::{deserialize_coefficients, serialize_coefficients};
    use crate::errors::Mc2DecodeErrors;

    #[test]
    fn coefficients_round_trip() {
        let blocks = 4;
        let make = |offset: i16| -> Vec<i16> {
            (0..blocks * 64).map(|i| (i as i16 % 997) - offset).collect()
        };
        let channels = [make(0), make(100), make(-300)];

        let payload = serialize_coefficients(&channels).unwrap();
        let rebuilt = deserialize_coefficients(&payload, blocks).unwrap();

        assert_eq!(channels, rebuilt);
    }

    #[test]
    fn deflate_actually_shrinks_sparse_arrays() {
        // residual coefficients are mostly zero, deflate must exploit that
        let channels = [vec![0_i16; 64 * 64], vec![0_i16; 64 * 64], vec![0_i16; 64 * 64]];

        let payload = serialize_coefficients(&channels).unwrap();
        assert!(payload.len() < 3 * (4 + 64 * 64 * 2) / 10);
    }

    #[test]
    fn mismatched_block_count_is_rejected() {
        let channels = [vec![0_i16; 2 * 64], vec![0_i16; 2 * 64], vec![0_i16; 2 * 64]];
        let payload = serialize_coefficients(&channels).unwrap();

        let err = deserialize_coefficients(&payload, 3).unwrap_err();
        assert!(matches!(err, Mc2DecodeErrors::BadCoefficients(_)));
    }

    #[test]
    fn corrupt_zlib_stream_is_rejected() {
        let err = deserialize_coefficients(&[0x12, 0x34, 0x56, 0x78], 1).unwrap_err();
        assert!(matches!(err, Mc2DecodeErrors::Inflate(_)));
    }

    #[test]
    fn truncated_blob_is_rejected() {
        let channels = [vec![7_i16; 64], vec![7_i16; 64], vec![7_i16; 64]];
        let payload = serialize_coefficients(&channels).unwrap();

        // re-deflate a truncated copy of the raw blob
        let mut decoder = zune_inflate::DeflateDecoder::new(&payload);
        let mut blob = decoder.decode_zlib().unwrap();
        blob.truncate(blob.len() - 3);

        let mut encoder = flate2::write::ZlibEncoder::new(
            Vec::new(),
            flate2::Compression::new(6)
        );
        std::io::Write::write_all(&mut encoder, &blob).unwrap();
        let short_payload = encoder.finish().unwrap();

        let err = deserialize_coefficients(&short_payload, 1).unwrap_err();
        assert!(matches!(err, Mc2DecodeErrors::BadCoefficients(_)));
    }
}
