/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The residual layer
//!
//! Forward direction: per channel, subtract the upscaled base from the
//! original, pad, transform each 8x8 block, quantise and flatten into
//! zig-zag order, stacking the 64-vectors block by block.
//!
//! Inverse direction: scatter each 64-vector back into a block,
//! dequantise, inverse transform, crop, and add the result onto the
//! upscaled base with saturating 8 bit rounding.

use crate::blocks::{
    crop_plane, interleave_planes, pad_plane, padded_dimensions, read_block, write_block
};
use crate::constants::{BLOCK_AREA, BLOCK_SIZE, CHANNELS, ZIGZAG_ORDER, ZIGZAG_RANK};
use crate::dct::Dct8;
use crate::errors::Mc2EncodeErrors;
use crate::quantize::{dequantize_block, quantize_block};

/// Transform and quantise the residual of one channel.
///
/// Returns the channel's coefficients, `block count * 64` values in
/// block row major order, each block zig-zag flattened.
pub(crate) fn encode_channel(
    original: &[f32], upscaled_base: &[f32], width: usize, height: usize,
    matrix: &[f64; BLOCK_AREA], dct: &Dct8
) -> Result<Vec<i16>, Mc2EncodeErrors> {
    let residual: Vec<f32> = original
        .iter()
        .zip(upscaled_base.iter())
        .map(|(orig, base)| orig - base)
        .collect();

    let padded = pad_plane(&residual, width, height);
    let (padded_w, padded_h) = padded_dimensions(width, height);

    let mut coefficients =
        Vec::with_capacity((padded_w / BLOCK_SIZE) * (padded_h / BLOCK_SIZE) * BLOCK_AREA);

    let mut block = [0.0_f64; BLOCK_AREA];
    let mut freq = [0.0_f64; BLOCK_AREA];

    for y in (0..padded_h).step_by(BLOCK_SIZE) {
        for x in (0..padded_w).step_by(BLOCK_SIZE) {
            read_block(&padded, padded_w, x, y, &mut block);

            dct.forward(&block, &mut freq);

            let quantised = quantize_block(&freq, matrix)?;

            let mut scanned = [0_i16; BLOCK_AREA];

            for p in 0..BLOCK_AREA {
                scanned[ZIGZAG_RANK[p]] = quantised[p];
            }
            coefficients.extend_from_slice(&scanned);
        }
    }

    Ok(coefficients)
}

/// Rebuild one channel's residual plane from its coefficients.
pub(crate) fn decode_channel(
    coefficients: &[i16], width: usize, height: usize, matrix: &[f64; BLOCK_AREA], dct: &Dct8
) -> Vec<f32> {
    let (padded_w, padded_h) = padded_dimensions(width, height);
    let mut padded = vec![0.0_f32; padded_w * padded_h];

    let mut scattered = [0.0_f64; BLOCK_AREA];
    let mut spatial = [0.0_f64; BLOCK_AREA];

    let mut blocks = coefficients.chunks_exact(BLOCK_AREA);

    for y in (0..padded_h).step_by(BLOCK_SIZE) {
        for x in (0..padded_w).step_by(BLOCK_SIZE) {
            // chunk count is validated against the dimensions upstream
            let Some(flat) = blocks.next() else { break };

            for k in 0..BLOCK_AREA {
                scattered[ZIGZAG_ORDER[k]] = f64::from(flat[k]);
            }

            let freq = dequantize_block(&scattered, matrix);

            dct.inverse(&freq, &mut spatial);

            write_block(&mut padded, padded_w, x, y, &spatial);
        }
    }

    crop_plane(&padded, padded_w, width, height)
}

/// Add residual planes onto the upscaled base and clamp the sum into an
/// interleaved RGB8 buffer.
pub(crate) fn reconstruct(
    upscaled_base: &[Vec<f32>; CHANNELS], residuals: &[Vec<f32>; CHANNELS]
) -> Vec<u8> {
    let mut planes: [Vec<u8>; CHANNELS] = [Vec::new(), Vec::new(), Vec::new()];

    for c in 0..CHANNELS {
        planes[c] = upscaled_base[c]
            .iter()
            .zip(residuals[c].iter())
            .map(|(base, residual)| (base + residual).round().clamp(0.0, 255.0) as u8)
            .collect();
    }

    interleave_planes(&planes)
}
