/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Quality scaled quantisation of residual coefficients

use crate::constants::BLOCK_AREA;
use crate::errors::Mc2EncodeErrors;

/// Base quantisation table, the baseline JPEG luma table.
///
/// Residual channels are all treated alike, so the one table serves
/// every channel.
#[rustfmt::skip]
pub(crate) const BASE_QUANT_TABLE: [i32; BLOCK_AREA] = [
    16,  11,  10,  16,  24,  40,  51,  61,
    12,  12,  14,  19,  26,  58,  60,  55,
    14,  13,  16,  24,  40,  57,  69,  56,
    14,  17,  22,  29,  51,  87,  80,  62,
    18,  22,  37,  56,  68, 109, 103,  77,
    24,  35,  55,  64,  81, 104, 113,  92,
    49,  64,  78,  87, 103, 121, 120, 101,
    72,  92,  95,  98, 112, 100, 103,  99
];

/// Derive the quantisation matrix for a quality factor.
///
/// Follows the JPEG scaling rule pivoted at 50: qualities below 50 scale
/// the base table up by `50 / q`, qualities above scale it down by
/// `2 - q / 50`. Every cell is rounded and clamped to `[1, 255]`, so
/// quality 100 degenerates to an all-ones matrix (residuals survive
/// quantisation exactly).
///
/// Encoder and decoder derive the matrix through this one function, which
/// keeps the two sides bit identical for a given quality.
pub(crate) fn quant_matrix(quality: u8) -> [f64; BLOCK_AREA] {
    let quality = f64::from(quality);

    let scale = if quality < 50.0 {
        50.0 / quality
    } else {
        2.0 - quality / 50.0
    };

    let mut matrix = [0.0_f64; BLOCK_AREA];

    for (cell, base) in matrix.iter_mut().zip(BASE_QUANT_TABLE.iter()) {
        *cell = (f64::from(*base) * scale).round().clamp(1.0, 255.0);
    }
    matrix
}

/// Quantise one frequency block, `round(coeff / q)` per cell with half
/// rounding away from zero.
///
/// The payload stores coefficients as `i16`, a result outside that range
/// aborts the encode rather than wrapping.
pub(crate) fn quantize_block(
    freq: &[f64; BLOCK_AREA], matrix: &[f64; BLOCK_AREA]
) -> Result<[i16; BLOCK_AREA], Mc2EncodeErrors> {
    let mut out = [0_i16; BLOCK_AREA];

    for i in 0..BLOCK_AREA {
        let value = (freq[i] / matrix[i]).round();

        if value < f64::from(i16::MIN) || value > f64::from(i16::MAX) {
            return Err(Mc2EncodeErrors::CoefficientOverflow(value));
        }
        out[i] = value as i16;
    }
    Ok(out)
}

/// Undo [`quantize_block`], returning the frequency block as floats.
pub(crate) fn dequantize_block(
    quantised: &[f64; BLOCK_AREA], matrix: &[f64; BLOCK_AREA]
) -> [f64; BLOCK_AREA] {
    let mut out = [0.0_f64; BLOCK_AREA];

    for i in 0..BLOCK_AREA {
        out[i] = quantised[i] * matrix[i];
    }
    out
}
