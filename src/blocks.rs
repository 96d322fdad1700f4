/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Raster geometry helpers
//!
//! Splitting interleaved RGB into planes and back, padding planes out to
//! 8x8 multiples and walking them block by block in row major order.
//! Block order is part of the wire contract, the coefficient arrays are
//! stored in exactly the order these helpers emit.

use crate::constants::{BLOCK_AREA, BLOCK_SIZE, CHANNELS};

/// Pad `width` and `height` up to the next multiple of the block size.
pub(crate) const fn padded_dimensions(width: usize, height: usize) -> (usize, usize) {
    (
        width.div_ceil(BLOCK_SIZE) * BLOCK_SIZE,
        height.div_ceil(BLOCK_SIZE) * BLOCK_SIZE
    )
}

/// Number of 8x8 blocks a `width` x `height` plane tiles into.
pub(crate) const fn block_count(width: usize, height: usize) -> usize {
    width.div_ceil(BLOCK_SIZE) * height.div_ceil(BLOCK_SIZE)
}

/// Split an interleaved RGB byte buffer into three float planes.
pub(crate) fn split_planes(rgb: &[u8], width: usize, height: usize) -> [Vec<f32>; CHANNELS] {
    let size = width * height;
    let mut planes = [
        vec![0.0_f32; size],
        vec![0.0_f32; size],
        vec![0.0_f32; size]
    ];

    for (i, px) in rgb.chunks_exact(CHANNELS).enumerate() {
        planes[0][i] = f32::from(px[0]);
        planes[1][i] = f32::from(px[1]);
        planes[2][i] = f32::from(px[2]);
    }
    planes
}

/// Interleave three same sized byte planes into one RGB buffer.
pub(crate) fn interleave_planes(planes: &[Vec<u8>; CHANNELS]) -> Vec<u8> {
    let size = planes[0].len();
    let mut rgb = vec![0_u8; size * CHANNELS];

    for (i, px) in rgb.chunks_exact_mut(CHANNELS).enumerate() {
        px[0] = planes[0][i];
        px[1] = planes[1][i];
        px[2] = planes[2][i];
    }
    rgb
}

/// Copy a plane into a zero filled buffer padded to block multiples.
///
/// The plane sits at the top left, padding rows and columns stay zero
/// so padding blocks quantise to nothing.
pub(crate) fn pad_plane(plane: &[f32], width: usize, height: usize) -> Vec<f32> {
    let (padded_w, padded_h) = padded_dimensions(width, height);
    let mut padded = vec![0.0_f32; padded_w * padded_h];

    for (src, dst) in plane
        .chunks_exact(width)
        .zip(padded.chunks_exact_mut(padded_w))
    {
        dst[..width].copy_from_slice(src);
    }
    padded
}

/// Return the top left `width` x `height` crop of a padded plane.
pub(crate) fn crop_plane(
    padded: &[f32], padded_width: usize, width: usize, height: usize
) -> Vec<f32> {
    let mut plane = vec![0.0_f32; width * height];

    for (src, dst) in padded
        .chunks_exact(padded_width)
        .zip(plane.chunks_exact_mut(width))
    {
        dst.copy_from_slice(&src[..width]);
    }
    plane
}

/// Copy the 8x8 block whose top left corner is `(x, y)` out of a padded
/// plane, widening samples to `f64` for the transform.
pub(crate) fn read_block(
    padded: &[f32], padded_width: usize, x: usize, y: usize, block: &mut [f64; BLOCK_AREA]
) {
    for row in 0..BLOCK_SIZE {
        let offset = (y + row) * padded_width + x;

        for col in 0..BLOCK_SIZE {
            block[row * BLOCK_SIZE + col] = f64::from(padded[offset + col]);
        }
    }
}

/// Write an 8x8 block back into a padded plane at `(x, y)`.
pub(crate) fn write_block(
    padded: &mut [f32], padded_width: usize, x: usize, y: usize, block: &[f64; BLOCK_AREA]
) {
    for row in 0..BLOCK_SIZE {
        let offset = (y + row) * padded_width + x;

        for col in 0..BLOCK_SIZE {
            padded[offset + col] = block[row * BLOCK_SIZE + col] as f32;
        }
    }
}
