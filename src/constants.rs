/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Shared constants for the mcmp2 container and its coefficient layout

/// Magic bytes identifying an mcmp2 container.
pub const MC2_MAGIC: &[u8; 5] = b"MC2v1";

/// Side length of a coefficient block, the format only supports 8.
pub const BLOCK_SIZE: usize = 8;

/// Number of samples in one coefficient block.
pub const BLOCK_AREA: usize = BLOCK_SIZE * BLOCK_SIZE;

/// Number of interleaved channels, the format only supports RGB.
pub const CHANNELS: usize = 3;

/// Fixed byte length of the container header.
///
/// magic(5) + width(4) + height(4) + channels(1) + block size(1)
/// + down(1) + quality(1) + base length(8)
pub(crate) const HEADER_SIZE: usize = 25;

/// Zig-zag rank of each block sample in row major order.
///
/// `ZIGZAG_RANK[p]` is the position sample `p` takes in the scan.
#[rustfmt::skip]
pub(crate) const ZIGZAG_RANK: [usize; 64] = [
     0,  1,  5,  6, 14, 15, 27, 28,
     2,  4,  7, 13, 16, 26, 29, 42,
     3,  8, 12, 17, 25, 30, 41, 43,
     9, 11, 18, 24, 31, 40, 44, 53,
    10, 19, 23, 32, 39, 45, 52, 54,
    20, 22, 33, 38, 46, 51, 55, 60,
    21, 34, 37, 47, 50, 56, 59, 61,
    35, 36, 48, 49, 57, 58, 62, 63
];

/// Row major sample positions listed in zig-zag scan order.
///
/// Inverse permutation of [`ZIGZAG_RANK`], i.e.
/// `ZIGZAG_RANK[ZIGZAG_ORDER[k]] == k`.
#[rustfmt::skip]
pub(crate) const ZIGZAG_ORDER: [usize; 64] = [
     0,  1,  8, 16,  9,  2,  3, 10,
    17, 24, 32, 25, 18, 11,  4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13,  6,  7, 14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63
];
