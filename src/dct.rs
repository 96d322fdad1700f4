/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Orthonormal 8x8 DCT pair
//!
//! The residual layer needs the orthonormal variant so a forward then
//! inverse transform reproduces the block without extra scaling, so this
//! is a straight separable matrix transform over `f64` rather than a
//! scaled fast DCT whose factors would have to be folded into the
//! quantiser.

use core::f64::consts::PI;

use crate::constants::{BLOCK_AREA, BLOCK_SIZE};

/// Precomputed cosine basis for the 8x8 type-II / type-III DCT pair.
///
/// `basis[u][x] = alpha(u) * cos((2x + 1) * u * pi / 16)` with
/// `alpha(0) = sqrt(1/8)` and `alpha(u) = 1/2` otherwise.
pub(crate) struct Dct8 {
    basis: [[f64; BLOCK_SIZE]; BLOCK_SIZE]
}

impl Dct8 {
    pub fn new() -> Dct8 {
        let mut basis = [[0.0_f64; BLOCK_SIZE]; BLOCK_SIZE];

        for u in 0..BLOCK_SIZE {
            let alpha = if u == 0 {
                (1.0 / BLOCK_SIZE as f64).sqrt()
            } else {
                (2.0 / BLOCK_SIZE as f64).sqrt()
            };

            for x in 0..BLOCK_SIZE {
                let angle = ((2 * x + 1) as f64) * (u as f64) * PI / ((2 * BLOCK_SIZE) as f64);

                basis[u][x] = alpha * angle.cos();
            }
        }

        Dct8 { basis }
    }

    /// Forward 2D transform, rows then columns.
    pub fn forward(&self, block: &[f64; BLOCK_AREA], out: &mut [f64; BLOCK_AREA]) {
        let mut tmp = [0.0_f64; BLOCK_AREA];

        // row pass
        for y in 0..BLOCK_SIZE {
            for u in 0..BLOCK_SIZE {
                let mut acc = 0.0;

                for x in 0..BLOCK_SIZE {
                    acc += self.basis[u][x] * block[y * BLOCK_SIZE + x];
                }
                tmp[y * BLOCK_SIZE + u] = acc;
            }
        }
        // column pass
        for u in 0..BLOCK_SIZE {
            for v in 0..BLOCK_SIZE {
                let mut acc = 0.0;

                for y in 0..BLOCK_SIZE {
                    acc += self.basis[v][y] * tmp[y * BLOCK_SIZE + u];
                }
                out[v * BLOCK_SIZE + u] = acc;
            }
        }
    }

    /// Inverse 2D transform, undoes [`forward`](Self::forward).
    pub fn inverse(&self, block: &[f64; BLOCK_AREA], out: &mut [f64; BLOCK_AREA]) {
        let mut tmp = [0.0_f64; BLOCK_AREA];

        // column pass
        for u in 0..BLOCK_SIZE {
            for y in 0..BLOCK_SIZE {
                let mut acc = 0.0;

                for v in 0..BLOCK_SIZE {
                    acc += self.basis[v][y] * block[v * BLOCK_SIZE + u];
                }
                tmp[y * BLOCK_SIZE + u] = acc;
            }
        }
        // row pass
        for y in 0..BLOCK_SIZE {
            for x in 0..BLOCK_SIZE {
                let mut acc = 0.0;

                for u in 0..BLOCK_SIZE {
                    acc += self.basis[u][x] * tmp[y * BLOCK_SIZE + u];
                }
                out[y * BLOCK_SIZE + x] = acc;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use nanorand::Rng;

    use crate::dct::Dct8;

    #[test]
    fn forward_then_inverse_is_identity() {
        let mut rng = nanorand::WyRand::new_seed(0x5eed);
        let dct = Dct8::new();

        for _ in 0..100 {
            let mut block = [0.0_f64; 64];

            for value in &mut block {
                // residuals live in [-255, 255]
                *value = f64::from(rng.generate::<u16>() % 511) - 255.0;
            }

            let mut freq = [0.0_f64; 64];
            let mut back = [0.0_f64; 64];

            dct.forward(&block, &mut freq);
            dct.inverse(&freq, &mut back);

            for (a, b) in block.iter().zip(back.iter()) {
                assert!((a - b).abs() <= 1e-6, "roundtrip drifted: {a} vs {b}");
            }
        }
    }

    #[test]
    fn constant_block_collapses_to_dc() {
        let dct = Dct8::new();
        let block = [13.0_f64; 64];
        let mut freq = [0.0_f64; 64];

        dct.forward(&block, &mut freq);

        // orthonormal DC gain over both axes is 8
        assert!((freq[0] - 13.0 * 8.0).abs() < 1e-9);

        for value in &freq[1..] {
            assert!(value.abs() < 1e-9);
        }
    }

    #[test]
    fn transform_is_linear() {
        let dct = Dct8::new();

        let a: [f64; 64] = core::array::from_fn(|i| i as f64);
        let b: [f64; 64] = core::array::from_fn(|i| (64 - i) as f64 * 0.5);
        let sum: [f64; 64] = core::array::from_fn(|i| a[i] + b[i]);

        let mut fa = [0.0_f64; 64];
        let mut fb = [0.0_f64; 64];
        let mut fsum = [0.0_f64; 64];

        dct.forward(&a, &mut fa);
        dct.forward(&b, &mut fb);
        dct.forward(&sum, &mut fsum);

        for i in 0..64 {
            assert!((fa[i] + fb[i] - fsum[i]).abs() < 1e-9);
        }
    }
}
