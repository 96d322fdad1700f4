/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Separable convolution resampler for the base layer
//!
//! Kernels are precomputed per output position, clamped to the plane
//! edges and normalised to unit weight. When minifying, the kernel
//! support is widened by the scale ratio so the filter also acts as an
//! anti-alias lowpass.
//!
//! The encoder shrinks with Lanczos-3 and both sides grow the base back
//! with the a = -0.5 cubic. Residual cancellation depends on the two
//! sides growing through the same code path, so there is exactly one
//! implementation of each direction.

use core::f32::consts::PI;

/// Filter selection for [`resize_plane`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ResampleFilter {
    /// Lanczos windowed sinc, radius 3. Used to build the base layer.
    Lanczos3,
    /// Cubic with a = -0.5 (the Catmull-Rom end of the Mitchell
    /// family), radius 2. Used to grow the base layer back.
    Bicubic
}

impl ResampleFilter {
    fn kernel(self) -> (fn(f32) -> f32, f32) {
        match self {
            ResampleFilter::Lanczos3 => (lanczos3_kernel, 3.0),
            ResampleFilter::Bicubic => (|x| cubic_kernel(x, 0.0, 0.5), 2.0)
        }
    }
}

/// One output position's convolution window into the source axis.
struct ConvKernel {
    weights: Vec<f32>,
    start:   usize
}

fn precompute_kernels(
    in_size: usize, out_size: usize, filter: ResampleFilter
) -> Vec<ConvKernel> {
    let (kernel_fn, radius) = filter.kernel();

    let ratio = in_size as f32 / out_size as f32;
    // widen the window when shrinking so every source sample is heard
    let scale = ratio.max(1.0);
    let support = radius * scale;

    let mut kernels = Vec::with_capacity(out_size);

    for out_pos in 0..out_size {
        let src_pos = (out_pos as f32 + 0.5) * ratio - 0.5;

        let start = ((src_pos - support).floor() as i64).max(0) as usize;
        let end = ((src_pos + support).ceil() as i64).min(in_size as i64 - 1) as usize;
        let end = end.max(start);

        let mut weights = Vec::with_capacity(end - start + 1);
        let mut weight_sum = 0.0;

        for in_pos in start..=end {
            let distance = (in_pos as f32 - src_pos) / scale;
            let weight = kernel_fn(distance);

            weights.push(weight);
            weight_sum += weight;
        }

        if weight_sum != 0.0 {
            let inv_sum = 1.0 / weight_sum;

            for weight in &mut weights {
                *weight *= inv_sum;
            }
        }

        kernels.push(ConvKernel { weights, start });
    }

    kernels
}

fn convolve_rows(
    input: &[f32], in_width: usize, out_width: usize, rows: usize, kernels: &[ConvKernel]
) -> Vec<f32> {
    let mut output = vec![0.0_f32; rows * out_width];

    for (in_row, out_row) in input
        .chunks_exact(in_width)
        .zip(output.chunks_exact_mut(out_width))
    {
        for (out_pixel, kernel) in out_row.iter_mut().zip(kernels.iter()) {
            let window = &in_row[kernel.start..kernel.start + kernel.weights.len()];

            *out_pixel = window
                .iter()
                .zip(kernel.weights.iter())
                .map(|(&pixel, &weight)| pixel * weight)
                .sum::<f32>();
        }
    }
    output
}

fn convolve_columns(
    input: &[f32], width: usize, out_height: usize, kernels: &[ConvKernel]
) -> Vec<f32> {
    let mut output = vec![0.0_f32; out_height * width];

    for x in 0..width {
        for (out_y, kernel) in (0..out_height).zip(kernels.iter()) {
            let sum: f32 = kernel
                .weights
                .iter()
                .enumerate()
                .map(|(i, &weight)| input[(kernel.start + i) * width + x] * weight)
                .sum();

            output[out_y * width + x] = sum;
        }
    }
    output
}

/// Resample one plane to new dimensions.
///
/// Horizontal pass first, then vertical; axes already at their target
/// size are passed through untouched.
pub(crate) fn resize_plane(
    plane: &[f32], in_width: usize, in_height: usize, out_width: usize, out_height: usize,
    filter: ResampleFilter
) -> Vec<f32> {
    if in_width == out_width && in_height == out_height {
        return plane.to_vec();
    }

    let horizontal = if in_width == out_width {
        plane.to_vec()
    } else {
        let kernels = precompute_kernels(in_width, out_width, filter);
        convolve_rows(plane, in_width, out_width, in_height, &kernels)
    };

    if in_height == out_height {
        horizontal
    } else {
        let kernels = precompute_kernels(in_height, out_height, filter);
        convolve_columns(&horizontal, out_width, out_height, &kernels)
    }
}

#[inline]
fn lanczos3_kernel(x: f32) -> f32 {
    let x = x.abs();

    if x < 1e-6 {
        return 1.0;
    }

    if x < 3.0 {
        let pi_x = PI * x;
        let pi_x_a = pi_x / 3.0;
        (pi_x.sin() / pi_x) * (pi_x_a.sin() / pi_x_a)
    } else {
        0.0
    }
}

/// Mitchell-Netravali family cubic, parameterised by B and C.
#[inline]
fn cubic_kernel(x: f32, b: f32, c: f32) -> f32 {
    let x = x.abs();

    if x < 1.0 {
        let x2 = x * x;
        let x3 = x2 * x;
        ((12.0 - 9.0 * b - 6.0 * c) * x3 + (-18.0 + 12.0 * b + 6.0 * c) * x2 + (6.0 - 2.0 * b))
            / 6.0
    } else if x < 2.0 {
        let x2 = x * x;
        let x3 = x2 * x;
        ((-b - 6.0 * c) * x3
            + (6.0 * b + 30.0 * c) * x2
            + (-12.0 * b - 48.0 * c) * x
            + (8.0 * b + 24.0 * c))
            / 6.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use crate::resample::{resize_plane, ResampleFilter};

    #[test]
    fn identity_resize_copies() {
        let plane: Vec<f32> = (0..64).map(|i| i as f32).collect();

        let out = resize_plane(&plane, 8, 8, 8, 8, ResampleFilter::Lanczos3);
        assert_eq!(out, plane);
    }

    #[test]
    fn constant_plane_stays_constant() {
        let plane = vec![117.0_f32; 32 * 24];

        for filter in [ResampleFilter::Lanczos3, ResampleFilter::Bicubic] {
            let shrunk = resize_plane(&plane, 32, 24, 16, 12, filter);
            assert_eq!(shrunk.len(), 16 * 12);

            for value in &shrunk {
                assert!((value - 117.0).abs() < 1e-3, "shrink changed {value}");
            }

            let grown = resize_plane(&shrunk, 16, 12, 32, 24, filter);
            assert_eq!(grown.len(), 32 * 24);

            for value in &grown {
                assert!((value - 117.0).abs() < 1e-3, "grow changed {value}");
            }
        }
    }

    #[test]
    fn output_has_requested_dimensions() {
        let plane: Vec<f32> = (0..13 * 9).map(|i| i as f32).collect();

        let out = resize_plane(&plane, 13, 9, 6, 4, ResampleFilter::Lanczos3);
        assert_eq!(out.len(), 6 * 4);

        let out = resize_plane(&plane, 13, 9, 26, 18, ResampleFilter::Bicubic);
        assert_eq!(out.len(), 26 * 18);

        // single output pixel
        let out = resize_plane(&plane, 13, 9, 1, 1, ResampleFilter::Lanczos3);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn upscale_preserves_a_smooth_ramp() {
        // a linear ramp should survive cubic interpolation closely
        let width = 16;
        let plane: Vec<f32> = (0..width).map(|i| i as f32 * 10.0).collect();

        let out = resize_plane(&plane, width, 1, width * 2, 1, ResampleFilter::Bicubic);

        // interior samples follow the ramp
        for x in 4..width * 2 - 4 {
            let expected = ((x as f32 + 0.5) * 0.5 - 0.5) * 10.0;
            assert!(
                (out[x] - expected).abs() < 1.0,
                "x={x} got {} expected {expected}",
                out[x]
            );
        }
    }
}
