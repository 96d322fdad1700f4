/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The lossless base layer
//!
//! The base layer is the image shrunk by the downsample factor and stored
//! as an ordinary RGB8 PNG inside the container. The codec treats the PNG
//! bytes as opaque, encoding goes through the `png` crate and decoding
//! through `zune-png`.
//!
//! Residuals are computed against the base layer *as stored*, meaning the
//! 8 bit samples that survive the PNG round trip, upscaled with the cubic
//! filter. The decoder sees exactly those samples, so the upscaled base
//! matches on both sides and the residual cancels.

use zune_core::colorspace::ColorSpace;
use zune_core::result::DecodingResult;
use zune_png::PngDecoder;

use crate::blocks::split_planes;
use crate::constants::CHANNELS;
use crate::errors::{Mc2DecodeErrors, Mc2EncodeErrors};
use crate::resample::{resize_plane, ResampleFilter};

/// Base layer dimensions for a full resolution image, truncating
/// division floored at 1.
pub(crate) const fn base_dimensions(width: usize, height: usize, down: u8) -> (usize, usize) {
    let down = down as usize;
    let base_w = if width / down == 0 { 1 } else { width / down };
    let base_h = if height / down == 0 { 1 } else { height / down };

    (base_w, base_h)
}

/// Encode the base layer.
///
/// Returns the PNG bytes to embed and the base layer upscaled back to
/// full resolution, one float plane per channel, ready for residual
/// computation.
pub(crate) fn encode_base_layer(
    rgb: &[u8], width: usize, height: usize, down: u8
) -> Result<(Vec<u8>, [Vec<f32>; CHANNELS]), Mc2EncodeErrors> {
    let (base_w, base_h) = base_dimensions(width, height, down);

    let planes = split_planes(rgb, width, height);

    // shrink each plane and snap it to the 8 bit samples PNG will store
    let mut base_planes: [Vec<f32>; CHANNELS] = [Vec::new(), Vec::new(), Vec::new()];
    let mut base_rgb = vec![0_u8; base_w * base_h * CHANNELS];

    for (c, plane) in planes.iter().enumerate() {
        let shrunk = resize_plane(plane, width, height, base_w, base_h, ResampleFilter::Lanczos3);

        let mut stored = Vec::with_capacity(shrunk.len());

        for (i, value) in shrunk.iter().enumerate() {
            let sample = value.round().clamp(0.0, 255.0) as u8;

            base_rgb[i * CHANNELS + c] = sample;
            stored.push(f32::from(sample));
        }
        base_planes[c] = stored;
    }

    let png_bytes = encode_png(&base_rgb, base_w, base_h)
        .map_err(|e| Mc2EncodeErrors::BaseLayer(format!("{e}")))?;

    trace!("Base layer {}x{}, {} bytes", base_w, base_h, png_bytes.len());

    let upscaled = upscale_planes(&base_planes, base_w, base_h, width, height);

    Ok((png_bytes, upscaled))
}

/// Decode the embedded base layer and upscale it to full resolution.
pub(crate) fn decode_base_layer(
    png_bytes: &[u8], width: usize, height: usize, down: u8
) -> Result<[Vec<f32>; CHANNELS], Mc2DecodeErrors> {
    let (base_w, base_h) = base_dimensions(width, height, down);

    let mut decoder = PngDecoder::new(png_bytes);

    let pixels = match decoder.decode()? {
        DecodingResult::U8(pixels) => pixels,
        DecodingResult::U16(_) => {
            return Err(Mc2DecodeErrors::BaseLayerMismatch(
                "expected an 8 bit base layer, found 16 bit".to_string()
            ));
        }
    };

    let colorspace = decoder.get_colorspace();

    if colorspace != Some(ColorSpace::RGB) {
        return Err(Mc2DecodeErrors::BaseLayerMismatch(format!(
            "expected an RGB base layer, found {colorspace:?}"
        )));
    }

    if decoder.get_dimensions() != Some((base_w, base_h)) {
        return Err(Mc2DecodeErrors::BaseLayerMismatch(format!(
            "expected a {}x{} base layer, found {:?}",
            base_w,
            base_h,
            decoder.get_dimensions()
        )));
    }

    if pixels.len() != base_w * base_h * CHANNELS {
        return Err(Mc2DecodeErrors::BaseLayerMismatch(format!(
            "expected {} base layer bytes, found {}",
            base_w * base_h * CHANNELS,
            pixels.len()
        )));
    }

    let base_planes = split_planes(&pixels, base_w, base_h);

    Ok(upscale_planes(&base_planes, base_w, base_h, width, height))
}

fn upscale_planes(
    planes: &[Vec<f32>; CHANNELS], base_w: usize, base_h: usize, width: usize, height: usize
) -> [Vec<f32>; CHANNELS] {
    [
        resize_plane(&planes[0], base_w, base_h, width, height, ResampleFilter::Bicubic),
        resize_plane(&planes[1], base_w, base_h, width, height, ResampleFilter::Bicubic),
        resize_plane(&planes[2], base_w, base_h, width, height, ResampleFilter::Bicubic)
    ]
}

/// Encode an interleaved RGB8 buffer as a PNG.
///
/// Also used by the decoder to hand back the reconstruction in the
/// container's own lossless raster format.
pub(crate) fn encode_png(
    rgb: &[u8], width: usize, height: usize
) -> Result<Vec<u8>, png::EncodingError> {
    let mut out = Vec::new();

    {
        let mut encoder = png::Encoder::new(&mut out, width as u32, height as u32);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgb)?;
        writer.finish()?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use crate::base::{base_dimensions, decode_base_layer, encode_base_layer, encode_png};
    use crate::errors::Mc2DecodeErrors;

    #[test]
    fn base_dimensions_truncate_and_floor_at_one() {
        assert_eq!(base_dimensions(8, 8, 2), (4, 4));
        assert_eq!(base_dimensions(13, 9, 2), (6, 4));
        assert_eq!(base_dimensions(5, 5, 8), (1, 1));
        assert_eq!(base_dimensions(1, 1, 1), (1, 1));
    }

    #[test]
    fn encoded_base_layer_decodes_to_matching_planes() {
        let width = 16;
        let height = 12;
        let rgb: Vec<u8> = (0..width * height * 3).map(|i| (i % 256) as u8).collect();

        let (png_bytes, upscaled_enc) = encode_base_layer(&rgb, width, height, 2).unwrap();
        let upscaled_dec = decode_base_layer(&png_bytes, width, height, 2).unwrap();

        // both sides must see the identical upscaled base
        for c in 0..3 {
            assert_eq!(upscaled_enc[c], upscaled_dec[c], "channel {c} diverged");
        }
    }

    #[test]
    fn solid_base_layer_survives_the_round_trip_exactly() {
        let width = 9;
        let height = 7;
        let mut rgb = vec![0_u8; width * height * 3];

        for px in rgb.chunks_exact_mut(3) {
            px[0] = 200;
            px[1] = 40;
            px[2] = 90;
        }

        let (_, upscaled) = encode_base_layer(&rgb, width, height, 2).unwrap();

        for (c, expected) in [200.0_f32, 40.0, 90.0].iter().enumerate() {
            for value in &upscaled[c] {
                assert!((value - expected).abs() < 0.75, "channel {c}: {value}");
            }
        }
    }

    #[test]
    fn garbage_base_layer_is_rejected() {
        let err = decode_base_layer(b"definitely not a png", 8, 8, 2).unwrap_err();
        assert!(matches!(err, Mc2DecodeErrors::BaseLayer(_)));
    }

    #[test]
    fn wrong_dimensions_are_rejected() {
        // a valid PNG of the wrong size
        let rgb = vec![128_u8; 3 * 3 * 3];
        let png_bytes = encode_png(&rgb, 3, 3).unwrap();

        let err = decode_base_layer(&png_bytes, 100, 100, 2).unwrap_err();
        assert!(matches!(err, Mc2DecodeErrors::BaseLayerMismatch(_)));
    }
}
