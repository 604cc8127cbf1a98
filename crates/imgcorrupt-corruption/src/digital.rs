use image::{codecs::jpeg::JpegEncoder, ExtendedColorType, ImageFormat};
use imgcorrupt_image::{Image, ImageSize};
use imgcorrupt_imgproc::{
    color::{hsv_from_rgb, rgb_from_hsv},
    resize::resize_box,
};

use crate::{
    error::CorruptionError,
    severity::{Severity, SeverityTable},
    unit::{to_byte_scale, to_unit},
};

/// Contrast factor around the channel mean per severity.
pub const CONTRAST_FACTOR: SeverityTable<f32> = [0.4, 0.3, 0.2, 0.1, 0.05];

/// Offset added to the HSV value channel per severity.
pub const BRIGHTNESS_OFFSET: SeverityTable<f32> = [0.1, 0.2, 0.3, 0.4, 0.5];

/// Gain and offset of the HSV saturation channel per severity.
pub const SATURATE_PARAMS: SeverityTable<(f32, f32)> =
    [(0.3, 0.0), (0.1, 0.0), (2.0, 0.0), (5.0, 0.1), (20.0, 0.2)];

/// Fraction of the side length kept by the pixelation downscale per severity.
pub const PIXELATE_FACTOR: SeverityTable<f32> = [0.6, 0.5, 0.4, 0.3, 0.25];

/// JPEG quality per severity.
pub const JPEG_QUALITY: SeverityTable<u8> = [25, 18, 15, 10, 7];

fn require_channels<const C: usize>(name: &str, allowed: &[usize]) -> Result<(), CorruptionError> {
    if allowed.contains(&C) {
        Ok(())
    } else {
        Err(CorruptionError::UnsupportedChannels {
            name: name.to_string(),
            channels: C,
        })
    }
}

/// Pull every channel towards its mean.
pub fn contrast<const C: usize>(
    image: &Image<u8, C>,
    severity: Severity,
) -> Result<Image<f32, C>, CorruptionError> {
    let factor = severity.select(&CONTRAST_FACTOR);
    let mut unit = to_unit(image)?;

    let num_pixels = (unit.width() * unit.height()).max(1) as f32;
    let mut means = [0.0f32; C];
    for pixel in unit.as_slice().chunks_exact(C) {
        for (mean, &v) in means.iter_mut().zip(pixel) {
            *mean += v;
        }
    }
    means.iter_mut().for_each(|m| *m /= num_pixels);

    for pixel in unit.as_slice_mut().chunks_exact_mut(C) {
        for (v, &mean) in pixel.iter_mut().zip(means.iter()) {
            *v = (*v - mean) * factor + mean;
        }
    }

    Ok(to_byte_scale(unit))
}

// Runs `f` over the HSV pixels of an RGB image, on the [0, 1] scale.
fn adjust_hsv<const C: usize>(
    name: &str,
    image: &Image<u8, C>,
    f: impl Fn(&mut [f32]),
) -> Result<Image<f32, C>, CorruptionError> {
    require_channels::<C>(name, &[3])?;

    let rgb = Image::<f32, 3>::new(image.size(), to_unit(image)?.into_vec())?;
    let mut hsv = Image::<f32, 3>::from_size_val(rgb.size(), 0.0)?;
    hsv_from_rgb(&rgb, &mut hsv)?;

    hsv.as_slice_mut().chunks_exact_mut(3).for_each(f);

    let mut out = Image::<f32, 3>::from_size_val(rgb.size(), 0.0)?;
    rgb_from_hsv(&hsv, &mut out)?;

    Ok(to_byte_scale(Image::new(out.size(), out.into_vec())?))
}

/// Raise the HSV value of an RGB image.
pub fn brightness<const C: usize>(
    image: &Image<u8, C>,
    severity: Severity,
) -> Result<Image<f32, C>, CorruptionError> {
    let offset = severity.select(&BRIGHTNESS_OFFSET);
    adjust_hsv("brightness", image, |hsv| {
        hsv[2] = (hsv[2] + offset).clamp(0.0, 1.0);
    })
}

/// Scale the HSV saturation of an RGB image.
pub fn saturate<const C: usize>(
    image: &Image<u8, C>,
    severity: Severity,
) -> Result<Image<f32, C>, CorruptionError> {
    let (gain, offset) = severity.select(&SATURATE_PARAMS);
    adjust_hsv("saturate", image, |hsv| {
        hsv[1] = (hsv[1] * gain + offset).clamp(0.0, 1.0);
    })
}

/// Downscale with a box filter and upscale back to the original size.
pub fn pixelate<const C: usize>(
    image: &Image<u8, C>,
    severity: Severity,
) -> Result<Image<f32, C>, CorruptionError> {
    require_channels::<C>("pixelate", &[1, 2, 3, 4])?;
    let factor = severity.select(&PIXELATE_FACTOR);

    let small_size = ImageSize {
        width: ((image.width() as f32 * factor) as usize).max(1),
        height: ((image.height() as f32 * factor) as usize).max(1),
    };
    let mut small = Image::<u8, C>::from_size_val(small_size, 0)?;
    resize_box(image, &mut small)?;

    let mut restored = Image::<u8, C>::from_size_val(image.size(), 0)?;
    resize_box(&small, &mut restored)?;

    Ok(restored.map(|&v| v as f32))
}

/// Encode as a low quality JPEG and decode it again.
pub fn jpeg_compression<const C: usize>(
    image: &Image<u8, C>,
    severity: Severity,
) -> Result<Image<f32, C>, CorruptionError> {
    let color_type = match C {
        1 => ExtendedColorType::L8,
        3 => ExtendedColorType::Rgb8,
        _ => {
            return Err(CorruptionError::UnsupportedChannels {
                name: "jpeg_compression".to_string(),
                channels: C,
            })
        }
    };
    let quality = severity.select(&JPEG_QUALITY);

    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality).encode(
        image.as_slice(),
        image.width() as u32,
        image.height() as u32,
        color_type,
    )?;

    let decoded = image::load_from_memory_with_format(&buffer, ImageFormat::Jpeg)?;
    let data = match C {
        1 => decoded.into_luma8().into_raw(),
        _ => decoded.into_rgb8().into_raw(),
    };

    Ok(Image::<u8, C>::new(image.size(), data)?.map(|&v| v as f32))
}
