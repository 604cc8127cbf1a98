use crate::parallel;
use imgcorrupt_image::{Image, ImageError};

fn check_same_size(src: &Image<f32, 3>, dst: &Image<f32, 3>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }
    Ok(())
}

/// Convert an RGB image to an HSV image.
///
/// The input image is assumed to have 3 channels in the order R, G, B, with
/// values in the range [0, 1].
///
/// # Returns
///
/// The HSV image with the following channels, all in the range [0, 1]:
///
/// * H: The hue channel, a fraction of a full turn.
/// * S: The saturation channel.
/// * V: The value channel.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use imgcorrupt_image::{Image, ImageSize};
/// use imgcorrupt_imgproc::color::hsv_from_rgb;
///
/// let image = Image::<f32, 3>::new(
///     ImageSize {
///         width: 1,
///         height: 1,
///     },
///     vec![1.0, 0.0, 0.0],
/// )
/// .unwrap();
///
/// let mut hsv = Image::<f32, 3>::from_size_val(image.size(), 0.0).unwrap();
///
/// hsv_from_rgb(&image, &mut hsv).unwrap();
///
/// assert_eq!(hsv.as_slice(), &[0.0, 1.0, 1.0]);
/// ```
pub fn hsv_from_rgb(src: &Image<f32, 3>, dst: &mut Image<f32, 3>) -> Result<(), ImageError> {
    check_same_size(src, dst)?;

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let (r, g, b) = (src_pixel[0], src_pixel[1], src_pixel[2]);

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        // blue wins over green wins over red when several channels hold the max
        let h = if delta == 0.0 {
            0.0
        } else {
            let sector = if b == max {
                4.0 + (r - g) / delta
            } else if g == max {
                2.0 + (b - r) / delta
            } else {
                (g - b) / delta
            };
            (sector / 6.0).rem_euclid(1.0)
        };

        let s = if max == 0.0 { 0.0 } else { delta / max };

        dst_pixel[0] = h;
        dst_pixel[1] = s;
        dst_pixel[2] = max;
    });

    Ok(())
}

/// Convert an HSV image to an RGB image.
///
/// Inverse of [`hsv_from_rgb`]: all channels in the range [0, 1].
pub fn rgb_from_hsv(src: &Image<f32, 3>, dst: &mut Image<f32, 3>) -> Result<(), ImageError> {
    check_same_size(src, dst)?;

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let (h, s, v) = (src_pixel[0], src_pixel[1], src_pixel[2]);

        let h6 = h * 6.0;
        let sector = h6.floor();
        let f = h6 - sector;

        let p = v * (1.0 - s);
        let q = v * (1.0 - f * s);
        let t = v * (1.0 - (1.0 - f) * s);

        let (r, g, b) = match (sector as i64).rem_euclid(6) {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };

        dst_pixel[0] = r;
        dst_pixel[1] = g;
        dst_pixel[2] = b;
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgcorrupt_image::ImageSize;

    #[test]
    fn hsv_from_rgb_primaries() -> Result<(), ImageError> {
        let image = Image::<f32, 3>::new(
            ImageSize {
                width: 4,
                height: 1,
            },
            vec![
                0.0, 1.0, 0.0, // green
                0.0, 0.0, 1.0, // blue
                0.5, 0.5, 0.5, // gray
                0.0, 0.0, 0.0, // black
            ],
        )?;
        let mut hsv = Image::<f32, 3>::from_size_val(image.size(), 0.0)?;
        hsv_from_rgb(&image, &mut hsv)?;

        let expected: [f32; 12] = [
            1.0 / 3.0,
            1.0,
            1.0,
            2.0 / 3.0,
            1.0,
            1.0,
            0.0,
            0.0,
            0.5,
            0.0,
            0.0,
            0.0,
        ];
        for (a, b) in hsv.as_slice().iter().zip(expected.iter()) {
            approx::assert_relative_eq!(*a, *b, epsilon = 1e-6);
        }

        Ok(())
    }

    #[test]
    fn hsv_round_trip() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 5,
            height: 4,
        };
        let data = (0..size.width * size.height * 3)
            .map(|i| ((i * 29) % 256) as f32 / 255.0)
            .collect();
        let image = Image::<f32, 3>::new(size, data)?;

        let mut hsv = Image::<f32, 3>::from_size_val(size, 0.0)?;
        hsv_from_rgb(&image, &mut hsv)?;
        let mut rgb = Image::<f32, 3>::from_size_val(size, 0.0)?;
        rgb_from_hsv(&hsv, &mut rgb)?;

        for (a, b) in rgb.as_slice().iter().zip(image.as_slice()) {
            approx::assert_relative_eq!(*a, *b, epsilon = 1e-5);
        }

        Ok(())
    }
}
