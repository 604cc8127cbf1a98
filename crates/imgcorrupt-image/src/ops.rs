use crate::{Image, ImageError};

/// How floating point samples are turned into 8-bit samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Drop the fractional part, as an integer cast does.
    Truncate,
    /// Round to the nearest integer.
    Nearest,
}

fn check_same_size<T, U, const C: usize>(
    src: &Image<T, C>,
    dst: &Image<U, C>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }
    Ok(())
}

/// Clip every sample to `[min, max]` and multiply it by `scale`, in place.
///
/// # Example
///
/// ```
/// use imgcorrupt_image::{ops, Image, ImageSize};
///
/// let mut image = Image::<f64, 1>::new(
///     ImageSize {
///         width: 4,
///         height: 1,
///     },
///     vec![-0.5, 0.0, 0.5, 1.5],
/// )
/// .unwrap();
///
/// ops::clip_and_scale_inplace(&mut image, 0.0, 1.0, 255.0);
///
/// assert_eq!(image.as_slice(), &[0.0, 0.0, 127.5, 255.0]);
/// ```
pub fn clip_and_scale_inplace<T, const C: usize>(image: &mut Image<T, C>, min: T, max: T, scale: T)
where
    T: num_traits::Float,
{
    image
        .as_slice_mut()
        .iter_mut()
        .for_each(|x| *x = x.max(min).min(max) * scale);
}

/// Convert a floating point image on the [0, 255] scale to 8 bits.
///
/// Samples are clamped to [0, 255] before rounding.
pub fn quantize_u8<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<u8, C>,
    rounding: Rounding,
) -> Result<(), ImageError>
where
    T: Copy + Into<f64>,
{
    check_same_size(src, dst)?;

    dst.as_slice_mut()
        .iter_mut()
        .zip(src.as_slice().iter())
        .for_each(|(out, &inp)| {
            let x: f64 = inp.into();
            let x = x.clamp(0.0, 255.0);
            *out = match rounding {
                Rounding::Truncate => x as u8,
                Rounding::Nearest => x.round() as u8,
            };
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImageSize;

    #[test]
    fn test_clip_and_scale_inplace() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 4,
            height: 1,
        };
        let mut image = Image::<f32, 1>::new(size, vec![-0.5, 0.0, 0.5, 1.5])?;
        clip_and_scale_inplace(&mut image, 0.0, 1.0, 255.0);
        assert_eq!(image.as_slice(), &[0.0, 0.0, 127.5, 255.0]);

        Ok(())
    }

    #[test]
    fn test_quantize_u8() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 4,
            height: 1,
        };
        let src = Image::<f32, 1>::new(size, vec![-3.0, 127.6, 254.99, 300.0])?;
        let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;

        quantize_u8(&src, &mut dst, Rounding::Truncate)?;
        assert_eq!(dst.as_slice(), &[0, 127, 254, 255]);

        quantize_u8(&src, &mut dst, Rounding::Nearest)?;
        assert_eq!(dst.as_slice(), &[0, 128, 255, 255]);

        Ok(())
    }

    #[test]
    fn test_quantize_u8_double_precision() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 3,
            height: 1,
        };
        // 254.99999999 rounds to 255.0 as f32 but must still truncate to 254
        let src = Image::<f64, 1>::new(size, vec![254.99999999, 255.0, 127.5])?;
        let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;

        quantize_u8(&src, &mut dst, Rounding::Truncate)?;
        assert_eq!(dst.as_slice(), &[254, 255, 127]);

        Ok(())
    }

    #[test]
    fn test_size_mismatch() -> Result<(), ImageError> {
        let src = Image::<f32, 1>::from_size_val([2, 2].into(), 0.0)?;
        let mut dst = Image::<u8, 1>::from_size_val([3, 2].into(), 0)?;
        assert_eq!(
            quantize_u8(&src, &mut dst, Rounding::Nearest),
            Err(ImageError::InvalidImageSize(2, 2, 3, 2))
        );

        Ok(())
    }
}
