use fast_image_resize as fr;
use imgcorrupt_image::{Image, ImageError};

fn pixel_type<const C: usize>() -> Result<fr::PixelType, ImageError> {
    match C {
        1 => Ok(fr::PixelType::U8),
        2 => Ok(fr::PixelType::U8x2),
        3 => Ok(fr::PixelType::U8x3),
        4 => Ok(fr::PixelType::U8x4),
        _ => Err(ImageError::CastError(format!("fast_image_resize U8x{C}"))),
    }
}

/// Resize an 8-bit image with a box (area) filter.
///
/// The output size is taken from `dst`. Downscaling averages every source pixel
/// covered by a destination pixel; upscaling replicates source pixels.
///
/// # Arguments
///
/// * `src` - The input image container.
/// * `dst` - The output image container.
///
/// # Example
///
/// ```
/// use imgcorrupt_image::{Image, ImageSize};
/// use imgcorrupt_imgproc::resize::resize_box;
///
/// let image = Image::<u8, 3>::from_size_val(
///     ImageSize {
///         width: 4,
///         height: 4,
///     },
///     10,
/// )
/// .unwrap();
///
/// let mut small = Image::<u8, 3>::from_size_val(
///     ImageSize {
///         width: 2,
///         height: 2,
///     },
///     0,
/// )
/// .unwrap();
///
/// resize_box(&image, &mut small).unwrap();
///
/// assert!(small.as_slice().iter().all(|&v| v == 10));
/// ```
///
/// # Errors
///
/// The function returns an error if the image cannot be resized, including for
/// zero-sized images and channel counts above four.
pub fn resize_box<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
) -> Result<(), ImageError> {
    let pixel_type = pixel_type::<C>()?;

    let (src_width, src_height) = (src.width() as u32, src.height() as u32);
    let (dst_width, dst_height) = (dst.width() as u32, dst.height() as u32);
    let src_len = src.as_slice().len();
    let dst_len = dst.as_slice().len();

    if src_len == 0 || dst_len == 0 {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    let src_image = fr::images::ImageRef::new(src_width, src_height, src.as_slice(), pixel_type)
        .map_err(|_| ImageError::InvalidChannelShape(src_len, src_len))?;

    let mut dst_image =
        fr::images::Image::from_slice_u8(dst_width, dst_height, dst.as_slice_mut(), pixel_type)
            .map_err(|_| ImageError::InvalidChannelShape(dst_len, dst_len))?;

    let options =
        fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(fr::FilterType::Box));

    fr::Resizer::new()
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| ImageError::CastError(e.to_string()))?;

    Ok(())
}
