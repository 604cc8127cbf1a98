use imgcorrupt_image::{ops, Image, ImageError};

/// Scale an 8-bit image to [0, 1].
pub(crate) fn to_unit<const C: usize>(image: &Image<u8, C>) -> Result<Image<f32, C>, ImageError> {
    image.cast_and_scale::<f32>(1.0 / 255.0)
}

/// Scale an 8-bit image to [0, 1] in double precision, dividing every sample by 255.
pub(crate) fn to_unit_f64<const C: usize>(image: &Image<u8, C>) -> Image<f64, C> {
    image.map(|&v| f64::from(v) / 255.0)
}

/// Clip a [0, 1] image and scale it back to [0, 255], in place.
pub(crate) fn to_byte_scale<const C: usize>(mut image: Image<f32, C>) -> Image<f32, C> {
    ops::clip_and_scale_inplace(&mut image, 0.0, 1.0, 255.0);
    image
}
