use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use imgcorrupt_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Represents an image with pixel data.
///
/// The pixel data is stored contiguously in row-major order with shape (H, W, C),
/// where H is the height of the image, W the width and C the number of channels.
/// The channel axis is always the last one.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const C: usize> {
    size: ImageSize,
    data: Vec<T>,
}

impl<T, const C: usize> Image<T, C> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use imgcorrupt_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     vec![0u8; 10 * 20 * 3],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        let expected = size.width * size.height * C;
        if data.len() != expected {
            return Err(ImageError::InvalidChannelShape(data.len(), expected));
        }

        Ok(Self { size, data })
    }

    /// Create a new image with the given size and all samples set to `val`.
    ///
    /// # Examples
    ///
    /// ```
    /// use imgcorrupt_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::from_size_val(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     0u8,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(image.as_slice().len(), 10 * 20 * 3);
    /// ```
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let data = vec![val; size.width * size.height * C];
        Image::new(size, data)
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        C
    }

    /// Get the pixel data as a flat slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the pixel data as a flat mutable slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the image and return the pixel data.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Get a sample by its `[row, col, channel]` index.
    pub fn get(&self, index: [usize; 3]) -> Option<&T> {
        let [y, x, ch] = index;
        if y >= self.height() || x >= self.width() || ch >= C {
            return None;
        }
        self.data.get((y * self.width() + x) * C + ch)
    }

    /// Get the value of a pixel sample.
    ///
    /// # Arguments
    ///
    /// * `x` - The x-coordinate of the pixel.
    /// * `y` - The y-coordinate of the pixel.
    /// * `ch` - The channel index of the pixel.
    pub fn get_pixel(&self, x: usize, y: usize, ch: usize) -> Result<&T, ImageError> {
        if x >= self.width() || y >= self.height() {
            return Err(ImageError::PixelIndexOutOfBounds(
                x,
                y,
                self.width(),
                self.height(),
            ));
        }

        if ch >= C {
            return Err(ImageError::ChannelIndexOutOfBounds(ch, C));
        }

        Ok(&self.data[(y * self.width() + x) * C + ch])
    }

    /// Set the value of a pixel sample.
    pub fn set_pixel(&mut self, x: usize, y: usize, ch: usize, val: T) -> Result<(), ImageError> {
        if x >= self.width() || y >= self.height() {
            return Err(ImageError::PixelIndexOutOfBounds(
                x,
                y,
                self.width(),
                self.height(),
            ));
        }

        if ch >= C {
            return Err(ImageError::ChannelIndexOutOfBounds(ch, C));
        }

        let width = self.width();
        self.data[(y * width + x) * C + ch] = val;
        Ok(())
    }

    /// Cast the pixel data to a different type and scale it.
    ///
    /// # Arguments
    ///
    /// * `scale` - The scale to multiply the pixel data with.
    ///
    /// # Errors
    ///
    /// If the pixel data cannot be cast to the new type, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use imgcorrupt_image::{Image, ImageSize};
    ///
    /// let image_u8 = Image::<u8, 3>::new(
    ///     ImageSize {
    ///         height: 2,
    ///         width: 1,
    ///     },
    ///     vec![0u8, 0, 255, 0, 0, 255],
    /// )
    /// .unwrap();
    ///
    /// let image_f32 = image_u8.cast_and_scale::<f32>(1. / 255.0).unwrap();
    ///
    /// assert_eq!(image_f32.get([1, 0, 2]), Some(&1.0f32));
    /// ```
    pub fn cast_and_scale<U>(&self, scale: U) -> Result<Image<U, C>, ImageError>
    where
        T: Copy + num_traits::NumCast,
        U: Copy + num_traits::NumCast + std::ops::Mul<Output = U>,
    {
        let casted_data = self
            .data
            .iter()
            .map(|&x| {
                let xu = U::from(x)
                    .ok_or_else(|| ImageError::CastError(std::any::type_name::<U>().to_string()))?;
                Ok(xu * scale)
            })
            .collect::<Result<Vec<U>, ImageError>>()?;

        Image::new(self.size, casted_data)
    }

    /// Apply a function to every sample, producing a new image.
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Image<U, C> {
        Image {
            size: self.size,
            data: self.data.iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::image::{Image, ImageError, ImageSize};

    #[test]
    fn image_smoke() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 10,
                height: 20,
            },
            vec![0u8; 10 * 20 * 3],
        )?;
        assert_eq!(image.size().width, 10);
        assert_eq!(image.size().height, 20);
        assert_eq!(image.num_channels(), 3);

        Ok(())
    }

    #[test]
    fn image_wrong_length() {
        let res = Image::<u8, 3>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![0u8; 5],
        );
        assert_eq!(res, Err(ImageError::InvalidChannelShape(5, 12)));
    }

    #[test]
    fn image_get_set() -> Result<(), ImageError> {
        let mut image = Image::<f32, 2>::from_size_val(
            ImageSize {
                width: 3,
                height: 2,
            },
            0.0,
        )?;
        image.set_pixel(2, 1, 1, 7.0)?;
        assert_eq!(image.get([1, 2, 1]), Some(&7.0));
        assert_eq!(image.get_pixel(2, 1, 1)?, &7.0);
        assert_eq!(image.as_slice()[(3 + 2) * 2 + 1], 7.0);
        assert!(image.get([2, 0, 0]).is_none());
        assert_eq!(
            image.get_pixel(0, 0, 2),
            Err(ImageError::ChannelIndexOutOfBounds(2, 2))
        );

        Ok(())
    }

    #[test]
    fn image_cast_and_scale() -> Result<(), ImageError> {
        let image_u8 = Image::<u8, 1>::new(
            ImageSize {
                height: 1,
                width: 2,
            },
            vec![0, 255],
        )?;
        let image_f32 = image_u8.cast_and_scale::<f32>(1.0 / 255.0)?;
        assert_eq!(image_f32.as_slice(), &[0.0, 1.0]);

        Ok(())
    }
}
