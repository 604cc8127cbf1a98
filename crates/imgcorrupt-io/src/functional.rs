use std::path::Path;

use image::ExtendedColorType;
use imgcorrupt_image::{Image, ImageSize};

use crate::error::IoError;

/// File extensions of the image formats read and written, lowercase.
pub const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "bmp", "tif", "tiff", "webp"];

/// Whether the path has one of the [`IMAGE_EXTENSIONS`], ignoring case.
pub fn has_image_extension(file_path: impl AsRef<Path>) -> bool {
    file_path
        .as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Reads an RGB8 image from the given file path.
///
/// The method tries to read from any image format supported by the image crate
/// and converts the decoded pixels to 8-bit RGB.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An RGB image with three channels _(rgb8)_.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref().to_owned();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let bytes = std::fs::read(&file_path)?;
    let img = image::ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}

/// Writes an 8-bit image to the given file path.
///
/// The format follows the file extension. Missing parent directories are created.
///
/// # Arguments
///
/// * `file_path` - The destination path.
/// * `image` - The image with one, three or four channels.
pub fn write_image<const C: usize>(
    file_path: impl AsRef<Path>,
    image: &Image<u8, C>,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();

    if !has_image_extension(file_path) {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let color_type = match C {
        1 => ExtendedColorType::L8,
        3 => ExtendedColorType::Rgb8,
        4 => ExtendedColorType::Rgba8,
        _ => return Err(IoError::UnsupportedChannels(C)),
    };

    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    image::save_buffer(
        file_path,
        image.as_slice(),
        image.width() as u32,
        image.height() as u32,
        color_type,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgcorrupt_image::ImageSize;

    fn gradient() -> Result<Image<u8, 3>, IoError> {
        let size = ImageSize {
            width: 6,
            height: 4,
        };
        let data = (0..size.width * size.height * 3)
            .map(|i| (i * 3) as u8)
            .collect();
        Ok(Image::new(size, data)?)
    }

    #[test]
    fn read_write_png_rgb8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("nested").join("dir").join("gradient.png");

        let image = gradient()?;
        write_image(&file_path, &image)?;
        assert!(file_path.exists(), "File does not exist: {:?}", file_path);

        let image_back = read_image_any_rgb8(&file_path)?;
        assert_eq!(image_back, image);
        Ok(())
    }

    #[test]
    fn read_gray_as_rgb8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("gray.png");

        let gray = Image::<u8, 1>::new([2, 1].into(), vec![10, 200])?;
        write_image(&file_path, &gray)?;

        let image = read_image_any_rgb8(&file_path)?;
        assert_eq!(image.as_slice(), &[10, 10, 10, 200, 200, 200]);
        Ok(())
    }

    #[test]
    fn read_missing_file() {
        let res = read_image_any_rgb8("does/not/exist.png");
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }

    #[test]
    fn write_rejects_unknown_extension() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let res = write_image(tmp_dir.path().join("image.txt"), &gradient()?);
        assert!(matches!(res, Err(IoError::InvalidFileExtension(_))));

        let two = Image::<u8, 2>::from_size_val([2, 2].into(), 0)?;
        let res = write_image(tmp_dir.path().join("image.png"), &two);
        assert!(matches!(res, Err(IoError::UnsupportedChannels(2))));
        Ok(())
    }

    #[test]
    fn image_extensions() {
        assert!(has_image_extension("a/b/c.PNG"));
        assert!(has_image_extension("c.jpeg"));
        assert!(has_image_extension("c.webp"));
        assert!(!has_image_extension("c.json"));
        assert!(!has_image_extension("png"));
    }
}
