#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use imgcorrupt_image as image;

#[doc(inline)]
pub use imgcorrupt_imgproc as imgproc;

#[doc(inline)]
pub use imgcorrupt_io as io;

#[doc(inline)]
pub use imgcorrupt_corruption as corruption;
