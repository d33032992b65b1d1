#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use nube_image as image;

#[doc(inline)]
pub use nube_imgproc as imgproc;

#[doc(inline)]
pub use nube_io as io;

#[doc(inline)]
pub use nube_3d as n3d;

#[doc(inline)]
pub use nube_projection as projection;
