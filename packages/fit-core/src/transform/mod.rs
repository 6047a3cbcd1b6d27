pub mod decode;
pub mod encode;
pub mod params;
pub mod resize;

pub use decode::{decode_image, sniff_format, DecodedImage, SourceFormat};
pub use encode::encode_image;
pub use params::OutputFormat;
pub use resize::resize_exact;
