use crate::constants::MAX_PIXELS;
use crate::errors::TransformError;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;

/// 受け付ける入力フォーマット
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
}

impl SourceFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
        }
    }
}

/// デコード済み画像（EXIF の向き補正済み）
#[derive(Debug)]
pub struct DecodedImage {
    pub image: DynamicImage,
    pub format: SourceFormat,
}

/// マジックナンバーから入力フォーマットを判定する
///
/// JPEG / PNG 以外は None
pub fn sniff_format(data: &[u8]) -> Option<SourceFormat> {
    match image::guess_format(data).ok()? {
        ImageFormat::Jpeg => Some(SourceFormat::Jpeg),
        ImageFormat::Png => Some(SourceFormat::Png),
        _ => None,
    }
}

/// 画像バイト列をデコードし、EXIF Orientation を適用する
pub fn decode_image(data: &[u8]) -> Result<DecodedImage, TransformError> {
    let format = sniff_format(data).ok_or_else(|| {
        TransformError::DecodeFailed("not a JPEG or PNG image".to_string())
    })?;

    let image = ImageReader::with_format(Cursor::new(data), format.image_format())
        .decode()
        .map_err(|e| TransformError::DecodeFailed(e.to_string()))?;

    // ソース画像の総ピクセル数を検証する
    let total_pixels = image.width() as u64 * image.height() as u64;
    if total_pixels > MAX_PIXELS {
        return Err(TransformError::ResolutionTooLarge {
            width: image.width(),
            height: image.height(),
        });
    }

    let image = match read_orientation(data) {
        Some(tag) => apply_orientation(image, tag),
        None => image,
    };

    Ok(DecodedImage { image, format })
}

/// EXIF Orientation タグ（1-8）を読み取る
fn read_orientation(data: &[u8]) -> Option<u32> {
    let mut cursor = Cursor::new(data);
    let exif = exif::Reader::new().read_from_container(&mut cursor).ok()?;
    let field = exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
    field.value.get_uint(0)
}

/// Orientation タグに従って回転・反転する
fn apply_orientation(img: DynamicImage, tag: u32) -> DynamicImage {
    match tag {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}
