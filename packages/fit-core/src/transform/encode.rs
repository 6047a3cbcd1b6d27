use crate::constants::{MAX_QUALITY, MIN_QUALITY};
use crate::errors::TransformError;
use crate::transform::params::OutputFormat;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::DynamicImage;
use std::borrow::Cow;
use std::io::Cursor;

/// 画像を指定品質でエンコードする
///
/// quality は 1-100 のパーセント。PNG は可逆のため、品質を圧縮レベルに
/// 読み替える（品質が低いほど強く圧縮する）。
pub fn encode_image(
    img: &DynamicImage,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>, TransformError> {
    let quality = quality.clamp(MIN_QUALITY, MAX_QUALITY);
    let mut buf = Cursor::new(Vec::new());

    match format {
        OutputFormat::Jpeg => {
            // JPEG はアルファを持てないので RGB に落とす
            let rgb: Cow<'_, DynamicImage> = match img {
                DynamicImage::ImageRgb8(_) | DynamicImage::ImageLuma8(_) => Cow::Borrowed(img),
                other => Cow::Owned(DynamicImage::ImageRgb8(other.to_rgb8())),
            };
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
            rgb.write_with_encoder(encoder)
                .map_err(|e| TransformError::EncodeFailed(format!("JPEG encode failed: {e}")))?;
        }
        OutputFormat::Png => {
            let encoder =
                PngEncoder::new_with_quality(&mut buf, png_compression(quality), PngFilter::Adaptive);
            img.write_with_encoder(encoder)
                .map_err(|e| TransformError::EncodeFailed(format!("PNG encode failed: {e}")))?;
        }
    }

    Ok(buf.into_inner())
}

/// 品質を PNG の圧縮レベルに対応付ける
fn png_compression(quality: u8) -> CompressionType {
    match quality {
        67.. => CompressionType::Fast,
        34..=66 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}
