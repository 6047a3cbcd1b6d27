use crate::constants::MAX_PIXELS;
use crate::errors::TransformError;
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, RgbImage, RgbaImage};

/// 画像を指定寸法ちょうどに引き伸ばす（アスペクト比は維持しない）
///
/// fast_image_resize の Lanczos3 フィルタを使用する。
/// アルファを持つ画像は RGBA のまま、それ以外は RGB に変換して処理する。
pub fn resize_exact(
    img: &DynamicImage,
    target_w: u32,
    target_h: u32,
) -> Result<DynamicImage, TransformError> {
    if target_w == 0 || target_h == 0 {
        return Err(TransformError::InvalidParams(format!(
            "target dimensions must be positive, got {target_w}x{target_h}"
        )));
    }

    // ピクセル数チェック
    let total_pixels = target_w as u64 * target_h as u64;
    if total_pixels > MAX_PIXELS {
        return Err(TransformError::ResolutionTooLarge {
            width: target_w,
            height: target_h,
        });
    }

    let has_alpha = img.color().has_alpha();
    let (width, height) = (img.width(), img.height());
    let (raw, pixel_type) = if has_alpha {
        (img.to_rgba8().into_raw(), PixelType::U8x4)
    } else {
        (img.to_rgb8().into_raw(), PixelType::U8x3)
    };

    let src_image = Image::from_vec_u8(width, height, raw, pixel_type).map_err(|e| {
        TransformError::InvalidParams(format!("failed to create source image: {e}"))
    })?;
    let mut dst_image = Image::new(target_w, target_h, pixel_type);

    let mut resizer = Resizer::new();
    resizer
        .resize(
            &src_image,
            &mut dst_image,
            &ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3)),
        )
        .map_err(|e| TransformError::InvalidParams(format!("resize failed: {e}")))?;

    let converted = if has_alpha {
        RgbaImage::from_raw(target_w, target_h, dst_image.into_vec()).map(DynamicImage::ImageRgba8)
    } else {
        RgbImage::from_raw(target_w, target_h, dst_image.into_vec()).map(DynamicImage::ImageRgb8)
    };

    converted.ok_or_else(|| {
        TransformError::InvalidParams("failed to convert resized image".to_string())
    })
}
