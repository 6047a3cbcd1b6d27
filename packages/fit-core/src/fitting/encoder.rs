use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};

use crate::errors::TransformError;
use crate::fitting::quality::Quality;
use crate::transform::{encode_image, resize_exact, OutputFormat};

/// 「リサイズ済み画像を指定品質でエンコードする」能力
///
/// リサイズは生成時に一度だけ行い、`encode` は品質を変えて何度でも呼べる。
pub trait QualityEncoder {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn format(&self) -> OutputFormat;
    fn encode(&mut self, quality: Quality) -> Result<Vec<u8>, TransformError>;
}

/// サーバー側のエンコーダ
///
/// fast_image_resize (Lanczos3) で引き伸ばし、0-100 の整数品質でエンコードする。
pub struct ImageEncoder {
    image: DynamicImage,
    format: OutputFormat,
}

impl ImageEncoder {
    pub fn new(
        source: &DynamicImage,
        width: u32,
        height: u32,
        format: OutputFormat,
    ) -> Result<Self, TransformError> {
        let image = resize_exact(source, width, height)?;
        Ok(Self { image, format })
    }
}

impl QualityEncoder for ImageEncoder {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn format(&self) -> OutputFormat {
        self.format
    }

    fn encode(&mut self, quality: Quality) -> Result<Vec<u8>, TransformError> {
        encode_image(&self.image, self.format, quality.percent())
    }
}

/// クライアント側（ローカル）のエンコーダ
///
/// RGBA のラスタに双線形で描き込み、0.0-1.0 の小数品質でエンコードする。
/// JPEG の場合は透過部分を白で塗りつぶしてから書き出す。
pub struct CanvasEncoder {
    raster: DynamicImage,
    format: OutputFormat,
}

impl CanvasEncoder {
    pub fn new(
        source: &DynamicImage,
        width: u32,
        height: u32,
        format: OutputFormat,
    ) -> Result<Self, TransformError> {
        if width == 0 || height == 0 {
            return Err(TransformError::InvalidParams(format!(
                "canvas dimensions must be positive, got {width}x{height}"
            )));
        }

        let mut canvas = imageops::resize(&source.to_rgba8(), width, height, FilterType::Triangle);
        let raster = match format {
            OutputFormat::Jpeg => {
                flatten_on_white(&mut canvas);
                DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
            }
            OutputFormat::Png => DynamicImage::ImageRgba8(canvas),
        };

        Ok(Self { raster, format })
    }

    /// 小数品質をエンコーダのパーセントに戻す
    fn encoder_quality(fraction: f32) -> u8 {
        (fraction * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

impl QualityEncoder for CanvasEncoder {
    fn width(&self) -> u32 {
        self.raster.width()
    }

    fn height(&self) -> u32 {
        self.raster.height()
    }

    fn format(&self) -> OutputFormat {
        self.format
    }

    fn encode(&mut self, quality: Quality) -> Result<Vec<u8>, TransformError> {
        let percent = Self::encoder_quality(quality.fraction());
        encode_image(&self.raster, self.format, percent)
    }
}

/// 透過ピクセルを白背景に合成する
fn flatten_on_white(canvas: &mut RgbaImage) {
    for pixel in canvas.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        let alpha = u16::from(a);
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha)) / 255) as u8;
        *pixel = Rgba([blend(r), blend(g), blend(b), 255]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn sample(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }))
    }

    #[test]
    fn test_image_encoder_resizes_once() {
        let mut encoder = ImageEncoder::new(&sample(300, 100), 140, 60, OutputFormat::Jpeg).unwrap();
        assert_eq!((encoder.width(), encoder.height()), (140, 60));

        let data = encoder.encode(Quality::INITIAL).unwrap();
        let decoded = image::load_from_memory(&data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (140, 60));
    }

    #[test]
    fn test_canvas_encoder_dimensions() {
        let mut encoder = CanvasEncoder::new(&sample(50, 400), 200, 230, OutputFormat::Png).unwrap();
        assert_eq!((encoder.width(), encoder.height()), (200, 230));

        let data = encoder.encode(Quality::new(50)).unwrap();
        let decoded = image::load_from_memory(&data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (200, 230));
    }

    #[test]
    fn test_canvas_encoder_rejects_empty_canvas() {
        assert!(CanvasEncoder::new(&sample(10, 10), 0, 10, OutputFormat::Jpeg).is_err());
    }

    #[test]
    fn test_encoder_quality_mapping() {
        assert_eq!(CanvasEncoder::encoder_quality(0.92), 92);
        assert_eq!(CanvasEncoder::encoder_quality(1.0), 100);
        assert_eq!(CanvasEncoder::encoder_quality(0.01), 1);
    }

    #[test]
    fn test_flatten_on_white() {
        let mut canvas = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 0]));
        canvas.put_pixel(1, 0, Rgba([10, 20, 30, 255]));
        flatten_on_white(&mut canvas);
        assert_eq!(canvas.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
        assert_eq!(canvas.get_pixel(1, 0), &Rgba([10, 20, 30, 255]));
    }
}
