//! # 图像适配模块
//!
//! 在压缩图像文件与 [`PixelBuffer`] 之间转换。只接受能无损保存 8 位像素的格式，
//! 因为任何有损压缩都会破坏最低有效位。

use crate::error::{Result, StegoError};
use crate::pixels::PixelBuffer;
use anyhow::Context;
use colored::Colorize;
use image::{DynamicImage, ImageBuffer, ImageFormat};
use std::path::Path;

/// 将解码后的图像转为载体，保留灰度、灰度 + alpha、RGB、RGBA 的原始布局，
/// 其余颜色类型统一转换为 RGBA。
pub fn decode_carrier(image: DynamicImage) -> Result<PixelBuffer> {
    let (width, height) = (image.width(), image.height());
    let (channels, data) = match image {
        DynamicImage::ImageLuma8(img) => (1, img.into_raw()),
        DynamicImage::ImageLumaA8(img) => (2, img.into_raw()),
        DynamicImage::ImageRgb8(img) => (3, img.into_raw()),
        DynamicImage::ImageRgba8(img) => (4, img.into_raw()),
        other => (4, other.to_rgba8().into_raw()),
    };
    PixelBuffer::from_raw(width, height, channels, data)
}

pub fn encode_carrier(buffer: &PixelBuffer) -> Result<DynamicImage> {
    let layout = buffer.layout();
    let (width, height) = (layout.width, layout.height);
    let data = buffer.as_bytes().to_vec();
    let mismatch =
        || StegoError::UnsupportedCarrierFormat("pixel data does not match its layout".to_owned());

    let image = match layout.channels {
        1 => ImageBuffer::from_raw(width, height, data)
            .map(DynamicImage::ImageLuma8)
            .ok_or_else(mismatch)?,
        2 => ImageBuffer::from_raw(width, height, data)
            .map(DynamicImage::ImageLumaA8)
            .ok_or_else(mismatch)?,
        3 => ImageBuffer::from_raw(width, height, data)
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(mismatch)?,
        4 => ImageBuffer::from_raw(width, height, data)
            .map(DynamicImage::ImageRgba8)
            .ok_or_else(mismatch)?,
        n => {
            return Err(StegoError::UnsupportedCarrierFormat(format!(
                "cannot encode {n}-channel pixels"
            )));
        }
    };
    Ok(image)
}

/// 根据扩展名选择输出格式，拒绝有损或未知格式。
pub fn lossless_format(path: &Path) -> Result<ImageFormat> {
    let format = ImageFormat::from_path(path)
        .map_err(|e| StegoError::UnsupportedCarrierFormat(e.to_string()))?;
    match format {
        ImageFormat::Png
        | ImageFormat::Bmp
        | ImageFormat::Tiff
        | ImageFormat::WebP
        | ImageFormat::Qoi => Ok(format),
        other => Err(StegoError::UnsupportedCarrierFormat(format!(
            "{other:?} cannot store pixel data losslessly"
        ))),
    }
}

/// 该格式保存后重新读取，是否仍得到相同通道数与相同字节。
///
/// BMP、WebP、QOI 的编解码器会把灰度图改写为 RGB 或 RGBA，TIFF 不支持灰度 + alpha。
pub fn preserves_channels(format: ImageFormat, channels: u8) -> bool {
    match format {
        ImageFormat::Png => (1..=4).contains(&channels),
        ImageFormat::Tiff => matches!(channels, 1 | 3 | 4),
        ImageFormat::Bmp | ImageFormat::WebP | ImageFormat::Qoi => matches!(channels, 3 | 4),
        _ => false,
    }
}

/// 在嵌入之前把载体调整为输出格式能原样保存的布局。
///
/// 格式无法保存灰度布局时，灰度扩展为 RGB，灰度 + alpha 扩展为 RGBA。
/// 隐写图像重新读取时得到的正是扩展后的布局，比特地址因此保持一致。
pub fn fit_carrier(carrier: PixelBuffer, format: ImageFormat) -> Result<PixelBuffer> {
    let layout = carrier.layout();
    if preserves_channels(format, layout.channels) {
        return Ok(carrier);
    }

    let widened = match layout.channels {
        1 => 3,
        2 => 4,
        n => n,
    };
    if widened == layout.channels || !preserves_channels(format, widened) {
        return Err(StegoError::UnsupportedCarrierFormat(format!(
            "{format:?} cannot store {}-channel pixels",
            layout.channels
        )));
    }

    let data = carrier
        .as_bytes()
        .chunks_exact(layout.channels as usize)
        .flat_map(|pixel| match *pixel {
            [gray] => vec![gray, gray, gray],
            [gray, alpha] => vec![gray, gray, gray, alpha],
            _ => pixel.to_vec(),
        })
        .collect();
    PixelBuffer::from_raw(layout.width, layout.height, widened, data)
}

/// 读取并解码图像文件。
pub fn load_carrier(path: &Path) -> anyhow::Result<PixelBuffer> {
    let image = image::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    decode_carrier(image).with_context(|| {
        format!(
            "Image cannot be used as a carrier: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

/// 以指定的无损格式保存载体。格式无法原样保存该布局时不写入任何文件。
pub fn save_carrier(path: &Path, buffer: &PixelBuffer, format: ImageFormat) -> anyhow::Result<()> {
    let channels = buffer.layout().channels;
    if !preserves_channels(format, channels) {
        return Err(StegoError::UnsupportedCarrierFormat(format!(
            "{format:?} cannot store {channels}-channel pixels"
        ))
        .into());
    }

    encode_carrier(buffer)?
        .save_with_format(path, format)
        .with_context(|| {
            format!(
                "Unable to write to target image file: {}",
                path.to_string_lossy().red().bold()
            )
        })
}
