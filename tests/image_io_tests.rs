use image::ImageFormat;
use lsb_bridge::image_io::{
    fit_carrier, load_carrier, lossless_format, preserves_channels, save_carrier,
};
use lsb_bridge::{PixelBuffer, StegoError};
use rand::RngCore;
use tempfile::tempdir;

const FORMATS: [(&str, ImageFormat); 5] = [
    ("png", ImageFormat::Png),
    ("bmp", ImageFormat::Bmp),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
    ("qoi", ImageFormat::Qoi),
];

/// 一个辅助函数，用于创建随机像素的载体
fn random_carrier(width: u32, height: u32, channels: u8) -> PixelBuffer {
    let mut data = vec![0u8; (width * height * channels as u32) as usize];
    rand::rng().fill_bytes(&mut data);
    PixelBuffer::from_raw(width, height, channels, data).expect("valid layout")
}

fn is_unsupported(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<StegoError>(),
        Some(StegoError::UnsupportedCarrierFormat(_))
    )
}

/// 验证每种接受的格式与 1 到 4 通道：能保存的组合重新读取后布局与字节完全相同，
/// 不能保存的组合在写文件之前被拒绝
#[test]
fn test_save_and_reload_every_format_and_layout() -> anyhow::Result<()> {
    let dir = tempdir()?;

    for channels in 1..=4u8 {
        let carrier = random_carrier(9, 7, channels);
        for (extension, format) in FORMATS {
            let path = dir.path().join(format!("carrier_{channels}.{extension}"));
            assert_eq!(lossless_format(&path)?, format);

            if preserves_channels(format, channels) {
                save_carrier(&path, &carrier, format)?;
                let reloaded = load_carrier(&path)?;
                assert_eq!(
                    reloaded.layout(),
                    carrier.layout(),
                    "{extension} changed the layout of {channels}-channel pixels"
                );
                assert_eq!(
                    reloaded.as_bytes(),
                    carrier.as_bytes(),
                    "{extension} changed the bytes of {channels}-channel pixels"
                );
            } else {
                let result = save_carrier(&path, &carrier, format);
                assert!(result.as_ref().is_err_and(is_unsupported));
                assert!(!path.exists(), "No file should be written for {extension}.");
            }
        }
    }

    // RGB 与 RGBA 在所有格式中都能原样保存
    for (_, format) in FORMATS {
        assert!(preserves_channels(format, 3));
        assert!(preserves_channels(format, 4));
    }
    Ok(())
}

/// 验证灰度载体被扩展为输出格式能保存的布局，且扩展后的载体可原样往返
#[test]
fn test_fit_carrier_widens_gray_layouts() -> anyhow::Result<()> {
    let dir = tempdir()?;

    for channels in 1..=4u8 {
        let carrier = random_carrier(6, 5, channels);
        for (extension, format) in FORMATS {
            let fitted = fit_carrier(carrier.clone(), format)?;
            let fitted_channels = fitted.layout().channels;
            assert!(preserves_channels(format, fitted_channels));

            if preserves_channels(format, channels) {
                assert_eq!(fitted, carrier);
            } else {
                assert_eq!(fitted_channels, channels + 2);
                let source = carrier.as_bytes().chunks_exact(channels as usize);
                let widened = fitted.as_bytes().chunks_exact(fitted_channels as usize);
                for (before, after) in source.zip(widened) {
                    // 灰度复制到 R、G、B，alpha 原样保留
                    assert_eq!(&after[..3], &[before[0]; 3]);
                    assert_eq!(&after[3..], &before[1..]);
                }
            }

            let path = dir.path().join(format!("fitted_{channels}.{extension}"));
            save_carrier(&path, &fitted, format)?;
            assert_eq!(load_carrier(&path)?, fitted);
        }
    }
    Ok(())
}

/// 验证有损格式无论通道数都无法容纳载体
#[test]
fn test_fit_carrier_rejects_lossy_formats() {
    for channels in 1..=4u8 {
        let carrier = random_carrier(4, 4, channels);
        assert!(matches!(
            fit_carrier(carrier, ImageFormat::Jpeg),
            Err(StegoError::UnsupportedCarrierFormat(_))
        ));
    }
}
