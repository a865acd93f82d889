use lsb_bridge::binding::native::{NativeMessage, embed_buffer, extract_buffer, layout_from_js};
use lsb_bridge::binding::wasm::{embed_array, extract_array};
use lsb_bridge::binding::{Extracted, wire_policy};
use lsb_bridge::steganography::extract;
use lsb_bridge::{ChannelPolicy, MessageKind, PixelBuffer, StegoError};
use rand::RngCore;

/// 一个辅助函数，模拟 canvas `getImageData` 返回的 RGBA 像素
fn canvas_pixels(width: u32, height: u32) -> Vec<u8> {
    let mut pixels = vec![0u8; (width * height * 4) as usize];
    rand::rng().fill_bytes(&mut pixels);
    pixels.chunks_exact_mut(4).for_each(|px| px[3] = 255);
    pixels
}

/// 验证原生界面嵌入的文本可由 WebAssembly 界面提取
#[test]
fn test_native_embed_wasm_extract() -> anyhow::Result<()> {
    let pixels = canvas_pixels(40, 30);
    let text = "Hello, world! Witaj, świecie! Здравствуйте! 你好";

    let message = NativeMessage::Text(text.to_owned());
    let doctored = embed_buffer(pixels.clone(), 40.0, 30.0, 4.0, message)?;
    assert_eq!(doctored.len(), pixels.len());

    let extracted = extract_array(doctored, 40, 30, 4)?;
    assert_eq!(extracted, Extracted::Text(text.to_owned()));
    Ok(())
}

/// 验证 WebAssembly 界面嵌入的二进制消息可由原生界面提取
#[test]
fn test_wasm_embed_native_extract() -> anyhow::Result<()> {
    let pixels = canvas_pixels(16, 16);
    let payload: Vec<u8> = (0..=255u8).step_by(3).collect();

    let doctored = embed_array(pixels, 16, 16, 4, "binary", &payload)?;
    let extracted = extract_buffer(doctored, 16.0, 16.0, 4.0)?;
    assert_eq!(extracted.kind(), MessageKind::Binary);
    assert_eq!(extracted, Extracted::Binary(payload));
    Ok(())
}

/// 验证两个界面对同一输入产生逐字节相同的结果，宿主保留的原缓冲区不受影响
#[test]
fn test_surfaces_agree_byte_for_byte() -> anyhow::Result<()> {
    let pixels = canvas_pixels(24, 24);
    let original = pixels.clone();

    let message = NativeMessage::Text("same".into());
    let from_native = embed_buffer(pixels.clone(), 24.0, 24.0, 4.0, message)?;
    let from_wasm = embed_array(pixels.clone(), 24, 24, 4, "text", b"same")?;
    assert_eq!(from_native, from_wasm);
    assert_eq!(pixels, original);
    assert_ne!(from_native, original);

    // 宿主绑定使用线上约定的策略：alpha 保持 255
    assert!(from_native.chunks_exact(4).all(|px| px[3] == 255));
    let carrier = PixelBuffer::from_raw(24, 24, 4, from_wasm)?;
    assert_eq!(extract(&carrier, wire_policy())?.kind(), MessageKind::Text);
    assert_eq!(wire_policy(), ChannelPolicy::default());
    Ok(())
}

/// 验证原生界面拒绝不是非负整数的 JavaScript 数字
#[test]
fn test_native_rejects_bad_numbers() {
    for (w, h, c) in [
        (-1.0, 10.0, 4.0),
        (10.5, 10.0, 4.0),
        (10.0, f64::NAN, 4.0),
        (10.0, 10.0, f64::INFINITY),
        (10.0, 10.0, 300.0),
        (10.0, 10.0, 0.0),
    ] {
        assert!(matches!(
            layout_from_js(w, h, c),
            Err(StegoError::UnsupportedCarrierFormat(_))
        ));
    }
    assert!(layout_from_js(640.0, 480.0, 4.0).is_ok());
}

/// 验证缓冲区长度与声明的尺寸不符时被拒绝
#[test]
fn test_layout_mismatch_is_rejected() {
    let pixels = canvas_pixels(10, 10);
    assert!(matches!(
        embed_array(pixels.clone(), 10, 11, 4, "text", b"hi"),
        Err(StegoError::UnsupportedCarrierFormat(_))
    ));
    assert!(matches!(
        extract_buffer(pixels, 10.0, 10.0, 3.0),
        Err(StegoError::UnsupportedCarrierFormat(_))
    ));
}

/// 验证 WebAssembly 界面的类型名与文本校验
#[test]
fn test_wasm_kind_validation() {
    let pixels = canvas_pixels(10, 10);
    assert!(matches!(
        embed_array(pixels.clone(), 10, 10, 4, "image", b"hi"),
        Err(StegoError::MalformedFrame(_))
    ));
    assert!(matches!(
        embed_array(pixels, 10, 10, 4, "text", &[0xFF, 0xFE]),
        Err(StegoError::MalformedFrame(_))
    ));
}

/// 验证容量不足时两个界面都报告 InsufficientCapacity
#[test]
fn test_capacity_errors_cross_the_boundary() {
    // 5 x 5 RGBA，跳过 alpha 后 75 bits
    let pixels = canvas_pixels(5, 5);
    let expected = Err(StegoError::InsufficientCapacity {
        required: 80,
        available: 75,
    });
    assert_eq!(
        embed_buffer(pixels.clone(), 5.0, 5.0, 4.0, NativeMessage::Buffer(vec![1, 2, 3, 4, 5])),
        expected
    );
    assert_eq!(embed_array(pixels, 5, 5, 4, "binary", &[1, 2, 3, 4, 5]), expected);
}
