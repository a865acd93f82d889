//! Node 原生插件界面。
//!
//! JavaScript 的数字都是 `f64`，因此宽、高、通道数在进入核心前必须校验为非负整数。
//! 消息参数为字符串时按文本帧嵌入，为 `Buffer` 时按二进制帧嵌入。
//!
//! ```js
//! const { embed, extract } = require('./lsb_bridge.node');
//! const doctored = embed(pixels, width, height, 4, 'hi');
//! extract(doctored, width, height, 4); // { type: 'text', message: 'hi' }
//! ```

use super::{Extracted, embed_copy, extract_copy};
use crate::error::{Result, StegoError};
use crate::frame::Message;
use crate::pixels::PixelLayout;

/// 原生界面接收的消息。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeMessage {
    Text(String),
    Buffer(Vec<u8>),
}

impl From<NativeMessage> for Message {
    fn from(message: NativeMessage) -> Self {
        match message {
            NativeMessage::Text(text) => Message::text(text),
            NativeMessage::Buffer(bytes) => Message::binary(bytes),
        }
    }
}

fn js_integer(name: &str, value: f64) -> Result<u32> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(StegoError::UnsupportedCarrierFormat(format!(
            "{name} must be a non-negative integer, got {value}"
        )));
    }
    Ok(value as u32)
}

/// 由 JavaScript 数字构造布局。
pub fn layout_from_js(width: f64, height: f64, channels: f64) -> Result<PixelLayout> {
    let channels = u8::try_from(js_integer("channels", channels)?).map_err(|_| {
        StegoError::UnsupportedCarrierFormat(format!("channels out of range: {channels}"))
    })?;
    PixelLayout::new(
        js_integer("width", width)?,
        js_integer("height", height)?,
        channels,
    )
}

/// 像素由调用方交出所有权，直接成为载体，不再复制。
pub fn embed_buffer(
    pixels: Vec<u8>,
    width: f64,
    height: f64,
    channels: f64,
    message: NativeMessage,
) -> Result<Vec<u8>> {
    let layout = layout_from_js(width, height, channels)?;
    embed_copy(pixels, layout, &message.into())
}

pub fn extract_buffer(
    pixels: Vec<u8>,
    width: f64,
    height: f64,
    channels: f64,
) -> Result<Extracted> {
    let layout = layout_from_js(width, height, channels)?;
    extract_copy(pixels, layout)
}

#[cfg(feature = "node")]
mod addon {
    use super::{Extracted, NativeMessage, embed_buffer, extract_buffer};
    use neon::prelude::*;
    use neon::types::buffer::TypedArray;

    /// `embed(pixels: Buffer, width, height, channels, message: string | Buffer): Buffer`
    fn embed(mut cx: FunctionContext) -> JsResult<JsBuffer> {
        let pixels = cx.argument::<JsBuffer>(0)?;
        let pixels = pixels.as_slice(&cx).to_vec();
        let width = cx.argument::<JsNumber>(1)?.value(&mut cx);
        let height = cx.argument::<JsNumber>(2)?.value(&mut cx);
        let channels = cx.argument::<JsNumber>(3)?.value(&mut cx);

        let message = cx.argument::<JsValue>(4)?;
        let message = if let Ok(text) = message.downcast::<JsString, _>(&mut cx) {
            NativeMessage::Text(text.value(&mut cx))
        } else if let Ok(bytes) = message.downcast::<JsBuffer, _>(&mut cx) {
            NativeMessage::Buffer(bytes.as_slice(&cx).to_vec())
        } else {
            return cx.throw_type_error("message must be a string or a Buffer");
        };

        match embed_buffer(pixels, width, height, channels, message) {
            Ok(doctored) => JsBuffer::from_slice(&mut cx, &doctored),
            Err(e) => cx.throw_error(e.to_string()),
        }
    }

    /// `extract(pixels: Buffer, width, height, channels): { type, message }`
    fn extract(mut cx: FunctionContext) -> JsResult<JsObject> {
        let pixels = cx.argument::<JsBuffer>(0)?;
        let pixels = pixels.as_slice(&cx).to_vec();
        let width = cx.argument::<JsNumber>(1)?.value(&mut cx);
        let height = cx.argument::<JsNumber>(2)?.value(&mut cx);
        let channels = cx.argument::<JsNumber>(3)?.value(&mut cx);

        let extracted = match extract_buffer(pixels, width, height, channels) {
            Ok(extracted) => extracted,
            Err(e) => return cx.throw_error(e.to_string()),
        };

        let result = cx.empty_object();
        let kind = cx.string(extracted.kind().name());
        result.set(&mut cx, "type", kind)?;
        match extracted {
            Extracted::Text(text) => {
                let text = cx.string(text);
                result.set(&mut cx, "message", text)?;
            }
            Extracted::Binary(bytes) => {
                let bytes = JsBuffer::from_slice(&mut cx, &bytes)?;
                result.set(&mut cx, "message", bytes)?;
            }
        }
        Ok(result)
    }

    #[neon::main]
    fn main(mut cx: ModuleContext) -> NeonResult<()> {
        cx.export_function("embed", embed)?;
        cx.export_function("extract", extract)?;
        Ok(())
    }
}
