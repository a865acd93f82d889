//! WebAssembly 界面。
//!
//! 像素以 `Uint8Array` 传入，由 `wasm-bindgen` 复制为模块线性内存中的 `Vec<u8>`，
//! 该副本直接成为载体；结果同样以新的 `Uint8Array` 复制回宿主脚本，宿主侧的原数组不会被修改。

use super::{Extracted, embed_copy, extract_copy};
use crate::error::{Result, StegoError};
use crate::frame::{Message, MessageKind};
use crate::pixels::PixelLayout;

fn layout(width: u32, height: u32, channels: u32) -> Result<PixelLayout> {
    let channels = u8::try_from(channels).map_err(|_| {
        StegoError::UnsupportedCarrierFormat(format!("channels out of range: {channels}"))
    })?;
    PixelLayout::new(width, height, channels)
}

/// `kind` 为 `"text"` 或 `"binary"`；文本负载必须是 UTF-8。
pub fn embed_array(
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    channels: u32,
    kind: &str,
    payload: &[u8],
) -> Result<Vec<u8>> {
    let kind = MessageKind::from_name(kind)?;
    let message = Message::new(kind, payload);
    if kind == MessageKind::Text {
        message.as_text()?;
    }
    embed_copy(pixels, layout(width, height, channels)?, &message)
}

pub fn extract_array(
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    channels: u32,
) -> Result<Extracted> {
    extract_copy(pixels, layout(width, height, channels)?)
}

#[cfg(feature = "wasm")]
mod exports {
    use super::{Extracted, embed_array, extract_array};
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen]
    pub fn embed(
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        channels: u32,
        kind: &str,
        payload: &[u8],
    ) -> Result<Vec<u8>, JsError> {
        Ok(embed_array(pixels, width, height, channels, kind, payload)?)
    }

    #[wasm_bindgen]
    pub fn extract(
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        channels: u32,
    ) -> Result<ExtractedMessage, JsError> {
        Ok(extract_array(pixels, width, height, channels)?.into())
    }

    #[wasm_bindgen]
    pub struct ExtractedMessage {
        inner: Extracted,
    }

    impl From<Extracted> for ExtractedMessage {
        fn from(inner: Extracted) -> Self {
            Self { inner }
        }
    }

    #[wasm_bindgen]
    impl ExtractedMessage {
        /// `"text"` 或 `"binary"`。
        #[wasm_bindgen(getter, js_name = "type")]
        pub fn kind(&self) -> String {
            self.inner.kind().name().to_owned()
        }

        #[wasm_bindgen(getter)]
        pub fn payload(&self) -> Vec<u8> {
            match &self.inner {
                Extracted::Text(text) => text.as_bytes().to_vec(),
                Extracted::Binary(bytes) => bytes.clone(),
            }
        }

        /// 文本消息返回字符串，二进制消息返回 `undefined`。
        #[wasm_bindgen(getter)]
        pub fn message(&self) -> Option<String> {
            match &self.inner {
                Extracted::Text(text) => Some(text.clone()),
                Extracted::Binary(_) => None,
            }
        }
    }
}
