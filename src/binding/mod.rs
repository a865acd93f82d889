//! # 跨边界绑定模块
//!
//! 两个宿主界面 (Node 原生插件与 WebAssembly 模块) 只负责各自的缓冲区与参数转换，
//! 然后进入这里的共享契约，由同一套编解码核心完成工作。
//! 两边使用相同的 [`wire_policy`]，因此一边嵌入的消息总能被另一边提取。

pub mod native;
pub mod wasm;

use crate::error::{Result, StegoError};
use crate::frame::{Message, MessageKind};
use crate::pixels::{ChannelPolicy, PixelBuffer, PixelLayout};
use crate::steganography;
use crate::trace::Silent;

/// 宿主绑定固定使用的通道策略。
pub fn wire_policy() -> ChannelPolicy {
    ChannelPolicy::default()
}

/// 交还给宿主的提取结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    Text(String),
    Binary(Vec<u8>),
}

impl Extracted {
    pub fn kind(&self) -> MessageKind {
        match self {
            Extracted::Text(_) => MessageKind::Text,
            Extracted::Binary(_) => MessageKind::Binary,
        }
    }
}

impl TryFrom<Message> for Extracted {
    type Error = StegoError;

    fn try_from(message: Message) -> Result<Self> {
        match message.kind() {
            MessageKind::Text => {
                let text = message.as_text()?.to_owned();
                Ok(Extracted::Text(text))
            }
            MessageKind::Binary => Ok(Extracted::Binary(message.into_payload())),
        }
    }
}

/// 接管宿主像素的副本并嵌入消息，返回与输入等长的缓冲区。
pub(crate) fn embed_copy(
    pixels: Vec<u8>,
    layout: PixelLayout,
    message: &Message,
) -> Result<Vec<u8>> {
    let mut carrier = PixelBuffer::new(layout, pixels)?;
    steganography::embed_in_place(&mut carrier, message, wire_policy(), &Silent)?;
    Ok(carrier.into_bytes())
}

pub(crate) fn extract_copy(pixels: Vec<u8>, layout: PixelLayout) -> Result<Extracted> {
    let carrier = PixelBuffer::new(layout, pixels)?;
    let message = steganography::extract(&carrier, wire_policy())?;
    Extracted::try_from(message)
}
