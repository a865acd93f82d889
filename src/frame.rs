//! # 消息帧编解码模块
//!
//! 将带类型的消息序列化为 `标签 (1 字节) | 长度 (4 字节, 大端序) | 负载` 的扁平字节序列，
//! 以及反向解析。本模块不了解图像或位操作。

use crate::constants::{HEADER_LEN, MAX_PAYLOAD_LEN, TAG_BINARY, TAG_LEN, TAG_TEXT};
use crate::error::{Result, StegoError};
use std::fmt;

/// 消息的类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// UTF-8 文本。
    Text,
    /// 任意字节。
    Binary,
}

impl MessageKind {
    /// 该类型在帧头中的标签值。
    pub fn tag(self) -> u8 {
        match self {
            MessageKind::Text => TAG_TEXT,
            MessageKind::Binary => TAG_BINARY,
        }
    }

    /// 由标签值还原类型，未知标签视为帧损坏。
    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            TAG_TEXT => Ok(MessageKind::Text),
            TAG_BINARY => Ok(MessageKind::Binary),
            other => Err(StegoError::MalformedFrame(format!(
                "unrecognized type tag {other:#04x}"
            ))),
        }
    }

    /// 宿主环境使用的类型名 (`"text"` / `"binary"`)。
    pub fn name(self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Binary => "binary",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "text" => Ok(MessageKind::Text),
            "binary" => Ok(MessageKind::Binary),
            other => Err(StegoError::MalformedFrame(format!(
                "unknown message type '{other}'"
            ))),
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 一条待隐藏或已恢复的消息。长度字段总是由负载推导，因此二者不会不一致。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    kind: MessageKind,
    payload: Vec<u8>,
}

impl Message {
    pub fn new(kind: MessageKind, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            payload: payload.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Text, text.into().into_bytes())
    }

    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(MessageKind::Binary, bytes)
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// 将文本消息的负载解释为 UTF-8。
    ///
    /// # Errors
    ///
    /// 消息不是 `Text` 类型，或负载不是合法的 UTF-8 时返回 `MalformedFrame`。
    pub fn as_text(&self) -> Result<&str> {
        if self.kind != MessageKind::Text {
            return Err(StegoError::MalformedFrame(format!(
                "expected a text frame, found {}",
                self.kind
            )));
        }
        std::str::from_utf8(&self.payload)
            .map_err(|e| StegoError::MalformedFrame(format!("text payload is not UTF-8: {e}")))
    }

    /// 序列化后的帧长度 (字节)。
    pub fn frame_len(&self) -> usize {
        HEADER_LEN + self.payload.len()
    }
}

/// 解析后的帧头。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub kind: MessageKind,
    pub length: u32,
}

impl FrameHeader {
    pub fn for_message(message: &Message) -> Result<Self> {
        let len = message.payload.len();
        if len > MAX_PAYLOAD_LEN {
            return Err(StegoError::PayloadTooLarge { length: len });
        }
        Ok(Self {
            kind: message.kind,
            length: len as u32,
        })
    }

    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut header = [0u8; HEADER_LEN];
        header[0] = self.kind.tag();
        header[TAG_LEN..].copy_from_slice(&self.length.to_be_bytes());
        header
    }

    /// 从字节序列开头解析帧头。
    ///
    /// # Errors
    ///
    /// 字节数少于帧头长度，或标签未知时返回 `MalformedFrame`。
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let header: &[u8; HEADER_LEN] = bytes
            .get(..HEADER_LEN)
            .and_then(|h| h.try_into().ok())
            .ok_or_else(|| {
                StegoError::MalformedFrame(format!(
                    "header needs {HEADER_LEN} bytes, got {}",
                    bytes.len()
                ))
            })?;

        let kind = MessageKind::from_tag(header[0])?;
        let mut length = [0u8; 4];
        length.copy_from_slice(&header[TAG_LEN..]);

        Ok(Self {
            kind,
            length: u32::from_be_bytes(length),
        })
    }

    /// 负载字节数。
    pub fn payload_len(&self) -> usize {
        self.length as usize
    }
}

/// 将消息序列化为帧字节。
pub fn serialize(message: &Message) -> Result<Vec<u8>> {
    let header = FrameHeader::for_message(message)?;
    let mut frame = Vec::with_capacity(message.frame_len());
    frame.extend_from_slice(&header.encode());
    frame.extend_from_slice(&message.payload);
    Ok(frame)
}

/// 从帧字节还原消息，多余的尾部字节被忽略。
pub fn deserialize(bytes: &[u8]) -> Result<Message> {
    let header = FrameHeader::decode(bytes)?;
    let body = &bytes[HEADER_LEN..];
    let payload = body.get(..header.payload_len()).ok_or_else(|| {
        StegoError::MalformedFrame(format!(
            "header declares {} payload bytes, only {} available",
            header.length,
            body.len()
        ))
    })?;

    Ok(Message::new(header.kind, payload))
}
