//! # lsb_bridge 库
//!
//! 本库包含 LSB 隐写编解码的核心逻辑，以及 Node 原生插件与 WebAssembly 模块共用的绑定层。
//!
//! 帧格式：`标签 (1 字节) | 长度 (u32 大端序) | 负载`，每个参与隐写的通道字节承载 1 bit，
//! 每字节高位在前。

// 声明库包含的所有模块。

pub mod binding;
pub mod channel;
pub mod cli;
pub mod constants;
pub mod error;
pub mod frame;
pub mod handler;
pub mod image_io;
pub mod pixels;
pub mod steganography;
pub mod trace;

pub use error::{Result, StegoError};
pub use frame::{Message, MessageKind};
pub use pixels::{ChannelPolicy, PixelBuffer, PixelLayout};
