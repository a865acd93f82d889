/// 帧头中类型标签占用的字节数。
pub const TAG_LEN: usize = 1;

/// 帧头中长度字段占用的字节数。
/// 长度以 `u32` 大端序存储，两个宿主环境必须保持一致。
pub const LENGTH_FIELD_LEN: usize = 4;

/// 完整帧头的字节数 (标签 + 长度)。
pub const HEADER_LEN: usize = TAG_LEN + LENGTH_FIELD_LEN;

/// 读取完整帧头所需的载体位数。每个载体字节只存储 1 bit。
pub const HEADER_BITS: usize = HEADER_LEN * 8;

/// 单帧可携带的最大负载字节数，由长度字段宽度决定。
pub const MAX_PAYLOAD_LEN: usize = u32::MAX as usize;

/// UTF-8 文本消息的类型标签。
pub const TAG_TEXT: u8 = 0x08;

/// 原始二进制消息的类型标签。
pub const TAG_BINARY: u8 = 0x0B;

/// 支持的最大通道数 (RGBA)。
pub const MAX_CHANNELS: u8 = 4;
