//! # 错误类型模块
//!
//! 编解码核心的所有失败都以 [`StegoError`] 同步返回，不做任何重试。

use thiserror::Error;

/// 编解码核心操作的结果类型。
pub type Result<T> = std::result::Result<T, StegoError>;

/// 隐写编解码过程中可能出现的错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// 载体容量不足以容纳整个帧，在任何写入之前报告。
    #[error("Not enough space in the carrier: need {required} bits, have {available} bits")]
    InsufficientCapacity { required: usize, available: usize },

    /// 载体中的位数不足以读出完整的帧头或负载。
    #[error("Carrier ends before the frame does: need {required} bits, have {available} bits")]
    InsufficientData { required: usize, available: usize },

    /// 帧头或负载内容无效。
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    /// 负载超出 32 位长度字段的表示范围。
    #[error("Payload of {length} bytes does not fit in the 32-bit length field")]
    PayloadTooLarge { length: usize },

    /// 像素缓冲区的元数据或图像格式无法作为载体。
    #[error("Unsupported carrier format: {0}")]
    UnsupportedCarrierFormat(String),
}
