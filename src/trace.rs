//! # 调试输出模块
//!
//! 编解码核心本身没有副作用；需要观察内部过程时，由调用方传入一个 [`DebugSink`]。

use crate::frame::MessageKind;

/// 编解码过程中产生的可观察事件。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecEvent {
    /// 容量检查。
    Capacity { required: usize, available: usize },
    /// 帧头已写入或已读出。
    Header { kind: MessageKind, length: u32 },
    /// 某个地址的字节被写入一个比特。
    BitWritten { address: usize, before: u8, after: u8 },
    /// 从某个地址读出一个比特。
    BitRead { address: usize, value: u8 },
}

/// 调试事件的接收者。
pub trait DebugSink {
    fn record(&self, event: &CodecEvent);
}

/// 丢弃所有事件。
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl DebugSink for Silent {
    fn record(&self, _event: &CodecEvent) {}
}

/// 将事件转发到 `tracing`：汇总事件用 `debug`，逐比特事件用 `trace`。
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DebugSink for TracingSink {
    fn record(&self, event: &CodecEvent) {
        match *event {
            CodecEvent::Capacity {
                required,
                available,
            } => tracing::debug!(required, available, "capacity check"),
            CodecEvent::Header { kind, length } => {
                tracing::debug!(%kind, length, "frame header")
            }
            CodecEvent::BitWritten {
                address,
                before,
                after,
            } => tracing::trace!(address, before, after, bit = after & 0x01, "bit written"),
            CodecEvent::BitRead { address, value } => {
                tracing::trace!(address, value, "bit read")
            }
        }
    }
}
