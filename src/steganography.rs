//! # 隐写引擎模块
//!
//! 组合消息帧编解码与 LSB 位通道：把帧逐位写入载体，或从载体中读出并校验帧。
//! 所有检查都在第一次写入之前完成，嵌入要么完整成功，要么不改动任何字节。

use crate::channel::{
    bits_msb_first, capacity, carrier_addresses, next_address, pack_bits_msb_first, read_bit,
    write_bit,
};
use crate::constants::HEADER_BITS;
use crate::error::{Result, StegoError};
use crate::frame::{self, FrameHeader, Message};
use crate::pixels::{ChannelPolicy, PixelBuffer};
use crate::trace::{CodecEvent, DebugSink, Silent};

/// 消息成帧后所需的载体比特数。
pub fn required_bits(message: &Message) -> Result<usize> {
    FrameHeader::for_message(message)?;
    message
        .frame_len()
        .checked_mul(8)
        .ok_or(StegoError::PayloadTooLarge {
            length: message.payload().len(),
        })
}

/// 将消息嵌入载体的副本并返回该副本，原载体不被修改。
pub fn embed(
    carrier: &PixelBuffer,
    message: &Message,
    policy: ChannelPolicy,
) -> Result<PixelBuffer> {
    embed_with(carrier, message, policy, &Silent)
}

pub fn embed_with(
    carrier: &PixelBuffer,
    message: &Message,
    policy: ChannelPolicy,
    sink: &dyn DebugSink,
) -> Result<PixelBuffer> {
    let frame = plan(carrier, message, policy, sink)?;
    let mut doctored = carrier.clone();
    write_frame(&mut doctored, &frame, policy, sink)?;
    Ok(doctored)
}

/// 直接在调用方的载体上嵌入消息。
///
/// # Errors
///
/// 容量不足时返回 `InsufficientCapacity`，此时载体保持原样。
pub fn embed_in_place(
    carrier: &mut PixelBuffer,
    message: &Message,
    policy: ChannelPolicy,
    sink: &dyn DebugSink,
) -> Result<()> {
    let frame = plan(carrier, message, policy, sink)?;
    write_frame(carrier, &frame, policy, sink)
}

/// 从载体中提取消息。
pub fn extract(carrier: &PixelBuffer, policy: ChannelPolicy) -> Result<Message> {
    extract_with(carrier, policy, &Silent)
}

pub fn extract_with(
    carrier: &PixelBuffer,
    policy: ChannelPolicy,
    sink: &dyn DebugSink,
) -> Result<Message> {
    let available = capacity(carrier, policy);
    if available < HEADER_BITS {
        return Err(StegoError::InsufficientData {
            required: HEADER_BITS,
            available,
        });
    }

    let bytes = carrier.as_bytes();
    let mut addresses = carrier_addresses(carrier, policy);

    let header_bits = read_bits(bytes, &mut addresses, HEADER_BITS, sink)?;
    let header_bytes = pack_bits_msb_first(&header_bits);
    let header = FrameHeader::decode(&header_bytes)?;
    sink.record(&CodecEvent::Header {
        kind: header.kind,
        length: header.length,
    });

    let payload_bits = header.payload_len().checked_mul(8);
    let required = payload_bits.and_then(|bits| bits.checked_add(HEADER_BITS));
    let payload_bits = match (payload_bits, required) {
        (Some(bits), Some(required)) if required <= available => bits,
        (_, required) => {
            return Err(StegoError::InsufficientData {
                required: required.unwrap_or(usize::MAX),
                available,
            });
        }
    };

    let bits = read_bits(bytes, &mut addresses, payload_bits, sink)?;
    let mut frame_bytes = header_bytes;
    frame_bytes.extend(pack_bits_msb_first(&bits));

    frame::deserialize(&frame_bytes)
}

/// 序列化消息并检查容量；容量不足时在任何写入前失败。
fn plan(
    carrier: &PixelBuffer,
    message: &Message,
    policy: ChannelPolicy,
    sink: &dyn DebugSink,
) -> Result<Vec<u8>> {
    let frame = frame::serialize(message)?;
    let required = required_bits(message)?;

    let available = capacity(carrier, policy);
    sink.record(&CodecEvent::Capacity {
        required,
        available,
    });
    if required > available {
        return Err(StegoError::InsufficientCapacity {
            required,
            available,
        });
    }

    let header = FrameHeader::for_message(message)?;
    sink.record(&CodecEvent::Header {
        kind: header.kind,
        length: header.length,
    });

    Ok(frame)
}

/// 边写边按下标前进。写入只改最低位，不影响后续地址的判定。
fn write_frame(
    carrier: &mut PixelBuffer,
    frame: &[u8],
    policy: ChannelPolicy,
    sink: &dyn DebugSink,
) -> Result<()> {
    let layout = carrier.layout();
    let bytes = carrier.as_bytes_mut();
    let mut cursor = 0;
    for (written, bit) in bits_msb_first(frame).enumerate() {
        let address = next_address(bytes, &layout, policy, cursor).ok_or_else(|| {
            StegoError::InsufficientCapacity {
                required: frame.len() * 8,
                available: written,
            }
        })?;
        let before = bytes[address];
        write_bit(bytes, address, bit)?;
        sink.record(&CodecEvent::BitWritten {
            address,
            before,
            after: bytes[address],
        });
        cursor = address + 1;
    }
    Ok(())
}

fn read_bits(
    bytes: &[u8],
    addresses: &mut impl Iterator<Item = usize>,
    count: usize,
    sink: &dyn DebugSink,
) -> Result<Vec<u8>> {
    let mut bits = Vec::with_capacity(count);
    for address in addresses.by_ref().take(count) {
        let value = read_bit(bytes, address)?;
        sink.record(&CodecEvent::BitRead { address, value });
        bits.push(value);
    }
    if bits.len() < count {
        return Err(StegoError::InsufficientData {
            required: count,
            available: bits.len(),
        });
    }
    Ok(bits)
}
