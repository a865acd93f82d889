//! # LSB 位通道模块
//!
//! 把像素缓冲区视为一串按地址顺序排列的比特：每个参与隐写的通道字节只承载其最低有效位。
//! 嵌入与提取共用 [`carrier_addresses`]，保证两条路径以完全相同的顺序遍历地址。

use crate::error::{Result, StegoError};
use crate::pixels::{ChannelPolicy, PixelBuffer, PixelLayout};

/// 将 `buffer[address]` 的最低位设为 `bit`，其余 7 位保持不变。
///
/// # Errors
///
/// 地址越界时返回 `InsufficientCapacity`。
pub fn write_bit(buffer: &mut [u8], address: usize, bit: u8) -> Result<()> {
    let available = buffer.len();
    let byte = buffer
        .get_mut(address)
        .ok_or(StegoError::InsufficientCapacity {
            required: address.saturating_add(1),
            available,
        })?;
    *byte = (*byte & 0xFE) | (bit & 0x01);
    Ok(())
}

/// 读取 `buffer[address]` 的最低位。
///
/// # Errors
///
/// 地址越界时返回 `InsufficientData`。
pub fn read_bit(buffer: &[u8], address: usize) -> Result<u8> {
    buffer
        .get(address)
        .map(|&byte| byte & 0x01)
        .ok_or(StegoError::InsufficientData {
            required: address.saturating_add(1),
            available: buffer.len(),
        })
}

/// 按升序列出本策略下可承载数据的字节地址。
///
/// 像素过滤只依赖通道的高 7 位，所以在嵌入前后得到的地址序列相同。
pub fn carrier_addresses(
    buffer: &PixelBuffer,
    policy: ChannelPolicy,
) -> impl Iterator<Item = usize> + '_ {
    let layout = buffer.layout();
    let channels = layout.channels as usize;

    buffer
        .as_bytes()
        .chunks_exact(channels)
        .enumerate()
        .filter(move |(_, pixel)| !policy.skips_pixel(pixel, &layout))
        .flat_map(move |(index, _)| {
            (0..channels)
                .filter(move |&c| !policy.skips_channel(c, &layout))
                .map(move |c| index * channels + c)
        })
}

/// 从 `from` 开始 (含) 查找下一个可承载数据的地址，直接读取当前字节。
///
/// 与 [`carrier_addresses`] 给出相同的序列，但不借用 [`PixelBuffer`]，
/// 因此可以一边写入一边前进。
pub(crate) fn next_address(
    bytes: &[u8],
    layout: &PixelLayout,
    policy: ChannelPolicy,
    from: usize,
) -> Option<usize> {
    let channels = layout.channels as usize;
    let mut pixel = from / channels;
    let mut channel = from % channels;
    while let Some(values) = bytes.get(pixel * channels..(pixel + 1) * channels) {
        if !policy.skips_pixel(values, layout) {
            let next = (channel..channels).find(|&c| !policy.skips_channel(c, layout));
            if let Some(c) = next {
                return Some(pixel * channels + c);
            }
        }
        pixel += 1;
        channel = 0;
    }
    None
}

/// 本策略下载体可承载的比特数。
pub fn capacity(buffer: &PixelBuffer, policy: ChannelPolicy) -> usize {
    let layout = buffer.layout();
    if !policy.skip_white && !policy.skip_black {
        let per_pixel = (0..layout.channels as usize)
            .filter(|&c| !policy.skips_channel(c, &layout))
            .count();
        return buffer.len() / layout.channels as usize * per_pixel;
    }
    carrier_addresses(buffer, policy).count()
}

/// 按字节顺序、每字节高位在前展开比特。
pub fn bits_msb_first(bytes: &[u8]) -> impl Iterator<Item = u8> + '_ {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |shift| (byte >> shift) & 0x01))
}

/// 将高位在前的比特重新打包为字节，末尾不足 8 位的部分被丢弃。
pub fn pack_bits_msb_first(bits: &[u8]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | (bit & 0x01)))
        .collect()
}
