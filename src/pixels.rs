//! # 像素缓冲区模块
//!
//! 描述载体的数据模型：交错排列的 8 位通道字节及其宽、高、通道数元数据，
//! 以及决定哪些通道字节参与隐写的 [`ChannelPolicy`]。

use crate::constants::MAX_CHANNELS;
use crate::error::{Result, StegoError};

/// 像素缓冲区的形状。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelLayout {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
}

impl PixelLayout {
    /// 创建并校验布局。
    ///
    /// # Errors
    ///
    /// 通道数不在 1..=4 之间，或总字节数溢出 `usize` 时返回 `UnsupportedCarrierFormat`。
    pub fn new(width: u32, height: u32, channels: u8) -> Result<Self> {
        if channels == 0 || channels > MAX_CHANNELS {
            return Err(StegoError::UnsupportedCarrierFormat(format!(
                "expected 1 to {MAX_CHANNELS} channels per pixel, got {channels}"
            )));
        }
        let layout = Self {
            width,
            height,
            channels,
        };
        layout.byte_len()?;
        Ok(layout)
    }

    /// 布局对应的字节数。
    pub fn byte_len(&self) -> Result<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(self.channels as usize))
            .ok_or_else(|| {
                StegoError::UnsupportedCarrierFormat(format!(
                    "{}x{}x{} overflows the addressable size",
                    self.width, self.height, self.channels
                ))
            })
    }

    /// 2 通道 (灰度 + alpha) 与 4 通道 (RGBA) 布局的最后一个通道为 alpha。
    pub fn has_alpha(&self) -> bool {
        self.channels == 2 || self.channels == 4
    }

    /// 参与颜色判断的通道数 (不含 alpha)。
    pub fn color_channels(&self) -> usize {
        if self.has_alpha() {
            self.channels as usize - 1
        } else {
            self.channels as usize
        }
    }
}

/// 载体：像素字节与其布局。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    layout: PixelLayout,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// 用已有的字节创建载体。
    ///
    /// # Errors
    ///
    /// 字节数与布局不符时返回 `UnsupportedCarrierFormat`。
    pub fn new(layout: PixelLayout, data: Vec<u8>) -> Result<Self> {
        let expected = layout.byte_len()?;
        if data.len() != expected {
            return Err(StegoError::UnsupportedCarrierFormat(format!(
                "{}x{}x{} layout needs {expected} bytes, buffer has {}",
                layout.width,
                layout.height,
                layout.channels,
                data.len()
            )));
        }
        Ok(Self { layout, data })
    }

    pub fn from_raw(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        Self::new(PixelLayout::new(width, height, channels)?, data)
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// 选择参与隐写的通道字节。嵌入与提取必须使用同一策略。
///
/// 白色与黑色像素的判断只看颜色通道的高 7 位，因此不会被 LSB 修改所改变。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelPolicy {
    /// 跳过 alpha 通道 (仅对带 alpha 的布局生效)。
    pub skip_alpha: bool,
    /// 跳过 (近似) 纯白像素。
    pub skip_white: bool,
    /// 跳过 (近似) 纯黑像素。
    pub skip_black: bool,
}

impl Default for ChannelPolicy {
    /// 线上约定：跳过 alpha，不过滤任何像素。
    fn default() -> Self {
        Self {
            skip_alpha: true,
            skip_white: false,
            skip_black: false,
        }
    }
}

impl ChannelPolicy {
    /// 所有通道字节都参与隐写。
    pub fn all_channels() -> Self {
        Self {
            skip_alpha: false,
            skip_white: false,
            skip_black: false,
        }
    }

    /// 本策略下该像素的所有通道是否都被跳过。
    pub(crate) fn skips_pixel(&self, pixel: &[u8], layout: &PixelLayout) -> bool {
        let color = &pixel[..layout.color_channels()];
        (self.skip_white && color.iter().all(|&c| c & 0xFE == 0xFE))
            || (self.skip_black && color.iter().all(|&c| c & 0xFE == 0))
    }

    /// 本策略下像素内第 `index` 个通道是否被跳过。
    pub(crate) fn skips_channel(&self, index: usize, layout: &PixelLayout) -> bool {
        self.skip_alpha && layout.has_alpha() && index == layout.channels as usize - 1
    }
}
