//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use crate::pixels::ChannelPolicy;
use clap::{Args, Parser};
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，在无损格式图像 (如 PNG, BMP) 的像素中隐藏或恢复消息。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，在无损格式图像 (如 PNG, BMP) 的像素中隐藏或恢复消息。\n与 Node 插件和 WebAssembly 模块使用同一种帧格式。"
)]
pub struct Cli {
    /// 输出逐比特的调试信息 (等同于 RUST_LOG=lsb_bridge=trace)。
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏)、recover (恢复) 和 capacity (容量)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在无损格式图像中隐藏文件内容。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的消息。
    Recover(RecoverArgs),

    /// 显示图像可隐藏的最大比特数与字节数。
    Capacity(CapacityArgs),
}

/// 通道选择参数，隐藏与恢复时必须一致。
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct PolicyArgs {
    /// 将 alpha 通道也用于隐写 (默认跳过)。
    #[arg(long)]
    pub include_alpha: bool,

    /// 跳过纯白像素。
    #[arg(long)]
    pub skip_white: bool,

    /// 跳过纯黑像素。
    #[arg(long)]
    pub skip_black: bool,
}

impl PolicyArgs {
    pub fn policy(&self) -> ChannelPolicy {
        ChannelPolicy {
            skip_alpha: !self.include_alpha,
            skip_white: self.skip_white,
            skip_black: self.skip_black,
        }
    }
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的内容的文件路径。
    #[arg(short, long)]
    pub text: PathBuf,

    /// 结果图像的输出路径，默认为输入图像旁的 `doctored_<名称>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 以二进制消息隐藏文件内容，不要求其为 UTF-8 文本。
    #[arg(short, long)]
    pub binary: bool,

    /// 输出文件已存在时覆盖它。
    #[arg(short, long)]
    pub force: bool,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏消息的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复内容的输出路径，默认为图像旁的 `recovered_<名称>.txt` (二进制消息为 `.bin`)。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 输出文件已存在时覆盖它。
    #[arg(short, long)]
    pub force: bool,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要检查的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    #[command(flatten)]
    pub policy: PolicyArgs,
}
