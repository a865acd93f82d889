//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::channel::capacity;
use crate::cli::{CapacityArgs, HideArgs, RecoverArgs};
use crate::constants::HEADER_LEN;
use crate::frame::{Message, MessageKind};
use crate::image_io::{fit_carrier, load_carrier, lossless_format, save_carrier};
use crate::steganography::{embed_with, extract_with, required_bits};
use crate::trace::TracingSink;
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_owned())
}

/// 未指定输出路径时，隐写图像保存为输入图像旁的 `doctored_<名称>.png`。
pub fn default_hide_dest(image: &Path) -> PathBuf {
    image.with_file_name(format!("doctored_{}.png", file_stem(image)))
}

/// 未指定输出路径时，恢复的内容保存为图像旁的 `recovered_<名称>.txt` 或 `.bin`。
pub fn default_recover_dest(image: &Path, kind: MessageKind) -> PathBuf {
    let extension = match kind {
        MessageKind::Text => "txt",
        MessageKind::Binary => "bin",
    };
    image.with_file_name(format!("recovered_{}.{extension}", file_stem(image)))
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和待隐藏的文件、检查隐写空间是否足够、调用隐写核心函数嵌入整帧，
/// 最后将结果写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径与通道选择的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`，或目标扩展名不是无损格式。
/// * 输出格式无法保存载体的通道布局 (灰度载体会先扩展为 RGB/RGBA)。
/// * 无法读取输入的图像或文件，或文本不是 UTF-8 且未指定 `--binary`。
/// * 图像没有足够的空间来隐藏消息。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_hide_dest(&args.image));
    ensure_writable(&dest, args.force)?;
    let format = lossless_format(&dest).with_context(|| {
        format!(
            "Cannot save the result as: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    let loaded = load_carrier(&args.image)?;
    let channels = loaded.layout().channels;
    let carrier = fit_carrier(loaded, format).with_context(|| {
        format!(
            "Cannot save the result as: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;
    if carrier.layout().channels != channels {
        tracing::debug!(
            from = channels,
            to = carrier.layout().channels,
            ?format,
            "widened carrier to fit the output format"
        );
    }

    let content = fs::read(&args.text).with_context(|| {
        format!(
            "Unable to read text file: {}",
            args.text.to_string_lossy().red().bold()
        )
    })?;
    let message = if args.binary {
        Message::binary(content)
    } else {
        let text = String::from_utf8(content).with_context(|| {
            format!(
                "Text file is not valid UTF-8: {}. \nUse --binary to hide arbitrary bytes.",
                args.text.to_string_lossy().red().bold()
            )
        })?;
        Message::text(text)
    };

    let policy = args.policy.policy();
    let required = required_bits(&message)?;
    let available = capacity(&carrier, policy);

    anyhow::ensure!(
        available >= required,
        "Not enough space in the image to hide the text. \nRequired: {} bits, Available: {} bits",
        required.to_string().red().bold(),
        available.to_string().green().bold()
    );

    let doctored = embed_with(&carrier, &message, policy, &TracingSink)
        .with_context(|| "Failed to hide the message in the image.")?;

    save_carrier(&dest, &doctored, format)?;

    println!(
        "The {} message has been successfully hidden and saved: {}",
        message.kind(),
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用恢复核心函数读出整帧，
/// 最后将恢复的内容写入目标文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径与通道选择的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件。
/// * 图像中没有可识别的帧，或帧不完整。
/// * 目标文件已存在且未指定 `--force`，或无法写入。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let carrier = load_carrier(&args.image)?;

    let message = extract_with(&carrier, args.policy.policy(), &TracingSink).with_context(|| {
        format!(
            "Failed to recover a message from '{}'. \nThe image may not contain a hidden message or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    if message.kind() == MessageKind::Text {
        message
            .as_text()
            .with_context(|| "The recovered text frame is corrupted.")?;
    }

    let dest = args
        .text
        .clone()
        .unwrap_or_else(|| default_recover_dest(&args.image, message.kind()));
    ensure_writable(&dest, args.force)?;

    fs::write(&dest, message.payload()).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The {} message has been successfully recovered and saved: {}",
        message.kind(),
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令：报告图像在当前通道选择下可容纳的比特数与最大负载字节数。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let carrier = load_carrier(&args.image)?;
    let bits = capacity(&carrier, args.policy.policy());
    let max_payload = (bits / 8).saturating_sub(HEADER_LEN);

    let layout = carrier.layout();
    println!(
        "{} ({}x{}, {} channels): {} bits, up to {} payload bytes",
        args.image.to_string_lossy().bold(),
        layout.width,
        layout.height,
        layout.channels,
        bits.to_string().green().bold(),
        max_payload.to_string().green().bold()
    );
    Ok(())
}
