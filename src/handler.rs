//! # 命令处理逻辑模块
//!
//! 包含处理编码 (`-e`) 和解码 (`-d`) 操作的高级业务逻辑。
//! 本模块负责获取魔术字符串、打开文件、调用容器编解码流水线以及向用户报告结果。

use crate::cli::{DecodeArgs, EncodeArgs};
use crate::container;
use crate::error::{StegoError, StegoResult};
use crate::tag::{ExtensionTag, Tag};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

fn open_input(path: &Path, role: &'static str) -> StegoResult<File> {
    File::open(path).map_err(|source| StegoError::FileOpen {
        role,
        path: path.to_path_buf(),
        source,
    })
}

fn create_output(path: &Path, role: &'static str) -> StegoResult<File> {
    File::create(path).map_err(|source| StegoError::FileOpen {
        role,
        path: path.to_path_buf(),
        source,
    })
}

/// 在终端中提示输入魔术字符串，取输入的第一个单词。
pub fn prompt_tag<R: BufRead, W: Write>(mut input: R, mut prompt: W) -> Result<Tag> {
    write!(prompt, "Enter magic string: ")?;
    prompt.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Unable to read the magic string from standard input")?;

    let word = line.split_whitespace().next().unwrap_or_default();
    Ok(Tag::new(word)?)
}

fn resolve_tag(magic: Option<String>) -> Result<Tag> {
    match magic {
        Some(magic) => Ok(Tag::new(magic)?),
        None => prompt_tag(io::stdin().lock(), io::stdout()),
    }
}

/// 处理编码操作的执行逻辑。
///
/// 负责获取魔术字符串、打开载体图像、秘密文件和输出图像，
/// 然后将秘密文件隐藏进载体图像中。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 魔术字符串无效，或秘密文件的扩展名不是 4 字节。
/// * 无法打开输入文件或创建输出文件。
/// * 载体图像容量不足。
/// * 编码流水线的任一阶段失败 (此时输出文件可能只写入了一部分)。
pub fn handle_encode(args: EncodeArgs) -> Result<()> {
    let tag = resolve_tag(args.magic)?;
    let extension = ExtensionTag::from_path(&args.secret).with_context(|| {
        format!(
            "Unsupported secret file extension: {}",
            args.secret.to_string_lossy().red().bold()
        )
    })?;

    let carrier = open_input(&args.image, "source image")?;
    let secret = open_input(&args.secret, "secret")?;
    let output = create_output(&args.dest, "stego image")?;
    info!(image = %args.image.display(), secret = %args.secret.display(), "encoding started");

    let report = container::encode(
        BufReader::new(carrier),
        BufReader::new(secret),
        BufWriter::new(output),
        &tag,
        &extension,
    )
    .with_context(|| {
        format!(
            "Failed to hide {} in {}",
            args.secret.to_string_lossy().red().bold(),
            args.image.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The secret file ({} bytes) has been successfully hidden and saved: {}",
        report.payload_len.to_string().green(),
        args.dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理解码操作的执行逻辑。
///
/// 负责获取魔术字符串、打开隐写图像并创建输出文件，
/// 然后校验魔术字符串并恢复秘密文件内容。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法打开隐写图像或创建输出文件。
/// * 魔术字符串不匹配。
/// * 扩展名长度或秘密文件长度字段无效。
/// * 图像数据在读完隐藏内容之前结束。
pub fn handle_decode(args: DecodeArgs) -> Result<()> {
    let tag = resolve_tag(args.magic)?;

    let stego = open_input(&args.image, "stego image")?;
    let output = create_output(&args.output, "decoded")?;
    info!(image = %args.image.display(), "decoding started");

    let report = container::decode(BufReader::new(stego), BufWriter::new(output), &tag)
        .with_context(|| {
            format!(
                "Failed to recover the secret file from {}",
                args.image.to_string_lossy().red().bold()
            )
        })?;

    println!(
        "The secret {} file ({} bytes) has been successfully recovered and saved: {}",
        report.extension.to_string().green(),
        report.payload_len.to_string().green(),
        args.output.to_string_lossy().green().bold()
    );

    Ok(())
}
