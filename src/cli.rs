//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，并把原始参数校验为编码或解码操作。
//!
//! ```text
//! lsb_stego -e <image.bmp> <secret.txt> [output.bmp]
//! lsb_stego -d <stego.bmp> [output.txt]
//! ```

use crate::constants::{
    DEFAULT_DECODED_FILE, DEFAULT_STEGO_FILE, IMAGE_EXTENSION, SECRET_EXTENSION,
};
use crate::error::{StegoError, StegoResult};
use clap::{ArgAction, ArgGroup, Parser};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在 24 位 BMP 图像中隐藏或恢复秘密文件。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在 24 位 BMP 图像中隐藏或恢复秘密文件。",
    group(ArgGroup::new("operation").required(true).args(["encode", "decode"]))
)]
pub struct Cli {
    /// 编码：<image.bmp> <secret.txt> [output.bmp]，默认输出 stego.bmp。
    #[arg(short = 'e', num_args = 2..=3, value_names = ["IMAGE", "SECRET", "OUTPUT"])]
    pub encode: Option<Vec<PathBuf>>,

    /// 解码：<stego.bmp> [output.txt]，默认输出 decodedfile.txt。
    #[arg(short = 'd', num_args = 1..=2, value_names = ["STEGO", "OUTPUT"])]
    pub decode: Option<Vec<PathBuf>>,

    /// 魔术字符串。省略时在终端中交互输入。
    #[arg(short, long)]
    pub magic: Option<String>,

    /// 提高日志详细程度 (-v, -vv)。RUST_LOG 环境变量优先。
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// 校验后的操作。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Encode(EncodeArgs),
    Decode(DecodeArgs),
}

/// 编码操作所需的参数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeArgs {
    /// 用作载体的 BMP 图像。
    pub image: PathBuf,
    /// 要隐藏的秘密文件。
    pub secret: PathBuf,
    /// 隐写结果的输出路径。
    pub dest: PathBuf,
    pub magic: Option<String>,
}

/// 解码操作所需的参数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeArgs {
    /// 已隐藏数据的 BMP 图像。
    pub image: PathBuf,
    /// 恢复出的秘密文件的输出路径。
    pub output: PathBuf,
    pub magic: Option<String>,
}

fn has_extension(path: &Path, expected: &str) -> bool {
    path.extension() == Some(OsStr::new(expected))
}

fn require_extension(path: &Path, expected: &str, role: &str) -> StegoResult<()> {
    if has_extension(path, expected) {
        Ok(())
    } else {
        Err(StegoError::Argument(format!(
            "{role} file '{}' should be .{expected}",
            path.display()
        )))
    }
}

/// 编码输出不是 `.bmp` 时回退到默认文件名。
fn resolve_stego_output(dest: Option<PathBuf>) -> PathBuf {
    match dest {
        Some(dest) if has_extension(&dest, IMAGE_EXTENSION) => dest,
        Some(dest) => {
            tracing::warn!(
                "output '{}' is not a .{IMAGE_EXTENSION} file, using {DEFAULT_STEGO_FILE}",
                dest.display()
            );
            PathBuf::from(DEFAULT_STEGO_FILE)
        }
        None => PathBuf::from(DEFAULT_STEGO_FILE),
    }
}

/// 解码输出没有扩展名时追加 `.txt`；带有其他扩展名时视为错误。
fn resolve_decoded_output(output: Option<PathBuf>) -> StegoResult<PathBuf> {
    let Some(output) = output else {
        return Ok(PathBuf::from(DEFAULT_DECODED_FILE));
    };

    if output.extension().is_none() {
        let mut name = output.into_os_string();
        name.push(format!(".{SECRET_EXTENSION}"));
        return Ok(PathBuf::from(name));
    }

    require_extension(&output, SECRET_EXTENSION, "output")?;
    Ok(output)
}

impl EncodeArgs {
    /// 根据 `-e` 之后的位置参数构造编码参数。
    pub fn from_values(values: Vec<PathBuf>, magic: Option<String>) -> StegoResult<Self> {
        let mut values = values.into_iter();
        let (Some(image), Some(secret)) = (values.next(), values.next()) else {
            return Err(StegoError::Argument(
                "not enough arguments for encoding: -e <image.bmp> <secret.txt> [output.bmp]"
                    .to_string(),
            ));
        };

        require_extension(&image, IMAGE_EXTENSION, "source image")?;
        require_extension(&secret, SECRET_EXTENSION, "secret")?;

        Ok(Self {
            image,
            secret,
            dest: resolve_stego_output(values.next()),
            magic,
        })
    }
}

impl DecodeArgs {
    /// 根据 `-d` 之后的位置参数构造解码参数。
    pub fn from_values(values: Vec<PathBuf>, magic: Option<String>) -> StegoResult<Self> {
        let mut values = values.into_iter();
        let Some(image) = values.next() else {
            return Err(StegoError::Argument(
                "not enough arguments for decoding: -d <stego.bmp> [output.txt]".to_string(),
            ));
        };

        require_extension(&image, IMAGE_EXTENSION, "stego image")?;

        Ok(Self {
            image,
            output: resolve_decoded_output(values.next())?,
            magic,
        })
    }
}

impl Cli {
    /// 将解析出的参数校验为具体操作。
    ///
    /// # Errors
    ///
    /// 文件扩展名不符合要求或参数缺失时返回 [`StegoError::Argument`]。
    pub fn operation(self) -> StegoResult<Operation> {
        match (self.encode, self.decode) {
            (Some(values), None) => {
                EncodeArgs::from_values(values, self.magic).map(Operation::Encode)
            }
            (None, Some(values)) => {
                DecodeArgs::from_values(values, self.magic).map(Operation::Decode)
            }
            _ => Err(StegoError::Argument(
                "exactly one of -e or -d must be given".to_string(),
            )),
        }
    }
}
