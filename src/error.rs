//! # 错误类型模块
//!
//! 库内部使用 `thiserror` 定义的类型化错误；命令处理层再用 `anyhow` 附加上下文。

use crate::container::Stage;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 隐写编解码过程中可能出现的错误。
#[derive(Debug, Error)]
pub enum StegoError {
    /// 命令行参数缺失或文件扩展名不符合要求。
    #[error("invalid arguments: {0}")]
    Argument(String),

    #[error("unable to open {role} file '{}'", path.display())]
    FileOpen {
        role: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 载体图像容量不足以容纳元数据和载荷。
    #[error("not enough capacity in the carrier image (required {required} bits, available {available})")]
    Capacity { required: u64, available: u64 },

    #[error("malformed BMP header: expected {expected} bytes, found {found}")]
    MalformedHeader { expected: usize, found: usize },

    /// 在读完一个字段之前载体数据已经耗尽。
    #[error("carrier data ended unexpectedly at byte offset {offset}")]
    TruncatedCarrier { offset: u64 },

    #[error("magic string mismatch: expected {expected:?}, found {found:?}")]
    TagMismatch { expected: String, found: String },

    #[error("invalid extension size: {0}")]
    InvalidExtensionSize(i64),

    #[error("invalid secret file size: {0}")]
    InvalidPayloadSize(i64),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// 编解码流水线中某一阶段失败时返回的错误，记录失败的阶段。
#[derive(Debug, Error)]
#[error("failed while {stage}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: StegoError,
}

impl PipelineError {
    /// 返回导致失败的底层错误。
    pub fn kind(&self) -> &StegoError {
        &self.source
    }
}

pub type StegoResult<T> = Result<T, StegoError>;
