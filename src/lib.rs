//! # lsb_stego 库
//!
//! 本库包含 LSB 隐写工具的核心逻辑：位打包、流式编解码、容量规划和容器格式，
//! 以及命令行层使用的参数校验和命令处理。

// 声明库包含的所有模块。

pub mod capacity;
pub mod cli;
pub mod codec;
pub mod constants;
pub mod container;
pub mod error;
pub mod handler;
pub mod steganography;
pub mod tag;

pub use container::{DecodeReport, EncodeReport, Stage, decode, encode};
pub use error::{PipelineError, StegoError, StegoResult};
pub use tag::{ExtensionTag, Tag};
