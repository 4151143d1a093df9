//! # 元数据字段类型
//!
//! 魔术字符串 (`Tag`) 和固定 4 字节的文件扩展名 (`ExtensionTag`)。

use crate::constants::EXTENSION_SIZE;
use crate::error::{StegoError, StegoResult};
use std::fmt;
use std::path::Path;

/// 由操作者提供的魔术字符串，编码时写入图像，解码时逐字节比对。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag(String);

impl Tag {
    /// 创建魔术字符串。
    ///
    /// # Errors
    ///
    /// 字符串为空或包含空白字符时返回 [`StegoError::Argument`]。
    pub fn new(value: impl Into<String>) -> StegoResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(StegoError::Argument(
                "magic string must not be empty".to_string(),
            ));
        }
        if value.chars().any(char::is_whitespace) {
            return Err(StegoError::Argument(format!(
                "magic string {value:?} must not contain whitespace"
            )));
        }
        Ok(Self(value))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 秘密文件的扩展名字段，长度固定为 4 字节 (如 `.txt`)。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionTag([u8; EXTENSION_SIZE]);

impl ExtensionTag {
    /// 从字符串创建扩展名字段。
    ///
    /// 长度不是 4 字节的扩展名不会被截断或填充，而是直接拒绝。
    pub fn new(extension: &str) -> StegoResult<Self> {
        let bytes: [u8; EXTENSION_SIZE] = extension
            .as_bytes()
            .try_into()
            .map_err(|_| StegoError::InvalidExtensionSize(extension.len() as i64))?;
        Ok(Self(bytes))
    }

    /// 根据文件路径的扩展名创建字段，例如 `secret.txt` 得到 `.txt`。
    pub fn from_path(path: &Path) -> StegoResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                StegoError::Argument(format!("'{}' has no file extension", path.display()))
            })?;
        Self::new(&format!(".{extension}"))
    }

    /// 直接使用解码得到的原始字节。
    pub fn from_bytes(bytes: [u8; EXTENSION_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; EXTENSION_SIZE] {
        &self.0
    }
}

impl fmt::Display for ExtensionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}
