//! # 容器格式
//!
//! 输出图像的布局依次为：
//!
//! ```text
//! [BMP 头部 54 字节，原样复制]
//! [魔术字符串]           LSB 编码
//! [扩展名长度 i32 LE = 4] LSB 编码
//! [扩展名 4 字节]         LSB 编码
//! [载荷长度 i32 LE]       LSB 编码
//! [载荷]                 LSB 编码
//! [剩余像素数据，原样复制]
//! ```
//!
//! 编码和解码都是严格按顺序推进的流水线，任何一个阶段失败都会立即终止，
//! 已经写出的部分不会回滚。

use crate::capacity;
use crate::codec::{LsbDecoder, LsbEncoder};
use crate::constants::{BMP_HEADER_SIZE, EXTENSION_SIZE};
use crate::error::{PipelineError, StegoError, StegoResult};
use crate::tag::{ExtensionTag, Tag};
use std::fmt;
use std::io::{Read, Seek, SeekFrom, Write};
use tracing::{debug, info};

/// 编解码流水线的各个阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CapacityCheck,
    HeaderCopy,
    HeaderSkip,
    Tag,
    ExtensionSize,
    Extension,
    PayloadSize,
    Payload,
    RemainderCopy,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::CapacityCheck => "checking capacity",
            Stage::HeaderCopy => "copying the BMP header",
            Stage::HeaderSkip => "skipping the BMP header",
            Stage::Tag => "processing the magic string",
            Stage::ExtensionSize => "processing the secret file extension size",
            Stage::Extension => "processing the secret file extension",
            Stage::PayloadSize => "processing the secret file size",
            Stage::Payload => "processing the secret file data",
            Stage::RemainderCopy => "copying the remaining image data",
        };
        f.write_str(name)
    }
}

/// 为阶段结果标注所属阶段。
trait AtStage<T> {
    fn at(self, stage: Stage) -> Result<T, PipelineError>;
}

impl<T, E: Into<StegoError>> AtStage<T> for Result<T, E> {
    fn at(self, stage: Stage) -> Result<T, PipelineError> {
        self.map_err(|source| PipelineError {
            stage,
            source: source.into(),
        })
    }
}

/// 编码完成后的统计信息。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeReport {
    /// 载体图像的容量 (字节)。
    pub capacity: u64,
    /// 编码区域所需的 bit 数。
    pub required_bits: u64,
    /// 隐藏的载荷字节数。
    pub payload_len: u64,
    /// 被修改了最低位的载体字节数。
    pub coded_bytes: u64,
    /// 原样复制的剩余载体字节数。
    pub remainder_bytes: u64,
}

/// 解码完成后得到的元数据。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeReport {
    pub extension: ExtensionTag,
    pub payload_len: u64,
}

/// 读取固定大小的 BMP 头部。
fn read_header<R: Read>(carrier: &mut R) -> StegoResult<[u8; BMP_HEADER_SIZE]> {
    let mut header = Vec::with_capacity(BMP_HEADER_SIZE);
    carrier
        .by_ref()
        .take(BMP_HEADER_SIZE as u64)
        .read_to_end(&mut header)?;

    header
        .as_slice()
        .try_into()
        .map_err(|_| StegoError::MalformedHeader {
            expected: BMP_HEADER_SIZE,
            found: header.len(),
        })
}

/// 通过定位到末尾获取载荷长度，再回到开头。长度必须在 `1..=i32::MAX` 内。
fn payload_size<P: Seek>(payload: &mut P) -> StegoResult<i32> {
    let len = payload.seek(SeekFrom::End(0))?;
    payload.rewind()?;

    match i32::try_from(len) {
        Ok(len) if len > 0 => Ok(len),
        _ => Err(StegoError::InvalidPayloadSize(
            i64::try_from(len).unwrap_or(i64::MAX),
        )),
    }
}

/// 将 `payload` 隐藏进 `carrier`，结果写入 `output`。
///
/// 在写出任何字节之前先完成容量检查。
///
/// # Errors
///
/// 返回第一个失败阶段及其原因。失败时 `output` 中可能已有部分数据。
pub fn encode<C, P, W>(
    mut carrier: C,
    mut payload: P,
    mut output: W,
    tag: &Tag,
    extension: &ExtensionTag,
) -> Result<EncodeReport, PipelineError>
where
    C: Read,
    P: Read + Seek,
    W: Write,
{
    let payload_len = payload_size(&mut payload).at(Stage::CapacityCheck)?;
    let header = read_header(&mut carrier).at(Stage::CapacityCheck)?;
    let plan = capacity::plan(
        &header,
        tag.as_bytes(),
        EXTENSION_SIZE,
        payload_len as u64,
    )
    .at(Stage::CapacityCheck)?;
    info!(
        capacity = plan.capacity,
        required_bits = plan.required_bits,
        payload_len,
        "enough capacity to encode data"
    );

    output.write_all(&header).at(Stage::HeaderCopy)?;
    debug!("header copied");

    let mut encoder = LsbEncoder::new(carrier, output, BMP_HEADER_SIZE as u64);

    encoder.encode_bytes(tag.as_bytes()).at(Stage::Tag)?;
    debug!("magic string encoded");

    encoder
        .encode_i32_le(EXTENSION_SIZE as i32)
        .at(Stage::ExtensionSize)?;
    encoder
        .encode_bytes(extension.as_bytes())
        .at(Stage::Extension)?;
    debug!(%extension, "extension encoded");

    encoder.encode_i32_le(payload_len).at(Stage::PayloadSize)?;
    encoder
        .encode_stream(&mut payload, payload_len as u64)
        .at(Stage::Payload)?;
    debug!(payload_len, "secret data encoded");

    let coded_bytes = encoder.position() - BMP_HEADER_SIZE as u64;
    let remainder_bytes = encoder.copy_remainder().at(Stage::RemainderCopy)?;
    encoder.finish().at(Stage::RemainderCopy)?;
    info!(coded_bytes, remainder_bytes, "encoding finished");

    Ok(EncodeReport {
        capacity: plan.capacity,
        required_bits: plan.required_bits,
        payload_len: payload_len as u64,
        coded_bytes,
        remainder_bytes,
    })
}

/// 从 `carrier` 中恢复隐藏的载荷，逐字节写入 `output`。
///
/// `tag` 必须与编码时使用的魔术字符串一致。
///
/// # Errors
///
/// 魔术字符串不匹配、扩展名长度不是 4、载荷长度不为正数或载体提前结束时返回错误，
/// 并标明失败的阶段。
pub fn decode<C, W>(mut carrier: C, output: W, tag: &Tag) -> Result<DecodeReport, PipelineError>
where
    C: Read,
    W: Write,
{
    read_header(&mut carrier).at(Stage::HeaderSkip)?;
    let mut decoder = LsbDecoder::new(carrier, BMP_HEADER_SIZE as u64);

    let found = decoder.decode_bytes(tag.len()).at(Stage::Tag)?;
    if found != tag.as_bytes() {
        return Err(StegoError::TagMismatch {
            expected: tag.to_string(),
            found: String::from_utf8_lossy(&found).into_owned(),
        })
        .at(Stage::Tag);
    }
    debug!("magic string verified");

    let extension_size = decoder.decode_i32_le().at(Stage::ExtensionSize)?;
    if extension_size != EXTENSION_SIZE as i32 {
        return Err(StegoError::InvalidExtensionSize(extension_size.into()))
            .at(Stage::ExtensionSize);
    }

    let extension = ExtensionTag::from_bytes(decoder.decode_array().at(Stage::Extension)?);
    debug!(%extension, "extension decoded");

    let payload_len = decoder.decode_i32_le().at(Stage::PayloadSize)?;
    if payload_len <= 0 {
        return Err(StegoError::InvalidPayloadSize(payload_len.into())).at(Stage::PayloadSize);
    }

    let payload_len = decoder
        .decode_into(payload_len as u64, output)
        .at(Stage::Payload)?;
    info!(payload_len, %extension, "decoding finished");

    Ok(DecodeReport {
        extension,
        payload_len,
    })
}
