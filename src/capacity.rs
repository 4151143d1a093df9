//! # 容量规划
//!
//! 在写入任何数据之前判断载体图像能否容纳元数据和载荷。
//! 每个载体字节只携带 1 bit，所以图像的字节容量直接与所需 bit 数比较。

use crate::constants::{
    BMP_HEADER_SIZE, BYTES_PER_PIXEL, HEIGHT_OFFSET, INT_FIELD_SIZE, WIDTH_OFFSET,
};
use crate::error::{StegoError, StegoResult};

/// 一次编码操作的容量核算结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityPlan {
    pub capacity: u64,
    pub required_bits: u64,
}

fn read_i32_le(header: &[u8], offset: usize) -> i32 {
    let mut field = [0u8; 4];
    field.copy_from_slice(&header[offset..offset + 4]);
    i32::from_le_bytes(field)
}

/// 从 BMP 头部读取宽度和高度，返回像素数据的字节容量 (宽 × 高 × 3)。
///
/// 高度为负表示自上而下存储的位图，取绝对值计算。行填充不计入容量。
///
/// # Errors
///
/// 头部不足 54 字节时返回 [`StegoError::MalformedHeader`]。
pub fn image_capacity(header: &[u8]) -> StegoResult<u64> {
    if header.len() < BMP_HEADER_SIZE {
        return Err(StegoError::MalformedHeader {
            expected: BMP_HEADER_SIZE,
            found: header.len(),
        });
    }

    let width = read_i32_le(header, WIDTH_OFFSET);
    let height = read_i32_le(header, HEIGHT_OFFSET);
    tracing::debug!(width, height, "read bitmap geometry");

    Ok(u64::from(width.unsigned_abs()) * u64::from(height.unsigned_abs()) * BYTES_PER_PIXEL)
}

/// 计算编码区域需要的 bit 数：魔术字符串、扩展名长度、扩展名、载荷长度和载荷本身。
///
/// BMP 头部是原样复制的，不计入。
pub fn required_bits(tag: &[u8], extension_len: usize, payload_len: u64) -> u64 {
    let metadata = tag.len() + INT_FIELD_SIZE + extension_len + INT_FIELD_SIZE;
    (metadata as u64 + payload_len) * 8
}

/// 容量必须严格大于所需 bit 数，相等也视为不足。
pub fn check_capacity(capacity: u64, required: u64) -> bool {
    capacity > required
}

/// 结合头部和待写入字段完成容量核算。
///
/// # Errors
///
/// 头部损坏时返回 [`StegoError::MalformedHeader`]，容量不足时返回 [`StegoError::Capacity`]。
pub fn plan(
    header: &[u8],
    tag: &[u8],
    extension_len: usize,
    payload_len: u64,
) -> StegoResult<CapacityPlan> {
    let capacity = image_capacity(header)?;
    let required = required_bits(tag, extension_len, payload_len);

    if !check_capacity(capacity, required) {
        return Err(StegoError::Capacity {
            required,
            available: capacity,
        });
    }

    Ok(CapacityPlan {
        capacity,
        required_bits: required,
    })
}
