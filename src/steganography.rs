//! # LSB 位打包
//!
//! 一个载荷字节被拆成 8 bit，依次写入 8 个载体字节的最低位，最高位在前。

use crate::constants::CARRIER_BYTES_PER_BYTE;

/// 隐藏单个字节所需的载体字节组。
pub type CarrierGroup = [u8; CARRIER_BYTES_PER_BYTE];

/// 将 `value` 的 8 个 bit 写入 `carrier` 各字节的最低位。
///
/// `carrier[0]` 接收最高位，`carrier[7]` 接收最低位。其余 bit 保持不变。
pub fn pack_byte(value: u8, carrier: &mut CarrierGroup) {
    for (i, byte) in carrier.iter_mut().enumerate() {
        let bit = (value >> (7 - i)) & 1;
        *byte = (*byte & 0xFE) | bit;
    }
}

/// 从 8 个载体字节的最低位重建一个字节，最高位在前。
pub fn unpack_byte(carrier: &CarrierGroup) -> u8 {
    carrier
        .iter()
        .fold(0u8, |acc, &byte| (acc << 1) | (byte & 1))
}
