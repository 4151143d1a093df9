//! # 流式编解码
//!
//! 在顺序读取的载体流上驱动 LSB 位打包。每个载荷字节消耗 8 个载体字节，
//! 载体游标只会向前移动，不会回退或重用。

use crate::constants::CARRIER_BYTES_PER_BYTE;
use crate::error::{StegoError, StegoResult};
use crate::steganography::{CarrierGroup, pack_byte, unpack_byte};
use std::io::{self, ErrorKind, Read, Write};

const CHUNK_SIZE: usize = 4096;

/// 从载体中读取下一组 8 字节。载体提前结束时返回 [`StegoError::TruncatedCarrier`]。
fn read_group<R: Read>(carrier: &mut R, position: &mut u64) -> StegoResult<CarrierGroup> {
    let mut group = [0u8; CARRIER_BYTES_PER_BYTE];
    match carrier.read_exact(&mut group) {
        Ok(()) => {
            *position += CARRIER_BYTES_PER_BYTE as u64;
            Ok(group)
        }
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
            Err(StegoError::TruncatedCarrier { offset: *position })
        }
        Err(e) => Err(e.into()),
    }
}

/// 编码端：从载体读入字节，写入隐藏了数据的字节。
#[derive(Debug)]
pub struct LsbEncoder<R, W> {
    carrier: R,
    output: W,
    position: u64,
}

impl<R: Read, W: Write> LsbEncoder<R, W> {
    /// `position` 是载体当前已被读取的字节数，仅用于错误报告。
    pub fn new(carrier: R, output: W, position: u64) -> Self {
        Self {
            carrier,
            output,
            position,
        }
    }

    /// 到目前为止消耗的载体字节数 (包含起始偏移)。
    pub fn position(&self) -> u64 {
        self.position
    }

    /// 将 `data` 的每个字节隐藏进接下来的 8 个载体字节中。
    pub fn encode_bytes(&mut self, data: &[u8]) -> StegoResult<()> {
        for &byte in data {
            let mut group = read_group(&mut self.carrier, &mut self.position)?;
            pack_byte(byte, &mut group);
            self.output.write_all(&group)?;
        }
        Ok(())
    }

    /// 以 4 字节小端形式隐藏一个 32 位整数 (消耗 32 个载体字节)。
    pub fn encode_i32_le(&mut self, value: i32) -> StegoResult<()> {
        self.encode_bytes(&value.to_le_bytes())
    }

    /// 从 `source` 读取恰好 `len` 个字节并逐块隐藏。
    ///
    /// # Errors
    ///
    /// `source` 提前结束时返回 `UnexpectedEof` 的 I/O 错误。
    pub fn encode_stream<P: Read>(&mut self, mut source: P, len: u64) -> StegoResult<()> {
        let mut chunk = [0u8; CHUNK_SIZE];
        let mut remaining = len;

        while remaining > 0 {
            let want = remaining.min(CHUNK_SIZE as u64) as usize;
            let read = match source.read(&mut chunk[..want]) {
                Ok(0) => {
                    return Err(io::Error::new(
                        ErrorKind::UnexpectedEof,
                        format!("secret data ended {remaining} bytes before its reported size"),
                    )
                    .into());
                }
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            self.encode_bytes(&chunk[..read])?;
            remaining -= read as u64;
        }

        Ok(())
    }

    /// 将载体中剩余的全部字节原样复制到输出，返回复制的字节数。
    pub fn copy_remainder(&mut self) -> StegoResult<u64> {
        let copied = io::copy(&mut self.carrier, &mut self.output)?;
        self.position += copied;
        Ok(copied)
    }

    /// 刷新输出并交还底层写入器。
    pub fn finish(mut self) -> StegoResult<W> {
        self.output.flush()?;
        Ok(self.output)
    }
}

/// 解码端：从载体字节的最低位中读出隐藏的数据。
#[derive(Debug)]
pub struct LsbDecoder<R> {
    carrier: R,
    position: u64,
}

impl<R: Read> LsbDecoder<R> {
    pub fn new(carrier: R, position: u64) -> Self {
        Self { carrier, position }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    fn decode_byte(&mut self) -> StegoResult<u8> {
        let group = read_group(&mut self.carrier, &mut self.position)?;
        Ok(unpack_byte(&group))
    }

    /// 解码 `count` 个字节。
    pub fn decode_bytes(&mut self, count: usize) -> StegoResult<Vec<u8>> {
        (0..count).map(|_| self.decode_byte()).collect()
    }

    /// 解码固定长度的字段。
    pub fn decode_array<const N: usize>(&mut self) -> StegoResult<[u8; N]> {
        let mut field = [0u8; N];
        for byte in field.iter_mut() {
            *byte = self.decode_byte()?;
        }
        Ok(field)
    }

    /// 解码一个 4 字节小端的 32 位整数。
    pub fn decode_i32_le(&mut self) -> StegoResult<i32> {
        Ok(i32::from_le_bytes(self.decode_array()?))
    }

    /// 解码 `count` 个字节，每得到一个字节就写入 `sink`，返回写入的字节数。
    pub fn decode_into<W: Write>(&mut self, count: u64, mut sink: W) -> StegoResult<u64> {
        for _ in 0..count {
            let byte = self.decode_byte()?;
            sink.write_all(&[byte])?;
        }
        sink.flush()?;
        Ok(count)
    }
}
