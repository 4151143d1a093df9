/// BMP 文件的标准头部大小 (字节)。
/// 头部原样复制，不参与 LSB 编码。
pub const BMP_HEADER_SIZE: usize = 54;

/// 头部中图像宽度字段的偏移量 (4 字节小端有符号整数)。
pub const WIDTH_OFFSET: usize = 18;

/// 头部中图像高度字段的偏移量 (4 字节小端有符号整数)。
pub const HEIGHT_OFFSET: usize = 22;

/// 每个像素的颜色通道数 (B, G, R)。
pub const BYTES_PER_PIXEL: u64 = 3;

/// 隐藏一个字节需要的载体字节数。
/// 每个载体字节的最低位存储 1 bit，因此需要 8 个载体字节。
pub const CARRIER_BYTES_PER_BYTE: usize = 8;

/// 扩展名字段的固定长度 (如 ".txt")。
pub const EXTENSION_SIZE: usize = 4;

/// 长度字段 (`i32`) 占用的字节数。
pub const INT_FIELD_SIZE: usize = 4;

/// 未指定输出路径时，编码结果的默认文件名。
pub const DEFAULT_STEGO_FILE: &str = "stego.bmp";

/// 未指定输出路径时，解码结果的默认文件名。
pub const DEFAULT_DECODED_FILE: &str = "decodedfile.txt";

/// 载体图像必须使用的扩展名。
pub const IMAGE_EXTENSION: &str = "bmp";

/// 秘密文件 (以及解码输出) 使用的扩展名。
pub const SECRET_EXTENSION: &str = "txt";
