use image::RgbImage;
use lsb_stego::{
    cli::{DecodeArgs, EncodeArgs},
    handler::{handle_decode, handle_encode},
};
use rand::RngCore;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// 一个辅助函数，用于创建一个带有随机像素的 24 位 BMP 测试图像
fn create_test_image(path: &Path, width: u32, height: u32) {
    let mut raw_pixels = vec![0u8; (width * height * 3) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    RgbImage::from_raw(width, height, raw_pixels)
        .expect("Pixel buffer should match the image size.")
        .save(path)
        .expect("Failed to create test image.");
}

fn encode_args(image: &Path, secret: &Path, dest: &Path, magic: &str) -> EncodeArgs {
    EncodeArgs {
        image: image.to_path_buf(),
        secret: secret.to_path_buf(),
        dest: dest.to_path_buf(),
        magic: Some(magic.to_string()),
    }
}

fn decode_args(image: &Path, output: &Path, magic: &str) -> DecodeArgs {
    DecodeArgs {
        image: image.to_path_buf(),
        output: output.to_path_buf(),
        magic: Some(magic.to_string()),
    }
}

fn error_chain(e: &anyhow::Error) -> String {
    format!("{e:#}")
}

/// 验证从编码到解码的完整流程
#[test]
fn test_handle_encode_and_decode_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.bmp");
    let stego_image_path = dir.path().join("stego.bmp");
    let source_text_path = dir.path().join("source.txt");
    let decoded_text_path = dir.path().join("decoded.txt");

    create_test_image(&original_image_path, 100, 100);
    let original_text = "This is a test message for the handler! 这是一个给处理器的测试信息！";
    fs::write(&source_text_path, original_text)?;

    // 2. 编码
    handle_encode(encode_args(
        &original_image_path,
        &source_text_path,
        &stego_image_path,
        "Secret123",
    ))?;
    assert!(stego_image_path.exists(), "Stego image should be created.");

    // 输出与原图等长、头部一致，并且仍然是一张有效的 BMP 图像
    let original = fs::read(&original_image_path)?;
    let stego = fs::read(&stego_image_path)?;
    assert_eq!(original.len(), stego.len());
    assert_eq!(original[..54], stego[..54]);
    let reopened = image::open(&stego_image_path)?;
    assert_eq!((reopened.width(), reopened.height()), (100, 100));

    // 3. 解码
    handle_decode(decode_args(&stego_image_path, &decoded_text_path, "Secret123"))?;

    // 4. 验证结果
    let decoded_text = fs::read_to_string(&decoded_text_path)?;
    assert_eq!(
        original_text, decoded_text,
        "Decoded text must match the original."
    );

    Ok(())
}

/// 验证任意二进制内容都能原样恢复
#[test]
fn test_binary_payload_round_trip() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("cover.bmp");
    let secret_path = dir.path().join("blob.txt");
    let stego_path = dir.path().join("out.bmp");
    let decoded_path = dir.path().join("blob_decoded.txt");

    create_test_image(&image_path, 64, 64);
    let mut secret = vec![0u8; 1000];
    rand::rng().fill_bytes(&mut secret);
    fs::write(&secret_path, &secret)?;

    handle_encode(encode_args(&image_path, &secret_path, &stego_path, "k3y"))?;
    handle_decode(decode_args(&stego_path, &decoded_path, "k3y"))?;

    assert_eq!(fs::read(&decoded_path)?, secret);

    Ok(())
}

/// 验证魔术字符串不匹配时解码失败，且不会写出任何内容
#[test]
fn test_decode_with_wrong_magic_string() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("cover.bmp");
    let secret_path = dir.path().join("secret.txt");
    let stego_path = dir.path().join("stego.bmp");
    let decoded_path = dir.path().join("decoded.txt");

    create_test_image(&image_path, 50, 50);
    fs::write(&secret_path, "hello")?;
    handle_encode(encode_args(&image_path, &secret_path, &stego_path, "Secret123"))?;

    let result = handle_decode(decode_args(&stego_path, &decoded_path, "Wrong456"));

    assert!(result.is_err());
    if let Err(e) = result {
        let message = error_chain(&e);
        assert!(message.contains("magic string mismatch"), "{message}");
        assert!(message.contains("processing the magic string"), "{message}");
    }
    assert!(fs::read(&decoded_path)?.is_empty());

    Ok(())
}

/// 验证空间不足时的错误处理：容量检查在写出任何数据之前完成
#[test]
fn test_handle_encode_not_enough_space() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let image_path = dir.path().join("small.bmp");
    let text_path = dir.path().join("large.txt");
    let dest_path = dir.path().join("dest.bmp");

    // 创建一个非常小的图片
    create_test_image(&image_path, 10, 10);
    // 创建一个非常大的文本
    fs::write(&text_path, "a".repeat(5000))?;

    // 2. 执行并断言错误
    let result = handle_encode(encode_args(&image_path, &text_path, &dest_path, "Secret123"));

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(error_chain(&e).contains("not enough capacity"));
    }
    assert!(fs::read(&dest_path)?.is_empty());

    Ok(())
}

/// 验证空的秘密文件会被拒绝
#[test]
fn test_handle_encode_empty_secret() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("cover.bmp");
    let text_path = dir.path().join("empty.txt");
    let dest_path = dir.path().join("dest.bmp");

    create_test_image(&image_path, 20, 20);
    fs::write(&text_path, "")?;

    let result = handle_encode(encode_args(&image_path, &text_path, &dest_path, "Secret123"));

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(error_chain(&e).contains("invalid secret file size: 0"));
    }

    Ok(())
}

/// 验证输入文件不存在时报告无法打开
#[test]
fn test_handle_encode_missing_image() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let text_path = dir.path().join("secret.txt");
    fs::write(&text_path, "hello")?;

    let result = handle_encode(encode_args(
        &dir.path().join("missing.bmp"),
        &text_path,
        &dir.path().join("dest.bmp"),
        "Secret123",
    ));

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(error_chain(&e).contains("unable to open source image file"));
    }

    Ok(())
}

/// 验证扩展名不是 4 字节的秘密文件会被拒绝，而不是被截断
#[test]
fn test_handle_encode_rejects_long_extension() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("cover.bmp");
    let secret_path = dir.path().join("data.json");
    let dest_path = dir.path().join("dest.bmp");

    create_test_image(&image_path, 20, 20);
    fs::write(&secret_path, "{}")?;

    let result = handle_encode(encode_args(&image_path, &secret_path, &dest_path, "Secret123"));

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(error_chain(&e).contains("invalid extension size: 5"));
    }
    assert!(!dest_path.exists());

    Ok(())
}
