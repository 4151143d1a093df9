use clap::Parser;
use tracing_subscriber::EnvFilter;

use lsb_stego::{
    cli::{Cli, Operation},
    handler::{handle_decode, handle_encode},
};

/// 初始化日志输出到 stderr。`RUST_LOG` 优先于 `-v` 指定的级别。
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// 程序的主入口点
///
/// 负责解析命令行参数，并根据 `-e` 或 `-d` 将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // 根据操作调用相应的处理函数
    match cli.operation()? {
        Operation::Encode(args) => handle_encode(args),
        Operation::Decode(args) => handle_decode(args),
    }
}
