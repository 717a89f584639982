use anyhow::Result;
use tracing::info;

use apply_autofill::models::load_urls_file;
use apply_autofill::utils::logging;
use apply_autofill::{App, BatchGate, BatchRequest, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    // URL 列表：命令行参数优先，其次 URLS_FILE
    let args: Vec<String> = std::env::args().skip(1).collect();
    let urls = match (&config.urls_file, args.is_empty()) {
        (Some(path), true) => {
            info!("📁 从文件读取 URL 列表: {}", path.display());
            load_urls_file(path).await?
        }
        _ => args,
    };
    apply_autofill::models::validate_urls(&urls)?;

    // 同一进程只允许一个批次
    let gate = BatchGate::new();
    let guard = gate.try_begin()?;

    // 初始化并运行应用
    let app = App::initialize(config).await?;
    let summary = app.run(BatchRequest::new(urls), &guard).await?;
    info!("🏁 批次结束: 共 {} 个", summary.total);

    Ok(())
}
