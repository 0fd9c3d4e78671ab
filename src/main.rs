use anyhow::Result;
use question_randomizer::{logger, App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::try_from_env()?;

    // 初始化日志
    logger::init(config.debug_logging);

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
