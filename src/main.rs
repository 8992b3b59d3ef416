use anyhow::{Context, Result};
use review_harvest::utils::{logging, EventEmitter};
use review_harvest::{App, Config};
use tokio::sync::watch;
use tracing::{error, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);
    logging::init_log_file(&config.output_log_file)
        .with_context(|| format!("无法创建日志文件 {}", config.output_log_file))?;

    let (emitter, events) = EventEmitter::channel();
    let writer = logging::spawn_event_writer(config.output_log_file.clone(), events);

    // 第一次 Ctrl-C 停止采集并保存已完成的结果，第二次直接退出
    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("⚠️ 收到中断信号，正在停止（再按一次 Ctrl-C 强制退出）...");
        let _ = stop_tx.send(true);
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });

    // 初始化并运行应用
    let outcome = match App::initialize(config, emitter, Some(stop_rx)).await {
        Ok(app) => app.run().await,
        Err(e) => Err(e),
    };

    // 所有发送端已释放，等待日志写完
    if let Err(e) = writer.await {
        warn!("⚠️ 日志写入任务异常结束: {}", e);
    }

    match outcome {
        Ok(summary) => match summary.sink_error {
            Some(e) => {
                error!("❌ 运行失败: {}", e);
                Err(e.into())
            }
            None => Ok(()),
        },
        Err(e) => {
            error!("❌ 运行失败: {}", e);
            Err(e.into())
        }
    }
}
