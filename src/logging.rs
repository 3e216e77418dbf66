//! 日志初始化
//! 宿主程序启动时调用一次，日志输出到 stderr

use log::LevelFilter;

/// 安装 fern 日志分发器；重复调用返回错误
pub fn init_logging(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        // rusqlite 等依赖只保留警告
        .level_for("rusqlite", LevelFilter::Warn)
        .chain(std::io::stderr())
        .apply()
}
