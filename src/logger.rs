use chrono::Local;
use env_logger::Builder;
use log::Level;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Initialise the global logger. Colour lines go to stderr; when `log_file`
/// is given, plain copies are appended to it as the mission diagnostic log.
pub fn init_logger(log_file: Option<&Path>) -> std::io::Result<()> {
    let file: Option<Mutex<File>> = match log_file {
        Some(path) => Some(Mutex::new(
            OpenOptions::new().create(true).append(true).open(path)?,
        )),
        None => None,
    };

    Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(move |buf, record| {
            let _time = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let level_color = match record.level() {
                Level::Error => "\x1b[31m\x1b[1m", // 红色
                Level::Warn => "\x1b[33m\x1b[1m",  // 黄色
                Level::Info => "\x1b[32m\x1b[1m",  // 绿色
                Level::Debug => "\x1b[36m\x1b[1m", // 青色
                Level::Trace => "\x1b[90m\x1b[1m", // 灰色
            };

            if let Some(file) = &file {
                if let Ok(mut file) = file.lock() {
                    // 文件写入失败不影响控制台输出
                    let _ = writeln!(
                        file,
                        "[{} {} {}:{}] {}",
                        record.level().as_str().chars().next().unwrap_or('?'),
                        _time,
                        record.module_path().unwrap_or("unknown"),
                        record.line().unwrap_or(0),
                        record.args(),
                    );
                }
            }

            writeln!(
                buf,
                "{}{} {}\x1b[0m [{}:{}] {}",
                _time,
                level_color,

                record.level(),

                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args(),
            )
        })
        .init();

    Ok(())
}
