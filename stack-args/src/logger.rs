use std::io::{self, Write as _};

use log::{LevelFilter, Log, Metadata, Record};

/// ログレベルを上書きする環境変数の名前。値は `off`, `error`, `warn`, `info`, `debug`, `trace`。
pub const LOG_ENV: &str = "STACK_ARGS_LOG";

static LOGGER: StderrLogger = StderrLogger;

/// 標準エラー出力に `LEVEL: message` の形で 1 行ずつ書き出すロガー。
/// 書き出しにヒープは使わない。
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // 出力できなくても続行する
        let _ = writeln!(io::stderr().lock(), "{}: {}", record.level(), record.args());
    }

    fn flush(&self) {}
}

/// [LOG_ENV] の値、なければ [default_level] でロガーを初期化する。
pub fn init() {
    init_with_level(level_from_env().unwrap_or_else(default_level));
}

/// 何度呼んでもよい。2 回目以降はレベルの変更だけを行う。
pub fn init_with_level(level: LevelFilter) {
    // 既に登録されている場合は失敗するが、そのまま使う
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

pub fn set_log_level(level: LevelFilter) {
    log::set_max_level(level);
}

pub fn get_log_level() -> LevelFilter {
    log::max_level()
}

/// デバッグビルドでは [LevelFilter::Debug]、リリースビルドでは [LevelFilter::Warn]。
pub fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// 大文字小文字は区別しない。
pub fn parse_level(s: &str) -> Option<LevelFilter> {
    s.trim().parse().ok()
}

fn level_from_env() -> Option<LevelFilter> {
    let value = std::env::var_os(LOG_ENV)?;
    parse_level(value.to_str()?)
}
