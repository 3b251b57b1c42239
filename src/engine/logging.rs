//! ### English
//! One-time logger initialization for the `log` facade.
//!
//! The FFI layer calls this on engine creation; library embedders that install their own
//! logger can skip it (`try_init` keeps a pre-installed logger in place).
//!
//! ### 中文
//! `log` 门面的一次性日志初始化。
//!
//! FFI 层在创建引擎时调用；自行安装 logger 的库宿主可以不调用
//!（`try_init` 不会覆盖已安装的 logger）。

use std::sync::Once;

static INIT: Once = Once::new();

/// ### English
/// Initializes the global `env_logger` sink once.
///
/// `RUST_LOG` controls filtering; the default level is `info` so every lifecycle
/// transition is visible.
///
/// ### 中文
/// 一次性初始化全局 `env_logger` 输出。
///
/// 过滤规则由 `RUST_LOG` 控制；默认级别为 `info`，使每次生命周期切换都可见。
pub fn init() {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }
        let _ = builder.try_init();
    });
}
