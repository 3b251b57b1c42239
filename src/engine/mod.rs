//! ### English
//! Engine internal modules (presentation abstraction, EGL backend, pipeline, worker thread).
//!
//! ### 中文
//! 引擎内部模块（呈现抽象、EGL 后端、渲染管线、工作线程等）。
pub mod api;
pub mod egl;
pub mod logging;
pub mod mock;
pub mod pipeline;
pub mod scene;
pub mod worker;

pub use worker::{NativeWindowHandle, RenderWorker};
