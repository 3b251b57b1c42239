//! ### English
//! C ABI surface for `egl_render_worker`.
//!
//! All exported symbols are `extern "C"` functions; structs are `#[repr(C)]`. The embedder
//! calls these from its UI thread; the worker itself never touches the ABI.
//!
//! ### 中文
//! `egl_render_worker` 的 C ABI 接口层。
//!
//! 所有导出符号均为 `extern "C"` 函数；结构体使用 `#[repr(C)]`。
//! 宿主在其 UI 线程上调用这些函数；工作线程本身从不接触 ABI。
mod worker;

use crate::engine::RenderWorker;
use crate::engine::egl::EglPresentation;

#[repr(C)]
/// ### English
/// Opaque worker handle owning the dedicated render thread.
///
/// ### 中文
/// 不透明 worker 句柄，持有独立的渲染线程。
pub struct EglRenderWorker {
    /// ### English
    /// Render worker that owns the thread and the EGL state living on it.
    ///
    /// ### 中文
    /// 渲染 worker，持有线程及线程上的全部 EGL 状态。
    worker: RenderWorker<EglPresentation>,
}

/// ### English
/// C ABI version for `egl_render_worker`.
///
/// ### 中文
/// `egl_render_worker` 的 C ABI 版本号。
const EGL_RENDER_WORKER_ABI_VERSION: u32 = 1;
