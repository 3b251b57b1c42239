//! ### English
//! C ABI bindings for worker lifecycle (create/set_surface/destroy).
//!
//! ### 中文
//! worker 生命周期相关的 C ABI 绑定（create/set_surface/destroy）。

use std::ffi::c_void;

use super::EglRenderWorker;
use crate::engine::egl::EglPresentation;
use crate::engine::{NativeWindowHandle, RenderWorker, logging};

#[unsafe(no_mangle)]
/// ### English
/// Returns the C ABI version.
///
/// ### 中文
/// 返回 C ABI 版本号。
pub extern "C" fn egl_render_worker_abi_version() -> u32 {
    super::EGL_RENDER_WORKER_ABI_VERSION
}

#[unsafe(no_mangle)]
/// ### English
/// Creates a render worker and starts its thread.
///
/// The worker starts without a surface; rendering begins once the embedder hands one over
/// via `egl_render_worker_set_surface`. Returns NULL if libEGL cannot be loaded or the
/// thread cannot be spawned.
///
/// ### 中文
/// 创建渲染 worker 并启动其线程。
///
/// 创建时没有 surface；宿主通过 `egl_render_worker_set_surface` 交付 surface 后才开始渲染。
/// 若 libEGL 无法加载或线程无法创建，返回 NULL。
pub extern "C" fn egl_render_worker_create() -> *mut EglRenderWorker {
    logging::init();

    let backend = match EglPresentation::load() {
        Ok(backend) => backend,
        Err(err) => {
            log::error!("{err}");
            return std::ptr::null_mut();
        }
    };

    let mut worker = RenderWorker::new(backend);
    if let Err(err) = worker.start() {
        log::error!("{err}");
        return std::ptr::null_mut();
    }

    Box::into_raw(Box::new(EglRenderWorker { worker }))
}

#[unsafe(no_mangle)]
/// ### English
/// Hands a native window over to the worker (non-blocking).
///
/// The worker builds an EGL surface and context for it on its own thread. Posting a new
/// window before the previous one was picked up replaces it; only the newest matters.
/// A NULL `window` is ignored.
///
/// ### 中文
/// 将原生 window 交付给 worker（非阻塞）。
///
/// 工作线程会在自己的线程上为其创建 EGL surface 与上下文。
/// 若上一个 window 尚未被取走就投递新的，则新值覆盖旧值；只有最新的才有意义。
/// `window` 为 NULL 时忽略。
pub unsafe extern "C" fn egl_render_worker_set_surface(
    worker: *mut EglRenderWorker,
    window: *mut c_void,
) {
    if worker.is_null() || window.is_null() {
        return;
    }

    let handle = NativeWindowHandle::from_ptr(window);
    unsafe { (*worker).worker.post_attach_surface(handle) };
}

#[unsafe(no_mangle)]
/// ### English
/// Destroys a worker created by `egl_render_worker_create`.
///
/// Blocks until the render thread has observed the terminate command, released all EGL
/// resources, and exited; after this returns the embedder may free the native window.
///
/// ### 中文
/// 销毁由 `egl_render_worker_create` 创建的 worker。
///
/// 阻塞直到渲染线程观察到终止命令、释放全部 EGL 资源并退出；
/// 返回之后宿主即可释放原生 window。
pub unsafe extern "C" fn egl_render_worker_destroy(worker: *mut EglRenderWorker) {
    if worker.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(worker));
    }
}
