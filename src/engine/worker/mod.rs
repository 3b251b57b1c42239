//! ### English
//! Render worker orchestration (public API).
//!
//! ### 中文
//! 渲染工作线程编排（对外公开 API）。

mod command;
mod context;
mod mailbox;
mod render_thread;

use std::sync::Arc;
use std::thread;

pub use command::{NativeWindowHandle, PendingCommand};
pub use context::GraphicsContext;

use mailbox::Mailbox;

use crate::engine::api::{ConfigRequest, PresentationApi};
use crate::engine::scene::SceneSpec;

/// ### English
/// Background render worker that owns the graphics context and its thread.
///
/// Constructed idle (no thread, no context). `start` launches the worker thread; `stop`
/// posts `Terminate` and joins, guaranteeing no graphics-API calls happen after it returns.
/// The controller thread only ever touches the mailbox; the worker thread owns everything
/// graphics-related.
///
/// ### 中文
/// 持有图形上下文及其线程的后台渲染 worker。
///
/// 构造后处于空闲状态（无线程、无上下文）。`start` 启动工作线程；
/// `stop` 投递 `Terminate` 并 join，保证返回后不再有任何图形 API 调用。
/// 控制线程只操作邮箱；所有图形相关状态由工作线程独占。
pub struct RenderWorker<P: PresentationApi + Send + 'static> {
    /// ### English
    /// Single-slot command mailbox shared with the worker thread.
    ///
    /// ### 中文
    /// 与工作线程共享的单槽位命令邮箱。
    mailbox: Arc<Mailbox>,
    /// ### English
    /// Join handle for the worker thread (`None` while idle or after `stop`).
    ///
    /// ### 中文
    /// 工作线程的 join handle（空闲或 `stop` 之后为 `None`）。
    thread: Option<thread::JoinHandle<()>>,
    /// ### English
    /// Presentation backend, moved onto the worker thread by `start`.
    ///
    /// ### 中文
    /// 呈现后端，`start` 时移动到工作线程上。
    backend: Option<P>,
    /// ### English
    /// Framebuffer configuration constraints used on every attach.
    ///
    /// ### 中文
    /// 每次 attach 使用的帧缓冲配置约束。
    request: ConfigRequest,
    /// ### English
    /// Scene payload handed to pipeline setup and the per-frame draw.
    ///
    /// ### 中文
    /// 交给管线构建与逐帧绘制的场景载荷。
    scene: Option<SceneSpec>,
}

impl<P: PresentationApi + Send + 'static> RenderWorker<P> {
    /// ### English
    /// Creates an idle worker with the default configuration and demo scene.
    ///
    /// ### 中文
    /// 以默认配置与演示场景创建一个空闲 worker。
    pub fn new(backend: P) -> Self {
        Self::with_scene(backend, ConfigRequest::default(), SceneSpec::default())
    }

    /// ### English
    /// Creates an idle worker with an explicit configuration and scene.
    ///
    /// ### 中文
    /// 以显式配置与场景创建一个空闲 worker。
    pub fn with_scene(backend: P, request: ConfigRequest, scene: SceneSpec) -> Self {
        Self {
            mailbox: Arc::new(Mailbox::new()),
            thread: None,
            backend: Some(backend),
            request,
            scene: Some(scene),
        }
    }

    /// ### English
    /// Launches the worker thread.
    ///
    /// Commands posted before `start` stay in the mailbox and are observed by the first
    /// loop iteration (only the latest one, per the coalescing rule).
    ///
    /// ### 中文
    /// 启动工作线程。
    ///
    /// 在 `start` 之前投递的命令会留在邮箱中，由第一次循环迭代观察到
    ///（按合并规则只保留最新一条）。
    pub fn start(&mut self) -> Result<(), String> {
        if self.thread.is_some() {
            return Err("render worker already started".to_string());
        }
        let (Some(backend), Some(scene)) = (self.backend.take(), self.scene.take()) else {
            return Err("render worker already stopped".to_string());
        };

        log::info!("starting render worker thread");
        let mailbox = self.mailbox.clone();
        let request = self.request;
        let thread = thread::Builder::new()
            .name("render-worker".to_string())
            .spawn(move || render_thread::run(backend, request, scene, mailbox))
            .map_err(|err| format!("failed to spawn render worker thread: {err}"))?;
        self.thread = Some(thread);
        Ok(())
    }

    /// ### English
    /// Returns whether the worker thread is currently running.
    ///
    /// ### 中文
    /// 返回工作线程当前是否在运行。
    pub fn is_running(&self) -> bool {
        self.thread.is_some()
    }

    /// ### English
    /// Posts an attach command for a newly available native window (non-blocking,
    /// latest-wins). A no-op observation-wise after the worker has terminated.
    ///
    /// ### 中文
    /// 为新可用的原生 window 投递 attach 命令（非阻塞、latest-wins）。
    /// 若工作线程已结束，该命令不会再被观察到（定义为 no-op）。
    pub fn post_attach_surface(&self, window: NativeWindowHandle) {
        self.mailbox.post(PendingCommand::AttachSurface(window));
        self.wake();
    }

    /// ### English
    /// Posts a terminate command without joining the worker thread.
    ///
    /// ### 中文
    /// 投递 terminate 命令，但不 join 工作线程。
    pub fn post_terminate(&self) {
        self.mailbox.post(PendingCommand::Terminate);
        self.wake();
    }

    /// ### English
    /// Stops the worker: posts `Terminate` and joins the thread.
    ///
    /// Blocks until the worker has observed the command, torn everything down, and exited;
    /// no graphics-API call can occur after this returns. Safe to call repeatedly.
    ///
    /// ### 中文
    /// 停止 worker：投递 `Terminate` 并 join 线程。
    ///
    /// 阻塞直到工作线程观察到命令、完成全部回收并退出；
    /// 返回后不会再有任何图形 API 调用。可重复调用。
    pub fn stop(&mut self) {
        if let Some(thread) = self.thread.take() {
            log::info!("stopping render worker thread");
            self.mailbox.post(PendingCommand::Terminate);
            thread.thread().unpark();
            let _ = thread.join();
            log::info!("render worker thread stopped");
        }
    }

    /// ### English
    /// Unparks the worker thread so an idle poll notices the new command promptly.
    ///
    /// ### 中文
    /// unpark 工作线程，使空闲轮询尽快注意到新命令。
    fn wake(&self) {
        if let Some(thread) = &self.thread {
            thread.thread().unpark();
        }
    }
}

impl<P: PresentationApi + Send + 'static> Drop for RenderWorker<P> {
    /// ### English
    /// Ensures the worker thread is joined before the worker is dropped.
    ///
    /// ### 中文
    /// 确保在 drop 前完成工作线程的 join。
    fn drop(&mut self) {
        self.stop();
    }
}
