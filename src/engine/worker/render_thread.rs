//! ### English
//! Render worker thread body: drain the mailbox, apply lifecycle transitions, draw, present.
//!
//! ### 中文
//! 渲染工作线程主体：取出邮箱命令、应用生命周期切换、绘制并 present。

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::engine::api::{ConfigRequest, PresentationApi};
use crate::engine::pipeline::Pipeline;
use crate::engine::scene::SceneSpec;

use super::command::PendingCommand;
use super::context::{self, GraphicsContext};
use super::mailbox::Mailbox;

/// ### English
/// Poll interval while no context exists (the mailbox is polled, not waited on; a post also
/// unparks the worker so this only bounds the worst-case latency).
///
/// ### 中文
/// 无上下文时的轮询间隔（邮箱采用轮询而非阻塞等待；post 还会 unpark 工作线程，
/// 因此该间隔只决定最坏情况下的延迟上界）。
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(4);

/// ### English
/// Everything tied to one attached surface: context triple, GL entry points, pipeline.
/// Dropped as a unit at every teardown boundary; nothing inside survives it.
///
/// ### 中文
/// 与单个已 attach surface 绑定的全部状态：上下文三元组、GL 入口点与渲染管线。
/// 在每个 teardown 边界整体丢弃；其中任何内容都不跨边界存活。
struct ActiveSurface<P: PresentationApi> {
    ctx: GraphicsContext<P>,
    gl: P::Gl,
    pipeline: Pipeline<P::Gl>,
}

/// ### English
/// Render worker thread entry. Returns only after a `Terminate` command is observed.
///
/// All graphics-API calls in the process happen on this thread, between a successful attach
/// and the matching teardown.
///
/// ### 中文
/// 渲染工作线程入口。只有在观察到 `Terminate` 命令后才会返回。
///
/// 进程内所有图形 API 调用都发生在本线程上，
/// 且只发生在一次成功 attach 与对应 teardown 之间。
pub(super) fn run<P: PresentationApi>(
    api: P,
    request: ConfigRequest,
    scene: SceneSpec,
    mailbox: Arc<Mailbox>,
) {
    log::info!("render loop started");

    let mut active: Option<ActiveSurface<P>> = None;
    let mut running = true;

    while running {
        {
            // The guard is held across decide-act-draw-present so the controller can never
            // race a new surface handle into a half-applied transition.
            let mut slot = mailbox.lock();

            match slot.take_and_clear() {
                Some(PendingCommand::AttachSurface(window)) => {
                    if let Some(previous) = active.take() {
                        release(&api, previous);
                    }
                    match context::attach(&api, window, &request) {
                        Ok((ctx, gl)) => {
                            let pipeline = Pipeline::build(&gl, &scene);
                            active = Some(ActiveSurface { ctx, gl, pipeline });
                        }
                        Err(err) => {
                            log::error!("surface attach failed: {err}");
                        }
                    }
                }
                Some(PendingCommand::Terminate) => {
                    log::info!("terminate observed; stopping render loop");
                    if let Some(previous) = active.take() {
                        release(&api, previous);
                    }
                    running = false;
                }
                None => {}
            }

            if let Some(surface) = active.as_ref() {
                surface
                    .pipeline
                    .draw(&surface.gl, &scene, surface.ctx.size);
                if !api.present(surface.ctx.display, surface.ctx.surface) {
                    log::error!("present failed; continuing");
                }
            }
        }

        if running {
            if active.is_some() {
                // Presentation paces the loop; yielding keeps a posting controller from
                // losing the mutex race indefinitely.
                thread::yield_now();
            } else {
                thread::park_timeout(IDLE_POLL_INTERVAL);
            }
        }
    }

    log::info!("render loop exited");
}

/// ### English
/// Releases one attached surface: pipeline resources first (context still current), then the
/// context triple itself.
///
/// ### 中文
/// 释放一个已 attach 的 surface：先释放管线资源（此时上下文仍为 current），
/// 再回收上下文三元组本身。
fn release<P: PresentationApi>(api: &P, surface: ActiveSurface<P>) {
    surface.pipeline.destroy(&surface.gl);
    context::teardown(api, surface.ctx);
}
