//! ### English
//! Context lifecycle: the attach transition and the teardown that mirrors it.
//!
//! The strict creation order (connection → config → surface → context → current → size) is
//! matched by the strict teardown order (clear current → context → surface → connection).
//! A failure at any step rolls back exactly the steps that already succeeded.
//!
//! ### 中文
//! 上下文生命周期：attach 切换及与之对称的 teardown。
//!
//! 严格的创建顺序（连接 → 配置 → surface → 上下文 → current → 尺寸）
//! 对应严格的回收顺序（解绑 current → 上下文 → surface → 连接）。
//! 任意一步失败时，只回滚已经成功的那些步骤。

use dpi::PhysicalSize;

use crate::engine::api::{ConfigRequest, GlApi as _, PresentationApi, SetupError};

use super::command::NativeWindowHandle;

/// ### English
/// The display/surface/context triple plus the cached drawable size.
///
/// Exists only between a successful attach and the next teardown, and is owned exclusively
/// by the worker thread.
///
/// ### 中文
/// display/surface/context 三元组及缓存的 drawable 尺寸。
///
/// 仅存在于一次成功 attach 与下一次 teardown 之间，由工作线程独占持有。
pub struct GraphicsContext<P: PresentationApi> {
    /// ### English
    /// Display connection handle.
    ///
    /// ### 中文
    /// display 连接句柄。
    pub display: P::Display,
    /// ### English
    /// Drawable surface handle.
    ///
    /// ### 中文
    /// drawable surface 句柄。
    pub surface: P::Surface,
    /// ### English
    /// Rendering context handle.
    ///
    /// ### 中文
    /// 渲染上下文句柄。
    pub context: P::Context,
    /// ### English
    /// Drawable size queried at attach time.
    ///
    /// ### 中文
    /// attach 时查询到的 drawable 尺寸。
    pub size: PhysicalSize<u32>,
}

/// ### English
/// Runs the full attach transition against a freshly supplied native window.
///
/// On success the context is current on the calling thread, the viewport and persistent
/// draw state (depth test, alpha blending) are configured for the queried size, and the
/// loaded GL entry points are returned alongside the context.
/// On failure everything partially created is torn down and the caller stays at no-context.
///
/// ### 中文
/// 针对新提供的原生 window 执行完整的 attach 切换。
///
/// 成功时上下文在调用线程上为 current，viewport 与常驻绘制状态
///（深度测试、alpha 混合）已按查询到的尺寸配置好，并连同上下文返回已加载的 GL 入口点。
/// 失败时回收所有已部分创建的资源，调用方保持无上下文状态。
pub(super) fn attach<P: PresentationApi>(
    api: &P,
    window: NativeWindowHandle,
    request: &ConfigRequest,
) -> Result<(GraphicsContext<P>, P::Gl), SetupError> {
    log::info!("initializing graphics context for window {:#x}", window.as_raw());

    let display = api.create_connection()?;

    let config = match api.choose_config(display, request) {
        Ok(config) => config,
        Err(err) => {
            api.destroy_connection(display);
            return Err(err);
        }
    };

    let surface = match api.create_surface(display, config, window) {
        Ok(surface) => surface,
        Err(err) => {
            api.destroy_connection(display);
            return Err(err);
        }
    };

    let context = match api.create_context(display, config, request.client_version) {
        Ok(context) => context,
        Err(err) => {
            api.destroy_surface(display, surface);
            api.destroy_connection(display);
            return Err(err);
        }
    };

    if !api.make_current(display, surface, context) {
        api.destroy_context(display, context);
        api.destroy_surface(display, surface);
        api.destroy_connection(display);
        return Err(SetupError::MakeCurrent);
    }

    let size = match api.query_size(display, surface) {
        Ok(size) => size,
        Err(err) => {
            abort_current(api, display, surface, context);
            return Err(err);
        }
    };
    log::info!("drawable size is {}x{}", size.width, size.height);

    let gl = match api.load_gl() {
        Ok(gl) => gl,
        Err(err) => {
            abort_current(api, display, surface, context);
            return Err(err);
        }
    };

    gl.viewport(size);
    gl.enable_depth_test();
    gl.enable_alpha_blending();

    Ok((
        GraphicsContext {
            display,
            surface,
            context,
            size,
        },
        gl,
    ))
}

/// ### English
/// Rolls back an attach that failed after the context became current.
///
/// ### 中文
/// 回滚在上下文已 current 之后才失败的 attach。
fn abort_current<P: PresentationApi>(
    api: &P,
    display: P::Display,
    surface: P::Surface,
    context: P::Context,
) {
    if !api.clear_current(display) {
        log::error!("failed to unbind context while aborting attach");
    }
    api.destroy_context(display, context);
    api.destroy_surface(display, surface);
    api.destroy_connection(display);
}

/// ### English
/// Full teardown of an attached context: unbind, then destroy context, surface, connection.
///
/// ### 中文
/// 对已 attach 上下文的完整回收：先解绑，再依次销毁上下文、surface 与连接。
pub(super) fn teardown<P: PresentationApi>(api: &P, ctx: GraphicsContext<P>) {
    log::info!("destroying graphics context");

    if !api.clear_current(ctx.display) {
        log::error!("failed to unbind context during teardown");
    }
    api.destroy_context(ctx.display, ctx.context);
    api.destroy_surface(ctx.display, ctx.surface);
    api.destroy_connection(ctx.display);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::{MockEvent, MockFailures, MockPresentation};

    fn window() -> NativeWindowHandle {
        NativeWindowHandle::from_raw(0xA11C)
    }

    #[test]
    fn attach_runs_lifecycle_steps_in_order() {
        let api = MockPresentation::new();
        let journal = api.journal();

        let (ctx, _gl) =
            attach(&api, window(), &ConfigRequest::default()).expect("attach should succeed");
        assert_eq!(ctx.size, PhysicalSize::new(640, 480));

        let events = journal.snapshot();
        let expected = [
            MockEvent::CreateConnection,
            MockEvent::ChooseConfig,
            MockEvent::CreateSurface { window: 0xA11C },
            MockEvent::CreateContext { client_version: 2 },
            MockEvent::MakeCurrent,
            MockEvent::QuerySize,
            MockEvent::LoadGl,
            MockEvent::Viewport {
                width: 640,
                height: 480,
            },
            MockEvent::EnableDepthTest,
            MockEvent::EnableAlphaBlending,
        ];
        assert_eq!(&events[..expected.len()], &expected);
    }

    #[test]
    fn choose_config_failure_closes_the_connection() {
        let api = MockPresentation::with_failures(MockFailures {
            choose_config: true,
            ..MockFailures::default()
        });
        let journal = api.journal();

        let result = attach(&api, window(), &ConfigRequest::default());
        assert!(matches!(result, Err(SetupError::Config(_))));

        let events = journal.snapshot();
        assert!(events.contains(&MockEvent::DestroyConnection));
        assert!(!events.contains(&MockEvent::CreateSurface { window: 0xA11C }));
    }

    #[test]
    fn make_current_failure_rolls_back_context_and_surface() {
        let api = MockPresentation::with_failures(MockFailures {
            make_current: true,
            ..MockFailures::default()
        });
        let journal = api.journal();

        let result = attach(&api, window(), &ConfigRequest::default());
        assert!(matches!(result, Err(SetupError::MakeCurrent)));

        let events = journal.snapshot();
        let destroy_context = events
            .iter()
            .position(|e| *e == MockEvent::DestroyContext)
            .expect("context must be destroyed");
        let destroy_surface = events
            .iter()
            .position(|e| *e == MockEvent::DestroySurface)
            .expect("surface must be destroyed");
        let destroy_connection = events
            .iter()
            .position(|e| *e == MockEvent::DestroyConnection)
            .expect("connection must be closed");
        assert!(destroy_context < destroy_surface);
        assert!(destroy_surface < destroy_connection);
        assert!(!events.contains(&MockEvent::QuerySize));
    }

    #[test]
    fn teardown_unbinds_before_destroying() {
        let api = MockPresentation::new();
        let journal = api.journal();

        let (ctx, _gl) =
            attach(&api, window(), &ConfigRequest::default()).expect("attach should succeed");
        teardown(&api, ctx);

        let events = journal.snapshot();
        let clear_current = events
            .iter()
            .position(|e| *e == MockEvent::ClearCurrent)
            .expect("must unbind first");
        let destroy_context = events
            .iter()
            .position(|e| *e == MockEvent::DestroyContext)
            .expect("context must be destroyed");
        let destroy_surface = events
            .iter()
            .position(|e| *e == MockEvent::DestroySurface)
            .expect("surface must be destroyed");
        let destroy_connection = events
            .iter()
            .position(|e| *e == MockEvent::DestroyConnection)
            .expect("connection must be closed");
        assert!(clear_current < destroy_context);
        assert!(destroy_context < destroy_surface);
        assert!(destroy_surface < destroy_connection);
    }
}
