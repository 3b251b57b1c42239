//! ### English
//! EGL presentation backend (dynamically loaded libEGL).
//!
//! The EGL library is loaded at runtime the same way the embedder's GL stack is expected to
//! be present already; handle wrappers are `Send` because the worker thread is the only
//! thread that ever uses them after construction.
//!
//! ### 中文
//! EGL 呈现后端（运行时动态加载 libEGL）。
//!
//! EGL 库在运行时动态加载，与宿主已加载 GL 栈的假设一致；
//! 句柄包装类型标记为 `Send`，因为构造之后只有工作线程会使用它们。

mod gl;

use khronos_egl as egl;

use dpi::PhysicalSize;

use crate::engine::api::{ConfigRequest, PresentationApi, SetupError};
use crate::engine::worker::NativeWindowHandle;

pub use gl::GlowGl;

/// ### English
/// EGL display connection handle.
///
/// ### 中文
/// EGL display 连接句柄。
#[derive(Clone, Copy)]
pub struct EglDisplayHandle(egl::Display);
unsafe impl Send for EglDisplayHandle {}

/// ### English
/// EGL framebuffer configuration handle.
///
/// ### 中文
/// EGL 帧缓冲配置句柄。
#[derive(Clone, Copy)]
pub struct EglConfigHandle(egl::Config);
unsafe impl Send for EglConfigHandle {}

/// ### English
/// EGL window surface handle.
///
/// ### 中文
/// EGL window surface 句柄。
#[derive(Clone, Copy)]
pub struct EglSurfaceHandle(egl::Surface);
unsafe impl Send for EglSurfaceHandle {}

/// ### English
/// EGL rendering context handle.
///
/// ### 中文
/// EGL 渲染上下文句柄。
#[derive(Clone, Copy)]
pub struct EglContextHandle(egl::Context);
unsafe impl Send for EglContextHandle {}

/// ### English
/// Production presentation backend over a dynamically loaded EGL 1.4 instance.
///
/// ### 中文
/// 基于动态加载的 EGL 1.4 实例的生产环境呈现后端。
pub struct EglPresentation {
    /// ### English
    /// Loaded EGL API instance.
    ///
    /// ### 中文
    /// 已加载的 EGL API 实例。
    egl: egl::DynamicInstance<egl::EGL1_4>,
}

impl EglPresentation {
    /// ### English
    /// Loads libEGL from the system. The embedder's display stack must already provide it.
    ///
    /// ### 中文
    /// 从系统加载 libEGL。宿主的显示栈需已提供该库。
    pub fn load() -> Result<Self, String> {
        let egl = unsafe { egl::DynamicInstance::<egl::EGL1_4>::load_required() }
            .map_err(|err| format!("failed to load libEGL: {err}"))?;
        Ok(Self { egl })
    }
}

impl PresentationApi for EglPresentation {
    type Display = EglDisplayHandle;
    type Config = EglConfigHandle;
    type Surface = EglSurfaceHandle;
    type Context = EglContextHandle;
    type Gl = GlowGl;

    fn create_connection(&self) -> Result<Self::Display, SetupError> {
        let display = unsafe { self.egl.get_display(egl::DEFAULT_DISPLAY) }
            .ok_or_else(|| SetupError::Connection("no default EGL display".to_string()))?;

        let (major, minor) = self
            .egl
            .initialize(display)
            .map_err(|err| SetupError::Connection(format!("eglInitialize: {err}")))?;
        log::info!("EGL version: {major}.{minor}");

        if let Ok(vendor) = self.egl.query_string(Some(display), egl::VENDOR) {
            log::info!("EGL vendor: {}", vendor.to_string_lossy());
        }
        if let Ok(version) = self.egl.query_string(Some(display), egl::VERSION) {
            log::info!("EGL version string: {}", version.to_string_lossy());
        }

        Ok(EglDisplayHandle(display))
    }

    fn choose_config(
        &self,
        display: Self::Display,
        request: &ConfigRequest,
    ) -> Result<Self::Config, SetupError> {
        let attribs = [
            egl::SURFACE_TYPE,
            egl::WINDOW_BIT,
            egl::RED_SIZE,
            request.red_bits as egl::Int,
            egl::GREEN_SIZE,
            request.green_bits as egl::Int,
            egl::BLUE_SIZE,
            request.blue_bits as egl::Int,
            egl::SAMPLE_BUFFERS,
            request.sample_buffers as egl::Int,
            egl::SAMPLES,
            request.samples as egl::Int,
            egl::NONE,
        ];

        // First match wins; the filter is already narrow enough.
        let config = self
            .egl
            .choose_first_config(display.0, &attribs)
            .map_err(|err| SetupError::Config(format!("eglChooseConfig: {err}")))?
            .ok_or_else(|| SetupError::Config("no matching configuration".to_string()))?;
        Ok(EglConfigHandle(config))
    }

    fn create_surface(
        &self,
        display: Self::Display,
        config: Self::Config,
        window: NativeWindowHandle,
    ) -> Result<Self::Surface, SetupError> {
        let attribs = [egl::RENDER_BUFFER, egl::BACK_BUFFER, egl::NONE];
        let surface = unsafe {
            self.egl
                .create_window_surface(display.0, config.0, window.as_ptr(), Some(&attribs))
        }
        .map_err(|err| SetupError::Surface(format!("eglCreateWindowSurface: {err}")))?;
        Ok(EglSurfaceHandle(surface))
    }

    fn create_context(
        &self,
        display: Self::Display,
        config: Self::Config,
        client_version: u32,
    ) -> Result<Self::Context, SetupError> {
        let attribs = [
            egl::CONTEXT_CLIENT_VERSION,
            client_version as egl::Int,
            egl::NONE,
        ];
        let context = self
            .egl
            .create_context(display.0, config.0, None, &attribs)
            .map_err(|err| SetupError::Context(format!("eglCreateContext: {err}")))?;
        Ok(EglContextHandle(context))
    }

    fn make_current(
        &self,
        display: Self::Display,
        surface: Self::Surface,
        context: Self::Context,
    ) -> bool {
        match self
            .egl
            .make_current(display.0, Some(surface.0), Some(surface.0), Some(context.0))
        {
            Ok(()) => true,
            Err(err) => {
                log::error!("eglMakeCurrent failed: {err}");
                false
            }
        }
    }

    fn clear_current(&self, display: Self::Display) -> bool {
        match self.egl.make_current(display.0, None, None, None) {
            Ok(()) => true,
            Err(err) => {
                log::error!("eglMakeCurrent(none) failed: {err}");
                false
            }
        }
    }

    fn query_size(
        &self,
        display: Self::Display,
        surface: Self::Surface,
    ) -> Result<PhysicalSize<u32>, SetupError> {
        let width = self
            .egl
            .query_surface(display.0, surface.0, egl::WIDTH)
            .map_err(|err| SetupError::QuerySize(format!("eglQuerySurface(WIDTH): {err}")))?;
        let height = self
            .egl
            .query_surface(display.0, surface.0, egl::HEIGHT)
            .map_err(|err| SetupError::QuerySize(format!("eglQuerySurface(HEIGHT): {err}")))?;
        Ok(PhysicalSize::new(width.max(0) as u32, height.max(0) as u32))
    }

    fn load_gl(&self) -> Result<Self::Gl, SetupError> {
        Ok(GlowGl::load(&self.egl))
    }

    fn present(&self, display: Self::Display, surface: Self::Surface) -> bool {
        match self.egl.swap_buffers(display.0, surface.0) {
            Ok(()) => true,
            Err(err) => {
                log::error!("eglSwapBuffers failed: {err}");
                false
            }
        }
    }

    fn destroy_context(&self, display: Self::Display, context: Self::Context) {
        if let Err(err) = self.egl.destroy_context(display.0, context.0) {
            log::error!("eglDestroyContext failed: {err}");
        }
    }

    fn destroy_surface(&self, display: Self::Display, surface: Self::Surface) {
        if let Err(err) = self.egl.destroy_surface(display.0, surface.0) {
            log::error!("eglDestroySurface failed: {err}");
        }
    }

    fn destroy_connection(&self, display: Self::Display) {
        if let Err(err) = self.egl.terminate(display.0) {
            log::error!("eglTerminate failed: {err}");
        }
    }
}
