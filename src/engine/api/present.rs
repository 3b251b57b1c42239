//! ### English
//! Black-box presentation API: display connection, surface, context, present.
//!
//! ### 中文
//! 黑盒呈现 API：display 连接、surface、context 与 present。

use dpi::PhysicalSize;
use thiserror::Error;

use super::gl::GlApi;
use crate::engine::worker::NativeWindowHandle;

/// ### English
/// Framebuffer configuration constraints used by [`PresentationApi::choose_config`].
///
/// The filter is intentionally narrow (color depth plus optional multisampling), so taking
/// the first matching configuration is acceptable; candidates are not scored.
///
/// ### 中文
/// [`PresentationApi::choose_config`] 使用的帧缓冲配置约束。
///
/// 过滤条件刻意保持收窄（颜色位深加可选多重采样），因此直接取第一个匹配配置即可，
/// 不对候选项打分。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigRequest {
    /// ### English
    /// Bits per red channel.
    ///
    /// ### 中文
    /// 红色通道位数。
    pub red_bits: u32,
    /// ### English
    /// Bits per green channel.
    ///
    /// ### 中文
    /// 绿色通道位数。
    pub green_bits: u32,
    /// ### English
    /// Bits per blue channel.
    ///
    /// ### 中文
    /// 蓝色通道位数。
    pub blue_bits: u32,
    /// ### English
    /// Number of multisample buffers (`0` disables MSAA).
    ///
    /// ### 中文
    /// 多重采样缓冲数量（`0` 表示关闭 MSAA）。
    pub sample_buffers: u32,
    /// ### English
    /// Samples per pixel when multisampling is enabled.
    ///
    /// ### 中文
    /// 启用多重采样时的每像素采样数。
    pub samples: u32,
    /// ### English
    /// Requested client API version (`2` = OpenGL ES 2.0).
    ///
    /// ### 中文
    /// 请求的客户端 API 版本（`2` = OpenGL ES 2.0）。
    pub client_version: u32,
}

impl Default for ConfigRequest {
    /// ### English
    /// RGB888 with 4x MSAA and an ES 2.0 context.
    ///
    /// ### 中文
    /// RGB888、4x MSAA、ES 2.0 上下文。
    fn default() -> Self {
        Self {
            red_bits: 8,
            green_bits: 8,
            blue_bits: 8,
            sample_buffers: 1,
            samples: 4,
            client_version: 2,
        }
    }
}

/// ### English
/// Failure of one step of the surface-attach transition.
///
/// Every variant is recoverable: the worker logs it, tears down whatever was partially
/// created, and stays in the no-context state until the controller posts a new surface.
///
/// ### 中文
/// surface attach 过程中某一步的失败。
///
/// 所有变体都是可恢复的：工作线程记录日志、回收已部分创建的资源，
/// 并停留在无上下文状态，直到控制线程重新投递 surface。
#[derive(Debug, Error)]
pub enum SetupError {
    /// ### English
    /// Opening/initializing the display connection failed.
    ///
    /// ### 中文
    /// 打开/初始化 display 连接失败。
    #[error("failed to open display connection: {0}")]
    Connection(String),
    /// ### English
    /// No framebuffer configuration matched the request.
    ///
    /// ### 中文
    /// 没有匹配请求的帧缓冲配置。
    #[error("no framebuffer configuration matched: {0}")]
    Config(String),
    /// ### English
    /// Creating the window surface failed.
    ///
    /// ### 中文
    /// 创建 window surface 失败。
    #[error("failed to create window surface: {0}")]
    Surface(String),
    /// ### English
    /// Creating the rendering context failed.
    ///
    /// ### 中文
    /// 创建渲染上下文失败。
    #[error("failed to create rendering context: {0}")]
    Context(String),
    /// ### English
    /// Binding (display, surface, context) as current failed.
    ///
    /// ### 中文
    /// 将 (display, surface, context) 绑定为 current 失败。
    #[error("failed to make context current")]
    MakeCurrent,
    /// ### English
    /// Querying the drawable size failed.
    ///
    /// ### 中文
    /// 查询 drawable 尺寸失败。
    #[error("failed to query drawable size: {0}")]
    QuerySize(String),
    /// ### English
    /// Loading GL entry points for the newly current context failed.
    ///
    /// ### 中文
    /// 为新 current 的上下文加载 GL 入口点失败。
    #[error("failed to load GL entry points: {0}")]
    LoadGl(String),
}

/// ### English
/// The display/surface/context triple as a black box.
///
/// All methods must be called from the worker thread only; handles are `Copy + Send` so the
/// triple can live inside the worker-owned [`crate::engine::worker::GraphicsContext`].
/// `make_current`, `present` and the `destroy_*` family mirror the EGL calls they wrap and
/// report failure without aborting the worker.
///
/// ### 中文
/// 作为黑盒的 display/surface/context 三元组。
///
/// 所有方法只能在工作线程调用；句柄为 `Copy + Send`，
/// 以便三元组存放在工作线程独占的 [`crate::engine::worker::GraphicsContext`] 中。
/// `make_current`、`present` 与 `destroy_*` 系列与其包装的 EGL 调用一一对应，
/// 失败时只上报、不中止工作线程。
pub trait PresentationApi {
    /// ### English
    /// Display connection handle.
    ///
    /// ### 中文
    /// display 连接句柄。
    type Display: Copy + Send;
    /// ### English
    /// Framebuffer configuration handle.
    ///
    /// ### 中文
    /// 帧缓冲配置句柄。
    type Config: Copy + Send;
    /// ### English
    /// Drawable surface handle.
    ///
    /// ### 中文
    /// drawable surface 句柄。
    type Surface: Copy + Send;
    /// ### English
    /// Rendering context handle.
    ///
    /// ### 中文
    /// 渲染上下文句柄。
    type Context: Copy + Send;
    /// ### English
    /// GL entry-point set loaded once the context is current.
    ///
    /// ### 中文
    /// 上下文 current 之后加载的 GL 入口点集合。
    type Gl: GlApi;

    /// ### English
    /// Opens and initializes the display connection.
    ///
    /// ### 中文
    /// 打开并初始化 display 连接。
    fn create_connection(&self) -> Result<Self::Display, SetupError>;

    /// ### English
    /// Picks the first configuration matching `request`.
    ///
    /// ### 中文
    /// 选取第一个匹配 `request` 的配置。
    fn choose_config(
        &self,
        display: Self::Display,
        request: &ConfigRequest,
    ) -> Result<Self::Config, SetupError>;

    /// ### English
    /// Creates a drawable surface bound to the native window handle.
    ///
    /// ### 中文
    /// 创建绑定到原生 window 句柄的 drawable surface。
    fn create_surface(
        &self,
        display: Self::Display,
        config: Self::Config,
        window: NativeWindowHandle,
    ) -> Result<Self::Surface, SetupError>;

    /// ### English
    /// Creates a rendering context requesting `client_version`.
    ///
    /// ### 中文
    /// 创建请求 `client_version` 的渲染上下文。
    fn create_context(
        &self,
        display: Self::Display,
        config: Self::Config,
        client_version: u32,
    ) -> Result<Self::Context, SetupError>;

    /// ### English
    /// Binds the triple as current on the calling thread.
    ///
    /// ### 中文
    /// 在调用线程上将三元组绑定为 current。
    fn make_current(
        &self,
        display: Self::Display,
        surface: Self::Surface,
        context: Self::Context,
    ) -> bool;

    /// ### English
    /// Unbinds any current context (make none current).
    ///
    /// ### 中文
    /// 解绑当前上下文（make none current）。
    fn clear_current(&self, display: Self::Display) -> bool;

    /// ### English
    /// Queries the drawable size in physical pixels.
    ///
    /// ### 中文
    /// 查询 drawable 尺寸（物理像素）。
    fn query_size(
        &self,
        display: Self::Display,
        surface: Self::Surface,
    ) -> Result<PhysicalSize<u32>, SetupError>;

    /// ### English
    /// Loads GL entry points; must run while the context is current.
    ///
    /// ### 中文
    /// 加载 GL 入口点；必须在上下文 current 时执行。
    fn load_gl(&self) -> Result<Self::Gl, SetupError>;

    /// ### English
    /// Submits the completed frame for display (swap).
    ///
    /// ### 中文
    /// 提交已完成的帧用于显示（swap）。
    fn present(&self, display: Self::Display, surface: Self::Surface) -> bool;

    /// ### English
    /// Destroys a rendering context.
    ///
    /// ### 中文
    /// 销毁渲染上下文。
    fn destroy_context(&self, display: Self::Display, context: Self::Context);

    /// ### English
    /// Destroys a drawable surface.
    ///
    /// ### 中文
    /// 销毁 drawable surface。
    fn destroy_surface(&self, display: Self::Display, surface: Self::Surface);

    /// ### English
    /// Closes the display connection.
    ///
    /// ### 中文
    /// 关闭 display 连接。
    fn destroy_connection(&self, display: Self::Display);
}
