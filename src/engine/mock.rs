//! ### English
//! Scripted in-memory backend for both abstraction traits.
//!
//! Every call is appended to a shared journal, and individual steps can be scripted to
//! fail, so lifecycle ordering, rollback, and coalescing are all mechanically checkable.
//! Used by the test suite; also usable by headless embedders that want the worker without
//! a real display.
//!
//! ### 中文
//! 两个抽象 trait 的脚本化内存后端。
//!
//! 每次调用都会追加到共享日志中，且每个步骤都可以脚本化为失败，
//! 因此生命周期顺序、回滚与命令合并都可以机械化验证。
//! 测试套件使用它；需要在无真实 display 环境下运行 worker 的宿主也可使用。

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use dpi::PhysicalSize;

use crate::engine::api::{
    ConfigRequest, GlApi, PresentationApi, PrimitiveMode, SetupError, ShaderStage,
};
use crate::engine::worker::NativeWindowHandle;

/// ### English
/// One recorded backend call.
///
/// ### 中文
/// 一次被记录的后端调用。
#[derive(Debug, Clone, PartialEq)]
pub enum MockEvent {
    CreateConnection,
    ChooseConfig,
    CreateSurface { window: usize },
    CreateContext { client_version: u32 },
    MakeCurrent,
    ClearCurrent,
    QuerySize,
    LoadGl,
    Present,
    DestroyContext,
    DestroySurface,
    DestroyConnection,
    CompileShader { stage: ShaderStage },
    LinkProgram,
    DeleteShader,
    DeleteProgram,
    BindAttribLocation { index: u32, name: String },
    UniformLocation(String),
    CreateVertexBuffer { floats: usize },
    DeleteBuffer,
    Viewport { width: u32, height: u32 },
    Scissor { width: u32, height: u32 },
    EnableDepthTest,
    EnableAlphaBlending,
    Clear,
    UseProgram,
    SetUniformMatrix,
    SetUniformVec4,
    DrawVertices { count: i32 },
    Flush,
}

/// ### English
/// Steps scripted to fail. Everything not set succeeds.
///
/// ### 中文
/// 被脚本化为失败的步骤。未设置的步骤都会成功。
#[derive(Debug, Clone, Default)]
pub struct MockFailures {
    pub create_connection: bool,
    pub choose_config: bool,
    pub create_surface: bool,
    pub create_context: bool,
    pub make_current: bool,
    pub query_size: bool,
    pub load_gl: bool,
    pub present: bool,
    pub compile_vertex: bool,
    pub compile_fragment: bool,
    pub link_program: bool,
}

/// ### English
/// Shared, cloneable view of the recorded call journal.
///
/// ### 中文
/// 可克隆共享的调用日志视图。
#[derive(Clone, Default)]
pub struct MockJournal {
    events: Arc<Mutex<Vec<MockEvent>>>,
}

impl MockJournal {
    fn record(&self, event: MockEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    /// ### English
    /// Copies out the journal as recorded so far.
    ///
    /// ### 中文
    /// 复制截至目前记录的日志。
    pub fn snapshot(&self) -> Vec<MockEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// ### English
    /// Number of recorded events.
    ///
    /// ### 中文
    /// 已记录事件的数量。
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// ### English
    /// Whether nothing has been recorded yet.
    ///
    /// ### 中文
    /// 是否尚未记录任何事件。
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// ### English
    /// Polls the journal until `predicate` holds or `timeout` elapses.
    /// Returns whether the predicate was observed.
    ///
    /// ### 中文
    /// 轮询日志直到 `predicate` 成立或超过 `timeout`。返回是否观察到谓词成立。
    pub fn wait_until(
        &self,
        timeout: Duration,
        predicate: impl Fn(&[MockEvent]) -> bool,
    ) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if predicate(&self.snapshot()) {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
    }
}

/// ### English
/// Scripted implementation of [`PresentationApi`].
///
/// ### 中文
/// [`PresentationApi`] 的脚本化实现。
pub struct MockPresentation {
    journal: MockJournal,
    failures: MockFailures,
    surface_size: PhysicalSize<u32>,
}

impl MockPresentation {
    /// ### English
    /// A backend where every step succeeds and surfaces report 640x480.
    ///
    /// ### 中文
    /// 所有步骤都成功、surface 报告 640x480 的后端。
    pub fn new() -> Self {
        Self::with_failures(MockFailures::default())
    }

    /// ### English
    /// A backend with specific steps scripted to fail.
    ///
    /// ### 中文
    /// 指定步骤脚本化失败的后端。
    pub fn with_failures(failures: MockFailures) -> Self {
        Self {
            journal: MockJournal::default(),
            failures,
            surface_size: PhysicalSize::new(640, 480),
        }
    }

    /// ### English
    /// Overrides the size reported by `query_size`.
    ///
    /// ### 中文
    /// 覆盖 `query_size` 报告的尺寸。
    pub fn set_surface_size(&mut self, size: PhysicalSize<u32>) {
        self.surface_size = size;
    }

    /// ### English
    /// A cloneable handle onto the shared journal.
    ///
    /// ### 中文
    /// 共享日志的可克隆句柄。
    pub fn journal(&self) -> MockJournal {
        self.journal.clone()
    }
}

impl Default for MockPresentation {
    fn default() -> Self {
        Self::new()
    }
}

impl PresentationApi for MockPresentation {
    type Display = u32;
    type Config = u32;
    type Surface = u32;
    type Context = u32;
    type Gl = MockGl;

    fn create_connection(&self) -> Result<Self::Display, SetupError> {
        self.journal.record(MockEvent::CreateConnection);
        if self.failures.create_connection {
            return Err(SetupError::Connection("scripted failure".to_string()));
        }
        Ok(1)
    }

    fn choose_config(
        &self,
        _display: Self::Display,
        _request: &ConfigRequest,
    ) -> Result<Self::Config, SetupError> {
        self.journal.record(MockEvent::ChooseConfig);
        if self.failures.choose_config {
            return Err(SetupError::Config("scripted failure".to_string()));
        }
        Ok(1)
    }

    fn create_surface(
        &self,
        _display: Self::Display,
        _config: Self::Config,
        window: NativeWindowHandle,
    ) -> Result<Self::Surface, SetupError> {
        self.journal.record(MockEvent::CreateSurface {
            window: window.as_raw(),
        });
        if self.failures.create_surface {
            return Err(SetupError::Surface("scripted failure".to_string()));
        }
        Ok(1)
    }

    fn create_context(
        &self,
        _display: Self::Display,
        _config: Self::Config,
        client_version: u32,
    ) -> Result<Self::Context, SetupError> {
        self.journal
            .record(MockEvent::CreateContext { client_version });
        if self.failures.create_context {
            return Err(SetupError::Context("scripted failure".to_string()));
        }
        Ok(1)
    }

    fn make_current(
        &self,
        _display: Self::Display,
        _surface: Self::Surface,
        _context: Self::Context,
    ) -> bool {
        self.journal.record(MockEvent::MakeCurrent);
        !self.failures.make_current
    }

    fn clear_current(&self, _display: Self::Display) -> bool {
        self.journal.record(MockEvent::ClearCurrent);
        true
    }

    fn query_size(
        &self,
        _display: Self::Display,
        _surface: Self::Surface,
    ) -> Result<PhysicalSize<u32>, SetupError> {
        self.journal.record(MockEvent::QuerySize);
        if self.failures.query_size {
            return Err(SetupError::QuerySize("scripted failure".to_string()));
        }
        Ok(self.surface_size)
    }

    fn load_gl(&self) -> Result<Self::Gl, SetupError> {
        self.journal.record(MockEvent::LoadGl);
        if self.failures.load_gl {
            return Err(SetupError::LoadGl("scripted failure".to_string()));
        }
        Ok(MockGl {
            journal: self.journal.clone(),
            failures: self.failures.clone(),
        })
    }

    fn present(&self, _display: Self::Display, _surface: Self::Surface) -> bool {
        self.journal.record(MockEvent::Present);
        !self.failures.present
    }

    fn destroy_context(&self, _display: Self::Display, _context: Self::Context) {
        self.journal.record(MockEvent::DestroyContext);
    }

    fn destroy_surface(&self, _display: Self::Display, _surface: Self::Surface) {
        self.journal.record(MockEvent::DestroySurface);
    }

    fn destroy_connection(&self, _display: Self::Display) {
        self.journal.record(MockEvent::DestroyConnection);
    }
}

/// ### English
/// Shader handle value for the vertex stage.
///
/// ### 中文
/// 顶点阶段的着色器句柄值。
const SHADER_VERTEX: u32 = 1;
/// ### English
/// Shader handle value for the fragment stage.
///
/// ### 中文
/// 片段阶段的着色器句柄值。
const SHADER_FRAGMENT: u32 = 2;

/// ### English
/// Scripted implementation of [`GlApi`] sharing the journal of its presentation backend.
///
/// ### 中文
/// [`GlApi`] 的脚本化实现，与其呈现后端共享同一份日志。
pub struct MockGl {
    journal: MockJournal,
    failures: MockFailures,
}

impl MockGl {
    /// ### English
    /// A standalone GL mock where everything succeeds.
    ///
    /// ### 中文
    /// 独立的 GL mock，所有调用都成功。
    pub fn new() -> Self {
        Self::with_failures(MockFailures::default())
    }

    /// ### English
    /// A standalone GL mock with scripted failures.
    ///
    /// ### 中文
    /// 带脚本化失败的独立 GL mock。
    pub fn with_failures(failures: MockFailures) -> Self {
        Self {
            journal: MockJournal::default(),
            failures,
        }
    }

    /// ### English
    /// A cloneable handle onto the shared journal.
    ///
    /// ### 中文
    /// 共享日志的可克隆句柄。
    pub fn journal(&self) -> MockJournal {
        self.journal.clone()
    }
}

impl Default for MockGl {
    fn default() -> Self {
        Self::new()
    }
}

impl GlApi for MockGl {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type Uniform = String;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        Ok(match stage {
            ShaderStage::Vertex => SHADER_VERTEX,
            ShaderStage::Fragment => SHADER_FRAGMENT,
        })
    }

    fn compile_shader(&self, shader: Self::Shader, _source: &str) -> bool {
        let stage = if shader == SHADER_VERTEX {
            ShaderStage::Vertex
        } else {
            ShaderStage::Fragment
        };
        self.journal.record(MockEvent::CompileShader { stage });
        match stage {
            ShaderStage::Vertex => !self.failures.compile_vertex,
            ShaderStage::Fragment => !self.failures.compile_fragment,
        }
    }

    fn shader_info_log(&self, _shader: Self::Shader) -> String {
        "scripted diagnostic".to_string()
    }

    fn delete_shader(&self, _shader: Self::Shader) {
        self.journal.record(MockEvent::DeleteShader);
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        Ok(1)
    }

    fn attach_shader(&self, _program: Self::Program, _shader: Self::Shader) {}

    fn detach_shader(&self, _program: Self::Program, _shader: Self::Shader) {}

    fn bind_attrib_location(&self, _program: Self::Program, index: u32, name: &str) {
        self.journal.record(MockEvent::BindAttribLocation {
            index,
            name: name.to_string(),
        });
    }

    fn link_program(&self, _program: Self::Program) -> bool {
        self.journal.record(MockEvent::LinkProgram);
        !self.failures.link_program
    }

    fn program_info_log(&self, _program: Self::Program) -> String {
        "scripted diagnostic".to_string()
    }

    fn delete_program(&self, _program: Self::Program) {
        self.journal.record(MockEvent::DeleteProgram);
    }

    fn uniform_location(&self, _program: Self::Program, name: &str) -> Option<Self::Uniform> {
        self.journal
            .record(MockEvent::UniformLocation(name.to_string()));
        Some(name.to_string())
    }

    fn create_vertex_buffer(&self, data: &[f32]) -> Result<Self::Buffer, String> {
        self.journal
            .record(MockEvent::CreateVertexBuffer { floats: data.len() });
        Ok(1)
    }

    fn delete_buffer(&self, _buffer: Self::Buffer) {
        self.journal.record(MockEvent::DeleteBuffer);
    }

    fn viewport(&self, size: PhysicalSize<u32>) {
        self.journal.record(MockEvent::Viewport {
            width: size.width,
            height: size.height,
        });
    }

    fn scissor(&self, size: PhysicalSize<u32>) {
        self.journal.record(MockEvent::Scissor {
            width: size.width,
            height: size.height,
        });
    }

    fn enable_depth_test(&self) {
        self.journal.record(MockEvent::EnableDepthTest);
    }

    fn enable_alpha_blending(&self) {
        self.journal.record(MockEvent::EnableAlphaBlending);
    }

    fn clear(&self, _color: [f32; 4]) {
        self.journal.record(MockEvent::Clear);
    }

    fn use_program(&self, _program: Self::Program) {
        self.journal.record(MockEvent::UseProgram);
    }

    fn set_uniform_matrix(&self, _location: &Self::Uniform, _matrix: &[f32; 16]) {
        self.journal.record(MockEvent::SetUniformMatrix);
    }

    fn set_uniform_vec4(&self, _location: &Self::Uniform, _value: [f32; 4]) {
        self.journal.record(MockEvent::SetUniformVec4);
    }

    fn draw_vertices(
        &self,
        _buffer: Self::Buffer,
        _attrib_index: u32,
        _mode: PrimitiveMode,
        vertex_count: i32,
    ) {
        self.journal
            .record(MockEvent::DrawVertices {
                count: vertex_count,
            });
    }

    fn flush(&self) {
        self.journal.record(MockEvent::Flush);
    }
}
