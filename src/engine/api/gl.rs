//! ### English
//! Narrow GL subset used by pipeline setup and the per-frame draw.
//!
//! Only the calls the worker actually issues are abstracted here; anything else stays behind
//! the concrete `glow` backend. Status checks (`compile_shader`, `link_program`) return the
//! boolean status directly so callers never forget to query it.
//!
//! ### 中文
//! 管线构建与逐帧绘制所需的最小 GL 子集。
//!
//! 这里只抽象工作线程真正会调用的 GL 接口，其余全部留在具体的 `glow` 后端。
//! 状态检查（`compile_shader`、`link_program`）直接返回布尔状态，调用方不会漏查。

use dpi::PhysicalSize;

/// ### English
/// Shader stage selector for [`GlApi::create_shader`].
///
/// ### 中文
/// [`GlApi::create_shader`] 的着色器阶段选择。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    /// ### English
    /// Vertex shader stage.
    ///
    /// ### 中文
    /// 顶点着色器阶段。
    Vertex,
    /// ### English
    /// Fragment shader stage.
    ///
    /// ### 中文
    /// 片段着色器阶段。
    Fragment,
}

impl ShaderStage {
    /// ### English
    /// Human-readable stage name used in diagnostics.
    ///
    /// ### 中文
    /// 诊断信息里使用的阶段名称。
    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

/// ### English
/// Primitive topology for [`GlApi::draw_vertices`].
///
/// ### 中文
/// [`GlApi::draw_vertices`] 的图元拓扑。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveMode {
    /// ### English
    /// One point per vertex.
    ///
    /// ### 中文
    /// 每顶点一个点。
    Points,
    /// ### English
    /// Independent triangles.
    ///
    /// ### 中文
    /// 独立三角形。
    Triangles,
    /// ### English
    /// Triangle strip.
    ///
    /// ### 中文
    /// 三角形条带。
    TriangleStrip,
}

/// ### English
/// GL entry points scoped to one current context.
///
/// Handles are context-scoped: none of them may be carried across a teardown boundary.
/// The worker thread is the only caller.
///
/// ### 中文
/// 作用域限定在单个 current 上下文内的 GL 入口点。
///
/// 句柄均与上下文绑定：任何句柄都不得跨越 teardown 边界继续使用。
/// 只有工作线程会调用。
pub trait GlApi {
    /// ### English
    /// Shader object handle.
    ///
    /// ### 中文
    /// 着色器对象句柄。
    type Shader: Copy;
    /// ### English
    /// Linked program handle.
    ///
    /// ### 中文
    /// 已链接程序句柄。
    type Program: Copy;
    /// ### English
    /// Vertex buffer handle.
    ///
    /// ### 中文
    /// 顶点缓冲句柄。
    type Buffer: Copy;
    /// ### English
    /// Resolved uniform location.
    ///
    /// ### 中文
    /// 已解析的 uniform location。
    type Uniform: Clone;

    /// ### English
    /// Creates one shader object for `stage`.
    ///
    /// ### 中文
    /// 为 `stage` 创建一个着色器对象。
    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;

    /// ### English
    /// Uploads source text and compiles; returns the compile status.
    ///
    /// ### 中文
    /// 上传源码并编译；返回编译状态。
    fn compile_shader(&self, shader: Self::Shader, source: &str) -> bool;

    /// ### English
    /// Returns the compile diagnostic text.
    ///
    /// ### 中文
    /// 返回编译诊断文本。
    fn shader_info_log(&self, shader: Self::Shader) -> String;

    /// ### English
    /// Deletes one shader object.
    ///
    /// ### 中文
    /// 删除一个着色器对象。
    fn delete_shader(&self, shader: Self::Shader);

    /// ### English
    /// Creates an empty program object.
    ///
    /// ### 中文
    /// 创建一个空的程序对象。
    fn create_program(&self) -> Result<Self::Program, String>;

    /// ### English
    /// Attaches a shader object to a program.
    ///
    /// ### 中文
    /// 将着色器对象附加到程序上。
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);

    /// ### English
    /// Detaches a shader object from a program.
    ///
    /// ### 中文
    /// 从程序上分离着色器对象。
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);

    /// ### English
    /// Binds a fixed attribute location index before linking.
    ///
    /// ### 中文
    /// 在链接前绑定固定的属性位置索引。
    fn bind_attrib_location(&self, program: Self::Program, index: u32, name: &str);

    /// ### English
    /// Links the program; returns the link status.
    ///
    /// ### 中文
    /// 链接程序；返回链接状态。
    fn link_program(&self, program: Self::Program) -> bool;

    /// ### English
    /// Returns the link diagnostic text.
    ///
    /// ### 中文
    /// 返回链接诊断文本。
    fn program_info_log(&self, program: Self::Program) -> String;

    /// ### English
    /// Deletes a program object.
    ///
    /// ### 中文
    /// 删除程序对象。
    fn delete_program(&self, program: Self::Program);

    /// ### English
    /// Resolves a uniform location on a linked program.
    ///
    /// ### 中文
    /// 在已链接程序上解析 uniform location。
    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::Uniform>;

    /// ### English
    /// Creates a vertex buffer and uploads `data`.
    ///
    /// ### 中文
    /// 创建顶点缓冲并上传 `data`。
    fn create_vertex_buffer(&self, data: &[f32]) -> Result<Self::Buffer, String>;

    /// ### English
    /// Deletes a vertex buffer.
    ///
    /// ### 中文
    /// 删除顶点缓冲。
    fn delete_buffer(&self, buffer: Self::Buffer);

    /// ### English
    /// Sets the viewport to `size` at origin.
    ///
    /// ### 中文
    /// 将 viewport 设为原点处的 `size`。
    fn viewport(&self, size: PhysicalSize<u32>);

    /// ### English
    /// Sets the scissor rectangle to `size` at origin.
    ///
    /// ### 中文
    /// 将 scissor 矩形设为原点处的 `size`。
    fn scissor(&self, size: PhysicalSize<u32>);

    /// ### English
    /// Enables depth testing (persistent draw state set once per attach).
    ///
    /// ### 中文
    /// 启用深度测试（每次 attach 设置一次的常驻绘制状态）。
    fn enable_depth_test(&self);

    /// ### English
    /// Enables standard alpha blending (`SRC_ALPHA`, `ONE_MINUS_SRC_ALPHA`).
    ///
    /// ### 中文
    /// 启用标准 alpha 混合（`SRC_ALPHA`、`ONE_MINUS_SRC_ALPHA`）。
    fn enable_alpha_blending(&self);

    /// ### English
    /// Clears color and depth buffers to `color`.
    ///
    /// ### 中文
    /// 用 `color` 清除颜色与深度缓冲。
    fn clear(&self, color: [f32; 4]);

    /// ### English
    /// Binds a linked program for drawing.
    ///
    /// ### 中文
    /// 绑定已链接程序用于绘制。
    fn use_program(&self, program: Self::Program);

    /// ### English
    /// Uploads a column-major 4x4 matrix uniform.
    ///
    /// ### 中文
    /// 上传列主序 4x4 矩阵 uniform。
    fn set_uniform_matrix(&self, location: &Self::Uniform, matrix: &[f32; 16]);

    /// ### English
    /// Uploads a vec4 uniform.
    ///
    /// ### 中文
    /// 上传 vec4 uniform。
    fn set_uniform_vec4(&self, location: &Self::Uniform, value: [f32; 4]);

    /// ### English
    /// Binds `buffer` to attribute `attrib_index` (3 floats per vertex) and draws
    /// `vertex_count` vertices with `mode`, then unbinds the attribute.
    ///
    /// ### 中文
    /// 将 `buffer` 绑定到属性 `attrib_index`（每顶点 3 个 float），
    /// 以 `mode` 绘制 `vertex_count` 个顶点，随后解绑属性。
    fn draw_vertices(
        &self,
        buffer: Self::Buffer,
        attrib_index: u32,
        mode: PrimitiveMode,
        vertex_count: i32,
    );

    /// ### English
    /// Flushes queued GL commands.
    ///
    /// ### 中文
    /// flush 已排队的 GL 命令。
    fn flush(&self);
}
