//! ### English
//! Incidental draw payload: shader source text, vertex data, and draw parameters.
//!
//! The worker does not care what is drawn; this bundle is handed to pipeline setup and the
//! per-frame draw unchanged. The default reproduces the point-quad demo scene.
//!
//! ### 中文
//! 附带的绘制载荷：着色器源码、顶点数据与绘制参数。
//!
//! 工作线程不关心画的是什么；该数据包原样交给管线构建与逐帧绘制。
//! 默认值复现点阵四边形演示场景。

use crate::engine::api::PrimitiveMode;

/// ### English
/// Demo vertex shader (GLSL ES 2.0).
///
/// ### 中文
/// 演示用顶点着色器（GLSL ES 2.0）。
const DEMO_VERTEX_SHADER: &str = "\
attribute vec4 position;
uniform mat4 u_transform;
void main() {
    gl_Position = u_transform * position;
    gl_PointSize = 50.0;
}
";

/// ### English
/// Demo fragment shader (GLSL ES 2.0).
///
/// ### 中文
/// 演示用片段着色器（GLSL ES 2.0）。
const DEMO_FRAGMENT_SHADER: &str = "\
precision mediump float;
uniform vec4 u_color;
void main() {
    gl_FragColor = u_color;
}
";

/// ### English
/// Everything the pipeline and the frame draw need to know about the scene.
///
/// ### 中文
/// 管线与逐帧绘制所需的全部场景信息。
#[derive(Debug, Clone)]
pub struct SceneSpec {
    /// ### English
    /// Vertex shader source text.
    ///
    /// ### 中文
    /// 顶点着色器源码。
    pub vertex_shader: String,
    /// ### English
    /// Fragment shader source text.
    ///
    /// ### 中文
    /// 片段着色器源码。
    pub fragment_shader: String,
    /// ### English
    /// Name of the vertex position attribute (bound to a fixed index before link).
    ///
    /// ### 中文
    /// 顶点位置属性的名称（链接前绑定到固定索引）。
    pub attrib_name: String,
    /// ### English
    /// Vertex positions, three floats per vertex.
    ///
    /// ### 中文
    /// 顶点位置，每顶点三个 float。
    pub vertices: Vec<f32>,
    /// ### English
    /// Primitive topology for the draw call.
    ///
    /// ### 中文
    /// 绘制调用的图元拓扑。
    pub mode: PrimitiveMode,
    /// ### English
    /// Name of the 4x4 transform uniform.
    ///
    /// ### 中文
    /// 4x4 变换 uniform 的名称。
    pub transform_uniform: String,
    /// ### English
    /// Name of the vec4 color uniform.
    ///
    /// ### 中文
    /// vec4 颜色 uniform 的名称。
    pub color_uniform: String,
    /// ### English
    /// Column-major transform matrix uploaded each frame.
    ///
    /// ### 中文
    /// 每帧上传的列主序变换矩阵。
    pub transform: [f32; 16],
    /// ### English
    /// Draw color uploaded each frame.
    ///
    /// ### 中文
    /// 每帧上传的绘制颜色。
    pub color: [f32; 4],
    /// ### English
    /// Clear color applied before drawing.
    ///
    /// ### 中文
    /// 绘制前使用的清屏颜色。
    pub clear_color: [f32; 4],
}

impl SceneSpec {
    /// ### English
    /// Number of vertices in `vertices` (three floats each).
    ///
    /// ### 中文
    /// `vertices` 中的顶点数量（每顶点三个 float）。
    pub fn vertex_count(&self) -> i32 {
        (self.vertices.len() / 3) as i32
    }
}

impl Default for SceneSpec {
    /// ### English
    /// The point-quad demo: four oversized points drawn in red on a warm clear color.
    ///
    /// ### 中文
    /// 点阵四边形演示：在暖色清屏背景上用红色绘制四个放大的点。
    fn default() -> Self {
        #[rustfmt::skip]
        let vertices = vec![
            -0.5,  0.0, 0.0,
             0.0, -0.5, 0.0,
             1.0,  0.0, 0.0,
             0.0,  1.0, 0.0,
        ];

        #[rustfmt::skip]
        let transform = [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];

        Self {
            vertex_shader: DEMO_VERTEX_SHADER.to_string(),
            fragment_shader: DEMO_FRAGMENT_SHADER.to_string(),
            attrib_name: "position".to_string(),
            vertices,
            mode: PrimitiveMode::Points,
            transform_uniform: "u_transform".to_string(),
            color_uniform: "u_color".to_string(),
            transform,
            color: [1.0, 0.0, 0.0, 1.0],
            clear_color: [0.9, 0.2, 0.2, 1.0],
        }
    }
}
