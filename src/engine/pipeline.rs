//! ### English
//! Shader program setup and the per-frame draw.
//!
//! Program and buffer identifiers are context-scoped, so a `Pipeline` is rebuilt on every
//! successful attach and destroyed before the matching teardown; nothing here survives a
//! context boundary. A compile failure is logged with the full source and diagnostic and is
//! not a hard stop — the subsequent link failure invalidates the program, and an invalid
//! program makes the draw step clear-only.
//!
//! ### 中文
//! 着色器程序构建与逐帧绘制。
//!
//! 程序与缓冲标识符的作用域限定在上下文内，因此 `Pipeline` 在每次成功 attach 时重建，
//! 并在对应 teardown 前销毁；这里没有任何状态跨越上下文边界。
//! 编译失败会连同完整源码与诊断一起记录日志，但不是硬性终止 ——
//! 随后的链接失败会使程序失效，而失效的程序会让绘制步骤退化为仅清屏。

use dpi::PhysicalSize;

use crate::engine::api::{GlApi, ShaderStage};
use crate::engine::scene::SceneSpec;

/// ### English
/// Fixed attribute location index for the vertex position attribute.
///
/// ### 中文
/// 顶点位置属性的固定位置索引。
const ATTRIB_POSITION: u32 = 0;

/// ### English
/// Linked program plus resolved uniform locations and the uploaded vertex buffer.
///
/// `program == None` is the explicit invalid sentinel: drawing with it is a defined no-op
/// (clear and viewport only).
///
/// ### 中文
/// 已链接程序、已解析的 uniform location 与已上传的顶点缓冲。
///
/// `program == None` 是显式的失效哨兵：用它绘制是已定义的 no-op（仅清屏与 viewport）。
pub struct Pipeline<G: GlApi> {
    program: Option<G::Program>,
    u_transform: Option<G::Uniform>,
    u_color: Option<G::Uniform>,
    vertex_buffer: Option<G::Buffer>,
    vertex_count: i32,
}

impl<G: GlApi> Pipeline<G> {
    /// ### English
    /// Compiles, links and uploads everything the scene needs. Never fails hard: any
    /// compile/link problem is logged and leaves the program invalid.
    ///
    /// ### 中文
    /// 编译、链接并上传场景所需的全部资源。从不硬性失败：
    /// 任何编译/链接问题都会记录日志，并使程序保持失效状态。
    pub fn build(gl: &G, scene: &SceneSpec) -> Self {
        let program = link_program(gl, scene);

        let (u_transform, u_color, vertex_buffer) = match program {
            Some(program) => {
                let u_transform = gl.uniform_location(program, &scene.transform_uniform);
                let u_color = gl.uniform_location(program, &scene.color_uniform);
                let vertex_buffer = match gl.create_vertex_buffer(&scene.vertices) {
                    Ok(buffer) => Some(buffer),
                    Err(err) => {
                        log::error!("failed to upload vertex buffer: {err}");
                        None
                    }
                };
                (u_transform, u_color, vertex_buffer)
            }
            None => (None, None, None),
        };

        Self {
            program,
            u_transform,
            u_color,
            vertex_buffer,
            vertex_count: scene.vertex_count(),
        }
    }

    /// ### English
    /// Whether the program linked successfully.
    ///
    /// ### 中文
    /// 程序是否链接成功。
    pub fn is_valid(&self) -> bool {
        self.program.is_some()
    }

    /// ### English
    /// Draws one frame: clear and viewport/scissor always; program bind, uniforms and the
    /// draw call only when the program is valid.
    ///
    /// ### 中文
    /// 绘制一帧：清屏与 viewport/scissor 总是执行；
    /// 程序绑定、uniform 上传与绘制调用仅在程序有效时执行。
    pub fn draw(&self, gl: &G, scene: &SceneSpec, size: PhysicalSize<u32>) {
        gl.clear(scene.clear_color);
        gl.viewport(size);
        gl.scissor(size);

        let (Some(program), Some(buffer)) = (self.program, self.vertex_buffer) else {
            return;
        };

        gl.use_program(program);
        if let Some(location) = &self.u_transform {
            gl.set_uniform_matrix(location, &scene.transform);
        }
        if let Some(location) = &self.u_color {
            gl.set_uniform_vec4(location, scene.color);
        }
        gl.draw_vertices(buffer, ATTRIB_POSITION, scene.mode, self.vertex_count);
        gl.flush();
    }

    /// ### English
    /// Deletes the GL objects this pipeline owns. Must run while the owning context is
    /// still current.
    ///
    /// ### 中文
    /// 删除本管线持有的 GL 对象。必须在所属上下文仍为 current 时执行。
    pub fn destroy(self, gl: &G) {
        if let Some(buffer) = self.vertex_buffer {
            gl.delete_buffer(buffer);
        }
        if let Some(program) = self.program {
            gl.delete_program(program);
        }
    }
}

/// ### English
/// Compiles one shader stage. A compile failure logs the full source and diagnostic text
/// but still returns the object, so the link step observes the failure.
///
/// ### 中文
/// 编译一个着色器阶段。编译失败会记录完整源码与诊断文本，
/// 但仍返回对象，让链接阶段观察到该失败。
fn compile_stage<G: GlApi>(gl: &G, stage: ShaderStage, source: &str) -> Option<G::Shader> {
    let shader = match gl.create_shader(stage) {
        Ok(shader) => shader,
        Err(err) => {
            log::error!("failed to create {} shader object: {err}", stage.name());
            return None;
        }
    };

    if !gl.compile_shader(shader, source) {
        log::error!(
            "compiling {} shader failed:\n{}\n{}",
            stage.name(),
            source,
            gl.shader_info_log(shader)
        );
    }
    Some(shader)
}

/// ### English
/// Attaches both stages, binds the fixed attribute location, links, and checks status.
/// On link failure the shaders are detached and deleted, the program is deleted, and `None`
/// (the invalid sentinel) is returned.
///
/// ### 中文
/// 附加两个阶段、绑定固定属性位置、链接并检查状态。
/// 链接失败时分离并删除着色器、删除程序，返回 `None`（失效哨兵）。
fn link_program<G: GlApi>(gl: &G, scene: &SceneSpec) -> Option<G::Program> {
    let vertex = compile_stage(gl, ShaderStage::Vertex, &scene.vertex_shader);
    let fragment = compile_stage(gl, ShaderStage::Fragment, &scene.fragment_shader);

    let program = match gl.create_program() {
        Ok(program) => program,
        Err(err) => {
            log::error!("failed to create program object: {err}");
            if let Some(shader) = vertex {
                gl.delete_shader(shader);
            }
            if let Some(shader) = fragment {
                gl.delete_shader(shader);
            }
            return None;
        }
    };

    if let Some(shader) = vertex {
        gl.attach_shader(program, shader);
    }
    if let Some(shader) = fragment {
        gl.attach_shader(program, shader);
    }
    gl.bind_attrib_location(program, ATTRIB_POSITION, &scene.attrib_name);

    let linked = gl.link_program(program);
    if !linked {
        log::error!("program link failed:\n{}", gl.program_info_log(program));
    }

    // Shader objects are no longer needed once link status is known.
    for shader in [vertex, fragment].into_iter().flatten() {
        gl.detach_shader(program, shader);
        gl.delete_shader(shader);
    }

    if linked {
        Some(program)
    } else {
        gl.delete_program(program);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::{MockEvent, MockFailures, MockGl};

    fn scene() -> SceneSpec {
        SceneSpec::default()
    }

    #[test]
    fn successful_build_resolves_uniforms_and_uploads_vertices() {
        let gl = MockGl::new();
        let journal = gl.journal();

        let pipeline = Pipeline::build(&gl, &scene());
        assert!(pipeline.is_valid());

        let events = journal.snapshot();
        assert!(events.contains(&MockEvent::LinkProgram));
        assert!(events.contains(&MockEvent::UniformLocation("u_transform".to_string())));
        assert!(events.contains(&MockEvent::UniformLocation("u_color".to_string())));
        assert!(events.contains(&MockEvent::CreateVertexBuffer { floats: 12 }));
    }

    #[test]
    fn draw_binds_program_before_issuing_the_draw_call() {
        let gl = MockGl::new();
        let journal = gl.journal();

        let pipeline = Pipeline::build(&gl, &scene());
        pipeline.draw(&gl, &scene(), dpi::PhysicalSize::new(320, 240));

        let events = journal.snapshot();
        let use_program = events
            .iter()
            .position(|e| *e == MockEvent::UseProgram)
            .expect("program must be bound");
        let draw = events
            .iter()
            .position(|e| matches!(e, MockEvent::DrawVertices { .. }))
            .expect("draw must be issued");
        assert!(use_program < draw);
        assert!(events.contains(&MockEvent::DrawVertices { count: 4 }));
    }

    #[test]
    fn link_failure_resets_program_to_invalid_sentinel() {
        let gl = MockGl::with_failures(MockFailures {
            link_program: true,
            ..MockFailures::default()
        });
        let journal = gl.journal();

        let pipeline = Pipeline::build(&gl, &scene());
        assert!(!pipeline.is_valid());

        let events = journal.snapshot();
        assert!(events.contains(&MockEvent::DeleteProgram));
        assert!(!events.iter().any(|e| matches!(e, MockEvent::CreateVertexBuffer { .. })));
    }

    #[test]
    fn draw_with_invalid_program_is_clear_only() {
        let gl = MockGl::with_failures(MockFailures {
            link_program: true,
            ..MockFailures::default()
        });
        let journal = gl.journal();

        let pipeline = Pipeline::build(&gl, &scene());
        pipeline.draw(&gl, &scene(), dpi::PhysicalSize::new(320, 240));

        let events = journal.snapshot();
        assert!(events.contains(&MockEvent::Clear));
        assert!(events.contains(&MockEvent::Viewport {
            width: 320,
            height: 240
        }));
        assert!(!events.contains(&MockEvent::UseProgram));
        assert!(!events.iter().any(|e| matches!(e, MockEvent::DrawVertices { .. })));
    }

    #[test]
    fn compile_failure_is_not_fatal_and_still_reaches_link() {
        let gl = MockGl::with_failures(MockFailures {
            compile_vertex: true,
            link_program: true,
            ..MockFailures::default()
        });
        let journal = gl.journal();

        let pipeline = Pipeline::build(&gl, &scene());
        assert!(!pipeline.is_valid());

        // Link is still attempted after the compile failure; only its status invalidates.
        assert!(journal.snapshot().contains(&MockEvent::LinkProgram));
    }
}
