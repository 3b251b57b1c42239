//! ### English
//! GL entry points backed by `glow`, resolved through `eglGetProcAddress`.
//!
//! ### 中文
//! 基于 `glow` 的 GL 入口点，通过 `eglGetProcAddress` 解析。

use std::ffi::c_void;

use dpi::PhysicalSize;
use glow::HasContext as _;
use khronos_egl as egl;

use crate::engine::api::{GlApi, PrimitiveMode, ShaderStage};

/// ### English
/// Concrete GL backend for one current context.
///
/// Loaded after `eglMakeCurrent` so the entry points match the attached context; dropped
/// with the [`ActiveSurface`](crate::engine) state at every teardown boundary.
///
/// ### 中文
/// 单个 current 上下文对应的具体 GL 后端。
///
/// 在 `eglMakeCurrent` 之后加载，保证入口点与已 attach 的上下文匹配；
/// 在每个 teardown 边界随所属状态一起丢弃。
pub struct GlowGl {
    /// ### English
    /// Resolved GL function table.
    ///
    /// ### 中文
    /// 已解析的 GL 函数表。
    gl: glow::Context,
}

impl GlowGl {
    /// ### English
    /// Resolves the GL function table against the current context.
    ///
    /// ### 中文
    /// 针对当前上下文解析 GL 函数表。
    pub(super) fn load(egl: &egl::DynamicInstance<egl::EGL1_4>) -> Self {
        let gl = unsafe {
            glow::Context::from_loader_function(|name| match egl.get_proc_address(name) {
                Some(proc) => proc as *const c_void,
                None => std::ptr::null(),
            })
        };
        Self { gl }
    }
}

impl GlApi for GlowGl {
    type Shader = glow::NativeShader;
    type Program = glow::NativeProgram;
    type Buffer = glow::NativeBuffer;
    type Uniform = glow::NativeUniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        let stage = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe { self.gl.create_shader(stage) }
    }

    fn compile_shader(&self, shader: Self::Shader, source: &str) -> bool {
        unsafe {
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            self.gl.get_shader_compile_status(shader)
        }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.delete_shader(shader) };
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { self.gl.create_program() }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.attach_shader(program, shader) };
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.detach_shader(program, shader) };
    }

    fn bind_attrib_location(&self, program: Self::Program, index: u32, name: &str) {
        unsafe { self.gl.bind_attrib_location(program, index, name) };
    }

    fn link_program(&self, program: Self::Program) -> bool {
        unsafe {
            self.gl.link_program(program);
            self.gl.get_program_link_status(program)
        }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { self.gl.delete_program(program) };
    }

    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::Uniform> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn create_vertex_buffer(&self, data: &[f32]) -> Result<Self::Buffer, String> {
        unsafe {
            let buffer = self.gl.create_buffer()?;
            let bytes =
                std::slice::from_raw_parts(data.as_ptr().cast::<u8>(), std::mem::size_of_val(data));
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl
                .buffer_data_u8_slice(glow::ARRAY_BUFFER, bytes, glow::STATIC_DRAW);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
            Ok(buffer)
        }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { self.gl.delete_buffer(buffer) };
    }

    fn viewport(&self, size: PhysicalSize<u32>) {
        unsafe {
            self.gl
                .viewport(0, 0, size.width as i32, size.height as i32)
        };
    }

    fn scissor(&self, size: PhysicalSize<u32>) {
        unsafe {
            self.gl
                .scissor(0, 0, size.width as i32, size.height as i32)
        };
    }

    fn enable_depth_test(&self) {
        unsafe { self.gl.enable(glow::DEPTH_TEST) };
    }

    fn enable_alpha_blending(&self) {
        unsafe {
            self.gl.enable(glow::BLEND);
            self.gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
        }
    }

    fn clear(&self, color: [f32; 4]) {
        unsafe {
            self.gl.clear_color(color[0], color[1], color[2], color[3]);
            self.gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn use_program(&self, program: Self::Program) {
        unsafe { self.gl.use_program(Some(program)) };
    }

    fn set_uniform_matrix(&self, location: &Self::Uniform, matrix: &[f32; 16]) {
        unsafe {
            self.gl
                .uniform_matrix_4_f32_slice(Some(location), false, matrix)
        };
    }

    fn set_uniform_vec4(&self, location: &Self::Uniform, value: [f32; 4]) {
        unsafe {
            self.gl
                .uniform_4_f32(Some(location), value[0], value[1], value[2], value[3])
        };
    }

    fn draw_vertices(
        &self,
        buffer: Self::Buffer,
        attrib_index: u32,
        mode: PrimitiveMode,
        vertex_count: i32,
    ) {
        let mode = match mode {
            PrimitiveMode::Points => glow::POINTS,
            PrimitiveMode::Triangles => glow::TRIANGLES,
            PrimitiveMode::TriangleStrip => glow::TRIANGLE_STRIP,
        };
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl.enable_vertex_attrib_array(attrib_index);
            self.gl
                .vertex_attrib_pointer_f32(attrib_index, 3, glow::FLOAT, false, 0, 0);
            self.gl.draw_arrays(mode, 0, vertex_count);
            self.gl.disable_vertex_attrib_array(attrib_index);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
    }

    fn flush(&self) {
        unsafe { self.gl.flush() };
    }
}
