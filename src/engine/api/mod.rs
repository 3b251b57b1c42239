//! ### English
//! Presentation/GL abstraction seam between the worker and the platform graphics stack.
//!
//! The worker never calls EGL or GL directly; it goes through these traits so the whole
//! lifecycle can be exercised against the scripted in-memory backend in [`crate::engine::mock`].
//!
//! ### 中文
//! 工作线程与平台图形栈之间的呈现/GL 抽象层。
//!
//! 工作线程从不直接调用 EGL 或 GL，而是经由这些 trait，
//! 使整个生命周期都可以用 [`crate::engine::mock`] 中的脚本化内存后端进行验证。

mod gl;
mod present;

pub use gl::{GlApi, PrimitiveMode, ShaderStage};
pub use present::{ConfigRequest, PresentationApi, SetupError};
