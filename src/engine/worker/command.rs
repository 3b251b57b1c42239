//! ### English
//! Command protocol between the controller thread and the render worker thread.
//!
//! ### 中文
//! 控制线程与渲染工作线程之间的命令协议。

use std::ffi::c_void;

/// ### English
/// Opaque native window handle supplied by the embedder.
///
/// Stored as `usize` so it can cross the thread boundary; the worker hands it back to the
/// presentation backend unchanged and never dereferences it.
///
/// ### 中文
/// 宿主提供的不透明原生 window 句柄。
///
/// 以 `usize` 存储以便跨线程传递；工作线程只会原样交还给呈现后端，从不解引用。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeWindowHandle(usize);

impl NativeWindowHandle {
    /// ### English
    /// Wraps a raw pointer-sized handle value.
    ///
    /// ### 中文
    /// 包装一个指针宽度的原始句柄值。
    pub fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// ### English
    /// Wraps a native window pointer coming through the C ABI.
    ///
    /// ### 中文
    /// 包装经 C ABI 传入的原生 window 指针。
    pub fn from_ptr(ptr: *mut c_void) -> Self {
        Self(ptr as usize)
    }

    /// ### English
    /// Returns the handle as a raw value.
    ///
    /// ### 中文
    /// 以原始值形式返回句柄。
    pub fn as_raw(self) -> usize {
        self.0
    }

    /// ### English
    /// Returns the handle as a pointer for APIs that take one.
    ///
    /// ### 中文
    /// 以指针形式返回句柄，供需要指针的 API 使用。
    pub fn as_ptr(self) -> *mut c_void {
        self.0 as *mut c_void
    }
}

/// ### English
/// Lifecycle commands posted by the controller thread.
///
/// The mailbox holds at most one; a later post overwrites an unconsumed earlier one
/// (latest intent wins).
///
/// ### 中文
/// 控制线程投递的生命周期命令。
///
/// 邮箱最多持有一个命令；后投递的会覆盖未被消费的先前命令（以最新意图为准）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingCommand {
    /// ### English
    /// A native window/surface became available; attach a fresh graphics context to it.
    ///
    /// ### 中文
    /// 有新的原生 window/surface 可用；为其 attach 一个全新的图形上下文。
    AttachSurface(NativeWindowHandle),
    /// ### English
    /// Tear everything down and end the render loop.
    ///
    /// ### 中文
    /// 回收全部资源并结束渲染循环。
    Terminate,
}
