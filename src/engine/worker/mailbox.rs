//! ### English
//! Single-slot, mutex-guarded command mailbox (latest-wins, capacity 1).
//!
//! This is deliberately not a queue: commands posted in rapid succession coalesce, and only
//! the most recent unconsumed command is ever observed by the worker. The worker holds the
//! guard for its whole decide-act-draw iteration, so the controller can only ever observe
//! "empty" or "exactly the command it last posted", never a half-applied transition.
//!
//! ### 中文
//! 单槽位、互斥锁保护的命令邮箱（latest-wins，容量 1）。
//!
//! 这里刻意不用队列：快速连续投递的命令会合并，工作线程只会观察到最近一条未消费命令。
//! 工作线程在整个“取命令-执行-绘制”迭代期间持有锁，
//! 因此控制线程只可能看到“空槽”或“自己最后投递的那条命令”，绝不会看到半完成的切换。

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::command::PendingCommand;

/// ### English
/// Shared single-slot mailbox between the controller and the worker.
///
/// ### 中文
/// 控制线程与工作线程共享的单槽位邮箱。
pub(crate) struct Mailbox {
    /// ### English
    /// The pending-command cell; `None` means no command is in flight.
    ///
    /// ### 中文
    /// 待处理命令槽；`None` 表示没有在途命令。
    slot: Mutex<Option<PendingCommand>>,
}

impl Mailbox {
    pub(crate) fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// ### English
    /// Posts a command, overwriting any unconsumed one.
    ///
    /// Never waits for the worker to consume anything; it can only block briefly while the
    /// worker is mid-iteration holding the guard.
    ///
    /// ### 中文
    /// 投递一条命令，覆盖任何未被消费的旧命令。
    ///
    /// 从不等待工作线程消费；只可能在工作线程持锁迭代期间短暂阻塞。
    pub(crate) fn post(&self, command: PendingCommand) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(superseded) = slot.replace(command) {
            log::debug!("mailbox: superseded unconsumed command {superseded:?}");
        }
    }

    /// ### English
    /// Locks the mailbox for one worker iteration.
    ///
    /// Worker-side only; the returned guard is held across the whole iteration.
    ///
    /// ### 中文
    /// 为工作线程的一次迭代锁定邮箱。
    ///
    /// 仅供工作线程使用；返回的 guard 会在整个迭代期间持有。
    pub(crate) fn lock(&self) -> MailboxGuard<'_> {
        MailboxGuard {
            slot: self.slot.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }
}

/// ### English
/// Exclusive access to the mailbox slot for the duration of one worker iteration.
///
/// ### 中文
/// 在工作线程单次迭代期间对邮箱槽位的独占访问。
pub(crate) struct MailboxGuard<'a> {
    slot: MutexGuard<'a, Option<PendingCommand>>,
}

impl MailboxGuard<'_> {
    /// ### English
    /// Reads the pending command and resets the slot, atomically with the read.
    ///
    /// ### 中文
    /// 读取待处理命令并清空槽位，读取与清空为同一原子操作。
    pub(crate) fn take_and_clear(&mut self) -> Option<PendingCommand> {
        self.slot.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::worker::NativeWindowHandle;

    #[test]
    fn take_on_empty_slot_is_none() {
        let mailbox = Mailbox::new();
        assert_eq!(mailbox.lock().take_and_clear(), None);
    }

    #[test]
    fn take_clears_the_slot() {
        let mailbox = Mailbox::new();
        mailbox.post(PendingCommand::Terminate);

        let mut guard = mailbox.lock();
        assert_eq!(guard.take_and_clear(), Some(PendingCommand::Terminate));
        assert_eq!(guard.take_and_clear(), None);
    }

    #[test]
    fn later_post_overwrites_unconsumed_command() {
        let mailbox = Mailbox::new();
        let first = NativeWindowHandle::from_raw(0x1000);
        let second = NativeWindowHandle::from_raw(0x2000);

        mailbox.post(PendingCommand::AttachSurface(first));
        mailbox.post(PendingCommand::AttachSurface(second));

        assert_eq!(
            mailbox.lock().take_and_clear(),
            Some(PendingCommand::AttachSurface(second))
        );
    }

    #[test]
    fn terminate_supersedes_attach() {
        let mailbox = Mailbox::new();
        mailbox.post(PendingCommand::AttachSurface(NativeWindowHandle::from_raw(
            0x1000,
        )));
        mailbox.post(PendingCommand::Terminate);

        assert_eq!(
            mailbox.lock().take_and_clear(),
            Some(PendingCommand::Terminate)
        );
    }
}
