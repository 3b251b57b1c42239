//! ### English
//! End-to-end lifecycle tests for the render worker, driven through the scripted backend.
//!
//! ### 中文
//! 基于脚本化后端的渲染 worker 端到端生命周期测试。

use std::time::Duration;

use egl_render_worker::engine::RenderWorker;
use egl_render_worker::engine::mock::{MockEvent, MockFailures, MockPresentation};
use egl_render_worker::engine::worker::NativeWindowHandle;

const WAIT: Duration = Duration::from_secs(5);

fn window(raw: usize) -> NativeWindowHandle {
    NativeWindowHandle::from_raw(raw)
}

fn position(events: &[MockEvent], needle: &MockEvent) -> Option<usize> {
    events.iter().position(|e| e == needle)
}

#[test]
fn attach_builds_context_pipeline_and_presents() {
    let backend = MockPresentation::new();
    let journal = backend.journal();
    let mut worker = RenderWorker::new(backend);

    worker.start().expect("worker starts");
    worker.post_attach_surface(window(0x51));

    assert!(journal.wait_until(WAIT, |events| events.contains(&MockEvent::Present)));
    let events = journal.snapshot();

    let surface = position(&events, &MockEvent::CreateSurface { window: 0x51 }).unwrap();
    let current = position(&events, &MockEvent::MakeCurrent).unwrap();
    let load_gl = position(&events, &MockEvent::LoadGl).unwrap();
    let link = position(&events, &MockEvent::LinkProgram).unwrap();
    let clear = position(&events, &MockEvent::Clear).unwrap();
    let present = position(&events, &MockEvent::Present).unwrap();

    assert!(surface < current);
    assert!(current < load_gl);
    assert!(load_gl < link);
    assert!(link < clear);
    assert!(clear < present);

    worker.stop();
}

#[test]
fn later_attach_wins_when_posted_before_start() {
    let backend = MockPresentation::new();
    let journal = backend.journal();
    let mut worker = RenderWorker::new(backend);

    // Both commands land in the mailbox before the first loop iteration; only the
    // newest one may ever be observed.
    worker.post_attach_surface(window(1));
    worker.post_attach_surface(window(2));
    worker.start().expect("worker starts");

    assert!(journal.wait_until(WAIT, |events| events.contains(&MockEvent::Present)));
    let events = journal.snapshot();

    assert!(events.contains(&MockEvent::CreateSurface { window: 2 }));
    assert!(!events.contains(&MockEvent::CreateSurface { window: 1 }));

    worker.stop();
}

#[test]
fn attach_failure_rolls_back_and_keeps_the_worker_alive() {
    let backend = MockPresentation::with_failures(MockFailures {
        choose_config: true,
        ..MockFailures::default()
    });
    let journal = backend.journal();
    let mut worker = RenderWorker::new(backend);

    worker.start().expect("worker starts");
    worker.post_attach_surface(window(0x7));

    assert!(journal.wait_until(WAIT, |events| {
        events.contains(&MockEvent::DestroyConnection)
    }));
    let events = journal.snapshot();

    // Rollback stops at the failed step; nothing downstream is attempted.
    assert!(!events.iter().any(|e| matches!(e, MockEvent::CreateSurface { .. })));
    assert!(!events.contains(&MockEvent::Present));

    // The worker is still accepting commands after the failed attach.
    assert!(worker.is_running());
    worker.stop();
    assert!(!worker.is_running());
}

#[test]
fn terminate_without_a_context_touches_no_graphics_state() {
    let backend = MockPresentation::new();
    let journal = backend.journal();
    let mut worker = RenderWorker::new(backend);

    worker.start().expect("worker starts");
    worker.stop();

    assert!(!worker.is_running());
    assert!(journal.is_empty());
}

#[test]
fn stop_tears_down_in_reverse_acquisition_order() {
    let backend = MockPresentation::new();
    let journal = backend.journal();
    let mut worker = RenderWorker::new(backend);

    worker.start().expect("worker starts");
    worker.post_attach_surface(window(0x51));
    assert!(journal.wait_until(WAIT, |events| events.contains(&MockEvent::Present)));

    worker.stop();
    let events = journal.snapshot();

    let clear_current = position(&events, &MockEvent::ClearCurrent).unwrap();
    let context = position(&events, &MockEvent::DestroyContext).unwrap();
    let surface = position(&events, &MockEvent::DestroySurface).unwrap();
    let connection = position(&events, &MockEvent::DestroyConnection).unwrap();
    assert!(clear_current < context);
    assert!(context < surface);
    assert!(surface < connection);

    // Pipeline objects go first, while the context is still current.
    let delete_buffer = position(&events, &MockEvent::DeleteBuffer).unwrap();
    let delete_program = position(&events, &MockEvent::DeleteProgram).unwrap();
    assert!(delete_buffer < clear_current);
    assert!(delete_program < clear_current);

    // Nothing touches the backend once stop has returned.
    let settled = journal.len();
    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(journal.len(), settled);
}

#[test]
fn link_failure_still_presents_cleared_frames() {
    // Scripted GL failures ride on the presentation backend.
    let backend = MockPresentation::with_failures(MockFailures {
        link_program: true,
        ..MockFailures::default()
    });
    let journal = backend.journal();
    let mut worker = RenderWorker::new(backend);

    worker.start().expect("worker starts");
    worker.post_attach_surface(window(0x51));

    assert!(journal.wait_until(WAIT, |events| events.contains(&MockEvent::Present)));
    let events = journal.snapshot();

    assert!(events.contains(&MockEvent::Clear));
    assert!(!events.contains(&MockEvent::UseProgram));
    assert!(!events.iter().any(|e| matches!(e, MockEvent::DrawVertices { .. })));

    worker.stop();
}

#[test]
fn reattach_replaces_the_previous_context() {
    let backend = MockPresentation::new();
    let journal = backend.journal();
    let mut worker = RenderWorker::new(backend);

    worker.start().expect("worker starts");
    worker.post_attach_surface(window(0xA));
    assert!(journal.wait_until(WAIT, |events| events.contains(&MockEvent::Present)));

    worker.post_attach_surface(window(0xB));
    assert!(journal.wait_until(WAIT, |events| {
        events.contains(&MockEvent::CreateSurface { window: 0xB })
    }));
    let events = journal.snapshot();

    // The first context is fully released before the second surface is created.
    let destroyed = position(&events, &MockEvent::DestroyContext).unwrap();
    let second = position(&events, &MockEvent::CreateSurface { window: 0xB }).unwrap();
    assert!(destroyed < second);

    worker.stop();
}

#[test]
fn post_terminate_stops_the_loop_and_later_posts_are_ignored() {
    let backend = MockPresentation::new();
    let journal = backend.journal();
    let mut worker = RenderWorker::new(backend);

    worker.start().expect("worker starts");
    worker.post_attach_surface(window(0x51));
    assert!(journal.wait_until(WAIT, |events| events.contains(&MockEvent::Present)));

    // Terminate through the mailbox alone, without joining.
    worker.post_terminate();
    assert!(journal.wait_until(WAIT, |events| {
        events.contains(&MockEvent::DestroyConnection)
    }));

    // Once terminate has been processed the loop is gone; a later attach is never
    // observed and the backend is never touched again.
    let settled = journal.len();
    worker.post_attach_surface(window(0x99));
    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(journal.len(), settled);
    assert!(!journal
        .snapshot()
        .contains(&MockEvent::CreateSurface { window: 0x99 }));

    worker.stop();
}

#[test]
fn viewport_follows_the_queried_surface_size() {
    let mut backend = MockPresentation::new();
    backend.set_surface_size(dpi::PhysicalSize::new(800, 600));
    let journal = backend.journal();
    let mut worker = RenderWorker::new(backend);

    worker.start().expect("worker starts");
    worker.post_attach_surface(window(0x51));

    assert!(journal.wait_until(WAIT, |events| events.contains(&MockEvent::Present)));
    let events = journal.snapshot();

    assert!(events.contains(&MockEvent::Viewport {
        width: 800,
        height: 600
    }));
    assert!(events.contains(&MockEvent::Scissor {
        width: 800,
        height: 600
    }));

    worker.stop();
}

#[test]
fn present_failure_does_not_stop_the_loop() {
    let backend = MockPresentation::with_failures(MockFailures {
        present: true,
        ..MockFailures::default()
    });
    let journal = backend.journal();
    let mut worker = RenderWorker::new(backend);

    worker.start().expect("worker starts");
    worker.post_attach_surface(window(0x51));

    // More than one present proves the loop survived the first failure.
    assert!(journal.wait_until(WAIT, |events| {
        events.iter().filter(|e| **e == MockEvent::Present).count() >= 2
    }));

    worker.stop();
}
