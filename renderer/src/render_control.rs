use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Shared, thread-safe render state: progress counters the driver updates
/// as tiles complete, and a cancellation flag workers poll so a render can
/// be aborted cleanly from another thread (e.g. a UI's cancel button).
///
/// Numeric fields are plain atomics; the two free-form status strings sit
/// behind a mutex since they're written rarely and read for display only.
pub struct RenderControl {
    in_progress: AtomicBool,
    finished: AtomicBool,
    resumed: AtomicBool,
    aborted: AtomicBool,
    total_passes: AtomicUsize,
    current_pass: AtomicUsize,
    current_pass_percent: Mutex<f32>,
    render_info: Mutex<String>,
    aa_noise_info: Mutex<String>,
}

impl Default for RenderControl {
    fn default() -> Self {
        Self {
            in_progress: AtomicBool::new(false),
            finished: AtomicBool::new(false),
            resumed: AtomicBool::new(false),
            aborted: AtomicBool::new(false),
            total_passes: AtomicUsize::new(0),
            current_pass: AtomicUsize::new(0),
            current_pass_percent: Mutex::new(0.0),
            render_info: Mutex::new(String::new()),
            aa_noise_info: Mutex::new(String::new()),
        }
    }
}

impl RenderControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_started(&self) {
        self.in_progress.store(true, Ordering::SeqCst);
        self.finished.store(false, Ordering::SeqCst);
        self.aborted.store(false, Ordering::SeqCst);
    }

    pub fn set_resumed(&self) {
        self.resumed.store(true, Ordering::SeqCst);
    }

    pub fn set_finished(&self) {
        self.in_progress.store(false, Ordering::SeqCst);
        self.finished.store(true, Ordering::SeqCst);
    }

    pub fn set_aborted(&self) {
        self.aborted.store(true, Ordering::SeqCst);
        self.in_progress.store(false, Ordering::SeqCst);
    }

    pub fn set_total_passes(&self, total: usize) {
        self.total_passes.store(total, Ordering::SeqCst);
    }

    pub fn set_current_pass(&self, pass: usize) {
        self.current_pass.store(pass, Ordering::SeqCst);
    }

    pub fn set_current_pass_percent(&self, percent: f32) {
        *self.current_pass_percent.lock().unwrap() = percent;
    }

    pub fn set_render_info(&self, info: impl Into<String>) {
        *self.render_info.lock().unwrap() = info.into();
    }

    pub fn set_aa_noise_info(&self, info: impl Into<String>) {
        *self.aa_noise_info.lock().unwrap() = info.into();
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress.load(Ordering::SeqCst)
    }

    pub fn resumed(&self) -> bool {
        self.resumed.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    /// Workers should check this between samples/tiles and stop promptly
    /// when it flips true.
    pub fn aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }

    pub fn total_passes(&self) -> usize {
        self.total_passes.load(Ordering::SeqCst)
    }

    pub fn current_pass(&self) -> usize {
        self.current_pass.load(Ordering::SeqCst)
    }

    pub fn current_pass_percent(&self) -> f32 {
        *self.current_pass_percent.lock().unwrap()
    }

    pub fn render_info(&self) -> String {
        self.render_info.lock().unwrap().clone()
    }

    pub fn aa_noise_info(&self) -> String {
        self.aa_noise_info.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abort_flips_in_progress_off() {
        let rc = RenderControl::new();
        rc.set_started();
        assert!(rc.in_progress());
        rc.set_aborted();
        assert!(rc.aborted());
        assert!(!rc.in_progress());
    }
}
