use std::sync::atomic::{AtomicBool, Ordering};

/// Render-enable flag shared between the render loop and scene mutations.
///
/// A mutator calls [`pause`](Self::pause), waits for the scene lock, mutates,
/// then calls [`resume`](Self::resume). The Release store in `resume` pairs
/// with the Acquire load in [`is_open`](Self::is_open): a render loop that
/// sees the gate open also sees every scene write made before it reopened.
#[derive(Debug)]
pub struct RenderGate {
    open: AtomicBool,
}

impl RenderGate {
    pub fn new(open: bool) -> Self {
        Self {
            open: AtomicBool::new(open),
        }
    }

    pub fn pause(&self) {
        self.open.store(false, Ordering::Release);
    }

    pub fn resume(&self) {
        self.open.store(true, Ordering::Release);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }
}

impl Default for RenderGate {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use std::sync::Arc;

    #[test]
    fn pause_and_resume() {
        let gate = RenderGate::default();
        assert!(gate.is_open());
        gate.pause();
        assert!(!gate.is_open());
        gate.resume();
        assert!(gate.is_open());
    }

    #[test]
    fn writes_before_resume_are_visible() {
        let gate = Arc::new(RenderGate::new(false));
        let value = Arc::new(AtomicU32::new(0));

        let writer = {
            let gate = Arc::clone(&gate);
            let value = Arc::clone(&value);
            std::thread::spawn(move || {
                value.store(42, Ordering::Relaxed);
                gate.resume();
            })
        };

        while !gate.is_open() {
            std::hint::spin_loop();
        }
        assert_eq!(value.load(Ordering::Relaxed), 42);
        writer.join().unwrap();
    }
}
