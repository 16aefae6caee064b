use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Clones share one sink; a line is written while holding its lock.
#[derive(Clone)]
pub struct ConsoleProgress {
    inner: Arc<Inner>,
}

struct Inner {
    enabled: bool,
    verbose: bool,
    t0: Instant,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleProgress {
    pub fn new(enabled: bool, verbose: bool) -> Self {
        Self::with_sink(enabled, verbose, Box::new(io::stderr()))
    }

    pub fn with_sink(enabled: bool, verbose: bool, sink: Box<dyn Write + Send>) -> Self {
        Self {
            inner: Arc::new(Inner {
                enabled,
                verbose,
                t0: Instant::now(),
                sink: Mutex::new(sink),
            }),
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if !self.inner.enabled {
            return;
        }
        self.write_line(msg.as_ref());
    }

    /// Diagnostic line, only emitted with `--verbose`.
    pub fn debug(&self, msg: impl AsRef<str>) {
        if !self.inner.enabled || !self.inner.verbose {
            return;
        }
        self.write_line(msg.as_ref());
    }

    pub fn progress(&self, label: &str, current: usize, total: usize) {
        if !self.inner.enabled {
            return;
        }
        let total = total.max(1);
        let current = current.min(total);
        let pct = (current as f64 / total as f64) * 100.0;
        self.write_line(&format!("{label} {current}/{total} ({pct:5.1}%)"));
    }

    fn write_line(&self, msg: &str) {
        let ts = fmt_elapsed(self.inner.t0.elapsed().as_secs_f64());
        // A poisoned lock only means another job panicked mid-write; keep logging.
        let mut sink = self
            .inner
            .sink
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let _ = writeln!(sink, "[{ts}] {msg}");
        let _ = sink.flush();
    }
}

fn fmt_elapsed(seconds: f64) -> String {
    let seconds = seconds.max(0.0) as u64;
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    if h > 0 {
        format!("{h:02}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct CapturedLines(Arc<Mutex<Vec<u8>>>);

#[cfg(test)]
impl CapturedLines {
    pub(crate) fn progress(&self, verbose: bool) -> ConsoleProgress {
        ConsoleProgress::with_sink(true, verbose, Box::new(self.clone()))
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        let buf = self.0.lock().expect("captured lines lock");
        String::from_utf8_lossy(&buf)
            .lines()
            .map(|l| l.to_string())
            .collect()
    }
}

#[cfg(test)]
impl Write for CapturedLines {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("captured lines lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::{fmt_elapsed, CapturedLines};

    #[test]
    fn elapsed_switches_to_hours() {
        assert_eq!(fmt_elapsed(65.4), "01:05");
        assert_eq!(fmt_elapsed(3725.0), "01:02:05");
        assert_eq!(fmt_elapsed(-3.0), "00:00");
    }

    #[test]
    fn debug_lines_need_verbose() {
        let quiet = CapturedLines::default();
        quiet.progress(false).debug("hidden");
        assert!(quiet.lines().is_empty());

        let loud = CapturedLines::default();
        loud.progress(true).debug("shown");
        assert_eq!(loud.lines().len(), 1);
        assert!(loud.lines()[0].ends_with("shown"));
    }

    #[test]
    fn concurrent_writers_never_split_lines() {
        let captured = CapturedLines::default();
        let progress = captured.progress(false);
        thread::scope(|s| {
            for worker in 0..8 {
                let progress = progress.clone();
                s.spawn(move || {
                    for i in 0..50 {
                        progress.info(format!("worker-{worker} line-{i} end"));
                    }
                });
            }
        });
        let lines = captured.lines();
        assert_eq!(lines.len(), 400);
        for line in lines {
            assert!(line.starts_with('['), "{line}");
            assert!(line.ends_with(" end"), "{line}");
            assert_eq!(line.matches("worker-").count(), 1, "{line}");
        }
    }
}
