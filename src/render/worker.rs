//! Background render worker
//!
//! One thread serves every window. Each window has a single pending slot:
//! submitting replaces whatever was queued, and a conversion that finishes
//! after a newer job arrived for the same window is thrown away. Jobs wait
//! out the debounce delay before they start.
//!
//! ```text
//! submit(rev 3) ─┐ debounce   submit(rev 4) replaces rev 3 in the slot
//!                └──────────► convert(rev 4) ─► sink(RenderResult)
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use super::pipeline::{render_html, RenderOutput};
use super::RenderJob;
use crate::markdown::Converter;
use crate::model::WindowId;

/// A finished conversion for the newest revision of a window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    pub window: WindowId,
    pub revision: u64,
    pub output: RenderOutput,
}

struct Pending {
    job: RenderJob,
    ready_at: Instant,
}

#[derive(Default)]
struct Queue {
    pending: HashMap<WindowId, Pending>,
    /// Newest submitted revision per window
    latest: HashMap<WindowId, u64>,
    shutdown: bool,
}

struct Shared {
    queue: Mutex<Queue>,
    wake: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Queue> {
        match self.queue.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

pub struct RenderWorker {
    shared: Arc<Shared>,
    debounce: Duration,
    handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for RenderWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderWorker")
            .field("debounce", &self.debounce)
            .field("pending", &self.shared.lock().pending.len())
            .finish()
    }
}

impl RenderWorker {
    /// Start the worker thread; every accepted result goes to `sink`
    pub fn spawn(
        converter: Arc<dyn Converter>,
        debounce: Duration,
        sink: impl Fn(RenderResult) + Send + 'static,
    ) -> std::io::Result<Self> {
        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue::default()),
            wake: Condvar::new(),
        });

        let thread_shared = Arc::clone(&shared);
        let handle = std::thread::Builder::new()
            .name("markmoji-render".into())
            .spawn(move || run(&thread_shared, converter.as_ref(), &sink))?;

        tracing::debug!("Render worker started (debounce {:?})", debounce);
        Ok(Self {
            shared,
            debounce,
            handle: Some(handle),
        })
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Queue a job, superseding anything queued or running for its window
    pub fn submit(&self, job: RenderJob) {
        let mut queue = self.shared.lock();
        queue.latest.insert(job.window, job.revision);
        let window = job.window;
        let revision = job.revision;
        let replaced = queue.pending.insert(
            window,
            Pending {
                job,
                ready_at: Instant::now() + self.debounce,
            },
        );
        if let Some(old) = replaced {
            tracing::trace!(
                "Render of {:?} rev {} superseded by rev {}",
                window,
                old.job.revision,
                revision
            );
        }
        self.shared.wake.notify_all();
    }

    /// Forget a window: drop its queued job and any result still running
    pub fn cancel(&self, window: WindowId) {
        let mut queue = self.shared.lock();
        queue.pending.remove(&window);
        queue.latest.remove(&window);
        self.shared.wake.notify_all();
    }

    /// Jobs waiting to start
    pub fn pending(&self) -> usize {
        self.shared.lock().pending.len()
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        self.shared.lock().shutdown = true;
        self.shared.wake.notify_all();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("Render worker thread panicked");
            }
        }
    }
}

fn run(shared: &Shared, converter: &dyn Converter, sink: &dyn Fn(RenderResult)) {
    while let Some(job) = next_job(shared) {
        let output = render_html(converter, &job.source);

        let current = shared.lock().latest.get(&job.window).copied();
        if current != Some(job.revision) {
            tracing::debug!(
                "Discarding render of {:?} rev {} (newest is {:?})",
                job.window,
                job.revision,
                current
            );
            continue;
        }

        tracing::debug!(
            "Rendered {:?} rev {} in {:?}",
            job.window,
            job.revision,
            output.elapsed
        );
        sink(RenderResult {
            window: job.window,
            revision: job.revision,
            output,
        });
    }
    tracing::debug!("Render worker stopped");
}

/// Block until a job's debounce has elapsed, or return None on shutdown
fn next_job(shared: &Shared) -> Option<RenderJob> {
    let mut queue = shared.lock();
    loop {
        if queue.shutdown {
            return None;
        }

        let now = Instant::now();
        let earliest = queue
            .pending
            .iter()
            .min_by_key(|(_, pending)| pending.ready_at)
            .map(|(window, pending)| (*window, pending.ready_at));

        queue = match earliest {
            Some((window, ready_at)) if ready_at <= now => {
                return queue.pending.remove(&window).map(|pending| pending.job);
            }
            Some((_, ready_at)) => match shared.wake.wait_timeout(queue, ready_at - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            },
            None => match shared.wake.wait(queue) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            },
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::{ConvertError, MarkmojiConverter};
    use std::sync::mpsc;

    fn job(window: u64, revision: u64, source: &str) -> RenderJob {
        RenderJob {
            window: WindowId(window),
            revision,
            source: source.to_string(),
        }
    }

    /// Blocks on sources starting with "slow" until released
    struct Gate {
        started: Mutex<mpsc::Sender<()>>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl Converter for Gate {
        fn convert(&self, source: &str) -> Result<String, ConvertError> {
            if source.starts_with("slow") {
                let _ = self.started.lock().unwrap().send(());
                let _ = self.release.lock().unwrap().recv();
            }
            Ok(format!("<p>{}</p>", source))
        }
    }

    #[test]
    fn test_result_reaches_sink() {
        let (tx, rx) = mpsc::channel();
        let worker = RenderWorker::spawn(
            Arc::new(MarkmojiConverter::new()),
            Duration::ZERO,
            move |result| {
                let _ = tx.send(result);
            },
        )
        .unwrap();

        worker.submit(job(1, 1, "# Hi"));
        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(result.window, WindowId(1));
        assert_eq!(result.revision, 1);
        assert!(result.output.html.contains("<h1>Hi</h1>"));
    }

    #[test]
    fn test_queued_job_is_replaced() {
        let (tx, rx) = mpsc::channel();
        let worker = RenderWorker::spawn(
            Arc::new(MarkmojiConverter::new()),
            Duration::from_millis(200),
            move |result| {
                let _ = tx.send(result);
            },
        )
        .unwrap();

        worker.submit(job(1, 1, "one"));
        worker.submit(job(1, 2, "two"));
        assert_eq!(worker.pending(), 1);

        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(result.revision, 2);
        assert!(rx.recv_timeout(Duration::from_millis(400)).is_err());
    }

    #[test]
    fn test_superseded_running_job_is_dropped() {
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let gate = Gate {
            started: Mutex::new(started_tx),
            release: Mutex::new(release_rx),
        };
        let (tx, rx) = mpsc::channel();
        let worker = RenderWorker::spawn(Arc::new(gate), Duration::ZERO, move |result| {
            let _ = tx.send(result);
        })
        .unwrap();

        worker.submit(job(7, 1, "slow first"));
        started_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        worker.submit(job(7, 2, "fast second"));
        release_tx.send(()).unwrap();

        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(result.revision, 2);
        assert_eq!(result.output.html, "<p>fast second</p>");
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[test]
    fn test_windows_do_not_supersede_each_other() {
        let (tx, rx) = mpsc::channel();
        let worker = RenderWorker::spawn(
            Arc::new(MarkmojiConverter::new()),
            Duration::from_millis(20),
            move |result| {
                let _ = tx.send(result);
            },
        )
        .unwrap();

        worker.submit(job(1, 1, "a"));
        worker.submit(job(2, 1, "b"));
        let mut windows = vec![
            rx.recv_timeout(Duration::from_secs(5)).unwrap().window,
            rx.recv_timeout(Duration::from_secs(5)).unwrap().window,
        ];
        windows.sort_by_key(|w| w.0);
        assert_eq!(windows, vec![WindowId(1), WindowId(2)]);
    }

    #[test]
    fn test_cancel_drops_queued_job() {
        let (tx, rx) = mpsc::channel();
        let worker = RenderWorker::spawn(
            Arc::new(MarkmojiConverter::new()),
            Duration::from_millis(100),
            move |result| {
                let _ = tx.send(result);
            },
        )
        .unwrap();

        worker.submit(job(3, 1, "gone"));
        worker.cancel(WindowId(3));
        assert_eq!(worker.pending(), 0);
        assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
    }

    #[test]
    fn test_drop_joins_thread() {
        let worker = RenderWorker::spawn(
            Arc::new(MarkmojiConverter::new()),
            Duration::from_secs(60),
            |_| {},
        )
        .unwrap();
        worker.submit(job(1, 1, "never"));
        drop(worker);
    }
}
