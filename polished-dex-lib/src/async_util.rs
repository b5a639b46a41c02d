//! Driving the pipeline future while a frontend consumes its events.

use std::future::Future;

use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

/// Upper bound on draining leftover events once the task has finished.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// A channel receiver events can be pulled from; implemented for both
/// bounded and unbounded `mpsc` receivers.
#[allow(async_fn_in_trait)]
pub trait EventSource<E> {
    /// Next event, or `None` once every sender is gone.
    async fn next_event(&mut self) -> Option<E>;
}

impl<E> EventSource<E> for mpsc::Receiver<E> {
    async fn next_event(&mut self) -> Option<E> {
        self.recv().await
    }
}

impl<E> EventSource<E> for mpsc::UnboundedReceiver<E> {
    async fn next_event(&mut self) -> Option<E> {
        self.recv().await
    }
}

/// Run `task` to completion, handing each event from `events` to
/// `on_event` as it arrives, and return the task's output.
///
/// Events still queued when the task finishes are delivered before
/// returning, for at most [`DRAIN_TIMEOUT`].
pub async fn run_with_events<F, E, R, Rx>(task: F, mut events: Rx, mut on_event: impl FnMut(E)) -> R
where
    F: Future<Output = R>,
    Rx: EventSource<E> + Unpin,
{
    tokio::pin!(task);
    let mut delivered: u64 = 0;

    let output = loop {
        tokio::select! {
            out = &mut task => break Some(out),
            event = events.next_event() => match event {
                Some(e) => {
                    delivered += 1;
                    on_event(e);
                }
                None => {
                    log::debug!("event channel closed after {delivered} events; awaiting task");
                    break None;
                }
            },
        }
    };

    let Some(output) = output else {
        return task.await;
    };

    let deadline = Instant::now() + DRAIN_TIMEOUT;
    loop {
        match tokio::time::timeout_at(deadline, events.next_event()).await {
            Ok(Some(e)) => {
                delivered += 1;
                on_event(e);
            }
            Ok(None) => break,
            Err(_) => {
                log::warn!(
                    "stopped draining events after {}s ({delivered} delivered)",
                    DRAIN_TIMEOUT.as_secs()
                );
                break;
            }
        }
    }
    log::debug!("task finished; {delivered} events delivered");
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_sent_before_completion_are_delivered() {
        let (tx, rx) = mpsc::unbounded_channel::<u32>();
        let task = async move {
            for i in 0..5 {
                tx.send(i).unwrap();
            }
            "done"
        };
        let mut seen = Vec::new();
        let out = run_with_events(task, rx, |e| seen.push(e)).await;
        assert_eq!(out, "done");
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn closed_channel_still_awaits_task() {
        let (tx, rx) = mpsc::channel::<u32>(4);
        drop(tx);
        let task = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            7
        };
        let out = run_with_events(task, rx, |_| {}).await;
        assert_eq!(out, 7);
    }
}
