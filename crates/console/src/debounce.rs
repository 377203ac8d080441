use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

/// Coalesces bursts of input (search keystrokes) into one value.
///
/// Each [`Debouncer::settle`] call waits out the delay and yields its value
/// only if no later call arrived in the meantime.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn settle<T>(&self, value: T) -> Option<T> {
        let mine = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        (self.generation.load(Ordering::SeqCst) == mine).then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn only_the_last_keystroke_survives() {
        let debouncer = Debouncer::default();

        let mut typed = Vec::new();
        for text in ["a", "ac", "acm", "acme"] {
            let d = debouncer.clone();
            typed.push(tokio::spawn(async move { d.settle(text).await }));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        let mut settled = Vec::new();
        for t in typed {
            settled.push(t.await.unwrap());
        }
        assert_eq!(settled, vec![None, None, None, Some("acme")]);
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_out_input_all_settles() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        assert_eq!(debouncer.settle(1).await, Some(1));
        assert_eq!(debouncer.settle(2).await, Some(2));
    }
}
