// crates/meridian-client/src/poller.rs
//
// Transaction poller: repeatedly checks a tx status source on a fixed
// interval until the transaction completes, the check errors, or an
// injected attempt budget runs out.

use std::time::Duration;

use async_trait::async_trait;

use meridian_core::Error;

/// Anything that can answer "has this transaction completed?".
///
/// `ControlClient` implements this against the gateway's tx status
/// endpoint; tests script a fake sequence.
#[async_trait]
pub trait TxStatusSource: Send + Sync {
    /// Check whether the transaction has completed.
    async fn tx_complete(&self, tx: &str) -> Result<bool, Error>;
}

/// Polling parameters.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Fixed delay between status checks.
    pub interval: Duration,
    /// Maximum number of checks before giving up with `Error::Timeout`.
    /// `None` polls until the daemon answers one way or the other.
    pub max_checks: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_checks: None,
        }
    }
}

/// Wait for a transaction to complete.
///
/// Each tick has three outcomes: the check fails and the error propagates,
/// the transaction is complete and the wait returns `Ok`, or it is still
/// pending and `on_pending` is invoked with the check count before the
/// next tick.
pub async fn wait_for_tx<S, F>(
    source: &S,
    tx: &str,
    config: &PollConfig,
    mut on_pending: F,
) -> Result<(), Error>
where
    S: TxStatusSource + ?Sized,
    F: FnMut(u32),
{
    let mut checks: u32 = 0;

    loop {
        tokio::time::sleep(config.interval).await;
        checks += 1;

        if source.tx_complete(tx).await? {
            return Ok(());
        }

        if let Some(max) = config.max_checks {
            if checks >= max {
                return Err(Error::Timeout(format!(
                    "transaction {} still pending after {} checks",
                    tx, checks
                )));
            }
        }

        on_pending(checks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted status source: pops one outcome per check.
    struct ScriptedSource {
        outcomes: Mutex<VecDeque<Result<bool, Error>>>,
        checks: Mutex<u32>,
    }

    impl ScriptedSource {
        fn new(outcomes: Vec<Result<bool, Error>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                checks: Mutex::new(0),
            }
        }

        fn checks(&self) -> u32 {
            *self.checks.lock().unwrap()
        }
    }

    #[async_trait]
    impl TxStatusSource for ScriptedSource {
        async fn tx_complete(&self, _tx: &str) -> Result<bool, Error> {
            *self.checks.lock().unwrap() += 1;
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .expect("poller checked more often than scripted")
        }
    }

    fn fast_poll(max_checks: Option<u32>) -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(1),
            max_checks,
        }
    }

    #[tokio::test]
    async fn pending_pending_complete_takes_exactly_three_checks() {
        let source = ScriptedSource::new(vec![Ok(false), Ok(false), Ok(true)]);

        wait_for_tx(&source, "0xabc", &fast_poll(None), |_| {})
            .await
            .unwrap();
        assert_eq!(source.checks(), 3);
    }

    #[tokio::test]
    async fn a_check_error_stops_the_poll() {
        let source = ScriptedSource::new(vec![
            Ok(false),
            Err(Error::Transport("connection refused".to_string())),
        ]);

        let err = wait_for_tx(&source, "0xabc", &fast_poll(None), |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(source.checks(), 2);
    }

    #[tokio::test]
    async fn the_pending_callback_sees_each_pending_tick() {
        let source = ScriptedSource::new(vec![Ok(false), Ok(false), Ok(true)]);
        let mut seen = Vec::new();

        wait_for_tx(&source, "0xabc", &fast_poll(None), |n| seen.push(n))
            .await
            .unwrap();
        assert_eq!(seen, vec![1, 2]);
    }

    #[tokio::test]
    async fn the_attempt_budget_bounds_the_loop() {
        let source = ScriptedSource::new(vec![Ok(false), Ok(false), Ok(false)]);

        let err = wait_for_tx(&source, "0xabc", &fast_poll(Some(3)), |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout(_)));
        assert_eq!(source.checks(), 3);
    }

    #[tokio::test]
    async fn completion_on_the_final_budgeted_check_still_succeeds() {
        let source = ScriptedSource::new(vec![Ok(false), Ok(true)]);

        wait_for_tx(&source, "0xabc", &fast_poll(Some(2)), |_| {})
            .await
            .unwrap();
        assert_eq!(source.checks(), 2);
    }
}
