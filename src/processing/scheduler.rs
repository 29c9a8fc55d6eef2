use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use log::{error, warn};
use tokio::sync::{mpsc, Semaphore};

use crate::model::playlist::DomainGroup;
use crate::model::probe::ProbeOutcome;

/// Starts one task per group, at most `max_concurrency` probes run at the same time.
/// Every group yields exactly one outcome, a panicking probe reports a failed one.
/// Outcomes arrive on the returned channel in completion order, the channel closes
/// once every task has finished.
pub fn spawn_probes<F, Fut>(groups: Vec<DomainGroup>, max_concurrency: usize, probe: F) -> mpsc::Receiver<ProbeOutcome>
where
    F: Fn(DomainGroup) -> Fut + Send + Sync + 'static,
    Fut: Future<Output=ProbeOutcome> + Send + 'static,
{
    let (tx, rx) = mpsc::channel(groups.len().max(1));
    let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));
    let probe = Arc::new(probe);

    for group in groups {
        let tx = tx.clone();
        let semaphore = Arc::clone(&semaphore);
        let probe = Arc::clone(&probe);
        tokio::spawn(async move {
            let fallback = group.clone();
            let outcome = match semaphore.acquire_owned().await {
                Ok(_permit) => match AssertUnwindSafe(async move { (*probe)(group).await }).catch_unwind().await {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        error!("Probe for {} panicked, counting it as failed", fallback.domain);
                        ProbeOutcome::failed(fallback)
                    }
                },
                Err(err) => {
                    error!("Cant schedule probe for {}: {err}", fallback.domain);
                    ProbeOutcome::failed(fallback)
                }
            };
            if tx.send(outcome).await.is_err() {
                warn!("Probe outcome dropped, collector is gone");
            }
        });
    }
    drop(tx);
    rx
}

/// Drains the channel until every probe task has finished.
pub async fn collect_outcomes(mut rx: mpsc::Receiver<ProbeOutcome>) -> Vec<ProbeOutcome> {
    let mut outcomes = Vec::new();
    while let Some(outcome) = rx.recv().await {
        outcomes.push(outcome);
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use crate::model::playlist::{ChannelLink, DomainGroup};
    use crate::model::probe::{ProbeOutcome, ProbeResult, StreamMetadata};
    use crate::processing::scheduler::{collect_outcomes, spawn_probes};

    fn groups(count: usize) -> Vec<DomainGroup> {
        (0..count).map(|i| {
            let mut group = DomainGroup::new(&format!("10.0.0.{i}"));
            let link = ChannelLink::new("CCTV1", &format!("http://10.0.0.{i}/index.m3u8"));
            group.candidates.push(link.clone());
            group.links.push(link);
            group
        }).collect()
    }

    async fn sleeping_probe(group: DomainGroup, millis: u64) -> ProbeOutcome {
        tokio::time::sleep(Duration::from_millis(millis)).await;
        let selected = group.candidates[0].clone();
        let result = ProbeResult::new(&group.domain, selected, 10.0, StreamMetadata::default());
        ProbeOutcome::probed(group, result)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_limit_timing() {
        let start = Instant::now();
        let outcomes = collect_outcomes(spawn_probes(groups(2), 1, |group| sleeping_probe(group, 200))).await;
        assert_eq!(outcomes.len(), 2);
        assert!(start.elapsed() >= Duration::from_millis(400));

        let start = Instant::now();
        let outcomes = collect_outcomes(spawn_probes(groups(2), 2, |group| sleeping_probe(group, 200))).await;
        assert_eq!(outcomes.len(), 2);
        assert!(start.elapsed() < Duration::from_millis(390));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_never_exceeds_limit() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let probe = {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            move |group: DomainGroup| {
                let running = Arc::clone(&running);
                let peak = Arc::clone(&peak);
                async move {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    let outcome = sleeping_probe(group, 20).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                    outcome
                }
            }
        };
        let mut outcomes = collect_outcomes(spawn_probes(groups(25), 3, probe)).await;
        assert_eq!(outcomes.len(), 25);
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(peak.load(Ordering::SeqCst) >= 1);

        outcomes.sort_by(|a, b| a.group.domain.cmp(&b.group.domain));
        outcomes.dedup_by(|a, b| a.group.domain == b.group.domain);
        assert_eq!(outcomes.len(), 25);
    }

    #[tokio::test]
    async fn test_panicking_task_reports_failure() {
        let probe = |group: DomainGroup| async move {
            assert_ne!(group.domain, "10.0.0.1", "domain blew up");
            sleeping_probe(group, 5).await
        };
        let outcomes = collect_outcomes(spawn_probes(groups(4), 2, probe)).await;
        assert_eq!(outcomes.len(), 4);
        let broken = outcomes.iter().find(|o| o.group.domain == "10.0.0.1").unwrap();
        assert!(!broken.result.as_ref().unwrap().passed);
        assert_eq!(outcomes.iter().filter(|o| o.result.as_ref().is_some_and(|r| r.passed)).count(), 3);
    }

    #[tokio::test]
    async fn test_empty_and_zero_limit() {
        let outcomes = collect_outcomes(spawn_probes(Vec::new(), 4, |group| sleeping_probe(group, 1))).await;
        assert!(outcomes.is_empty());
        let outcomes = collect_outcomes(spawn_probes(groups(3), 0, |group| sleeping_probe(group, 1))).await;
        assert_eq!(outcomes.len(), 3);
    }
}
