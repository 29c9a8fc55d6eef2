use std::time::{Duration, Instant};

use futures::StreamExt;
use log::warn;

use crate::iptv_probe_error::{info_err, IptvProbeError};
use crate::model::config::ProbeBudget;
use crate::processing::parser::hls::{resolve_segment_url, segment_entries};
use crate::utils::step_measure::format_duration;
use crate::utils::trace_if_enabled;

/// KB/s, zero when nothing measurable happened.
pub fn compute_throughput(total_bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let bytes = total_bytes as f64;
    bytes / (secs * 1024.0)
}

async fn fetch_manifest(client: &reqwest::Client, url: &str, timeout: Duration) -> Result<String, IptvProbeError> {
    let response = client.get(url).timeout(timeout).send().await
        .map_err(|err| info_err!("Request failed {url}: {err}"))?;
    if !response.status().is_success() {
        return Err(info_err!("Failed to download manifest {url}, status: {}", response.status()));
    }
    response.text().await.map_err(|err| info_err!("Failed to read manifest {url}: {err}"))
}

/// Received body size of a segment. The status is not checked, every byte the server sends counts.
async fn fetch_segment(client: &reqwest::Client, url: &str, timeout: Duration) -> Result<u64, IptvProbeError> {
    let response = client.get(url).timeout(timeout).send().await
        .map_err(|err| info_err!("Segment request failed {url}: {err}"))?;
    let mut size = 0u64;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(bytes) => size += bytes.len() as u64,
            Err(err) => return Err(info_err!("Failed to read segment {url}: {err}")),
        }
    }
    trace_if_enabled!("Segment {} has {} bytes", url, size);
    Ok(size)
}

/// Downloads all segments of the manifest one after another.
/// Returns the received bytes and the time spent on segment downloads.
pub async fn download_segments(client: &reqwest::Client, url: &str, budget: &ProbeBudget) -> Result<(u64, Duration), IptvProbeError> {
    let manifest = fetch_manifest(client, url, budget.request_timeout).await?;
    let entries = segment_entries(&manifest);
    if entries.is_empty() {
        return Err(info_err!("No segment found in {url}"));
    }

    let mut total_bytes = 0u64;
    let start_time = Instant::now();
    for entry in entries {
        let elapsed = start_time.elapsed();
        if elapsed > budget.total_budget {
            return Err(info_err!("Download of {url} exceeded {} after {}", format_duration(budget.total_budget), format_duration(elapsed)));
        }
        let segment_url = resolve_segment_url(url, entry);
        total_bytes += fetch_segment(client, &segment_url, budget.segment_timeout).await?;
    }
    Ok((total_bytes, start_time.elapsed()))
}

/// Measures the download speed of a hls stream in KB/s. Every failure yields 0.
pub async fn measure_throughput(client: &reqwest::Client, url: &str, budget: &ProbeBudget) -> f64 {
    match download_segments(client, url, budget).await {
        Ok((_, elapsed)) if elapsed.is_zero() => {
            warn!("Download time of {url} is zero, cant compute speed");
            0.0
        }
        Ok((total_bytes, elapsed)) => compute_throughput(total_bytes, elapsed),
        Err(err) => {
            warn!("{}", err.message);
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use crate::model::config::ProbeBudget;
    use crate::processing::probe::throughput::{compute_throughput, download_segments, measure_throughput};
    use crate::utils::network::request::create_client;
    use crate::utils::network::test_server::serve;

    fn budget(segment_ms: u64, total_ms: u64) -> ProbeBudget {
        ProbeBudget {
            request_timeout: Duration::from_secs(5),
            segment_timeout: Duration::from_millis(segment_ms),
            total_budget: Duration::from_millis(total_ms),
        }
    }

    fn counting_segment(hits: &Arc<AtomicUsize>, delay_ms: u64, size: usize) -> axum::routing::MethodRouter {
        let hits = Arc::clone(hits);
        get(move || {
            let hits = Arc::clone(&hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                if delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                vec![0u8; size]
            }
        })
    }

    #[test]
    fn test_compute_throughput() {
        assert!((compute_throughput(204_800, Duration::from_secs(2)) - 100.0).abs() < 1e-9);
        assert!((compute_throughput(1_536, Duration::from_millis(500)) - 3.0).abs() < 1e-9);
        assert!(compute_throughput(1_000, Duration::ZERO).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_download_segments() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route("/hls/live/index.m3u8", get(|| async { "#EXTM3U\n#EXTINF:10,\nseg1.ts\n#EXTINF:10,\n/hls/seg2.ts\n#EXTINF:10,\nsub/seg3.ts\n" }))
            .route("/hls/live/seg1.ts", counting_segment(&hits, 0, 10_240))
            .route("/hls/seg2.ts", counting_segment(&hits, 0, 20_480))
            .route("/hls/live/sub/seg3.ts", counting_segment(&hits, 0, 1_024));
        let base = serve(router).await;
        let client = create_client().unwrap();

        let url = format!("{base}/hls/live/index.m3u8");
        let (bytes, elapsed) = download_segments(&client, &url, &budget(2_000, 10_000)).await.unwrap();
        assert_eq!(bytes, 31_744);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        let speed = measure_throughput(&client, &url, &budget(2_000, 10_000)).await;
        assert!(speed > 0.0);
        assert!((compute_throughput(bytes, elapsed) - bytes as f64 / (elapsed.as_secs_f64() * 1024.0)).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_manifest_failures() {
        let router = Router::new()
            .route("/missing.m3u8", get(|| async { StatusCode::NOT_FOUND }))
            .route("/empty.m3u8", get(|| async { "#EXTM3U\n#EXT-X-ENDLIST\n" }))
            .route("/broken.m3u8", get(|| async { "#EXTM3U\nhttp://127.0.0.1:9/seg.ts\n" }));
        let base = serve(router).await;
        let client = create_client().unwrap();

        for path in ["/missing.m3u8", "/empty.m3u8", "/broken.m3u8", "/unknown.m3u8"] {
            let speed = measure_throughput(&client, &format!("{base}{path}"), &budget(2_000, 10_000)).await;
            assert!(speed.abs() < f64::EPSILON, "{path} should fail");
        }
    }

    #[tokio::test]
    async fn test_segment_timeout_aborts() {
        let slow = Arc::new(AtomicUsize::new(0));
        let next = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route("/index.m3u8", get(|| async { "slow.ts\nnext.ts\n" }))
            .route("/slow.ts", counting_segment(&slow, 2_000, 1_024))
            .route("/next.ts", counting_segment(&next, 0, 1_024));
        let base = serve(router).await;
        let client = create_client().unwrap();

        let speed = measure_throughput(&client, &format!("{base}/index.m3u8"), &budget(200, 10_000)).await;
        assert!(speed.abs() < f64::EPSILON);
        assert_eq!(slow.load(Ordering::SeqCst), 1);
        assert_eq!(next.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_total_budget_aborts() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route("/index.m3u8", get(|| async { "a.ts\nb.ts\nc.ts\nd.ts\n" }))
            .route("/a.ts", counting_segment(&hits, 250, 4_096))
            .route("/b.ts", counting_segment(&hits, 250, 4_096))
            .route("/c.ts", counting_segment(&hits, 250, 4_096))
            .route("/d.ts", counting_segment(&hits, 250, 4_096));
        let base = serve(router).await;
        let client = create_client().unwrap();

        let speed = measure_throughput(&client, &format!("{base}/index.m3u8"), &budget(2_000, 400)).await;
        assert!(speed.abs() < f64::EPSILON);
        // a.ts starts at 0 ms, b.ts at ~250 ms, the check before c.ts sees ~500 ms
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
