use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Service-level counters, owned by the server and updated only after a successful run.
#[derive(Debug)]
pub struct ProcessingStats {
    processed_images: AtomicU64,
    started: Instant,
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self {
            processed_images: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    /// Count one finished image; returns the new total.
    pub fn record_success(&self) -> u64 {
        self.processed_images.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn processed_images(&self) -> u64 {
        self.processed_images.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            bongo_cat: CatStats {
                name: "Bongo Cat",
                processed_images: self.processed_images(),
            },
            server: ServerStats {
                uptime_secs: self.started.elapsed().as_secs_f64(),
            },
        }
    }
}

/// JSON body of `GET /bongo-cat/stats`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub bongo_cat: CatStats,
    pub server: ServerStats,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatStats {
    pub name: &'static str,
    pub processed_images: u64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStats {
    pub uptime_secs: f64,
}

#[cfg(test)]
#[path = "../../tests/unit/server/stats.rs"]
mod tests;
