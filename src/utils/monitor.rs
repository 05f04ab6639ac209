//! Process resource sampling while a run's workers are in flight.

use crate::domain::model::ResourceUsage;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, System};

/// Minimum spacing between two samples taken as URLs complete.
#[cfg(feature = "cli")]
const SAMPLE_INTERVAL: Duration = Duration::from_millis(250);

#[cfg(feature = "cli")]
struct Sampler {
    system: System,
    pid: Pid,
    last_sample: Option<Instant>,
    usage: ResourceUsage,
}

#[cfg(feature = "cli")]
impl Sampler {
    fn take(&mut self) -> Option<(u64, f32)> {
        self.system.refresh_all();
        let process = self.system.process(self.pid)?;
        let memory_mb = process.memory() / 1024 / 1024;
        let cpu = process.cpu_usage();

        self.last_sample = Some(Instant::now());
        self.usage.samples += 1;
        self.usage.peak_memory_mb = self.usage.peak_memory_mb.max(memory_mb);
        self.usage.peak_cpu_percent = self.usage.peak_cpu_percent.max(cpu);
        Some((memory_mb, cpu))
    }

    fn due(&self) -> bool {
        self.last_sample
            .map_or(true, |at| at.elapsed() >= SAMPLE_INTERVAL)
    }
}

/// Tracks peak memory and CPU of this process over one dispatch.
///
/// A disabled monitor does nothing and reports no usage.
#[derive(Default)]
pub struct RunMonitor {
    #[cfg(feature = "cli")]
    sampler: Option<Sampler>,
}

impl RunMonitor {
    #[cfg(feature = "cli")]
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            return Self::default();
        }

        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => pid,
            Err(e) => {
                tracing::warn!("Process monitoring unavailable: {}", e);
                return Self::default();
            }
        };

        Self {
            sampler: Some(Sampler {
                system: System::new(),
                pid,
                last_sample: None,
                usage: ResourceUsage::default(),
            }),
        }
    }

    // 非CLI建置沒有 sysinfo，永遠停用
    #[cfg(not(feature = "cli"))]
    pub fn new(_enabled: bool) -> Self {
        Self::default()
    }

    #[cfg(feature = "cli")]
    pub fn is_enabled(&self) -> bool {
        self.sampler.is_some()
    }

    #[cfg(not(feature = "cli"))]
    pub fn is_enabled(&self) -> bool {
        false
    }

    /// Samples after a URL finished, at most once per interval.
    #[cfg(feature = "cli")]
    pub fn url_finished(&mut self, completed: usize, total: usize) {
        let Some(sampler) = self.sampler.as_mut().filter(|s| s.due()) else {
            return;
        };
        if let Some((memory_mb, cpu)) = sampler.take() {
            tracing::debug!(
                "📊 {}/{} urls done - Memory: {}MB, CPU: {:.1}%",
                completed,
                total,
                memory_mb,
                cpu
            );
        }
    }

    #[cfg(not(feature = "cli"))]
    pub fn url_finished(&mut self, _completed: usize, _total: usize) {}

    /// Takes a last sample and returns the peaks seen during the run.
    #[cfg(feature = "cli")]
    pub fn finish(self) -> Option<ResourceUsage> {
        let mut sampler = self.sampler?;
        sampler.take();
        let usage = sampler.usage;
        tracing::info!(
            "📊 Peak Memory: {}MB, Peak CPU: {:.1}% ({} samples)",
            usage.peak_memory_mb,
            usage.peak_cpu_percent,
            usage.samples
        );
        Some(usage)
    }

    #[cfg(not(feature = "cli"))]
    pub fn finish(self) -> Option<ResourceUsage> {
        None
    }
}
