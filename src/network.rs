//! Network byte counters and the speed sampler
//!
//! Counters are read once per sampling tick and turned into KB/s rates.
//! A counter that goes backwards (interface reset, interface removed)
//! produces a zero rate for that tick instead of a negative one.

use anyhow::Result;
use std::collections::HashMap;
use sysinfo::Networks;
use tracing::{debug, warn};

use crate::constants::sampling::{BYTES_PER_KB, LOOPBACK_INTERFACE, MB_LABEL_THRESHOLD_KBPS};

/// Cumulative interface totals at one sampling tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ByteCounterSample {
    pub bytes_received: u64,
    pub bytes_sent: u64,
}

impl ByteCounterSample {
    pub const fn new(bytes_received: u64, bytes_sent: u64) -> Self {
        Self { bytes_received, bytes_sent }
    }
}

/// Instantaneous transfer rates in KB/s, never negative
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpeedReading {
    pub download_kbps: f64,
    pub upload_kbps: f64,
}

impl SpeedReading {
    pub const ZERO: Self = Self { download_kbps: 0.0, upload_kbps: 0.0 };
}

/// Rate between two samples taken `period_secs` apart
pub fn sample(previous: ByteCounterSample, current: ByteCounterSample, period_secs: f64) -> SpeedReading {
    if !(period_secs.is_finite() && period_secs > 0.0) {
        return SpeedReading::ZERO;
    }

    SpeedReading {
        download_kbps: rate(previous.bytes_received, current.bytes_received, period_secs),
        upload_kbps: rate(previous.bytes_sent, current.bytes_sent, period_secs),
    }
}

fn rate(previous: u64, current: u64, period_secs: f64) -> f64 {
    let delta = current as f64 - previous as f64;
    (delta / BYTES_PER_KB / period_secs).max(0.0)
}

/// Label text for a rate: one decimal, KB/s up to 1024 then MB/s
pub fn format_speed(kbps: f64) -> String {
    if kbps > MB_LABEL_THRESHOLD_KBPS {
        format!("{:.1} MB/s", kbps / BYTES_PER_KB)
    } else {
        format!("{:.1} KB/s", kbps)
    }
}

/// Label text for a bar fill ratio (truncated, like the bar itself)
pub fn format_percent(ratio: f32) -> String {
    format!("{}%", (ratio * 100.0) as i32)
}

/// Source of cumulative byte counters
pub trait CounterSource {
    fn read_counters(&mut self) -> Result<ByteCounterSample>;
}

/// Cumulative per-interface totals as reported by the OS
pub trait InterfaceSource {
    fn interfaces(&mut self) -> Result<Vec<(String, ByteCounterSample)>>;
}

/// sysinfo-backed interface list, re-enumerated on every read
pub struct SysinfoInterfaces {
    networks: Networks,
}

impl SysinfoInterfaces {
    pub fn new() -> Self {
        Self { networks: Networks::new_with_refreshed_list() }
    }
}

impl InterfaceSource for SysinfoInterfaces {
    fn interfaces(&mut self) -> Result<Vec<(String, ByteCounterSample)>> {
        // refresh() alone only updates interfaces seen at construction
        self.networks.refresh_list();
        self.networks.refresh();

        Ok(self
            .networks
            .iter()
            .map(|(name, data)| {
                (name.clone(), ByteCounterSample::new(data.total_received(), data.total_transmitted()))
            })
            .collect())
    }
}

/// Monotonic totals over every current interface
///
/// Only per-interface deltas are summed. An interface that appears
/// mid-run starts from its own baseline, and one whose counters reset or
/// that disappears contributes nothing for that tick.
pub struct SystemCounters<I: InterfaceSource = SysinfoInterfaces> {
    source: I,
    include_loopback: bool,
    previous: HashMap<String, ByteCounterSample>,
    total: ByteCounterSample,
}

impl SystemCounters {
    pub fn new(include_loopback: bool) -> Self {
        Self::with_source(SysinfoInterfaces::new(), include_loopback)
    }
}

impl<I: InterfaceSource> SystemCounters<I> {
    pub fn with_source(source: I, include_loopback: bool) -> Self {
        Self {
            source,
            include_loopback,
            previous: HashMap::new(),
            total: ByteCounterSample::default(),
        }
    }
}

impl<I: InterfaceSource> CounterSource for SystemCounters<I> {
    fn read_counters(&mut self) -> Result<ByteCounterSample> {
        let interfaces = self.source.interfaces()?;

        let mut current = HashMap::with_capacity(interfaces.len());
        for (name, totals) in interfaces {
            if !self.include_loopback && name == LOOPBACK_INTERFACE {
                continue;
            }
            match self.previous.get(&name) {
                Some(previous) => {
                    let received = totals.bytes_received.saturating_sub(previous.bytes_received);
                    let sent = totals.bytes_sent.saturating_sub(previous.bytes_sent);
                    self.total.bytes_received = self.total.bytes_received.wrapping_add(received);
                    self.total.bytes_sent = self.total.bytes_sent.wrapping_add(sent);
                }
                None => debug!(interface = %name, "New network interface, taking baseline"),
            }
            current.insert(name, totals);
        }
        self.previous = current;

        Ok(self.total)
    }
}

/// Polls a counter source at a fixed period and keeps the previous sample
pub struct SpeedMonitor<S: CounterSource> {
    source: S,
    last: Option<ByteCounterSample>,
    period_secs: f64,
}

impl<S: CounterSource> SpeedMonitor<S> {
    /// Reads the baseline sample immediately so the first poll has a delta
    pub fn new(mut source: S, period_secs: f64) -> Self {
        let last = source
            .read_counters()
            .inspect_err(|e| warn!(error = %e, "Failed to read baseline network counters"))
            .ok();
        Self { source, last, period_secs }
    }

    /// One sampling tick. Read failures yield a zero reading and keep the
    /// previous baseline.
    pub fn poll(&mut self) -> SpeedReading {
        let current = match self.source.read_counters() {
            Ok(current) => current,
            Err(e) => {
                warn!(error = %e, "Failed to read network counters, reporting zero speed");
                return SpeedReading::ZERO;
            }
        };

        let reading = match self.last {
            Some(previous) => sample(previous, current, self.period_secs),
            None => SpeedReading::ZERO,
        };
        self.last = Some(current);

        debug!(download_kbps = reading.download_kbps, upload_kbps = reading.upload_kbps, "Sampled network speed");
        reading
    }
}
