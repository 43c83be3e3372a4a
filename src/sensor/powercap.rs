//! Linux powercap (intel-rapl) sysfs backend.
//!
//! Reads the kernel's RAPL counters through
//! `/sys/class/powercap/intel-rapl:N/energy_uj` (one zone per package,
//! i.e. per socket) and the `intel-rapl:N:M` subzone named `dram` when the
//! platform exposes one. Requires a kernel with the `intel_rapl` powercap
//! driver; the counter files are often root-readable only.
//!
//! Discovery happens once, in the constructor. After that, reads never
//! fail: a counter that is missing or unreadable at read time yields the
//! `-1` sentinel and the sentinel-aware delta logic downstream decides
//! what to do with it.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use super::{EnergySensor, Snapshot, SENTINEL};
use crate::error::Result;

/// Default powercap mount point.
pub const DEFAULT_ROOT: &str = "/sys/class/powercap";

/// RAPL sensor backed by the Linux powercap sysfs tree.
pub struct PowercapSensor {
    sockets: Vec<SocketZone>,
}

/// Counter files for one socket: the package zone, plus the dram subzone
/// when the platform has one.
struct SocketZone {
    package: PathBuf,
    dram: Option<PathBuf>,
}

impl PowercapSensor {
    /// Discover RAPL zones under [`DEFAULT_ROOT`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Sensor`] when no package zone is found
    /// (driver not loaded, non-Intel/AMD hardware, or not Linux).
    pub fn new() -> Result<Self> {
        Self::with_root(DEFAULT_ROOT)
    }

    /// Discover RAPL zones under an explicit powercap root.
    ///
    /// Exists so tests can point the sensor at a synthetic tree; production
    /// callers want [`PowercapSensor::new`].
    pub fn with_root(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let mut sockets = Vec::new();

        for n in 0.. {
            let zone = root.join(format!("intel-rapl:{}", n));
            if !zone.is_dir() {
                break;
            }
            if !zone_name(&zone).is_some_and(|name| name.starts_with("package")) {
                // psys and other non-package top-level zones are not sockets
                continue;
            }
            let dram = find_dram_subzone(&zone, n);
            debug!(
                "powercap socket {}: package zone {:?}, dram {}",
                n,
                zone,
                if dram.is_some() { "present" } else { "absent" }
            );
            sockets.push(SocketZone {
                package: zone.join("energy_uj"),
                dram: dram.map(|d| d.join("energy_uj")),
            });
        }

        if sockets.is_empty() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no intel-rapl package zone under {}", root.display()),
            )
            .into());
        }
        debug!("powercap discovery complete: {} socket(s)", sockets.len());
        Ok(Self { sockets })
    }
}

impl EnergySensor for PowercapSensor {
    fn read(&self) -> Snapshot {
        let mut out = Vec::with_capacity(self.sockets.len() * 2);
        for socket in &self.sockets {
            out.push(read_counter(&socket.package));
            out.push(socket.dram.as_deref().map_or(SENTINEL, read_counter));
        }
        out
    }

    fn socket_count(&self) -> usize {
        self.sockets.len()
    }
}

/// Read a zone's `name` file, trimmed.
fn zone_name(zone: &Path) -> Option<String> {
    fs::read_to_string(zone.join("name"))
        .ok()
        .map(|s| s.trim().to_string())
}

/// Scan `intel-rapl:N:M` subzones for one named `dram`.
fn find_dram_subzone(zone: &Path, n: usize) -> Option<PathBuf> {
    for m in 0.. {
        let sub = zone.join(format!("intel-rapl:{}:{}", n, m));
        if !sub.is_dir() {
            return None;
        }
        if zone_name(&sub).as_deref() == Some("dram") {
            return Some(sub);
        }
    }
    None
}

/// Read one `energy_uj` counter; any failure degrades to the sentinel.
fn read_counter(path: &Path) -> i64 {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(SENTINEL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Build a synthetic powercap tree:
    /// one zone per entry, `(name, energy, Option<dram energy>)`.
    fn fake_tree(zones: &[(&str, Option<i64>, Option<i64>)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (n, (name, energy, dram)) in zones.iter().enumerate() {
            let zone = dir.path().join(format!("intel-rapl:{}", n));
            fs::create_dir(&zone).unwrap();
            fs::write(zone.join("name"), name).unwrap();
            if let Some(uj) = energy {
                fs::write(zone.join("energy_uj"), format!("{}\n", uj)).unwrap();
            }
            if let Some(uj) = dram {
                let sub = zone.join(format!("intel-rapl:{}:0", n));
                fs::create_dir(&sub).unwrap();
                fs::write(sub.join("name"), "dram").unwrap();
                fs::write(sub.join("energy_uj"), format!("{}\n", uj)).unwrap();
            }
        }
        dir
    }

    #[test]
    fn discovers_sockets_in_order() {
        let dir = fake_tree(&[
            ("package-0", Some(111), Some(11)),
            ("package-1", Some(222), Some(22)),
        ]);
        let sensor = PowercapSensor::with_root(dir.path()).unwrap();
        assert_eq!(sensor.socket_count(), 2);
        assert_eq!(sensor.read(), vec![111, 11, 222, 22]);
    }

    #[test]
    fn missing_dram_zone_reads_sentinel() {
        let dir = fake_tree(&[("package-0", Some(500), None)]);
        let sensor = PowercapSensor::with_root(dir.path()).unwrap();
        assert_eq!(sensor.read(), vec![500, SENTINEL]);
    }

    #[test]
    fn unreadable_package_counter_reads_sentinel() {
        let dir = fake_tree(&[("package-0", None, Some(42))]);
        let sensor = PowercapSensor::with_root(dir.path()).unwrap();
        assert_eq!(sensor.read(), vec![SENTINEL, 42]);
    }

    #[test]
    fn skips_non_package_zones() {
        let dir = fake_tree(&[("psys", Some(9), None), ("package-1", Some(7), None)]);
        let sensor = PowercapSensor::with_root(dir.path()).unwrap();
        assert_eq!(sensor.socket_count(), 1);
        assert_eq!(sensor.read(), vec![7, SENTINEL]);
    }

    #[test]
    fn empty_root_is_a_discovery_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PowercapSensor::with_root(dir.path()).is_err());
    }
}
