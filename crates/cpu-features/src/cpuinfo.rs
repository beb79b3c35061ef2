// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Operating-system view of the processor.
//!
//! Reads CPU state from:
//! - `/proc/cpuinfo`: model name and the feature flags the kernel has
//!   enabled (the kernel may mask features the silicon has, e.g. AVX
//!   when XSAVE is disabled).
//! - `/sys/devices/system/cpu/online`: online core count.
//!
//! This is a diagnostic cross-check for [`crate::CpuCapabilities::detect`];
//! dispatch never depends on it.

use crate::{CpuCapabilities, ProbeError, SimdTier};
use std::collections::BTreeSet;
use std::path::Path;

/// Default procfs path for processor information.
const CPUINFO_PATH: &str = "/proc/cpuinfo";

/// Base sysfs path for CPU topology.
const CPU_BASE: &str = "/sys/devices/system/cpu";

/// Processor information as reported by the operating system.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CpuInfo {
    /// `model name` of the first processor entry, if reported.
    pub model_name: Option<String>,
    /// Feature flags of the first processor entry.
    pub flags: BTreeSet<String>,
    /// Number of online cores.
    pub online_cores: u32,
}

impl CpuInfo {
    /// Reads processor information from procfs and sysfs.
    pub fn read() -> Result<Self, ProbeError> {
        let mut info = Self::read_from(Path::new(CPUINFO_PATH))?;
        info.online_cores = read_online_cores()?;
        Ok(info)
    }

    /// Reads and parses a `cpuinfo`-formatted file.
    pub fn read_from(path: &Path) -> Result<Self, ProbeError> {
        let content = read_proc_file(path)?;
        Self::parse(&content).ok_or_else(|| ProbeError::ParseError {
            path: path.display().to_string(),
            detail: "no processor entry with a flags line".to_string(),
        })
    }

    /// Parses `cpuinfo` text. Only the first processor entry is inspected.
    ///
    /// Returns `None` when no `flags` line is present.
    pub fn parse(content: &str) -> Option<Self> {
        let mut model_name = None;
        let mut flags = None;
        let mut processors = 0u32;

        for line in content.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            match key.trim() {
                "processor" => processors += 1,
                "model name" if model_name.is_none() => {
                    model_name = Some(value.trim().to_string());
                }
                "flags" if flags.is_none() => {
                    flags = Some(
                        value
                            .split_whitespace()
                            .map(str::to_string)
                            .collect::<BTreeSet<_>>(),
                    );
                }
                _ => {}
            }
        }

        Some(Self {
            model_name,
            flags: flags?,
            online_cores: processors.max(1),
        })
    }

    /// Returns `true` if the kernel advertises `flag`.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    /// Capabilities implied by the advertised flags.
    pub fn advertised(&self) -> CpuCapabilities {
        let tiers: Vec<SimdTier> = SimdTier::PRIORITY
            .into_iter()
            .filter(|t| t.cpuinfo_flag().is_some_and(|f| self.has_flag(f)))
            .collect();
        CpuCapabilities::from_tiers(&tiers)
    }

    /// Tiers on which `detected` and the advertised flags disagree.
    pub fn disagreements(&self, detected: &CpuCapabilities) -> Vec<SimdTier> {
        let advertised = self.advertised();
        SimdTier::PRIORITY
            .into_iter()
            .filter(|&t| advertised.supports(t) != detected.supports(t))
            .collect()
    }
}

/// Reads a procfs/sysfs file and returns its trimmed content.
pub(crate) fn read_proc_file(path: &Path) -> Result<String, ProbeError> {
    if !path.exists() {
        return Err(ProbeError::NotAvailable {
            path: path.display().to_string(),
        });
    }
    std::fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .map_err(|e| ProbeError::ReadError {
            path: path.display().to_string(),
            source: e,
        })
}

/// Determines the number of online CPU cores.
///
/// Tries `/sys/devices/system/cpu/online` first (e.g., `"0-3"` → 4 cores),
/// then falls back to `std::thread::available_parallelism()`.
fn read_online_cores() -> Result<u32, ProbeError> {
    let online_path_str = format!("{CPU_BASE}/online");
    if let Ok(content) = read_proc_file(Path::new(&online_path_str)) {
        if let Some(count) = parse_cpu_range(&content) {
            return Ok(count);
        }
    }

    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .map_err(|e| ProbeError::ReadError {
            path: CPU_BASE.to_string(),
            source: e,
        })
}

/// Parses a CPU range string like `"0-3"` → 4, `"0"` → 1, `"0,2-3"` → 3.
fn parse_cpu_range(s: &str) -> Option<u32> {
    let mut total = 0u32;
    for part in s.split(',') {
        let part = part.trim();
        if let Some((start_s, end_s)) = part.split_once('-') {
            let start: u32 = start_s.trim().parse().ok()?;
            let end: u32 = end_s.trim().parse().ok()?;
            total += end.checked_sub(start)? + 1;
        } else {
            let _: u32 = part.parse().ok()?;
            total += 1;
        }
    }
    (total > 0).then_some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
processor\t: 0
vendor_id\t: GenuineIntel
model name\t: Intel(R) Core(TM) i7-8550U CPU @ 1.80GHz
flags\t\t: fpu vme sse sse2 ht pni ssse3 sse4_1 sse4_2 avx avx2 fma

processor\t: 1
model name\t: Intel(R) Core(TM) i7-8550U CPU @ 1.80GHz
flags\t\t: fpu vme sse sse2 ht pni ssse3 sse4_1 sse4_2 avx avx2 fma
";

    #[test]
    fn test_parse_sample() {
        let info = CpuInfo::parse(SAMPLE).unwrap();
        assert_eq!(
            info.model_name.as_deref(),
            Some("Intel(R) Core(TM) i7-8550U CPU @ 1.80GHz")
        );
        assert_eq!(info.online_cores, 2);
        assert!(info.has_flag("sse4_1"));
        assert!(!info.has_flag("avx512f"));
    }

    #[test]
    fn test_advertised_tiers() {
        let info = CpuInfo::parse(SAMPLE).unwrap();
        let caps = info.advertised();
        assert_eq!(caps.best(), SimdTier::Avx2);
        assert!(caps.sse3, "pni must map to sse3");
        assert!(caps.sse41);
    }

    #[test]
    fn test_disagreements() {
        let info = CpuInfo::parse(SAMPLE).unwrap();
        let detected = info.advertised().without(SimdTier::Avx2);
        assert_eq!(info.disagreements(&detected), vec![SimdTier::Avx2]);
        assert!(info.disagreements(&info.advertised()).is_empty());
    }

    #[test]
    fn test_parse_without_flags() {
        assert!(CpuInfo::parse("processor : 0\nmodel name : test\n").is_none());
        assert!(CpuInfo::parse("").is_none());
    }

    #[test]
    fn test_parse_arm_style() {
        let text = "processor : 0\nFeatures : fp asimd evtstrm crc32\n";
        // ARM kernels report "Features", not "flags".
        assert!(CpuInfo::parse(text).is_none());
    }

    #[test]
    fn test_read_missing_file() {
        let err = CpuInfo::read_from(Path::new("/nonexistent/cpuinfo")).unwrap_err();
        assert!(matches!(err, ProbeError::NotAvailable { .. }));
    }

    #[test]
    fn test_parse_cpu_range() {
        assert_eq!(parse_cpu_range("0-3"), Some(4));
        assert_eq!(parse_cpu_range("0"), Some(1));
        assert_eq!(parse_cpu_range("0,2-3"), Some(3));
        assert_eq!(parse_cpu_range("0-1,3-5"), Some(5));
    }

    #[test]
    fn test_parse_cpu_range_invalid() {
        assert_eq!(parse_cpu_range(""), None);
        assert_eq!(parse_cpu_range("abc"), None);
        assert_eq!(parse_cpu_range("3-1"), None);
    }

    #[test]
    fn test_online_cores_fallback() {
        let cores = read_online_cores().unwrap();
        assert!(cores >= 1);
    }
}
