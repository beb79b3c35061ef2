// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `lanewise caps`: what the processor supports and what will be used.
//!
//! The CPUID probe is authoritative. `/proc/cpuinfo` is read only as a
//! cross-check and may be missing (non-Linux hosts, some containers).

use cpu_dispatch::{DispatchConfig, Dispatcher};
use cpu_features::{CpuInfo, SimdTier};

pub fn execute(config: &DispatchConfig) -> anyhow::Result<()> {
    super::banner("CPU Capabilities");

    let detected = cpu_features::capabilities();
    let dispatcher = Dispatcher::global();
    let effective = dispatcher.capabilities();

    println!("  {:<10} {:>6} {:>9} {:>8}", "Tier", "Bits", "Detected", "In use");
    println!("  {}", "-".repeat(36));
    for tier in SimdTier::PRIORITY.into_iter().rev() {
        println!(
            "  {:<10} {:>6} {:>9} {:>8}",
            tier.as_str(),
            tier.register_bits(),
            mark(detected.supports(tier)),
            mark(effective.supports(tier)),
        );
    }
    println!();
    println!("  Best detected:  {}", detected.best());
    println!("  Best in use:    {}", effective.best());
    if let Some(max) = config.max_tier {
        println!("  Config cap:     {max}");
    }
    if !config.disabled_tiers.is_empty() {
        let names: Vec<&str> = config.disabled_tiers.iter().map(|t| t.as_str()).collect();
        println!("  Disabled:       {}", names.join(", "));
    }
    println!("  Broadcast tile: {}", dispatcher.broadcast_tile());
    println!();

    match CpuInfo::read() {
        Ok(info) => {
            println!("  /proc/cpuinfo");
            if let Some(model) = &info.model_name {
                println!("   Model:        {model}");
            }
            println!("   Online cores: {}", info.online_cores);
            let disagreements = info.disagreements(detected);
            if disagreements.is_empty() {
                println!("   Flags agree with CPUID.");
            } else {
                let advertised = info.advertised();
                for tier in disagreements {
                    println!(
                        "   {tier}: CPUID says {}, kernel flags say {}",
                        mark(detected.supports(tier)),
                        mark(advertised.supports(tier)),
                    );
                }
            }
        }
        Err(e) => {
            tracing::debug!("cpuinfo unavailable: {e}");
            println!("  /proc/cpuinfo not available; CPUID result only.");
        }
    }
    println!();

    Ok(())
}

fn mark(yes: bool) -> &'static str {
    if yes {
        "yes"
    } else {
        "-"
    }
}
