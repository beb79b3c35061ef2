// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and the setup they share.

pub mod bench;
pub mod caps;
pub mod convert;
pub mod reduce;
pub mod transpose;

use anyhow::Context;
use cpu_dispatch::{DispatchConfig, Dispatcher};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs a console subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

/// Reads `path` if given and makes it the process-wide dispatch
/// configuration, so the `cpu_*` functions honour it.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<DispatchConfig> {
    let config = match path {
        Some(path) => DispatchConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DispatchConfig::default(),
    };
    Dispatcher::install(&config);
    Ok(config)
}

pub(crate) fn banner(title: &str) {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║ {:^52} ║", format!("lanewise · {title}"));
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
}

pub(crate) fn describe(image: &tensor_core::Matrix<'_, u8>) -> String {
    format!(
        "{} x {} x {} ({} bytes)",
        image.rows(),
        image.columns(),
        image.dimension(),
        image.size()
    )
}
