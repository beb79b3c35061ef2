// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # lanewise
//!
//! Command-line interface for the lanewise kernels.
//!
//! ## Usage
//! ```bash
//! # Report detected SIMD tiers
//! lanewise caps
//!
//! # Time every tier on 1 Mi elements
//! lanewise bench --len 1048576 --iters 50
//!
//! # Transpose a bitmap, capped to SSE4.1 by a config file
//! lanewise -c lanewise.toml transpose --input in.bmp --output out.bmp
//! ```

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "lanewise",
    about = "Saturating, converting and reducing kernels on dense containers",
    version,
    author
)]
struct Cli {
    /// Path to a TOML dispatch configuration (tier cap, disabled tiers, budget).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print detected SIMD tiers, the /proc/cpuinfo cross-check and the
    /// tiers the dispatcher will use.
    Caps,

    /// Time add, convert-scale, row sums and transpose at every available tier.
    Bench {
        /// Elements per operand.
        #[arg(long, default_value_t = 1 << 20)]
        len: usize,

        /// Timed iterations per tier and operation.
        #[arg(long, default_value_t = 20)]
        iters: u32,
    },

    /// Transpose a BMP image.
    Transpose {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Convert a BMP image to f32 with a scale factor and print statistics.
    Convert {
        #[arg(short, long)]
        input: PathBuf,

        /// Multiplier applied after conversion (e.g. 0.003921569 for 1/255).
        #[arg(short, long, default_value_t = 1.0)]
        scale: f32,
    },

    /// Print per-row and per-column sums of a BMP image.
    Reduce {
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose);
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Caps => commands::caps::execute(&config),
        Commands::Bench { len, iters } => commands::bench::execute(len, iters),
        Commands::Transpose { input, output } => {
            commands::transpose::execute(&config, &input, &output)
        }
        Commands::Convert { input, scale } => commands::convert::execute(&input, scale),
        Commands::Reduce { input } => commands::reduce::execute(&input),
    }
}
