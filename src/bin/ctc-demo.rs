// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Z80 CTC demonstration driver
//!
//! Programs a timer channel and a counter channel, drives them with system
//! clock ticks and trigger pulses, and services interrupts as they latch.

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use log::{error, info};
use z80_ctc::core::config::{ChannelPreset, CtcConfig};
use z80_ctc::core::ctc::{ChannelMode, Ctc, CHANNEL_COUNT};
use z80_ctc::core::error::Result;

/// Z80 CTC demo
#[derive(Parser)]
#[command(name = "ctc-demo")]
#[command(about = "Z80 Counter/Timer Circuit demo", long_about = None)]
struct Args {
    /// TOML configuration (defaults to a timer on channel 0 and a counter on channel 1)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Number of system clock ticks to run
    #[arg(short = 't', long, default_value = "5000")]
    ticks: u64,

    /// Number of trigger pulses to drive into each counter channel
    #[arg(short = 'e', long, default_value = "50")]
    edges: u32,

    /// Emit a state report on every zero-crossing
    #[arg(short = 'd', long)]
    diagnostics: bool,

    /// Print the final channel states as JSON
    #[arg(long)]
    json: bool,
}

fn default_config() -> CtcConfig {
    CtcConfig {
        channels: vec![
            // Timer, interrupts on, prescaler 16
            ChannelPreset {
                index: 0,
                control: 0x86,
                time_constant: Some(100),
                vector: Some(0x10),
            },
            // Counter, interrupts on, falling edge
            ChannelPreset {
                index: 1,
                control: 0xC4,
                time_constant: Some(10),
                vector: Some(0x20),
            },
        ],
        ..CtcConfig::default()
    }
}

fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.to_string().contains("not found") {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("ctc-demo v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading config from: {}", path.display());
            CtcConfig::load(path).map_err(|e| {
                error!("Failed to load config: {}", e);
                e
            })?
        }
        None => default_config(),
    };
    config.enable_diagnostics |= args.diagnostics;

    let mut ctc = Ctc::from_config(&config).map_err(|e| {
        error!("Failed to configure CTC: {}", e);
        e
    })?;

    let expirations: [Rc<Cell<u32>>; CHANNEL_COUNT] = Default::default();
    for (index, counter) in expirations.iter().enumerate() {
        let counter = Rc::clone(counter);
        ctc.set_callback(index, move || counter.set(counter.get() + 1));
    }

    // The handler cannot borrow the CTC, so it answers from a copy of the vector table
    let vectors: [u8; CHANNEL_COUNT] = std::array::from_fn(|index| ctc.interrupt_vector(index));
    let serviced: [Rc<Cell<u32>>; CHANNEL_COUNT] = Default::default();
    let handler_counts = serviced.clone();
    ctc.set_global_interrupt_handler(move |index| {
        handler_counts[index].set(handler_counts[index].get() + 1);
        vectors[index]
    });

    let counters: Vec<usize> = (0..CHANNEL_COUNT)
        .filter(|&index| {
            ctc.channel(index)
                .is_some_and(|channel| channel.mode() == ChannelMode::Counter)
        })
        .collect();

    info!("Running {} clock ticks", args.ticks);
    for _ in 0..args.ticks {
        ctc.clock_tick();
        service_interrupts(&mut ctc);
    }

    info!(
        "Driving {} trigger pulses into channel(s) {:?}",
        args.edges, counters
    );
    for _ in 0..args.edges {
        for &index in &counters {
            ctc.trigger_input(index, false);
            ctc.trigger_input(index, true);
            service_interrupts(&mut ctc);
        }
    }

    for index in 0..CHANNEL_COUNT {
        if let Some(channel) = ctc.channel(index) {
            info!(
                "Channel {}: {} mode, count {}, {} zero-crossing(s), {} interrupt(s) serviced",
                index,
                channel.mode(),
                channel.current_count(),
                expirations[index].get(),
                serviced[index].get()
            );
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&ctc.snapshots())?);
    }

    Ok(())
}

fn service_interrupts(ctc: &mut Ctc) {
    while ctc.has_pending_interrupt() {
        let vector = ctc.acknowledge_interrupt();
        log::debug!("Interrupt serviced, vector 0x{:02X}", vector);
    }
}
