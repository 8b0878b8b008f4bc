// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Track the distance you run towards a yearly goal.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Data file with one `<YYYY-MM-DD>,<km>` line per run
    #[arg(short = 'f', long, global = true)]
    pub data_file: Option<PathBuf>,
    /// Yearly goal in kilometers
    #[arg(short, long, global = true)]
    pub goal: Option<f64>,
    /// Configuration file, replaces the default one
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Log a run
    Add {
        /// Distance in kilometers, `.` or `,` as decimal separator
        #[arg(allow_hyphen_values = true)]
        distance: String,
        /// Day of the run, defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Remove the most recently logged run
    RemoveLast,
    /// Remove all runs
    Clear {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Print all runs
    List,
    /// Print the statistics of today
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Render the track as SVG
    Render {
        /// Output file, stdout if not set
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, default_value_t = 500.0)]
        width: f64,
        #[arg(long, default_value_t = 450.0)]
        height: f64,
    },
}
