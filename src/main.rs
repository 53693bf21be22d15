// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use orderlens::{cli, commands, config::Config, store::RecordStore, utils};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let verbosity = if matches.get_flag("quiet") {
        -1
    } else {
        matches.get_count("verbose").min(2) as i8
    };
    utils::init_tracing(verbosity);

    if matches.subcommand().is_none() {
        cli::build_cli().print_help()?;
        println!();
        return Ok(());
    }

    let config_arg = matches.get_one::<String>("config").map(String::as_str);

    // config commands work without a data file, and `init` without a config
    if let Some(("config", sub)) = matches.subcommand() {
        let cfg = match sub.subcommand() {
            Some(("init", _)) => Config::default(),
            _ => Config::load(config_arg.map(Path::new))?,
        };
        return commands::settings::handle(&cfg, config_arg, sub);
    }

    let cfg = Config::load(config_arg.map(Path::new))?;
    let data_path =
        cfg.resolve_data_path(matches.get_one::<String>("data").map(String::as_str))?;
    debug!(path = %data_path.display(), "Resolved data path");
    let store = RecordStore::load(&data_path)
        .with_context(|| format!("Load purchase records from {}", data_path.display()))?;

    match matches.subcommand() {
        Some(("report", sub)) => commands::reports::handle(&store, &cfg, sub)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(&store, &cfg, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, &cfg, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&store, &cfg)?,
        _ => {}
    }
    Ok(())
}
