// /////////////////////////////////////////////////////////////////////////////
// Sluice
// Copyright (c) 2025 Sluice Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Binary entrypoint: parse the CLI surface, load configuration, wire every
//! port to its concrete adapter, and dispatch to `build`/`watch`/`clean`/
//! `preview` (spec.md §6). Exit status follows spec.md §7: a non-zero
//! aggregate error count is a failing exit.

use anyhow::Context;
use clap::Parser;
use sluice::application::{builtins, Runner};
use sluice::infrastructure::adapters::{DylibPluginLoader, GlobMatcher, TokioFileSystem, TokioProcessRunner, UrlHelper, Watcher};
use sluice::infrastructure::cache::JsonOutputCache;
use sluice::infrastructure::config::SluiceConfig;
use sluice::infrastructure::TracingProgress;
use sluice_bootstrap::cli::{Cli, Command, ModeArgs, WorkingModeArg};
use sluice_bootstrap::logger::{BootstrapLogger, ConsoleLogger};
use sluice_bootstrap::shutdown::ShutdownCoordinator;
use sluice_bootstrap::ExitCode;
use sluice_domain::services::path_port::StdPath;
use sluice_domain::value_objects::engine::{Engine, SourceMapDefaults};
use sluice_domain::value_objects::working_mode::WorkingMode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let logger = ConsoleLogger::new();

    let exit_code = match run(cli, &logger).await {
        Ok(code) => code,
        Err(err) => {
            logger.error(&format!("{err:#}"));
            ExitCode::Fatal
        }
    };
    std::process::exit(exit_code.as_i32());
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

async fn run(cli: Cli, logger: &dyn BootstrapLogger) -> anyhow::Result<ExitCode> {
    let config = SluiceConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let mode_args = cli.command.mode_args();
    let mode = working_mode(cli.command.working_mode());

    let root = mode_args.root.clone();
    let out_dir = root.join(&config.out_dir);
    let cache_dir = root.join(&config.cache_dir);

    let plugins = Arc::new(DylibPluginLoader::new());
    builtins::register_builtins(&plugins);

    let cache = Arc::new(JsonOutputCache::load(&cache_dir).await);
    let engine = Arc::new(Engine::new(
        Arc::new(TokioFileSystem::new()),
        Arc::new(StdPath),
        Arc::new(UrlHelper),
        Arc::new(GlobMatcher::new()),
        Arc::new(TracingProgress::new()),
        plugins,
        Arc::new(TokioProcessRunner::new()),
        cache,
        mode,
        config.encoding,
        source_map_defaults(&config, mode_args),
        mode_args.overwrite || config.overwrite,
    ));
    engine.prime_deps(sluice::infrastructure::cache::load_dep_graph(&cache_dir).await);

    let runner = Runner::new(engine.clone(), cache_dir.clone());

    logger.info(&format!("running {mode:?} over {}", root.display()));

    match cli.command {
        Command::Build(_) | Command::Preview(_) => {
            let steps = resolve_pipeline(&engine, &config.pipeline)?;
            let summary = runner.run(&root, &config.patterns, steps, &out_dir).await?;
            logger.info(&format!("{} file(s), {} error(s), {} warning(s)", summary.files, summary.errors, summary.warnings));
            Ok(ExitCode::from_error_count(summary.errors))
        }
        Command::Clean(_) => {
            let summary = runner.clean(&root, &config.patterns, &out_dir).await?;
            logger.info(&format!("cleaned {} file(s)", summary.files));
            Ok(ExitCode::from_error_count(summary.errors))
        }
        Command::Watch(_) => run_watch(&runner, &root, &config, &out_dir, logger).await,
    }
}

/// Resolves `names` against the engine's plugin loader, in order, building
/// the processor chain `Runner::pipe` folds the scanned `FileList` through
/// (spec.md §1: "piped through an ordered chain of processors"). An unknown
/// name is a fatal configuration error rather than a silently dropped stage.
fn resolve_pipeline(engine: &Engine, names: &[String]) -> anyhow::Result<Vec<sluice_domain::entities::Processor>> {
    names
        .iter()
        .map(|name| engine.plugins.load(name).with_context(|| format!("resolving pipeline processor {name:?}")))
        .collect()
}

fn working_mode(arg: WorkingModeArg) -> WorkingMode {
    match arg {
        WorkingModeArg::Build => WorkingMode::Build,
        WorkingModeArg::Watch => WorkingMode::Watch,
        WorkingModeArg::Clean => WorkingMode::Clean,
        WorkingModeArg::Preview => WorkingMode::Preview,
    }
}

fn source_map_defaults(config: &SluiceConfig, args: &ModeArgs) -> SourceMapDefaults {
    SourceMapDefaults {
        emit: args.source_maps || config.source_maps.emit,
        inline: args.inline_source_maps || config.source_maps.inline,
        include_content: args.source_maps_content || config.source_maps.include_content,
    }
}

/// Runs once, then keeps watching `root` and re-running the whole pipeline
/// whenever a debounced batch of changes arrives, until `Ctrl-C` or a watch
/// error ends the loop (spec.md §4.5/§6).
async fn run_watch(
    runner: &Runner,
    root: &std::path::Path,
    config: &SluiceConfig,
    out_dir: &std::path::Path,
    logger: &dyn BootstrapLogger,
) -> anyhow::Result<ExitCode> {
    let summary = runner.run(root, &config.patterns, resolve_pipeline(runner.engine(), &config.pipeline)?, out_dir).await?;
    logger.info(&format!("initial build: {} file(s), {} error(s)", summary.files, summary.errors));

    let mut watcher = Watcher::new(root, Duration::from_millis(config.watch_debounce_ms)).context("starting file watcher")?;
    let shutdown = ShutdownCoordinator::default();
    let token = shutdown.token();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        shutdown.initiate_shutdown();
    });

    let mut last_errors = summary.errors;
    loop {
        tokio::select! {
            _ = token.cancelled() => {
                logger.info("shutting down watch mode");
                return Ok(ExitCode::from_error_count(last_errors));
            }
            batch = watcher.next_batch() => {
                let Some(changed) = batch else {
                    logger.info("watcher closed, stopping");
                    return Ok(ExitCode::from_error_count(last_errors));
                };
                logger.debug(&format!("{} path(s) changed, rebuilding", changed.len()));
                let summary = runner.run(root, &config.patterns, resolve_pipeline(runner.engine(), &config.pipeline)?, out_dir).await?;
                logger.info(&format!("rebuilt: {} file(s), {} error(s)", summary.files, summary.errors));
                last_errors = summary.errors;
            }
        }
    }
}
