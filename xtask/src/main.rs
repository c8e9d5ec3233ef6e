// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask
//!
//! Project automation for the fulfillment workspace.
//!
//! - `cargo xtask ci` runs lint, build and the `SQLite` test suite
//! - `cargo xtask test-mariadb` runs the ignored backend validation tests
//!   in `fulfillment-persistence` against a throwaway `MariaDB` container
//! - `cargo xtask verify-migrations` applies both migration trees and
//!   compares the resulting schemas
//!
//! Plain `cargo test` never needs external services.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod mariadb;
mod schema;

use std::{io, process::Output};

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{Result, eyre::Context};
use duct::cmd;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

use crate::mariadb::MariaDbContainer;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    if let Err(err) = args.command.run() {
        tracing::error!("{err:?}");
        std::process::exit(1);
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test)
    CI,

    /// Build the workspace
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    /// Run clippy, rustdoc and rustfmt checks
    #[command(visible_alias = "l")]
    Lint,

    /// Apply clippy fixes
    #[command(visible_alias = "fc")]
    FixClippy,

    /// Format the workspace
    #[command(visible_alias = "fmt")]
    FixFormatting,

    /// Run the `SQLite` test suite
    #[command(visible_alias = "t")]
    Test,

    /// Run `MariaDB` backend validation tests
    #[command(visible_alias = "tm")]
    TestMariadb,

    /// Verify schema parity between `SQLite` and `MySQL` migrations
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => run_cargo(&["build", "--all-targets"]),
            Self::Check => run_cargo(&["check", "--all-targets"]),
            Self::Lint => lint(),
            Self::FixClippy => run_cargo(&[
                "clippy",
                "--all-targets",
                "--fix",
                "--allow-dirty",
                "--allow-staged",
            ]),
            Self::FixFormatting => run_cargo(&["fmt", "--all"]),
            Self::Test => run_cargo(&["test", "--all-targets"]),
            Self::TestMariadb => test_mariadb(),
            Self::VerifyMigrations => schema::verify_migrations(),
        }
    }
}

/// Lint, build and test against `SQLite`.
///
/// The `MariaDB` commands need Docker and are run separately.
fn ci() -> Result<()> {
    lint()?;
    run_cargo(&["build", "--all-targets"])?;
    run_cargo(&["test", "--all-targets"])
}

fn lint() -> Result<()> {
    run_cargo(&["clippy", "--all-targets", "--", "-D", "warnings"])?;
    cmd!("cargo", "doc", "--no-deps", "--workspace")
        .env("RUSTDOCFLAGS", "-D warnings")
        .run_with_trace()?;
    run_cargo(&["fmt", "--all", "--check"])
}

fn run_cargo(args: &[&str]) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Runs the ignored persistence tests against `MariaDB`.
///
/// The tests read `DATABASE_URL` and refuse to run unless
/// `FULFILLMENT_TEST_BACKEND=mariadb` is set. The container is removed
/// whether or not the tests pass.
fn test_mariadb() -> Result<()> {
    tracing::info!("Starting MariaDB backend validation");
    let container: MariaDbContainer = MariaDbContainer::start("fulfillment-test-mariadb", 3307)?;

    let test_result = cmd!(
        "cargo",
        "test",
        "--package",
        "fulfillment-persistence",
        "backend_validation_tests",
        "--",
        "--ignored",
        "--test-threads=1"
    )
    .env("DATABASE_URL", container.database_url())
    .env("FULFILLMENT_TEST_BACKEND", "mariadb")
    .run_with_trace();

    drop(container);
    test_result.wrap_err("MariaDB backend validation tests failed")?;

    tracing::info!("MariaDB backend validation completed successfully");
    Ok(())
}

/// Logs a `duct` command before running it.
trait ExpressionExt {
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
