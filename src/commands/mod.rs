//! Command implementations
//!
//! Each reconciling command prints a JSON result on stdout: the success
//! report `{changed, result}` or the failure `{changed, failed, msg, ...}`.

pub mod component;
pub mod config;
pub mod inventory;

use crate::Context;
use crate::ui;
use anyhow::Result;
use reconcile::{Failure, Outcome, Report};
use std::process::ExitCode;

/// Print the outcome of a reconciliation and map it to an exit code
pub fn report(ctx: &Context, result: reconcile::Result<Outcome>) -> Result<ExitCode> {
    match result {
        Ok(outcome) => {
            println!("{}", serde_json::to_string_pretty(&Report::from(outcome))?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            if !ctx.quiet {
                ui::error(&err.to_string());
                ui::dim(err.category().advice());
                if err.is_retryable() {
                    ui::dim("This error is usually transient; retrying may help.");
                }
            }
            println!("{}", serde_json::to_string_pretty(&Failure::from(&err))?);
            Ok(ExitCode::FAILURE)
        }
    }
}
