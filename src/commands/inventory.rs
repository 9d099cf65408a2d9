//! `semactl inventory` - reconcile one inventory of a project

use crate::Context;
use crate::cli::InventoryArgs;
use anyhow::Result;
use reconcile::transport::http::UreqTransport;
use reconcile::{AttributeSet, Error, TargetState, converge, kinds};
use std::process::ExitCode;

pub fn run(ctx: &Context, args: InventoryArgs) -> Result<ExitCode> {
    let state = TargetState::from(args.state);
    let result = params(ctx, &args, state).and_then(|params| {
        converge(
            &kinds::inventory(),
            &params,
            &ctx.url(),
            &ctx.token(),
            state,
            UreqTransport::new(),
        )
    });
    super::report(ctx, result)
}

/// Build the parameter set handed to the inventory descriptor
fn params(
    ctx: &Context,
    args: &InventoryArgs,
    state: TargetState,
) -> reconcile::Result<AttributeSet> {
    let mut params = AttributeSet::new().with("name", args.name.as_str());

    if let Some(project_id) = ctx.config.project_id(args.project_id) {
        params.insert("project_id", project_id);
    }
    if let Some(kind) = args.kind {
        params.insert("type", kind.as_str());
    }
    if let Some(inventory) = &args.inventory {
        params.insert("inventory", inventory.as_str());
    }

    let complete = params.contains("type") && params.contains("inventory");
    if state == TargetState::Present && !complete {
        return Err(Error::config(
            "--type and --inventory are required when state is present",
        ));
    }
    Ok(params)
}
