//! `habconn get`: fetch a path through the resolved connection.

use serde::Serialize;

use crate::cli::{GetArgs, GlobalOpts};
use crate::commands::Context;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct Fetched {
    url: String,
    body: String,
}

pub async fn handle(args: GetArgs, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let connection = ctx.connection(args.kind, args.reachable).await?;
    let base = connection.base_url().to_string();

    let client = connection
        .async_client()
        .map_err(|e| CliError::from_api(e, &base, ctx.timeout_secs))?;
    let url = client
        .url(&args.path)
        .map_err(|e| CliError::from_api(e, &base, ctx.timeout_secs))?
        .to_string();

    tracing::debug!(kind = %connection.kind(), %url, "GET");
    let body = client
        .get(&args.path)
        .await
        .map_err(|e| CliError::from_api(e, &url, ctx.timeout_secs))?;

    let out = output::render(global.output, &Fetched { url, body }, |f| f.body.clone())?;
    output::print_output(&out);
    Ok(())
}
