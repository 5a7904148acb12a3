//! `habconn probe`: TCP reachability of each configured server.

use serde::Serialize;

use habconn_core::{ConnectionKind, ConnectionRequest, ReachabilityProbe};

use crate::cli::GlobalOpts;
use crate::commands::Context;
use crate::error::CliError;
use crate::output::{self, yes_no};

#[derive(Debug, Serialize)]
struct ProbeResult {
    kind: ConnectionKind,
    url: String,
    reachable: bool,
}

pub async fn handle(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let probe = ReachabilityProbe::default();
    let mut results = Vec::new();

    for request in [ConnectionRequest::Local, ConnectionRequest::Remote] {
        let Some(connection) = ctx
            .factory
            .connection(request, ctx.network)
            .map_err(|e| CliError::from_connection(e, &ctx.config_path))?
        else {
            continue;
        };
        // Demo mode serves Local and Remote from one connection.
        if results.iter().any(|r: &ProbeResult| r.url == connection.base_url().as_str()) {
            continue;
        }
        let reachable = probe.is_reachable(connection.base_url()).await;
        results.push(ProbeResult {
            kind: connection.kind(),
            url: connection.base_url().to_string(),
            reachable,
        });
    }

    if results.is_empty() {
        return Err(CliError::from_connection(
            habconn_core::ConnectionError::NoUrlInformation {
                would_have_used_local: true,
            },
            &ctx.config_path,
        ));
    }

    let out = output::render(global.output, &results, |rows| {
        rows.iter()
            .map(|r| format!("{:<7} {:<4} {}", r.kind, yes_no(r.reachable), r.url))
            .collect::<Vec<_>>()
            .join("\n")
    })?;
    output::print_output(&out);
    Ok(())
}
