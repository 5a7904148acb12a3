//! `habconn resolve`: show which connection a request resolves to.

use crate::cli::{GlobalOpts, ResolveArgs};
use crate::commands::{ConnectionReport, Context};
use crate::error::CliError;
use crate::output::{self, field, yes_no};

pub async fn handle(args: ResolveArgs, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let connection = ctx.connection(args.kind, args.reachable).await?;
    tracing::info!(kind = %connection.kind(), url = %connection.base_url(), "resolved");

    let report = ConnectionReport::new(&connection, ctx.network);
    let out = output::render(global.output, &report, detail)?;
    output::print_output(&out);
    Ok(())
}

fn detail(report: &ConnectionReport) -> String {
    let mut lines = vec![
        field("kind", report.kind),
        field("url", &report.url),
        field("network", report.network),
        field("user", report.username.as_deref().unwrap_or("-")),
        field("auth", yes_no(report.authenticated)),
    ];
    if report.demo {
        lines.push(field("demo", yes_no(true)));
    }
    lines.join("\n")
}
