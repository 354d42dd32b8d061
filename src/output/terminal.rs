//! Terminal output.
//!
//! Prints plan and result summaries as aligned, quoted columns.

use crate::models::{ResourceRequestSet, ResultDocument};
use colored::Colorize;

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let quoted = format!("\"{}\"", value.to_string());
    if quoted.len() >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// One row per request.
pub fn plan_rows(requests: &ResourceRequestSet) -> Vec<String> {
    let mut rows = vec![
        row("public_ip", &requests.public_ip.name, &requests.public_ip.sku),
        row(
            "route_server",
            &requests.route_server.name,
            &format!(
                "b2b={}",
                requests.route_server.branch_to_branch_enabled
            ),
        ),
    ];
    rows.extend(requests.bgp_connections.values().map(|c| {
        row(
            "bgp_connection",
            &c.name,
            &format!("{}@{}", c.peer_asn, c.peer_ip),
        )
    }));
    if let Some(d) = &requests.diagnostics {
        rows.push(row("diagnostics", &d.name, &d.log_analytics_workspace_id));
    }
    rows
}

fn row(kind: &str, name: &str, detail: &str) -> String {
    format!(
        "{},{},{}",
        format_field(kind, 16),
        format_field(name, 36),
        format_field(detail, 24)
    )
}

/// Print the planned requests.
pub fn print_plan(requests: &ResourceRequestSet) {
    println!(
        "#{}# {} request(s)",
        "PLAN".on_blue(),
        requests.request_count()
    );
    for line in plan_rows(requests) {
        println!("{line}");
    }
}

/// Print a short summary of a deployment.
pub fn print_result(result: &ResultDocument) {
    println!(
        "#{}# {} asn={} ips={} public_ip={} bgp_connections={}",
        "DONE".on_green(),
        result.name,
        result.virtual_router_asn,
        result.virtual_router_ips.join(","),
        result.public_ip_address,
        result.bgp_connection_count
    );
}
