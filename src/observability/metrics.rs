//! Metrics collection.
//!
//! # Metrics
//! - `router_routes_registered_total` (counter): registrations by method
//! - `router_resolutions_total` (counter): `handle` outcomes (`matched`, `no_match`)
//! - `router_version_fallbacks_total` (counter): matches served by `DEFAULT`
//!   on behalf of another version
//! - `router_nodes_merged_total` (counter): nodes absorbed by pruning
//! - `router_reloads_total` (counter): config reloads by outcome

use crate::routing::Method;

pub fn record_route_registered(method: Method) {
    metrics::counter!("router_routes_registered_total", "method" => method.as_str()).increment(1);
}

pub fn record_resolution(outcome: &'static str) {
    metrics::counter!("router_resolutions_total", "outcome" => outcome).increment(1);
}

pub fn record_version_fallback() {
    metrics::counter!("router_version_fallbacks_total").increment(1);
}

pub fn record_nodes_merged(count: usize) {
    metrics::counter!("router_nodes_merged_total").increment(count as u64);
}

pub fn record_reload(outcome: &'static str) {
    metrics::counter!("router_reloads_total", "outcome" => outcome).increment(1);
}
