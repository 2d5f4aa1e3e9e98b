// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{Ipv4Addr, SocketAddr};
use tracing::{info, warn};

pub fn init_metrics(port: u16) {
    let builder = PrometheusBuilder::new();
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = builder.with_http_listener(addr).install() {
        warn!(
            "Failed to install Prometheus recorder: {}. This might happen if the port is already in use.",
            e
        );
        return;
    }

    describe_counter!(
        "onionrs_pages_fetched",
        "Pages fetched and accepted by policy."
    );
    describe_counter!(
        "onionrs_fetch_failures",
        "Fetches rejected by transport, status or content-type policy."
    );
    describe_counter!(
        "onionrs_content_published",
        "Content records published to the content queue."
    );
    describe_counter!(
        "onionrs_urls_published",
        "Discovered URLs published to the discovery queue."
    );

    // Touch the counters so they are exported before the first increment
    counter!("onionrs_pages_fetched").absolute(0);
    counter!("onionrs_fetch_failures").absolute(0);
    counter!("onionrs_content_published").absolute(0);
    counter!("onionrs_urls_published").absolute(0);

    info!("Metrics exporter listening on {}", addr);
}
