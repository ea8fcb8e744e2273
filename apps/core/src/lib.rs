pub mod action_registry;
pub mod aggregator;
pub mod config;
pub mod contract;
pub mod core_service;
pub mod launcher_model;
pub mod logging;
pub mod model;
pub mod providers;
pub mod result;
pub mod runtime;
pub mod search;
pub mod sections;
pub mod transport;

#[cfg(test)]
mod tests {
    mod query_latency_test {
        include!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../tests/perf/query_latency_test.rs"
        ));
    }
}
