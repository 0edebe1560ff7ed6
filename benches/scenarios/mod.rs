//! Benchmarks for initialized nodes driven through `process`.

mod chain;
mod nodes;

pub use chain::bench_chain;
pub use nodes::bench_nodes;
