// SPDX-License-Identifier: MIT OR Apache-2.0
//! Flowgraph demonstrator.
//!
//! Builds a flowgraph from a RON description (the bundled one, or the file
//! given as first argument), reports which radios feed each host streamer
//! and prints a topology snapshot.
//!
//! Logging is controlled through `RUST_LOG`.

mod flowgraph;

use flowgraph::{Flowgraph, FlowgraphDesc, FlowgraphError, DEFAULT_FLOWGRAPH};
use rfnoc_graph::blocks::{default_registry, RadioBlock, RxStreamer, TxStreamer};
use rfnoc_graph::{NodeCtrl, NodeCtrlExt, TopologySnapshot};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rfnoc_graph=debug,rfnoc_flowgraph=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting rfnoc_flowgraph v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(std::env::args_os().nth(1).map(PathBuf::from)) {
        tracing::error!("Flowgraph failed: {e}");
        std::process::exit(1);
    }
}

fn run(path: Option<PathBuf>) -> Result<(), FlowgraphError> {
    let desc = match &path {
        Some(path) => {
            tracing::info!("Loading flowgraph from {}", path.display());
            FlowgraphDesc::load(path)?
        }
        None => FlowgraphDesc::from_ron(DEFAULT_FLOWGRAPH)?,
    };

    let mut registry = default_registry();
    let graph = Flowgraph::build(&desc, &mut registry)?;

    for node in graph.nodes() {
        let any = (**node).as_any();
        if any.is::<RxStreamer>() {
            let radios: Vec<_> = node
                .find_upstream::<RadioBlock>()
                .iter()
                .map(|r| r.unique_id())
                .collect();
            tracing::info!(streamer = %node.unique_id(), ?radios, "Receive path");
        } else if any.is::<TxStreamer>() {
            let radios: Vec<_> = node
                .find_downstream::<RadioBlock>()
                .iter()
                .map(|r| r.unique_id())
                .collect();
            tracing::info!(streamer = %node.unique_id(), ?radios, "Transmit path");
        }
    }

    let snapshot = TopologySnapshot::capture(graph.nodes());
    match snapshot.to_ron() {
        Ok(text) => println!("{text}"),
        Err(e) => tracing::warn!("Could not render snapshot: {e}"),
    }

    Ok(())
}
