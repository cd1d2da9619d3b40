//! CLI command implementations.

use crate::config::{Config, CONFIG_DIR, CONFIG_FILE};
use colored::Colorize;
use sna_graph::algorithms::TOP_K;
use sna_graph::{
    open_store, AlgorithmKind, AlgorithmParams, AlgorithmResult, GraphSnapshot, SnapshotStore,
    SocialGraph,
};
use sna_server::{ServerConfig, SnaServer};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Initialize a project in a directory.
pub fn init(path: &Path) -> Result<()> {
    let sna_dir = path.join(CONFIG_DIR);

    if sna_dir.join(CONFIG_FILE).exists() {
        println!("{} Already initialized", "✓".green());
        return Ok(());
    }

    fs::create_dir_all(&sna_dir)?;

    let config_path = Config::file_path(path);
    fs::write(&config_path, serde_json::to_string_pretty(&Config::project())?)?;

    println!("{} Initialized in {}", "✓".green(), path.display());
    println!("  Run {} to start the server", "sna serve".cyan());

    Ok(())
}

/// Opens the snapshot store for the current directory's project.
///
/// `data` overrides the configured snapshot location.
fn open_project(data: Option<&Path>) -> Result<(Config, Box<dyn SnapshotStore>)> {
    let root = std::env::current_dir()?;
    let config = Config::discover(&root)?;
    let path: PathBuf = match data {
        Some(path) => path.to_path_buf(),
        None => config.data_path(&root),
    };
    let store = open_store(config.storage.backend, &path)?;
    Ok((config, store))
}

/// Reads the stored graph. An empty store gives an empty graph.
fn load_graph(store: &dyn SnapshotStore) -> Result<SocialGraph> {
    let Some(snapshot) = store.load()? else {
        return Ok(SocialGraph::new());
    };

    let (graph, report) = SocialGraph::from_snapshot(&snapshot);
    if report.skipped() > 0 {
        warn!(
            "Skipped {} vertices and {} relationships from {}",
            report.skipped_vertices,
            report.skipped_relationships,
            store.location().display()
        );
    }
    Ok(graph)
}

/// Start the JSON-RPC server.
pub async fn serve(port: Option<u16>, headless: bool, data: Option<&Path>) -> Result<()> {
    let (config, store) = open_project(data)?;

    let host = if headless {
        "0.0.0.0".to_string()
    } else {
        config.server.host.clone()
    };
    let port = port.unwrap_or(config.server.port);

    if headless {
        println!("{}", "Starting SNA server in headless mode...".cyan());
    } else {
        println!("{}", "Starting SNA server...".cyan());
    }

    let addr = format!("{}:{}", host, port).parse()?;
    let server_config = ServerConfig {
        addr,
        autosave: config.autosave,
    };
    let server = SnaServer::new(SocialGraph::new(), Arc::from(store), server_config);

    if let Some(report) = server.restore().await? {
        println!(
            "{} Loaded {} vertices and {} relationships",
            "✓".green(),
            report.vertices_loaded,
            report.relationships_loaded
        );
    }

    println!("{} Listening on ws://{}:{}", "✓".green(), host, port);
    if headless {
        println!("  Headless mode: accepting connections from any host");
    }
    println!("  Press {} to stop", "Ctrl+C".cyan());

    server.run().await?;

    if config.autosave {
        println!("{} Graph saved", "✓".green());
    }

    Ok(())
}

/// Run one analysis against the stored graph.
pub fn run(
    algorithm: &str,
    start: Option<String>,
    target: Option<String>,
    json_output: bool,
    data: Option<&Path>,
) -> Result<()> {
    let kind: AlgorithmKind = algorithm.parse()?;
    let (_, store) = open_project(data)?;
    let graph = load_graph(store.as_ref())?;

    let params = AlgorithmParams {
        start_node_id: start,
        target_node_id: target,
    };

    info!("Running {} on {} vertices", kind, graph.vertex_count());
    let result = kind.run(&graph, &params)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for line in summary_lines(&result) {
            println!("{}", line);
        }
    }

    Ok(())
}

/// Formats an analysis result for the terminal.
fn summary_lines(result: &AlgorithmResult) -> Vec<String> {
    let mut lines = vec![format!("{}", result.kind().as_str().cyan().bold()), String::new()];

    match result {
        AlgorithmResult::Bfs(details) => {
            lines.push(format!("Start: {}", details.start_node_id.cyan()));
            lines.push(format!("Visit order: {}", details.visit_order.join(" → ")));
            for (id, hops) in &details.distances {
                lines.push(format!("  {} {}", id, format!("({} hops)", hops).dimmed()));
            }
        }
        AlgorithmResult::Dfs(details) => {
            lines.push(format!("Start: {}", details.start_node_id.cyan()));
            lines.push(format!("Visit order: {}", details.visit_order.join(" → ")));
        }
        AlgorithmResult::Dijkstra(details) => {
            lines.push(format!("Start: {}", details.start_node_id.cyan()));
            if let Some(ref target) = details.target_node_id {
                match (&details.path, details.total_distance) {
                    (Some(path), Some(total)) => {
                        lines.push(format!("Path to {}: {}", target.cyan(), path.join(" → ")));
                        lines.push(format!("Total distance: {:.4}", total));
                    }
                    _ => lines.push(format!("{} {} is unreachable", "✗".red(), target)),
                }
            }
            for (id, distance) in &details.distances {
                let shown = if distance.is_finite() {
                    format!("{:.4}", distance)
                } else {
                    "∞".to_string()
                };
                lines.push(format!("  {} {}", id, shown.dimmed()));
            }
        }
        AlgorithmResult::DegreeCentrality(details) => {
            lines.push(format!("Top {}:", TOP_K));
            for (rank, entry) in details.top_k.iter().enumerate() {
                lines.push(format!(
                    "  {}. {} {}",
                    rank + 1,
                    entry.node_id.cyan(),
                    format!("(degree {})", entry.degree).dimmed()
                ));
            }
        }
        AlgorithmResult::ConnectedComponents(details) => {
            lines.push(format!("Components: {}", details.component_count));
            for component in &details.components {
                lines.push(format!(
                    "  #{} {} {}",
                    component.id,
                    component.nodes.join(", "),
                    format!("({} vertices)", component.nodes.len()).dimmed()
                ));
            }
        }
        AlgorithmResult::WelshPowellColoring(details) => {
            lines.push(format!("Colors used: {}", details.color_count));
            let mut classes: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
            for (id, color) in &details.colors {
                classes.entry(*color).or_default().push(id);
            }
            for (color, members) in classes {
                lines.push(format!("  color {}: {}", color, members.join(", ")));
            }
        }
    }

    lines
}

/// Show graph statistics.
pub fn status(data: Option<&Path>) -> Result<()> {
    let (config, store) = open_project(data)?;
    let graph = load_graph(store.as_ref())?;
    let stats = graph.stats();

    println!("{}", "SNA Status".cyan().bold());
    println!();
    println!(
        "  {} {} ({})",
        "Store:".dimmed(),
        store.location().display(),
        config.storage.backend
    );
    println!("  {} {}", "Vertices:".dimmed(), stats.vertex_count);
    println!("  {} {}", "Relationships:".dimmed(), stats.relationship_count);
    println!(
        "  {} {}",
        "Components:".dimmed(),
        graph.connected_components().component_count
    );

    Ok(())
}

/// Export the graph, weights included.
pub fn export(output: &Path, data: Option<&Path>) -> Result<()> {
    let (_, store) = open_project(data)?;
    let graph = load_graph(store.as_ref())?;

    write_view(&graph, output)?;
    println!("{} Exported to {}", "✓".green(), output.display());

    Ok(())
}

fn write_view(graph: &SocialGraph, path: &Path) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(&graph.view())?)?;
    Ok(())
}

/// Import a snapshot file, replacing the stored graph.
pub fn import(file: &Path, data: Option<&Path>) -> Result<()> {
    let (_, store) = open_project(data)?;
    let graph = import_into(file, store.as_ref())?;

    println!(
        "{} Imported {} vertices and {} relationships into {}",
        "✓".green(),
        graph.vertex_count(),
        graph.relationship_count(),
        store.location().display()
    );

    Ok(())
}

/// Validates `file` by replaying it into a graph and stores the result.
fn import_into(file: &Path, store: &dyn SnapshotStore) -> Result<SocialGraph> {
    let content = fs::read_to_string(file)?;
    let snapshot: GraphSnapshot = serde_json::from_str(&content)?;

    let (graph, report) = SocialGraph::from_snapshot(&snapshot);
    if report.skipped() > 0 {
        println!(
            "{} Skipped {} vertices and {} relationships",
            "⚠".yellow(),
            report.skipped_vertices,
            report.skipped_relationships
        );
    }

    store.save(&graph.export_snapshot())?;
    Ok(graph)
}
