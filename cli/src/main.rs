//! mathgraph CLI: command-line explorer for the mathematics knowledge graph
//!
//! Runs the analytics pipeline over a dataset file and prints one of the
//! dashboard views as a terminal table, JSON or CSV.

use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use mathgraph::analytics::AnalyticsSnapshot;
use mathgraph::dashboard::{
    community_preview, community_summary_text, metric_preview, metric_summary_text, Cell,
    ChoiceType, ChooserView, ColorBy, ControlEvent, Dashboard, Figure, FigureOptions, Metric, NodeTable,
    PlotView, PreviewTable, PreviewView, SummaryView,
};
use mathgraph::{AppConfig, NodeId, Pipeline};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "mathgraph", version, about = "Mathematics knowledge graph explorer")]
struct Cli {
    /// Dataset JSON file (node_ids / edges / weights)
    dataset: PathBuf,

    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Layout seed (overrides the configuration)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Graph, component and community overview
    Summary,
    /// Highest-ranked nodes for a metric
    Top {
        #[arg(long, default_value = "degree")]
        metric: Metric,

        /// Number of rows (defaults to the configured top_n)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Members of one community
    Community {
        #[arg(allow_negative_numbers = true)]
        id: i64,

        /// Number of rows (defaults to the configured preview_rows)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Mean, standard deviation, min and max of a metric
    Stats {
        #[arg(long, default_value = "degree")]
        metric: Metric,
    },
    /// In- and out-degree distributions
    Degrees,
    /// Network plot as JSON
    Figure {
        #[arg(long, default_value_t = 0)]
        min_degree: usize,

        #[arg(long, default_value = "community")]
        color_by: ColorBy,

        /// Show node labels
        #[arg(long)]
        labels: bool,

        /// Let the axes scale independently
        #[arg(long)]
        no_fix_aspect: bool,
    },
    /// Start an interactive selection menu
    Shell,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.quiet {
            LevelFilter::WARN
        } else {
            LevelFilter::INFO
        })
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_yaml_path(path)?,
        None => AppConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let snapshot = Pipeline::new(config.pipeline).run_path(&cli.dataset)?;
    let table = NodeTable::from_snapshot(&snapshot);

    match cli.command {
        Commands::Summary => run_summary(&snapshot, &cli.format),
        Commands::Top { metric, limit } => {
            let preview = metric_preview(&table, metric, limit.unwrap_or(config.dashboard.top_n));
            print_preview(&preview, &cli.format)
        }
        Commands::Community { id, limit } => {
            if matches!(cli.format, OutputFormat::Table) {
                println!("{}", community_summary_text(&table, id));
            }
            let preview =
                community_preview(&table, id, limit.unwrap_or(config.dashboard.preview_rows));
            print_preview(&preview, &cli.format)
        }
        Commands::Stats { metric } => run_stats(&table, metric, &cli.format),
        Commands::Degrees => run_degrees(&snapshot, &cli.format),
        Commands::Figure {
            min_degree,
            color_by,
            labels,
            no_fix_aspect,
        } => {
            let options = FigureOptions {
                min_degree,
                color_by,
                show_labels: labels,
                fix_aspect: !no_fix_aspect,
            };
            let figure = Figure::build(&snapshot, &table, options);
            println!("{}", figure.to_json()?);
            Ok(())
        }
        Commands::Shell => run_shell(snapshot, config, &cli.format),
    }
}

#[derive(Serialize)]
struct HubRow {
    community: usize,
    node: NodeId,
    label: String,
    out_degree: usize,
}

#[derive(Serialize)]
struct SummaryReport {
    nodes: usize,
    edges: usize,
    self_loops: usize,
    isolated_nodes: usize,
    projection_edges: usize,
    weak_components: usize,
    largest_weak_component: usize,
    strong_components: usize,
    largest_strong_component: usize,
    communities: usize,
    modularity: f64,
    max_degree: usize,
    hubs: Vec<HubRow>,
}

fn summary_report(snapshot: &AnalyticsSnapshot) -> SummaryReport {
    let stats = snapshot.graph.statistics();
    let hubs = snapshot
        .hubs
        .iter()
        .enumerate()
        .map(|(community, &node)| HubRow {
            community,
            node,
            label: snapshot
                .graph
                .label_of(node)
                .map(|l| l.to_string())
                .unwrap_or_default(),
            out_degree: snapshot.graph.out_degree(node),
        })
        .collect();

    SummaryReport {
        nodes: stats.node_count,
        edges: stats.edge_count,
        self_loops: stats.self_loops,
        isolated_nodes: stats.isolated_nodes,
        projection_edges: snapshot.projection.edge_count(),
        weak_components: snapshot.weak_components.len(),
        largest_weak_component: snapshot.largest_weak_component().map_or(0, <[NodeId]>::len),
        strong_components: snapshot.strong_components.len(),
        largest_strong_component: snapshot.largest_strong_component().map_or(0, <[NodeId]>::len),
        communities: snapshot.communities.len(),
        modularity: snapshot.communities.modularity,
        max_degree: snapshot.degree_stats.max_degree,
        hubs,
    }
}

fn run_summary(
    snapshot: &AnalyticsSnapshot,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = summary_report(snapshot);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Csv => {
            println!("community,node,label,out_degree");
            for hub in &report.hubs {
                println!(
                    "{},{},{},{}",
                    hub.community,
                    hub.node,
                    csv_escape(&hub.label),
                    hub.out_degree
                );
            }
        }
        OutputFormat::Table => {
            println!("Nodes:              {}", report.nodes);
            println!("Edges:              {}", report.edges);
            println!("Self-loops:         {}", report.self_loops);
            println!("Isolated nodes:     {}", report.isolated_nodes);
            println!("Undirected edges:   {}", report.projection_edges);
            println!(
                "Weak components:    {} (largest {})",
                report.weak_components, report.largest_weak_component
            );
            println!(
                "Strong components:  {} (largest {})",
                report.strong_components, report.largest_strong_component
            );
            println!(
                "Communities:        {} (modularity {:.4})",
                report.communities, report.modularity
            );
            println!("Max degree:         {}", report.max_degree);

            if !report.hubs.is_empty() {
                let mut table = Table::new();
                table.set_content_arrangement(ContentArrangement::Dynamic);
                table.set_header(vec!["community", "hub", "label", "out_degree"]);
                for hub in &report.hubs {
                    table.add_row(vec![
                        hub.community.to_string(),
                        hub.node.to_string(),
                        hub.label.clone(),
                        hub.out_degree.to_string(),
                    ]);
                }
                println!("{}", table);
            }
        }
    }

    Ok(())
}

fn run_stats(
    table: &NodeTable,
    metric: Metric,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&table.metric_summary(metric))?);
        }
        OutputFormat::Csv => {
            println!("metric,count,mean,std,min,max");
            if let Some(s) = table.metric_summary(metric) {
                let std = s.std.map(|v| v.to_string()).unwrap_or_default();
                println!("{},{},{},{},{},{}", metric, s.count, s.mean, std, s.min, s.max);
            }
        }
        OutputFormat::Table => {
            println!("{}", metric_summary_text(table, metric));
        }
    }

    Ok(())
}

fn run_degrees(
    snapshot: &AnalyticsSnapshot,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let distribution = &snapshot.degree_distribution;

    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(distribution)?);
        return Ok(());
    }

    // Merge both histograms into one row per degree value
    let mut merged: std::collections::BTreeMap<usize, (usize, usize)> = Default::default();
    for &(degree, count) in &distribution.in_degree {
        merged.entry(degree).or_default().0 = count;
    }
    for &(degree, count) in &distribution.out_degree {
        merged.entry(degree).or_default().1 = count;
    }

    let preview = PreviewTable {
        columns: vec![
            "degree".to_string(),
            "in_degree_count".to_string(),
            "out_degree_count".to_string(),
        ],
        rows: merged
            .into_iter()
            .map(|(degree, (ins, outs))| {
                vec![
                    Cell::Count(degree),
                    Cell::Count(ins),
                    Cell::Count(outs),
                ]
            })
            .collect(),
    };
    print_preview(&preview, format)
}

/// Views the interactive shell prints from
struct ShellViews {
    chooser: Arc<Mutex<ChooserView>>,
    summary: Arc<Mutex<SummaryView>>,
    preview: Arc<Mutex<PreviewView>>,
    plot: Arc<Mutex<PlotView>>,
}

fn shell_dashboard(snapshot: AnalyticsSnapshot, config: AppConfig) -> (Dashboard, ShellViews) {
    let mut dashboard = Dashboard::new(Arc::new(snapshot), config.dashboard);
    let views = ShellViews {
        chooser: Arc::new(Mutex::new(ChooserView::new())),
        summary: Arc::new(Mutex::new(SummaryView::new())),
        preview: Arc::new(Mutex::new(PreviewView::new())),
        plot: Arc::new(Mutex::new(PlotView::new())),
    };
    dashboard.subscribe(views.chooser.clone());
    dashboard.subscribe(views.summary.clone());
    dashboard.subscribe(views.preview.clone());
    dashboard.subscribe(views.plot.clone());
    (dashboard, views)
}

fn run_shell(
    snapshot: AnalyticsSnapshot,
    config: AppConfig,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut dashboard, views) = shell_dashboard(snapshot, config);
    let ShellViews {
        chooser,
        summary,
        preview,
        plot,
    } = views;

    println!("mathgraph selection menu");
    println!("Type :help for commands. :quit to exit.\n");

    let stdin = std::io::stdin();
    let mut line = String::new();
    let mut show = true;
    let mut show_plot = false;

    loop {
        if show_plot {
            if let Ok(plot) = plot.lock() {
                if let Some(figure) = plot.figure() {
                    print_figure(figure, dashboard.state().min_degree, format)?;
                }
            }
            show_plot = false;
        } else if show {
            if let (Ok(chooser), Ok(summary), Ok(preview)) =
                (chooser.lock(), summary.lock(), preview.lock())
            {
                if let Some(chooser) = chooser.chooser() {
                    let options: Vec<&str> = chooser.options.iter().map(|o| o.key.as_str()).collect();
                    println!("Choices: {} (selected {})", options.join(", "), chooser.selected);
                }
                println!("{}", summary.text());
                print_preview(preview.table(), format)?;
            }
        }

        eprint!("mathgraph> ");
        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break; // EOF
        }

        let mut words = line.split_whitespace();
        let (command, arg) = (words.next(), words.next());
        show = true;

        let event = match (command, arg) {
            (None, _) => {
                show = false;
                continue;
            }
            (Some(":quit" | ":exit" | ":q"), _) => break,
            (Some(":help" | ":h"), _) => {
                println!("Commands:");
                println!("  :metric <name>      - Select a metric (degree, in_degree, ...)");
                println!("  :community <id>     - Select a community");
                println!("  :min-degree <n>     - Set the plot's minimum degree and show the plot");
                println!("  :quit               - Exit shell");
                show = false;
                continue;
            }
            (Some(":metric"), Some(name)) => match name.parse::<Metric>() {
                Ok(metric) => {
                    dashboard.publish(ControlEvent::ChoiceType(ChoiceType::Metric));
                    ControlEvent::Metric(metric)
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    show = false;
                    continue;
                }
            },
            (Some(":community"), Some(id)) => match id.parse::<i64>() {
                Ok(id) => {
                    dashboard.publish(ControlEvent::ChoiceType(ChoiceType::Community));
                    ControlEvent::Community(id)
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    show = false;
                    continue;
                }
            },
            (Some(":min-degree"), Some(n)) => match n.parse::<usize>() {
                Ok(n) => ControlEvent::MinDegree(n),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    show = false;
                    continue;
                }
            },
            (Some(other), _) => {
                eprintln!("Error: unknown command `{}` (try :help)", other);
                show = false;
                continue;
            }
        };

        show_plot = event.affects_plot();
        dashboard.publish(event);
    }

    println!("Bye!");
    Ok(())
}

fn print_figure(
    figure: &Figure,
    min_degree: usize,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => println!("{}", figure.to_json()?),
        _ => println!(
            "Plot: {} node(s), {} edge(s) with degree >= {}",
            figure.node_count(),
            figure.edge_count(),
            min_degree
        ),
    }
    Ok(())
}

fn print_preview(
    preview: &PreviewTable,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            let records: Vec<serde_json::Map<String, serde_json::Value>> = preview
                .rows
                .iter()
                .map(|row| {
                    preview
                        .columns
                        .iter()
                        .cloned()
                        .zip(row.iter().map(|cell| serde_json::json!(cell)))
                        .collect()
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        OutputFormat::Csv => {
            println!("{}", preview.columns.join(","));
            for row in &preview.rows {
                let cells: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
                println!("{}", cells.join(","));
            }
        }
        OutputFormat::Table => {
            if preview.is_empty() {
                println!("(no results)");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(&preview.columns);

            for row in &preview.rows {
                let cells: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
                table.add_row(cells);
            }

            println!("{}", table);
            println!("{} row(s)", preview.len());
        }
    }

    Ok(())
}

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathgraph::graph::GraphStore;

    fn snapshot() -> AnalyticsSnapshot {
        let mut store = GraphStore::new();
        for id in 0..4 {
            store.create_node(NodeId::new(id), format!("Topic {}", id)).unwrap();
        }
        for (s, t) in [(0, 1), (1, 2), (2, 0), (0, 3)] {
            store.create_edge(NodeId::new(s), NodeId::new(t), 1.0).unwrap();
        }
        let config = AppConfig::default().with_seed(5);
        Pipeline::new(config.pipeline).run(store).unwrap()
    }

    #[test]
    fn test_shell_min_degree_redraws_plot() {
        let (mut dashboard, views) = shell_dashboard(snapshot(), AppConfig::default());
        assert_eq!(views.plot.lock().unwrap().figure().unwrap().node_count(), 4);

        let event = ControlEvent::MinDegree(3);
        assert!(event.affects_plot());
        dashboard.publish(event);

        // only node 0 has degree 3
        let plot = views.plot.lock().unwrap();
        let figure = plot.figure().unwrap();
        assert_eq!(figure.nodes.ids, vec![NodeId::new(0)]);
        assert_eq!(figure.edge_count(), 0);
    }

    #[test]
    fn test_shell_selection_leaves_plot_alone() {
        let (mut dashboard, views) = shell_dashboard(snapshot(), AppConfig::default());
        dashboard.publish(ControlEvent::MinDegree(3));

        dashboard.publish(ControlEvent::Metric(Metric::Clustering));

        assert_eq!(views.plot.lock().unwrap().figure().unwrap().node_count(), 1);
        assert!(views
            .summary
            .lock()
            .unwrap()
            .text()
            .starts_with("Selected metric: clustering"));
    }
}
