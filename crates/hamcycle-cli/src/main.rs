use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;

use hamcycle::io::read_graphs_from_path;
use hamcycle::vertex_order::sort_vertices_degree_desc;
use hamcycle::{SearchCfg, SearchSession};

#[derive(Parser)]
#[command(name = "hamcycle")]
#[command(about = "Enumerate Hamiltonian cycles of a graph")]
struct Cli {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Print the number of Hamiltonian cycles found for each graph
    Count {
        /// Use the cutpoint/bipartite-diff pruning oracle during search
        #[arg(short = 'p', long)]
        prune: bool,
        files: Vec<PathBuf>,
    },
    /// Print every Hamiltonian cycle found for each graph
    List {
        /// Use the cutpoint/bipartite-diff pruning oracle during search
        #[arg(short = 'p', long)]
        prune: bool,
        files: Vec<PathBuf>,
    },
}

fn print_usage() {
    println!("This program finds Hamiltonian Cycles in the inputed graphs.\n");
    println!("Usage: hamcycle <count|list> [-p] files...\n");
    println!("Flags:\n  -h, --help  help\n  -p, --prune Use pruning algorithm during search.");
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();

    if std::env::args().count() == 1 {
        print_usage();
        return Ok(());
    }

    let cli = Cli::parse();
    match cli.action {
        Action::Count { prune, files } => count(prune, files),
        Action::List { prune, files } => list(prune, files),
    }
}

fn count(prune: bool, files: Vec<PathBuf>) -> Result<()> {
    let cfg = SearchCfg { pruning: prune };

    for path in files {
        let graphs = match read_graphs_from_path(&path) {
            Ok(g) => g,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read graph file");
                continue;
            }
        };

        for g in graphs {
            let name = g.name.clone();
            let store = g
                .into_graph_store()
                .with_context(|| format!("parsing {}", path.display()))?;
            let order = sort_vertices_degree_desc(&store);
            let mut session = SearchSession::new(store, &order, cfg)
                .with_context(|| format!("starting search over {name}"))?;

            let mut c: u64 = 0;
            if session.first_cycle() {
                c += 1;
                while session.next_cycle() {
                    c += 1;
                }
            }
            tracing::info!(graph = %name, cycles = c, "counted");
            println!("{name} has {c} Hamiltonian Cycles.");
        }
    }

    Ok(())
}

fn list(prune: bool, files: Vec<PathBuf>) -> Result<()> {
    let cfg = SearchCfg { pruning: prune };

    for path in files {
        let graphs = match read_graphs_from_path(&path) {
            Ok(g) => g,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read graph file");
                continue;
            }
        };

        for g in graphs {
            let name = g.name.clone();
            let store = g
                .into_graph_store()
                .with_context(|| format!("parsing {}", path.display()))?;
            let order = sort_vertices_degree_desc(&store);
            let mut session = SearchSession::new(store, &order, cfg)
                .with_context(|| format!("starting search over {name}"))?;

            if session.first_cycle() {
                println!("Hamiltonian Cycles for {name}:");
                loop {
                    print_cycle(&session.current_cycle_vertices());
                    tracing::info!(graph = %name, "cycle found");
                    if !session.next_cycle() {
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_cycle(tour: &[hamcycle::prelude::Vertex]) {
    print!(" <");
    for v in tour {
        print!(" {v}");
    }
    println!(" >");
}
