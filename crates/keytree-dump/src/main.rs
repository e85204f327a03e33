//! Rebuild a keyed tree from a record stream and print it
//!
//! Usage:
//!   keytree-dump [--order bfs|dfs] [--emit bfs|dfs] [FILE]
//!
//! Records are read from FILE, or stdin when no file is given. Keys are
//! unsigned integers and payloads any JSON value. Set `RUST_LOG=debug` to see
//! which records the tree refused.

use std::env;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use keytree::{deserialize_report, serialize, TraversalOrder, Tree};
use log::info;
use serde_json::Value;

const USAGE: &str = "usage: keytree-dump [--order bfs|dfs] [--emit bfs|dfs] [FILE]";

type DumpTree = Tree<u64, Value>;

#[derive(Debug, Default, PartialEq)]
struct Args {
    /// Order used to print the tree
    order: TraversalOrder,
    /// Re-encode the tree in this order instead of printing it
    emit: Option<TraversalOrder>,
    file: Option<PathBuf>,
    help: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => parsed.help = true,
            "--order" | "--emit" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("{arg} expects a traversal order"))?;
                let order = value.parse::<TraversalOrder>()?;
                if arg == "--order" {
                    parsed.order = order;
                } else {
                    parsed.emit = Some(order);
                }
            }
            flag if flag.starts_with("--") => bail!("unknown option `{flag}`"),
            _ if parsed.file.is_some() => bail!("unexpected argument `{arg}`"),
            _ => parsed.file = Some(PathBuf::from(&arg)),
        }
    }

    Ok(parsed)
}

fn load(reader: impl Read) -> Result<DumpTree> {
    let rebuilt = deserialize_report(reader).map_err(|partial| {
        let (tree, error) = partial.into_parts();
        anyhow::Error::new(error).context(format!(
            "record stream is malformed ({} nodes rebuilt)",
            tree.len()
        ))
    })?;

    info!(
        "rebuilt {} nodes from {} records",
        rebuilt.tree.len(),
        rebuilt.records
    );
    if rebuilt.skipped > 0 {
        info!("{} records were refused by the tree", rebuilt.skipped);
    }
    Ok(rebuilt.tree)
}

/// Print one line per node, indented by its depth
fn render(tree: &DumpTree, order: TraversalOrder, out: &mut impl Write) -> io::Result<()> {
    for node in tree.traverse(order) {
        let depth = tree.find_parents(node.id()).map_or(0, |parents| parents.len());
        writeln!(out, "{}{} {}", "  ".repeat(depth), node.id(), node.data())?;
    }
    Ok(())
}

fn emit(tree: DumpTree, order: TraversalOrder, out: &mut impl Write) -> Result<usize> {
    let (mut stream, completion) = serialize(Arc::new(tree), order);
    io::copy(&mut stream, out).context("failed to write record stream")?;
    drop(stream);
    Ok(completion.wait()?)
}

fn run() -> Result<()> {
    let args = parse_args(env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let tree = match &args.file {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            load(BufReader::new(file))
                .with_context(|| format!("failed to read {}", path.display()))?
        }
        None => load(io::stdin().lock()).context("failed to read stdin")?,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.emit {
        Some(order) => {
            let written = emit(tree, order, &mut out)?;
            info!("emitted {} records in {} order", written, order);
        }
        None => render(&tree, args.order, &mut out).context("failed to print tree")?,
    }
    out.flush()?;
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        eprintln!("{USAGE}");
        process::exit(1);
    }
}
