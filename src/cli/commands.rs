use std::io;
use std::ops::ControlFlow;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{resolve_node_path, Aggregate, AggregateKind, TreeManifest};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{break_value, Direction, Record, Tree, TreeConvert};
use crate::util::path::expand_path;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, run with --help".to_string(),
        ));
    };
    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let config_path = cli.config.as_deref().map(expand_path);
    let settings = Settings::load(config_path.as_deref())?;
    if !settings.color {
        colored::control::set_override(false);
    }

    match command {
        Commands::Tree { manifest, full } => _tree(&settings, manifest, *full),
        Commands::List {
            manifest,
            node,
            backward,
        } => _list(&settings, manifest, node, *backward),
        Commands::Sync {
            manifest,
            from,
            aggregate,
            attr,
            limit,
        } => _sync(manifest, from, *aggregate, attr.clone(), *limit),
        Commands::Info { manifest } => _info(manifest),
        Commands::Config { command } => _config(&settings, command),
        Commands::Completion { .. } => Ok(()),
    }
}

/// Reads a manifest (with `~`/`$VAR` expansion) and builds its tree.
pub fn load_tree(manifest: &str) -> CliResult<Tree<Record>> {
    let path = expand_path(manifest);
    if !path.exists() {
        return Err(CliError::InvalidArgs(format!(
            "manifest does not exist: {}",
            path.display()
        )));
    }
    Ok(TreeManifest::load(&path)?.build()?)
}

#[instrument(skip(settings))]
fn _tree(settings: &Settings, manifest: &str, full: bool) -> CliResult<()> {
    let tree = load_tree(manifest)?;
    output::header(tree.tag());
    if full {
        output::info(&tree.to_tree_string(&settings.render).to_string().trim_end());
    } else {
        output::info(&tree.render(&settings.render));
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _list(settings: &Settings, manifest: &str, node: &str, backward: bool) -> CliResult<()> {
    let tree = load_tree(manifest)?;
    let direction = Direction::from_backward(backward);
    let records = node_records(&tree, node, direction)?;

    output::header(&format!("{} [{}] {}", tree.tag(), node, direction));
    if records.is_empty() {
        output::detail(&settings.render.empty_list);
    }
    for record in &records {
        output::detail(record);
    }
    Ok(())
}

/// Rendered records of the node at `node`, walked in `direction`.
pub fn node_records(tree: &Tree<Record>, node: &str, direction: Direction) -> CliResult<Vec<String>> {
    let node_id = resolve_node_path(tree, node)?;
    let info = tree.info(node_id)?;
    debug!(%node_id, %direction, records = info.len(), "listing node");

    let mut records = Vec::new();
    let _ = info.traverse(direction, |record| records.push(record.to_string()));
    Ok(records)
}

#[instrument]
fn _sync(
    manifest: &str,
    from: &str,
    kind: AggregateKind,
    attr: Option<String>,
    limit: Option<usize>,
) -> CliResult<()> {
    let aggregate = Aggregate::new(kind, attr)?;
    let tree = load_tree(manifest)?;

    output::header(&format!("{} by position ({:?})", tree.tag(), aggregate.kind()));
    for (position, value) in sync_rows(&tree, from, &aggregate, limit)? {
        output::action(&position.to_string(), &value);
    }
    Ok(())
}

/// One `(position, value)` row per position group below `from`.
///
/// Stops after `limit` positions; the first failing aggregate aborts the run.
pub fn sync_rows(
    tree: &Tree<Record>,
    from: &str,
    aggregate: &Aggregate,
    limit: Option<usize>,
) -> CliResult<Vec<(usize, String)>> {
    let start = resolve_node_path(tree, from)?;
    let mut rows = Vec::new();
    let flow = tree.sync_traverse(Some(start), |position, records| {
        if limit.is_some_and(|limit| position >= limit) {
            return ControlFlow::Break(None);
        }
        match aggregate.apply(position, records) {
            Ok(value) => {
                rows.push((position, value));
                ControlFlow::Continue(())
            }
            Err(e) => ControlFlow::Break(Some(e)),
        }
    })?;

    match break_value(flow) {
        Some(Some(e)) => Err(e.into()),
        Some(None) => {
            debug!(?limit, "stopped at position limit");
            Ok(rows)
        }
        None => Ok(rows),
    }
}

#[instrument]
fn _info(manifest: &str) -> CliResult<()> {
    let tree = load_tree(manifest)?;
    let longest = tree.iter().map(|(_, node)| node.info.len()).max().unwrap_or(0);

    output::header(tree.tag());
    output::action("nodes", &tree.node_count());
    output::action("height", &tree.height());
    output::action("leaves", &tree.leaves().len());
    output::action("longest list", &longest);
    output::action("positions", &tree.position_groups(None)?.len());
    Ok(())
}

fn _config(settings: &Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("no config directory on this platform"),
        },
    }
    Ok(())
}
