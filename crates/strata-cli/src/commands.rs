use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use serde::Serialize;
use strata_filter::{FilterRegistry, PipelineReport, PipelineScript};
use strata_payload::DataStore;
use strata_structure::{
    DataId, DataPath, DataStructure, EventKind, EventLog, StructureConfig,
};
use tracing::debug;

use crate::cli::*;

const EVENT_KINDS: [EventKind; 5] = [
    EventKind::Added,
    EventKind::Removed,
    EventKind::Reparented,
    EventKind::Detached,
    EventKind::Renamed,
];

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    let config = cli.config;
    match cli.command {
        Command::Run(args) => cmd_run(&args.script, config.as_deref(), format),
        Command::Check(args) => cmd_check(&args.script, config.as_deref(), format),
        Command::Filters(args) => cmd_filters(args.query.as_deref(), format),
        Command::Demo => cmd_demo(config.as_deref(), format),
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Store settings: the `--config` file when given, replaced by the script's
/// own `[structure]` table when it has one.
fn load_config(path: Option<&Path>, script: Option<&PipelineScript>) -> anyhow::Result<StructureConfig> {
    if let Some(structure) = script.and_then(|s| s.structure.clone()) {
        return Ok(structure);
    }
    let Some(path) = path else {
        return Ok(StructureConfig::default());
    };
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = StructureConfig::from_toml_str(&input)
        .with_context(|| format!("parsing config {}", path.display()))?;
    debug!(path = %path.display(), ?config, "loaded structure config");
    Ok(config)
}

fn load_script(path: &Path) -> anyhow::Result<PipelineScript> {
    PipelineScript::from_path(path).with_context(|| format!("loading script {}", path.display()))
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ObjectSummary {
    id: DataId,
    name: String,
    kind: String,
    parents: Vec<DataId>,
    path: Option<String>,
    path_count: u64,
}

#[derive(Debug, Serialize)]
struct GraphSummary {
    objects: Vec<ObjectSummary>,
    events: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<PipelineReport>,
}

impl GraphSummary {
    fn new(data: &DataStructure, log: &EventLog, report: Option<PipelineReport>) -> Self {
        let objects = data
            .ids()
            .into_iter()
            .filter_map(|id| data.get_data(id))
            .map(|object| ObjectSummary {
                id: object.id(),
                name: object.name().to_string(),
                kind: object.kind().label(),
                parents: data.parents_of(object.id()),
                path: data.primary_path(object.id()).map(|p| p.to_string()),
                path_count: data.path_count(object.id()),
            })
            .collect();
        Self {
            objects,
            events: event_counts(log),
            report,
        }
    }
}

fn event_counts(log: &EventLog) -> BTreeMap<String, usize> {
    EVENT_KINDS
        .iter()
        .map(|kind| (kind.to_string(), log.count(*kind)))
        .collect()
}

/// Indented listing of the graph. A shared object is expanded under the
/// first parent that reaches it; later parents list it by id only.
fn render_tree(data: &DataStructure) -> Vec<String> {
    fn walk(
        data: &DataStructure,
        id: DataId,
        depth: usize,
        seen: &mut HashSet<DataId>,
        lines: &mut Vec<String>,
    ) {
        let Some(object) = data.get_data(id) else {
            return;
        };
        let indent = "  ".repeat(depth);
        if !seen.insert(id) {
            lines.push(format!("{indent}{} {id} [shared, listed above]", object.name()));
            return;
        }
        let shared = data.parents_of(id).len() > 1;
        lines.push(format!(
            "{indent}{} {id} {}{}",
            object.name(),
            object.kind().label(),
            if shared { " [shared]" } else { "" },
        ));
        for child in data.children_of(id) {
            walk(data, child, depth + 1, seen, lines);
        }
    }

    let mut seen = HashSet::new();
    let mut lines = Vec::new();
    for root in data.roots() {
        walk(data, root, 0, &mut seen, &mut lines);
    }
    lines
}

fn print_graph(data: &DataStructure, log: &EventLog) {
    println!("{} ({} objects)", "Graph".bold(), data.len());
    for line in render_tree(data) {
        println!("  {line}");
    }
    let counts = event_counts(log)
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .map(|(kind, n)| format!("{kind}={n}"))
        .collect::<Vec<_>>();
    if counts.is_empty() {
        println!("Events: none");
    } else {
        println!("Events: {}", counts.join(" "));
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_run(script_path: &Path, config: Option<&Path>, format: OutputFormat) -> anyhow::Result<()> {
    let script = load_script(script_path)?;
    let pipeline = script.build(&FilterRegistry::with_builtin_filters())?;
    let mut data = DataStructure::with_config(load_config(config, Some(&script))?);
    let log = EventLog::new();
    data.add_observer(log.clone());

    let report = pipeline
        .execute(&mut data)
        .with_context(|| format!("running {}", script_path.display()))?;

    match format {
        OutputFormat::Json => print_json(&GraphSummary::new(&data, &log, Some(report))),
        OutputFormat::Text => {
            for step in &report.steps {
                println!(
                    "{} [{}] {} ({:?})",
                    "✓".green().bold(),
                    step.index,
                    step.filter.cyan(),
                    step.elapsed
                );
                for warning in &step.preflight.warnings {
                    println!("    {} {warning}", "warning:".yellow());
                }
            }
            print_graph(&data, &log);
            Ok(())
        }
    }
}

fn cmd_check(script_path: &Path, config: Option<&Path>, format: OutputFormat) -> anyhow::Result<()> {
    let script = load_script(script_path)?;
    let pipeline = script.build(&FilterRegistry::with_builtin_filters())?;
    let data = DataStructure::with_config(load_config(config, Some(&script))?);
    let report = pipeline.preflight(&data)?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => {
            for step in &report.steps {
                let mark = if step.preflight.is_valid() {
                    "✓".green().bold()
                } else {
                    "✗".red().bold()
                };
                println!("{mark} [{}] {}", step.index, step.filter.cyan());
                for warning in &step.preflight.warnings {
                    println!("    {} {warning}", "warning:".yellow());
                }
                for error in &step.preflight.errors {
                    println!("    {} {error}", "error:".red());
                }
            }
            println!(
                "{} of {} steps checked, {} warnings, {} errors",
                report.steps.len(),
                pipeline.len(),
                report.warning_count(),
                report.error_count()
            );
        }
    }

    if !report.is_valid() {
        bail!("{} failed preflight", script_path.display());
    }
    Ok(())
}

fn cmd_filters(query: Option<&str>, format: OutputFormat) -> anyhow::Result<()> {
    let registry = FilterRegistry::with_builtin_filters();
    let filters = match query {
        Some(q) => registry.search(q),
        None => registry.list(),
    };
    match format {
        OutputFormat::Json => print_json(&filters),
        OutputFormat::Text => {
            if filters.is_empty() {
                println!("No matching filters.");
            }
            for info in filters {
                println!("  {:<16} {}", info.name.cyan(), info.human_name);
            }
            Ok(())
        }
    }
}

/// Build `Foo/{Bar1,Bar2}` with one array shared by both groups.
fn build_demo(config: StructureConfig) -> anyhow::Result<(DataStructure, EventLog)> {
    let mut data = DataStructure::with_config(config);
    let log = EventLog::new();
    data.add_observer(log.clone());

    let foo = data.create_group("Foo", None)?;
    let bar1 = data.create_group("Bar1", Some(foo))?;
    let bar2 = data.create_group("Bar2", Some(foo))?;
    let values = DataStore::from_vec(1, vec![1.0f64, 2.0, 3.0])?;
    let bazz = data.create_array("Bazz", values, Some(bar1))?;
    data.add_additional_parent(bazz, bar2)?;
    Ok((data, log))
}

fn cmd_demo(config: Option<&Path>, format: OutputFormat) -> anyhow::Result<()> {
    let (mut data, log) = build_demo(load_config(config, None)?)?;
    let bar1 = DataPath::new(["Foo", "Bar1"]);
    let bar2 = DataPath::new(["Foo", "Bar2"]);
    let bazz = data
        .get_id(&DataPath::new(["Foo", "Bar2", "Bazz"]))
        .context("demo graph is missing Bazz")?;

    if format == OutputFormat::Text {
        print_graph(&data, &log);
    }

    let first = data.remove_data_at(&bar1)?;
    let survived = !first.was_removed(bazz);
    let second = data.remove_data_at(&bar2)?;

    match format {
        OutputFormat::Json => print_json(&GraphSummary::new(&data, &log, None)),
        OutputFormat::Text => {
            println!(
                "\nRemoved {}: {} objects erased, Bazz {}",
                bar1.to_string().yellow(),
                first.removed_count(),
                if survived { "still reachable via Bar2".green() } else { "gone".red() }
            );
            println!(
                "Removed {}: {} objects erased",
                bar2.to_string().yellow(),
                second.removed_count()
            );
            print_graph(&data, &log);
            Ok(())
        }
    }
}
