//! `confplan` batch driver

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use confplan_core::{
    BaselineSequencer, ConfigurationStore, CostMode, CostModel, CostReporter, Planner,
    PlannerConfig, Sequence, Sequencer, SequencerKind,
};
use confplan_io::{
    assign_uuids, load_config, load_costs, load_requirements, load_tests, raw_definitions,
    sequence_document, store_from_entries, uuid_index, write_json, CostReportDocument,
    PlanSummaryDocument, UuidIndex,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn file_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help(help)
}

fn cli() -> Command {
    Command::new("confplan")
        .version(confplan_core::VERSION)
        .about("Test configuration planner")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Planner configuration (TOML)"),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .global(true)
                .value_parser(["absolute", "relative"])
                .help("Cost accounting mode"),
        )
        .arg(
            Arg::new("sequencer")
                .long("sequencer")
                .global(true)
                .value_parser(["greedy", "baseline"])
                .help("Ordering used for the optimized plan"),
        )
        .arg(
            Arg::new("no-closing-retract")
                .long("no-closing-retract")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Leave the closing retract out of relative totals"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("generate")
                .about("Build raw test definitions from requirements")
                .arg(file_arg("requirements", "Requirement bindings or list"))
                .arg(file_arg("output", "Raw definitions file to write"))
                .arg(
                    Arg::new("allow-empty")
                        .long("allow-empty")
                        .action(ArgAction::SetTrue)
                        .help("Write an empty collection instead of failing"),
                )
                .arg(
                    Arg::new("assign-uuids")
                        .long("assign-uuids")
                        .action(ArgAction::SetTrue)
                        .help("Give every configuration a random UUID"),
                ),
        )
        .subcommand(
            Command::new("baseline")
                .about("Write the store-order sequence document")
                .arg(file_arg("tests", "Raw definitions or sequence document"))
                .arg(file_arg("output", "Sequence document to write")),
        )
        .subcommand(
            Command::new("optimize")
                .about("Write the optimized sequence document")
                .arg(file_arg("tests", "Raw definitions or sequence document"))
                .arg(file_arg("costs", "Scenario and observation costs"))
                .arg(file_arg("output", "Sequence document to write")),
        )
        .subcommand(
            Command::new("costs")
                .about("Report the costs of a sequence in file order")
                .arg(file_arg("tests", "Raw definitions or sequence document"))
                .arg(file_arg("costs", "Scenario and observation costs"))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                )
                .arg(
                    Arg::new("by-cost")
                        .long("by-cost")
                        .action(ArgAction::SetTrue)
                        .help("Sort the step table by combined cost"),
                ),
        )
        .subcommand(
            Command::new("plan")
                .about("Generate, sequence and summarise in one run")
                .arg(file_arg("requirements", "Requirement bindings or list"))
                .arg(file_arg("costs", "Scenario and observation costs"))
                .arg(file_arg("output-dir", "Directory for all outputs"))
                .arg(
                    Arg::new("allow-empty")
                        .long("allow-empty")
                        .action(ArgAction::SetTrue)
                        .help("Continue with an empty collection instead of failing"),
                )
                .arg(
                    Arg::new("assign-uuids")
                        .long("assign-uuids")
                        .action(ArgAction::SetTrue)
                        .help("Give every configuration a random UUID"),
                ),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn path<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a Path> {
    args.get_one::<PathBuf>(name)
        .map(PathBuf::as_path)
        .with_context(|| format!("--{name} is required"))
}

/// Config file first, then flag overrides
fn planner_config(args: &ArgMatches) -> Result<PlannerConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(file) => load_config(file)
            .with_context(|| format!("loading configuration {}", file.display()))?,
        None => PlannerConfig::default(),
    };
    if let Some(mode) = args.get_one::<String>("mode") {
        config = config.with_cost_mode(mode.parse::<CostMode>()?);
    }
    if let Some(kind) = args.get_one::<String>("sequencer") {
        config = config.with_sequencer(kind.parse::<SequencerKind>()?);
    }
    if args.get_flag("no-closing-retract") {
        config = config.with_closing_retract(false);
    }
    Ok(config)
}

fn costs(args: &ArgMatches) -> Result<Arc<CostModel>> {
    let file = path(args, "costs")?;
    let model = load_costs(file).with_context(|| format!("loading costs {}", file.display()))?;
    Ok(Arc::new(model))
}

fn build_store(args: &ArgMatches) -> Result<ConfigurationStore> {
    let file = path(args, "requirements")?;
    let records = load_requirements(file)
        .with_context(|| format!("loading requirements {}", file.display()))?;
    let store = Planner::build_store(&records)?;
    if !args.get_flag("allow-empty") {
        store.ensure_non_empty()?;
    }
    Ok(store)
}

fn load_store(args: &ArgMatches) -> Result<(ConfigurationStore, UuidIndex)> {
    let file = path(args, "tests")?;
    let entries = load_tests(file).with_context(|| format!("loading tests {}", file.display()))?;
    let store = store_from_entries(&entries)
        .with_context(|| format!("reading tests {}", file.display()))?;
    Ok((store, uuid_index(&entries)))
}

fn uuids_for(args: &ArgMatches, store: &ConfigurationStore) -> Option<UuidIndex> {
    args.get_flag("assign-uuids").then(|| assign_uuids(store))
}

fn print_comparison(
    reporter: &CostReporter<'_>,
    baseline: &Sequence,
    optimized: &Sequence,
    mode: CostMode,
) {
    let comparison = reporter.compare(baseline, optimized, mode);
    println!("Configurations: {}", comparison.baseline.configurations);
    println!("Mode: {mode}");
    println!(
        "  Baseline:  {} (closing retract {})",
        comparison.baseline.combined_cost, comparison.baseline.closing_retract_cost
    );
    println!(
        "  Optimized: {} (closing retract {})",
        comparison.optimized.combined_cost, comparison.optimized.closing_retract_cost
    );
    println!("  Savings:   {}", comparison.combined_savings());
}

fn generate(args: &ArgMatches) -> Result<()> {
    let store = build_store(args)?;
    let uuids = uuids_for(args, &store);
    let output = path(args, "output")?;
    write_json(output, &raw_definitions(&store, uuids.as_ref()))?;
    println!("Wrote {} configurations to {}", store.len(), output.display());
    Ok(())
}

fn sequence_into(args: &ArgMatches, sequencer: &dyn Sequencer) -> Result<()> {
    let (store, uuids) = load_store(args)?;
    // `baseline` takes no cost table
    let costs = match args.try_get_one::<PathBuf>("costs") {
        Ok(Some(_)) => costs(args)?,
        _ => Arc::new(CostModel::new()),
    };
    let sequence = sequencer.sequence(&store, &costs);
    let output = path(args, "output")?;
    write_json(output, &sequence_document(&sequence, Some(&uuids)))?;
    println!(
        "Wrote {} sequence of {} configurations to {}",
        sequencer.name(),
        sequence.len(),
        output.display()
    );
    Ok(())
}

fn report_costs(args: &ArgMatches, config: &PlannerConfig) -> Result<()> {
    let (store, _) = load_store(args)?;
    let costs = costs(args)?;
    let reporter = CostReporter::new(&costs).with_closing_retract(config.include_closing_retract);
    let sequence = Sequence::from_order(store.configurations().iter().cloned());
    let mode = config.cost_mode;

    if args.get_flag("json") {
        let report = CostReportDocument::new(&reporter, &sequence, mode);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let steps = if args.get_flag("by-cost") {
        reporter.steps_by_cost(&sequence, mode)
    } else {
        reporter.steps(&sequence, mode)
    };
    println!("Cost Report ({mode})");
    println!("=================");
    println!(
        "{:>5} {:>8} {:>8} {:>8} {:>8} {:>10} {:>10}",
        "pos", "config", "apply", "retract", "combined", "observe", "cumulative"
    );
    for step in &steps {
        println!(
            "{:>5} {:>8} {:>8} {:>8} {:>8} {:>10} {:>10}",
            step.position,
            step.configuration.to_string(),
            step.apply,
            step.retract,
            step.combined,
            step.observation,
            step.cumulative
        );
    }
    let summary = reporter.summary(&sequence, mode);
    println!();
    println!("Apply:           {}", summary.apply_cost);
    println!("Retract:         {}", summary.retract_cost);
    println!("Closing retract: {}", summary.closing_retract_cost);
    println!("Combined:        {}", summary.combined_cost);
    println!("Observation:     {}", summary.observation_cost);
    Ok(())
}

fn plan(args: &ArgMatches, config: PlannerConfig) -> Result<()> {
    let store = Arc::new(build_store(args)?);
    let uuids = uuids_for(args, &store);
    let planner = Planner::new(costs(args)?).with_config(config);
    let run = planner.plan_store(Arc::clone(&store));

    let dir = path(args, "output-dir")?;
    let reporter = planner.reporter();
    write_json(&dir.join("tests_raw_def.json"), &raw_definitions(&store, uuids.as_ref()))?;
    write_json(
        &dir.join("tests_unoptimized_def.json"),
        &sequence_document(run.baseline(), uuids.as_ref()),
    )?;
    write_json(
        &dir.join("tests_optimized_def.json"),
        &sequence_document(run.optimized(), uuids.as_ref()),
    )?;
    write_json(
        &dir.join("summary_unoptimized.json"),
        &PlanSummaryDocument::from_sequence(&reporter, run.baseline()),
    )?;
    write_json(
        &dir.join("summary_optimized.json"),
        &PlanSummaryDocument::from_sequence(&reporter, run.optimized()),
    )?;

    print_comparison(&reporter, run.baseline(), run.optimized(), config.cost_mode);
    println!("Outputs written to {}", dir.display());
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<()> {
    let Some((name, args)) = matches.subcommand() else {
        return Ok(());
    };
    let config = planner_config(args)?;
    tracing::debug!("Running {} with {:?}", name, config);

    match name {
        "generate" => generate(args),
        "baseline" => sequence_into(args, &BaselineSequencer::new()),
        "optimize" => sequence_into(args, config.sequencer.build().as_ref()),
        "costs" => report_costs(args, &config),
        "plan" => plan(args, config),
        other => anyhow::bail!("unknown command '{other}'"),
    }
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));
    run(&matches)
}
