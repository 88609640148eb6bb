use advisor_model::{LeadRequest, ReportRenderer};
use advisor_pipeline::{AdvisorConfig, LeadPipeline};
use advisor_report::{extract_lines, PdfReportRenderer};
use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn lead_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("name")
            .long("name")
            .required(true)
            .help("Requester name"),
    )
    .arg(
        Arg::new("email")
            .long("email")
            .required(true)
            .help("Address the report is sent to"),
    )
    .arg(
        Arg::new("message")
            .long("message")
            .required(true)
            .help("What the requester is looking for"),
    )
    .arg(
        Arg::new("region")
            .long("region")
            .help("Preferred region"),
    )
    .arg(
        Arg::new("budget-min")
            .long("budget-min")
            .value_parser(value_parser!(u64))
            .help("Lower budget bound in AED"),
    )
    .arg(
        Arg::new("budget-max")
            .long("budget-max")
            .value_parser(value_parser!(u64))
            .help("Upper budget bound in AED"),
    )
}

fn lead_from(args: &ArgMatches) -> anyhow::Result<LeadRequest> {
    let field = |id: &str| {
        args.get_one::<String>(id)
            .cloned()
            .with_context(|| format!("--{id} is required"))
    };

    let mut lead = LeadRequest::new(field("name")?, field("email")?, field("message")?)
        .with_budget(
            args.get_one::<u64>("budget-min").copied(),
            args.get_one::<u64>("budget-max").copied(),
        );
    if let Some(region) = args.get_one::<String>("region") {
        lead = lead.with_region(region.as_str());
    }
    Ok(lead)
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

async fn submit(args: &ArgMatches) -> anyhow::Result<bool> {
    let path = args
        .get_one::<PathBuf>("config")
        .context("--config is required")?;
    let config = AdvisorConfig::load(path)?;
    let pipeline = LeadPipeline::from_config(&config)?;

    let outcome = pipeline.submit(lead_from(args)?).await;

    println!("Submission: {}", outcome.submission_id);
    match (outcome.failed_stage(), outcome.cause()) {
        (Some(stage), Some(cause)) => {
            println!("Status: FAILED at {stage}");
            println!("Cause: {cause}");
        }
        _ => println!("Status: DONE"),
    }
    if let Some(text) = &outcome.advisory_text {
        println!();
        println!("{text}");
    }
    if outcome.advice_undelivered() {
        eprintln!("warning: advice was generated but the report was not delivered");
    }

    Ok(outcome.is_done())
}

fn preview(args: &ArgMatches) -> anyhow::Result<()> {
    let advice_path = args
        .get_one::<PathBuf>("advice-file")
        .context("--advice-file is required")?;
    let out = args.get_one::<PathBuf>("out").context("--out is required")?;

    let lead = lead_from(args)?;
    lead.validate()?;
    let advice = std::fs::read_to_string(advice_path)
        .with_context(|| format!("failed to read {}", advice_path.display()))?;

    let artifact = PdfReportRenderer::new().render(&lead, &advice)?;
    std::fs::write(out, &artifact.bytes)
        .with_context(|| format!("failed to write {}", out.display()))?;

    println!("Wrote {} ({} bytes)", out.display(), artifact.len());
    println!();
    for line in extract_lines(&artifact.bytes)? {
        println!("{line}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Command::new("lead-advisor")
        .version(advisor_model::VERSION)
        .about("Real estate lead advisor: advise, log, render and email one inquiry")
        .subcommand_required(true)
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            lead_args(Command::new("submit").about("Run one lead through the full pipeline")).arg(
                Arg::new("config")
                    .long("config")
                    .required(true)
                    .value_parser(value_parser!(PathBuf))
                    .help("TOML configuration file"),
            ),
        )
        .subcommand(
            lead_args(
                Command::new("preview")
                    .about("Render a report locally without external calls"),
            )
            .arg(
                Arg::new("advice-file")
                    .long("advice-file")
                    .required(true)
                    .value_parser(value_parser!(PathBuf))
                    .help("File holding the advisory text"),
            )
            .arg(
                Arg::new("out")
                    .long("out")
                    .required(true)
                    .value_parser(value_parser!(PathBuf))
                    .help("Where to write the PDF"),
            ),
        );

    let matches = cli.get_matches();
    init_tracing(matches.get_flag("json"));

    match matches.subcommand() {
        Some(("submit", args)) => {
            let done = submit(args).await?;
            std::process::exit(if done { 0 } else { 1 });
        }
        Some(("preview", args)) => preview(args),
        _ => Ok(()),
    }
}
