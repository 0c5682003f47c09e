use anyhow::{Context, Result, bail};
use cashier_core::{Category, SignPolicy};
use cashier_finance::{AggregateOptions, TransactionFilter, build_reports, export_reports};
use cashier_ingest::{Normalizer, parse_date_arg, read_table};
use clap::{Args, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;

mod config;
mod render;

use config::load_config;
use render::{Painter, RenderOptions, render_report, render_skipped};

#[derive(Parser, Debug)]
#[command(name = "cashier", version, about = "Poker cashier history reports")]
struct Cli {
    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize a cashier export per currency
    Report(ReportArgs),

    /// Show the category each label classifies to
    Classify {
        /// Raw transaction type labels
        #[arg(required = true)]
        labels: Vec<String>,

        /// Optional TOML config with extra [rules]
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the classification rules in priority order
    Rules {
        /// Optional TOML config with extra [rules]
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Cashier export (.csv, .xlsx, .xls, .ods)
    #[arg(short, long)]
    file: PathBuf,

    /// Column mapping file (.json or .toml)
    #[arg(long)]
    map_config: Option<PathBuf>,

    /// TOML config with [columns], [rules] and sign_policy
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only report this currency
    #[arg(long)]
    currency: Option<String>,

    /// First day included (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,

    /// Last day included (YYYY-MM-DD)
    #[arg(long)]
    to: Option<String>,

    /// Add a per-month table
    #[arg(long)]
    monthly: bool,

    /// Add totals for every category
    #[arg(long)]
    by_type: bool,

    /// Show the total of rows no rule matched
    #[arg(long)]
    show_unknown: bool,

    /// Write the report as CSV
    #[arg(long)]
    export: Option<PathBuf>,

    /// Print reports as JSON instead of tables
    #[arg(long)]
    json: bool,

    #[arg(long)]
    no_color: bool,

    /// by-category (default) or source
    #[arg(long)]
    sign_policy: Option<SignPolicy>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Report(args) => report(args)?,
        Command::Classify { labels, config } => {
            let classifier = load_config(config.as_deref())?.classifier()?;
            for label in &labels {
                println!("{label}\t{}", classifier.classify(label));
            }
        }
        Command::Rules { config } => {
            let classifier = load_config(config.as_deref())?.classifier()?;
            for (i, rule) in classifier.rules().iter().enumerate() {
                println!("{}. {:<12}{}", i + 1, rule.category.as_str(), rule.patterns.join(", "));
            }
            println!("   {:<12}(anything else)", Category::Unknown.as_str());
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn report(args: ReportArgs) -> Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let mapping = cfg.mapping(args.map_config.as_deref())?;
    let classifier = cfg.classifier()?;
    let policy = cfg.sign_policy(args.sign_policy);

    let from = date_arg("--from", args.from.as_deref())?;
    let to = date_arg("--to", args.to.as_deref())?;
    if let (Some(f), Some(t)) = (from, to) {
        if f > t {
            bail!("--from {f} is after --to {t}");
        }
    }

    let table =
        read_table(&args.file).with_context(|| format!("reading {}", args.file.display()))?;
    let normalized = Normalizer::run(&table, &mapping, &classifier, policy)
        .with_context(|| format!("mapping columns of {}", args.file.display()))?;

    if let Some(line) = render_skipped(&normalized.skipped) {
        eprintln!("{line}");
    }
    // A header-only export flows through as an empty report; rows that all
    // fail to parse are an error
    if normalized.transactions.is_empty() && !table.is_empty() {
        bail!(
            "no usable rows in {} ({} rows read)",
            args.file.display(),
            table.len()
        );
    }

    let filter = TransactionFilter::new(from, to, args.currency.as_deref());
    let options = AggregateOptions {
        monthly: args.monthly,
        by_type: args.by_type,
    };
    let reports = build_reports(&normalized.transactions, &filter, options);

    if reports.is_empty() {
        if args.json {
            println!("[]");
        } else {
            println!("No transactions match the given filters.");
        }
        return Ok(());
    }
    if reports.len() > 1 {
        eprintln!(
            "Several currencies found, reporting each separately: {}",
            reports
                .iter()
                .map(|r| r.currency.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&reports).context("serialize reports")?
        );
    } else {
        let painter = Painter {
            color: !args.no_color && std::io::stdout().is_terminal(),
        };
        let render_options = RenderOptions {
            show_unknown: args.show_unknown,
        };
        let blocks: Vec<String> = reports
            .iter()
            .map(|r| render_report(r, painter, render_options))
            .collect();
        print!("{}", blocks.join("\n"));
    }

    if let Some(base) = &args.export {
        for path in export_reports(base, &reports)? {
            eprintln!("Exported {}", path.display());
        }
    }

    Ok(())
}

fn date_arg(flag: &str, value: Option<&str>) -> Result<Option<chrono::NaiveDate>> {
    value
        .map(|v| parse_date_arg(v).with_context(|| format!("{flag} expects YYYY-MM-DD")))
        .transpose()
}
