mod output;
mod source;

use anyhow::{Context, Result};
use assessor_core::{
    AssessmentCatalog, AssessmentData, Assessor, CatalogError, ReportFormat, Selection,
};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use log::debug;
use std::io::Write;
use std::path::PathBuf;

use output::{Destination, OutputTarget, RenderedReport};
use source::DirectorySource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Full text report with comments and ballot counts
    Human,
    /// Text report without comments or ballot counts
    Short,
    /// Structured JSON report
    Json,
    /// Coin rewards for adopted proposals
    Rewards,
}

impl From<FormatArg> for ReportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Human => Self::Human,
            FormatArg::Short => Self::Short,
            FormatArg::Json => Self::Json,
            FormatArg::Rewards => Self::Rewards,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "assessor", version = "0.1.0")]
#[command(about = "Resolve nomic proposal assessments and write their reports")]
struct Args {
    /// Assessments to resolve, by name, or `all`
    #[arg(default_value = "all")]
    selections: Vec<String>,

    /// Directory holding the assessment definitions (*.json)
    #[arg(long, default_value = "assessments")]
    assessments_dir: PathBuf,

    /// Report format
    #[arg(long, value_enum, default_value_t = FormatArg::Human)]
    format: FormatArg,

    /// Write every report into this one file
    #[arg(long, conflicts_with = "output_dir")]
    output: Option<PathBuf>,

    /// Write one file per assessment into this directory
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// List the known assessments and exit
    #[arg(long)]
    list: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn destination(&self, format: ReportFormat) -> Destination {
        if let Some(path) = &self.output {
            Destination::File(path.clone())
        } else if let Some(dir) = &self.output_dir {
            Destination::Directory {
                dir: dir.clone(),
                extension: format.extension(),
            }
        } else {
            Destination::Stdout
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let assessor = Assessor::new(DirectorySource::new(&args.assessments_dir));
    let catalog = assessor.load_catalog().with_context(|| {
        format!(
            "loading assessments from {}",
            args.assessments_dir.display()
        )
    })?;

    if args.list {
        return list_assessments(&catalog);
    }

    announce_banner();

    let selected = match select(&catalog, &args.selections) {
        Ok(selected) => selected,
        Err(err) => {
            eprintln!("{} {err}", "✗".red().bold());
            std::process::exit(1);
        }
    };

    let format = ReportFormat::from(args.format);
    let mut reports = Vec::with_capacity(selected.len());
    for data in selected {
        debug!("assessing {}", data.name());
        let body = assessor
            .assess(data, format)
            .with_context(|| format!("assessing {}", data.name()))?;
        reports.push(RenderedReport {
            name: data.name().to_string(),
            body,
        });
    }

    for path in args.destination(format).write(&reports)? {
        eprintln!("{} wrote {}", "✓".green(), path.display());
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn announce_banner() {
    eprintln!("{}", "⚖ Assessor".bright_cyan().bold());
    eprintln!("{}", "==========".cyan());
}

fn list_assessments(catalog: &AssessmentCatalog) -> Result<()> {
    let mut target = OutputTarget::new(None)?;
    writeln!(target, "Available assessments:")?;
    for name in catalog.names() {
        writeln!(target, "  {name}")?;
    }
    target.flush()?;
    Ok(())
}

/// Resolve the selection arguments against the catalog, keeping first-seen
/// order and dropping repeats.
fn select<'a>(
    catalog: &'a AssessmentCatalog,
    selections: &[String],
) -> Result<Vec<&'a AssessmentData>, CatalogError> {
    let mut selected: Vec<&AssessmentData> = Vec::new();
    for text in selections {
        for data in catalog.select(&Selection::parse(text))? {
            if !selected.iter().any(|seen| seen.name() == data.name()) {
                selected.push(data);
            }
        }
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assessor_core::parse_assessment;

    fn base_args() -> Args {
        Args {
            selections: vec!["all".to_string()],
            assessments_dir: PathBuf::from("assessments"),
            format: FormatArg::Human,
            output: None,
            output_dir: None,
            list: false,
            verbose: false,
        }
    }

    fn catalog() -> AssessmentCatalog {
        let definitions = ["a", "b"].map(|name| {
            parse_assessment(&format!(
                r#"{{ "name": "{name}", "quorum": 1, "strengths": {{ "default": 1 }} }}"#
            ))
            .unwrap()
        });
        AssessmentCatalog::from_assessments(definitions).unwrap()
    }

    #[test]
    fn destination_follows_output_flags() {
        let mut args = base_args();
        assert_eq!(args.destination(ReportFormat::Json), Destination::Stdout);
        args.output_dir = Some(PathBuf::from("out"));
        assert_eq!(
            args.destination(ReportFormat::Json),
            Destination::Directory {
                dir: PathBuf::from("out"),
                extension: "json",
            }
        );
        args.output = Some(PathBuf::from("all.txt"));
        assert_eq!(
            args.destination(ReportFormat::Human),
            Destination::File(PathBuf::from("all.txt"))
        );
    }

    #[test]
    fn selection_drops_repeats() {
        let catalog = catalog();
        let names: Vec<&str> = select(&catalog, &["b".to_string(), "all".to_string()])
            .unwrap()
            .into_iter()
            .map(AssessmentData::name)
            .collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn unknown_selection_is_reported() {
        let err = select(&catalog(), &["zzz".to_string()]).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownAssessment { .. }));
    }

    #[test]
    fn output_flags_conflict() {
        let parsed = Args::try_parse_from(["assessor", "--output", "a", "--output-dir", "b"]);
        assert!(parsed.is_err());
    }
}
