use chrono::Utc;
use clap::Args;
use provider_ops::auth::UserId;
use provider_ops::error::AppError;
use provider_ops::providers::{
    read_provider_csv, score_rows, write_provider_csv, BatchTally, ProviderRecord,
};
use provider_ops::validation::RiskLevel;
use std::fs::File;
use std::path::PathBuf;

const LOCAL_OWNER: &str = "local-cli";

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Provider directory CSV to score
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Write the scored export CSV to this path
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Only list rows that need review
    #[arg(long)]
    pub(crate) issues_only: bool,
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let ValidateArgs {
        input,
        output,
        issues_only,
    } = args;

    let rows = read_provider_csv(&input)?;
    let source = input
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string);
    let records = score_rows(
        &UserId(LOCAL_OWNER.to_string()),
        rows,
        source.as_deref(),
        Utc::now(),
    );

    println!(
        "{}",
        render_validation_report(source.as_deref(), &records, issues_only)
    );

    if let Some(path) = output {
        write_provider_csv(File::create(&path)?, &records)?;
        println!("\nExport written to {}", path.display());
    }

    Ok(())
}

pub(crate) fn render_validation_report(
    source: Option<&str>,
    records: &[ProviderRecord],
    issues_only: bool,
) -> String {
    let tally = BatchTally::from_records(records);
    let mut lines = vec![
        "Provider validation report".to_string(),
        format!("Source: {}", source.unwrap_or("(unnamed input)")),
        format!(
            "Rows scored: {} | Low {} | Medium {} | High {} | Needs review {}",
            tally.processed,
            tally.low_risk,
            tally.medium_risk,
            tally.high_risk,
            tally.requires_review()
        ),
        String::new(),
        format!(
            "{:>4}  {:<6}  {:>5}  {:<28}  {}",
            "Row", "Risk", "Score", "Provider", "Primary issue"
        ),
    ];

    for (index, record) in records.iter().enumerate() {
        if issues_only && record.risk_level() == RiskLevel::Low {
            continue;
        }
        let outcome = record.outcome();
        let name = if record.fields.provider_name.is_empty() {
            "(unnamed)"
        } else {
            record.fields.provider_name.as_str()
        };
        lines.push(format!(
            "{:>4}  {:<6}  {:>5.2}  {:<28}  {}",
            index + 1,
            outcome.risk_level.label(),
            outcome.confidence_score,
            name,
            outcome.primary_issue.as_deref().unwrap_or("-")
        ));
    }

    lines.join("\n")
}
