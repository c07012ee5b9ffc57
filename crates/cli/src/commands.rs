//! Command definitions and execution.
//!
//! Every command reads from a [`PatientSource`] and returns the text to
//! print, so commands run the same way against a snapshot or an in-memory
//! store.

use std::path::PathBuf;

use anyhow::Context;
use carebook_model::{CustomFieldId, PatientDraft, PatientId, PatientStatus};
use carebook_search::{Dashboard, FieldQuery, PatientFilter, PatientQuery};
use carebook_store::PatientSource;
use chrono::Utc;
use clap::{Args, Subcommand};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{Config, OutputFormat};
use crate::output::{
    DashboardView, FieldTable, PatientDetail, PatientTable, ValidationReport, ValueList,
};

/// A `carebook` command.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Filter patients the way the search box does.
    Search(SearchArgs),
    /// Show status counts and the most recent patients.
    Dashboard(DashboardArgs),
    /// Show one patient with addresses and custom fields.
    Show(ShowArgs),
    /// List custom field definitions.
    Fields(FieldsArgs),
    /// List every value recorded for a custom field.
    Values(ValuesArgs),
    /// Check a patient draft file against the custom field definitions.
    Validate(ValidateArgs),
}

/// Arguments for `search`.
#[derive(Debug, Clone, Default, Args)]
pub struct SearchArgs {
    /// Free-text query matched against name, location, status and custom fields.
    pub query: Option<String>,

    /// Only list patients with this status.
    #[arg(long)]
    pub status: Option<String>,

    /// Only list patients whose names contain every term.
    #[arg(long)]
    pub name: Option<String>,

    /// Ordering expression, e.g. `last_name,-date_of_birth`.
    #[arg(long)]
    pub ordering: Option<String>,

    /// Maximum patients to list before filtering.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Patients to skip before filtering.
    #[arg(long, default_value = "0")]
    pub offset: usize,
}

/// Arguments for `dashboard`.
#[derive(Debug, Clone, Default, Args)]
pub struct DashboardArgs {
    /// Free-text query applied to the recent patients.
    #[arg(long)]
    pub query: Option<String>,
}

/// Arguments for `show`.
#[derive(Debug, Clone, Args)]
pub struct ShowArgs {
    /// Patient ID.
    pub id: u64,
}

/// Arguments for `fields`.
#[derive(Debug, Clone, Default, Args)]
pub struct FieldsArgs {
    /// Only list definitions whose names contain every term.
    #[arg(long)]
    pub search: Option<String>,

    /// Ordering expression, e.g. `-created_at`.
    #[arg(long)]
    pub ordering: Option<String>,
}

/// Arguments for `values`.
#[derive(Debug, Clone, Args)]
pub struct ValuesArgs {
    /// Custom field ID.
    pub field_id: u64,
}

/// Arguments for `validate`.
#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    /// Path to a patient draft in JSON.
    pub draft: PathBuf,
}

impl SearchArgs {
    fn to_query(&self) -> anyhow::Result<PatientQuery> {
        let mut query = PatientQuery::new().with_offset(self.offset);
        if let Some(status) = &self.status {
            let status: PatientStatus = status.parse()?;
            query = query.with_status(status);
        }
        if let Some(name) = &self.name {
            query = query.with_search(name.clone());
        }
        if let Some(ordering) = &self.ordering {
            query = query.with_ordering(ordering)?;
        }
        if let Some(limit) = self.limit {
            query = query.with_limit(limit);
        }
        Ok(query)
    }
}

/// What a command printed and whether it succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    /// Text to print on stdout.
    pub text: String,
    /// False when the command ran but found a problem, such as an invalid
    /// draft. The process exits non-zero.
    pub success: bool,
}

impl From<String> for Output {
    fn from(text: String) -> Self {
        Self {
            text,
            success: true,
        }
    }
}

/// Runs a command and returns its output.
pub async fn run(
    config: &Config,
    command: &Command,
    source: &dyn PatientSource,
) -> anyhow::Result<Output> {
    debug!(source = source.source_name(), command = ?command, "Running command");
    let output = match command {
        Command::Search(args) => search(config, args, source).await?,
        Command::Dashboard(args) => dashboard(config, args, source).await?,
        Command::Show(args) => show(config, args, source).await?,
        Command::Fields(args) => fields(config, args, source).await?,
        Command::Values(args) => values(config, args, source).await?,
        Command::Validate(args) => return validate(config, args, source).await,
    };
    Ok(output.into())
}

async fn search(
    config: &Config,
    args: &SearchArgs,
    source: &dyn PatientSource,
) -> anyhow::Result<String> {
    let page = source.list_patients(&args.to_query()?).await?;
    let query = args.query.as_deref().unwrap_or_default();
    let matches = PatientFilter::new(query).apply(&page.results);

    info!(
        listed = page.results.len(),
        total = page.count,
        matched = matches.len(),
        "Searched patients"
    );

    render(config.format, &matches, || {
        PatientTable::new(&matches, page.results.len()).to_string()
    })
}

async fn dashboard(
    config: &Config,
    args: &DashboardArgs,
    source: &dyn PatientSource,
) -> anyhow::Result<String> {
    let patients = source
        .list_patients(&PatientQuery::new())
        .await?
        .into_results();
    let query = args.query.as_deref().unwrap_or_default();
    let dashboard = Dashboard::build(&patients, config.recent, query);

    render(config.format, &dashboard, || {
        DashboardView::new(&dashboard, !PatientFilter::new(query).is_empty()).to_string()
    })
}

async fn show(config: &Config, args: &ShowArgs, source: &dyn PatientSource) -> anyhow::Result<String> {
    let patient = source
        .get_patient(PatientId::new(args.id))
        .await
        .with_context(|| format!("Failed to load patient {}", args.id))?;

    let today = Utc::now().date_naive();
    render(config.format, &patient, || {
        PatientDetail::new(&patient, today).to_string()
    })
}

async fn fields(
    config: &Config,
    args: &FieldsArgs,
    source: &dyn PatientSource,
) -> anyhow::Result<String> {
    let mut query = FieldQuery::new();
    if let Some(search) = &args.search {
        query = query.with_search(search.clone());
    }
    if let Some(ordering) = &args.ordering {
        query = query.with_ordering(ordering)?;
    }
    let page = source.list_custom_fields(&query).await?;

    render(config.format, &page.results, || {
        FieldTable::new(&page.results).to_string()
    })
}

async fn values(
    config: &Config,
    args: &ValuesArgs,
    source: &dyn PatientSource,
) -> anyhow::Result<String> {
    let id = CustomFieldId::new(args.field_id);
    let field = source
        .get_custom_field(id)
        .await
        .with_context(|| format!("Failed to load custom field {}", args.field_id))?;
    let values = source.custom_field_values(id).await?;

    render(config.format, &values, || {
        ValueList::new(&field, &values).to_string()
    })
}

#[derive(Serialize)]
struct ValidationOutcome {
    valid: bool,
    issues: Vec<String>,
}

async fn validate(
    config: &Config,
    args: &ValidateArgs,
    source: &dyn PatientSource,
) -> anyhow::Result<Output> {
    let text = tokio::fs::read_to_string(&args.draft)
        .await
        .with_context(|| format!("Failed to read {}", args.draft.display()))?;
    let draft: PatientDraft = serde_json::from_str(&text)
        .with_context(|| format!("Failed to decode {}", args.draft.display()))?;
    let definitions = source
        .list_custom_fields(&FieldQuery::new())
        .await?
        .into_results();

    let errors = draft.validate(&definitions).err();
    let outcome = ValidationOutcome {
        valid: errors.is_none(),
        issues: errors
            .iter()
            .flat_map(|e| e.issues().iter().map(ToString::to_string))
            .collect(),
    };
    let text = render(config.format, &outcome, || {
        ValidationReport::new(errors.as_ref()).to_string()
    })?;

    info!(path = %args.draft.display(), valid = outcome.valid, "Validated draft");
    Ok(Output {
        text,
        success: outcome.valid,
    })
}

fn render<T: Serialize + ?Sized>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce() -> String,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(text()),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value).context("Failed to encode output")?;
            Ok(json + "\n")
        }
    }
}
