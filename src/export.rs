//! Modem export
//!
//! Writes the modem list to `modems_export_<date>.<ext>`: CSV built from the
//! fixtures in mock mode, the server's export payload as JSON in live mode.

use crate::api::endpoints::MODEMS_EXPORT;
use crate::api::QueryParams;
use crate::context::AppContext;
use crate::error::{ImsError, IoResultExt, Result};
use crate::fixtures::Modem;
use crate::mode::DataMode;
use crate::notify::{Notification, Variant};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use std::path::{Path, PathBuf};

const CSV_HEADER: &str = "imei,model,brand,status,locationId,companyId,lastSeenAt";

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    /// File extension
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    /// Format produced in `mode`
    pub fn for_mode(mode: DataMode) -> Self {
        match mode {
            DataMode::Mock => ExportFormat::Csv,
            DataMode::Live => ExportFormat::Json,
        }
    }
}

/// A written export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub format: ExportFormat,
    /// Rows written, when the payload is a list
    pub records: Option<usize>,
}

/// `modems_export_YYYY-MM-DD.<ext>`
pub fn export_file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "modems_export_{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

fn csv_field(value: &str) -> String {
    if value.contains(|c: char| matches!(c, ',' | '"' | '\n')) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// CSV text for `modems`, one row each after a header
pub fn modems_to_csv(modems: &[Modem]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for modem in modems {
        let last_seen = modem
            .last_seen_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "Never".to_string());
        let row = [
            modem.imei.as_str(),
            modem.model.as_str(),
            modem.brand.as_str(),
            modem.status.as_str(),
            modem.location_id.as_deref().unwrap_or("N/A"),
            modem.company_id.as_deref().unwrap_or("N/A"),
            last_seen.as_str(),
        ]
        .map(csv_field)
        .join(",");
        out.push_str(&row);
        out.push('\n');
    }
    out
}

async fn render(ctx: &AppContext) -> Result<(ExportFormat, String, Option<usize>)> {
    let source = ctx.source();
    let format = ExportFormat::for_mode(source.mode());
    let response = source.get(MODEMS_EXPORT, &QueryParams::new()).await;

    match format {
        ExportFormat::Csv => {
            let modems: Vec<Modem> = response.decode().into_result("Export failed")?;
            Ok((format, modems_to_csv(&modems), Some(modems.len())))
        }
        ExportFormat::Json => {
            let payload: Value = response.into_result("Export failed")?;
            let records = payload.as_array().map(Vec::len);
            Ok((format, serde_json::to_string_pretty(&payload)?, records))
        }
    }
}

/// Export modems into `dir`, stamped with the current date
pub async fn export_modems(ctx: &AppContext, dir: &Path) -> Result<ExportOutcome> {
    export_modems_at(ctx, dir, Utc::now()).await
}

/// Export modems into `dir`, stamped with the date of `now`.
///
/// Sends "Export Successful" or a destructive "Export Failed" notification.
pub async fn export_modems_at(
    ctx: &AppContext,
    dir: &Path,
    now: DateTime<Utc>,
) -> Result<ExportOutcome> {
    let result = async {
        let (format, contents, records) = render(ctx).await?;
        if !dir.is_dir() {
            return Err(ImsError::Export(format!(
                "'{}' is not a directory",
                dir.display()
            )));
        }
        let path = dir.join(export_file_name(format, now.date_naive()));
        tokio::fs::write(&path, contents).await.with_path(&path)?;
        Ok::<_, ImsError>(ExportOutcome {
            path,
            format,
            records,
        })
    }
    .await;

    let notifier = ctx.notifier();
    match &result {
        Ok(outcome) => {
            tracing::info!("Exported modems to {}", outcome.path.display());
            notifier.notify(Notification::new(
                "Export Successful",
                "Modem data exported successfully",
                Variant::Default,
            ));
        }
        Err(e) => {
            tracing::warn!("Modem export failed: {}", e);
            notifier.notify(Notification::new(
                "Export Failed",
                e.to_string(),
                Variant::Destructive,
            ));
        }
    }
    result
}
