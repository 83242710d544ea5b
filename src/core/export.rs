use crate::domain::model::Report;
use crate::domain::ports::Storage;
use crate::utils::error::{CalcError, Result};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const JSON_FILENAME: &str = "report.json";
pub const CSV_FILENAME: &str = "report.csv";
pub const BUNDLE_FILENAME: &str = "report.zip";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Bundle,
}

impl ExportFormat {
    pub fn filename(&self) -> &'static str {
        match self {
            ExportFormat::Json => JSON_FILENAME,
            ExportFormat::Csv => CSV_FILENAME,
            ExportFormat::Bundle => BUNDLE_FILENAME,
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "zip" | "bundle" => Ok(ExportFormat::Bundle),
            other => Err(CalcError::InvalidConfigValueError {
                field: "format".to_string(),
                value: other.to_string(),
                reason: "Unsupported format. Valid formats: json, csv, zip".to_string(),
            }),
        }
    }
}

pub fn report_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// `field,value` 兩欄格式，建議訊息以 advice_N 列出
pub fn report_csv(report: &Report) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["field", "value"])?;
    writer.write_record(["generatedAt", report.generated_at.to_rfc3339().as_str()])?;

    for (name, value) in report.inputs.fields() {
        writer.write_record([name, value.to_string().as_str()])?;
    }

    let results = &report.results;
    let break_even = if results.has_finite_break_even() {
        results.break_even_units.to_string()
    } else {
        String::new()
    };
    writer.write_record(["totalCosts", results.total_costs.to_string().as_str()])?;
    writer.write_record(["netProfit", results.net_profit.to_string().as_str()])?;
    writer.write_record(["profitMargin", format!("{:.2}", results.profit_margin).as_str()])?;
    writer.write_record(["breakEvenUnits", break_even.as_str()])?;

    for (i, advice) in report.advice.iter().enumerate() {
        writer.write_record([format!("advice_{}", i + 1), advice.message.clone()])?;
    }

    if let Some(link) = &report.share_link {
        writer.write_record(["shareLink", link.as_str()])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CalcError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| CalcError::ConfigError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

pub fn report_bundle(report: &Report) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    zip.start_file::<_, ()>(JSON_FILENAME, FileOptions::default())?;
    zip.write_all(report_json(report)?.as_bytes())?;

    zip.start_file::<_, ()>(CSV_FILENAME, FileOptions::default())?;
    zip.write_all(report_csv(report)?.as_bytes())?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// 產生指定格式並交給 Storage 寫出，回傳檔名
pub async fn export_report<S: Storage>(
    storage: &S,
    report: &Report,
    format: ExportFormat,
) -> Result<&'static str> {
    let data = match format {
        ExportFormat::Json => report_json(report)?.into_bytes(),
        ExportFormat::Csv => report_csv(report)?.into_bytes(),
        ExportFormat::Bundle => report_bundle(report)?,
    };

    let filename = format.filename();
    tracing::debug!("Exporting {:?} report ({} bytes)", format, data.len());
    storage.write_file(filename, &data).await?;
    Ok(filename)
}
