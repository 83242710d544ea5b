use anyhow::Result;
use fba_profit_calc::core::export::{export_report, ExportFormat, CSV_FILENAME, JSON_FILENAME};
use fba_profit_calc::{AppConfig, Inputs, LocalStorage, ProfitEngine};
use std::io::Read;
use tempfile::TempDir;

fn sample() -> Inputs {
    Inputs {
        product_cost: 12.0,
        selling_price: 34.99,
        referral_fee: 5.25,
        fba_fee: 5.4,
        shipping_cost: 1.1,
        ppc_budget: 2.0,
        other_fees: 0.5,
    }
}

#[tokio::test]
async fn test_export_all_formats_to_configured_directory() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().join("reports");
    let normalized_path = output_path.to_string_lossy().replace('\\', "/");

    let config = AppConfig::from_toml_str(&format!(
        r#"
[export]
output_path = "{}"
"#,
        normalized_path
    ))?;
    let storage = LocalStorage::new(config.output_path());

    let evaluation = ProfitEngine::new().run(sample(), None)?;
    assert!(evaluation.log_task.is_none());

    for format in [ExportFormat::Json, ExportFormat::Csv, ExportFormat::Bundle] {
        let filename = export_report(&storage, &evaluation.report, format).await?;
        assert!(output_path.join(filename).exists(), "{} missing", filename);
    }

    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(output_path.join(JSON_FILENAME))?)?;
    assert_eq!(json["inputs"]["sellingPrice"], 34.99);
    assert!(json["advice"].as_array().is_some_and(|a| !a.is_empty()));

    let zip_data = std::fs::read(output_path.join("report.zip"))?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;
    assert_eq!(archive.len(), 2);

    let mut csv_content = String::new();
    archive.by_name(CSV_FILENAME)?.read_to_string(&mut csv_content)?;
    assert!(csv_content.starts_with("field,value"));
    assert!(csv_content.contains("sellingPrice,34.99"));
    Ok(())
}
