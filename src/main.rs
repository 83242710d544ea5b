use clap::Parser;
use fba_profit_calc::config::{AppConfig, CliConfig, Command, LogFormat};
use fba_profit_calc::core::chart::{cost_breakdown, default_price_range, profit_curve};
use fba_profit_calc::core::export::{export_report, ExportFormat};
use fba_profit_calc::core::session::{run_debounced, Outcome, Session};
use fba_profit_calc::core::share::{decode_state_from_url, encode_state_to_url_str};
use fba_profit_calc::utils::error::{CalcError, ErrorSeverity};
use fba_profit_calc::utils::{logger, validation::Validate};
use fba_profit_calc::{Inputs, LocalStorage, ProfitEngine, Report};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

// 背景紀錄寫入最多等這麼久，逾時就放棄
const LOG_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = cli.validate() {
        exit_with(&e);
    }

    let app_config = match load_app_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    if let Err(e) = run(cli.command, &app_config).await {
        exit_with(&e);
    }

    Ok(())
}

fn load_app_config(path: Option<&str>) -> fba_profit_calc::Result<AppConfig> {
    let config = match path {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            AppConfig::from_file(path)?
        }
        None => AppConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn exit_with(e: &CalcError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

async fn evaluate_and_print(
    config: &AppConfig,
    inputs: Inputs,
    email: Option<String>,
    with_sink: bool,
) -> fba_profit_calc::Result<()> {
    let engine = ProfitEngine::from_config(config, with_sink)?;
    let evaluation = engine.run(inputs, email)?;
    print_report(&evaluation.report);

    if let Some(task) = evaluation.log_task {
        if tokio::time::timeout(LOG_FLUSH_TIMEOUT, task).await.is_err() {
            tracing::warn!("⚠️ Logging sink did not respond in time, giving up");
        }
    }
    Ok(())
}

async fn run(command: Command, config: &AppConfig) -> fba_profit_calc::Result<()> {
    match command {
        Command::Calc {
            inputs,
            email,
            no_log,
        } => evaluate_and_print(config, inputs.to_inputs(), email, !no_log).await,

        Command::Open { link, email } => {
            let inputs = decode_state_from_url(&link);
            tracing::info!("🔗 Decoded shared inputs: {:?}", inputs);
            evaluate_and_print(config, inputs, email, true).await
        }

        Command::Share { inputs, base_url } => {
            let base = base_url
                .as_deref()
                .or(config.share_base_url())
                .ok_or_else(|| CalcError::MissingConfigError {
                    field: "share.base_url".to_string(),
                })?;
            println!("{}", encode_state_to_url_str(base, &inputs.to_inputs())?);
            Ok(())
        }

        Command::Chart {
            inputs,
            from,
            to,
            steps,
            breakdown,
        } => {
            let inputs = inputs.to_inputs();
            let json = if breakdown {
                serde_json::to_string_pretty(&cost_breakdown(&inputs))?
            } else {
                let (default_from, default_to) = default_price_range(&inputs);
                let points = profit_curve(
                    &inputs,
                    from.unwrap_or(default_from),
                    to.unwrap_or(default_to),
                    steps,
                )?;
                serde_json::to_string_pretty(&points)?
            };
            println!("{}", json);
            Ok(())
        }

        Command::Export {
            inputs,
            format,
            output,
        } => {
            let format: ExportFormat = format.parse()?;
            let output_path = output.unwrap_or_else(|| config.output_path().to_string());
            let engine = ProfitEngine::from_config(config, false)?;
            let evaluation = engine.run(inputs.to_inputs(), None)?;

            let storage = LocalStorage::new(&output_path);
            let filename = export_report(&storage, &evaluation.report, format).await?;
            let full_path = storage.full_path(filename);
            tracing::info!("✅ Report exported");
            println!("📁 Output saved to: {}", full_path.display());
            Ok(())
        }

        Command::Watch { inputs } => watch(config, inputs.to_inputs()).await,
    }
}

/// 每行 `field=value`，停頓 debounce 時間後才重算
async fn watch(config: &AppConfig, initial: Inputs) -> fba_profit_calc::Result<()> {
    let mut session = Session::new(initial);
    let (in_tx, in_rx) = mpsc::channel(32);
    let (out_tx, mut out_rx) = mpsc::channel(32);

    let driver = tokio::spawn(run_debounced(in_rx, config.debounce(), out_tx));
    let printer = tokio::spawn(async move {
        while let Some(outcome) = out_rx.recv().await {
            print_outcome(&outcome);
        }
    });

    println!("Enter updates as field=value (e.g. sellingPrice=24.99), Ctrl-D to quit");
    let _ = in_tx.send(*session.inputs()).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some((name, value)) = line.split_once('=') else {
            eprintln!("❌ Expected field=value, got '{}'", line);
            continue;
        };
        let value = match value.trim().parse::<f64>() {
            Ok(value) => value,
            Err(_) => {
                eprintln!("❌ '{}' is not a number", value.trim());
                continue;
            }
        };

        if let Err(e) = session.set_field(name.trim(), value) {
            eprintln!("❌ {}", e.user_friendly_message());
            continue;
        }
        if in_tx.send(*session.inputs()).await.is_err() {
            break;
        }
    }

    drop(in_tx);
    if let Err(e) = driver.await {
        tracing::warn!("⚠️ Debounce driver stopped abnormally: {}", e);
    }
    if let Err(e) = printer.await {
        tracing::warn!("⚠️ Outcome printer stopped abnormally: {}", e);
    }
    Ok(())
}

fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Rejected { message } => println!("❌ {}", message),
        Outcome::Computed { results, advice } => {
            println!(
                "Net profit: {:.2} | Margin: {:.2}% | Break-even: {}",
                results.net_profit,
                results.profit_margin,
                format_break_even(results.break_even_units)
            );
            for item in advice {
                println!("  [{:?}] {}", item.level, item.message);
            }
        }
    }
}

fn format_break_even(units: f64) -> String {
    if units.is_finite() {
        format!("{} units", units)
    } else {
        "n/a (selling price equals product cost)".to_string()
    }
}

fn print_report(report: &Report) {
    let results = &report.results;
    println!("📋 Results");
    println!("  Total costs:     {:.2}", results.total_costs);
    println!("  Net profit:      {:.2}", results.net_profit);
    println!("  Profit margin:   {:.2}%", results.profit_margin);
    println!("  Break-even:      {}", format_break_even(results.break_even_units));

    if !report.advice.is_empty() {
        println!("💡 Advice");
        for item in &report.advice {
            println!("  [{:?}] {}", item.level, item.message);
        }
    }

    if let Some(link) = &report.share_link {
        println!("🔗 Share: {}", link);
    }
}
