// ==========================================
// Prazo 零售库存系统 - 命令行入口
// ==========================================
// 用法:
//   prazo [db_path] [--store ID] [--from YYYY-MM-DD --to YYYY-MM-DD]
//         [--locale L] [--import FILE]...
// 输出: 驾驶舱快照 JSON（stdout）,日志写 stderr
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use prazo::api::DashboardQuery;
use prazo::app::{get_default_db_path, AppState};
use prazo::domain::{DateRange, Viewer};

#[derive(Debug, Default)]
struct CliArgs {
    db_path: Option<String>,
    store_id: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    locale: Option<String>,
    imports: Vec<String>,
}

fn parse_date(flag: &str, value: Option<String>) -> Result<NaiveDate> {
    let value = value.ok_or_else(|| anyhow!("{} 缺少参数值", flag))?;
    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .with_context(|| format!("{} 日期格式应为 YYYY-MM-DD: {}", flag, value))
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--store" => {
                parsed.store_id = Some(args.next().ok_or_else(|| anyhow!("--store 缺少参数值"))?)
            }
            "--from" => parsed.from = Some(parse_date("--from", args.next())?),
            "--to" => parsed.to = Some(parse_date("--to", args.next())?),
            "--locale" => {
                parsed.locale = Some(args.next().ok_or_else(|| anyhow!("--locale 缺少参数值"))?)
            }
            "--import" => parsed
                .imports
                .push(args.next().ok_or_else(|| anyhow!("--import 缺少参数值"))?),
            flag if flag.starts_with("--") => bail!("未知参数: {}", flag),
            path => {
                if parsed.db_path.is_some() {
                    bail!("只能指定一个数据库路径: {}", path);
                }
                parsed.db_path = Some(path.to_string());
            }
        }
    }

    Ok(parsed)
}

#[tokio::main]
async fn main() -> Result<()> {
    prazo::logging::init();

    let args = parse_args(std::env::args().skip(1))?;
    let db_path = args.db_path.clone().unwrap_or_else(get_default_db_path);

    tracing::info!("{} {} - 数据库: {}", prazo::APP_NAME, prazo::VERSION, db_path);
    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    match args.imports.len() {
        0 => {}
        1 => {
            let summary = state.import_api.import_products(&args.imports[0]).await?;
            eprintln!("{}", serde_json::to_string_pretty(&summary)?);
        }
        _ => {
            let results = state.import_api.batch_import_products(&args.imports).await?;
            for result in results {
                match result {
                    Ok(summary) => eprintln!("{}", serde_json::to_string_pretty(&summary)?),
                    Err(message) => eprintln!("{}", message),
                }
            }
        }
    }

    let mut query = DashboardQuery::for_viewer(Viewer::manager());
    if let Some(store_id) = &args.store_id {
        query = query.with_store(store_id);
    }
    if let Some(locale) = &args.locale {
        query = query.with_locale(locale);
    }
    match (args.from, args.to) {
        (Some(start), Some(end)) => query = query.with_range(DateRange::new(start, end)),
        (None, None) => {}
        _ => bail!("--from 与 --to 必须同时指定"),
    }

    let snapshot = state.dashboard_api.get_dashboard(&query).await?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
