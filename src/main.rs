// ==========================================
// 遮阳篷成本核算系统 - 命令行入口
// ==========================================
// 用法:
//   awning-estimator compute <input.json> [db_path]
//   awning-estimator stats [db_path]
//   awning-estimator budget <category> <sq_ft> [lin_ft] [db_path]
// 输出: JSON (stdout),日志走 stderr
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use awning_estimator::app::{get_default_db_path, AppState};
use awning_estimator::domain::cost_sheet::CostSheetInput;
use awning_estimator::engine::BudgetRequest;
use awning_estimator::i18n;
use awning_estimator::{logging, APP_NAME, VERSION};

fn usage() -> String {
    let title = format!("{} {}", APP_NAME, VERSION);
    [
        title.as_str(),
        "用法:",
        "  awning-estimator compute <input.json> [db_path]",
        "  awning-estimator stats [db_path]",
        "  awning-estimator budget <category> <sq_ft> [lin_ft] [db_path]",
    ]
    .join("\n")
}

fn open_state(db_path: Option<String>) -> Result<AppState> {
    let db_path = db_path.unwrap_or_else(get_default_db_path);
    AppState::new(db_path).map_err(|e| anyhow!(e))
}

fn compute(input_path: &str, db_path: Option<String>) -> Result<()> {
    let raw = std::fs::read_to_string(input_path)
        .with_context(|| format!("无法读取输入文件: {}", input_path))?;
    let input: CostSheetInput =
        serde_json::from_str(&raw).with_context(|| format!("输入文件格式错误: {}", input_path))?;

    let state = open_state(db_path)?;
    let preview = state.estimate_api.preview(&input)?;

    let output = serde_json::json!({
        "rollup": preview.rollup,
        "guardrail": preview.guardrail,
        "labels": {
            "per_sq_ft": i18n::guardrail_label(preview.guardrail.per_sq_ft.status),
            "per_lin_ft": i18n::guardrail_label(preview.guardrail.per_lin_ft.status),
            "price_per_sq_ft": i18n::display_amount(preview.rollup.price_per_sq_ft_pre_delivery),
            "price_per_lin_ft": i18n::display_amount(preview.rollup.price_per_lin_ft_pre_delivery),
        },
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn stats(db_path: Option<String>) -> Result<()> {
    let state = open_state(db_path)?;
    let stats = state.dashboard_api.pricing_stats()?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn budget(args: &[String]) -> Result<()> {
    let category = args.first().ok_or_else(|| anyhow!(usage()))?;
    let sq_ft: f64 = args
        .get(1)
        .ok_or_else(|| anyhow!(usage()))?
        .parse()
        .context("sq_ft 必须为数字")?;
    let lin_ft = match args.get(2) {
        Some(s) => Some(s.parse::<f64>().context("lin_ft 必须为数字")?),
        None => None,
    };

    let state = open_state(args.get(3).cloned())?;
    let estimate = state.dashboard_api.quick_budget(&BudgetRequest {
        category: category.clone(),
        sq_ft: Some(sq_ft),
        lin_ft,
    })?;
    println!("{}", serde_json::to_string_pretty(&estimate)?);
    Ok(())
}

fn main() -> Result<()> {
    logging::init();
    tracing::debug!("{} {}", APP_NAME, VERSION);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("compute") => {
            let input = args.get(1).ok_or_else(|| anyhow!(usage()))?;
            compute(input, args.get(2).cloned())
        }
        Some("stats") => stats(args.get(1).cloned()),
        Some("budget") => budget(&args[1..]),
        _ => bail!(usage()),
    }
}
