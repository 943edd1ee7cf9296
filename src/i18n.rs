// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持英文(默认)和西班牙文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use crate::domain::types::{GuardrailStatus, Outcome};

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码("en" 或 "es")
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息(无参数)
///
/// # 示例
/// ```no_run
/// use awning_estimator::i18n::t;
/// let msg = t("common.success");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息(带参数)
///
/// # 示例
/// ```no_run
/// use awning_estimator::i18n::t_with_args;
/// let msg = t_with_args("export.file_written", &[("count", "3"), ("path", "/tmp/out.csv")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 护栏等级显示名
pub fn guardrail_label(status: GuardrailStatus) -> String {
    t(status.label_key())
}

/// 报价结果显示名
pub fn outcome_label(outcome: Outcome) -> String {
    t(outcome.label_key())
}

/// 金额/单价显示,无值时为 "N/A"
pub fn display_amount(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}", v),
        _ => t("common.not_available"),
    }
}
