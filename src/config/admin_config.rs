// ==========================================
// 遮阳篷成本核算系统 - 管理配置
// ==========================================
// 职责: 品类、工种、费率预设、材料/面料预设、销售员、默认费率
// 红线: 配置只作为新成本单的默认值,不回写历史记录
// ==========================================

use crate::domain::types::SqFtFormula;
use crate::engine::guardrail::DEFAULT_TOLERANCE;
use crate::engine::historical::DEFAULT_WON_WEIGHT;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// RateDefaults - 默认费率
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateDefaults {
    pub sales_tax_rate: f64,
    pub markup_rate: f64,
    pub labor_rate: f64,
    pub drive_rate: f64,
    pub mileage_rate: f64,
    pub hotel_rate: f64,
    pub guardrail_tolerance: f64,
    pub won_weight: f64,
    pub sq_ft_formula: SqFtFormula,
}

impl Default for RateDefaults {
    fn default() -> Self {
        Self {
            sales_tax_rate: 0.0975,
            markup_rate: 0.8,
            labor_rate: 35.0,
            drive_rate: 35.0,
            mileage_rate: 0.67,
            hotel_rate: 150.0,
            guardrail_tolerance: DEFAULT_TOLERANCE,
            won_weight: DEFAULT_WON_WEIGHT,
            sq_ft_formula: SqFtFormula::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborRatePreset {
    pub name: String,
    pub hourly_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialPreset {
    pub name: String,
    #[serde(default)]
    pub unit: String,
    pub unit_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FabricPreset {
    pub name: String,
    pub price_per_yard: f64,
}

// ==========================================
// AiProviderSettings - AI 服务凭据
// ==========================================
// Debug 输出与配置快照中不得出现 api_key 明文
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AiProviderSettings {
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub api_key: String,
}

impl fmt::Debug for AiProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiProviderSettings")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &"***")
            .finish()
    }
}

// ==========================================
// AdminConfig - 管理配置全集
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub categories: Vec<String>,
    pub labor_types: Vec<String>,
    pub labor_rates: Vec<LaborRatePreset>,
    pub material_presets: Vec<MaterialPreset>,
    pub fabric_presets: Vec<FabricPreset>,
    pub sales_reps: Vec<String>,
    pub defaults: RateDefaults,
    pub ai_provider: Option<AiProviderSettings>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            labor_types: default_labor_types(),
            labor_rates: Vec::new(),
            material_presets: Vec::new(),
            fabric_presets: Vec::new(),
            sales_reps: Vec::new(),
            defaults: RateDefaults::default(),
            ai_provider: None,
        }
    }
}

impl AdminConfig {
    /// 按工种查找时薪,未配置时回落为默认人工费率
    pub fn labor_rate_for(&self, labor_type: Option<&str>) -> f64 {
        labor_type
            .and_then(|t| {
                self.labor_rates
                    .iter()
                    .find(|p| p.name.eq_ignore_ascii_case(t.trim()))
            })
            .map(|p| p.hourly_rate)
            .unwrap_or(self.defaults.labor_rate)
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(category.trim()))
    }
}

pub fn default_categories() -> Vec<String> {
    [
        "Retractable",
        "Fixed Frame",
        "Canopy",
        "Shade Sail",
        "Cabana",
        "Recover",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn default_labor_types() -> Vec<String> {
    ["Welding", "Sewing", "Installation", "Design"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AdminConfig::default();
        assert_eq!(cfg.defaults.sales_tax_rate, 0.0975);
        assert_eq!(cfg.defaults.markup_rate, 0.8);
        assert!(cfg.has_category("canopy"));
    }

    #[test]
    fn test_labor_rate_lookup() {
        let mut cfg = AdminConfig::default();
        cfg.labor_rates.push(LaborRatePreset {
            name: "Welding".to_string(),
            hourly_rate: 48.0,
        });
        assert_eq!(cfg.labor_rate_for(Some("welding")), 48.0);
        assert_eq!(cfg.labor_rate_for(Some("Sewing")), 35.0);
        assert_eq!(cfg.labor_rate_for(None), 35.0);
    }

    #[test]
    fn test_api_key_redacted_in_debug() {
        let settings = AiProviderSettings {
            provider: "openai".to_string(),
            model: None,
            api_key: "sk-secret".to_string(),
        };
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("sk-secret"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: AdminConfig = serde_json::from_str(r#"{"sales_reps": ["Dana"]}"#).unwrap();
        assert_eq!(cfg.sales_reps, vec!["Dana".to_string()]);
        assert_eq!(cfg.categories, default_categories());
        assert_eq!(cfg.defaults, RateDefaults::default());
    }
}
