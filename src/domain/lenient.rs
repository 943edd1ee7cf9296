// ==========================================
// 遮阳篷成本核算系统 - 宽松数值反序列化
// ==========================================
// 表单数值可能是数字、数字字符串、空串、null 或缺失
// 规则: 任何无法解析或非有限的值一律视为 0,不报错
//       日期/列表/枚举同理: 无法识别时回落为缺省值
// ==========================================

use crate::domain::types::LaborPhase;
use chrono::NaiveDate;
use serde::de::{self, Deserialize, Deserializer, Visitor};
use std::fmt;

/// 将任意 JSON 标量宽松解析为 f64
///
/// 用法: `#[serde(default, deserialize_with = "lenient::f64_or_zero")]`
pub fn f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientF64)
}

/// 可选数值: 缺失/空串/null/非数值 -> None
pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientOptF64)
}

/// 可选日期: 缺失/空串/null/格式不符 -> None
///
/// 接受 `YYYY-MM-DD`,也接受带时间部分的 `YYYY-MM-DDTHH:MM:SS`
pub fn opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientOptDate)
}

/// 列表: null -> 空列表
pub fn vec_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// 结构体: null -> 缺省值
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 文本: null/数字/布尔 -> 字符串,其余 -> 空串
pub fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientString)
}

/// 人工阶段: 大小写不敏感,未知值 -> FABRICATION
pub fn labor_phase<'de, D>(deserializer: D) -> Result<LaborPhase, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientLaborPhase)
}

/// 统一清洗: NaN / 无穷大 -> 0
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn parse_str(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '$')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

struct LenientF64;

impl<'de> Visitor<'de> for LenientF64 {
    type Value = f64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, a numeric string or null")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
        Ok(sanitize(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
        Ok(parse_str(v).unwrap_or(0.0))
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<f64, E> {
        Ok(0.0)
    }

    fn visit_unit<E: de::Error>(self) -> Result<f64, E> {
        Ok(0.0)
    }

    fn visit_none<E: de::Error>(self) -> Result<f64, E> {
        Ok(0.0)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<f64, D::Error> {
        d.deserialize_any(LenientF64)
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<f64, A::Error> {
        while seq.next_element::<de::IgnoredAny>()?.is_some() {}
        Ok(0.0)
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<f64, A::Error> {
        while map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {}
        Ok(0.0)
    }
}

struct LenientOptF64;

impl<'de> Visitor<'de> for LenientOptF64 {
    type Value = Option<f64>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, a numeric string or null")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Option<f64>, E> {
        Ok(Some(v).filter(|v| v.is_finite()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Option<f64>, E> {
        Ok(Some(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Option<f64>, E> {
        Ok(Some(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Option<f64>, E> {
        Ok(parse_str(v))
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Option<f64>, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Option<f64>, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Option<f64>, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Option<f64>, D::Error> {
        d.deserialize_any(LenientOptF64)
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Option<f64>, A::Error> {
        while seq.next_element::<de::IgnoredAny>()?.is_some() {}
        Ok(None)
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Option<f64>, A::Error> {
        while map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {}
        Ok(None)
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let day = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

// 日期/文本/阶段三个访问器都需要吞掉复合值
fn skip_seq<'de, A: de::SeqAccess<'de>>(mut seq: A) -> Result<(), A::Error> {
    while seq.next_element::<de::IgnoredAny>()?.is_some() {}
    Ok(())
}

fn skip_map<'de, A: de::MapAccess<'de>>(mut map: A) -> Result<(), A::Error> {
    while map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {}
    Ok(())
}

struct LenientOptDate;

impl<'de> Visitor<'de> for LenientOptDate {
    type Value = Option<NaiveDate>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a YYYY-MM-DD date string or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Option<NaiveDate>, E> {
        Ok(parse_date(v))
    }

    fn visit_f64<E: de::Error>(self, _v: f64) -> Result<Option<NaiveDate>, E> {
        Ok(None)
    }

    fn visit_i64<E: de::Error>(self, _v: i64) -> Result<Option<NaiveDate>, E> {
        Ok(None)
    }

    fn visit_u64<E: de::Error>(self, _v: u64) -> Result<Option<NaiveDate>, E> {
        Ok(None)
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Option<NaiveDate>, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Option<NaiveDate>, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Option<NaiveDate>, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Option<NaiveDate>, D::Error> {
        d.deserialize_any(LenientOptDate)
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, seq: A) -> Result<Option<NaiveDate>, A::Error> {
        skip_seq(seq)?;
        Ok(None)
    }

    fn visit_map<A: de::MapAccess<'de>>(self, map: A) -> Result<Option<NaiveDate>, A::Error> {
        skip_map(map)?;
        Ok(None)
    }
}

struct LenientString;

impl<'de> Visitor<'de> for LenientString {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_unit<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<String, D::Error> {
        d.deserialize_any(LenientString)
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, seq: A) -> Result<String, A::Error> {
        skip_seq(seq)?;
        Ok(String::new())
    }

    fn visit_map<A: de::MapAccess<'de>>(self, map: A) -> Result<String, A::Error> {
        skip_map(map)?;
        Ok(String::new())
    }
}

struct LenientLaborPhase;

impl<'de> Visitor<'de> for LenientLaborPhase {
    type Value = LaborPhase;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FABRICATION, INSTALLATION or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<LaborPhase, E> {
        Ok(match v.trim().to_ascii_uppercase().as_str() {
            "INSTALLATION" => LaborPhase::Installation,
            _ => LaborPhase::Fabrication,
        })
    }

    fn visit_f64<E: de::Error>(self, _v: f64) -> Result<LaborPhase, E> {
        Ok(LaborPhase::default())
    }

    fn visit_i64<E: de::Error>(self, _v: i64) -> Result<LaborPhase, E> {
        Ok(LaborPhase::default())
    }

    fn visit_u64<E: de::Error>(self, _v: u64) -> Result<LaborPhase, E> {
        Ok(LaborPhase::default())
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<LaborPhase, E> {
        Ok(LaborPhase::default())
    }

    fn visit_unit<E: de::Error>(self) -> Result<LaborPhase, E> {
        Ok(LaborPhase::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<LaborPhase, E> {
        Ok(LaborPhase::default())
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<LaborPhase, D::Error> {
        d.deserialize_any(LenientLaborPhase)
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, seq: A) -> Result<LaborPhase, A::Error> {
        skip_seq(seq)?;
        Ok(LaborPhase::default())
    }

    fn visit_map<A: de::MapAccess<'de>>(self, map: A) -> Result<LaborPhase, A::Error> {
        skip_map(map)?;
        Ok(LaborPhase::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct FormRow {
        #[serde(default, deserialize_with = "f64_or_zero")]
        value: f64,
        #[serde(default, deserialize_with = "opt_f64")]
        manual: Option<f64>,
        #[serde(default, deserialize_with = "opt_date")]
        date: Option<NaiveDate>,
        #[serde(default, deserialize_with = "vec_or_empty")]
        items: Vec<u32>,
        #[serde(default, deserialize_with = "string_or_empty")]
        name: String,
        #[serde(default, deserialize_with = "labor_phase")]
        phase: LaborPhase,
    }

    fn row(json: &str) -> FormRow {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_numbers_and_numeric_strings() {
        assert_eq!(row(r#"{"value": 12.5}"#).value, 12.5);
        assert_eq!(row(r#"{"value": 7}"#).value, 7.0);
        assert_eq!(row(r#"{"value": "3.25"}"#).value, 3.25);
        assert_eq!(row(r#"{"value": " $1,200.50 "}"#).value, 1200.5);
    }

    #[test]
    fn test_missing_or_garbage_becomes_zero() {
        assert_eq!(row(r#"{}"#).value, 0.0);
        assert_eq!(row(r#"{"value": null}"#).value, 0.0);
        assert_eq!(row(r#"{"value": ""}"#).value, 0.0);
        assert_eq!(row(r#"{"value": "abc"}"#).value, 0.0);
        assert_eq!(row(r#"{"value": true}"#).value, 0.0);
        assert_eq!(row(r#"{"value": [1, 2]}"#).value, 0.0);
    }

    #[test]
    fn test_optional_value() {
        assert_eq!(row(r#"{}"#).manual, None);
        assert_eq!(row(r#"{"manual": ""}"#).manual, None);
        assert_eq!(row(r#"{"manual": "2500"}"#).manual, Some(2500.0));
        assert_eq!(row(r#"{"manual": 0}"#).manual, Some(0.0));
    }

    #[test]
    fn test_dates_tolerate_blank_and_garbage() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 14);
        assert_eq!(row(r#"{"date": "2026-03-14"}"#).date, d);
        assert_eq!(row(r#"{"date": "2026-03-14T09:30:00"}"#).date, d);
        assert_eq!(row(r#"{"date": ""}"#).date, None);
        assert_eq!(row(r#"{"date": "next tuesday"}"#).date, None);
        assert_eq!(row(r#"{"date": null}"#).date, None);
        assert_eq!(row(r#"{"date": 20260314}"#).date, None);
    }

    #[test]
    fn test_null_list_and_text_become_empty() {
        assert!(row(r#"{"items": null}"#).items.is_empty());
        assert_eq!(row(r#"{"items": [1, 2]}"#).items, vec![1, 2]);
        assert_eq!(row(r#"{"name": null}"#).name, "");
        assert_eq!(row(r#"{"name": 42}"#).name, "42");
        assert_eq!(row(r#"{"name": "Canopy"}"#).name, "Canopy");
    }

    #[test]
    fn test_unknown_phase_falls_back_to_fabrication() {
        assert_eq!(row(r#"{"phase": "installation"}"#).phase, LaborPhase::Installation);
        assert_eq!(row(r#"{"phase": "INSTALLATION"}"#).phase, LaborPhase::Installation);
        assert_eq!(row(r#"{"phase": "painting"}"#).phase, LaborPhase::Fabrication);
        assert_eq!(row(r#"{"phase": null}"#).phase, LaborPhase::Fabrication);
        assert_eq!(row(r#"{}"#).phase, LaborPhase::Fabrication);
    }

    #[test]
    fn test_sanitize_non_finite() {
        assert_eq!(sanitize(f64::NAN), 0.0);
        assert_eq!(sanitize(f64::INFINITY), 0.0);
        assert_eq!(sanitize(-4.0), -4.0);
    }
}
