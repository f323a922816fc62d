//! 查询参数反序列化辅助函数
//!
//! `#[serde(flatten)]` 会把 query string 的值缓冲为字符串，数字和布尔字段需要手动解析。

use serde::Deserializer;
use serde::de::{Error, Unexpected, Visitor};
use std::fmt;

struct I64Visitor;

impl<'de> Visitor<'de> for I64Visitor {
    type Value = i64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer or a string containing an integer")
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: Error,
    {
        Ok(value)
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: Error,
    {
        if value <= i64::MAX as u64 {
            Ok(value as i64)
        } else {
            Err(Error::invalid_value(Unexpected::Unsigned(value), &self))
        }
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: Error,
    {
        value
            .trim()
            .parse()
            .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
    }
}

// 自定义反序列化函数，支持字符串到i64的转换
pub fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(I64Visitor)
}

struct OptI64Visitor;

impl<'de> Visitor<'de> for OptI64Visitor {
    type Value = Option<i64>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an optional integer")
    }

    fn visit_none<E: Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_i64<E: Error>(self, value: i64) -> Result<Self::Value, E> {
        I64Visitor.visit_i64(value).map(Some)
    }

    fn visit_u64<E: Error>(self, value: u64) -> Result<Self::Value, E> {
        I64Visitor.visit_u64(value).map(Some)
    }

    fn visit_str<E: Error>(self, value: &str) -> Result<Self::Value, E> {
        if value.trim().is_empty() {
            return Ok(None);
        }
        I64Visitor.visit_str(value).map(Some)
    }
}

/// 可选 i64，空字符串视为未提供
pub fn deserialize_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(OptI64Visitor)
}

/// 可清空的外键：字段缺省为 None（不修改），null 或空字符串为 Some(None)（清空）
///
/// 需与 `#[serde(default)]` 一起使用，字段缺省时不会调用本函数。
pub fn deserialize_nullable_i64<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(OptI64Visitor).map(Some)
}

struct OptBoolVisitor;

impl<'de> Visitor<'de> for OptBoolVisitor {
    type Value = Option<bool>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an optional boolean")
    }

    fn visit_none<E: Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_bool<E: Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(Some(value))
    }

    fn visit_str<E: Error>(self, value: &str) -> Result<Self::Value, E> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            _ => Err(Error::invalid_value(Unexpected::Str(value), &self)),
        }
    }
}

/// 可选布尔值，接受 true/false/1/0
pub fn deserialize_opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(OptBoolVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Filter {
        #[serde(default, deserialize_with = "deserialize_opt_i64")]
        branch_id: Option<i64>,
        #[serde(default, deserialize_with = "deserialize_opt_bool")]
        is_active: Option<bool>,
    }

    #[test]
    fn test_string_values() {
        let f: Filter = serde_json::from_str(r#"{"branch_id": "7", "is_active": "true"}"#).unwrap();
        assert_eq!(f.branch_id, Some(7));
        assert_eq!(f.is_active, Some(true));
    }

    #[test]
    fn test_empty_and_missing_values() {
        let f: Filter = serde_json::from_str(r#"{"branch_id": ""}"#).unwrap();
        assert_eq!(f.branch_id, None);
        assert_eq!(f.is_active, None);
    }

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_nullable_i64")]
        booth_id: Option<Option<i64>>,
    }

    #[test]
    fn test_nullable_distinguishes_missing_and_null() {
        let p: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(p.booth_id, None);
        let p: Patch = serde_json::from_str(r#"{"booth_id": null}"#).unwrap();
        assert_eq!(p.booth_id, Some(None));
        let p: Patch = serde_json::from_str(r#"{"booth_id": ""}"#).unwrap();
        assert_eq!(p.booth_id, Some(None));
        let p: Patch = serde_json::from_str(r#"{"booth_id": "12"}"#).unwrap();
        assert_eq!(p.booth_id, Some(Some(12)));
        assert!(serde_json::from_str::<Patch>(r#"{"booth_id": "x"}"#).is_err());
    }

    #[test]
    fn test_invalid_value_rejected() {
        assert!(serde_json::from_str::<Filter>(r#"{"is_active": "maybe"}"#).is_err());
        assert!(serde_json::from_str::<Filter>(r#"{"branch_id": "abc"}"#).is_err());
    }
}
