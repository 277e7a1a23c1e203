//! Lenient deserializers for parser exports.
//!
//! The parser writes booleans as `True`/`False`, integers sometimes as floats
//! (`12.0`) and nulls as empty fields. These helpers accept all of those
//! spellings so the record types can stay strongly typed.

use serde::de::{self, Deserializer, Visitor};

struct FlagVisitor;

impl<'de> Visitor<'de> for FlagVisitor {
    type Value = bool;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "a boolean flag")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
        Ok(v != 0)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
        Ok(v != 0)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<bool, E> {
        Ok(v != 0.0 && !v.is_nan())
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
        match v.trim() {
            "" => Ok(false),
            "True" | "true" | "TRUE" => Ok(true),
            "False" | "false" | "FALSE" | "nan" | "NaN" | "None" => Ok(false),
            other => match other.parse::<f64>() {
                Ok(n) => Ok(n != 0.0 && !n.is_nan()),
                Err(_) => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
            },
        }
    }

    fn visit_none<E: de::Error>(self) -> Result<bool, E> {
        Ok(false)
    }

    fn visit_unit<E: de::Error>(self) -> Result<bool, E> {
        Ok(false)
    }
}

pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(FlagVisitor)
}

/// Like [`flag`], but keeps track of whether the column had a value at all.
pub fn opt_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(FlagVisitor).map(Some)
}

struct NumberVisitor;

impl<'de> Visitor<'de> for NumberVisitor {
    type Value = Option<f64>;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "a number or an empty field")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Some(if v { 1.0 } else { 0.0 }))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if v.is_nan() {
            return Ok(None);
        }
        Ok(Some(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        match v.trim() {
            "" | "nan" | "NaN" | "None" | "null" => Ok(None),
            "True" | "true" => Ok(Some(1.0)),
            "False" | "false" => Ok(Some(0.0)),
            other => other
                .parse::<f64>()
                .map(|n| if n.is_nan() { None } else { Some(n) })
                .map_err(|_| E::invalid_value(de::Unexpected::Str(other), &self)),
        }
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(NumberVisitor)
    }
}

pub fn opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(NumberVisitor)
}

/// Nulls become `0.0`.
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    opt_number(deserializer).map(|v| v.unwrap_or(0.0))
}

pub fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match opt_number(deserializer)? {
        Some(v) if v.fract() == 0.0 => Ok(v as i64),
        Some(v) => Err(de::Error::custom(format!("expected an integer, got {}", v))),
        None => Err(de::Error::custom("expected an integer, got an empty field")),
    }
}

pub fn opt_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match opt_number(deserializer)? {
        Some(v) if v.fract() == 0.0 => Ok(Some(v as i64)),
        Some(v) => Err(de::Error::custom(format!("expected an integer, got {}", v))),
        None => Ok(None),
    }
}

struct TextVisitor;

impl<'de> Visitor<'de> for TextVisitor {
    type Value = Option<String>;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "a text field")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Some(if v { "True".to_owned() } else { "False".to_owned() }))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if v.is_nan() {
            return Ok(None);
        }
        if v.fract() == 0.0 {
            return Ok(Some((v as i64).to_string()));
        }
        Ok(Some(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        match v {
            "" | "nan" | "NaN" | "None" => Ok(None),
            other => Ok(Some(other.to_owned())),
        }
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(TextVisitor)
    }
}

/// Empty fields and the parser's null spellings become `None`. Numeric cells
/// are kept as their integer spelling, so a winner code of `3.0` reads as `"3"`.
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(TextVisitor)
}

pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    opt_text(deserializer).map(|v| v.unwrap_or_default())
}

/// Parses a list literal such as `['Knife', 'Glock-18']` or `["Knife"]`.
pub fn parse_list(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|r| r.strip_suffix(']'))
        .unwrap_or(trimmed);

    if let Ok(items) = serde_json::from_str::<Vec<String>>(&format!("[{}]", inner)) {
        return items;
    }

    inner
        .split(',')
        .map(|item| item.trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .filter(|item| !item.is_empty())
        .map(|item| item.to_owned())
        .collect()
}

pub fn list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_text(deserializer)?
        .map(|raw| parse_list(&raw))
        .unwrap_or_default())
}
