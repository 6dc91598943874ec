use std::collections::BTreeMap;

use crate::foundation::error::{FxError, FxResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Int,
    Float,
    Bool,
}

/// One typed, bounded effect parameter as exposed to callers.
///
/// Booleans are described with `min = 0`, `max = 1` and a `0`/`1` default so
/// every entry of the schema has the same numeric shape.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParamDef {
    pub name: String,
    pub kind: ParamKind,
    pub default: f64,
    pub min: f64,
    pub max: f64,
}

impl ParamDef {
    pub fn int(name: &str, default: i64, min: i64, max: i64) -> Self {
        Self {
            name: name.to_string(),
            kind: ParamKind::Int,
            default: default as f64,
            min: min as f64,
            max: max as f64,
        }
    }

    pub fn float(name: &str, default: f64, min: f64, max: f64) -> Self {
        Self {
            name: name.to_string(),
            kind: ParamKind::Float,
            default,
            min,
            max,
        }
    }

    pub fn flag(name: &str, default: bool) -> Self {
        Self {
            name: name.to_string(),
            kind: ParamKind::Bool,
            default: if default { 1.0 } else { 0.0 },
            min: 0.0,
            max: 1.0,
        }
    }

    fn default_value(&self) -> ParamValue {
        match self.kind {
            ParamKind::Int => ParamValue::Int(self.default as i64),
            ParamKind::Float => ParamValue::Float(self.default),
            ParamKind::Bool => ParamValue::Bool(self.default != 0.0),
        }
    }

    fn parse(&self, raw: &serde_json::Value) -> FxResult<ParamValue> {
        let key = &self.name;
        let value = match self.kind {
            ParamKind::Bool => {
                let Some(b) = raw.as_bool() else {
                    return Err(FxError::invalid_param(format!(
                        "'{key}' must be a boolean"
                    )));
                };
                return Ok(ParamValue::Bool(b));
            }
            ParamKind::Int => {
                let n = match (raw.as_i64(), raw.as_f64()) {
                    (Some(n), _) => n,
                    (None, Some(f)) if f.is_finite() && f.fract() == 0.0 => f as i64,
                    _ => {
                        return Err(FxError::invalid_param(format!(
                            "'{key}' must be an integer"
                        )));
                    }
                };
                ParamValue::Int(n)
            }
            ParamKind::Float => {
                let Some(f) = raw.as_f64().filter(|f| f.is_finite()) else {
                    return Err(FxError::invalid_param(format!(
                        "'{key}' must be a finite number"
                    )));
                };
                ParamValue::Float(f)
            }
        };
        let n = value.as_f64();
        if n < self.min || n > self.max {
            return Err(FxError::invalid_param(format!(
                "'{key}' = {n} is outside [{}, {}]",
                self.min, self.max
            )));
        }
        Ok(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ParamValue {
    fn as_f64(self) -> f64 {
        match self {
            Self::Int(n) => n as f64,
            Self::Float(f) => f,
            Self::Bool(b) => f64::from(u8::from(b)),
        }
    }
}

/// Checked parameter values of one effect configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamValues {
    values: BTreeMap<String, ParamValue>,
}

impl ParamValues {
    /// Validates `raw` against `defs`. Missing entries take their defaults;
    /// unknown names, wrong types and out-of-range values are rejected.
    pub fn resolve(
        defs: &[ParamDef],
        raw: &serde_json::Map<String, serde_json::Value>,
    ) -> FxResult<Self> {
        if let Some(unknown) = raw.keys().find(|k| !defs.iter().any(|d| &d.name == *k)) {
            return Err(FxError::invalid_param(format!(
                "unknown parameter '{unknown}'"
            )));
        }
        let mut values = BTreeMap::new();
        for def in defs {
            let v = match raw.get(&def.name) {
                Some(r) => def.parse(r)?,
                None => def.default_value(),
            };
            values.insert(def.name.clone(), v);
        }
        Ok(Self { values })
    }

    /// Defaults of every parameter in `defs`.
    pub fn defaults(defs: &[ParamDef]) -> Self {
        Self {
            values: defs
                .iter()
                .map(|d| (d.name.clone(), d.default_value()))
                .collect(),
        }
    }

    fn get(&self, key: &str) -> FxResult<ParamValue> {
        self.values
            .get(key)
            .copied()
            .ok_or_else(|| FxError::invalid_param(format!("missing parameter '{key}'")))
    }

    pub fn int(&self, key: &str) -> FxResult<i64> {
        match self.get(key)? {
            ParamValue::Int(n) => Ok(n),
            other => Err(FxError::invalid_param(format!(
                "'{key}' is {other:?}, expected an integer"
            ))),
        }
    }

    pub fn u32(&self, key: &str) -> FxResult<u32> {
        let n = self.int(key)?;
        u32::try_from(n)
            .map_err(|_| FxError::invalid_param(format!("'{key}' must be non-negative")))
    }

    pub fn u8(&self, key: &str) -> FxResult<u8> {
        let n = self.int(key)?;
        u8::try_from(n).map_err(|_| FxError::invalid_param(format!("'{key}' must fit in 0..=255")))
    }

    pub fn float(&self, key: &str) -> FxResult<f64> {
        match self.get(key)? {
            ParamValue::Float(f) => Ok(f),
            ParamValue::Int(n) => Ok(n as f64),
            other => Err(FxError::invalid_param(format!(
                "'{key}' is {other:?}, expected a number"
            ))),
        }
    }

    pub fn flag(&self, key: &str) -> FxResult<bool> {
        match self.get(key)? {
            ParamValue::Bool(b) => Ok(b),
            other => Err(FxError::invalid_param(format!(
                "'{key}' is {other:?}, expected a boolean"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/params.rs"]
mod tests;
