//! Built-in scalar types: `int`, `float`, `string`, `bool` and the duration
//! units `seconds`, `minutes`, `hours`, `days`.

use chrono::TimeDelta;
use gridconf_common::Value;

use crate::{TypeDescriptor, TypeError};

/// Parse an integer literal: decimal, `0b` binary, `0o` octal, `0x` or `#`
/// hex. Prefixes are case-insensitive.
pub fn parse_int_literal(text: &str) -> Option<i64> {
    let s = text.trim();
    let (digits, radix) = if let Some(rest) = strip_prefix_ci(s, "0x") {
        (rest, 16)
    } else if let Some(rest) = s.strip_prefix('#') {
        (rest, 16)
    } else if let Some(rest) = strip_prefix_ci(s, "0b") {
        (rest, 2)
    } else if let Some(rest) = strip_prefix_ci(s, "0o") {
        (rest, 8)
    } else {
        (s, 10)
    };
    if radix != 10 && (digits.is_empty() || digits.starts_with(['+', '-'])) {
        return None;
    }
    i64::from_str_radix(digits, radix).ok()
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

/// Parse a float, accepting `,` as the decimal separator.
pub fn parse_float_literal(text: &str) -> Option<f64> {
    let s = text.trim().replace(',', ".");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntType;

impl TypeDescriptor for IntType {
    fn name(&self) -> &str {
        "int"
    }

    fn parse(&self, token: &str) -> Result<Value, TypeError> {
        let t = token.trim();
        if t.is_empty() {
            return Ok(Value::Int(0));
        }
        parse_int_literal(t)
            .map(Value::Int)
            .ok_or_else(|| TypeError::invalid(self.name(), t))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FloatType;

impl TypeDescriptor for FloatType {
    fn name(&self) -> &str {
        "float"
    }

    fn parse(&self, token: &str) -> Result<Value, TypeError> {
        let t = token.trim();
        if t.is_empty() {
            return Ok(Value::Float(0.0));
        }
        parse_float_literal(t)
            .map(Value::Float)
            .ok_or_else(|| TypeError::invalid(self.name(), t))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StringType;

impl TypeDescriptor for StringType {
    fn name(&self) -> &str {
        "string"
    }

    fn parse(&self, token: &str) -> Result<Value, TypeError> {
        Ok(Value::Str(token.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BoolType;

impl TypeDescriptor for BoolType {
    fn name(&self) -> &str {
        "bool"
    }

    fn parse(&self, token: &str) -> Result<Value, TypeError> {
        let t = token.trim();
        if t.is_empty() {
            Ok(Value::Bool(false))
        } else if t.eq_ignore_ascii_case("true") {
            Ok(Value::Bool(true))
        } else if t.eq_ignore_ascii_case("false") {
            Ok(Value::Bool(false))
        } else {
            Err(TypeError::invalid(self.name(), t))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl DurationUnit {
    pub const ALL: [DurationUnit; 4] = [
        DurationUnit::Seconds,
        DurationUnit::Minutes,
        DurationUnit::Hours,
        DurationUnit::Days,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DurationUnit::Seconds => "seconds",
            DurationUnit::Minutes => "minutes",
            DurationUnit::Hours => "hours",
            DurationUnit::Days => "days",
        }
    }

    fn millis(&self) -> f64 {
        match self {
            DurationUnit::Seconds => 1_000.0,
            DurationUnit::Minutes => 60_000.0,
            DurationUnit::Hours => 3_600_000.0,
            DurationUnit::Days => 86_400_000.0,
        }
    }
}

/// A float count of `unit`, stored as a millisecond-precision duration.
#[derive(Debug, Clone, Copy)]
pub struct DurationType {
    unit: DurationUnit,
}

impl DurationType {
    pub fn new(unit: DurationUnit) -> Self {
        Self { unit }
    }

    pub fn unit(&self) -> DurationUnit {
        self.unit
    }
}

impl TypeDescriptor for DurationType {
    fn name(&self) -> &str {
        self.unit.name()
    }

    fn display_name(&self) -> &str {
        "Duration"
    }

    fn parse(&self, token: &str) -> Result<Value, TypeError> {
        let t = token.trim();
        if t.is_empty() {
            return Ok(Value::Duration(TimeDelta::zero()));
        }
        let amount = parse_float_literal(t).ok_or_else(|| TypeError::invalid(self.name(), t))?;
        let ms = (amount * self.unit.millis()).round();
        if !(i64::MIN as f64..=i64::MAX as f64).contains(&ms) {
            return Err(TypeError::OutOfRange {
                type_name: self.name().to_string(),
                token: t.to_string(),
            });
        }
        TimeDelta::try_milliseconds(ms as i64)
            .map(Value::Duration)
            .ok_or_else(|| TypeError::OutOfRange {
                type_name: self.name().to_string(),
                token: t.to_string(),
            })
    }
}
