//! Solution code grammar and decoding.

use crate::error::DecodeError;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static CODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<grouped>AG_)?(?P<join>EM|TR)_(?P<min>[0-9]+)(?:a(?P<max>[0-9]+))?_L(?P<len>[0-9]+)$")
        .expect("solution code pattern is a valid regex")
});

/// How bars are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JoinType {
    /// Mechanical couplers.
    #[cfg_attr(feature = "serde", serde(rename = "EM"))]
    Em,
    /// Traditional lap splices.
    #[cfg_attr(feature = "serde", serde(rename = "TR"))]
    Tr,
}

impl JoinType {
    /// The mnemonic as written in solution codes.
    pub fn mnemonic(self) -> &'static str {
        match self {
            JoinType::Em => "EM",
            JoinType::Tr => "TR",
        }
    }

    /// Plain-language description.
    pub fn description(self) -> &'static str {
        match self {
            JoinType::Em => "mechanical couplers",
            JoinType::Tr => "traditional lap splices",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for JoinType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EM" => Ok(JoinType::Em),
            "TR" => Ok(JoinType::Tr),
            other => Err(format!("unknown join type '{other}', expected EM or TR")),
        }
    }
}

/// Structured decomposition of a solution code.
///
/// Derived on demand from a candidate's code; never stored in the catalog.
///
/// # Examples
///
/// ```
/// use u_tradeoff::decoder::{decode, JoinType};
///
/// let code = decode("AG_EM_5a8_L50").unwrap();
/// assert!(code.grouped);
/// assert_eq!(code.join, JoinType::Em);
/// assert_eq!((code.bar_min, code.bar_max), (5, 8));
/// assert_eq!(code.length_cm, 50);
/// assert_eq!(code.to_string(), "AG_EM_5a8_L50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolutionCode {
    /// `AG_` prefix: lengths are standardized into procurement groups.
    pub grouped: bool,
    pub join: JoinType,
    /// Smallest bar size.
    pub bar_min: u32,
    /// Largest bar size. Equals `bar_min` for single-size codes.
    pub bar_max: u32,
    /// Cutting length granularity in centimetres.
    pub length_cm: u32,
}

impl SolutionCode {
    /// Whether a single bar size is used.
    pub fn is_single_bar(&self) -> bool {
        self.bar_min == self.bar_max
    }

    /// Whether `bar` lies within `[bar_min, bar_max]`.
    pub fn contains_bar(&self, bar: u32) -> bool {
        (self.bar_min..=self.bar_max).contains(&bar)
    }

    /// Human-readable breakdown, one line per code component.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(4);
        if self.grouped {
            lines.push("AG (grouped): standardized lengths stabilize procurement lots".into());
        } else {
            lines.push("non-grouped: lengths optimized per element".into());
        }
        lines.push(format!("{} (join): {}", self.join, self.join.description()));
        if self.is_single_bar() {
            lines.push(format!("bar #{}: single diameter", self.bar_min));
        } else {
            lines.push(format!(
                "bars #{}-{}: mixed diameters",
                self.bar_min, self.bar_max
            ));
        }
        let granularity = if self.length_cm <= 20 { "fine" } else { "coarse" };
        lines.push(format!(
            "L{} (length): cut in {} cm increments ({granularity} granularity)",
            self.length_cm, self.length_cm
        ));
        lines
    }
}

impl fmt::Display for SolutionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.grouped {
            f.write_str("AG_")?;
        }
        write!(f, "{}_", self.join)?;
        if self.is_single_bar() {
            write!(f, "{}", self.bar_min)?;
        } else {
            write!(f, "{}a{}", self.bar_min, self.bar_max)?;
        }
        write!(f, "_L{}", self.length_cm)
    }
}

impl FromStr for SolutionCode {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

/// Decodes a solution code of the form `[AG_]<EM|TR>_<BARS>_L<LEN>`, where
/// `BARS` is `<n>` or `<min>a<max>`.
///
/// Pure and stateless. Malformed codes are rejected outright: a zero bar
/// size or length, a reversed range (`8a5`) and out-of-range numbers are all
/// errors.
///
/// # Errors
///
/// [`DecodeError`] naming the offending code.
pub fn decode(code: &str) -> Result<SolutionCode, DecodeError> {
    let caps = CODE_PATTERN
        .captures(code)
        .ok_or_else(|| DecodeError::new(code, "does not match [AG_]<EM|TR>_<BARS>_L<LEN>"))?;

    let number = |name: &str| -> Result<Option<u32>, DecodeError> {
        caps.name(name)
            .map(|m| {
                let value: u32 = m
                    .as_str()
                    .parse()
                    .map_err(|_| DecodeError::new(code, format!("{name} out of range")))?;
                if value == 0 {
                    return Err(DecodeError::new(code, format!("{name} must be positive")));
                }
                Ok(value)
            })
            .transpose()
    };

    let grouped = caps.name("grouped").is_some();
    let join = match &caps["join"] {
        "EM" => JoinType::Em,
        _ => JoinType::Tr,
    };
    let bar_min = number("min")?.ok_or_else(|| DecodeError::new(code, "missing bar size"))?;
    let bar_max = number("max")?.unwrap_or(bar_min);
    let length_cm = number("len")?.ok_or_else(|| DecodeError::new(code, "missing length"))?;

    if bar_min > bar_max {
        return Err(DecodeError::new(
            code,
            format!("bar range {bar_min}a{bar_max} is reversed"),
        ));
    }

    Ok(SolutionCode {
        grouped,
        join,
        bar_min,
        bar_max,
        length_cm,
    })
}
