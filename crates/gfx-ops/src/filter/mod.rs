//! Named image filters with typed, range-checked arguments.
//!
//! A [`Filter`] pairs descriptive [`FilterMeta`] with a function
//! `(&Image, &Args) -> Result<Image>`. Filters never mutate their input.
//! Built-in filters are registered on first access to the process-wide
//! registry; see [`list`] for their names.
//!
//! # Example
//!
//! ```rust
//! use gfx_core::{Image, RGBA64};
//! use gfx_ops::filter::{self, ArgValue};
//!
//! let img = Image::filled(8, 8, RGBA64::new(1.0, 0.0, 0.0, 1.0)).unwrap();
//! let shifted = filter::apply("hue", &img, &[ArgValue::Float(1.0 / 3.0)]).unwrap();
//! assert_eq!(shifted.get_pixel(0, 0).unwrap().to_u8(), [0, 255, 0, 255]);
//!
//! let gray = filter::apply_named("grayscale", &img, &[("method", "average".into())]).unwrap();
//! assert_eq!(gray.get_pixel(0, 0).unwrap().to_u8()[0], 85);
//! ```
//!
//! # Argument Validation
//!
//! Declarations are checked at registration: `min <= max`, `step > 0`, the
//! default matches the declared type and range, and choice defaults are
//! among the listed choices. Invocation values are checked against the same
//! declaration.

mod color;
mod geometric;
mod spatial;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use gfx_core::{Error, Image, Registry, Result};
use serde::Serialize;
use tracing::{debug, trace};

pub use spatial::Kernel;

/// Declared type of a filter argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgType {
    /// 64-bit float
    Float,
    /// Signed integer
    Int,
    /// Free text
    #[serde(rename = "string")]
    Str,
    /// One of a fixed list of strings
    Choice,
    /// Rows of floats
    Matrix,
}

impl ArgType {
    /// Identifier as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Int => "int",
            Self::Str => "string",
            Self::Choice => "choice",
            Self::Matrix => "matrix",
        }
    }

    #[inline]
    fn is_numeric(&self) -> bool {
        matches!(self, Self::Float | Self::Int)
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArgType {
    type Err = Error;

    /// Only the five exact identifiers are accepted.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "float" => Ok(Self::Float),
            "int" => Ok(Self::Int),
            "string" => Ok(Self::Str),
            "choice" => Ok(Self::Choice),
            "matrix" => Ok(Self::Matrix),
            other => Err(Error::invalid_argument(format!(
                "unknown argument type '{other}' (expected float, int, string, choice or matrix)"
            ))),
        }
    }
}

/// A concrete argument value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// Float value
    Float(f64),
    /// Integer value
    Int(i64),
    /// String or choice value
    Str(String),
    /// Matrix rows
    Matrix(Vec<Vec<f64>>),
}

impl ArgValue {
    fn kind(&self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Int(_) => "int",
            Self::Str(_) => "string",
            Self::Matrix(_) => "matrix",
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Str(s) => f.write_str(s),
            Self::Matrix(rows) => {
                let rows: Vec<String> = rows
                    .iter()
                    .map(|r| r.iter().map(f64::to_string).collect::<Vec<_>>().join(","))
                    .collect();
                write!(f, "[{}]", rows.join(";"))
            }
        }
    }
}

impl From<f64> for ArgValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<Vec<f64>>> for ArgValue {
    fn from(v: Vec<Vec<f64>>) -> Self {
        Self::Matrix(v)
    }
}

/// Declaration of one filter argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterArg {
    /// Argument name
    pub name: String,
    /// Declared type
    #[serde(rename = "type")]
    pub kind: ArgType,
    /// Whether the caller must supply it
    pub required: bool,
    /// Value used when omitted
    pub default: Option<ArgValue>,
    /// Inclusive lower bound (numeric types)
    pub min: Option<f64>,
    /// Inclusive upper bound (numeric types)
    pub max: Option<f64>,
    /// Suggested UI increment (numeric types)
    pub step: Option<f64>,
    /// Human-readable description
    pub description: String,
    /// Allowed values (choice type)
    pub choices: Vec<String>,
}

impl FilterArg {
    fn base(name: &str, kind: ArgType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: false,
            default: None,
            min: None,
            max: None,
            step: None,
            description: description.to_string(),
            choices: Vec::new(),
        }
    }

    /// Optional float in `[min, max]`.
    pub fn float(name: &str, description: &str, min: f64, max: f64, default: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            step: Some(0.01),
            default: Some(ArgValue::Float(default)),
            ..Self::base(name, ArgType::Float, description)
        }
    }

    /// Optional integer in `[min, max]`.
    pub fn int(name: &str, description: &str, min: i64, max: i64, default: i64) -> Self {
        Self {
            min: Some(min as f64),
            max: Some(max as f64),
            step: Some(1.0),
            default: Some(ArgValue::Int(default)),
            ..Self::base(name, ArgType::Int, description)
        }
    }

    /// Optional choice among `choices`.
    pub fn choice(name: &str, description: &str, choices: &[&str], default: &str) -> Self {
        Self {
            choices: choices.iter().map(|c| c.to_string()).collect(),
            default: Some(ArgValue::Str(default.to_string())),
            ..Self::base(name, ArgType::Choice, description)
        }
    }

    /// Optional free-text argument.
    pub fn string(name: &str, description: &str, default: &str) -> Self {
        Self {
            default: Some(ArgValue::Str(default.to_string())),
            ..Self::base(name, ArgType::Str, description)
        }
    }

    /// Required matrix argument.
    pub fn matrix(name: &str, description: &str) -> Self {
        Self::base(name, ArgType::Matrix, description).required()
    }

    /// Marks the argument required and drops its default.
    pub fn required(mut self) -> Self {
        self.required = true;
        self.default = None;
        self
    }

    /// Overrides the numeric step.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    fn fail(&self, msg: impl fmt::Display) -> Error {
        Error::invalid_argument(format!("argument '{}': {msg}", self.name))
    }

    /// Checks the declaration itself.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::invalid_argument("argument name must not be empty"));
        }
        if let (Some(lo), Some(hi)) = (self.min, self.max) {
            if lo.is_nan() || hi.is_nan() || lo > hi {
                return Err(self.fail(format!("min {lo} exceeds max {hi}")));
            }
        }
        if let Some(step) = self.step.filter(|_| self.kind.is_numeric()) {
            if !(step > 0.0) {
                return Err(self.fail(format!("step must be positive, got {step}")));
            }
        }
        if self.kind == ArgType::Choice && self.choices.is_empty() {
            return Err(self.fail("choice argument lists no choices"));
        }
        match &self.default {
            Some(d) => {
                self.check(d.clone()).map_err(|e| self.fail(format!("bad default: {e}")))?;
            }
            None if !self.required => return Err(self.fail("optional argument needs a default")),
            None => {}
        }
        Ok(())
    }

    /// Coerces `value` to the declared type and checks range and choices.
    ///
    /// Integers are accepted for float arguments, and integral floats for
    /// integer arguments.
    pub fn check(&self, value: ArgValue) -> Result<ArgValue> {
        let value = match (self.kind, value) {
            (ArgType::Float, ArgValue::Float(v)) => ArgValue::Float(v),
            (ArgType::Float, ArgValue::Int(v)) => ArgValue::Float(v as f64),
            (ArgType::Int, ArgValue::Int(v)) => ArgValue::Int(v),
            (ArgType::Int, ArgValue::Float(v)) if v.fract() == 0.0 => ArgValue::Int(v as i64),
            (ArgType::Str, ArgValue::Str(s)) => ArgValue::Str(s),
            (ArgType::Choice, ArgValue::Str(s)) => {
                if !self.choices.iter().any(|c| *c == s) {
                    return Err(self.fail(format!("'{s}' is not one of {}", self.choices.join(", "))));
                }
                ArgValue::Str(s)
            }
            (ArgType::Matrix, ArgValue::Matrix(m)) => ArgValue::Matrix(m),
            (kind, other) => return Err(self.fail(format!("expected {kind}, got {}", other.kind()))),
        };
        if let Some(v) = value.as_number() {
            if v.is_nan() {
                return Err(self.fail("value is NaN"));
            }
            if self.min.is_some_and(|lo| v < lo) || self.max.is_some_and(|hi| v > hi) {
                return Err(self.fail(format!(
                    "{v} outside [{}, {}]",
                    self.min.unwrap_or(f64::NEG_INFINITY),
                    self.max.unwrap_or(f64::INFINITY)
                )));
            }
        }
        Ok(value)
    }
}

/// Bound argument values, keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: BTreeMap<String, ArgValue>,
}

impl Args {
    fn lookup(&self, name: &str) -> Result<&ArgValue> {
        self.values
            .get(name)
            .ok_or_else(|| Error::invalid_argument(format!("missing argument '{name}'")))
    }

    /// Numeric argument as `f64`.
    pub fn float(&self, name: &str) -> Result<f64> {
        self.lookup(name)?
            .as_number()
            .ok_or_else(|| Error::invalid_argument(format!("argument '{name}' is not numeric")))
    }

    /// Integer argument.
    pub fn int(&self, name: &str) -> Result<i64> {
        match self.lookup(name)? {
            ArgValue::Int(v) => Ok(*v),
            _ => Err(Error::invalid_argument(format!("argument '{name}' is not an integer"))),
        }
    }

    /// String or choice argument.
    pub fn str(&self, name: &str) -> Result<&str> {
        match self.lookup(name)? {
            ArgValue::Str(s) => Ok(s),
            _ => Err(Error::invalid_argument(format!("argument '{name}' is not a string"))),
        }
    }

    /// Matrix argument.
    pub fn matrix(&self, name: &str) -> Result<&[Vec<f64>]> {
        match self.lookup(name)? {
            ArgValue::Matrix(m) => Ok(m),
            _ => Err(Error::invalid_argument(format!("argument '{name}' is not a matrix"))),
        }
    }

    /// Number of bound values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.values.iter().map(|(k, v)| format!("{k}={v}")).collect();
        f.write_str(&parts.join(" "))
    }
}

/// Descriptive data for a filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterMeta {
    /// Registry name
    pub name: String,
    /// One-line description
    pub description: String,
    /// Example invocation
    pub sample: String,
    /// Argument declarations, in positional order
    pub args: Vec<FilterArg>,
}

impl FilterMeta {
    /// Markdown section with a parameter table.
    pub fn doc(&self) -> String {
        let mut out = format!("## {}\n\n{}\n\n", self.name, self.description);
        if self.args.is_empty() {
            out.push_str("No parameters.\n");
        } else {
            out.push_str("| Name | Type | Required | Default | Range | Description |\n");
            out.push_str("|------|------|----------|---------|-------|-------------|\n");
            for a in &self.args {
                let default = a.default.as_ref().map(ToString::to_string).unwrap_or_default();
                let range = match (a.kind, a.min, a.max) {
                    (ArgType::Choice, _, _) => a.choices.join(", "),
                    (_, Some(lo), Some(hi)) => format!("{lo}..{hi}"),
                    _ => String::new(),
                };
                out.push_str(&format!(
                    "| {} | {} | {} | {} | {} | {} |\n",
                    a.name,
                    a.kind,
                    if a.required { "yes" } else { "no" },
                    default,
                    range,
                    a.description
                ));
            }
        }
        if !self.sample.is_empty() {
            out.push_str(&format!("\nExample: `{}`\n", self.sample));
        }
        out
    }
}

/// Shared filter function.
pub type FilterFn = Arc<dyn Fn(&Image, &Args) -> Result<Image> + Send + Sync>;

/// A registered filter.
#[derive(Clone)]
pub struct Filter {
    meta: FilterMeta,
    func: FilterFn,
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter").field("meta", &self.meta).finish_non_exhaustive()
    }
}

impl Filter {
    /// Creates a filter, validating every argument declaration.
    ///
    /// # Errors
    ///
    /// InvalidArgument for an empty name, a repeated argument name, or an
    /// invalid declaration.
    pub fn new(meta: FilterMeta, func: FilterFn) -> Result<Self> {
        if meta.name.is_empty() {
            return Err(Error::invalid_argument("filter name must not be empty"));
        }
        for (i, arg) in meta.args.iter().enumerate() {
            arg.validate()
                .map_err(|e| Error::invalid_argument(format!("filter '{}': {e}", meta.name)))?;
            if meta.args[..i].iter().any(|a| a.name == arg.name) {
                return Err(Error::invalid_argument(format!(
                    "filter '{}' declares '{}' twice",
                    meta.name, arg.name
                )));
            }
        }
        Ok(Self { meta, func })
    }

    /// Metadata.
    pub fn meta(&self) -> &FilterMeta {
        &self.meta
    }

    /// Registry name.
    pub fn name(&self) -> &str {
        &self.meta.name
    }

    fn finish(&self, mut given: BTreeMap<String, ArgValue>) -> Result<Args> {
        let mut values = BTreeMap::new();
        for arg in &self.meta.args {
            let value = match given.remove(&arg.name) {
                Some(v) => arg.check(v)?,
                None => match &arg.default {
                    Some(d) => d.clone(),
                    None => {
                        return Err(Error::invalid_argument(format!(
                            "filter '{}' requires argument '{}'",
                            self.meta.name, arg.name
                        )));
                    }
                },
            };
            values.insert(arg.name.clone(), value);
        }
        Ok(Args { values })
    }

    /// Binds positional values in declaration order.
    pub fn bind(&self, values: &[ArgValue]) -> Result<Args> {
        if values.len() > self.meta.args.len() {
            return Err(Error::invalid_argument(format!(
                "filter '{}' takes {} arguments, got {}",
                self.meta.name,
                self.meta.args.len(),
                values.len()
            )));
        }
        let given = self
            .meta
            .args
            .iter()
            .zip(values)
            .map(|(a, v)| (a.name.clone(), v.clone()))
            .collect();
        self.finish(given)
    }

    /// Binds keyword values.
    pub fn bind_named(&self, values: &[(&str, ArgValue)]) -> Result<Args> {
        let mut given = BTreeMap::new();
        for (name, v) in values {
            if !self.meta.args.iter().any(|a| a.name == *name) {
                return Err(Error::invalid_argument(format!(
                    "filter '{}' has no argument '{name}'",
                    self.meta.name
                )));
            }
            if given.insert(name.to_string(), v.clone()).is_some() {
                return Err(Error::invalid_argument(format!(
                    "filter '{}' got argument '{name}' more than once",
                    self.meta.name
                )));
            }
        }
        self.finish(given)
    }

    /// Runs the filter with already bound arguments.
    pub fn run(&self, img: &Image, args: &Args) -> Result<Image> {
        trace!(filter = %self.meta.name, %args, "filter::run");
        let out = (self.func)(img, args)?;
        out.annotate(format!("filter.{}", self.meta.name), args.to_string());
        Ok(out)
    }

    /// Binds positional values and runs.
    pub fn apply(&self, img: &Image, values: &[ArgValue]) -> Result<Image> {
        self.run(img, &self.bind(values)?)
    }

    /// Binds keyword values and runs.
    pub fn apply_named(&self, img: &Image, values: &[(&str, ArgValue)]) -> Result<Image> {
        self.run(img, &self.bind_named(values)?)
    }
}

fn global() -> &'static Registry<Filter> {
    static INSTANCE: OnceLock<Registry<Filter>> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let reg = Registry::new("filter");
        for f in color::filters().into_iter().chain(spatial::filters()).chain(geometric::filters()) {
            match f {
                Ok(f) => {
                    let _ = reg.register(f.name().to_string(), f);
                }
                Err(e) => debug!(error = %e, "built-in filter rejected"),
            }
        }
        debug!(count = reg.len(), "filter registry initialized");
        reg
    })
}

/// Shorthand used by the built-in tables.
pub(crate) fn builtin(
    name: &str,
    description: &str,
    sample: &str,
    args: Vec<FilterArg>,
    func: impl Fn(&Image, &Args) -> Result<Image> + Send + Sync + 'static,
) -> Result<Filter> {
    Filter::new(
        FilterMeta {
            name: name.to_string(),
            description: description.to_string(),
            sample: sample.to_string(),
            args,
        },
        Arc::new(func),
    )
}

/// Registers a filter.
///
/// # Errors
///
/// DuplicateRegistration if the name is taken.
pub fn register(filter: Filter) -> Result<()> {
    global().register(filter.name().to_string(), filter).map(|_| ())
}

/// Looks up a filter by name.
pub fn get(name: &str) -> Result<Arc<Filter>> {
    global().get(name)
}

/// All registered names, sorted.
pub fn list() -> Vec<String> {
    global().list()
}

/// Applies filter `name` with positional values.
pub fn apply(name: &str, img: &Image, values: &[ArgValue]) -> Result<Image> {
    get(name)?.apply(img, values)
}

/// Applies filter `name` with keyword values.
pub fn apply_named(name: &str, img: &Image, values: &[(&str, ArgValue)]) -> Result<Image> {
    get(name)?.apply_named(img, values)
}
