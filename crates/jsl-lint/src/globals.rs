//! Names every script may use without declaring them.

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

pub const BUILTIN_GLOBALS: &[&str] = &[
    "Array",
    "Boolean",
    "Date",
    "Error",
    "EvalError",
    "Function",
    "Infinity",
    "InternalError",
    "Math",
    "NaN",
    "Number",
    "Object",
    "RangeError",
    "ReferenceError",
    "RegExp",
    "Script",
    "String",
    "SyntaxError",
    "TypeError",
    "URIError",
    "arguments",
    "decodeURI",
    "decodeURIComponent",
    "encodeURI",
    "encodeURIComponent",
    "escape",
    "eval",
    "isFinite",
    "isNaN",
    "parseFloat",
    "parseInt",
    "undefined",
    "unescape",
    "uneval",
];

static GLOBAL_SET: Lazy<FxHashSet<&'static str>> =
    Lazy::new(|| BUILTIN_GLOBALS.iter().copied().collect());

pub fn is_builtin_global(name: &str) -> bool {
    GLOBAL_SET.contains(name)
}
