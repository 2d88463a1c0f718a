use std::f64::consts::{E, PI, TAU};

pub type NativeFn = fn(&[f64]) -> f64;

/// What calling a function does.
#[derive(Clone, Copy)]
pub enum Action {
    /// Pure function of its evaluated arguments.
    native(NativeFn),
    /// `set(name, value)`: stores `value` under the variable `name`.
    assign,
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::native(_) => f.write_str("native"),
            Action::assign => f.write_str("assign"),
        }
    }
}

pub struct BuiltinFunction {
    pub name: &'static str,
    pub description: &'static str,
    pub action: Action,
    pub arg_names: &'static [&'static str],
}

impl BuiltinFunction {
    pub fn arity(&self) -> usize {
        self.arg_names.len()
    }
}

pub struct BuiltinVariable {
    pub name: &'static str,
    pub description: &'static str,
    pub value: f64,
}

const X: &[&str] = &["x"];
const XY: &[&str] = &["x", "y"];
const NX: &[&str] = &["n", "x"];
const NAME_VALUE: &[&str] = &["name", "value"];

const fn function(name: &'static str, description: &'static str, action: NativeFn, arg_names: &'static [&'static str]) -> BuiltinFunction {
    BuiltinFunction{name, description, action: Action::native(action), arg_names}
}

pub static BUILTIN_FUNCTIONS: &[BuiltinFunction] = &[
    function("sqrt",  "square root of x",                |a| a[0].sqrt(),             X),
    function("cbrt",  "cube root of x",                  |a| a[0].cbrt(),             X),
    function("pow",   "x^y",                             |a| a[0].powf(a[1]),         XY),
    function("exp",   "e^x",                             |a| a[0].exp(),              X),
    function("ln",    "natural log (base e) of x",       |a| a[0].ln(),               X),
    function("log",   "log (base n) of x",               |a| a[1].ln() / a[0].ln(),   NX),
    function("mod",   "x%y",                             |a| a[0] % a[1],             XY),
    function("round", "closest integer to x",            |a| a[0].round(),            X),
    function("floor", "greatest integer less than x",    |a| a[0].floor(),            X),
    function("ceil",  "smallest integer greater than x", |a| a[0].ceil(),             X),
    function("sin",   "sine of x",                       |a| a[0].sin(),              X),
    function("cos",   "cosine of x",                     |a| a[0].cos(),              X),
    function("tan",   "tangent of x",                    |a| a[0].tan(),              X),
    function("asin",  "inverse sine of x",               |a| a[0].asin(),             X),
    function("acos",  "inverse cosine of x",             |a| a[0].acos(),             X),
    function("atan",  "inverse tangent of x",            |a| a[0].atan(),             X),
    function("sinh",  "hyperbolic sine of x",            |a| a[0].sinh(),             X),
    function("cosh",  "hyperbolic cosine of x",          |a| a[0].cosh(),             X),
    function("tanh",  "hyperbolic tangent of x",         |a| a[0].tanh(),             X),
    function("asinh", "inverse hyperbolic sine of x",    |a| a[0].asinh(),            X),
    function("acosh", "inverse hyperbolic cosine of x",  |a| a[0].acosh(),            X),
    function("atanh", "inverse hyperbolic tangent of x", |a| a[0].atanh(),            X),
    function("abs",   "absolute value of x",             |a| a[0].abs(),              X),
    function("hypot", "sqrt(x^2+y^2)",                   |a| a[0].hypot(a[1]),        XY),
    function("polar", "polar coordinates to radians",    |a| a[1].atan2(a[0]),        XY),
    function("max",   "the greater value of x and y",    |a| a[0].max(a[1]),          XY),
    function("min",   "the smaller value of x and y",    |a| a[0].min(a[1]),          XY),
    function("rad",   "x (radians) to degrees",          |a| a[0] / PI * 180.0,       X),
    function("deg",   "x (degrees) to radians",          |a| a[0] / 180.0 * PI,       X),
    BuiltinFunction {
        name: "set",
        description: "(re-)set the value of a variable",
        action: Action::assign,
        arg_names: NAME_VALUE,
    },
];

pub static BUILTIN_VARIABLES: &[BuiltinVariable] = &[
    BuiltinVariable{name: "pi",  description: "π",                                  value: PI},
    BuiltinVariable{name: "tau", description: "τ = 2π",                             value: TAU},
    BuiltinVariable{name: "e",   description: "Euler's number",                     value: E},
    BuiltinVariable{name: "phi", description: "golden ratio",                       value: 1.618_033_988_749_895},
    BuiltinVariable{name: "h",   description: "Planck constant (Js)",               value: 6.626_070_15e-34},
    BuiltinVariable{name: "NA",  description: "Avogadro constant (1/mol)",          value: 6.022_140_76e23},
    BuiltinVariable{name: "c",   description: "speed of light (m/s)",               value: 299_792_458.0},
    BuiltinVariable{name: "g",   description: "gravitational acceleration (m/s^2)", value: 9.806_65},
    BuiltinVariable{name: "G",   description: "gravitational constant (N(m/kg)^2)", value: 6.673_889e-11},
    BuiltinVariable{name: "k",   description: "Boltzmann constant (J/K)",           value: 1.380_649e-23},
];
