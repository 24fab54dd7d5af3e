use crate::interpreter::evaluator::scalar::almost_equal;

/// The statically known numeric implementation behind a function name.
///
/// Selected once during parsing and stored directly in the call node, so
/// evaluation never performs a name lookup. Every registered implementation
/// is a pure function of its arguments, which is what makes calls with
/// constant arguments safe to fold.
#[derive(Debug, Clone, Copy)]
pub enum FunctionImpl {
    /// A function of one argument.
    Unary(fn(f64) -> f64),
    /// A function of two arguments.
    Binary(fn(f64, f64) -> f64),
}

impl FunctionImpl {
    /// The number of arguments this implementation consumes.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Unary(_) => 1,
            Self::Binary(_) => 2,
        }
    }

    /// Applies the implementation to already-evaluated arguments.
    ///
    /// The parser guarantees the argument count matches the arity; a
    /// mismatch can only come from an interpreter bug and yields `NaN`
    /// rather than a panic.
    #[must_use]
    pub fn apply(self, args: &[f64]) -> f64 {
        match (self, args) {
            (Self::Unary(function), [x]) => function(*x),
            (Self::Binary(function), [x, y]) => function(*x, *y),
            _ => f64::NAN,
        }
    }
}

/// One entry of the function registry.
pub struct FunctionSpec {
    /// The name formulas call the function by.
    pub name:           &'static str,
    /// The implementation bound to that name and its arity.
    pub implementation: FunctionImpl,
}

/// Every function callable from a formula.
///
/// Lookup is by name *and* arity, so a future two-argument `log` could
/// coexist with the one-argument form.
static FUNCTIONS: &[FunctionSpec] = &[
    FunctionSpec { name:           "abs",
                   implementation: FunctionImpl::Unary(f64::abs), },
    FunctionSpec { name:           "acos",
                   implementation: FunctionImpl::Unary(f64::acos), },
    FunctionSpec { name:           "asin",
                   implementation: FunctionImpl::Unary(f64::asin), },
    FunctionSpec { name:           "atan",
                   implementation: FunctionImpl::Unary(f64::atan), },
    FunctionSpec { name:           "atan2",
                   implementation: FunctionImpl::Binary(f64::atan2), },
    FunctionSpec { name:           "cbrt",
                   implementation: FunctionImpl::Unary(f64::cbrt), },
    FunctionSpec { name:           "ceil",
                   implementation: FunctionImpl::Unary(f64::ceil), },
    FunctionSpec { name:           "cos",
                   implementation: FunctionImpl::Unary(f64::cos), },
    FunctionSpec { name:           "cosh",
                   implementation: FunctionImpl::Unary(f64::cosh), },
    FunctionSpec { name:           "exp",
                   implementation: FunctionImpl::Unary(f64::exp), },
    FunctionSpec { name:           "floor",
                   implementation: FunctionImpl::Unary(f64::floor), },
    FunctionSpec { name:           "ln",
                   implementation: FunctionImpl::Unary(f64::ln), },
    FunctionSpec { name:           "log",
                   implementation: FunctionImpl::Unary(f64::log10), },
    FunctionSpec { name:           "log10",
                   implementation: FunctionImpl::Unary(f64::log10), },
    FunctionSpec { name:           "max",
                   implementation: FunctionImpl::Binary(f64::max), },
    FunctionSpec { name:           "min",
                   implementation: FunctionImpl::Binary(f64::min), },
    FunctionSpec { name:           "near",
                   implementation: FunctionImpl::Binary(near), },
    FunctionSpec { name:           "pow",
                   implementation: FunctionImpl::Binary(f64::powf), },
    FunctionSpec { name:           "round",
                   implementation: FunctionImpl::Unary(f64::round), },
    FunctionSpec { name:           "sgn",
                   implementation: FunctionImpl::Unary(sgn), },
    FunctionSpec { name:           "sin",
                   implementation: FunctionImpl::Unary(f64::sin), },
    FunctionSpec { name:           "sinh",
                   implementation: FunctionImpl::Unary(f64::sinh), },
    FunctionSpec { name:           "sqrt",
                   implementation: FunctionImpl::Unary(f64::sqrt), },
    FunctionSpec { name:           "tan",
                   implementation: FunctionImpl::Unary(f64::tan), },
    FunctionSpec { name:           "tanh",
                   implementation: FunctionImpl::Unary(f64::tanh), },
];

/// Resolves a function by name and argument count.
///
/// # Parameters
/// - `name`: The name as written in the formula.
/// - `arity`: The number of arguments at the call site.
///
/// # Returns
/// The matching registry entry, or `None` when no implementation fits.
#[must_use]
pub fn lookup(name: &str, arity: usize) -> Option<&'static FunctionSpec> {
    FUNCTIONS.iter()
             .find(|spec| spec.name == name && spec.implementation.arity() == arity)
}

/// The sign of `x`, with zero mapping to zero (unlike `f64::signum`).
fn sgn(x: f64) -> f64 {
    if x == 0.0 { 0.0 } else { x.signum() }
}

/// `1.0` when the operands are within the fixed ULP tolerance, else `0.0`.
fn near(lhs: f64, rhs: f64) -> f64 {
    if almost_equal(lhs, rhs) { 1.0 } else { 0.0 }
}
