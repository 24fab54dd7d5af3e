use std::{collections::HashMap, fmt};

use crate::{
    ast::{Expr, Variable},
    error::{EvalError, ParseError},
    interpreter::{evaluator, evaluator::flow::Flow, lexer, optimizer, parser},
};

/// What a name resolves to inside one formula.
#[derive(Debug, Clone)]
pub(crate) enum Binding {
    /// An immutable named constant, such as `pi`.
    Constant(f64),
    /// A mutable variable slot.
    Variable(Variable),
}

/// The name environment of one formula.
///
/// Seeded with the global constants and the declared parameters before
/// parsing; the parser may add ad-hoc temporaries while it runs. After
/// compilation the membership is frozen — evaluation only reads and writes
/// through the slots that already exist.
#[derive(Debug)]
pub(crate) struct SymbolTable {
    bindings: HashMap<String, Binding>,
}

impl SymbolTable {
    /// Creates a table holding only the global constants `e` and `pi`.
    fn new() -> Self {
        let mut bindings = HashMap::new();
        bindings.insert("e".to_string(), Binding::Constant(std::f64::consts::E));
        bindings.insert("pi".to_string(), Binding::Constant(std::f64::consts::PI));
        Self { bindings }
    }

    /// Declares a formula parameter as a fresh variable starting at `0.0`.
    ///
    /// A parameter that collides with a constant leaves the constant in
    /// place; `evaluate` reports the collision when it routes a value there.
    fn declare_parameter(&mut self, name: &str) {
        self.bindings
            .entry(name.to_string())
            .or_insert_with(|| Binding::Variable(Variable::new(0.0)));
    }

    /// Resolves a name.
    pub(crate) fn lookup(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    /// Inserts a fresh temporary variable for `name` and returns its handle.
    ///
    /// Used for the parser's lazy-`=` rule; the binding stays visible to the
    /// rest of the formula.
    pub(crate) fn define_temporary(&mut self, name: &str) -> Variable {
        let variable = Variable::new(0.0);
        self.bindings
            .insert(name.to_string(), Binding::Variable(variable.clone()));
        variable
    }

    /// The mutable slot bound to `name`, if there is one.
    fn variable(&self, name: &str) -> Option<Variable> {
        match self.bindings.get(name) {
            Some(Binding::Variable(variable)) => Some(variable.clone()),
            _ => None,
        }
    }
}

/// A compiled formula: the executable tree plus the names it closes over.
///
/// Created once by [`Expression::compile`], evaluated any number of times,
/// and optionally rewritten in place by [`Expression::optimize`]. The
/// variable slots are reference counted and unsynchronized, so an
/// `Expression` stays on the thread that uses it.
///
/// ## Example
/// ```
/// use wavexpr::Expression;
///
/// let expr = Expression::compile("x = x + 1; x * 10", &["x"]).unwrap();
///
/// assert_eq!(expr.evaluate(&[4.0]).unwrap(), 50.0);
/// assert_eq!(expr.variable("x").unwrap().get(), 5.0);
/// ```
#[derive(Debug)]
pub struct Expression {
    root:       Expr,
    symbols:    SymbolTable,
    parameters: Vec<String>,
}

impl Expression {
    /// Compiles a formula.
    ///
    /// Tokenizes `source`, seeds the symbol table with the constants `e` and
    /// `pi` and one mutable variable per declared parameter (initially
    /// `0.0`), and parses the token stream into the executable tree.
    ///
    /// # Parameters
    /// - `source`: The formula text.
    /// - `parameters`: Names whose values [`Expression::evaluate`] will
    ///   receive positionally, in this order.
    ///
    /// # Errors
    /// Returns a [`ParseError`] with the byte offset of the offending source
    /// character when the formula does not lex or parse.
    pub fn compile(source: &str, parameters: &[&str]) -> Result<Self, ParseError> {
        let tokens = lexer::tokenize(source)?;

        let mut symbols = SymbolTable::new();
        for name in parameters {
            symbols.declare_parameter(name);
        }

        let root = parser::core::parse(&tokens, &mut symbols)?;

        Ok(Self { root,
                  symbols,
                  parameters: parameters.iter().map(|name| (*name).to_string()).collect(), })
    }

    /// Evaluates the formula once.
    ///
    /// Each value is written into the parameter declared at the same
    /// position before the tree runs; parameters beyond `values.len()` keep
    /// their current contents. A `return` executed anywhere inside the
    /// formula short-circuits to the final result.
    ///
    /// # Errors
    /// - [`EvalError::TooManyArguments`] when more values than declared
    ///   parameters are supplied.
    /// - [`EvalError::AssignedToConstant`] when a declared name turned out to
    ///   shadow a constant.
    /// - [`EvalError::LoopIterationLimit`] when a loop exceeds the built-in
    ///   iteration bound.
    pub fn evaluate(&self, values: &[f64]) -> Result<f64, EvalError> {
        if values.len() > self.parameters.len() {
            return Err(EvalError::TooManyArguments { expected: self.parameters.len(),
                                                     found:    values.len(), });
        }

        for (name, value) in self.parameters.iter().zip(values) {
            match self.symbols.lookup(name) {
                Some(Binding::Variable(variable)) => {
                    variable.set(*value);
                },
                _ => return Err(EvalError::AssignedToConstant { name: name.clone() }),
            }
        }

        match evaluator::core::evaluate(&self.root)? {
            Flow::Normal(value) | Flow::Return(value) => Ok(value),
            Flow::Break => Err(EvalError::MisplacedControl { keyword: "break" }),
            Flow::Continue => Err(EvalError::MisplacedControl { keyword: "continue" }),
        }
    }

    /// Replaces the tree with its constant-folded form.
    ///
    /// Worth doing once for any formula that will be evaluated many times;
    /// calling it again is a no-op beyond the first.
    pub fn optimize(&mut self) {
        let root = std::mem::replace(&mut self.root,
                                     Expr::Sequence { statements: Vec::new(),
                                                      position:   0, });
        self.root = optimizer::optimize(root);
    }

    /// The mutable slot bound to `name`, if there is one.
    ///
    /// Lets a host write a value the formula reads without routing it
    /// positionally — for example a `length` parameter assigned once before
    /// a burst of per-sample evaluations.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<Variable> {
        self.symbols.variable(name)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}
