//! Core instrumentation traits for matwrap.

/// An instrumented call inside expression evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Call {
    Evaluate,
    Add,
    Sub,
    Mul,
    Matmul,
    Pow,
}

impl Call {
    pub const COUNT: usize = 6;

    pub const ALL: [Call; Call::COUNT] = [
        Call::Evaluate,
        Call::Add,
        Call::Sub,
        Call::Mul,
        Call::Matmul,
        Call::Pow,
    ];

    /// Dense index in `0..Call::COUNT`.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Qualified name used in reports.
    pub const fn name(self) -> &'static str {
        match self {
            Call::Evaluate => "expression::evaluate",
            Call::Add => "Matrix::add",
            Call::Sub => "Matrix::sub",
            Call::Mul => "Matrix::mul",
            Call::Matmul => "Matrix::matmul",
            Call::Pow => "Matrix::pow",
        }
    }
}

/// Observer notified around each instrumented call.
///
/// `enter`/`exit` pairs are strictly nested.
pub trait Instrument {
    /// Called before `call` runs.
    fn enter(&mut self, call: Call);
    /// Called after `call` returns, whether it succeeded or not.
    fn exit(&mut self, call: Call);

    /// Run `f` bracketed by `enter(call)` and `exit(call)`.
    fn scope<T>(&mut self, call: Call, f: impl FnOnce() -> T) -> T
    where
        Self: Sized,
    {
        self.enter(call);
        let out = f();
        self.exit(call);
        out
    }
}

/// No-op instrument for plain evaluation.
impl Instrument for () {
    fn enter(&mut self, _call: Call) {}
    fn exit(&mut self, _call: Call) {}
}
