use crate::{env::Env, error::CheckError};
use filter_syntax::Expr;

impl Env {
    /// Verifies that `expr` only references declared variables and calls
    /// visible functions with a matching overload shape.
    ///
    /// This is a structural check for front ends; it does not infer types.
    pub fn check(&self, expr: &Expr) -> Result<(), CheckError> {
        match expr {
            Expr::Literal(_) => Ok(()),
            Expr::Ident(name) => {
                if self.variable(name).is_some() {
                    Ok(())
                } else {
                    Err(CheckError::UndeclaredReference(name.clone()))
                }
            }
            Expr::Select { operand, .. } => self.check(operand),
            Expr::Call(call) => {
                let decl = self
                    .function(&call.function)
                    .ok_or_else(|| CheckError::UndeclaredFunction(call.function.clone()))?;

                let member = call.target.is_some();
                if !decl.accepts(call.args.len(), member) {
                    return Err(CheckError::NoMatchingOverload {
                        function: call.function.clone(),
                        args: call.args.len(),
                        member,
                    });
                }

                if let Some(target) = &call.target {
                    self.check(target)?;
                }
                call.args.iter().try_for_each(|arg| self.check(arg))
            }
            Expr::List(elements) => elements.iter().try_for_each(|e| self.check(e)),
        }
    }
}
