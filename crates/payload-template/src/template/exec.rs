//! Template execution against a render context.

use super::parse::{Command, Node, Operand, Pipeline, Pos};
use super::MissingVariable;
use crate::error::ExecError;
use payload_core::{FunctionError, RenderContext, TemplateFunction, TemplateValue};

pub(crate) struct Executor<'a> {
    pub ctx: &'a RenderContext,
    pub missing_variable: MissingVariable,
}

fn exec_error(pos: Pos, message: String) -> ExecError {
    ExecError {
        line: pos.line,
        column: pos.column,
        message,
    }
}

fn call_error(pos: Pos, function: &TemplateFunction, err: FunctionError) -> ExecError {
    exec_error(pos, format!("executing at <{}>: {err}", function.name()))
}

impl Executor<'_> {
    pub fn execute(&self, nodes: &[Node]) -> Result<String, ExecError> {
        let mut out = String::new();
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Action(pipeline) => {
                    let value = self.eval_pipeline(pipeline)?;
                    out.push_str(&value.to_string());
                }
            }
        }
        Ok(out)
    }

    fn eval_pipeline(&self, pipeline: &Pipeline) -> Result<TemplateValue, ExecError> {
        let mut piped = None;
        for command in &pipeline.commands {
            piped = Some(self.eval_command(command, piped.take())?);
        }
        piped.ok_or_else(|| exec_error(pipeline.pos, "empty pipeline".to_string()))
    }

    fn eval_command(
        &self,
        command: &Command,
        piped: Option<TemplateValue>,
    ) -> Result<TemplateValue, ExecError> {
        match command {
            Command::Call {
                function,
                args,
                pos,
            } => {
                let mut values = args
                    .iter()
                    .map(|arg| self.eval_operand(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                values.extend(piped);
                function
                    .call(&values)
                    .map_err(|err| call_error(*pos, function, err))
            }
            Command::Operand(operand) => self.eval_operand(operand),
        }
    }

    fn eval_operand(&self, operand: &Operand) -> Result<TemplateValue, ExecError> {
        match operand {
            Operand::Literal(value) => Ok(value.clone()),
            Operand::Variable { name, pos } => match self.ctx.get(name) {
                Some(value) => Ok(TemplateValue::String(value.to_string())),
                None => match self.missing_variable {
                    MissingVariable::Empty => Ok(TemplateValue::String(String::new())),
                    MissingVariable::Error => Err(exec_error(
                        *pos,
                        format!("map has no entry for key {name:?}"),
                    )),
                },
            },
            Operand::Call { function, pos } => function
                .call(&[])
                .map_err(|err| call_error(*pos, function, err)),
            Operand::Pipeline(pipeline) => self.eval_pipeline(pipeline),
        }
    }
}
