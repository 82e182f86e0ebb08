//! Arithmetic tool

use super::parse_params;
use agent_core::{Error, Result as AgentResult};
use agent_llm::tools::schema;
use agent_tools::Tool;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

/// Evaluates arithmetic expressions
///
/// Supports `+ - * / %`, `^` or `**` for powers, unary signs and
/// parentheses. Thousands separators (`1,000`) and `x`/`×`/`÷` are
/// accepted since models copy numbers from reports.
#[derive(Debug, Default, Clone, Copy)]
pub struct CalculatorTool;

#[derive(Debug, Deserialize)]
struct CalculatorParams {
    operation: String,
}

impl CalculatorTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for CalculatorTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: CalculatorParams = parse_params(params, "operation")?;
        let value = evaluate(&params.operation).map_err(Error::ProcessingFailed)?;
        Ok(Value::String(format_number(value)))
    }

    fn name(&self) -> &str {
        "calculate"
    }

    fn description(&self) -> &str {
        "Useful to perform any mathematical calculations, like sum, minus, multiplication, \
         division, etc. The input should be a mathematical expression, \
         e.g. `200*7` or `5000/2*10`."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({ "operation": schema::string("Arithmetic expression to evaluate") }),
            vec!["operation"],
        )
    }
}

/// Evaluate an arithmetic expression
pub fn evaluate(expression: &str) -> Result<f64, String> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err("Empty expression".to_string());
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expression()?;

    if parser.pos != parser.tokens.len() {
        return Err(format!("Unexpected token at position {}", parser.pos + 1));
    }
    if !value.is_finite() {
        return Err("Result is not a finite number".to_string());
    }
    Ok(value)
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\n' | '$' => {}
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || matches!(chars[i], '.' | ',')) {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().filter(|c| **c != ',').collect();
                let number = literal
                    .parse()
                    .map_err(|_| format!("Invalid number '{literal}'"))?;
                tokens.push(Token::Number(number));
                continue;
            }
            '+' => tokens.push(Token::Plus),
            '-' => tokens.push(Token::Minus),
            '*' if chars.get(i + 1) == Some(&'*') => {
                tokens.push(Token::Caret);
                i += 1;
            }
            '*' | 'x' | 'X' | '×' => tokens.push(Token::Star),
            '/' | '÷' => tokens.push(Token::Slash),
            '%' => tokens.push(Token::Percent),
            '^' => tokens.push(Token::Caret),
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            other => return Err(format!("Unsupported character '{other}'")),
        }
        i += 1;
    }

    Ok(tokens)
}

/// Maximum nesting of parentheses and unary signs
const MAX_DEPTH: usize = 64;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn descend(&mut self) -> Result<(), String> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err("Expression nested too deeply".to_string());
        }
        Ok(())
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    // expression := term (('+' | '-') term)*
    fn expression(&mut self) -> Result<f64, String> {
        let mut value = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == Token::Plus { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    // term := unary (('*' | '/' | '%') unary)*
    fn term(&mut self) -> Result<f64, String> {
        let mut value = self.unary()?;
        while let Some(op @ (Token::Star | Token::Slash | Token::Percent)) = self.peek() {
            self.pos += 1;
            let rhs = self.unary()?;
            value = match op {
                Token::Star => value * rhs,
                _ if rhs == 0.0 => return Err("Division by zero".to_string()),
                Token::Slash => value / rhs,
                _ => value % rhs,
            };
        }
        Ok(value)
    }

    // unary := ('-' | '+') unary | power
    fn unary(&mut self) -> Result<f64, String> {
        self.descend()?;
        let value = match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                self.unary().map(|v| -v)
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        };
        self.depth -= 1;
        value
    }

    // power := primary ('^' unary)?   (right associative)
    fn power(&mut self) -> Result<f64, String> {
        let base = self.primary()?;
        if self.peek() == Some(Token::Caret) {
            self.pos += 1;
            let exponent = self.unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<f64, String> {
        match self.next() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                self.descend()?;
                let value = self.expression()?;
                self.depth -= 1;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err("Missing closing parenthesis".to_string()),
                }
            }
            Some(_) => Err(format!("Unexpected token at position {}", self.pos)),
            None => Err("Unexpected end of expression".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence() {
        assert_eq!(evaluate("200*7").unwrap(), 1400.0);
        assert_eq!(evaluate("5000/2*10").unwrap(), 25000.0);
        assert_eq!(evaluate("2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(evaluate("(2 + 3) * 4").unwrap(), 20.0);
        assert_eq!(evaluate("2 ^ 3 ^ 2").unwrap(), 512.0);
        assert_eq!(evaluate("-2 ** 2").unwrap(), -4.0);
        assert_eq!(evaluate("10 % 4").unwrap(), 2.0);
    }

    #[test]
    fn test_report_style_numbers() {
        assert_eq!(evaluate("$1,250,000 / 1,000").unwrap(), 1250.0);
        assert_eq!(evaluate("3 x 4").unwrap(), 12.0);
        assert!((evaluate("(85.8 - 81.8) / 81.8 * 100").unwrap() - 4.889_975).abs() < 1e-4);
    }

    #[test]
    fn test_errors() {
        assert_eq!(evaluate("1/0").unwrap_err(), "Division by zero");
        assert!(evaluate("").is_err());
        assert!(evaluate("(1 + 2").is_err());
        assert!(evaluate("1 +").is_err());
        assert!(evaluate("2 2").is_err());
        assert!(evaluate("import os").is_err());
    }

    #[test]
    fn test_deep_nesting_rejected() {
        let nested = format!("{}1{}", "(".repeat(200_000), ")".repeat(200_000));
        assert_eq!(evaluate(&nested).unwrap_err(), "Expression nested too deeply");
        assert_eq!(
            evaluate(&"-".repeat(200_000)).unwrap_err(),
            "Expression nested too deeply"
        );

        let shallow = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        assert_eq!(evaluate(&shallow).unwrap(), 1.0);
        assert_eq!(evaluate("--1").unwrap(), 1.0);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1400.0), "1400");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(2.5), "2.5");
    }

    #[tokio::test]
    async fn test_tool_execute() {
        let tool = CalculatorTool::new();
        let result = tool.execute(json!({"operation": "5000/2*10"})).await.unwrap();
        assert_eq!(result, json!("25000"));

        let result = tool.execute(json!("1 + 1")).await.unwrap();
        assert_eq!(result, json!("2"));

        assert!(tool.execute(json!({"operation": "1/0"})).await.is_err());
    }
}
