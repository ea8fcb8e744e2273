use crate::model::Calculation;
use crate::providers::{ResultStream, SearchContext, SearchProvider};
use crate::result::SearchResult;

pub struct CalculatorSearchProvider;

impl SearchProvider for CalculatorSearchProvider {
    fn id(&self) -> &'static str {
        "calculator"
    }

    fn search(&self, ctx: &SearchContext, query: &str) -> ResultStream {
        if !ctx.config.search_result_calculator {
            return ResultStream::ready(Vec::new());
        }
        let results = calculate(query)
            .map(SearchResult::Calculation)
            .into_iter()
            .collect();
        ResultStream::ready(results)
    }
}

const MAX_DEPTH: usize = 256;

/// Evaluates `query` as arithmetic. Plain numbers and malformed input yield `None`.
pub fn calculate(query: &str) -> Option<Calculation> {
    let equation = query.trim();
    let tokens = tokenize(equation).ok()?;
    if !has_operator(&tokens) {
        return None;
    }
    let value = evaluate_tokens(tokens).ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(Calculation {
        equation: equation.to_string(),
        result: format_number(value),
        is_valid: true,
    })
}

fn has_operator(tokens: &[Token]) -> bool {
    // A leading sign alone does not make an expression.
    let rest = match tokens.first() {
        Some(Token::Op('-' | '+')) => &tokens[1..],
        _ => tokens,
    };
    rest.iter().any(|token| matches!(token, Token::Op(_)))
}

pub fn evaluate(input: &str) -> Result<f64, String> {
    evaluate_tokens(tokenize(input)?)
}

fn evaluate_tokens(tokens: Vec<Token>) -> Result<f64, String> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expression()?;
    if parser.pos != parser.tokens.len() {
        return Err(format!("unexpected token at {}", parser.pos));
    }
    Ok(value)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Op(char),
    Open,
    Close,
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' => i += 1,
            '0'..='9' | '.' | ',' => {
                let start = i;
                while i < chars.len() && matches!(chars[i], '0'..='9' | '.' | ',') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().filter(|c| **c != ',').collect();
                let number = literal
                    .parse::<f64>()
                    .map_err(|_| format!("bad number '{literal}'"))?;
                tokens.push(Token::Number(number));
            }
            '+' | '-' | '*' | '/' | '%' | '^' => {
                tokens.push(Token::Op(c));
                i += 1;
            }
            '×' | 'x' | 'X' => {
                tokens.push(Token::Op('*'));
                i += 1;
            }
            '÷' => {
                tokens.push(Token::Op('/'));
                i += 1;
            }
            '(' => {
                tokens.push(Token::Open);
                i += 1;
            }
            ')' => {
                tokens.push(Token::Close);
                i += 1;
            }
            other => return Err(format!("unexpected character '{other}'")),
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn expression(&mut self) -> Result<f64, String> {
        let mut value = self.term()?;
        while let Some(Token::Op(op @ ('+' | '-'))) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, String> {
        let mut value = self.unary()?;
        while let Some(Token::Op(op @ ('*' | '/' | '%'))) = self.peek() {
            self.pos += 1;
            let rhs = self.unary()?;
            value = match op {
                '*' => value * rhs,
                '/' => value / rhs,
                _ => value % rhs,
            };
        }
        Ok(value)
    }

    // Every recursive path passes through here.
    fn unary(&mut self) -> Result<f64, String> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err("expression nested too deeply".to_string());
        }
        let value = match self.peek() {
            Some(Token::Op('-')) => {
                self.pos += 1;
                self.unary().map(|v| -v)
            }
            Some(Token::Op('+')) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        };
        self.depth -= 1;
        value
    }

    // Right associative.
    fn power(&mut self) -> Result<f64, String> {
        let base = self.primary()?;
        if let Some(Token::Op('^')) = self.peek() {
            self.pos += 1;
            let exponent = self.unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<f64, String> {
        match self.peek() {
            Some(Token::Number(n)) => {
                self.pos += 1;
                Ok(n)
            }
            Some(Token::Open) => {
                self.pos += 1;
                let value = self.expression()?;
                if self.peek() != Some(Token::Close) {
                    return Err("missing ')'".to_string());
                }
                self.pos += 1;
                Ok(value)
            }
            other => Err(format!("expected a number, found {other:?}")),
        }
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let formatted = format!("{value:.10}");
    formatted.trim_end_matches('0').trim_end_matches('.').to_string()
}
