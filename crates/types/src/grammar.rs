//! Parser for the scanner's type-name grammar:
//! `int`, `decimal(10,2)`, `array<string>`, `map<string,int>`, `struct<a:int,b:string>`.
//!
//! `NativeType`'s `Display` produces the same grammar.
use crate::native::{NativeType, ScalarType};
use std::fmt::{Display, Formatter};
use std::str::FromStr;


#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TypeNameError {
    pub input: String,
    pub position: usize,
    pub message: String
}


impl Display for TypeNameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid type name '{}' at {}: {}", self.input, self.position, self.message)
    }
}


impl std::error::Error for TypeNameError {}


impl FromStr for NativeType {
    type Err = TypeNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_type_name(s)
    }
}


pub fn parse_type_name(input: &str) -> Result<NativeType, TypeNameError> {
    let mut parser = Parser {
        input,
        pos: 0
    };
    let ty = parser.parse_type()?;
    parser.skip_ws();
    if parser.pos != input.len() {
        return Err(parser.error("unexpected trailing input"))
    }
    Ok(ty)
}


struct Parser<'a> {
    input: &'a str,
    pos: usize
}


impl<'a> Parser<'a> {
    fn parse_type(&mut self) -> Result<NativeType, TypeNameError> {
        self.skip_ws();
        let start = self.pos;
        let ident = self.ident();
        if ident.is_empty() {
            return Err(self.error("expected a type name"))
        }
        let ident = ident.to_ascii_lowercase();
        match ident.as_str() {
            "array" => {
                self.expect('<')?;
                let item = self.parse_type()?;
                self.expect('>')?;
                Ok(NativeType::array(item))
            },
            "map" => {
                self.expect('<')?;
                // keys are always strings, the declared key type is only validated
                self.parse_type()?;
                self.expect(',')?;
                let value = self.parse_type()?;
                self.expect('>')?;
                Ok(NativeType::map(value))
            },
            "struct" => {
                self.expect('<')?;
                let mut fields = Vec::new();
                loop {
                    self.skip_ws();
                    let name = self.ident().to_string();
                    if name.is_empty() {
                        return Err(self.error("expected a field name"))
                    }
                    self.expect(':')?;
                    let ty = self.parse_type()?;
                    fields.push((name, ty));
                    if !self.eat(',') {
                        break
                    }
                }
                self.expect('>')?;
                Ok(NativeType::structure(fields))
            },
            "decimal" | "decimalv2" | "decimalv3" | "decimal32" | "decimal64" | "decimal128" => {
                let (precision, scale) = if self.eat('(') {
                    let precision = self.number()?;
                    let scale = if self.eat(',') {
                        self.number()?
                    } else {
                        0
                    };
                    self.expect(')')?;
                    (precision, scale)
                } else {
                    (10, 0)
                };
                Ok(NativeType::Decimal { precision, scale })
            },
            "timestamp" => Ok(ScalarType::DateTime.into()),
            name => {
                let Some(scalar) = ScalarType::from_type_name(name) else {
                    self.pos = start;
                    return Err(self.error("unknown type"))
                };
                // char(10), varchar(20): the length is not part of the native type
                if matches!(scalar, ScalarType::Char | ScalarType::Varchar) && self.eat('(') {
                    self.number()?;
                    self.expect(')')?;
                }
                Ok(scalar.into())
            }
        }
    }

    fn ident(&mut self) -> &'a str {
        let input: &'a str = self.input;
        let rest = &input[self.pos..];
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn number(&mut self) -> Result<u32, TypeNameError> {
        self.skip_ws();
        let rest = &self.input[self.pos..];
        let len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let value = rest[..len].parse().map_err(|_| self.error("expected a number"))?;
        self.pos += len;
        Ok(value)
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.input[self.pos..].starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), TypeNameError> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", c)))
        }
    }

    fn skip_ws(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn error(&self, message: impl Into<String>) -> TypeNameError {
        TypeNameError {
            input: self.input.to_string(),
            position: self.pos,
            message: message.into()
        }
    }
}
