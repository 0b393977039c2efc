//! Declaration parsing
//!
//! Handles the global section of a program (functions, procedures and the
//! `const`/`var` sections of the program block), block-local declaration
//! sections, and type expressions.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};
use tracing::trace;

impl<I: Iterator<Item = char>> Parser<I> {
    /// Global declarations up to the program block's `begin`.
    ///
    /// Functions and procedures go to `functions`; `const`/`var` sections may
    /// be intermixed with them and belong to the program block.
    pub(crate) fn parse_globals(
        &mut self,
        functions: &mut Vec<FunctionDecl>,
        decls: &mut Vec<LocalDecl>,
    ) -> Result<(), ParseError> {
        loop {
            trace!("globals");
            match self.peek() {
                TokenKind::Function | TokenKind::Procedure => {
                    functions.push(self.parse_function()?);
                }
                TokenKind::Const => self.parse_const_section(decls)?,
                TokenKind::Var => self.parse_var_section(decls)?,
                TokenKind::Begin => return Ok(()),
                _ => return Err(self.unexpected()),
            }
        }
    }

    /// `function f(args) : type; body;` or `procedure p(args); body;`
    pub(crate) fn parse_function(&mut self) -> Result<FunctionDecl, ParseError> {
        trace!("function");

        let is_function = match self.peek() {
            TokenKind::Function => true,
            TokenKind::Procedure => false,
            _ => return Err(self.unexpected()),
        };
        self.advance()?;

        let name = self.expect_identifier()?;
        self.expect(TokenKind::LParen)?;
        let args = self.parse_function_args()?;
        self.expect(TokenKind::RParen)?;

        let result = if is_function {
            self.expect(TokenKind::Colon)?;
            Some(self.parse_type()?)
        } else {
            None
        };

        self.expect(TokenKind::Semicolon)?;
        let body = self.parse_function_body()?;
        self.expect(TokenKind::Semicolon)?;

        Ok(FunctionDecl {
            name,
            args,
            result,
            body,
        })
    }

    fn parse_function_args(
        &mut self,
    ) -> Result<Vec<(String, TypeNode)>, ParseError> {
        trace!("function_args");

        let mut args = Vec::new();
        match self.peek() {
            TokenKind::Ident(_) => args.push(self.parse_function_arg()?),
            TokenKind::RParen => return Ok(args),
            _ => return Err(self.unexpected()),
        }

        loop {
            trace!("function_args_rest");
            match self.peek() {
                TokenKind::Semicolon => {
                    self.advance()?;
                    args.push(self.parse_function_arg()?);
                }
                TokenKind::RParen => return Ok(args),
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn parse_function_arg(&mut self) -> Result<(String, TypeNode), ParseError> {
        let name = self.expect_identifier()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;
        Ok((name, ty))
    }

    /// A block, or `forward` for a signature without a body.
    fn parse_function_body(&mut self) -> Result<Option<Block>, ParseError> {
        trace!("function_body");
        match self.peek() {
            TokenKind::Const | TokenKind::Var | TokenKind::Begin => {
                Ok(Some(self.parse_block()?))
            }
            TokenKind::Forward => {
                self.advance()?;
                Ok(None)
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Any number of `const`/`var` sections before a block's `begin`.
    pub(crate) fn parse_local_decls(&mut self) -> Result<Vec<LocalDecl>, ParseError> {
        let mut decls = Vec::new();
        loop {
            trace!("local_decls");
            match self.peek() {
                TokenKind::Const => self.parse_const_section(&mut decls)?,
                TokenKind::Var => self.parse_var_section(&mut decls)?,
                TokenKind::Begin => return Ok(decls),
                _ => return Err(self.unexpected()),
            }
        }
    }

    /// `const a, b = 1; c = -2;`
    ///
    /// The section continues while the lookahead is an identifier; the caller
    /// validates whatever follows.
    fn parse_const_section(
        &mut self,
        decls: &mut Vec<LocalDecl>,
    ) -> Result<(), ParseError> {
        trace!("const_section");
        self.expect(TokenKind::Const)?;

        loop {
            let names = self.parse_ident_list()?;
            self.expect(TokenKind::Eq)?;
            let value = self.parse_signed_number()?;
            self.expect(TokenKind::Semicolon)?;

            decls.extend(
                names
                    .into_iter()
                    .map(|name| LocalDecl::Const(ConstDecl { name, value })),
            );

            if !matches!(self.peek(), TokenKind::Ident(_)) {
                return Ok(());
            }
        }
    }

    /// `var a, b : integer; c : array [1 .. 3] of integer;`
    fn parse_var_section(
        &mut self,
        decls: &mut Vec<LocalDecl>,
    ) -> Result<(), ParseError> {
        trace!("var_section");
        self.expect(TokenKind::Var)?;

        loop {
            let names = self.parse_ident_list()?;
            self.expect(TokenKind::Colon)?;
            let ty = self.parse_type()?;
            self.expect(TokenKind::Semicolon)?;

            // Each declaration owns its own copy of the type tree
            let mut names = names.into_iter();
            if let Some(first) = names.next() {
                let rest: Vec<_> = names
                    .map(|name| {
                        LocalDecl::Var(VarDecl {
                            name,
                            ty: ty.clone(),
                        })
                    })
                    .collect();
                decls.push(LocalDecl::Var(VarDecl { name: first, ty }));
                decls.extend(rest);
            }

            if !matches!(self.peek(), TokenKind::Ident(_)) {
                return Ok(());
            }
        }
    }

    /// `a, b, c` followed by `=` or `:`
    fn parse_ident_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut names = vec![self.expect_identifier()?];
        loop {
            trace!("ident_list_rest");
            match self.peek() {
                TokenKind::Comma => {
                    self.advance()?;
                    names.push(self.expect_identifier()?);
                }
                TokenKind::Eq | TokenKind::Colon => return Ok(names),
                _ => return Err(self.unexpected()),
            }
        }
    }

    /// `integer` or `array [ lo .. hi ] of type`
    pub(crate) fn parse_type(&mut self) -> Result<TypeNode, ParseError> {
        trace!("type");
        match self.peek() {
            TokenKind::Integer => {
                self.advance()?;
                Ok(TypeNode::Int)
            }
            TokenKind::Array => {
                let location = self.advance()?.location;
                self.expect(TokenKind::LBracket)?;
                let begin = self.parse_signed_number()?;
                self.expect(TokenKind::DotDot)?;
                let end = self.parse_signed_number()?;
                self.expect(TokenKind::RBracket)?;
                self.expect(TokenKind::Of)?;
                let elem = self.parse_type()?;

                if end <= begin {
                    return Err(ParseError {
                        message: format!("Invalid array range [{};{}]", begin, end),
                        location,
                    });
                }

                Ok(TypeNode::array(begin, end, elem))
            }
            _ => Err(self.unexpected()),
        }
    }

    /// A number with an optional leading minus.
    fn parse_signed_number(&mut self) -> Result<i32, ParseError> {
        trace!("signed_number");
        let negative = match self.peek() {
            TokenKind::Minus => {
                self.advance()?;
                true
            }
            TokenKind::Number(_) => false,
            _ => return Err(self.unexpected()),
        };

        match self.peek() {
            TokenKind::Number(value) => {
                let value = if negative { -*value } else { *value };
                self.advance()?;
                Ok(value)
            }
            _ => Err(self.unexpected()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::Parser;

    fn parse(source: &str) -> Program {
        Parser::new(source).unwrap().parse_program().unwrap()
    }

    fn parse_err(source: &str) -> String {
        Parser::new(source)
            .unwrap()
            .parse_program()
            .unwrap_err()
            .message
    }

    #[test]
    fn test_function_and_procedure() {
        let program = parse(
            "program p;
             function f(a : integer; b : array [0 .. 1] of integer) : integer;
             begin f := a end;
             procedure g();
             begin end;
             begin end.",
        );

        assert_eq!(program.functions.len(), 3);
        let f = &program.functions[0];
        assert_eq!(f.name, "f");
        assert_eq!(f.args.len(), 2);
        assert_eq!(f.args[0], ("a".to_string(), TypeNode::Int));
        assert_eq!(f.args[1].1, TypeNode::array(0, 1, TypeNode::Int));
        assert_eq!(f.result, Some(TypeNode::Int));
        assert!(!f.is_forward());

        let g = &program.functions[1];
        assert!(g.is_procedure());
        assert!(g.args.is_empty());
    }

    #[test]
    fn test_forward_declaration() {
        let program = parse(
            "program p;
             function f(x : integer) : integer; forward;
             function f(x : integer) : integer; begin f := x end;
             begin end.",
        );
        assert!(program.functions[0].is_forward());
        assert!(!program.functions[1].is_forward());
    }

    #[test]
    fn test_const_section_shares_value() {
        let program = parse("program p; const a, b = -5; c = 3; begin end.");
        let decls = &program.main().unwrap().body.as_ref().unwrap().decls;
        assert_eq!(
            decls,
            &vec![
                LocalDecl::Const(ConstDecl {
                    name: "a".to_string(),
                    value: -5
                }),
                LocalDecl::Const(ConstDecl {
                    name: "b".to_string(),
                    value: -5
                }),
                LocalDecl::Const(ConstDecl {
                    name: "c".to_string(),
                    value: 3
                }),
            ]
        );
    }

    #[test]
    fn test_var_list_clones_type() {
        let program = parse(
            "program p; var a, b : array [-1 .. 1] of array [1 .. 2] of integer; begin end.",
        );
        let decls = &program.main().unwrap().body.as_ref().unwrap().decls;
        let expected = TypeNode::array(-1, 1, TypeNode::array(1, 2, TypeNode::Int));
        assert_eq!(decls.len(), 2);
        for decl in decls {
            match decl {
                LocalDecl::Var(v) => assert_eq!(v.ty, expected),
                other => panic!("expected var declaration, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_globals_intermix_with_functions() {
        let program = parse(
            "program p;
             var x : integer;
             procedure q(); begin end;
             const k = 1;
             begin end.",
        );
        assert_eq!(program.functions.len(), 2);
        let decls = &program.main().unwrap().body.as_ref().unwrap().decls;
        assert_eq!(decls.len(), 2);
    }

    #[test]
    fn test_invalid_array_ranges() {
        assert!(parse_err("program p; var a : array [5 .. 5] of integer; begin end.")
            .contains("Invalid array range"));
        assert!(parse_err("program p; var a : array [5 .. 2] of integer; begin end.")
            .contains("Invalid array range"));
    }

    #[test]
    fn test_array_bounds_stay_within_literal_range() {
        let program = parse("program p; var a : array [-2147483647 .. 0] of integer; begin end.");
        let body = program.main().unwrap().body.as_ref().unwrap();
        assert_eq!(
            body.decls[0],
            LocalDecl::Var(VarDecl {
                name: "a".to_string(),
                ty: TypeNode::array(-i32::MAX, 0, TypeNode::Int),
            })
        );

        assert!(parse_err("program p; var a : array [-2147483648 .. 0] of integer; begin end.")
            .contains("too large"));
    }

    #[test]
    fn test_missing_result_type() {
        let message = parse_err("program p; function f() ; begin end; begin end.");
        assert!(message.contains("expected symbol colon"));
    }

    #[test]
    fn test_bad_token_in_globals() {
        let message = parse_err("program p; x := 1; begin end.");
        assert!(message.contains("Unexpected identifier 'x'"));
    }
}
