#[cfg(test)]
mod parser_tests {
    use basil::ast::Stmt;
    use basil::ast_printer::AstPrinter;
    use basil::error::BasilError;
    use basil::parser::Parser;
    use basil::scanner::Scanner;
    use basil::token::Token;

    fn parse(source: &str) -> Result<Vec<Stmt>, Vec<BasilError>> {
        let tokens: Vec<Token> = Scanner::new(source).scan_tokens().unwrap();
        Parser::new(&tokens).parse()
    }

    fn printed(source: &str) -> Vec<String> {
        parse(source)
            .unwrap()
            .iter()
            .map(AstPrinter::print_stmt)
            .collect()
    }

    fn messages(source: &str) -> Vec<String> {
        parse(source)
            .unwrap_err()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_precedence() {
        assert_eq!(printed("1 + 2 * 3;"), ["(+ 1.0 (* 2.0 3.0))"]);
        assert_eq!(printed("(1 + 2) * 3;"), ["(* (group (+ 1.0 2.0)) 3.0)"]);
        assert_eq!(printed("10 % 4 - 1;"), ["(- (% 10.0 4.0) 1.0)"]);
        assert_eq!(printed("-!x;"), ["(- (! x))"]);
        assert_eq!(printed("a or b and c;"), ["(or a (and b c))"]);
        assert_eq!(printed("1 < 2 == true;"), ["(== (< 1.0 2.0) true)"]);
    }

    #[test]
    fn test_calls_and_properties() {
        assert_eq!(printed("f(1, 2)(3);"), ["(call (call f 1.0 2.0) 3.0)"]);
        assert_eq!(printed("a.b.c = 1;"), ["(= (. (. a b) c) 1.0)"]);
        assert_eq!(printed("a = b = 2;"), ["(= a (= b 2.0))"]);
    }

    #[test]
    fn test_compound_assignment_desugars() {
        assert_eq!(printed("x += 2;"), ["(= x (+ x 2.0))"]);
        assert_eq!(printed("x %= 3;"), ["(= x (% x 3.0))"]);
        assert_eq!(printed("i++;"), ["(= i (+ i 1.0))"]);
        assert_eq!(printed("i--;"), ["(= i (- i 1.0))"]);
        assert_eq!(printed("o.n *= 4;"), ["(= (. o n) (* (. o n) 4.0))"]);
    }

    #[test]
    fn test_for_desugars_to_while() {
        assert_eq!(
            printed("for (var i = 0; i < 3; i++) print i;"),
            ["(block (var i 0.0) (while (< i 3.0) (print i) (= i (+ i 1.0))))"]
        );
        assert_eq!(printed("for (;;) break;"), ["(while true (break))"]);
    }

    #[test]
    fn test_class_declaration() {
        assert_eq!(
            printed("class B < A { m() { return super.m(); } }"),
            ["(class B < A (fun m () (block (return (call (super.m))))))"]
        );
    }

    #[test]
    fn test_every_syntax_error_is_reported() {
        assert_eq!(
            messages("var = 1;\nprint ;\nprint 1;"),
            [
                "[line 1] Error at '=': Expect variable name.",
                "[line 2] Error at ';': Expect expression.",
            ]
        );
    }

    #[test]
    fn test_two_missing_semicolons() {
        assert_eq!(
            messages("var a = 1\nvar b = 2;\nprint a\nprint b;"),
            [
                "[line 2] Error at 'var': Expect ';' after variable declaration.",
                "[line 4] Error at 'print': Expect ';' after value.",
            ]
        );
    }

    #[test]
    fn test_missing_semicolon_at_end() {
        assert_eq!(
            messages("print 1"),
            ["[line 1] Error at end: Expect ';' after value."]
        );
    }

    #[test]
    fn test_invalid_assignment_targets() {
        assert_eq!(
            messages("1 = 2;"),
            ["[line 1] Error at '=': Invalid assignment target."]
        );
        assert_eq!(
            messages("(a) += 2;"),
            ["[line 1] Error at '+=': Invalid assignment target."]
        );
        assert_eq!(
            messages("f()++;"),
            ["[line 1] Error at '++': Invalid assignment target."]
        );
    }

    #[test]
    fn test_loop_jumps_outside_loops() {
        assert_eq!(
            messages("break;"),
            ["[line 1] Error at 'break': Must be inside a loop to use 'break'."]
        );
        assert_eq!(
            messages("while (true) { fun f() { continue; } }"),
            ["[line 1] Error at 'continue': Must be inside a loop to use 'continue'."]
        );
        assert!(parse("while (true) { if (x) break; else continue; }").is_ok());
    }
}
