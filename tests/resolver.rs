#[cfg(test)]
mod resolver_tests {
    use basil::ast::Stmt;
    use basil::error::BasilError;
    use basil::parser::Parser;
    use basil::resolver::{Locals, Resolver};
    use basil::scanner::Scanner;
    use basil::token::Token;

    fn resolve(source: &str) -> Result<Locals, Vec<BasilError>> {
        let tokens: Vec<Token> = Scanner::new(source).scan_tokens().unwrap();
        let statements: Vec<Stmt> = Parser::new(&tokens).parse().unwrap();
        Resolver::new().resolve(&statements)
    }

    fn messages(source: &str) -> Vec<String> {
        resolve(source)
            .unwrap_err()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_globals_are_left_out() {
        let locals = resolve("var a = 1; print a; a = 2;").unwrap();
        assert!(locals.is_empty());
    }

    #[test]
    fn test_distance_counts_enclosing_scopes() {
        let locals = resolve("{ var a = 1; { { print a; } } }").unwrap();
        assert_eq!(locals.values().copied().collect::<Vec<_>>(), [2]);
    }

    #[test]
    fn test_parameters_share_the_body_scope() {
        let locals = resolve("fun f(x) { var y = x; return y; }").unwrap();
        assert_eq!(locals.len(), 2);
        assert!(locals.values().all(|&d| d == 0));
    }

    #[test]
    fn test_globals_may_be_redeclared() {
        assert!(resolve("var a = 1; var a = 2;").is_ok());
    }

    #[test]
    fn test_static_errors() {
        assert_eq!(
            messages("return 1;"),
            ["[line 1] Error at 'return': Cannot return from top-level code."]
        );
        assert_eq!(
            messages("{ var a = a; }"),
            ["[line 1] Error at 'a': Cannot read local variable in its own initializer."]
        );
        assert_eq!(
            messages("{ var a = 1; var a = 2; }"),
            ["[line 1] Error at 'a': Variable with this name already declared in this scope."]
        );
        assert_eq!(
            messages("print this;"),
            ["[line 1] Error at 'this': Cannot use 'this' outside of a class."]
        );
        assert_eq!(
            messages("fun f() { super.g(); }"),
            ["[line 1] Error at 'super': Cannot use 'super' outside of a class."]
        );
        assert_eq!(
            messages("class A { m() { super.m(); } }"),
            ["[line 1] Error at 'super': Cannot use 'super' in a class with no superclass."]
        );
        assert_eq!(
            messages("class A < A {}"),
            ["[line 1] Error at 'A': A class cannot inherit from itself."]
        );
        assert_eq!(
            messages("class A { init() { return 1; } }"),
            ["[line 1] Error at 'return': Cannot return a value from an initializer."]
        );
    }

    #[test]
    fn test_early_return_in_initializer_is_allowed() {
        assert!(resolve("class A { init() { return; } }").is_ok());
    }

    #[test]
    fn test_errors_accumulate() {
        let errors = messages("return;\n{ var b = 1; var b = 2; }\nprint this;");

        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("[line 1]"));
        assert!(errors[1].starts_with("[line 2]"));
        assert!(errors[2].starts_with("[line 3]"));
    }
}
