#[cfg(test)]
mod interpreter_tests {
    use std::cell::RefCell;
    use std::io::{self, Write};
    use std::rc::Rc;

    use basil::interpreter::Interpreter;
    use basil::value::{NativeFunction, Value};
    use basil::{Outcome, Session};

    /// Writer whose bytes stay readable after the interpreter takes it.
    #[derive(Clone, Default)]
    struct Captured(Rc<RefCell<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn lines(&self) -> Vec<String> {
            String::from_utf8_lossy(&self.0.borrow())
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    fn session() -> (Session, Captured) {
        let out = Captured::default();
        (Session::with_output(Box::new(out.clone())), out)
    }

    fn run(source: &str) -> (Outcome, Vec<String>) {
        let (mut session, out) = session();
        let outcome = session.run(source);
        (outcome, out.lines())
    }

    fn output(source: &str) -> Vec<String> {
        let (outcome, lines) = run(source);
        assert!(matches!(outcome, Outcome::Ok), "{:?}", outcome);
        lines
    }

    fn runtime_error(source: &str) -> String {
        match run(source).0 {
            Outcome::RuntimeError(e) => e.to_string(),
            other => panic!("expected a runtime error, got {:?}", other),
        }
    }

    #[test]
    fn test_arithmetic_precedence() {
        assert_eq!(output("print 1 + 2 * 3;\nprint (1 + 2) * 3;"), ["7", "9"]);
        assert_eq!(output("print 7 % 3; print 10 / 4; print -3 - -1;"), ["1", "2.5", "-2"]);
        assert_eq!(output("print 1 / 0;"), ["inf"]);
    }

    #[test]
    fn test_strings_and_concatenation() {
        assert_eq!(
            output(r#"print "bas" + "il"; print "n" + 1; print 2 + "b"; print "t" + true;"#),
            ["basil", "n1", "2b", "ttrue"]
        );
        assert_eq!(
            runtime_error(r#"print "x" + nil;"#),
            "[line 1] Runtime Error: Operands must be two numbers or two strings."
        );
    }

    #[test]
    fn test_equality_and_truthiness() {
        assert_eq!(
            output(r#"print nil == false; print 1 == 1; print "a" == "a"; print nil == nil; print 0 != 0;"#),
            ["false", "true", "true", "true", "false"]
        );
        assert_eq!(
            output(r#"print nil or "yes"; print 1 and 2; print false and boom; print !0;"#),
            ["yes", "2", "false", "false"]
        );
    }

    #[test]
    fn test_nan_equals_itself() {
        assert_eq!(
            output("var n = 0/0; print n == n; print n != n; print n == 1; print n < n;"),
            ["true", "false", "false", "false"]
        );
    }

    #[test]
    fn test_operand_type_errors() {
        assert_eq!(
            runtime_error(r#"print -"a";"#),
            "[line 1] Runtime Error: Operand must be a number."
        );
        assert_eq!(
            runtime_error("print 1;\nprint 1 < \"a\";"),
            "[line 2] Runtime Error: Operands must be numbers."
        );
    }

    #[test]
    fn test_block_shadowing() {
        assert_eq!(
            output(r#"var a = "outer"; { var a = "inner"; print a; } print a;"#),
            ["inner", "outer"]
        );
    }

    #[test]
    fn test_closures_bind_lexically() {
        let source = r#"
            var a = "global";
            {
                fun showA() { print a; }
                showA();
                var a = "block";
                showA();
            }
        "#;

        assert_eq!(output(source), ["global", "global"]);
    }

    #[test]
    fn test_counter_closure() {
        let source = r#"
            fun makeCounter() {
                var i = 0;
                fun count() { i = i + 1; print i; }
                return count;
            }
            var counter = makeCounter();
            counter();
            counter();
        "#;

        assert_eq!(output(source), ["1", "2"]);
    }

    #[test]
    fn test_recursion_and_return() {
        let source = r#"
            fun fib(n) { if (n < 2) return n; return fib(n - 2) + fib(n - 1); }
            print fib(15);
            fun nothing() { return; }
            print nothing();
            print fib;
        "#;

        assert_eq!(output(source), ["610", "nil", "<fn fib>"]);
    }

    #[test]
    fn test_loops_break_and_continue() {
        let source = r#"
            for (var i = 0; i < 5; i++) {
                if (i == 1) continue;
                if (i == 3) break;
                print i;
            }
            var j = 0;
            while (j < 4) {
                j++;
                if (j % 2 == 0) continue;
                print j;
            }
        "#;

        assert_eq!(output(source), ["0", "2", "1", "3"]);
    }

    #[test]
    fn test_break_leaves_only_the_inner_loop() {
        let source = r#"
            for (var i = 0; i < 2; i++) {
                while (true) { break; }
                print i;
            }
        "#;

        assert_eq!(output(source), ["0", "1"]);
    }

    #[test]
    fn test_compound_assignment() {
        let source = r#"
            var x = 10;
            x += 5; print x;
            x -= 3; print x;
            x *= 2; print x;
            x /= 4; print x;
            x %= 4; print x;
            print x++;
            print x--;
            var s = "a";
            s += "b";
            print s;
        "#;

        assert_eq!(output(source), ["15", "12", "24", "6", "2", "3", "2", "ab"]);
    }

    #[test]
    fn test_property_compound_assignment_evaluates_object_twice() {
        let source = r#"
            class Box { init() { this.count = 0; } }
            var calls = 0;
            var b = Box();
            fun get() { calls++; return b; }
            get().count += 5;
            print b.count;
            print calls;
            b.count++;
            print b.count;
        "#;

        assert_eq!(output(source), ["5", "2", "6"]);
    }

    #[test]
    fn test_classes_fields_and_methods() {
        let source = r#"
            class Point {
                init(x, y) { this.x = x; this.y = y; }
                sum() { return this.x + this.y; }
            }
            var p = Point(1, 2);
            print p.sum();
            p.x = 10;
            var m = p.sum;
            print m();
            print Point;
            print p;
        "#;

        assert_eq!(output(source), ["3", "12", "Point", "Point instance"]);
    }

    #[test]
    fn test_initializer_returns_instance() {
        let source = r#"
            class P { init(x) { this.x = x; return; } }
            var p = P(3);
            print p.x;
            print p.init(4) == p;
            print p.x;
        "#;

        assert_eq!(output(source), ["3", "true", "4"]);
    }

    #[test]
    fn test_inheritance_and_super() {
        let source = r#"
            class A {
                init(name) { this.name = name; }
                method() { print "A method"; }
            }
            class B < A {
                method() { print "B method"; }
                test() { super.method(); }
            }
            class C < B {}
            var c = C("c");
            c.test();
            c.method();
            print c.name;
        "#;

        assert_eq!(output(source), ["A method", "B method", "c"]);
    }

    #[test]
    fn test_super_method_keeps_subclass_this() {
        let source = r#"
            class A {
                describe() { print this.kind(); print this; }
                kind() { return "A"; }
            }
            class B < A {
                kind() { return "B"; }
                describe() { super.describe(); }
            }
            B().describe();
        "#;

        assert_eq!(output(source), ["B", "B instance"]);
    }

    #[test]
    fn test_object_errors() {
        assert_eq!(
            runtime_error("var a = 1; print a.b;"),
            "[line 1] Runtime Error: Only instances have properties."
        );
        assert_eq!(
            runtime_error("var a = 1; a.b = 2;"),
            "[line 1] Runtime Error: Only instances have fields."
        );
        assert_eq!(
            runtime_error("class A {} print A().missing;"),
            "[line 1] Runtime Error: Undefined property 'missing'."
        );
        assert_eq!(
            runtime_error("var NotClass = 1; class A < NotClass {}"),
            "[line 1] Runtime Error: Superclass must be a class."
        );
        assert_eq!(
            runtime_error(r#""text"();"#),
            "[line 1] Runtime Error: Can only call functions and classes."
        );
        assert_eq!(
            runtime_error("print undefined;"),
            "[line 1] Runtime Error: Undefined variable 'undefined'."
        );
    }

    #[test]
    fn test_arity_error_halts_execution() {
        let (outcome, lines) = run("fun f(a, b) {}\nprint \"before\";\nf(1);\nprint \"after\";");

        assert_eq!(lines, ["before"]);
        assert_eq!(outcome.exit_code(), 70);
        match outcome {
            Outcome::RuntimeError(e) => assert_eq!(
                e.to_string(),
                "[line 3] Runtime Error: Expected 2 arguments but got 1."
            ),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_compile_errors_prevent_execution() {
        let (outcome, lines) = run("print \"ran\";\nprint ;\nvar 1;");

        assert!(lines.is_empty());
        assert_eq!(outcome.exit_code(), 65);
        match outcome {
            Outcome::CompileErrors(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_lexical_and_syntax_errors_reported_together() {
        match run("print 1 $;\nprint ;").0 {
            Outcome::CompileErrors(errors) => {
                let text: Vec<String> = errors.iter().map(ToString::to_string).collect();
                assert_eq!(text[0], "[line 1] Error: Unexpected character: $");
                assert_eq!(text.last().unwrap(), "[line 2] Error at ';': Expect expression.");
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_session_state_persists_between_runs() {
        let (mut session, out) = session();

        assert!(matches!(session.run("var a = 1; fun f() { return a; }"), Outcome::Ok));
        assert!(matches!(session.run("print nope;"), Outcome::RuntimeError(_)));
        assert!(matches!(session.run("{ var b = 2; print b + f(); }"), Outcome::Ok));

        assert_eq!(out.lines(), ["3"]);
    }

    #[test]
    fn test_natives() {
        let source = r#"
            print getType(1);
            print getType("s");
            print getType(nil);
            print getType(true);
            print getType(clock);
            class K {}
            print getType(K);
            print getType(K());
            sayHi("Basil");
            print clock;
            print getType(clock());
            print tick() >= 0;
        "#;

        assert_eq!(
            output(source),
            [
                "number",
                "string",
                "nil",
                "boolean",
                "function",
                "class",
                "instance",
                "Hello, Basil",
                "<native fn clock>",
                "string",
                "true",
            ]
        );
    }

    fn twice(_: &mut Interpreter, args: &[Value]) -> Result<Value, String> {
        match &args[0] {
            Value::Number(n) => Ok(Value::Number(n * 2.0)),
            _ => Err("twice expects a number.".to_string()),
        }
    }

    #[test]
    fn test_host_defined_native() {
        let out = Captured::default();
        let mut interpreter = Interpreter::with_output(Box::new(out.clone()));
        interpreter.define_native(NativeFunction {
            name: "twice",
            arity: 1,
            func: twice,
        });

        let mut session = Session::with_interpreter(interpreter);
        assert!(matches!(session.run("print twice(21);"), Outcome::Ok));
        assert_eq!(out.lines(), ["42"]);

        match session.run("\ntwice(\"x\");") {
            Outcome::RuntimeError(e) => {
                assert_eq!(e.to_string(), "[line 2] Runtime Error: twice expects a number.")
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}
