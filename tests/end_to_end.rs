//! Integration tests driving the crate's public pipeline entry point
//! in-process. No subprocess is involved: `run_and_capture` wires the
//! evaluator's output sink to an in-memory buffer.

#[test]
fn hello_world_prints_and_returns() {
    let source = r#"callable main() -> int { print("hello"); return 0; };"#;
    let out = chiron::run_and_capture(source).expect("program should run");
    assert_eq!(out, "hello\n");
}

#[test]
fn for_loop_accumulates_into_top_level_variable() {
    let source = r#"
        int x = 10;
        callable main() -> int {
            for(int i = 0; i < 3; i = i + 1) {
                x = x + i;
            };
            print(x);
            return 0;
        };
    "#;
    let out = chiron::run_and_capture(source).expect("program should run");
    assert_eq!(out, "13\n");
}

#[test]
fn recursive_fibonacci() {
    let source = r#"
        callable f(int n) -> int {
            if (n < 2) { return n; };
            return f(n - 1) + f(n - 2);
        };
        callable main() -> int {
            print(f(10));
            return 0;
        };
    "#;
    let out = chiron::run_and_capture(source).expect("program should run");
    assert_eq!(out, "55\n");
}

#[test]
fn try_except_finally_ordering() {
    let source = r#"
        callable main() -> int {
            try {
                int z = 1 / 0;
            } except Exception as e {
                print("caught");
            } finally {
                print("done");
            };
            return 0;
        };
    "#;
    let out = chiron::run_and_capture(source).expect("program should run");
    assert_eq!(out, "caught\ndone\n");
}

#[test]
fn from_std_io_import_print() {
    let source = r#"
        from std.io import print;
        callable main() -> int {
            print("ok");
            return 0;
        };
    "#;
    let out = chiron::run_and_capture(source).expect("program should run");
    assert_eq!(out, "ok\n");
}

#[test]
fn top_level_code_without_main_runs_in_source_order() {
    let source = "auto a = 2; auto b = 3; print(a * b);";
    let out = chiron::run_and_capture(source).expect("program should run");
    assert_eq!(out, "6\n");
}

#[test]
fn arity_mismatch_is_a_runtime_error() {
    let source = r#"
        callable f(int n) -> int { return n; };
        callable main() -> int {
            print(f(1, 2));
            return 0;
        };
    "#;
    let err = chiron::run_and_capture(source).expect_err("extra argument should fail");
    assert!(err.to_string().contains("arity mismatch"), "unexpected message: {err}");
}

#[test]
fn logical_and_short_circuits_on_falsy_left() {
    // The right-hand side calls a function with the wrong arity; if `and`
    // evaluated it, the program would fail with an arity-mismatch error
    // instead of completing.
    let source = r#"
        callable boom(int n) -> int { return n; };
        callable main() -> int {
            bool result = false and boom(1, 2) > 0;
            print(result);
            return 0;
        };
    "#;
    let out = chiron::run_and_capture(source).expect("short-circuit should prevent the call");
    assert_eq!(out, "false\n");
}

#[test]
fn logical_or_short_circuits_on_truthy_left() {
    let source = r#"
        callable boom(int n) -> int { return n; };
        callable main() -> int {
            bool result = true or boom(1, 2) > 0;
            print(result);
            return 0;
        };
    "#;
    let out = chiron::run_and_capture(source).expect("short-circuit should prevent the call");
    assert_eq!(out, "true\n");
}

#[test]
fn finally_runs_even_when_body_returns() {
    let source = r#"
        callable f() -> int {
            try {
                return 1;
            } except Exception as e {
                print("unreached");
            } finally {
                print("cleanup");
            };
            return 2;
        };
        callable main() -> int {
            print(f());
            return 0;
        };
    "#;
    let out = chiron::run_and_capture(source).expect("program should run");
    assert_eq!(out, "cleanup\n1\n");
}

#[test]
fn pre_and_post_increment_semantics() {
    let source = r#"
        callable main() -> int {
            int x = 5;
            print(++:x);
            print(x);
            int y = 5;
            print(y:++);
            print(y);
            return 0;
        };
    "#;
    let out = chiron::run_and_capture(source).expect("program should run");
    assert_eq!(out, "6\n6\n5\n6\n");
}

#[test]
fn modulo_is_floored_like_python() {
    let source = r#"
        callable main() -> int {
            print((0 - 1) % 3);
            return 0;
        };
    "#;
    let out = chiron::run_and_capture(source).expect("program should run");
    assert_eq!(out, "2\n");
}
