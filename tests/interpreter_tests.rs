// ABOUTME: End-to-end language tests driving the public `run` entry point

use php_js::run;

#[test]
fn arithmetic_and_string_concatenation() {
    let output = run(
        r#"
        $price = 19.99;
        $qty = 3;
        echo "Total: " . ($price * $qty);
        "#,
    );
    assert_eq!(output, "Total: 59.97");
}

#[test]
fn closure_captures_enclosing_scope_and_returns_a_value() {
    let output = run(
        r#"
        function makeCounter() {
            $count = 0;
            function increment() {
                return $count;
            }
            return increment();
        }
        echo makeCounter();
        "#,
    );
    assert_eq!(output, "0");
}

#[test]
fn if_elseif_else_chain_picks_first_true_branch() {
    let output = run(
        r#"
        $grade = 72;
        if ($grade >= 90) {
            echo "A";
        } elseif ($grade >= 80) {
            echo "B";
        } elseif ($grade >= 70) {
            echo "C";
        } else {
            echo "F";
        }
        "#,
    );
    assert_eq!(output, "C");
}

#[test]
fn foreach_preserves_array_insertion_order() {
    let output = run(
        r#"
        $fruits = ["apple", "banana", "cherry"];
        foreach ($fruits as $fruit) {
            echo $fruit . ",";
        }
        "#,
    );
    assert_eq!(output, "apple,banana,cherry,");
}

#[test]
fn for_loop_desugars_to_init_while_with_step_in_body() {
    let output = run(
        r#"
        for ($i = 0; $i < 5; $i = $i + 1) {
            echo $i;
        }
        "#,
    );
    assert_eq!(output, "01234");
}

#[test]
fn undefined_variable_halts_with_runtime_error_message() {
    let output = run("echo $missing;");
    assert!(output.contains("Runtime Error: Undefined variable '$missing'"));
}

#[test]
fn assignment_to_an_undeclared_name_defines_it_in_the_current_scope() {
    let output = run(
        r#"
        function f() {
            $x = 10;
            return $x;
        }
        echo f();
        "#,
    );
    assert_eq!(output, "10");
}

#[test]
fn implicit_declaration_in_a_block_is_visible_to_the_enclosing_scope() {
    let output = run(
        r#"
        if (true) {
            $total = 100;
        }
        echo $total;
        "#,
    );
    assert_eq!(output, "100");
}

#[test]
fn explicit_var_declaration_in_a_block_does_not_leak_out() {
    let output = run(
        r#"
        var $total = 1;
        if (true) {
            var $total = 2;
        }
        echo $total;
        "#,
    );
    assert_eq!(output, "1");
}

#[test]
fn logical_and_short_circuits_before_a_side_effect() {
    let output = run(
        r#"
        $touched = false;
        false && ($touched = true);
        echo $touched;
        "#,
    );
    assert_eq!(output, "");
}

#[test]
fn logical_or_short_circuits_before_a_side_effect() {
    let output = run(
        r#"
        $touched = false;
        true || ($touched = true);
        if ($touched) { echo "yes"; } else { echo "no"; }
        "#,
    );
    assert_eq!(output, "no");
}

#[test]
fn nested_function_calls_and_builtins() {
    let output = run(
        r#"
        $names = ["ada", "grace", "margaret"];
        echo implode(", ", $names);
        "#,
    );
    assert_eq!(output, "ada, grace, margaret");
}

#[test]
fn string_builtins_cover_case_and_length() {
    let output = run(
        r#"
        $s = "Hello World";
        echo strtoupper($s) . " " . strlen($s);
        "#,
    );
    assert_eq!(output, "HELLO WORLD 11");
}

#[test]
fn calling_an_undefined_function_is_a_runtime_error() {
    let output = run("undefinedFunction();");
    assert!(output.contains("Runtime Error: Undefined variable 'undefinedFunction'"));
}

#[test]
fn recursive_function_calls_resolve_through_the_global_scope() {
    let output = run(
        r#"
        function factorial($n) {
            if ($n <= 1) {
                return 1;
            }
            return $n * factorial($n - 1);
        }
        echo factorial(5);
        "#,
    );
    assert_eq!(output, "120");
}
