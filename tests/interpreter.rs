use rust_dmr_scheme::{ErrorKind, Interpreter};

fn run(interpreter: &Interpreter, source: &str) -> String {
    match interpreter.run(source) {
        Ok(text) => text,
        Err(e) => panic!("{} failed with {}: {}", source, e.kind(), e),
    }
}

/// Run every line in one session, returning the output of the last.
fn run_session(lines: &[&str]) -> String {
    let interpreter = Interpreter::new();
    let (last, init) = lines.split_last().expect("at least one line");
    for line in init {
        run(&interpreter, line);
    }
    run(&interpreter, last)
}

fn eval(source: &str) -> String {
    run_session(&[source])
}

fn error_kind(interpreter: &Interpreter, source: &str) -> ErrorKind {
    match interpreter.run(source) {
        Ok(text) => panic!("{} unexpectedly succeeded with {}", source, text),
        Err(e) => e.kind(),
    }
}

fn fresh_error_kind(source: &str) -> ErrorKind {
    error_kind(&Interpreter::new(), source)
}

#[test]
fn arithmetic() {
    assert_eq!(eval("(+ 1 2 3)"), "6");
    assert_eq!(eval("(- 5)"), "-5");
    assert_eq!(eval("(* )"), "1");
    assert_eq!(eval("(+ )"), "0");
    assert_eq!(eval("(- 10 1 2)"), "7");
    assert_eq!(eval("(* 2 3 4)"), "24");
    assert_eq!(eval("(/ 7 2)"), "3");
    assert_eq!(eval("(/ 100 5 2)"), "10");
    assert_eq!(eval("(max 1 5 3)"), "5");
    assert_eq!(eval("(min 4 -2 8)"), "-2");
    assert_eq!(eval("(abs -4)"), "4");
    assert_eq!(eval("(+ -3 +4)"), "1");
}

#[test]
fn arithmetic_errors() {
    assert_eq!(fresh_error_kind("(/ 1 0)"), ErrorKind::Runtime);
    assert_eq!(fresh_error_kind("(+ 1 'a)"), ErrorKind::Runtime);
    assert_eq!(fresh_error_kind("(max)"), ErrorKind::Runtime);
    assert_eq!(fresh_error_kind("(-)"), ErrorKind::Runtime);
}

#[test]
fn comparisons_hold_pairwise() {
    assert_eq!(eval("(< 1 2 3)"), "#t");
    assert_eq!(eval("(< 1 3 2)"), "#f");
    assert_eq!(eval("(>= 3 3 1)"), "#t");
    assert_eq!(eval("(= 2 2 2)"), "#t");
    assert_eq!(eval("(= 2 2 3)"), "#f");
    assert_eq!(eval("(<)"), "#t");
    assert_eq!(fresh_error_kind("(< 1 #t)"), ErrorKind::Runtime);
}

#[test]
fn define_then_set() {
    assert_eq!(
        run_session(&["(define x 5)", "(set! x (+ x 1))", "x"]),
        "6"
    );
}

#[test]
fn define_and_set_print_as_empty() {
    let interpreter = Interpreter::new();
    assert_eq!(run(&interpreter, "(define x 5)"), "()");
    assert_eq!(run(&interpreter, "(set! x 6)"), "()");
}

#[test]
fn lambda_application() {
    assert_eq!(eval("((lambda (x y) (+ x y)) 3 4)"), "7");
    assert_eq!(eval("((lambda () 1 2 3))"), "3");
}

#[test]
fn define_procedure_sugar() {
    assert_eq!(
        run_session(&[
            "(define (fact n) (if (< n 2) 1 (* n (fact (- n 1)))))",
            "(fact 10)"
        ]),
        "3628800"
    );
}

#[test]
fn if_branches() {
    assert_eq!(eval("(if #f 1)"), "()");
    assert_eq!(eval("(if (> 3 2) 'a 'b)"), "a");
    assert_eq!(eval("(if (< 3 2) 'a 'b)"), "b");
    // Anything but #f counts as true.
    assert_eq!(eval("(if '() 'yes 'no)"), "yes");
    assert_eq!(eval("(if 0 'yes 'no)"), "yes");
}

#[test]
fn if_only_evaluates_the_chosen_branch() {
    assert_eq!(eval("(if #t 1 (undefined))"), "1");
    assert_eq!(eval("(if #f (undefined) 2)"), "2");
}

#[test]
fn quoting() {
    assert_eq!(eval("'(1 . 2)"), "(1 . 2)");
    assert_eq!(eval("(quote (a b))"), "(a b)");
    assert_eq!(eval("'()"), "()");
    assert_eq!(eval("'(a (b c) . d)"), "(a (b c) . d)");
    assert_eq!(eval("''a"), "(quote a)");
}

#[test]
fn booleans_self_evaluate() {
    assert_eq!(eval("#t"), "#t");
    assert_eq!(eval("#f"), "#f");
    assert_eq!(eval("(boolean? #f)"), "#t");
    assert_eq!(eval("(boolean? 'a)"), "#f");
    assert_eq!(eval("(symbol? #t)"), "#t");
    assert_eq!(eval("(not #f)"), "#t");
    assert_eq!(eval("(not 1)"), "#f");
}

#[test]
fn pairs_and_lists() {
    assert_eq!(eval("(car (cons 1 2))"), "1");
    assert_eq!(eval("(cdr (cons 1 2))"), "2");
    assert_eq!(eval("(cons 1 '(2 3))"), "(1 2 3)");
    assert_eq!(eval("(list 1 (+ 1 1) 3)"), "(1 2 3)");
    assert_eq!(eval("(list)"), "()");
    assert_eq!(eval("(list-ref '(1 2 3) 1)"), "2");
    assert_eq!(eval("(list-tail '(1 2 3) 1)"), "(2 3)");
    assert_eq!(eval("(list-tail '(1 2 3) 3)"), "()");
    assert_eq!(eval("(cdr '(1))"), "()");
}

#[test]
fn list_predicates() {
    assert_eq!(eval("(list? '(1 2))"), "#t");
    assert_eq!(eval("(list? '())"), "#t");
    assert_eq!(eval("(list? '(1 . 2))"), "#f");
    assert_eq!(eval("(pair? '(1 . 2))"), "#t");
    assert_eq!(eval("(pair? '())"), "#f");
    assert_eq!(eval("(null? '())"), "#t");
    assert_eq!(eval("(null? '(1))"), "#f");
    assert_eq!(eval("(number? 1)"), "#t");
    assert_eq!(eval("(number? 'a)"), "#f");
}

#[test]
fn list_errors() {
    assert_eq!(fresh_error_kind("(car '())"), ErrorKind::Runtime);
    assert_eq!(fresh_error_kind("(cdr 1)"), ErrorKind::Runtime);
    assert_eq!(fresh_error_kind("(list-ref '(1 2) 2)"), ErrorKind::Runtime);
    assert_eq!(fresh_error_kind("(list-ref '(1 2) -1)"), ErrorKind::Runtime);
    assert_eq!(fresh_error_kind("(list-tail '(1 2) 3)"), ErrorKind::Runtime);
    assert_eq!(fresh_error_kind("(set-car! 1 2)"), ErrorKind::Runtime);
    assert_eq!(fresh_error_kind("(cons 1)"), ErrorKind::Runtime);
}

#[test]
fn pair_mutation_is_visible_through_aliases() {
    assert_eq!(
        run_session(&[
            "(define p (list 1 2))",
            "(define q p)",
            "(set-car! q 5)",
            "p"
        ]),
        "(5 2)"
    );
    assert_eq!(
        run_session(&["(define p (cons 1 2))", "(set-cdr! p 3)", "p"]),
        "(1 . 3)"
    );
}

#[test]
fn cyclic_list_prints() {
    assert_eq!(
        run_session(&[
            "(define l (list 1 2))",
            "(set-cdr! (cdr l) l)",
            "l"
        ]),
        "(1 2 ...)"
    );
}

#[test]
fn cyclic_list_is_not_a_list() {
    let interpreter = Interpreter::new();
    run(&interpreter, "(define l (list 1 2))");
    run(&interpreter, "(set-cdr! (cdr l) l)");
    assert_eq!(run(&interpreter, "(list? l)"), "#f");
    assert_eq!(run(&interpreter, "(pair? l)"), "#t");

    run(&interpreter, "(define m (list 1 2 3))");
    run(&interpreter, "(set-cdr! (cdr (cdr m)) (cdr m))");
    assert_eq!(run(&interpreter, "(list? m)"), "#f");

    run(&interpreter, "(define one (list 1))");
    run(&interpreter, "(set-cdr! one one)");
    assert_eq!(run(&interpreter, "(list? one)"), "#f");
    assert_eq!(run(&interpreter, "(list? (list 1 2 3 4 5))"), "#t");
}

#[test]
fn calling_a_non_procedure_names_the_value() {
    let interpreter = Interpreter::new();
    match interpreter.run("(1 2)") {
        Ok(text) => panic!("unexpectedly succeeded with {}", text),
        Err(e) => {
            assert_eq!(e.kind(), ErrorKind::Runtime);
            assert_eq!(e.to_string(), "1 is not a procedure");
        }
    }
}

#[test]
fn and_or_short_circuit() {
    assert_eq!(eval("(and 1 #f (error-if-evaluated))"), "#f");
    assert_eq!(eval("(or #f 2 (error-if-evaluated))"), "2");
    assert_eq!(eval("(and 1 2)"), "2");
    assert_eq!(eval("(or #f #f)"), "#f");
    assert_eq!(eval("(and)"), "#t");
    assert_eq!(eval("(or)"), "#f");
    assert_eq!(fresh_error_kind("(and 1 (error-if-evaluated))"), ErrorKind::Name);
}

#[test]
fn closures_capture_their_defining_environment() {
    assert_eq!(
        run_session(&[
            "(define (make-counter) (define n 0) (lambda () (set! n (+ n 1)) n))",
            "(define c (make-counter))",
            "(c)",
            "(c)"
        ]),
        "2"
    );
    assert_eq!(
        run_session(&[
            "(define (adder n) (lambda (x) (+ x n)))",
            "(define add5 (adder 5))",
            "(add5 10)"
        ]),
        "15"
    );
}

#[test]
fn closures_sharing_an_environment_see_each_others_mutations() {
    assert_eq!(
        run_session(&[
            "(define (make-cell v) (list (lambda () v) (lambda (x) (set! v x))))",
            "(define cell (make-cell 1))",
            "((car (cdr cell)) 42)",
            "((car cell))"
        ]),
        "42"
    );
}

#[test]
fn scoping_is_lexical_not_dynamic() {
    assert_eq!(
        run_session(&[
            "(define a 1)",
            "(define (get-a) a)",
            "(define (g a) (get-a))",
            "(g 100)"
        ]),
        "1"
    );
}

#[test]
fn parameters_shadow_globals() {
    let interpreter = Interpreter::new();
    run(&interpreter, "(define x 1)");
    assert_eq!(
        run(&interpreter, "((lambda (x) (set! x 10) x) 5)"),
        "10"
    );
    assert_eq!(run(&interpreter, "x"), "1");
}

#[test]
fn arguments_are_evaluated_in_the_callers_environment() {
    assert_eq!(
        run_session(&["(define y 2)", "((lambda (x) (+ x y)) y)"]),
        "4"
    );
}

#[test]
fn define_inside_a_body_stays_local() {
    let interpreter = Interpreter::new();
    run(&interpreter, "(define (f) (define local 1) local)");
    assert_eq!(run(&interpreter, "(f)"), "1");
    assert_eq!(error_kind(&interpreter, "local"), ErrorKind::Name);
}

#[test]
fn procedures_print_as_opaque_values() {
    let interpreter = Interpreter::new();
    run(&interpreter, "(define (f x y) x)");
    assert_eq!(run(&interpreter, "f"), "#<lambda (x y)>");
    assert_eq!(run(&interpreter, "car"), "#<primitive car>");
}

#[test]
fn name_errors() {
    let interpreter = Interpreter::new();
    assert_eq!(error_kind(&interpreter, "undefined"), ErrorKind::Name);
    assert_eq!(error_kind(&interpreter, "(set! undefined 1)"), ErrorKind::Name);
    assert_eq!(error_kind(&interpreter, "(undefined 1 2)"), ErrorKind::Name);
}

#[test]
fn runtime_errors() {
    let interpreter = Interpreter::new();
    assert_eq!(error_kind(&interpreter, "(1 2)"), ErrorKind::Runtime);
    assert_eq!(error_kind(&interpreter, "()"), ErrorKind::Runtime);
    assert_eq!(
        error_kind(&interpreter, "((lambda (x) x))"),
        ErrorKind::Runtime
    );
    assert_eq!(
        error_kind(&interpreter, "((lambda (x) x) 1 2)"),
        ErrorKind::Runtime
    );
    assert_eq!(error_kind(&interpreter, "(set! 1 2)"), ErrorKind::Runtime);
    assert_eq!(error_kind(&interpreter, "(define 1 2)"), ErrorKind::Runtime);
    assert_eq!(error_kind(&interpreter, "(car (list))"), ErrorKind::Runtime);
}

#[test]
fn syntax_errors() {
    let interpreter = Interpreter::new();
    for source in &[
        "",
        "(1 2",
        ")",
        "'",
        "(1 . )",
        "(1 . 2 3)",
        "1 2",
        "(+ 1 2) x",
        "(a \"b\")",
        "(if 1)",
        "(if 1 2 3 4)",
        "(quote)",
        "(quote 1 2)",
        "(lambda (1) 1)",
        "(lambda (x . y) x)",
        "(lambda (x))",
        "(define x 1 2)",
        "(+ 1 . 2)",
    ] {
        assert_eq!(
            error_kind(&interpreter, source),
            ErrorKind::Syntax,
            "for {:?}",
            source
        );
    }
}

#[test]
fn failed_calls_leave_the_session_usable() {
    let interpreter = Interpreter::new();
    run(&interpreter, "(define x 1)");
    run(&interpreter, "(define (f y) (define inner y) (undefined-fn))");
    assert_eq!(error_kind(&interpreter, "(f 5)"), ErrorKind::Name);
    assert_eq!(error_kind(&interpreter, "inner"), ErrorKind::Name);
    assert_eq!(error_kind(&interpreter, "(f)"), ErrorKind::Runtime);
    assert_eq!(error_kind(&interpreter, "(5 6)"), ErrorKind::Runtime);
    run(&interpreter, "(define z 3)");
    assert_eq!(run(&interpreter, "(+ x z)"), "4");
}

#[test]
fn special_forms_are_ordinary_bindings() {
    assert_eq!(
        run_session(&["(define my-if if)", "(my-if #f 1 2)"]),
        "2"
    );
}

#[test]
fn surrounding_whitespace_is_ignored() {
    assert_eq!(eval("  \n (+ 1 2)\t "), "3");
}

#[test]
fn deep_recursion_within_reason() {
    assert_eq!(
        run_session(&[
            "(define (count n acc) (if (= n 0) acc (count (- n 1) (+ acc 1))))",
            "(count 50 0)"
        ]),
        "50"
    );
}
