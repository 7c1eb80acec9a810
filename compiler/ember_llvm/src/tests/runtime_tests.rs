use pretty_assertions::assert_eq;

use ember_parse::CompileOptions;

use super::{arg, run, run_main};
use crate::{compile, Context, Evaluator, JitValue};

#[test]
fn precedence_at_runtime() {
    let source = "\
fn main() -> i64 {
    a: i64 = 2;
    b: i64 = 3;
    return a + b * 4 - 1;
}
";
    assert_eq!(run_main(source), 13);
    assert_eq!(
        run_main("fn main() -> i64 { a: i64 = 2; return (a + 3) * 4; }"),
        20
    );
}

#[test]
fn compound_assignment_chain() {
    let source = "\
fn main() -> i64 {
    x: i64 = 5;
    x += 3; x *= 2; x -= 1; x <<= 2; x >>= 1;
    x %= 7; x |= 8; x &= 12; x ^= 5; x /= 3;
    return x;
}
";
    assert_eq!(run_main(source), 4);
}

#[test]
fn complement() {
    assert_eq!(run_main("fn main() -> i64 { x: i64 = 5; x ~~; return x; }"), -6);
    assert_eq!(run_main("fn main() -> i64 { x: i64 = 5; return ~x; }"), -6);
}

#[test]
fn unsigned_arithmetic_wraps_at_the_declared_width() {
    let value = run("fn main() -> u8 { x: u8 = 250; return x + 10; }", "main", &[]);
    assert_eq!(value, JitValue::Int { width: 8, bits: 4 });

    let u8_main = |expr: &str| {
        let source = format!("fn main() -> u8 {{ x: u8 = 200; return {expr}; }}");
        run(&source, "main", &[]).as_unsigned()
    };
    assert_eq!(u8_main("x / 3"), Some(66));
    assert_eq!(u8_main("x >> 1"), Some(100));
    assert_eq!(u8_main("x % 7"), Some(4));
}

#[test]
fn signed_narrow_arithmetic() {
    let i8_main = |init: i64, expr: &str| {
        let source = format!("fn main() -> i8 {{ x: i8 = {init}; return {expr}; }}");
        run(&source, "main", &[]).as_signed()
    };
    assert_eq!(i8_main(-100, "x >> 1"), Some(-50));
    assert_eq!(i8_main(-7, "x % 2"), Some(-1));
    assert_eq!(i8_main(-7, "x / 2"), Some(-3));
}

#[test]
fn entry_point_results_keep_their_width() {
    let value = run("fn main() -> u8 { return 200; }", "main", &[]);
    assert_eq!(value.as_unsigned(), Some(200));
    assert_eq!(value.as_signed(), Some(-56));

    let value = run("fn main() {}", "main", &[]);
    assert_eq!(value, JitValue::Int { width: 32, bits: 0 });
}

#[test]
fn largest_unsigned_literal_round_trips() {
    let value = run(
        "fn main() -> u64 { return 0xFFFF_FFFF_FFFF_FFFF; }",
        "main",
        &[],
    );
    assert_eq!(value.as_unsigned(), Some(u64::MAX));

    let value = run(
        "fn main() -> u64 { x: u64 = 0xFFFF_FFFF_FFFF_FFFF; return x - 1; }",
        "main",
        &[],
    );
    assert_eq!(value.as_unsigned(), Some(u64::MAX - 1));
}

#[test]
fn loops() {
    let sum = "\
fn main() -> i64 {
    total: i64 = 0;
    i: i64 = 0;
    while i < 10 {
        total += i;
        i += 1;
    }
    return total;
}
";
    assert_eq!(run_main(sum), 45);

    let nested = "\
fn main() -> i64 {
    total: i64 = 0;
    i: i64 = 0;
    while i < 4 {
        j: i64 = 0;
        while j < i {
            total += 1;
            j += 1;
        }
        i += 1;
    }
    return total;
}
";
    assert_eq!(run_main(nested), 6);
}

#[test]
fn parameters_are_mutable_copies() {
    let source = "\
fn countdown(n: i64) -> i64 {
    steps: i64 = 0;
    while n > 0 { n -= 2; steps += 1; }
    return steps;
}
";
    assert_eq!(run(source, "countdown", &[7]).as_signed(), Some(4));
    assert_eq!(run(source, "countdown", &[8]).as_signed(), Some(4));
    assert_eq!(run(source, "countdown", &[arg(-1)]).as_signed(), Some(0));
}

#[test]
fn shadowing() {
    let inner = "\
fn main() -> i64 {
    x: i64 = 1;
    {
        x: i64 = 2;
        x += 10;
    }
    return x;
}
";
    assert_eq!(run_main(inner), 1);
    assert_eq!(
        run_main("fn main() -> i64 { x: i64 = 1; { x = 5; } return x; }"),
        5
    );
}

#[test]
fn globals_are_read_and_written() {
    let source = "\
fn main() -> i64 {
    counter *= 3;
    return counter;
}
counter: i64 = 14;
";
    assert_eq!(run_main(source), 42);
}

#[test]
fn branches() {
    let sign = "\
fn sign(a: i64) -> i64 {
    if a > 0 {
        return 1;
    } else if a < 0 {
        return -1;
    }
    return 0;
}
";
    assert_eq!(run(sign, "sign", &[5]).as_signed(), Some(1));
    assert_eq!(run(sign, "sign", &[arg(-3)]).as_signed(), Some(-1));
    assert_eq!(run(sign, "sign", &[0]).as_signed(), Some(0));

    let clamp = "fn clamp(a: i64) -> i64 { if a > 10 { a = 10; } return a; }";
    assert_eq!(run(clamp, "clamp", &[42]).as_signed(), Some(10));
    assert_eq!(run(clamp, "clamp", &[3]).as_signed(), Some(3));

    let pick = "fn pick(a: i64) -> i64 { if a > 0 { return 1; } else { return 2; } }";
    assert_eq!(run(pick, "pick", &[1]).as_signed(), Some(1));
    assert_eq!(run(pick, "pick", &[0]).as_signed(), Some(2));
}

#[test]
fn two_arguments() {
    let source = "fn max(a: i64, b: i64) -> i64 { if a > b { return a; } return b; }";
    assert_eq!(run(source, "max", &[3, 9]).as_signed(), Some(9));
    assert_eq!(run(source, "max", &[arg(-3), arg(-9)]).as_signed(), Some(-3));
}

#[test]
fn floats_and_bools() {
    let value = run(
        "fn scale() -> f64 { f: f64 = 1.5; return f * 2.0 - 0.5; }",
        "scale",
        &[],
    );
    assert_eq!(value.as_float().map(f64::to_bits), Some(2.5f64.to_bits()));

    let value = run(
        "fn quarter() -> f32 { f: f32 = 1.0; return f / 4.0; }",
        "quarter",
        &[],
    );
    assert_eq!(value.as_float().map(f64::to_bits), Some(0.25f64.to_bits()));

    let source = "fn big(n: i64) -> bool { return n > 100; }";
    assert_eq!(run(source, "big", &[101]), JitValue::Int { width: 1, bits: 1 });
    assert_eq!(run(source, "big", &[100]), JitValue::Int { width: 1, bits: 0 });
}

#[test]
fn void_functions() {
    assert_eq!(run("fn helper() {} fn main() {}", "helper", &[]), JitValue::Void);
}

#[test]
fn unsupported_calls_are_errors() {
    let context = Context::create();
    let source = "fn wide() -> i128 { return 1; } fn one(a: i64) -> i64 { return a; }";
    let module = compile(&context, source, &CompileOptions::default()).unwrap();
    let evaluator = Evaluator::new(module).unwrap();

    let err = evaluator.call("wide", &[]).unwrap_err();
    assert!(err.to_string().contains("cannot be read back"), "{err}");
    let err = evaluator.call("one", &[]).unwrap_err();
    assert_eq!(err.to_string(), "`one` takes 1 argument(s), 0 given");
    let err = evaluator.call("absent", &[]).unwrap_err();
    assert_eq!(err.to_string(), "function `absent` not found");
}
