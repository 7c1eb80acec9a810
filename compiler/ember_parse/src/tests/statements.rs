use pretty_assertions::assert_eq;

use ember_diagnostic::ErrorCode;

use super::recorder::{Op, Recorder};
use super::{compile_ok, error_code};
use crate::backend::IrType;

/// Blocks of `function` in layout order.
fn blocks(recorder: &Recorder, function: &str) -> Vec<super::recorder::Block> {
    recorder.function(function).blocks.clone()
}

#[test]
fn allocas_are_hoisted_to_the_entry_block() {
    let source = "\
fn main() {
    n: i64 = 0;
    while n < 3 {
        step: i64 = 1;
        if n == 1 { inner: bool = true; }
        n += step;
    }
}
";
    let recorder = compile_ok(source);
    let layout = blocks(&recorder, "main");
    let allocas_in = |block| {
        recorder
            .block(block)
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Alloca { .. }))
            .count()
    };
    assert_eq!(allocas_in(layout[0]), 3);
    assert!(layout[1..].iter().all(|&b| allocas_in(b) == 0));
    // Allocas come first, in declaration order.
    let entry = &recorder.block(layout[0]).ops;
    let names: Vec<&str> = entry[..3]
        .iter()
        .map(|op| match *op {
            Op::Alloca { result, .. } => recorder.value(result).name.as_str(),
            _ => panic!("{op:?} before an alloca"),
        })
        .collect();
    assert_eq!(names, ["n", "step", "inner"]);
}

#[test]
fn while_loop_shape() {
    let recorder = compile_ok("fn main() { x: i64 = 0; while x < 3 { x += 1; } }");
    assert_eq!(
        recorder.block_labels("main"),
        ["entry", "while_condition", "while_body", "while_exit"]
    );
    let layout = blocks(&recorder, "main");
    assert_eq!(recorder.terminator("main", "entry"), &Op::Br(layout[1]));
    assert!(matches!(
        recorder.terminator("main", "while_condition"),
        Op::CondBr { then_dest, else_dest, .. }
            if *then_dest == layout[2] && *else_dest == layout[3]
    ));
    assert_eq!(recorder.terminator("main", "while_body"), &Op::Br(layout[1]));
    assert!(matches!(recorder.terminator("main", "while_exit"), Op::Ret(Some(_))));
}

#[test]
fn nested_loops() {
    let source = "\
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
    let recorder = compile_ok(source);
    assert_eq!(
        recorder.block_labels("main"),
        [
            "entry",
            "while_condition",
            "while_body",
            "while_condition",
            "while_body",
            "while_exit",
            "while_exit",
        ]
    );
    // The inner exit jumps back to the outer condition.
    let layout = blocks(&recorder, "main");
    assert_eq!(recorder.block(layout[5]).ops.last(), Some(&Op::Br(layout[1])));
}

#[test]
fn parameters_are_copied_into_storage() {
    let source = "\
fn countdown(n: i64) -> i64 {
    steps: i64 = 0;
    while n > 0 { n -= 2; steps += 1; }
    return steps;
}
";
    let recorder = compile_ok(source);
    let function = recorder.function("countdown");
    let entry = &recorder.block(function.blocks[0]).ops;
    let Op::Alloca { result: slot, ty } = entry[0] else {
        panic!("entry starts with {:?}", entry[0]);
    };
    assert_eq!(ty, IrType::I64);
    assert_eq!(recorder.value(slot).name, "n.addr");
    assert_eq!(recorder.value(function.params[0]).name, "n");
    assert!(entry.contains(&Op::Store {
        value: function.params[0],
        ptr: slot,
    }));
}

#[test]
fn inner_declarations_shadow_and_expire() {
    let source = "\
fn main() -> i64 {
    x: i64 = 1;
    {
        x: i64 = 2;
        x += 10;
    }
    return x;
}
";
    let recorder = compile_ok(source);
    let entry = &recorder.block(blocks(&recorder, "main")[0]).ops;
    let slots: Vec<_> = entry
        .iter()
        .filter_map(|op| match *op {
            Op::Alloca { result, .. } => Some(result),
            _ => None,
        })
        .collect();
    assert_eq!(slots.len(), 2);
    // The compound assignment targets the inner `x`, the return reads the outer.
    let loads: Vec<_> = entry
        .iter()
        .filter_map(|op| match *op {
            Op::Load { ptr, .. } => Some(ptr),
            _ => None,
        })
        .collect();
    assert_eq!(loads, [slots[1], slots[0]]);

    let outer_visible = "fn main() -> i64 { x: i64 = 1; { x = 5; } return x; }";
    let recorder = compile_ok(outer_visible);
    assert_eq!(recorder.count_ops("main", |op| matches!(op, Op::Alloca { .. })), 1);
}

#[test]
fn sibling_blocks_may_reuse_names() {
    compile_ok("fn main() { { a: i64 = 1; } { a: bool = true; } }");
    assert_eq!(
        error_code("fn main() { { a: i64 = 1; } a = 2; }"),
        ErrorCode::E2013
    );
}

#[test]
fn parameters_shadow_globals() {
    let source = "\
g: i64 = 5;
fn f(g: i64) -> i64 { return g; }
fn main() -> i64 { return g; }
";
    let recorder = compile_ok(source);
    let (_, _, global) = recorder.globals[0];
    let loaded = |function: &str| {
        let entry = &recorder.block(recorder.function(function).blocks[0]).ops;
        entry.iter().find_map(|op| match *op {
            Op::Load { ptr, .. } => Some(ptr),
            _ => None,
        })
    };
    assert_ne!(loaded("f"), Some(global));
    assert_eq!(loaded("main"), Some(global));
}

#[test]
fn locals_write_through_to_globals() {
    let source = "\
counter: i64 = 1;
fn main() -> i64 {
    counter *= 3;
    return counter;
}
";
    let recorder = compile_ok(source);
    let (_, _, global) = recorder.globals[0];
    assert_eq!(
        recorder.count_ops("main", |op| matches!(op, Op::Store { ptr, .. } if *ptr == global)),
        1
    );
    assert_eq!(recorder.count_ops("main", |op| matches!(op, Op::Alloca { .. })), 0);
}

#[test]
fn duplicate_local_in_one_scope() {
    assert_eq!(
        error_code("fn main() { x: i64 = 1; x: i64 = 2; }"),
        ErrorCode::E2006
    );
    let err = super::compile_err("fn main() { x: i64; x: bool; }");
    assert_eq!(err.to_string(), "`x` is already declared in this scope");
}

#[test]
fn declaration_is_visible_in_its_own_initializer() {
    let recorder = compile_ok("fn main() { x: i64 = x + 1; }");
    let entry = &recorder.block(blocks(&recorder, "main")[0]).ops;
    let Op::Alloca { result: slot, .. } = entry[0] else {
        panic!("entry starts with {:?}", entry[0]);
    };
    assert!(matches!(entry[1], Op::Load { ptr, .. } if ptr == slot));
    assert!(matches!(entry[2], Op::Binary { .. }));
    assert!(matches!(entry[3], Op::Store { ptr, .. } if ptr == slot));
}

#[test]
fn uninitialized_declaration_stores_nothing() {
    let recorder = compile_ok("fn main() { x: i64; y: f32; }");
    assert_eq!(recorder.count_ops("main", |op| matches!(op, Op::Store { .. })), 0);
    assert_eq!(recorder.count_ops("main", |op| matches!(op, Op::Alloca { .. })), 2);
}

#[test]
fn implicit_returns() {
    let recorder = compile_ok("fn helper() {} fn main() {}");
    assert_eq!(recorder.terminator("helper", "entry"), &Op::Ret(None));
    assert!(matches!(recorder.terminator("main", "entry"), Op::Ret(Some(_))));

    let recorder = compile_ok("fn main() -> i16 { x: i16 = 4; }");
    assert_eq!(super::returned_int(&recorder, "main", 16), 0);
}

#[test]
fn falling_off_a_value_function() {
    let err = super::compile_err("fn f() -> i64 {\n    x: i64 = 1;\n}\n");
    assert_eq!(err.code(), ErrorCode::E2011);
    assert_eq!(
        err.to_string(),
        "function `f` can reach its end without returning a `i64`"
    );
    assert_eq!(
        error_code("fn f(a: i64) -> i64 { while a > 0 { return 1; } }"),
        ErrorCode::E2011
    );
    assert_eq!(
        error_code("fn f(a: i64) -> i64 { if a > 0 { return 1; } }"),
        ErrorCode::E2011
    );
}

#[test]
fn both_arms_returning_leave_an_unreachable_merge() {
    let recorder = compile_ok("fn f(a: i64) -> i64 { if a > 0 { return 1; } else { return 2; } }");
    assert_eq!(recorder.terminator("f", "if_merge"), &Op::Unreachable);
    assert_eq!(
        recorder.count_ops("f", |op| matches!(op, Op::Ret(Some(_)))),
        2
    );
}

#[test]
fn statements_after_return_go_to_a_dead_block() {
    let recorder = compile_ok("fn f() -> i64 { return 1; x: i64 = 2; }");
    assert_eq!(recorder.block_labels("f"), ["entry", "after_return"]);
    assert_eq!(recorder.terminator("f", "after_return"), &Op::Unreachable);
    assert_eq!(super::returned_int(&recorder, "f", 64), 1);
}

#[test]
fn if_without_else_branches_to_merge() {
    let source = "\
fn clamp(a: i64) -> i64 {
    if a > 10 { a = 10; }
    return a;
}
";
    let recorder = compile_ok(source);
    assert_eq!(
        recorder.block_labels("clamp"),
        ["entry", "if_then", "if_merge"]
    );
    let layout = blocks(&recorder, "clamp");
    assert!(matches!(
        recorder.terminator("clamp", "entry"),
        Op::CondBr { then_dest, else_dest, .. }
            if *then_dest == layout[1] && *else_dest == layout[2]
    ));
    assert_eq!(recorder.terminator("clamp", "if_then"), &Op::Br(layout[2]));
}

#[test]
fn else_if_chains() {
    let source = "\
fn sign(a: i64) -> i64 {
    if a > 0 {
        return 1;
    } else if a < 0 {
        return -1;
    }
    return 0;
}
";
    let recorder = compile_ok(source);
    assert_eq!(
        recorder.block_labels("sign"),
        ["entry", "if_then", "if_else", "if_then", "if_merge", "if_merge"]
    );
    assert_eq!(
        recorder.count_ops("sign", |op| matches!(op, Op::CondBr { .. })),
        2
    );
}

#[test]
fn return_must_match_the_signature() {
    assert_eq!(error_code("fn f() { return 1; }"), ErrorCode::E2012);
    assert_eq!(error_code("fn f() -> i64 { return; }"), ErrorCode::E2012);
    assert_eq!(
        error_code("fn f() -> i64 { b: bool = true; return b; }"),
        ErrorCode::E2001
    );
    compile_ok("fn f() { return; }");
}

#[test]
fn misplaced_items_inside_bodies() {
    assert_eq!(error_code("fn main() { fn g() {} }"), ErrorCode::E1001);
    assert_eq!(error_code("fn main() { else {} }"), ErrorCode::E1001);
    assert_eq!(error_code("fn main() { x: i64 = 1 }"), ErrorCode::E1001);
}
