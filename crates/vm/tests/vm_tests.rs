//! Integration tests for the IPPcode18 interpreter.
//!
//! Organized by opcode group. Most programs are written as source text and
//! loaded with the assembler; programs with sparse positions are built by
//! hand.

use ippcode_assembler::assemble;
use ippcode_common::{ErrorCode, Instruction, Operand, Program, Value};
use ippcode_verifier::verify;
use ippcode_vm::{run, Fault, Interpreter, Io, RuntimeError, Stats};
use proptest::prelude::*;

// ============================================================
// Helper functions
// ============================================================

struct Outcome {
    result: Result<Stats, Fault>,
    stdout: String,
    stderr: String,
}

impl Outcome {
    fn code(&self) -> ErrorCode {
        match &self.result {
            Ok(_) => panic!("expected a fault, program completed: {}", self.stdout),
            Err(fault) => fault.code(),
        }
    }

    fn stats(&self) -> Stats {
        match &self.result {
            Ok(stats) => *stats,
            Err(fault) => panic!("unexpected fault: {fault}"),
        }
    }
}

fn run_program(program: &Program, input: &str) -> Outcome {
    let mut input = input.as_bytes();
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let result = run(program, Io::new(&mut input, &mut stdout, &mut stderr));
    Outcome {
        result,
        stdout: String::from_utf8(stdout).unwrap(),
        stderr: String::from_utf8(stderr).unwrap(),
    }
}

/// Assemble body lines (without header) and run them.
fn run_source(body: &str) -> Outcome {
    run_with_input(body, "")
}

fn run_with_input(body: &str, input: &str) -> Outcome {
    let program = assemble(&format!(".IPPcode18\n{body}")).unwrap();
    run_program(&program, input)
}

/// Run to completion and return the final value of a global variable.
fn global_after(body: &str, name: &str) -> Option<Value> {
    let program = assemble(&format!(".IPPcode18\n{body}")).unwrap();
    let checked = verify(&program).unwrap();
    let mut input: &[u8] = b"";
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let mut interpreter = Interpreter::new(&checked, Io::new(&mut input, &mut stdout, &mut stderr));
    interpreter.execute().unwrap();
    interpreter.frames().global().slot(name).cloned().flatten()
}

fn at(position: u64, opcode: &str, operands: Vec<Operand>) -> Instruction {
    Instruction::new(position, opcode, operands)
}

// ============================================================
// Moves and arithmetic
// ============================================================

#[test]
fn add_then_compare() {
    let body = "\
DEFVAR GF@x
DEFVAR GF@b
MOVE GF@x int@1
ADD GF@x GF@x int@41
EQ GF@b GF@x int@42
";
    assert_eq!(global_after(body, "x"), Some(Value::Int(42)));
    assert_eq!(global_after(body, "b"), Some(Value::Bool(true)));
}

#[test]
fn arithmetic_results() {
    let out = run_source(
        "\
DEFVAR GF@r
SUB GF@r int@3 int@10
WRITE GF@r
WRITE string@,
MUL GF@r int@-6 int@7
WRITE GF@r
WRITE string@,
IDIV GF@r int@-7 int@2
WRITE GF@r
",
    );
    assert_eq!(out.stdout, "-7,-42,-4");
}

#[test]
fn idiv_by_zero() {
    let out = run_source("DEFVAR GF@r\nIDIV GF@r int@0 int@0\n");
    assert_eq!(out.code(), ErrorCode::Arithmetic);
    assert!(matches!(
        out.result,
        Err(Fault::Runtime(RuntimeError::DivisionByZero { at: 2 }))
    ));
}

#[test]
fn add_overflow() {
    let out = run_source("DEFVAR GF@r\nADD GF@r int@9223372036854775807 int@1\n");
    assert_eq!(out.code(), ErrorCode::Arithmetic);
}

#[test]
fn arithmetic_rejects_non_int() {
    let out = run_source("DEFVAR GF@r\nADD GF@r int@1 bool@true\n");
    assert_eq!(out.code(), ErrorCode::OperandType);
}

#[test]
fn faulting_instruction_does_not_write() {
    let program = assemble(".IPPcode18\nDEFVAR GF@r\nMOVE GF@r int@5\nIDIV GF@r GF@r int@0\n")
        .unwrap();
    let checked = verify(&program).unwrap();
    let mut input: &[u8] = b"";
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let mut interpreter = Interpreter::new(&checked, Io::new(&mut input, &mut stdout, &mut stderr));
    assert!(interpreter.execute().is_err());
    assert_eq!(
        interpreter.frames().global().slot("r"),
        Some(&Some(Value::Int(5)))
    );
    assert_eq!(interpreter.stats().variable_writes, 1);
}

// ============================================================
// Variables and frames
// ============================================================

#[test]
fn uninitialized_read() {
    let out = run_source("DEFVAR GF@x\nWRITE GF@x\n");
    assert_eq!(out.code(), ErrorCode::MissingValue);
}

#[test]
fn uninitialized_move_source() {
    let out = run_source("DEFVAR GF@x\nDEFVAR GF@y\nMOVE GF@y GF@x\n");
    assert_eq!(out.code(), ErrorCode::MissingValue);
}

#[test]
fn undeclared_variable() {
    let out = run_source("MOVE GF@nope int@1\n");
    assert_eq!(out.code(), ErrorCode::UndefinedVariable);
}

#[test]
fn redeclared_variable() {
    let out = run_source("DEFVAR GF@x\nDEFVAR GF@x\n");
    assert_eq!(out.code(), ErrorCode::Semantic);
}

#[test]
fn temporary_frame_inactive() {
    let out = run_source("DEFVAR TF@x\n");
    assert_eq!(out.code(), ErrorCode::UndefinedVariable);
}

#[test]
fn push_without_temporary_frame() {
    let out = run_source("PUSHFRAME\n");
    assert_eq!(out.code(), ErrorCode::FrameAccess);
}

#[test]
fn local_frame_stack_empty() {
    assert_eq!(run_source("POPFRAME\n").code(), ErrorCode::FrameAccess);
    assert_eq!(run_source("WRITE LF@x\n").code(), ErrorCode::FrameAccess);
}

#[test]
fn pushed_frame_becomes_local() {
    let out = run_source(
        "\
CREATEFRAME
DEFVAR TF@v
MOVE TF@v string@inner
PUSHFRAME
WRITE LF@v
POPFRAME
WRITE TF@v
",
    );
    assert_eq!(out.stdout, "innerinner");
}

#[test]
fn pushframe_leaves_temporary_inactive() {
    let out = run_source("CREATEFRAME\nPUSHFRAME\nDEFVAR TF@x\n");
    assert_eq!(out.code(), ErrorCode::UndefinedVariable);
}

#[test]
fn createframe_discards_previous_temporary() {
    let out = run_source("CREATEFRAME\nDEFVAR TF@x\nCREATEFRAME\nMOVE TF@x int@1\n");
    assert_eq!(out.code(), ErrorCode::UndefinedVariable);
}

// ============================================================
// Relational and boolean
// ============================================================

#[test]
fn relational_operators() {
    let out = run_source(
        "\
DEFVAR GF@r
LT GF@r int@1 int@2
WRITE GF@r
GT GF@r int@1 int@2
WRITE GF@r
GT GF@r string@b string@abc
WRITE GF@r
LT GF@r bool@false bool@true
WRITE GF@r
EQ GF@r string@ string@
WRITE GF@r
",
    );
    assert_eq!(out.stdout, "truefalsetruetruetrue");
}

#[test]
fn comparison_of_different_types() {
    let out = run_source("DEFVAR GF@r\nLT GF@r int@1 string@1\n");
    assert_eq!(out.code(), ErrorCode::OperandType);
}

#[test]
fn boolean_operators() {
    let out = run_source(
        "\
DEFVAR GF@r
AND GF@r bool@true bool@false
WRITE GF@r
OR GF@r bool@true bool@false
WRITE GF@r
NOT GF@r GF@r
WRITE GF@r
",
    );
    assert_eq!(out.stdout, "falsetruefalse");
}

#[test]
fn not_rejects_int() {
    assert_eq!(
        run_source("DEFVAR GF@r\nNOT GF@r int@0\n").code(),
        ErrorCode::OperandType
    );
}

// ============================================================
// Strings
// ============================================================

#[test]
fn stri2int_in_range() {
    assert_eq!(
        global_after("DEFVAR GF@c\nSTRI2INT GF@c string@abc int@1\n", "c"),
        Some(Value::Int(98))
    );
}

#[test]
fn stri2int_out_of_range() {
    let out = run_source("DEFVAR GF@c\nSTRI2INT GF@c string@abc int@5\n");
    assert_eq!(out.code(), ErrorCode::StringBounds);
    let out = run_source("DEFVAR GF@c\nSTRI2INT GF@c string@abc int@-1\n");
    assert_eq!(out.code(), ErrorCode::StringBounds);
}

#[test]
fn int2char() {
    assert_eq!(
        global_after("DEFVAR GF@s\nINT2CHAR GF@s int@65\n", "s"),
        Some(Value::Str("A".into()))
    );
    let out = run_source("DEFVAR GF@s\nINT2CHAR GF@s int@-1\n");
    assert_eq!(out.code(), ErrorCode::StringBounds);
    let out = run_source("DEFVAR GF@s\nINT2CHAR GF@s int@55296\n");
    assert_eq!(out.code(), ErrorCode::StringBounds);
}

#[test]
fn concat_and_strlen() {
    let out = run_source(
        "\
DEFVAR GF@s
DEFVAR GF@n
CONCAT GF@s string@p\\345\\237 string@\\269k
STRLEN GF@n GF@s
WRITE GF@s
WRITE string@\\032
WRITE GF@n
",
    );
    assert_eq!(out.stdout, "p\u{159}\u{ed}\u{10d}k 5");
}

#[test]
fn getchar() {
    assert_eq!(
        global_after("DEFVAR GF@s\nGETCHAR GF@s string@xyz int@2\n", "s"),
        Some(Value::Str("z".into()))
    );
    assert_eq!(
        run_source("DEFVAR GF@s\nGETCHAR GF@s string@ int@0\n").code(),
        ErrorCode::StringBounds
    );
}

#[test]
fn setchar() {
    let body = "\
DEFVAR GF@s
MOVE GF@s string@kitten
SETCHAR GF@s int@0 string@mop
";
    assert_eq!(global_after(body, "s"), Some(Value::Str("mitten".into())));
}

#[test]
fn setchar_faults() {
    let empty = run_source("DEFVAR GF@s\nMOVE GF@s string@ab\nSETCHAR GF@s int@0 string@\n");
    assert_eq!(empty.code(), ErrorCode::StringBounds);

    let range = run_source("DEFVAR GF@s\nMOVE GF@s string@ab\nSETCHAR GF@s int@2 string@c\n");
    assert_eq!(range.code(), ErrorCode::StringBounds);

    let not_string = run_source("DEFVAR GF@s\nMOVE GF@s int@1\nSETCHAR GF@s int@0 string@c\n");
    assert_eq!(not_string.code(), ErrorCode::OperandType);
}

#[test]
fn string_ops_reject_other_types() {
    assert_eq!(
        run_source("DEFVAR GF@s\nCONCAT GF@s string@a int@1\n").code(),
        ErrorCode::OperandType
    );
    assert_eq!(
        run_source("DEFVAR GF@s\nSTRLEN GF@s bool@true\n").code(),
        ErrorCode::OperandType
    );
}

// ============================================================
// TYPE, READ, WRITE, DPRINT
// ============================================================

#[test]
fn type_of_values_and_uninitialized() {
    let out = run_source(
        "\
DEFVAR GF@t
DEFVAR GF@u
TYPE GF@t GF@u
WRITE string@[
WRITE GF@t
WRITE string@]
TYPE GF@t int@3
WRITE GF@t
TYPE GF@t GF@t
WRITE GF@t
",
    );
    assert_eq!(out.stdout, "[]intstring");
}

#[test]
fn type_of_undeclared_still_faults() {
    let out = run_source("DEFVAR GF@t\nTYPE GF@t GF@missing\n");
    assert_eq!(out.code(), ErrorCode::UndefinedVariable);
}

#[test]
fn read_each_type() {
    let body = "\
DEFVAR GF@i
DEFVAR GF@b
DEFVAR GF@s
DEFVAR GF@bad
READ GF@i int
READ GF@b bool
READ GF@s string
READ GF@bad int
WRITE GF@i
WRITE GF@b
WRITE GF@s
WRITE GF@bad
";
    let out = run_with_input(body, "42\nTRUE\n  two words \nforty\n");
    assert_eq!(out.stdout, "42true  two words 0");
}

#[test]
fn read_past_end_of_input() {
    let body = "\
DEFVAR GF@b
DEFVAR GF@s
READ GF@b bool
READ GF@s string
TYPE GF@s GF@s
WRITE GF@b
WRITE GF@s
";
    let out = run_with_input(body, "");
    assert_eq!(out.stdout, "falsestring");
}

#[test]
fn dprint_goes_to_diagnostic_stream() {
    let out = run_source("WRITE int@1\nDPRINT string@debug\n");
    assert_eq!(out.stdout, "1");
    assert_eq!(out.stderr, "debug");
}

#[test]
fn break_dumps_state() {
    let out = run_source(
        "\
DEFVAR GF@x
MOVE GF@x int@7
PUSHS string@top
CREATEFRAME
BREAK
",
    );
    assert!(out.stderr.contains("BREAK at position 5"), "{}", out.stderr);
    assert!(out.stderr.contains("instructions executed: 5"));
    assert!(out.stderr.contains("variable writes: 1"));
    assert!(out.stderr.contains("data stack: [string@\"top\"]"));
    assert!(out.stderr.contains("GF: {x = int@7}"));
    assert!(out.stderr.contains("TF: {}"));
    assert!(out.stderr.contains("LF: <empty>"));
    assert!(out.stdout.is_empty());
}

// ============================================================
// Data stack
// ============================================================

#[test]
fn pushs_pops_lifo() {
    let out = run_source(
        "\
DEFVAR GF@v
PUSHS int@1
PUSHS string@two
POPS GF@v
WRITE GF@v
POPS GF@v
WRITE GF@v
",
    );
    assert_eq!(out.stdout, "two1");
}

#[test]
fn pops_on_empty_stack() {
    let out = run_source("DEFVAR GF@v\nPOPS GF@v\n");
    assert_eq!(out.code(), ErrorCode::MissingValue);
}

// ============================================================
// Control flow
// ============================================================

#[test]
fn conditional_jumps() {
    let out = run_source(
        "\
JUMPIFEQ skip int@1 int@1
WRITE string@not-skipped
LABEL skip
JUMPIFNEQ end string@a string@a
WRITE string@reached
LABEL end
",
    );
    assert_eq!(out.stdout, "reached");
}

#[test]
fn jumpifeq_different_types() {
    let out = run_source("JUMPIFEQ end int@1 string@1\nLABEL end\n");
    assert_eq!(out.code(), ErrorCode::OperandType);
}

#[test]
fn loop_counts_down() {
    let out = run_source(
        "\
DEFVAR GF@n
MOVE GF@n int@3
LABEL loop
WRITE GF@n
SUB GF@n GF@n int@1
JUMPIFNEQ loop GF@n int@0
",
    );
    assert_eq!(out.stdout, "321");
    // DEFVAR, MOVE, then 3 iterations of LABEL, WRITE, SUB, JUMPIFNEQ.
    assert_eq!(out.stats().instructions, 14);
    assert_eq!(out.stats().variable_writes, 4);
}

#[test]
fn nested_calls_return_in_order() {
    let out = run_source(
        "\
CALL outer
WRITE string@done
JUMP end
LABEL outer
WRITE string@(
CALL inner
WRITE string@)
RETURN
LABEL inner
WRITE string@x
RETURN
LABEL end
",
    );
    assert_eq!(out.stdout, "(x)done");
}

#[test]
fn return_without_call() {
    let out = run_source("RETURN\n");
    assert_eq!(out.code(), ErrorCode::MissingValue);
}

#[test]
fn duplicate_label_stops_before_execution() {
    let out = run_source("WRITE string@never\nLABEL a\nLABEL a\n");
    assert_eq!(out.code(), ErrorCode::Semantic);
    assert!(matches!(out.result, Err(Fault::Static(_))));
    assert!(out.stdout.is_empty());
}

#[test]
fn undefined_label_stops_before_execution() {
    let out = run_source("WRITE string@never\nJUMP nowhere\n");
    assert_eq!(out.code(), ErrorCode::Semantic);
    assert!(out.stdout.is_empty());
}

// ============================================================
// Sparse positions
// ============================================================

#[test]
fn gap_resynchronizes_with_warning() {
    let program = Program::new(vec![
        at(1, "WRITE", vec![Operand::string("a")]),
        at(5, "WRITE", vec![Operand::string("b")]),
    ]);
    let out = run_program(&program, "");
    assert_eq!(out.stdout, "ab");
    assert_eq!(out.stats().instructions, 2);
    assert!(out
        .stderr
        .contains("no instruction at position 2, continuing at position 5"));
}

#[test]
fn program_starting_above_one() {
    let program = Program::new(vec![at(10, "WRITE", vec![Operand::int("10")])]);
    let out = run_program(&program, "");
    assert_eq!(out.stdout, "10");
    assert!(out.stderr.contains("position 1, continuing at position 10"));
}

#[test]
fn return_into_gap() {
    let program = Program::new(vec![
        at(1, "CALL", vec![Operand::label("f")]),
        at(7, "WRITE", vec![Operand::string("back")]),
        at(8, "JUMP", vec![Operand::label("end")]),
        at(20, "LABEL", vec![Operand::label("f")]),
        at(21, "RETURN", vec![]),
        at(30, "LABEL", vec![Operand::label("end")]),
    ]);
    let out = run_program(&program, "");
    assert_eq!(out.stdout, "back");
    assert!(out
        .stderr
        .contains("no instruction at position 2, continuing at position 7"));
}

#[test]
fn unordered_input_runs_by_position() {
    let program = Program::new(vec![
        at(3, "WRITE", vec![Operand::string("c")]),
        at(1, "WRITE", vec![Operand::string("a")]),
        at(2, "WRITE", vec![Operand::string("b")]),
    ]);
    let out = run_program(&program, "");
    assert_eq!(out.stdout, "abc");
    assert!(out.stderr.is_empty());
}

#[test]
fn duplicate_position_is_source_format() {
    let program = Program::new(vec![at(1, "BREAK", vec![]), at(1, "BREAK", vec![])]);
    let out = run_program(&program, "");
    assert_eq!(out.code(), ErrorCode::SourceFormat);
}

#[test]
fn highest_position_halts() {
    let program = Program::new(vec![at(u64::MAX, "WRITE", vec![Operand::string("last")])]);
    let out = run_program(&program, "");
    assert_eq!(out.stdout, "last");
    assert_eq!(out.stats().instructions, 1);
}

#[test]
fn call_at_highest_position() {
    let program = Program::new(vec![
        at(1, "LABEL", vec![Operand::label("f")]),
        at(2, "JUMP", vec![Operand::label("last")]),
        at(u64::MAX - 1, "LABEL", vec![Operand::label("last")]),
        at(u64::MAX, "CALL", vec![Operand::label("f")]),
    ]);
    let out = run_program(&program, "");
    assert_eq!(out.code(), ErrorCode::Internal);
}

// ============================================================
// Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// IDIV rounds toward negative infinity for every non-overflowing pair.
    #[test]
    fn idiv_is_floor_division(a in any::<i64>(), b in any::<i64>().prop_filter("nonzero", |b| *b != 0)) {
        prop_assume!(!(a == i64::MIN && b == -1));
        let body = format!("DEFVAR GF@q\nIDIV GF@q int@{a} int@{b}\n");
        let (a, b) = (i128::from(a), i128::from(b));
        let expected = if b > 0 { a.div_euclid(b) } else { (-a).div_euclid(-b) };
        prop_assert_eq!(global_after(&body, "q"), Some(Value::Int(expected as i64)));
    }

    /// TF survives PUSHFRAME/POPFRAME unchanged: stored values keep their
    /// value and declared-but-unset names stay uninitialized.
    #[test]
    fn frame_round_trip(n in any::<i64>(), depth in 1usize..6) {
        let mut body = String::from("CREATEFRAME\nDEFVAR TF@v\nDEFVAR TF@u\n");
        body.push_str(&format!("MOVE TF@v int@{n}\n"));
        for _ in 0..depth {
            body.push_str("PUSHFRAME\nPOPFRAME\n");
        }
        body.push_str("WRITE TF@v\nDEFVAR GF@t\nTYPE GF@t TF@u\n");
        body.push_str("WRITE string@[\nWRITE GF@t\nWRITE string@]\n");
        prop_assert_eq!(run_source(&body).stdout, format!("{n}[]"));
    }

    /// Returns come back in the reverse order of calls.
    #[test]
    fn calls_return_lifo(depth in 1usize..8) {
        let mut body = String::from("CALL f0\nJUMP end\n");
        for level in 0..depth {
            body.push_str(&format!("LABEL f{level}\nWRITE string@<\n"));
            if level + 1 < depth {
                body.push_str(&format!("CALL f{}\n", level + 1));
            }
            body.push_str(&format!("WRITE int@{level}\nRETURN\n"));
        }
        body.push_str("LABEL end\n");

        let expected: String = "<".repeat(depth)
            + &(0..depth).rev().map(|l| l.to_string()).collect::<String>();
        prop_assert_eq!(run_source(&body).stdout, expected);
    }
}
