use ir::IrInstrTrait;
use optimizer::{IndvarElim, IvoOptimizer, Pipeline};

mod common;

use common::{parse_program, run_program};

const STRENGTH_REDUCE_IR: &str = "define void @f(i32* %p) {
  entry:
    br label B1
  B1:
    %1 = phi i32 [0, entry], [%5, B2]
    %2 = icmp slt i32 %1, 10
    br i32 %2, label B2, label B3
  B2:
    %3 = mul i32 %1, 3
    %4 = add i32 %3, 7
    store i32 %4, %p
    %5 = add i32 %1, 1
    br label B1
  B3:
    ret void
}
";

#[test]
fn test_strength_reduction() {
	let mut program = parse_program(STRENGTH_REDUCE_IR);
	let before = run_program(&program);
	assert_eq!(before, (0..10).map(|v| 3 * v + 7).collect::<Vec<_>>());

	let changed = IndvarElim::new().apply(&mut program).unwrap();
	assert!(changed);
	assert_eq!(run_program(&program), before);
	// the multiplication in the loop body is gone
	assert!(!program.to_string().contains("mul"));
}

#[test]
fn test_soundness_across_constants() {
	// a * iv + b over a grid of scales, offsets, starts and steps,
	// including negative and decreasing ones
	for (a, b, start, c) in [
		(3, 7, 0, 1),
		(-2, 5, 10, -1),
		(1, 0, 100, -5),
		(4, -9, -6, 2),
		(-3, -4, 1, 3),
	] {
		let bound = start + 10 * c;
		let cmp = if c > 0 { "slt" } else { "sgt" };
		let code = format!(
			"define void @f(i32* %p) {{
  entry:
    br label B1
  B1:
    %1 = phi i32 [{start}, entry], [%5, B2]
    %2 = icmp {cmp} i32 %1, {bound}
    br i32 %2, label B2, label B3
  B2:
    %3 = mul i32 %1, {a}
    %4 = add i32 %3, {b}
    store i32 %4, %p
    %5 = add i32 %1, {c}
    br label B1
  B3:
    ret void
}}
"
		);
		let mut program = parse_program(&code);
		let before = run_program(&program);
		let expected: Vec<i32> =
			(0..10).map(|i| a * (start + i * c) + b).collect();
		assert_eq!(before, expected, "a={} b={} start={} c={}", a, b, start, c);
		assert!(IndvarElim::new().apply(&mut program).unwrap());
		assert_eq!(
			run_program(&program),
			before,
			"a={} b={} start={} c={}",
			a,
			b,
			start,
			c
		);
		assert!(!program.to_string().contains("mul"));
	}
}

#[test]
fn test_latch_exit_with_use_after_loop() {
	// bottom-tested loop; the rewritten value is read again after the exit
	let code = "define void @f(i32* %p) {
  entry:
    br label B1
  B1:
    %1 = phi i32 [0, entry], [%4, B2]
    %3 = mul i32 %1, 3
    %4 = add i32 %1, 1
    br label B2
  B2:
    %2 = icmp slt i32 %4, 10
    br i32 %2, label B1, label B3
  B3:
    store i32 %3, %p
    ret void
}
";
	let mut program = parse_program(code);
	let before = run_program(&program);
	assert_eq!(before, vec![27]);
	assert!(IndvarElim::new().apply(&mut program).unwrap());
	assert_eq!(run_program(&program), before);
	assert!(!program.to_string().contains("mul"));
	// the post-loop store reads the recurrence phi directly
	let header = program.funcs[0].cfg.blocks[1].clone();
	let recurrence = header.borrow().phi_instrs[1].target.clone();
	let exit = program.funcs[0].cfg.blocks[3].clone();
	let reads = exit.borrow().instrs[0].get_read();
	assert!(reads.contains(&recurrence));
}

#[test]
fn test_idempotence() {
	let mut program = parse_program(STRENGTH_REDUCE_IR);
	IndvarElim::new().apply(&mut program).unwrap();
	let first = program.to_string();
	let changed = IndvarElim::new().apply(&mut program).unwrap();
	assert!(!changed);
	assert_eq!(program.to_string(), first);
}

#[test]
fn test_deduplication() {
	// %4 and %5 both compute 5 * iv - 2 and must share one recurrence
	let code = "define void @f(i32* %p) {
  entry:
    br label B1
  B1:
    %1 = phi i32 [0, entry], [%6, B2]
    %2 = icmp slt i32 %1, 10
    br i32 %2, label B2, label B3
  B2:
    %3 = mul i32 %1, 5
    %4 = sub i32 %3, 2
    %5 = sub i32 %3, 2
    store i32 %4, %p
    store i32 %5, %p
    %6 = add i32 %1, 1
    br label B1
  B3:
    ret void
}
";
	let mut program = parse_program(code);
	let before = run_program(&program);
	assert_eq!(
		before,
		(0..10).flat_map(|v| [5 * v - 2, 5 * v - 2]).collect::<Vec<_>>()
	);
	assert!(IndvarElim::new().apply(&mut program).unwrap());
	assert_eq!(run_program(&program), before);

	let header = program.funcs[0].cfg.blocks[1].clone();
	// one recurrence for (5, 0), one shared for (5, -2)
	assert_eq!(header.borrow().phi_instrs.len(), 3);
	let latch = program.funcs[0].cfg.blocks[2].clone();
	let stored: Vec<_> = latch
		.borrow()
		.instrs
		.iter()
		.filter_map(|v| match v.get_variant() {
			ir::InstrVariant::StoreInstr(s) => Some(s.value.clone()),
			_ => None,
		})
		.collect();
	assert_eq!(stored.len(), 2);
	assert_eq!(stored[0], stored[1]);
}

#[test]
fn test_non_affine_unchanged() {
	let code = "define void @f(i32* %p) {
  entry:
    br label B1
  B1:
    %1 = phi i32 [0, entry], [%4, B2]
    %2 = icmp slt i32 %1, 10
    br i32 %2, label B2, label B3
  B2:
    %3 = mul i32 %1, %1
    store i32 %3, %p
    %4 = add i32 %1, 1
    br label B1
  B3:
    ret void
}
";
	let mut program = parse_program(code);
	let before = program.to_string();
	assert!(!IndvarElim::new().apply(&mut program).unwrap());
	assert_eq!(program.to_string(), before);
}

#[test]
fn test_memory_dependent_unchanged() {
	// loads are never candidates, and values derived from them have no
	// closed form
	let code = "define void @f(i32* %p) {
  entry:
    br label B1
  B1:
    %1 = phi i32 [0, entry], [%5, B2]
    %2 = icmp slt i32 %1, 10
    br i32 %2, label B2, label B3
  B2:
    %3 = load i32, %p
    %4 = add i32 %3, 1
    store i32 %4, %p
    %5 = add i32 %1, 1
    br label B1
  B3:
    ret void
}
";
	let mut program = parse_program(code);
	let before = program.to_string();
	assert!(!IndvarElim::new().apply(&mut program).unwrap());
	assert_eq!(program.to_string(), before);
}

#[test]
fn test_exact_divisibility_boundary() {
	// iv steps by 2; %4 tracks a phi stepping by 3, so its step is not an
	// exact multiple and it must stay; %7 steps by 4 and may be rewritten
	let code = "define void @f(i32* %p) {
  entry:
    br label B1
  B1:
    %1 = phi i32 [0, entry], [%5, B2]
    %2 = phi i32 [0, entry], [%6, B2]
    %3 = icmp slt i32 %1, 10
    br i32 %3, label B2, label B3
  B2:
    %4 = add i32 %2, 7
    %7 = mul i32 %1, 2
    store i32 %4, %p
    store i32 %7, %p
    %5 = add i32 %1, 2
    %6 = add i32 %2, 3
    br label B1
  B3:
    ret void
}
";
	let mut program = parse_program(code);
	let before = run_program(&program);
	assert!(IndvarElim::new().apply(&mut program).unwrap());
	assert_eq!(run_program(&program), before);
	let text = program.to_string();
	assert!(text.contains("%4 = add i32 %2, 7"));
	assert!(!text.contains("mul"));
}

#[test]
fn test_no_preheader_unchanged() {
	// the only predecessor of the header outside the loop has two
	// successors, so the loop has no preheader
	let code = "define void @f(i32* %p, i32 %c) {
  entry:
    br i32 %c, label B1, label B3
  B1:
    %1 = phi i32 [0, entry], [%4, B2]
    %2 = icmp slt i32 %1, 10
    br i32 %2, label B2, label B3
  B2:
    %3 = mul i32 %1, 3
    store i32 %3, %p
    %4 = add i32 %1, 1
    br label B1
  B3:
    ret void
}
";
	let mut program = parse_program(code);
	let before = program.to_string();
	assert!(!IndvarElim::new().apply(&mut program).unwrap());
	assert_eq!(program.to_string(), before);
}

#[test]
fn test_non_constant_step_unchanged() {
	let code = "define void @f(i32* %p, i32 %n) {
  entry:
    br label B1
  B1:
    %1 = phi i32 [0, entry], [%4, B2]
    %2 = icmp slt i32 %1, 10
    br i32 %2, label B2, label B3
  B2:
    %3 = mul i32 %1, 3
    store i32 %3, %p
    %4 = add i32 %1, %n
    br label B1
  B3:
    ret void
}
";
	let mut program = parse_program(code);
	let before = program.to_string();
	assert!(!IndvarElim::new().apply(&mut program).unwrap());
	assert_eq!(program.to_string(), before);
}

#[test]
fn test_nested_loops() {
	// %5 varies with the outer loop only; its recurrence lands in the
	// outer header
	let code = "define void @f(i32* %p) {
  entry:
    br label B1
  B1:
    %1 = phi i32 [0, entry], [%7, B5]
    %2 = icmp slt i32 %1, 4
    br i32 %2, label B2, label B6
  B2:
    br label B3
  B3:
    %3 = phi i32 [0, B2], [%6, B4]
    %4 = icmp slt i32 %3, 3
    br i32 %4, label B4, label B5
  B4:
    %5 = mul i32 %1, 3
    store i32 %5, %p
    %6 = add i32 %3, 1
    br label B3
  B5:
    %7 = add i32 %1, 1
    br label B1
  B6:
    ret void
}
";
	let mut program = parse_program(code);
	let before = run_program(&program);
	assert!(IndvarElim::new().apply(&mut program).unwrap());
	assert_eq!(run_program(&program), before);
	let text = program.to_string();
	assert!(!text.contains("mul"));
	// the recurrence is a phi of the outer header, bumped in the outer latch
	let header = program.funcs[0].cfg.blocks[1].clone();
	assert_eq!(header.borrow().phi_instrs.len(), 2);
}

#[test]
fn test_pipeline() {
	let mut program = parse_program(STRENGTH_REDUCE_IR);
	let before = run_program(&program);
	let pipeline = Pipeline::parse("indvar-elim,dead-code").unwrap();
	assert!(pipeline.apply(&mut program).unwrap());
	assert_eq!(run_program(&program), before);
	// dead-code drops the recurrence for (3, 0), which nothing reads
	let header = program.funcs[0].cfg.blocks[1].clone();
	assert_eq!(header.borrow().phi_instrs.len(), 2);
	assert!(!program.to_string().contains("mul"));
}
