use optimizer::{IvoOptimizer, RemoveDeadCode};

mod common;

use common::parse_program;

#[test]
fn test_removes_unused_chain() {
	let code = "define void @f(i32* %p) {
  entry:
    %1 = add i32 1, 2
    %2 = add i32 %1, 3
    store i32 %1, %p
    ret void
}
";
	let mut program = parse_program(code);
	assert!(RemoveDeadCode::new().apply(&mut program).unwrap());
	let text = program.to_string();
	assert!(!text.contains("%2"));
	assert!(text.contains("store i32 %1, %p"));
	// a second run finds nothing left to remove
	assert!(!RemoveDeadCode::new().apply(&mut program).unwrap());
}

#[test]
fn test_removes_dead_phi_cycle() {
	// %2 and %5 only feed each other
	let code = "define void @f(i32* %p) {
  entry:
    br label B1
  B1:
    %1 = phi i32 [0, entry], [%4, B2]
    %2 = phi i32 [0, entry], [%5, B2]
    %3 = icmp slt i32 %1, 10
    br i32 %3, label B2, label B3
  B2:
    store i32 %1, %p
    %4 = add i32 %1, 1
    %5 = add i32 %2, 3
    br label B1
  B3:
    ret void
}
";
	let mut program = parse_program(code);
	assert!(RemoveDeadCode::new().apply(&mut program).unwrap());
	let text = program.to_string();
	assert!(!text.contains("%2"));
	assert!(!text.contains("%5"));
	assert!(text.contains("%1 = phi i32 [0, entry], [%4, B2]"));
}
