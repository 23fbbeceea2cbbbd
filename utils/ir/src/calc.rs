use crate::{
	ArithOp,
	Value::{self, *},
};

fn bin_int_calc<Foo>(x: &Value, y: &Value, func: Foo) -> Option<Value>
where
	Foo: Fn(i32, i32) -> i32,
{
	match (x, y) {
		(Int(x), Int(y)) => Some(Int(func(*x, *y))),
		_ => None,
	}
}

pub fn exec_binaryop(x: &Value, op: ArithOp, y: &Value) -> Option<Value> {
	match op {
		ArithOp::Add => bin_int_calc(x, y, |x, y| x.wrapping_add(y)),
		ArithOp::Sub => bin_int_calc(x, y, |x, y| x.wrapping_sub(y)),
		ArithOp::Mul => bin_int_calc(x, y, |x, y| x.wrapping_mul(y)),
		ArithOp::Div => match y {
			Int(0) => None,
			_ => bin_int_calc(x, y, |x, y| x.wrapping_div(y)),
		},
		ArithOp::Rem => match y {
			Int(0) => None,
			_ => bin_int_calc(x, y, |x, y| x.wrapping_rem(y)),
		},
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_fold_int() {
		assert_eq!(
			exec_binaryop(&Int(3), ArithOp::Mul, &Int(7)),
			Some(Int(21))
		);
		assert_eq!(
			exec_binaryop(&Int(i32::MAX), ArithOp::Add, &Int(1)),
			Some(Int(i32::MIN))
		);
		assert_eq!(exec_binaryop(&Int(1), ArithOp::Div, &Int(0)), None);
	}

	#[test]
	fn test_no_fold_float() {
		assert_eq!(exec_binaryop(&Float(1.0), ArithOp::Fadd, &Float(2.0)), None);
	}
}
