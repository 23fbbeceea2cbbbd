// Closed-form expressions: every value is a constant, an affine recurrence
// over one specific loop, or unknown. Expressions are pure values, combined
// through exact algebra and never mutated.

pub mod analysis;

pub use analysis::ScevAnalysis;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scev {
	Const(i32),
	AddRec {
		// id of the header block of the loop this recurrence runs over
		header: i32,
		start: Box<Scev>,
		step: Box<Scev>,
	},
	Unknown,
}

impl Scev {
	pub fn as_const(&self) -> Option<i32> {
		match self {
			Self::Const(v) => Some(*v),
			_ => None,
		}
	}

	pub fn add(&self, other: &Scev) -> Scev {
		match (self, other) {
			(Self::Const(a), Self::Const(b)) => Self::Const(a.wrapping_add(*b)),
			(Self::Const(_), Self::AddRec { .. }) => other.add(self),
			(
				Self::AddRec {
					header,
					start,
					step,
				},
				Self::Const(_),
			) => Self::AddRec {
				header: *header,
				start: Box::new(start.add(other)),
				step: step.clone(),
			},
			(
				Self::AddRec {
					header: h1,
					start: s1,
					step: st1,
				},
				Self::AddRec {
					header: h2,
					start: s2,
					step: st2,
				},
			) if h1 == h2 => Self::AddRec {
				header: *h1,
				start: Box::new(s1.add(s2)),
				step: Box::new(st1.add(st2)),
			},
			_ => Self::Unknown,
		}
	}

	pub fn neg(&self) -> Scev {
		self.mul(&Self::Const(-1))
	}

	pub fn sub(&self, other: &Scev) -> Scev {
		self.add(&other.neg())
	}

	pub fn mul(&self, other: &Scev) -> Scev {
		match (self, other) {
			(Self::Const(a), Self::Const(b)) => Self::Const(a.wrapping_mul(*b)),
			(Self::Const(0), _) | (_, Self::Const(0)) => Self::Const(0),
			(Self::AddRec { .. }, Self::Const(_)) => other.mul(self),
			(
				Self::Const(_),
				Self::AddRec {
					header,
					start,
					step,
				},
			) => Self::AddRec {
				header: *header,
				start: Box::new(start.mul(self)),
				step: Box::new(step.mul(self)),
			},
			_ => Self::Unknown,
		}
	}
}

// Exact signed division: succeeds only when a is a precise multiple of b.
// Failure is distinguishable from a zero quotient.
pub fn exact_div(a: i32, b: i32) -> Option<i32> {
	if b == 0 {
		return None;
	}
	match a.checked_rem(b) {
		Some(0) => a.checked_div(b),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn addrec(header: i32, start: Scev, step: Scev) -> Scev {
		Scev::AddRec {
			header,
			start: Box::new(start),
			step: Box::new(step),
		}
	}

	#[test]
	fn test_const_folding() {
		assert_eq!(Scev::Const(3).add(&Scev::Const(4)), Scev::Const(7));
		assert_eq!(Scev::Const(3).sub(&Scev::Const(4)), Scev::Const(-1));
		assert_eq!(Scev::Const(3).mul(&Scev::Const(4)), Scev::Const(12));
	}

	#[test]
	fn test_addrec_composition() {
		// {0,+,1} * 3 + 7 == {7,+,3}
		let iv = addrec(1, Scev::Const(0), Scev::Const(1));
		let three_i = Scev::Const(3).mul(&iv);
		assert_eq!(three_i, addrec(1, Scev::Const(0), Scev::Const(3)));
		let idx = three_i.add(&Scev::Const(7));
		assert_eq!(idx, addrec(1, Scev::Const(7), Scev::Const(3)));
	}

	#[test]
	fn test_addrec_pair() {
		// {1,+,2} + {3,+,4} over the same loop folds pointwise
		let a = addrec(1, Scev::Const(1), Scev::Const(2));
		let b = addrec(1, Scev::Const(3), Scev::Const(4));
		assert_eq!(a.add(&b), addrec(1, Scev::Const(4), Scev::Const(6)));
		// different loops stay apart
		let c = addrec(2, Scev::Const(3), Scev::Const(4));
		assert_eq!(a.add(&c), Scev::Unknown);
	}

	#[test]
	fn test_mul_by_zero_folds() {
		let a = addrec(1, Scev::Const(1), Scev::Const(2));
		assert_eq!(a.mul(&Scev::Const(0)), Scev::Const(0));
		assert_eq!(Scev::Unknown.mul(&Scev::Const(0)), Scev::Const(0));
	}

	#[test]
	fn test_unknown_poisons() {
		let a = addrec(1, Scev::Const(1), Scev::Const(2));
		assert_eq!(a.add(&Scev::Unknown), Scev::Unknown);
		assert_eq!(a.mul(&Scev::Unknown), Scev::Unknown);
		assert_eq!(a.mul(&a), Scev::Unknown);
	}

	#[test]
	fn test_exact_div() {
		assert_eq!(exact_div(6, 2), Some(3));
		assert_eq!(exact_div(-6, 2), Some(-3));
		assert_eq!(exact_div(0, 2), Some(0));
		assert_eq!(exact_div(3, 2), None);
		assert_eq!(exact_div(3, 0), None);
		assert_eq!(exact_div(i32::MIN, -1), None);
	}
}
