use std::fmt::Display;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VarType {
	I32,
	F32,
	I32Ptr,
	F32Ptr,
	Void,
}

impl Display for VarType {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		let type_str = match self {
			Self::I32 => "i32",
			Self::F32 => "f32",
			Self::I32Ptr => "i32*",
			Self::F32Ptr => "f32*",
			Self::Void => "void",
		};
		write!(f, "{}", type_str)
	}
}

impl VarType {
	pub fn is_int(&self) -> bool {
		matches!(self, Self::I32)
	}
	pub fn is_ptr(&self) -> bool {
		matches!(self, Self::I32Ptr | Self::F32Ptr)
	}
}

pub fn type2ptr(var_type: VarType) -> VarType {
	match var_type {
		VarType::I32 => VarType::I32Ptr,
		VarType::F32 => VarType::F32Ptr,
		_ => unreachable!(),
	}
}
