pub mod calc;
pub mod instr;
pub mod ops;
pub mod temp;
pub mod vartype;

mod impls;

pub use instr::*;
pub use ops::*;
pub use temp::*;
pub use vartype::*;

pub enum InstrVariant<'a> {
	ArithInstr(&'a ArithInstr),
	CompInstr(&'a CompInstr),
	JumpInstr(&'a JumpInstr),
	JumpCondInstr(&'a JumpCondInstr),
	PhiInstr(&'a PhiInstr),
	RetInstr(&'a RetInstr),
	StoreInstr(&'a StoreInstr),
	LoadInstr(&'a LoadInstr),
	GEPInstr(&'a GEPInstr),
	CallInstr(&'a CallInstr),
}
