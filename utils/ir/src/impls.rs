use std::{collections::HashMap, fmt::Display};

use crate::{instr::*, ops::Value, temp::Temp, InstrVariant};

fn unwrap_values(arr: Vec<&Value>) -> Vec<Temp> {
	arr.into_iter().flat_map(|v| v.unwrap_temp()).collect()
}

fn map_value(value: &mut Value, map: &HashMap<Temp, Value>) {
	if let Value::Temp(temp) = value {
		if let Some(new_value) = map.get(temp) {
			*value = new_value.clone();
		}
	}
}

impl Display for ArithInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"{} = {} {} {}, {}",
			self.target, self.op, self.var_type, self.lhs, self.rhs
		)
	}
}

impl IrInstrTrait for ArithInstr {
	fn get_read(&self) -> Vec<Temp> {
		unwrap_values(vec![&self.lhs, &self.rhs])
	}
	fn get_write(&self) -> Option<Temp> {
		Some(self.target.clone())
	}
	fn get_variant(&self) -> InstrVariant {
		InstrVariant::ArithInstr(self)
	}
	fn map_read_temp(&mut self, map: &HashMap<Temp, Value>) {
		map_value(&mut self.lhs, map);
		map_value(&mut self.rhs, map);
	}
	fn clone_box(&self) -> IrInstr {
		Box::new(self.clone())
	}
}

impl Display for CompInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"{} = {} {} {} {}, {}",
			self.target, self.kind, self.op, self.var_type, self.lhs, self.rhs
		)
	}
}

impl IrInstrTrait for CompInstr {
	fn get_read(&self) -> Vec<Temp> {
		unwrap_values(vec![&self.lhs, &self.rhs])
	}
	fn get_write(&self) -> Option<Temp> {
		Some(self.target.clone())
	}
	fn get_variant(&self) -> InstrVariant {
		InstrVariant::CompInstr(self)
	}
	fn map_read_temp(&mut self, map: &HashMap<Temp, Value>) {
		map_value(&mut self.lhs, map);
		map_value(&mut self.rhs, map);
	}
	fn clone_box(&self) -> IrInstr {
		Box::new(self.clone())
	}
}

impl Display for JumpInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "br label {}", self.target)
	}
}

impl IrInstrTrait for JumpInstr {
	fn get_variant(&self) -> InstrVariant {
		InstrVariant::JumpInstr(self)
	}
	fn clone_box(&self) -> IrInstr {
		Box::new(self.clone())
	}
}

impl Display for JumpCondInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"br {} {}, label {}, label {}",
			self.var_type, self.cond, self.target_true, self.target_false
		)
	}
}

impl IrInstrTrait for JumpCondInstr {
	fn get_read(&self) -> Vec<Temp> {
		unwrap_values(vec![&self.cond])
	}
	fn get_variant(&self) -> InstrVariant {
		InstrVariant::JumpCondInstr(self)
	}
	fn map_read_temp(&mut self, map: &HashMap<Temp, Value>) {
		map_value(&mut self.cond, map);
	}
	fn clone_box(&self) -> IrInstr {
		Box::new(self.clone())
	}
}

impl Display for PhiInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		let sources = self
			.source
			.iter()
			.map(|(value, label)| format!("[{}, {}]", value, label))
			.collect::<Vec<_>>()
			.join(", ");
		write!(f, "{} = phi {} {}", self.target, self.var_type, sources)
	}
}

impl IrInstrTrait for PhiInstr {
	fn get_read(&self) -> Vec<Temp> {
		self.source.iter().flat_map(|(value, _)| value.unwrap_temp()).collect()
	}
	fn get_write(&self) -> Option<Temp> {
		Some(self.target.clone())
	}
	fn get_variant(&self) -> InstrVariant {
		InstrVariant::PhiInstr(self)
	}
	fn map_read_temp(&mut self, map: &HashMap<Temp, Value>) {
		for (value, _) in self.source.iter_mut() {
			map_value(value, map);
		}
	}
	fn clone_box(&self) -> IrInstr {
		Box::new(self.clone())
	}
}

impl Display for RetInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match &self.value {
			Value::Void => write!(f, "ret void"),
			value => write!(f, "ret {} {}", value.get_type(), value),
		}
	}
}

impl IrInstrTrait for RetInstr {
	fn get_read(&self) -> Vec<Temp> {
		unwrap_values(vec![&self.value])
	}
	fn get_variant(&self) -> InstrVariant {
		InstrVariant::RetInstr(self)
	}
	fn map_read_temp(&mut self, map: &HashMap<Temp, Value>) {
		map_value(&mut self.value, map);
	}
	fn clone_box(&self) -> IrInstr {
		Box::new(self.clone())
	}
}

impl Display for LoadInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "{} = load {}, {}", self.target, self.var_type, self.addr)
	}
}

impl IrInstrTrait for LoadInstr {
	fn get_read(&self) -> Vec<Temp> {
		unwrap_values(vec![&self.addr])
	}
	fn get_write(&self) -> Option<Temp> {
		Some(self.target.clone())
	}
	fn get_variant(&self) -> InstrVariant {
		InstrVariant::LoadInstr(self)
	}
	fn touches_memory(&self) -> bool {
		true
	}
	fn map_read_temp(&mut self, map: &HashMap<Temp, Value>) {
		map_value(&mut self.addr, map);
	}
	fn clone_box(&self) -> IrInstr {
		Box::new(self.clone())
	}
}

impl Display for StoreInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"store {} {}, {}",
			self.value.get_type(),
			self.value,
			self.addr
		)
	}
}

impl IrInstrTrait for StoreInstr {
	fn get_read(&self) -> Vec<Temp> {
		unwrap_values(vec![&self.value, &self.addr])
	}
	fn get_variant(&self) -> InstrVariant {
		InstrVariant::StoreInstr(self)
	}
	fn touches_memory(&self) -> bool {
		true
	}
	fn has_sideeffect(&self) -> bool {
		true
	}
	fn map_read_temp(&mut self, map: &HashMap<Temp, Value>) {
		map_value(&mut self.value, map);
		map_value(&mut self.addr, map);
	}
	fn clone_box(&self) -> IrInstr {
		Box::new(self.clone())
	}
}

impl Display for GEPInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"{} = getelementptr {}, {}, {}",
			self.target, self.var_type, self.addr, self.offset
		)
	}
}

impl IrInstrTrait for GEPInstr {
	fn get_read(&self) -> Vec<Temp> {
		unwrap_values(vec![&self.addr, &self.offset])
	}
	fn get_write(&self) -> Option<Temp> {
		Some(self.target.clone())
	}
	fn get_variant(&self) -> InstrVariant {
		InstrVariant::GEPInstr(self)
	}
	fn map_read_temp(&mut self, map: &HashMap<Temp, Value>) {
		map_value(&mut self.addr, map);
		map_value(&mut self.offset, map);
	}
	fn clone_box(&self) -> IrInstr {
		Box::new(self.clone())
	}
}

impl Display for CallInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		let params = self
			.params
			.iter()
			.map(|(var_type, value)| format!("{} {}", var_type, value))
			.collect::<Vec<_>>()
			.join(", ");
		write!(
			f,
			"{} = call {} @{}({})",
			self.target, self.var_type, self.func, params
		)
	}
}

impl IrInstrTrait for CallInstr {
	fn get_read(&self) -> Vec<Temp> {
		self.params.iter().flat_map(|(_, value)| value.unwrap_temp()).collect()
	}
	fn get_write(&self) -> Option<Temp> {
		Some(self.target.clone())
	}
	fn get_variant(&self) -> InstrVariant {
		InstrVariant::CallInstr(self)
	}
	fn touches_memory(&self) -> bool {
		true
	}
	fn has_sideeffect(&self) -> bool {
		true
	}
	fn map_read_temp(&mut self, map: &HashMap<Temp, Value>) {
		for (_, value) in self.params.iter_mut() {
			map_value(value, map);
		}
	}
	fn clone_box(&self) -> IrInstr {
		Box::new(self.clone())
	}
}
