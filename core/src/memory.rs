use crate::ExitError;
use primitive_types::U256;

/// Byte-addressable memory. Grows lazily in 32-byte words as opcodes
/// touch new offsets; pricing the growth is the gasometer's job, this
/// type only enforces the hard ceiling past which no growth is ever
/// affordable.
#[derive(Clone, Debug)]
pub struct Memory {
	data: Vec<u8>,
	limit: usize,
}

impl Memory {
	/// Create empty memory. `limit` is a hard byte ceiling — past it,
	/// growth fails outright rather than just costing a lot of drops.
	pub fn new(limit: usize) -> Self {
		Self {
			data: Vec::new(),
			limit,
		}
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.data.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	#[inline]
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// Round a byte length up to the next whole word (32 bytes).
	pub fn next_word_boundary(len: usize) -> usize {
		if len % 32 == 0 {
			len
		} else {
			len / 32 * 32 + 32
		}
	}

	/// The memory size (word-rounded) this access would require,
	/// without actually growing anything. Used by the gasometer to
	/// price expansion before committing to it.
	pub fn resize_needed(&self, offset: U256, size: U256) -> Result<usize, ExitError> {
		if size.is_zero() {
			return Ok(self.data.len());
		}
		let end = offset
			.checked_add(size)
			.ok_or(ExitError::OutOfOffset)?;
		if end > U256::from(usize::MAX) {
			return Err(ExitError::OutOfOffset);
		}
		let end = end.as_usize();
		Ok(core::cmp::max(self.data.len(), Self::next_word_boundary(end)))
	}

	/// Grow the backing buffer to `new_len` bytes if it's larger than
	/// the current size. `new_len` is assumed already word-rounded.
	pub fn resize(&mut self, new_len: usize) -> Result<(), ExitError> {
		if new_len <= self.data.len() {
			return Ok(());
		}
		if new_len > self.limit {
			return Err(ExitError::OutOfGas);
		}
		self.data.resize(new_len, 0);
		Ok(())
	}

	/// Grow to cover `[offset, offset+size)` then return, as an owned
	/// zero-padded copy, those `size` bytes. `MLOAD`/`RETURN`/`SHA3`/
	/// `CALLDATACOPY`-into-memory all read through this.
	pub fn get(&self, offset: usize, size: usize) -> Vec<u8> {
		let mut out = vec![0u8; size];
		let avail = self.data.len().saturating_sub(offset);
		let copy_len = core::cmp::min(avail, size);
		if copy_len > 0 {
			out[..copy_len].copy_from_slice(&self.data[offset..offset + copy_len]);
		}
		out
	}

	/// Write `value` at `offset`, growing memory first if needed
	/// (`MSTORE`/`MSTORE8`/the destination side of `CALLDATACOPY`).
	pub fn set(&mut self, offset: usize, value: &[u8]) -> Result<(), ExitError> {
		let end = offset.checked_add(value.len()).ok_or(ExitError::OutOfOffset)?;
		self.resize(Self::next_word_boundary(end))?;
		self.data[offset..end].copy_from_slice(value);
		Ok(())
	}

	/// Copy `len` bytes from `source` (starting at `source_offset`,
	/// zero-padded past its end) into memory at `memory_offset`. The
	/// shared body behind `CALLDATACOPY`/`CODECOPY`/`EXTCODECOPY`/
	/// `RETURNDATACOPY`, each of which reads from a different byte
	/// slice but grows and writes memory identically.
	pub fn copy_large(
		&mut self,
		memory_offset: U256,
		source_offset: U256,
		len: U256,
		source: &[u8],
	) -> Result<(), ExitError> {
		if len.is_zero() {
			return Ok(());
		}
		let memory_offset = as_usize(memory_offset)?;
		let len = as_usize(len)?;

		let end = memory_offset.checked_add(len).ok_or(ExitError::OutOfOffset)?;
		self.resize(Self::next_word_boundary(end))?;

		let source_offset = if source_offset > U256::from(usize::MAX) {
			source.len()
		} else {
			source_offset.as_usize()
		};

		let mut buffer = vec![0u8; len];
		let avail = source.len().saturating_sub(source_offset);
		let copy_len = core::cmp::min(avail, len);
		if copy_len > 0 {
			buffer[..copy_len].copy_from_slice(&source[source_offset..source_offset + copy_len]);
		}
		self.data[memory_offset..end].copy_from_slice(&buffer);
		Ok(())
	}
}

fn as_usize(value: U256) -> Result<usize, ExitError> {
	if value > U256::from(usize::MAX) {
		Err(ExitError::OutOfOffset)
	} else {
		Ok(value.as_usize())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn set_then_get_roundtrip() {
		let mut m = Memory::new(1 << 20);
		m.set(0, &[1, 2, 3, 4]).unwrap();
		assert_eq!(m.get(0, 4), vec![1, 2, 3, 4]);
		assert_eq!(m.len(), 32);
	}

	#[test]
	fn get_past_end_zero_pads() {
		let m = Memory::new(1 << 20);
		assert_eq!(m.get(0, 8), vec![0u8; 8]);
	}

	#[test]
	fn resize_needed_is_word_rounded() {
		let m = Memory::new(1 << 20);
		assert_eq!(m.resize_needed(U256::from(0), U256::from(1)).unwrap(), 32);
		assert_eq!(m.resize_needed(U256::from(30), U256::from(4)).unwrap(), 64);
		assert_eq!(m.resize_needed(U256::zero(), U256::zero()).unwrap(), 0);
	}

	#[test]
	fn resize_past_limit_fails() {
		let mut m = Memory::new(64);
		assert!(m.set(0, &[0u8; 128]).is_err());
	}

	#[test]
	fn copy_large_zero_pads_past_source() {
		let mut m = Memory::new(1 << 20);
		let source = [1u8, 2, 3];
		m.copy_large(U256::from(0), U256::from(1), U256::from(4), &source)
			.unwrap();
		assert_eq!(m.get(0, 4), vec![2, 3, 0, 0]);
	}
}
