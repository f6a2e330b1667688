/// Position of the next page: `LIMIT page_size OFFSET chunk_index * page_size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
	pub chunk_index: u64,
	pub page_size: u64,
}

impl Cursor {
	#[must_use]
	pub fn new(page_size: u64) -> Cursor {
		Cursor {
			chunk_index: 0,
			page_size,
		}
	}

	#[must_use]
	pub fn offset(&self) -> u64 {
		self.chunk_index * self.page_size
	}

	pub fn advance(&mut self) {
		self.chunk_index += 1;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn offsets_follow_chunks() {
		let mut cursor = Cursor::new(2000);
		assert_eq!(cursor.offset(), 0);
		cursor.advance();
		assert_eq!(cursor.offset(), 2000);
		cursor.advance();
		cursor.advance();
		assert_eq!(cursor, Cursor { chunk_index: 3, page_size: 2000 });
		assert_eq!(cursor.offset(), 6000);
	}
}
