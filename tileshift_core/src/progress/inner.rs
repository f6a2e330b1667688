//! Shared state and rendering of the terminal progress bar.
//!
//! A rendered line looks like `Uploading ▕██████▍      ▏  42% | 00:12`, where the last field is
//! the elapsed time.

use std::time::{Duration, Instant};

const REDRAW_INTERVAL: Duration = Duration::from_millis(500);

pub struct Inner {
	pub message: String,
	pub percent: f64,
	pub start: Instant,
	pub finished: bool,
	pub last_draw: Option<Instant>,
}

impl Inner {
	pub fn new(message: &str) -> Self {
		Inner {
			message: message.to_string(),
			percent: 0.0,
			start: Instant::now(),
			finished: false,
			last_draw: None,
		}
	}

	pub fn set_percentage(&mut self, percent: f64) {
		self.percent = clamp_percent(percent);
	}

	pub fn redraw(&mut self) {
		if let Some(last_draw) = self.last_draw
			&& last_draw.elapsed() < REDRAW_INTERVAL
			&& !self.finished
		{
			return;
		}
		self.last_draw = Some(Instant::now());

		let line = self.render(terminal_width());
		self.write(&format!("\r\x1b[2K{line}"));
	}

	pub fn render(&self, width: usize) -> String {
		let msg = &self.message;
		let percent = self.percent.floor() as u64;
		let elapsed = format_elapsed(self.start.elapsed());

		let get_line = |bar_str: &str| format!("{msg} ▕{bar_str}▏ {percent:>3}% | {elapsed}");

		let decoration = get_line("").chars().count();
		let bar_str = make_bar(self.percent / 100.0, width.saturating_sub(decoration).max(10));
		get_line(&bar_str)
	}

	#[allow(unused_variables)]
	pub fn write(&self, line: &str) {
		#[cfg(not(any(test, feature = "test")))]
		{
			use std::io::Write;
			let mut output = std::io::stderr();
			let _ = write!(output, "{line}");
			let _ = output.flush();
		}
	}
}

fn clamp_percent(percent: f64) -> f64 {
	if percent.is_nan() {
		0.0
	} else {
		percent.clamp(0.0, 100.0)
	}
}

fn terminal_width() -> usize {
	if let Some((width, _)) = terminal_size::terminal_size() {
		return width.0.max(20) as usize;
	}
	80
}

fn make_bar(frac: f64, width: usize) -> String {
	let frac = frac.clamp(0.0, 1.0);
	let exact = frac * (width as f64);
	let whole = exact.floor() as usize;
	let rem = exact - whole as f64;

	// index 0 is unused, higher indices are thicker
	let partials = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉'];

	let mut s = String::with_capacity(width * 3);
	for _ in 0..whole.min(width) {
		s.push('█');
	}
	if whole < width {
		s.push(partials[((rem * 8.0).floor() as usize).min(7)]);
		for _ in (whole + 1)..width {
			s.push(' ');
		}
	}
	s
}

fn format_elapsed(d: Duration) -> String {
	let total = d.as_secs();
	let hours = total / 3_600;
	let minutes = (total % 3_600) / 60;
	let seconds = total % 60;
	if hours > 0 {
		format!("{hours}:{minutes:02}:{seconds:02}")
	} else {
		format!("{minutes:02}:{seconds:02}")
	}
}
