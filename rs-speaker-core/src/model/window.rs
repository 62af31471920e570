/// Extracts `length` characters of `text` starting at `start`, wrapping
/// around the end of the text.
///
/// Character `offset` of the window is `text[(start + offset) % text.len()]`,
/// so a window may be longer than the text itself. An empty text yields an
/// empty window.
pub fn k_window(text: &[char], start: usize, length: usize) -> String {
	if text.is_empty() {
		return String::new();
	}
	(0..length).map(|offset| text[(start + offset) % text.len()]).collect()
}

/// Returns the k-length and (k+1)-length windows starting at `start`.
pub fn k_windows(text: &[char], start: usize, k: usize) -> (String, String) {
	let k_plus_1 = k_window(text, start, k + 1);
	let k_string = k_plus_1.chars().take(k).collect();
	(k_string, k_plus_1)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn chars(s: &str) -> Vec<char> {
		s.chars().collect()
	}

	#[test]
	fn window_inside_text() {
		assert_eq!(k_window(&chars("hello"), 1, 3), "ell");
	}

	#[test]
	fn window_wraps_around() {
		assert_eq!(k_window(&chars("hello"), 3, 4), "lohe");
		assert_eq!(k_window(&chars("ab"), 1, 5), "babab");
	}

	#[test]
	fn degenerate_windows() {
		assert_eq!(k_window(&chars(""), 0, 3), "");
		assert_eq!(k_window(&chars("abc"), 2, 0), "");
	}

	#[test]
	fn windows_share_their_prefix() {
		let text = chars("abcd");
		assert_eq!(k_windows(&text, 3, 2), ("da".to_owned(), "dab".to_owned()));
		assert_eq!(k_windows(&chars("éà"), 1, 1), ("à".to_owned(), "àé".to_owned()));
	}
}
