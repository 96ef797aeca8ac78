//! Pull the first balanced JSON value out of surrounding prose.
//!
//! LLM responses wrap their JSON in explanations and code fences; the
//! decoder only wants the bracketed payload. Matching is depth-aware and
//! skips brackets inside string literals.

pub(crate) fn first_json_array(text: &str) -> Option<&str> {
	first_delimited(text, '[', ']')
}

pub(crate) fn first_json_object(text: &str) -> Option<&str> {
	first_delimited(text, '{', '}')
}

fn first_delimited(text: &str, open: char, close: char) -> Option<&str> {
	let start = text.find(open)?;
	let mut depth = 0_usize;
	let mut in_string = false;
	let mut escaped = false;

	for (offset, ch) in text[start..].char_indices() {
		if in_string {
			if escaped {
				escaped = false;
			} else if ch == '\\' {
				escaped = true;
			} else if ch == '"' {
				in_string = false;
			}

			continue;
		}

		if ch == '"' {
			in_string = true;
		} else if ch == open {
			depth += 1;
		} else if ch == close {
			depth -= 1;

			if depth == 0 {
				return Some(&text[start..start + offset + ch.len_utf8()]);
			}
		}
	}

	None
}
