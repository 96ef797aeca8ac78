//! Lexical machinery for the relevance scorer: tokenization with English
//! stopword removal, smoothed TF-IDF weighting, and cosine similarity.

use std::{
	collections::{HashMap, HashSet},
	sync::LazyLock,
};

use finch_domain::Candidate;

/// Common English words removed before weighting.
pub const STOPWORDS: &[&str] = &[
	"about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are", "as",
	"at", "be", "because", "been", "before", "being", "below", "between", "both", "but", "by",
	"can", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
	"further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
	"himself", "his", "how", "if", "in", "into", "is", "it", "its", "itself", "just", "me",
	"more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only",
	"or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she", "should",
	"so", "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
	"there", "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
	"very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why",
	"will", "with", "you", "your", "yours", "yourself", "yourselves",
];

static STOPWORD_SET: LazyLock<HashSet<&'static str>> =
	LazyLock::new(|| STOPWORDS.iter().copied().collect());

/// Lowercase ASCII-alphanumeric tokens, stopwords removed, single characters
/// dropped. Duplicates are kept; term frequency matters downstream.
pub fn tokenize(text: &str) -> Vec<String> {
	let mut normalized = String::with_capacity(text.len());

	for ch in text.chars() {
		if ch.is_ascii_alphanumeric() {
			normalized.push(ch.to_ascii_lowercase());
		} else {
			normalized.push(' ');
		}
	}

	normalized
		.split_whitespace()
		.filter(|token| token.len() >= 2 && !STOPWORD_SET.contains(token))
		.map(str::to_string)
		.collect()
}

/// The text a candidate is matched on: title and snippet, plus company and
/// location for job-board records.
pub fn candidate_document(candidate: &Candidate) -> String {
	let mut document = format!("{} {}", candidate.title, candidate.snippet);

	if candidate.source.is_job_board() {
		if let Some(company) = candidate.company.as_deref() {
			document.push(' ');
			document.push_str(company);
		}
		if let Some(location) = candidate.location.as_deref() {
			document.push(' ');
			document.push_str(location);
		}
	}

	document.to_lowercase()
}

/// One TF-IDF vector per document over the corpus vocabulary, using the
/// smoothed inverse document frequency `ln((1 + N) / (1 + df)) + 1`.
pub fn tfidf_vectors(documents: &[Vec<String>]) -> Vec<Vec<f32>> {
	let total = documents.len();
	let mut vocabulary: HashMap<&str, usize> = HashMap::new();
	let mut document_frequency: Vec<usize> = Vec::new();

	for document in documents {
		let mut seen = HashSet::new();

		for term in document {
			let next_index = vocabulary.len();
			let index = *vocabulary.entry(term.as_str()).or_insert(next_index);

			if index == document_frequency.len() {
				document_frequency.push(0);
			}
			if seen.insert(index) {
				document_frequency[index] += 1;
			}
		}
	}

	let idf: Vec<f32> = document_frequency
		.iter()
		.map(|&df| ((1.0 + total as f32) / (1.0 + df as f32)).ln() + 1.0)
		.collect();

	documents
		.iter()
		.map(|document| {
			let mut vector = vec![0.0_f32; vocabulary.len()];

			for term in document {
				if let Some(&index) = vocabulary.get(term.as_str()) {
					vector[index] += 1.0;
				}
			}
			for (index, weight) in vector.iter_mut().enumerate() {
				*weight *= idf[index];
			}

			vector
		})
		.collect()
}

/// Cosine similarity with an explicit zero-norm guard: a vector with no
/// weight is similar to nothing.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
	let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
	let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
	let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

	if norm_a == 0.0 || norm_b == 0.0 {
		return 0.0;
	}

	dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
	use finch_domain::Source;

	use super::*;

	#[test]
	fn tokenize_lowercases_and_drops_stopwords() {
		let tokens = tokenize("The Quick Brown Fox is on the Run!");

		assert_eq!(tokens, vec!["quick", "brown", "fox", "run"]);
	}

	#[test]
	fn tokenize_keeps_duplicates() {
		assert_eq!(tokenize("rust rust rust").len(), 3);
	}

	#[test]
	fn job_documents_include_company_and_location() {
		let mut candidate = Candidate::new(Source::Jooble, "Jooble", "Engineer", "l", "Build");

		candidate.company = Some("Acme".to_string());
		candidate.location = Some("Berlin".to_string());

		let document = candidate_document(&candidate);

		assert!(document.contains("acme"));
		assert!(document.contains("berlin"));
	}

	#[test]
	fn web_documents_exclude_job_fields() {
		let mut candidate = Candidate::new(Source::WebSearch, "Web", "Title", "l", "Snippet");

		candidate.company = Some("Acme".to_string());

		assert!(!candidate_document(&candidate).contains("acme"));
	}

	#[test]
	fn cosine_guards_zero_norms() {
		assert_eq!(cosine(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
		assert_eq!(cosine(&[1.0, 2.0], &[0.0, 0.0]), 0.0);
	}

	#[test]
	fn identical_documents_have_unit_similarity() {
		let documents = vec![tokenize("rust async runtime"), tokenize("rust async runtime")];
		let vectors = tfidf_vectors(&documents);
		let similarity = cosine(&vectors[0], &vectors[1]);

		assert!((similarity - 1.0).abs() < 1e-6);
	}

	#[test]
	fn shared_terms_score_higher_than_disjoint() {
		let documents = vec![
			tokenize("python machine learning tutorial"),
			tokenize("cooking recipes for dinner"),
			tokenize("python machine learning"),
		];
		let vectors = tfidf_vectors(&documents);
		let related = cosine(&vectors[2], &vectors[0]);
		let unrelated = cosine(&vectors[2], &vectors[1]);

		assert!(related > unrelated);
		assert_eq!(unrelated, 0.0);
	}
}
