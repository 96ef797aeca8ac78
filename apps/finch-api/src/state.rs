//! Engine wiring: the HTTP providers adapted onto the engine's ports.

use std::sync::Arc;

use finch_config::{AdzunaConfig, Config, ConnectorConfig, LlmProviderConfig};
use finch_domain::{Candidate, Source};
use finch_engine::{
	BoxFuture, Completer, Connector, Engine, Error, LlmReranker, MemoryProfileStore, Result,
};
use finch_providers::{books, jobs, llm, movies, web};

#[derive(Clone)]
pub struct AppState {
	pub engine: Arc<Engine>,
}
impl AppState {
	pub fn new(config: Config) -> Self {
		let completer: Arc<dyn Completer> =
			Arc::new(HttpCompleter { cfg: config.providers.llm.clone() });
		let mut connectors: Vec<Arc<dyn Connector>> = Vec::new();

		if config.providers.web_search.enabled {
			connectors
				.push(Arc::new(WebSearchConnector { cfg: config.providers.web_search.clone() }));
		}
		if config.providers.books.enabled {
			connectors.push(Arc::new(BooksConnector { cfg: config.providers.books.clone() }));
		}
		if config.providers.movies.enabled {
			connectors.push(Arc::new(MoviesConnector { cfg: config.providers.movies.clone() }));
		}
		if config.providers.jooble.enabled {
			connectors.push(Arc::new(JoobleConnector { cfg: config.providers.jooble.clone() }));
		}
		if config.providers.adzuna.enabled {
			connectors.push(Arc::new(AdzunaConnector { cfg: config.providers.adzuna.clone() }));
		}

		let reranker = Arc::new(LlmReranker::new(completer.clone()));
		let engine = Engine::new(
			config,
			Arc::new(MemoryProfileStore::new()),
			connectors,
			completer,
			reranker,
		);

		Self { engine: Arc::new(engine) }
	}
}

fn provider_error(err: finch_providers::Error) -> Error {
	Error::Provider { message: err.to_string() }
}

struct HttpCompleter {
	cfg: LlmProviderConfig,
}
impl Completer for HttpCompleter {
	fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { llm::complete(&self.cfg, prompt).await.map_err(provider_error) })
	}
}

struct WebSearchConnector {
	cfg: ConnectorConfig,
}
impl Connector for WebSearchConnector {
	fn source(&self) -> Source {
		Source::WebSearch
	}

	fn label(&self) -> &str {
		"web_search"
	}

	fn fetch<'a>(
		&'a self,
		query: &'a str,
		_location: Option<&'a str>,
	) -> BoxFuture<'a, Result<Vec<Candidate>>> {
		Box::pin(async move { web::search(&self.cfg, query).await.map_err(provider_error) })
	}
}

struct BooksConnector {
	cfg: ConnectorConfig,
}
impl Connector for BooksConnector {
	fn source(&self) -> Source {
		Source::Books
	}

	fn label(&self) -> &str {
		"books"
	}

	fn fetch<'a>(
		&'a self,
		query: &'a str,
		_location: Option<&'a str>,
	) -> BoxFuture<'a, Result<Vec<Candidate>>> {
		Box::pin(async move { books::search(&self.cfg, query).await.map_err(provider_error) })
	}
}

struct MoviesConnector {
	cfg: ConnectorConfig,
}
impl Connector for MoviesConnector {
	fn source(&self) -> Source {
		Source::Movies
	}

	fn label(&self) -> &str {
		"movies"
	}

	fn fetch<'a>(
		&'a self,
		query: &'a str,
		_location: Option<&'a str>,
	) -> BoxFuture<'a, Result<Vec<Candidate>>> {
		Box::pin(async move { movies::search(&self.cfg, query).await.map_err(provider_error) })
	}
}

struct JoobleConnector {
	cfg: ConnectorConfig,
}
impl Connector for JoobleConnector {
	fn source(&self) -> Source {
		Source::Jooble
	}

	fn label(&self) -> &str {
		"jooble"
	}

	fn fetch<'a>(
		&'a self,
		query: &'a str,
		location: Option<&'a str>,
	) -> BoxFuture<'a, Result<Vec<Candidate>>> {
		Box::pin(async move {
			jobs::jooble(&self.cfg, query, location).await.map_err(provider_error)
		})
	}
}

struct AdzunaConnector {
	cfg: AdzunaConfig,
}
impl Connector for AdzunaConnector {
	fn source(&self) -> Source {
		Source::Adzuna
	}

	fn label(&self) -> &str {
		"adzuna"
	}

	fn fetch<'a>(
		&'a self,
		query: &'a str,
		location: Option<&'a str>,
	) -> BoxFuture<'a, Result<Vec<Candidate>>> {
		Box::pin(async move {
			jobs::adzuna(&self.cfg, query, location).await.map_err(provider_error)
		})
	}
}
