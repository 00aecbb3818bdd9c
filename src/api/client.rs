//! Fetch glue for the path-cost service. Everything here is thin wasm
//! plumbing; response interpretation lives in `types` as pure functions.

use js_sys::Array;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Request, RequestInit, Response};

use super::types::{self, parse_paths};
use super::RequestError;
use crate::graph::RoutePath;

/// Where the route service listens unless the caller overrides it.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/custo";

/// Multipart field name the service expects the graph file under.
const GRAPH_FIELD: &str = "arquivoGrafo";

/// Client for the remote path-cost service.
pub struct CostClient {
	endpoint: String,
}

impl CostClient {
	pub fn new(endpoint: impl Into<String>) -> Self {
		Self {
			endpoint: endpoint.into(),
		}
	}

	fn request_url(&self, start: char) -> String {
		format!("{}?verticeInicial={start}", self.endpoint)
	}

	/// POST the serialized graph and start vertex, returning the routes the
	/// service found. `graph_text` is the canonical adjacency text from
	/// `GraphModel::to_adjacency_text`.
	pub async fn fetch_paths(
		&self,
		graph_text: &str,
		start: char,
	) -> Result<Vec<RoutePath>, RequestError> {
		let form = FormData::new().map_err(network_error)?;
		let parts = Array::of1(&JsValue::from_str(graph_text));
		let options = BlobPropertyBag::new();
		options.set_type("text/plain");
		let blob =
			Blob::new_with_str_sequence_and_options(&parts, &options).map_err(network_error)?;
		form.append_with_blob_and_filename(GRAPH_FIELD, &blob, "grafo.txt")
			.map_err(network_error)?;

		let init = RequestInit::new();
		init.set_method("POST");
		init.set_body(&form);
		let request =
			Request::new_with_str_and_init(&self.request_url(start), &init).map_err(network_error)?;

		let window = web_sys::window()
			.ok_or_else(|| RequestError::Network("no window available".to_owned()))?;
		let response: Response = JsFuture::from(window.fetch_with_request(&request))
			.await
			.map_err(network_error)?
			.dyn_into()
			.map_err(network_error)?;

		let body = JsFuture::from(response.text().map_err(network_error)?)
			.await
			.map_err(network_error)?
			.as_string()
			.unwrap_or_default();

		if !response.ok() {
			return Err(types::status_error(response.status(), &body));
		}
		parse_paths(&body)
	}
}

impl Default for CostClient {
	fn default() -> Self {
		Self::new(DEFAULT_ENDPOINT)
	}
}

fn network_error(value: JsValue) -> RequestError {
	let message = value.as_string().unwrap_or_else(|| format!("{value:?}"));
	RequestError::Network(message)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn request_url_carries_the_start_vertex() {
		let client = CostClient::new("http://localhost:5000/custo");
		assert_eq!(
			client.request_url('A'),
			"http://localhost:5000/custo?verticeInicial=A"
		);
	}
}
