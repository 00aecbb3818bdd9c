//! Wire format of the path-cost service, kept apart from the core model so
//! response handling stays a pure, testable function of the body text.

use serde::Deserialize;

use super::RequestError;
use crate::graph::RoutePath;

#[derive(Debug, Deserialize)]
struct PathsResponse {
	paths: Vec<PathDto>,
}

#[derive(Debug, Deserialize)]
struct PathDto {
	target: String,
	path: Vec<String>,
	cost: f64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
	detail: String,
}

/// Parse a success body (`{"paths": [...]}`) into routes.
pub fn parse_paths(body: &str) -> Result<Vec<RoutePath>, RequestError> {
	let response: PathsResponse =
		serde_json::from_str(body).map_err(|err| RequestError::Payload(err.to_string()))?;
	response.paths.into_iter().map(RoutePath::try_from).collect()
}

/// Turn a non-success response into the error shown to the user, preferring
/// the server's `detail` message when the body carries one.
pub(super) fn status_error(status: u16, body: &str) -> RequestError {
	let detail = serde_json::from_str::<ErrorBody>(body)
		.map(|err| err.detail)
		.unwrap_or_else(|_| "the route service reported a failure".to_owned());
	RequestError::Status { status, detail }
}

impl TryFrom<PathDto> for RoutePath {
	type Error = RequestError;

	fn try_from(dto: PathDto) -> Result<Self, Self::Error> {
		let target = vertex_id(&dto.target)?;
		let path = dto
			.path
			.iter()
			.map(|stop| vertex_id(stop))
			.collect::<Result<Vec<char>, _>>()?;
		if path.is_empty() {
			return Err(RequestError::Payload("a returned path is empty".to_owned()));
		}
		Ok(RoutePath {
			target,
			path,
			cost: dto.cost,
		})
	}
}

/// Vertex identifiers on the wire are single letters, same as in the
/// uploaded file; anything else could never match the model.
fn vertex_id(name: &str) -> Result<char, RequestError> {
	let mut chars = name.chars();
	match (chars.next(), chars.next()) {
		(Some(c), None) if c.is_ascii_alphabetic() => Ok(c),
		_ => Err(RequestError::Payload(format!(
			"\"{name}\" is not a vertex identifier"
		))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_a_paths_response() {
		let body = r#"{
			"paths": [
				{"target": "B", "path": ["A", "B"], "cost": 2},
				{"target": "C", "path": ["A", "B", "C"], "cost": 3.5}
			]
		}"#;
		let paths = parse_paths(body).unwrap();
		assert_eq!(paths.len(), 2);
		assert_eq!(paths[0].target, 'B');
		assert_eq!(paths[0].path, vec!['A', 'B']);
		assert_eq!(paths[0].cost, 2.0);
		assert_eq!(paths[1].path, vec!['A', 'B', 'C']);
		assert_eq!(paths[1].cost, 3.5);
	}

	#[test]
	fn rejects_bodies_without_a_paths_array() {
		assert!(matches!(
			parse_paths(r#"{"routes": []}"#),
			Err(RequestError::Payload(_))
		));
		assert!(matches!(parse_paths("not json"), Err(RequestError::Payload(_))));
	}

	#[test]
	fn rejects_multi_letter_wire_identifiers() {
		let body = r#"{"paths": [{"target": "BC", "path": ["A", "BC"], "cost": 1}]}"#;
		assert!(matches!(parse_paths(body), Err(RequestError::Payload(_))));
	}

	#[test]
	fn rejects_empty_paths() {
		let body = r#"{"paths": [{"target": "B", "path": [], "cost": 1}]}"#;
		assert!(matches!(parse_paths(body), Err(RequestError::Payload(_))));
	}

	#[test]
	fn status_errors_prefer_the_server_detail() {
		assert_eq!(
			status_error(422, r#"{"detail": "no start vertex"}"#),
			RequestError::Status {
				status: 422,
				detail: "no start vertex".to_owned(),
			}
		);
	}

	#[test]
	fn status_errors_fall_back_without_a_detail() {
		let err = status_error(500, "<html>oops</html>");
		let RequestError::Status { status, detail } = err else {
			panic!("expected a status error");
		};
		assert_eq!(status, 500);
		assert!(!detail.is_empty());
	}
}
