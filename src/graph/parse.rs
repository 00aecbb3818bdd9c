//! Adjacency-list parser and normalizer.
//!
//! Input is line-oriented text in the form `A: B2, C3`. Every line names an
//! origin vertex before the colon and a comma-separated list of
//! `<target><weight>` tokens after it. Vertex identifiers are exactly one
//! ASCII letter, case-sensitive. Duplicate declarations of the same ordered
//! pair keep the minimum weight. Any error aborts the whole parse.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::model::{CURVE_OFFSET, Edge, GraphModel};

/// Why a graph description was rejected. Each variant carries the raw line
/// it came from so the message can be shown to the user as-is.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
	#[error("The file is empty.")]
	EmptyInput,
	#[error("Invalid format on line: {0}")]
	InvalidLineFormat(String),
	#[error("Vertex names must be a single letter, got \"{name}\" on line: {line}")]
	InvalidVertexName { name: String, line: String },
	#[error("Invalid destination/weight on line: {0}")]
	InvalidEdgeToken(String),
}

/// Parse a full graph description into a normalized model.
///
/// Pure: never touches prior state. The caller replaces the displayed model
/// wholesale with the result, or clears it when an `Err` comes back.
pub fn parse(text: &str) -> Result<GraphModel, ParseError> {
	let trimmed = text.trim();
	if trimmed.is_empty() {
		return Err(ParseError::EmptyInput);
	}

	let mut builder = GraphBuilder::default();
	for line in trimmed.lines() {
		parse_line(line, &mut builder)?;
	}
	Ok(builder.finish())
}

fn parse_line(raw: &str, builder: &mut GraphBuilder) -> Result<(), ParseError> {
	let Some((left, right)) = raw.split_once(':') else {
		return Err(ParseError::InvalidLineFormat(raw.to_owned()));
	};
	let (origin, destinations) = (left.trim(), right.trim());
	if origin.is_empty() || destinations.is_empty() {
		return Err(ParseError::InvalidLineFormat(raw.to_owned()));
	}

	let source = single_letter(origin).ok_or_else(|| ParseError::InvalidVertexName {
		name: origin.to_owned(),
		line: raw.to_owned(),
	})?;

	for part in destinations.split(',') {
		let token = part.trim();
		let (name, digits) =
			split_destination(token).ok_or_else(|| ParseError::InvalidEdgeToken(raw.to_owned()))?;
		let target = single_letter(name).ok_or_else(|| ParseError::InvalidVertexName {
			name: name.to_owned(),
			line: raw.to_owned(),
		})?;
		// u32::MAX overflow lands here too; weights never wrap silently.
		let weight: u32 = digits
			.parse()
			.map_err(|_| ParseError::InvalidEdgeToken(raw.to_owned()))?;
		builder.add_edge(source, target, weight);
	}
	Ok(())
}

/// Exactly one ASCII letter.
fn single_letter(name: &str) -> Option<char> {
	let mut chars = name.chars();
	match (chars.next(), chars.next()) {
		(Some(c), None) if c.is_ascii_alphabetic() => Some(c),
		_ => None,
	}
}

/// Split a `<letters><digits>` token with no separator, e.g. `B2`.
fn split_destination(token: &str) -> Option<(&str, &str)> {
	let digits_at = token.find(|c: char| c.is_ascii_digit())?;
	let (name, digits) = token.split_at(digits_at);
	if name.is_empty()
		|| !name.chars().all(|c| c.is_ascii_alphabetic())
		|| !digits.chars().all(|c| c.is_ascii_digit())
	{
		return None;
	}
	Some((name, digits))
}

/// Accumulates vertices and edges during a single parse call.
///
/// Edges live in a Vec in first-insertion order with a position index keyed
/// by ordered pair, so min-weight deduplication never reorders and the
/// curvature pass is reproducible.
#[derive(Default)]
struct GraphBuilder {
	vertices: Vec<char>,
	seen: HashSet<char>,
	edges: Vec<(char, char, u32)>,
	positions: HashMap<(char, char), usize>,
}

impl GraphBuilder {
	fn add_vertex(&mut self, vertex: char) {
		if self.seen.insert(vertex) {
			self.vertices.push(vertex);
		}
	}

	fn add_edge(&mut self, source: char, target: char, weight: u32) {
		self.add_vertex(source);
		self.add_vertex(target);
		match self.positions.get(&(source, target)) {
			Some(&at) => {
				let kept = &mut self.edges[at].2;
				*kept = (*kept).min(weight);
			}
			None => {
				self.positions.insert((source, target), self.edges.len());
				self.edges.push((source, target, weight));
			}
		}
	}

	fn finish(self) -> GraphModel {
		let mut pairs = HashSet::new();
		let edges = self
			.edges
			.into_iter()
			.map(|(source, target, weight)| {
				let key = if source <= target {
					(source, target)
				} else {
					(target, source)
				};
				let curvature = if pairs.insert(key) { 0.0 } else { CURVE_OFFSET };
				Edge {
					source,
					target,
					weight,
					curvature,
				}
			})
			.collect();
		GraphModel {
			vertices: self.vertices,
			edges,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn triples(model: &GraphModel) -> Vec<(char, char, u32)> {
		model
			.edges
			.iter()
			.map(|e| (e.source, e.target, e.weight))
			.collect()
	}

	#[test]
	fn parses_the_reference_graph() {
		let model = parse("A: B2, C3\nB: C1\nC: A4").unwrap();
		assert_eq!(model.vertices, vec!['A', 'B', 'C']);
		assert_eq!(
			triples(&model),
			vec![('A', 'B', 2), ('A', 'C', 3), ('B', 'C', 1), ('C', 'A', 4)]
		);
		// A->C was registered first for the {A,C} pair, so C->A curves.
		let curvatures: Vec<f64> = model.edges.iter().map(|e| e.curvature).collect();
		assert_eq!(curvatures, vec![0.0, 0.0, 0.0, CURVE_OFFSET]);
	}

	#[test]
	fn parsing_is_deterministic() {
		let text = "A: B2, C3\nB: C1\nC: A4";
		assert_eq!(parse(text).unwrap(), parse(text).unwrap());
	}

	#[test]
	fn duplicate_pairs_keep_the_minimum_weight() {
		let model = parse("A: B5, B2, B9").unwrap();
		assert_eq!(triples(&model), vec![('A', 'B', 2)]);

		// Order of the duplicates never matters.
		let model = parse("A: B2, B9, B5").unwrap();
		assert_eq!(triples(&model), vec![('A', 'B', 2)]);
	}

	#[test]
	fn duplicates_across_lines_stay_at_first_position() {
		let model = parse("A: B5, C1\nA: B3").unwrap();
		assert_eq!(triples(&model), vec![('A', 'B', 3), ('A', 'C', 1)]);
	}

	#[test]
	fn only_the_second_direction_of_a_pair_curves() {
		let model = parse("A: B2\nB: A7").unwrap();
		assert_eq!(model.edges[0].curvature, 0.0);
		assert_eq!(model.edges[1].curvature, CURVE_OFFSET);

		let one_way = parse("A: B2").unwrap();
		assert_eq!(one_way.edges[0].curvature, 0.0);
	}

	#[test]
	fn empty_or_blank_input_is_rejected() {
		assert_eq!(parse(""), Err(ParseError::EmptyInput));
		assert_eq!(parse("  \n\t\n"), Err(ParseError::EmptyInput));
	}

	#[test]
	fn lines_without_a_colon_or_a_side_are_rejected() {
		assert_eq!(
			parse("A B2"),
			Err(ParseError::InvalidLineFormat("A B2".into()))
		);
		assert_eq!(parse("A:"), Err(ParseError::InvalidLineFormat("A:".into())));
		assert_eq!(
			parse(":B2"),
			Err(ParseError::InvalidLineFormat(":B2".into()))
		);
		// An interior blank line has no colon either.
		assert_eq!(
			parse("A: B2\n\nB: C1"),
			Err(ParseError::InvalidLineFormat(String::new()))
		);
	}

	#[test]
	fn multi_letter_identifiers_are_rejected_on_both_sides() {
		assert_eq!(
			parse("AB: C2"),
			Err(ParseError::InvalidVertexName {
				name: "AB".into(),
				line: "AB: C2".into(),
			})
		);
		assert_eq!(
			parse("A: BC2"),
			Err(ParseError::InvalidVertexName {
				name: "BC".into(),
				line: "A: BC2".into(),
			})
		);
		assert!(parse("A: B2").is_ok());
	}

	#[test]
	fn malformed_destination_tokens_are_rejected() {
		for line in ["A: B", "A: 2B", "A: B2x", "A: B 2", "A: ,B2"] {
			assert_eq!(
				parse(line),
				Err(ParseError::InvalidEdgeToken(line.into())),
				"line {line:?}"
			);
		}
	}

	#[test]
	fn non_ascii_identifiers_are_rejected() {
		assert!(matches!(
			parse("Á: B2"),
			Err(ParseError::InvalidVertexName { .. })
		));
	}

	#[test]
	fn weights_that_overflow_u32_are_rejected() {
		assert_eq!(
			parse("A: B99999999999"),
			Err(ParseError::InvalidEdgeToken("A: B99999999999".into()))
		);
		assert_eq!(
			parse(&format!("A: B{}", u32::MAX)).unwrap().edges[0].weight,
			u32::MAX
		);
	}

	#[test]
	fn windows_line_endings_are_tolerated() {
		let model = parse("A: B2\r\nB: C1\r\n").unwrap();
		assert_eq!(triples(&model), vec![('A', 'B', 2), ('B', 'C', 1)]);
	}

	#[test]
	fn case_is_preserved_and_distinct() {
		let model = parse("a: A1").unwrap();
		assert_eq!(model.vertices, vec!['a', 'A']);
		assert_eq!(triples(&model), vec![('a', 'A', 1)]);
	}

	#[test]
	fn zero_weights_are_valid() {
		let model = parse("A: B0").unwrap();
		assert_eq!(triples(&model), vec![('A', 'B', 0)]);
	}

	#[test]
	fn serialization_round_trips_the_reference_graph() {
		let model = parse("A: B2, C3\nB: C1\nC: A4").unwrap();
		assert_eq!(model.to_adjacency_text(), "A: B2, C3\nB: C1\nC: A4");
	}
}
