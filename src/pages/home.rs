use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info};
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlInputElement;

use crate::api::{CostClient, RequestError};
use crate::components::force_graph::ForceGraphCanvas;
use crate::graph::{self, GraphModel, ParseError, RoutePath};

/// Everything a user action can fail with. Each action converts to a single
/// message shown in the side panel, replacing any prior one.
#[derive(Debug, Error)]
enum ActionError {
	#[error("No file selected.")]
	NoFileSelected,
	#[error("Please upload a .txt file.")]
	InvalidFileType,
	#[error("Could not read the selected file.")]
	FileRead,
	#[error(transparent)]
	Parse(#[from] ParseError),
	#[error("Please enter a start location.")]
	MissingLocation,
	#[error("The location must be a single letter (e.g. A).")]
	InvalidLocation,
	#[error("Location {0} is not a vertex of the graph. Choose an existing node.")]
	UnknownVertex(char),
	#[error("Vertex {0} is a sink. Routes cannot be computed from it.")]
	SinkVertex(char),
	#[error(transparent)]
	Request(#[from] RequestError),
}

/// All local checks that must pass before the remote call fires. Returns
/// the validated start vertex.
fn validate_start(model: &GraphModel, location: &str) -> Result<char, ActionError> {
	if model.is_empty() {
		return Err(ActionError::NoFileSelected);
	}
	if location.is_empty() {
		return Err(ActionError::MissingLocation);
	}
	let mut chars = location.chars();
	let start = match (chars.next(), chars.next()) {
		(Some(c), None) if c.is_ascii_alphabetic() => c,
		_ => return Err(ActionError::InvalidLocation),
	};
	if !model.contains(start) {
		return Err(ActionError::UnknownVertex(start));
	}
	if !model.has_outgoing(start) {
		return Err(ActionError::SinkVertex(start));
	}
	Ok(start)
}

async fn read_and_parse(file: web_sys::File) -> Result<GraphModel, ActionError> {
	let text = JsFuture::from(file.text())
		.await
		.map_err(|_| ActionError::FileRead)?
		.as_string()
		.ok_or(ActionError::FileRead)?;
	Ok(graph::parse(&text)?)
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let model = RwSignal::new(GraphModel::default());
	let error_msg = RwSignal::new(None::<String>);
	let location = RwSignal::new(String::new());
	let paths = RwSignal::new(Vec::<RoutePath>::new());
	let selected_idx = RwSignal::new(None::<usize>);
	let loading = RwSignal::new(false);

	let selected_route = Signal::derive(move || {
		selected_idx
			.get()
			.and_then(|index| paths.get().get(index).cloned())
	});
	let start_vertex = Signal::derive(move || {
		let entered = location.get();
		let mut chars = entered.chars();
		match (chars.next(), chars.next()) {
			(Some(c), None) => Some(c),
			_ => None,
		}
	});

	let on_file_change = move |ev: web_sys::Event| {
		// A new upload replaces the whole session state.
		model.set(GraphModel::default());
		paths.set(Vec::new());
		selected_idx.set(None);
		location.set(String::new());
		error_msg.set(None);

		let input: HtmlInputElement = match ev.target() {
			Some(target) => target.unchecked_into(),
			None => return,
		};
		let file = match input.files().and_then(|files| files.get(0)) {
			Some(file) => file,
			None => {
				error_msg.set(Some(ActionError::NoFileSelected.to_string()));
				return;
			}
		};
		if file.type_() != "text/plain" {
			error_msg.set(Some(ActionError::InvalidFileType.to_string()));
			return;
		}

		spawn_local(async move {
			match read_and_parse(file).await {
				Ok(parsed) => {
					info!(
						"parsed graph: {} vertices, {} edges",
						parsed.vertices.len(),
						parsed.edges.len()
					);
					model.set(parsed);
				}
				Err(err) => {
					model.set(GraphModel::default());
					error_msg.set(Some(err.to_string()));
				}
			}
		});
	};

	let on_search = move |_| {
		error_msg.set(None);
		let current = model.get();
		let start = match validate_start(&current, &location.get()) {
			Ok(start) => start,
			Err(err) => {
				error_msg.set(Some(err.to_string()));
				return;
			}
		};

		// The button stays disabled until this request settles, so a second
		// search cannot overlap the first.
		loading.set(true);
		let graph_text = current.to_adjacency_text();
		spawn_local(async move {
			match CostClient::default().fetch_paths(&graph_text, start).await {
				Ok(found) => {
					info!("route service returned {} paths from {start}", found.len());
					paths.set(found);
					selected_idx.set(None);
				}
				Err(err) => {
					error!("route request failed: {err}");
					paths.set(Vec::new());
					selected_idx.set(None);
					error_msg.set(Some(err.to_string()));
				}
			}
			loading.set(false);
		});
	};

	view! {
		<div class="app-layout">
			<div class="side-panel">
				<h2>"Graph Route Viewer"</h2>
				<div class="upload-controls">
					<input type="file" accept=".txt,text/plain" on:change=on_file_change />
					{move || {
						error_msg.get().map(|msg| view! { <p class="error-message">{msg}</p> })
					}}
				</div>
				<div class="search-controls">
					<p>"Enter the start location:"</p>
					<input
						type="text"
						placeholder="Type your location"
						prop:value=location
						on:input=move |ev| {
							location.set(event_target_value(&ev).trim().to_uppercase());
						}
					/>
					<button on:click=on_search disabled=move || loading.get()>
						{move || if loading.get() { "Searching..." } else { "Search routes" }}
					</button>
				</div>
				{move || {
					let found = paths.get();
					(!found.is_empty())
						.then(|| {
							view! {
								<div class="path-list">
									<h3>{format!("Routes found (start: {})", location.get())}</h3>
									<ul>
										{found
											.iter()
											.enumerate()
											.map(|(index, route)| {
												let stops = route
													.path
													.iter()
													.map(char::to_string)
													.collect::<Vec<_>>()
													.join(" -> ");
												view! {
													<li
														class="path-item"
														class:selected=move || {
															selected_idx.get() == Some(index)
														}
														on:click=move |_| selected_idx.set(Some(index))
													>
														<strong>
															{format!("Target: {}", route.target)}
														</strong>
														<br />
														{format!("Route: {stops}")}
														<br />
														{format!("Cost: {}", route.cost)}
													</li>
												}
											})
											.collect_view()}
									</ul>
								</div>
							}
						})
				}}
			</div>
			<div class="graph-pane">
				<ForceGraphCanvas data=model selected=selected_route start=start_vertex />
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> GraphModel {
		graph::parse("A: B2\nB: C1").unwrap()
	}

	#[test]
	fn validation_passes_for_a_vertex_with_outgoing_edges() {
		assert!(matches!(validate_start(&sample(), "A"), Ok('A')));
	}

	#[test]
	fn an_empty_model_means_no_file_was_loaded() {
		assert!(matches!(
			validate_start(&GraphModel::default(), "A"),
			Err(ActionError::NoFileSelected)
		));
	}

	#[test]
	fn the_location_must_be_present_and_a_single_letter() {
		assert!(matches!(
			validate_start(&sample(), ""),
			Err(ActionError::MissingLocation)
		));
		assert!(matches!(
			validate_start(&sample(), "AB"),
			Err(ActionError::InvalidLocation)
		));
		assert!(matches!(
			validate_start(&sample(), "1"),
			Err(ActionError::InvalidLocation)
		));
	}

	#[test]
	fn unknown_vertices_are_rejected() {
		assert!(matches!(
			validate_start(&sample(), "Z"),
			Err(ActionError::UnknownVertex('Z'))
		));
	}

	#[test]
	fn sinks_never_reach_the_remote_call() {
		// C appears only as a destination, so it has no outgoing edges.
		assert!(matches!(
			validate_start(&sample(), "C"),
			Err(ActionError::SinkVertex('C'))
		));
	}
}
