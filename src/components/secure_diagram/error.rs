use thiserror::Error;

use super::types::{ConnectorId, ElementId};

pub type Result<T, E = DiagramError> = std::result::Result<T, E>;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum DiagramError {
	/// Elements not rendered yet. Expected during startup.
	#[error("diagram elements not rendered yet: {}", list(.0))]
	MissingElements(Vec<ElementId>),
	#[error("{0} is no longer attached to the diagram")]
	Detached(ElementId),
	#[error("no segment has been laid out for the {0}")]
	NoSegment(ConnectorId),
	#[error("failed to update {element}: {reason}")]
	Style { element: ElementId, reason: String },
	#[error("animation cancelled")]
	Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
	MissingElement,
	Execution,
	Cancelled,
}

impl DiagramError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			DiagramError::MissingElements(_) => ErrorKind::MissingElement,
			DiagramError::Cancelled => ErrorKind::Cancelled,
			DiagramError::Detached(_)
			| DiagramError::NoSegment(_)
			| DiagramError::Style { .. } => ErrorKind::Execution,
		}
	}
}

fn list(elements: &[ElementId]) -> String {
	elements
		.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join(", ")
}
