pub mod whiteboard_models;
pub mod whiteboard_service;

pub use whiteboard_models::{Point, Stroke, StoredStroke};
pub use whiteboard_service::{WhiteboardError, WhiteboardService};
