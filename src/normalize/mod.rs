/// Source → candidate segment conversion.
pub mod segment;
