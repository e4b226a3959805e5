pub mod json_landmark_source;
