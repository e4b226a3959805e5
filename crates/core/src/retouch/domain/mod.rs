pub mod blender;
pub mod frame_smoother;
