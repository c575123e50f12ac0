//! External model assets.

pub mod model_loader;

pub use model_loader::{handle_model_loaded, load_obj_object, LoadOutcome, ModelLoader, ModelPlacement};
