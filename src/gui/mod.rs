mod app;
mod surface;

pub use app::{run, GuiPlayback, GuiSettings};
pub use surface::GuiSurface;
