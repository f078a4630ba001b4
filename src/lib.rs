#![doc = include_str!("../README.md")]

pub mod config;
pub mod console;
pub mod error;
pub mod input;
pub mod rendering;

pub use crate::config::GridConfig;
pub use crate::console::{CellCanvas, Console};
pub use crate::error::{ConsoleError, Result};
pub use crate::input::{GridInput, InputState};
pub use crate::rendering::cell::{Cell, Style};
pub use crate::rendering::color::{Color, HsvColor, RgbColor, Rgba64};
pub use crate::rendering::frame::{Frame, FrameCell};
pub use crate::rendering::geometry::{Point, Rect};
pub use crate::rendering::grid::Grid;
pub use crate::rendering::renderer::Renderer;
