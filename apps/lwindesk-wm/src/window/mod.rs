pub mod decoration;
pub mod draw;
pub mod error;
pub mod frame;
pub mod manager;
pub mod placement;
pub mod registry;
pub mod snap;
pub mod view;
pub mod workspace;

pub const LAYER_DESKTOP: u16 = 0;
pub const LAYER_NORMAL: u16 = 4;
pub const LAYER_DOCK: u16 = 8;
pub const LAYER_NOTIFICATION: u16 = 14;
