pub mod cursor;
pub mod keyboard;
