//! Window management policy for the lwindesk desktop.
//!
//! The display-server side feeds [`Event`](crate::core::event::Event)s into a
//! [`WindowManager`](crate::window::manager::WindowManager), which answers through the
//! [`Backend`](crate::core::backend::Backend) trait.

pub mod core;
pub mod input;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;
