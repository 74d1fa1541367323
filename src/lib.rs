//! padmapper - shows a gamepad as a virtual keyboard
//!
//! Gamepad samples are translated through a user-supplied mapping into a set
//! of virtual keys, merged with the keys held on the real keyboard and drawn
//! on an on-screen keyboard.

pub mod controller;
pub mod mapping;
pub mod persistence;
pub mod ui;
